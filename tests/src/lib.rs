#![cfg(test)]

mod support;

mod discovery {
    mod integration;
}

mod http {
    mod loopback;
}
