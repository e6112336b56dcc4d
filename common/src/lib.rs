pub mod config;

pub mod network {
    pub mod interface;
    pub mod range;
    pub mod target;
}

pub mod utils {
    pub mod interface;
}
