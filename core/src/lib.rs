pub mod discovery;
pub mod pool;
pub mod scanner;

pub mod network {
    pub mod http;
    pub mod tcp;
}
