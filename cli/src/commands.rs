pub mod discover;

use std::time::Duration;

use clap::Parser;
use srvsearch_common::config::{Config, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_MS, HTTP_PORT, ServerFilter};
use srvsearch_common::network::target::AddressRangeSpec;

#[derive(Parser, Debug)]
#[command(name = "srvsearch")]
#[command(about = "Finds hosts on the network and reports the HTTP server each one runs.")]
pub struct CommandLine {
    /// Print per-address diagnostics (ping times, raw headers, failures)
    #[arg(short, long)]
    pub verbose: bool,

    /// Timeout in milliseconds for each ping, connect and read
    #[arg(short, long, value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout: u64,

    /// Maximum number of probes in flight
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// TCP port the HTTP request is sent to
    #[arg(short, long, default_value_t = HTTP_PORT)]
    pub port: u16,

    /// Only list servers whose name starts with this (case-insensitive)
    #[arg(short, long, value_name = "PATTERN", default_value = "*")]
    pub server: String,

    /// Addresses to poll: IP, IP-IP, IP+N or IP/PREFIX. Defaults to local networks.
    pub addresses: Vec<AddressRangeSpec>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            verbose: self.verbose,
            timeout: Duration::from_millis(self.timeout),
            concurrency: self.concurrency.max(1),
            http_port: self.port,
            server_filter: ServerFilter::new(&self.server),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
