use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 100;
pub const DEFAULT_CONCURRENCY: usize = 50;
pub const HTTP_PORT: u16 = 80;

pub struct Config {
    /// Echo per-address diagnostics (ping timing, raw header lines, failures).
    pub verbose: bool,
    /// Budget for each ICMP probe, TCP connect and socket read.
    pub timeout: Duration,
    /// Maximum number of probes in flight at once.
    pub concurrency: usize,
    pub http_port: u16,
    /// Restricts which `Server` values end up in the report.
    pub server_filter: ServerFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            concurrency: DEFAULT_CONCURRENCY,
            http_port: HTTP_PORT,
            server_filter: ServerFilter::Any,
        }
    }
}

/// Matches `Server` header values against a user supplied pattern.
///
/// `*` accepts everything, anything else is a case-insensitive prefix
/// (a trailing `*` is allowed and means the same thing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ServerFilter {
    #[default]
    Any,
    Prefix(String),
}

impl ServerFilter {
    pub fn new(pattern: &str) -> Self {
        let prefix = pattern.trim().trim_end_matches('*');
        if prefix.is_empty() {
            ServerFilter::Any
        } else {
            ServerFilter::Prefix(prefix.to_ascii_lowercase())
        }
    }

    pub fn matches(&self, server: &str) -> bool {
        match self {
            ServerFilter::Any => true,
            ServerFilter::Prefix(prefix) => server
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
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
