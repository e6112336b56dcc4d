//! # Server Discovery Pipeline
//!
//! Sequences the three stages of a run:
//! 1. the candidate set (already expanded and deduplicated),
//! 2. a bounded reachability sweep through a [`Pinger`],
//! 3. one header read per reachable host through a [`HeaderFetcher`].
//!
//! Per-host failures never abort the run; they are kept in the report.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use srvsearch_common::config::{Config, ServerFilter};
use srvsearch_common::network::range::AddressSet;
use srvsearch_common::network::target::{self, AddressRangeSpec};
use srvsearch_protocols::http::{HeaderError, HeaderResult, TransportFailure};
use tracing::debug;

use crate::network::http::HeaderFetcher;
use crate::pool;
use crate::scanner::{self, Pinger, ProbeResult};

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Candidates considered.
    pub total: usize,
    /// Candidates that answered the liveness check.
    pub reachable: usize,
    /// Reachable hosts that returned a well-formed response head.
    pub responded: usize,
    /// Hosts with a `Server` header accepted by the filter, in reachable order.
    pub servers: Vec<(Ipv4Addr, String)>,
    pub probes: Vec<ProbeResult>,
    pub headers: Vec<(Ipv4Addr, HeaderResult)>,
}

impl ScanReport {
    /// Dotted address to `Server` value.
    pub fn server_map(&self) -> HashMap<String, String> {
        self.servers
            .iter()
            .map(|(addr, server)| (addr.to_string(), server.clone()))
            .collect()
    }
}

pub struct ScanPipeline {
    pinger: Arc<dyn Pinger>,
    fetcher: Arc<dyn HeaderFetcher>,
    timeout: Duration,
    concurrency: usize,
    server_filter: ServerFilter,
}

impl ScanPipeline {
    pub fn new(pinger: Arc<dyn Pinger>, fetcher: Arc<dyn HeaderFetcher>, cfg: &Config) -> Self {
        Self {
            pinger,
            fetcher,
            timeout: cfg.timeout,
            concurrency: cfg.concurrency.max(1),
            server_filter: cfg.server_filter.clone(),
        }
    }

    pub async fn run_specs(&self, specs: &[AddressRangeSpec]) -> ScanReport {
        self.run(&target::expand(specs)).await
    }

    pub async fn run(&self, candidates: &AddressSet) -> ScanReport {
        debug!("{} addresses will be polled...", candidates.len());
        let outcome = scanner::probe(candidates, self.timeout, self.concurrency, self.pinger.clone()).await;

        debug!("{} hosts available for check...", outcome.reachable.len());
        let headers = self.fetch_headers(&outcome.reachable).await;

        let responded: usize = headers.iter().filter(|(_, result)| result.is_ok()).count();
        let servers: Vec<(Ipv4Addr, String)> = headers
            .iter()
            .filter_map(|(addr, result)| {
                let server = result.as_ref().ok()?.server()?;
                self.server_filter
                    .matches(server)
                    .then(|| (*addr, server.to_string()))
            })
            .collect();

        ScanReport {
            total: candidates.len(),
            reachable: outcome.reachable.len(),
            responded,
            servers,
            probes: outcome.results,
            headers,
        }
    }

    async fn fetch_headers(&self, reachable: &AddressSet) -> Vec<(Ipv4Addr, HeaderResult)> {
        let slots = pool::run_bounded(reachable, self.concurrency, |addr| {
            let fetcher = self.fetcher.clone();
            async move { fetcher.fetch(addr).await }
        })
        .await;

        reachable
            .iter()
            .zip(slots)
            .map(|(addr, slot)| {
                let result = slot.unwrap_or_else(|| {
                    Err(HeaderError::Transport(TransportFailure::Io("header task aborted".into())))
                });
                (addr, result)
            })
            .collect()
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
