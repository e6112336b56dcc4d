//! Host reachability sweep.
//!
//! Every candidate gets one liveness check through a [`Pinger`]; the checks
//! run on the bounded pool in [`crate::pool`] and each one is cut off by its
//! own timeout. The sweep returns once every admitted probe has finished.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use srvsearch_common::network::range::AddressSet;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

use crate::pool;

mod icmp;

pub use icmp::IcmpPinger;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// The probe hit its deadline or its task was torn down.
    #[error("cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
    /// An answer came back, but not a positive one.
    #[error("non-success status: {0}")]
    NonSuccessStatus(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub addr: Ipv4Addr,
    pub reachable: bool,
    pub rtt: Option<Duration>,
    pub failure: Option<ProbeFailure>,
}

impl ProbeResult {
    pub fn reachable(addr: Ipv4Addr, rtt: Duration) -> Self {
        Self {
            addr,
            reachable: true,
            rtt: Some(rtt),
            failure: None,
        }
    }

    pub fn unreachable(addr: Ipv4Addr, failure: ProbeFailure) -> Self {
        Self {
            addr,
            reachable: false,
            rtt: None,
            failure: Some(failure),
        }
    }
}

/// A single-shot liveness check.
#[async_trait]
pub trait Pinger: Send + Sync {
    /// Returns the round-trip time when `addr` answered within `timeout`.
    async fn ping(&self, addr: Ipv4Addr, timeout: Duration) -> Result<Duration, ProbeFailure>;
}

#[derive(Debug, Clone, Default)]
pub struct ProbeOutcome {
    /// Hosts that answered, in candidate order.
    pub reachable: AddressSet,
    /// One entry per candidate, in candidate order.
    pub results: Vec<ProbeResult>,
}

/// Probes every address with at most `concurrency_limit` checks in flight.
pub async fn probe(
    addresses: &AddressSet,
    probe_timeout: Duration,
    concurrency_limit: usize,
    pinger: Arc<dyn Pinger>,
) -> ProbeOutcome {
    let slots = pool::run_bounded(addresses, concurrency_limit, |addr| {
        let pinger = pinger.clone();
        async move { probe_one(pinger.as_ref(), addr, probe_timeout).await }
    })
    .await;

    let results: Vec<ProbeResult> = addresses
        .iter()
        .zip(slots)
        .map(|(addr, slot)| {
            slot.unwrap_or_else(|| ProbeResult::unreachable(addr, ProbeFailure::Cancelled))
        })
        .collect();

    let reachable: AddressSet = results
        .iter()
        .filter(|result| result.reachable)
        .map(|result| result.addr)
        .collect();

    ProbeOutcome { reachable, results }
}

async fn probe_one(pinger: &dyn Pinger, addr: Ipv4Addr, probe_timeout: Duration) -> ProbeResult {
    match timeout(probe_timeout, pinger.ping(addr, probe_timeout)).await {
        Ok(Ok(rtt)) => {
            debug!("Ping succeeded on {addr}, time: {} ms", rtt.as_millis());
            ProbeResult::reachable(addr, rtt)
        }
        Ok(Err(failure)) => {
            debug!("Ping failed on {addr}: {failure}");
            ProbeResult::unreachable(addr, failure)
        }
        Err(_elapsed) => {
            debug!("Ping timed out on {addr}");
            ProbeResult::unreachable(addr, ProbeFailure::Cancelled)
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
