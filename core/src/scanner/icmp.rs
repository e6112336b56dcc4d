use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError};

use super::{Pinger, ProbeFailure};

const PAYLOAD: [u8; 56] = [0; 56];

/// ICMP echo over a shared raw (or datagram) socket.
///
/// Opening the socket needs elevated privileges on most systems, so
/// construction can fail; callers fall back to a connect-based check.
pub struct IcmpPinger {
    client: Client,
}

impl IcmpPinger {
    pub fn new() -> anyhow::Result<Self> {
        let client: Client = Client::new(&Config::default()).context("cannot open ICMP socket")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Pinger for IcmpPinger {
    async fn ping(&self, addr: Ipv4Addr, timeout: Duration) -> Result<Duration, ProbeFailure> {
        let ident = PingIdentifier(rand::random());
        let mut pinger = self.client.pinger(IpAddr::V4(addr), ident).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_packet, rtt)) => Ok(rtt),
            Err(SurgeError::Timeout { .. }) => Err(ProbeFailure::NonSuccessStatus("no echo reply".into())),
            Err(e) => Err(classify(e)),
        }
    }
}

fn classify(error: SurgeError) -> ProbeFailure {
    match error {
        SurgeError::IOError(e) => ProbeFailure::Transport(e.to_string()),
        other => ProbeFailure::NonSuccessStatus(other.to_string()),
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
