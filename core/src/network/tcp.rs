use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::scanner::{Pinger, ProbeFailure};

/// Liveness via a plain TCP connect.
///
/// A completed handshake and an active refusal both prove a host is there.
/// Used when no ICMP socket can be opened.
pub struct HandshakePinger {
    port: u16,
}

impl HandshakePinger {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl Pinger for HandshakePinger {
    async fn ping(&self, addr: Ipv4Addr, timeout: Duration) -> Result<Duration, ProbeFailure> {
        handshake_probe(SocketAddr::from((addr, self.port)), timeout).await
    }
}

pub async fn handshake_probe(socket_addr: SocketAddr, probe_timeout: Duration) -> Result<Duration, ProbeFailure> {
    let started = Instant::now();
    match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(_stream)) => Ok(started.elapsed()),
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => Ok(started.elapsed()),
        Ok(Err(e)) => Err(ProbeFailure::Transport(e.to_string())),
        Err(_elapsed) => Err(ProbeFailure::Cancelled),
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

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn open_port_counts_as_alive() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let pinger = HandshakePinger::new(port);
        assert!(pinger.ping(Ipv4Addr::LOCALHOST, Duration::from_secs(1)).await.is_ok());
    }

    #[tokio::test]
    async fn refused_port_counts_as_alive() {
        // Grab a free port, then close it again.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let pinger = HandshakePinger::new(port);
        assert!(pinger.ping(Ipv4Addr::LOCALHOST, Duration::from_secs(1)).await.is_ok());
    }

    #[tokio::test]
    #[ignore]
    async fn unroutable_address_times_out() {
        let ip = Ipv4Addr::new(203, 0, 113, 1);
        let probe = HandshakePinger::new(80).ping(ip, Duration::from_millis(100)).await;
        assert_eq!(probe, Err(ProbeFailure::Cancelled));
    }
}
