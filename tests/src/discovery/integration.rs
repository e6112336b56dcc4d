use std::collections::{HashMap, HashSet};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use srvsearch_common::config::{Config, ServerFilter};
use srvsearch_common::network::target::{self, AddressRangeSpec};
use srvsearch_core::discovery::ScanPipeline;
use srvsearch_core::network::http::{HeaderFetcher, HttpHeaderReader, read_headers};
use srvsearch_core::network::tcp::HandshakePinger;
use srvsearch_core::scanner::{Pinger, ProbeFailure};
use srvsearch_protocols::http::{HeaderError, HeaderResult, ParserLimits, TransportFailure};
use tokio::net::TcpStream;

use crate::support::{AfterWrite, canned_server, closed_port};

const TIMEOUT: Duration = Duration::from_millis(500);

/// Answers for a fixed set of addresses only.
struct FixedPinger(HashSet<Ipv4Addr>);

#[async_trait]
impl Pinger for FixedPinger {
    async fn ping(&self, addr: Ipv4Addr, _timeout: Duration) -> Result<Duration, ProbeFailure> {
        if self.0.contains(&addr) {
            Ok(Duration::from_millis(1))
        } else {
            Err(ProbeFailure::NonSuccessStatus("no echo reply".into()))
        }
    }
}

/// Sends each address's request to a loopback port instead, keeping the
/// original address as the `Host` value.
struct RoutedFetcher(HashMap<Ipv4Addr, u16>);

#[async_trait]
impl HeaderFetcher for RoutedFetcher {
    async fn fetch(&self, addr: Ipv4Addr) -> HeaderResult {
        let Some(&port) = self.0.get(&addr) else {
            return Err(HeaderError::Transport(TransportFailure::ConnectRefused));
        };
        let stream = TcpStream::connect(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
            .await
            .map_err(|e| HeaderError::Transport(TransportFailure::Io(e.to_string())))?;
        read_headers(stream, &addr.to_string(), TIMEOUT, ParserLimits::default()).await
    }
}

fn config(port: u16) -> Config {
    Config {
        timeout: TIMEOUT,
        http_port: port,
        ..Config::default()
    }
}

fn specs(inputs: &[&str]) -> Vec<AddressRangeSpec> {
    inputs.iter().map(|s| s.parse().unwrap()).collect()
}

#[tokio::test]
async fn slash_30_end_to_end() {
    let apache = canned_server(b"HTTP/1.1 200 OK\r\nServer: Apache\r\n\r\n", 64, AfterWrite::Close).await;
    let silent = closed_port().await;

    let host_1 = Ipv4Addr::new(192, 168, 1, 1);
    let host_2 = Ipv4Addr::new(192, 168, 1, 2);
    let pipeline = ScanPipeline::new(
        Arc::new(FixedPinger(HashSet::from([host_1, host_2]))),
        Arc::new(RoutedFetcher(HashMap::from([(host_1, apache), (host_2, silent)]))),
        &config(80),
    );

    let candidates = target::parse_and_expand(&["192.168.1.0/30"]).unwrap();
    let expanded: Vec<Ipv4Addr> = candidates.iter().collect();
    assert_eq!(expanded, vec![host_1, host_2]);

    let report = pipeline.run(&candidates).await;
    assert_eq!(report.total, 2);
    assert_eq!(report.reachable, 2);
    assert_eq!(report.responded, 1);
    assert_eq!(
        report.server_map(),
        HashMap::from([("192.168.1.1".to_string(), "Apache".to_string())])
    );
}

#[tokio::test]
async fn loopback_with_handshake_pinger_and_real_reader() {
    let port = canned_server(b"HTTP/1.0 200 OK\r\nServer: SimpleHTTP/0.6\r\n\r\n", 64, AfterWrite::Close).await;
    let cfg = config(port);
    let pipeline = ScanPipeline::new(
        Arc::new(HandshakePinger::new(port)),
        Arc::new(HttpHeaderReader::new(port, cfg.timeout)),
        &cfg,
    );

    let report = pipeline.run_specs(&specs(&["127.0.0.1", "127.0.0.1-127.0.0.1"])).await;
    assert_eq!(report.total, 1);
    assert_eq!(report.reachable, 1);
    assert_eq!(report.responded, 1);
    assert_eq!(report.servers, vec![(Ipv4Addr::LOCALHOST, "SimpleHTTP/0.6".to_string())]);
}

#[tokio::test]
async fn mixed_responses_only_well_formed_are_listed() {
    let good = canned_server(b"HTTP/1.1 200 OK\r\nServer: nginx/1.25\r\n\r\n", 64, AfterWrite::Close).await;
    let no_server = canned_server(b"HTTP/1.1 404 Not Found\r\nDate: now\r\n\r\n", 64, AfterWrite::Close).await;
    let garbage = canned_server(b"GARBAGE\r\n\r\n", 64, AfterWrite::Close).await;
    let truncated = canned_server(b"HTTP/1.1 200 OK\r\nServer: ng", 64, AfterWrite::Close).await;

    let hosts: Vec<Ipv4Addr> = (1..=5).map(|last| Ipv4Addr::new(10, 9, 0, last)).collect();
    let routes = HashMap::from([
        (hosts[0], good),
        (hosts[1], no_server),
        (hosts[2], garbage),
        (hosts[3], truncated),
    ]);
    let pipeline = ScanPipeline::new(
        Arc::new(FixedPinger(hosts[..4].iter().copied().collect())),
        Arc::new(RoutedFetcher(routes)),
        &config(80),
    );

    let report = pipeline.run_specs(&specs(&["10.9.0.1+4"])).await;
    assert_eq!(report.total, 5);
    assert_eq!(report.reachable, 4);
    assert_eq!(report.responded, 2);
    assert_eq!(report.servers, vec![(hosts[0], "nginx/1.25".to_string())]);

    let failures: Vec<Option<&HeaderError>> = report
        .headers
        .iter()
        .map(|(_, result)| result.as_ref().err())
        .collect();
    assert!(failures[0].is_none());
    assert!(failures[1].is_none());
    assert!(matches!(failures[2], Some(HeaderError::MalformedResponse(_))));
    assert_eq!(
        failures[3],
        Some(&HeaderError::IncompleteResponse(TransportFailure::Closed))
    );
}

#[tokio::test]
async fn server_filter_applies_to_listing() {
    let apache = canned_server(b"HTTP/1.1 200 OK\r\nServer: Apache/2.4.58\r\n\r\n", 64, AfterWrite::Close).await;
    let nginx = canned_server(b"HTTP/1.1 200 OK\r\nServer: nginx\r\n\r\n", 64, AfterWrite::Close).await;

    let a = Ipv4Addr::new(172, 16, 0, 1);
    let b = Ipv4Addr::new(172, 16, 0, 2);
    let cfg = Config {
        server_filter: ServerFilter::new("APACHE"),
        ..config(80)
    };
    let pipeline = ScanPipeline::new(
        Arc::new(FixedPinger(HashSet::from([a, b]))),
        Arc::new(RoutedFetcher(HashMap::from([(a, apache), (b, nginx)]))),
        &cfg,
    );

    let report = pipeline.run_specs(&specs(&["172.16.0.1-172.16.0.2"])).await;
    assert_eq!(report.responded, 2);
    assert_eq!(report.servers, vec![(a, "Apache/2.4.58".to_string())]);
}

#[test]
fn malformed_range_aborts_before_any_probe() {
    let result = target::parse_and_expand(&["10.0.0.1", "10.0.0.1/33"]);
    assert!(result.is_err());
}
