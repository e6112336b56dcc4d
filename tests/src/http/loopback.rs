use std::net::Ipv4Addr;
use std::time::Duration;

use srvsearch_core::network::http::HttpHeaderReader;
use srvsearch_protocols::http::{ErrorKind, HeaderError, ParserLimits, TransportFailure};

use crate::support::{AfterWrite, canned_server, closed_port};

const TIMEOUT: Duration = Duration::from_millis(300);
const HOLD: AfterWrite = AfterWrite::Hold(Duration::from_secs(2));

fn reader(port: u16) -> HttpHeaderReader {
    HttpHeaderReader::new(port, TIMEOUT)
}

#[tokio::test]
async fn grabs_server_banner() {
    let port = canned_server(b"HTTP/1.1 200 OK\r\nServer: nginx\r\n\r\n", 64, AfterWrite::Close).await;
    let head = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap();

    assert_eq!(head.start_line.as_str(), "HTTP/1.1 200 OK");
    assert_eq!(head.server(), Some("nginx"));
    assert_eq!(head.headers.len(), 1);
}

#[tokio::test]
async fn head_dribbled_one_byte_per_write() {
    let port = canned_server(
        b"HTTP/1.1 301 Moved Permanently\r\nServer: lighttpd\r\nX-A: 1\r\nx-a: 2\r\n\r\n",
        1,
        AfterWrite::Close,
    )
    .await;
    let head = HttpHeaderReader::new(port, Duration::from_secs(1))
        .read(Ipv4Addr::LOCALHOST)
        .await
        .unwrap();

    assert_eq!(head.start_line.status, 301);
    assert_eq!(head.server(), Some("lighttpd"));
    assert_eq!(head.headers.get("X-A"), Some("1,2"));
}

#[tokio::test]
async fn folded_header_merges_into_previous_value() {
    let port = canned_server(b"HTTP/1.1 200 OK\r\nX-B: one\r\n two\r\n\r\n", 64, AfterWrite::Close).await;
    let head = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap();

    assert_eq!(head.headers.get("x-b"), Some("one two"));
    assert_eq!(head.headers.len(), 1);
}

#[tokio::test]
async fn returns_at_blank_line_while_peer_keeps_socket_open() {
    let port = canned_server(b"HTTP/1.1 200 OK\r\nServer: Apache\r\n\r\n<html>", 64, HOLD).await;
    let head = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap();
    assert_eq!(head.server(), Some("Apache"));
}

#[tokio::test]
async fn garbage_start_line_is_malformed() {
    let port = canned_server(b"GARBAGE\r\n\r\n", 64, AfterWrite::Close).await;
    let err = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn control_byte_is_malformed() {
    let port = canned_server(b"HTTP/1.1 200 OK\r\nServer: a\x01b\r\n\r\n", 64, AfterWrite::Close).await;
    let err = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn header_without_colon_is_malformed() {
    let port = canned_server(b"HTTP/1.1 200 OK\r\nno colon here\r\n\r\n", 64, AfterWrite::Close).await;
    let err = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn peer_closing_mid_head_is_incomplete() {
    let port = canned_server(b"HTTP/1.1 200 OK\r\nServer: Apa", 64, AfterWrite::Close).await;
    let err = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap_err();
    assert_eq!(err, HeaderError::IncompleteResponse(TransportFailure::Closed));
}

#[tokio::test]
async fn stalled_peer_mid_head_is_incomplete() {
    let port = canned_server(b"HTTP/1.1 200 OK\r\n", 64, HOLD).await;
    let err = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap_err();
    assert_eq!(err, HeaderError::IncompleteResponse(TransportFailure::ReadTimeout));
}

#[tokio::test]
async fn silent_peer_is_transport_error() {
    let port = canned_server(b"", 64, HOLD).await;
    let err = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap_err();
    assert_eq!(err, HeaderError::Transport(TransportFailure::ReadTimeout));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let port = closed_port().await;
    let err = reader(port).read(Ipv4Addr::LOCALHOST).await.unwrap_err();
    assert_eq!(err, HeaderError::Transport(TransportFailure::ConnectRefused));
    assert_eq!(err.kind(), ErrorKind::TransportError);
}

#[tokio::test]
async fn oversized_field_is_reported() {
    let port = canned_server(
        b"HTTP/1.1 200 OK\r\nX-Long: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n",
        64,
        AfterWrite::Close,
    )
    .await;
    let limits = ParserLimits {
        max_line_len: 32,
        ..ParserLimits::default()
    };
    let err = HttpHeaderReader::with_limits(port, TIMEOUT, limits)
        .read(Ipv4Addr::LOCALHOST)
        .await
        .unwrap_err();
    assert_eq!(err, HeaderError::FieldTooLarge { limit: 32 });
}
