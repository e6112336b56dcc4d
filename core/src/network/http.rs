//! Banner grab over a real socket: one request out, response head parsed as
//! it streams back in. The connection is dropped as soon as the head is done.
//!
//! One deadline covers the whole attempt: connect, write and every read.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use srvsearch_protocols::http::{
    HeaderError, HeaderParser, HeaderResult, ParserLimits, Progress, TransportFailure, get_request,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

const READ_CHUNK: usize = 1024;

#[async_trait]
pub trait HeaderFetcher: Send + Sync {
    async fn fetch(&self, addr: Ipv4Addr) -> HeaderResult;
}

#[derive(Debug, Clone)]
pub struct HttpHeaderReader {
    port: u16,
    timeout: Duration,
    limits: ParserLimits,
}

impl HttpHeaderReader {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self::with_limits(port, timeout, ParserLimits::default())
    }

    pub fn with_limits(port: u16, timeout: Duration, limits: ParserLimits) -> Self {
        Self { port, timeout, limits }
    }

    pub async fn read(&self, addr: Ipv4Addr) -> HeaderResult {
        let deadline: Instant = Instant::now() + self.timeout;
        let socket_addr = SocketAddr::from((addr, self.port));
        let stream: TcpStream = match timeout_at(deadline, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(HeaderError::Transport(connect_failure(&e))),
            Err(_elapsed) => return Err(HeaderError::Transport(TransportFailure::ConnectTimeout)),
        };

        read_headers_until(stream, &addr.to_string(), deadline, self.limits).await
    }
}

#[async_trait]
impl HeaderFetcher for HttpHeaderReader {
    async fn fetch(&self, addr: Ipv4Addr) -> HeaderResult {
        let result = self.read(addr).await;
        match &result {
            Ok(head) => {
                debug!("{addr}: {}", head.start_line);
                for (name, value) in head.headers.iter() {
                    debug!("{addr}: {name}: {value}");
                }
            }
            Err(e) => debug!("{addr}: {} ({e})", e.kind()),
        }
        result
    }
}

/// Sends `GET /` for `host` over `stream` and parses the response head.
///
/// The exchange as a whole must finish within `io_timeout`. The stream is
/// consumed and closed on return, whatever the outcome.
pub async fn read_headers<S>(stream: S, host: &str, io_timeout: Duration, limits: ParserLimits) -> HeaderResult
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    read_headers_until(stream, host, Instant::now() + io_timeout, limits).await
}

/// Like [`read_headers`], against an absolute `deadline` already running.
pub async fn read_headers_until<S>(mut stream: S, host: &str, deadline: Instant, limits: ParserLimits) -> HeaderResult
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = get_request(host);
    match timeout_at(deadline, stream.write_all(&request)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(HeaderError::Transport(TransportFailure::Send(e.to_string()))),
        Err(_elapsed) => return Err(HeaderError::Transport(TransportFailure::Send("write timed out".into()))),
    }

    let mut parser = HeaderParser::with_limits(limits);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let read = match timeout_at(deadline, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => return parser.finish(),
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(interrupted(&parser, TransportFailure::Io(e.to_string()))),
            Err(_elapsed) => return Err(interrupted(&parser, TransportFailure::ReadTimeout)),
        };

        if let Progress::Done { .. } = parser.feed(&chunk[..read])? {
            return parser.finish();
        }
    }
}

fn interrupted(parser: &HeaderParser, failure: TransportFailure) -> HeaderError {
    if parser.has_received_data() {
        HeaderError::IncompleteResponse(failure)
    } else {
        HeaderError::Transport(failure)
    }
}

fn connect_failure(e: &io::Error) -> TransportFailure {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => TransportFailure::ConnectRefused,
        io::ErrorKind::TimedOut => TransportFailure::ConnectTimeout,
        _ => TransportFailure::Io(e.to_string()),
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
