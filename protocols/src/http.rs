//! Minimal HTTP/1.1 client side: one `GET /` request out, the response head
//! parsed byte by byte on the way back in. The body is never read.

mod error;
mod framing;
mod headers;
mod parser;
mod request;
mod start_line;

pub use error::{ErrorKind, HeaderError, TransportFailure};
pub use framing::{ByteAction, ByteClass, Framing, Transition};
pub use headers::HeaderMap;
pub use parser::{HeaderParser, ParserLimits, ParserState, Progress};
pub use request::get_request;
pub use start_line::StartLine;

/// The parsed head of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub start_line: StartLine,
    pub headers: HeaderMap,
}

impl ResponseHead {
    pub fn server(&self) -> Option<&str> {
        self.headers.get("Server")
    }
}

/// Outcome of a single header read against one host.
pub type HeaderResult = Result<ResponseHead, HeaderError>;
