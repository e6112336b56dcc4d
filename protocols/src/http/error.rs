use std::fmt;

use thiserror::Error;

/// Why a header read against a host failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The peer sent bytes that are not an HTTP/1.x response head.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Some of the head arrived, then the stream failed before the blank line.
    #[error("incomplete response: {0}")]
    IncompleteResponse(TransportFailure),
    /// A line, or the head as a whole, grew past its configured ceiling.
    #[error("field too large: exceeds {limit} bytes")]
    FieldTooLarge { limit: usize },
    /// Nothing usable was received.
    #[error("transport error: {0}")]
    Transport(TransportFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("connection timed out")]
    ConnectTimeout,
    #[error("connection refused")]
    ConnectRefused,
    #[error("send failed: {0}")]
    Send(String),
    #[error("read timed out")]
    ReadTimeout,
    #[error("connection closed by peer")]
    Closed,
    #[error("{0}")]
    Io(String),
}

/// Flat classification of [`HeaderError`], used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedResponse,
    IncompleteResponse,
    FieldTooLarge,
    TransportError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedResponse => "malformed-response",
            ErrorKind::IncompleteResponse => "incomplete-response",
            ErrorKind::FieldTooLarge => "field-too-large",
            ErrorKind::TransportError => "transport-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HeaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HeaderError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            HeaderError::IncompleteResponse(_) => ErrorKind::IncompleteResponse,
            HeaderError::FieldTooLarge { .. } => ErrorKind::FieldTooLarge,
            HeaderError::Transport(_) => ErrorKind::TransportError,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        HeaderError::MalformedResponse(reason.into())
    }
}
