//! Incremental response-head parser.
//!
//! Bytes are pushed in as they arrive from the socket, in whatever chunk
//! sizes the transport produces. Only the current line is buffered; once the
//! blank line after the headers is seen the parser stops and reports how many
//! bytes of the last chunk it used, so body bytes are never looked at.

use tracing::trace;

use super::error::{HeaderError, TransportFailure};
use super::framing::{ByteAction, Framing};
use super::headers::HeaderMap;
use super::start_line::StartLine;
use super::{HeaderResult, ResponseHead};

pub const DEFAULT_MAX_LINE_LEN: usize = 8 * 1024;
pub const DEFAULT_MAX_HEAD_LEN: usize = 64 * 1024;

const INITIAL_LINE_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    /// Longest single line (start line or header field, folds included).
    pub max_line_len: usize,
    /// Longest whole head, start line through the blank line.
    pub max_head_len: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_head_len: DEFAULT_MAX_HEAD_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    AccumulatingLine,
    LineComplete,
    HeadersDone,
    Error(HeaderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NeedMore,
    /// The head is complete; `consumed` bytes of the last chunk belonged to it.
    Done { consumed: usize },
}

#[derive(Debug)]
pub struct HeaderParser {
    limits: ParserLimits,
    framing: Framing,
    line: Vec<u8>,
    colon: Option<usize>,
    start_line: Option<StartLine>,
    headers: HeaderMap,
    state: ParserState,
    received: usize,
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderParser {
    pub fn new() -> Self {
        Self::with_limits(ParserLimits::default())
    }

    pub fn with_limits(limits: ParserLimits) -> Self {
        Self {
            limits,
            framing: Framing::default(),
            line: Vec::with_capacity(INITIAL_LINE_CAPACITY),
            colon: None,
            start_line: None,
            headers: HeaderMap::new(),
            state: ParserState::AccumulatingLine,
            received: 0,
        }
    }

    /// Parses a complete buffer in one go.
    pub fn parse(bytes: &[u8]) -> HeaderResult {
        let mut parser = HeaderParser::new();
        parser.feed(bytes)?;
        parser.finish()
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Whether any byte of the response has been seen yet.
    pub fn has_received_data(&self) -> bool {
        self.received > 0
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Result<Progress, HeaderError> {
        match &self.state {
            ParserState::HeadersDone => return Ok(Progress::Done { consumed: 0 }),
            ParserState::Error(e) => return Err(e.clone()),
            ParserState::AccumulatingLine | ParserState::LineComplete => {}
        }

        for (idx, &byte) in bytes.iter().enumerate() {
            self.received += 1;
            let stepped = if self.received > self.limits.max_head_len {
                Err(HeaderError::FieldTooLarge {
                    limit: self.limits.max_head_len,
                })
            } else {
                self.step(byte)
            };
            if let Err(e) = stepped {
                self.state = ParserState::Error(e.clone());
                return Err(e);
            }
            if self.state == ParserState::HeadersDone {
                return Ok(Progress::Done { consumed: idx + 1 });
            }
        }

        Ok(Progress::NeedMore)
    }

    /// Consumes the parser. Anything short of a finished head is reported as
    /// the stream having closed early.
    pub fn finish(self) -> HeaderResult {
        match self.state {
            ParserState::HeadersDone => match self.start_line {
                Some(start_line) => Ok(ResponseHead {
                    start_line,
                    headers: self.headers,
                }),
                None => Err(HeaderError::malformed("missing start line")),
            },
            ParserState::Error(e) => Err(e),
            ParserState::AccumulatingLine | ParserState::LineComplete => {
                if self.received > 0 {
                    Err(HeaderError::IncompleteResponse(TransportFailure::Closed))
                } else {
                    Err(HeaderError::Transport(TransportFailure::Closed))
                }
            }
        }
    }

    fn step(&mut self, byte: u8) -> Result<(), HeaderError> {
        let transition = self.framing.step(byte);
        if transition.completes_line {
            self.complete_line()?;
        }
        self.framing = transition.next;

        match transition.action {
            ByteAction::Store(b) => self.store(b),
            ByteAction::Discard => Ok(()),
            ByteAction::LineFeed if self.line.is_empty() => {
                if self.start_line.is_none() {
                    return Err(HeaderError::malformed("missing start line"));
                }
                self.state = ParserState::HeadersDone;
                Ok(())
            }
            ByteAction::LineFeed => Ok(()),
            ByteAction::Reject => Err(HeaderError::malformed(format!(
                "control byte 0x{byte:02x} in response head"
            ))),
        }
    }

    fn store(&mut self, byte: u8) -> Result<(), HeaderError> {
        if self.line.len() >= self.limits.max_line_len {
            return Err(HeaderError::FieldTooLarge {
                limit: self.limits.max_line_len,
            });
        }
        if byte == b':' && self.colon.is_none() {
            self.colon = Some(self.line.len());
        }
        self.line.push(byte);
        self.state = ParserState::AccumulatingLine;
        Ok(())
    }

    fn complete_line(&mut self) -> Result<(), HeaderError> {
        let mut raw: Vec<u8> = std::mem::take(&mut self.line);
        let colon: Option<usize> = self.colon.take();
        trace!(line = %String::from_utf8_lossy(&raw), "response head line");

        if self.start_line.is_none() {
            let start_line = StartLine::parse(&String::from_utf8_lossy(&raw))?;
            self.start_line = Some(start_line);
        } else {
            self.add_header(&raw, colon)?;
        }

        // Hand the allocation back for the next line.
        raw.clear();
        self.line = raw;
        self.state = ParserState::LineComplete;
        Ok(())
    }

    fn add_header(&mut self, raw: &[u8], colon: Option<usize>) -> Result<(), HeaderError> {
        let Some(colon) = colon else {
            return Err(HeaderError::malformed(format!(
                "header line without colon: '{}'",
                String::from_utf8_lossy(raw)
            )));
        };

        let name = String::from_utf8_lossy(&raw[..colon]);
        let value = String::from_utf8_lossy(&raw[colon + 1..]);
        let name = name.trim();
        if name.is_empty() {
            return Err(HeaderError::malformed("header line with empty name"));
        }

        self.headers.append(name, value.trim());
        Ok(())
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
