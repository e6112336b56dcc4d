use std::fmt;

use super::error::HeaderError;

/// `HTTP/<major>.<minor> <code> <reason>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartLine {
    pub major: u16,
    pub minor: u16,
    pub status: u16,
    pub reason: String,
    raw: String,
}

impl StartLine {
    /// Validates a response status line. The reason phrase may be empty or
    /// missing entirely; the three-digit code may not.
    pub fn parse(line: &str) -> Result<Self, HeaderError> {
        let invalid = || HeaderError::malformed(format!("invalid start line '{line}'"));

        let rest = line.strip_prefix("HTTP/").ok_or_else(invalid)?;
        let (version, rest) = rest.split_once(' ').ok_or_else(invalid)?;
        let (major, minor) = version.split_once('.').ok_or_else(invalid)?;
        let major = parse_number(major).ok_or_else(invalid)?;
        let minor = parse_number(minor).ok_or_else(invalid)?;

        let (code, reason) = rest.split_once(' ').unwrap_or((rest, ""));
        if code.len() != 3 {
            return Err(invalid());
        }
        let status = parse_number(code).ok_or_else(invalid)?;
        if reason.bytes().any(|b| b < 0x20 || b == 0x7F) {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            status,
            reason: reason.to_string(),
            raw: line.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for StartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_number(digits: &str) -> Option<u16> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
