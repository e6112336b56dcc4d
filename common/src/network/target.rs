//! # Address Range Expressions
//!
//! Parses the textual targets a user can hand to the scanner and expands
//! them into a concrete [`AddressSet`].
//!
//! Supported forms:
//! * A single IPv4 address (`192.168.1.5`).
//! * A closed range (`192.168.1.1-192.168.1.50`, or abbreviated `192.168.1.1-50`).
//! * A count (`192.168.1.1+10`, the base plus the next ten addresses).
//! * A CIDR block (`192.168.1.0/24`), without network and broadcast.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

use crate::network::range::{self, AddressSet, Ipv4Range};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeParseError {
    #[error("malformed range '{input}': {reason}")]
    MalformedRange { input: String, reason: String },
}

impl RangeParseError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        RangeParseError::MalformedRange {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A single parsed range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRangeSpec {
    Single { addr: Ipv4Addr },
    Range { base: Ipv4Addr, end: Ipv4Addr },
    Count { base: Ipv4Addr, amount: u32 },
    Cidr { base: Ipv4Addr, prefix: u8 },
}

impl FromStr for AddressRangeSpec {
    type Err = RangeParseError;

    /// A spec carries at most one qualifier, so the first `-`, `+` or `/`
    /// decides the form and whatever follows must parse for that form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(split_at) = s.find(['-', '+', '/']) else {
            let addr = parse_addr(s, s)?;
            return Ok(AddressRangeSpec::Single { addr });
        };

        let (base_str, rest) = s.split_at(split_at);
        let base: Ipv4Addr = parse_addr(base_str, s)?;
        let qualifier: &str = &rest[1..];

        match &rest[..1] {
            "-" => {
                let end = parse_range_end_addr(qualifier, &base, s)?;
                Ok(AddressRangeSpec::Range { base, end })
            }
            "+" => {
                let amount = parse_digits::<u32>(qualifier)
                    .ok_or_else(|| RangeParseError::malformed(s, format!("invalid amount '{qualifier}'")))?;
                Ok(AddressRangeSpec::Count { base, amount })
            }
            _ => {
                let prefix = parse_digits::<u8>(qualifier)
                    .filter(|prefix| *prefix <= 32)
                    .ok_or_else(|| RangeParseError::malformed(s, format!("invalid prefix '{qualifier}'")))?;
                Ok(AddressRangeSpec::Cidr { base, prefix })
            }
        }
    }
}

impl fmt::Display for AddressRangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressRangeSpec::Single { addr } => write!(f, "{addr}"),
            AddressRangeSpec::Range { base, end } => write!(f, "{base}-{end}"),
            AddressRangeSpec::Count { base, amount } => write!(f, "{base}+{amount}"),
            AddressRangeSpec::Cidr { base, prefix } => write!(f, "{base}/{prefix}"),
        }
    }
}

impl AddressRangeSpec {
    /// The inclusive range this spec covers.
    ///
    /// Only the CIDR form drops the network and broadcast addresses; explicit
    /// ranges and counts are taken literally.
    pub fn to_range(&self) -> Ipv4Range {
        match *self {
            AddressRangeSpec::Single { addr } => Ipv4Range::new(addr, addr),
            AddressRangeSpec::Range { base, end } => Ipv4Range::new(base, end),
            AddressRangeSpec::Count { base, amount } => {
                let end = u32::from(base).saturating_add(amount);
                Ipv4Range::new(base, Ipv4Addr::from(end))
            }
            AddressRangeSpec::Cidr { base, prefix } => {
                let mask: u32 = range::prefix_mask(prefix);
                let mut begin: u32 = u32::from(base) & mask;
                let mut end: u32 = begin | !mask;
                if prefix < 31 {
                    begin += 1;
                    end -= 1;
                }
                Ipv4Range::new(Ipv4Addr::from(begin), Ipv4Addr::from(end))
            }
        }
    }
}

/// Expands a single spec into host-order addresses.
pub fn expand_spec(spec: &AddressRangeSpec) -> impl Iterator<Item = u32> + use<> {
    spec.to_range().raw_iter()
}

/// Merges every spec into one set, first-seen order, no duplicates.
pub fn expand(specs: &[AddressRangeSpec]) -> AddressSet {
    let mut set = AddressSet::new();
    for spec in specs {
        for addr in expand_spec(spec) {
            set.insert_raw(addr);
        }
    }
    set
}

/// Parses and expands raw expressions. The first malformed one fails the
/// whole call and nothing is returned.
pub fn parse_and_expand<S: AsRef<str>>(inputs: &[S]) -> Result<AddressSet, RangeParseError> {
    let specs: Vec<AddressRangeSpec> = inputs
        .iter()
        .map(|input| input.as_ref().parse::<AddressRangeSpec>())
        .collect::<Result<_, _>>()?;
    Ok(expand(&specs))
}

fn parse_addr(s: &str, original_s: &str) -> Result<Ipv4Addr, RangeParseError> {
    s.parse::<Ipv4Addr>()
        .map_err(|e| RangeParseError::malformed(original_s, format!("invalid address '{s}': {e}")))
}

fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<T>().ok()
}

/// Parses the end of a `base-end` range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    original_s: &str,
) -> Result<Ipv4Addr, RangeParseError> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(parse_digits::<u8>)
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| RangeParseError::malformed(original_s, format!("invalid end address '{end_str}'")))?;

    if partial_octets.is_empty() || partial_octets.len() > 4 {
        return Err(RangeParseError::malformed(
            original_s,
            format!("invalid end address '{end_str}'"),
        ));
    }

    let mut end_octets = start_addr.octets();
    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
