//! # IPv4 Range Model
//!
//! Contiguous address ranges and the deduplicated [`AddressSet`] the
//! scanner works on. Addresses are kept as host-order `u32` values so range
//! arithmetic stays trivial; dotted form only appears at the edges.

use std::collections::HashSet;
use std::net::Ipv4Addr;

/// An inclusive range of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    /// Yields every address of the range as a host-order integer.
    ///
    /// A range whose start lies past its end is empty.
    pub fn raw_iter(&self) -> impl DoubleEndedIterator<Item = u32> + Clone + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        start..=end
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone + use<> {
        self.raw_iter().map(Ipv4Addr::from)
    }

    pub fn len(&self) -> u64 {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if start > end {
            0
        } else {
            u64::from(end - start) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the netmask for `prefix` leading one-bits.
pub fn prefix_mask(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p if p >= 32 => u32::MAX,
        p => u32::MAX << (32 - p),
    }
}

/// Computes the whole block (network through broadcast) that `ip/prefix` lives in.
pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    if prefix > 32 {
        anyhow::bail!("Invalid prefix: {prefix} > 32");
    }
    let mask: u32 = prefix_mask(prefix);
    let network: u32 = u32::from(ip) & mask;
    let broadcast: u32 = network | !mask;
    Ok(Ipv4Range::new(
        Ipv4Addr::from(network),
        Ipv4Addr::from(broadcast),
    ))
}

/// Insertion-ordered, duplicate-free set of IPv4 addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSet {
    order: Vec<u32>,
    seen: HashSet<u32>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a host-order address. Returns `false` if it was already present.
    pub fn insert_raw(&mut self, addr: u32) -> bool {
        if !self.seen.insert(addr) {
            return false;
        }
        self.order.push(addr);
        true
    }

    pub fn insert(&mut self, addr: Ipv4Addr) -> bool {
        self.insert_raw(addr.into())
    }

    pub fn add_range(&mut self, range: Ipv4Range) {
        for addr in range.raw_iter() {
            self.insert_raw(addr);
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.seen.contains(&u32::from(addr))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Ipv4Addr> + '_ {
        self.order.iter().map(|&addr| Ipv4Addr::from(addr))
    }
}

impl Extend<Ipv4Addr> for AddressSet {
    fn extend<T: IntoIterator<Item = Ipv4Addr>>(&mut self, iter: T) {
        for addr in iter {
            self.insert(addr);
        }
    }
}

impl FromIterator<Ipv4Addr> for AddressSet {
    fn from_iter<T: IntoIterator<Item = Ipv4Addr>>(iter: T) -> Self {
        let mut set = AddressSet::new();
        set.extend(iter);
        set
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
