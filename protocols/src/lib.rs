//! Wire-level protocol pieces used by the scanner.
//!
//! Everything here is pure: no sockets, no clocks. The callers in
//! `srvsearch-core` own the I/O and feed bytes in.

pub mod http;
