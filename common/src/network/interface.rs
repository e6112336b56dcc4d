//! Local interface enumeration.
//!
//! When the user names no targets, every IPv4 network attached to a usable
//! interface becomes a candidate block.

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::Ipv4Network;
use tracing::{debug, warn};

use crate::network::range::AddressSet;
use crate::network::target::{self, AddressRangeSpec};
use crate::utils::interface::NetworkInterfaceExtension;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// Loopback never leads to another host.
    IsLoopback,
    /// The interface carries no IPv4 network.
    NoIpv4Network,
}

/// Collects candidate addresses from every viable local interface.
pub fn local_candidates() -> anyhow::Result<AddressSet> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    debug!("Identified {} network interface(s)", interfaces.len());

    let candidates: AddressSet = candidates_from(&interfaces);
    if candidates.is_empty() {
        warn!("No polling addresses found.");
    }
    Ok(candidates)
}

/// Expands the IPv4 networks of all viable `interfaces` the same way a
/// CIDR target would be expanded.
pub fn candidates_from(interfaces: &[NetworkInterface]) -> AddressSet {
    let mut specs: Vec<AddressRangeSpec> = Vec::new();

    for interface in interfaces {
        if let Err(reason) = is_scannable(interface) {
            debug!("Skipping interface {}: {reason:?}", interface.name);
            continue;
        }

        for net in interface.get_ipv4_nets() {
            debug!("Using {} on {}", net, interface.name);
            specs.push(network_to_spec(&net));
        }

        for net in interface.get_ipv6_nets() {
            debug!("Skipping IPv6 network {} on {}", net, interface.name);
        }
    }

    target::expand(&specs)
}

fn network_to_spec(net: &Ipv4Network) -> AddressRangeSpec {
    AddressRangeSpec::Cidr {
        base: net.ip(),
        prefix: net.prefix(),
    }
}

fn is_scannable(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.get_ipv4_nets().is_empty() {
        return Err(ViabilityError::NoIpv4Network);
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
