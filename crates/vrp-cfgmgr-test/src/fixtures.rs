//! Test fixtures for common reconciler patterns
//!
//! Builders take plain strings and numbers and panic on malformed input, so
//! test tables stay short.

use vrp_types::{InterfaceName, VlanId, VlanList};

/// Parse an interface name
pub fn name(s: &str) -> InterfaceName {
    InterfaceName::new(s).unwrap_or_else(|e| panic!("bad fixture name {:?}: {}", s, e))
}

/// Build a VLAN ID
pub fn vlan(id: u16) -> VlanId {
    VlanId::new(id).unwrap_or_else(|e| panic!("bad fixture vlan {}: {}", id, e))
}

/// Parse a VLAN list such as `"10,20-30"`
pub fn vlans(s: &str) -> VlanList {
    s.parse()
        .unwrap_or_else(|e| panic!("bad fixture vlan list {:?}: {}", s, e))
}

/// Common switchport record fixtures
pub mod port_fixtures {
    use super::*;
    use vrp_l2intfmgr::{L2Interface, TaggedConfig};

    /// Port with no switchport mode
    pub fn unconfigured(port: &str) -> L2Interface {
        L2Interface::new(name(port))
    }

    /// Access port
    pub fn access(port: &str, vlan_id: u16) -> L2Interface {
        L2Interface::access(name(port), vlan(vlan_id))
    }

    /// Trunk port; `allowed` uses the `"10,20-30"` form
    pub fn trunk(port: &str, native: Option<u16>, allowed: Option<&str>) -> L2Interface {
        L2Interface::trunk(
            name(port),
            TaggedConfig::new(native.map(vlan), allowed.map(vlans)),
        )
    }

    /// Hybrid port; `tagged` uses the `"10,20-30"` form
    pub fn hybrid(port: &str, native: Option<u16>, tagged: Option<&str>) -> L2Interface {
        L2Interface::hybrid(
            name(port),
            TaggedConfig::new(native.map(vlan), tagged.map(vlans)),
        )
    }
}

/// Common Eth-Trunk record fixtures
pub mod lag_fixtures {
    use super::*;
    use vrp_lagmgr::{LagInterface, LagMember, LagMode};

    /// Member without a declared mode
    pub fn member(port: &str) -> LagMember {
        LagMember::new(name(port), None)
    }

    /// Member with a mode
    pub fn member_with_mode(port: &str, mode: LagMode) -> LagMember {
        LagMember::new(name(port), Some(mode))
    }

    /// Eth-Trunk with the given members
    pub fn lag(trunk: &str, members: Vec<LagMember>) -> LagInterface {
        LagInterface::new(name(trunk), members)
            .unwrap_or_else(|e| panic!("bad fixture lag {:?}: {}", trunk, e))
    }

    /// Eth-Trunk whose members all run `mode`
    pub fn lag_with_mode(trunk: &str, mode: LagMode, ports: &[&str]) -> LagInterface {
        lag(
            trunk,
            ports.iter().map(|p| member_with_mode(p, mode)).collect(),
        )
    }
}
