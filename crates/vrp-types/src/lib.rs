//! Common types for VRP switch interface configuration.
//!
//! This crate provides type-safe representations of the values that appear in
//! interface resource records and in the CLI commands generated from them:
//!
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers
//! - [`VlanRange`]: a single `allow-pass`/`tagged` token (`"15"` or `"10-20"`)
//! - [`VlanList`]: an order-insensitive list of VLAN range tokens
//! - [`InterfaceName`]: normalized interface names used as record join keys

mod intf;
mod vlan;

pub use intf::InterfaceName;
pub use vlan::{VlanId, VlanList, VlanRange};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),

    #[error("invalid VLAN range token: {0}")]
    InvalidVlanRange(String),

    #[error("invalid interface name: {0:?}")]
    InvalidInterfaceName(String),
}
