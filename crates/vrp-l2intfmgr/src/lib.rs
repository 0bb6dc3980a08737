//! vrp-l2intfmgr - switchport reconciler for VRP switches
//!
//! Computes the VRP CLI commands that move the access/trunk/hybrid settings
//! of a set of interfaces from their current state to a declared state.

mod commands;
mod diff;
mod l2intf_mgr;
mod types;

pub use commands::*;
pub use diff::{filter_omitted, removals, set_changes, L2Change, L2Removal};
pub use l2intf_mgr::L2IntfMgr;
pub use types::*;
