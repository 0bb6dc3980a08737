//! vrp-lagmgr - Eth-Trunk membership reconciler for VRP switches
//!
//! Computes the VRP CLI commands that bring Eth-Trunk member ports and
//! working modes to a declared state.

mod commands;
mod diff;
mod lag_mgr;
mod types;

pub use commands::*;
pub use diff::{member_changes, member_removals, LagRemoval};
pub use lag_mgr::LagMgr;
pub use types::*;
