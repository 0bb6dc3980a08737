//! Test infrastructure for VRP interface reconcilers
//!
//! Provides:
//! - Record fixtures for switchport and Eth-Trunk tests
//! - A simulated device that replays generated commands
//! - Command list framing checks and a convergence helper

pub mod device;
pub mod fixtures;
mod verification;

pub use device::{DeviceFacts, SimResult, SimulatedDevice, SimulationError};
pub use fixtures::*;
pub use verification::*;
