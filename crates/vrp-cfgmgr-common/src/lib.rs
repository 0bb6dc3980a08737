//! Common infrastructure for VRP interface resource reconcilers.
//!
//! This crate provides shared functionality for the per-resource managers
//! (`vrp-l2intfmgr`, `vrp-lagmgr`):
//!
//! - [`CommandList`]: interface-view aware command accumulator
//! - [`Reconciler`]: base trait with the shared intent dispatch
//! - [`FactsProvider`] / [`CommandSink`]: the two external collaborators
//! - [`ReconcileConfig`]: TOML settings
//! - [`error`]: Error types for reconcile operations
//!
//! # Architecture
//!
//! Reconcilers follow this pattern:
//!
//! 1. Take the desired records ("want") and the observed records ("have")
//! 2. Match them by normalized interface name
//! 3. Diff each pair field by field into typed changes
//! 4. Render the changes into VRP CLI commands inside interface views
//!
//! The result is a plain command list; delivering it is left to a
//! [`CommandSink`], which [`execute`] skips in check mode.

pub mod commands;
pub mod config;
pub mod error;
pub mod facts;
pub mod manager;
pub mod sink;

// Re-export commonly used items at crate root
pub use commands::{CommandList, EXIT_CMD, INTERFACE_CMD, UNDO_PREFIX};
pub use config::{CommandsConfig, ReconcileConfig, ValidationConfig, VlanRangeCheck};
pub use error::{CfgMgrError, CfgMgrResult};
pub use facts::{load_records, read_document, FactsProvider, FileFacts};
pub use manager::{find_by_name, InterfaceRecord, Reconciler, Resource, State};
pub use sink::{execute, CommandSink, ExecutionResult, FileSink, MemorySink};
