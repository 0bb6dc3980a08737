//! Verification helpers for reconciler output
//!
//! Provides structural checks on command lists and a converge-then-rerun
//! helper built on [`SimulatedDevice`].

use thiserror::Error;

use vrp_cfgmgr_common::{CfgMgrError, Reconciler, State, EXIT_CMD, INTERFACE_CMD};

use crate::device::{DeviceFacts, SimulatedDevice, SimulationError};

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Reconcile failed: {0}")]
    Reconcile(#[from] CfgMgrError),

    #[error("Device rejected commands: {0}")]
    Device(#[from] SimulationError),

    #[error("Command '{command}' at position {position} is outside an interface view")]
    OutsideView { command: String, position: usize },

    #[error("View for {interface} opened at position {position} is empty")]
    EmptyView { interface: String, position: usize },

    #[error("View for {interface} opened at position {position} is not closed")]
    UnclosedView { interface: String, position: usize },

    #[error("Not converged after {state}: second run produced {commands:?}")]
    NotConverged { state: State, commands: Vec<String> },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// One `interface` ... `quit` block of a command list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBlock {
    /// Interface named by the view command
    pub interface: String,
    /// Commands between the view command and `quit`
    pub body: Vec<String>,
}

/// Splits a command list into interface blocks, checking the framing
///
/// Every block must open with `interface <name>`, hold at least one
/// command and close with `quit`.
pub fn split_blocks(commands: &[String]) -> VerifyResult<Vec<CommandBlock>> {
    let mut blocks = Vec::new();
    let mut current: Option<(usize, CommandBlock)> = None;
    let view_prefix = format!("{} ", INTERFACE_CMD);

    for (position, command) in commands.iter().enumerate() {
        if let Some(name) = command.strip_prefix(&view_prefix) {
            if let Some((opened, block)) = current.take() {
                return Err(VerificationError::UnclosedView {
                    interface: block.interface,
                    position: opened,
                });
            }
            current = Some((
                position,
                CommandBlock {
                    interface: name.to_string(),
                    body: Vec::new(),
                },
            ));
        } else if command == EXIT_CMD {
            match current.take() {
                Some((opened, block)) if block.body.is_empty() => {
                    return Err(VerificationError::EmptyView {
                        interface: block.interface,
                        position: opened,
                    })
                }
                Some((_, block)) => blocks.push(block),
                None => {
                    return Err(VerificationError::OutsideView {
                        command: command.clone(),
                        position,
                    })
                }
            }
        } else {
            match current.as_mut() {
                Some((_, block)) => block.body.push(command.clone()),
                None => {
                    return Err(VerificationError::OutsideView {
                        command: command.clone(),
                        position,
                    })
                }
            }
        }
    }

    match current {
        Some((opened, block)) => Err(VerificationError::UnclosedView {
            interface: block.interface,
            position: opened,
        }),
        None => Ok(blocks),
    }
}

/// Outcome of [`converge`]
#[derive(Debug, Clone)]
pub struct Convergence<R> {
    /// Commands of the first run
    pub commands: Vec<String>,
    /// Device facts after applying them
    pub facts: Vec<R>,
}

/// Reconciles `have` towards `want`, applies the result to a device
/// loaded with `have` and checks that a second run produces nothing
pub fn converge<M>(
    mgr: &M,
    state: State,
    want: &[M::Record],
    have: &[M::Record],
) -> VerifyResult<Convergence<M::Record>>
where
    M: Reconciler,
    M::Record: DeviceFacts,
{
    let commands = mgr.reconcile(state, want, have)?;
    split_blocks(&commands)?;

    let mut device = SimulatedDevice::with_facts(have);
    device.apply(&commands)?;
    let facts = device.facts::<M::Record>();

    let rerun = mgr.reconcile(state, want, &facts)?;
    if !rerun.is_empty() {
        return Err(VerificationError::NotConverged {
            state,
            commands: rerun,
        });
    }

    Ok(Convergence { commands, facts })
}
