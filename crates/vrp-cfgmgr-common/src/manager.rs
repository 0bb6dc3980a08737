//! Reconciler trait and common abstractions.
//!
//! Each interface resource (L2 port settings, Eth-Trunk membership) has a
//! manager implementing [`Reconciler`]. The trait's provided
//! [`reconcile`](Reconciler::reconcile) method enforces the parameter rules
//! shared by all resources and dispatches to the per-intent method.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;
use vrp_types::InterfaceName;

use crate::commands::CommandList;
use crate::error::{CfgMgrError, CfgMgrResult};

/// Declarative intent for a reconcile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Add or change what is declared, leave everything else alone.
    Merged,
    /// Make each declared interface match its declaration exactly.
    Replaced,
    /// Replace declared interfaces and reset every other interface.
    Overridden,
    /// Reset the declared interfaces, or all of them if none are declared.
    Deleted,
}

impl State {
    /// Returns the state name as used on the command line and in results.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Merged => "merged",
            State::Replaced => "replaced",
            State::Overridden => "overridden",
            State::Deleted => "deleted",
        }
    }

    /// Returns true if this intent cannot run with an empty desired config.
    pub fn requires_config(&self) -> bool {
        !matches!(self, State::Deleted)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = CfgMgrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merged" => Ok(State::Merged),
            "replaced" => Ok(State::Replaced),
            "overridden" => Ok(State::Overridden),
            "deleted" => Ok(State::Deleted),
            other => Err(CfgMgrError::invalid_config(
                "state",
                format!("unknown state '{}'", other),
            )),
        }
    }
}

/// Network resource handled by a reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Switchport mode and VLAN membership.
    L2Interfaces,
    /// Eth-Trunk membership and working mode.
    LagInterfaces,
}

impl Resource {
    /// Returns the resource key used in facts documents.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::L2Interfaces => "l2_interfaces",
            Resource::LagInterfaces => "lag_interfaces",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A per-interface configuration record.
pub trait InterfaceRecord {
    /// The interface the record describes.
    fn name(&self) -> &InterfaceName;
}

/// Finds the record for `name`, matching by exact normalized name.
pub fn find_by_name<'a, R: InterfaceRecord>(
    records: &'a [R],
    name: &InterfaceName,
) -> Option<&'a R> {
    records.iter().find(|r| r.name() == name)
}

/// Base trait for interface resource reconcilers.
///
/// Implementations only provide the four intent methods; each writes its
/// commands into the [`CommandList`] owned by the enclosing
/// [`reconcile`](Reconciler::reconcile) call.
///
/// # Example
///
/// ```ignore
/// use vrp_cfgmgr_common::{Reconciler, State};
///
/// let commands = mgr.reconcile(State::Replaced, &want, &have)?;
/// if commands.is_empty() {
///     // already converged
/// }
/// ```
pub trait Reconciler {
    /// Record type for this resource.
    type Record: InterfaceRecord;

    /// Returns the resource this reconciler manages.
    fn resource(&self) -> Resource;

    /// Emits additive/changed settings for every matched interface.
    fn merged(
        &self,
        want: &[Self::Record],
        have: &[Self::Record],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()>;

    /// Clears what the declaration leaves out, then sets it, per matched interface.
    fn replaced(
        &self,
        want: &[Self::Record],
        have: &[Self::Record],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()>;

    /// Replaced for matched interfaces, full clear for undeclared ones.
    fn overridden(
        &self,
        want: &[Self::Record],
        have: &[Self::Record],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()>;

    /// Clears the declared interfaces, or every interface when `want` is empty.
    fn deleted(
        &self,
        want: &[Self::Record],
        have: &[Self::Record],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()>;

    /// Computes the commands that move `have` to `want` under `state`.
    ///
    /// Fails with [`CfgMgrError::MissingConfig`] when `state` requires a
    /// desired configuration and `want` is empty. On any error no commands
    /// are returned.
    fn reconcile(
        &self,
        state: State,
        want: &[Self::Record],
        have: &[Self::Record],
    ) -> CfgMgrResult<Vec<String>> {
        if state.requires_config() && want.is_empty() {
            return Err(CfgMgrError::missing_config(state));
        }

        let mut cmds = CommandList::new();
        match state {
            State::Merged => self.merged(want, have, &mut cmds)?,
            State::Replaced => self.replaced(want, have, &mut cmds)?,
            State::Overridden => self.overridden(want, have, &mut cmds)?,
            State::Deleted => self.deleted(want, have, &mut cmds)?,
        }

        let commands = cmds.into_commands();
        info!(
            "{} {}: {} want, {} have, {} commands",
            self.resource(),
            state,
            want.len(),
            have.len(),
            commands.len()
        );
        Ok(commands)
    }
}
