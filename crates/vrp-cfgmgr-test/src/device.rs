//! Simulated VRP device
//!
//! Replays generated command lists onto an in-memory model of switchport and
//! Eth-Trunk state, then reports the result as facts records. Running a
//! reconciler again against those facts shows whether the first run
//! converged.
//!
//! The model follows what a facts parser would report:
//! - a fresh access port sits in VLAN 1
//! - a fresh trunk or hybrid port reports no PVID and no VLAN list
//! - setting the link type a port already has changes nothing
//! - an Eth-Trunk reports one working mode for all of its members, `on`
//!   unless LACP is enabled (LACP always reads back as `active`)

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

use vrp_cfgmgr_common::{EXIT_CMD, INTERFACE_CMD, UNDO_PREFIX};
use vrp_l2intfmgr::{
    AccessConfig, L2Interface, LinkType, PortMode, TaggedConfig, DEFAULT_VLAN_CMD,
    HYBRID_PVID_CMD, HYBRID_TAGGED_CMD, HYBRID_UNTAGGED_CMD, LEGACY_TRUNK_LINK_TYPE_CMD,
    LINK_TYPE_CMD, TRUNK_ALLOW_PASS_CMD, TRUNK_PVID_CMD,
};
use vrp_lagmgr::{
    LagInterface, LagMember, LagMode, MODE_CMD, MODE_LACP_CMD, MODE_MANUAL_CMD, TRUNKPORT_CMD,
};
use vrp_types::{InterfaceName, VlanId, VlanList};

/// Errors raised while replaying commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("command '{command}' issued outside an interface view")]
    OutsideInterfaceView { command: String },

    #[error("'quit' issued outside an interface view")]
    UnbalancedQuit,

    #[error("interface view for {interface} never closed")]
    UnterminatedView { interface: String },

    #[error("unknown command '{command}' on {interface}")]
    UnknownCommand { interface: String, command: String },

    #[error("command '{command}' rejected on {interface}: port is not {expected}")]
    WrongMode {
        interface: String,
        command: String,
        expected: &'static str,
    },

    #[error("bad argument in '{command}': {message}")]
    BadArgument { command: String, message: String },
}

/// Result type for simulation
pub type SimResult<T> = Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TrunkState {
    mode: LagMode,
    members: BTreeSet<InterfaceName>,
}

impl Default for TrunkState {
    fn default() -> Self {
        Self {
            mode: LagMode::On,
            members: BTreeSet::new(),
        }
    }
}

/// In-memory device holding switchport and Eth-Trunk configuration
#[derive(Debug, Clone, Default)]
pub struct SimulatedDevice {
    ports: BTreeMap<InterfaceName, Option<PortMode>>,
    trunks: BTreeMap<InterfaceName, TrunkState>,
}

/// Records a [`SimulatedDevice`] can be loaded from and report
pub trait DeviceFacts: Sized {
    /// Adds the records to the device
    fn load(device: &mut SimulatedDevice, records: &[Self]);

    /// Reads the device back as records
    fn facts(device: &SimulatedDevice) -> Vec<Self>;
}

impl DeviceFacts for L2Interface {
    fn load(device: &mut SimulatedDevice, records: &[Self]) {
        for each in records {
            device.ports.insert(each.name.clone(), each.mode.clone());
        }
    }

    fn facts(device: &SimulatedDevice) -> Vec<Self> {
        device
            .ports
            .iter()
            .map(|(name, mode)| L2Interface {
                name: name.clone(),
                mode: mode.clone(),
            })
            .collect()
    }
}

impl DeviceFacts for LagInterface {
    fn load(device: &mut SimulatedDevice, records: &[Self]) {
        for each in records {
            let mode = each
                .members()
                .iter()
                .find_map(|m| m.mode)
                .map(|mode| if mode.is_lacp() { LagMode::Active } else { mode })
                .unwrap_or(LagMode::On);
            let members = each.members().iter().map(|m| m.member.clone()).collect();
            device
                .trunks
                .insert(each.name.clone(), TrunkState { mode, members });
        }
    }

    fn facts(device: &SimulatedDevice) -> Vec<Self> {
        device
            .trunks
            .iter()
            .map(|(name, state)| {
                let members = state
                    .members
                    .iter()
                    .map(|m| LagMember::new(m.clone(), Some(state.mode)))
                    .collect();
                // members come from a set, so they are unique
                LagInterface::new(name.clone(), members)
                    .unwrap_or_else(|_| LagInterface::empty(name.clone()))
            })
            .collect()
    }
}

fn parse_vlan(command: &str, arg: &str) -> SimResult<VlanId> {
    arg.parse().map_err(|e| SimulationError::BadArgument {
        command: command.to_string(),
        message: format!("{}", e),
    })
}

fn parse_vlan_list(command: &str, arg: &str) -> SimResult<VlanList> {
    VlanList::parse_cli(arg).map_err(|e| SimulationError::BadArgument {
        command: command.to_string(),
        message: format!("{}", e),
    })
}

fn undo(cmd: &str) -> String {
    format!("{} {}", UNDO_PREFIX, cmd)
}

fn all(cmd: &str) -> String {
    format!("{} all", cmd)
}

impl SimulatedDevice {
    /// Creates an empty device
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a device holding `records`
    pub fn with_facts<R: DeviceFacts>(records: &[R]) -> Self {
        let mut device = Self::new();
        device.load(records);
        device
    }

    /// Adds `records`, replacing any interface of the same name
    pub fn load<R: DeviceFacts>(&mut self, records: &[R]) {
        R::load(self, records);
    }

    /// Reads the device back as records of type `R`
    pub fn facts<R: DeviceFacts>(&self) -> Vec<R> {
        R::facts(self)
    }

    /// Applies a command list
    ///
    /// Every command has to sit inside an `interface` ... `quit` view. On
    /// error the device may be partially updated.
    pub fn apply(&mut self, commands: &[String]) -> SimResult<()> {
        let mut current: Option<InterfaceName> = None;
        for command in commands {
            if let Some(rest) = command.strip_prefix(INTERFACE_CMD) {
                let name = InterfaceName::new(rest.trim()).map_err(|e| {
                    SimulationError::BadArgument {
                        command: command.clone(),
                        message: e.to_string(),
                    }
                })?;
                current = Some(name);
                continue;
            }
            if command == EXIT_CMD {
                if current.take().is_none() {
                    return Err(SimulationError::UnbalancedQuit);
                }
                continue;
            }
            let Some(interface) = current.as_ref() else {
                return Err(SimulationError::OutsideInterfaceView {
                    command: command.clone(),
                });
            };
            debug!("{}: {}", interface, command);
            self.apply_one(interface, command)?;
        }
        match current {
            Some(interface) => Err(SimulationError::UnterminatedView {
                interface: interface.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn apply_one(&mut self, interface: &InterfaceName, command: &str) -> SimResult<()> {
        if command == MODE_LACP_CMD
            || command == MODE_MANUAL_CMD
            || command == undo(MODE_CMD)
            || command.starts_with(TRUNKPORT_CMD)
            || command.starts_with(&undo(TRUNKPORT_CMD))
        {
            return self.apply_trunk(interface, command);
        }
        self.apply_port(interface, command)
    }

    fn apply_trunk(&mut self, interface: &InterfaceName, command: &str) -> SimResult<()> {
        let state = self.trunks.entry(interface.clone()).or_default();
        if command == MODE_LACP_CMD {
            state.mode = LagMode::Active;
        } else if command == MODE_MANUAL_CMD || command == undo(MODE_CMD) {
            state.mode = LagMode::On;
        } else if let Some(member) = command.strip_prefix(&format!("{} ", undo(TRUNKPORT_CMD))) {
            let member = InterfaceName::new(member).map_err(|e| SimulationError::BadArgument {
                command: command.to_string(),
                message: e.to_string(),
            })?;
            state.members.remove(&member);
        } else if let Some(member) = command.strip_prefix(&format!("{} ", TRUNKPORT_CMD)) {
            let member = InterfaceName::new(member).map_err(|e| SimulationError::BadArgument {
                command: command.to_string(),
                message: e.to_string(),
            })?;
            state.members.insert(member);
        } else {
            return Err(SimulationError::UnknownCommand {
                interface: interface.to_string(),
                command: command.to_string(),
            });
        }
        Ok(())
    }

    fn apply_port(&mut self, interface: &InterfaceName, command: &str) -> SimResult<()> {
        let mode = self.ports.entry(interface.clone()).or_default();
        let wrong_mode = |expected| SimulationError::WrongMode {
            interface: interface.to_string(),
            command: command.to_string(),
            expected,
        };

        let link_type = if command == format!("{} access", LINK_TYPE_CMD) {
            Some(LinkType::Access)
        } else if command == format!("{} trunk", LINK_TYPE_CMD)
            || command == LEGACY_TRUNK_LINK_TYPE_CMD
        {
            Some(LinkType::Trunk)
        } else if command == format!("{} hybrid", LINK_TYPE_CMD) {
            Some(LinkType::Hybrid)
        } else {
            None
        };

        if command == undo(LINK_TYPE_CMD) {
            *mode = None;
        } else if let Some(link_type) = link_type {
            // restating the current link type keeps the port's settings
            if mode.as_ref().map(PortMode::link_type) != Some(link_type) {
                *mode = Some(match link_type {
                    LinkType::Access => PortMode::Access(AccessConfig {
                        vlan: VlanId::DEFAULT,
                    }),
                    LinkType::Trunk => PortMode::Trunk(TaggedConfig::default()),
                    LinkType::Hybrid => PortMode::Hybrid(TaggedConfig::default()),
                });
            }
        } else if command == undo(DEFAULT_VLAN_CMD) {
            let Some(PortMode::Access(access)) = mode else {
                return Err(wrong_mode("access"));
            };
            access.vlan = VlanId::DEFAULT;
        } else if let Some(arg) = command.strip_prefix(&format!("{} ", DEFAULT_VLAN_CMD)) {
            let Some(PortMode::Access(access)) = mode else {
                return Err(wrong_mode("access"));
            };
            access.vlan = parse_vlan(command, arg)?;
        } else if command.starts_with("port trunk") || command.starts_with("undo port trunk") {
            let Some(PortMode::Trunk(trunk)) = mode else {
                return Err(wrong_mode("trunk"));
            };
            if command == undo(TRUNK_PVID_CMD) {
                trunk.native_vlan = None;
            } else if command == undo(&all(TRUNK_ALLOW_PASS_CMD)) {
                trunk.allowed_vlans = None;
            } else if let Some(arg) = command.strip_prefix(&format!("{} ", TRUNK_PVID_CMD)) {
                trunk.native_vlan = Some(parse_vlan(command, arg)?);
            } else if let Some(arg) = command.strip_prefix(&format!("{} ", TRUNK_ALLOW_PASS_CMD)) {
                let added = parse_vlan_list(command, arg)?;
                let list = trunk.allowed_vlans.get_or_insert_with(VlanList::new);
                added.iter().for_each(|range| list.push(*range));
            } else {
                return Err(SimulationError::UnknownCommand {
                    interface: interface.to_string(),
                    command: command.to_string(),
                });
            }
        } else if command.starts_with("port hybrid") || command.starts_with("undo port hybrid") {
            let Some(PortMode::Hybrid(hybrid)) = mode else {
                return Err(wrong_mode("hybrid"));
            };
            if command == undo(HYBRID_PVID_CMD) {
                hybrid.native_vlan = None;
            } else if command == undo(&all(HYBRID_TAGGED_CMD)) {
                hybrid.allowed_vlans = None;
            } else if command == undo(&all(HYBRID_UNTAGGED_CMD)) {
                // untagged membership is not part of the facts
            } else if let Some(arg) = command.strip_prefix(&format!("{} ", HYBRID_PVID_CMD)) {
                hybrid.native_vlan = Some(parse_vlan(command, arg)?);
            } else if let Some(arg) = command.strip_prefix(&format!("{} ", HYBRID_UNTAGGED_CMD)) {
                parse_vlan(command, arg)?;
            } else if let Some(arg) = command.strip_prefix(&format!("{} ", HYBRID_TAGGED_CMD)) {
                let added = parse_vlan_list(command, arg)?;
                let list = hybrid.allowed_vlans.get_or_insert_with(VlanList::new);
                added.iter().for_each(|range| list.push(*range));
            } else {
                return Err(SimulationError::UnknownCommand {
                    interface: interface.to_string(),
                    command: command.to_string(),
                });
            }
        } else {
            return Err(SimulationError::UnknownCommand {
                interface: interface.to_string(),
                command: command.to_string(),
            });
        }
        Ok(())
    }
}
