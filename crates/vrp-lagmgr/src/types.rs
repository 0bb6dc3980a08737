//! Type definitions for Eth-Trunk records

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use vrp_cfgmgr_common::{CfgMgrError, InterfaceRecord};
use vrp_types::InterfaceName;

/// Eth-Trunk working mode as seen from a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagMode {
    /// Static (manual load-balance) aggregation
    On,
    /// LACP, actively negotiating
    Active,
    /// LACP, answering only
    Passive,
}

impl LagMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LagMode::On => "on",
            LagMode::Active => "active",
            LagMode::Passive => "passive",
        }
    }

    /// Returns true for the LACP modes
    pub fn is_lacp(&self) -> bool {
        matches!(self, LagMode::Active | LagMode::Passive)
    }
}

/// One physical member of an Eth-Trunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagMember {
    /// Member interface
    pub member: InterfaceName,
    /// Working mode, `None` when not declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<LagMode>,
}

impl LagMember {
    pub fn new(member: InterfaceName, mode: Option<LagMode>) -> Self {
        Self { member, mode }
    }
}

/// Membership of one Eth-Trunk.
///
/// Members are unique and kept sorted by member name, so two records with
/// the same members compare equal regardless of declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLagInterface")]
pub struct LagInterface {
    /// Eth-Trunk name
    pub name: InterfaceName,
    members: Vec<LagMember>,
}

impl LagInterface {
    /// Creates a record, rejecting duplicate members
    pub fn new(name: InterfaceName, mut members: Vec<LagMember>) -> Result<Self, CfgMgrError> {
        let mut seen = HashSet::new();
        for each in &members {
            if !seen.insert(each.member.clone()) {
                return Err(CfgMgrError::invalid_config(
                    name.as_str(),
                    format!("duplicate member {}", each.member),
                ));
            }
        }
        members.sort_by(|a, b| a.member.cmp(&b.member));
        Ok(Self { name, members })
    }

    /// Creates a record with no members
    pub fn empty(name: InterfaceName) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    /// Members sorted by name
    pub fn members(&self) -> &[LagMember] {
        &self.members
    }

    /// Looks up a member by interface name
    pub fn member(&self, name: &InterfaceName) -> Option<&LagMember> {
        self.members
            .binary_search_by(|m| m.member.cmp(name))
            .ok()
            .map(|idx| &self.members[idx])
    }
}

impl InterfaceRecord for LagInterface {
    fn name(&self) -> &InterfaceName {
        &self.name
    }
}

#[derive(Deserialize)]
struct RawLagInterface {
    name: InterfaceName,
    #[serde(default)]
    members: Option<Vec<LagMember>>,
}

impl TryFrom<RawLagInterface> for LagInterface {
    type Error = CfgMgrError;

    fn try_from(raw: RawLagInterface) -> Result<Self, Self::Error> {
        LagInterface::new(raw.name, raw.members.unwrap_or_default())
    }
}
