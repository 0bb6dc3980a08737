//! Type definitions for L2 interface records

use serde::{Deserialize, Serialize};
use vrp_cfgmgr_common::{CfgMgrError, InterfaceRecord};
use vrp_types::{InterfaceName, VlanId, VlanList};

/// Switchport link type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Untagged member of a single VLAN
    Access,
    /// Tagged member of many VLANs with one native VLAN
    Trunk,
    /// Mixed tagged/untagged membership
    Hybrid,
}

impl LinkType {
    /// Convert to the CLI keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Access => "access",
            LinkType::Trunk => "trunk",
            LinkType::Hybrid => "hybrid",
        }
    }
}

/// Access port settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Default VLAN
    pub vlan: VlanId,
}

/// Trunk or hybrid port settings
///
/// Both fields are optional in a desired record; an omitted field is left
/// alone by merged and cleared by replaced/overridden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedConfig {
    /// PVID (native VLAN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<VlanId>,
    /// Allowed (trunk) or tagged (hybrid) VLANs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_vlans: Option<VlanList>,
}

impl TaggedConfig {
    pub fn new(native_vlan: Option<VlanId>, allowed_vlans: Option<VlanList>) -> Self {
        Self {
            native_vlan,
            allowed_vlans: allowed_vlans.filter(|list| !list.is_empty()),
        }
    }

    /// Returns true if neither field is set.
    pub fn is_empty(&self) -> bool {
        self.native_vlan.is_none() && self.allowed_vlans.is_none()
    }
}

/// The one active switchport mode of an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMode {
    Access(AccessConfig),
    Trunk(TaggedConfig),
    Hybrid(TaggedConfig),
}

impl PortMode {
    /// Link type this mode configures
    pub fn link_type(&self) -> LinkType {
        match self {
            PortMode::Access(_) => LinkType::Access,
            PortMode::Trunk(_) => LinkType::Trunk,
            PortMode::Hybrid(_) => LinkType::Hybrid,
        }
    }
}

/// Layer-2 configuration of one interface.
///
/// On the wire the mode is one of the `access`, `trunk` or `hybrid` keys:
///
/// ```
/// use vrp_l2intfmgr::{L2Interface, LinkType};
///
/// let intf: L2Interface = serde_json::from_str(
///     r#"{"name": "GE0/0/1", "trunk": {"native_vlan": 10, "allowed_vlans": ["20-30"]}}"#,
/// ).unwrap();
/// assert_eq!(intf.name.as_str(), "GigabitEthernet0/0/1");
/// assert_eq!(intf.mode.unwrap().link_type(), LinkType::Trunk);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawL2Interface", into = "RawL2Interface")]
pub struct L2Interface {
    /// Interface name
    pub name: InterfaceName,
    /// Active mode, `None` when nothing is declared/configured
    pub mode: Option<PortMode>,
}

impl L2Interface {
    /// Create a record with no mode
    pub fn new(name: InterfaceName) -> Self {
        Self { name, mode: None }
    }

    /// Create an access port record
    pub fn access(name: InterfaceName, vlan: VlanId) -> Self {
        Self {
            name,
            mode: Some(PortMode::Access(AccessConfig { vlan })),
        }
    }

    /// Create a trunk port record
    pub fn trunk(name: InterfaceName, config: TaggedConfig) -> Self {
        Self {
            name,
            mode: Some(PortMode::Trunk(config)),
        }
    }

    /// Create a hybrid port record
    pub fn hybrid(name: InterfaceName, config: TaggedConfig) -> Self {
        Self {
            name,
            mode: Some(PortMode::Hybrid(config)),
        }
    }
}

impl InterfaceRecord for L2Interface {
    fn name(&self) -> &InterfaceName {
        &self.name
    }
}

#[derive(Serialize, Deserialize)]
struct RawL2Interface {
    name: InterfaceName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<AccessConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trunk: Option<TaggedConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hybrid: Option<TaggedConfig>,
}

impl TryFrom<RawL2Interface> for L2Interface {
    type Error = CfgMgrError;

    fn try_from(raw: RawL2Interface) -> Result<Self, Self::Error> {
        let mode = match (raw.access, raw.trunk, raw.hybrid) {
            (None, None, None) => None,
            (Some(access), None, None) => Some(PortMode::Access(access)),
            (None, Some(trunk), None) => Some(PortMode::Trunk(TaggedConfig::new(
                trunk.native_vlan,
                trunk.allowed_vlans,
            ))),
            (None, None, Some(hybrid)) => Some(PortMode::Hybrid(TaggedConfig::new(
                hybrid.native_vlan,
                hybrid.allowed_vlans,
            ))),
            _ => {
                return Err(CfgMgrError::invalid_config(
                    raw.name.as_str(),
                    "only one of access, trunk and hybrid may be set",
                ))
            }
        };
        Ok(Self {
            name: raw.name,
            mode,
        })
    }
}

impl From<L2Interface> for RawL2Interface {
    fn from(intf: L2Interface) -> Self {
        let mut raw = RawL2Interface {
            name: intf.name,
            access: None,
            trunk: None,
            hybrid: None,
        };
        match intf.mode {
            Some(PortMode::Access(access)) => raw.access = Some(access),
            Some(PortMode::Trunk(trunk)) => raw.trunk = Some(trunk),
            Some(PortMode::Hybrid(hybrid)) => raw.hybrid = Some(hybrid),
            None => {}
        }
        raw
    }
}
