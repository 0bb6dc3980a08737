//! Reconciler settings
//!
//! Loads reconciler settings from TOML files.
//! Default location: /etc/vrp/cfgctl.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use vrp_types::VlanList;

use crate::error::{CfgMgrError, CfgMgrResult};

/// Default settings file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/vrp/cfgctl.toml";

/// How much of an allowed/tagged VLAN list is checked for ordered spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VlanRangeCheck {
    /// Every token must be ordered.
    #[default]
    All,
    /// Only the first token is checked (legacy module behaviour).
    FirstToken,
}

impl VlanRangeCheck {
    /// Rejects `start-end` tokens whose start is not below their end.
    ///
    /// Single VLAN tokens always pass.
    pub fn check(&self, vlans: &VlanList) -> CfgMgrResult<()> {
        let limit = match self {
            VlanRangeCheck::All => vlans.len(),
            VlanRangeCheck::FirstToken => 1,
        };
        match vlans.iter().take(limit).find(|range| !range.is_ordered()) {
            Some(bad) => Err(CfgMgrError::invalid_vlan_range(bad.to_string())),
            None => Ok(()),
        }
    }
}

/// Command rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Emit the trunk link-type command as `port lint-type trunk`, the
    /// spelling found in existing command histories.
    #[serde(default = "default_legacy_trunk_link_type")]
    pub legacy_trunk_link_type: bool,
}

/// Input validation options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// VLAN range token check mode
    #[serde(default)]
    pub vlan_range_check: VlanRangeCheck,
}

/// Complete reconciler settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Command rendering
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Input validation
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn default_legacy_trunk_link_type() -> bool {
    true
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            legacy_trunk_link_type: default_legacy_trunk_link_type(),
        }
    }
}

impl ReconcileConfig {
    /// Load settings from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> CfgMgrResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content)
                    .map_err(|e| CfgMgrError::parse(path.display().to_string(), e))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(CfgMgrError::io(path.display().to_string(), e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> CfgMgrResult<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Save settings to file
    pub fn save(&self, path: impl AsRef<Path>) -> CfgMgrResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| CfgMgrError::invalid_config("settings", e.to_string()))?;

        fs::write(path, content).map_err(|e| CfgMgrError::io(path.display().to_string(), e))?;

        Ok(())
    }
}
