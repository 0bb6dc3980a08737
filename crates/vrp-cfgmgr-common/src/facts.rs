//! Facts providers and record documents.
//!
//! Parsing `display` output is done elsewhere; reconcilers only consume the
//! resulting records. [`FileFacts`] serves records from a JSON or YAML
//! document shaped like a network-resources facts tree:
//!
//! ```yaml
//! l2_interfaces:
//!   - name: GigabitEthernet0/0/1
//!     access:
//!       vlan: 10
//! lag_interfaces:
//!   - name: Eth-Trunk1
//!     members:
//!       - member: GigabitEthernet0/0/2
//!         mode: active
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CfgMgrError, CfgMgrResult};
use crate::manager::Resource;

/// Source of the observed ("have") configuration.
pub trait FactsProvider {
    /// Returns the current records for `resource`. An unknown resource or
    /// an absent section yields an empty list.
    fn get_facts<R: DeserializeOwned>(&self, resource: Resource) -> CfgMgrResult<Vec<R>>;
}

/// Facts read from a document on disk.
#[derive(Debug, Clone)]
pub struct FileFacts {
    path: PathBuf,
    document: Value,
}

impl FileFacts {
    /// Loads a facts document. Files ending in `.json` are read as JSON,
    /// anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> CfgMgrResult<Self> {
        let path = path.as_ref();
        Ok(Self {
            path: path.to_path_buf(),
            document: read_document(path)?,
        })
    }

    /// Wraps an already decoded document.
    pub fn from_value(document: Value) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            document,
        }
    }
}

impl FactsProvider for FileFacts {
    fn get_facts<R: DeserializeOwned>(&self, resource: Resource) -> CfgMgrResult<Vec<R>> {
        match self.document.get(resource.name()) {
            None | Some(Value::Null) => {
                debug!("No {} facts in {}", resource, self.path.display());
                Ok(Vec::new())
            }
            Some(section) => serde_json::from_value(section.clone())
                .map_err(|e| CfgMgrError::parse(self.path.display().to_string(), e)),
        }
    }
}

/// Reads a JSON or YAML file into a generic document.
pub fn read_document(path: &Path) -> CfgMgrResult<Value> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| CfgMgrError::io(&display, e))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).map_err(|e| CfgMgrError::parse(&display, e))
    } else {
        serde_yaml::from_str(&content).map_err(|e| CfgMgrError::parse(&display, e))
    }
}

/// Loads desired records from a file holding either a plain list or a
/// mapping with a `config` list.
pub fn load_records<R: DeserializeOwned>(path: impl AsRef<Path>) -> CfgMgrResult<Vec<R>> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let document = read_document(path)?;

    let list = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Object(mut map) => map.remove("config").unwrap_or(Value::Null),
        other => other,
    };
    if list.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(list).map_err(|e| CfgMgrError::parse(display, e))
}
