//! Interface name normalization.

use crate::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Splits a name into its alphabetic type prefix and its numeric position.
/// The prefix may start with a speed (`10GE`, `100GE`).
static INTF_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d*[A-Za-z][A-Za-z-]*?)\s*(\d+(?:/\d+)*(?:[.:]\d+)?)$")
        .expect("Invalid regex pattern")
});

/// Canonical VRP spellings, keyed by the lowercased prefix or abbreviation.
const CANONICAL_PREFIXES: &[(&str, &str)] = &[
    ("gigabitethernet", "GigabitEthernet"),
    ("ge", "GigabitEthernet"),
    ("xgigabitethernet", "XGigabitEthernet"),
    ("xge", "XGigabitEthernet"),
    ("10ge", "10GE"),
    ("25ge", "25GE"),
    ("40ge", "40GE"),
    ("100ge", "100GE"),
    ("eth-trunk", "Eth-Trunk"),
    ("ethernet", "Ethernet"),
    ("meth", "MEth"),
    ("vlanif", "Vlanif"),
    ("loopback", "LoopBack"),
];

const ETH_TRUNK_PREFIX: &str = "Eth-Trunk";

/// Normalized interface name, the key that joins desired and observed records.
///
/// Known VRP abbreviations are expanded (`GE0/0/1` becomes
/// `GigabitEthernet0/0/1`, `eth-trunk 1` becomes `Eth-Trunk1`). Names that do
/// not match a known prefix are kept as given, minus surrounding whitespace.
///
/// # Examples
///
/// ```
/// use vrp_types::InterfaceName;
///
/// let name: InterfaceName = "xge0/0/2".parse().unwrap();
/// assert_eq!(name.as_str(), "XGigabitEthernet0/0/2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InterfaceName(String);

impl InterfaceName {
    /// Normalizes and wraps an interface name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or blank.
    pub fn new(name: &str) -> Result<Self, ParseError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ParseError::InvalidInterfaceName(name.to_string()));
        }
        Ok(InterfaceName(normalize(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for link-aggregation (`Eth-Trunk`) interfaces.
    pub fn is_eth_trunk(&self) -> bool {
        self.0.starts_with(ETH_TRUNK_PREFIX)
    }
}

fn normalize(name: &str) -> String {
    let Some(caps) = INTF_NAME_RE.captures(name) else {
        return name.to_string();
    };
    let prefix = caps[1].to_ascii_lowercase();
    CANONICAL_PREFIXES
        .iter()
        .find(|(alias, _)| *alias == prefix)
        .map(|(_, canonical)| format!("{}{}", canonical, &caps[2]))
        .unwrap_or_else(|| name.to_string())
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InterfaceName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterfaceName::new(s)
    }
}

impl TryFrom<String> for InterfaceName {
    type Error = ParseError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        InterfaceName::new(&name)
    }
}

impl TryFrom<&str> for InterfaceName {
    type Error = ParseError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        InterfaceName::new(name)
    }
}

impl From<InterfaceName> for String {
    fn from(name: InterfaceName) -> String {
        name.0
    }
}

impl AsRef<str> for InterfaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
