//! VLAN ID, VLAN range token and VLAN list types.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// IEEE 802.1Q VLAN identifier (1-4094).
///
/// VLAN 0 is reserved (priority tagged frames).
/// VLAN 4095 is reserved.
/// Valid range is 1-4094.
///
/// # Examples
///
/// ```
/// use vrp_types::VlanId;
///
/// let vlan = VlanId::new(100).unwrap();
/// assert_eq!(vlan.as_u16(), 100);
///
/// // Invalid VLAN IDs return errors
/// assert!(VlanId::new(0).is_err());
/// assert!(VlanId::new(4095).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Minimum valid VLAN ID.
    pub const MIN: u16 = 1;

    /// Maximum valid VLAN ID.
    pub const MAX: u16 = 4094;

    /// Default VLAN ID (VLAN 1).
    pub const DEFAULT: VlanId = VlanId(1);

    /// Creates a new VLAN ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the VLAN ID is not in the valid range (1-4094).
    pub const fn new(id: u16) -> Result<Self, ParseError> {
        if id >= Self::MIN && id <= Self::MAX {
            Ok(VlanId(id))
        } else {
            Err(ParseError::InvalidVlanId(id))
        }
    }

    /// Returns the VLAN ID as a u16.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Handle "Vlanif100" and "Vlan100" formats
        let lower = s.to_ascii_lowercase();
        let id_str = if lower.starts_with("vlanif") {
            &s[6..]
        } else if lower.starts_with("vlan") {
            &s[4..]
        } else {
            s
        };

        let id: u16 = id_str
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidVlanId(0))?;

        VlanId::new(id)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}

/// A single VLAN token as used by `allow-pass` and `tagged` lists.
///
/// Tokens are either a bare VLAN (`"15"`) or a `"start-end"` span. Parsing a
/// span does not check that `start < end`; that is the job of
/// [`VlanRange::is_ordered`], so that a bad list can be reported with the
/// offending token at reconcile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawVlanToken", into = "String")]
pub enum VlanRange {
    /// A single VLAN.
    Single(VlanId),
    /// An inclusive `start-end` span.
    Span(VlanId, VlanId),
}

impl VlanRange {
    /// Returns true if the token is a single VLAN or a span whose start is
    /// strictly below its end.
    pub const fn is_ordered(&self) -> bool {
        match self {
            VlanRange::Single(_) => true,
            VlanRange::Span(start, end) => start.as_u16() < end.as_u16(),
        }
    }

    /// Renders the token the way the VRP CLI expects it (`"10 to 20"`).
    pub fn to_cli(&self) -> String {
        match self {
            VlanRange::Single(id) => id.to_string(),
            VlanRange::Span(start, end) => format!("{} to {}", start, end),
        }
    }
}

fn parse_token_id(part: &str, token: &str) -> Result<VlanId, ParseError> {
    let id: u16 = part
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidVlanRange(token.to_string()))?;
    VlanId::new(id)
}

impl FromStr for VlanRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.split_once('-') {
            Some((start, end)) => Ok(VlanRange::Span(
                parse_token_id(start, token)?,
                parse_token_id(end, token)?,
            )),
            None => Ok(VlanRange::Single(parse_token_id(token, token)?)),
        }
    }
}

impl fmt::Display for VlanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanRange::Single(id) => write!(f, "{}", id),
            VlanRange::Span(start, end) => write!(f, "{}-{}", start, end),
        }
    }
}

impl From<VlanId> for VlanRange {
    fn from(id: VlanId) -> Self {
        VlanRange::Single(id)
    }
}

impl From<VlanRange> for String {
    fn from(range: VlanRange) -> String {
        range.to_string()
    }
}

/// Wire form of a VLAN token: records may carry either `15` or `"10-20"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVlanToken {
    Id(u16),
    Token(String),
}

impl TryFrom<RawVlanToken> for VlanRange {
    type Error = ParseError;

    fn try_from(raw: RawVlanToken) -> Result<Self, Self::Error> {
        match raw {
            RawVlanToken::Id(id) => Ok(VlanRange::Single(VlanId::new(id)?)),
            RawVlanToken::Token(token) => token.parse(),
        }
    }
}

/// Ordered list of VLAN tokens with set semantics for comparison.
///
/// Insertion order is kept because it is the order the tokens are rendered
/// in on the CLI; duplicates are dropped. Two lists are equal when they hold
/// the same tokens regardless of order.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<VlanRange>", into = "Vec<VlanRange>")]
pub struct VlanList(Vec<VlanRange>);

impl VlanList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a list rendered by [`VlanList::to_cli`], e.g. `"10 20 to 30"`.
    pub fn parse_cli(s: &str) -> Result<Self, ParseError> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < words.len() {
            let start = parse_token_id(words[i], s)?;
            if words.get(i + 1) == Some(&"to") {
                let end = words
                    .get(i + 2)
                    .ok_or_else(|| ParseError::InvalidVlanRange(s.to_string()))?;
                tokens.push(VlanRange::Span(start, parse_token_id(end, s)?));
                i += 3;
            } else {
                tokens.push(VlanRange::Single(start));
                i += 1;
            }
        }
        Ok(Self::from(tokens))
    }

    /// Adds a token unless it is already present.
    pub fn push(&mut self, range: VlanRange) {
        if !self.0.contains(&range) {
            self.0.push(range);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VlanRange> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the list as the space separated VRP form (`"10 20 to 30"`).
    pub fn to_cli(&self) -> String {
        self.0
            .iter()
            .map(VlanRange::to_cli)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PartialEq for VlanList {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().collect::<BTreeSet<_>>() == other.0.iter().collect::<BTreeSet<_>>()
    }
}

impl From<Vec<VlanRange>> for VlanList {
    fn from(tokens: Vec<VlanRange>) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<VlanList> for Vec<VlanRange> {
    fn from(list: VlanList) -> Self {
        list.0
    }
}

impl FromIterator<VlanRange> for VlanList {
    fn from_iter<I: IntoIterator<Item = VlanRange>>(iter: I) -> Self {
        let mut list = VlanList::new();
        for range in iter {
            list.push(range);
        }
        list
    }
}

impl<'a> IntoIterator for &'a VlanList {
    type Item = &'a VlanRange;
    type IntoIter = std::slice::Iter<'a, VlanRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for VlanList {
    type Err = ParseError;

    /// Parses comma or whitespace separated tokens (`"10,20-30"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for VlanList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", tokens.join(","))
    }
}
