//! Port mode diffing
//!
//! Rules:
//! 1. Attributes are only compared inside the same mode (trunk with trunk,
//!    hybrid with hybrid, access with access)
//! 2. A mode kind change always carries the link type plus every declared
//!    attribute of the new mode; an access VLAN change carries the link
//!    type too
//! 3. Attributes omitted by the desired record never produce a set change
//! 4. VLAN lists are compared as sets

use vrp_types::{VlanId, VlanList};

use crate::types::{LinkType, PortMode, TaggedConfig};

/// An attribute to set on an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L2Change {
    LinkType(LinkType),
    DefaultVlan(VlanId),
    TrunkPvid(VlanId),
    TrunkAllowed(VlanList),
    HybridPvid(VlanId),
    HybridTagged(VlanList),
}

/// An attribute to remove from an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L2Removal {
    /// Resets the whole port mode.
    LinkType,
    DefaultVlan,
    TrunkPvid,
    TrunkAllowed,
    /// Removes the PVID together with the untagged membership it implies.
    HybridPvid,
    HybridTagged,
}

fn changed<T: PartialEq>(want: Option<&T>, have: Option<&T>) -> bool {
    want.is_some() && want != have
}

fn tagged_changes(
    want: &TaggedConfig,
    have: Option<&TaggedConfig>,
    pvid: fn(VlanId) -> L2Change,
    list: fn(VlanList) -> L2Change,
    changes: &mut Vec<L2Change>,
) {
    let have_native = have.and_then(|h| h.native_vlan.as_ref());
    if changed(want.native_vlan.as_ref(), have_native) {
        if let Some(native) = want.native_vlan {
            changes.push(pvid(native));
        }
    }

    let have_allowed = have.and_then(|h| h.allowed_vlans.as_ref());
    if changed(want.allowed_vlans.as_ref(), have_allowed) {
        if let Some(allowed) = &want.allowed_vlans {
            changes.push(list(allowed.clone()));
        }
    }
}

/// Computes the attributes of `want` that are missing or different in `have`.
///
/// The result is in emission order.
pub fn set_changes(want: Option<&PortMode>, have: Option<&PortMode>) -> Vec<L2Change> {
    let mut changes = Vec::new();
    let Some(want) = want else {
        return changes;
    };

    match want {
        // an access change always restates the link type
        PortMode::Access(w) => {
            if have != Some(want) {
                changes.push(L2Change::LinkType(LinkType::Access));
                changes.push(L2Change::DefaultVlan(w.vlan));
            }
        }
        PortMode::Trunk(w) => {
            let have = match have {
                Some(PortMode::Trunk(h)) => Some(h),
                _ => {
                    changes.push(L2Change::LinkType(LinkType::Trunk));
                    None
                }
            };
            tagged_changes(w, have, L2Change::TrunkPvid, L2Change::TrunkAllowed, &mut changes);
        }
        PortMode::Hybrid(w) => {
            let have = match have {
                Some(PortMode::Hybrid(h)) => Some(h),
                _ => {
                    changes.push(L2Change::LinkType(LinkType::Hybrid));
                    None
                }
            };
            tagged_changes(w, have, L2Change::HybridPvid, L2Change::HybridTagged, &mut changes);
        }
    }

    changes
}

fn tagged_removals(
    want: &TaggedConfig,
    have: &TaggedConfig,
    pvid: L2Removal,
    list: L2Removal,
    removals: &mut Vec<L2Removal>,
) {
    if have.native_vlan.is_some() && have.native_vlan != want.native_vlan {
        removals.push(pvid);
    }
    if have.allowed_vlans.is_some() && have.allowed_vlans != want.allowed_vlans {
        removals.push(list);
    }
}

/// Computes what has to be removed from `have` before `want` can be applied.
///
/// A mode present in `have` that `want` leaves out or switches away from is
/// removed as a whole; inside a shared mode each differing attribute is
/// removed on its own.
pub fn removals(want: Option<&PortMode>, have: Option<&PortMode>) -> Vec<L2Removal> {
    let mut removals = Vec::new();
    let Some(have) = have else {
        return removals;
    };

    match (want, have) {
        (Some(PortMode::Access(w)), PortMode::Access(h)) => {
            if w.vlan != h.vlan {
                removals.push(L2Removal::DefaultVlan);
            }
        }
        (Some(PortMode::Trunk(w)), PortMode::Trunk(h)) => tagged_removals(
            w,
            h,
            L2Removal::TrunkPvid,
            L2Removal::TrunkAllowed,
            &mut removals,
        ),
        (Some(PortMode::Hybrid(w)), PortMode::Hybrid(h)) => tagged_removals(
            w,
            h,
            L2Removal::HybridPvid,
            L2Removal::HybridTagged,
            &mut removals,
        ),
        _ => removals.push(L2Removal::LinkType),
    }

    removals
}

/// Returns the part of `have` that `want` does not set.
///
/// This is what replaced and overridden clear before setting `want`: the
/// whole mode when `want` has none or a different one, otherwise the tagged
/// attributes `want` omits. Attributes `want` does set are left to the set
/// pass, which overwrites them.
pub fn filter_omitted(want: Option<&PortMode>, have: Option<&PortMode>) -> Option<PortMode> {
    let have = have?;
    let Some(want) = want else {
        return Some(have.clone());
    };

    let keep = |w: &TaggedConfig, h: &TaggedConfig| TaggedConfig {
        native_vlan: if w.native_vlan.is_none() { h.native_vlan } else { None },
        allowed_vlans: if w.allowed_vlans.is_none() {
            h.allowed_vlans.clone()
        } else {
            None
        },
    };

    match (want, have) {
        // want always sets the access VLAN
        (PortMode::Access(_), PortMode::Access(_)) => None,
        (PortMode::Trunk(w), PortMode::Trunk(h)) => Some(PortMode::Trunk(keep(w, h))),
        (PortMode::Hybrid(w), PortMode::Hybrid(h)) => Some(PortMode::Hybrid(keep(w, h))),
        _ => Some(have.clone()),
    }
}
