//! Member diffing
//!
//! Both sides are sorted by member name, so results come out in that order.

use vrp_types::InterfaceName;

use crate::types::{LagInterface, LagMember};

/// Something to remove from an Eth-Trunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LagRemoval {
    /// Drop a member port
    Member(InterfaceName),
    /// Reset the working mode
    Mode,
}

/// Returns the members of `want` that `have` lacks or runs in another mode.
///
/// A member without a declared mode only has to be present.
pub fn member_changes<'a>(want: &'a LagInterface, have: &LagInterface) -> Vec<&'a LagMember> {
    want.members()
        .iter()
        .filter(|each| match have.member(&each.member) {
            None => true,
            Some(current) => each.mode.is_some() && each.mode != current.mode,
        })
        .collect()
}

/// Returns what has to leave `have` before `want` can be set.
///
/// When `want` has no members everything goes, members first and the mode
/// last. Otherwise the mode is reset once if any shared member is declared
/// with a different mode, then members missing from `want` are dropped.
pub fn member_removals(want: Option<&LagInterface>, have: &LagInterface) -> Vec<LagRemoval> {
    let mut removals = Vec::new();
    if have.members().is_empty() {
        return removals;
    }

    let want = want.filter(|w| !w.members().is_empty());
    let Some(want) = want else {
        removals.extend(
            have.members()
                .iter()
                .map(|each| LagRemoval::Member(each.member.clone())),
        );
        removals.push(LagRemoval::Mode);
        return removals;
    };

    let mut mode_changed = false;
    let mut dropped = Vec::new();
    for each in have.members() {
        match want.member(&each.member) {
            None => dropped.push(LagRemoval::Member(each.member.clone())),
            Some(declared) => {
                if declared.mode.is_some() && declared.mode != each.mode {
                    mode_changed = true;
                }
            }
        }
    }
    if mode_changed {
        removals.push(LagRemoval::Mode);
    }
    removals.extend(dropped);
    removals
}
