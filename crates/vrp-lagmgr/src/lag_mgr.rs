//! LagMgr - Eth-Trunk membership reconciler

use tracing::{debug, instrument, warn};

use vrp_cfgmgr_common::{
    find_by_name, CfgMgrResult, CommandList, InterfaceRecord, Reconciler, Resource,
};

use crate::commands::{build_mode_cmd, build_trunkport_cmd, MODE_CMD};
use crate::diff::{member_changes, member_removals, LagRemoval};
use crate::types::LagInterface;

/// LagMgr reconciles the `lag_interfaces` resource
///
/// All commands for one Eth-Trunk go into its interface view; members are
/// handled in name order.
#[derive(Debug, Clone, Default)]
pub struct LagMgr;

impl LagMgr {
    /// Creates a new LagMgr
    pub fn new() -> Self {
        Self
    }

    fn check_name(interface: &LagInterface) {
        if !interface.name.is_eth_trunk() {
            warn!("{} is not an Eth-Trunk interface", interface.name);
        }
    }

    /// Emits the set block adding changed members
    fn set_config(want: &LagInterface, have: &LagInterface, cmds: &mut CommandList) {
        cmds.enter(&want.name);
        for each in member_changes(want, have) {
            if let Some(mode) = each.mode {
                cmds.emit(build_mode_cmd(mode));
            }
            cmds.emit(build_trunkport_cmd(&each.member));
        }
        cmds.exit_if_nonempty();
    }

    /// Emits the clear block; `None` removes every member
    fn clear_config(want: Option<&LagInterface>, have: &LagInterface, cmds: &mut CommandList) {
        cmds.enter(&have.name);
        for removal in member_removals(want, have) {
            match removal {
                LagRemoval::Member(member) => cmds.emit_undo(&build_trunkport_cmd(&member)),
                LagRemoval::Mode => cmds.emit_undo(MODE_CMD),
            }
        }
        cmds.exit_if_nonempty();
    }

    fn replace_one(want: &LagInterface, have: &LagInterface, cmds: &mut CommandList) {
        Self::clear_config(Some(want), have, cmds);
        Self::set_config(want, have, cmds);
    }
}

impl Reconciler for LagMgr {
    type Record = LagInterface;

    fn resource(&self) -> Resource {
        Resource::LagInterfaces
    }

    #[instrument(skip_all)]
    fn merged(
        &self,
        want: &[LagInterface],
        have: &[LagInterface],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        for interface in want {
            Self::check_name(interface);
            let Some(each) = find_by_name(have, interface.name()) else {
                debug!("No facts for {}, skipping", interface.name);
                continue;
            };
            Self::set_config(interface, each, cmds);
        }
        Ok(())
    }

    #[instrument(skip_all)]
    fn replaced(
        &self,
        want: &[LagInterface],
        have: &[LagInterface],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        for interface in want {
            Self::check_name(interface);
            let Some(each) = find_by_name(have, interface.name()) else {
                debug!("No facts for {}, skipping", interface.name);
                continue;
            };
            Self::replace_one(interface, each, cmds);
        }
        Ok(())
    }

    #[instrument(skip_all)]
    fn overridden(
        &self,
        want: &[LagInterface],
        have: &[LagInterface],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        want.iter().for_each(Self::check_name);
        for each in have {
            match find_by_name(want, each.name()) {
                Some(interface) => Self::replace_one(interface, each, cmds),
                None => {
                    debug!("{} not declared, clearing", each.name);
                    Self::clear_config(None, each, cmds);
                }
            }
        }
        Ok(())
    }

    #[instrument(skip_all)]
    fn deleted(
        &self,
        want: &[LagInterface],
        have: &[LagInterface],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        if want.is_empty() {
            for each in have {
                Self::clear_config(None, each, cmds);
            }
            return Ok(());
        }

        for interface in want {
            let Some(each) = find_by_name(have, interface.name()) else {
                debug!("No facts for {}, skipping", interface.name);
                continue;
            };
            Self::clear_config(None, each, cmds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LagMember, LagMode};
    use pretty_assertions::assert_eq;
    use vrp_cfgmgr_common::{CfgMgrError, State};
    use vrp_types::InterfaceName;

    fn name(s: &str) -> InterfaceName {
        InterfaceName::new(s).unwrap()
    }

    fn lag(trunk: &str, members: &[(&str, Option<LagMode>)]) -> LagInterface {
        LagInterface::new(
            name(trunk),
            members
                .iter()
                .map(|(m, mode)| LagMember::new(name(m), *mode))
                .collect(),
        )
        .unwrap()
    }

    fn run(state: State, want: &[LagInterface], have: &[LagInterface]) -> Vec<String> {
        LagMgr::new().reconcile(state, want, have).unwrap()
    }

    #[test]
    fn test_merged_new_lacp_member() {
        let want = vec![lag("Eth-Trunk0", &[("Eth1", Some(LagMode::Active))])];
        let have = vec![lag("Eth-Trunk0", &[])];
        assert_eq!(
            run(State::Merged, &want, &have),
            vec!["interface Eth-Trunk0", "mode lacp", "trunkport Eth1", "quit"]
        );
    }

    #[test]
    fn test_merged_mode_written_per_member() {
        let want = vec![lag(
            "Eth-Trunk1",
            &[("Eth1", Some(LagMode::On)), ("Eth2", Some(LagMode::On)), ("Eth3", None)],
        )];
        let have = vec![lag("Eth-Trunk1", &[])];
        assert_eq!(
            run(State::Merged, &want, &have),
            vec![
                "interface Eth-Trunk1",
                "mode manual load-balance",
                "trunkport Eth1",
                "mode manual load-balance",
                "trunkport Eth2",
                "trunkport Eth3",
                "quit"
            ]
        );
    }

    #[test]
    fn test_merged_two_lacp_members() {
        let want = vec![lag(
            "Eth-Trunk0",
            &[("Eth1", Some(LagMode::Active)), ("Eth2", Some(LagMode::Active))],
        )];
        let have = vec![lag("Eth-Trunk0", &[])];
        assert_eq!(
            run(State::Merged, &want, &have),
            vec![
                "interface Eth-Trunk0",
                "mode lacp",
                "trunkport Eth1",
                "mode lacp",
                "trunkport Eth2",
                "quit"
            ]
        );
    }

    #[test]
    fn test_merged_converged_is_empty() {
        let want = vec![lag("Eth-Trunk0", &[("Eth1", Some(LagMode::Active))])];
        assert!(run(State::Merged, &want, &want).is_empty());
    }

    #[test]
    fn test_merged_keeps_undeclared_members() {
        let want = vec![lag("Eth-Trunk0", &[("Eth2", None)])];
        let have = vec![lag("Eth-Trunk0", &[("Eth1", Some(LagMode::On))])];
        assert_eq!(
            run(State::Merged, &want, &have),
            vec!["interface Eth-Trunk0", "trunkport Eth2", "quit"]
        );
    }

    #[test]
    fn test_replaced_drops_extra_members_and_mode() {
        let want = vec![lag("Eth-Trunk0", &[("Eth1", Some(LagMode::On))])];
        let have = vec![lag(
            "Eth-Trunk0",
            &[("Eth1", Some(LagMode::Active)), ("Eth2", Some(LagMode::Active))],
        )];
        assert_eq!(
            run(State::Replaced, &want, &have),
            vec![
                "interface Eth-Trunk0",
                "undo mode",
                "undo trunkport Eth2",
                "quit",
                "interface Eth-Trunk0",
                "mode manual load-balance",
                "trunkport Eth1",
                "quit"
            ]
        );
    }

    #[test]
    fn test_overridden_clears_undeclared_trunks() {
        let want = vec![lag("Eth-Trunk0", &[("Eth1", Some(LagMode::On))])];
        let have = vec![
            lag("Eth-Trunk0", &[("Eth1", Some(LagMode::On))]),
            lag("Eth-Trunk1", &[("Eth2", Some(LagMode::Active))]),
        ];
        assert_eq!(
            run(State::Overridden, &want, &have),
            vec![
                "interface Eth-Trunk1",
                "undo trunkport Eth2",
                "undo mode",
                "quit"
            ]
        );
    }

    #[test]
    fn test_deleted_named() {
        let have = vec![
            lag("Eth-Trunk0", &[("Eth1", Some(LagMode::On))]),
            lag("Eth-Trunk1", &[("Eth2", Some(LagMode::On))]),
        ];
        let want = vec![lag("Eth-Trunk1", &[("Eth2", Some(LagMode::On))])];
        assert_eq!(
            run(State::Deleted, &want, &have),
            vec![
                "interface Eth-Trunk1",
                "undo trunkport Eth2",
                "undo mode",
                "quit"
            ]
        );
    }

    #[test]
    fn test_deleted_all_skips_empty_trunks() {
        let have = vec![
            lag("Eth-Trunk0", &[]),
            lag("Eth-Trunk1", &[("Eth2", Some(LagMode::On))]),
        ];
        assert_eq!(
            run(State::Deleted, &[], &have),
            vec![
                "interface Eth-Trunk1",
                "undo trunkport Eth2",
                "undo mode",
                "quit"
            ]
        );
    }

    #[test]
    fn test_non_trunk_name_still_reconciled() {
        let want = vec![lag("Eth1", &[("Eth2", None)])];
        let have = vec![lag("Eth1", &[])];
        assert_eq!(
            run(State::Merged, &want, &have),
            vec!["interface Eth1", "trunkport Eth2", "quit"]
        );
    }

    #[test]
    fn test_missing_config() {
        let err = LagMgr::new()
            .reconcile(State::Overridden, &[], &[])
            .unwrap_err();
        assert!(matches!(err, CfgMgrError::MissingConfig { .. }));
    }
}
