//! L2IntfMgr - switchport mode and VLAN membership reconciler

use tracing::{debug, instrument};

use vrp_cfgmgr_common::{
    find_by_name, CfgMgrResult, CommandList, InterfaceRecord, ReconcileConfig, Reconciler,
    Resource,
};

use crate::commands::{
    build_all_vlans_cmd, build_default_vlan_cmd, build_hybrid_pvid_cmd, build_hybrid_tagged_cmd,
    build_hybrid_untagged_cmd, build_link_type_cmd, build_trunk_allow_pass_cmd,
    build_trunk_pvid_cmd, DEFAULT_VLAN_CMD, HYBRID_PVID_CMD, HYBRID_TAGGED_CMD,
    HYBRID_UNTAGGED_CMD, LINK_TYPE_CMD, TRUNK_ALLOW_PASS_CMD, TRUNK_PVID_CMD,
};
use crate::diff::{filter_omitted, removals, set_changes, L2Change, L2Removal};
use crate::types::L2Interface;

/// L2IntfMgr reconciles the `l2_interfaces` resource
///
/// Per interface, commands come in up to two blocks:
/// 1. Clear block: `undo` commands for attributes that have to go
/// 2. Set block: commands for attributes that are missing or different
///
/// Each block is framed by `interface <name>` / `quit` and only written
/// when it has content.
#[derive(Debug, Clone, Default)]
pub struct L2IntfMgr {
    config: ReconcileConfig,
}

impl L2IntfMgr {
    /// Creates a new L2IntfMgr with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new L2IntfMgr with the given settings
    pub fn with_config(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    fn emit_change(&self, change: &L2Change, cmds: &mut CommandList) -> CfgMgrResult<()> {
        match change {
            L2Change::LinkType(link_type) => cmds.emit(build_link_type_cmd(
                *link_type,
                self.config.commands.legacy_trunk_link_type,
            )),
            L2Change::DefaultVlan(vlan) => cmds.emit(build_default_vlan_cmd(*vlan)),
            L2Change::TrunkPvid(vlan) => cmds.emit(build_trunk_pvid_cmd(*vlan)),
            L2Change::TrunkAllowed(vlans) => {
                self.config.validation.vlan_range_check.check(vlans)?;
                cmds.emit_undo(&build_all_vlans_cmd(TRUNK_ALLOW_PASS_CMD));
                cmds.emit(build_trunk_allow_pass_cmd(vlans));
            }
            L2Change::HybridPvid(vlan) => {
                cmds.emit(build_hybrid_pvid_cmd(*vlan));
                cmds.emit(build_hybrid_untagged_cmd(*vlan));
            }
            L2Change::HybridTagged(vlans) => {
                self.config.validation.vlan_range_check.check(vlans)?;
                cmds.emit_undo(&build_all_vlans_cmd(HYBRID_TAGGED_CMD));
                cmds.emit(build_hybrid_tagged_cmd(vlans));
            }
        }
        Ok(())
    }

    fn emit_removal(removal: L2Removal, cmds: &mut CommandList) {
        match removal {
            L2Removal::LinkType => cmds.emit_undo(LINK_TYPE_CMD),
            L2Removal::DefaultVlan => cmds.emit_undo(DEFAULT_VLAN_CMD),
            L2Removal::TrunkPvid => cmds.emit_undo(TRUNK_PVID_CMD),
            L2Removal::TrunkAllowed => cmds.emit_undo(&build_all_vlans_cmd(TRUNK_ALLOW_PASS_CMD)),
            L2Removal::HybridPvid => {
                cmds.emit_undo(&build_all_vlans_cmd(HYBRID_UNTAGGED_CMD));
                cmds.emit_undo(HYBRID_PVID_CMD);
            }
            L2Removal::HybridTagged => cmds.emit_undo(&build_all_vlans_cmd(HYBRID_TAGGED_CMD)),
        }
    }

    /// Emits the set block moving `have` to `want`
    fn set_config(
        &self,
        want: &L2Interface,
        have: &L2Interface,
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        cmds.enter(&want.name);
        for change in set_changes(want.mode.as_ref(), have.mode.as_ref()) {
            self.emit_change(&change, cmds)?;
        }
        cmds.exit_if_nonempty();
        Ok(())
    }

    /// Emits the clear block removing from `have` what `want` lacks
    ///
    /// A `want` without mode clears the whole interface.
    fn clear_config(want: Option<&L2Interface>, have: &L2Interface, cmds: &mut CommandList) {
        cmds.enter(&have.name);
        let want_mode = want.and_then(|w| w.mode.as_ref());
        for removal in removals(want_mode, have.mode.as_ref()) {
            Self::emit_removal(removal, cmds);
        }
        cmds.exit_if_nonempty();
    }

    /// Clears what `want` omits or switches away from, then sets `want`
    fn replace_one(
        &self,
        want: &L2Interface,
        have: &L2Interface,
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        let filtered = L2Interface {
            name: have.name.clone(),
            mode: filter_omitted(want.mode.as_ref(), have.mode.as_ref()),
        };
        Self::clear_config(Some(want), &filtered, cmds);
        self.set_config(want, have, cmds)
    }
}

impl Reconciler for L2IntfMgr {
    type Record = L2Interface;

    fn resource(&self) -> Resource {
        Resource::L2Interfaces
    }

    #[instrument(skip_all)]
    fn merged(
        &self,
        want: &[L2Interface],
        have: &[L2Interface],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        for interface in want {
            let Some(each) = find_by_name(have, interface.name()) else {
                debug!("No facts for {}, skipping", interface.name);
                continue;
            };
            self.set_config(interface, each, cmds)?;
        }
        Ok(())
    }

    #[instrument(skip_all)]
    fn replaced(
        &self,
        want: &[L2Interface],
        have: &[L2Interface],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        for interface in want {
            let Some(each) = find_by_name(have, interface.name()) else {
                debug!("No facts for {}, skipping", interface.name);
                continue;
            };
            self.replace_one(interface, each, cmds)?;
        }
        Ok(())
    }

    #[instrument(skip_all)]
    fn overridden(
        &self,
        want: &[L2Interface],
        have: &[L2Interface],
        cmds: &mut CommandList,
    ) -> CfgMgrResult<()> {
        for each in have {
            match find_by_name(want, each.name()) {
                Some(interface) => self.replace_one(interface, each, cmds)?,
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
        want: &[L2Interface],
        have: &[L2Interface],
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
