//! VRP CLI command builders for switchport settings

use vrp_types::{VlanId, VlanList};

use crate::types::LinkType;

/// Link-type command (without the mode keyword)
pub const LINK_TYPE_CMD: &str = "port link-type";

/// Trunk link-type command as it appears in existing command histories.
///
/// The keyword is misspelled; devices that ran these playbooks have it on
/// record, so it is emitted verbatim unless configured otherwise.
pub const LEGACY_TRUNK_LINK_TYPE_CMD: &str = "port lint-type trunk";

/// Access default VLAN
pub const DEFAULT_VLAN_CMD: &str = "port default vlan";

/// Trunk PVID
pub const TRUNK_PVID_CMD: &str = "port trunk pvid vlan";

/// Trunk allowed VLANs
pub const TRUNK_ALLOW_PASS_CMD: &str = "port trunk allow-pass vlan";

/// Hybrid PVID
pub const HYBRID_PVID_CMD: &str = "port hybrid pvid vlan";

/// Hybrid untagged VLANs
pub const HYBRID_UNTAGGED_CMD: &str = "port hybrid untagged vlan";

/// Hybrid tagged VLANs
pub const HYBRID_TAGGED_CMD: &str = "port hybrid tagged vlan";

/// Keyword selecting every VLAN in list commands
pub const ALL_VLANS: &str = "all";

/// Build link-type command
pub fn build_link_type_cmd(link_type: LinkType, legacy_trunk: bool) -> String {
    match link_type {
        LinkType::Trunk if legacy_trunk => LEGACY_TRUNK_LINK_TYPE_CMD.to_string(),
        _ => format!("{} {}", LINK_TYPE_CMD, link_type.as_str()),
    }
}

/// Build access default VLAN command
pub fn build_default_vlan_cmd(vlan: VlanId) -> String {
    format!("{} {}", DEFAULT_VLAN_CMD, vlan)
}

/// Build trunk PVID command
pub fn build_trunk_pvid_cmd(vlan: VlanId) -> String {
    format!("{} {}", TRUNK_PVID_CMD, vlan)
}

/// Build trunk allow-pass command, e.g. `port trunk allow-pass vlan 10 20 to 30`
pub fn build_trunk_allow_pass_cmd(vlans: &VlanList) -> String {
    format!("{} {}", TRUNK_ALLOW_PASS_CMD, vlans.to_cli())
}

/// Build hybrid PVID command
pub fn build_hybrid_pvid_cmd(vlan: VlanId) -> String {
    format!("{} {}", HYBRID_PVID_CMD, vlan)
}

/// Build hybrid untagged command
pub fn build_hybrid_untagged_cmd(vlan: VlanId) -> String {
    format!("{} {}", HYBRID_UNTAGGED_CMD, vlan)
}

/// Build hybrid tagged command
pub fn build_hybrid_tagged_cmd(vlans: &VlanList) -> String {
    format!("{} {}", HYBRID_TAGGED_CMD, vlans.to_cli())
}

/// Build the body of a `<list command> all` undo, e.g. `port trunk allow-pass vlan all`
pub fn build_all_vlans_cmd(list_cmd: &str) -> String {
    format!("{} {}", list_cmd, ALL_VLANS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlan(id: u16) -> VlanId {
        VlanId::new(id).unwrap()
    }

    #[test]
    fn test_build_link_type_cmd() {
        assert_eq!(
            build_link_type_cmd(LinkType::Access, true),
            "port link-type access"
        );
        assert_eq!(
            build_link_type_cmd(LinkType::Hybrid, true),
            "port link-type hybrid"
        );
        assert_eq!(build_link_type_cmd(LinkType::Trunk, true), "port lint-type trunk");
        assert_eq!(
            build_link_type_cmd(LinkType::Trunk, false),
            "port link-type trunk"
        );
    }

    #[test]
    fn test_build_vlan_cmds() {
        assert_eq!(build_default_vlan_cmd(vlan(10)), "port default vlan 10");
        assert_eq!(build_trunk_pvid_cmd(vlan(10)), "port trunk pvid vlan 10");
        assert_eq!(build_hybrid_pvid_cmd(vlan(5)), "port hybrid pvid vlan 5");
        assert_eq!(
            build_hybrid_untagged_cmd(vlan(5)),
            "port hybrid untagged vlan 5"
        );
    }

    #[test]
    fn test_build_list_cmds() {
        let vlans: VlanList = "10,20-30".parse().unwrap();
        assert_eq!(
            build_trunk_allow_pass_cmd(&vlans),
            "port trunk allow-pass vlan 10 20 to 30"
        );
        assert_eq!(
            build_hybrid_tagged_cmd(&vlans),
            "port hybrid tagged vlan 10 20 to 30"
        );
    }

    #[test]
    fn test_build_all_vlans_cmd() {
        assert_eq!(
            build_all_vlans_cmd(TRUNK_ALLOW_PASS_CMD),
            "port trunk allow-pass vlan all"
        );
        assert_eq!(
            build_all_vlans_cmd(HYBRID_UNTAGGED_CMD),
            "port hybrid untagged vlan all"
        );
    }
}
