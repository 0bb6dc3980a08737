//! VRP CLI command builders for Eth-Trunk membership

use vrp_types::InterfaceName;

use crate::types::LagMode;

/// LACP working mode
pub const MODE_LACP_CMD: &str = "mode lacp";

/// Static working mode
pub const MODE_MANUAL_CMD: &str = "mode manual load-balance";

/// Working mode (undo form resets it)
pub const MODE_CMD: &str = "mode";

/// Member port
pub const TRUNKPORT_CMD: &str = "trunkport";

/// Build working mode command
pub fn build_mode_cmd(mode: LagMode) -> &'static str {
    if mode.is_lacp() {
        MODE_LACP_CMD
    } else {
        MODE_MANUAL_CMD
    }
}

/// Build member command, e.g. `trunkport GigabitEthernet0/0/1`
pub fn build_trunkport_cmd(member: &InterfaceName) -> String {
    format!("{} {}", TRUNKPORT_CMD, member)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mode_cmd() {
        assert_eq!(build_mode_cmd(LagMode::Active), "mode lacp");
        assert_eq!(build_mode_cmd(LagMode::Passive), "mode lacp");
        assert_eq!(build_mode_cmd(LagMode::On), "mode manual load-balance");
    }

    #[test]
    fn test_build_trunkport_cmd() {
        let member = InterfaceName::new("GE0/0/1").unwrap();
        assert_eq!(
            build_trunkport_cmd(&member),
            "trunkport GigabitEthernet0/0/1"
        );
    }
}
