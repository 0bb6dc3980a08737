//! Reconciler properties checked over tables of want/have pairs
//!
//! - idempotence: applying the output and reconciling again yields nothing
//! - minimality: a converged device yields nothing, and every block is
//!   framed and non-empty
//! - deletion completeness: deleted undoes every configured interface and
//!   leaves no configuration behind
//! - mode exclusivity: one record, one mode, and only that mode's commands
//! - VLAN range validation: unordered spans are rejected before any output

use pretty_assertions::assert_eq;
use vrp_cfgmgr_common::{CfgMgrError, ReconcileConfig, Reconciler, State, VlanRangeCheck};
use vrp_cfgmgr_test::{converge, lag_fixtures, port_fixtures, split_blocks, SimulatedDevice};
use vrp_l2intfmgr::{L2IntfMgr, L2Interface, PortMode};
use vrp_lagmgr::{LagInterface, LagMgr, LagMode};

const STATES: [State; 4] = [
    State::Merged,
    State::Replaced,
    State::Overridden,
    State::Deleted,
];

fn l2_cases() -> Vec<(Vec<L2Interface>, Vec<L2Interface>)> {
    use port_fixtures::*;

    vec![
        // mode switches
        (
            vec![trunk("Eth1", Some(10), Some("20-30"))],
            vec![access("Eth1", 1)],
        ),
        (
            vec![access("Eth1", 30)],
            vec![hybrid("Eth1", Some(5), Some("6,7"))],
        ),
        (
            vec![hybrid("Eth1", Some(5), Some("6-9"))],
            vec![trunk("Eth1", Some(5), Some("6-9"))],
        ),
        // same mode, attribute changes
        (vec![access("Eth1", 30)], vec![access("Eth1", 20)]),
        (
            vec![trunk("Eth1", Some(10), None)],
            vec![trunk("Eth1", Some(5), Some("20,40-50"))],
        ),
        (
            vec![trunk("Eth1", None, Some("40-50,20"))],
            vec![trunk("Eth1", Some(5), Some("20,40-50"))],
        ),
        (
            vec![hybrid("Eth1", None, Some("8"))],
            vec![hybrid("Eth1", Some(5), Some("7"))],
        ),
        (vec![trunk("Eth1", None, None)], vec![trunk("Eth1", Some(3), None)]),
        // unconfigured ports and undeclared modes
        (vec![access("Eth1", 1)], vec![unconfigured("Eth1")]),
        (vec![unconfigured("Eth1")], vec![access("Eth1", 20)]),
        // several ports, some undeclared
        (
            vec![
                access("GE0/0/1", 10),
                trunk("GE0/0/2", Some(20), Some("20-29")),
            ],
            vec![
                trunk("GigabitEthernet0/0/1", Some(1), Some("2")),
                unconfigured("GigabitEthernet0/0/2"),
                hybrid("GigabitEthernet0/0/3", Some(4), Some("5")),
                access("GigabitEthernet0/0/4", 4),
            ],
        ),
    ]
}

fn lag_cases() -> Vec<(Vec<LagInterface>, Vec<LagInterface>)> {
    use lag_fixtures::*;

    vec![
        (
            vec![lag_with_mode("Eth-Trunk0", LagMode::Active, &["Eth1"])],
            vec![lag("Eth-Trunk0", vec![])],
        ),
        (
            vec![lag_with_mode("Eth-Trunk0", LagMode::On, &["Eth1", "Eth2"])],
            vec![lag_with_mode("Eth-Trunk0", LagMode::Active, &["Eth2", "Eth3"])],
        ),
        (
            vec![lag("Eth-Trunk0", vec![member("Eth1"), member("Eth4")])],
            vec![lag_with_mode("Eth-Trunk0", LagMode::On, &["Eth1", "Eth2"])],
        ),
        (
            vec![lag("Eth-Trunk0", vec![])],
            vec![lag_with_mode("Eth-Trunk0", LagMode::Active, &["Eth1", "Eth2"])],
        ),
        (
            vec![
                lag_with_mode("Eth-Trunk1", LagMode::Active, &["GE0/0/1", "GE0/0/2"]),
                lag("Eth-Trunk2", vec![member_with_mode("GE0/0/3", LagMode::On)]),
            ],
            vec![
                lag_with_mode("Eth-Trunk1", LagMode::Active, &["GE0/0/1"]),
                lag_with_mode("Eth-Trunk2", LagMode::Active, &["GE0/0/3"]),
                lag_with_mode("Eth-Trunk3", LagMode::On, &["GE0/0/4"]),
            ],
        ),
    ]
}

#[test]
fn test_l2_idempotence() {
    let mgr = L2IntfMgr::new();
    for (i, (want, have)) in l2_cases().iter().enumerate() {
        for state in STATES {
            if let Err(e) = converge(&mgr, state, want, have) {
                panic!("case {} {}: {}", i, state, e);
            }
        }
    }
}

#[test]
fn test_lag_idempotence() {
    let mgr = LagMgr::new();
    for (i, (want, have)) in lag_cases().iter().enumerate() {
        for state in STATES {
            if let Err(e) = converge(&mgr, state, want, have) {
                panic!("case {} {}: {}", i, state, e);
            }
        }
    }
}

#[test]
fn test_corrected_trunk_spelling_converges() {
    let mut config = ReconcileConfig::default();
    config.commands.legacy_trunk_link_type = false;
    let mgr = L2IntfMgr::with_config(config);
    for (want, have) in l2_cases() {
        for state in STATES {
            converge(&mgr, state, &want, &have).unwrap();
        }
    }
}

#[test]
fn test_converged_input_yields_nothing() {
    let l2 = L2IntfMgr::new();
    for (want, _) in l2_cases() {
        for state in [State::Merged, State::Replaced, State::Overridden] {
            assert!(l2.reconcile(state, &want, &want).unwrap().is_empty());
        }
    }

    let lag = LagMgr::new();
    for (want, _) in lag_cases() {
        for state in [State::Merged, State::Replaced, State::Overridden] {
            assert!(lag.reconcile(state, &want, &want).unwrap().is_empty());
        }
    }
}

#[test]
fn test_blocks_are_minimal() {
    let mgr = L2IntfMgr::new();
    for (want, have) in l2_cases() {
        for state in STATES {
            let commands = mgr.reconcile(state, &want, &have).unwrap();
            let blocks = split_blocks(&commands).unwrap();

            // at most one clear and one set block per interface, nothing
            // repeated inside a block
            for block in &blocks {
                let count = blocks.iter().filter(|b| b.interface == block.interface).count();
                assert!(count <= 2, "{} has {} blocks", block.interface, count);

                let mut seen = block.body.clone();
                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), block.body.len(), "repeated command in {:?}", block);
            }
        }
    }
}

#[test]
fn test_merged_and_replaced_touch_only_declared() {
    let mgr = L2IntfMgr::new();
    for (want, have) in l2_cases() {
        for state in [State::Merged, State::Replaced] {
            let commands = mgr.reconcile(state, &want, &have).unwrap();
            for block in split_blocks(&commands).unwrap() {
                assert!(
                    want.iter().any(|w| w.name.as_str() == block.interface),
                    "{} touched {}",
                    state,
                    block.interface
                );
            }
        }
    }
}

#[test]
fn test_deleted_all_leaves_nothing() {
    for (_, have) in l2_cases() {
        let result = converge(&L2IntfMgr::new(), State::Deleted, &[], &have).unwrap();
        assert!(result.facts.iter().all(|f| f.mode.is_none()));
    }
    for (_, have) in lag_cases() {
        let result = converge(&LagMgr::new(), State::Deleted, &[], &have).unwrap();
        assert!(result.facts.iter().all(|f| f.members().is_empty()));
    }
}

#[test]
fn test_deleted_all_undoes_every_configured_interface() {
    for (_, have) in l2_cases() {
        let commands = L2IntfMgr::new().reconcile(State::Deleted, &[], &have).unwrap();
        let blocks = split_blocks(&commands).unwrap();

        let configured: Vec<&str> = have
            .iter()
            .filter(|h| h.mode.is_some())
            .map(|h| h.name.as_str())
            .collect();
        let touched: Vec<&str> = blocks.iter().map(|b| b.interface.as_str()).collect();
        assert_eq!(touched, configured);
        for block in &blocks {
            assert!(block.body.iter().all(|c| c.starts_with("undo ")), "{:?}", block);
        }
    }

    for (_, have) in lag_cases() {
        let commands = LagMgr::new().reconcile(State::Deleted, &[], &have).unwrap();
        let blocks = split_blocks(&commands).unwrap();

        let populated: Vec<&str> = have
            .iter()
            .filter(|h| !h.members().is_empty())
            .map(|h| h.name.as_str())
            .collect();
        let touched: Vec<&str> = blocks.iter().map(|b| b.interface.as_str()).collect();
        assert_eq!(touched, populated);
        for block in &blocks {
            assert!(block.body.iter().all(|c| c.starts_with("undo ")), "{:?}", block);
        }
    }
}

#[test]
fn test_deleted_named_leaves_others() {
    let have = vec![
        port_fixtures::access("Eth1", 10),
        port_fixtures::trunk("Eth2", Some(20), Some("20-30")),
    ];
    let want = vec![port_fixtures::unconfigured("Eth2")];
    let result = converge(&L2IntfMgr::new(), State::Deleted, &want, &have).unwrap();
    assert_eq!(
        result.facts,
        vec![
            port_fixtures::access("Eth1", 10),
            port_fixtures::unconfigured("Eth2"),
        ]
    );
}

#[test]
fn test_record_holds_one_mode() {
    for extra in [
        r#""trunk": {"native_vlan": 2}"#,
        r#""hybrid": {"allowed_vlans": ["3"]}"#,
    ] {
        let doc = format!(r#"{{"name": "Eth1", "access": {{"vlan": 1}}, {}}}"#, extra);
        let err = serde_json::from_str::<L2Interface>(&doc).unwrap_err();
        assert!(err.to_string().contains("only one of access, trunk and hybrid"));
    }
}

/// Commands in `body` that configure a port kind other than `mode`
fn foreign_set_commands<'a>(mode: &PortMode, body: &'a [String]) -> Vec<&'a String> {
    let foreign: &[&str] = match mode {
        PortMode::Access(_) => &[
            "port trunk",
            "port hybrid",
            "port link-type trunk",
            "port lint-type trunk",
            "port link-type hybrid",
        ],
        PortMode::Trunk(_) => &[
            "port default vlan",
            "port hybrid",
            "port link-type access",
            "port link-type hybrid",
        ],
        PortMode::Hybrid(_) => &[
            "port default vlan",
            "port trunk",
            "port link-type access",
            "port link-type trunk",
            "port lint-type trunk",
        ],
    };
    body.iter()
        .filter(|c| foreign.iter().any(|prefix| c.starts_with(prefix)))
        .collect()
}

#[test]
fn test_set_commands_match_declared_mode() {
    let mgr = L2IntfMgr::new();
    for (want, have) in l2_cases() {
        for state in STATES {
            let commands = mgr.reconcile(state, &want, &have).unwrap();
            for block in split_blocks(&commands).unwrap() {
                let declared = want
                    .iter()
                    .find(|w| w.name.as_str() == block.interface)
                    .and_then(|w| w.mode.as_ref());
                let Some(mode) = declared else {
                    // undeclared interfaces are only ever cleared
                    assert!(block.body.iter().all(|c| c.starts_with("undo ")), "{:?}", block);
                    continue;
                };
                let foreign = foreign_set_commands(mode, &block.body);
                assert!(foreign.is_empty(), "{} {:?}: {:?}", state, mode, foreign);
            }
        }
    }
}

#[test]
fn test_mode_switch_sets_link_type_once() {
    let mgr = L2IntfMgr::new();
    for (want, have) in l2_cases() {
        let commands = mgr.reconcile(State::Replaced, &want, &have).unwrap();
        let mut device = SimulatedDevice::with_facts(&have);
        device.apply(&commands).unwrap();

        for block in split_blocks(&commands).unwrap() {
            let link_types = block
                .body
                .iter()
                .filter(|c| c.starts_with("port link-type") || c.starts_with("port lint-type"))
                .count();
            assert!(link_types <= 1, "{:?}", block);
        }
    }
}

#[test]
fn test_unordered_vlan_range_rejected() {
    let have = vec![port_fixtures::access("Eth1", 1)];
    let cases = [
        port_fixtures::trunk("Eth1", None, Some("20-10")),
        port_fixtures::trunk("Eth1", Some(5), Some("5,30-20")),
        port_fixtures::hybrid("Eth1", None, Some("9-9")),
    ];
    for want in cases {
        for state in [State::Merged, State::Replaced, State::Overridden] {
            let err = L2IntfMgr::new()
                .reconcile(state, std::slice::from_ref(&want), &have)
                .unwrap_err();
            assert!(
                matches!(err, CfgMgrError::InvalidVlanRange { .. }),
                "{:?}",
                err
            );
        }
    }
}

#[test]
fn test_first_token_vlan_check() {
    let mut config = ReconcileConfig::default();
    config.validation.vlan_range_check = VlanRangeCheck::FirstToken;
    let mgr = L2IntfMgr::with_config(config);
    let have = vec![port_fixtures::access("Eth1", 1)];

    let bad_first = vec![port_fixtures::trunk("Eth1", None, Some("20-10,30"))];
    assert!(mgr.reconcile(State::Merged, &bad_first, &have).is_err());

    let bad_later = vec![port_fixtures::trunk("Eth1", None, Some("30,20-10"))];
    let commands = mgr.reconcile(State::Merged, &bad_later, &have).unwrap();
    assert_eq!(commands.last().map(String::as_str), Some("quit"));
    assert!(commands.contains(&"port trunk allow-pass vlan 30 20 to 10".to_string()));
}

#[test]
fn test_missing_config_for_every_resource() {
    for state in [State::Merged, State::Replaced, State::Overridden] {
        let err = L2IntfMgr::new().reconcile(state, &[], &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("value of config parameter must not be empty for state {}", state)
        );
        assert!(LagMgr::new().reconcile(state, &[], &[]).is_err());
    }
    assert!(L2IntfMgr::new()
        .reconcile(State::Deleted, &[], &[])
        .unwrap()
        .is_empty());
}
