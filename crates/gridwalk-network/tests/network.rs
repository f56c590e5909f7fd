//! Integration tests for network construction and connectivity queries.

use gridwalk_core::{EquipmentId, NetworkError, NetworkState, PhaseCode, SinglePhaseKind};
use gridwalk_network::{EquipmentType, Network};

fn two_lines() -> (Network, EquipmentId, EquipmentId) {
    let mut network = Network::new();
    let a = network
        .add_equipment("a", EquipmentType::AcLineSegment, &[PhaseCode::ABC, PhaseCode::ABC])
        .unwrap();
    let b = network
        .add_equipment("b", EquipmentType::AcLineSegment, &[PhaseCode::ABC, PhaseCode::ABC])
        .unwrap();
    let a2 = network.equipment(a).unwrap().terminals()[1];
    let b1 = network.equipment(b).unwrap().terminals()[0];
    network.connect_terminals(a2, b1).unwrap();
    (network, a, b)
}

#[test]
fn terminals_get_sequence_numbers() {
    let (network, a, _) = two_lines();
    let terminals = network.equipment(a).unwrap().terminals();
    assert_eq!(network.terminal(terminals[0]).unwrap().sequence_number(), 1);
    assert_eq!(network.terminal(terminals[1]).unwrap().sequence_number(), 2);
}

#[test]
fn duplicate_mrid_rejected() {
    let (mut network, _, _) = two_lines();
    let err = network
        .add_equipment("a", EquipmentType::Junction, &[PhaseCode::A])
        .unwrap_err();
    assert_eq!(err, NetworkError::DuplicateMrid("a".into()));
    assert_eq!(network.find_equipment("b"), Some(EquipmentId(1)));
}

#[test]
fn reattaching_terminal_to_other_equipment_fails() {
    let (mut network, a, b) = two_lines();
    let a1 = network.equipment(a).unwrap().terminals()[0];
    let err = network.attach_terminal(b, a1).unwrap_err();
    assert!(matches!(err, NetworkError::EquipmentAlreadyAssigned { .. }));
    assert_eq!(network.equipment(b).unwrap().terminals().len(), 2);
}

#[test]
fn orphan_terminal_has_no_equipment() {
    let mut network = Network::new();
    let t = network.add_terminal(PhaseCode::A);
    assert_eq!(
        network.other_terminals(t).unwrap_err(),
        NetworkError::MissingConductingEquipment { terminal: t }
    );
}

#[test]
fn connected_terminals_exclude_own_equipment() {
    let mut network = Network::new();
    let bus = network
        .add_equipment("bus", EquipmentType::Junction, &[PhaseCode::ABC, PhaseCode::ABC])
        .unwrap();
    let line = network
        .add_equipment("line", EquipmentType::AcLineSegment, &[PhaseCode::ABC, PhaseCode::ABC])
        .unwrap();
    let bus_ts = network.equipment(bus).unwrap().terminals().to_vec();
    let line_t = network.equipment(line).unwrap().terminals()[0];

    let node = network.add_node();
    network.connect(bus_ts[0], node).unwrap();
    network.connect(bus_ts[1], node).unwrap();
    network.connect(line_t, node).unwrap();

    assert_eq!(network.connected_terminals(bus_ts[0]).unwrap().as_slice(), &[line_t]);
    assert_eq!(
        network.connected_terminals(line_t).unwrap().as_slice(),
        bus_ts.as_slice()
    );
}

#[test]
fn other_terminals_and_connected_equipment() {
    let (network, a, b) = two_lines();
    let a_ts = network.equipment(a).unwrap().terminals();
    assert_eq!(network.other_terminals(a_ts[0]).unwrap().as_slice(), &[a_ts[1]]);
    assert_eq!(network.connected_equipment(a).unwrap(), vec![b]);
}

#[test]
fn disconnect_removes_from_node() {
    let (mut network, a, b) = two_lines();
    let a2 = network.equipment(a).unwrap().terminals()[1];
    network.disconnect(a2).unwrap();
    assert!(!network.terminal(a2).unwrap().is_connected());
    assert!(network.connected_equipment(b).unwrap().is_empty());
}

#[test]
fn only_switches_accept_open_state() {
    let (mut network, a, _) = two_lines();
    assert_eq!(
        network.set_open(a, NetworkState::Normal, None, true),
        Err(NetworkError::NotASwitch(a))
    );
    let cb = network
        .add_equipment("cb", EquipmentType::Breaker, &[PhaseCode::ABC, PhaseCode::ABC])
        .unwrap();
    network
        .set_open(cb, NetworkState::Normal, Some(SinglePhaseKind::C), true)
        .unwrap();
    let breaker = network.equipment(cb).unwrap();
    assert!(breaker.is_open(NetworkState::Normal, None));
    assert!(!breaker.is_open(NetworkState::Normal, Some(SinglePhaseKind::A)));
}

#[test]
fn feeder_assignment_is_tracked_both_ways() {
    let (mut network, a, b) = two_lines();
    let head = network.equipment(a).unwrap().terminals()[0];
    let feeder = network.add_feeder("fdr", Some(head)).unwrap();
    assert!(network.assign_to_feeder(feeder, a).unwrap());
    assert!(network.assign_to_feeder(feeder, b).unwrap());
    assert!(!network.assign_to_feeder(feeder, a).unwrap());
    assert_eq!(network.equipment(b).unwrap().feeders(), &[feeder]);

    network.clear_feeder(feeder).unwrap();
    assert!(network.feeder(feeder).unwrap().equipment().is_empty());
    assert!(network.equipment(a).unwrap().feeders().is_empty());
}

#[test]
fn clearing_one_feeder_keeps_the_other() {
    let (mut network, a, _) = two_lines();
    let first = network.add_feeder("first", None).unwrap();
    let second = network.add_feeder("second", None).unwrap();
    network.assign_to_feeder(first, a).unwrap();
    network.assign_to_feeder(second, a).unwrap();

    network.clear_feeder(first).unwrap();
    assert_eq!(network.equipment(a).unwrap().feeders(), &[second]);
    assert!(network.feeder(second).unwrap().equipment().contains(&a));
}
