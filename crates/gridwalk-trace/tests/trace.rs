//! End-to-end network trace behaviour over fixture networks.

use gridwalk_core::{
    EquipmentId, FeederDirection, NetworkError, NetworkState, PhaseCode, TerminalId, TraversalError,
};
use gridwalk_network::{EquipmentType, Network};
use gridwalk_test_utils::{line_chain, link, switch_chain, Chain};
use gridwalk_trace::{
    connected_equipment_trace, connected_terminal_trace, EquipmentFilter, NetworkTrace, TraceConfig,
};
use std::cell::RefCell;

fn equipment_visits(chain: &Chain, configure: impl FnOnce(&mut NetworkTrace<'_>), start: usize) -> Vec<EquipmentId> {
    let visited = RefCell::new(Vec::new());
    let mut trace = connected_equipment_trace(&chain.network);
    configure(&mut trace);
    trace.add_step_action(|step, _| visited.borrow_mut().push(step.to_equipment()));
    trace.run_from_equipment(chain.id(start), false).unwrap();
    drop(trace);
    visited.into_inner()
}

#[test]
fn breadth_first_step_limit_on_chain() {
    let chain = line_chain(5);
    let visited = RefCell::new(Vec::new());
    let mut trace = NetworkTrace::<()>::new(&chain.network, TraceConfig::equipment().breadth_first());
    trace
        .add_stop_condition(|step, _| step.n_equipment_steps() >= 2)
        .add_step_action(|step, _| visited.borrow_mut().push(step.to_equipment()));
    let stats = trace.run_from_equipment(chain.id(0), true).unwrap();
    drop(trace);

    assert_eq!(visited.into_inner(), vec![chain.id(0), chain.id(1), chain.id(2)]);
    assert_eq!(stats.queued, 2, "e3 is never queued");
    assert_eq!(stats.stopped, 1);
}

#[test]
fn limit_steps_matches_manual_stop() {
    let chain = line_chain(5);
    let visited = equipment_visits(&chain, |t| {
        t.limit_steps(2, None);
    }, 0);
    assert_eq!(visited, vec![chain.id(0), chain.id(1), chain.id(2)]);
}

#[test]
fn switch_limit_stops_at_second_switch() {
    let chain = switch_chain();
    let visited = equipment_visits(&chain, |t| {
        t.limit_steps(1, Some(EquipmentFilter::AnySwitch));
    }, 0);
    assert_eq!(visited, (0..4).map(|i| chain.id(i)).collect::<Vec<_>>());
}

#[test]
fn type_filter_counts_only_that_type() {
    let chain = switch_chain();
    let visited = equipment_visits(&chain, |t| {
        t.limit_steps(2, Some(EquipmentType::AcLineSegment.into()));
    }, 0);
    assert_eq!(visited, vec![chain.id(0), chain.id(1), chain.id(2)]);
}

fn orient(chain: &Chain, state: NetworkState) {
    for i in 0..chain.equipment.len() {
        let t0 = chain.network.terminal(chain.terminal(i, 0)).unwrap();
        let t1 = chain.network.terminal(chain.terminal(i, 1)).unwrap();
        t0.set_feeder_direction(state, FeederDirection::UPSTREAM);
        t1.set_feeder_direction(state, FeederDirection::DOWNSTREAM);
    }
}

#[test]
fn downstream_trace_ignores_upstream_side() {
    let chain = line_chain(4);
    orient(&chain, NetworkState::Normal);
    let visited = equipment_visits(&chain, |t| {
        t.normally_downstream();
    }, 1);
    assert_eq!(visited, vec![chain.id(1), chain.id(2), chain.id(3)]);

    // Current directions were never set.
    let visited = equipment_visits(&chain, |t| {
        t.currently_downstream();
    }, 1);
    assert_eq!(visited, vec![chain.id(1)]);
}

#[test]
fn upstream_trace_walks_towards_source() {
    let chain = line_chain(4);
    orient(&chain, NetworkState::Current);
    let visited = equipment_visits(&chain, |t| {
        t.currently_upstream();
    }, 2);
    assert_eq!(visited, vec![chain.id(2), chain.id(1), chain.id(0)]);
}

#[test]
fn both_direction_terminals_pass_either_way() {
    let chain = line_chain(3);
    for terminal in chain.network.terminals() {
        terminal.set_feeder_direction(NetworkState::Normal, FeederDirection::BOTH);
    }
    let mut down = equipment_visits(&chain, |t| {
        t.normally_downstream();
    }, 1);
    down.sort_by_key(|e| e.0);
    assert_eq!(down, chain.equipment);
}

#[test]
fn open_switch_is_visited_but_not_passed() {
    let mut chain = switch_chain();
    let open = chain.id(3);
    chain
        .network
        .set_open(open, NetworkState::Normal, None, true)
        .unwrap();

    let visited = equipment_visits(&chain, |t| {
        t.stop_at_normally_open(None);
    }, 0);
    assert_eq!(visited, (0..4).map(|i| chain.id(i)).collect::<Vec<_>>());

    let visited = equipment_visits(&chain, |t| {
        t.stop_at_currently_open(None);
    }, 0);
    assert_eq!(visited.len(), 5, "switch is closed in the current state");
}

#[test]
fn open_on_other_phase_does_not_stop_phase_test() {
    let mut chain = switch_chain();
    chain
        .network
        .set_open(chain.id(3), NetworkState::Normal, Some(gridwalk_core::SinglePhaseKind::B), true)
        .unwrap();
    let visited = equipment_visits(&chain, |t| {
        t.stop_at_normally_open(Some(gridwalk_core::SinglePhaseKind::A));
    }, 0);
    assert_eq!(visited.len(), 5);

    let visited = equipment_visits(&chain, |t| {
        t.stop_at_normally_open(None);
    }, 0);
    assert_eq!(visited.len(), 4);
}

#[test]
fn terminal_trace_stops_on_entering_open_switch() {
    let mut chain = switch_chain();
    chain
        .network
        .set_open(chain.id(3), NetworkState::Normal, None, true)
        .unwrap();
    let visited = RefCell::new(Vec::new());
    let mut trace = connected_terminal_trace(&chain.network);
    trace
        .stop_at_normally_open(None)
        .add_step_action(|step, _| visited.borrow_mut().push(step.to_terminal()));
    trace.run_from_terminal(chain.terminal(0, 1), true, None).unwrap();
    drop(trace);

    let expected: Vec<TerminalId> = vec![
        chain.terminal(0, 1),
        chain.terminal(1, 0),
        chain.terminal(1, 1),
        chain.terminal(2, 0),
        chain.terminal(2, 1),
        chain.terminal(3, 0),
    ];
    assert_eq!(visited.into_inner(), expected);
}

/// `source` feeds a junction with an A-only branch and a BC branch.
fn split_phases() -> (Network, [EquipmentId; 4]) {
    let mut network = Network::new();
    let source = network
        .add_equipment("source", EquipmentType::EnergySource, &[PhaseCode::ABC])
        .unwrap();
    let junction = network
        .add_equipment("junction", EquipmentType::Junction, &[PhaseCode::ABC; 3])
        .unwrap();
    let a_branch = network
        .add_equipment("a", EquipmentType::AcLineSegment, &[PhaseCode::A, PhaseCode::A])
        .unwrap();
    let bc_branch = network
        .add_equipment("bc", EquipmentType::AcLineSegment, &[PhaseCode::BC, PhaseCode::BC])
        .unwrap();
    link(&mut network, source, 0, junction, 0);
    link(&mut network, junction, 1, a_branch, 0);
    link(&mut network, junction, 2, bc_branch, 0);
    (network, [source, junction, a_branch, bc_branch])
}

fn phase_visits(network: &Network, source: EquipmentId, phases: PhaseCode) -> Vec<(EquipmentId, PhaseCode)> {
    let visited = RefCell::new(Vec::new());
    let mut trace = connected_equipment_trace(network);
    trace.with_phases(phases).add_step_action(|step, ctx| {
        let followed = ctx.data::<PhaseCode>("gridwalk:phases").copied().unwrap();
        visited.borrow_mut().push((step.to_equipment(), followed));
    });
    trace.run_from_equipment(source, true).unwrap();
    drop(trace);
    visited.into_inner()
}

#[test]
fn phase_condition_follows_matching_branches() {
    let (network, [source, junction, a_branch, bc_branch]) = split_phases();

    let visited = phase_visits(&network, source, PhaseCode::A);
    assert_eq!(
        visited,
        vec![(source, PhaseCode::A), (junction, PhaseCode::A), (a_branch, PhaseCode::A)]
    );

    let visited = phase_visits(&network, source, PhaseCode::C);
    assert_eq!(
        visited,
        vec![(source, PhaseCode::C), (junction, PhaseCode::C), (bc_branch, PhaseCode::C)]
    );
}

#[test]
fn phase_condition_stops_where_nothing_is_followed() {
    let (network, [source, ..]) = split_phases();
    let visited = phase_visits(&network, source, PhaseCode::XY);
    assert_eq!(visited, vec![(source, PhaseCode::NONE)]);
}

#[test]
fn reset_allows_rerun_with_same_conditions() {
    let chain = line_chain(4);
    let count = RefCell::new(0);
    let mut trace = connected_equipment_trace(&chain.network);
    trace.limit_steps(1, None).add_step_action(|_, _| *count.borrow_mut() += 1);
    trace.run_from_equipment(chain.id(0), true).unwrap();
    trace.reset().unwrap();
    trace.run_from_equipment(chain.id(3), true).unwrap();
    drop(trace);
    assert_eq!(count.into_inner(), 4);
}

#[test]
fn orphan_terminal_on_a_node_aborts_the_run() {
    let mut chain = line_chain(2);
    let end = chain.terminal(1, 1);
    let orphan = chain.network.add_terminal(PhaseCode::ABC);
    chain.network.connect_terminals(end, orphan).unwrap();

    let result = connected_equipment_trace(&chain.network).run_from_equipment(chain.id(0), true);
    assert_eq!(
        result,
        Err(TraversalError::Network(NetworkError::MissingConductingEquipment {
            terminal: orphan
        }))
    );
}
