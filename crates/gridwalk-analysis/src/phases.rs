//! Traced phase energisation and removal.

use gridwalk_core::{
    NetworkState, PhaseCode, PhaseDirection, SinglePhaseKind, TerminalId, TraversalError,
};
use gridwalk_network::Network;
use gridwalk_trace::{NetworkTrace, NetworkTraceStep, OpenCondition, PhaseCondition, TraceConfig};
use gridwalk_traversal::{ContextComputer, StepContext, TraversalStats};
use tracing::{debug, warn};

/// Energises traced phases outward from a source terminal.
///
/// The start terminal's nominal phases are energised `OUT` with the
/// physical phase of the same name. Every hop then carries the physical
/// phase of each followed nominal phase along the nominal phase paths of
/// [`Network::connectivity`]. A terminal entered across a connectivity
/// node receives `IN`; a terminal reached through its own equipment
/// receives `OUT`.
///
/// A slot already energised from a different physical phase aborts the
/// run with [`TraversalError::Phase`]. Open switches in the chosen state
/// stop the trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetPhases {
    state: NetworkState,
}

impl SetPhases {
    /// Energisation of the `state` tables.
    pub fn new(state: NetworkState) -> Self {
        Self { state }
    }

    /// The network state written.
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Energise from the head of every feeder that has one.
    pub fn run(&self, network: &Network) -> Result<(), TraversalError> {
        let heads: Vec<TerminalId> = network.feeders().filter_map(|f| f.head_terminal()).collect();
        for head in heads {
            self.run_from(network, head)?;
        }
        Ok(())
    }

    /// Energise every nominal phase of `start`.
    pub fn run_from(&self, network: &Network, start: TerminalId) -> Result<TraversalStats, TraversalError> {
        let phases = network.terminal(start)?.phases();
        self.run_with_phases(network, start, phases)
    }

    /// Energise `phases` of `start`.
    pub fn run_with_phases(
        &self,
        network: &Network,
        start: TerminalId,
        phases: PhaseCode,
    ) -> Result<TraversalStats, TraversalError> {
        let state = self.state;
        let mut trace = NetworkTrace::<()>::new(network, TraceConfig::terminal());
        trace
            .with_phases(phases)
            .add_condition(OpenCondition::new(state, None))
            .add_fallible_step_action(move |step, ctx| {
                energise(network, state, step, PhaseCondition::current(ctx))
            });
        let stats = trace.run_from_terminal(start, false, None)?;
        debug!(%start, %phases, %state, terminals = stats.visited, "phases set");
        Ok(stats)
    }
}

fn energise(
    network: &Network,
    state: NetworkState,
    step: &NetworkTraceStep,
    followed: PhaseCode,
) -> Result<(), TraversalError> {
    let to = network.terminal(step.to_terminal())?.traced_phases().table(state);
    if step.is_start() {
        for phase in followed.single_phases() {
            to.add(phase, PhaseDirection::OUT, phase)?;
        }
        return Ok(());
    }

    let from = network.terminal(step.from_terminal())?.traced_phases().table(state);
    let direction = if step.stepped_internally() {
        PhaseDirection::OUT
    } else {
        PhaseDirection::IN
    };
    let connectivity = network.connectivity(step.from_terminal(), step.to_terminal())?;
    for path in connectivity.nominal_phase_paths {
        if !followed.contains(path.to) {
            continue;
        }
        let physical = from.phase(path.from)?;
        if physical == SinglePhaseKind::None {
            continue;
        }
        if let Err(e) = to.add(path.to, direction, physical) {
            warn!(terminal = %step.to_terminal(), error = %e, "phase conflict");
            return Err(e.into());
        }
    }
    Ok(())
}

/// Clears traced phases outward from a terminal.
///
/// Removal retraces energisation: the start terminal loses `OUT`, a
/// terminal entered across a connectivity node loses `IN` and a terminal
/// reached through its own equipment loses `OUT`. The nominal phases still
/// being removed are carried in step context under
/// [`RemovePhases::CONTEXT_KEY`] and only phases actually held in the
/// matching direction move on.
///
/// A terminal on the far side of a node that holds a phase in both
/// directions is fed from elsewhere as well. With one such terminal the
/// phase is removed from it alone. With two or more the phase stops at the
/// node. Open switches in the chosen state stop the trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemovePhases {
    state: NetworkState,
}

impl RemovePhases {
    /// Context key holding the [`PhaseCode`] removed at each step.
    pub const CONTEXT_KEY: &'static str = "gridwalk:removing";

    /// Removal from the `state` tables.
    pub fn new(state: NetworkState) -> Self {
        Self { state }
    }

    /// The network state cleared.
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Remove every nominal phase of `start` outward.
    pub fn run_from(&self, network: &Network, start: TerminalId) -> Result<TraversalStats, TraversalError> {
        let phases = network.terminal(start)?.phases();
        self.run_with_phases(network, start, phases)
    }

    /// Remove `phases` of `start` outward.
    pub fn run_with_phases(
        &self,
        network: &Network,
        start: TerminalId,
        phases: PhaseCode,
    ) -> Result<TraversalStats, TraversalError> {
        let state = self.state;
        let computer = ContextComputer::new(
            move |step: &NetworkTraceStep| held(network, state, phases, step.to_terminal(), PhaseDirection::OUT),
            move |previous: &PhaseCode, _: &NetworkTraceStep, next: &NetworkTraceStep| {
                removing(network, state, *previous, next)
            },
        );

        let mut trace = NetworkTrace::<()>::new(network, TraceConfig::terminal());
        trace
            .add_compute_next_context(Self::CONTEXT_KEY, computer)
            .add_condition(OpenCondition::new(state, None))
            .add_stop_condition(|_, ctx| Self::current(ctx).is_empty())
            .add_queue_condition(move |next, parent| {
                !removing(network, state, Self::current(parent), next).is_empty()
            })
            .add_fallible_step_action(move |step, ctx| ebb(network, state, step, Self::current(ctx)));
        let stats = trace.run_from_terminal(start, false, None)?;
        debug!(%start, %phases, %state, terminals = stats.visited, "phases removed");
        Ok(stats)
    }

    /// Phases removed at a step with `context`.
    pub fn current(context: &StepContext) -> PhaseCode {
        context
            .data::<PhaseCode>(Self::CONTEXT_KEY)
            .copied()
            .unwrap_or(PhaseCode::NONE)
    }

    /// Clear the `state` table of every terminal in `network`.
    pub fn remove_all(&self, network: &Network) {
        for terminal in network.terminals() {
            terminal.traced_phases().table(self.state).clear();
        }
    }
}

/// Direction a step strips from its arrival terminal.
fn ebb_direction(step: &NetworkTraceStep) -> PhaseDirection {
    if step.stepped_internally() {
        PhaseDirection::OUT
    } else {
        PhaseDirection::IN
    }
}

/// Nominal phases of `phases` that `terminal` holds in `direction`.
fn held(
    network: &Network,
    state: NetworkState,
    phases: PhaseCode,
    terminal: TerminalId,
    direction: PhaseDirection,
) -> PhaseCode {
    let Ok(terminal) = network.terminal(terminal) else {
        return PhaseCode::NONE;
    };
    let table = terminal.traced_phases().table(state);
    phases
        .intersection(terminal.phases())
        .single_phases()
        .into_iter()
        .filter(|&nominal| table.direction(nominal).is_ok_and(|d| d.has(direction)))
        .collect()
}

/// Phases `next` removes when its parent removed `previous`.
fn removing(network: &Network, state: NetworkState, previous: PhaseCode, next: &NetworkTraceStep) -> PhaseCode {
    let (from, to) = (next.from_terminal(), next.to_terminal());
    let Ok(connectivity) = network.connectivity(from, to) else {
        return PhaseCode::NONE;
    };
    let direction = ebb_direction(next);
    let mapped = if next.stepped_internally() {
        connectivity.mapped_phases(previous)
    } else {
        connectivity
            .nominal_phase_paths
            .iter()
            .filter(|path| previous.contains(path.from))
            .filter(|path| {
                let feeds = other_feeds(network, state, from, path.from);
                feeds.is_empty() || feeds == [to]
            })
            .map(|path| path.to)
            .collect()
    };
    held(network, state, mapped, to, direction)
}

/// Terminals across the node from `from` that hold the path of `nominal`
/// in both directions.
fn other_feeds(network: &Network, state: NetworkState, from: TerminalId, nominal: SinglePhaseKind) -> Vec<TerminalId> {
    let Ok(results) = network.connected_results(from) else {
        return Vec::new();
    };
    results
        .into_iter()
        .filter(|result| {
            result
                .nominal_phase_paths
                .iter()
                .filter(|path| path.from == nominal)
                .any(|path| {
                    network.terminal(result.to_terminal).is_ok_and(|t| {
                        t.traced_phases().table(state).direction(path.to) == Ok(PhaseDirection::BOTH)
                    })
                })
        })
        .map(|result| result.to_terminal)
        .collect()
}

fn ebb(network: &Network, state: NetworkState, step: &NetworkTraceStep, removing: PhaseCode) -> Result<(), TraversalError> {
    let table = network.terminal(step.to_terminal())?.traced_phases().table(state);
    let direction = ebb_direction(step);
    for nominal in removing.single_phases() {
        let physical = table.phase(nominal)?;
        table.remove(nominal, direction, physical)?;
    }
    Ok(())
}
