use super::NetworkTraceCondition;
use crate::step::NetworkTraceStep;
use gridwalk_core::{FeederDirection, NetworkState, TerminalId};
use gridwalk_network::Network;
use gridwalk_traversal::StepContext;

/// Keeps a trace flowing in one feeder direction.
///
/// After an internal hop the trace stops if the arrival terminal lacks the
/// direction. After a crossing hop it stops if none of the entered
/// equipment's other terminals carries it. Candidates are queued only when
/// the terminal they leave (crossing) or reach (internal) carries it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionCondition {
    direction: FeederDirection,
    state: NetworkState,
}

impl DirectionCondition {
    /// Follow `direction` as recorded for `state`.
    pub fn new(direction: FeederDirection, state: NetworkState) -> Self {
        Self { direction, state }
    }

    /// The direction followed.
    pub fn direction(&self) -> FeederDirection {
        self.direction
    }

    /// The network state whose directions are read.
    pub fn state(&self) -> NetworkState {
        self.state
    }

    fn carries(&self, network: &Network, terminal: TerminalId) -> bool {
        network
            .terminal(terminal)
            .is_ok_and(|t| t.feeder_direction(self.state).has(self.direction))
    }
}

impl<D> NetworkTraceCondition<D> for DirectionCondition {
    fn should_stop(&self, network: &Network, step: &NetworkTraceStep<D>, _: &StepContext) -> bool {
        if step.stepped_internally() {
            return !self.carries(network, step.to_terminal());
        }
        match network.other_terminals(step.to_terminal()) {
            Ok(others) => !others.iter().any(|&t| self.carries(network, t)),
            Err(_) => true,
        }
    }

    fn should_queue(&self, network: &Network, next: &NetworkTraceStep<D>, _: &StepContext) -> bool {
        if next.stepped_internally() {
            self.carries(network, next.to_terminal())
        } else {
            self.carries(network, next.from_terminal())
        }
    }
}
