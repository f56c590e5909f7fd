//! Feeder direction tracing.

use gridwalk_core::{FeederDirection, NetworkState, TerminalId, TraversalError};
use gridwalk_network::Network;
use gridwalk_trace::{NetworkTrace, OpenCondition, TraceConfig};
use gridwalk_traversal::TraversalStats;
use tracing::debug;

/// Records the feeder direction of terminals for one network state.
///
/// A terminal trace runs out from a feeder head, stopping at switches open
/// in that state. The head terminal is marked downstream. A terminal
/// entered across a connectivity node faces the source and is marked
/// upstream; a terminal reached through its own equipment faces away from
/// it and is marked downstream. Directions are merged into what is
/// already recorded, so a terminal traced from two heads can carry both.
/// Within one trace each terminal is visited once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetDirection {
    state: NetworkState,
}

impl SetDirection {
    /// Direction tracing for `state`.
    pub fn new(state: NetworkState) -> Self {
        Self { state }
    }

    /// The network state written.
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Trace from the head of every feeder that has one.
    pub fn run(&self, network: &Network) -> Result<(), TraversalError> {
        let heads: Vec<TerminalId> = network.feeders().filter_map(|f| f.head_terminal()).collect();
        for head in heads {
            self.run_terminal(network, head)?;
        }
        Ok(())
    }

    /// Trace from `head`.
    pub fn run_terminal(&self, network: &Network, head: TerminalId) -> Result<TraversalStats, TraversalError> {
        let state = self.state;
        let mut trace = NetworkTrace::<()>::new(network, TraceConfig::terminal());
        trace
            .add_condition(OpenCondition::new(state, None))
            .add_fallible_step_action(move |step, _| {
                let direction = if step.is_start() || step.stepped_internally() {
                    FeederDirection::DOWNSTREAM
                } else {
                    FeederDirection::UPSTREAM
                };
                network
                    .terminal(step.to_terminal())?
                    .add_feeder_direction(state, direction);
                Ok(())
            });
        let stats = trace.run_from_terminal(head, false, None)?;
        debug!(%head, %state, terminals = stats.visited, "feeder direction set");
        Ok(stats)
    }

    /// Clear the recorded direction of every terminal for this state.
    pub fn clear(&self, network: &Network) {
        for terminal in network.terminals() {
            terminal.set_feeder_direction(self.state, FeederDirection::NONE);
        }
    }
}
