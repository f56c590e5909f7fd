//! Feeder membership from feeder heads.

use gridwalk_core::{EquipmentId, FeederId, NetworkState, TerminalId, TraversalError};
use gridwalk_network::Network;
use gridwalk_trace::{NetworkTrace, OpenCondition, TraceConfig};
use indexmap::IndexSet;
use std::cell::RefCell;
use tracing::debug;

/// Assigns equipment to feeders by tracing out from each feeder's head
/// terminal.
///
/// The trace steps terminal by terminal, so it leaves the head equipment
/// only through the head terminal and never walks back towards the
/// source. It stops at switches open in the configured state; the open
/// switch itself is assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssignToFeeders {
    state: NetworkState,
}

impl AssignToFeeders {
    /// Assignment respecting switch positions in `state`.
    pub fn new(state: NetworkState) -> Self {
        Self { state }
    }

    /// Reassign every feeder of `network`.
    pub fn run(&self, network: &mut Network) -> Result<(), TraversalError> {
        let feeders: Vec<FeederId> = network.feeders().map(|f| f.id()).collect();
        for feeder in feeders {
            self.run_feeder(network, feeder)?;
        }
        Ok(())
    }

    /// Replace the membership of `feeder` with the equipment reachable from
    /// its head. A feeder without a head is emptied.
    pub fn run_feeder(&self, network: &mut Network, feeder: FeederId) -> Result<Vec<EquipmentId>, TraversalError> {
        let reached = match network.feeder(feeder)?.head_terminal() {
            Some(head) => self.reachable(network, head)?,
            None => Vec::new(),
        };
        network.clear_feeder(feeder)?;
        for &equipment in &reached {
            network.assign_to_feeder(feeder, equipment)?;
        }
        debug!(%feeder, equipment = reached.len(), "feeder assigned");
        Ok(reached)
    }

    /// Equipment reachable from `head` without passing an open switch, in
    /// visit order.
    pub fn reachable(&self, network: &Network, head: TerminalId) -> Result<Vec<EquipmentId>, TraversalError> {
        let reached = RefCell::new(IndexSet::new());
        let mut trace = NetworkTrace::<()>::new(network, TraceConfig::terminal());
        trace
            .add_condition(OpenCondition::new(self.state, None))
            .add_step_action(|step, _| {
                reached.borrow_mut().insert(step.to_equipment());
            });
        trace.run_from_terminal(head, false, None)?;
        drop(trace);
        Ok(reached.into_inner().into_iter().collect())
    }
}
