use super::NetworkTraceCondition;
use crate::step::NetworkTraceStep;
use gridwalk_core::{EquipmentId, NetworkState, SinglePhaseKind};
use gridwalk_network::Network;
use gridwalk_traversal::StepContext;

/// Stops a trace at open switches.
///
/// A crossing hop stops on arrival at open equipment, so the open switch
/// itself is visited. An internal hop is never queued through open
/// equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenCondition {
    state: NetworkState,
    phase: Option<SinglePhaseKind>,
}

impl OpenCondition {
    /// Test openness in `state`, on `phase` only or on any phase.
    pub fn new(state: NetworkState, phase: Option<SinglePhaseKind>) -> Self {
        Self { state, phase }
    }

    /// The network state tested.
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// The single phase tested, if restricted.
    pub fn phase(&self) -> Option<SinglePhaseKind> {
        self.phase
    }

    fn is_open(&self, network: &Network, equipment: EquipmentId) -> bool {
        network
            .equipment(equipment)
            .is_ok_and(|e| e.is_open(self.state, self.phase))
    }
}

impl<D> NetworkTraceCondition<D> for OpenCondition {
    fn should_stop(&self, network: &Network, step: &NetworkTraceStep<D>, _: &StepContext) -> bool {
        if step.stepped_internally() {
            self.is_open(network, step.from_equipment())
        } else {
            self.is_open(network, step.to_equipment())
        }
    }

    fn should_queue(&self, network: &Network, next: &NetworkTraceStep<D>, _: &StepContext) -> bool {
        !next.stepped_internally() || !self.is_open(network, next.to_equipment())
    }
}
