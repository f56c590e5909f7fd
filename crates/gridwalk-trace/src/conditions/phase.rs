use super::{ContextEntry, NetworkTraceCondition};
use crate::step::NetworkTraceStep;
use gridwalk_core::PhaseCode;
use gridwalk_network::Network;
use gridwalk_traversal::{ContextComputer, StepContext};

/// Restricts a trace to the paths of a set of nominal phases.
///
/// The phases still being followed are carried in step context under
/// [`PhaseCondition::CONTEXT_KEY`]. A start step follows the condition's
/// phases that its terminal carries. Each hop maps them through
/// [`Network::connectivity`], which pairs phases by name and then by
/// position. A successor is queued only if at least one phase survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseCondition {
    phases: PhaseCode,
}

impl PhaseCondition {
    /// Context key holding the [`PhaseCode`] followed at each step.
    pub const CONTEXT_KEY: &'static str = "gridwalk:phases";

    /// Follow `phases`.
    pub fn new(phases: PhaseCode) -> Self {
        Self { phases }
    }

    /// The phases followed from the start.
    pub fn phases(&self) -> PhaseCode {
        self.phases
    }

    /// Phases followed at a step with `context`.
    pub fn current(context: &StepContext) -> PhaseCode {
        context
            .data::<PhaseCode>(Self::CONTEXT_KEY)
            .copied()
            .unwrap_or(PhaseCode::NONE)
    }

    fn initial<D>(network: &Network, phases: PhaseCode, step: &NetworkTraceStep<D>) -> PhaseCode {
        network
            .terminal(step.to_terminal())
            .map_or(PhaseCode::NONE, |t| phases.intersection(t.phases()))
    }

    fn mapped<D>(network: &Network, from: PhaseCode, next: &NetworkTraceStep<D>) -> PhaseCode {
        network
            .connectivity(next.from_terminal(), next.to_terminal())
            .map_or(PhaseCode::NONE, |c| c.mapped_phases(from))
    }
}

impl<D> NetworkTraceCondition<D> for PhaseCondition {
    fn should_stop(&self, _: &Network, _: &NetworkTraceStep<D>, context: &StepContext) -> bool {
        Self::current(context).is_empty()
    }

    fn should_queue(&self, network: &Network, next: &NetworkTraceStep<D>, parent: &StepContext) -> bool {
        !Self::mapped(network, Self::current(parent), next).is_empty()
    }

    fn context_entry<'n>(&self, network: &'n Network) -> Option<ContextEntry<'n, D>>
    where
        D: 'n,
    {
        let phases = self.phases;
        let computer = ContextComputer::new(
            move |step: &NetworkTraceStep<D>| Self::initial(network, phases, step),
            move |previous: &PhaseCode, _: &NetworkTraceStep<D>, next: &NetworkTraceStep<D>| {
                Self::mapped(network, *previous, next)
            },
        );
        Some(ContextEntry {
            key: Self::CONTEXT_KEY.to_string(),
            computer: Box::new(computer),
        })
    }
}
