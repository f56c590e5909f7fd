//! Reusable trace policies.
//!
//! A condition contributes up to three hooks to a trace: a stop test, a
//! queue test and a named context computer for state it carries from step
//! to step. [`NetworkTrace::add_condition`](crate::NetworkTrace::add_condition)
//! registers all three.
//!
//! Conditions compose independently. Queue tests are ANDed; stop tests are
//! ORed with every test always evaluated.

mod direction;
mod open;
mod phase;
mod step_limit;

pub use direction::DirectionCondition;
pub use open::OpenCondition;
pub use phase::PhaseCondition;
pub use step_limit::{EquipmentFilter, EquipmentStepLimitCondition};

use crate::step::NetworkTraceStep;
use gridwalk_network::Network;
use gridwalk_traversal::{ComputeNextContext, StepContext};

/// A named context computer contributed by a condition.
pub struct ContextEntry<'n, D> {
    /// Key the values are stored under in [`StepContext`].
    pub key: String,
    /// Produces the value for each step.
    pub computer: Box<dyn ComputeNextContext<NetworkTraceStep<D>> + 'n>,
}

/// A policy plugged into a [`NetworkTrace`](crate::NetworkTrace).
pub trait NetworkTraceCondition<D> {
    /// Whether the trace should stop expanding past `step`.
    fn should_stop(&self, network: &Network, step: &NetworkTraceStep<D>, context: &StepContext) -> bool {
        let _ = (network, step, context);
        false
    }

    /// Whether `next` may be queued. `parent` is the context of the step
    /// that produced it.
    fn should_queue(&self, network: &Network, next: &NetworkTraceStep<D>, parent: &StepContext) -> bool {
        let _ = (network, next, parent);
        true
    }

    /// The context computer this condition needs, if it carries state.
    fn context_entry<'n>(&self, network: &'n Network) -> Option<ContextEntry<'n, D>>
    where
        D: 'n,
    {
        let _ = network;
        None
    }
}
