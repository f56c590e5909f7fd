//! [`NetworkTrace`], the fluent network trace builder.

use crate::conditions::{
    DirectionCondition, EquipmentFilter, EquipmentStepLimitCondition, NetworkTraceCondition, OpenCondition,
    PhaseCondition,
};
use crate::config::TraceConfig;
use crate::step::NetworkTraceStep;
use crate::stepping::{NetworkStepper, Stepping};
use gridwalk_core::{
    EquipmentId, FeederDirection, NetworkState, PhaseCode, SinglePhaseKind, TerminalId, TraversalError,
};
use gridwalk_network::Network;
use gridwalk_traversal::{
    BasicQueue, ComputeNextContext, KeyedTracker, StepContext, Traversal, TraversalState, TraversalStats,
};
use std::rc::Rc;
use tracing::debug;

/// The engine a [`NetworkTrace`] drives.
pub type StepTraversal<'a, D> = Traversal<'a, NetworkTraceStep<D>, NetworkStepper<'a, D>>;

/// A traversal over a [`Network`] with conditions registered fluently.
///
/// Visits are tracked per equipment with [`Stepping::Equipment`] and per
/// terminal with [`Stepping::Terminal`]. Like the engine it wraps, a trace
/// runs once per [`reset`](Self::reset).
///
/// # Examples
///
/// ```
/// use gridwalk_core::PhaseCode;
/// use gridwalk_network::{EquipmentType, Network};
/// use gridwalk_trace::connected_equipment_trace;
/// use std::cell::RefCell;
///
/// let mut network = Network::new();
/// let phases = [PhaseCode::ABC, PhaseCode::ABC];
/// let a = network.add_equipment("a", EquipmentType::AcLineSegment, &phases).unwrap();
/// let b = network.add_equipment("b", EquipmentType::AcLineSegment, &phases).unwrap();
/// let a1 = network.equipment(a).unwrap().terminals()[1];
/// let b0 = network.equipment(b).unwrap().terminals()[0];
/// network.connect_terminals(a1, b0).unwrap();
///
/// let visited = RefCell::new(Vec::new());
/// let mut trace = connected_equipment_trace(&network);
/// trace.add_step_action(|step, _| visited.borrow_mut().push(step.to_equipment()));
/// trace.run_from_equipment(a, true).unwrap();
/// assert_eq!(*visited.borrow(), vec![a, b]);
/// ```
pub struct NetworkTrace<'a, D = ()> {
    network: &'a Network,
    config: TraceConfig,
    traversal: StepTraversal<'a, D>,
}

impl<'a, D: 'a> NetworkTrace<'a, D> {
    /// Create a trace over `network`.
    pub fn new(network: &'a Network, config: TraceConfig) -> Self {
        let stepper = NetworkStepper::new(network, config.stepping);
        let queue = BasicQueue::new(config.discipline);
        let traversal = match config.stepping {
            Stepping::Equipment => Traversal::new(
                stepper,
                queue,
                KeyedTracker::new(|step: &NetworkTraceStep<D>| step.to_equipment()),
            ),
            Stepping::Terminal => Traversal::new(
                stepper,
                queue,
                KeyedTracker::new(|step: &NetworkTraceStep<D>| step.to_terminal()),
            ),
        };
        Self {
            network,
            config,
            traversal,
        }
    }

    /// The network walked.
    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// The configuration the trace was built with.
    pub fn config(&self) -> TraceConfig {
        self.config
    }

    /// The underlying engine.
    pub fn traversal(&self) -> &StepTraversal<'a, D> {
        &self.traversal
    }

    /// The underlying engine, for hooks not exposed here.
    pub fn traversal_mut(&mut self) -> &mut StepTraversal<'a, D> {
        &mut self.traversal
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TraversalState {
        self.traversal.state()
    }

    /// Counters for the current or most recent run.
    pub fn stats(&self) -> &TraversalStats {
        self.traversal.stats()
    }

    // ── Conditions ──────────────────────────────────────────────

    /// Install the function computing each successor's payload from its
    /// parent step, its arrival terminal and the parent's context.
    pub fn set_compute_data<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&NetworkTraceStep<D>, TerminalId, &StepContext) -> D + 'a,
    {
        self.traversal.queue_next_mut().set_compute_data(f);
        self
    }

    /// Register every hook of `condition`.
    pub fn add_condition<C>(&mut self, condition: C) -> &mut Self
    where
        C: NetworkTraceCondition<D> + 'a,
    {
        let network = self.network;
        let condition = Rc::new(condition);
        if let Some(entry) = condition.context_entry(network) {
            self.traversal.add_compute_next_context(entry.key, entry.computer);
        }
        let stop = Rc::clone(&condition);
        self.traversal
            .add_stop_condition(move |step, context| stop.should_stop(network, step, context));
        self.traversal
            .add_queue_condition(move |next, parent| condition.should_queue(network, next, parent));
        self
    }

    /// Follow the normal upstream direction.
    pub fn normally_upstream(&mut self) -> &mut Self {
        self.add_condition(DirectionCondition::new(FeederDirection::UPSTREAM, NetworkState::Normal))
    }

    /// Follow the current upstream direction.
    pub fn currently_upstream(&mut self) -> &mut Self {
        self.add_condition(DirectionCondition::new(FeederDirection::UPSTREAM, NetworkState::Current))
    }

    /// Follow the normal downstream direction.
    pub fn normally_downstream(&mut self) -> &mut Self {
        self.add_condition(DirectionCondition::new(FeederDirection::DOWNSTREAM, NetworkState::Normal))
    }

    /// Follow the current downstream direction.
    pub fn currently_downstream(&mut self) -> &mut Self {
        self.add_condition(DirectionCondition::new(FeederDirection::DOWNSTREAM, NetworkState::Current))
    }

    /// Stop at equipment that is normally open, on `phase` or on any phase.
    pub fn stop_at_normally_open(&mut self, phase: Option<SinglePhaseKind>) -> &mut Self {
        self.add_condition(OpenCondition::new(NetworkState::Normal, phase))
    }

    /// Stop at equipment that is currently open, on `phase` or on any phase.
    pub fn stop_at_currently_open(&mut self, phase: Option<SinglePhaseKind>) -> &mut Self {
        self.add_condition(OpenCondition::new(NetworkState::Current, phase))
    }

    /// Stop after `limit` equipment steps, counting only equipment that
    /// passes `filter` when one is given.
    pub fn limit_steps(&mut self, limit: u32, filter: Option<EquipmentFilter>) -> &mut Self {
        self.add_condition(EquipmentStepLimitCondition::new(limit, filter))
    }

    /// Follow only the paths of `phases`.
    pub fn with_phases(&mut self, phases: PhaseCode) -> &mut Self {
        self.add_condition(PhaseCondition::new(phases))
    }

    // ── Engine hooks ────────────────────────────────────────────

    /// Register a stop condition.
    pub fn add_stop_condition<F>(&mut self, condition: F) -> &mut Self
    where
        F: FnMut(&NetworkTraceStep<D>, &StepContext) -> bool + 'a,
    {
        self.traversal.add_stop_condition(condition);
        self
    }

    /// Register a queue condition.
    pub fn add_queue_condition<F>(&mut self, condition: F) -> &mut Self
    where
        F: FnMut(&NetworkTraceStep<D>, &StepContext) -> bool + 'a,
    {
        self.traversal.add_queue_condition(condition);
        self
    }

    /// Register a step action.
    pub fn add_step_action<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut(&NetworkTraceStep<D>, &StepContext) + 'a,
    {
        self.traversal.add_step_action(action);
        self
    }

    /// Register a step action whose error aborts the run.
    pub fn add_fallible_step_action<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut(&NetworkTraceStep<D>, &StepContext) -> Result<(), TraversalError> + 'a,
    {
        self.traversal.add_fallible_step_action(action);
        self
    }

    /// Register a step action for stopping steps only.
    pub fn if_stopping<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut(&NetworkTraceStep<D>, &StepContext) + 'a,
    {
        self.traversal.if_stopping(action);
        self
    }

    /// Register a step action for non-stopping steps only.
    pub fn if_not_stopping<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut(&NetworkTraceStep<D>, &StepContext) + 'a,
    {
        self.traversal.if_not_stopping(action);
        self
    }

    /// Register (or replace) a context computer.
    pub fn add_compute_next_context<C>(&mut self, key: impl Into<String>, computer: C) -> &mut Self
    where
        C: ComputeNextContext<NetworkTraceStep<D>> + 'a,
    {
        self.traversal.add_compute_next_context(key, computer);
        self
    }

    // ── Running ─────────────────────────────────────────────────

    /// Walk from `terminal`, attaching `data` to the start step.
    pub fn run_from_terminal(
        &mut self,
        terminal: TerminalId,
        can_stop_on_start_item: bool,
        data: Option<D>,
    ) -> Result<TraversalStats, TraversalError> {
        self.ensure_ready()?;
        let start = NetworkTraceStep::start(self.network, terminal, data)?;
        debug!(%terminal, stepping = %self.config.stepping, "network trace from terminal");
        self.traversal.run(Some(start), can_stop_on_start_item)
    }

    /// Walk from every terminal of `equipment`.
    ///
    /// With equipment stepping a single start step stands for the whole
    /// equipment and leaves through all its terminals. With terminal
    /// stepping each terminal is its own start step. Equipment without
    /// terminals yields an empty run.
    pub fn run_from_equipment(
        &mut self,
        equipment: EquipmentId,
        can_stop_on_start_item: bool,
    ) -> Result<TraversalStats, TraversalError> {
        self.ensure_ready()?;
        let terminals = self.network.equipment(equipment)?.terminals();
        let starts = match self.config.stepping {
            Stepping::Equipment => terminals
                .first()
                .map(|&t| NetworkTraceStep::start(self.network, t, None).map(NetworkTraceStep::leaving_all_terminals))
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?,
            Stepping::Terminal => terminals
                .iter()
                .map(|&t| NetworkTraceStep::start(self.network, t, None))
                .collect::<Result<Vec<_>, _>>()?,
        };
        for start in starts {
            self.traversal.add_start_item(start);
        }
        debug!(
            %equipment,
            terminals = terminals.len(),
            stepping = %self.config.stepping,
            "network trace from equipment"
        );
        self.traversal.run(None, can_stop_on_start_item)
    }

    /// Clear visit state so the trace can run again. Conditions are kept.
    pub fn reset(&mut self) -> Result<&mut Self, TraversalError> {
        self.traversal.reset()?;
        Ok(self)
    }

    fn ensure_ready(&self) -> Result<(), TraversalError> {
        match self.traversal.state() {
            TraversalState::Created => Ok(()),
            TraversalState::Running => Err(TraversalError::AlreadyRunning),
            TraversalState::Completed => Err(TraversalError::RequiresReset),
        }
    }
}
