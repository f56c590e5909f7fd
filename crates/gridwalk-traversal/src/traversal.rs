//! The [`Traversal`] engine.

use crate::context::{ComputeNextContext, StepContext};
use crate::metrics::TraversalStats;
use crate::queue::{BasicQueue, TraversalQueue};
use crate::tracker::{BasicTracker, Tracker};
use gridwalk_core::TraversalError;
use indexmap::IndexMap;
use std::hash::Hash;
use tracing::{debug, trace};

/// Strategy that enumerates the candidate successors of a visited item.
pub trait QueueNext<T> {
    /// Candidate successors of `item`. Each is still subject to the
    /// traversal's queue conditions and tracker.
    fn next_items(&mut self, item: &T, context: &StepContext) -> Result<Vec<T>, TraversalError>;
}

/// [`QueueNext`] backed by a closure. Build one with [`queue_next_fn`].
pub struct QueueNextFn<F>(F);

/// Wrap a closure as a [`QueueNext`] strategy.
pub fn queue_next_fn<T, F>(f: F) -> QueueNextFn<F>
where
    F: FnMut(&T, &StepContext) -> Result<Vec<T>, TraversalError>,
{
    QueueNextFn(f)
}

impl<T, F> QueueNext<T> for QueueNextFn<F>
where
    F: FnMut(&T, &StepContext) -> Result<Vec<T>, TraversalError>,
{
    fn next_items(&mut self, item: &T, context: &StepContext) -> Result<Vec<T>, TraversalError> {
        (self.0)(item, context)
    }
}

/// An item waiting in the queue together with its context.
#[derive(Debug)]
pub struct Queued<T> {
    /// The item.
    pub item: T,
    /// Context computed when the item was queued.
    pub context: StepContext,
}

/// Lifecycle of a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalState {
    /// Configured but not yet run, or reset.
    Created,
    /// Inside `run`.
    Running,
    /// `run` has returned; `reset` is required before the next run.
    Completed,
}

type Predicate<'a, T> = Box<dyn FnMut(&T, &StepContext) -> bool + 'a>;
type StepAction<'a, T> = Box<dyn FnMut(&T, &StepContext) -> Result<(), TraversalError> + 'a>;

/// A single-pass graph walk over items of type `T`.
///
/// Each run pops items from the queue until it is empty. For every item
/// seen for the first time (per the tracker) it:
///
/// 1. evaluates every stop condition, so all conditions observe every
///    visited item, and records whether any matched,
/// 2. invokes every step action in registration order,
/// 3. unless stopping, asks the [`QueueNext`] strategy for candidate
///    successors and passes each through [`queue_item`](Self::queue_item).
///
/// Items already visited are dropped without invoking actions.
///
/// A traversal runs once. Running it again fails with
/// [`TraversalError::RequiresReset`] until [`reset`](Self::reset) is called.
/// A step action error aborts the run immediately; the queue and tracker
/// keep whatever state they had until the next reset.
///
/// # Examples
///
/// ```
/// use gridwalk_traversal::{queue_next_fn, StepContext, Traversal};
/// use std::cell::RefCell;
///
/// let visited = RefCell::new(Vec::new());
/// let mut traversal = Traversal::breadth_first(queue_next_fn(|i: &u32, _: &StepContext| {
///     Ok(vec![i + 1, i + 2])
/// }));
/// traversal
///     .add_stop_condition(|i, _| *i >= 4)
///     .add_step_action(|i, _| visited.borrow_mut().push(*i));
///
/// traversal.run(Some(1), true).unwrap();
/// assert_eq!(*visited.borrow(), vec![1, 2, 3, 4, 5]);
/// ```
pub struct Traversal<'a, T, N> {
    queue_next: N,
    queue: Box<dyn TraversalQueue<Queued<T>> + 'a>,
    tracker: Box<dyn Tracker<T> + 'a>,
    start_items: Vec<T>,
    stop_conditions: Vec<Predicate<'a, T>>,
    queue_conditions: Vec<Predicate<'a, T>>,
    step_actions: Vec<StepAction<'a, T>>,
    computers: IndexMap<String, Box<dyn ComputeNextContext<T> + 'a>>,
    state: TraversalState,
    stats: TraversalStats,
}

impl<'a, T: 'a, N: QueueNext<T>> Traversal<'a, T, N> {
    /// Create a traversal with explicit queue and tracker.
    pub fn new(
        queue_next: N,
        queue: impl TraversalQueue<Queued<T>> + 'a,
        tracker: impl Tracker<T> + 'a,
    ) -> Self {
        Self {
            queue_next,
            queue: Box::new(queue),
            tracker: Box::new(tracker),
            start_items: Vec::new(),
            stop_conditions: Vec::new(),
            queue_conditions: Vec::new(),
            step_actions: Vec::new(),
            computers: IndexMap::new(),
            state: TraversalState::Created,
            stats: TraversalStats::default(),
        }
    }

    /// Breadth-first traversal that tracks items by identity.
    pub fn breadth_first(queue_next: N) -> Self
    where
        T: Hash + Eq + Clone,
    {
        Self::new(queue_next, BasicQueue::breadth_first(), BasicTracker::new())
    }

    /// Depth-first traversal that tracks items by identity.
    pub fn depth_first(queue_next: N) -> Self
    where
        T: Hash + Eq + Clone,
    {
        Self::new(queue_next, BasicQueue::depth_first(), BasicTracker::new())
    }

    // ── Configuration ───────────────────────────────────────────

    /// Register a stop condition.
    pub fn add_stop_condition<F>(&mut self, condition: F) -> &mut Self
    where
        F: FnMut(&T, &StepContext) -> bool + 'a,
    {
        self.stop_conditions.push(Box::new(condition));
        self
    }

    /// Register a queue condition. It sees the candidate item and the
    /// context of the item it is being queued from.
    pub fn add_queue_condition<F>(&mut self, condition: F) -> &mut Self
    where
        F: FnMut(&T, &StepContext) -> bool + 'a,
    {
        self.queue_conditions.push(Box::new(condition));
        self
    }

    /// Register an infallible step action.
    pub fn add_step_action<F>(&mut self, mut action: F) -> &mut Self
    where
        F: FnMut(&T, &StepContext) + 'a,
    {
        self.step_actions.push(Box::new(move |item, ctx| {
            action(item, ctx);
            Ok(())
        }));
        self
    }

    /// Register a step action whose error aborts the run.
    pub fn add_fallible_step_action<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut(&T, &StepContext) -> Result<(), TraversalError> + 'a,
    {
        self.step_actions.push(Box::new(action));
        self
    }

    /// Register a step action that only runs on stopping items.
    pub fn if_stopping<F>(&mut self, mut action: F) -> &mut Self
    where
        F: FnMut(&T, &StepContext) + 'a,
    {
        self.add_step_action(move |item, ctx| {
            if ctx.is_stopping() {
                action(item, ctx);
            }
        })
    }

    /// Register a step action that only runs on non-stopping items.
    pub fn if_not_stopping<F>(&mut self, mut action: F) -> &mut Self
    where
        F: FnMut(&T, &StepContext) + 'a,
    {
        self.add_step_action(move |item, ctx| {
            if !ctx.is_stopping() {
                action(item, ctx);
            }
        })
    }

    /// Register (or replace) the context computer for `key`.
    pub fn add_compute_next_context<C>(&mut self, key: impl Into<String>, computer: C) -> &mut Self
    where
        C: ComputeNextContext<T> + 'a,
    {
        self.computers.insert(key.into(), Box::new(computer));
        self
    }

    /// Remove the context computer for `key`. Returns whether one existed.
    pub fn remove_compute_next_context(&mut self, key: &str) -> bool {
        self.computers.shift_remove(key).is_some()
    }

    /// Drop every stop condition.
    pub fn clear_stop_conditions(&mut self) -> &mut Self {
        self.stop_conditions.clear();
        self
    }

    /// Drop every queue condition.
    pub fn clear_queue_conditions(&mut self) -> &mut Self {
        self.queue_conditions.clear();
        self
    }

    /// Drop every step action.
    pub fn clear_step_actions(&mut self) -> &mut Self {
        self.step_actions.clear();
        self
    }

    /// Add another start item for the next run.
    pub fn add_start_item(&mut self, item: T) -> &mut Self {
        self.start_items.push(item);
        self
    }

    /// Replace the start items for the next run with `item`.
    pub fn set_start(&mut self, item: T) -> &mut Self {
        self.start_items.clear();
        self.start_items.push(item);
        self
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Current lifecycle state.
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Counters from the most recent run.
    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// The successor strategy.
    pub fn queue_next(&self) -> &N {
        &self.queue_next
    }

    /// Mutable access to the successor strategy.
    pub fn queue_next_mut(&mut self) -> &mut N {
        &mut self.queue_next
    }

    /// Whether `item` has been visited in the current run.
    pub fn has_visited(&self, item: &T) -> bool {
        self.tracker.has_visited(item)
    }

    // ── Running ─────────────────────────────────────────────────

    /// Walk from `start` plus any start items added beforehand.
    ///
    /// With `can_stop_on_start_item = false` the first item visited is
    /// exempt from stop conditions, so the walk always expands past it.
    /// Further start items are not exempt.
    ///
    /// Start items are consumed by the run. They bypass queue conditions
    /// and get their context from each computer's initial value.
    pub fn run(&mut self, start: Option<T>, can_stop_on_start_item: bool) -> Result<TraversalStats, TraversalError> {
        match self.state {
            TraversalState::Running => return Err(TraversalError::AlreadyRunning),
            TraversalState::Completed => return Err(TraversalError::RequiresReset),
            TraversalState::Created => {}
        }
        if let Some(item) = start {
            self.start_items.push(item);
        }

        self.state = TraversalState::Running;
        self.stats = TraversalStats::default();
        let starts = std::mem::take(&mut self.start_items);
        debug!(start_items = starts.len(), can_stop_on_start_item, "traversal started");

        for item in starts {
            let context = self.initial_context(&item);
            self.queue.push(Queued { item, context });
        }

        let result = self.drain(can_stop_on_start_item);
        self.state = TraversalState::Completed;

        match result {
            Ok(()) => {
                debug!(
                    visited = self.stats.visited,
                    skipped = self.stats.skipped,
                    queued = self.stats.queued,
                    stopped = self.stats.stopped,
                    "traversal completed"
                );
                Ok(self.stats.clone())
            }
            Err(e) => {
                debug!(error = %e, visited = self.stats.visited, "traversal aborted");
                Err(e)
            }
        }
    }

    /// Clear the queue and tracker so the traversal can run again.
    /// Conditions, actions and computers are kept.
    pub fn reset(&mut self) -> Result<&mut Self, TraversalError> {
        if self.state == TraversalState::Running {
            return Err(TraversalError::AlreadyRunning);
        }
        self.queue.clear();
        self.tracker.clear();
        self.stats = TraversalStats::default();
        self.state = TraversalState::Created;
        Ok(self)
    }

    /// Evaluate every stop condition against `item`; `true` if any matched.
    pub fn matches_any_stop_condition(&mut self, item: &T, context: &StepContext) -> bool {
        let mut matched = false;
        for condition in &mut self.stop_conditions {
            matched |= condition(item, context);
        }
        matched
    }

    /// `true` if every queue condition accepts `item`. Stops at the first
    /// rejection.
    pub fn matches_all_queue_conditions(&mut self, item: &T, context: &StepContext) -> bool {
        self.queue_conditions
            .iter_mut()
            .all(|condition| condition(item, context))
    }

    /// Offer `next`, a successor of `current`, to the queue.
    ///
    /// Already-visited items and items rejected by a queue condition are
    /// dropped. Otherwise the child context is computed from
    /// `current_context` and the item is queued. Returns whether it was
    /// queued.
    pub fn queue_item(&mut self, next: T, current: &T, current_context: &StepContext) -> bool {
        if self.tracker.has_visited(&next) {
            return false;
        }
        if !self.matches_all_queue_conditions(&next, current_context) {
            return false;
        }

        let data = self
            .computers
            .iter()
            .map(|(key, computer)| {
                let value = computer.compute_next(current_context.raw_data(key), current, &next);
                (key.clone(), value)
            })
            .collect();
        let context = StepContext::from_parts(current_context.step_number() + 1, false, data);

        self.queue.push(Queued { item: next, context });
        self.stats.queued += 1;
        true
    }

    fn initial_context(&self, item: &T) -> StepContext {
        let data = self
            .computers
            .iter()
            .map(|(key, computer)| (key.clone(), computer.compute_initial(item)))
            .collect();
        StepContext::from_parts(0, true, data)
    }

    fn drain(&mut self, can_stop_on_start_item: bool) -> Result<(), TraversalError> {
        let mut can_stop = can_stop_on_start_item;
        while let Some(Queued { item, mut context }) = self.queue.pop() {
            if !self.tracker.visit(&item) {
                self.stats.skipped += 1;
                trace!(step = context.step_number(), "skipping visited item");
                continue;
            }
            self.stats.visited += 1;

            let exempt = !can_stop;
            can_stop = true;
            let stopping = !exempt && self.matches_any_stop_condition(&item, &context);
            context.set_stopping(stopping);
            if stopping {
                self.stats.stopped += 1;
            }
            trace!(step = context.step_number(), stopping, "visiting item");

            for action in &mut self.step_actions {
                action(&item, &context)?;
            }

            if !stopping {
                for next in self.queue_next.next_items(&item, &context)? {
                    self.queue_item(next, &item, &context);
                }
            }
        }
        Ok(())
    }
}
