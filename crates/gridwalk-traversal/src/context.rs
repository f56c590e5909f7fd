//! Per-item step context and the computers that derive it.
//!
//! Every queued item carries a [`StepContext`]. The start item's context is
//! built from each registered computer's initial value. A successor's
//! context is built from its parent's, one computer per key, when the
//! successor is admitted to the queue. Nothing is inherited implicitly:
//! a key is present only if a computer for it is registered.

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Immutable record attached to a queued item.
pub struct StepContext {
    step_number: usize,
    is_start_item: bool,
    is_stopping: bool,
    data: IndexMap<String, Box<dyn Any>>,
}

impl StepContext {
    /// Create a context with no data.
    pub fn new(step_number: usize, is_start_item: bool) -> Self {
        Self {
            step_number,
            is_start_item,
            is_stopping: false,
            data: IndexMap::new(),
        }
    }

    /// Attach a value under `key`, replacing any previous one.
    pub fn with_data<V: Any>(mut self, key: impl Into<String>, value: V) -> Self {
        self.data.insert(key.into(), Box::new(value));
        self
    }

    /// Depth of the item from its start item; zero for start items.
    pub fn step_number(&self) -> usize {
        self.step_number
    }

    /// Whether this item was a start item.
    pub fn is_start_item(&self) -> bool {
        self.is_start_item
    }

    /// Whether a stop condition matched when the item was visited.
    ///
    /// Always `false` while queue conditions and context computers run,
    /// since those see the item before it is visited.
    pub fn is_stopping(&self) -> bool {
        self.is_stopping
    }

    /// Typed value under `key`, or `None` if absent or of another type.
    pub fn data<V: Any>(&self, key: &str) -> Option<&V> {
        self.data.get(key).and_then(|v| v.downcast_ref::<V>())
    }

    /// Untyped value under `key`.
    pub fn raw_data(&self, key: &str) -> Option<&dyn Any> {
        self.data.get(key).map(|v| v.as_ref())
    }

    /// Whether any value is stored under `key`.
    pub fn has_data(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Keys with stored values, in computer registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub(crate) fn from_parts(
        step_number: usize,
        is_start_item: bool,
        data: IndexMap<String, Box<dyn Any>>,
    ) -> Self {
        Self {
            step_number,
            is_start_item,
            is_stopping: false,
            data,
        }
    }

    pub(crate) fn set_stopping(&mut self, stopping: bool) {
        self.is_stopping = stopping;
    }
}

impl fmt::Debug for StepContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("step_number", &self.step_number)
            .field("is_start_item", &self.is_start_item)
            .field("is_stopping", &self.is_stopping)
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Computes one key of step context data.
pub trait ComputeNextContext<T> {
    /// Value for a start item.
    fn compute_initial(&self, item: &T) -> Box<dyn Any>;

    /// Value for `next`, queued from `current` whose value for this key is
    /// `previous`.
    fn compute_next(&self, previous: Option<&dyn Any>, current: &T, next: &T) -> Box<dyn Any>;
}

impl<T, C: ComputeNextContext<T> + ?Sized> ComputeNextContext<T> for Box<C> {
    fn compute_initial(&self, item: &T) -> Box<dyn Any> {
        (**self).compute_initial(item)
    }

    fn compute_next(&self, previous: Option<&dyn Any>, current: &T, next: &T) -> Box<dyn Any> {
        (**self).compute_next(previous, current, next)
    }
}

/// Typed [`ComputeNextContext`] built from two closures.
///
/// # Examples
///
/// ```
/// use gridwalk_traversal::{ComputeNextContext, ContextComputer};
///
/// let depth = ContextComputer::new(|_: &u32| 0usize, |prev: &usize, _: &u32, _: &u32| prev + 1);
/// let initial = depth.compute_initial(&1);
/// let next = depth.compute_next(Some(initial.as_ref()), &1, &2);
/// assert_eq!(next.downcast_ref::<usize>(), Some(&1));
/// ```
pub struct ContextComputer<T, V, I, N> {
    initial: I,
    next: N,
    _types: PhantomData<fn(&T) -> V>,
}

impl<T, V, I, N> ContextComputer<T, V, I, N>
where
    V: Any,
    I: Fn(&T) -> V,
    N: Fn(&V, &T, &T) -> V,
{
    /// `initial(item)` seeds start items; `next(previous, current, next)`
    /// derives each successor's value.
    pub fn new(initial: I, next: N) -> Self {
        Self {
            initial,
            next,
            _types: PhantomData,
        }
    }
}

impl<T, V, I, N> ComputeNextContext<T> for ContextComputer<T, V, I, N>
where
    V: Any,
    I: Fn(&T) -> V,
    N: Fn(&V, &T, &T) -> V,
{
    fn compute_initial(&self, item: &T) -> Box<dyn Any> {
        Box::new((self.initial)(item))
    }

    fn compute_next(&self, previous: Option<&dyn Any>, current: &T, next: &T) -> Box<dyn Any> {
        let value = match previous.and_then(|p| p.downcast_ref::<V>()) {
            Some(prev) => (self.next)(prev, current, next),
            None => (self.next)(&(self.initial)(current), current, next),
        };
        Box::new(value)
    }
}
