//! Per-run traversal counters.

/// Counters collected during a single [`Traversal::run`](crate::Traversal::run).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Items visited for the first time (step actions ran).
    pub visited: usize,
    /// Items popped from the queue but dropped as already visited.
    pub skipped: usize,
    /// Successor items admitted to the queue, start items excluded.
    pub queued: usize,
    /// Visited items on which at least one stop condition matched.
    pub stopped: usize,
}
