//! Visited-set abstraction used for dedup.

use indexmap::IndexSet;
use std::hash::Hash;
use std::marker::PhantomData;

/// Records which items a traversal has already visited.
pub trait Tracker<T> {
    /// Whether `item` has been visited.
    fn has_visited(&self, item: &T) -> bool;

    /// Mark `item` visited. Returns `true` on the first visit only.
    fn visit(&mut self, item: &T) -> bool;

    /// Forget every visit.
    fn clear(&mut self);
}

/// Tracks items by their own identity.
#[derive(Clone, Debug)]
pub struct BasicTracker<T> {
    visited: IndexSet<T>,
}

impl<T> Default for BasicTracker<T> {
    fn default() -> Self {
        Self {
            visited: IndexSet::new(),
        }
    }
}

impl<T: Hash + Eq + Clone> BasicTracker<T> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Hash + Eq + Clone> Tracker<T> for BasicTracker<T> {
    fn has_visited(&self, item: &T) -> bool {
        self.visited.contains(item)
    }

    fn visit(&mut self, item: &T) -> bool {
        if self.visited.contains(item) {
            return false;
        }
        self.visited.insert(item.clone())
    }

    fn clear(&mut self) {
        self.visited.clear();
    }
}

/// Tracks items by a key derived from each item.
///
/// Network traces use this to dedup steps by the equipment or terminal
/// they arrive at rather than by the whole step.
pub struct KeyedTracker<T, K, F> {
    key: F,
    visited: IndexSet<K>,
    _item: PhantomData<fn(&T)>,
}

impl<T, K, F> KeyedTracker<T, K, F>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    /// Create an empty tracker keyed by `key`.
    pub fn new(key: F) -> Self {
        Self {
            key,
            visited: IndexSet::new(),
            _item: PhantomData,
        }
    }

    /// Keys visited so far, in visit order.
    pub fn visited_keys(&self) -> impl Iterator<Item = &K> {
        self.visited.iter()
    }
}

impl<T, K, F> Tracker<T> for KeyedTracker<T, K, F>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    fn has_visited(&self, item: &T) -> bool {
        self.visited.contains(&(self.key)(item))
    }

    fn visit(&mut self, item: &T) -> bool {
        self.visited.insert((self.key)(item))
    }

    fn clear(&mut self) {
        self.visited.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tracker_first_visit_only() {
        let mut t = BasicTracker::new();
        assert!(!t.has_visited(&7));
        assert!(t.visit(&7));
        assert!(!t.visit(&7));
        assert!(t.has_visited(&7));
        t.clear();
        assert!(!t.has_visited(&7));
    }

    #[test]
    fn keyed_tracker_dedups_by_key() {
        let mut t = KeyedTracker::new(|pair: &(u32, u32)| pair.1);
        assert!(t.visit(&(1, 10)));
        assert!(!t.visit(&(2, 10)));
        assert!(t.has_visited(&(3, 10)));
        assert!(t.visit(&(1, 11)));
        assert_eq!(t.visited_keys().copied().collect::<Vec<_>>(), vec![10, 11]);
    }
}
