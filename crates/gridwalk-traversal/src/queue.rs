//! Queue abstraction and the FIFO/LIFO [`BasicQueue`].

use std::collections::VecDeque;

/// Storage for items waiting to be visited.
pub trait TraversalQueue<T> {
    /// Add an item.
    fn push(&mut self, item: T);

    /// Take the next item to visit.
    fn pop(&mut self) -> Option<T>;

    /// Number of waiting items.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is waiting.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every waiting item.
    fn clear(&mut self);
}

/// Order in which a [`BasicQueue`] hands items back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QueueDiscipline {
    /// First in, first out.
    BreadthFirst,
    /// Last in, first out.
    #[default]
    DepthFirst,
}

/// A deque-backed queue that is either breadth-first or depth-first.
#[derive(Clone, Debug)]
pub struct BasicQueue<T> {
    items: VecDeque<T>,
    discipline: QueueDiscipline,
}

impl<T> BasicQueue<T> {
    /// Create an empty queue with the given discipline.
    pub fn new(discipline: QueueDiscipline) -> Self {
        Self {
            items: VecDeque::new(),
            discipline,
        }
    }

    /// FIFO queue.
    pub fn breadth_first() -> Self {
        Self::new(QueueDiscipline::BreadthFirst)
    }

    /// LIFO queue.
    pub fn depth_first() -> Self {
        Self::new(QueueDiscipline::DepthFirst)
    }

    /// The queue's discipline.
    pub fn discipline(&self) -> QueueDiscipline {
        self.discipline
    }
}

impl<T> TraversalQueue<T> for BasicQueue<T> {
    fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        match self.discipline {
            QueueDiscipline::BreadthFirst => self.items.pop_front(),
            QueueDiscipline::DepthFirst => self.items.pop_back(),
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<Q: TraversalQueue<u32>>(mut q: Q) -> Vec<u32> {
        std::iter::from_fn(|| q.pop()).collect()
    }

    #[test]
    fn breadth_first_is_fifo() {
        let mut q = BasicQueue::breadth_first();
        for i in 1..=4 {
            q.push(i);
        }
        assert_eq!(q.len(), 4);
        assert_eq!(drain(q), vec![1, 2, 3, 4]);
    }

    #[test]
    fn depth_first_is_lifo() {
        let mut q = BasicQueue::depth_first();
        for i in 1..=4 {
            q.push(i);
        }
        assert_eq!(drain(q), vec![4, 3, 2, 1]);
    }

    #[test]
    fn clear_empties() {
        let mut q = BasicQueue::new(QueueDiscipline::default());
        q.push(1);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
        assert_eq!(q.discipline(), QueueDiscipline::DepthFirst);
    }
}
