//! Property tests for the traversal engine over random graphs.

use gridwalk_core::TraversalError;
use gridwalk_traversal::{queue_next_fn, StepContext, Traversal};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

fn arb_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2usize..24).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0..n, 0..4), n))
}

fn reachable(graph: &[Vec<usize>], start: usize) -> HashSet<usize> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for &next in &graph[node] {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn walk(graph: &[Vec<usize>], breadth_first: bool) -> (Vec<usize>, Vec<(usize, usize)>) {
    let visits = RefCell::new(Vec::new());
    let depths = RefCell::new(Vec::new());
    let next = queue_next_fn(|node: &usize, _: &StepContext| -> Result<Vec<usize>, TraversalError> {
        Ok(graph[*node].clone())
    });
    let mut traversal = if breadth_first {
        Traversal::breadth_first(next)
    } else {
        Traversal::depth_first(next)
    };
    traversal.add_step_action(|node, ctx| {
        visits.borrow_mut().push(*node);
        depths.borrow_mut().push((*node, ctx.step_number()));
    });
    traversal.run(Some(0), true).unwrap();
    drop(traversal);
    (visits.into_inner(), depths.into_inner())
}

proptest! {
    #[test]
    fn each_item_visited_once(graph in arb_graph(), breadth_first in any::<bool>()) {
        let (visits, _) = walk(&graph, breadth_first);
        let unique: HashSet<_> = visits.iter().copied().collect();
        prop_assert_eq!(unique.len(), visits.len());
        prop_assert_eq!(unique, reachable(&graph, 0));
    }

    #[test]
    fn breadth_first_depths_are_shortest_paths(graph in arb_graph()) {
        let (_, depths) = walk(&graph, true);
        let mut expected = HashMap::from([(0usize, 0usize)]);
        let mut queue = VecDeque::from([0usize]);
        while let Some(node) = queue.pop_front() {
            let d = expected[&node];
            for &next in &graph[node] {
                if !expected.contains_key(&next) {
                    expected.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        for (node, depth) in depths {
            prop_assert_eq!(Some(&depth), expected.get(&node));
        }
    }

    #[test]
    fn reset_rerun_matches_first_run(graph in arb_graph()) {
        let count = RefCell::new(0usize);
        let next = queue_next_fn(|node: &usize, _: &StepContext| -> Result<Vec<usize>, TraversalError> {
            Ok(graph[*node].clone())
        });
        let mut traversal = Traversal::depth_first(next);
        traversal.add_step_action(|_, _| *count.borrow_mut() += 1);

        let first = traversal.run(Some(0), true).unwrap();
        prop_assert_eq!(traversal.run(Some(0), true), Err(TraversalError::RequiresReset));
        traversal.reset().unwrap();
        let second = traversal.run(Some(0), true).unwrap();

        prop_assert_eq!(&first, &second);
        drop(traversal);
        prop_assert_eq!(count.into_inner(), first.visited * 2);
    }
}
