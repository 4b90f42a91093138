//! Priority queue entry for the shortest path search.

use std::cmp::Ordering;

/// A tentative cost for a node, ordered so that `BinaryHeap` pops the
/// cheapest entry first.
#[derive(Debug, Copy, Clone)]
pub(super) struct State {
    pub(super) cost: f64,
    pub(super) node: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_cheapest_first() {
        let mut heap = BinaryHeap::new();
        for (cost, node) in [(5.0, 0), (1.5, 1), (f64::INFINITY, 2), (0.0, 3)] {
            heap.push(State { cost, node });
        }

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|s| s.node)).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }
}
