//! Generic Dijkstra search with a pluggable edge-cost function.
//!
//! The cost function may return `+inf` to mark an edge as currently
//! forbidden — reservation state is consulted this way without ever mutating
//! the shared graphs. Costs must otherwise be non-negative.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use valet_graph::{AdjacencyGraph, OutEdge};

/// The shortest-path tree rooted at the search start: tentative distances
/// and the predecessor of every reached node.
#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    pub distances: FxHashMap<String, f64>,
    pub predecessors: FxHashMap<String, String>,
}

impl SearchOutcome {
    /// Distance to `id`; `+inf` when unreached.
    pub fn distance(&self, id: &str) -> f64 {
        self.distances.get(id).copied().unwrap_or(f64::INFINITY)
    }

    pub fn is_reachable(&self, id: &str) -> bool {
        self.distance(id).is_finite()
    }
}

/// Min-heap entry. `BinaryHeap` is a max-heap, so the ordering is reversed;
/// the node ID is a secondary key for deterministic tie-breaking.
struct QueueEntry {
    distance: f64,
    id: String,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Single-source shortest paths from `start` under `weight`.
///
/// `weight(edge, edge_start)` is evaluated when the edge is relaxed; `+inf`
/// skips the edge. Each node settles once, so the result is a shortest-path
/// tree under the usual non-negative-weight precondition.
///
/// A `start` that is not in the graph yields an empty outcome (every node
/// unreachable) rather than an error.
pub fn search<N, E>(
    graph: &AdjacencyGraph<N, E>,
    start: &str,
    mut weight: impl FnMut(&OutEdge<E>, &str) -> f64,
) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();
    if !graph.contains_node(start) {
        return outcome;
    }

    let mut settled: FxHashSet<String> = FxHashSet::default();
    let mut heap: BinaryHeap<QueueEntry> = BinaryHeap::new();

    outcome.distances.insert(start.to_owned(), 0.0);
    heap.push(QueueEntry { distance: 0.0, id: start.to_owned() });

    while let Some(QueueEntry { distance, id }) = heap.pop() {
        if !settled.insert(id.clone()) {
            continue; // stale heap entry
        }
        let Some(node) = graph.node(&id) else { continue };

        for edge in &node.edges {
            // Dangling ends can legitimately exist after partial node removal.
            if !graph.contains_node(&edge.end) {
                continue;
            }
            let cost = weight(edge, &id);
            if !cost.is_finite() {
                continue; // forbidden edge
            }
            debug_assert!(cost >= 0.0, "negative edge cost {cost} on {id} -> {}", edge.end);

            let next = distance + cost;
            if next < outcome.distance(&edge.end) {
                outcome.distances.insert(edge.end.clone(), next);
                outcome.predecessors.insert(edge.end.clone(), id.clone());
                heap.push(QueueEntry { distance: next, id: edge.end.clone() });
            }
        }
    }

    outcome
}
