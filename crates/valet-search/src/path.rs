//! Path reconstruction and translation back to facility node IDs.

use valet_graph::{AdjacencyGraph, FacilityGraph, NodeTag};

use crate::dijkstra::SearchOutcome;
use crate::meta::SearchNodeMeta;

/// Walk the predecessor chain from `end` back to the search start and return
/// the path in forward order. Empty when `end` was never reached.
pub fn create_path(outcome: &SearchOutcome, end: &str) -> Vec<String> {
    if !outcome.is_reachable(end) {
        return Vec::new();
    }
    let mut path = vec![end.to_owned()];
    let mut current = end;
    while let Some(prev) = outcome.predecessors.get(current) {
        path.push(prev.clone());
        current = prev;
    }
    path.reverse();
    path
}

/// Translate a search path to facility node IDs, collapsing runs of clones
/// and namespaced copies that map back to the same facility node.
pub fn original_path<E>(
    graph: &AdjacencyGraph<SearchNodeMeta, E>,
    path: &[String],
) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(path.len());
    for id in path {
        let Some(meta) = graph.meta(id) else { continue };
        if out.last().map(String::as_str) != Some(meta.facility.as_str()) {
            out.push(meta.facility.clone());
        }
    }
    out
}

/// Split a facility path in two at the first node carrying `tag`. The split
/// node belongs to both halves, so each half is a connected path. When no
/// node carries the tag the first half is the whole path and the second is
/// empty.
pub fn split_path(
    path: &[String],
    facility: &FacilityGraph,
    tag: NodeTag,
) -> (Vec<String>, Vec<String>) {
    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut found = false;
    for id in path {
        let carries = facility.node(id).is_some_and(|node| node.has_tag(tag));
        if !found && carries {
            found = true;
            first.push(id.clone());
        }
        if found {
            second.push(id.clone());
        } else {
            first.push(id.clone());
        }
    }
    (first, second)
}
