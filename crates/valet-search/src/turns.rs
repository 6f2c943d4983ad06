//! Turn-cost node splitting.
//!
//! Dijkstra can only price edges, not the angle between two consecutive
//! edges. Splitting converts the node-local turning penalty into edge
//! weights: a node with incoming edges I and outgoing edges O becomes |I|
//! "enter" clones and |O| "exit" clones, the original edges are rewired onto
//! the clones, and every enter/exit pair is connected by an edge weighted
//! with the minimal turning angle between the two headings.

use std::f64::consts::{PI, TAU};

use valet_graph::{GraphError, GraphResult, SymmetricEdge, TransformableGraph};

use crate::meta::{SearchEdgeMeta, SearchNodeMeta};

/// Minimal number of radians to turn (left or right) to cover `angle`:
/// the value in `[0, pi]` congruent to `|angle|` mod 2pi, reflected into
/// range. 0 = straight through, pi = full reversal.
pub fn smallest_turn(angle: f64) -> f64 {
    ((angle % TAU + 3.0 * PI) % TAU - PI).abs()
}

/// ID of the i-th enter clone of `node`.
pub fn enter_clone_id(node: &str, index: usize) -> String {
    format!("{node}-enter{index}")
}

/// ID of the j-th exit clone of `node`.
pub fn exit_clone_id(node: &str, index: usize) -> String {
    format!("{node}-exit{index}")
}

/// Replace `node_id` by turn-cost clones.
///
/// Only drive edges (the ones with a heading) are rewired; turn edges from
/// neighbouring splits and other edge kinds stay untouched. The original
/// node is deleted once no direct incoming edge remains.
pub fn add_node_turn_cost_edges(
    graph: &mut TransformableGraph<SearchNodeMeta, SearchEdgeMeta>,
    node_id: &str,
) -> GraphResult<()> {
    if !graph.contains_node(node_id) {
        return Err(GraphError::NodeNotFound(node_id.to_owned()));
    }

    let in_edges: Vec<SymmetricEdge<SearchEdgeMeta>> = graph.in_edges(node_id).to_vec();
    let out_edges: Vec<SymmetricEdge<SearchEdgeMeta>> = graph.out_edges(node_id).to_vec();

    // Route every incoming drive edge onto a dedicated enter clone.
    for (i, edge) in in_edges.iter().enumerate() {
        if edge.meta.heading().is_none() {
            continue;
        }
        graph.remove_edge(&edge.start, &edge.end)?;
        let enter = enter_clone_id(node_id, i);
        graph.add_renamed_node(node_id, &enter)?;
        let mut moved = edge.clone();
        moved.end = enter;
        graph.add_edge(moved);
    }

    // Route every outgoing drive edge from a dedicated exit clone.
    for (j, edge) in out_edges.iter().enumerate() {
        if edge.meta.heading().is_none() {
            continue;
        }
        graph.remove_edge(&edge.start, &edge.end)?;
        let exit = exit_clone_id(node_id, j);
        graph.add_renamed_node(node_id, &exit)?;
        let mut moved = edge.clone();
        moved.start = exit;
        graph.add_edge(moved);
    }

    // The cross product of enter and exit clones, weighted by how far the
    // heading changes between the two drive edges.
    for (i, in_edge) in in_edges.iter().enumerate() {
        let Some(in_angle) = in_edge.meta.heading() else { continue };
        for (j, out_edge) in out_edges.iter().enumerate() {
            let Some(out_angle) = out_edge.meta.heading() else { continue };
            graph.add_edge(SymmetricEdge {
                start: enter_clone_id(node_id, i),
                end: exit_clone_id(node_id, j),
                weight: smallest_turn(out_angle - in_angle),
                meta: SearchEdgeMeta::Turn { spot: None },
            });
        }
    }

    if graph.in_edges(node_id).is_empty() {
        graph.remove_node(node_id, true);
    }
    Ok(())
}
