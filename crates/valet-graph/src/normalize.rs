//! Facility graph normalization.
//!
//! Completes a sparse facility description into the canonical form every
//! derived search graph is built from:
//!
//! 1. reject edges referencing nodes that do not exist (fail fast — a
//!    dangling edge would otherwise surface as a corrupt search graph),
//! 2. fill missing node tag sets with the all-paths default and derive path
//!    tags from role tags,
//! 3. synthesize a reverse edge into the predecessor wherever an edge enters
//!    a spot and no reverse edge exists (spots must always be exitable),
//! 4. fill missing edge tag sets and compute missing distances (Euclidean)
//!    and angles (`atan2(dy, dx)`).
//!
//! Normalizing is idempotent: running it on an already-normalized graph is a
//! fixed point.

use rustc_hash::FxHashMap;

use crate::error::{GraphError, GraphResult};
use crate::facility::{FacilityEdge, FacilityGraph};
use crate::tags::{ALL_EDGE_PATHS, ALL_NODE_PATHS, NodeTag};

/// Normalize a facility graph. Pure apart from consuming its input.
pub fn normalize(mut graph: FacilityGraph) -> GraphResult<FacilityGraph> {
    validate(&graph)?;
    fill_node_tags(&mut graph);
    add_spot_reverse_edges(&mut graph);
    fill_edges(&mut graph);
    Ok(graph)
}

/// Every edge end must reference an existing node.
fn validate(graph: &FacilityGraph) -> GraphResult<()> {
    for (id, node) in graph.iter() {
        for edge in &node.edges {
            if !graph.contains_node(&edge.end) {
                return Err(GraphError::DanglingEdge {
                    start: id.to_owned(),
                    end: edge.end.clone(),
                });
            }
        }
    }
    Ok(())
}

fn fill_node_tags(graph: &mut FacilityGraph) {
    for (_, node) in graph.iter_mut() {
        let tags = node.tags.get_or_insert_with(|| ALL_NODE_PATHS.to_vec());

        let is_role = |tag: NodeTag| tags.contains(&tag);
        let drivable = is_role(NodeTag::Spot) || is_role(NodeTag::Entrance) || is_role(NodeTag::Exit);
        let walkable = is_role(NodeTag::Spot)
            || is_role(NodeTag::PedestrianEntrance)
            || is_role(NodeTag::PedestrianExit);

        if drivable && !tags.contains(&NodeTag::CarPath) {
            tags.push(NodeTag::CarPath);
        }
        if walkable && !tags.contains(&NodeTag::PedestrianPath) {
            tags.push(NodeTag::PedestrianPath);
        }
    }
}

/// Whenever an edge enters a spot and the spot has no edge back to the
/// predecessor, add a sparse reverse edge; its geometry and tags are filled
/// by the final pass like any other edge.
fn add_spot_reverse_edges(graph: &mut FacilityGraph) {
    let mut missing: Vec<(String, String)> = Vec::new();
    for (id, node) in graph.iter() {
        for edge in &node.edges {
            let Some(end_node) = graph.node(&edge.end) else { continue };
            if end_node.has_tag(NodeTag::Spot) && end_node.edge_to(id).is_none() {
                missing.push((edge.end.clone(), id.to_owned()));
            }
        }
    }
    for (spot, back) in missing {
        let Some(node) = graph.node_mut(&spot) else { continue };
        if node.edge_to(&back).is_none() {
            node.edges.push(FacilityEdge::to(back));
        }
    }
}

fn fill_edges(graph: &mut FacilityGraph) {
    let positions: FxHashMap<String, (f64, f64)> = graph
        .iter()
        .map(|(id, node)| (id.to_owned(), (node.x, node.y)))
        .collect();

    for (_, node) in graph.iter_mut() {
        let (x, y) = (node.x, node.y);
        for edge in &mut node.edges {
            let Some(&(ex, ey)) = positions.get(&edge.end) else { continue };
            let (dx, dy) = (ex - x, ey - y);
            if edge.distance.is_none() {
                edge.distance = Some(dx.hypot(dy));
            }
            if edge.angle.is_none() {
                edge.angle = Some(dy.atan2(dx));
            }
            if edge.tags.is_none() {
                edge.tags = Some(ALL_EDGE_PATHS.to_vec());
            }
        }
    }
}
