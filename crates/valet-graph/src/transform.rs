//! Generic mutable directed graph used while deriving search graphs.
//!
//! One edge per ordered node pair; opaque per-node and per-edge metadata.
//! Edges are indexed both by start and by end node so rewiring a node (the
//! turn-cost split) can enumerate incident edges in O(degree).
//!
//! Node tables are `BTreeMap`s so enumeration order — and therefore clone
//! numbering during node splitting — is deterministic.

use std::collections::BTreeMap;

use crate::adjacency::{AdjacencyGraph, AdjacencyNode, OutEdge};
use crate::error::{GraphError, GraphResult};

/// A directed edge carrying its own endpoints, a weight, and metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricEdge<E> {
    pub start: String,
    pub end: String,
    pub weight: f64,
    pub meta: E,
}

/// Mutable directed multigraph (one edge per ordered pair) with metadata.
#[derive(Clone, Debug, Default)]
pub struct TransformableGraph<N, E> {
    nodes: BTreeMap<String, N>,
    edges_out: BTreeMap<String, Vec<SymmetricEdge<E>>>,
    edges_in: BTreeMap<String, Vec<SymmetricEdge<E>>>,
}

impl<N: Clone, E: Clone> TransformableGraph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges_out: BTreeMap::new(),
            edges_in: BTreeMap::new(),
        }
    }

    // ── Node management ───────────────────────────────────────────────────

    pub fn node_meta(&self, id: &str) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node IDs in sorted order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &N)> {
        self.nodes.iter().map(|(id, meta)| (id.as_str(), meta))
    }

    /// Add a node; overwrites the metadata of an existing node with the same
    /// ID.
    pub fn add_node(&mut self, id: impl Into<String>, meta: N) {
        self.nodes.insert(id.into(), meta);
    }

    /// Add a copy of an existing node's metadata under a new ID. The copy
    /// starts with no edges of its own.
    pub fn add_renamed_node(&mut self, id: &str, new_id: &str) -> GraphResult<()> {
        let meta = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::NodeNotFound(id.to_owned()))?;
        self.add_node(new_id, meta);
        Ok(())
    }

    /// Remove a node. With `fully`, all incident edges go too; without,
    /// edges referencing the node are left dangling — callers replacing a
    /// node by clones rely on this to keep the rewired edges alive.
    pub fn remove_node(&mut self, id: &str, fully: bool) {
        self.nodes.remove(id);
        if fully {
            self.remove_in_edges(id);
            self.remove_out_edges(id);
        }
    }

    /// Rename a node: copy its metadata under the new ID, redirect every
    /// incident edge, and delete the old node.
    pub fn rename_node(&mut self, id: &str, new_id: &str) -> GraphResult<()> {
        let meta = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::NodeNotFound(id.to_owned()))?;

        let redirect = |endpoint: &str| -> String {
            if endpoint == id { new_id.to_owned() } else { endpoint.to_owned() }
        };
        let incident: Vec<SymmetricEdge<E>> = self
            .out_edges(id)
            .iter()
            .chain(self.in_edges(id).iter())
            .map(|edge| SymmetricEdge {
                start: redirect(&edge.start),
                end: redirect(&edge.end),
                weight: edge.weight,
                meta: edge.meta.clone(),
            })
            .collect();

        self.remove_node(id, true);
        self.add_node(new_id, meta);
        for edge in incident {
            self.add_edge(edge);
        }
        Ok(())
    }

    // ── Edge management ───────────────────────────────────────────────────

    /// Add an edge; replaces any existing edge with the same start and end.
    pub fn add_edge(&mut self, edge: SymmetricEdge<E>) {
        if self.contains_edge(&edge.start, &edge.end) {
            // Replace semantics; the edge is known to exist.
            let _ = self.remove_edge(&edge.start, &edge.end);
        }
        self.edges_out
            .entry(edge.start.clone())
            .or_default()
            .push(edge.clone());
        self.edges_in.entry(edge.end.clone()).or_default().push(edge);
    }

    /// Add a copy of `edge` with its endpoints renamed.
    pub fn add_renamed_edge(&mut self, edge: &SymmetricEdge<E>, new_start: &str, new_end: &str) {
        self.add_edge(SymmetricEdge {
            start: new_start.to_owned(),
            end: new_end.to_owned(),
            weight: edge.weight,
            meta: edge.meta.clone(),
        });
    }

    /// Add a copy of `edge` pointing the opposite way.
    pub fn add_reversed_edge(&mut self, edge: &SymmetricEdge<E>) {
        self.add_renamed_edge(edge, &edge.end, &edge.start);
    }

    pub fn remove_edge(&mut self, start: &str, end: &str) -> GraphResult<()> {
        if !self.contains_edge(start, end) {
            return Err(GraphError::EdgeNotFound {
                start: start.to_owned(),
                end: end.to_owned(),
            });
        }
        if let Some(out) = self.edges_out.get_mut(start) {
            out.retain(|edge| edge.end != end);
        }
        if let Some(r#in) = self.edges_in.get_mut(end) {
            r#in.retain(|edge| edge.start != start);
        }
        Ok(())
    }

    /// Remove every edge starting at `id`.
    pub fn remove_out_edges(&mut self, id: &str) {
        for edge in self.edges_out.remove(id).unwrap_or_default() {
            if let Some(r#in) = self.edges_in.get_mut(&edge.end) {
                r#in.retain(|e| e.start != id);
            }
        }
    }

    /// Remove every edge ending at `id`.
    pub fn remove_in_edges(&mut self, id: &str) {
        for edge in self.edges_in.remove(id).unwrap_or_default() {
            if let Some(out) = self.edges_out.get_mut(&edge.start) {
                out.retain(|e| e.end != id);
            }
        }
    }

    pub fn edge(&self, start: &str, end: &str) -> Option<&SymmetricEdge<E>> {
        self.out_edges(start).iter().find(|edge| edge.end == end)
    }

    pub fn contains_edge(&self, start: &str, end: &str) -> bool {
        self.edge(start, end).is_some()
    }

    /// Outgoing edges of `id`, in insertion order.
    pub fn out_edges(&self, id: &str) -> &[SymmetricEdge<E>] {
        self.edges_out.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Incoming edges of `id`, in insertion order.
    pub fn in_edges(&self, id: &str) -> &[SymmetricEdge<E>] {
        self.edges_in.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Incoming followed by outgoing edges of `id`.
    pub fn node_edges(&self, id: &str) -> impl Iterator<Item = &SymmetricEdge<E>> {
        self.in_edges(id).iter().chain(self.out_edges(id).iter())
    }

    /// Every edge in the graph, grouped by start node in sorted order.
    pub fn edges(&self) -> impl Iterator<Item = &SymmetricEdge<E>> {
        self.edges_out.values().flatten()
    }

    // ── Export ────────────────────────────────────────────────────────────

    /// Freeze into the adjacency form used for searching. Out-edges stored
    /// under a removed start node are dropped; an edge whose *end* node was
    /// partially removed stays dangling, and searches skip such ends.
    pub fn export(self) -> AdjacencyGraph<N, E> {
        let mut edges_out = self.edges_out;
        let nodes = self
            .nodes
            .into_iter()
            .map(|(id, meta)| {
                let edges = edges_out
                    .remove(&id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|edge| OutEdge { end: edge.end, weight: edge.weight, meta: edge.meta })
                    .collect();
                (id, AdjacencyNode { meta, edges })
            })
            .collect();
        AdjacencyGraph::from_nodes(nodes)
    }
}
