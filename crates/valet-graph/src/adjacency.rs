//! Immutable adjacency form of a derived graph.
//!
//! Produced by [`TransformableGraph::export`](crate::TransformableGraph::export)
//! once a search graph is fully built; read-only from then on, so any number
//! of searches can share it without coordination.

use std::collections::BTreeMap;

/// An outgoing edge in the frozen adjacency form.
#[derive(Clone, Debug, PartialEq)]
pub struct OutEdge<E> {
    pub end: String,
    pub weight: f64,
    pub meta: E,
}

/// A node with its metadata and outgoing edges.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjacencyNode<N, E> {
    pub meta: N,
    pub edges: Vec<OutEdge<E>>,
}

/// Directed graph in adjacency form, keyed by node ID.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyGraph<N, E> {
    nodes: BTreeMap<String, AdjacencyNode<N, E>>,
}

impl<N, E> AdjacencyGraph<N, E> {
    pub fn from_nodes(nodes: BTreeMap<String, AdjacencyNode<N, E>>) -> Self {
        Self { nodes }
    }

    pub fn node(&self, id: &str) -> Option<&AdjacencyNode<N, E>> {
        self.nodes.get(id)
    }

    pub fn meta(&self, id: &str) -> Option<&N> {
        self.nodes.get(id).map(|node| &node.meta)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AdjacencyNode<N, E>)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
