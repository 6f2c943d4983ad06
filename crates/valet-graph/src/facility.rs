//! Facility graph data model.
//!
//! The facility supplier hands over one static description at startup, keyed
//! by node ID:
//!
//! ```json
//! {
//!   "entrance": { "x": 0, "y": 0, "tags": ["entrance"], "edges": [{ "end": "a" }] },
//!   "a":        { "x": 10, "y": 0, "edges": [{ "end": "spot" }] }
//! }
//! ```
//!
//! `distance`, `angle`, and both tag sets may be omitted; the normalizer
//! ([`crate::normalize`]) fills them in. Nodes live in a `BTreeMap` so every
//! enumeration is deterministic — derived search graphs and route searches
//! are reproducible run to run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tags::{EdgeTag, NodeTag};

/// A directed edge of the facility graph, possibly sparse (missing geometry
/// and tags) before normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilityEdge {
    /// ID of the node this edge points at.
    pub end: String,

    /// Length in metres. `None` until normalized (computed as the Euclidean
    /// distance between the endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    /// Heading in radians, `atan2(dy, dx)`, in `(-pi, pi]`. `None` until
    /// normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,

    /// Which traffic may use this edge. `None` until normalized (defaults to
    /// all path tags).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<EdgeTag>>,
}

impl FacilityEdge {
    /// A sparse edge to `end`; geometry and tags are filled by normalization.
    pub fn to(end: impl Into<String>) -> Self {
        Self { end: end.into(), distance: None, angle: None, tags: None }
    }

    /// A sparse edge restricted to the given traffic tags.
    pub fn to_tagged(end: impl Into<String>, tags: &[EdgeTag]) -> Self {
        Self { end: end.into(), distance: None, angle: None, tags: Some(tags.to_vec()) }
    }

    pub fn has_tag(&self, tag: EdgeTag) -> bool {
        self.tags.as_deref().unwrap_or_default().contains(&tag)
    }
}

/// A facility node: a position, a tag set, and its outgoing edges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilityNode {
    pub x: f64,
    pub y: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<NodeTag>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<FacilityEdge>,
}

impl FacilityNode {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, tags: None, edges: Vec::new() }
    }

    pub fn with_tags(mut self, tags: &[NodeTag]) -> Self {
        self.tags = Some(tags.to_vec());
        self
    }

    pub fn with_edges(mut self, edges: Vec<FacilityEdge>) -> Self {
        self.edges = edges;
        self
    }

    pub fn has_tag(&self, tag: NodeTag) -> bool {
        self.tags.as_deref().unwrap_or_default().contains(&tag)
    }

    /// The outgoing edge to `end`, if one exists.
    pub fn edge_to(&self, end: &str) -> Option<&FacilityEdge> {
        self.edges.iter().find(|e| e.end == end)
    }
}

/// The facility graph: nodes keyed by ID.
///
/// Supplied once at startup, normalized once, then treated as immutable by
/// everything downstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityGraph {
    nodes: BTreeMap<String, FacilityNode>,
}

impl FacilityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or overwrite) a node. Used by fixtures and suppliers that
    /// build graphs in code rather than from JSON.
    pub fn insert(&mut self, id: impl Into<String>, node: FacilityNode) {
        self.nodes.insert(id.into(), node);
    }

    pub fn node(&self, id: &str) -> Option<&FacilityNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut FacilityNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FacilityNode)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FacilityNode)> {
        self.nodes.iter_mut().map(|(id, node)| (id.as_str(), node))
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// IDs of all nodes carrying `tag`, in ID order.
    pub fn ids_with_tag(&self, tag: NodeTag) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.has_tag(tag))
            .map(|(id, _)| id.to_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
