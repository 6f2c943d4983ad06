//! `valet-graph` — facility graph model and normalization for the valet
//! routing engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`facility`]  | `FacilityGraph`, `FacilityNode`, `FacilityEdge`           |
//! | [`tags`]      | `NodeTag`, `EdgeTag`, all-paths defaults                  |
//! | [`normalize`] | `normalize` — sparse graph → canonical graph              |
//! | [`transform`] | `TransformableGraph` — mutable graph for derivations      |
//! | [`adjacency`] | `AdjacencyGraph` — frozen export used for searching       |
//! | [`error`]     | `GraphError`, `GraphResult<T>`                            |
//!
//! All node references are string IDs, never owning pointers; the graphs are
//! arenas of flat ID-keyed maps.

pub mod adjacency;
pub mod error;
pub mod facility;
pub mod normalize;
pub mod tags;
pub mod transform;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use adjacency::{AdjacencyGraph, AdjacencyNode, OutEdge};
pub use error::{GraphError, GraphResult};
pub use facility::{FacilityEdge, FacilityGraph, FacilityNode};
pub use normalize::normalize;
pub use tags::{ALL_EDGE_PATHS, ALL_NODE_PATHS, EdgeTag, NodeTag};
pub use transform::{SymmetricEdge, TransformableGraph};
