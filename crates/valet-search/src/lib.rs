//! Weighted graph search for the valet routing engine.
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | `dijkstra` | generic shortest-path search with pluggable edge costs    |
//! | `meta`     | node and edge metadata carried by derived search graphs   |
//! | `path`     | path reconstruction, translation, and splitting           |
//! | `turns`    | turn-cost node splitting                                  |

pub mod dijkstra;
pub mod meta;
pub mod path;
pub mod turns;


pub use dijkstra::{SearchOutcome, search};
pub use meta::{SearchEdgeMeta, SearchNodeMeta, TurnSpot};
pub use path::{create_path, original_path, split_path};
pub use turns::{add_node_turn_cost_edges, enter_clone_id, exit_clone_id, smallest_turn};
