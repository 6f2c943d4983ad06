//! `valet-lot` — parking facility routing and reservation state.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`lot`]        | `ParkingLot` — the facade tying everything together      |
//! | [`search_graph`] | derived pedestrian, car, and bot-return search graphs  |
//! | [`query`]      | route queries: `find_parking_spot`, `find_bot_path`      |
//! | [`route`]      | `Route`, `BotRoute` result bundles                       |
//! | [`spots`]      | `SpotStore` — live reservation state with broadcasts     |

pub mod lot;
pub mod query;
pub mod route;
pub mod search_graph;
pub mod spots;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use lot::ParkingLot;
pub use query::RouteQuery;
pub use route::{BotRoute, Route};
pub use search_graph::{InterfaceNodes, ParkingSearchGraph};
pub use spots::{SpotListener, SpotState, SpotStore, SpotUpdate};
