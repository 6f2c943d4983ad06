//! The parking lot facade: one normalized facility graph, the derived
//! search graphs, and the live reservation store behind a single surface.

use tracing::debug;
use valet_graph::{FacilityGraph, GraphResult, normalize};

use crate::query::RouteQuery;
use crate::route::{BotRoute, Route};
use crate::search_graph::ParkingSearchGraph;
use crate::spots::{SpotListener, SpotStore, SpotUpdate};

/// A parking facility ready to answer route requests and reservation calls.
///
/// Route queries borrow `&self` and reservation mutations `&mut self`, so
/// shared-state discipline is enforced by the type system; wrapping the lot
/// for cross-thread use is the transport layer's concern.
pub struct ParkingLot {
    search: ParkingSearchGraph,
    spots: SpotStore,
}

impl ParkingLot {
    /// Normalize the supplied facility graph and derive the search graphs.
    /// Fails fast on malformed input (dangling edge references).
    pub fn new(facility: FacilityGraph) -> GraphResult<Self> {
        let facility = normalize(facility)?;
        let spots = SpotStore::from_graph(&facility);
        let search = ParkingSearchGraph::new(facility)?;
        debug!(
            spots = search.interface().spots.len(),
            entrances = search.interface().car_entrances.len(),
            exits = search.interface().car_exits.len(),
            "parking lot ready"
        );
        Ok(Self { search, spots })
    }

    /// The normalized facility graph.
    pub fn graph(&self) -> &FacilityGraph {
        self.search.facility()
    }

    /// Best route for a car entering at `start`, or `None` when no feasible
    /// spot (with a working bot escort) exists right now.
    pub fn request_route(&self, start: &str, walk_cost: f64, turn_cost: f64) -> Option<Route> {
        let query = RouteQuery {
            start: start.to_owned(),
            walk_weight: walk_cost,
            turn_weight: turn_cost,
        };
        let route = self.search.find_parking_spot(&query, &self.spots);
        match &route {
            Some(route) => debug!(start, spot = route.spot(), "route found"),
            None => debug!(start, "no feasible route"),
        }
        route
    }

    /// Return route for a bot that escorted a car along `approach`, exposed
    /// for direct reuse by a bot controller.
    pub fn bot_return_route(&self, approach: &[String], queue_id: &str) -> Option<BotRoute> {
        self.search.find_bot_path(approach, queue_id, &self.spots)
    }

    /// Reserve a spot; `false` means somebody else got there first.
    pub fn claim_spot(&mut self, id: &str) -> bool {
        let claimed = self.spots.claim(id);
        debug!(id, claimed, "claim spot");
        claimed
    }

    pub fn disclaim_spot(&mut self, id: &str) {
        debug!(id, "disclaim spot");
        self.spots.disclaim(id);
    }

    pub fn take_spot(&mut self, id: &str, occupant: &str) {
        debug!(id, occupant, "take spot");
        self.spots.take(id, occupant);
    }

    pub fn release_spot(&mut self, id: &str) {
        debug!(id, "release spot");
        self.spots.release(id);
    }

    /// Register a listener for redacted reservation updates.
    pub fn subscribe(&mut self, listener: Box<dyn SpotListener + Send>) {
        self.spots.subscribe(listener);
    }

    /// Redacted reservation state of every spot, in ID order.
    pub fn spots(&self) -> Vec<SpotUpdate> {
        self.spots.snapshot()
    }

    /// Direct store access, for callers that need the unredacted state.
    pub fn spot_store(&self) -> &SpotStore {
        &self.spots
    }
}
