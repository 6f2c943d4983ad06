//! Route queries over the derived search graphs.
//!
//! Everything here is read-only: the graphs are immutable after
//! construction and the reservation store is only consulted through its
//! blocking oracle, so queries can run concurrently with each other.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use rustc_hash::{FxHashMap, FxHashSet};
use valet_graph::{NodeTag, OutEdge};
use valet_search::{
    SearchEdgeMeta, SearchOutcome, create_path, original_path, search, split_path,
};

use crate::route::{BotRoute, Route};
use crate::search_graph::{ParkingSearchGraph, phase0, phase1};
use crate::spots::SpotStore;

/// Parameters of one parking request.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteQuery {
    /// Facility node the car enters at.
    pub start: String,
    /// Cost of walking one metre, relative to driving one metre.
    pub walk_weight: f64,
    /// Cost of turning 90 degrees, relative to driving one metre.
    pub turn_weight: f64,
}

/// Best pedestrian access to one spot over all entrances and exits; the run
/// indices point into the search outcomes the minima came from.
#[derive(Clone, Copy, Debug)]
struct SpotAccess {
    entrance_distance: f64,
    entrance_run: Option<usize>,
    exit_distance: f64,
    exit_run: Option<usize>,
}

struct PedestrianData {
    entrance_runs: Vec<SearchOutcome>,
    exit_runs: Vec<SearchOutcome>,
    access: FxHashMap<String, SpotAccess>,
}

/// Wrap an angle into `(-pi, pi]`.
fn wrap_to_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

impl ParkingSearchGraph {
    /// One pedestrian search per entrance and exit; keeps the per-spot
    /// minima. A facility without any pedestrian entrances (or exits) makes
    /// that leg free instead of blocking every spot.
    fn find_pedestrian_data(&self, walk_weight: f64) -> PedestrianData {
        let blank = SpotAccess {
            entrance_distance: if self.interface.pedestrian_entrances.is_empty() {
                0.0
            } else {
                f64::INFINITY
            },
            entrance_run: None,
            exit_distance: if self.interface.pedestrian_exits.is_empty() {
                0.0
            } else {
                f64::INFINITY
            },
            exit_run: None,
        };
        let mut access: FxHashMap<String, SpotAccess> = self
            .interface
            .spots
            .iter()
            .map(|id| (id.clone(), blank))
            .collect();

        let cost = |edge: &OutEdge<SearchEdgeMeta>, _: &str| edge.weight * walk_weight;

        let mut entrance_runs = Vec::with_capacity(self.interface.pedestrian_entrances.len());
        for entrance in &self.interface.pedestrian_entrances {
            let outcome = search(&self.pedestrian_entrance, entrance, cost);
            for spot in &self.interface.spots {
                let distance = outcome.distance(spot);
                if let Some(slot) = access.get_mut(spot.as_str())
                    && distance < slot.entrance_distance
                {
                    slot.entrance_distance = distance;
                    slot.entrance_run = Some(entrance_runs.len());
                }
            }
            entrance_runs.push(outcome);
        }

        let mut exit_runs = Vec::with_capacity(self.interface.pedestrian_exits.len());
        for exit in &self.interface.pedestrian_exits {
            let outcome = search(&self.pedestrian_exit, exit, cost);
            for spot in &self.interface.spots {
                let distance = outcome.distance(spot);
                if let Some(slot) = access.get_mut(spot.as_str())
                    && distance < slot.exit_distance
                {
                    slot.exit_distance = distance;
                    slot.exit_run = Some(exit_runs.len());
                }
            }
            exit_runs.push(outcome);
        }

        PedestrianData { entrance_runs, exit_runs, access }
    }

    /// The best spot and full route bundle for one arriving car, or `None`
    /// when nothing is feasible right now. Claimed and taken spots are out
    /// of contention; so is any spot whose escort bot cannot get back.
    pub fn find_parking_spot(&self, query: &RouteQuery, spots: &SpotStore) -> Option<Route> {
        // Rescale so a right-angle turn costs `turn_weight` metres of
        // driving; a turn edge's own weight is its angle in radians.
        let turn_weight = query.turn_weight.max(0.0) / FRAC_PI_2;
        let walk_weight = query.walk_weight.max(0.0);

        let ped = self.find_pedestrian_data(walk_weight);

        let outcome = search(&self.car, &phase0(&query.start), |edge, _| match &edge.meta {
            SearchEdgeMeta::Drive { .. } => edge.weight,
            SearchEdgeMeta::Turn { spot } => {
                let mut cost = edge.weight * turn_weight;
                if let Some(turn_spot) = spot {
                    if spots.is_blocked(&turn_spot.spot) {
                        return f64::INFINITY;
                    }
                    if turn_spot.is_destination {
                        match ped.access.get(&turn_spot.spot) {
                            Some(access) => {
                                cost += access.exit_distance + access.entrance_distance;
                            }
                            None => return f64::INFINITY,
                        }
                    }
                }
                cost
            }
            SearchEdgeMeta::Walk | SearchEdgeMeta::Return { .. } => edge.weight,
        });

        // Cheapest reachable exit in phase 1; ID order breaks ties.
        let best_exit = self
            .interface
            .car_exits
            .iter()
            .map(|id| phase1(id))
            .min_by(|a, b| outcome.distance(a).total_cmp(&outcome.distance(b)))?;
        if !outcome.is_reachable(&best_exit) {
            return None;
        }

        let raw = create_path(&outcome, &best_exit);
        let car_path = original_path(&self.car, &raw);
        let (drive_in, drive_out) = split_path(&car_path, &self.facility, NodeTag::Spot);
        let spot_id = drive_out.first()?.clone();

        let access = ped.access.get(&spot_id)?;
        let walk_in = match access.entrance_run {
            Some(run) => original_path(
                &self.pedestrian_entrance,
                &create_path(&ped.entrance_runs[run], &spot_id),
            ),
            None => Vec::new(),
        };
        let walk_out = match access.exit_run {
            Some(run) => {
                let mut path = create_path(&ped.exit_runs[run], &spot_id);
                path.reverse(); // the exit graph carries reversed edges
                original_path(&self.pedestrian_exit, &path)
            }
            None => Vec::new(),
        };

        // A route is only valid if the escort bot can complete its job too.
        let bot = self.find_escort_route(&drive_in, spots)?;

        Some(Route { car: [drive_in, walk_out, walk_in, drive_out], bot })
    }

    /// Escort leg for a freshly computed approach path. Queues are tried in
    /// ID order; a facility without bot queues stations its bot at the
    /// approach start instead.
    fn find_escort_route(&self, approach: &[String], spots: &SpotStore) -> Option<BotRoute> {
        if self.interface.bot_queues.is_empty() {
            let seed = approach.first()?.clone();
            return self.find_bot_path(approach, &seed, spots);
        }
        self.interface
            .bot_queues
            .iter()
            .find_map(|queue| self.find_bot_path(approach, queue, spots))
    }

    /// Route for a bot that escorts a car along `approach` and then returns
    /// to `queue_id` without retracing the car's corridor or driving through
    /// a reserved spot.
    pub fn find_bot_path(
        &self,
        approach: &[String],
        queue_id: &str,
        spots: &SpotStore,
    ) -> Option<BotRoute> {
        // Corridor nodes may end the return search but are never expanded
        // through, so they can serve as the handover point and nothing else.
        let forbidden: FxHashSet<&str> = approach
            .iter()
            .map(String::as_str)
            .filter(|id| *id != queue_id)
            .collect();

        let outcome = search(&self.bot_return, queue_id, |edge, edge_start| {
            if forbidden.contains(edge_start) {
                return f64::INFINITY;
            }
            if let SearchEdgeMeta::Return { spot: Some(spot) } = &edge.meta
                && spots.is_blocked(spot)
            {
                return f64::INFINITY;
            }
            edge.weight
        });

        // Trim the approach tail to the last point the bot can return from.
        let cut = (0..approach.len())
            .rev()
            .find(|&i| outcome.is_reachable(&approach[i]))?;
        let trim = &approach[cut];

        let mut back = create_path(&outcome, trim);
        back.reverse(); // the return graph carries reversed edges

        let mut escort: Vec<String> = approach[..=cut].to_vec();
        if let Some(step) = back.get(1) {
            escort.push(step.clone());
        }
        let point_dir = self.waiting_direction(approach, cut, &back);
        let back_tail = back.get(1..).unwrap_or_default().to_vec();

        Some(BotRoute { point_dir, path: [escort, back_tail] })
    }

    /// Heading the bot points at while waiting at the trim point, relative
    /// to the arriving car: 0 = facing right of the car's travel direction.
    fn waiting_direction(&self, approach: &[String], cut: usize, back: &[String]) -> f64 {
        let trim = &approach[cut];
        let car_heading = if cut > 0 {
            self.heading(&approach[cut - 1], trim)
        } else {
            approach.get(1).and_then(|next| self.heading(trim, next))
        }
        .unwrap_or(0.0);
        let bot_heading = match back.get(1) {
            Some(step) => self.heading(trim, step).unwrap_or(car_heading),
            None => car_heading,
        };
        wrap_to_pi(bot_heading - car_heading + FRAC_PI_2)
    }

    fn heading(&self, from: &str, to: &str) -> Option<f64> {
        let a = self.facility.node(from)?;
        let b = self.facility.node(to)?;
        Some((b.y - a.y).atan2(b.x - a.x))
    }
}
