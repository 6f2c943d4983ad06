//! Unit tests for valet-lot.

#[cfg(test)]
mod helpers {
    use std::sync::{Arc, Mutex};

    use valet_graph::{EdgeTag, FacilityEdge, FacilityGraph, FacilityNode, NodeTag};

    use crate::lot::ParkingLot;
    use crate::spots::{SpotListener, SpotUpdate};

    pub const DRIVE: &[EdgeTag] = &[EdgeTag::CarPath, EdgeTag::BotPath];
    pub const WALK: &[EdgeTag] = &[EdgeTag::PedestrianPath];
    pub const BOT: &[EdgeTag] = &[EdgeTag::BotPath];

    fn walk_edge(end: &str, distance: f64) -> FacilityEdge {
        let mut edge = FacilityEdge::to_tagged(end, WALK);
        edge.distance = Some(distance);
        edge
    }

    /// The standard test lot:
    ///
    /// ```text
    /// pentrance (0,20)                    pexit (30,20)
    ///
    ///        s1 (10,5)      s2 (20,10)
    ///         |              |
    /// entrance → a (10,0) → b (20,0) → exit (30,0)
    ///             |
    ///           queue (10,-10)
    /// ```
    ///
    /// Driving to s1 is shorter than to s2, but s2 is far cheaper on foot:
    /// the walk edges carry explicit distances (5 vs 100) so the pedestrian
    /// preference is unmistakable. The bot queue hangs off `a` with
    /// bot-only lanes in both directions.
    pub fn lot_graph() -> FacilityGraph {
        let mut g = FacilityGraph::new();
        g.insert(
            "entrance",
            FacilityNode::at(0.0, 0.0)
                .with_tags(&[NodeTag::Entrance])
                .with_edges(vec![FacilityEdge::to_tagged("a", DRIVE)]),
        );
        g.insert(
            "a",
            FacilityNode::at(10.0, 0.0).with_edges(vec![
                FacilityEdge::to_tagged("b", DRIVE),
                FacilityEdge::to_tagged("s1", DRIVE),
                FacilityEdge::to_tagged("queue", BOT),
            ]),
        );
        g.insert(
            "b",
            FacilityNode::at(20.0, 0.0).with_edges(vec![
                FacilityEdge::to_tagged("exit", DRIVE),
                FacilityEdge::to_tagged("s2", DRIVE),
            ]),
        );
        g.insert("exit", FacilityNode::at(30.0, 0.0).with_tags(&[NodeTag::Exit]));
        g.insert(
            "s1",
            FacilityNode::at(10.0, 5.0)
                .with_tags(&[NodeTag::Spot])
                .with_edges(vec![walk_edge("pexit", 100.0)]),
        );
        g.insert(
            "s2",
            FacilityNode::at(20.0, 10.0)
                .with_tags(&[NodeTag::Spot])
                .with_edges(vec![walk_edge("pexit", 5.0)]),
        );
        g.insert(
            "queue",
            FacilityNode::at(10.0, -10.0)
                .with_tags(&[NodeTag::BotQueue])
                .with_edges(vec![FacilityEdge::to_tagged("a", BOT)]),
        );
        g.insert(
            "pentrance",
            FacilityNode::at(0.0, 20.0)
                .with_tags(&[NodeTag::PedestrianEntrance])
                .with_edges(vec![walk_edge("s1", 100.0), walk_edge("s2", 5.0)]),
        );
        g.insert(
            "pexit",
            FacilityNode::at(30.0, 20.0).with_tags(&[NodeTag::PedestrianExit]),
        );
        g
    }

    pub fn lot() -> ParkingLot {
        ParkingLot::new(lot_graph()).unwrap()
    }

    /// Same lot, but the queue node has no lanes at all: the bot can never
    /// get back to it.
    pub fn lot_with_unreachable_queue() -> ParkingLot {
        let mut g = lot_graph();
        g.node_mut("a").unwrap().edges.retain(|edge| edge.end != "queue");
        g.node_mut("queue").unwrap().edges.clear();
        ParkingLot::new(g).unwrap()
    }

    /// A minimal lot with no pedestrian infrastructure and no bot queue.
    pub fn mini_lot() -> ParkingLot {
        let mut g = FacilityGraph::new();
        g.insert(
            "entrance",
            FacilityNode::at(0.0, 0.0)
                .with_tags(&[NodeTag::Entrance])
                .with_edges(vec![FacilityEdge::to("a")]),
        );
        g.insert(
            "a",
            FacilityNode::at(10.0, 0.0)
                .with_edges(vec![FacilityEdge::to("spot"), FacilityEdge::to("exit")]),
        );
        g.insert("spot", FacilityNode::at(10.0, 10.0).with_tags(&[NodeTag::Spot]));
        g.insert("exit", FacilityNode::at(20.0, 0.0).with_tags(&[NodeTag::Exit]));
        ParkingLot::new(g).unwrap()
    }

    pub fn path(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| (*id).to_owned()).collect()
    }

    /// Listener that records every update it receives.
    #[derive(Clone, Default)]
    pub struct Recorder(Arc<Mutex<Vec<SpotUpdate>>>);

    impl Recorder {
        pub fn updates(&self) -> Vec<SpotUpdate> {
            self.0.lock().unwrap().clone()
        }
    }

    impl SpotListener for Recorder {
        fn spot_changed(&mut self, update: &SpotUpdate) {
            self.0.lock().unwrap().push(update.clone());
        }
    }
}

// ── Reservation store ─────────────────────────────────────────────────────────

#[cfg(test)]
mod reservations {
    use crate::spots::{SpotStore, SpotUpdate};

    fn store() -> SpotStore {
        SpotStore::from_graph(super::helpers::lot().graph())
    }

    #[test]
    fn claim_is_the_serialization_point() {
        let mut store = store();
        assert!(store.claim("s1"));
        assert!(!store.claim("s1"));

        store.take("s2", "car-7");
        assert!(!store.claim("s2"));

        store.disclaim("s1");
        assert!(store.claim("s1"));
    }

    #[test]
    fn take_overrides_any_state() {
        let mut store = store();
        assert!(store.claim("s1"));
        store.take("s1", "car-42");

        let state = store.state("s1").unwrap();
        assert!(!state.claimed);
        assert!(state.taken);
        assert_eq!(state.occupant.as_deref(), Some("car-42"));
        assert!(store.is_blocked("s1"));

        store.release("s1");
        let state = store.state("s1").unwrap();
        assert_eq!(state.occupant, None);
        assert!(!store.is_blocked("s1"));
    }

    #[test]
    fn unknown_spots_cannot_be_claimed() {
        let mut store = store();
        assert!(!store.claim("ghost"));
        assert!(!store.is_blocked("ghost"));
    }

    #[test]
    fn every_effective_mutation_broadcasts() {
        let recorder = super::helpers::Recorder::default();
        let mut store = store();
        store.subscribe(Box::new(recorder.clone()));

        store.claim("s1");
        store.disclaim("s2"); // not claimed, no broadcast
        store.take("s1", "car-9");
        store.release("s1");

        let updates = recorder.updates();
        assert_eq!(
            updates,
            vec![
                SpotUpdate { id: "s1".into(), is_claimed: true, is_taken: false },
                SpotUpdate { id: "s1".into(), is_claimed: false, is_taken: true },
                SpotUpdate { id: "s1".into(), is_claimed: false, is_taken: false },
            ]
        );
    }

    #[test]
    fn updates_are_redacted_and_camel_case() {
        let mut store = store();
        store.take("s1", "car-1");
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);

        let json = serde_json::to_value(&snapshot[0]).unwrap();
        assert_eq!(json["id"], "s1");
        assert_eq!(json["isClaimed"], false);
        assert_eq!(json["isTaken"], true);
        assert!(json.get("occupant").is_none());
    }
}

// ── Derived graph structure ───────────────────────────────────────────────────

#[cfg(test)]
mod graphs {
    use valet_graph::{FacilityEdge, FacilityGraph, FacilityNode, GraphError, normalize};
    use valet_search::SearchEdgeMeta;

    use crate::lot::ParkingLot;
    use crate::search_graph::ParkingSearchGraph;

    fn search_graph() -> ParkingSearchGraph {
        ParkingSearchGraph::new(normalize(super::helpers::lot_graph()).unwrap()).unwrap()
    }

    #[test]
    fn phase_zero_has_no_exit_copy() {
        let g = search_graph();
        assert!(g.car.node_ids().all(|id| !id.starts_with("0-exit")));
        assert!(g.car.contains_node("1-exit"));
        assert!(g.car.contains_node("0-entrance"));
    }

    #[test]
    fn spots_live_only_in_the_bridge_namespace() {
        let g = search_graph();
        for spot in ["s1", "s2"] {
            assert!(g.car.node_ids().all(|id| !id.starts_with(&format!("0-{spot}"))));
            assert!(g.car.node_ids().all(|id| !id.starts_with(&format!("1-{spot}"))));
            // Split clones of the bridge copy remain.
            assert!(g.car.node_ids().any(|id| id.starts_with(&format!("spot-{spot}"))));
        }
    }

    #[test]
    fn spot_turn_edges_carry_parking_metadata() {
        let g = search_graph();
        let mut tagged_spots = Vec::new();
        for (id, node) in g.car.iter() {
            for edge in &node.edges {
                if let SearchEdgeMeta::Turn { spot: Some(turn_spot) } = &edge.meta {
                    assert!(id.starts_with("spot-"), "turn at {id} tagged {turn_spot:?}");
                    assert!(turn_spot.is_destination);
                    tagged_spots.push(turn_spot.spot.clone());
                }
            }
        }
        tagged_spots.sort();
        tagged_spots.dedup();
        assert_eq!(tagged_spots, vec!["s1", "s2"]);
    }

    #[test]
    fn bot_return_edges_point_backward() {
        let g = search_graph();
        let a = g.bot_return.node("a").unwrap();
        assert!(a.edges.iter().any(|edge| edge.end == "entrance"));
        // The only way into the queue is the reverse of a -> queue.
        let queue_in = g.bot_return.node("queue").unwrap();
        assert!(queue_in.edges.iter().any(|edge| edge.end == "a"));
    }

    #[test]
    fn non_normalized_graph_is_rejected() {
        let mut g = FacilityGraph::new();
        g.insert("a", FacilityNode::at(0.0, 0.0).with_edges(vec![FacilityEdge::to("b")]));
        g.insert("b", FacilityNode::at(10.0, 0.0));
        assert!(matches!(
            ParkingSearchGraph::new(g),
            Err(GraphError::MissingGeometry { .. })
        ));
    }

    #[test]
    fn geometry_is_checked_before_tag_filtering() {
        let mut g = normalize(super::helpers::lot_graph()).unwrap();
        // An empty tag set means no derived graph would keep this edge, but
        // the missing distance must still refuse construction.
        let edge = &mut g.node_mut("a").unwrap().edges[0];
        edge.tags = Some(Vec::new());
        edge.distance = None;
        assert!(matches!(
            ParkingSearchGraph::new(g),
            Err(GraphError::MissingGeometry { .. })
        ));
    }

    #[test]
    fn dangling_references_fail_lot_construction() {
        let mut g = super::helpers::lot_graph();
        g.node_mut("a").unwrap().edges.push(FacilityEdge::to("ghost"));
        assert!(matches!(
            ParkingLot::new(g),
            Err(GraphError::DanglingEdge { .. })
        ));
    }
}

// ── Route queries ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::helpers::path;

    #[test]
    fn closest_spot_wins_when_walking_is_free() {
        let lot = super::helpers::lot();
        let route = lot.request_route("entrance", 0.0, 0.0).unwrap();
        assert_eq!(route.spot(), Some("s1"));
        assert_eq!(route.drive_in(), path(&["entrance", "a", "s1"]));
        assert_eq!(route.drive_out(), path(&["s1", "a", "b", "exit"]));
    }

    #[test]
    fn pedestrian_access_flips_the_choice() {
        let lot = super::helpers::lot();
        let route = lot.request_route("entrance", 1.0, 0.0).unwrap();
        assert_eq!(route.spot(), Some("s2"));
        assert_eq!(route.drive_in(), path(&["entrance", "a", "b", "s2"]));
        assert_eq!(route.walk_out(), path(&["s2", "pexit"]));
        assert_eq!(route.walk_in(), path(&["pentrance", "s2"]));
        assert_eq!(route.drive_out(), path(&["s2", "b", "exit"]));
    }

    #[test]
    fn drive_segments_share_the_spot() {
        let lot = super::helpers::lot();
        for walk in [0.0, 1.0, 10.0] {
            let route = lot.request_route("entrance", walk, 5.0).unwrap();
            let spot = route.spot().unwrap();
            assert_eq!(route.drive_in().last().map(String::as_str), Some(spot));
            assert_eq!(route.drive_out().first().map(String::as_str), Some(spot));
            assert!(!lot.spot_store().is_blocked(spot));
        }
    }

    #[test]
    fn claimed_spot_drops_out_of_contention() {
        let mut lot = super::helpers::lot();
        assert!(lot.claim_spot("s1"));
        let route = lot.request_route("entrance", 0.0, 0.0).unwrap();
        assert_eq!(route.spot(), Some("s2"));
    }

    #[test]
    fn taken_spot_drops_out_of_contention() {
        let mut lot = super::helpers::lot();
        lot.take_spot("s1", "car-3");
        let route = lot.request_route("entrance", 0.0, 0.0).unwrap();
        assert_eq!(route.spot(), Some("s2"));
    }

    #[test]
    fn all_spots_blocked_yields_none() {
        let mut lot = super::helpers::lot();
        assert!(lot.claim_spot("s1"));
        assert!(lot.claim_spot("s2"));
        assert_eq!(lot.request_route("entrance", 0.0, 0.0), None);
    }

    #[test]
    fn released_spot_returns_to_contention() {
        let mut lot = super::helpers::lot();
        lot.take_spot("s1", "car-5");
        assert_eq!(lot.request_route("entrance", 0.0, 0.0).unwrap().spot(), Some("s2"));
        lot.release_spot("s1");
        assert_eq!(lot.request_route("entrance", 0.0, 0.0).unwrap().spot(), Some("s1"));
    }

    #[test]
    fn missing_start_yields_none() {
        let lot = super::helpers::lot();
        assert_eq!(lot.request_route("nowhere", 1.0, 1.0), None);
    }

    #[test]
    fn lot_without_pedestrian_infrastructure_still_routes() {
        let lot = super::helpers::mini_lot();
        let route = lot.request_route("entrance", 5.0, 5.0).unwrap();
        assert_eq!(route.spot(), Some("spot"));
        assert_eq!(route.drive_in(), path(&["entrance", "a", "spot"]));
        assert_eq!(route.drive_out(), path(&["spot", "a", "exit"]));
        assert!(route.walk_out().is_empty());
        assert!(route.walk_in().is_empty());
    }

    #[test]
    fn negative_weights_are_clamped() {
        let lot = super::helpers::lot();
        // Same outcome as walking free: weights below zero count as zero.
        let route = lot.request_route("entrance", -3.0, -1.0).unwrap();
        assert_eq!(route.spot(), Some("s1"));
    }

    #[test]
    fn route_serializes_camel_case() {
        let lot = super::helpers::lot();
        let route = lot.request_route("entrance", 1.0, 1.0).unwrap();
        let json = serde_json::to_value(&route).unwrap();
        assert!(json["bot"]["pointDir"].is_number());
        assert_eq!(json["car"].as_array().unwrap().len(), 4);
        assert_eq!(json["bot"]["path"].as_array().unwrap().len(), 2);
    }
}

// ── Bot escort and return ─────────────────────────────────────────────────────

#[cfg(test)]
mod bots {
    use std::f64::consts::FRAC_PI_2;

    use super::helpers::path;

    #[test]
    fn escort_steps_aside_at_the_trim_point() {
        let lot = super::helpers::lot();
        let route = lot.request_route("entrance", 0.0, 0.0).unwrap();
        // The bot follows the car to `a`, then steps aside into the queue
        // lane; the return from s1 itself would retrace the corridor.
        assert_eq!(route.bot.escort(), path(&["entrance", "a", "queue"]));
        assert_eq!(route.bot.back(), path(&["queue"]));
        // The bot waits facing the queue, to the right of the arriving car.
        assert!(route.bot.point_dir.abs() < 1e-12);
    }

    #[test]
    fn corridor_nodes_are_not_retraced() {
        let lot = super::helpers::lot();
        let approach = path(&["entrance", "a", "s1"]);
        let bot = lot.bot_return_route(&approach, "queue").unwrap();
        // A return from s1 exists in the lot (s1 -> a -> queue) but would
        // pass through the corridor node `a`, so the trim stops at `a`.
        assert_eq!(bot.escort(), path(&["entrance", "a", "queue"]));
        assert_eq!(bot.back(), path(&["queue"]));
    }

    #[test]
    fn unreachable_queue_fails_the_whole_route() {
        let lot = super::helpers::lot_with_unreachable_queue();
        // A car route exists, but the escort bot could never get back.
        assert_eq!(lot.request_route("entrance", 0.0, 0.0), None);
    }

    #[test]
    fn lot_without_queues_stations_the_bot_at_the_start() {
        let lot = super::helpers::mini_lot();
        let route = lot.request_route("entrance", 0.0, 0.0).unwrap();
        assert_eq!(route.bot.escort(), path(&["entrance"]));
        assert!(route.bot.back().is_empty());
        // No step aside: the bot faces straight ahead of the car.
        assert!((route.bot.point_dir - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn reserved_spots_block_the_return_lane() {
        let mut lot = super::helpers::lot();
        assert!(lot.claim_spot("s1"));
        // Return from b: the direct reverse lane runs b -> a -> queue and
        // never touches s1, so the claim must not matter here.
        let approach = path(&["entrance", "a", "b"]);
        let bot = lot.bot_return_route(&approach, "queue").unwrap();
        assert_eq!(bot.escort(), path(&["entrance", "a", "queue"]));
    }
}
