//! Derived search graphs, built once from the normalized facility graph.
//!
//! Four graphs are derived and then frozen:
//!
//! - pedestrian entrance graph: walkable edges as given,
//! - pedestrian exit graph: the same edges reversed,
//! - car graph: drivable-and-escortable edges duplicated into a phase-0
//!   (toward a spot) and a phase-1 (toward an exit) namespace, bridged only
//!   through a per-spot namespace, with turn-cost splitting applied,
//! - bot-return graph: escortable edges reversed.
//!
//! The phase construction forces every car route to pass through exactly one
//! spot: phase 0 has no exit nodes, phase 1 is only reachable by crossing a
//! spot bridge.

use valet_graph::{
    AdjacencyGraph, EdgeTag, FacilityGraph, GraphError, GraphResult, NodeTag, SymmetricEdge,
    TransformableGraph,
};
use valet_search::{SearchEdgeMeta, SearchNodeMeta, TurnSpot, add_node_turn_cost_edges};

pub(crate) type SearchGraph = AdjacencyGraph<SearchNodeMeta, SearchEdgeMeta>;
type BuildGraph = TransformableGraph<SearchNodeMeta, SearchEdgeMeta>;

/// A facility edge flattened to plain geometry, after tag filtering.
struct FlatEdge {
    start: String,
    end: String,
    distance: f64,
    angle: f64,
}

/// Every facility edge carrying all of `tags`. Each edge is validated before
/// the tag filter runs: an edge missing its geometry or tag set means the
/// graph was never normalized, and skipping it would silently yield empty
/// derived graphs instead of an error.
fn flat_edges(facility: &FacilityGraph, tags: &[EdgeTag]) -> GraphResult<Vec<FlatEdge>> {
    let mut edges = Vec::new();
    for (start, node) in facility.iter() {
        for edge in &node.edges {
            let (Some(distance), Some(angle), Some(_)) =
                (edge.distance, edge.angle, edge.tags.as_ref())
            else {
                return Err(GraphError::MissingGeometry {
                    start: start.to_owned(),
                    end: edge.end.clone(),
                });
            };
            if !tags.iter().all(|tag| edge.has_tag(*tag)) {
                continue;
            }
            edges.push(FlatEdge {
                start: start.to_owned(),
                end: edge.end.clone(),
                distance,
                angle,
            });
        }
    }
    Ok(edges)
}

pub(crate) fn phase0(id: &str) -> String {
    format!("0-{id}")
}

pub(crate) fn phase1(id: &str) -> String {
    format!("1-{id}")
}

fn spot_ns(id: &str) -> String {
    format!("spot-{id}")
}

/// Whether `id` is one of the facility's interface points. Interface nodes
/// are exempt from turn-cost splitting; spots deliberately are not, because
/// their turn edges carry the parking metadata.
pub(crate) fn is_interface_node(facility: &FacilityGraph, id: &str) -> bool {
    const INTERFACE: [NodeTag; 4] = [
        NodeTag::Entrance,
        NodeTag::Exit,
        NodeTag::PedestrianEntrance,
        NodeTag::PedestrianExit,
    ];
    facility
        .node(id)
        .is_some_and(|node| INTERFACE.iter().any(|tag| node.has_tag(*tag)))
}

/// The facility's interface points, each list in ID order.
#[derive(Clone, Debug)]
pub struct InterfaceNodes {
    pub car_entrances: Vec<String>,
    pub car_exits: Vec<String>,
    pub pedestrian_entrances: Vec<String>,
    pub pedestrian_exits: Vec<String>,
    pub spots: Vec<String>,
    pub bot_queues: Vec<String>,
}

impl InterfaceNodes {
    fn collect(facility: &FacilityGraph) -> Self {
        Self {
            car_entrances: facility.ids_with_tag(NodeTag::Entrance),
            car_exits: facility.ids_with_tag(NodeTag::Exit),
            pedestrian_entrances: facility.ids_with_tag(NodeTag::PedestrianEntrance),
            pedestrian_exits: facility.ids_with_tag(NodeTag::PedestrianExit),
            spots: facility.ids_with_tag(NodeTag::Spot),
            bot_queues: facility.ids_with_tag(NodeTag::BotQueue),
        }
    }
}

/// The frozen derived graphs plus the normalized facility graph they came
/// from. Immutable after construction; all route queries run against it.
#[derive(Debug)]
pub struct ParkingSearchGraph {
    pub(crate) facility: FacilityGraph,
    pub(crate) pedestrian_entrance: SearchGraph,
    pub(crate) pedestrian_exit: SearchGraph,
    pub(crate) car: SearchGraph,
    pub(crate) bot_return: SearchGraph,
    pub(crate) interface: InterfaceNodes,
}

impl ParkingSearchGraph {
    /// Derive all search graphs from a normalized facility graph.
    pub fn new(facility: FacilityGraph) -> GraphResult<Self> {
        let (pedestrian_entrance, pedestrian_exit) = Self::pedestrian_graphs(&facility)?;
        let car = Self::car_graph(&facility)?;
        let bot_return = Self::bot_return_graph(&facility)?;
        let interface = InterfaceNodes::collect(&facility);
        Ok(Self {
            facility,
            pedestrian_entrance,
            pedestrian_exit,
            car,
            bot_return,
            interface,
        })
    }

    pub fn facility(&self) -> &FacilityGraph {
        &self.facility
    }

    pub fn interface(&self) -> &InterfaceNodes {
        &self.interface
    }

    fn pedestrian_graphs(facility: &FacilityGraph) -> GraphResult<(SearchGraph, SearchGraph)> {
        let edges = flat_edges(facility, &[EdgeTag::PedestrianPath])?;
        let mut forward = BuildGraph::new();
        let mut reverse = BuildGraph::new();
        for e in &edges {
            for id in [e.start.as_str(), e.end.as_str()] {
                forward.add_node(id, SearchNodeMeta::of(id));
                reverse.add_node(id, SearchNodeMeta::of(id));
            }
            forward.add_edge(SymmetricEdge {
                start: e.start.clone(),
                end: e.end.clone(),
                weight: e.distance,
                meta: SearchEdgeMeta::Walk,
            });
            reverse.add_edge(SymmetricEdge {
                start: e.end.clone(),
                end: e.start.clone(),
                weight: e.distance,
                meta: SearchEdgeMeta::Walk,
            });
        }
        Ok((forward.export(), reverse.export()))
    }

    fn car_graph(facility: &FacilityGraph) -> GraphResult<SearchGraph> {
        let edges = flat_edges(facility, &[EdgeTag::CarPath, EdgeTag::BotPath])?;
        let tagged =
            |id: &str, tag: NodeTag| facility.node(id).is_some_and(|node| node.has_tag(tag));

        // Namespaced copies of every incident node. Spots live only in the
        // bridge namespace; exits only in phase 1, so a car cannot leave
        // without parking first.
        let mut g = BuildGraph::new();
        for e in &edges {
            for id in [e.start.as_str(), e.end.as_str()] {
                let meta = SearchNodeMeta::of(id);
                if tagged(id, NodeTag::Spot) {
                    g.add_node(spot_ns(id), meta);
                } else {
                    if !tagged(id, NodeTag::Exit) {
                        g.add_node(phase0(id), meta.clone());
                    }
                    g.add_node(phase1(id), meta);
                }
            }
        }

        for e in &edges {
            let mut pairs: Vec<(String, String)> = Vec::with_capacity(2);
            match (tagged(&e.start, NodeTag::Spot), tagged(&e.end, NodeTag::Spot)) {
                // A lane directly between two spots is not a drivable route.
                (true, true) => {}
                (true, false) => pairs.push((spot_ns(&e.start), phase1(&e.end))),
                (false, true) => pairs.push((phase0(&e.start), spot_ns(&e.end))),
                (false, false) => {
                    pairs.push((phase0(&e.start), phase0(&e.end)));
                    pairs.push((phase1(&e.start), phase1(&e.end)));
                }
            }
            for (start, end) in pairs {
                if g.contains_node(&start) && g.contains_node(&end) {
                    g.add_edge(SymmetricEdge {
                        start,
                        end,
                        weight: e.distance,
                        meta: SearchEdgeMeta::Drive { angle: e.angle },
                    });
                }
            }
        }

        // Turn-cost splitting on everything but the facility's interface
        // points.
        let split: Vec<String> = g
            .nodes()
            .filter(|(_, meta)| !is_interface_node(facility, &meta.facility))
            .map(|(id, _)| id.to_owned())
            .collect();
        for id in &split {
            add_node_turn_cost_edges(&mut g, id)?;
        }

        // Every turn edge crossing a spot gets the spot ID attached; taking
        // such an edge means parking there.
        let retag: Vec<SymmetricEdge<SearchEdgeMeta>> = g
            .edges()
            .filter(|e| matches!(e.meta, SearchEdgeMeta::Turn { .. }))
            .filter(|e| {
                g.node_meta(&e.start)
                    .is_some_and(|meta| tagged(&meta.facility, NodeTag::Spot))
            })
            .cloned()
            .collect();
        for edge in retag {
            let Some(spot) = g.node_meta(&edge.start).map(|meta| meta.facility.clone()) else {
                continue;
            };
            g.add_edge(SymmetricEdge {
                meta: SearchEdgeMeta::Turn {
                    spot: Some(TurnSpot { spot, is_destination: true }),
                },
                ..edge
            });
        }

        Ok(g.export())
    }

    fn bot_return_graph(facility: &FacilityGraph) -> GraphResult<SearchGraph> {
        let edges = flat_edges(facility, &[EdgeTag::BotPath])?;
        let tagged =
            |id: &str, tag: NodeTag| facility.node(id).is_some_and(|node| node.has_tag(tag));

        let mut g = BuildGraph::new();
        for e in &edges {
            for id in [e.start.as_str(), e.end.as_str()] {
                g.add_node(id, SearchNodeMeta::of(id));
            }
            // Reversed edge; `spot` marks the spot the edge leads into, so
            // searches can refuse to route through reserved spots.
            let spot = tagged(&e.start, NodeTag::Spot).then(|| e.start.clone());
            g.add_edge(SymmetricEdge {
                start: e.end.clone(),
                end: e.start.clone(),
                weight: e.distance,
                meta: SearchEdgeMeta::Return { spot },
            });
        }
        Ok(g.export())
    }
}
