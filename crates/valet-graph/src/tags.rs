//! Tag vocabulary for facility nodes and edges.
//!
//! Tags serve two roles: *role* tags mark interface points of the facility
//! (spots, entrances, exits, bot queues), *path* tags mark which kind of
//! traffic may use a node or edge. The normalizer fills missing tag sets with
//! the all-paths default and derives path tags from role tags, so downstream
//! code never has to special-case untagged input.

use serde::{Deserialize, Serialize};

/// Tags carried by facility nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeTag {
    /// A parking spot with a reservation lifecycle.
    Spot,
    /// The car entrance of the facility.
    Entrance,
    /// The car exit of the facility.
    Exit,
    /// Where pedestrians enter the facility.
    PedestrianEntrance,
    /// Where pedestrians leave the facility.
    PedestrianExit,
    /// Where idle escort bots queue up.
    BotQueue,
    /// Where an escort bot may appear, only meaningful to a simulation.
    BotSpawn,
    /// The node sits on a drivable lane.
    CarPath,
    /// The node sits on a walkable path.
    PedestrianPath,
    /// The node sits on a bot-passable path.
    BotPath,
}

/// Tags carried by facility edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeTag {
    CarPath,
    PedestrianPath,
    BotPath,
}

/// Default node tag set when none is given: usable by every kind of traffic.
pub const ALL_NODE_PATHS: [NodeTag; 3] =
    [NodeTag::CarPath, NodeTag::PedestrianPath, NodeTag::BotPath];

/// Default edge tag set when none is given.
pub const ALL_EDGE_PATHS: [EdgeTag; 3] =
    [EdgeTag::CarPath, EdgeTag::PedestrianPath, EdgeTag::BotPath];
