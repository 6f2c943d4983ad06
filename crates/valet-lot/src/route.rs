//! Route bundle returned by a successful parking query.

use serde::{Deserialize, Serialize};

/// The escort bot's half of a route: the heading to point at while waiting
/// and the two bot path segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotRoute {
    /// Waiting heading in radians relative to the arriving car, 0 = facing
    /// right of the car's direction of travel.
    pub point_dir: f64,

    /// `[escort, back]`: accompany the car to the handover point plus one
    /// step aside, then drive the remaining way back to the queue.
    pub path: [Vec<String>; 2],
}

impl BotRoute {
    pub fn escort(&self) -> &[String] {
        &self.path[0]
    }

    pub fn back(&self) -> &[String] {
        &self.path[1]
    }
}

/// A complete answer to "where should this car park": four car segments in
/// travel order plus the escort bot's route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// `[driveIn, walkOut, walkIn, driveOut]`.
    pub car: [Vec<String>; 4],
    pub bot: BotRoute,
}

impl Route {
    /// Car entrance to the assigned spot.
    pub fn drive_in(&self) -> &[String] {
        &self.car[0]
    }

    /// Spot to the pedestrian exit, after parking.
    pub fn walk_out(&self) -> &[String] {
        &self.car[1]
    }

    /// Pedestrian entrance back to the spot, on return.
    pub fn walk_in(&self) -> &[String] {
        &self.car[2]
    }

    /// Spot to the car exit.
    pub fn drive_out(&self) -> &[String] {
        &self.car[3]
    }

    /// The assigned spot: last node of drive-in, first node of drive-out.
    pub fn spot(&self) -> Option<&str> {
        self.car[3].first().map(String::as_str)
    }
}
