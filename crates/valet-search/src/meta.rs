//! Search graph metadata.
//!
//! Every derived search graph carries enough metadata to map any node back
//! to exactly one facility node, and every edge declares what kind of move
//! it represents. Cost functions and path translation match on the kind
//! exhaustively.

/// Node metadata: back-reference to the facility node this search node was
/// derived from (clones and namespaced copies all point at the same ID).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNodeMeta {
    pub facility: String,
}

impl SearchNodeMeta {
    pub fn of(facility: impl Into<String>) -> Self {
        Self { facility: facility.into() }
    }
}

/// Spot annotation on a turn edge: which spot the turn passes through and
/// whether taking it means parking there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSpot {
    pub spot: String,
    pub is_destination: bool,
}

/// Edge metadata, discriminated by the kind of move.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchEdgeMeta {
    /// A drive edge copied from the facility graph; `angle` is the heading
    /// used by turn-cost splitting.
    Drive { angle: f64 },

    /// A synthetic turn-penalty edge created by node splitting; the weight is
    /// the minimal turning angle in radians.
    Turn { spot: Option<TurnSpot> },

    /// A pedestrian edge (possibly reversed) copied from the facility graph.
    Walk,

    /// A reversed bot edge in the return graph; `spot` names the spot this
    /// edge enters, if any.
    Return { spot: Option<String> },
}

impl SearchEdgeMeta {
    /// The heading of the underlying facility edge, for edges that have one.
    /// Only drive edges take part in turn-cost splitting.
    pub fn heading(&self) -> Option<f64> {
        match self {
            SearchEdgeMeta::Drive { angle } => Some(*angle),
            SearchEdgeMeta::Turn { .. } | SearchEdgeMeta::Walk | SearchEdgeMeta::Return { .. } => {
                None
            }
        }
    }
}
