//! Live spot reservation state.
//!
//! One state machine per spot: available ⇄ claimed → taken → available.
//! Searches read the store without any coordination; the lost race between
//! two requesters who both saw a spot free resolves through `claim` itself,
//! which is the sole serialization point and reports the loss as `false`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use valet_graph::{FacilityGraph, NodeTag};

/// Reservation state of one spot. `taken` and `claimed` are mutually
/// exclusive: taking a spot clears any claim on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpotState {
    pub claimed: bool,
    pub taken: bool,
    /// Who parked here. Never broadcast; listeners get the redacted
    /// [`SpotUpdate`] instead.
    pub occupant: Option<String>,
}

/// Redacted per-spot snapshot sent to listeners on every state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotUpdate {
    pub id: String,
    pub is_claimed: bool,
    pub is_taken: bool,
}

/// Receives a redacted update after every effective store mutation.
pub trait SpotListener {
    fn spot_changed(&mut self, update: &SpotUpdate);
}

/// The reservation store: spot states keyed by facility node ID, plus the
/// registered listeners.
#[derive(Default)]
pub struct SpotStore {
    spots: BTreeMap<String, SpotState>,
    listeners: Vec<Box<dyn SpotListener + Send>>,
}

impl fmt::Debug for SpotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotStore")
            .field("spots", &self.spots)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SpotStore {
    /// One available spot per spot-tagged node of the facility graph.
    pub fn from_graph(facility: &FacilityGraph) -> Self {
        let spots = facility
            .ids_with_tag(NodeTag::Spot)
            .into_iter()
            .map(|id| (id, SpotState::default()))
            .collect();
        Self { spots, listeners: Vec::new() }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.spots.contains_key(id)
    }

    pub fn state(&self, id: &str) -> Option<&SpotState> {
        self.spots.get(id)
    }

    /// Read oracle for searches: a claimed or taken spot is not a parking
    /// candidate. Unknown IDs count as unblocked.
    pub fn is_blocked(&self, id: &str) -> bool {
        self.spots
            .get(id)
            .is_some_and(|state| state.claimed || state.taken)
    }

    /// Spot IDs in sorted order.
    pub fn spot_ids(&self) -> impl Iterator<Item = &str> {
        self.spots.keys().map(String::as_str)
    }

    /// Reserve a spot. Fails (`false`) if the spot is unknown, already
    /// claimed, or taken.
    pub fn claim(&mut self, id: &str) -> bool {
        match self.spots.get_mut(id) {
            Some(state) if !state.claimed && !state.taken => {
                state.claimed = true;
                self.notify(id);
                true
            }
            _ => false,
        }
    }

    /// Give up a claim. No-op unless the spot is currently claimed.
    pub fn disclaim(&mut self, id: &str) {
        if let Some(state) = self.spots.get_mut(id)
            && state.claimed
        {
            state.claimed = false;
            self.notify(id);
        }
    }

    /// Mark a spot as physically occupied. Always succeeds regardless of
    /// prior state; any claim on the spot is cleared.
    pub fn take(&mut self, id: &str, occupant: impl Into<String>) {
        if let Some(state) = self.spots.get_mut(id) {
            state.claimed = false;
            state.taken = true;
            state.occupant = Some(occupant.into());
            self.notify(id);
        }
    }

    /// Return a spot to available, whatever its prior state.
    pub fn release(&mut self, id: &str) {
        if let Some(state) = self.spots.get_mut(id) {
            state.claimed = false;
            state.taken = false;
            state.occupant = None;
            self.notify(id);
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn SpotListener + Send>) {
        self.listeners.push(listener);
    }

    /// Redacted view of every spot, in ID order.
    pub fn snapshot(&self) -> Vec<SpotUpdate> {
        self.spots
            .iter()
            .map(|(id, state)| SpotUpdate {
                id: id.clone(),
                is_claimed: state.claimed,
                is_taken: state.taken,
            })
            .collect()
    }

    fn notify(&mut self, id: &str) {
        let Some(state) = self.spots.get(id) else { return };
        let update = SpotUpdate {
            id: id.to_owned(),
            is_claimed: state.claimed,
            is_taken: state.taken,
        };
        for listener in &mut self.listeners {
            listener.spot_changed(&update);
        }
    }
}
