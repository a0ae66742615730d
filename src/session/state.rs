//! Dropped markers, selection, and search-box state.
//!
//! Everything here is owned by the app shell and mutated synchronously on
//! the UI thread; background work goes through
//! [`crate::session::messages::Event`] instead of touching this directly.

use chrono::{DateTime, Utc};

use crate::geo::Coordinate;
use crate::session::messages::Suggestion;

/// Stable marker identity. Timestamps are kept for display, not identity,
/// so two markers dropped within the same clock tick stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(u64);

/// A user-dropped pin. Never mutated after creation; the collection is
/// append-only for the lifetime of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub coordinate: Coordinate,
    pub dropped_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    selected: Option<MarkerId>,
    next_id: u64,
}

impl MarkerStore {
    /// Append a marker stamped with the current time. The new marker is not
    /// auto-selected.
    pub fn add(&mut self, coordinate: Coordinate) -> MarkerId {
        self.add_at(coordinate, Utc::now())
    }

    /// Append a marker with an explicit timestamp.
    pub fn add_at(&mut self, coordinate: Coordinate, dropped_at: DateTime<Utc>) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.push(Marker {
            id,
            coordinate,
            dropped_at,
        });
        id
    }

    /// Set or clear the selection. Ids not present in the collection are
    /// rejected so the selection can never dangle.
    pub fn select(&mut self, id: Option<MarkerId>) {
        match id {
            Some(id) if !self.markers.iter().any(|m| m.id == id) => {
                log::warn!("ignoring selection of unknown marker {id:?}");
            }
            other => self.selected = other,
        }
    }

    /// Markers in insertion order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn selected(&self) -> Option<&Marker> {
        self.selected
            .and_then(|id| self.markers.iter().find(|m| m.id == id))
    }
}

/// Search-box state: field text, readiness, and the generation counters
/// that keep out-of-order responses from clobbering newer ones.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Field contents, bound to the text edit.
    pub input: String,
    /// Whether the resolver is ready; the field stays disabled until then.
    pub ready: bool,
    /// Suggestions currently on display.
    pub suggestions: Vec<Suggestion>,
    latest_query: u64,
    latest_resolve: u64,
}

impl SearchState {
    /// Record a new keystroke query; returns the generation to tag the
    /// request with.
    pub fn begin_query(&mut self) -> u64 {
        self.latest_query += 1;
        self.latest_query
    }

    /// Apply a suggestion response. Responses for anything but the most
    /// recently issued query are stale and dropped.
    pub fn apply_suggestions(&mut self, generation: u64, suggestions: Vec<Suggestion>) {
        if generation != self.latest_query {
            log::debug!("dropping stale suggestion response (generation {generation})");
            return;
        }
        self.suggestions = suggestions;
    }

    /// The user picked a suggestion: the field keeps its description and
    /// the open list is dismissed. Any in-flight suggestion query is
    /// invalidated so it cannot reopen the list. Returns the generation for
    /// the resolve request.
    pub fn choose(&mut self, description: &str) -> u64 {
        self.input = description.to_string();
        self.suggestions.clear();
        self.latest_query += 1;
        self.latest_resolve += 1;
        self.latest_resolve
    }

    /// Whether a resolve response matches the most recent choice; only the
    /// latest completed resolution may move the map.
    pub fn resolve_is_current(&self, generation: u64) -> bool {
        generation == self.latest_resolve
    }
}
