//! Messages posted by background services back to the UI loop.

use crate::geo::Coordinate;

/// A single address suggestion offered while typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Opaque identifier from the geocoder, used only for list keying.
    pub id: String,
    /// Human-readable address description.
    pub description: String,
}

/// Completed async work, drained once per frame by the app shell.
#[derive(Debug, Clone)]
pub enum Event {
    /// The address resolver finished setup; the search box may enable.
    ResolverReady,
    /// Suggestion list for the query issued with this generation.
    Suggestions {
        generation: u64,
        suggestions: Vec<Suggestion>,
    },
    /// A chosen suggestion resolved to a coordinate.
    Resolved {
        generation: u64,
        coordinate: Coordinate,
    },
    /// The geolocation service reported the current position.
    Located(Coordinate),
}
