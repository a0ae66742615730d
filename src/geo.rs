//! Geographic value types shared across the application.

use walkers::Position;

/// A WGS84 coordinate pair. Immutable value, produced by the geocoder, the
/// geolocation service, or a map click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Convert into the map widget's position type.
    pub fn position(self) -> Position {
        walkers::lat_lon(self.lat, self.lon)
    }
}

impl From<Position> for Coordinate {
    fn from(position: Position) -> Self {
        // walkers positions are (x = longitude, y = latitude)
        Self {
            lat: position.y(),
            lon: position.x(),
        }
    }
}
