//! Environment-driven configuration.
//!
//! Everything the map surface and the geocoder need to start is read from
//! the environment once at launch; there is no persisted configuration.

use crate::geo::Coordinate;

const ENV_TILE_URL: &str = "SPOTTER_TILE_URL";
const ENV_MAP_API_KEY: &str = "SPOTTER_MAP_API_KEY";
const ENV_MAP_STYLE: &str = "SPOTTER_MAP_STYLE";
const ENV_GEOCODER_URL: &str = "SPOTTER_GEOCODER_URL";

/// Default map center (northern New Jersey).
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 41.014381,
    lon: -74.166191,
};

/// Zoom level when the map first opens.
pub const INITIAL_ZOOM: f64 = 8.0;

/// Zoom level applied on programmatic pans (search result, locate).
pub const PAN_ZOOM: f64 = 14.0;

/// Radius in meters used to bias address suggestions toward the center.
pub const SUGGESTION_BIAS_RADIUS_M: f64 = 200_000.0;

const DEFAULT_TILE_TEMPLATE: &str =
    "https://api.maptiler.com/maps/{style}/{z}/{x}/{y}.png?key={key}";
const DEFAULT_MAP_STYLE: &str = "streets-v2";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// The viewport cannot start without a usable tile URL; this is terminal.
#[derive(Debug, thiserror::Error)]
pub enum ViewportInitError {
    #[error("tile URL requires an API key; set SPOTTER_MAP_API_KEY")]
    MissingApiKey,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Tile URL template with `{z}`/`{x}`/`{y}` and optional `{style}` and
    /// `{key}` placeholders.
    pub tile_template: String,
    pub api_key: Option<String>,
    /// Visual theme, substituted into the template's `{style}` placeholder.
    pub map_style: String,
    /// Nominatim-compatible search endpoint.
    pub geocoder_url: String,
    pub center: Coordinate,
    pub show_zoom_controls: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup, for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            tile_template: lookup(ENV_TILE_URL)
                .unwrap_or_else(|| DEFAULT_TILE_TEMPLATE.to_string()),
            api_key: lookup(ENV_MAP_API_KEY).filter(|key| !key.is_empty()),
            map_style: lookup(ENV_MAP_STYLE).unwrap_or_else(|| DEFAULT_MAP_STYLE.to_string()),
            geocoder_url: lookup(ENV_GEOCODER_URL)
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            center: DEFAULT_CENTER,
            show_zoom_controls: true,
        }
    }

    /// Expand the tile template into a concrete URL pattern, or explain why
    /// the viewport cannot initialize.
    pub fn tile_url(&self) -> Result<String, ViewportInitError> {
        let url = self.tile_template.replace("{style}", &self.map_style);
        if !url.contains("{key}") {
            return Ok(url);
        }
        match &self.api_key {
            Some(key) => Ok(url.replace("{key}", key)),
            None => Err(ViewportInitError::MissingApiKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(empty_env);
        assert_eq!(config.map_style, DEFAULT_MAP_STYLE);
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
        assert_eq!(config.center, DEFAULT_CENTER);
        assert!(config.api_key.is_none());
        assert!(config.show_zoom_controls);
    }

    #[test]
    fn default_template_without_key_is_an_init_error() {
        let config = Config::from_lookup(empty_env);
        assert!(matches!(
            config.tile_url(),
            Err(ViewportInitError::MissingApiKey)
        ));
    }

    #[test]
    fn key_and_style_are_substituted() {
        let config = Config::from_lookup(|name| match name {
            ENV_MAP_API_KEY => Some("abc123".to_string()),
            ENV_MAP_STYLE => Some("dark".to_string()),
            _ => None,
        });
        let url = config.tile_url().unwrap();
        assert_eq!(
            url,
            "https://api.maptiler.com/maps/dark/{z}/{x}/{y}.png?key=abc123"
        );
    }

    #[test]
    fn keyless_override_template_needs_no_key() {
        let config = Config::from_lookup(|name| match name {
            ENV_TILE_URL => Some("https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()),
            _ => None,
        });
        assert_eq!(
            config.tile_url().unwrap(),
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        let config = Config::from_lookup(|name| match name {
            ENV_MAP_API_KEY => Some(String::new()),
            _ => None,
        });
        assert!(config.api_key.is_none());
    }
}
