//! Address suggestion and geocoding against a Nominatim-compatible endpoint.

use serde::Deserialize;

use crate::geo::Coordinate;
use crate::session::messages::Suggestion;

/// How many suggestions to offer while typing.
const SUGGESTION_LIMIT: u32 = 5;

/// Errors from the address resolver. Callers log and swallow these; nothing
/// is retried.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("geocoder returned no results")]
    NoResults,
    #[error("geocoder returned unparseable coordinates: {0}")]
    BadCoordinates(String),
}

/// One entry of the Nominatim `jsonv2` search response. Coordinates arrive
/// as strings on the wire.
#[derive(Debug, Clone, Deserialize)]
struct SearchResult {
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
}

/// Client for the suggestion and resolve calls. Cheap to clone into tasks.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: reqwest::Client,
    endpoint: String,
    bias: Viewbox,
}

impl Geocoder {
    pub fn new(
        endpoint: String,
        bias_center: Coordinate,
        bias_radius_m: f64,
    ) -> Result<Self, GeocodeError> {
        // Nominatim's usage policy requires an identifying user agent.
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            http,
            endpoint,
            bias: Viewbox::around(bias_center, bias_radius_m),
        })
    }

    /// Ranked suggestions for a partial query, biased toward the configured
    /// viewbox.
    pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, GeocodeError> {
        let results = self.search(query, SUGGESTION_LIMIT).await?;
        Ok(results
            .into_iter()
            .map(|r| Suggestion {
                id: r.place_id.to_string(),
                description: r.display_name,
            })
            .collect())
    }

    /// Resolve a chosen description to a coordinate; the first geocoding
    /// result wins.
    pub async fn resolve(&self, description: &str) -> Result<Coordinate, GeocodeError> {
        let results = self.search(description, 1).await?;
        pick_first(results)
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, GeocodeError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("limit", &limit.to_string()),
                ("viewbox", &self.bias.as_query()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

fn pick_first(results: Vec<SearchResult>) -> Result<Coordinate, GeocodeError> {
    let first = results.into_iter().next().ok_or(GeocodeError::NoResults)?;
    match (first.lat.parse::<f64>(), first.lon.parse::<f64>()) {
        (Ok(lat), Ok(lon)) => Ok(Coordinate::new(lat, lon)),
        _ => Err(GeocodeError::BadCoordinates(format!(
            "{},{}",
            first.lat, first.lon
        ))),
    }
}

/// Longitude/latitude box used to bias (not bound) suggestion ranking.
#[derive(Debug, Clone, Copy)]
struct Viewbox {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Viewbox {
    /// Meters per degree of latitude; accurate enough for a bias box.
    const METERS_PER_DEGREE: f64 = 111_320.0;

    fn around(center: Coordinate, radius_m: f64) -> Self {
        let dlat = radius_m / Self::METERS_PER_DEGREE;
        // Longitude degrees shrink with latitude; clamp the cosine so a
        // polar center cannot blow the box up to infinity.
        let dlon = radius_m / (Self::METERS_PER_DEGREE * center.lat.to_radians().cos().max(0.01));
        Self {
            left: center.lon - dlon,
            top: center.lat + dlat,
            right: center.lon + dlon,
            bottom: center.lat - dlat,
        }
    }

    /// Nominatim `viewbox` parameter: `left,top,right,bottom`.
    fn as_query(&self) -> String {
        format!(
            "{},{},{},{}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CENTER, SUGGESTION_BIAS_RADIUS_M};

    const FIXTURE: &str = r#"[
        {
            "place_id": 298094253,
            "licence": "Data © OpenStreetMap contributors",
            "osm_type": "relation",
            "osm_id": 174979,
            "lat": "41.5034271",
            "lon": "-74.0104178",
            "category": "boundary",
            "type": "administrative",
            "place_rank": 16,
            "importance": 0.55,
            "addresstype": "city",
            "name": "Newburgh",
            "display_name": "Newburgh, Orange County, New York, United States"
        }
    ]"#;

    #[test]
    fn decodes_nominatim_results() {
        let results: Vec<SearchResult> = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_id, 298094253);
        assert_eq!(
            results[0].display_name,
            "Newburgh, Orange County, New York, United States"
        );
    }

    #[test]
    fn first_result_coordinate_is_extracted() {
        let results: Vec<SearchResult> = serde_json::from_str(FIXTURE).unwrap();
        let coordinate = pick_first(results).unwrap();
        assert!((coordinate.lat - 41.5034271).abs() < 1e-9);
        assert!((coordinate.lon - -74.0104178).abs() < 1e-9);
    }

    #[test]
    fn empty_result_set_is_no_results() {
        assert!(matches!(
            pick_first(Vec::new()),
            Err(GeocodeError::NoResults)
        ));
    }

    #[test]
    fn garbage_coordinates_are_reported() {
        let results = vec![SearchResult {
            place_id: 1,
            display_name: "nowhere".to_string(),
            lat: "not-a-number".to_string(),
            lon: "-74.0".to_string(),
        }];
        assert!(matches!(
            pick_first(results),
            Err(GeocodeError::BadCoordinates(_))
        ));
    }

    #[test]
    fn bias_viewbox_spans_the_radius_around_the_center() {
        let viewbox = Viewbox::around(DEFAULT_CENTER, SUGGESTION_BIAS_RADIUS_M);
        let dlat = 200_000.0 / Viewbox::METERS_PER_DEGREE;

        assert!((viewbox.top - (DEFAULT_CENTER.lat + dlat)).abs() < 1e-9);
        assert!((viewbox.bottom - (DEFAULT_CENTER.lat - dlat)).abs() < 1e-9);
        // longitude span widens with latitude
        assert!(viewbox.right - viewbox.left > 2.0 * dlat);
        assert!(((viewbox.right + viewbox.left) / 2.0 - DEFAULT_CENTER.lon).abs() < 1e-9);
    }

    #[test]
    fn viewbox_query_is_left_top_right_bottom() {
        let viewbox = Viewbox {
            left: -76.0,
            top: 43.0,
            right: -72.0,
            bottom: 39.0,
        };
        assert_eq!(viewbox.as_query(), "-76,43,-72,39");
    }
}
