//! Named water bodies from the `OpenStreetMap` Overpass API.
//!
//! Fetches reservoirs and lakes inside South Korea as outlines, keeping
//! only named, reasonably small polygons that can become fishing zones.
//! The result is merged into the zone table with
//! [`crate::maintenance::merge_new_zones`].

use std::collections::BTreeMap;

use nakgo_zone_models::{LatLng, Ring};
use serde::{Deserialize, Serialize};

use crate::ZoneDataError;

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Overpass QL for every reservoir and lake in South Korea, with geometry.
pub const RESERVOIR_QUERY: &str = r#"[out:json][timeout:300];
area["name"="대한민국"]->.korea;
(
  way["natural"="water"]["water"="reservoir"](area.korea);
  relation["natural"="water"]["water"="reservoir"](area.korea);
  way["natural"="water"]["water"="lake"](area.korea);
  relation["natural"="water"]["water"="lake"](area.korea);
  way["landuse"="reservoir"](area.korea);
);
out geom;"#;

/// Outlines with fewer points than this are ignored.
const MIN_OUTLINE_POINTS: usize = 6;

/// Largest accepted extent of an outline, in degrees, on either axis.
const MAX_EXTENT_DEG: f64 = 0.15;

/// Accepted range for an outline's south-west corner.
const LAT_RANGE: std::ops::RangeInclusive<f64> = 33.0..=39.0;
const LNG_RANGE: std::ops::RangeInclusive<f64> = 124.0..=132.0;

/// A named water body outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterBody {
    /// OSM `name` tag.
    pub name: String,
    /// Closed outline (first point repeated at the end).
    pub coordinates: Ring,
}

/// Overpass JSON response (only the parts used here).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    /// Returned OSM elements.
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    /// Server-side warning or error text, set when a query times out.
    #[serde(default)]
    pub remark: Option<String>,
}

/// One OSM element with inline geometry (`out geom`).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverpassElement {
    /// A way with its node coordinates.
    Way {
        /// OSM tags.
        #[serde(default)]
        tags: BTreeMap<String, String>,
        /// Node coordinates in way order.
        #[serde(default)]
        geometry: Vec<OverpassPoint>,
    },
    /// A multipolygon relation.
    Relation {
        /// OSM tags.
        #[serde(default)]
        tags: BTreeMap<String, String>,
        /// Member ways with their geometry.
        #[serde(default)]
        members: Vec<OverpassMember>,
    },
    /// Nodes and anything else.
    #[serde(other)]
    Other,
}

/// Relation member with inline geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassMember {
    /// Member role (`outer`, `inner`, ...).
    #[serde(default)]
    pub role: String,
    /// Member coordinates.
    #[serde(default)]
    pub geometry: Vec<OverpassPoint>,
}

/// Overpass coordinate.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl From<OverpassPoint> for LatLng {
    fn from(p: OverpassPoint) -> Self {
        Self::new(round6(p.lat), round6(p.lon))
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

impl OverpassElement {
    fn name(&self) -> Option<&str> {
        let tags = match self {
            Self::Way { tags, .. } | Self::Relation { tags, .. } => tags,
            Self::Other => return None,
        };
        tags.get("name").map(String::as_str).filter(|n| !n.is_empty())
    }

    /// The way's own geometry, or a relation's first `outer` member.
    fn outline(&self) -> Option<Ring> {
        let points = match self {
            Self::Way { geometry, .. } => geometry.as_slice(),
            Self::Relation { members, .. } => members
                .iter()
                .find(|m| m.role == "outer" && !m.geometry.is_empty())?
                .geometry
                .as_slice(),
            Self::Other => return None,
        };
        Some(points.iter().copied().map(LatLng::from).collect())
    }
}

/// Closes `ring` and checks it is a plausible inland water body.
fn accept_outline(mut ring: Ring) -> Option<Ring> {
    if ring.len() < 4 {
        return None;
    }
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    if ring.len() < MIN_OUTLINE_POINTS {
        return None;
    }

    let (min_lat, max_lat, min_lng, max_lng) = ring.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(a, b, c, d), p| (a.min(p.lat), b.max(p.lat), c.min(p.lng), d.max(p.lng)),
    );

    let in_korea = LAT_RANGE.contains(&min_lat) && LNG_RANGE.contains(&min_lng);
    let small = max_lat - min_lat < MAX_EXTENT_DEG && max_lng - min_lng < MAX_EXTENT_DEG;

    (in_korea && small).then_some(ring)
}

/// Extracts named water body outlines from an Overpass response.
///
/// Bodies sharing a name are merged, keeping the outline with the most
/// points at the position of the name's first appearance.
#[must_use]
pub fn extract_water_bodies(response: &OverpassResponse) -> Vec<WaterBody> {
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut bodies: Vec<WaterBody> = Vec::new();

    for element in &response.elements {
        let Some(name) = element.name() else {
            continue;
        };
        let Some(coordinates) = element.outline().and_then(accept_outline) else {
            continue;
        };

        if let Some(&pos) = positions.get(name) {
            if coordinates.len() > bodies[pos].coordinates.len() {
                bodies[pos].coordinates = coordinates;
            }
        } else {
            positions.insert(name.to_string(), bodies.len());
            bodies.push(WaterBody {
                name: name.to_string(),
                coordinates,
            });
        }
    }

    log::info!(
        "Extracted {} water bodies from {} elements",
        bodies.len(),
        response.elements.len()
    );
    bodies
}

/// Runs `query` against the Overpass endpoint at `url` and extracts the
/// water bodies it returns.
///
/// # Errors
///
/// Returns [`ZoneDataError`] if the request fails, the server answers with
/// a non-success status, or the body is not valid Overpass JSON.
pub async fn fetch_water_bodies(
    client: &reqwest::Client,
    url: &str,
    query: &str,
) -> Result<Vec<WaterBody>, ZoneDataError> {
    log::info!("Querying Overpass at {url}...");

    let resp = client.post(url).form(&[("data", query)]).send().await?;
    if !resp.status().is_success() {
        return Err(ZoneDataError::Overpass {
            message: format!("request failed with status {}", resp.status()),
        });
    }
    let body = resp.text().await?;

    let response: OverpassResponse = serde_json::from_str(&body)?;
    if let Some(remark) = &response.remark {
        log::warn!("Overpass remark: {remark}");
    }

    Ok(extract_water_bodies(&response))
}

/// Reads water bodies saved by a previous fetch.
///
/// # Errors
///
/// Returns [`ZoneDataError`] if the file cannot be read or parsed.
pub fn read_water_bodies(path: &std::path::Path) -> Result<Vec<WaterBody>, ZoneDataError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Saves water bodies as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`ZoneDataError`] if serialization or the write fails.
pub fn write_water_bodies(
    path: &std::path::Path,
    bodies: &[WaterBody],
) -> Result<(), ZoneDataError> {
    let mut json = serde_json::to_string_pretty(bodies)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lat: f64, lng: f64, size: f64, points: usize) -> serde_json::Value {
        let corners = [
            (lat, lng),
            (lat, lng + size),
            (lat + size, lng + size),
            (lat + size, lng),
        ];
        let geometry: Vec<_> = (0..points)
            .map(|i| {
                let (la, lo) = corners[i % 4];
                #[allow(clippy::cast_precision_loss)]
                let nudge = (i / 4) as f64 * 1e-4;
                serde_json::json!({ "lat": la + nudge, "lon": lo })
            })
            .collect();
        serde_json::Value::Array(geometry)
    }

    fn response(elements: serde_json::Value) -> OverpassResponse {
        serde_json::from_value(serde_json::json!({ "elements": elements })).unwrap()
    }

    #[test]
    fn keeps_named_small_outlines_and_closes_them() {
        let resp = response(serde_json::json!([
            { "type": "way", "tags": { "name": "예당저수지" }, "geometry": square(36.6, 126.8, 0.05, 8) },
            { "type": "way", "tags": {}, "geometry": square(36.0, 127.0, 0.05, 8) },
            { "type": "node", "lat": 36.0, "lon": 127.0 },
        ]));

        let bodies = extract_water_bodies(&resp);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].name, "예당저수지");
        assert_eq!(bodies[0].coordinates.len(), 9);
        assert_eq!(bodies[0].coordinates.first(), bodies[0].coordinates.last());
    }

    #[test]
    fn rejects_large_foreign_or_tiny_outlines() {
        let resp = response(serde_json::json!([
            { "type": "way", "tags": { "name": "큰 호수" }, "geometry": square(36.0, 127.0, 0.3, 8) },
            { "type": "way", "tags": { "name": "먼 호수" }, "geometry": square(45.0, 127.0, 0.05, 8) },
            { "type": "way", "tags": { "name": "작은 못" }, "geometry": square(36.0, 127.0, 0.01, 3) },
        ]));
        assert!(extract_water_bodies(&resp).is_empty());
    }

    #[test]
    fn relation_uses_first_outer_member() {
        let resp = response(serde_json::json!([
            {
                "type": "relation",
                "tags": { "name": "청평호" },
                "members": [
                    { "role": "inner", "geometry": square(37.70, 127.45, 0.01, 8) },
                    { "role": "outer", "geometry": square(37.72, 127.40, 0.08, 12) },
                ],
            },
        ]));

        let bodies = extract_water_bodies(&resp);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].coordinates[0], LatLng::new(37.72, 127.40));
        assert_eq!(bodies[0].coordinates.len(), 13);
    }

    #[test]
    fn duplicate_names_keep_most_detailed_outline() {
        let resp = response(serde_json::json!([
            { "type": "way", "tags": { "name": "신갈저수지" }, "geometry": square(37.2, 127.1, 0.02, 6) },
            { "type": "way", "tags": { "name": "광교저수지" }, "geometry": square(37.3, 127.0, 0.02, 6) },
            { "type": "way", "tags": { "name": "신갈저수지" }, "geometry": square(37.2, 127.1, 0.02, 16) },
        ]));

        let bodies = extract_water_bodies(&resp);
        let names: Vec<&str> = bodies.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["신갈저수지", "광교저수지"]);
        assert_eq!(bodies[0].coordinates.len(), 17);
    }

    #[test]
    fn coordinates_are_rounded_to_six_places() {
        let point = OverpassPoint {
            lat: 37.123_456_789,
            lon: 127.987_654_321,
        };
        assert_eq!(LatLng::from(point), LatLng::new(37.123_457, 127.987_654));
    }

    #[test]
    fn remark_and_missing_elements_parse() {
        let resp: OverpassResponse =
            serde_json::from_str(r#"{"remark": "runtime error: timeout"}"#).unwrap();
        assert!(resp.elements.is_empty());
        assert_eq!(resp.remark.as_deref(), Some("runtime error: timeout"));
    }

    #[tokio::test]
    async fn fetch_reports_unreachable_endpoint() {
        let client = reqwest::Client::new();
        let result = fetch_water_bodies(&client, "http://127.0.0.1:9/api/interpreter", RESERVOIR_QUERY).await;
        assert!(matches!(result, Err(ZoneDataError::Http(_))));
    }
}
