#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fishing zone geofence and map viewport types.
//!
//! A [`FishingZone`] is a polygon or multipolygon marking water where
//! fishing is prohibited or restricted. Zones use the same JSON layout as
//! the front-end data file (`id`, `name`, `type`, `geometry`,
//! `coordinates`, ...) and are validated on deserialization.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Zone identifier.
pub type ZoneId = u32;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One closed outline, listed without repeating the first point.
pub type Ring = Vec<LatLng>;

/// Whether fishing is banned outright or subject to conditions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ZoneType {
    /// 금지구역
    Prohibited,
    /// 제한구역
    Restricted,
}

impl ZoneType {
    /// Label shown in the zone info popup.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Prohibited => "금지구역",
            Self::Restricted => "제한구역",
        }
    }
}

/// Zone outline. Rings are closed implicitly: the renderer connects the
/// last point back to the first.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    /// A single ring.
    Polygon(Ring),
    /// Several disjoint rings.
    MultiPolygon(Vec<Ring>),
}

impl ZoneGeometry {
    /// Iterates over every ring.
    pub fn rings(&self) -> impl Iterator<Item = &[LatLng]> {
        let rings: &[Ring] = match self {
            Self::Polygon(ring) => std::slice::from_ref(ring),
            Self::MultiPolygon(rings) => rings,
        };
        rings.iter().map(Vec::as_slice)
    }

    /// The first coordinate of the geometry (first ring's first point for
    /// multipolygons). Used as a cheap stand-in for the whole zone when
    /// testing against a viewport.
    #[must_use]
    pub fn representative_point(&self) -> Option<LatLng> {
        self.rings().next().and_then(|ring| ring.first().copied())
    }

    /// Total number of coordinates over all rings.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.rings().map(<[LatLng]>::len).sum()
    }

    /// Wire name of the geometry kind.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }
}

/// Geometry discriminator used in the zone JSON (`"polygon"` or
/// `"multipolygon"`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GeometryKind {
    /// Single ring.
    #[default]
    Polygon,
    /// List of rings.
    MultiPolygon,
}

/// A prohibited or restricted fishing area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZone", into = "RawZone")]
pub struct FishingZone {
    /// Unique identifier.
    pub id: ZoneId,
    /// Display name (e.g. `"한강 여의도 수중보 구역"`).
    pub name: String,
    /// Administrative region, free text.
    pub region: Option<String>,
    /// Prohibited or restricted.
    pub zone_type: ZoneType,
    /// Outline.
    pub geometry: ZoneGeometry,
    /// Description of the restriction, shown when the zone is selected.
    pub restriction: Option<String>,
}

impl FishingZone {
    /// Restriction text to display, falling back to a generic notice.
    #[must_use]
    pub fn restriction_text(&self) -> &str {
        self.restriction.as_deref().unwrap_or("낚시 금지")
    }
}

/// Error returned when a zone record violates the geometry invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidZoneError {
    /// Identifier of the offending zone.
    pub id: ZoneId,
    /// What was wrong with it.
    pub reason: String,
}

impl std::fmt::Display for InvalidZoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid zone {}: {}", self.id, self.reason)
    }
}

impl std::error::Error for InvalidZoneError {}

/// Coordinates as they appear in the JSON, before the geometry kind is
/// checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCoordinates {
    Ring(Ring),
    Rings(Vec<Ring>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawZone {
    id: ZoneId,
    name: String,
    #[serde(rename = "type")]
    zone_type: ZoneType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    restriction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(default)]
    geometry: GeometryKind,
    coordinates: RawCoordinates,
}

impl TryFrom<RawZone> for FishingZone {
    type Error = InvalidZoneError;

    fn try_from(raw: RawZone) -> Result<Self, Self::Error> {
        let id = raw.id;
        let invalid = move |reason: String| InvalidZoneError { id, reason };

        if raw.name.trim().is_empty() {
            return Err(invalid("name is empty".to_string()));
        }

        let geometry = match (raw.geometry, raw.coordinates) {
            (GeometryKind::Polygon, RawCoordinates::Ring(ring)) => ZoneGeometry::Polygon(ring),
            (GeometryKind::MultiPolygon, RawCoordinates::Rings(rings)) => {
                if rings.is_empty() {
                    return Err(invalid("multipolygon has no rings".to_string()));
                }
                ZoneGeometry::MultiPolygon(rings)
            }
            (kind, _) => {
                return Err(invalid(format!(
                    "coordinates do not match geometry '{kind}'"
                )));
            }
        };

        if let Some((i, ring)) = geometry.rings().enumerate().find(|(_, r)| r.len() < 3) {
            return Err(invalid(format!(
                "ring {i} has {} points, at least 3 required",
                ring.len()
            )));
        }

        Ok(Self {
            id,
            name: raw.name,
            region: raw.region,
            zone_type: raw.zone_type,
            geometry,
            restriction: raw.restriction,
        })
    }
}

impl From<FishingZone> for RawZone {
    fn from(zone: FishingZone) -> Self {
        let geometry = zone.geometry.kind();
        let coordinates = match zone.geometry {
            ZoneGeometry::Polygon(ring) => RawCoordinates::Ring(ring),
            ZoneGeometry::MultiPolygon(rings) => RawCoordinates::Rings(rings),
        };
        Self {
            id: zone.id,
            name: zone.name,
            zone_type: zone.zone_type,
            restriction: zone.restriction,
            region: zone.region,
            geometry,
            coordinates,
        }
    }
}

/// Map viewport, captured each time the map settles after a pan or zoom.
///
/// `zoom_level` follows the map SDK's scale where higher values are more
/// zoomed out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    /// Southern latitude boundary.
    pub min_lat: f64,
    /// Northern latitude boundary.
    pub max_lat: f64,
    /// Western longitude boundary.
    pub min_lng: f64,
    /// Eastern longitude boundary.
    pub max_lng: f64,
    /// Map level.
    pub zoom_level: u8,
}

impl ViewportState {
    /// Creates a viewport from a `"west,south,east,north"` bounding box
    /// string and a zoom level.
    #[must_use]
    pub fn from_bbox(bbox: &str, zoom_level: u8) -> Option<Self> {
        let parts: Vec<f64> = bbox
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        let [west, south, east, north] = parts.as_slice() else {
            return None;
        };
        if parts.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self {
            min_lat: *south,
            max_lat: *north,
            min_lng: *west,
            max_lng: *east,
            zoom_level,
        })
    }

    /// Whether `point` lies inside the viewport, edges included.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}
