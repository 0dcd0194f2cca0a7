#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fishing zone table and viewport-based zone loading.
//!
//! The zone table is compiled into the binary from `data/zones.json` and is
//! read-only at runtime. [`loader::compute_visible_zones`] decides, each time
//! the map settles, which zones still need to be drawn for the current
//! viewport; [`loader::ZoneSession`] keeps the caller's record of what has
//! already been drawn. [`maintenance`] holds the offline clean-up steps for
//! the zone data file, [`overpass`] fetches new water bodies from
//! `OpenStreetMap`, and [`export`] renders zones as `GeoJSON`.

pub mod export;
pub mod loader;
pub mod maintenance;
pub mod overpass;

use std::collections::BTreeMap;

use nakgo_zone_models::{FishingZone, ZoneId};

/// Embedded zone data, in the front-end JSON layout.
const ZONES_JSON: &str = include_str!("../data/zones.json");

/// Errors that can occur while loading or processing zone data.
#[derive(Debug, thiserror::Error)]
pub enum ZoneDataError {
    /// The zone JSON could not be parsed or violates a geometry invariant.
    #[error("Zone JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a zone data file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An HTTP request to a geodata service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Overpass API rejected a query.
    #[error("Overpass error: {message}")]
    Overpass {
        /// What went wrong.
        message: String,
    },

    /// Two zones share an identifier.
    #[error("Duplicate zone id: {id}")]
    DuplicateId {
        /// The repeated identifier.
        id: ZoneId,
    },
}

/// Read-only table of fishing zones, in data file order.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    zones: Vec<FishingZone>,
    /// zone id -> position in `zones`
    index: BTreeMap<ZoneId, usize>,
}

impl ZoneTable {
    /// Builds a table, rejecting duplicate identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneDataError::DuplicateId`] if two zones share an id.
    pub fn new(zones: Vec<FishingZone>) -> Result<Self, ZoneDataError> {
        let mut index = BTreeMap::new();
        for (i, zone) in zones.iter().enumerate() {
            if index.insert(zone.id, i).is_some() {
                return Err(ZoneDataError::DuplicateId { id: zone.id });
            }
        }
        Ok(Self { zones, index })
    }

    /// Parses a table from the front-end JSON layout (an array of zones).
    ///
    /// # Errors
    ///
    /// Returns [`ZoneDataError::Json`] if the JSON is malformed or a zone
    /// is invalid, or [`ZoneDataError::DuplicateId`] for repeated ids.
    pub fn from_json(json: &str) -> Result<Self, ZoneDataError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Builds the table from the embedded zone data.
    ///
    /// # Panics
    ///
    /// Panics if the embedded data is malformed. This is a development
    /// error caught by the tests below.
    #[must_use]
    pub fn embedded() -> Self {
        let table = Self::from_json(ZONES_JSON)
            .unwrap_or_else(|e| panic!("Embedded zone table is invalid: {e}"));
        log::debug!("Loaded {} fishing zones", table.len());
        table
    }

    /// Looks up a zone by identifier.
    #[must_use]
    pub fn get(&self, id: ZoneId) -> Option<&FishingZone> {
        self.index.get(&id).map(|&i| &self.zones[i])
    }

    /// All zones in table order.
    #[must_use]
    pub fn zones(&self) -> &[FishingZone] {
        &self.zones
    }

    /// Number of zones.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Zones built in code for tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use nakgo_zone_models::FishingZone;

    /// Two-ring estuary zone. Its first ring starts at (35.10, 128.93).
    pub fn estuary(id: u32) -> FishingZone {
        let json = format!(
            r#"{{
                "id": {id},
                "name": "낙동강 하구",
                "type": "prohibited",
                "region": "부산 사하구",
                "geometry": "multipolygon",
                "coordinates": [
                    [
                        {{ "lat": 35.10, "lng": 128.93 }},
                        {{ "lat": 35.10, "lng": 128.96 }},
                        {{ "lat": 35.07, "lng": 128.96 }},
                        {{ "lat": 35.07, "lng": 128.93 }}
                    ],
                    [
                        {{ "lat": 35.06, "lng": 128.90 }},
                        {{ "lat": 35.06, "lng": 128.92 }},
                        {{ "lat": 35.04, "lng": 128.92 }},
                        {{ "lat": 35.04, "lng": 128.90 }}
                    ]
                ]
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }
}
