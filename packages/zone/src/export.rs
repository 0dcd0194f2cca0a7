//! `GeoJSON` rendering of fishing zones.
//!
//! Coordinates are emitted in `GeoJSON` order (longitude, latitude). Each
//! feature carries its bounding box so map clients can fit bounds without
//! walking the rings.

use geo::{BoundingRect as _, Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};
use nakgo_zone_models::{FishingZone, LatLng, ZoneGeometry};

/// Converts one ring into a closed [`Polygon`].
fn ring_to_polygon(ring: &[LatLng]) -> Polygon<f64> {
    let exterior: LineString<f64> = ring
        .iter()
        .map(|p| Coord { x: p.lng, y: p.lat })
        .collect();
    Polygon::new(exterior, vec![])
}

/// Converts a zone outline into a [`MultiPolygon`] (one polygon per ring).
#[must_use]
pub fn to_multi_polygon(geometry: &ZoneGeometry) -> MultiPolygon<f64> {
    MultiPolygon(geometry.rings().map(ring_to_polygon).collect())
}

/// Builds the `GeoJSON` feature for one zone.
#[must_use]
pub fn zone_feature(zone: &FishingZone) -> Feature {
    let value = match &zone.geometry {
        ZoneGeometry::Polygon(ring) => geojson::Value::from(&ring_to_polygon(ring)),
        ZoneGeometry::MultiPolygon(_) => geojson::Value::from(&to_multi_polygon(&zone.geometry)),
    };

    let bbox = to_multi_polygon(&zone.geometry)
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), zone.name.clone().into());
    properties.insert("zoneType".to_string(), zone.zone_type.as_ref().into());
    properties.insert("label".to_string(), zone.zone_type.label().into());
    properties.insert(
        "region".to_string(),
        zone.region
            .clone()
            .map_or(serde_json::Value::Null, serde_json::Value::from),
    );
    properties.insert(
        "restriction".to_string(),
        zone.restriction_text().into(),
    );

    Feature {
        bbox,
        geometry: Some(Geometry::new(value)),
        id: Some(Id::Number(zone.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Builds a `FeatureCollection` from zones, preserving their order.
#[must_use]
pub fn feature_collection<'a>(zones: impl IntoIterator<Item = &'a FishingZone>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: zones.into_iter().map(zone_feature).collect(),
        foreign_members: None,
    }
}
