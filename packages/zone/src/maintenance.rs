//! Offline clean-up of zone data files.
//!
//! Zone outlines arrive from several public datasets, often with far more
//! vertices than the map needs and with the same water body listed more
//! than once. These steps shrink and merge them before the file is
//! embedded.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use nakgo_zone_models::{FishingZone, LatLng, ZoneGeometry, ZoneType};

use crate::ZoneDataError;
use crate::overpass::WaterBody;

/// Restriction text attached to water bodies merged from `OpenStreetMap`.
pub const MERGED_ZONE_RESTRICTION: &str =
    "낚시 금지구역\n※ 정확한 규제 내용은 관할 지자체에 확인";

/// Default vertex budget per ring used by [`optimize_zones`].
pub const DEFAULT_MAX_RING_POINTS: usize = 25;

/// Rings with fewer points than this after simplification are dropped.
const MIN_RING_POINTS: usize = 4;

/// Reduces `ring` to about `max_points` vertices by sampling at an even
/// stride, then closes it by repeating the first point if needed.
///
/// Rings already within budget are returned unchanged.
#[must_use]
pub fn simplify_ring(ring: &[LatLng], max_points: usize) -> Vec<LatLng> {
    if ring.len() <= max_points || max_points == 0 {
        return ring.to_vec();
    }

    #[allow(clippy::cast_precision_loss)]
    let step = ring.len() as f64 / max_points as f64;

    let mut simplified: Vec<LatLng> = (0..max_points)
        .map(|i| {
            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss
            )]
            let idx = (i as f64 * step) as usize;
            ring[idx]
        })
        .collect();

    if simplified.first() != simplified.last() {
        simplified.push(simplified[0]);
    }

    simplified
}

/// Simplifies every ring to `max_points` and drops rings left with fewer
/// than four points. Zones with no ring left are removed.
#[must_use]
pub fn optimize_zones(zones: Vec<FishingZone>, max_points: usize) -> Vec<FishingZone> {
    let before = zones.len();

    let optimized: Vec<FishingZone> = zones
        .into_iter()
        .filter_map(|mut zone| {
            zone.geometry = match &zone.geometry {
                ZoneGeometry::Polygon(ring) => {
                    let ring = simplify_ring(ring, max_points);
                    if ring.len() < MIN_RING_POINTS {
                        log::debug!("Dropping zone {} ({}): ring too small", zone.id, zone.name);
                        return None;
                    }
                    ZoneGeometry::Polygon(ring)
                }
                ZoneGeometry::MultiPolygon(rings) => {
                    let rings: Vec<Vec<LatLng>> = rings
                        .iter()
                        .map(|ring| simplify_ring(ring, max_points))
                        .filter(|ring| ring.len() >= MIN_RING_POINTS)
                        .collect();
                    if rings.is_empty() {
                        log::debug!("Dropping zone {} ({}): no rings left", zone.id, zone.name);
                        return None;
                    }
                    ZoneGeometry::MultiPolygon(rings)
                }
            };
            Some(zone)
        })
        .collect();

    log::info!("Optimized zones: {before} -> {}", optimized.len());
    optimized
}

/// Merges zones that share a name, keeping the one with the most
/// coordinates. Each name keeps the position of its first appearance.
#[must_use]
pub fn dedupe_by_name(zones: Vec<FishingZone>) -> Vec<FishingZone> {
    let before = zones.len();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut unique: Vec<FishingZone> = Vec::with_capacity(zones.len());

    for zone in zones {
        if let Some(&pos) = positions.get(&zone.name) {
            if zone.geometry.point_count() > unique[pos].geometry.point_count() {
                unique[pos] = zone;
            }
        } else {
            positions.insert(zone.name.clone(), unique.len());
            unique.push(zone);
        }
    }

    log::info!("Deduplicated zones by name: {before} -> {}", unique.len());
    unique
}

/// Reassigns identifiers `1..=n` in order.
pub fn renumber(zones: &mut [FishingZone]) {
    for (id, zone) in (1..).zip(zones.iter_mut()) {
        zone.id = id;
    }
}

/// Appends water bodies whose names are not yet in `existing` as
/// prohibited zones, then renumbers every zone from 1.
///
/// Existing zones keep their order and content. Among the new bodies only
/// the first of each name is taken.
#[must_use]
pub fn merge_new_zones(existing: Vec<FishingZone>, incoming: Vec<WaterBody>) -> Vec<FishingZone> {
    let mut names: BTreeSet<String> = existing.iter().map(|z| z.name.clone()).collect();
    let before = existing.len();

    let mut zones = existing;
    for body in incoming {
        if !names.insert(body.name.clone()) {
            continue;
        }
        zones.push(FishingZone {
            id: 0,
            name: body.name,
            region: None,
            zone_type: ZoneType::Prohibited,
            geometry: ZoneGeometry::Polygon(body.coordinates),
            restriction: Some(MERGED_ZONE_RESTRICTION.to_string()),
        });
    }

    renumber(&mut zones);
    log::info!("Merged {} new zones ({before} -> {})", zones.len() - before, zones.len());
    zones
}

/// Reads a zone data file (a JSON array of zones).
///
/// # Errors
///
/// Returns [`ZoneDataError`] if the file cannot be read or parsed.
pub fn read_zones(path: &Path) -> Result<Vec<FishingZone>, ZoneDataError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Writes zones as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`ZoneDataError`] if serialization or the write fails.
pub fn write_zones(path: &Path, zones: &[FishingZone]) -> Result<(), ZoneDataError> {
    let mut json = serde_json::to_string_pretty(zones)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

/// Runs the full clean-up: merge duplicates, simplify, and renumber.
#[must_use]
pub fn rebuild(zones: Vec<FishingZone>, max_points: usize) -> Vec<FishingZone> {
    let mut zones = optimize_zones(dedupe_by_name(zones), max_points);
    renumber(&mut zones);
    zones
}
