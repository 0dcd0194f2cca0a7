//! Viewport-based zone loading for the map screen.
//!
//! Runs once per map idle event. Zones are drawn incrementally while the
//! map is zoomed in and all cleared once it is zoomed out past
//! [`MAX_ZONE_ZOOM_LEVEL`].

use std::collections::BTreeSet;

use nakgo_zone_models::{FishingZone, ViewportState, ZoneId};

/// Highest map level at which zones are drawn. Higher levels are more
/// zoomed out.
pub const MAX_ZONE_ZOOM_LEVEL: u8 = 10;

/// Change to apply to the drawn zone set after one idle event.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDelta<'a> {
    /// Zones to draw now, in table order.
    pub to_render: Vec<&'a FishingZone>,
    /// Whether every drawn zone must be removed (and the rendered set
    /// reset) before drawing.
    pub to_clear: bool,
}

impl ZoneDelta<'_> {
    /// Identifiers of the zones to draw.
    #[must_use]
    pub fn ids(&self) -> Vec<ZoneId> {
        self.to_render.iter().map(|z| z.id).collect()
    }
}

/// Works out which zones to draw for `viewport`.
///
/// Above [`MAX_ZONE_ZOOM_LEVEL`] nothing is drawn and `to_clear` is set.
/// Otherwise a zone is returned when it is not in `already_rendered` and
/// its representative point (the first coordinate of its geometry) lies in
/// the viewport, edges included. A zone whose body overlaps the viewport
/// but whose first coordinate does not is not returned.
///
/// The caller owns `already_rendered` and must add every returned zone to
/// it, or empty it when `to_clear` is set, before the next call.
#[must_use]
pub fn compute_visible_zones<'a>(
    viewport: &ViewportState,
    zones: &'a [FishingZone],
    already_rendered: &BTreeSet<ZoneId>,
) -> ZoneDelta<'a> {
    if viewport.zoom_level > MAX_ZONE_ZOOM_LEVEL {
        log::trace!(
            "Zoom level {} above {MAX_ZONE_ZOOM_LEVEL}, clearing zones",
            viewport.zoom_level
        );
        return ZoneDelta {
            to_render: Vec::new(),
            to_clear: true,
        };
    }

    let to_render: Vec<&FishingZone> = zones
        .iter()
        .filter(|zone| !already_rendered.contains(&zone.id))
        .filter(|zone| {
            zone.geometry
                .representative_point()
                .is_some_and(|point| viewport.contains(point))
        })
        .collect();

    log::trace!(
        "{} new zones in viewport ({} already rendered)",
        to_render.len(),
        already_rendered.len()
    );

    ZoneDelta {
        to_render,
        to_clear: false,
    }
}

/// Caller-side record of drawn zones for one map.
///
/// The set only grows while the map stays zoomed in and is emptied when
/// a delta asks for a clear.
#[derive(Debug, Clone, Default)]
pub struct ZoneSession {
    rendered: BTreeSet<ZoneId>,
}

impl ZoneSession {
    /// Creates a session with nothing drawn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one idle event: computes the delta and records it.
    pub fn on_idle<'a>(
        &mut self,
        viewport: &ViewportState,
        zones: &'a [FishingZone],
    ) -> ZoneDelta<'a> {
        let delta = compute_visible_zones(viewport, zones, &self.rendered);
        if delta.to_clear {
            self.rendered.clear();
        }
        self.rendered.extend(delta.to_render.iter().map(|z| z.id));
        delta
    }

    /// Identifiers currently drawn.
    #[must_use]
    pub const fn rendered(&self) -> &BTreeSet<ZoneId> {
        &self.rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ZoneTable, fixtures};

    fn viewport(bbox: &str, zoom: u8) -> ViewportState {
        ViewportState::from_bbox(bbox, zoom).unwrap()
    }

    /// Seoul around Yeouido: contains zone 1's first point only.
    fn yeouido(zoom: u8) -> ViewportState {
        viewport("126.85,37.45,127.05,37.60", zoom)
    }

    #[test]
    fn zoomed_out_clears_everything() {
        let table = ZoneTable::embedded();
        let everything = viewport("120.0,30.0,135.0,40.0", 11);
        let rendered: BTreeSet<ZoneId> = [1, 2, 3].into_iter().collect();

        let delta = compute_visible_zones(&everything, table.zones(), &rendered);
        assert!(delta.to_clear);
        assert!(delta.to_render.is_empty());

        let delta = compute_visible_zones(&everything, table.zones(), &BTreeSet::new());
        assert!(delta.to_clear);
        assert!(delta.to_render.is_empty());
    }

    #[test]
    fn threshold_level_still_renders() {
        let table = ZoneTable::embedded();
        let delta = compute_visible_zones(
            &yeouido(MAX_ZONE_ZOOM_LEVEL),
            table.zones(),
            &BTreeSet::new(),
        );
        assert!(!delta.to_clear);
        assert_eq!(delta.ids(), vec![1]);
    }

    #[test]
    fn zone_in_view_is_returned_once() {
        let table = ZoneTable::embedded();
        let view = yeouido(5);
        let mut rendered = BTreeSet::new();

        let first = compute_visible_zones(&view, table.zones(), &rendered);
        assert_eq!(first.ids(), vec![1]);
        rendered.extend(first.ids());

        let second = compute_visible_zones(&view, table.zones(), &rendered);
        assert!(!second.to_clear);
        assert!(second.to_render.is_empty());
    }

    #[test]
    fn representative_point_on_edge_counts() {
        let table = ZoneTable::embedded();
        // Zone 1 starts at (37.535, 126.91).
        let edge = viewport("126.91,37.535,127.0,37.6", 3);
        let delta = compute_visible_zones(&edge, table.zones(), &BTreeSet::new());
        assert_eq!(delta.ids(), vec![1]);
    }

    #[test]
    fn overlapping_zone_with_first_point_outside_is_skipped() {
        let table = ZoneTable::embedded();
        // Covers most of zone 1's body but not its first point.
        let partial = viewport("126.92,37.50,126.96,37.53", 3);
        let delta = compute_visible_zones(&partial, table.zones(), &BTreeSet::new());
        assert!(delta.to_render.is_empty());
        assert!(!delta.to_clear);
    }

    #[test]
    fn multipolygon_uses_first_ring() {
        let mut zones = ZoneTable::embedded().zones().to_vec();
        zones.push(fixtures::estuary(100));

        // Contains only the estuary's second ring.
        let second_ring = viewport("128.89,35.03,128.925,35.065", 4);
        let delta = compute_visible_zones(&second_ring, &zones, &BTreeSet::new());
        assert!(delta.to_render.is_empty());

        let first_ring = viewport("128.92,35.06,128.97,35.11", 4);
        let delta = compute_visible_zones(&first_ring, &zones, &BTreeSet::new());
        assert_eq!(delta.ids(), vec![100]);
    }

    #[test]
    fn results_follow_table_order() {
        let table = ZoneTable::embedded();
        let korea = viewport("124.0,33.0,131.0,39.0", 10);
        let delta = compute_visible_zones(&korea, table.zones(), &BTreeSet::new());
        assert_eq!(delta.ids(), (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn session_accumulates_then_resets() {
        let table = ZoneTable::embedded();
        let mut session = ZoneSession::new();

        let delta = session.on_idle(&yeouido(6), table.zones());
        assert_eq!(delta.ids(), vec![1]);
        assert_eq!(session.rendered().len(), 1);

        // Pan to Busan: Haeundae joins, Yeouido is not re-sent.
        let busan = viewport("129.0,35.0,129.3,35.3", 6);
        let delta = session.on_idle(&busan, table.zones());
        assert_eq!(delta.ids(), vec![2]);
        assert_eq!(session.rendered().iter().copied().collect::<Vec<_>>(), vec![1, 2]);

        let delta = session.on_idle(&viewport("124.0,33.0,131.0,39.0", 12), table.zones());
        assert!(delta.to_clear);
        assert!(session.rendered().is_empty());

        // Zooming back in draws Yeouido again.
        let delta = session.on_idle(&yeouido(6), table.zones());
        assert_eq!(delta.ids(), vec![1]);
    }
}
