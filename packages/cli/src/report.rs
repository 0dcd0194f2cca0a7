//! Plain-text renderings of the reference tables for the terminal, and the
//! zone data file steps behind `nakgo zones`.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use nakgo_regulation::{RegulationError, RegulationTable, registry};
use nakgo_regulation_models::{Region, RegionRegulations};
use nakgo_zone::loader::{MAX_ZONE_ZOOM_LEVEL, ZoneDelta};
use nakgo_zone::{ZoneDataError, maintenance, overpass};

/// Checks a catch and describes the verdict.
///
/// When `date` is given and the species' closed season can be read, a
/// note says whether that day falls inside it. The verdict itself does
/// not depend on the date.
///
/// # Errors
///
/// Returns [`RegulationError`] for invalid input or an unknown species.
pub fn check(
    table: &RegulationTable,
    species: &str,
    length_cm: f64,
    date: Option<NaiveDate>,
) -> Result<String, RegulationError> {
    let result = nakgo_regulation::check(table, species, length_cm)?;
    let status = result.status();

    let mut lines = vec![
        format!(
            "{} {}cm: {}",
            result.species,
            result.input_length,
            status.label()
        ),
        format!("  {}", result.message),
    ];

    if let Some(min) = result.min_length {
        lines.push(format!("  금지체장: {min}cm 미만"));
    }

    if let Some(entry) = table.get(&result.species) {
        if let Some(season) = &entry.closed_season {
            lines.push(format!("  금어기: {season}"));
            if let (Some(window), Some(date)) = (entry.season_window(), date) {
                let note = if window.contains(date) {
                    "금어기 기간입니다"
                } else {
                    "금어기 기간이 아닙니다"
                };
                lines.push(format!("  {date}: {note}"));
            }
        }
        if let Some(warning) = &entry.warning {
            lines.push(format!("  참고: {warning}"));
        }
    }

    Ok(join_lines(lines))
}

/// Lists every species with its limits.
#[must_use]
pub fn species(table: &RegulationTable) -> String {
    let mut lines = vec![
        format!("{:<10} {:<26} {:<8} 금어기", "어종", "ENGLISH", "체장"),
        "-".repeat(64),
    ];

    for entry in table.iter() {
        if entry.is_unregulated() {
            lines.push(format!(
                "{:<10} {:<26} 제한 없음",
                entry.display_name, entry.english_name
            ));
            continue;
        }
        let min = entry
            .min_length_cm
            .map_or_else(|| "-".to_string(), |m| format!("{m}cm"));
        let season = entry.closed_season.as_deref().unwrap_or("-");
        lines.push(format!(
            "{:<10} {:<26} {:<8} {season}",
            entry.display_name, entry.english_name, min
        ));
    }

    lines.push(String::new());
    lines.push(format!("{} species", table.len()));
    join_lines(lines)
}

/// Lists the regions, or prints one region's rule sheet.
#[must_use]
pub fn regulations(region: Option<Region>) -> String {
    let Some(region) = region else {
        return join_lines(
            registry::all_regions()
                .iter()
                .map(|s| format!("{:<6} {} ({})", s.region, s.name, s.name_en)),
        );
    };

    registry::region(region).map_or_else(
        || format!("No rule sheet for {region}\n"),
        |sheet| region_sheet(&sheet),
    )
}

fn region_sheet(sheet: &RegionRegulations) -> String {
    let mut lines = vec![
        format!("{} ({})", sheet.name, sheet.name_en),
        String::new(),
        "[금어기]".to_string(),
    ];
    lines.extend(
        sheet
            .closed_seasons
            .iter()
            .map(|e| format!("  {:<10} {}", e.name, e.period)),
    );

    lines.push(String::new());
    lines.push("[금지체장]".to_string());
    lines.extend(
        sheet
            .min_sizes
            .iter()
            .map(|e| format!("  {:<10} {}", e.name, e.size)),
    );

    join_lines(lines)
}

/// Prints the fine schedule.
#[must_use]
pub fn fines() -> String {
    let mut lines = Vec::new();
    for fine in registry::all_fines() {
        lines.push(fine.offense.clone());
        lines.push(format!("  과태료: {}", fine.amount_label()));
        if let Some(imprisonment) = &fine.imprisonment {
            lines.push(format!("  징역: {imprisonment}"));
        }
        lines.push(format!("  근거: {}", fine.legal_basis));
    }
    join_lines(lines)
}

/// Describes what to draw after one viewport change.
#[must_use]
pub fn zone_delta(delta: &ZoneDelta<'_>, zoom: u8) -> String {
    if delta.to_clear {
        return format!("Zoom level {zoom} is above {MAX_ZONE_ZOOM_LEVEL}: clear all zones\n");
    }

    let mut lines: Vec<String> = delta
        .to_render
        .iter()
        .map(|zone| {
            format!(
                "{:>3}  [{}] {}  {}",
                zone.id,
                zone.zone_type.label(),
                zone.name,
                zone.region.as_deref().unwrap_or("")
            )
        })
        .collect();
    lines.push(format!("{} zone(s) to draw", delta.to_render.len()));
    join_lines(lines)
}

/// Cleans up a zone data file and writes the result.
///
/// Returns the zone counts before and after.
///
/// # Errors
///
/// Returns [`ZoneDataError`] if either file cannot be read, parsed, or
/// written.
pub fn optimize(
    input: &Path,
    output: &Path,
    max_points: usize,
) -> Result<(usize, usize), ZoneDataError> {
    let zones = maintenance::read_zones(input)?;
    let before = zones.len();
    let zones = maintenance::rebuild(zones, max_points);
    maintenance::write_zones(output, &zones)?;
    log::info!("Wrote {} zones to {}", zones.len(), output.display());
    Ok((before, zones.len()))
}

/// Fetches named reservoirs and lakes from Overpass and saves them.
///
/// Returns the number of water bodies written.
///
/// # Errors
///
/// Returns [`ZoneDataError`] if the request or the write fails.
pub async fn fetch(url: &str, output: &Path) -> Result<usize, ZoneDataError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(330))
        .user_agent(concat!("nakgo/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let bodies = overpass::fetch_water_bodies(&client, url, overpass::RESERVOIR_QUERY).await?;
    overpass::write_water_bodies(output, &bodies)?;
    log::info!("Wrote {} water bodies to {}", bodies.len(), output.display());
    Ok(bodies.len())
}

/// Adds fetched water bodies to a zone data file as prohibited zones.
///
/// Returns the zone counts before and after.
///
/// # Errors
///
/// Returns [`ZoneDataError`] if a file cannot be read, parsed, or written.
pub fn merge(
    zones_path: &Path,
    water_path: &Path,
    output: &Path,
) -> Result<(usize, usize), ZoneDataError> {
    let zones = maintenance::read_zones(zones_path)?;
    let before = zones.len();
    let bodies = overpass::read_water_bodies(water_path)?;
    let zones = maintenance::merge_new_zones(zones, bodies);
    maintenance::write_zones(output, &zones)?;
    Ok((before, zones.len()))
}

fn join_lines(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().fold(String::new(), |mut out, line| {
        out.push_str(&line);
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use nakgo_zone::ZoneTable;
    use nakgo_zone::loader::{ZoneSession, compute_visible_zones};
    use nakgo_zone_models::ViewportState;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("nakgo_cli_{}_{name}", std::process::id()))
    }

    #[test]
    fn check_reports_undersize() {
        let table = RegulationTable::embedded();
        let out = check(&table, "광어", 30.0, None).unwrap();
        assert!(out.starts_with("광어 30cm: 포획 금지\n"));
        assert!(out.contains("금지체장: 35cm 미만"));
    }

    #[test]
    fn check_date_note_is_informational() {
        let table = RegulationTable::embedded();
        let inside = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let outside = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();

        let a = check(&table, "꽃게", 12.0, Some(inside)).unwrap();
        let b = check(&table, "꽃게", 12.0, Some(outside)).unwrap();

        assert!(a.contains("금어기 주의"));
        assert!(b.contains("금어기 주의"));
        assert!(a.contains("2026-07-01: 금어기 기간입니다"));
        assert!(b.contains("2026-10-01: 금어기 기간이 아닙니다"));
    }

    #[test]
    fn check_unknown_species_is_an_error() {
        let table = RegulationTable::embedded();
        assert!(matches!(
            check(&table, "상어", 100.0, None),
            Err(RegulationError::SpeciesNotFound { .. })
        ));
    }

    #[test]
    fn species_lists_every_entry() {
        let table = RegulationTable::embedded();
        let out = species(&table);
        assert!(out.contains("우럭"));
        assert!(out.ends_with(&format!("{} species\n", table.len())));
        let unregulated = table.iter().filter(|e| e.is_unregulated()).count();
        assert_eq!(out.matches("제한 없음").count(), unregulated);
    }

    #[test]
    fn regulations_list_and_sheet() {
        let list = regulations(None);
        assert_eq!(list.lines().count(), 4);

        let sheet = regulations(Some(Region::Jeju));
        assert!(sheet.starts_with("제주 (Jeju)\n"));
        assert!(sheet.contains("[금어기]"));
        assert!(sheet.contains("연중"));
    }

    #[test]
    fn fines_show_amounts() {
        let out = fines();
        assert!(out.contains("2,000만원 이하"));
    }

    #[test]
    fn zone_delta_lists_new_zones() {
        let table = ZoneTable::embedded();
        let view = ViewportState::from_bbox("126.85,37.45,127.05,37.60", 6).unwrap();

        let delta = compute_visible_zones(&view, table.zones(), &BTreeSet::new());
        let out = zone_delta(&delta, 6);
        assert!(out.contains("한강 여의도 수중보 구역"));
        assert!(out.ends_with("1 zone(s) to draw\n"));

        let rendered: BTreeSet<_> = [1].into_iter().collect();
        let delta = compute_visible_zones(&view, table.zones(), &rendered);
        assert!(zone_delta(&delta, 6).contains("0 zone(s) to draw"));
    }

    #[test]
    fn zone_delta_through_a_session() {
        let table = ZoneTable::embedded();
        let mut session = ZoneSession::new();
        let view = ViewportState::from_bbox("126.85,37.45,127.05,37.60", 6).unwrap();

        assert!(zone_delta(&session.on_idle(&view, table.zones()), 6).contains("1 zone(s)"));
        assert!(zone_delta(&session.on_idle(&view, table.zones()), 6).contains("0 zone(s)"));

        let far = ViewportState::from_bbox("120,30,135,40", 12).unwrap();
        let out = zone_delta(&session.on_idle(&far, table.zones()), 12);
        assert!(out.contains("clear all zones"));
        assert!(session.rendered().is_empty());
    }

    #[test]
    fn merge_writes_new_prohibited_zones() {
        let zones_path = temp_path("zones.json");
        let water_path = temp_path("water.json");
        let output = temp_path("merged.json");

        let table = ZoneTable::embedded();
        maintenance::write_zones(&zones_path, table.zones()).unwrap();
        let ring: Vec<_> = (0..7)
            .map(|i| nakgo_zone_models::LatLng::new(36.6 + f64::from(i) * 0.001, 126.8))
            .collect();
        overpass::write_water_bodies(
            &water_path,
            &[
                overpass::WaterBody {
                    name: "예당저수지".to_string(),
                    coordinates: ring.clone(),
                },
                overpass::WaterBody {
                    name: table.zones()[0].name.clone(),
                    coordinates: ring,
                },
            ],
        )
        .unwrap();

        let (before, after) = merge(&zones_path, &water_path, &output).unwrap();
        assert_eq!((before, after), (table.len(), table.len() + 1));

        let merged = maintenance::read_zones(&output).unwrap();
        assert_eq!(merged.last().map(|z| z.name.as_str()), Some("예당저수지"));
        assert_eq!(merged.last().map(|z| z.id), Some(u32::try_from(after).unwrap()));

        for path in [zones_path, water_path, output] {
            std::fs::remove_file(path).ok();
        }
    }
}
