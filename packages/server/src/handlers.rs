//! HTTP handler functions for the nakgo-algo API.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, web};
use nakgo_regulation::RegulationError;
use nakgo_regulation_models::Region;
use nakgo_server_models::{
    ApiCheckResponse, ApiError, ApiFine, ApiHealth, ApiRegionRegulations, ApiRegionSummary,
    ApiZoneDelta, CheckRequest, ZoneQueryParams,
};
use nakgo_zone::{export, loader};
use nakgo_zone_models::{ViewportState, ZoneId};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/fish/species`
///
/// Returns the names of every species with a regulation entry.
pub async fn species(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.regulations.species_ids())
}

/// `POST /api/fish/check`
///
/// Evaluates a catch. Unknown species answer 404 so the client can show
/// its "no information" state.
pub async fn check(state: web::Data<AppState>, body: web::Json<CheckRequest>) -> HttpResponse {
    match nakgo_regulation::check(&state.regulations, &body.species, body.length) {
        Ok(result) => HttpResponse::Ok().json(ApiCheckResponse::from(result)),
        Err(e @ RegulationError::InvalidInput { .. }) => {
            log::debug!("Rejected check request: {e}");
            HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
        }
        Err(e @ RegulationError::SpeciesNotFound { .. }) => {
            HttpResponse::NotFound().json(ApiError::new(e.to_string()))
        }
        Err(e @ RegulationError::InvalidTable { .. }) => {
            log::error!("Failed to check catch: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to check catch"))
        }
    }
}

/// `GET /api/regulations`
pub async fn regions(state: web::Data<AppState>) -> HttpResponse {
    let summaries: Vec<ApiRegionSummary> =
        state.regions.iter().map(ApiRegionSummary::from).collect();
    HttpResponse::Ok().json(summaries)
}

/// `GET /api/regulations/{region}`
pub async fn region(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let sheet = id
        .parse::<Region>()
        .ok()
        .and_then(|region| state.regions.iter().find(|s| s.region == region));

    sheet.map_or_else(
        || HttpResponse::NotFound().json(ApiError::new(format!("Unknown region: {id}"))),
        |sheet| HttpResponse::Ok().json(ApiRegionRegulations::from(sheet.clone())),
    )
}

/// `GET /api/fines`
pub async fn fines(state: web::Data<AppState>) -> HttpResponse {
    let fines: Vec<ApiFine> = state.fines.iter().cloned().map(ApiFine::from).collect();
    HttpResponse::Ok().json(fines)
}

/// `GET /api/zones`
///
/// Returns every zone as a `GeoJSON` `FeatureCollection`.
pub async fn zones(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/geo+json")
        .json(export::feature_collection(state.zones.zones()))
}

/// `GET /api/zones/{id}`
pub async fn zone(state: web::Data<AppState>, path: web::Path<ZoneId>) -> HttpResponse {
    let id = path.into_inner();
    state.zones.get(id).map_or_else(
        || HttpResponse::NotFound().json(ApiError::new(format!("Unknown zone: {id}"))),
        |zone| HttpResponse::Ok().json(zone),
    )
}

/// `GET /api/zones/visible`
///
/// Returns the zones the client still has to draw for its viewport, or
/// asks it to clear everything when zoomed out too far.
pub async fn visible_zones(
    state: web::Data<AppState>,
    params: web::Query<ZoneQueryParams>,
) -> HttpResponse {
    let Some(viewport) = ViewportState::from_bbox(&params.bbox, params.zoom) else {
        return HttpResponse::BadRequest().json(ApiError::new(
            "bbox must be west,south,east,north",
        ));
    };

    let Some(rendered) = parse_rendered(params.rendered.as_deref()) else {
        return HttpResponse::BadRequest().json(ApiError::new(
            "rendered must be a comma-separated list of zone ids",
        ));
    };

    let delta = loader::compute_visible_zones(&viewport, state.zones.zones(), &rendered);

    HttpResponse::Ok().json(ApiZoneDelta {
        to_clear: delta.to_clear,
        to_render: delta.to_render.into_iter().cloned().collect(),
    })
}

/// Parses `"1,2,3"` into a set of zone ids. Empty input is an empty set.
fn parse_rendered(s: Option<&str>) -> Option<BTreeSet<ZoneId>> {
    s.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse().ok())
        .collect()
}
