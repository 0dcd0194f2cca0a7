#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the nakgo-algo server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the regulation and zone types to allow independent evolution of
//! the API contract.

use nakgo_regulation_models::{
    CheckResult, Fine, Region, RegionRegulations, VerdictStatus,
};
use nakgo_zone_models::FishingZone;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable error.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of `POST /api/fish/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    /// Species name.
    pub species: String,
    /// Measured total length in centimetres.
    pub length: f64,
}

/// Response of `POST /api/fish/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCheckResponse {
    /// Species that was checked.
    pub species: String,
    /// Length supplied by the caller.
    pub input_length: f64,
    /// Minimum legal length, if any.
    pub min_length: Option<f64>,
    /// Below the minimum legal length.
    pub is_under_size: bool,
    /// A closed season is on record for the species.
    pub is_banned_period: bool,
    /// Verdict status derived from the two flags.
    pub status: VerdictStatus,
    /// Badge label for `status`.
    pub label: String,
    /// Explanatory message.
    pub message: String,
}

impl From<CheckResult> for ApiCheckResponse {
    fn from(result: CheckResult) -> Self {
        let status = result.status();
        Self {
            species: result.species,
            input_length: result.input_length,
            min_length: result.min_length,
            is_under_size: result.is_under_size,
            is_banned_period: result.is_banned_period,
            status,
            label: status.label().to_string(),
            message: result.message,
        }
    }
}

/// Entry in the region list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegionSummary {
    /// Region identifier (`east`, `west`, `south`, `jeju`).
    pub id: Region,
    /// Korean name.
    pub name: String,
    /// English name.
    pub name_en: String,
}

impl From<&RegionRegulations> for ApiRegionSummary {
    fn from(sheet: &RegionRegulations) -> Self {
        Self {
            id: sheet.region,
            name: sheet.name.clone(),
            name_en: sheet.name_en.clone(),
        }
    }
}

/// Closed-season line of a region sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClosedSeason {
    /// Species name.
    pub name: String,
    /// Period as published.
    pub period: String,
}

/// Minimum-size line of a region sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMinSize {
    /// Species name.
    pub name: String,
    /// Size, formatted with its unit (e.g. `"35cm"`, `"갑폭 7cm"`).
    pub size: String,
}

/// Full rule sheet for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegionRegulations {
    /// Region identifier.
    pub id: Region,
    /// Korean name.
    pub name: String,
    /// English name.
    pub name_en: String,
    /// Closed seasons.
    pub closed_seasons: Vec<ApiClosedSeason>,
    /// Minimum sizes.
    pub min_sizes: Vec<ApiMinSize>,
}

impl From<RegionRegulations> for ApiRegionRegulations {
    fn from(sheet: RegionRegulations) -> Self {
        Self {
            id: sheet.region,
            name: sheet.name,
            name_en: sheet.name_en,
            closed_seasons: sheet
                .closed_seasons
                .into_iter()
                .map(|e| ApiClosedSeason {
                    name: e.name,
                    period: e.period,
                })
                .collect(),
            min_sizes: sheet
                .min_sizes
                .into_iter()
                .map(|e| ApiMinSize {
                    size: e.size.to_string(),
                    name: e.name,
                })
                .collect(),
        }
    }
}

/// One line of the fine schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFine {
    /// Stable identifier.
    pub id: String,
    /// Offence description.
    pub offense: String,
    /// Formatted maximum amount (e.g. `"100만원 이하"`).
    pub amount: String,
    /// Maximum amount in KRW.
    pub max_amount_krw: u64,
    /// Alternative custodial sentence.
    pub imprisonment: Option<String>,
    /// Statute article.
    pub legal_basis: String,
    /// Species the line applies to, if specific.
    pub species: Option<String>,
}

impl From<Fine> for ApiFine {
    fn from(fine: Fine) -> Self {
        Self {
            amount: fine.amount_label(),
            max_amount_krw: fine.max_amount_krw(),
            id: fine.id,
            offense: fine.offense,
            imprisonment: fine.imprisonment,
            legal_basis: fine.legal_basis,
            species: fine.species,
        }
    }
}

/// Query parameters for the visible-zones endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneQueryParams {
    /// Viewport as `west,south,east,north`.
    pub bbox: String,
    /// Map level (higher is more zoomed out).
    pub zoom: u8,
    /// Comma-separated ids of zones the client has already drawn.
    pub rendered: Option<String>,
}

/// Zones the client should draw (or clear) for its current viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiZoneDelta {
    /// Remove every drawn zone and forget the rendered set first.
    pub to_clear: bool,
    /// Zones to draw, in the front-end zone data layout.
    pub to_render: Vec<FishingZone>,
}
