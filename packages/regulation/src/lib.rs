#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Catch verdict engine and the embedded regulation tables it consults.
//!
//! [`RegulationTable::evaluate`] answers "may I keep this fish?" for a
//! species and measured length by checking the minimum legal length first
//! and the closed season second. The tables themselves (species, regional
//! rule sheets, fine schedule) are compiled into the binary from the TOML
//! files under `data/` and never change at runtime.

pub mod registry;
mod table;

pub use table::{RegulationTable, check};

/// Errors produced by the verdict engine.
#[derive(Debug, thiserror::Error)]
pub enum RegulationError {
    /// The caller passed a length or species identifier that cannot be
    /// evaluated.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The species is not in the regulation table.
    #[error("Species not found: {species_id}")]
    SpeciesNotFound {
        /// Identifier that was looked up.
        species_id: String,
    },

    /// A regulation table could not be built from the given entries.
    #[error("Invalid regulation table: {message}")]
    InvalidTable {
        /// Description of what went wrong.
        message: String,
    },
}
