//! The species regulation table and the verdict decision.

use std::collections::BTreeMap;

use nakgo_regulation_models::{CheckResult, SpeciesRegulation, Verdict, VerdictStatus};

use crate::{RegulationError, registry};

/// Read-only species regulation table, indexed by species identifier.
#[derive(Debug, Clone)]
pub struct RegulationTable {
    entries: Vec<SpeciesRegulation>,
    /// species id -> position in `entries`
    index: BTreeMap<String, usize>,
}

impl RegulationTable {
    /// Builds a table from regulation entries, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`RegulationError::InvalidTable`] if a species identifier is
    /// empty or duplicated, or a minimum length is not a positive number.
    pub fn new(entries: Vec<SpeciesRegulation>) -> Result<Self, RegulationError> {
        let mut index = BTreeMap::new();

        for (i, entry) in entries.iter().enumerate() {
            if entry.species_id.trim().is_empty() {
                return Err(RegulationError::InvalidTable {
                    message: format!("entry {i} has an empty species id"),
                });
            }
            if let Some(min) = entry
                .min_length_cm
                .filter(|min| !(min.is_finite() && *min > 0.0))
            {
                return Err(RegulationError::InvalidTable {
                    message: format!(
                        "species {} has invalid minimum length {min}",
                        entry.species_id
                    ),
                });
            }
            if index.insert(entry.species_id.clone(), i).is_some() {
                return Err(RegulationError::InvalidTable {
                    message: format!("duplicate species id {}", entry.species_id),
                });
            }
        }

        Ok(Self { entries, index })
    }

    /// Builds the table from the embedded species data.
    ///
    /// # Panics
    ///
    /// Panics if the embedded data is malformed. This is a development
    /// error caught by the registry tests.
    #[must_use]
    pub fn embedded() -> Self {
        let table = Self::new(registry::all_species())
            .unwrap_or_else(|e| panic!("Embedded species table is invalid: {e}"));
        log::debug!("Loaded {} species regulations", table.len());
        table
    }

    /// Looks up a species by exact identifier.
    #[must_use]
    pub fn get(&self, species_id: &str) -> Option<&SpeciesRegulation> {
        self.index.get(species_id).map(|&i| &self.entries[i])
    }

    /// Iterates over all entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesRegulation> {
        self.entries.iter()
    }

    /// Returns every species identifier in table order.
    #[must_use]
    pub fn species_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.species_id.as_str()).collect()
    }

    /// Number of species in the table.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluates a catch of `species_id` measuring `length_cm`.
    ///
    /// Checks run in a fixed order: an unknown species yields
    /// [`VerdictStatus::Unknown`]; a length strictly below the minimum
    /// yields [`VerdictStatus::Prohibited`] (the minimum itself is legal);
    /// otherwise any closed season on record yields
    /// [`VerdictStatus::Restricted`]; otherwise the catch is
    /// [`VerdictStatus::Allowed`]. The closed season is a standing
    /// attribute and is not compared against the current date.
    ///
    /// # Errors
    ///
    /// Returns [`RegulationError::InvalidInput`] if `species_id` is blank or
    /// `length_cm` is not a finite number greater than zero.
    pub fn evaluate(&self, species_id: &str, length_cm: f64) -> Result<Verdict, RegulationError> {
        if species_id.trim().is_empty() {
            return Err(RegulationError::InvalidInput {
                reason: "species identifier is empty".to_string(),
            });
        }
        if !length_cm.is_finite() || length_cm <= 0.0 {
            return Err(RegulationError::InvalidInput {
                reason: format!("length must be a number greater than 0cm, got {length_cm}"),
            });
        }

        let Some(species) = self.get(species_id) else {
            log::debug!("No regulation entry for species {species_id}");
            return Ok(Verdict {
                status: VerdictStatus::Unknown,
                matched_species: None,
                input_length: length_cm,
            });
        };

        let status = match (species.min_length_cm, &species.closed_season) {
            (Some(min), _) if length_cm < min => VerdictStatus::Prohibited,
            (_, Some(_)) => VerdictStatus::Restricted,
            _ => VerdictStatus::Allowed,
        };

        log::debug!("Evaluated {species_id} at {length_cm}cm: {status}");

        Ok(Verdict {
            status,
            matched_species: Some(species.clone()),
            input_length: length_cm,
        })
    }
}

/// Evaluates a catch and reports it in the backend `/fish/check` shape.
///
/// # Errors
///
/// Returns [`RegulationError::InvalidInput`] for invalid input and
/// [`RegulationError::SpeciesNotFound`] if the species is not in `table`.
pub fn check(
    table: &RegulationTable,
    species_id: &str,
    length_cm: f64,
) -> Result<CheckResult, RegulationError> {
    let verdict = table.evaluate(species_id, length_cm)?;

    let Some(species) = verdict.matched_species.as_ref() else {
        return Err(RegulationError::SpeciesNotFound {
            species_id: species_id.to_string(),
        });
    };

    Ok(CheckResult {
        species: species.species_id.clone(),
        input_length: verdict.input_length,
        min_length: verdict.min_length_cm(),
        is_under_size: verdict.status == VerdictStatus::Prohibited,
        is_banned_period: species.closed_season.is_some(),
        message: verdict.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, min: Option<f64>, season: Option<&str>) -> SpeciesRegulation {
        SpeciesRegulation {
            species_id: id.to_string(),
            display_name: id.to_string(),
            english_name: id.to_string(),
            min_length_cm: min,
            closed_season: season.map(str::to_string),
            warning: None,
        }
    }

    fn sample_table() -> RegulationTable {
        RegulationTable::new(vec![
            entry("우럭", Some(23.0), Some("4.1–5.31")),
            entry("오징어", None, None),
            entry("꽃게", None, Some("6.21 - 8.20 (암컷)")),
            entry("광어", Some(35.0), None),
        ])
        .unwrap()
    }

    fn status(table: &RegulationTable, id: &str, length: f64) -> VerdictStatus {
        table.evaluate(id, length).unwrap().status
    }

    #[test]
    fn undersize_dominates_closed_season() {
        let table = sample_table();
        let verdict = table.evaluate("우럭", 20.0).unwrap();
        assert_eq!(verdict.status, VerdictStatus::Prohibited);
        assert_eq!(verdict.input_length, 20.0);
        assert_eq!(
            verdict.matched_species.map(|s| s.species_id),
            Some("우럭".to_string())
        );
    }

    #[test]
    fn legal_length_with_closed_season_is_restricted() {
        assert_eq!(status(&sample_table(), "우럭", 25.0), VerdictStatus::Restricted);
    }

    #[test]
    fn unregulated_species_is_allowed() {
        assert_eq!(status(&sample_table(), "오징어", 10.0), VerdictStatus::Allowed);
    }

    #[test]
    fn unknown_species_has_no_match() {
        let verdict = sample_table().evaluate("없는물고기", 30.0).unwrap();
        assert_eq!(verdict.status, VerdictStatus::Unknown);
        assert!(verdict.matched_species.is_none());
        assert_eq!(verdict.input_length, 30.0);
    }

    #[test]
    fn minimum_length_boundary_is_inclusive() {
        let table = RegulationTable::embedded();
        for species in table.iter() {
            let Some(min) = species.min_length_cm else {
                continue;
            };
            assert_eq!(
                status(&table, &species.species_id, min - 0.1),
                VerdictStatus::Prohibited,
                "{} just below minimum",
                species.species_id
            );
            assert_ne!(
                status(&table, &species.species_id, min),
                VerdictStatus::Prohibited,
                "{} at minimum",
                species.species_id
            );
        }
    }

    #[test]
    fn closed_season_without_minimum_is_always_restricted() {
        let table = RegulationTable::embedded();
        for species in table.iter() {
            if species.min_length_cm.is_none() && species.closed_season.is_some() {
                for length in [0.1, 1.0, 7.5, 50.0, 1000.0] {
                    assert_eq!(
                        status(&table, &species.species_id, length),
                        VerdictStatus::Restricted,
                        "{} at {length}cm",
                        species.species_id
                    );
                }
            }
        }
    }

    #[test]
    fn species_without_size_or_season_is_always_allowed() {
        let table = RegulationTable::embedded();
        for species in table.iter() {
            if species.min_length_cm.is_none() && species.closed_season.is_none() {
                for length in [0.1, 12.0, 300.0] {
                    assert_eq!(
                        status(&table, &species.species_id, length),
                        VerdictStatus::Allowed,
                        "{} at {length}cm",
                        species.species_id
                    );
                }
            }
        }
    }

    #[test]
    fn unknown_species_regardless_of_length() {
        let table = sample_table();
        for length in [0.5, 23.0, 99.0] {
            assert_eq!(status(&table, "없는물고기", length), VerdictStatus::Unknown);
        }
    }

    #[test]
    fn rejects_non_positive_and_non_finite_lengths() {
        let table = sample_table();
        for length in [0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(
                    table.evaluate("우럭", length),
                    Err(RegulationError::InvalidInput { .. })
                ),
                "length {length} should be rejected"
            );
        }
        assert!(matches!(
            table.evaluate("없는물고기", 0.0),
            Err(RegulationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_blank_species() {
        let table = sample_table();
        for id in ["", "   "] {
            assert!(matches!(
                table.evaluate(id, 10.0),
                Err(RegulationError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn lookup_is_exact() {
        let table = sample_table();
        assert!(table.get("우럭").is_some());
        assert!(table.get(" 우럭").is_none());
        assert_eq!(status(&table, "우럭 ", 30.0), VerdictStatus::Unknown);
    }

    #[test]
    fn rejects_duplicate_species() {
        let result = RegulationTable::new(vec![
            entry("광어", Some(35.0), None),
            entry("광어", Some(30.0), None),
        ]);
        assert!(matches!(result, Err(RegulationError::InvalidTable { .. })));
    }

    #[test]
    fn rejects_invalid_minimum_length() {
        for min in [0.0, -1.0, f64::NAN] {
            let result = RegulationTable::new(vec![entry("광어", Some(min), None)]);
            assert!(matches!(result, Err(RegulationError::InvalidTable { .. })));
        }
    }

    #[test]
    fn embedded_table_preserves_order() {
        let table = RegulationTable::embedded();
        let ids = table.species_ids();
        assert_eq!(&ids[..3], &["광어", "우럭", "참돔"]);
        assert_eq!(ids.len(), table.len());
    }

    #[test]
    fn check_reports_backend_shape() {
        let result = check(&sample_table(), "우럭", 20.0).unwrap();
        assert_eq!(result.species, "우럭");
        assert_eq!(result.input_length, 20.0);
        assert_eq!(result.min_length, Some(23.0));
        assert!(result.is_under_size);
        assert!(result.is_banned_period);
        assert_eq!(result.message, VerdictStatus::Prohibited.message());
        assert_eq!(result.status(), VerdictStatus::Prohibited);
    }

    #[test]
    fn check_allowed_catch() {
        let result = check(&sample_table(), "광어", 40.0).unwrap();
        assert!(!result.is_under_size);
        assert!(!result.is_banned_period);
        assert_eq!(result.status(), VerdictStatus::Allowed);
    }

    #[test]
    fn check_unknown_species_is_not_found() {
        assert!(matches!(
            check(&sample_table(), "없는물고기", 30.0),
            Err(RegulationError::SpeciesNotFound { species_id }) if species_id == "없는물고기"
        ));
    }
}
