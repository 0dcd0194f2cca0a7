#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Species regulation, verdict, and fine schedule types.
//!
//! These types describe the static reference tables consulted by the
//! verdict engine in `nakgo_regulation` (minimum legal lengths, closed
//! seasons, regional rule sheets, and the fine schedule) together with the
//! verdict produced for a single catch.

mod season;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use season::{MonthDay, SeasonWindow};

/// Regulation entry for a single fish species.
///
/// Absent optional fields mean the corresponding rule does not apply. A
/// species with all three absent is fully unregulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRegulation {
    /// Unique identifier. This is the Korean species name used by the
    /// backend contract (e.g. `"우럭"`).
    pub species_id: String,
    /// Name shown in the UI, including common aliases (e.g. `"우럭 (조피볼락)"`).
    pub display_name: String,
    /// English name (e.g. `"Rockfish"`).
    pub english_name: String,
    /// Minimum legal length in centimetres (금지체장).
    pub min_length_cm: Option<f64>,
    /// Closed season (금어기) as published, e.g. `"6.21 - 8.20 (암컷)"`.
    ///
    /// Kept as opaque text. See [`SeasonWindow::parse`] for a best-effort
    /// structured reading.
    pub closed_season: Option<String>,
    /// Safety or ecological note (invasive, venomous, ...).
    pub warning: Option<String>,
}

impl SpeciesRegulation {
    /// Parses [`Self::closed_season`] into a [`SeasonWindow`], if present
    /// and in a recognised form.
    #[must_use]
    pub fn season_window(&self) -> Option<SeasonWindow> {
        self.closed_season.as_deref().and_then(SeasonWindow::parse)
    }

    /// Whether no rule of any kind applies to this species.
    #[must_use]
    pub const fn is_unregulated(&self) -> bool {
        self.min_length_cm.is_none() && self.closed_season.is_none() && self.warning.is_none()
    }
}

/// Outcome of evaluating one catch.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VerdictStatus {
    /// May be kept.
    Allowed,
    /// Below the minimum legal length.
    Prohibited,
    /// A closed season is defined for the species.
    Restricted,
    /// Species is not in the regulation table.
    Unknown,
}

impl VerdictStatus {
    /// Short label shown on the result badge.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Allowed => "포획 가능",
            Self::Prohibited => "포획 금지",
            Self::Restricted => "금어기 주의",
            Self::Unknown => "정보 없음",
        }
    }

    /// Explanatory message for this status.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Allowed => "포획 가능한 크기입니다.",
            Self::Prohibited => "금지체장 미달입니다. 포획 및 유통이 금지됩니다.",
            Self::Restricted => "금어기 기간을 확인하세요. 해당 기간 중 포획이 금지됩니다.",
            Self::Unknown => "등록되지 않은 어종입니다. 관할 지자체에 확인하세요.",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Allowed,
            Self::Prohibited,
            Self::Restricted,
            Self::Unknown,
        ]
    }
}

/// Result of evaluating one `(species, length)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Compliance status.
    pub status: VerdictStatus,
    /// The regulation entry that was matched, `None` when
    /// [`VerdictStatus::Unknown`].
    pub matched_species: Option<SpeciesRegulation>,
    /// Length supplied by the caller, in centimetres.
    pub input_length: f64,
}

impl Verdict {
    /// Human-readable message for this verdict.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.status.message()
    }

    /// Minimum legal length of the matched species, if any.
    #[must_use]
    pub fn min_length_cm(&self) -> Option<f64> {
        self.matched_species.as_ref().and_then(|s| s.min_length_cm)
    }
}

/// Answer in the shape returned by the backend `/fish/check` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Species identifier that was checked.
    pub species: String,
    /// Length supplied by the caller, in centimetres.
    pub input_length: f64,
    /// Minimum legal length, if the species has one.
    pub min_length: Option<f64>,
    /// Whether the catch is below the minimum legal length.
    pub is_under_size: bool,
    /// Whether the species has a closed season on record.
    pub is_banned_period: bool,
    /// Explanatory message.
    pub message: String,
}

impl CheckResult {
    /// Derives the verdict status encoded by the two flags.
    ///
    /// Size violation takes priority over closed season.
    #[must_use]
    pub const fn status(&self) -> VerdictStatus {
        if self.is_under_size {
            VerdictStatus::Prohibited
        } else if self.is_banned_period {
            VerdictStatus::Restricted
        } else {
            VerdictStatus::Allowed
        }
    }
}

/// Regional sea area for which a rule sheet is published.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Region {
    /// 동해
    East,
    /// 서해
    West,
    /// 남해
    South,
    /// 제주
    Jeju,
}

impl Region {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::East, Self::West, Self::South, Self::Jeju]
    }
}

/// Closed-season line on a regional rule sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedSeasonEntry {
    /// Species (or species subset, e.g. `"꽃게 암컷"`).
    pub name: String,
    /// Period as published (e.g. `"6.21 ~ 8.20"`, `"연중"`).
    pub period: String,
}

/// A size limit, either a plain length or a published free-text rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeLimit {
    /// Total length in centimetres.
    Centimetres(f64),
    /// Non-length measure such as carapace width (`"갑폭 7"`).
    Text(String),
}

impl std::fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Centimetres(cm) => write!(f, "{cm}cm"),
            Self::Text(text) => write!(f, "{text}cm"),
        }
    }
}

/// Minimum-size line on a regional rule sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinSizeEntry {
    /// Species name.
    pub name: String,
    /// Minimum size.
    pub size: SizeLimit,
}

/// Rule sheet for one sea area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRegulations {
    /// Sea area.
    pub region: Region,
    /// Korean name (e.g. `"동해"`).
    pub name: String,
    /// English name (e.g. `"East Sea"`).
    pub name_en: String,
    /// Closed seasons in force in this area.
    #[serde(default)]
    pub closed_seasons: Vec<ClosedSeasonEntry>,
    /// Minimum sizes in force in this area.
    #[serde(default)]
    pub min_sizes: Vec<MinSizeEntry>,
}

/// One line of the fine schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fine {
    /// Stable identifier (e.g. `"undersize_catch"`).
    pub id: String,
    /// Offence description (e.g. `"금지체장 미달 포획"`).
    pub offense: String,
    /// Maximum fine in units of 10,000 KRW (만원).
    pub max_amount_manwon: u32,
    /// Alternative custodial sentence, if any (e.g. `"2년 이하 징역"`).
    pub imprisonment: Option<String>,
    /// Statute article the fine is based on.
    pub legal_basis: String,
    /// Species the line is specific to; `None` for general offences.
    pub species: Option<String>,
}

impl Fine {
    /// Maximum fine in KRW.
    #[must_use]
    pub fn max_amount_krw(&self) -> u64 {
        u64::from(self.max_amount_manwon) * 10_000
    }

    /// Formats the maximum amount the way the fines screen shows it,
    /// e.g. `"2,000만원 이하"`.
    #[must_use]
    pub fn amount_label(&self) -> String {
        let digits = self.max_amount_manwon.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{grouped}만원 이하")
    }
}
