//! Best-effort structured reading of published closed-season text.

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar day without a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
}

impl MonthDay {
    /// Creates a [`MonthDay`], rejecting days that never occur in `month`
    /// (29 February is accepted).
    #[must_use]
    pub const fn new(month: u32, day: u32) -> Option<Self> {
        if day == 0 || day > days_in_month(month) {
            return None;
        }
        Some(Self { month, day })
    }

    /// Returns the month/day of `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl std::fmt::Display for MonthDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.month, self.day)
    }
}

/// Closed-season window read from text such as `"6.21 - 8.20 (암컷)"`,
/// `"1월 ~ 3월"` or `"연중"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeasonWindow {
    /// Closed all year.
    YearRound,
    /// Closed from `start` to `end` inclusive. `start > end` wraps over
    /// the new year.
    Between {
        /// First closed day.
        start: MonthDay,
        /// Last closed day.
        end: MonthDay,
    },
}

impl SeasonWindow {
    /// Parses published closed-season text. Trailing notes in parentheses
    /// are ignored.
    ///
    /// Returns `None` when the text is not in a recognised form.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.split('(').next().unwrap_or_default().trim();
        if text.is_empty() {
            return None;
        }
        if text.contains("연중") {
            return Some(Self::YearRound);
        }

        let mut parts = text.split(['~', '-', '–']);
        let start = parse_bound(parts.next()?, Bound::Start)?;
        let end = parse_bound(parts.next()?, Bound::End)?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self::Between { start, end })
    }

    /// Whether `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::YearRound => true,
            Self::Between { start, end } => {
                let day = MonthDay::of(date);
                if start <= end {
                    start <= day && day <= end
                } else {
                    day >= start || day <= end
                }
            }
        }
    }
}

impl std::fmt::Display for SeasonWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearRound => f.write_str("연중"),
            Self::Between { start, end } => write!(f, "{start} ~ {end}"),
        }
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Parses `"6.21"` or `"3월"`. A bare month expands to its first day for
/// the start bound and its last day for the end bound.
fn parse_bound(text: &str, bound: Bound) -> Option<MonthDay> {
    let text = text.trim();

    if let Some(month) = text.strip_suffix('월') {
        let month: u32 = month.trim().parse().ok()?;
        let day = match bound {
            Bound::Start => 1,
            Bound::End => days_in_month(month),
        };
        return MonthDay::new(month, day);
    }

    let (month, day) = text.split_once('.')?;
    MonthDay::new(month.trim().parse().ok()?, day.trim().parse().ok()?)
}

const fn days_in_month(month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 29,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(month: u32, day: u32) -> MonthDay {
        MonthDay::new(month, day).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_ranges_with_notes() {
        assert_eq!(
            SeasonWindow::parse("6.21 - 8.20 (암컷)"),
            Some(SeasonWindow::Between {
                start: md(6, 21),
                end: md(8, 20),
            })
        );
        assert_eq!(
            SeasonWindow::parse("4.1–5.31"),
            Some(SeasonWindow::Between {
                start: md(4, 1),
                end: md(5, 31),
            })
        );
        assert_eq!(
            SeasonWindow::parse("7.1 ~ 7.15"),
            Some(SeasonWindow::Between {
                start: md(7, 1),
                end: md(7, 15),
            })
        );
    }

    #[test]
    fn parses_month_ranges() {
        assert_eq!(
            SeasonWindow::parse("1월 ~ 3월"),
            Some(SeasonWindow::Between {
                start: md(1, 1),
                end: md(3, 31),
            })
        );
    }

    #[test]
    fn parses_year_round() {
        assert_eq!(SeasonWindow::parse("연중"), Some(SeasonWindow::YearRound));
    }

    #[test]
    fn rejects_unrecognised_text() {
        assert_eq!(SeasonWindow::parse(""), None);
        assert_eq!(SeasonWindow::parse("여름철"), None);
        assert_eq!(SeasonWindow::parse("13.1 ~ 14.1"), None);
        assert_eq!(SeasonWindow::parse("6.31 ~ 7.1"), None);
        assert_eq!(SeasonWindow::parse("6.1"), None);
    }

    #[test]
    fn contains_is_inclusive() {
        let window = SeasonWindow::parse("6.21 - 8.20").unwrap();
        assert!(window.contains(date(2026, 6, 21)));
        assert!(window.contains(date(2026, 8, 20)));
        assert!(!window.contains(date(2026, 6, 20)));
        assert!(!window.contains(date(2026, 8, 21)));
    }

    #[test]
    fn contains_wraps_over_new_year() {
        let window = SeasonWindow::parse("12.1 ~ 2.28").unwrap();
        assert!(window.contains(date(2026, 12, 15)));
        assert!(window.contains(date(2027, 1, 10)));
        assert!(!window.contains(date(2026, 3, 1)));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let window = SeasonWindow::parse("5.1 ~ 7.31").unwrap();
        assert_eq!(window.to_string(), "5.1 ~ 7.31");
        assert_eq!(SeasonWindow::parse(&window.to_string()), Some(window));
    }
}
