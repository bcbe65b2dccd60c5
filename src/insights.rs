//! Order counters for a date range, as shown in the insights modal.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

use crate::utils::{DATE_FORMAT, format_date, humanize_key};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsightsError {
    #[error("Invalid {field} date {value:?}; use YYYY-MM-DD.")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date must be on or before end date.")]
    ReversedRange,

    #[error("Unknown range {0:?}.")]
    UnknownRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightsRange {
    All,
    Today,
    Week,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl InsightsRange {
    /// Builds a range from the modal's selector; `from`/`to` are only read for `custom`.
    pub fn from_selection(kind: &str, from: &str, to: &str) -> Result<Self, InsightsError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "custom" => {
                let from = parse_date("start", from)?;
                let to = parse_date("end", to)?;
                if from > to {
                    return Err(InsightsError::ReversedRange);
                }
                Ok(Self::Custom { from, to })
            }
            other => Err(InsightsError::UnknownRange(other.to_string())),
        }
    }

    /// Query pairs appended after `action=insights`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::All => Vec::new(),
            Self::Today => vec![("range", "today".to_string())],
            Self::Week => vec![("range", "week".to_string())],
            Self::Custom { from, to } => vec![("from", format_date(*from)), ("to", format_date(*to))],
        }
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, InsightsError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| InsightsError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Monday of the week containing `today`, through `today`.
pub fn week_to_date(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(today.weekday().num_days_from_monday());
    (today - Duration::days(offset), today)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Insights {
    pub counters: BTreeMap<String, i64>,
}

impl Insights {
    pub fn rows(&self) -> Vec<(String, i64)> {
        self.counters
            .iter()
            .map(|(key, value)| (humanize_key(key), *value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn preset_ranges_map_to_range_param() {
        assert!(InsightsRange::All.query_pairs().is_empty());
        assert_eq!(
            InsightsRange::from_selection("Today", "", "").unwrap().query_pairs(),
            vec![("range", "today".to_string())]
        );
        assert_eq!(
            InsightsRange::from_selection("week", "junk", "").unwrap(),
            InsightsRange::Week
        );
    }

    #[test]
    fn custom_range_sends_explicit_dates() {
        let range = InsightsRange::from_selection("custom", "2026-10-01", " 2026-10-19 ").unwrap();
        assert_eq!(
            range.query_pairs(),
            vec![
                ("from", "2026-10-01".to_string()),
                ("to", "2026-10-19".to_string())
            ]
        );

        let single_day = InsightsRange::from_selection("custom", "2026-10-19", "2026-10-19");
        assert!(single_day.is_ok());
    }

    #[test]
    fn custom_range_errors() {
        assert_eq!(
            InsightsRange::from_selection("custom", "2026-10-20", "2026-10-19"),
            Err(InsightsError::ReversedRange)
        );
        assert!(matches!(
            InsightsRange::from_selection("custom", "10/01/2026", "2026-10-19"),
            Err(InsightsError::InvalidDate { field: "start", .. })
        ));
        assert!(matches!(
            InsightsRange::from_selection("fortnight", "", ""),
            Err(InsightsError::UnknownRange(_))
        ));
    }

    #[test]
    fn week_starts_on_monday() {
        // 2026-10-22 is a Thursday.
        assert_eq!(
            week_to_date(date("2026-10-22")),
            (date("2026-10-19"), date("2026-10-22"))
        );
        assert_eq!(
            week_to_date(date("2026-10-19")),
            (date("2026-10-19"), date("2026-10-19"))
        );
    }

    #[test]
    fn rows_use_readable_labels() {
        let mut insights = Insights::default();
        insights.counters.insert("totalOrders".into(), 12);
        insights.counters.insert("delivery".into(), 5);
        assert_eq!(
            insights.rows(),
            vec![("Delivery".to_string(), 5), ("Total Orders".to_string(), 12)]
        );
    }
}
