//! Dashboard data assembly.
//!
//! Each fetcher takes the resolved id for the current role, reads its primary
//! table, resolves foreign ids to names through [`crate::join`], and returns a
//! typed view model ready for rendering. No fetcher touches the store when the
//! id is missing.

pub mod doctor;
pub mod nurse;
pub mod patient;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::store::StoreResult;

/// State of a dashboard table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView<T> {
    /// No resolved identity; nothing was fetched
    LoginRequired,
    Empty,
    /// The lookup failed; already logged
    Unavailable,
    Rows(Vec<T>),
}

impl<T> TableView<T> {
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Message for the single placeholder row, or `None` when there are rows
    pub fn placeholder(&self, noun: &str) -> Option<String> {
        match self {
            Self::LoginRequired => Some(format!("Please log in to view {}", noun)),
            Self::Empty => Some(format!("No {} found", noun)),
            Self::Unavailable => Some(format!("Unable to load {}. Please try again.", noun)),
            Self::Rows(_) => None,
        }
    }

    /// Placeholder message and rows, for handing to a row template
    pub fn into_parts(self, noun: &str) -> (Option<String>, Vec<T>) {
        let placeholder = self.placeholder(noun);
        match self {
            Self::Rows(rows) => (placeholder, rows),
            _ => (placeholder, Vec::new()),
        }
    }
}

/// State of a single-record info panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView<T> {
    LoginRequired,
    /// The record (or the reference to it) does not exist
    Missing,
    Unavailable,
    Ready(T),
}

/// Unwrap the primary query of a fetcher, mapping empty and failed results
/// to the matching table state
pub(crate) fn primary_rows<T, R>(result: StoreResult<Vec<T>>, noun: &str) -> Result<Vec<T>, TableView<R>> {
    match result {
        Ok(rows) if rows.is_empty() => Err(TableView::Empty),
        Ok(rows) => Ok(rows),
        Err(e) => {
            warn!(table = noun, error = %e, "Failed to load dashboard rows");
            Err(TableView::Unavailable)
        }
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `03/10/2025`; unparsable input is shown as stored
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// `03/10/2025, 9:30 AM`; unparsable input is shown as stored
pub fn format_datetime(raw: &str) -> String {
    match parse_datetime(raw) {
        Some(dt) => dt.format("%m/%d/%Y, %-I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn or_dash(value: Option<&str>) -> String {
    non_blank(value).unwrap_or("-").to_string()
}

pub fn or_na(value: Option<&str>) -> String {
    non_blank(value).unwrap_or("N/A").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let view: TableView<()> = TableView::LoginRequired;
        assert_eq!(
            view.placeholder("appointments").as_deref(),
            Some("Please log in to view appointments")
        );
        assert_eq!(
            TableView::<()>::Empty.placeholder("lab results").as_deref(),
            Some("No lab results found")
        );
        assert!(TableView::Rows(vec![1]).placeholder("x").is_none());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-10"), "03/10/2025");
        assert_eq!(format_date("2025-03-10T09:30"), "03/10/2025");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2025-03-10T09:30"), "03/10/2025, 9:30 AM");
        assert_eq!(format_datetime("2025-03-10 14:05:00"), "03/10/2025, 2:05 PM");
        assert_eq!(format_datetime("2025-03-10"), "2025-03-10");
    }

    #[test]
    fn test_fallback_text() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("Fasting")), "Fasting");
        assert_eq!(or_na(None), "N/A");
    }
}
