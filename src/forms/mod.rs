//! Dashboard form handling.
//!
//! Each form deserializes from the posted body as raw strings so the values
//! can be echoed back on failure. `validate` trims and checks them, producing
//! either the typed record to insert or a [`FieldErrors`] describing which
//! inputs to flag.

pub mod doctor;
pub mod nurse;
pub mod patient;

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

pub use doctor::{LabOrderForm, TreatmentForm};
pub use nurse::LabResultForm;
pub use patient::AppointmentForm;

pub const REQUIRED_MESSAGE: &str = "Please fill in all required fields";

/// CSS class applied to flagged inputs
pub const INVALID_CLASS: &str = "field-invalid";

lazy_static! {
    static ref ID_REGEX: Regex = Regex::new(r"^[1-9][0-9]{0,17}$").unwrap();
}

/// Collects per-field validation failures in the order they were found
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
    missing_required: bool,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        self.errors.push((field, message.into()));
        self
    }

    /// Trimmed value of a required input, flagging it when blank
    pub fn require(&mut self, field: &'static str, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.missing_required = true;
            self.add(field, "This field is required");
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// A required numeric id, as posted from a select or hidden input
    pub fn require_id(&mut self, field: &'static str, value: &str) -> Option<i64> {
        let value = self.require(field, value)?;
        match parse_id(&value) {
            Some(id) => Some(id),
            None => {
                self.add(field, "Invalid selection");
                None
            }
        }
    }

    /// A required `YYYY-MM-DD` date, returned in that canonical form
    pub fn require_date(&mut self, field: &'static str, value: &str) -> Option<NaiveDate> {
        let value = self.require(field, value)?;
        match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.add(field, "Invalid date");
                None
            }
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|(f, _)| *f == field)
    }

    /// `field-invalid` for flagged inputs, empty otherwise
    pub fn class(&self, field: &str) -> &'static str {
        if self.has(field) {
            INVALID_CLASS
        } else {
            ""
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Banner text: the required-fields message when anything was left
    /// blank, otherwise the first specific failure
    pub fn message(&self) -> String {
        if self.missing_required {
            return REQUIRED_MESSAGE.to_string();
        }
        self.errors
            .first()
            .map(|(_, message)| message.clone())
            .unwrap_or_else(|| REQUIRED_MESSAGE.to_string())
    }

    /// `Ok(value)` when nothing was flagged
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, FieldErrors> {
        if !self.is_empty() {
            return Err(self);
        }
        value().ok_or(self)
    }
}

pub fn parse_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if !ID_REGEX.is_match(raw) {
        return None;
    }
    raw.parse().ok()
}

/// Parse a `datetime-local` input value
pub fn parse_datetime_local(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Blank optional inputs become `None`
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
