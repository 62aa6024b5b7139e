//! Course form coercion, capacity rules, and the catalogue search filter.
//!
//! Course forms arrive loosely typed: numbers may be JSON numbers or strings,
//! dates are `YYYY-MM-DD` strings and materials are a single comma-separated
//! string. The functions here turn that input into the typed values stored on
//! a course document.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CalendarDate, EntityId};

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    /// Parse from the stored `level` field.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "Beginner" => Ok(Self::Beginner),
            "Intermediate" => Ok(Self::Intermediate),
            "Advanced" => Ok(Self::Advanced),
            other => Err(CoreError::Validation(format!(
                "Unknown course level '{other}'. Must be one of: Beginner, Intermediate, Advanced"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// A numeric form field that may be submitted either as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    /// Coerce to a finite number. Blank text counts as zero.
    pub fn to_f64(&self, field: &str) -> Result<f64, CoreError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().map_err(|_| {
                        CoreError::Validation(format!("{field} must be a number, got '{text}'"))
                    })?
                }
            }
        };
        if !value.is_finite() {
            return Err(CoreError::Validation(format!("{field} must be a finite number")));
        }
        Ok(value)
    }
}

impl From<f64> for FormNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FormNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Coerce a price field. Prices may be zero but never negative.
pub fn coerce_price(input: &FormNumber) -> Result<f64, CoreError> {
    let price = input.to_f64("price")?;
    if price < 0.0 {
        return Err(CoreError::Validation("price must not be negative".into()));
    }
    Ok(price)
}

/// Coerce a capacity field to a positive whole number.
pub fn coerce_max_students(input: &FormNumber) -> Result<u32, CoreError> {
    let value = input.to_f64("maxStudents")?;
    if value.fract() != 0.0 {
        return Err(CoreError::Validation(
            "maxStudents must be a whole number".into(),
        ));
    }
    if value < 1.0 || value > f64::from(u32::MAX) {
        return Err(CoreError::Validation(
            "maxStudents must be at least 1".into(),
        ));
    }
    Ok(value as u32)
}

// ---------------------------------------------------------------------------
// Dates and materials
// ---------------------------------------------------------------------------

/// Parse a calendar date from `YYYY-MM-DD`, or from an RFC 3339 timestamp
/// (only the UTC date part is kept).
pub fn parse_calendar_date(input: &str, field: &str) -> Result<CalendarDate, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if let Ok(date) = CalendarDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&chrono::Utc).date_naive())
        .map_err(|_| {
            CoreError::Validation(format!("{field} must be a date (YYYY-MM-DD), got '{input}'"))
        })
}

/// Split a comma-separated materials string, trimming entries and dropping
/// blanks. `"A, B,,C"` becomes `["A", "B", "C"]`.
pub fn parse_materials(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Membership and capacity
// ---------------------------------------------------------------------------

/// Whether `user_id` appears in the enrolled set.
pub fn is_member(enrolled: &[EntityId], user_id: EntityId) -> bool {
    enrolled.contains(&user_id)
}

/// Whether one more student fits. Advisory only: nothing in the store
/// enforces it.
pub fn has_capacity(enrolled_count: usize, max_students: u32) -> bool {
    enrolled_count < max_students as usize
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Case-insensitive substring match over a course's searchable fields
/// (title, description, category). A blank term matches everything.
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
