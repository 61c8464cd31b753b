//! Shared validation utilities
//!
//! Common input validation used across commands and queries: required-name
//! checks, strict `YYYY-MM-DD` day parsing, and attendance status parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be between 1 and {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },
}

/// Errors that can occur during day parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateValidationError {
    #[error("Date is required")]
    Required,

    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    Invalid(String),
}

/// Validate a required, trimmed name field
///
/// Returns the trimmed name on success so callers persist the normalized
/// form.
pub fn validate_name(
    name: &str,
    field: &'static str,
    max_length: usize,
) -> Result<String, NameValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameValidationError::Required { field });
    }
    if trimmed.len() > max_length {
        return Err(NameValidationError::TooLong { field, max_length });
    }
    Ok(trimmed.to_string())
}

/// Parse a calendar day from strict `YYYY-MM-DD` input
///
/// The day is the storage unit for attendance; parsing here discards any
/// notion of time-of-day or timezone, so lookups are exact-match regardless
/// of where the client sits.
pub fn parse_day(input: &str) -> Result<NaiveDate, DateValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateValidationError::Required);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| DateValidationError::Invalid(trimmed.to_string()))
}

/// Attendance status accepted by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }

    /// Parse a status, case-insensitively. Unknown statuses are `None` so
    /// bulk saves can skip them without erring.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "late" => Some(AttendanceStatus::Late),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  7A ", "Class name", 100).unwrap(), "7A");
    }

    #[test]
    fn test_validate_name_rejects_blank() {
        assert!(matches!(
            validate_name("   ", "Class name", 100),
            Err(NameValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_name_rejects_too_long() {
        let long = "x".repeat(101);
        assert!(matches!(
            validate_name(&long, "Class name", 100),
            Err(NameValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_day_strict_format() {
        assert_eq!(
            parse_day("2024-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(parse_day("10-01-2024").is_err());
        assert!(parse_day("2024-13-01").is_err());
        assert!(parse_day("2024-01-10T05:00:00Z").is_err());
        assert!(matches!(parse_day(""), Err(DateValidationError::Required)));
    }

    #[test]
    fn test_attendance_status_parse() {
        assert_eq!(
            AttendanceStatus::parse("Present"),
            Some(AttendanceStatus::Present)
        );
        assert_eq!(AttendanceStatus::parse(" late "), Some(AttendanceStatus::Late));
        assert_eq!(AttendanceStatus::parse("excused"), None);
    }
}
