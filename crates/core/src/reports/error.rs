//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

use lavka_shared::AppError;

/// Errors raised when validating a report query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The start date is after the end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested range start.
        start: NaiveDate,
        /// Requested range end.
        end: NaiveDate,
    },
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
