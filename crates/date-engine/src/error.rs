//! Error types for date-engine operations.

use thiserror::Error;

use crate::calendar::CalendarUnit;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Calendar overflow: cannot add {amount} {unit}(s)")]
    CalendarOverflow { unit: CalendarUnit, amount: i64 },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid calendar unit: {0}")]
    InvalidUnit(String),
}

pub type Result<T> = std::result::Result<T, DateError>;
