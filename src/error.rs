//! Engine error taxonomy
//!
//! Only invalid input is an error. Missing satellite data is a normal
//! outcome (inconclusive finding / `HealthStatus::Unknown`) and never
//! reaches this type.

use chrono::NaiveDate;
use thiserror::Error;

/// Input rejected before any finding is produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("boundary area must be non-negative, got {0} ha")]
    NegativeArea(f64),

    #[error("{field} must be a finite number")]
    NonFiniteValue { field: &'static str },

    #[error("{field} = {value} is outside the vegetation index range [-1, 1]")]
    IndexOutOfRange { field: &'static str, value: f64 },

    #[error("index minimum {min} is greater than maximum {max}")]
    InvertedIndexRange { min: f64, max: f64 },

    #[error("invalid period {start} to {end}: {reason}")]
    InvalidPeriod {
        start: NaiveDate,
        end: NaiveDate,
        reason: &'static str,
    },

    #[error("recent period starting {recent_start} does not follow previous period ending {previous_end}")]
    PeriodOrder {
        previous_end: NaiveDate,
        recent_start: NaiveDate,
    },

    #[error("change periods must be contiguous and equal length: {0}")]
    PeriodMismatch(String),

    #[error("invalid boundary geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
