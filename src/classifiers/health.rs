//! Health status and 0-100 score from mean NDVI
//!
//! Piecewise-linear bands calibrated for oil-palm canopy. Each band meets its
//! neighbour exactly at the breakpoint, so the score is continuous in NDVI.
//! Breakpoints and slopes are part of the alert history contract; do not tune.

use serde::{Deserialize, Serialize};

use crate::types::HealthStatus;

/// Status plus integer score; score is `None` exactly when status is `Unknown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthClassification {
    pub status: HealthStatus,
    pub score: Option<u8>,
}

impl HealthClassification {
    pub fn unknown() -> Self {
        Self {
            status: HealthStatus::Unknown,
            score: None,
        }
    }
}

/// Unrounded band score for a known NDVI value
pub fn raw_health_score(ndvi: f64) -> (HealthStatus, f64) {
    if ndvi >= 0.7 {
        (HealthStatus::Healthy, (70.0 + (ndvi - 0.7) * 100.0).min(100.0))
    } else if ndvi >= 0.5 {
        (HealthStatus::Healthy, 50.0 + (ndvi - 0.5) * 100.0)
    } else if ndvi >= 0.4 {
        (HealthStatus::Moderate, 40.0 + (ndvi - 0.4) * 100.0)
    } else if ndvi >= 0.3 {
        (HealthStatus::Stressed, 25.0 + (ndvi - 0.3) * 150.0)
    } else if ndvi >= 0.2 {
        (HealthStatus::Stressed, 15.0 + (ndvi - 0.2) * 100.0)
    } else {
        (HealthStatus::Critical, (ndvi * 75.0).max(0.0))
    }
}

/// Classify crop health from mean NDVI
///
/// The stored score is the band score rounded to the nearest integer.
pub fn classify_health(mean_ndvi: Option<f64>) -> HealthClassification {
    let Some(ndvi) = mean_ndvi else {
        return HealthClassification::unknown();
    };

    let (status, raw) = raw_health_score(ndvi);
    HealthClassification {
        status,
        score: Some(raw.round().clamp(0.0, 100.0) as u8),
    }
}
