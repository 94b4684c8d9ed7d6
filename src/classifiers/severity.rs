//! Severity from affected area
//!
//! Thresholds are inclusive lower bounds; the highest matching tier wins.

use crate::types::Severity;

/// Affected area (ha) at or above which an alert is critical
pub const CRITICAL_AREA_HA: f64 = 10.0;
/// Affected area (ha) at or above which an alert is high
pub const HIGH_AREA_HA: f64 = 5.0;
/// Affected area (ha) at or above which an alert is medium
pub const MEDIUM_AREA_HA: f64 = 1.0;

/// Classify alert severity based on affected area
pub fn classify_severity(area_ha: f64) -> Severity {
    match area_ha {
        a if a >= CRITICAL_AREA_HA => Severity::Critical,
        a if a >= HIGH_AREA_HA => Severity::High,
        a if a >= MEDIUM_AREA_HA => Severity::Medium,
        _ => Severity::Low,
    }
}
