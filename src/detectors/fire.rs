//! FIRE: active hotspots over a trailing window
//!
//! Presence/intensity based: any hotspot alerts, five or more is critical.
//! No area is estimated.

use serde::{Deserialize, Serialize};

use crate::types::{Period, Severity};

/// Hotspot count at or above which a fire alert is critical
pub const CRITICAL_HOTSPOT_COUNT: u32 = 5;

/// Result of fire hotspot aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireFinding {
    pub period: Period,
    pub hotspot_count: u32,
    pub alert_triggered: bool,
    /// `High` or `Critical` when triggered, otherwise `None`
    pub severity: Option<Severity>,
}

/// Severity for a hotspot count
pub fn fire_severity(hotspot_count: u32) -> Option<Severity> {
    match hotspot_count {
        0 => None,
        n if n >= CRITICAL_HOTSPOT_COUNT => Some(Severity::Critical),
        _ => Some(Severity::High),
    }
}

/// Decide fire alert and severity for a hotspot count over `period`
pub fn aggregate_fire_hotspots(period: Period, hotspot_count: u32) -> FireFinding {
    FireFinding {
        period,
        hotspot_count,
        alert_triggered: hotspot_count > 0,
        severity: fire_severity(hotspot_count),
    }
}
