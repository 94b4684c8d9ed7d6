//! Engine configuration
//!
//! Every threshold the detectors use lives here and is passed explicitly into
//! each evaluation. Missing JSON fields fall back to the documented defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::utils::periods::MAX_TREND_WINDOWS;

/// Thresholds and window lengths for one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum mean-NDVI decrease flagged as vegetation loss
    pub ndvi_threshold: f64,
    /// Smallest estimated loss (ha) that raises an alert
    pub min_area_ha: f64,
    /// NDVI below which vegetation counts as stressed
    pub stress_threshold: f64,
    /// Previous-period mean must exceed this for a loss to count
    pub vegetated_floor: f64,
    /// Length in days of each change-detection window
    pub days_back: u32,
    /// Trailing window in days for fire hotspots
    pub fire_days_back: u32,
    /// Scene cloud-cover ceiling (percent) passed to imagery providers
    pub cloud_cover_max: u8,
    /// Number of 30-day windows in an NDVI trend
    pub trend_months: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ndvi_threshold: 0.3,
            min_area_ha: 0.5,
            stress_threshold: 0.4,
            vegetated_floor: 0.4,
            days_back: 30,
            fire_days_back: 7,
            cloud_cover_max: 20,
            trend_months: 6,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config: {:?}", path))?;

        let config: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse engine config JSON")?;

        config
            .validate()
            .with_context(|| format!("Engine config {:?} rejected", path))?;

        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let thresholds = [
            ("ndvi_threshold", self.ndvi_threshold),
            ("stress_threshold", self.stress_threshold),
            ("vegetated_floor", self.vegetated_floor),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be within [-1, 1], got {}",
                    name, value
                )));
            }
        }

        if !self.min_area_ha.is_finite() || self.min_area_ha < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "min_area_ha must be non-negative, got {}",
                self.min_area_ha
            )));
        }
        if self.days_back == 0 {
            return Err(EngineError::InvalidConfig("days_back must be at least 1".to_string()));
        }
        if self.fire_days_back == 0 {
            return Err(EngineError::InvalidConfig("fire_days_back must be at least 1".to_string()));
        }
        if self.trend_months == 0 || self.trend_months > MAX_TREND_WINDOWS {
            return Err(EngineError::InvalidConfig(format!(
                "trend_months must be between 1 and {}, got {}",
                MAX_TREND_WINDOWS, self.trend_months
            )));
        }
        if self.cloud_cover_max > 100 {
            return Err(EngineError::InvalidConfig(format!(
                "cloud_cover_max is a percentage, got {}",
                self.cloud_cover_max
            )));
        }
        Ok(())
    }
}
