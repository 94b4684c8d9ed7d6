//! Stressed-area estimation from summary statistics
//!
//! Only mean/min/max are available per period, never a pixel histogram. The
//! default estimator treats the index as roughly normal with
//! `σ ≈ (max − min) / 4` and maps the threshold's z-score linearly onto a
//! percentage. This is a coarse heuristic, not a statistical estimator.
//! Anything with pixel-level data should implement [`StressAreaEstimator`]
//! instead of adjusting the formula here.

use serde::{Deserialize, Serialize};

use crate::types::VegetationStats;

/// Share of the boundary assumed stressed when the spread is zero and the
/// mean sits above the threshold
const FLAT_ABOVE_THRESHOLD_PCT: f64 = 10.0;
/// Share assumed stressed when the spread is zero otherwise
const FLAT_AT_OR_BELOW_THRESHOLD_PCT: f64 = 50.0;

/// Estimated stressed share of a boundary
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StressEstimate {
    /// Percentage of the boundary below the stress threshold (0-100)
    pub percentage: Option<f64>,
    /// Stressed area in hectares
    pub area_ha: Option<f64>,
}

/// Seam for replacing the summary-statistics heuristic
pub trait StressAreaEstimator: Send + Sync {
    fn estimate(&self, boundary_area_ha: f64, stats: &VegetationStats, threshold: f64) -> StressEstimate;
}

/// Spread proxy: a normal distribution spans roughly ±2σ between min and max
pub fn std_estimate(min: f64, max: f64) -> f64 {
    (max - min) / 4.0
}

/// Default z-score approximation over mean/min/max
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryStatsEstimator;

impl SummaryStatsEstimator {
    /// Percentage below `threshold`, or `None` when even the minimum is
    /// above it
    pub fn stressed_percentage(mean: f64, min: f64, max: f64, threshold: f64) -> Option<f64> {
        if min >= threshold {
            return None;
        }

        let std_est = std_estimate(min, max);
        let pct = if std_est > 0.0 {
            let z = (threshold - mean) / std_est;
            (50.0 + 30.0 * z).clamp(0.0, 100.0)
        } else if mean > threshold {
            FLAT_ABOVE_THRESHOLD_PCT
        } else {
            FLAT_AT_OR_BELOW_THRESHOLD_PCT
        };
        Some(pct)
    }
}

impl StressAreaEstimator for SummaryStatsEstimator {
    fn estimate(&self, boundary_area_ha: f64, stats: &VegetationStats, threshold: f64) -> StressEstimate {
        let Some(summary) = stats.summary() else {
            return StressEstimate::default();
        };

        let percentage = Self::stressed_percentage(summary.mean, summary.min, summary.max, threshold);
        StressEstimate {
            percentage,
            area_ha: percentage.map(|pct| boundary_area_ha * pct / 100.0),
        }
    }
}
