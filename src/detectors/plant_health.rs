//! PLANT HEALTH: status, score, stressed area and recommendations
//!
//! Steps for one boundary and one current-period sample:
//!   1. Spread estimate from min/max
//!   2. Health band classification of the mean
//!   3. Delta from baseline (when a baseline mean is supplied)
//!   4. Stressed-area estimate (pluggable estimator)
//!   5. Recommendations
//!   6. Alert on `Stressed`/`Critical`; severity is critical for critical
//!      status, high when more than 10 ha is stressed, medium otherwise

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classifiers::{
    classify_health, generate_recommendations, std_estimate, StressAreaEstimator,
    SummaryStatsEstimator,
};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::types::{validate_area, validate_index, HealthStatus, Period, Severity, VegetationStats};

/// Stressed area (ha) above which a stressed boundary is high severity
pub const STRESSED_AREA_HIGH_HA: f64 = 10.0;

/// One current-period sample to analyse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthInput {
    /// Supplied by the caller; never read from the clock
    pub analysis_date: NaiveDate,
    pub period: Period,
    pub stats: VegetationStats,
    pub baseline_ndvi: Option<f64>,
    pub boundary_area_ha: f64,
}

/// Result of plant health analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFinding {
    pub analysis_date: NaiveDate,
    pub period: Period,
    pub stats: VegetationStats,
    pub mean_ndvi: Option<f64>,
    pub min_ndvi: Option<f64>,
    pub max_ndvi: Option<f64>,
    pub std_estimate: Option<f64>,
    pub health_status: HealthStatus,
    pub health_score: Option<u8>,
    pub baseline_ndvi: Option<f64>,
    pub ndvi_delta_from_baseline: Option<f64>,
    pub stressed_area_ha: Option<f64>,
    pub stressed_percentage: Option<f64>,
    pub recommendations: Vec<String>,
    pub alert_triggered: bool,
    pub severity: Option<Severity>,
}

/// Orchestrates classification, stress estimation and recommendations
pub struct PlantHealthAnalyzer<'a> {
    config: &'a EngineConfig,
    estimator: &'a dyn StressAreaEstimator,
}

impl<'a> PlantHealthAnalyzer<'a> {
    /// Analyzer using the summary-statistics stress estimator
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            estimator: &SummaryStatsEstimator,
        }
    }

    pub fn with_estimator(config: &'a EngineConfig, estimator: &'a dyn StressAreaEstimator) -> Self {
        Self { config, estimator }
    }

    pub fn analyze(&self, input: &HealthInput) -> EngineResult<HealthFinding> {
        self.config.validate()?;
        input.period.validate()?;
        validate_area(input.boundary_area_ha)?;
        input.stats.validate()?;
        if let Some(baseline) = input.baseline_ndvi {
            validate_index("baseline_ndvi", baseline)?;
        }

        let summary = input.stats.summary();
        let mean = summary.map(|s| s.mean);

        let classification = classify_health(mean);

        let delta = match (mean, input.baseline_ndvi) {
            (Some(current), Some(baseline)) => Some(current - baseline),
            _ => None,
        };

        let stress = self.estimator.estimate(
            input.boundary_area_ha,
            &input.stats,
            self.config.stress_threshold,
        );

        let recommendations = generate_recommendations(classification.status, mean, delta);

        let alert_triggered = classification.status.is_alertable();
        let severity = if alert_triggered {
            Some(health_severity(classification.status, stress.area_ha))
        } else {
            None
        };

        Ok(HealthFinding {
            analysis_date: input.analysis_date,
            period: input.period,
            stats: input.stats,
            mean_ndvi: mean,
            min_ndvi: summary.map(|s| s.min),
            max_ndvi: summary.map(|s| s.max),
            std_estimate: summary.map(|s| std_estimate(s.min, s.max)),
            health_status: classification.status,
            health_score: classification.score,
            baseline_ndvi: input.baseline_ndvi,
            ndvi_delta_from_baseline: delta,
            stressed_area_ha: stress.area_ha,
            stressed_percentage: stress.percentage,
            recommendations,
            alert_triggered,
            severity,
        })
    }
}

fn health_severity(status: HealthStatus, stressed_area_ha: Option<f64>) -> Severity {
    if status == HealthStatus::Critical {
        Severity::Critical
    } else if stressed_area_ha.is_some_and(|a| a > STRESSED_AREA_HIGH_HA) {
        Severity::High
    } else {
        Severity::Medium
    }
}
