//! DEFORESTATION: vegetation loss between two consecutive periods
//!
//! Compares mean NDVI of the previous and recent windows. A drop larger than
//! `ndvi_threshold` over land that was vegetated before is converted to an
//! affected share of the boundary, assuming the loss is spread uniformly:
//!
//! ```text
//! pct  = min(100, delta / previous_mean × 100)
//! area = boundary_area × pct / 100
//! ```
//!
//! Estimated areas below `min_area_ha` are treated as noise. Without
//! pixel-level data there is no way to locate the loss, so `location` is
//! always `None` here.

use serde::{Deserialize, Serialize};

use crate::classifiers::classify_severity;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::types::{validate_area, Period, Severity, VegetationStats};
use crate::utils::periods::{validate_change_periods, ChangePeriods};

/// Point location of detected change (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffectedLocation {
    pub lon: f64,
    pub lat: f64,
}

/// How the comparison ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOutcome {
    /// At least one period had no valid pixels
    Inconclusive,
    NoSignificantChange,
    /// Loss detected but the estimated area is under `min_area_ha`
    BelowMinimumArea,
    VegetationLoss,
}

/// Result of deforestation analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeforestationFinding {
    pub period_previous: Period,
    pub period_recent: Period,
    pub boundary_area_ha: f64,
    pub stats_previous: VegetationStats,
    pub stats_recent: VegetationStats,
    pub mean_ndvi_previous: Option<f64>,
    pub mean_ndvi_recent: Option<f64>,
    /// previous − recent; positive means vegetation loss
    pub ndvi_change: Option<f64>,
    pub deforestation_area_ha: Option<f64>,
    pub deforestation_percentage: Option<f64>,
    pub outcome: ChangeOutcome,
    pub alert_triggered: bool,
    pub severity: Option<Severity>,
    pub location: Option<AffectedLocation>,
}

/// Detect vegetation loss between `periods.previous` and `periods.recent`
pub fn detect_deforestation(
    periods: &ChangePeriods,
    stats_previous: &VegetationStats,
    stats_recent: &VegetationStats,
    boundary_area_ha: f64,
    config: &EngineConfig,
) -> EngineResult<DeforestationFinding> {
    config.validate()?;
    validate_change_periods(&periods.previous, &periods.recent)?;
    validate_area(boundary_area_ha)?;
    stats_previous.validate()?;
    stats_recent.validate()?;

    let mut finding = DeforestationFinding {
        period_previous: periods.previous,
        period_recent: periods.recent,
        boundary_area_ha,
        stats_previous: *stats_previous,
        stats_recent: *stats_recent,
        mean_ndvi_previous: stats_previous.mean(),
        mean_ndvi_recent: stats_recent.mean(),
        ndvi_change: None,
        deforestation_area_ha: None,
        deforestation_percentage: None,
        outcome: ChangeOutcome::Inconclusive,
        alert_triggered: false,
        severity: None,
        location: None,
    };

    let (Some(previous), Some(recent)) = (finding.mean_ndvi_previous, finding.mean_ndvi_recent) else {
        return Ok(finding);
    };

    let delta = previous - recent;
    finding.ndvi_change = Some(delta);
    finding.outcome = ChangeOutcome::NoSignificantChange;

    // Only a large drop over previously vegetated land counts
    if delta > config.ndvi_threshold && previous > config.vegetated_floor {
        let pct = ((delta / previous) * 100.0).min(100.0);
        let area = boundary_area_ha * (pct / 100.0);
        finding.deforestation_percentage = Some(pct);
        finding.deforestation_area_ha = Some(area);

        if area >= config.min_area_ha {
            finding.outcome = ChangeOutcome::VegetationLoss;
            finding.alert_triggered = true;
            finding.severity = Some(classify_severity(area));
        } else {
            finding.outcome = ChangeOutcome::BelowMinimumArea;
        }
    }

    Ok(finding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::types::Period;
    use crate::utils::periods::plan_change_periods;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn periods() -> ChangePeriods {
        plan_change_periods(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(), 30).unwrap()
    }

    fn stats(mean: f64) -> VegetationStats {
        VegetationStats::observed(mean, (mean - 0.2).max(-1.0), (mean + 0.1).min(1.0))
    }

    #[test]
    fn test_large_loss_triggers_critical() {
        let finding =
            detect_deforestation(&periods(), &stats(0.75), &stats(0.40), 1000.0, &EngineConfig::default()).unwrap();

        assert_relative_eq!(finding.ndvi_change.unwrap(), 0.35, epsilon = 1e-9);
        assert_relative_eq!(finding.deforestation_percentage.unwrap(), 46.6667, epsilon = 1e-3);
        assert_relative_eq!(finding.deforestation_area_ha.unwrap(), 466.667, epsilon = 1e-2);
        assert_eq!(finding.outcome, ChangeOutcome::VegetationLoss);
        assert!(finding.alert_triggered);
        assert_eq!(finding.severity, Some(Severity::Critical));
        assert_eq!(finding.location, None);
    }

    #[test]
    fn test_not_previously_vegetated() {
        // delta 0.32 exceeds threshold, but 0.38 is below the vegetated floor
        let finding =
            detect_deforestation(&periods(), &stats(0.38), &stats(0.06), 1000.0, &EngineConfig::default()).unwrap();

        assert_relative_eq!(finding.ndvi_change.unwrap(), 0.32, epsilon = 1e-9);
        assert_eq!(finding.outcome, ChangeOutcome::NoSignificantChange);
        assert!(!finding.alert_triggered);
        assert_eq!(finding.severity, None);
        assert_eq!(finding.deforestation_area_ha, None);
    }

    #[test]
    fn test_small_change_is_not_loss() {
        let finding =
            detect_deforestation(&periods(), &stats(0.72), &stats(0.68), 1100.0, &EngineConfig::default()).unwrap();
        assert_eq!(finding.outcome, ChangeOutcome::NoSignificantChange);
        assert!(!finding.alert_triggered);
        assert_eq!(finding.deforestation_percentage, None);
    }

    #[test]
    fn test_below_minimum_area() {
        // 1 ha boundary: 46.7% of it is 0.47 ha < 0.5 ha
        let finding =
            detect_deforestation(&periods(), &stats(0.75), &stats(0.40), 1.0, &EngineConfig::default()).unwrap();
        assert_eq!(finding.outcome, ChangeOutcome::BelowMinimumArea);
        assert!(!finding.alert_triggered);
        assert_eq!(finding.severity, None);
        assert!(finding.deforestation_area_ha.unwrap() < 0.5);
    }

    #[test]
    fn test_percentage_capped() {
        // Recent mean negative (water/bare soil) makes delta exceed previous
        let finding =
            detect_deforestation(&periods(), &stats(0.5), &stats(-0.2), 10.0, &EngineConfig::default()).unwrap();
        assert_relative_eq!(finding.deforestation_percentage.unwrap(), 100.0);
        assert_relative_eq!(finding.deforestation_area_ha.unwrap(), 10.0);
        assert_eq!(finding.severity, Some(Severity::Critical));
    }

    #[test]
    fn test_unknown_stats_are_inconclusive() {
        for (previous, recent) in [
            (VegetationStats::Unknown, stats(0.4)),
            (stats(0.75), VegetationStats::Unknown),
            (VegetationStats::Unknown, VegetationStats::Unknown),
        ] {
            let finding =
                detect_deforestation(&periods(), &previous, &recent, 1000.0, &EngineConfig::default()).unwrap();
            assert_eq!(finding.outcome, ChangeOutcome::Inconclusive);
            assert_eq!(finding.ndvi_change, None);
            assert_eq!(finding.deforestation_area_ha, None);
            assert!(!finding.alert_triggered);
        }
    }

    #[test]
    fn test_invalid_input_rejected() {
        let config = EngineConfig::default();
        assert_eq!(
            detect_deforestation(&periods(), &stats(0.75), &stats(0.4), -5.0, &config),
            Err(EngineError::NegativeArea(-5.0))
        );

        let out_of_range = VegetationStats::observed(1.5, 0.2, 0.9);
        assert!(matches!(
            detect_deforestation(&periods(), &out_of_range, &stats(0.4), 10.0, &config),
            Err(EngineError::IndexOutOfRange { .. })
        ));

        let p = periods();
        let swapped = ChangePeriods { previous: p.recent, recent: p.previous };
        assert!(matches!(
            detect_deforestation(&swapped, &stats(0.75), &stats(0.4), 10.0, &config),
            Err(EngineError::PeriodOrder { .. })
        ));

        let short = ChangePeriods {
            previous: Period::new(p.previous.start, p.previous.start).unwrap(),
            recent: p.recent,
        };
        assert!(detect_deforestation(&short, &stats(0.75), &stats(0.4), 10.0, &config).is_err());
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let strict = EngineConfig { ndvi_threshold: 0.4, ..Default::default() };
        let finding = detect_deforestation(&periods(), &stats(0.75), &stats(0.40), 1000.0, &strict).unwrap();
        assert!(!finding.alert_triggered);

        let large_minimum = EngineConfig { min_area_ha: 500.0, ..Default::default() };
        let finding = detect_deforestation(&periods(), &stats(0.75), &stats(0.40), 1000.0, &large_minimum).unwrap();
        assert_eq!(finding.outcome, ChangeOutcome::BelowMinimumArea);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig { ndvi_threshold: f64::NAN, ..Default::default() };
        assert!(matches!(
            detect_deforestation(&periods(), &stats(0.75), &stats(0.40), 1000.0, &config),
            Err(EngineError::InvalidConfig(_))
        ));

        let config = EngineConfig { vegetated_floor: 1.5, ..Default::default() };
        assert!(matches!(
            detect_deforestation(&periods(), &stats(0.75), &stats(0.40), 1000.0, &config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_drop_equal_to_threshold_is_not_loss() {
        // 0.75 - 0.5 = 0.25 exactly
        let config = EngineConfig { ndvi_threshold: 0.25, ..Default::default() };
        let finding = detect_deforestation(&periods(), &stats(0.75), &stats(0.5), 1000.0, &config).unwrap();

        assert_eq!(finding.ndvi_change, Some(0.25));
        assert_eq!(finding.outcome, ChangeOutcome::NoSignificantChange);
        assert!(!finding.alert_triggered);
    }

    #[test]
    fn test_previous_mean_equal_to_floor_is_not_vegetated() {
        let config = EngineConfig::default();
        let finding =
            detect_deforestation(&periods(), &stats(config.vegetated_floor), &stats(0.05), 1000.0, &config).unwrap();

        assert!(finding.ndvi_change.unwrap() > config.ndvi_threshold);
        assert_eq!(finding.outcome, ChangeOutcome::NoSignificantChange);
        assert!(!finding.alert_triggered);
        assert_eq!(finding.deforestation_area_ha, None);
    }

    #[test]
    fn test_area_equal_to_minimum_alerts_low() {
        // 0.375 / 0.75 = 50% of 1 ha = 0.5 ha, all exact
        let config = EngineConfig::default();
        let finding = detect_deforestation(&periods(), &stats(0.75), &stats(0.375), 1.0, &config).unwrap();

        assert_eq!(finding.deforestation_area_ha, Some(config.min_area_ha));
        assert_eq!(finding.outcome, ChangeOutcome::VegetationLoss);
        assert!(finding.alert_triggered);
        assert_eq!(finding.severity, Some(Severity::Low));
    }
}
