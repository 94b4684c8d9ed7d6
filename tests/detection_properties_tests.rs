//! Detection Property Tests
//!
//! Behavioural guarantees of the classifiers and detectors, checked through
//! the public API only.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use parcel_monitor_rust::{
    aggregate_fire_hotspots, classify_health, classify_severity, detect_deforestation, plan_change_periods,
    raw_health_score, std_estimate, trailing_window, ChangeOutcome, EngineConfig, EngineError, HealthInput, HealthStatus,
    Period, PlantHealthAnalyzer, Severity, StressAreaEstimator, SummaryStatsEstimator, VegetationStats,
};

fn analysis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
}

#[test]
fn test_severity_is_monotonic_over_area() {
    let mut previous = classify_severity(0.0);
    for step in 0..=2000 {
        let area = step as f64 * 0.01;
        let current = classify_severity(area);
        assert!(current >= previous, "severity dropped at {} ha", area);
        previous = current;
    }
}

#[test]
fn test_severity_thresholds_are_inclusive() {
    let cases = [
        (0.999, Severity::Low),
        (1.0, Severity::Medium),
        (4.999, Severity::Medium),
        (5.0, Severity::High),
        (9.999, Severity::High),
        (10.0, Severity::Critical),
    ];
    for (area, expected) in cases {
        assert_eq!(classify_severity(area), expected, "area {}", area);
    }
}

#[test]
fn test_health_score_is_continuous_at_band_edges() {
    for edge in [0.7, 0.5, 0.4, 0.3, 0.2] {
        let (_, below) = raw_health_score(edge - 1e-9);
        let (_, at) = raw_health_score(edge);
        assert_relative_eq!(below, at, epsilon = 0.0001);
    }
    assert_eq!(classify_health(Some(0.7)).score, Some(70));
}

#[test]
fn test_unknown_mean_gives_unknown_health() {
    let classification = classify_health(None);
    assert_eq!(classification.status, HealthStatus::Unknown);
    assert_eq!(classification.score, None);
}

#[test]
fn test_large_drop_over_vegetation_is_critical() {
    let periods = plan_change_periods(analysis_date(), 30).unwrap();
    let finding = detect_deforestation(
        &periods,
        &VegetationStats::observed(0.75, 0.5, 0.9),
        &VegetationStats::observed(0.40, 0.1, 0.7),
        1000.0,
        &EngineConfig::default(),
    )
    .unwrap();

    assert_relative_eq!(finding.deforestation_percentage.unwrap(), 46.6667, epsilon = 0.001);
    assert_relative_eq!(finding.deforestation_area_ha.unwrap(), 466.667, epsilon = 0.01);
    assert!(finding.alert_triggered);
    assert_eq!(finding.severity, Some(Severity::Critical));
}

#[test]
fn test_drop_over_sparse_cover_never_alerts() {
    let periods = plan_change_periods(analysis_date(), 30).unwrap();
    let finding = detect_deforestation(
        &periods,
        &VegetationStats::observed(0.38, 0.2, 0.5),
        &VegetationStats::observed(0.06, -0.1, 0.2),
        5000.0,
        &EngineConfig::default(),
    )
    .unwrap();

    assert!(!finding.alert_triggered);
    assert_eq!(finding.severity, None);
    assert_eq!(finding.outcome, ChangeOutcome::NoSignificantChange);
}

#[test]
fn test_missing_stats_are_inconclusive_not_no_change() {
    let periods = plan_change_periods(analysis_date(), 30).unwrap();
    let finding = detect_deforestation(
        &periods,
        &VegetationStats::Unknown,
        &VegetationStats::observed(0.7, 0.5, 0.8),
        100.0,
        &EngineConfig::default(),
    )
    .unwrap();

    assert_eq!(finding.outcome, ChangeOutcome::Inconclusive);
    assert_eq!(finding.ndvi_change, None);
    assert!(!finding.alert_triggered);

    let json = serde_json::to_value(&finding).unwrap();
    assert!(json["mean_ndvi_previous"].is_null());
    assert_eq!(json["outcome"], "inconclusive");
}

#[test]
fn test_fire_counts_map_to_severity() {
    let week = trailing_window(analysis_date(), 7).unwrap();

    let none = aggregate_fire_hotspots(week, 0);
    assert!(!none.alert_triggered);
    assert_eq!(none.severity, None);

    assert_eq!(aggregate_fire_hotspots(week, 3).severity, Some(Severity::High));
    assert_eq!(aggregate_fire_hotspots(week, 5).severity, Some(Severity::Critical));
}

#[test]
fn test_stress_estimate_reference_case() {
    let estimate = SummaryStatsEstimator.estimate(100.0, &VegetationStats::observed(0.35, 0.1, 0.5), 0.4);

    assert_relative_eq!(std_estimate(0.1, 0.5), 0.1, epsilon = 0.0001);
    assert_relative_eq!(estimate.percentage.unwrap(), 65.0, epsilon = 0.0001);
    assert_relative_eq!(estimate.area_ha.unwrap(), 65.0, epsilon = 0.0001);
}

#[test]
fn test_invalid_input_fails_fast() {
    let periods = plan_change_periods(analysis_date(), 30).unwrap();
    let config = EngineConfig::default();
    let ok = VegetationStats::observed(0.7, 0.5, 0.8);

    let err = detect_deforestation(&periods, &ok, &ok, -1.0, &config).unwrap_err();
    assert_eq!(err, EngineError::NegativeArea(-1.0));

    let out_of_range = VegetationStats::observed(1.4, 0.5, 1.5);
    assert!(matches!(
        detect_deforestation(&periods, &ok, &out_of_range, 10.0, &config),
        Err(EngineError::IndexOutOfRange { .. })
    ));

    let mut swapped = periods;
    swapped.previous = periods.recent;
    swapped.recent = periods.previous;
    assert!(detect_deforestation(&swapped, &ok, &ok, 10.0, &config).is_err());
}

#[test]
fn test_findings_are_idempotent() {
    let config = EngineConfig::default();
    let periods = plan_change_periods(analysis_date(), 30).unwrap();
    let previous = VegetationStats::observed(0.62, 0.3, 0.8);
    let recent = VegetationStats::observed(0.28, 0.05, 0.55);

    let first = detect_deforestation(&periods, &previous, &recent, 320.0, &config).unwrap();
    let second = detect_deforestation(&periods, &previous, &recent, 320.0, &config).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let input = HealthInput {
        analysis_date: analysis_date(),
        period: Period::new(periods.recent.start, periods.recent.end).unwrap(),
        stats: recent,
        baseline_ndvi: previous.mean(),
        boundary_area_ha: 320.0,
    };
    let analyzer = PlantHealthAnalyzer::new(&config);
    let a = analyzer.analyze(&input).unwrap();
    let b = analyzer.analyze(&input).unwrap();
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}
