//! Scanner Integration Tests
//!
//! Runs the bundled Riau/Jambi fixture end to end and checks the expected
//! alerts, failure isolation and sequential/parallel parity.

use parcel_monitor_rust::scanner::estimate_scan_units;
use parcel_monitor_rust::{
    AlertType, BoundaryScanner, HealthStatus, JsonFormatter, ScanFixture, ScanSummary, Severity, TextFormatter,
};
use std::path::PathBuf;

fn fixture() -> ScanFixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/riau_jambi_scan.json");
    ScanFixture::load(&path).expect("fixture should load")
}

fn run(parallel: bool, customer: Option<&str>) -> ScanSummary {
    let fixture = fixture();
    let provider = fixture.provider();
    let scanner = BoundaryScanner::new(&fixture.config, fixture.analysis_date, &provider, &provider);
    if parallel {
        scanner.scan_customers_parallel(&fixture.customers, customer)
    } else {
        scanner.scan_customers(&fixture.customers, customer)
    }
}

#[test]
fn test_full_scan_totals() {
    let summary = run(false, None);

    assert_eq!(summary.customers_scanned, 2);
    assert_eq!(summary.boundaries_analysed, 4);
    assert_eq!(summary.boundaries_failed, 0);
    assert_eq!(summary.alerts_triggered, 4);
    assert_eq!(summary.estimated_processing_units, 32);
}

#[test]
fn test_expected_alerts_per_boundary() {
    let summary = run(false, None);
    let kinds: Vec<(&str, AlertType, Severity)> = summary
        .alerts
        .iter()
        .map(|a| (a.boundary_id.as_str(), a.alert_type, a.severity))
        .collect();

    assert_eq!(
        kinds,
        vec![
            ("BND002", AlertType::Deforestation, Severity::Critical),
            ("BND002", AlertType::Fire, Severity::Critical),
            ("BND003", AlertType::Fire, Severity::High),
            ("BND003", AlertType::CropHealth, Severity::High),
        ]
    );
}

#[test]
fn test_cloudy_boundary_without_fire_record_is_still_reported() {
    let summary = run(false, Some("CUST002"));
    let report = summary.customers[0].outcomes[1].report().expect("BND004 analysed");

    assert_eq!(report.boundary_id, "BND004");
    assert_eq!(report.health.health_status, HealthStatus::Unknown);
    assert!(report.ndvi_reading.is_none());
    assert!(report.fire.is_none());
    assert!(report.fire_error.is_some());
    assert!(report.alerts.is_empty());
}

#[test]
fn test_parallel_scan_matches_sequential() {
    assert_eq!(run(false, None), run(true, None));
    assert_eq!(run(false, Some("CUST001")), run(true, Some("CUST001")));
}

#[test]
fn test_unit_estimate_matches_scan() {
    let fixture = fixture();
    assert_eq!(estimate_scan_units(&fixture.customers, None), 32);
    assert_eq!(estimate_scan_units(&fixture.customers, Some("CUST001")), 28);
}

#[test]
fn test_summary_serializes_and_alerts_format() {
    let summary = run(false, Some("CUST001"));

    let json = JsonFormatter::format(&summary).unwrap();
    assert!(json.contains("\"status\": \"analysed\""));
    assert!(json.contains("\"alert_type\": \"deforestation\""));

    let detected_at = summary.analysis_date.and_hms_opt(7, 0, 0).unwrap();
    let message = TextFormatter::format(&summary.alerts[0], detected_at);
    assert!(message.contains("Block B - Riau East"));
    assert!(message.contains("📐 *Affected:* 396.7 ha"));
}
