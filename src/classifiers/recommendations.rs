//! Field recommendations per health status
//!
//! Order matters: notifications show the first three.

use crate::types::HealthStatus;

/// Baseline decline (NDVI units) that points at pests or disease
const RAPID_DECLINE_DELTA: f64 = -0.1;
/// Moderate canopy below this mean is typical of young palms
const YOUNG_PALM_MEAN: f64 = 0.45;
/// Healthy canopy above this mean is exceptionally dense
const EXCELLENT_DENSITY_MEAN: f64 = 0.8;

/// Generate ordered recommendations for a health status
pub fn generate_recommendations(
    status: HealthStatus,
    mean_ndvi: Option<f64>,
    delta_from_baseline: Option<f64>,
) -> Vec<String> {
    let mut recs: Vec<&str> = Vec::new();

    match status {
        HealthStatus::Critical => {
            recs.push("Urgent: schedule a field inspection of the affected blocks immediately");
            recs.push("Check for disease symptoms such as Ganoderma basal stem rot");
            recs.push("Inspect irrigation and drainage for waterlogging or drought damage");
            recs.push("Collect soil samples for nutrient analysis");
        }
        HealthStatus::Stressed => {
            recs.push("Schedule a field inspection within the next week");
            recs.push("Check soil moisture levels across the stressed area");
            recs.push("Review the fertilization schedule and recent applications");
            if delta_from_baseline.is_some_and(|d| d < RAPID_DECLINE_DELTA) {
                recs.push("Investigate pest or disease activity: vegetation declined rapidly from baseline");
            }
        }
        HealthStatus::Moderate => {
            recs.push("Monitor closely over the next 2 weeks");
            recs.push("Consider targeted fertilizer application on weaker blocks");
            if mean_ndvi.is_some_and(|m| m < YOUNG_PALM_MEAN) {
                recs.push("Young palms show lower NDVI; confirm nutrient supply matches planting age");
            }
        }
        HealthStatus::Healthy => {
            recs.push("Continue current management practices");
            if mean_ndvi.is_some_and(|m| m > EXCELLENT_DENSITY_MEAN) {
                recs.push("Excellent canopy density detected");
            }
        }
        HealthStatus::Unknown => {}
    }

    recs.into_iter().map(String::from).collect()
}

/// First `n` recommendations, for space-limited channels
pub fn top_recommendations(recommendations: &[String], n: usize) -> &[String] {
    &recommendations[..recommendations.len().min(n)]
}
