//! Alert records
//!
//! Triggered findings become flat `AlertRecord`s, the shape persisted and
//! handed to notification channels. Findings without `alert_triggered` never
//! produce a record.

pub mod formatters;

use serde::{Deserialize, Serialize};

use crate::classifiers::top_recommendations;
use crate::detectors::{AffectedLocation, DeforestationFinding, FireFinding, HealthFinding};
use crate::types::{Boundary, Severity};

pub use formatters::{JsonFormatter, TextFormatter};

/// Recommendations quoted in a crop-health alert
const ALERT_RECOMMENDATIONS: usize = 3;

/// Kind of detected change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Deforestation,
    Fire,
    CropHealth,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Deforestation => "deforestation",
            AlertType::Fire => "fire",
            AlertType::CropHealth => "crop_health",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AlertType::Deforestation => "Deforestation",
            AlertType::Fire => "Fire",
            AlertType::CropHealth => "Crop Health",
        }
    }
}

/// A triggered alert ready for persistence or notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub customer_id: String,
    pub boundary_id: String,
    pub boundary_name: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub affected_hectares: Option<f64>,
    pub location: Option<AffectedLocation>,
}

impl AlertRecord {
    fn new(boundary: &Boundary, alert_type: AlertType, severity: Severity) -> Self {
        Self {
            customer_id: boundary.customer_id.clone(),
            boundary_id: boundary.id.clone(),
            boundary_name: boundary.name.clone(),
            alert_type,
            severity,
            title: String::new(),
            description: String::new(),
            affected_hectares: None,
            location: None,
        }
    }

    /// Alert for a triggered deforestation finding
    pub fn from_deforestation(boundary: &Boundary, finding: &DeforestationFinding) -> Option<Self> {
        if !finding.alert_triggered {
            return None;
        }
        let severity = finding.severity?;
        let area = finding.deforestation_area_ha?;
        let previous = finding.mean_ndvi_previous?;
        let recent = finding.mean_ndvi_recent?;

        let mut alert = Self::new(boundary, AlertType::Deforestation, severity);
        alert.title = format!("Deforestation detected in {}", boundary.name);
        alert.description = format!(
            "Approximately {:.1} hectares of vegetation loss detected. NDVI dropped from {:.2} to {:.2}.",
            area, previous, recent
        );
        alert.affected_hectares = Some(area);
        alert.location = finding.location;
        Some(alert)
    }

    /// Alert for a triggered fire finding
    pub fn from_fire(boundary: &Boundary, finding: &FireFinding) -> Option<Self> {
        if !finding.alert_triggered {
            return None;
        }
        let severity = finding.severity?;

        let mut alert = Self::new(boundary, AlertType::Fire, severity);
        alert.title = format!("Fire hotspots detected in {}", boundary.name);
        alert.description = format!(
            "{} active fire hotspot(s) detected in the last {} days.",
            finding.hotspot_count,
            finding.period.days()
        );
        Some(alert)
    }

    /// Alert for a triggered crop-health finding
    pub fn from_health(boundary: &Boundary, finding: &HealthFinding) -> Option<Self> {
        if !finding.alert_triggered {
            return None;
        }
        let severity = finding.severity?;
        let score = finding.health_score?;
        let mean = finding.mean_ndvi?;

        let mut description = format!(
            "Health score {}/100 (mean NDVI {:.2}, status {}).",
            score, mean, finding.health_status
        );
        if let Some(area) = finding.stressed_area_ha {
            description.push_str(&format!(" Approximately {:.1} hectares under stress.", area));
        }
        let recs = top_recommendations(&finding.recommendations, ALERT_RECOMMENDATIONS);
        if !recs.is_empty() {
            description.push_str(&format!(" Recommended: {}.", recs.join("; ")));
        }

        let mut alert = Self::new(boundary, AlertType::CropHealth, severity);
        alert.title = format!("Crop health {} in {}", finding.health_status, boundary.name);
        alert.description = description;
        alert.affected_hectares = finding.stressed_area_ha;
        Some(alert)
    }
}
