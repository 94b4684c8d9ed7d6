//! Shared data model
//!
//! Boundaries, observation periods, vegetation statistics and the two
//! ordered classification scales used by every finding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::utils::geometry::BoundingBox;

/// Alert urgency tier. Ordered: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Icon used in chat-style notifications
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Low => "⚠️",
            Severity::Medium => "🟠",
            Severity::High => "🔴",
            Severity::Critical => "🚨",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crop health status.
///
/// `Unknown` sorts first but is not a "worse" outcome than `Critical`:
/// it means no valid pixels were observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Unknown,
    Critical,
    Stressed,
    Moderate,
    Healthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Critical => "critical",
            HealthStatus::Stressed => "stressed",
            HealthStatus::Moderate => "moderate",
            HealthStatus::Healthy => "healthy",
        }
    }

    /// Statuses that raise a crop-health alert
    pub fn is_alertable(&self) -> bool {
        matches!(self, HealthStatus::Stressed | HealthStatus::Critical)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date range over which observations are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        let period = Self { start, end };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.start > self.end {
            return Err(EngineError::InvalidPeriod {
                start: self.start,
                end: self.end,
                reason: "start is after end",
            });
        }
        Ok(())
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// "YYYY-MM-DD to YYYY-MM-DD"
    pub fn label(&self) -> String {
        format!("{} to {}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// Aggregated index values over the valid (cloud-free) pixels of a period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Number of cloud-free acquisitions that contributed
    #[serde(default)]
    pub observations: u32,
}

impl IndexSummary {
    pub fn new(mean: f64, min: f64, max: f64) -> Self {
        Self { mean, min, max, observations: 0 }
    }

    pub fn with_observations(mut self, observations: u32) -> Self {
        self.observations = observations;
        self
    }
}

/// Vegetation-index statistics for one boundary and one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VegetationStats {
    /// No valid pixels in the period
    Unknown,
    Observed(IndexSummary),
}

impl VegetationStats {
    pub fn observed(mean: f64, min: f64, max: f64) -> Self {
        VegetationStats::Observed(IndexSummary::new(mean, min, max))
    }

    pub fn summary(&self) -> Option<&IndexSummary> {
        match self {
            VegetationStats::Observed(summary) => Some(summary),
            VegetationStats::Unknown => None,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        self.summary().map(|s| s.mean)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, VegetationStats::Unknown)
    }

    /// Reject non-finite or out-of-range index values
    pub fn validate(&self) -> EngineResult<()> {
        let Some(summary) = self.summary() else {
            return Ok(());
        };
        validate_index("mean", summary.mean)?;
        validate_index("min", summary.min)?;
        validate_index("max", summary.max)?;
        if summary.min > summary.max {
            return Err(EngineError::InvertedIndexRange {
                min: summary.min,
                max: summary.max,
            });
        }
        Ok(())
    }
}

/// Check a single vegetation index value lies in [-1, 1]
pub fn validate_index(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::NonFiniteValue { field });
    }
    if !(-1.0..=1.0).contains(&value) {
        return Err(EngineError::IndexOutOfRange { field, value });
    }
    Ok(())
}

/// Check a boundary area is finite and non-negative
pub fn validate_area(area_ha: f64) -> EngineResult<()> {
    if !area_ha.is_finite() {
        return Err(EngineError::NonFiniteValue { field: "area_ha" });
    }
    if area_ha < 0.0 {
        return Err(EngineError::NegativeArea(area_ha));
    }
    Ok(())
}

/// GeoJSON-style polygon; the first ring is the outer boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "type", default = "polygon_type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

fn polygon_type() -> String {
    "Polygon".to_string()
}

impl Polygon {
    pub fn from_ring(ring: Vec<[f64; 2]>) -> Self {
        Self {
            kind: polygon_type(),
            coordinates: vec![ring],
        }
    }

    pub fn outer_ring(&self) -> &[[f64; 2]] {
        self.coordinates.first().map(|r| r.as_slice()).unwrap_or(&[])
    }
}

/// A monitored land parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub id: String,
    pub name: String,
    pub customer_id: String,
    pub geometry: Polygon,
    /// Nominal area; derived from the geometry bounds when absent
    #[serde(default, rename = "hectares")]
    pub area_ha: Option<f64>,
}

impl Boundary {
    /// Supplied area, or the bounding-box approximation of the geometry
    pub fn resolved_area_ha(&self) -> EngineResult<f64> {
        match self.area_ha {
            Some(area) => {
                validate_area(area)?;
                Ok(area)
            }
            None => Ok(BoundingBox::from_polygon(&self.geometry)?.approximate_area_ha()),
        }
    }
}

/// Customer owning a set of boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub boundaries: Vec<Boundary>,
}
