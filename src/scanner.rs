//! Boundary Scanner - coordinates detectors across customers and boundaries
//!
//! For each boundary the scanner plans the comparison periods, pulls
//! statistics from the configured providers, runs the deforestation, plant
//! health and fire detectors, and turns triggered findings into alert
//! records. A failing boundary is reported and skipped; it never aborts the
//! rest of the scan.
//!
//! Includes both sequential and parallel (Rayon) implementations. Both
//! return customers and boundaries in input order.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::alerts::AlertRecord;
use crate::classifiers::{StressAreaEstimator, SummaryStatsEstimator};
use crate::config::EngineConfig;
use crate::detectors::{
    aggregate_fire_hotspots, detect_deforestation, DeforestationFinding, FireFinding, HealthFinding,
    HealthInput, PlantHealthAnalyzer,
};
use crate::providers::{FireHotspotProvider, VegetationStatsProvider};
use crate::types::{Boundary, Customer, HealthStatus, Period, VegetationStats};
use crate::utils::periods::{plan_change_periods, plan_trend_windows, trailing_window};

/// Hectares covered by one processing-unit block
const HECTARES_PER_BLOCK: f64 = 100.0;
/// Processing units consumed per 100 ha for a single request
const UNITS_PER_BLOCK: f64 = 0.8;
/// Requests per scan (previous and recent period)
const REQUESTS_PER_SCAN: u32 = 2;

/// Estimated processing units for scanning a boundary of `area_ha`
pub fn estimate_processing_units(area_ha: f64) -> u32 {
    let per_request = (area_ha / HECTARES_PER_BLOCK * UNITS_PER_BLOCK).floor();
    let per_request = if per_request.is_finite() && per_request >= 1.0 {
        per_request as u32
    } else {
        1
    };
    per_request * REQUESTS_PER_SCAN
}

/// Processing-unit estimate over every selected boundary, without querying providers
///
/// Boundaries whose area cannot be resolved are skipped with a warning.
pub fn estimate_scan_units(customers: &[Customer], customer_filter: Option<&str>) -> u32 {
    selected(customers, customer_filter)
        .flat_map(|customer| customer.boundaries.iter())
        .filter_map(|boundary| match boundary.resolved_area_ha() {
            Ok(area) => Some(estimate_processing_units(area)),
            Err(e) => {
                warn!(boundary = %boundary.id, "Cannot estimate processing units: {}", e);
                None
            }
        })
        .sum()
}

fn selected<'c>(
    customers: &'c [Customer],
    customer_filter: Option<&'c str>,
) -> impl Iterator<Item = &'c Customer> + 'c {
    customers
        .iter()
        .filter(move |c| customer_filter.map_or(true, |id| c.id == id))
}

/// Persistable NDVI time-series point for one boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviReading {
    pub boundary_id: String,
    pub reading_date: NaiveDate,
    pub ndvi_mean: f64,
    pub ndvi_min: f64,
    pub ndvi_max: f64,
    pub health_score: Option<u8>,
    pub health_status: HealthStatus,
}

/// One month of the NDVI trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// "YYYY-MM" of the window start
    pub month: String,
    pub period: Period,
    pub stats: VegetationStats,
}

/// Everything computed for one boundary in one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryReport {
    pub customer_id: String,
    pub boundary_id: String,
    pub boundary_name: String,
    pub boundary_area_ha: f64,
    pub deforestation: DeforestationFinding,
    pub health: HealthFinding,
    /// Absent when the fire query failed
    pub fire: Option<FireFinding>,
    pub fire_error: Option<String>,
    pub alerts: Vec<AlertRecord>,
    pub ndvi_reading: Option<NdviReading>,
    pub processing_units: u32,
}

/// Result of scanning one boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BoundaryOutcome {
    Analysed(Box<BoundaryReport>),
    Failed {
        customer_id: String,
        boundary_id: String,
        boundary_name: String,
        error: String,
    },
}

impl BoundaryOutcome {
    pub fn report(&self) -> Option<&BoundaryReport> {
        match self {
            BoundaryOutcome::Analysed(report) => Some(report),
            BoundaryOutcome::Failed { .. } => None,
        }
    }

    pub fn boundary_id(&self) -> &str {
        match self {
            BoundaryOutcome::Analysed(report) => &report.boundary_id,
            BoundaryOutcome::Failed { boundary_id, .. } => boundary_id,
        }
    }
}

/// All boundary outcomes for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerScan {
    pub customer_id: String,
    pub customer_name: String,
    pub outcomes: Vec<BoundaryOutcome>,
}

/// Totals over a full scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub analysis_date: NaiveDate,
    pub customers_scanned: usize,
    pub boundaries_analysed: usize,
    pub boundaries_failed: usize,
    pub alerts_triggered: usize,
    pub estimated_processing_units: u32,
    pub alerts: Vec<AlertRecord>,
    pub customers: Vec<CustomerScan>,
}

impl ScanSummary {
    pub fn from_scans(analysis_date: NaiveDate, customers: Vec<CustomerScan>) -> Self {
        let outcomes = || customers.iter().flat_map(|c| c.outcomes.iter());

        let alerts: Vec<AlertRecord> = outcomes()
            .filter_map(BoundaryOutcome::report)
            .flat_map(|r| r.alerts.iter().cloned())
            .collect();
        let boundaries_analysed = outcomes().filter(|o| o.report().is_some()).count();
        let boundaries_failed = outcomes().count() - boundaries_analysed;
        let estimated_processing_units = outcomes()
            .filter_map(BoundaryOutcome::report)
            .map(|r| r.processing_units)
            .sum();

        Self {
            analysis_date,
            customers_scanned: customers.len(),
            boundaries_analysed,
            boundaries_failed,
            alerts_triggered: alerts.len(),
            estimated_processing_units,
            alerts,
            customers,
        }
    }
}

/// Runs every detector for a set of boundaries on one analysis date
pub struct BoundaryScanner<'a> {
    config: &'a EngineConfig,
    analysis_date: NaiveDate,
    vegetation: &'a dyn VegetationStatsProvider,
    fire: &'a dyn FireHotspotProvider,
    estimator: &'a dyn StressAreaEstimator,
}

impl<'a> BoundaryScanner<'a> {
    pub fn new(
        config: &'a EngineConfig,
        analysis_date: NaiveDate,
        vegetation: &'a dyn VegetationStatsProvider,
        fire: &'a dyn FireHotspotProvider,
    ) -> Self {
        Self {
            config,
            analysis_date,
            vegetation,
            fire,
            estimator: &SummaryStatsEstimator,
        }
    }

    /// Replace the default summary-statistics stress estimator
    pub fn with_stress_estimator(mut self, estimator: &'a dyn StressAreaEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    pub fn analysis_date(&self) -> NaiveDate {
        self.analysis_date
    }

    /// Run all detectors for a single boundary
    pub fn scan_boundary(&self, customer: &Customer, boundary: &Boundary) -> Result<BoundaryReport> {
        let area = boundary
            .resolved_area_ha()
            .with_context(|| format!("Boundary {} has no usable area", boundary.id))?;
        let periods = plan_change_periods(self.analysis_date, self.config.days_back)?;

        let stats_previous = self.query_stats(boundary, &periods.previous)?;
        let stats_recent = self.query_stats(boundary, &periods.recent)?;

        let deforestation =
            detect_deforestation(&periods, &stats_previous, &stats_recent, area, self.config)
                .with_context(|| format!("Deforestation analysis failed for {}", boundary.id))?;

        let health = PlantHealthAnalyzer::with_estimator(self.config, self.estimator)
            .analyze(&HealthInput {
                analysis_date: self.analysis_date,
                period: periods.recent,
                stats: stats_recent,
                baseline_ndvi: stats_previous.mean(),
                boundary_area_ha: area,
            })
            .with_context(|| format!("Health analysis failed for {}", boundary.id))?;

        let fire_period = trailing_window(self.analysis_date, self.config.fire_days_back)?;
        let (fire, fire_error) = match self.fire.hotspot_count(boundary, &fire_period) {
            Ok(count) => (Some(aggregate_fire_hotspots(fire_period, count)), None),
            Err(e) => {
                warn!(
                    boundary = %boundary.id,
                    provider = self.fire.name(),
                    "Fire query failed: {:#}", e
                );
                (None, Some(format!("{:#}", e)))
            }
        };

        debug!(
            boundary = %boundary.id,
            area_ha = area,
            ndvi_previous = ?deforestation.mean_ndvi_previous,
            ndvi_recent = ?deforestation.mean_ndvi_recent,
            ndvi_change = ?deforestation.ndvi_change,
            health_score = ?health.health_score,
            hotspots = ?fire.as_ref().map(|f| f.hotspot_count),
            "Boundary analysed"
        );

        let alerts: Vec<AlertRecord> = [
            AlertRecord::from_deforestation(boundary, &deforestation),
            fire.as_ref().and_then(|f| AlertRecord::from_fire(boundary, f)),
            AlertRecord::from_health(boundary, &health),
        ]
        .into_iter()
        .flatten()
        .collect();

        for alert in &alerts {
            info!(
                customer = %customer.id,
                boundary = %alert.boundary_id,
                alert_type = alert.alert_type.as_str(),
                severity = %alert.severity,
                "{}", alert.title
            );
        }

        let ndvi_reading = stats_recent.summary().map(|s| NdviReading {
            boundary_id: boundary.id.clone(),
            reading_date: self.analysis_date,
            ndvi_mean: s.mean,
            ndvi_min: s.min,
            ndvi_max: s.max,
            health_score: health.health_score,
            health_status: health.health_status,
        });

        Ok(BoundaryReport {
            customer_id: customer.id.clone(),
            boundary_id: boundary.id.clone(),
            boundary_name: boundary.name.clone(),
            boundary_area_ha: area,
            deforestation,
            health,
            fire,
            fire_error,
            alerts,
            ndvi_reading,
            processing_units: estimate_processing_units(area),
        })
    }

    fn query_stats(&self, boundary: &Boundary, period: &Period) -> Result<VegetationStats> {
        let stats = self
            .vegetation
            .vegetation_stats(boundary, period)
            .with_context(|| {
                format!(
                    "{} query failed for {} over {}",
                    self.vegetation.name(),
                    boundary.id,
                    period.label()
                )
            })?;

        if stats.is_unknown() {
            warn!(
                boundary = %boundary.id,
                period = %period.label(),
                "No valid pixels (cloud cover or no acquisitions)"
            );
        }
        Ok(stats)
    }

    fn scan_outcome(&self, customer: &Customer, boundary: &Boundary) -> BoundaryOutcome {
        match self.scan_boundary(customer, boundary) {
            Ok(report) => BoundaryOutcome::Analysed(Box::new(report)),
            Err(e) => {
                warn!(
                    customer = %customer.id,
                    boundary = %boundary.id,
                    "Boundary scan failed: {:#}", e
                );
                BoundaryOutcome::Failed {
                    customer_id: customer.id.clone(),
                    boundary_id: boundary.id.clone(),
                    boundary_name: boundary.name.clone(),
                    error: format!("{:#}", e),
                }
            }
        }
    }

    /// Scan every boundary of one customer, in order
    pub fn scan_customer(&self, customer: &Customer) -> CustomerScan {
        info!(customer = %customer.id, boundaries = customer.boundaries.len(), "Scanning customer");
        CustomerScan {
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            outcomes: customer
                .boundaries
                .iter()
                .map(|b| self.scan_outcome(customer, b))
                .collect(),
        }
    }

    /// Scan all customers sequentially, optionally restricted to one id
    pub fn scan_customers(&self, customers: &[Customer], customer_filter: Option<&str>) -> ScanSummary {
        let scans = selected(customers, customer_filter)
            .map(|c| self.scan_customer(c))
            .collect();
        ScanSummary::from_scans(self.analysis_date, scans)
    }

    /// Scan all customers IN PARALLEL
    ///
    /// Boundaries are independent, so both customers and their boundaries are
    /// fanned out across the Rayon pool. Output order matches the sequential
    /// scan.
    pub fn scan_customers_parallel(
        &self,
        customers: &[Customer],
        customer_filter: Option<&str>,
    ) -> ScanSummary {
        let chosen: Vec<&Customer> = selected(customers, customer_filter).collect();

        let scans = chosen
            .into_par_iter()
            .map(|customer| CustomerScan {
                customer_id: customer.id.clone(),
                customer_name: customer.name.clone(),
                outcomes: customer
                    .boundaries
                    .par_iter()
                    .map(|b| self.scan_outcome(customer, b))
                    .collect(),
            })
            .collect();
        ScanSummary::from_scans(self.analysis_date, scans)
    }

    /// Monthly NDVI trend ending on the analysis date, newest month first
    pub fn ndvi_trend(&self, boundary: &Boundary, months: u32) -> Result<Vec<TrendPoint>> {
        plan_trend_windows(self.analysis_date, months)?
            .into_iter()
            .map(|window| {
                let stats = self.query_stats(boundary, &window.period)?;
                Ok(TrendPoint {
                    month: window.month,
                    period: window.period,
                    stats,
                })
            })
            .collect()
    }
}
