//! Statistics provider capabilities
//!
//! The engine never talks to an imagery or fire service directly. Each
//! backend (Earth Engine, Sentinel Hub, FIRMS, ...) implements one of these
//! traits; detectors only ever see the returned statistics.
//!
//! `FixtureProvider` is an in-memory implementation backed by a JSON fixture,
//! used by the demo binary, tests and benches.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::EngineConfig;
use crate::types::{Boundary, Customer, Period, VegetationStats};

/// Source of aggregated vegetation-index statistics
pub trait VegetationStatsProvider: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Statistics over the valid pixels of `boundary` during `period`.
    /// A period without valid pixels is `Ok(VegetationStats::Unknown)`;
    /// `Err` is reserved for failed queries.
    fn vegetation_stats(&self, boundary: &Boundary, period: &Period) -> Result<VegetationStats>;
}

/// Source of active-fire hotspot counts
pub trait FireHotspotProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Hotspots detected inside `boundary` during `period`
    fn hotspot_count(&self, boundary: &Boundary, period: &Period) -> Result<u32>;
}

/// Vegetation statistics for one boundary and period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationRecord {
    pub boundary_id: String,
    pub period: Period,
    pub stats: VegetationStats,
}

/// Hotspot count for one boundary and period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotRecord {
    pub boundary_id: String,
    pub period: Period,
    pub count: u32,
}

/// Everything needed to run a scan offline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFixture {
    pub analysis_date: NaiveDate,
    #[serde(default)]
    pub config: EngineConfig,
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub vegetation: Vec<VegetationRecord>,
    #[serde(default)]
    pub hotspots: Vec<HotspotRecord>,
}

impl ScanFixture {
    /// Load a scan fixture from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scan fixture: {:?}", path))?;

        let fixture: ScanFixture = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse scan fixture JSON")?;

        fixture
            .config
            .validate()
            .with_context(|| format!("Fixture {:?} has an invalid config", path))?;

        Ok(fixture)
    }

    /// Provider answering from this fixture's records
    pub fn provider(&self) -> FixtureProvider {
        FixtureProvider::from_records(&self.vegetation, &self.hotspots)
    }
}

/// In-memory provider keyed by boundary id and exact period
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    vegetation: FxHashMap<(String, Period), VegetationStats>,
    hotspots: FxHashMap<(String, Period), u32>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(vegetation: &[VegetationRecord], hotspots: &[HotspotRecord]) -> Self {
        let mut provider = Self::new();
        for record in vegetation {
            provider.insert_stats(&record.boundary_id, record.period, record.stats);
        }
        for record in hotspots {
            provider.insert_hotspots(&record.boundary_id, record.period, record.count);
        }
        provider
    }

    pub fn insert_stats(&mut self, boundary_id: &str, period: Period, stats: VegetationStats) {
        self.vegetation.insert((boundary_id.to_string(), period), stats);
    }

    pub fn insert_hotspots(&mut self, boundary_id: &str, period: Period, count: u32) {
        self.hotspots.insert((boundary_id.to_string(), period), count);
    }
}

impl VegetationStatsProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    /// Periods without a record have no valid pixels
    fn vegetation_stats(&self, boundary: &Boundary, period: &Period) -> Result<VegetationStats> {
        Ok(self
            .vegetation
            .get(&(boundary.id.clone(), *period))
            .copied()
            .unwrap_or(VegetationStats::Unknown))
    }
}

impl FireHotspotProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    /// A missing record is an error, not zero hotspots
    fn hotspot_count(&self, boundary: &Boundary, period: &Period) -> Result<u32> {
        self.hotspots
            .get(&(boundary.id.clone(), *period))
            .copied()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No hotspot record for boundary {} over {}",
                    boundary.id,
                    period.label()
                )
            })
    }
}
