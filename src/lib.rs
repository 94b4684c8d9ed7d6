//! Parcel Monitor Rust Implementation
//!
//! Change detection and health scoring for monitored land parcels.
//!
//! The engine works on pre-aggregated vegetation-index statistics; imagery
//! and fire services sit behind the provider traits.
//! - `utils/`: Geometry approximations and observation-period planning
//! - `classifiers/`: Severity, health score, stressed area, recommendations
//! - `detectors/`: Deforestation, fire and plant-health findings
//! - `scanner`: Per-boundary orchestration (sequential and Rayon)
//! - `alerts/`: Alert records and notification formatting

pub mod error;
pub mod types;
pub mod config;
pub mod utils;
pub mod classifiers;
pub mod detectors;
pub mod providers;
pub mod scanner;
pub mod alerts;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use types::{Boundary, Customer, HealthStatus, IndexSummary, Period, Polygon, Severity, VegetationStats};
pub use config::EngineConfig;
pub use utils::{plan_change_periods, trailing_window, BoundingBox, ChangePeriods};
pub use classifiers::*;
pub use detectors::*;
pub use providers::{FireHotspotProvider, FixtureProvider, ScanFixture, VegetationStatsProvider};
pub use scanner::{BoundaryOutcome, BoundaryReport, BoundaryScanner, NdviReading, ScanSummary, TrendPoint};
pub use alerts::{AlertRecord, AlertType, JsonFormatter, TextFormatter};
