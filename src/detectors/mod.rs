//! Detector modules
//!
//! Each detector turns pre-aggregated statistics for one boundary into a
//! finding with an explicit `alert_triggered` flag and optional severity.

pub mod deforestation;
pub mod fire;
pub mod plant_health;

// Re-export detector entry points
pub use deforestation::{detect_deforestation, AffectedLocation, ChangeOutcome, DeforestationFinding};
pub use fire::{aggregate_fire_hotspots, fire_severity, FireFinding};
pub use plant_health::{HealthFinding, HealthInput, PlantHealthAnalyzer};
