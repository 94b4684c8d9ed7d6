//! Leaf classifiers used by the detectors
//!
//! Each classifier is a pure function (or, for stress area, a trait with a
//! default implementation) and is total over well-formed input.

pub mod severity;
pub mod health;
pub mod stress_area;
pub mod recommendations;

// Re-export classifier functions
pub use severity::classify_severity;
pub use health::{classify_health, raw_health_score, HealthClassification};
pub use stress_area::{std_estimate, StressAreaEstimator, StressEstimate, SummaryStatsEstimator};
pub use recommendations::{generate_recommendations, top_recommendations};
