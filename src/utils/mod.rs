//! Utility modules shared by the detectors and the scanner
//!
//! - Geometry: bounding boxes and approximate parcel area
//! - Periods: change-detection and trend window planning

pub mod geometry;
pub mod periods;

// Re-export commonly used types
pub use geometry::BoundingBox;
pub use periods::{
    plan_change_periods, plan_trend_windows, trailing_window, validate_change_periods,
    ChangePeriods, TrendWindow,
};
