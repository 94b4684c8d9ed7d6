//! Boundary geometry helpers
//!
//! Bounding boxes and a flat-earth area approximation. Good enough to size
//! a parcel when the customer did not supply hectares; not a geodesic area.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::Polygon;

/// Kilometres per degree of latitude (mean meridional value)
const KM_PER_DEG_LAT: f64 = 110.574;

/// Kilometres per degree of longitude at the equator
const KM_PER_DEG_LON_EQUATOR: f64 = 111.32;

/// WGS84 bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Bounds of a polygon's outer ring
    pub fn from_polygon(polygon: &Polygon) -> EngineResult<Self> {
        Self::from_ring(polygon.outer_ring())
    }

    pub fn from_ring(ring: &[[f64; 2]]) -> EngineResult<Self> {
        if ring.is_empty() {
            return Err(EngineError::InvalidGeometry("polygon has no coordinates".to_string()));
        }

        let mut bbox = BoundingBox {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        };

        for &[lon, lat] in ring {
            if !lon.is_finite() || !lat.is_finite() {
                return Err(EngineError::InvalidGeometry(
                    "coordinate is not a finite number".to_string(),
                ));
            }
            if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                return Err(EngineError::InvalidGeometry(format!(
                    "coordinate ({}, {}) is outside WGS84 bounds",
                    lon, lat
                )));
            }
            bbox.min_lon = bbox.min_lon.min(lon);
            bbox.max_lon = bbox.max_lon.max(lon);
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.max_lat = bbox.max_lat.max(lat);
        }

        Ok(bbox)
    }

    /// Area of the box in hectares, scaling longitude by cos(mid-latitude)
    pub fn approximate_area_ha(&self) -> f64 {
        let lat_mid = (self.min_lat + self.max_lat) / 2.0;
        let km_per_deg_lon = KM_PER_DEG_LON_EQUATOR * lat_mid.to_radians().cos();

        let width_km = (self.max_lon - self.min_lon) * km_per_deg_lon;
        let height_km = (self.max_lat - self.min_lat) * KM_PER_DEG_LAT;

        width_km * height_km * 100.0
    }
}
