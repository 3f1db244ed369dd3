#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate transform between the prediction model's coordinate space
//! and real geographic coordinates.
//!
//! The ML endpoint returns locations as offsets in arbitrary model units,
//! not as geographic coordinates. [`model_to_geo`] maps them onto the map
//! by scaling around a fixed city-center reference point. This is a linear
//! approximation, not a geodesic projection; it is only acceptable because
//! the covered area is a single city.

use serde::{Deserialize, Serialize};

/// A real-world geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Toronto city center, the reference point all model-space offsets are
/// applied to.
pub const TORONTO_CENTER: GeoPoint = GeoPoint {
    latitude: 43.65107,
    longitude: -79.347015,
};

/// Degrees of latitude per model-space latitude unit.
///
/// Empirically chosen to spread predictions across the city, not derived
/// from any projection.
pub const LAT_SCALE: f64 = 0.03;

/// Degrees of longitude per model-space longitude unit.
pub const LNG_SCALE: f64 = 0.04;

/// Maps a model-space coordinate pair onto real geographic coordinates.
///
/// Pure and deterministic. Performs no bounds checking: out-of-range model
/// inputs silently produce out-of-range geographic coordinates.
#[must_use]
pub const fn model_to_geo(model_lat: f64, model_lng: f64) -> GeoPoint {
    GeoPoint {
        latitude: TORONTO_CENTER.latitude + model_lat * LAT_SCALE,
        longitude: TORONTO_CENTER.longitude + model_lng * LNG_SCALE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_city_center() {
        assert_eq!(model_to_geo(0.0, 0.0), TORONTO_CENTER);
    }

    #[test]
    fn transform_is_exact_linear_offset() {
        let cases = [(1.0, 1.0), (-0.5, 0.25), (12.75, -3.125), (-100.0, 100.0)];
        for (lat, lng) in cases {
            let point = model_to_geo(lat, lng);
            assert_eq!(point.latitude, 43.65107 + lat * 0.03);
            assert_eq!(point.longitude, -79.347015 + lng * 0.04);
        }
    }

    #[test]
    fn transform_is_deterministic() {
        let a = model_to_geo(0.123_456_789, -0.987_654_321);
        let b = model_to_geo(0.123_456_789, -0.987_654_321);
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_inputs_are_not_clamped() {
        let point = model_to_geo(10_000.0, -10_000.0);
        assert!(point.latitude > 90.0);
        assert!(point.longitude < -180.0);
    }

    #[test]
    fn geo_point_serializes_camel_case() {
        let json = serde_json::to_value(TORONTO_CENTER).unwrap();
        assert_eq!(json["latitude"], 43.65107);
        assert_eq!(json["longitude"], -79.347015);
    }
}
