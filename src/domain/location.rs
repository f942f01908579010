// src/domain/location.rs
//
// Geographic value object and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees
///
/// Precondition for every operation in this module:
/// latitude in [-90, 90], longitude in [-180, 180], both finite.
/// Out-of-range input is a caller contract violation and is not checked here;
/// boundary validation lives in the entity invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Distance to another coordinate in kilometers
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance(self.lat, self.lon, other.lat, other.lon)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// Great-circle distance in kilometers (haversine formula)
///
/// Pure and total over finite input. Symmetric in its two points and zero
/// for identical coordinates.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let half_dphi = (lat2 - lat1).to_radians() / 2.0;
    let half_dlambda = (lon2 - lon1).to_radians() / 2.0;

    let a = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            ((40.0, -75.0), (41.0, -75.0)),
            ((-33.86, 151.21), (51.5, -0.12)),
            ((0.0, 179.9), (0.0, -179.9)),
            ((89.9, 10.0), (-89.9, -170.0)),
        ];

        for ((lat1, lon1), (lat2, lon2)) in pairs {
            assert_eq!(distance(lat1, lon1, lat2, lon2), distance(lat2, lon2, lat1, lon1));
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for (lat, lon) in [(0.0, 0.0), (40.0, -75.0), (-90.0, 180.0), (12.345, -67.89)] {
            assert_eq!(distance(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn test_known_distances() {
        // 0.01 degree of longitude at 40N
        let near = distance(40.0, -75.0, 40.0, -75.01);
        assert!((near - 0.852).abs() < 0.01, "got {}", near);

        // One degree of latitude
        let far = distance(40.0, -75.0, 41.0, -75.0);
        assert!((far - 111.19).abs() < 0.1, "got {}", far);
    }

    #[test]
    fn test_distance_grows_with_separation() {
        let origin = Coordinate::new(10.0, 10.0);
        let mut previous = 0.0;
        for step in 1..20 {
            let d = origin.distance_to(&Coordinate::new(10.0 + step as f64 * 0.5, 10.0));
            assert!(d > previous);
            previous = d;
        }
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let d = distance(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.1, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
