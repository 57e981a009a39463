use thiserror::Error;

use crate::model::location::LocationFix;

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Boundary guard for incoming fixes. The accumulator itself assumes
/// valid coordinates; a malformed fix must be rejected here, before it
/// reaches storage, or it silently corrupts payroll downstream.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), GeoError> {
    if lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
    {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate { lat, lon })
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Great-circle distance between two coordinates in kilometers
/// (Haversine), rounded to 2 decimal places.
pub fn great_circle_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    round2(EARTH_RADIUS_KM * c)
}

/// Cumulative distance over a day's fixes, in kilometers rounded to
/// 2 decimal places. The caller supplies the fixes in timestamp order;
/// they come straight from the day's append-ordered rows.
///
/// Fewer than two fixes means no travel yet, which is a valid zero, not
/// an error. The total is recomputed from the full list on every new
/// fix rather than extended incrementally, so repeated runs over the
/// same rows always agree.
pub fn accumulate_km(fixes: &[LocationFix]) -> f64 {
    if fixes.len() < 2 {
        return 0.0;
    }

    let total: f64 = fixes
        .windows(2)
        .map(|pair| great_circle_km(pair[0].latitude, pair[0].longitude, pair[1].latitude, pair[1].longitude))
        .sum();

    round2(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fix(minute: u32, lat: f64, lon: f64) -> LocationFix {
        LocationFix {
            id: 0,
            employee_id: 1001,
            recorded_at: NaiveDate::from_ymd_opt(2026, 1, 5)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
            latitude: lat,
            longitude: lon,
            accuracy: None,
        }
    }

    #[test]
    fn delhi_reference_distance() {
        // Connaught Place to Delhi University, precomputed: 14.44 km.
        let d = great_circle_km(28.6139, 77.2090, 28.7041, 77.1025);
        assert!((d - 14.44).abs() < 0.01);
    }

    #[test]
    fn distance_is_rounded_to_two_decimals() {
        let d = great_circle_km(28.6139, 77.2090, 28.6200, 77.2150);
        assert_eq!(d, 0.90);
    }

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(great_circle_km(28.6139, 77.2090, 28.6139, 77.2090), 0.0);
    }

    #[test]
    fn empty_and_single_fix_accumulate_to_zero() {
        assert_eq!(accumulate_km(&[]), 0.0);
        assert_eq!(accumulate_km(&[fix(0, 28.6139, 77.2090)]), 0.0);
    }

    #[test]
    fn stationary_fixes_accumulate_to_zero() {
        let fixes = vec![
            fix(0, 28.6139, 77.2090),
            fix(10, 28.6139, 77.2090),
            fix(20, 28.6139, 77.2090),
        ];
        assert_eq!(accumulate_km(&fixes), 0.0);
    }

    #[test]
    fn accumulates_consecutive_legs() {
        // Legs precomputed at 0.90 km and 1.84 km.
        let fixes = vec![
            fix(0, 28.6139, 77.2090),
            fix(15, 28.6200, 77.2150),
            fix(30, 28.6300, 77.2300),
        ];
        assert_eq!(accumulate_km(&fixes), 2.74);
    }

    #[test]
    fn accumulate_is_deterministic() {
        let fixes = vec![
            fix(0, 28.6139, 77.2090),
            fix(15, 28.6200, 77.2150),
            fix(30, 28.6300, 77.2300),
        ];
        assert_eq!(accumulate_km(&fixes), accumulate_km(&fixes));
    }

    #[test]
    fn boundary_coordinates_are_valid() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(0.0, 0.0).is_ok());
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        assert!(validate_coordinates(f64::NAN, 77.0).is_err());
        assert!(validate_coordinates(28.0, f64::INFINITY).is_err());
        assert!(validate_coordinates(90.01, 77.0).is_err());
        assert!(validate_coordinates(28.0, -180.5).is_err());
    }
}
