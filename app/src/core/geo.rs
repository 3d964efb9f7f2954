use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Upper bound for any great-circle distance result (half of Earth's circumference).
pub const MAX_DISTANCE_METERS: f64 = 20_003_931.0;

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum GeoError {
    #[display("invalid coordinate: {reason}")]
    InvalidCoordinate { reason: String },

    #[display("distance computation out of bounds: {distance}")]
    ComputationAnomaly { distance: f64 },
}

/// A validated WGS84 position. Out-of-range or non-finite values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidCoordinate {
                reason: format!("latitude {} is not within [-90, 90]", latitude),
            });
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidCoordinate {
                reason: format!("longitude {} is not within [-180, 180]", longitude),
            });
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

/// Great-circle distance in meters (haversine on a sphere of radius [`EARTH_RADIUS_METERS`]).
pub fn distance(a: &Coordinate, b: &Coordinate) -> Result<f64, GeoError> {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push h marginally above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();
    let meters = EARTH_RADIUS_METERS * c;

    if !meters.is_finite() || !(0.0..=MAX_DISTANCE_METERS).contains(&meters) {
        return Err(GeoError::ComputationAnomaly { distance: meters });
    }

    Ok(meters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn same_point_is_zero() {
        let tokyo = coord(35.681236, 139.767125);

        assert_eq!(distance(&tokyo, &tokyo).unwrap(), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (coord(35.681236, 139.767125), coord(34.693738, 135.502165)),
            (coord(-33.8688, 151.2093), coord(51.5074, -0.1278)),
            (coord(0.0, 179.9), coord(0.0, -179.9)),
            (coord(89.9, 0.0), coord(-89.9, 10.0)),
        ];

        for (a, b) in pairs {
            assert_eq!(distance(&a, &b).unwrap(), distance(&b, &a).unwrap());
        }
    }

    #[test]
    fn thousandth_degree_latitude_is_about_111_meters() {
        let home = coord(35.681236, 139.767125);
        let north = coord(35.682236, 139.767125);

        let d = distance(&home, &north).unwrap();

        assert!((d - 111.19).abs() < 111.19 * 0.01, "got {}", d);
    }

    #[test]
    fn across_the_date_line() {
        let d = distance(&coord(0.0, 179.999), &coord(0.0, -179.999)).unwrap();

        assert!(d < 300.0, "got {}", d);
    }

    #[test]
    fn far_points_within_bound() {
        let d = distance(&coord(35.681236, 139.767125), &coord(40.7128, -74.0060)).unwrap();

        assert!(d > 10_000_000.0 && d < MAX_DISTANCE_METERS);
    }

    #[test]
    fn antipodal_points_exceed_bound() {
        let result = distance(&coord(0.0, 0.0), &coord(0.0, 180.0));

        assert!(matches!(result, Err(GeoError::ComputationAnomaly { .. })));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(matches!(
            Coordinate::new(90.0001, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<Coordinate, _> = serde_json::from_str(r#"{"latitude": 35.0, "longitude": 139.0}"#);
        let bad: Result<Coordinate, _> = serde_json::from_str(r#"{"latitude": 135.0, "longitude": 139.0}"#);

        assert!(ok.is_ok());
        assert!(bad.is_err());
    }
}
