/// Earth's mean radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two (latitude, longitude) pairs
/// given in degrees, via the haversine formula.
///
/// Out-of-range or NaN inputs are not rejected; NaN propagates.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_distance(48.8566, 2.3522, 48.8566, 2.3522), 0.0);
    }

    #[test]
    fn one_degree_latitude_is_about_111_km() {
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn short_distances_are_meter_accurate() {
        // ~100 m north of the origin point.
        let d = haversine_distance(52.0, 13.0, 52.0009, 13.0);
        assert!((d - 100.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine_distance(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }
}
