use serde::Serialize;

use crate::geo::haversine_distance;

/// Result of checking a position against a circular safe zone.
#[derive(Debug, Clone, Serialize)]
pub struct GeofenceCheck {
    pub distance_from_safe_zone: f64,
    pub is_safe: bool,
    pub alert_type: &'static str,
    pub alert_message: String,
}

/// Flag a breach when the distance from the safe-zone center exceeds the
/// radius. A position exactly on the boundary is safe; there is no
/// hysteresis.
pub fn check(
    latitude: f64,
    longitude: f64,
    safe_zone_lat: f64,
    safe_zone_lon: f64,
    safe_zone_radius_m: f64,
) -> GeofenceCheck {
    let distance = haversine_distance(latitude, longitude, safe_zone_lat, safe_zone_lon);
    let is_safe = distance <= safe_zone_radius_m;

    let (alert_type, alert_message) = if is_safe {
        ("none", "Dog is within safe zone".to_string())
    } else {
        (
            "geofence_breach",
            format!("Dog has left safe zone! Distance: {:.0}m", distance),
        )
    };

    GeofenceCheck {
        distance_from_safe_zone: (distance * 100.0).round() / 100.0,
        is_safe,
        alert_type,
        alert_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_safe() {
        let c = check(52.52, 13.405, 52.52, 13.405, 100.0);
        assert_eq!(c.distance_from_safe_zone, 0.0);
        assert!(c.is_safe);
        assert_eq!(c.alert_type, "none");
    }

    #[test]
    fn boundary_is_safe_breach_is_strictly_beyond() {
        // ~111.2 m north of center.
        let c = check(52.001, 13.0, 52.0, 13.0, 112.0);
        assert!(c.is_safe, "on/inside the radius must be safe");

        let c = check(52.001, 13.0, 52.0, 13.0, 100.0);
        assert!(!c.is_safe);
        assert_eq!(c.alert_type, "geofence_breach");
        assert!(c.alert_message.starts_with("Dog has left safe zone!"));
    }
}
