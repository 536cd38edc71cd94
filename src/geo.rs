//! Great-circle distance helper for the nearby-care lookup.

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two latitude/longitude pairs
/// given in degrees.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Format a kilometer value the way the UI displays it: one decimal place
/// with a "km" suffix.
pub fn format_km(km: f64) -> String {
    format!("{km:.1} km")
}

/// Distance between two points, already formatted for display.
pub fn formatted_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> String {
    format_km(distance_km(lat1, lon1, lat2, lon2))
}
