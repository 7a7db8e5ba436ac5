/// Great-circle distance between two lat/lng pairs in kilometers
/// (haversine formula). Used to order the worker job feed by proximity.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let r = 6371.0; // Earth's radius in km
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    r * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        assert!(haversine_km(12.97, 77.59, 12.97, 77.59) < 1e-9);
    }

    #[test]
    fn known_city_pair_is_roughly_right() {
        // Bengaluru -> Chennai is about 290 km as the crow flies
        let d = haversine_km(12.9716, 77.5946, 13.0827, 80.2707);
        assert!((250.0..350.0).contains(&d), "got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = haversine_km(19.0760, 72.8777, 28.7041, 77.1025);
        let b = haversine_km(28.7041, 77.1025, 19.0760, 72.8777);
        assert!((a - b).abs() < 1e-9);
    }
}
