use crate::sdk::airports::Coord;

/// Mean Earth radius.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const KM_PER_MILE: f64 = 1.60934;

/// Great-circle distance between two (latitude, longitude) points using the
/// haversine formula.
pub fn distance_km(a: Coord, b: Coord) -> f64 {
    let (lat_a, lon_a) = a;
    let (lat_b, lon_b) = b;

    let lat_a_rad = lat_a.to_radians();
    let lat_b_rad = lat_b.to_radians();
    let delta_lat = (lat_b - lat_a).to_radians();
    let delta_lon = (lon_b - lon_a).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a_rad.cos() * lat_b_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}
