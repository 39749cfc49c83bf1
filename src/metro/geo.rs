//! Great-circle distances between stations

/// Mean earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.009;

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance to another position, in km
    pub fn distance(&self, other: &Coordinates) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Haversine great-circle distance in km on a sphere of radius [`EARTH_RADIUS_KM`]
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat_from = from.lat.to_radians();
    let lat_to = to.lat.to_radians();
    let dlat = lat_to - lat_from;
    let dlon = (to.lon - from.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat_from.cos() * lat_to.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
