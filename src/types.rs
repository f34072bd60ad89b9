use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub u64);

/// Kilometres per degree of latitude (and, in this model, longitude).
///
/// The whole model works on a flat-earth approximation: at the Florida
/// extent the error is small, and the reference arithmetic is defined
/// against exactly this constant. Do not replace with a geodesic formula.
pub const KM_PER_DEGREE: f64 = 111.0;

/// A point on the (flat) earth, degrees north / degrees east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        LatLon { lat, lon }
    }

    /// Planar distance in km: `sqrt(Δlat² + Δlon²) × 111`.
    pub fn distance_km(&self, other: &LatLon) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE
    }

    /// Whether the point lies in the valid geographic range.
    pub fn in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}
