use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use serde::Serialize;

use crate::error::ModelError;
use crate::types::LatLon;

/// Hurricane-strength threshold (mph). Winds sampled below this are floored
/// to it, deliberately skewing the realised distribution rightward at the
/// boundary — the event class is defined as "at least a hurricane".
pub const HURRICANE_FLOOR_MPH: f64 = 74.0;

/// Genesis/landfall zone: storms form uniformly in this lat/lon rectangle.
/// Uniform is a known simplification — not weighted by historical density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenesisBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for GenesisBox {
    /// Florida genesis zone from the historical record.
    fn default() -> Self {
        GenesisBox { lat_min: 24.3, lat_max: 31.0, lon_min: -87.8, lon_max: -79.8 }
    }
}

impl GenesisBox {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.lat_min.is_finite() || !self.lat_max.is_finite() || self.lat_min >= self.lat_max {
            return Err(ModelError::invalid(
                "genesis_box.lat",
                self.lat_min,
                "lat_min must be finite and below lat_max",
            ));
        }
        if !self.lon_min.is_finite() || !self.lon_max.is_finite() || self.lon_min >= self.lon_max {
            return Err(ModelError::invalid(
                "genesis_box.lon",
                self.lon_min,
                "lon_min must be finite and below lon_max",
            ));
        }
        let corners = [
            LatLon::new(self.lat_min, self.lon_min),
            LatLon::new(self.lat_max, self.lon_max),
        ];
        if corners.iter().any(|c| !c.in_range()) {
            return Err(ModelError::invalid(
                "genesis_box",
                self.lat_min,
                "corners must lie in valid geographic range",
            ));
        }
        Ok(())
    }

    pub fn sample(&self, rng: &mut impl Rng) -> LatLon {
        LatLon::new(
            rng.random_range(self.lat_min..self.lat_max),
            rng.random_range(self.lon_min..self.lon_max),
        )
    }
}

/// One sampled storm. Ephemeral: lives for a single loss calculation, or is
/// handed to the presentation layer for an ad-hoc map draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Storm {
    pub wind_mph: f64,
    pub center: LatLon,
}

/// Hourly position of a storm eye for the landfall animation. Pure
/// presentation output; the loss path never sees tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    pub hour: u32,
    pub lat: f64,
    pub lon: f64,
    pub wind_mph: f64,
}

impl Storm {
    pub const TRACK_HOURS: u32 = 16;

    /// Generate an hourly northwest track from the sampled center: latitude
    /// drifts by Normal(0.04, 0.015) per hour, longitude steps west by 0.13°,
    /// and wind decays 5 mph/hour down to a 60 mph floor.
    pub fn track(&self, rng: &mut impl Rng, hours: u32) -> Vec<TrackPoint> {
        let drift = Normal::new(0.04, 0.015).expect("invalid drift params");
        let mut lat = self.center.lat;
        let mut lon = self.center.lon;
        let mut points = Vec::with_capacity(hours as usize);
        for hour in 0..hours {
            lat += drift.sample(rng);
            lon -= 0.13;
            let wind_mph = (self.wind_mph - 5.0 * hour as f64).max(60.0);
            points.push(TrackPoint { hour, lat, lon, wind_mph });
        }
        points
    }
}

/// Validated frequency + intensity + location sampler.
///
/// Distributions are constructed once, up front; every draw thereafter is
/// infallible. λ and μ arrive here already scaled by any climate factor —
/// scaling is the driver's responsibility, the sampler has no memory and
/// performs no adjustment of its own.
pub struct StormModel {
    frequency: Poisson<f64>,
    wind: Normal<f64>,
    wind_floor_mph: f64,
    genesis: GenesisBox,
}

impl StormModel {
    pub fn new(
        lambda: f64,
        wind_mean_mph: f64,
        wind_std_mph: f64,
        wind_floor_mph: f64,
        genesis: GenesisBox,
    ) -> Result<Self, ModelError> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(ModelError::invalid("lambda", lambda, "must be > 0"));
        }
        if !wind_mean_mph.is_finite() {
            return Err(ModelError::invalid("wind_mean_mph", wind_mean_mph, "must be finite"));
        }
        if !wind_std_mph.is_finite() || wind_std_mph < 0.0 {
            return Err(ModelError::invalid("wind_std_mph", wind_std_mph, "must be >= 0"));
        }
        if !wind_floor_mph.is_finite() || wind_floor_mph <= 0.0 {
            return Err(ModelError::invalid("wind_floor_mph", wind_floor_mph, "must be > 0"));
        }
        genesis.validate()?;

        // Domains are checked above; anything the distributions still reject
        // is an internal sampling-layer failure, not a caller mistake.
        let frequency =
            Poisson::new(lambda).map_err(|e| ModelError::Sampling(e.to_string()))?;
        let wind = Normal::new(wind_mean_mph, wind_std_mph)
            .map_err(|e| ModelError::Sampling(e.to_string()))?;

        Ok(StormModel { frequency, wind, wind_floor_mph, genesis })
    }

    /// Number of storms in one simulated year: Poisson(λ). Independent draw
    /// per call; no memory across years.
    pub fn storm_count(&self, rng: &mut impl Rng) -> u64 {
        self.frequency.sample(rng) as u64
    }

    /// Draw one storm: wind `max(floor, Normal(μ, σ))`, center uniform in
    /// the genesis box. Wind and location are independent.
    pub fn sample_storm(&self, rng: &mut impl Rng) -> Storm {
        let wind_mph = self.wind.sample(rng).max(self.wind_floor_mph);
        Storm { wind_mph, center: self.genesis.sample(rng) }
    }
}
