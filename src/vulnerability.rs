use serde::Serialize;

use crate::error::ModelError;
use crate::portfolio::Construction;

/// Wind-to-damage curve parameters.
///
/// `base = clamp(wind / damage_threshold_mph, 0, 1)` saturates at the
/// threshold; the class multiplier then scales it, re-capped at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VulnerabilityParams {
    /// Wind speed (mph) at which base damage reaches 1.0.
    pub damage_threshold_mph: f64,
    pub wood_multiplier: f64,
    pub brick_multiplier: f64,
    pub concrete_multiplier: f64,
}

impl Default for VulnerabilityParams {
    fn default() -> Self {
        VulnerabilityParams {
            damage_threshold_mph: 150.0,
            wood_multiplier: 1.50,
            brick_multiplier: 1.15,
            concrete_multiplier: 0.75,
        }
    }
}

impl VulnerabilityParams {
    pub fn multiplier_for(&self, construction: Construction) -> f64 {
        match construction {
            Construction::Wood => self.wood_multiplier,
            Construction::Brick => self.brick_multiplier,
            Construction::Concrete => self.concrete_multiplier,
            Construction::Other(m) => m,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let positive_finite = [
            ("damage_threshold_mph", self.damage_threshold_mph),
            ("wood_multiplier", self.wood_multiplier),
            ("brick_multiplier", self.brick_multiplier),
            ("concrete_multiplier", self.concrete_multiplier),
        ];
        for (name, value) in positive_finite {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::invalid(name, value, "must be a positive number"));
            }
        }
        Ok(())
    }
}

/// Fraction of insured value lost at `wind_mph` for a construction class.
///
/// Deterministic, monotone non-decreasing in wind, always in [0, 1].
pub fn damage_ratio(wind_mph: f64, construction: Construction, params: &VulnerabilityParams) -> f64 {
    let base = (wind_mph / params.damage_threshold_mph).clamp(0.0, 1.0);
    (base * params.multiplier_for(construction)).clamp(0.0, 1.0)
}
