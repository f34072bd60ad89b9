use crate::portfolio::{Construction, Portfolio, Property};
use crate::simulation::SimulationParams;
use crate::types::{LatLon, PropertyId};

/// Exceedance threshold reported by default: P(annual loss > $10M).
pub const DEFAULT_EXCEEDANCE_THRESHOLD: f64 = 10_000_000.0;

/// Default VaR confidence level (99% → the 1-in-100-year loss).
pub const DEFAULT_VAR_LEVEL: f64 = 0.99;

/// Exponent applied to the climate factor when scaling mean wind speed.
/// Calibrations in circulation use 0.4 and 0.5; this is the knob, not a law.
pub const DEFAULT_WIND_EXPONENT: f64 = 0.4;

/// A named frequency/intensity scaling for a projection year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateScenario {
    pub label: &'static str,
    /// Multiplier on λ (linear) and on mean wind (via the wind exponent).
    pub factor: f64,
}

/// Projection presets. "Today" is the identity scenario.
pub const CLIMATE_SCENARIOS: [ClimateScenario; 4] = [
    ClimateScenario { label: "today", factor: 1.00 },
    ClimateScenario { label: "2030", factor: 1.12 },
    ClimateScenario { label: "2050", factor: 1.25 },
    ClimateScenario { label: "2100", factor: 1.45 },
];

/// Look up a scenario by its label, case-insensitively.
pub fn climate_scenario(label: &str) -> Option<ClimateScenario> {
    let wanted = label.trim().to_ascii_lowercase();
    CLIMATE_SCENARIOS.iter().copied().find(|s| s.label == wanted)
}

/// Baseline simulation parameters (Florida hurricane calibration).
pub fn canonical_params() -> SimulationParams {
    SimulationParams::default()
}

/// The eight-city Florida demo portfolio. Values in USD; coordinates are
/// the city centres. Serves as the fixture for the CLI and the benches —
/// real runs load a portfolio CSV instead.
pub fn demo_portfolio() -> Portfolio {
    let cities: [(&str, f64, Construction, f64, f64); 8] = [
        ("Miami", 500_000.0, Construction::Wood, 25.7617, -80.1918),
        ("Tampa", 750_000.0, Construction::Brick, 27.9478, -82.4584),
        ("Tallahassee", 1_000_000.0, Construction::Concrete, 30.4383, -84.2807),
        ("Orlando", 600_000.0, Construction::Wood, 28.5383, -81.3792),
        ("Ft Lauderdale", 800_000.0, Construction::Brick, 26.1224, -80.1373),
        ("Jacksonville", 1_200_000.0, Construction::Concrete, 30.3322, -81.6557),
        ("Key West", 450_000.0, Construction::Wood, 24.5551, -81.7799),
        ("Pensacola", 900_000.0, Construction::Concrete, 30.4213, -87.2169),
    ];

    let properties = cities
        .iter()
        .enumerate()
        .map(|(i, (name, value, construction, lat, lon))| Property {
            id: PropertyId(i as u64),
            name: name.to_string(),
            insured_value: *value,
            construction: *construction,
            location: LatLon::new(*lat, *lon),
        })
        .collect();

    Portfolio::new(properties).expect("demo portfolio is well-formed")
}
