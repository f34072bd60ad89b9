use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::{self, ExceedancePoint, LossSummary};
use crate::error::ModelError;
use crate::loss::{DEFAULT_FOOTPRINT_COEFF, StormLoss, storm_impacts, storm_loss_total};
use crate::portfolio::Portfolio;
use crate::storm::{GenesisBox, HURRICANE_FLOOR_MPH, Storm, StormModel};
use crate::vulnerability::VulnerabilityParams;

/// Everything a run needs besides the portfolio. λ and μ are the *effective*
/// values — apply any climate scenario via [SimulationParams::with_climate]
/// before the samplers ever see them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParams {
    pub seed: u64,
    pub years: usize,
    /// Expected storms per year (Poisson λ).
    pub lambda: f64,
    pub wind_mean_mph: f64,
    pub wind_std_mph: f64,
    pub wind_floor_mph: f64,
    /// Affected radius per mph of peak wind (km/mph).
    pub footprint_coeff: f64,
    pub vulnerability: VulnerabilityParams,
    pub genesis_box: GenesisBox,
}

impl Default for SimulationParams {
    /// Florida baseline: λ 0.56 landfalling hurricanes/year, Normal(110, 25)
    /// winds floored at 74 mph.
    fn default() -> Self {
        SimulationParams {
            seed: 42,
            years: 20_000,
            lambda: 0.56,
            wind_mean_mph: 110.0,
            wind_std_mph: 25.0,
            wind_floor_mph: HURRICANE_FLOOR_MPH,
            footprint_coeff: DEFAULT_FOOTPRINT_COEFF,
            vulnerability: VulnerabilityParams::default(),
            genesis_box: GenesisBox::default(),
        }
    }
}

impl SimulationParams {
    /// Scale for a climate scenario: frequency scales linearly with the
    /// factor, mean wind by `factor^wind_exponent`. The exponent is a
    /// parameter on purpose (observed calibrations disagree between 0.4
    /// and 0.5); see [crate::config::DEFAULT_WIND_EXPONENT].
    pub fn with_climate(mut self, factor: f64, wind_exponent: f64) -> Self {
        self.lambda *= factor;
        self.wind_mean_mph *= factor.powf(wind_exponent);
        self
    }

    fn storm_model(&self) -> Result<StormModel, ModelError> {
        StormModel::new(
            self.lambda,
            self.wind_mean_mph,
            self.wind_std_mph,
            self.wind_floor_mph,
            self.genesis_box,
        )
    }

    /// Check every parameter against its documented domain. Nothing is
    /// clamped: the first violation is returned as [ModelError::InvalidParameter].
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.years == 0 {
            return Err(ModelError::invalid("years", 0.0, "must be >= 1"));
        }
        if !self.footprint_coeff.is_finite() || self.footprint_coeff <= 0.0 {
            return Err(ModelError::invalid(
                "footprint_coeff",
                self.footprint_coeff,
                "must be > 0",
            ));
        }
        self.vulnerability.validate()?;
        self.storm_model().map(|_| ())
    }
}

/// Optional per-year hooks for a long-running simulation. The driver checks
/// the cancel flag and reports progress once per simulated year; both must
/// be safe to touch from worker threads.
#[derive(Default)]
pub struct RunHooks<'a> {
    /// Called as `(completed_years, total_years)` after each year.
    pub progress: Option<&'a (dyn Fn(usize, usize) + Sync)>,
    pub cancel: Option<&'a AtomicBool>,
}

/// The ordered per-year loss sample. Created fresh per run, never mutated
/// afterwards; everything else (summary scalars, the curve) derives from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub years: usize,
    annual_losses: Vec<f64>,
}

impl SimulationResult {
    pub fn annual_losses(&self) -> &[f64] {
        &self.annual_losses
    }

    pub fn expected_annual_loss(&self) -> f64 {
        self.annual_losses.iter().sum::<f64>() / self.annual_losses.len() as f64
    }

    /// VaR at confidence `p`. Panics if `p` is outside [0, 1] — a caller
    /// contract, not an input-data condition.
    pub fn value_at_risk(&self, p: f64) -> f64 {
        analysis::value_at_risk(&self.annual_losses, p)
            .expect("p in [0, 1]; losses non-empty by construction")
    }

    pub fn prob_exceeding(&self, threshold: f64) -> f64 {
        analysis::prob_exceeding(&self.annual_losses, threshold)
    }

    pub fn exceedance_curve(&self) -> Vec<ExceedancePoint> {
        analysis::exceedance_curve(&self.annual_losses)
    }

    pub fn summary(&self) -> LossSummary {
        analysis::summarise(&self.annual_losses).expect("non-empty by construction")
    }
}

/// A validated, ready-to-run simulation: params + storm model + shared
/// read-only portfolio.
pub struct Simulation {
    params: SimulationParams,
    model: StormModel,
    portfolio: Portfolio,
}

impl Simulation {
    /// Validate params and portfolio and build the samplers. All bad input
    /// surfaces here, before any sampling.
    pub fn new(params: SimulationParams, portfolio: Portfolio) -> Result<Self, ModelError> {
        params.validate()?;
        let model = params.storm_model()?;
        Ok(Simulation { params, model, portfolio })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// One independent trial: fresh per-year RNG, Poisson storm count, sum
    /// of per-storm portfolio losses. A year with no storms is exactly 0.0.
    fn simulate_year(&self, year_index: u64) -> f64 {
        let mut rng = ChaCha20Rng::seed_from_u64(self.params.seed.wrapping_add(year_index));
        let n = self.model.storm_count(&mut rng);
        let mut total = 0.0;
        for _ in 0..n {
            let storm = self.model.sample_storm(&mut rng);
            total += storm_loss_total(
                &self.portfolio,
                &storm,
                &self.params.vulnerability,
                self.params.footprint_coeff,
            );
        }
        total
    }

    /// Serial run. Identical output to [Simulation::run_parallel] for the
    /// same seed — each year owns an independently seeded generator, so the
    /// execution order cannot leak into the results.
    pub fn run(&self) -> Result<SimulationResult, ModelError> {
        self.run_with_hooks(false, &RunHooks::default())
    }

    /// Parallel run across all years via rayon. Years are embarrassingly
    /// parallel: the portfolio is shared read-only and per-year results are
    /// combined by position.
    pub fn run_parallel(&self) -> Result<SimulationResult, ModelError> {
        self.run_with_hooks(true, &RunHooks::default())
    }

    pub fn run_with_hooks(
        &self,
        parallel: bool,
        hooks: &RunHooks<'_>,
    ) -> Result<SimulationResult, ModelError> {
        let total = self.params.years;
        let annual_losses = if parallel {
            let completed = AtomicUsize::new(0);
            let drawn: Vec<Option<f64>> = (0..total as u64)
                .into_par_iter()
                .map(|year| {
                    if hooks.cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                        return None;
                    }
                    let loss = self.simulate_year(year);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(progress) = hooks.progress {
                        progress(done, total);
                    }
                    Some(loss)
                })
                .collect();
            if drawn.iter().any(|l| l.is_none()) {
                return Err(ModelError::Cancelled {
                    completed: completed.load(Ordering::Relaxed),
                    total,
                });
            }
            drawn.into_iter().flatten().collect()
        } else {
            let mut losses = Vec::with_capacity(total);
            for year in 0..total as u64 {
                if hooks.cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                    return Err(ModelError::Cancelled { completed: losses.len(), total });
                }
                losses.push(self.simulate_year(year));
                if let Some(progress) = hooks.progress {
                    progress(losses.len(), total);
                }
            }
            losses
        };

        Ok(SimulationResult { seed: self.params.seed, years: total, annual_losses })
    }

    /// One ad-hoc storm with full per-property detail, for the map shell.
    /// Uses the caller's RNG so repeated previews differ (or not, seeded).
    pub fn preview_storm(&self, rng: &mut impl Rng) -> StormLoss {
        let storm = self.model.sample_storm(rng);
        storm_impacts(
            &self.portfolio,
            &storm,
            &self.params.vulnerability,
            self.params.footprint_coeff,
        )
    }

    /// Draw a storm without touching the portfolio (for track rendering).
    pub fn draw_storm(&self, rng: &mut impl Rng) -> Storm {
        self.model.sample_storm(rng)
    }
}
