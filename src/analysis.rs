use serde::Serialize;

/// Distribution summary for a sample of annual losses.
#[derive(Debug, Clone, Serialize)]
pub struct LossSummary {
    pub n: usize,
    pub min: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
    /// Expected annual loss.
    pub mean: f64,
    pub std_dev: f64,
}

/// One point of the exceedance curve: in any simulated year, annual loss was
/// >= `loss` with empirical probability `probability`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExceedancePoint {
    pub loss: f64,
    pub probability: f64,
}

fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Empirical quantile with linear interpolation between order statistics.
/// `values` must already be sorted ascending.
fn interp(values: &[f64], p: f64) -> f64 {
    let n = values.len();
    let h = p * (n - 1) as f64;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    values[lo] * (1.0 - frac) + values[hi] * frac
}

/// Empirical p-quantile of an unsorted sample. None on an empty sample or
/// when `p` is outside [0, 1].
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    Some(interp(&sorted_ascending(values), p))
}

/// Value at Risk at confidence `p`: the p-quantile of annual losses
/// (e.g. p = 0.99 for the 99% VaR).
pub fn value_at_risk(losses: &[f64], p: f64) -> Option<f64> {
    quantile(losses, p)
}

/// Fraction of years with loss strictly above `threshold`.
pub fn prob_exceeding(losses: &[f64], threshold: f64) -> f64 {
    if losses.is_empty() {
        return 0.0;
    }
    losses.iter().filter(|&&l| l > threshold).count() as f64 / losses.len() as f64
}

/// Summarise a sample. None when empty.
pub fn summarise(values: &[f64]) -> Option<LossSummary> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted_ascending(values);
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = if n > 1 {
        sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };
    Some(LossSummary {
        n,
        min: sorted[0],
        p50: interp(&sorted, 0.50),
        p95: interp(&sorted, 0.95),
        p99: interp(&sorted, 0.99),
        max: sorted[n - 1],
        mean,
        std_dev: variance.sqrt(),
    })
}

/// The primary analytical output: annual losses sorted descending, the i-th
/// largest (0-based) paired with probability `(i + 1) / N` — the fraction of
/// simulated years at least as severe. Probabilities step from 1/N to 1.
pub fn exceedance_curve(losses: &[f64]) -> Vec<ExceedancePoint> {
    let mut sorted = losses.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, loss)| ExceedancePoint { loss, probability: (i + 1) as f64 / n as f64 })
        .collect()
}

/// Loss level exceeded once in `years` years on average, read off the curve
/// (e.g. 100 → the 1-in-100-year loss). None if the curve cannot resolve
/// that return period.
pub fn return_period_loss(losses: &[f64], years: f64) -> Option<f64> {
    if losses.is_empty() || years <= 0.0 {
        return None;
    }
    let p = 1.0 - 1.0 / years;
    if p < 0.0 { None } else { quantile(losses, p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let values = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(quantile(&values, 0.0), Some(0.0));
        assert_eq!(quantile(&values, 1.0), Some(30.0));
        assert_eq!(quantile(&values, 0.5), Some(15.0));
    }

    #[test]
    fn quantile_of_empty_sample_is_none() {
        assert!(quantile(&[], 0.5).is_none());
        assert!(summarise(&[]).is_none());
    }

    #[test]
    fn summary_on_known_sample() {
        let values = [4.0, 1.0, 3.0, 2.0];
        let s = summarise(&values).unwrap();
        assert_eq!(s.n, 4);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.p50, 2.5);
        // Sample std dev of 1..4 = sqrt(5/3).
        assert!((s.std_dev - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn var_is_the_upper_quantile() {
        let losses: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let var99 = value_at_risk(&losses, 0.99).unwrap();
        assert!((var99 - 98.01).abs() < 1e-9, "got {var99}");
    }

    #[test]
    fn prob_exceeding_counts_strictly_above() {
        let losses = [0.0, 5.0, 10.0, 20.0];
        assert_eq!(prob_exceeding(&losses, 10.0), 0.25);
        assert_eq!(prob_exceeding(&losses, -1.0), 1.0);
        assert_eq!(prob_exceeding(&losses, 100.0), 0.0);
        assert_eq!(prob_exceeding(&[], 10.0), 0.0);
    }

    #[test]
    fn curve_probabilities_step_from_one_over_n_to_one() {
        let losses = [3.0, 1.0, 4.0, 1.5, 9.0];
        let curve = exceedance_curve(&losses);
        let n = losses.len();
        assert_eq!(curve.len(), n);
        assert!((curve[0].probability - 1.0 / n as f64).abs() < 1e-12);
        assert!((curve[n - 1].probability - 1.0).abs() < 1e-12);
        for pair in curve.windows(2) {
            assert!(pair[1].probability > pair[0].probability);
        }
    }

    #[test]
    fn curve_losses_non_increasing_as_probability_grows() {
        let losses = [3.0, 1.0, 4.0, 1.5, 9.0, 9.0, 0.0];
        let curve = exceedance_curve(&losses);
        for pair in curve.windows(2) {
            assert!(
                pair[1].loss <= pair[0].loss,
                "losses must be sorted descending along the curve"
            );
        }
    }

    #[test]
    fn curve_top_entry_is_the_worst_year() {
        let losses = [3.0, 1.0, 9.0];
        let curve = exceedance_curve(&losses);
        assert_eq!(curve[0].loss, 9.0);
    }

    #[test]
    fn return_period_loss_reads_the_tail() {
        let losses: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let one_in_100 = return_period_loss(&losses, 100.0).unwrap();
        assert!((one_in_100 - 989.01).abs() < 0.1, "got {one_in_100}");
        assert!(return_period_loss(&losses, 0.0).is_none());
        assert!(return_period_loss(&[], 100.0).is_none());
    }
}
