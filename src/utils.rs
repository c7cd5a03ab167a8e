//! Utility functions for the pursuit crate

use rand::{Rng, SeedableRng, distr::StandardUniform, prelude::IndexedRandom, rngs::StdRng};

use crate::{Error, Result, types::Temperature};

/// Seeded generator, or one seeded from the thread RNG when `seed` is `None`.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Boltzmann (softmax) probabilities for a set of values.
///
/// `P(i) = exp(v_i / τ) / Σ_j exp(v_j / τ)`, computed after subtracting the
/// largest scaled value so large values or small temperatures do not overflow.
/// When `v / τ` itself overflows (a subnormal `τ`), the result is the greedy
/// limit: uniform over the values tied for the maximum.
///
/// # Errors
///
/// Returns [`Error::DegenerateDistribution`] if `values` is empty or any value
/// is not finite.
///
/// # Examples
///
/// ```
/// use pursuit::{types::Temperature, utils::boltzmann_probabilities};
///
/// let tau = Temperature::new(1.0)?;
/// let probs = boltzmann_probabilities(&[0.0, 0.0], tau, "example")?;
/// assert_eq!(probs, vec![0.5, 0.5]);
/// # Ok::<(), pursuit::Error>(())
/// ```
pub fn boltzmann_probabilities(
    values: &[f64],
    temperature: Temperature,
    context: &str,
) -> Result<Vec<f64>> {
    let degenerate = || Error::DegenerateDistribution {
        context: context.to_string(),
    };

    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return Err(degenerate());
    }

    let tau = temperature.value();
    let scaled: Vec<f64> = values.iter().map(|v| v / tau).collect();
    if scaled.iter().any(|s| !s.is_finite()) {
        // τ too small to divide by: the τ → 0 limit is greedy
        return normalize_weights(greedy_weights(values)).ok_or_else(degenerate);
    }
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scaled.iter().map(|s| (s - max).exp()).collect();

    normalize_weights(exps).ok_or_else(degenerate)
}

/// Unit weight on every value tied for the maximum, zero elsewhere.
fn greedy_weights(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|&v| if v == max { 1.0 } else { 0.0 })
        .collect()
}

/// Normalize weights to probabilities that sum to 1.0.
///
/// # Returns
///
/// - `Some(Vec<f64>)` containing normalized probabilities if the total is positive and finite
/// - `None` otherwise
///
/// # Examples
///
/// ```
/// use pursuit::utils::normalize_weights;
///
/// let normalized = normalize_weights(vec![1.0, 2.0, 1.0]).unwrap();
/// assert_eq!(normalized, vec![0.25, 0.5, 0.25]);
///
/// assert_eq!(normalize_weights(vec![0.0, 0.0]), None);
/// ```
pub fn normalize_weights<I>(weights: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let weights: Vec<f64> = weights.into_iter().collect();
    let sum: f64 = weights.iter().sum();

    if weights.is_empty() || !sum.is_finite() || sum <= 0.0 {
        return None;
    }

    Some(weights.iter().map(|w| w / sum).collect())
}

/// Performs weighted random sampling from a collection of items.
///
/// Draws a threshold in `[0, total)` and walks the items, subtracting weights
/// until the threshold is crossed. Zero or negative totals fall back to a
/// uniform choice; the last item is returned if rounding leaves the
/// threshold uncrossed.
///
/// # Examples
///
/// ```
/// use pursuit::utils::weighted_sample;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];
/// let sampled = weighted_sample(&mut rng, &items);
/// assert!(sampled.is_some());
/// ```
pub fn weighted_sample<R, T, W>(rng: &mut R, items: &[(T, W)]) -> Option<T>
where
    R: Rng,
    T: Clone,
    W: Into<f64> + Copy,
{
    if items.is_empty() {
        return None;
    }

    let total: f64 = items.iter().map(|(_, w)| (*w).into()).sum();

    if total <= 0.0 {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut threshold = rng.sample::<f64, _>(StandardUniform) * total;

    for (item, weight) in items {
        let w = (*weight).into();
        if threshold < w {
            return Some(item.clone());
        }
        threshold -= w;
    }

    items.last().map(|(item, _)| item.clone())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn tau(value: f64) -> Temperature {
        Temperature::new(value).unwrap()
    }

    #[test]
    fn test_boltzmann_uniform_for_equal_values() {
        let probs = boltzmann_probabilities(&[3.0; 5], tau(0.2), "test").unwrap();
        for p in probs {
            assert!((p - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_boltzmann_matches_closed_form() {
        let values = [1.0, 0.0];
        let probs = boltzmann_probabilities(&values, tau(0.5), "test").unwrap();
        let expected = 2f64.exp() / (2f64.exp() + 1.0);
        assert!((probs[0] - expected).abs() < 1e-12);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_boltzmann_survives_tiny_temperature() {
        let probs = boltzmann_probabilities(&[10.0, 9.0, -4.0], tau(1e-4), "test").unwrap();
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_boltzmann_falls_back_to_greedy_for_subnormal_temperature() {
        let subnormal = tau(f64::MIN_POSITIVE / 4.0);
        let probs = boltzmann_probabilities(&[1.0, 3.0, -2.0, 3.0], subnormal, "test").unwrap();
        assert_eq!(probs, vec![0.0, 0.5, 0.0, 0.5]);

        let probs = boltzmann_probabilities(&[-1.0, 2.0], tau(5e-324), "test").unwrap();
        assert_eq!(probs, vec![0.0, 1.0]);
    }

    #[test]
    fn test_boltzmann_rejects_non_finite_values() {
        assert!(matches!(
            boltzmann_probabilities(&[f64::NAN, 1.0], tau(1.0), "nan"),
            Err(Error::DegenerateDistribution { .. })
        ));
        assert!(boltzmann_probabilities(&[], tau(1.0), "empty").is_err());
    }

    #[test]
    fn test_weighted_sample_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        let items: Vec<(i32, f64)> = vec![];
        assert_eq!(weighted_sample(&mut rng, &items), None);
    }

    #[test]
    fn test_weighted_sample_skips_zero_weight() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = vec![("a", 0.0), ("b", 1.0), ("c", 0.0)];
        for _ in 0..100 {
            assert_eq!(weighted_sample(&mut rng, &items), Some("b"));
        }
    }

    #[test]
    fn test_weighted_sample_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];

        let mut counts = std::collections::HashMap::new();
        for _ in 0..1000 {
            let sample = weighted_sample(&mut rng, &items).unwrap();
            *counts.entry(sample).or_insert(0) += 1;
        }

        let count_a = counts.get(&"a").copied().unwrap_or(0);
        let count_b = counts.get(&"b").copied().unwrap_or(0);
        let count_c = counts.get(&"c").copied().unwrap_or(0);

        assert!(count_b > count_a, "b should appear more than a");
        assert!(count_b > count_c, "b should appear more than c");
        assert!(count_a > 0 && count_c > 0, "all items should appear");
    }

    #[test]
    fn test_weighted_sample_deterministic() {
        let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];

        let mut rng1 = StdRng::seed_from_u64(12345);
        let result1 = weighted_sample(&mut rng1, &items);

        let mut rng2 = StdRng::seed_from_u64(12345);
        let result2 = weighted_sample(&mut rng2, &items);

        assert_eq!(result1, result2);
    }

    #[test]
    fn test_normalize_weights_returns_none_for_zero_total() {
        assert!(normalize_weights(vec![0.0, 0.0]).is_none());
        assert!(normalize_weights(Vec::new()).is_none());
    }
}
