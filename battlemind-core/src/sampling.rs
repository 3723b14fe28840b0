//! Temperature-scaled stochastic selection.
//!
//! Both goal choice and the final action pick use genuine Boltzmann
//! (softmax) sampling rather than argmax — deliberate non-determinism
//! keeps play varied and harder to model. The RNG is injected so tests
//! can pin the outcome with a fixed seed.

use rand::Rng;

/// Draw one index from `weights` with probability proportional to
/// `exp(w / temperature)`.
///
/// Entries are shifted by the maximum weight before exponentiation so low
/// temperatures cannot overflow. Returns `None` for an empty slice.
pub fn boltzmann_index<R: Rng + ?Sized>(
    weights: &[f64],
    temperature: f64,
    rng: &mut R,
) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    if weights.len() == 1 {
        return Some(0);
    }

    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scaled: Vec<f64> = weights
        .iter()
        .map(|w| ((w - max) / temperature).exp())
        .collect();
    let total: f64 = scaled.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        // Degenerate temperatures collapse to argmax.
        return weights
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i);
    }

    let mut draw = rng.r#gen::<f64>() * total;
    for (i, p) in scaled.iter().enumerate() {
        draw -= p;
        if draw <= 0.0 {
            return Some(i);
        }
    }
    Some(scaled.len() - 1)
}

/// Boltzmann-sample one item from `(item, weight)` pairs.
pub fn boltzmann_pick<'a, T, R: Rng + ?Sized>(
    entries: &'a [(T, f64)],
    temperature: f64,
    rng: &mut R,
) -> Option<&'a T> {
    let weights: Vec<f64> = entries.iter().map(|(_, w)| *w).collect();
    boltzmann_index(&weights, temperature, rng).map(|i| &entries[i].0)
}
