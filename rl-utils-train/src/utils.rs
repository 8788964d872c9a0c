//! Numeric helpers: advantage estimation and return smoothing

use num_traits::Float;

use rl_utils_core::{RLError, Result};

/// Compute GAE (Generalized Advantage Estimation) from per-step TD errors.
///
/// Walks `td_delta` backwards keeping a running advantage, so that the TD
/// error `k` steps ahead contributes with weight `(gamma * lmbda)^k`. The
/// result has one entry per input step, in the original time order.
pub fn compute_advantage<T: Float>(gamma: T, lmbda: T, td_delta: &[T]) -> Vec<T> {
    let mut advantages = Vec::with_capacity(td_delta.len());
    let mut advantage = T::zero();

    for &delta in td_delta.iter().rev() {
        advantage = gamma * lmbda * advantage + delta;
        advantages.push(advantage);
    }

    advantages.reverse();
    advantages
}

/// Smooth a sequence with a centered moving average.
///
/// Interior points are the mean of a full window. The first and last
/// `window_size / 2` points use the shrinking odd-sized windows `1, 3, 5, …`
/// anchored at the respective end, so the output has the same length as
/// `values`.
///
/// `window_size` must be odd, at least 3, and no larger than `values.len()`.
pub fn moving_average(values: &[f64], window_size: usize) -> Result<Vec<f64>> {
    if window_size < 3 || window_size % 2 == 0 {
        return Err(RLError::invalid_argument(format!(
            "window size must be an odd number >= 3, got {window_size}"
        )));
    }
    if window_size > values.len() {
        return Err(RLError::invalid_argument(format!(
            "window size {window_size} exceeds sequence length {}",
            values.len()
        )));
    }

    let edge = window_size - 1;
    let width = window_size as f64;

    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);
    let mut running = 0.0;
    for &v in values {
        running += v;
        prefix.push(running);
    }

    let mut smoothed = edge_means(values[..edge].iter().copied());
    smoothed.extend(
        prefix
            .windows(window_size + 1)
            .map(|w| (w[window_size] - w[0]) / width),
    );

    let mut tail = edge_means(values.iter().rev().take(edge).copied());
    tail.reverse();
    smoothed.extend(tail);

    Ok(smoothed)
}

/// Running means over the first 1, 3, 5, … items.
fn edge_means(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut means = Vec::new();
    let mut sum: Option<f64> = None;

    for (i, v) in values.enumerate() {
        let total = sum.map_or(v, |s| s + v);
        sum = Some(total);
        if i % 2 == 0 {
            means.push(total / (i + 1) as f64);
        }
    }

    means
}
