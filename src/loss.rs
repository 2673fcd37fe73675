//! Error functions.
//!
//! The simulator scores one sample at a time with the half squared error
//! `0.5 * (target - output)^2`. It is labelled "MSE" in the log and on screen,
//! but it is never averaged over samples or outputs: with several outputs the
//! per-output terms are summed.

/// Half squared error for a single output.
#[inline]
pub fn mse(target: f64, output: f64) -> f64 {
    let diff = target - output;
    0.5 * diff * diff
}

/// Signed error shown next to the output neuron: `target - output`.
#[inline]
pub fn raw_error(target: f64, output: f64) -> f64 {
    target - output
}

/// Derivative of [`mse`] with respect to `output`.
#[inline]
pub fn mse_grad(target: f64, output: f64) -> f64 {
    output - target
}

/// Sum of [`mse`] over all outputs.
///
/// `targets` may be shorter than `outputs`; missing targets count as `0.0`.
pub fn total_error(targets: &[f64], outputs: &[f64]) -> f64 {
    outputs
        .iter()
        .enumerate()
        .map(|(o, &y)| mse(targets.get(o).copied().unwrap_or(0.0), y))
        .sum()
}
