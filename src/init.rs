//! Parameter initialization.
//!
//! The startup network uses fixed constants so the first forward pass always
//! shows the same numbers. Positions introduced later by an architecture
//! change are drawn uniformly from `[-1, 1)`.

use rand::Rng;
use rand::distributions::{Distribution, Uniform};

/// Lower bound (inclusive) of freshly drawn weights and biases.
pub const RANDOM_WEIGHT_LOW: f64 = -1.0;
/// Upper bound (exclusive) of freshly drawn weights and biases.
pub const RANDOM_WEIGHT_HIGH: f64 = 1.0;

pub const DEFAULT_INPUTS: [f64; 2] = [0.1, 0.1];
pub const DEFAULT_TARGET: f64 = 0.1;
pub const DEFAULT_LEARNING_RATE: f64 = 0.2;
/// Value given to input neurons added by an architecture change.
pub const NEW_INPUT_VALUE: f64 = 0.1;

/// `DEFAULT_INPUT_HIDDEN_WEIGHTS[s][t]`: input `s` to hidden neuron `t`.
pub const DEFAULT_INPUT_HIDDEN_WEIGHTS: [[f64; 2]; 2] = [[0.6, -0.1], [-0.3, 0.4]];
pub const DEFAULT_HIDDEN_BIASES: [f64; 2] = [0.3, -0.2];
/// `DEFAULT_HIDDEN_OUTPUT_WEIGHTS[s][t]`: hidden neuron `s` to output `t`.
pub const DEFAULT_HIDDEN_OUTPUT_WEIGHTS: [[f64; 1]; 2] = [[0.4], [-0.5]];
pub const DEFAULT_OUTPUT_BIASES: [f64; 1] = [-0.1];

/// Draw one weight uniformly from `[RANDOM_WEIGHT_LOW, RANDOM_WEIGHT_HIGH)`.
#[inline]
pub fn random_weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    Uniform::new(RANDOM_WEIGHT_LOW, RANDOM_WEIGHT_HIGH).sample(rng)
}
