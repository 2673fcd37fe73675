//! Network builder.
//!
//! `NetworkBuilder` makes the architecture explicit (input count, hidden
//! layer sizes, output count) and validates it against the simulator's
//! limits. Parameters are drawn from `[-1, 1)`; individual weights and biases
//! can be pinned afterwards with [`Network::set_weight`] / [`Network::set_bias`].
//!
//! [`Network::default`] is the fixed startup scenario and does not go through
//! the builder.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::init::{DEFAULT_LEARNING_RATE, DEFAULT_TARGET, NEW_INPUT_VALUE};
use crate::network::{MAX_HIDDEN_LAYERS, MAX_INPUTS, MAX_NEURONS_PER_LAYER};
use crate::{Error, Layer, Network, Result};

#[derive(Debug, Clone)]
/// Builder for a `Network`.
///
/// Example:
///
/// ```rust
/// use backprop_sim::NetworkBuilder;
///
/// # fn main() -> backprop_sim::Result<()> {
/// let net = NetworkBuilder::new(3)?
///     .add_hidden_layer(4)?
///     .add_hidden_layer(2)?
///     .target(0.8)
///     .build_with_seed(0)?;
/// assert_eq!(net.layer_sizes(), vec![3, 4, 2, 1]);
/// # Ok(())
/// # }
/// ```
pub struct NetworkBuilder {
    input_count: usize,
    hidden_layers: Vec<usize>,
    output_count: usize,
    inputs: Option<Vec<f64>>,
    target: f64,
    learning_rate: f64,
}

impl NetworkBuilder {
    /// Start building a network with `input_count` inputs and one output.
    pub fn new(input_count: usize) -> Result<Self> {
        if !(1..=MAX_INPUTS).contains(&input_count) {
            return Err(Error::InvalidConfig(format!(
                "input_count must be in 1..={MAX_INPUTS}, got {input_count}"
            )));
        }
        Ok(Self {
            input_count,
            hidden_layers: Vec::new(),
            output_count: 1,
            inputs: None,
            target: DEFAULT_TARGET,
            learning_rate: DEFAULT_LEARNING_RATE,
        })
    }

    /// Append a hidden layer with `size` neurons.
    pub fn add_hidden_layer(mut self, size: usize) -> Result<Self> {
        if !(1..=MAX_NEURONS_PER_LAYER).contains(&size) {
            return Err(Error::InvalidConfig(format!(
                "hidden layer size must be in 1..={MAX_NEURONS_PER_LAYER}, got {size}"
            )));
        }
        if self.hidden_layers.len() == MAX_HIDDEN_LAYERS {
            return Err(Error::InvalidConfig(format!(
                "at most {MAX_HIDDEN_LAYERS} hidden layers are supported"
            )));
        }
        self.hidden_layers.push(size);
        Ok(self)
    }

    /// Number of output neurons. Only output `0` has a target; the rest train
    /// towards `0.0`.
    pub fn output_count(mut self, output_count: usize) -> Result<Self> {
        if output_count == 0 {
            return Err(Error::InvalidConfig("output_count must be > 0".to_owned()));
        }
        self.output_count = output_count;
        Ok(self)
    }

    /// Input values. Defaults to `0.1` for every input.
    pub fn inputs(mut self, inputs: Vec<f64>) -> Result<Self> {
        if inputs.len() != self.input_count {
            return Err(Error::InvalidConfig(format!(
                "inputs length {} does not match input_count {}",
                inputs.len(),
                self.input_count
            )));
        }
        self.inputs = Some(inputs);
        Ok(self)
    }

    pub fn target(mut self, target: f64) -> Self {
        self.target = target;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Build using a deterministic seed.
    pub fn build_with_seed(self, seed: u64) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_with_rng(&mut rng)
    }

    /// Build using the provided RNG.
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Network> {
        if self.hidden_layers.is_empty() {
            return Err(Error::InvalidConfig(
                "network must have at least one hidden layer".to_owned(),
            ));
        }

        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.input_count);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(self.output_count);

        let layers = sizes
            .windows(2)
            .map(|w| Layer::new_with_rng(w[0], w[1], rng))
            .collect();
        let inputs = self
            .inputs
            .unwrap_or_else(|| vec![NEW_INPUT_VALUE; self.input_count]);

        Ok(Network::from_layers(
            layers,
            inputs,
            self.target,
            self.learning_rate,
        ))
    }
}
