//! Network data model.
//!
//! A `Network` holds one layered sigmoid MLP together with the values the
//! simulator computes phase by phase. Layer `0` is the input layer; every
//! later layer owns a [`Layer`] (weights into it plus its biases) and one slot
//! in each computed-value vector.
//!
//! Computed values are stored per non-input layer, so index `m` of
//! `net_inputs`, `activations` and `gradients` belongs to layer `m + 1` and is
//! fed by weight matrix `m`. The last slot is the output layer; the others are
//! the hidden layers in order.

use log::{debug, info};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::Layer;
use crate::init::{
    DEFAULT_HIDDEN_BIASES, DEFAULT_HIDDEN_OUTPUT_WEIGHTS, DEFAULT_INPUT_HIDDEN_WEIGHTS,
    DEFAULT_INPUTS, DEFAULT_LEARNING_RATE, DEFAULT_OUTPUT_BIASES, DEFAULT_TARGET,
    NEW_INPUT_VALUE,
};
use crate::matrix::Matrix;

pub const MIN_INPUTS: usize = 1;
pub const MAX_INPUTS: usize = 5;
pub const MIN_NEURONS_PER_LAYER: usize = 1;
pub const MAX_NEURONS_PER_LAYER: usize = 5;
pub const MIN_HIDDEN_LAYERS: usize = 1;
pub const MAX_HIDDEN_LAYERS: usize = 4;

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) input_count: usize,
    pub(crate) hidden_layers: Vec<usize>,
    pub(crate) output_count: usize,

    /// One entry per weight matrix (`layer_sizes().len() - 1`).
    pub(crate) layers: Vec<Layer>,

    pub(crate) inputs: Vec<f64>,
    pub(crate) target: f64,
    pub(crate) learning_rate: f64,

    pub(crate) net_inputs: Vec<Vec<f64>>,
    pub(crate) activations: Vec<Vec<f64>>,
    pub(crate) gradients: Vec<Vec<f64>>,

    pub(crate) epoch: u64,
    pub(crate) total_error: f64,
    pub(crate) raw_error: f64,
}

impl Default for Network {
    /// The startup scenario: 2-2-1 with fixed weights, inputs `[0.1, 0.1]`,
    /// target `0.1`, learning rate `0.2`.
    fn default() -> Self {
        let layers = vec![
            Layer::with_params(
                Matrix::from_fn(2, 2, |s, t| DEFAULT_INPUT_HIDDEN_WEIGHTS[s][t]),
                DEFAULT_HIDDEN_BIASES.to_vec(),
            ),
            Layer::with_params(
                Matrix::from_fn(2, 1, |s, t| DEFAULT_HIDDEN_OUTPUT_WEIGHTS[s][t]),
                DEFAULT_OUTPUT_BIASES.to_vec(),
            ),
        ];

        Self::from_layers(
            layers,
            DEFAULT_INPUTS.to_vec(),
            DEFAULT_TARGET,
            DEFAULT_LEARNING_RATE,
        )
    }
}

impl Network {
    /// Assemble a network from consecutive layers.
    ///
    /// The caller guarantees `layers` is non-empty, chains (`out_dim` of one
    /// equals `in_dim` of the next) and that `inputs.len()` equals the first
    /// layer's `in_dim`. [`crate::NetworkBuilder`] and the JSON loader check this.
    pub(crate) fn from_layers(
        layers: Vec<Layer>,
        inputs: Vec<f64>,
        target: f64,
        learning_rate: f64,
    ) -> Self {
        debug_assert!(!layers.is_empty());
        debug_assert!(layers.windows(2).all(|w| w[0].out_dim() == w[1].in_dim()));

        let input_count = layers.first().map_or(inputs.len(), Layer::in_dim);
        debug_assert_eq!(inputs.len(), input_count);

        let output_count = layers.last().map_or(0, Layer::out_dim);
        let hidden_layers = layers
            .iter()
            .take(layers.len().saturating_sub(1))
            .map(Layer::out_dim)
            .collect();

        let mut net = Self {
            input_count,
            hidden_layers,
            output_count,
            layers,
            inputs,
            target,
            learning_rate,
            net_inputs: Vec::new(),
            activations: Vec::new(),
            gradients: Vec::new(),
            epoch: 0,
            total_error: 0.0,
            raw_error: 0.0,
        };
        net.zero_computed();
        net
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[inline]
    pub fn hidden_layers(&self) -> &[usize] {
        &self.hidden_layers
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// `[input_count] ++ hidden_layers ++ [output_count]`.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.input_count);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(self.output_count);
        sizes
    }

    /// Number of weight matrices (`layer_sizes().len() - 1`).
    #[inline]
    pub fn num_matrices(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Weight matrix `m`, shape `layer_sizes[m] x layer_sizes[m + 1]`.
    #[inline]
    pub fn weights(&self, m: usize) -> Option<&Matrix> {
        self.layers.get(m).map(Layer::weights)
    }

    /// Biases of layer `m + 1`.
    #[inline]
    pub fn biases(&self, m: usize) -> Option<&[f64]> {
        self.layers.get(m).map(Layer::biases)
    }

    #[inline]
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Target for output `o`. Only output `0` has a configured target; the
    /// rest default to `0.0`.
    #[inline]
    pub fn target_at(&self, o: usize) -> f64 {
        if o == 0 { self.target } else { 0.0 }
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Half squared error from the latest error pass.
    #[inline]
    pub fn total_error(&self) -> f64 {
        self.total_error
    }

    /// `target - output` from the latest error pass.
    #[inline]
    pub fn raw_error(&self) -> f64 {
        self.raw_error
    }

    #[inline]
    pub fn hidden_net_inputs(&self) -> &[Vec<f64>] {
        hidden_part(&self.net_inputs)
    }

    #[inline]
    pub fn hidden_activations(&self) -> &[Vec<f64>] {
        hidden_part(&self.activations)
    }

    #[inline]
    pub fn hidden_gradients(&self) -> &[Vec<f64>] {
        hidden_part(&self.gradients)
    }

    #[inline]
    pub fn output_net_inputs(&self) -> &[f64] {
        output_part(&self.net_inputs)
    }

    #[inline]
    pub fn output_activations(&self) -> &[f64] {
        output_part(&self.activations)
    }

    #[inline]
    pub fn output_gradients(&self) -> &[f64] {
        output_part(&self.gradients)
    }

    /// Change the architecture in place.
    ///
    /// Counts are clamped: `input_count` and every hidden size to `1..=5`, the
    /// hidden-layer list to at most 4 entries (an empty list becomes `[1]`).
    /// Weights and biases keep their value wherever `(matrix, row, col)` /
    /// `(matrix, index)` still exists; new positions are drawn from `[-1, 1)`.
    /// Existing inputs are kept by index and new ones start at `0.1`.
    /// Computed vectors are zeroed to the new shapes; epoch, errors, target and
    /// learning rate are untouched.
    pub fn resize_architecture<R: Rng + ?Sized>(
        &mut self,
        input_count: usize,
        hidden_layers: &[usize],
        rng: &mut R,
    ) {
        let input_count = input_count.clamp(MIN_INPUTS, MAX_INPUTS);
        let mut hidden: Vec<usize> = hidden_layers
            .iter()
            .take(MAX_HIDDEN_LAYERS)
            .map(|&n| n.clamp(MIN_NEURONS_PER_LAYER, MAX_NEURONS_PER_LAYER))
            .collect();
        if hidden.len() < MIN_HIDDEN_LAYERS {
            hidden.resize(MIN_HIDDEN_LAYERS, MIN_NEURONS_PER_LAYER);
        }

        self.input_count = input_count;
        self.hidden_layers = hidden;

        let sizes = self.layer_sizes();
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(m, w)| match self.layers.get(m) {
                Some(old) => old.resized(w[0], w[1], rng),
                None => Layer::new_with_rng(w[0], w[1], rng),
            })
            .collect();
        self.layers = layers;

        self.inputs.resize(input_count, NEW_INPUT_VALUE);
        self.zero_computed();

        info!(
            inputs = self.input_count,
            outputs = self.output_count;
            "architecture resized to {:?}",
            sizes
        );
    }

    /// Set input `index`. Out-of-range indices are ignored.
    pub fn set_input(&mut self, index: usize, value: f64) {
        match self.inputs.get_mut(index) {
            Some(x) => *x = value,
            None => debug!(index = index; "ignoring input edit out of range"),
        }
    }

    pub fn set_target(&mut self, value: f64) {
        self.target = value;
    }

    pub fn set_learning_rate(&mut self, value: f64) {
        self.learning_rate = value;
    }

    /// Set `weights[matrix][source][target]`. Out-of-range indices are ignored.
    pub fn set_weight(&mut self, matrix: usize, source: usize, target: usize, value: f64) {
        let applied = self
            .layers
            .get_mut(matrix)
            .is_some_and(|l| l.weights_mut().set(source, target, value));
        if !applied {
            debug!(
                matrix = matrix,
                source = source,
                target = target;
                "ignoring weight edit out of range"
            );
        }
    }

    /// Set `biases[layer][index]`. Out-of-range indices are ignored.
    pub fn set_bias(&mut self, layer: usize, index: usize, value: f64) {
        match self
            .layers
            .get_mut(layer)
            .and_then(|l| l.biases_mut().get_mut(index))
        {
            Some(b) => *b = value,
            None => debug!(layer = layer, index = index; "ignoring bias edit out of range"),
        }
    }

    /// Zero computed vectors, epoch and errors. Parameters, inputs, target and
    /// learning rate are kept.
    pub fn reset(&mut self) {
        self.zero_computed();
        self.epoch = 0;
        self.total_error = 0.0;
        self.raw_error = 0.0;
    }

    fn zero_computed(&mut self) {
        let zeros: Vec<Vec<f64>> = self.layers.iter().map(|l| vec![0.0; l.out_dim()]).collect();
        self.net_inputs = zeros.clone();
        self.activations = zeros.clone();
        self.gradients = zeros;
    }
}

#[inline]
fn hidden_part(per_layer: &[Vec<f64>]) -> &[Vec<f64>] {
    &per_layer[..per_layer.len().saturating_sub(1)]
}

#[inline]
fn output_part(per_layer: &[Vec<f64>]) -> &[f64] {
    per_layer.last().map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_shapes(net: &Network) {
        let sizes = net.layer_sizes();
        assert_eq!(net.num_matrices(), sizes.len() - 1);
        for m in 0..net.num_matrices() {
            let w = net.weights(m).unwrap();
            assert_eq!((w.rows(), w.cols()), (sizes[m], sizes[m + 1]));
            assert_eq!(net.biases(m).unwrap().len(), sizes[m + 1]);
        }
        assert_eq!(net.inputs().len(), net.input_count());
        assert_eq!(net.hidden_activations().len(), net.hidden_layers().len());
        assert_eq!(net.hidden_net_inputs().len(), net.hidden_layers().len());
        assert_eq!(net.hidden_gradients().len(), net.hidden_layers().len());
        for (i, &n) in net.hidden_layers().iter().enumerate() {
            assert_eq!(net.hidden_activations()[i].len(), n);
            assert_eq!(net.hidden_net_inputs()[i].len(), n);
            assert_eq!(net.hidden_gradients()[i].len(), n);
        }
        assert_eq!(net.output_activations().len(), net.output_count());
        assert_eq!(net.output_gradients().len(), net.output_count());
    }

    #[test]
    fn default_scenario_matches_startup_constants() {
        let net = Network::default();
        assert_eq!(net.layer_sizes(), vec![2, 2, 1]);
        assert_eq!(net.inputs(), &[0.1, 0.1]);
        assert_eq!(net.target(), 0.1);
        assert_eq!(net.learning_rate(), 0.2);
        assert_eq!(net.weights(0).unwrap().to_rows(), vec![vec![0.6, -0.1], vec![-0.3, 0.4]]);
        assert_eq!(net.biases(0).unwrap(), &[0.3, -0.2]);
        assert_eq!(net.weights(1).unwrap().to_rows(), vec![vec![0.4], vec![-0.5]]);
        assert_eq!(net.biases(1).unwrap(), &[-0.1]);
        assert_eq!(net.epoch(), 0);
        assert_shapes(&net);
    }

    #[test]
    fn shapes_hold_for_every_architecture() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::default();
        for inputs in 1..=5 {
            for depth in 1..=4 {
                for width in 1..=5 {
                    let hidden: Vec<usize> = (0..depth).map(|i| (width + i) % 5 + 1).collect();
                    net.resize_architecture(inputs, &hidden, &mut rng);
                    assert_eq!(net.input_count(), inputs);
                    assert_eq!(net.hidden_layers(), hidden.as_slice());
                    assert_shapes(&net);
                }
            }
        }
    }

    #[test]
    fn resize_clamps_out_of_range_requests() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut net = Network::default();

        net.resize_architecture(0, &[9, 0, 3, 2, 7, 4], &mut rng);
        assert_eq!(net.input_count(), 1);
        assert_eq!(net.hidden_layers(), &[5, 1, 3, 2]);
        assert_shapes(&net);

        net.resize_architecture(12, &[], &mut rng);
        assert_eq!(net.input_count(), 5);
        assert_eq!(net.hidden_layers(), &[1]);
        assert_shapes(&net);
    }

    #[test]
    fn grow_then_shrink_restores_original_parameters() {
        let mut rng = StdRng::seed_from_u64(2);
        let original = Network::default();
        let mut net = original.clone();

        net.resize_architecture(4, &[5], &mut rng);
        assert_shapes(&net);
        net.resize_architecture(2, &[2], &mut rng);

        assert_eq!(net.layers(), original.layers());
        assert_eq!(net.inputs(), original.inputs());
    }

    #[test]
    fn resize_keeps_inputs_and_training_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = Network::default();
        net.set_input(1, 0.7);
        net.set_target(0.9);
        net.set_learning_rate(0.5);
        net.epoch = 7;
        net.total_error = 0.02;
        net.raw_error = -0.2;
        net.activations[0][0] = 0.5;

        net.resize_architecture(3, &[2, 3], &mut rng);

        assert_eq!(net.inputs(), &[0.1, 0.7, 0.1]);
        assert_eq!(net.target(), 0.9);
        assert_eq!(net.learning_rate(), 0.5);
        assert_eq!(net.epoch(), 7);
        assert_eq!(net.total_error(), 0.02);
        assert_eq!(net.raw_error(), -0.2);
        assert!(net.hidden_activations().iter().flatten().all(|&a| a == 0.0));
        assert!(net.output_activations().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn new_positions_are_drawn_from_unit_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut net = Network::default();
        net.resize_architecture(5, &[5, 5, 5, 5], &mut rng);
        for layer in net.layers() {
            assert!(layer.weights().as_slice().iter().all(|w| (-1.0..1.0).contains(w)));
            assert!(layer.biases().iter().all(|b| (-1.0..1.0).contains(b)));
        }
    }

    #[test]
    fn out_of_range_edits_are_no_ops() {
        let mut net = Network::default();
        let before = net.clone();

        net.set_weight(2, 0, 0, 1.0);
        net.set_weight(0, 2, 0, 1.0);
        net.set_weight(0, 0, 2, 1.0);
        net.set_bias(2, 0, 1.0);
        net.set_bias(1, 1, 1.0);
        net.set_input(2, 1.0);

        assert_eq!(net, before);
    }

    #[test]
    fn in_range_edits_apply() {
        let mut net = Network::default();
        net.set_weight(1, 1, 0, 1.5);
        net.set_bias(0, 1, -0.7);
        net.set_input(0, 0.9);
        net.set_target(-3.0);
        net.set_learning_rate(4.0);

        assert_eq!(net.weights(1).unwrap().get(1, 0), Some(1.5));
        assert_eq!(net.biases(0).unwrap()[1], -0.7);
        assert_eq!(net.inputs()[0], 0.9);
        assert_eq!(net.target(), -3.0);
        assert_eq!(net.learning_rate(), 4.0);
    }

    #[test]
    fn target_at_defaults_extra_outputs_to_zero() {
        let net = Network::default();
        assert_eq!(net.target_at(0), 0.1);
        assert_eq!(net.target_at(3), 0.0);
    }
}
