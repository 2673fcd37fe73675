use rand::Rng;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::activation::{sigmoid, sigmoid_derivative_from_activation};
use crate::init::random_weight;
use crate::matrix::Matrix;

/// Connections from one layer into the next: a weight matrix plus the biases
/// of the target layer.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Shape `(in_dim, out_dim)`; `weights.get(s, t)` connects source `s` to target `t`.
    weights: Matrix,
    biases: Vec<f64>,
}

impl Layer {
    /// Layer with every weight and bias drawn from `[-1, 1)`.
    pub fn new_with_rng<R: Rng + ?Sized>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let weights = Matrix::from_fn(in_dim, out_dim, |_, _| random_weight(rng));
        let biases = (0..out_dim).map(|_| random_weight(rng)).collect();
        Self { weights, biases }
    }

    /// Assemble a layer from explicit parameters.
    ///
    /// Returns `None` if `biases.len() != weights.cols()`.
    pub fn from_parts(weights: Matrix, biases: Vec<f64>) -> Option<Self> {
        (biases.len() == weights.cols()).then_some(Self { weights, biases })
    }

    /// Unchecked [`Layer::from_parts`] for parameters whose shapes are known to agree.
    #[inline]
    pub(crate) fn with_params(weights: Matrix, biases: Vec<f64>) -> Self {
        debug_assert_eq!(biases.len(), weights.cols());
        Self { weights, biases }
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.weights.rows()
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.weights.cols()
    }

    #[inline]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    #[inline]
    pub(crate) fn weights_mut(&mut self) -> &mut Matrix {
        &mut self.weights
    }

    #[inline]
    pub(crate) fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    /// Forward pass for a single sample.
    ///
    /// Computes, for every target neuron `t`:
    /// - `net_inputs[t] = b[t] + sum_s inputs[s] * W[s][t]`
    /// - `activations[t] = sigmoid(net_inputs[t])`
    ///
    /// Shape contract:
    /// - `inputs.len() == self.in_dim()`
    /// - `net_inputs.len() == activations.len() == self.out_dim()`
    #[inline]
    pub fn forward(&self, inputs: &[f64], net_inputs: &mut [f64], activations: &mut [f64]) {
        debug_assert_eq!(inputs.len(), self.in_dim());
        debug_assert_eq!(net_inputs.len(), self.out_dim());
        debug_assert_eq!(activations.len(), self.out_dim());

        net_inputs.copy_from_slice(&self.biases);
        for (s, &x) in inputs.iter().enumerate() {
            for (net, &w) in net_inputs.iter_mut().zip(self.weights.row(s)) {
                *net += x * w;
            }
        }
        for (a, &z) in activations.iter_mut().zip(net_inputs.iter()) {
            *a = sigmoid(z);
        }
    }

    /// Propagate gradients from this layer's targets back to its sources.
    ///
    /// For each source neuron `n`:
    /// `d_sources[n] = (sum_k d_targets[k] * W[n][k]) * a[n] * (1 - a[n])`
    /// where `a` are the source activations.
    ///
    /// Overwrites `d_sources`.
    #[inline]
    pub fn backprop_gradients(
        &self,
        d_targets: &[f64],
        source_activations: &[f64],
        d_sources: &mut [f64],
    ) {
        debug_assert_eq!(d_targets.len(), self.out_dim());
        debug_assert_eq!(source_activations.len(), self.in_dim());
        debug_assert_eq!(d_sources.len(), self.in_dim());

        for (n, (d, &a)) in d_sources.iter_mut().zip(source_activations).enumerate() {
            let weighted: f64 = self
                .weights
                .row(n)
                .iter()
                .zip(d_targets)
                .map(|(&w, &g)| g * w)
                .sum();
            *d = weighted * sigmoid_derivative_from_activation(a);
        }
    }

    /// Gradient-descent step driven by the target-side gradients.
    ///
    /// - `W[s][t] -= lr * d_targets[t] * source_activations[s]`
    /// - `b[t] -= lr * d_targets[t]`
    #[inline]
    pub fn sgd_step(&mut self, d_targets: &[f64], source_activations: &[f64], lr: f64) {
        debug_assert_eq!(d_targets.len(), self.out_dim());
        debug_assert_eq!(source_activations.len(), self.in_dim());

        for (s, &x) in source_activations.iter().enumerate() {
            for (w, &g) in self.weights.row_mut(s).iter_mut().zip(d_targets) {
                *w -= lr * g * x;
            }
        }
        for (b, &g) in self.biases.iter_mut().zip(d_targets) {
            *b -= lr * g;
        }
    }

    /// Reshape to `(in_dim, out_dim)`, keeping every weight and bias whose index
    /// survives and drawing new positions from `[-1, 1)`.
    pub fn resized<R: Rng + ?Sized>(&self, in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let weights = self.weights.resized(in_dim, out_dim, || random_weight(rng));
        let biases = (0..out_dim)
            .map(|t| match self.biases.get(t) {
                Some(&b) => b,
                None => random_weight(rng),
            })
            .collect();
        Self { weights, biases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn hidden_layer() -> Layer {
        let weights = Matrix::from_rows(&[[0.6, -0.1], [-0.3, 0.4]]).unwrap();
        Layer::from_parts(weights, vec![0.3, -0.2]).unwrap()
    }

    #[test]
    fn forward_computes_net_inputs_and_sigmoid() {
        let layer = hidden_layer();
        let mut net = [0.0; 2];
        let mut act = [0.0; 2];
        layer.forward(&[0.1, 0.1], &mut net, &mut act);

        assert!((net[0] - 0.33).abs() < 1e-12);
        assert!((net[1] + 0.17).abs() < 1e-12);
        assert!((act[0] - 0.5818).abs() < 1e-3);
        assert!((act[1] - 0.4576).abs() < 1e-3);
    }

    #[test]
    fn backprop_weights_target_gradients_by_outgoing_weights() {
        let layer = Layer::from_parts(Matrix::from_rows(&[[0.4], [-0.5]]).unwrap(), vec![-0.1])
            .unwrap();
        let mut d = [0.0; 2];
        layer.backprop_gradients(&[0.2], &[0.5, 0.25], &mut d);

        assert!((d[0] - 0.2 * 0.4 * 0.25).abs() < 1e-12);
        assert!((d[1] - 0.2 * -0.5 * 0.1875).abs() < 1e-12);
    }

    #[test]
    fn sgd_step_moves_against_gradient() {
        let mut layer = hidden_layer();
        layer.sgd_step(&[0.5, -1.0], &[0.1, 0.2], 0.2);

        let w = layer.weights();
        assert!((w.get(0, 0).unwrap() - (0.6 - 0.2 * 0.5 * 0.1)).abs() < 1e-12);
        assert!((w.get(1, 1).unwrap() - (0.4 + 0.2 * 1.0 * 0.2)).abs() < 1e-12);
        assert!((layer.biases()[0] - (0.3 - 0.2 * 0.5)).abs() < 1e-12);
        assert!((layer.biases()[1] - (-0.2 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn resize_preserves_surviving_parameters() {
        let layer = hidden_layer();
        let mut rng = StdRng::seed_from_u64(3);

        let grown = layer.resized(3, 4, &mut rng);
        assert_eq!((grown.in_dim(), grown.out_dim()), (3, 4));
        assert_eq!(grown.biases().len(), 4);
        for s in 0..2 {
            for t in 0..2 {
                assert_eq!(grown.weights().get(s, t), layer.weights().get(s, t));
            }
        }
        assert!(grown.biases()[2..].iter().all(|b| (-1.0..1.0).contains(b)));

        let back = grown.resized(2, 2, &mut rng);
        assert_eq!(back, layer);
    }

    #[test]
    fn from_parts_rejects_bias_mismatch() {
        assert!(Layer::from_parts(Matrix::zeros(2, 3), vec![0.0; 2]).is_none());
    }
}
