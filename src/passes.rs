//! The four training passes.
//!
//! Each pass reads the network's current state and overwrites one group of
//! derived fields (or, for the update pass, the parameters). None of them
//! allocate: every buffer already has the shape `layer_sizes` dictates.
//!
//! Typical cycle, as driven by [`crate::Simulator::advance_phase`]:
//! - `forward_pass`: net inputs and activations, layer by layer
//! - `error_pass`: `raw_error` and `total_error` from the output
//! - `backward_pass`: output gradients, then hidden gradients back to front
//! - `update_pass`: gradient-descent step on every weight and bias, `epoch += 1`

use crate::Network;
use crate::activation::sigmoid_derivative_from_activation;
use crate::loss;

impl Network {
    /// Forward pass for the current inputs.
    ///
    /// The first matrix consumes `inputs`; every later matrix consumes the
    /// activations of the layer before it.
    pub fn forward_pass(&mut self) {
        debug_assert_eq!(self.activations.len(), self.layers.len());
        debug_assert_eq!(self.net_inputs.len(), self.layers.len());

        for (m, layer) in self.layers.iter().enumerate() {
            // Borrow the previous activations immutably and the current ones mutably.
            let (left, right) = self.activations.split_at_mut(m);
            let source: &[f64] = if m == 0 { &self.inputs } else { &left[m - 1] };
            layer.forward(source, &mut self.net_inputs[m], &mut right[0]);
        }
    }

    /// Error pass: `raw_error = target - output[0]` and
    /// `total_error = sum_o 0.5 * (target_o - output_o)^2`.
    pub fn error_pass(&mut self) {
        let output = self.output_activations();
        let first = output.first().copied().unwrap_or(0.0);
        let targets: Vec<f64> = (0..output.len()).map(|o| self.target_at(o)).collect();

        let raw = loss::raw_error(self.target, first);
        let total = loss::total_error(&targets, output);

        self.raw_error = raw;
        self.total_error = total;
    }

    /// Backward pass.
    ///
    /// - output: `d[o] = (a[o] - target_o) * a[o] * (1 - a[o])`
    /// - hidden, last to first: `d[n] = (sum_k d_next[k] * W_next[n][k]) * a[n] * (1 - a[n])`
    pub fn backward_pass(&mut self) {
        let Some(last) = self.layers.len().checked_sub(1) else {
            return;
        };

        for o in 0..self.gradients[last].len() {
            let a = self.activations[last][o];
            let target = self.target_at(o);
            self.gradients[last][o] = loss::mse_grad(target, a) * sigmoid_derivative_from_activation(a);
        }

        for m in (0..last).rev() {
            // Gradients of layer `m + 2` (read-only) feed those of layer `m + 1`.
            let (left, right) = self.gradients.split_at_mut(m + 1);
            self.layers[m + 1].backprop_gradients(&right[0], &self.activations[m], &mut left[m]);
        }
    }

    /// Update pass: one gradient-descent step with `learning_rate`, then
    /// `epoch += 1`.
    ///
    /// Matrix `m` is driven by the gradients of the layer it feeds and by the
    /// activations of its source layer (`inputs` for `m == 0`).
    pub fn update_pass(&mut self) {
        let lr = self.learning_rate;
        for (m, layer) in self.layers.iter_mut().enumerate() {
            let source: &[f64] = if m == 0 {
                &self.inputs
            } else {
                &self.activations[m - 1]
            };
            layer.sgd_step(&self.gradients[m], source, lr);
        }
        self.epoch += 1;
    }
}
