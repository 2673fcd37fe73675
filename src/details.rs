//! Per-neuron and per-weight lookups for tooltips and edit popovers.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::Network;

#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Input,
    Hidden,
    Output,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronDetails {
    pub kind: LayerKind,
    /// Position in `layer_sizes`.
    pub layer: usize,
    pub index: usize,
    /// Input value for input neurons, activation otherwise.
    pub value: f64,
    pub net_input: Option<f64>,
    pub gradient: Option<f64>,
    pub bias: Option<f64>,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WeightDetails {
    pub matrix: usize,
    pub source_kind: LayerKind,
    pub target_kind: LayerKind,
    pub source_index: usize,
    pub target_index: usize,
    pub value: f64,
}

impl Network {
    /// Kind of layer `layer` (an index into `layer_sizes`).
    pub fn layer_kind(&self, layer: usize) -> Option<LayerKind> {
        let last = self.num_matrices();
        match layer {
            0 => Some(LayerKind::Input),
            l if l < last => Some(LayerKind::Hidden),
            l if l == last => Some(LayerKind::Output),
            _ => None,
        }
    }

    /// Details of neuron `index` in layer `layer`, or `None` if out of range.
    pub fn neuron_details(&self, layer: usize, index: usize) -> Option<NeuronDetails> {
        let kind = self.layer_kind(layer)?;
        if layer == 0 {
            return self.inputs.get(index).map(|&value| NeuronDetails {
                kind,
                layer,
                index,
                value,
                net_input: None,
                gradient: None,
                bias: None,
            });
        }

        let m = layer - 1;
        Some(NeuronDetails {
            kind,
            layer,
            index,
            value: *self.activations[m].get(index)?,
            net_input: self.net_inputs[m].get(index).copied(),
            gradient: self.gradients[m].get(index).copied(),
            bias: self.layers[m].biases().get(index).copied(),
        })
    }

    /// Details of `weights[matrix][source][target]`, or `None` if out of range.
    pub fn weight_details(
        &self,
        matrix: usize,
        source: usize,
        target: usize,
    ) -> Option<WeightDetails> {
        let value = self.weights(matrix)?.get(source, target)?;
        Some(WeightDetails {
            matrix,
            source_kind: self.layer_kind(matrix)?,
            target_kind: self.layer_kind(matrix + 1)?,
            source_index: source,
            target_index: target,
            value,
        })
    }
}
