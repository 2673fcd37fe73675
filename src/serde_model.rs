//! JSON import/export (feature: `serde`).
//!
//! Parameters use a versioned format that is independent of the in-memory
//! layout: architecture is implied by the weight shapes, and computed values,
//! epoch and errors are not stored. Every import is validated against the
//! simulator's architecture limits before a `Network` is built.
//!
//! The training log exports as-is (full snapshots) for the audit view.

use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;
use crate::network::{MAX_HIDDEN_LAYERS, MAX_INPUTS, MAX_NEURONS_PER_LAYER};
use crate::{Error, Layer, Network, Result, TrainingLog};

pub const NETWORK_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub format_version: u32,
    pub inputs: Vec<f64>,
    pub target: f64,
    pub learning_rate: f64,
    pub layers: Vec<SerializedLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedLayer {
    /// `weights[s][t]`: source neuron `s` to target neuron `t`.
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl SerializedNetwork {
    pub fn validate(&self) -> Result<()> {
        if self.format_version != NETWORK_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported network format_version {}; expected {}",
                self.format_version, NETWORK_FORMAT_VERSION
            )));
        }

        let hidden = self.layers.len().saturating_sub(1);
        if !(1..=MAX_HIDDEN_LAYERS).contains(&hidden) {
            return Err(Error::InvalidData(format!(
                "network must have 1..={MAX_HIDDEN_LAYERS} hidden layers, got {hidden}"
            )));
        }
        if !(1..=MAX_INPUTS).contains(&self.inputs.len()) {
            return Err(Error::InvalidData(format!(
                "input count must be in 1..={MAX_INPUTS}, got {}",
                self.inputs.len()
            )));
        }

        let mut in_dim = self.inputs.len();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.len() != in_dim {
                return Err(Error::InvalidData(format!(
                    "layer {i} has {} weight rows, expected {in_dim}",
                    layer.weights.len()
                )));
            }
            let out_dim = layer.biases.len();
            if out_dim == 0 {
                return Err(Error::InvalidData(format!("layer {i} has no neurons")));
            }
            if i < hidden && out_dim > MAX_NEURONS_PER_LAYER {
                return Err(Error::InvalidData(format!(
                    "hidden layer {i} has {out_dim} neurons, max is {MAX_NEURONS_PER_LAYER}"
                )));
            }
            if let Some(row) = layer.weights.iter().position(|r| r.len() != out_dim) {
                return Err(Error::InvalidData(format!(
                    "layer {i} weight row {row} has len {}, expected {out_dim}",
                    layer.weights[row].len()
                )));
            }
            if layer.weights.iter().flatten().any(|v| !v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "layer {i} weights must contain only finite values"
                )));
            }
            if layer.biases.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "layer {i} biases must contain only finite values"
                )));
            }
            in_dim = out_dim;
        }

        let mut scalars = self.inputs.iter().chain([&self.target, &self.learning_rate]);
        if scalars.any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "inputs, target and learning_rate must be finite".to_owned(),
            ));
        }

        Ok(())
    }
}

impl From<&Network> for SerializedNetwork {
    fn from(net: &Network) -> Self {
        Self {
            format_version: NETWORK_FORMAT_VERSION,
            inputs: net.inputs().to_vec(),
            target: net.target(),
            learning_rate: net.learning_rate(),
            layers: net.layers().iter().map(SerializedLayer::from).collect(),
        }
    }
}

impl From<&Layer> for SerializedLayer {
    fn from(layer: &Layer) -> Self {
        Self {
            weights: layer.weights().to_rows(),
            biases: layer.biases().to_vec(),
        }
    }
}

impl TryFrom<SerializedNetwork> for Network {
    type Error = Error;

    fn try_from(value: SerializedNetwork) -> std::result::Result<Self, Self::Error> {
        value.validate()?;

        let mut layers = Vec::with_capacity(value.layers.len());
        for (i, layer) in value.layers.into_iter().enumerate() {
            let weights = Matrix::from_rows(&layer.weights)
                .ok_or_else(|| Error::InvalidData(format!("layer {i} weights are ragged")))?;
            let l = Layer::from_parts(weights, layer.biases).ok_or_else(|| {
                Error::InvalidData(format!("layer {i} biases do not match weight columns"))
            })?;
            layers.push(l);
        }

        Ok(Network::from_layers(
            layers,
            value.inputs,
            value.target,
            value.learning_rate,
        ))
    }
}

impl Network {
    /// Serialize parameters to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&SerializedNetwork::from(self))
            .map_err(|e| Error::InvalidData(format!("failed to serialize network: {e}")))
    }

    /// Serialize parameters to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&SerializedNetwork::from(self))
            .map_err(|e| Error::InvalidData(format!("failed to serialize network: {e}")))
    }

    /// Parse a network from parameter JSON. Computed values start at zero.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedNetwork = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse network json: {e}")))?;
        ser.try_into()
    }
}

impl TrainingLog {
    /// Every entry, oldest first, as pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let entries: Vec<_> = self.iter().collect();
        serde_json::to_string_pretty(&entries)
            .map_err(|e| Error::InvalidData(format!("failed to serialize training log: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;

    #[test]
    fn golden_json_is_stable_and_roundtrips() {
        let json = Network::default().to_json_string_pretty().unwrap();

        let golden = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/golden/network_v1.json"
        ))
        .trim_end();
        assert_eq!(json, golden);

        let loaded = Network::from_json_str(golden).unwrap();
        assert_eq!(loaded, Network::default());
    }

    #[test]
    fn import_drops_training_progress() {
        let mut net = Network::default();
        net.forward_pass();
        net.error_pass();
        net.backward_pass();
        net.update_pass();

        let loaded = Network::from_json_str(&net.to_json_string().unwrap()).unwrap();
        assert_eq!(loaded.layers(), net.layers());
        assert_eq!(loaded.epoch(), 0);
        assert!(loaded.output_activations().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn rejects_unknown_version() {
        let bad = r#"{"format_version":999,"inputs":[0.1],"target":0.1,"learning_rate":0.2,"layers":[]}"#;
        let err = Network::from_json_str(bad).unwrap_err();
        assert!(format!("{err}").contains("format_version"));
    }

    #[test]
    fn rejects_inconsistent_shapes() {
        let mut ser = SerializedNetwork::from(&Network::default());
        ser.layers[1].weights.pop();
        assert!(Network::try_from(ser).is_err());

        let mut ser = SerializedNetwork::from(&Network::default());
        ser.layers[0].weights[1].push(0.5);
        assert!(Network::try_from(ser).is_err());

        let mut ser = SerializedNetwork::from(&Network::default());
        ser.inputs.push(0.1);
        assert!(Network::try_from(ser).is_err());

        let mut ser = SerializedNetwork::from(&Network::default());
        ser.layers[0].biases[0] = f64::NAN;
        assert!(Network::try_from(ser).is_err());
    }

    #[test]
    fn log_export_lists_phases_in_order() {
        let mut log = TrainingLog::default();
        let net = Network::default();
        log.append(&net, Phase::Forward);
        log.append(&net, Phase::Error);

        let json = log.to_json_string_pretty().unwrap();
        let values: serde_json::Value = serde_json::from_str(&json).unwrap();
        let phases: Vec<&str> = values
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["phase"].as_str().unwrap())
            .collect();
        assert_eq!(phases, vec!["FORWARD", "ERROR"]);
    }
}
