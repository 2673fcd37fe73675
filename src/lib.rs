//! A step-by-step backpropagation simulator.
//!
//! `backprop-sim` is the engine behind an interactive backprop walkthrough. It
//! trains one small sigmoid MLP (1-5 inputs, 1-4 hidden layers of 1-5 neurons,
//! one output) a single phase at a time, so a UI can show every intermediate
//! value.
//!
//! # Design goals
//!
//! - Visible state: every net input, activation and gradient is kept on the
//!   [`Network`] and snapshotted into the [`TrainingLog`] after each phase.
//! - Total commands: architecture requests are clamped, stale edits are
//!   ignored, nothing in the command path returns an error.
//! - Fixed phase order: FORWARD, ERROR, BACKWARD, UPDATE, repeating.
//!
//! # Layers of API
//!
//! - [`Network`]: the data model plus the four passes
//!   ([`Network::forward_pass`], [`Network::error_pass`],
//!   [`Network::backward_pass`], [`Network::update_pass`]).
//! - [`Simulator`]: owns a network, its [`Phase`] and its log; the synchronous
//!   command/query surface.
//! - [`Session`]: a shared simulator plus timed autoplay (needs a Tokio runtime).
//!
//! # Data layout
//!
//! - Scalars are `f64`.
//! - `weights(m)` is a `layer_sizes[m] x layer_sizes[m + 1]` [`Matrix`];
//!   `get(s, t)` is the weight from source `s` to target `t`.
//! - `biases(m)` belongs to layer `m + 1`.
//!
//! # Quick start
//!
//! ```rust
//! use backprop_sim::{Phase, PhaseFilter, Simulator};
//!
//! let mut sim = Simulator::default();
//! for _ in 0..4 {
//!     sim.advance_phase();
//! }
//! assert_eq!(sim.phase(), Phase::Update);
//! assert_eq!(sim.network().epoch(), 1);
//!
//! let errors: Vec<f64> = sim
//!     .log_entries(PhaseFilter::Only(Phase::Error))
//!     .map(|e| e.network().total_error())
//!     .collect();
//! assert_eq!(errors.len(), 1);
//! ```
//!
//! # Driving the passes yourself
//!
//! ```rust
//! use backprop_sim::Network;
//!
//! let mut net = Network::default();
//! net.forward_pass();
//! let hidden = &net.hidden_activations()[0];
//! assert!((hidden[0] - 0.5818).abs() < 1e-3);
//!
//! net.error_pass();
//! net.backward_pass();
//! net.update_pass();
//! assert_eq!(net.epoch(), 1);
//! ```

pub mod activation;
pub mod autoplay;
pub mod builder;
pub mod details;
pub mod error;
pub mod init;
pub mod layer;
pub mod loss;
pub mod matrix;
pub mod network;
mod passes;
pub mod phase;
pub mod session;
pub mod simulator;
pub mod training_log;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use autoplay::{AutoplayHandle, AutoplayPlan, SharedSimulator};
pub use builder::NetworkBuilder;
pub use details::{LayerKind, NeuronDetails, WeightDetails};
pub use error::{Error, Result};
pub use layer::Layer;
pub use matrix::Matrix;
pub use network::Network;
pub use phase::{Phase, PhaseFilter};
pub use session::Session;
pub use simulator::{SimConfig, Simulator};
pub use training_log::{LogEntry, TrainingLog};
