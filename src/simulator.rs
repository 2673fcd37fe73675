use std::time::Duration;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::training_log::DEFAULT_LOG_CAPACITY;
use crate::{Error, LogEntry, Network, Phase, PhaseFilter, Result, TrainingLog};

/// Interval between autoplay advances.
pub const DEFAULT_AUTOPLAY_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Maximum number of training-log entries kept.
    pub log_capacity: usize,
    /// Time between two autoplay advances.
    pub autoplay_period: Duration,
    /// Seed for parameters drawn on architecture changes. `None` uses entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            autoplay_period: DEFAULT_AUTOPLAY_PERIOD,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.log_capacity == 0 {
            return Err(Error::InvalidConfig("log_capacity must be > 0".to_owned()));
        }
        if self.autoplay_period.is_zero() {
            return Err(Error::InvalidConfig(
                "autoplay_period must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// The training engine: one network, its phase and its log.
///
/// All commands are synchronous and total. Each one completes before the
/// next can start, since they all take `&mut self`.
#[derive(Debug, Clone)]
pub struct Simulator {
    network: Network,
    phase: Phase,
    log: TrainingLog,
    rng: StdRng,
    config: SimConfig,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::with_network(Network::default(), SimConfig::default())
    }
}

impl Simulator {
    /// Simulator on the startup scenario.
    pub fn new(config: SimConfig) -> Result<Self> {
        Self::with_network_checked(Network::default(), config)
    }

    /// Simulator on a caller-provided network.
    pub fn with_network_checked(network: Network, config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_network(network, config))
    }

    fn with_network(network: Network, config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            network,
            phase: Phase::Idle,
            log: TrainingLog::with_capacity(config.log_capacity),
            rng,
            config,
        }
    }

    #[inline]
    pub fn network(&self) -> &Network {
        &self.network
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn log(&self) -> &TrainingLog {
        &self.log
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Log entries matching `filter`, oldest first.
    pub fn log_entries(&self, filter: PhaseFilter) -> impl Iterator<Item = &LogEntry> + Clone {
        self.log.filter(filter)
    }

    /// Run the pass the current phase calls for, move to the next phase and
    /// log a snapshot of the result. Returns the new phase.
    pub fn advance_phase(&mut self) -> Phase {
        match self.phase {
            Phase::Idle | Phase::Update => self.network.forward_pass(),
            Phase::Forward => self.network.error_pass(),
            Phase::Error => self.network.backward_pass(),
            Phase::Backward => self.network.update_pass(),
        }
        let next = self.phase.next();
        self.phase = next;
        self.log.append(&self.network, next);

        debug!(
            phase = next.as_str(),
            epoch = self.network.epoch(),
            total_error = self.network.total_error();
            "advanced phase"
        );
        next
    }

    /// Resize the network (see [`Network::resize_architecture`]) and return to IDLE.
    pub fn set_architecture(&mut self, input_count: usize, hidden_layers: &[usize]) {
        self.network
            .resize_architecture(input_count, hidden_layers, &mut self.rng);
        self.phase = Phase::Idle;
    }

    pub fn set_input(&mut self, index: usize, value: f64) {
        self.network.set_input(index, value);
    }

    pub fn set_target(&mut self, value: f64) {
        self.network.set_target(value);
    }

    pub fn set_learning_rate(&mut self, value: f64) {
        self.network.set_learning_rate(value);
    }

    pub fn set_weight(&mut self, matrix: usize, source: usize, target: usize, value: f64) {
        self.network.set_weight(matrix, source, target, value);
    }

    pub fn set_bias(&mut self, layer: usize, index: usize, value: f64) {
        self.network.set_bias(layer, index, value);
    }

    /// Zero errors, epoch and computed values, clear the log and return to
    /// IDLE. Architecture, parameters, inputs, target and learning rate stay.
    pub fn reset(&mut self) {
        self.network.reset();
        self.log.clear();
        self.phase = Phase::Idle;
        info!("simulation reset");
    }

    pub fn clear_log(&mut self) {
        let dropped = self.log.len();
        self.log.clear();
        info!(entries = dropped; "training log cleared");
    }
}
