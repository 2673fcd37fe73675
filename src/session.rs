//! Command/query surface for a presentation layer.
//!
//! A `Session` owns the shared [`Simulator`] and at most one autoplay task.
//! Commands lock the simulator for their duration; queries return copies so
//! the caller never holds the lock while rendering.

use std::sync::Arc;

use log::info;
use parking_lot::{Mutex, MutexGuard};

use crate::autoplay::{AutoplayHandle, AutoplayPlan, SharedSimulator};
use crate::{LogEntry, Network, Phase, PhaseFilter, Result, SimConfig, Simulator};

#[derive(Debug)]
pub struct Session {
    sim: SharedSimulator,
    autoplay: Option<AutoplayHandle>,
}

impl Default for Session {
    fn default() -> Self {
        Self::from_simulator(Simulator::default())
    }
}

impl Session {
    pub fn new(config: SimConfig) -> Result<Self> {
        Ok(Self::from_simulator(Simulator::new(config)?))
    }

    pub fn from_simulator(sim: Simulator) -> Self {
        Self {
            sim: Arc::new(Mutex::new(sim)),
            autoplay: None,
        }
    }

    /// Lock the simulator for a batch of reads.
    pub fn lock(&self) -> MutexGuard<'_, Simulator> {
        self.sim.lock()
    }

    /// Copy of the current network.
    pub fn network(&self) -> Network {
        self.sim.lock().network().clone()
    }

    pub fn phase(&self) -> Phase {
        self.sim.lock().phase()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.as_ref().is_some_and(AutoplayHandle::is_running)
    }

    /// Copies of the log entries matching `filter`, oldest first.
    pub fn log_entries(&self, filter: PhaseFilter) -> Vec<LogEntry> {
        self.sim.lock().log_entries(filter).cloned().collect()
    }

    pub fn advance_phase(&self) -> Phase {
        self.sim.lock().advance_phase()
    }

    pub fn set_architecture(&self, input_count: usize, hidden_layers: &[usize]) {
        self.sim.lock().set_architecture(input_count, hidden_layers);
    }

    pub fn set_input(&self, index: usize, value: f64) {
        self.sim.lock().set_input(index, value);
    }

    pub fn set_target(&self, value: f64) {
        self.sim.lock().set_target(value);
    }

    pub fn set_learning_rate(&self, value: f64) {
        self.sim.lock().set_learning_rate(value);
    }

    pub fn set_weight(&self, matrix: usize, source: usize, target: usize, value: f64) {
        self.sim.lock().set_weight(matrix, source, target, value);
    }

    pub fn set_bias(&self, layer: usize, index: usize, value: f64) {
        self.sim.lock().set_bias(layer, index, value);
    }

    /// Start advancing one phase per configured period.
    ///
    /// With `Some(n)`, `n > 0`, stops by itself once `n` more epochs have
    /// completed; `None` or `Some(0)` runs until [`Session::stop_autoplay`].
    /// A run already in progress is stopped first. Must be called from within
    /// a Tokio runtime.
    pub fn start_autoplay(&mut self, epoch_limit: Option<u64>) {
        self.stop_autoplay();

        let (plan, period) = {
            let sim = self.sim.lock();
            (
                AutoplayPlan::new(sim.network().epoch(), epoch_limit),
                sim.config().autoplay_period,
            )
        };
        info!(
            period_ms = period.as_millis() as u64,
            target_epoch = plan.target_epoch().unwrap_or(0);
            "autoplay started"
        );
        self.autoplay = Some(AutoplayHandle::spawn(self.sim.clone(), period, plan));
    }

    pub fn stop_autoplay(&mut self) {
        if let Some(handle) = self.autoplay.take() {
            handle.stop();
        }
    }

    /// Wait until the current autoplay run ends. Returns immediately if none
    /// is active; never returns for an unbounded run that nobody stops.
    ///
    /// If the returned future is dropped early the run keeps its handle, so
    /// [`Session::stop_autoplay`] still reaches it.
    pub async fn wait_autoplay(&mut self) {
        if let Some(handle) = self.autoplay.as_mut() {
            handle.finished().await;
            self.autoplay = None;
        }
    }

    /// Stop autoplay, then reset the simulator (see [`Simulator::reset`]).
    pub fn reset(&mut self) {
        self.stop_autoplay();
        self.sim.lock().reset();
    }

    pub fn clear_log(&self) {
        self.sim.lock().clear_log();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_autoplay();
    }
}
