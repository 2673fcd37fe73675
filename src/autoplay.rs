//! Timed repetition of phase advances.
//!
//! [`AutoplayPlan`] decides when a bounded run is over; [`AutoplayHandle`]
//! owns the Tokio task that advances one phase per tick until the plan
//! completes or [`AutoplayHandle::stop`] is called.
//!
//! The simulator is shared behind a mutex. A tick holds the lock only while
//! it runs one synchronous advance, so ticks never overlap with each other or
//! with commands issued through the same lock.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::Simulator;

pub type SharedSimulator = Arc<Mutex<Simulator>>;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Stopping rule for one autoplay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoplayPlan {
    target_epoch: Option<u64>,
}

impl AutoplayPlan {
    /// Run `epoch_limit` more epochs from `current_epoch`.
    ///
    /// `None` or `Some(0)` runs until stopped.
    pub fn new(current_epoch: u64, epoch_limit: Option<u64>) -> Self {
        let target_epoch = epoch_limit
            .filter(|&limit| limit > 0)
            .map(|limit| current_epoch.saturating_add(limit));
        Self { target_epoch }
    }

    /// Plan with no epoch bound.
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[inline]
    pub fn target_epoch(&self) -> Option<u64> {
        self.target_epoch
    }

    #[inline]
    pub fn is_complete(&self, epoch: u64) -> bool {
        self.target_epoch.is_some_and(|target| epoch >= target)
    }
}

/// Handle to a running autoplay task.
#[derive(Debug)]
pub struct AutoplayHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl AutoplayHandle {
    /// Spawn the tick loop on the current Tokio runtime.
    ///
    /// The first advance happens one `period` after the call.
    pub fn spawn(sim: SharedSimulator, period: Duration, plan: AutoplayPlan) -> Self {
        let token = CancellationToken::new();
        let task = tokio::spawn(run(sim, period.max(MIN_PERIOD), plan, token.clone()));
        Self { token, task }
    }

    /// Cancel future ticks. An advance already in progress completes.
    /// Calling this more than once is harmless.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && !self.task.is_finished()
    }

    /// Wait for the task to end, either by completing its plan or after `stop`.
    ///
    /// Cancel-safe: dropping the future leaves the handle usable, so the run
    /// can still be stopped.
    pub async fn finished(&mut self) {
        if let Err(e) = (&mut self.task).await {
            warn!("autoplay task ended abnormally: {e}");
        }
    }
}

async fn run(sim: SharedSimulator, period: Duration, plan: AutoplayPlan, token: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // A pending stop wins over a ready tick.
            biased;
            _ = token.cancelled() => {
                info!("autoplay stopped");
                return;
            }
            _ = ticker.tick() => {}
        }

        let epoch = {
            let mut sim = sim.lock();
            // A stop issued while this tick waited for the lock still wins.
            if token.is_cancelled() {
                info!("autoplay stopped");
                return;
            }
            sim.advance_phase();
            sim.network().epoch()
        };

        if plan.is_complete(epoch) {
            info!(epoch = epoch; "autoplay reached target epoch");
            token.cancel();
            return;
        }
    }
}
