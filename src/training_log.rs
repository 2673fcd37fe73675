//! Bounded history of phase advances.
//!
//! Every completed phase appends a [`LogEntry`] holding a deep copy of the
//! network. The log keeps the most recent `capacity` entries and evicts from
//! the front once full.

use std::collections::VecDeque;
use std::fmt;
use std::time::SystemTime;

use log::trace;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Network, Phase, PhaseFilter};

/// Entries kept by [`TrainingLog::default`].
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Snapshot taken right after a phase completed.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    phase: Phase,
    timestamp: SystemTime,
    network: Network,
}

impl LogEntry {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Network state (parameters, inputs, target, learning rate, computed
    /// values, errors, epoch) at the time of the snapshot.
    #[inline]
    pub fn network(&self) -> &Network {
        &self.network
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.network.epoch()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let net = &self.network;
        write!(f, "epoch {:>4} {:<8}", net.epoch(), self.phase)?;
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Forward => write!(f, " output={}", fmt_values(net.output_activations())),
            Phase::Error => write!(
                f,
                " raw_error={:.4} total_error={:.4}",
                net.raw_error(),
                net.total_error()
            ),
            Phase::Backward => write!(f, " d_output={}", fmt_values(net.output_gradients())),
            Phase::Update => write!(
                f,
                " output_biases={}",
                fmt_values(net.biases(net.num_matrices().saturating_sub(1)).unwrap_or(&[]))
            ),
        }
    }
}

fn fmt_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

#[derive(Debug, Clone)]
pub struct TrainingLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for TrainingLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl TrainingLog {
    /// Log that keeps at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot `network` as having just completed `phase`.
    ///
    /// The live network is only read; the entry owns an independent copy.
    pub fn append(&mut self, network: &Network, phase: Phase) {
        self.entries.push_back(LogEntry {
            phase,
            timestamp: SystemTime::now(),
            network: network.clone(),
        });
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                trace!(epoch = evicted.epoch(), phase = evicted.phase().as_str(); "evicted log entry");
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator + Clone {
        self.entries.iter()
    }

    /// Entries matching `filter`, oldest first.
    ///
    /// The view is lazy; clone it (or call `filter` again) to walk it twice.
    pub fn filter(&self, filter: PhaseFilter) -> impl Iterator<Item = &LogEntry> + Clone {
        self.entries.iter().filter(move |e| filter.matches(e.phase))
    }

    #[inline]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

impl<'a> IntoIterator for &'a TrainingLog {
    type Item = &'a LogEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
