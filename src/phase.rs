//! Training phases.
//!
//! One call to [`crate::Simulator::advance_phase`] moves the machine one step:
//!
//! | current  | pass run | next     |
//! |----------|----------|----------|
//! | IDLE     | forward  | FORWARD  |
//! | FORWARD  | error    | ERROR    |
//! | ERROR    | backward | BACKWARD |
//! | BACKWARD | update   | UPDATE   |
//! | UPDATE   | forward  | FORWARD  |
//!
//! There is no terminal state. Architecture changes and resets force `IDLE`.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Error, Result};

#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Forward,
    Error,
    Backward,
    Update,
}

impl Phase {
    /// Phase reached by the next advance.
    #[inline]
    pub fn next(self) -> Phase {
        match self {
            Phase::Idle | Phase::Update => Phase::Forward,
            Phase::Forward => Phase::Error,
            Phase::Error => Phase::Backward,
            Phase::Backward => Phase::Update,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Forward => "FORWARD",
            Phase::Error => "ERROR",
            Phase::Backward => "BACKWARD",
            Phase::Update => "UPDATE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Ok(Phase::Idle),
            "FORWARD" => Ok(Phase::Forward),
            "ERROR" => Ok(Phase::Error),
            "BACKWARD" => Ok(Phase::Backward),
            "UPDATE" => Ok(Phase::Update),
            _ => Err(Error::InvalidData(format!("unknown phase {s:?}"))),
        }
    }
}

/// Selects training-log entries by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseFilter {
    #[default]
    All,
    Only(Phase),
}

impl PhaseFilter {
    #[inline]
    pub fn matches(self, phase: Phase) -> bool {
        match self {
            PhaseFilter::All => true,
            PhaseFilter::Only(p) => p == phase,
        }
    }
}

impl From<Phase> for PhaseFilter {
    fn from(phase: Phase) -> Self {
        PhaseFilter::Only(phase)
    }
}

impl FromStr for PhaseFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            Ok(PhaseFilter::All)
        } else {
            s.parse().map(PhaseFilter::Only)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_repeats_after_update() {
        let mut phase = Phase::Idle;
        let mut seen = Vec::new();
        for _ in 0..9 {
            phase = phase.next();
            seen.push(phase);
        }
        use Phase::*;
        assert_eq!(
            seen,
            vec![Forward, Error, Backward, Update, Forward, Error, Backward, Update, Forward]
        );
    }

    #[test]
    fn names_round_trip() {
        for p in [
            Phase::Idle,
            Phase::Forward,
            Phase::Error,
            Phase::Backward,
            Phase::Update,
        ] {
            assert_eq!(p.to_string().parse::<Phase>().unwrap(), p);
        }
        assert_eq!("backward".parse::<Phase>().unwrap(), Phase::Backward);
        assert!("sideways".parse::<Phase>().is_err());
    }

    #[test]
    fn filter_parsing_and_matching() {
        assert_eq!("all".parse::<PhaseFilter>().unwrap(), PhaseFilter::All);
        let f: PhaseFilter = "ERROR".parse().unwrap();
        assert_eq!(f, PhaseFilter::Only(Phase::Error));
        assert!(f.matches(Phase::Error));
        assert!(!f.matches(Phase::Forward));
        assert!(PhaseFilter::All.matches(Phase::Update));
    }
}
