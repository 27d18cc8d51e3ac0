//! Verification and retry policy.
//!
//! [`RetryPolicy`] holds no state and touches no collaborator.  The session
//! reports what happened on an attempt and how much time has passed; the
//! policy answers whether to advance, retry, or give up, and with which
//! [`FailureKind`].

use std::time::Duration;

use gt_core::{Position, TravelConfig};
use gt_transit::RouteStop;

use crate::FailureKind;

/// What a single hop attempt produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HopOutcome {
    /// The agent stands at the arrival stop.
    Verified,
    /// Locomotion could not bring the agent to the departure stop.
    LocomotionFailed,
    /// The transit action at the departure stop did not go through.
    TransitFailed,
    /// The agent ended up somewhere else.  `distance` is `None` when it is
    /// not even on the arrival stop's planet.
    PositionMismatch { distance: Option<f32> },
}

/// The policy's decision after an attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Advance,
    Retry,
    Fail(FailureKind),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts:       u32,
    pub timeout:            Duration,
    pub verification_delay: Duration,
    pub arrival_tolerance:  f32,
}

impl RetryPolicy {
    pub fn from_config(config: &TravelConfig) -> Self {
        Self {
            max_attempts:       config.max_attempts,
            timeout:            config.timeout(),
            verification_delay: config.verification_delay(),
            arrival_tolerance:  config.arrival_tolerance,
        }
    }

    /// `Some(VerificationTimeout)` once `elapsed` exceeds the session budget.
    #[inline]
    pub fn check_deadline(&self, elapsed: Duration) -> Option<FailureKind> {
        (elapsed > self.timeout).then_some(FailureKind::VerificationTimeout)
    }

    /// Compare where the agent is against where the hop should have left it.
    pub fn verify(&self, position: &Position, arrival: &RouteStop) -> HopOutcome {
        match position.distance_to(&arrival.key.planet, arrival.coordinates) {
            Some(d) if d <= self.arrival_tolerance => HopOutcome::Verified,
            distance => HopOutcome::PositionMismatch { distance },
        }
    }

    /// Decide after an attempt.  `attempts` is the number of attempts made
    /// on this hop, the one just finished included.
    pub fn judge(&self, outcome: HopOutcome, attempts: u32) -> Verdict {
        match outcome {
            HopOutcome::Verified => Verdict::Advance,
            _ if attempts >= self.max_attempts => Verdict::Fail(FailureKind::MaxAttemptsExceeded),
            _ => Verdict::Retry,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&TravelConfig::default())
    }
}
