//! Travel tunables.
//!
//! Typically loaded from a JSON/TOML file by the application crate and
//! passed to the travel agent builder.  Missing fields fall back to
//! [`TravelConfig::default`].

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Retry, timeout, and verification settings for travel sessions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TravelConfig {
    /// Attempts allowed per hop before the session fails.  Must be ≥ 1.
    pub max_attempts: u32,

    /// Whole-session budget in seconds, measured from session start.
    pub timeout_secs: u64,

    /// Settle time between a transit attempt and the position check, in
    /// milliseconds.  Covers the loading screen after boarding.
    pub verification_delay_ms: u64,

    /// Maximum distance (world units) between the agent and the arrival stop
    /// for a hop to count as verified.
    pub arrival_tolerance: f32,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            max_attempts:          3,
            timeout_secs:          300,
            verification_delay_ms: 5_000,
            arrival_tolerance:     15.0,
        }
    }
}

impl TravelConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[inline]
    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    /// Reject settings under which no session could ever succeed.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_attempts == 0 {
            return Err(CoreError::Config("max_attempts must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::Config("timeout_secs must be positive".into()));
        }
        if !self.arrival_tolerance.is_finite() || self.arrival_tolerance <= 0.0 {
            return Err(CoreError::Config(format!(
                "arrival_tolerance must be a positive finite number, got {}",
                self.arrival_tolerance
            )));
        }
        Ok(())
    }
}
