//! Session status, status snapshots, and the final outcome of a session.

use std::fmt;
use std::time::Duration;

use gt_registry::Prerequisite;
use gt_transit::Route;

use crate::{FailureKind, TravelError};

/// Where a session is in its lifecycle.
///
/// `Idle` is initial; `Arrived`, `Failed`, and `Interrupted` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Planning,
    Traveling,
    Arrived,
    Failed(FailureKind),
    Interrupted,
}

impl SessionStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Arrived | SessionStatus::Failed(_) | SessionStatus::Interrupted)
    }

    pub fn failure(self) -> Option<FailureKind> {
        match self {
            SessionStatus::Failed(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Idle        => "idle",
            SessionStatus::Planning    => "planning",
            SessionStatus::Traveling   => "traveling",
            SessionStatus::Arrived     => "arrived",
            SessionStatus::Failed(_)   => "failed",
            SessionStatus::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Failed(kind) => write!(f, "failed ({kind})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Point-in-time view of an agent's travel state, as returned by
/// [`TravelAgent::get_status`](crate::TravelAgent::get_status).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StatusSnapshot {
    pub status: SessionStatus,
    pub destination_id: Option<String>,
    pub current_hop_index: usize,
    pub elapsed: Duration,
}

/// Terminal result of a travel session.
#[derive(Clone, Debug, PartialEq)]
pub struct TravelOutcome {
    pub destination_id: String,
    /// Always terminal.
    pub status: SessionStatus,
    /// `None` when the session ended before a route was computed.
    pub route: Option<Route>,
    /// Index of the hop being worked on when the session ended; equals the
    /// hop count on arrival.
    pub hop_index: usize,
    pub elapsed: Duration,
    /// The first unmet prerequisite, for `Failed(PrerequisiteNotMet)`.
    pub unmet_prerequisite: Option<Prerequisite>,
}

impl TravelOutcome {
    pub fn is_arrived(&self) -> bool {
        self.status == SessionStatus::Arrived
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.status.failure()
    }

    /// Convert a failed outcome into [`TravelError::Failed`]; arrived and
    /// interrupted outcomes pass through.
    pub fn into_result(self) -> Result<TravelOutcome, TravelError> {
        match self.status {
            SessionStatus::Failed(kind) => Err(TravelError::Failed {
                kind,
                destination_id: self.destination_id,
                route:          self.route,
                hop_index:      self.hop_index,
            }),
            _ => Ok(self),
        }
    }
}
