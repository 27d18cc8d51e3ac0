use thiserror::Error;

use gt_core::CoreError;
use gt_registry::RegistryError;
use gt_transit::{Route, TransitError};

/// Why a session ended in `FAILED`.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum FailureKind {
    #[error("destination not found")]
    NotFound,

    #[error("prerequisite not met")]
    PrerequisiteNotMet,

    #[error("destination unreachable from current position")]
    Unreachable,

    #[error("session timed out before arrival was verified")]
    VerificationTimeout,

    #[error("hop retry budget exhausted")]
    MaxAttemptsExceeded,
}

impl FailureKind {
    /// Structural failures can never succeed on retry with unchanged state;
    /// the rest come from runtime verification.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            FailureKind::NotFound | FailureKind::PrerequisiteNotMet | FailureKind::Unreachable
        )
    }
}

#[derive(Debug, Error)]
pub enum TravelError {
    #[error("a travel session is already active for this agent")]
    SessionConflict,

    #[error("no interrupted session to resume")]
    NothingToResume,

    #[error("travel to {destination_id:?} failed at hop {hop_index}: {kind}")]
    Failed {
        kind:           FailureKind,
        destination_id: String,
        route:          Option<Route>,
        hop_index:      usize,
    },

    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Transit(#[from] TransitError),
}

pub type TravelResult<T> = Result<T, TravelError>;
