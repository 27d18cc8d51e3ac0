//! Structured travel events and the sinks that receive them.

use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;

use gt_core::StopKey;

use crate::policy::HopOutcome;
use crate::SessionStatus;

/// One event per state transition of a session.
#[derive(Clone, Debug, PartialEq)]
pub enum TravelEvent {
    /// A route was computed and the session entered `Traveling`.
    RoutePlanned { destination_id: String, hops: usize },

    /// An attempt at hop `hop_index` began.  `attempt` counts from 1.
    HopStarted { hop_index: usize, attempt: u32, from: StopKey, to: StopKey },

    /// Arrival at the end of hop `hop_index` was confirmed.
    HopVerified { hop_index: usize, attempts: u32 },

    /// Attempt `attempt` at hop `hop_index` failed and will be retried.
    HopRetried { hop_index: usize, attempt: u32, outcome: HopOutcome },

    /// The session reached a terminal status.
    SessionTerminal {
        destination_id: String,
        status:         SessionStatus,
        hop_index:      usize,
        elapsed:        Duration,
    },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("event sink unavailable: {0}")]
    Unavailable(String),
}

/// Receives travel events.
///
/// Recording is fire-and-forget from the session's point of view: an `Err`
/// is logged and the session carries on.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &TravelEvent) -> Result<(), SinkError>;
}

/// Discards every event.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &TravelEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every event in memory, in order.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<TravelEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<TravelEvent> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Take everything recorded so far, leaving the sink empty.
    pub fn drain(&self) -> Vec<TravelEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|p| p.into_inner()))
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &TravelEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".into()))?
            .push(event.clone());
        Ok(())
    }
}

/// Writes every event to the `tracing` log at `info` level.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &TravelEvent) -> Result<(), SinkError> {
        match event {
            TravelEvent::RoutePlanned { destination_id, hops } => {
                tracing::info!(destination = %destination_id, hops, "route planned");
            }
            TravelEvent::HopStarted { hop_index, attempt, from, to } => {
                tracing::info!(hop = hop_index, attempt, %from, %to, "hop started");
            }
            TravelEvent::HopVerified { hop_index, attempts } => {
                tracing::info!(hop = hop_index, attempts, "hop verified");
            }
            TravelEvent::HopRetried { hop_index, attempt, outcome } => {
                tracing::info!(hop = hop_index, attempt, ?outcome, "hop retried");
            }
            TravelEvent::SessionTerminal { destination_id, status, hop_index, elapsed } => {
                tracing::info!(
                    destination = %destination_id,
                    %status,
                    hop = hop_index,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "session finished"
                );
            }
        }
        Ok(())
    }
}
