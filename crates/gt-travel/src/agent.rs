//! Per-agent travel controller.
//!
//! A [`TravelAgent`] owns at most one live [`TravelSession`] at a time and
//! drives it to a terminal status on the calling thread.  Other threads may
//! read its status or interrupt it concurrently through a shared reference.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use gt_core::{Clock, StopKey, SystemClock, TravelConfig};
use gt_registry::DestinationRegistry;
use gt_transit::{BfsPlanner, Route, RoutePlanner, SharedGraph};

use crate::collab::Collaborators;
use crate::policy::RetryPolicy;
use crate::session::{InterruptHandle, SessionContext, TravelSession};
use crate::{SessionStatus, StatusSnapshot, TravelError, TravelOutcome, TravelResult};

// ── Status record ─────────────────────────────────────────────────────────────

/// Last published state of the current (or most recent) session.
#[derive(Default)]
struct StatusRecord {
    status:            SessionStatus,
    destination_id:    Option<String>,
    current_hop_index: usize,
    started_at:        Option<Duration>,
    finished_at:       Option<Duration>,
}

/// Releases the single-session claim on drop.
struct ActiveClaim<'a>(&'a AtomicBool);

impl Drop for ActiveClaim<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ── TravelAgent ───────────────────────────────────────────────────────────────

/// Travel controller for one agent.
///
/// Construct with [`TravelAgent::builder`].
pub struct TravelAgent<R: RoutePlanner = BfsPlanner> {
    registry:      Arc<DestinationRegistry>,
    network:       SharedGraph,
    planner:       R,
    collaborators: Collaborators,
    policy:        RetryPolicy,
    clock:         Arc<dyn Clock>,
    interrupt:     InterruptHandle,
    active:        AtomicBool,
    record:        Mutex<StatusRecord>,
    parked:        Mutex<Option<TravelSession>>,
}

impl TravelAgent<BfsPlanner> {
    pub fn builder(
        registry:      Arc<DestinationRegistry>,
        network:       SharedGraph,
        collaborators: Collaborators,
    ) -> TravelAgentBuilder<BfsPlanner> {
        TravelAgentBuilder::new(registry, network, collaborators)
    }
}

impl<R: RoutePlanner> TravelAgent<R> {
    /// Travel to the registered destination `destination_id`, blocking until
    /// the session is terminal.
    ///
    /// Runtime failures are reported in the returned outcome's status, not as
    /// `Err`.  `Err(SessionConflict)` means another session is already
    /// running for this agent.  Starting a new session discards any parked
    /// interrupted one.
    pub fn travel_to_destination(&self, destination_id: &str) -> TravelResult<TravelOutcome> {
        let _claim = self.claim()?;
        self.lock_parked().take();
        self.interrupt.clear();

        let session = TravelSession::new(destination_id, self.clock.now());
        Ok(self.drive(session))
    }

    /// Continue the most recent interrupted session from the hop it stopped
    /// on.  The attempt counter and timeout budget start over.
    pub fn resume_interrupted(&self) -> TravelResult<TravelOutcome> {
        let _claim = self.claim()?;
        let mut session = self.lock_parked().take().ok_or(TravelError::NothingToResume)?;
        self.interrupt.clear();

        session.resume(self.clock.now());
        Ok(self.drive(session))
    }

    /// Ask the running session to stop at its next check point.
    ///
    /// Returns `false` (and does nothing) when no session is active.
    pub fn interrupt_current_session(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.interrupt.interrupt();
        true
    }

    /// A handle that interrupts this agent's sessions.  Raising it while no
    /// session runs has no effect on the next one.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// `true` when an interrupted session is waiting for
    /// [`resume_interrupted`](Self::resume_interrupted).
    pub fn has_parked_session(&self) -> bool {
        self.lock_parked().is_some()
    }

    /// Current or most recent session state.  `Idle` with no destination
    /// before the first session.
    pub fn get_status(&self) -> StatusSnapshot {
        let record = self.lock_record();
        let elapsed = match record.started_at {
            Some(start) => record
                .finished_at
                .unwrap_or_else(|| self.clock.now())
                .saturating_sub(start),
            None => Duration::ZERO,
        };
        StatusSnapshot {
            status:            record.status,
            destination_id:    record.destination_id.clone(),
            current_hop_index: record.current_hop_index,
            elapsed,
        }
    }

    /// Plan between two stops on the current network without travelling.
    pub fn plan_route(&self, start: &StopKey, goal: &StopKey) -> TravelResult<Route> {
        let graph = self.network.snapshot();
        Ok(self.planner.plan(&graph, start, goal)?)
    }

    pub fn registry(&self) -> &DestinationRegistry {
        &self.registry
    }

    /// The network handle.  Rebuilding through it affects sessions started
    /// afterwards, never the one in flight.
    pub fn network(&self) -> &SharedGraph {
        &self.network
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn claim(&self) -> TravelResult<ActiveClaim<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TravelError::SessionConflict)?;
        Ok(ActiveClaim(&self.active))
    }

    /// Step `session` until terminal, publishing status after every step.
    fn drive(&self, mut session: TravelSession) -> TravelOutcome {
        let _span = tracing::info_span!("travel", destination = %session.destination_id()).entered();

        // One graph snapshot per drive.
        let graph = self.network.snapshot();
        let ctx = SessionContext {
            registry:      &self.registry,
            graph:         &graph,
            planner:       &self.planner,
            collaborators: &self.collaborators,
            policy:        &self.policy,
            clock:         self.clock.as_ref(),
            interrupt:     &self.interrupt,
        };

        self.publish(&session);
        loop {
            let status = session.step(&ctx);
            self.publish(&session);
            if status.is_terminal() {
                break;
            }
        }

        let outcome = session.outcome(self.clock.as_ref());
        if session.status() == SessionStatus::Interrupted {
            *self.lock_parked() = Some(session);
        }
        outcome
    }

    fn publish(&self, session: &TravelSession) {
        let mut record = self.lock_record();
        record.status = session.status();
        record.current_hop_index = session.current_hop_index();
        record.started_at = Some(session.started_at());
        record.finished_at = session
            .status()
            .is_terminal()
            .then(|| session.started_at() + session.elapsed(self.clock.as_ref()));
        if record.destination_id.as_deref() != Some(session.destination_id()) {
            record.destination_id = Some(session.destination_id().to_owned());
        }
    }

    fn lock_record(&self) -> MutexGuard<'_, StatusRecord> {
        self.record.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_parked(&self) -> MutexGuard<'_, Option<TravelSession>> {
        self.parked.lock().unwrap_or_else(|p| p.into_inner())
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`TravelAgent<R>`].
///
/// # Optional inputs
///
/// | Method          | Default                      |
/// |-----------------|------------------------------|
/// | `.config(c)`    | `TravelConfig::default()`    |
/// | `.planner(p)`   | `BfsPlanner`                 |
/// | `.clock(c)`     | `SystemClock::new()`         |
///
/// # Example
///
/// ```rust,ignore
/// let agent = TravelAgent::builder(registry, SharedGraph::new(graph), collaborators)
///     .config(config)
///     .planner(CachedPlanner::new(BfsPlanner))
///     .build()?;
/// let outcome = agent.travel_to_destination("weaponsmith")?;
/// ```
pub struct TravelAgentBuilder<R: RoutePlanner> {
    registry:      Arc<DestinationRegistry>,
    network:       SharedGraph,
    collaborators: Collaborators,
    planner:       R,
    config:        TravelConfig,
    clock:         Option<Arc<dyn Clock>>,
}

impl TravelAgentBuilder<BfsPlanner> {
    pub fn new(
        registry:      Arc<DestinationRegistry>,
        network:       SharedGraph,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            registry,
            network,
            collaborators,
            planner: BfsPlanner,
            config:  TravelConfig::default(),
            clock:   None,
        }
    }
}

impl<R: RoutePlanner> TravelAgentBuilder<R> {
    /// Swap the route planner.
    pub fn planner<P: RoutePlanner>(self, planner: P) -> TravelAgentBuilder<P> {
        TravelAgentBuilder {
            registry:      self.registry,
            network:       self.network,
            collaborators: self.collaborators,
            planner,
            config:        self.config,
            clock:         self.clock,
        }
    }

    pub fn config(mut self, config: TravelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and return a ready agent.
    pub fn build(self) -> TravelResult<TravelAgent<R>> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        tracing::debug!(
            destinations = self.registry.len(),
            stops = self.network.snapshot().stop_count(),
            max_attempts = self.config.max_attempts,
            timeout_secs = self.config.timeout_secs,
            "travel agent built"
        );

        Ok(TravelAgent {
            registry:      self.registry,
            network:       self.network,
            planner:       self.planner,
            collaborators: self.collaborators,
            policy:        RetryPolicy::from_config(&self.config),
            clock,
            interrupt:     InterruptHandle::new(),
            active:        AtomicBool::new(false),
            record:        Mutex::new(StatusRecord::default()),
            parked:        Mutex::new(None),
        })
    }
}
