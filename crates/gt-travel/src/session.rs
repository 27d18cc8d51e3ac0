//! The travel session state machine.
//!
//! # Step model
//!
//! A [`TravelSession`] is advanced by [`TravelSession::step`], which performs
//! one unit of work and returns the resulting status:
//!
//! ```text
//! Idle      ─ lookup + prerequisites ─▶ Planning        (or Failed)
//! Planning  ─ snap start, plan route ─▶ Traveling       (or Failed / Arrived)
//! Traveling ─ one attempt at one hop ─▶ Traveling       (or Arrived / Failed)
//! ```
//!
//! A hop attempt blocks inside collaborator calls and the settle delay.  The
//! interrupt flag and the session deadline are checked after each of those
//! and at the start of every step, never in the middle of a call.  An
//! interrupt wins over a deadline when both are due.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gt_core::{Clock, Position};
use gt_registry::{Destination, DestinationRegistry, Prerequisite};
use gt_transit::{Hop, Route, RoutePlanner, TransitGraph};

use crate::collab::{Collaborators, TransitRequest};
use crate::event::TravelEvent;
use crate::policy::{HopOutcome, RetryPolicy, Verdict};
use crate::{FailureKind, SessionStatus, StatusSnapshot, TravelOutcome};

// ── Interrupt flag ────────────────────────────────────────────────────────────

/// Cooperative cancellation flag shared between a session and whoever may
/// want to stop it.  Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct InterruptHandle {
    flag: Arc<AtomicBool>,
}

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to stop at its next check point.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ── Context ───────────────────────────────────────────────────────────────────

/// Everything a session reads while stepping.  Built by the caller for the
/// duration of a drive; the session itself owns only its mutable record.
pub struct SessionContext<'a, R: RoutePlanner + ?Sized> {
    pub registry:      &'a DestinationRegistry,
    pub graph:         &'a TransitGraph,
    pub planner:       &'a R,
    pub collaborators: &'a Collaborators,
    pub policy:        &'a RetryPolicy,
    pub clock:         &'a dyn Clock,
    pub interrupt:     &'a InterruptHandle,
}

// ── TravelSession ─────────────────────────────────────────────────────────────

/// Mutable execution record of one travel request.
#[derive(Clone, Debug)]
pub struct TravelSession {
    destination_id:          String,
    destination:             Option<Destination>,
    route:                   Option<Route>,
    status:                  SessionStatus,
    current_hop_index:       usize,
    attempts_on_current_hop: u32,
    started_at:              Duration,
    finished_at:             Option<Duration>,
    last_known_position:     Option<Position>,
    unmet_prerequisite:      Option<Prerequisite>,
}

impl TravelSession {
    /// A session in `Idle`, with its clock started at `started_at`.
    pub fn new(destination_id: impl Into<String>, started_at: Duration) -> Self {
        Self {
            destination_id:          destination_id.into(),
            destination:             None,
            route:                   None,
            status:                  SessionStatus::Idle,
            current_hop_index:       0,
            attempts_on_current_hop: 0,
            started_at,
            finished_at:             None,
            last_known_position:     None,
            unmet_prerequisite:      None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn destination_id(&self) -> &str {
        &self.destination_id
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_hop_index(&self) -> usize {
        self.current_hop_index
    }

    pub fn attempts_on_current_hop(&self) -> u32 {
        self.attempts_on_current_hop
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn last_known_position(&self) -> Option<&Position> {
        self.last_known_position.as_ref()
    }

    /// Time since start, frozen once the session is terminal.
    pub fn elapsed(&self, clock: &dyn Clock) -> Duration {
        self.finished_at
            .unwrap_or_else(|| clock.now())
            .saturating_sub(self.started_at)
    }

    pub fn snapshot(&self, clock: &dyn Clock) -> StatusSnapshot {
        StatusSnapshot {
            status:            self.status,
            destination_id:    Some(self.destination_id.clone()),
            current_hop_index: self.current_hop_index,
            elapsed:           self.elapsed(clock),
        }
    }

    pub fn outcome(&self, clock: &dyn Clock) -> TravelOutcome {
        TravelOutcome {
            destination_id:     self.destination_id.clone(),
            status:             self.status,
            route:              self.route.clone(),
            hop_index:          self.current_hop_index,
            elapsed:            self.elapsed(clock),
            unmet_prerequisite: self.unmet_prerequisite.clone(),
        }
    }

    /// Re-arm an interrupted session at `now`.
    ///
    /// The hop index is kept; the attempt counter and the timeout budget
    /// start over.  Returns `false` (and changes nothing) unless the session
    /// is `Interrupted`.
    pub fn resume(&mut self, now: Duration) -> bool {
        if self.status != SessionStatus::Interrupted {
            return false;
        }
        self.status = if self.route.is_some() {
            SessionStatus::Traveling
        } else if self.destination.is_some() {
            SessionStatus::Planning
        } else {
            SessionStatus::Idle
        };
        self.attempts_on_current_hop = 0;
        self.started_at = now;
        self.finished_at = None;
        tracing::info!(
            destination = %self.destination_id,
            hop = self.current_hop_index,
            status = %self.status,
            "session resumed"
        );
        true
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance by one unit of work.  A no-op once terminal.
    pub fn step<R: RoutePlanner + ?Sized>(&mut self, ctx: &SessionContext<'_, R>) -> SessionStatus {
        let _ = match self.status {
            SessionStatus::Idle      => self.resolve(ctx),
            SessionStatus::Planning  => self.plan(ctx),
            SessionStatus::Traveling => self.travel_hop(ctx),
            _ => ControlFlow::Break(()),
        };
        self.status
    }

    /// Idle → Planning: registry lookup and prerequisite check.
    fn resolve<R: RoutePlanner + ?Sized>(&mut self, ctx: &SessionContext<'_, R>) -> ControlFlow<()> {
        self.checkpoint(ctx)?;
        self.transition(SessionStatus::Planning);

        let destination = match ctx.registry.lookup(&self.destination_id) {
            Ok(d) => d.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "destination lookup failed");
                return self.finish(ctx, SessionStatus::Failed(FailureKind::NotFound));
            }
        };

        let prerequisites = &ctx.collaborators.prerequisites;
        if let Some(unmet) = destination.prerequisites.iter().find(|p| !prerequisites.is_met(p)) {
            tracing::warn!(destination = %self.destination_id, prerequisite = %unmet, "prerequisite not met");
            self.unmet_prerequisite = Some(unmet.clone());
            self.destination = Some(destination);
            return self.finish(ctx, SessionStatus::Failed(FailureKind::PrerequisiteNotMet));
        }

        self.destination = Some(destination);
        ControlFlow::Continue(())
    }

    /// Planning → Traveling: resolve the start stop and plan the route.
    fn plan<R: RoutePlanner + ?Sized>(&mut self, ctx: &SessionContext<'_, R>) -> ControlFlow<()> {
        self.checkpoint(ctx)?;

        let Some(goal) = self.destination.as_ref().map(|d| d.network_entry.clone()) else {
            return self.finish(ctx, SessionStatus::Failed(FailureKind::NotFound));
        };

        let position = ctx.collaborators.position.current_position();
        let start = ctx.graph.nearest_stop(&position).map(|s| s.key.clone());
        self.last_known_position = Some(position);
        let Some(start) = start else {
            tracing::warn!(position = ?self.last_known_position, "no transit stop on the agent's planet");
            return self.finish(ctx, SessionStatus::Failed(FailureKind::Unreachable));
        };

        let route = match ctx.planner.plan(ctx.graph, &start, &goal) {
            Ok(route) => route,
            Err(e) => {
                tracing::warn!(error = %e, "route planning failed");
                return self.finish(ctx, SessionStatus::Failed(FailureKind::Unreachable));
            }
        };

        self.emit(ctx, TravelEvent::RoutePlanned {
            destination_id: self.destination_id.clone(),
            hops:           route.hop_count(),
        });
        let trivial = route.is_trivial();
        self.route = Some(route);
        self.transition(SessionStatus::Traveling);

        if trivial {
            return self.finish(ctx, SessionStatus::Arrived);
        }
        ControlFlow::Continue(())
    }

    /// One attempt at the current hop, then the policy's verdict.
    fn travel_hop<R: RoutePlanner + ?Sized>(&mut self, ctx: &SessionContext<'_, R>) -> ControlFlow<()> {
        self.checkpoint(ctx)?;

        let hop_index = self.current_hop_index;
        let Some((hop, hop_count)) = self
            .route
            .as_ref()
            .and_then(|r| r.hop(hop_index).cloned().map(|h| (h, r.hop_count())))
        else {
            return self.finish(ctx, SessionStatus::Arrived);
        };

        let attempt = self.attempts_on_current_hop + 1;
        self.emit(ctx, TravelEvent::HopStarted {
            hop_index,
            attempt,
            from: hop.from.key.clone(),
            to:   hop.to.key.clone(),
        });

        let outcome = self.attempt(ctx, &hop)?;
        self.attempts_on_current_hop = attempt;

        match ctx.policy.judge(outcome, attempt) {
            Verdict::Advance => {
                self.emit(ctx, TravelEvent::HopVerified { hop_index, attempts: attempt });
                self.current_hop_index += 1;
                self.attempts_on_current_hop = 0;
                if self.current_hop_index == hop_count {
                    return self.finish(ctx, SessionStatus::Arrived);
                }
                ControlFlow::Continue(())
            }
            Verdict::Retry => {
                tracing::warn!(hop = hop_index, attempt, ?outcome, "hop attempt failed, retrying");
                self.emit(ctx, TravelEvent::HopRetried { hop_index, attempt, outcome });
                ControlFlow::Continue(())
            }
            Verdict::Fail(kind) => {
                tracing::warn!(hop = hop_index, attempt, ?outcome, "hop attempt failed, giving up");
                self.finish(ctx, SessionStatus::Failed(kind))
            }
        }
    }

    /// Move, board, settle, verify.  Breaks out if a check point ends the
    /// session; a failed collaborator call ends the attempt early.
    fn attempt<R: RoutePlanner + ?Sized>(
        &mut self,
        ctx: &SessionContext<'_, R>,
        hop: &Hop,
    ) -> ControlFlow<(), HopOutcome> {
        let collab = ctx.collaborators;

        let moved = collab.locomotion.move_to(hop.from.coordinates);
        self.checkpoint(ctx)?;
        if !moved {
            return ControlFlow::Continue(HopOutcome::LocomotionFailed);
        }

        let request = TransitRequest {
            boarding_agent: &hop.from.boarding_agent,
            from:           &hop.from.key,
            to:             &hop.to.key,
        };
        let boarded = collab.interaction.attempt_transit(&request);
        self.checkpoint(ctx)?;
        if !boarded {
            return ControlFlow::Continue(HopOutcome::TransitFailed);
        }

        ctx.clock.sleep(ctx.policy.verification_delay);
        self.checkpoint(ctx)?;

        let position = collab.position.current_position();
        let outcome = ctx.policy.verify(&position, &hop.to);
        self.last_known_position = Some(position);
        ControlFlow::Continue(outcome)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Interrupt first, then the session deadline.
    fn checkpoint<R: RoutePlanner + ?Sized>(&mut self, ctx: &SessionContext<'_, R>) -> ControlFlow<()> {
        if ctx.interrupt.is_interrupted() {
            return self.finish(ctx, SessionStatus::Interrupted);
        }
        if let Some(kind) = ctx.policy.check_deadline(self.elapsed(ctx.clock)) {
            return self.finish(ctx, SessionStatus::Failed(kind));
        }
        ControlFlow::Continue(())
    }

    fn transition(&mut self, status: SessionStatus) {
        tracing::debug!(destination = %self.destination_id, from = %self.status, to = %status, "session transition");
        self.status = status;
    }

    fn finish<R: RoutePlanner + ?Sized>(
        &mut self,
        ctx: &SessionContext<'_, R>,
        status: SessionStatus,
    ) -> ControlFlow<()> {
        self.transition(status);
        self.finished_at = Some(ctx.clock.now());
        let elapsed = self.elapsed(ctx.clock);

        match status {
            SessionStatus::Arrived => tracing::info!(
                destination = %self.destination_id,
                hops = self.current_hop_index,
                "arrived"
            ),
            _ => tracing::warn!(
                destination = %self.destination_id,
                %status,
                hop = self.current_hop_index,
                "session ended without arrival"
            ),
        }

        self.emit(ctx, TravelEvent::SessionTerminal {
            destination_id: self.destination_id.clone(),
            status,
            hop_index:      self.current_hop_index,
            elapsed,
        });
        ControlFlow::Break(())
    }

    fn emit<R: RoutePlanner + ?Sized>(&self, ctx: &SessionContext<'_, R>, event: TravelEvent) {
        if let Err(e) = ctx.collaborators.events.record(&event) {
            tracing::warn!(error = %e, ?event, "event sink rejected travel event");
        }
    }
}
