//! Contracts for the collaborators a session drives.
//!
//! Movement, prompt handling, and position reading belong to other
//! subsystems.  Sessions reach them only through these traits, which keeps
//! the state machine testable with plain stand-ins.
//!
//! Every call must eventually return.  None of them retries: retries are
//! decided by [`RetryPolicy`](crate::RetryPolicy).

use std::sync::Arc;

use gt_core::{Coordinates, Position, StopKey};
use gt_registry::Prerequisite;

use crate::event::{EventSink, NoopSink};

/// Walks the agent to a point on its current planet.
pub trait Locomotion: Send + Sync {
    /// `true` once the agent reached `target`, `false` if it gave up.
    fn move_to(&self, target: Coordinates) -> bool;
}

/// Everything the interaction layer needs to take one hop.
#[derive(Clone, Copy, Debug)]
pub struct TransitRequest<'a> {
    /// Terminal to talk to at the departure stop.
    pub boarding_agent: &'a str,
    pub from: &'a StopKey,
    /// Picked from the terminal's destination list.
    pub to: &'a StopKey,
}

/// Triggers the in-game transit action (boarding prompt, ticket choice).
pub trait Interaction: Send + Sync {
    fn attempt_transit(&self, request: &TransitRequest<'_>) -> bool;
}

/// Reads where the agent currently stands.
pub trait PositionSource: Send + Sync {
    fn current_position(&self) -> Position;
}

/// Answers whether the agent satisfies a prerequisite.
pub trait PrerequisiteCheck: Send + Sync {
    fn is_met(&self, prerequisite: &Prerequisite) -> bool;
}

/// Treats every prerequisite as satisfied.
pub struct AllMet;

impl PrerequisiteCheck for AllMet {
    fn is_met(&self, _prerequisite: &Prerequisite) -> bool {
        true
    }
}

/// The collaborators of one controlled agent.
#[derive(Clone)]
pub struct Collaborators {
    pub locomotion:    Arc<dyn Locomotion>,
    pub interaction:   Arc<dyn Interaction>,
    pub position:      Arc<dyn PositionSource>,
    pub events:        Arc<dyn EventSink>,
    pub prerequisites: Arc<dyn PrerequisiteCheck>,
}

impl Collaborators {
    /// Required collaborators; events are dropped and every prerequisite
    /// counts as met until overridden.
    pub fn new(
        locomotion:  Arc<dyn Locomotion>,
        interaction: Arc<dyn Interaction>,
        position:    Arc<dyn PositionSource>,
    ) -> Self {
        Self {
            locomotion,
            interaction,
            position,
            events:        Arc::new(NoopSink),
            prerequisites: Arc::new(AllMet),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_prerequisites(mut self, prerequisites: Arc<dyn PrerequisiteCheck>) -> Self {
        self.prerequisites = prerequisites;
        self
    }
}
