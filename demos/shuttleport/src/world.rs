//! A tiny simulated galaxy that plays every travel collaborator.
//!
//! Walking is instant.  Boarding a shuttle moves the agent to the arrival
//! stop, except that the first boarding at each port in `unreliable` is
//! silently dropped, so the demo shows a retry.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use gt_core::{Coordinates, Position, StopKey};
use gt_registry::Prerequisite;
use gt_transit::NetworkConfig;
use gt_travel::{Interaction, Locomotion, PositionSource, PrerequisiteCheck, TransitRequest};

pub struct World {
    position:   Mutex<Position>,
    ports:      HashMap<StopKey, Coordinates>,
    unreliable: Mutex<HashSet<StopKey>>,
}

impl World {
    pub fn new(network: &NetworkConfig, start: Position, unreliable: &[StopKey]) -> Self {
        Self {
            position:   Mutex::new(start),
            ports:      network.stops.iter().map(|s| (s.key(), s.coordinates)).collect(),
            unreliable: Mutex::new(unreliable.iter().cloned().collect()),
        }
    }

    fn lock_position(&self) -> std::sync::MutexGuard<'_, Position> {
        self.position.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Locomotion for World {
    fn move_to(&self, target: Coordinates) -> bool {
        let mut position = self.lock_position();
        tracing::debug!(from = %position.coords, to = %target, "walking");
        position.coords = target;
        true
    }
}

impl Interaction for World {
    fn attempt_transit(&self, request: &TransitRequest<'_>) -> bool {
        let first_try = self
            .unreliable
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(request.from);
        if first_try {
            tracing::debug!(agent = request.boarding_agent, "ticket droid ignored us");
            return true;
        }

        let Some(&coords) = self.ports.get(request.to) else {
            return false;
        };
        tracing::debug!(agent = request.boarding_agent, to = %request.to, "boarding");
        *self.lock_position() = Position::new(request.to.planet.clone(), coords);
        true
    }
}

impl PositionSource for World {
    fn current_position(&self) -> Position {
        self.lock_position().clone()
    }
}

/// Character progress as far as the demo is concerned.
pub struct Character {
    pub completed_quests: Vec<String>,
    pub reputation:       HashMap<String, i32>,
    pub skills:           Vec<String>,
}

impl PrerequisiteCheck for Character {
    fn is_met(&self, prerequisite: &Prerequisite) -> bool {
        match prerequisite {
            Prerequisite::Quest { id } => self.completed_quests.contains(id),
            Prerequisite::Reputation { faction, min } => {
                self.reputation.get(faction).copied().unwrap_or(0) >= *min
            }
            Prerequisite::Skill { name } => self.skills.contains(name),
        }
    }
}
