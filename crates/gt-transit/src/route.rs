//! Planned routes.
//!
//! A [`Route`] is a value: each hop carries full snapshots of its departure
//! and arrival stops, so a session can keep executing a route after the
//! graph it was planned on has been replaced.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use gt_core::{Coordinates, StopKey};

use crate::graph::TransitStop;
use crate::TransitResult;

/// Snapshot of a stop as it was when the route was planned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub key: StopKey,
    pub coordinates: Coordinates,
    pub boarding_agent: String,
}

impl From<&TransitStop> for RouteStop {
    fn from(stop: &TransitStop) -> Self {
        Self {
            key:            stop.key.clone(),
            coordinates:    stop.coordinates,
            boarding_agent: stop.boarding_agent.clone(),
        }
    }
}

/// One direct traversal between connected stops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub from: RouteStop,
    pub to: RouteStop,
}

/// Ordered hops from a start stop to a goal stop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub start: StopKey,
    pub hops: Vec<Hop>,
}

impl Route {
    /// The empty route of an agent already standing at its goal.
    pub fn trivial(start: StopKey) -> Self {
        Self { start, hops: Vec::new() }
    }

    /// `true` if no hop has to be taken.
    pub fn is_trivial(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    pub fn hop(&self, index: usize) -> Option<&Hop> {
        self.hops.get(index)
    }

    /// Where the route ends; the start itself for a trivial route.
    pub fn goal(&self) -> &StopKey {
        self.hops.last().map_or(&self.start, |h| &h.to.key)
    }

    /// Stop keys visited in order, start included.
    pub fn stops(&self) -> impl Iterator<Item = &StopKey> + '_ {
        std::iter::once(&self.start).chain(self.hops.iter().map(|h| &h.to.key))
    }

    /// Check the chaining invariant: the first hop departs from `start` and
    /// every hop departs from where the previous one arrived.
    pub fn is_contiguous(&self) -> bool {
        let mut at = &self.start;
        for hop in &self.hops {
            if &hop.from.key != at {
                return false;
            }
            at = &hop.to.key;
        }
        true
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Serialize the route as JSON into `writer`.
    pub fn write_json<W: Write>(&self, writer: W) -> TransitResult<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Read a route previously written by [`write_json`](Self::write_json).
    pub fn read_json<R: Read>(reader: R) -> TransitResult<Route> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for key in self.stops() {
            if !first {
                f.write_str(" -> ")?;
            }
            write!(f, "{key}")?;
            first = false;
        }
        Ok(())
    }
}
