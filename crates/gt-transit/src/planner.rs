//! Route planning trait and the default breadth-first planner.
//!
//! # Pluggability
//!
//! `gt-travel` calls planning through the [`RoutePlanner`] trait, so a
//! caller can wrap or replace the default [`BfsPlanner`] (e.g. with
//! [`CachedPlanner`]) without touching the session state machine.
//!
//! # Minimum hops, deterministic ties
//!
//! Transit edges are unweighted, so BFS yields a minimum-hop route.  Stops
//! are marked visited when enqueued and neighbors are scanned in
//! configuration order, so among equally short routes the one reached first
//! through earlier-declared connections wins.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use gt_core::StopKey;

use crate::graph::{StopId, TransitGraph};
use crate::route::{Hop, Route, RouteStop};
use crate::{TransitError, TransitResult};

// ── RoutePlanner trait ────────────────────────────────────────────────────────

/// Pluggable route planner.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one planner can serve the
/// controllers of several agents.
pub trait RoutePlanner: Send + Sync {
    /// Plan a route from `start` to `goal` over `graph`.
    ///
    /// `start == goal` yields a trivial (empty) route.  Planning never
    /// mutates the graph.
    fn plan(&self, graph: &TransitGraph, start: &StopKey, goal: &StopKey) -> TransitResult<Route>;
}

// ── BfsPlanner ────────────────────────────────────────────────────────────────

/// Breadth-first search over the CSR adjacency.  O(V + E) per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsPlanner;

impl RoutePlanner for BfsPlanner {
    fn plan(&self, graph: &TransitGraph, start: &StopKey, goal: &StopKey) -> TransitResult<Route> {
        bfs(graph, start, goal)
    }
}

fn bfs(graph: &TransitGraph, start: &StopKey, goal: &StopKey) -> TransitResult<Route> {
    let from = graph
        .id_of(start)
        .ok_or_else(|| TransitError::UnknownStop(start.clone()))?;
    let to = graph
        .id_of(goal)
        .ok_or_else(|| TransitError::UnknownStop(goal.clone()))?;

    if from == to {
        return Ok(Route::trivial(start.clone()));
    }

    // prev[v] = stop that discovered v; INVALID for undiscovered stops.
    let mut prev = vec![StopId::INVALID; graph.stop_count()];
    prev[from.index()] = from;

    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(stop) = queue.pop_front() {
        for &next in graph.neighbors(stop) {
            if prev[next.index()] != StopId::INVALID {
                continue;
            }
            prev[next.index()] = stop;
            if next == to {
                let route = reconstruct(graph, &prev, from, to);
                tracing::debug!(%start, %goal, hops = route.hop_count(), "route planned");
                return Ok(route);
            }
            queue.push_back(next);
        }
    }

    tracing::debug!(%start, %goal, "no route");
    Err(TransitError::NoRoute { from: start.clone(), to: goal.clone() })
}

fn reconstruct(graph: &TransitGraph, prev: &[StopId], from: StopId, to: StopId) -> Route {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        path.push(cur);
    }
    path.reverse();

    let hops = path
        .windows(2)
        .map(|w| Hop {
            from: RouteStop::from(graph.stop_at(w[0])),
            to:   RouteStop::from(graph.stop_at(w[1])),
        })
        .collect();

    Route { start: graph.stop_at(from).key.clone(), hops }
}

// ── CachedPlanner ─────────────────────────────────────────────────────────────

/// Memoizes another planner per `(start, goal)` pair.
///
/// The cache remembers the [`generation`](TransitGraph::generation) it was
/// filled against and empties itself the first time it sees a different
/// graph, so a rebuilt network never serves stale routes.  Failed plans are
/// not cached.
pub struct CachedPlanner<P: RoutePlanner> {
    pub(crate) inner: P,
    cache: Mutex<PlanCache>,
}

#[derive(Default)]
struct PlanCache {
    generation: u64,
    routes: HashMap<(StopKey, StopKey), Route>,
}

impl<P: RoutePlanner> CachedPlanner<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, cache: Mutex::new(PlanCache::default()) }
    }

    /// Number of cached routes.
    pub fn len(&self) -> usize {
        self.lock().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PlanCache> {
        self.cache.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl<P: RoutePlanner> RoutePlanner for CachedPlanner<P> {
    fn plan(&self, graph: &TransitGraph, start: &StopKey, goal: &StopKey) -> TransitResult<Route> {
        let pair = (start.clone(), goal.clone());
        {
            let mut cache = self.lock();
            if cache.generation != graph.generation() {
                cache.routes.clear();
                cache.generation = graph.generation();
            } else if let Some(route) = cache.routes.get(&pair) {
                return Ok(route.clone());
            }
        }

        let route = self.inner.plan(graph, start, goal)?;

        let mut cache = self.lock();
        if cache.generation == graph.generation() {
            cache.routes.insert(pair, route.clone());
        }
        Ok(route)
    }
}
