//! Transit graph representation and builder.
//!
//! # Data layout
//!
//! Stops live in an arena (`Vec<TransitStop>`) indexed by a dense `StopId`
//! assigned in declaration order.  Outgoing connections use **Compressed
//! Sparse Row (CSR)** format: the neighbors of stop `s` occupy
//!
//! ```text
//! adj_to[ adj_start[s] .. adj_start[s+1] ]
//! ```
//!
//! Within that slice neighbors keep their configuration order (declared
//! connections first, then reverse edges materialized from `bidirectional`
//! declarations), which is what makes BFS tie-breaking deterministic.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `[x, y]` to the nearest stop.  Used to
//! resolve an agent's current position to the stop a session departs from.
//! Planets share one tree; lookups skip stops on other planets.

use std::sync::atomic::{AtomicU64, Ordering};

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use gt_core::{Coordinates, Position, StopKey};

use crate::config::NetworkConfig;
use crate::{TransitError, TransitResult};

// ── Dense stop id ─────────────────────────────────────────────────────────────

/// Index of a stop in the graph arena.  Never exposed outside this crate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct StopId(pub(crate) u32);

impl StopId {
    /// Sentinel meaning "no valid stop".
    pub(crate) const INVALID: StopId = StopId(u32::MAX);

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Every built graph gets a distinct generation so caches keyed on a graph
/// can tell when it has been replaced.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

// ── R-tree stop entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct StopEntry {
    point: [f32; 2], // [x, y]
    id: StopId,
}

impl RTreeObject for StopEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── TransitStop ───────────────────────────────────────────────────────────────

/// A stop in the built graph.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitStop {
    pub key: StopKey,
    pub coordinates: Coordinates,
    /// Terminal the interaction collaborator addresses when boarding here.
    pub boarding_agent: String,
}

// ── TransitGraph ──────────────────────────────────────────────────────────────

/// Immutable directed transit graph plus a spatial index over its stops.
///
/// Built once by [`build`] and never mutated; rebuilding produces a new
/// graph which callers swap in through [`SharedGraph`](crate::SharedGraph).
pub struct TransitGraph {
    stops: Vec<TransitStop>,
    index: FxHashMap<StopKey, StopId>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Length = `stop_count + 1`.
    adj_start: Vec<u32>,
    adj_to: Vec<StopId>,

    spatial_idx: RTree<StopEntry>,
    generation: u64,
}

impl TransitGraph {
    /// A graph with no stops.  Every planning request against it fails.
    pub fn empty() -> Self {
        assemble(Vec::new(), FxHashMap::default(), Vec::new())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn connection_count(&self) -> usize {
        self.adj_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Unique stamp of this build.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Lookups by key ────────────────────────────────────────────────────

    pub fn contains(&self, key: &StopKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn stop(&self, key: &StopKey) -> Option<&TransitStop> {
        self.id_of(key).map(|id| self.stop_at(id))
    }

    /// All stops in declaration order.
    pub fn stops(&self) -> impl Iterator<Item = &TransitStop> + '_ {
        self.stops.iter()
    }

    /// Keys directly reachable from `key` in one hop, in configuration
    /// order.  `None` if `key` is not a stop of this graph.
    pub fn connections(&self, key: &StopKey) -> Option<impl Iterator<Item = &StopKey> + '_> {
        let id = self.id_of(key)?;
        Some(self.neighbors(id).iter().map(|n| &self.stops[n.index()].key))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The stop closest to `position` on the same planet, if any.
    pub fn nearest_stop(&self, position: &Position) -> Option<&TransitStop> {
        self.spatial_idx
            .nearest_neighbor_iter(&position.coords.to_array())
            .map(|e| &self.stops[e.id.index()])
            .find(|s| s.key.is_on(&position.planet))
    }

    // ── Dense-id traversal (crate-internal) ───────────────────────────────

    #[inline]
    pub(crate) fn id_of(&self, key: &StopKey) -> Option<StopId> {
        self.index.get(key).copied()
    }

    #[inline]
    pub(crate) fn stop_at(&self, id: StopId) -> &TransitStop {
        &self.stops[id.index()]
    }

    /// Contiguous neighbor slice of `id`, without allocating.
    #[inline]
    pub(crate) fn neighbors(&self, id: StopId) -> &[StopId] {
        let start = self.adj_start[id.index()] as usize;
        let end   = self.adj_start[id.index() + 1] as usize;
        &self.adj_to[start..end]
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Turn a network declaration into a [`TransitGraph`].
///
/// # Errors
///
/// - [`TransitError::DuplicateStop`] if two declarations share a key.
/// - [`TransitError::DanglingReference`] if a connection names a stop that
///   is not itself declared.
///
/// Duplicate connections between the same pair collapse to one edge; the
/// first occurrence fixes its position in the neighbor order.
pub fn build(config: &NetworkConfig) -> TransitResult<TransitGraph> {
    let stop_count = config.stops.len();

    let mut index: FxHashMap<StopKey, StopId> =
        FxHashMap::with_capacity_and_hasher(stop_count, Default::default());
    let mut stops = Vec::with_capacity(stop_count);

    for decl in &config.stops {
        let key = decl.key();
        let id = StopId(stops.len() as u32);
        if index.insert(key.clone(), id).is_some() {
            return Err(TransitError::DuplicateStop(key));
        }
        stops.push(TransitStop {
            key,
            coordinates:    decl.coordinates,
            boarding_agent: decl.boarding_agent.clone(),
        });
    }

    // Declared edges first; reverse edges of bidirectional links are queued
    // and appended afterwards so they never reorder declared neighbors.
    let mut adjacency: Vec<Vec<StopId>> = vec![Vec::new(); stop_count];
    let mut reverse: Vec<(StopId, StopId)> = Vec::new();

    for (i, decl) in config.stops.iter().enumerate() {
        let from = StopId(i as u32);
        for conn in &decl.connections {
            let to_key = conn.key();
            let to = match index.get(&to_key) {
                Some(&id) => id,
                None => {
                    return Err(TransitError::DanglingReference {
                        from: stops[i].key.clone(),
                        to:   to_key,
                    });
                }
            };
            push_unique(&mut adjacency[from.index()], to);
            if conn.bidirectional {
                reverse.push((to, from));
            }
        }
    }
    for (from, to) in reverse {
        push_unique(&mut adjacency[from.index()], to);
    }

    let graph = assemble(stops, index, adjacency);
    tracing::debug!(
        stops       = graph.stop_count(),
        connections = graph.connection_count(),
        generation  = graph.generation,
        "transit graph built"
    );
    Ok(graph)
}

fn push_unique(list: &mut Vec<StopId>, id: StopId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

/// Flatten adjacency lists into CSR and bulk-load the R-tree.
fn assemble(
    stops:     Vec<TransitStop>,
    index:     FxHashMap<StopKey, StopId>,
    adjacency: Vec<Vec<StopId>>,
) -> TransitGraph {
    let mut adj_start = Vec::with_capacity(stops.len() + 1);
    let mut adj_to = Vec::with_capacity(adjacency.iter().map(Vec::len).sum());
    adj_start.push(0u32);
    for list in &adjacency {
        adj_to.extend_from_slice(list);
        adj_start.push(adj_to.len() as u32);
    }
    debug_assert_eq!(adj_start.len(), stops.len() + 1);

    let entries: Vec<StopEntry> = stops
        .iter()
        .enumerate()
        .map(|(i, s)| StopEntry { point: s.coordinates.to_array(), id: StopId(i as u32) })
        .collect();
    let spatial_idx = RTree::bulk_load(entries);

    TransitGraph {
        stops,
        index,
        adj_start,
        adj_to,
        spatial_idx,
        generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
    }
}
