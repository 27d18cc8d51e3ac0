//! Atomically replaceable handle to the current transit graph.

use std::sync::{Arc, RwLock};

use crate::config::NetworkConfig;
use crate::graph::{build, TransitGraph};
use crate::TransitResult;

/// Cheap-to-clone handle through which every controller reads the network.
///
/// Readers take an `Arc` snapshot with [`snapshot`](Self::snapshot) and keep
/// using it for as long as they like.  [`replace`](Self::replace) swaps the
/// whole graph in one step; snapshots taken earlier are unaffected.
#[derive(Clone)]
pub struct SharedGraph {
    current: Arc<RwLock<Arc<TransitGraph>>>,
}

impl SharedGraph {
    pub fn new(graph: TransitGraph) -> Self {
        Self { current: Arc::new(RwLock::new(Arc::new(graph))) }
    }

    /// The graph as of now.
    pub fn snapshot(&self) -> Arc<TransitGraph> {
        let guard = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&*guard)
    }

    /// Install `graph`, returning the one it replaced.
    pub fn replace(&self, graph: TransitGraph) -> Arc<TransitGraph> {
        let mut guard = self.current.write().unwrap_or_else(|p| p.into_inner());
        std::mem::replace(&mut *guard, Arc::new(graph))
    }

    /// Build a graph from `config` and install it.  On error the current
    /// graph stays in place.
    pub fn rebuild(&self, config: &NetworkConfig) -> TransitResult<()> {
        let graph = build(config)?;
        let old = self.replace(graph);
        tracing::info!(old_generation = old.generation(), "transit graph replaced");
        Ok(())
    }
}

impl Default for SharedGraph {
    fn default() -> Self {
        Self::new(TransitGraph::empty())
    }
}
