//! `gt-transit` — transit network, spatial stop index, and route planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`config`]  | `NetworkConfig`, `StopDecl`, `ConnectionDecl`               |
//! | [`graph`]   | `TransitGraph` (CSR + R-tree), `TransitStop`, `build`       |
//! | [`route`]   | `Route`, `Hop`, `RouteStop`, JSON persistence               |
//! | [`planner`] | `RoutePlanner` trait, `BfsPlanner`, `CachedPlanner`         |
//! | [`shared`]  | `SharedGraph` — atomically replaceable graph handle         |
//! | [`error`]   | `TransitError`, `TransitResult<T>`                          |
//!
//! # Identity at the boundary
//!
//! Stops are addressed by [`StopKey`](gt_core::StopKey) in every public
//! signature.  The graph assigns each stop a dense integer id at build time
//! and uses it for adjacency and BFS bookkeeping; the mapping stays private
//! to this crate.

pub mod config;
pub mod error;
pub mod graph;
pub mod planner;
pub mod route;
pub mod shared;


pub use config::{ConnectionDecl, NetworkConfig, StopDecl};
pub use error::{TransitError, TransitResult};
pub use graph::{build, TransitGraph, TransitStop};
pub use planner::{BfsPlanner, CachedPlanner, RoutePlanner};
pub use route::{Hop, Route, RouteStop};
pub use shared::SharedGraph;
