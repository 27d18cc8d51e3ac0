//! `gt-core` — foundational types for the galactic travel workspace.
//!
//! This crate is a dependency of every other `gt-*` crate.  It intentionally
//! has no `gt-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `StopKey` — the (planet, city) identity of a stop     |
//! | [`geo`]     | `Coordinates`, `Position`, planar distance            |
//! | [`time`]    | `Clock`, `SystemClock`, `ManualClock`                 |
//! | [`config`]  | `TravelConfig` tunables                               |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::TravelConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Coordinates, Position};
pub use ids::StopKey;
pub use time::{Clock, ManualClock, SystemClock};
