//! `gt-travel` — multi-hop travel sessions for controlled agents.
//!
//! # Session lifecycle
//!
//! ```text
//! Idle ─▶ Planning ─▶ Traveling ─┬─▶ Arrived
//!            │            │      ├─▶ Failed(kind)
//!            └────────────┴──────┴─▶ Interrupted ── resume ──▶ Traveling
//! ```
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`agent`]   | `TravelAgent`, `TravelAgentBuilder` — one session per agent    |
//! | [`session`] | `TravelSession` step machine, `SessionContext`, `InterruptHandle` |
//! | [`policy`]  | `RetryPolicy`, `HopOutcome`, `Verdict`                        |
//! | [`collab`]  | `Locomotion`, `Interaction`, `PositionSource`, `PrerequisiteCheck` |
//! | [`event`]   | `TravelEvent`, `EventSink`, `NoopSink`, `MemorySink`, `TracingSink` |
//! | [`status`]  | `SessionStatus`, `StatusSnapshot`, `TravelOutcome`            |
//! | [`error`]   | `FailureKind`, `TravelError`, `TravelResult<T>`               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gt_travel::{Collaborators, TravelAgent};
//!
//! let collaborators = Collaborators::new(locomotion, interaction, position)
//!     .with_events(Arc::new(TracingSink));
//! let agent = TravelAgent::builder(registry, network, collaborators).build()?;
//! let outcome = agent.travel_to_destination("jedi_shrine")?;
//! ```

pub mod agent;
pub mod collab;
pub mod error;
pub mod event;
pub mod policy;
pub mod session;
pub mod status;

#[cfg(test)]
mod tests;

pub use agent::{TravelAgent, TravelAgentBuilder};
pub use collab::{
    AllMet, Collaborators, Interaction, Locomotion, PositionSource, PrerequisiteCheck,
    TransitRequest,
};
pub use error::{FailureKind, TravelError, TravelResult};
pub use event::{EventSink, MemorySink, NoopSink, SinkError, TracingSink, TravelEvent};
pub use policy::{HopOutcome, RetryPolicy, Verdict};
pub use session::{InterruptHandle, SessionContext, TravelSession};
pub use status::{SessionStatus, StatusSnapshot, TravelOutcome};
