//! `gt-registry` — named travel destinations.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`destination`] | `Destination`, `DestinationKind`, `KindTag`, `Prerequisite`, `DestinationDecl` |
//! | [`registry`]    | `DestinationRegistry` — validated, ordered storage       |
//! | [`error`]       | `RegistryError`, `RegistryResult<T>`                     |
//!
//! Destinations arrive as loosely-typed [`DestinationDecl`]s (every field
//! optional, as parsed from configuration) and are validated into the
//! closed [`Destination`] type on registration.

pub mod destination;
pub mod error;
pub mod registry;


pub use destination::{Destination, DestinationDecl, DestinationKind, KindTag, Prerequisite};
pub use error::{RegistryError, RegistryResult};
pub use registry::{ByKind, DestinationRegistry};
