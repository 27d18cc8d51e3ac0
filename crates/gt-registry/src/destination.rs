//! Destination types.
//!
//! # Declaration format
//!
//! ```json
//! {
//!   "id": "brawler_trainer_theed",
//!   "kind": "trainer",
//!   "profession": "brawler",
//!   "network_entry": { "planet": "naboo", "city": "theed" },
//!   "final_coordinates": { "x": -4856.0, "y": 4155.0 },
//!   "prerequisites": [ { "type": "reputation", "faction": "naboo", "min": 100 } ]
//! }
//! ```
//!
//! `kind` is one of `trainer`, `quest`, `unlock`.  Only `unlock`
//! destinations carry `unlock_conditions`, and they must carry a non-empty
//! map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use gt_core::{Coordinates, StopKey};

use crate::{RegistryError, RegistryResult};

// ── Prerequisite ──────────────────────────────────────────────────────────────

/// A precondition that must hold before travel to a destination starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prerequisite {
    /// A quest the agent must have completed.
    Quest { id: String },
    /// Minimum standing with a faction.
    Reputation { faction: String, min: i32 },
    /// A skill the agent must already have learned.
    Skill { name: String },
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::Quest { id }              => write!(f, "quest {id} completed"),
            Prerequisite::Reputation { faction, min } => write!(f, "{faction} reputation >= {min}"),
            Prerequisite::Skill { name }            => write!(f, "skill {name} learned"),
        }
    }
}

// ── Kind ──────────────────────────────────────────────────────────────────────

/// Fieldless discriminant of [`DestinationKind`], used for filtering and in
/// declarations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Trainer,
    Quest,
    Unlock,
}

impl KindTag {
    pub fn as_str(self) -> &'static str {
        match self {
            KindTag::Trainer => "trainer",
            KindTag::Quest   => "quest",
            KindTag::Unlock  => "unlock",
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a destination is, with only the fields relevant to each case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DestinationKind {
    Trainer { profession: Option<String> },
    Quest { quest: Option<String> },
    Unlock { conditions: BTreeMap<String, String> },
}

impl DestinationKind {
    pub fn tag(&self) -> KindTag {
        match self {
            DestinationKind::Trainer { .. } => KindTag::Trainer,
            DestinationKind::Quest { .. }   => KindTag::Quest,
            DestinationKind::Unlock { .. }  => KindTag::Unlock,
        }
    }
}

// ── Destination ───────────────────────────────────────────────────────────────

/// A validated travel target.  Immutable once registered.
#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    pub id: String,
    /// Stop where transit delivers the agent; final approach starts here.
    pub network_entry: StopKey,
    pub final_coordinates: Coordinates,
    pub kind: DestinationKind,
    /// Checked in order before any movement.
    pub prerequisites: Vec<Prerequisite>,
}

impl Destination {
    /// `unlock_conditions` of an `Unlock` destination, `None` otherwise.
    pub fn unlock_conditions(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            DestinationKind::Unlock { conditions } => Some(conditions),
            _ => None,
        }
    }
}

// ── Declaration ───────────────────────────────────────────────────────────────

/// A destination as written in configuration.  Converted into a
/// [`Destination`] with `TryFrom`, which is where validation happens.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationDecl {
    pub id: String,
    pub kind: Option<KindTag>,
    pub network_entry: Option<StopKey>,
    pub final_coordinates: Option<Coordinates>,
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
    #[serde(default)]
    pub unlock_conditions: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub quest: Option<String>,
}

impl TryFrom<DestinationDecl> for Destination {
    type Error = RegistryError;

    fn try_from(decl: DestinationDecl) -> RegistryResult<Destination> {
        let invalid = |reason| RegistryError::InvalidDestination { id: decl.id.clone(), reason };

        if decl.id.trim().is_empty() {
            return Err(invalid("id is empty"));
        }
        let tag = decl.kind.ok_or_else(|| invalid("kind is missing"))?;
        let network_entry = decl
            .network_entry
            .clone()
            .ok_or_else(|| invalid("network_entry is missing"))?;
        if network_entry.planet.is_empty() || network_entry.city.is_empty() {
            return Err(invalid("network_entry has an empty planet or city"));
        }
        let final_coordinates = decl
            .final_coordinates
            .ok_or_else(|| invalid("final_coordinates is missing"))?;

        let kind = match tag {
            KindTag::Trainer => DestinationKind::Trainer { profession: decl.profession.clone() },
            KindTag::Quest   => DestinationKind::Quest { quest: decl.quest.clone() },
            KindTag::Unlock  => match &decl.unlock_conditions {
                Some(conditions) if !conditions.is_empty() => {
                    DestinationKind::Unlock { conditions: conditions.clone() }
                }
                _ => return Err(invalid("unlock destination without unlock_conditions")),
            },
        };

        Ok(Destination {
            id: decl.id,
            network_entry,
            final_coordinates,
            kind,
            prerequisites: decl.prerequisites,
        })
    }
}
