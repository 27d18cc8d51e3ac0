//! Declarative network description, as parsed from configuration.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "stops": [
//!     {
//!       "planet": "tatooine", "city": "mos_eisley",
//!       "coordinates": { "x": 3528.0, "y": -4804.0 },
//!       "boarding_agent": "shuttle_mos_eisley",
//!       "connections": [
//!         { "planet": "tatooine", "city": "bestine", "bidirectional": true },
//!         { "planet": "naboo", "city": "theed" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Connections are directed as written.  `bidirectional: true` asks the
//! builder to add the reverse edge as well; symmetry is never inferred.

use serde::{Deserialize, Serialize};

use gt_core::{Coordinates, StopKey};

/// The whole transit network.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub stops: Vec<StopDecl>,
}

/// One stop and the stops reachable from it in a single hop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopDecl {
    pub planet: String,
    pub city: String,
    pub coordinates: Coordinates,
    /// Identity of the shuttle/transport terminal the interaction
    /// collaborator talks to at this stop.
    pub boarding_agent: String,
    #[serde(default)]
    pub connections: Vec<ConnectionDecl>,
}

impl StopDecl {
    pub fn key(&self) -> StopKey {
        StopKey::new(self.planet.as_str(), self.city.as_str())
    }
}

/// A directly reachable neighbor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDecl {
    pub planet: String,
    pub city: String,
    #[serde(default)]
    pub bidirectional: bool,
}

impl ConnectionDecl {
    pub fn key(&self) -> StopKey {
        StopKey::new(self.planet.as_str(), self.city.as_str())
    }
}
