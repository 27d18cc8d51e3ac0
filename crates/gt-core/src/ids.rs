//! Public identity of a transit stop.
//!
//! Stops are addressed by `(planet, city)` everywhere outside the transit
//! graph.  The graph translates keys into dense integer ids internally; those
//! never leave `gt-transit`.

use std::fmt;

/// Composite key of a transit stop.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopKey {
    pub planet: String,
    pub city: String,
}

impl StopKey {
    pub fn new(planet: impl Into<String>, city: impl Into<String>) -> Self {
        Self { planet: planet.into(), city: city.into() }
    }

    /// `true` if the stop lies on `planet`.
    #[inline]
    pub fn is_on(&self, planet: &str) -> bool {
        self.planet == planet
    }
}

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.planet, self.city)
    }
}
