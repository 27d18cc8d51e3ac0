//! In-world coordinate types.
//!
//! Each planet has its own flat coordinate plane, so distances are only
//! meaningful between two points on the same planet.  `Coordinates` uses
//! `f32`; world units are metres and planets span a few tens of kilometres,
//! well inside single-precision range.

/// A point on a planet's surface plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
}

impl Coordinates {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in world units.
    pub fn distance(self, other: Coordinates) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// `true` if `other` lies within `radius` of `self` (inclusive).
    #[inline]
    pub fn within(self, other: Coordinates, radius: f32) -> bool {
        self.distance(other) <= radius
    }

    /// `[x, y]` array form used by the spatial index.
    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Where an agent currently stands: a planet plus coordinates on it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub planet: String,
    pub coords: Coordinates,
}

impl Position {
    pub fn new(planet: impl Into<String>, coords: Coordinates) -> Self {
        Self { planet: planet.into(), coords }
    }

    /// Distance to `coords` on `planet`, or `None` when on another planet.
    pub fn distance_to(&self, planet: &str, coords: Coordinates) -> Option<f32> {
        (self.planet == planet).then(|| self.coords.distance(coords))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.planet, self.coords)
    }
}
