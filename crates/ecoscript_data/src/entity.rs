use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an organism, unique within the world that allocated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification tag matched against predator diets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trait(pub String);

impl Trait {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Trait {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Physical attributes of an organism.
///
/// `size` and `mass` are fixed at creation; `energy` changes through
/// transfers only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub walkable: bool,
    pub energy: i64,
    pub size: i64,
    pub mass: i64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            walkable: false,
            energy: 1,
            size: 1,
            mass: 1,
        }
    }
}

impl Attributes {
    /// Energy a predator gains by consuming this organism.
    #[must_use]
    pub fn biomass(&self) -> i64 {
        self.size.saturating_mul(self.mass)
    }
}
