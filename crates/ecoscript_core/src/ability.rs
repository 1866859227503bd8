//! Behavior registry and configured abilities.
//!
//! A [`Behavior`] names one of the fixed decision strategies. An [`Ability`]
//! is a behavior bound to its typed properties; it is built from the
//! behavior's defaults with caller-supplied [`Properties`] layered on top.
//!
//! | behavior  | properties                          |
//! |-----------|-------------------------------------|
//! | `grow`    | `rate` (1..=10, default 5)          |
//! | `consume` | `diet` (list of traits, default []) |
//! | `move`    | `delta` (unit step), `speed` (1..=30), `effort` |
//! | `wander`  | same as `move`                      |

use crate::error::PropertyError;
use ecoscript_data::{Coord, Trait};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key/value overrides for an ability, as read from a mapfile.
pub type Properties = toml::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    Grow,
    Consume,
    Move,
    Wander,
}

impl Behavior {
    pub const ALL: [Behavior; 4] = [
        Behavior::Grow,
        Behavior::Consume,
        Behavior::Move,
        Behavior::Wander,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Behavior::Grow => "grow",
            Behavior::Consume => "consume",
            Behavior::Move => "move",
            Behavior::Wander => "wander",
        }
    }

    /// Looks a behavior up by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }

    /// Property keys the behavior accepts.
    #[must_use]
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Behavior::Grow => &["rate"],
            Behavior::Consume => &["diet"],
            Behavior::Move | Behavior::Wander => &["delta", "speed", "effort"],
        }
    }

    /// The ability with every property at its default.
    #[must_use]
    pub fn defaults(self) -> Ability {
        match self {
            Behavior::Grow => Ability::Grow(GrowProps::default()),
            Behavior::Consume => Ability::Consume(ConsumeProps::default()),
            Behavior::Move => Ability::Move(MoveProps::default()),
            Behavior::Wander => Ability::Wander(MoveProps::default()),
        }
    }

    /// Builds an ability from the defaults overridden by `overrides`.
    pub fn ability(self, overrides: &Properties) -> Result<Ability, PropertyError> {
        if let Some(key) = overrides.keys().find(|k| !self.keys().contains(&k.as_str())) {
            return Err(PropertyError::UnknownProperty {
                behavior: self.name(),
                key: key.clone(),
            });
        }
        let ability = match self {
            Behavior::Grow => Ability::Grow(resolve(self, overrides)?),
            Behavior::Consume => Ability::Consume(resolve(self, overrides)?),
            Behavior::Move => Ability::Move(resolve(self, overrides)?),
            Behavior::Wander => Ability::Wander(resolve(self, overrides)?),
        };
        ability.check_ranges()?;
        Ok(ability)
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Missing keys fall back to the property struct's `Default` through
// `#[serde(default)]`.
fn resolve<T: DeserializeOwned>(behavior: Behavior, overrides: &Properties) -> Result<T, PropertyError> {
    toml::Value::Table(overrides.clone())
        .try_into()
        .map_err(|source| PropertyError::Malformed {
            behavior: behavior.name(),
            source,
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowProps {
    pub rate: i64,
}

impl Default for GrowProps {
    fn default() -> Self {
        Self { rate: 5 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumeProps {
    pub diet: Vec<Trait>,
}

/// Movement properties. A zero `delta` means no heading has been chosen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveProps {
    pub delta: Coord,
    pub speed: u32,
    pub effort: i64,
}

impl Default for MoveProps {
    fn default() -> Self {
        Self {
            delta: Coord::planar(0, 0),
            speed: 1,
            effort: 1,
        }
    }
}

/// A behavior bound to its resolved properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ability {
    Grow(GrowProps),
    Consume(ConsumeProps),
    Move(MoveProps),
    Wander(MoveProps),
}

impl Ability {
    #[must_use]
    pub fn behavior(&self) -> Behavior {
        match self {
            Ability::Grow(_) => Behavior::Grow,
            Ability::Consume(_) => Behavior::Consume,
            Ability::Move(_) => Behavior::Move,
            Ability::Wander(_) => Behavior::Wander,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.behavior().name()
    }

    /// Current heading of a movement ability.
    #[must_use]
    pub fn heading(&self) -> Option<Coord> {
        match self {
            Ability::Move(p) | Ability::Wander(p) => Some(p.delta),
            _ => None,
        }
    }

    /// Stores a new heading. Ignored by abilities that do not move.
    pub fn set_heading(&mut self, delta: Coord) {
        if let Ability::Move(p) | Ability::Wander(p) = self {
            p.delta = delta;
        }
    }

    fn check_ranges(&self) -> Result<(), PropertyError> {
        let behavior = self.name();
        let check = |key: &'static str, value: i64, min: i64, max: i64| {
            if (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(PropertyError::OutOfRange {
                    behavior,
                    key,
                    min,
                    max,
                    value,
                })
            }
        };
        match self {
            Ability::Grow(p) => check("rate", p.rate, 1, 10),
            Ability::Consume(_) => Ok(()),
            Ability::Move(p) | Ability::Wander(p) => {
                // Headings are single steps on the current layer.
                check("delta.x", i64::from(p.delta.x), -1, 1)?;
                check("delta.y", i64::from(p.delta.y), -1, 1)?;
                check("delta.z", p.delta.z.map_or(0, i64::from), 0, 0)?;
                check("speed", i64::from(p.speed), 1, 30)?;
                check("effort", p.effort, 0, 1000)
            }
        }
    }
}
