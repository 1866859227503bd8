//! Deferred mutations.
//!
//! Every change a behavior makes to the world is captured as a [`Commit`]:
//! an ordered list of [`Effect`] values built when the behavior decides and
//! applied later, once, by [`crate::world::World::apply`]. Commits hold only
//! the data captured at decision time (destinations, victims, amounts), so
//! applying one never re-derives a decision from newer state.

use crate::cell::CellOp;
use ecoscript_data::{Coord, EntityId};

/// A single deferred mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Insert into or remove from the cell at `at`.
    Cell { at: Coord, op: CellOp },
    /// Add `energy` (possibly negative) to `entity`, which is located at `at`.
    Transfer {
        entity: EntityId,
        energy: i64,
        at: Coord,
    },
    /// Zero the entity's energy.
    EndLife { entity: EntityId },
    /// Store a new movement heading on one of the entity's abilities.
    SetHeading {
        entity: EntityId,
        ability: usize,
        delta: Coord,
    },
}

/// Ordered list of effects applied as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    effects: Vec<Effect>,
}

impl Commit {
    /// A commit that changes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn of(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
        }
    }

    /// Appends the effects of `next` after this commit's effects.
    #[must_use]
    pub fn then(mut self, next: Commit) -> Self {
        self.effects.extend(next.effects);
        self
    }

    #[must_use]
    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub(crate) fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

/// What happened when a commit was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Every effect ran. `deaths` counts organisms whose energy dropped to
    /// zero or below through a transfer and were removed.
    Applied { deaths: usize },
    /// A cell operation no longer validated; nothing ran.
    Stale,
}
