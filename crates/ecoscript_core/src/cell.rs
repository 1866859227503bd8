//! Occupancy cell.
//!
//! A cell holds every organism standing on one grid location. Non-walkable
//! organisms block the cell: at most one of them (the occupier) may be there
//! at a time, while walkable organisms share the cell freely. Validation
//! ([`Cell::add`], [`Cell::remove`]) is separate from mutation
//! ([`Cell::apply`]) so callers can check several operations before
//! committing any of them.

use crate::error::OccupancyError;
use ecoscript_data::{Coord, EntityId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// A validated, not yet applied, change to one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOp {
    Insert { entity: EntityId, walkable: bool },
    Remove { entity: EntityId },
}

impl CellOp {
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match *self {
            CellOp::Insert { entity, .. } | CellOp::Remove { entity } => entity,
        }
    }
}

/// Why a cell refused an operation. Carries no location; see
/// [`Rejection::at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Occupied(EntityId),
    AlreadyPresent,
    NotPresent,
}

impl Rejection {
    /// Attaches the offending entity and location.
    #[must_use]
    pub fn at(self, entity: EntityId, at: Coord) -> OccupancyError {
        match self {
            Rejection::Occupied(occupier) => OccupancyError::Occupied { at, occupier },
            Rejection::AlreadyPresent => OccupancyError::AlreadyPresent { entity, at },
            Rejection::NotPresent => OccupancyError::NotPresent { entity, at },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    occupier: Option<EntityId>,
    stack: Vec<EntityId>,
    depths: HashMap<EntityId, usize>,
}

impl Cell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn occupied(&self) -> bool {
        self.occupier.is_some()
    }

    #[must_use]
    pub fn occupier(&self) -> Option<EntityId> {
        self.occupier
    }

    /// Residents in insertion order, occupier included.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.stack
    }

    /// Residents in a fresh random order.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<EntityId> {
        let mut residents = self.stack.clone();
        residents.shuffle(rng);
        residents
    }

    /// The most recently added resident.
    #[must_use]
    pub fn top(&self) -> Option<EntityId> {
        self.stack.last().copied()
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.depths.contains_key(&entity)
    }

    /// Validates adding `entity`. A non-walkable entity is refused while the
    /// cell has an occupier.
    pub fn add(&self, entity: EntityId, walkable: bool) -> Result<CellOp, Rejection> {
        let op = CellOp::Insert { entity, walkable };
        self.validate(op)?;
        Ok(op)
    }

    /// Validates removing `entity`.
    pub fn remove(&self, entity: EntityId) -> Result<CellOp, Rejection> {
        let op = CellOp::Remove { entity };
        self.validate(op)?;
        Ok(op)
    }

    /// Checks `op` against the current contents.
    pub fn validate(&self, op: CellOp) -> Result<(), Rejection> {
        match op {
            CellOp::Insert { entity, walkable } => {
                if self.contains(entity) {
                    return Err(Rejection::AlreadyPresent);
                }
                match self.occupier {
                    Some(occupier) if !walkable => Err(Rejection::Occupied(occupier)),
                    _ => Ok(()),
                }
            }
            CellOp::Remove { entity } => {
                if self.contains(entity) {
                    Ok(())
                } else {
                    Err(Rejection::NotPresent)
                }
            }
        }
    }

    /// Applies `op`, re-validating it first.
    pub fn apply(&mut self, op: CellOp) -> Result<(), Rejection> {
        self.validate(op)?;
        match op {
            CellOp::Insert { entity, walkable } => {
                self.depths.insert(entity, self.stack.len());
                self.stack.push(entity);
                if !walkable {
                    self.occupier = Some(entity);
                }
            }
            CellOp::Remove { entity } => {
                if let Some(depth) = self.depths.remove(&entity) {
                    self.stack.remove(depth);
                    for (i, id) in self.stack.iter().enumerate().skip(depth) {
                        self.depths.insert(*id, i);
                    }
                }
                if self.occupier == Some(entity) {
                    self.occupier = None;
                }
            }
        }
        Ok(())
    }
}
