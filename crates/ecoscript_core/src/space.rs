//! Spatial query and mutation surface shared by [`Layer`] and
//! [`crate::world::World`].
//!
//! Mutating calls (`add`, `remove`, `move_entity`, `destroy`) only validate:
//! they return a [`Commit`] describing the change, which takes effect when
//! the world applies it.

use crate::cell::Cell;
use crate::effect::{Commit, Effect};
use crate::error::OccupancyError;
use crate::organism::Organism;
use ecoscript_data::Coord;
use rand::seq::SliceRandom;
use rand::Rng;

pub trait Space {
    /// Length of the x axis.
    fn width(&self) -> usize;

    /// Length of the y axis.
    fn height(&self) -> usize;

    /// Whether `at` names a cell of this space.
    fn in_bounds(&self, at: Coord) -> bool;

    /// The cell at `at`, or `None` when out of bounds.
    fn cell(&self, at: Coord) -> Option<&Cell>;

    /// Absolute coordinate recorded in effects for a cell of this space.
    fn locate(&self, at: Coord) -> Coord;

    /// In bounds and free of any occupier.
    fn walkable(&self, at: Coord) -> bool {
        self.cell(at).is_some_and(|cell| !cell.occupied())
    }

    /// In-bounds neighbors of `origin` within `radius`.
    fn view(&self, origin: Coord, radius: u32) -> Vec<Coord> {
        origin
            .neighborhood(radius)
            .into_iter()
            .filter(|c| self.in_bounds(*c))
            .collect()
    }

    /// [`Space::view`] in random order.
    fn view_shuffled<R: Rng + ?Sized>(&self, origin: Coord, radius: u32, rng: &mut R) -> Vec<Coord> {
        let mut coords = self.view(origin, radius);
        coords.shuffle(rng);
        coords
    }

    /// Walkable neighbors of `origin` within `radius`.
    fn view_walkable(&self, origin: Coord, radius: u32) -> Vec<Coord> {
        origin
            .neighborhood(radius)
            .into_iter()
            .filter(|c| self.walkable(*c))
            .collect()
    }

    /// [`Space::view_walkable`] in random order.
    fn view_walkable_shuffled<R: Rng + ?Sized>(
        &self,
        origin: Coord,
        radius: u32,
        rng: &mut R,
    ) -> Vec<Coord> {
        let mut coords = self.view_walkable(origin, radius);
        coords.shuffle(rng);
        coords
    }

    /// A uniformly chosen walkable neighbor, or `None` when there is none.
    fn random_walkable<R: Rng + ?Sized>(&self, origin: Coord, radius: u32, rng: &mut R) -> Option<Coord> {
        self.view_walkable(origin, radius).choose(rng).copied()
    }

    /// Validates placing `organism` at `at`.
    fn add(&self, organism: &Organism, at: Coord) -> Result<Commit, OccupancyError> {
        let cell = self.cell(at).ok_or(OccupancyError::OutOfBounds(at))?;
        let op = cell
            .add(organism.id(), organism.walkable())
            .map_err(|r| r.at(organism.id(), at))?;
        Ok(Commit::of(Effect::Cell {
            at: self.locate(at),
            op,
        }))
    }

    /// Validates taking `organism` out of the cell at `at`.
    fn remove(&self, organism: &Organism, at: Coord) -> Result<Commit, OccupancyError> {
        let cell = self.cell(at).ok_or(OccupancyError::OutOfBounds(at))?;
        let op = cell.remove(organism.id()).map_err(|r| r.at(organism.id(), at))?;
        Ok(Commit::of(Effect::Cell {
            at: self.locate(at),
            op,
        }))
    }

    /// Validates moving `organism` from `src` to `dst`. Both legs must
    /// validate; the commit adds at `dst` and then removes from `src`.
    fn move_entity(&self, organism: &Organism, src: Coord, dst: Coord) -> Result<Commit, OccupancyError> {
        let added = self.add(organism, dst);
        let removed = self.remove(organism, src);
        Ok(added?.then(removed?))
    }

    /// Validates removing `organism` from `at` and ending its life.
    fn destroy(&self, organism: &Organism, at: Coord) -> Result<Commit, OccupancyError> {
        let removed = self.remove(organism, at)?;
        Ok(removed.with(Effect::EndLife {
            entity: organism.id(),
        }))
    }
}

/// One width × height grid of cells.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    z: i32,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Layer {
    pub fn new(name: impl Into<String>, z: i32, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            z,
            width,
            height,
            cells: vec![Cell::new(); width * height],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of this layer in its world's stack.
    #[must_use]
    pub fn z(&self) -> i32 {
        self.z
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Total residents across every cell.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().map(Cell::population).sum()
    }

    fn index(&self, at: Coord) -> Option<usize> {
        let inside = at.x >= 0
            && at.y >= 0
            && (at.x as usize) < self.width
            && (at.y as usize) < self.height;
        if !inside {
            return None;
        }
        let index = at.flatten(self.width);
        (index < (self.width * self.height) as i64).then_some(index as usize)
    }

    pub(crate) fn cell_mut(&mut self, at: Coord) -> Option<&mut Cell> {
        let index = self.index(at)?;
        self.cells.get_mut(index)
    }
}

impl Space for Layer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, at: Coord) -> bool {
        self.index(at).is_some()
    }

    fn cell(&self, at: Coord) -> Option<&Cell> {
        self.index(at).and_then(|i| self.cells.get(i))
    }

    fn locate(&self, at: Coord) -> Coord {
        at.on_layer(self.z)
    }
}
