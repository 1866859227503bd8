use crate::cell::{Cell, CellOp};
use crate::effect::{Commit, CommitOutcome, Effect};
use crate::error::{KernelError, OccupancyError};
use crate::organism::{Organism, OrganismSpec};
use crate::space::{Layer, Space};
use ecoscript_data::{Coord, EntityId};

/// A stack of same-sized layers plus the arena of every organism ever
/// created in it.
///
/// Organisms are addressed by [`EntityId`]; ids are handed out by
/// [`World::spawn`] in increasing order and never reused. A destroyed
/// organism stays in the arena with zero energy but no cell refers to it.
#[derive(Debug, Clone)]
pub struct World {
    width: usize,
    height: usize,
    layers: Vec<Layer>,
    organisms: Vec<Organism>,
    pub(crate) clock: u64,
}

impl World {
    pub fn new<S: AsRef<str>>(width: usize, height: usize, layer_names: &[S]) -> Self {
        let layers = layer_names
            .iter()
            .enumerate()
            .map(|(z, name)| Layer::new(name.as_ref(), z as i32, width, height))
            .collect();
        Self {
            width,
            height,
            layers,
            organisms: Vec::new(),
            clock: 0,
        }
    }

    /// Number of layers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn layer(&self, z: usize) -> Option<&Layer> {
        self.layers.get(z)
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Ticks completed so far.
    #[must_use]
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Creates an organism with the next free id. It is not placed anywhere
    /// until an [`Space::add`] commit for it is applied.
    pub fn spawn(&mut self, spec: OrganismSpec) -> EntityId {
        let id = EntityId(self.organisms.len() as u64);
        self.organisms.push(Organism::new(id, spec));
        id
    }

    #[must_use]
    pub fn organism(&self, id: EntityId) -> Option<&Organism> {
        self.organisms.get(id.index())
    }

    /// Every organism ever spawned, placed or not.
    pub fn organisms(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.iter()
    }

    pub(crate) fn organism_mut(&mut self, id: EntityId) -> Option<&mut Organism> {
        self.organisms.get_mut(id.index())
    }

    /// Organisms currently standing in some cell.
    #[must_use]
    pub fn population(&self) -> usize {
        self.layers.iter().map(Layer::population).sum()
    }

    /// Where `id` currently stands, searching every cell.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Coord> {
        for layer in &self.layers {
            for y in 0..self.height as i32 {
                for x in 0..self.width as i32 {
                    let at = Coord::spatial(x, y, layer.z());
                    if layer.cell(at).is_some_and(|c| c.contains(id)) {
                        return Some(at);
                    }
                }
            }
        }
        None
    }

    /// Validates and immediately applies placing `id` at `at`.
    pub fn place(&mut self, id: EntityId, at: Coord) -> Result<(), OccupancyError> {
        let organism = self.organism(id).ok_or(OccupancyError::UnknownEntity(id))?;
        let commit = self.add(organism, at)?;
        self.run_effects(commit.into_effects())
            .map(|_| ())
            .map_err(|KernelError::IndexDiverged { cause, .. }| cause)
    }

    fn layer_of(&self, at: Coord) -> Option<&Layer> {
        let z = at.layer();
        if z < 0 {
            return None;
        }
        self.layers.get(z as usize)
    }

    fn cell_mut(&mut self, at: Coord) -> Option<&mut Cell> {
        let z = at.layer();
        if z < 0 {
            return None;
        }
        self.layers.get_mut(z as usize)?.cell_mut(at)
    }

    /// Applies a commit released by an activity.
    ///
    /// Every cell operation is checked against the current state first; if
    /// any no longer validates the whole commit is dropped and
    /// [`CommitOutcome::Stale`] is returned. An organism whose energy drops
    /// to zero or below through a transfer is destroyed where the transfer
    /// says it stands. Failing to do so means the spatial index has diverged
    /// and is reported as a [`KernelError`].
    pub fn apply(&mut self, commit: Commit) -> Result<CommitOutcome, KernelError> {
        for effect in commit.effects() {
            if let Effect::Cell { at, op } = *effect {
                let valid = self.cell(at).is_some_and(|cell| cell.validate(op).is_ok());
                if !valid {
                    tracing::debug!(entity = %op.entity(), at = %at, "dropping stale commit");
                    return Ok(CommitOutcome::Stale);
                }
            }
        }
        let deaths = self.run_effects(commit.into_effects())?;
        Ok(CommitOutcome::Applied { deaths })
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Result<usize, KernelError> {
        let mut deaths = 0;
        for effect in effects {
            match effect {
                Effect::Cell { at, op } => self.apply_cell(at, op)?,
                Effect::Transfer { entity, energy, at } => {
                    if self.transfer(entity, energy, at)? {
                        deaths += 1;
                    }
                }
                Effect::EndLife { entity } => {
                    if let Some(organism) = self.organism_mut(entity) {
                        organism.end_life();
                    }
                }
                Effect::SetHeading {
                    entity,
                    ability,
                    delta,
                } => {
                    if let Some(ability) = self
                        .organism_mut(entity)
                        .and_then(|o| o.ability_mut(ability))
                    {
                        ability.set_heading(delta);
                    }
                }
            }
        }
        Ok(deaths)
    }

    fn apply_cell(&mut self, at: Coord, op: CellOp) -> Result<(), KernelError> {
        let entity = op.entity();
        let Some(cell) = self.cell_mut(at) else {
            return Err(KernelError::IndexDiverged {
                entity,
                at,
                cause: OccupancyError::OutOfBounds(at),
            });
        };
        cell.apply(op).map_err(|rejection| KernelError::IndexDiverged {
            entity,
            at,
            cause: rejection.at(entity, at),
        })
    }

    /// Returns `true` when the transfer killed the organism.
    fn transfer(&mut self, entity: EntityId, energy: i64, at: Coord) -> Result<bool, KernelError> {
        let Some(organism) = self.organism_mut(entity) else {
            return Ok(false);
        };
        if !organism.alive() {
            tracing::debug!(entity = %entity, "ignoring transfer to a dead organism");
            return Ok(false);
        }
        if organism.transfer(energy) {
            return Ok(false);
        }

        let Some(organism) = self.organism(entity) else {
            return Ok(false);
        };
        let destroy = self
            .destroy(organism, at)
            .map_err(|cause| KernelError::IndexDiverged { entity, at, cause })?;
        self.run_effects(destroy.into_effects())?;
        tracing::debug!(entity = %entity, at = %at, "organism starved");
        Ok(true)
    }
}

impl Space for World {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, at: Coord) -> bool {
        self.layer_of(at).is_some_and(|layer| layer.in_bounds(at))
    }

    fn cell(&self, at: Coord) -> Option<&Cell> {
        self.layer_of(at)?.cell(at)
    }

    fn locate(&self, at: Coord) -> Coord {
        at.on_layer(at.layer())
    }
}
