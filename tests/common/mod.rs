pub mod macros;

use ecoscript_core::ability::Ability;
use ecoscript_core::config::TimingConfig;
use ecoscript_core::organism::OrganismSpec;
use ecoscript_core::world::World;
use ecoscript_data::{Attributes, Coord, EntityId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[allow(dead_code)]
pub struct WorldBuilder {
    width: usize,
    height: usize,
    layers: Vec<String>,
    organisms: Vec<(OrganismSpec, Coord)>,
    seed: u64,
    timings: TimingConfig,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            layers: vec!["ground".to_string()],
            organisms: Vec::new(),
            seed: 42,
            timings: TimingConfig::default(),
        }
    }

    pub fn with_layers(mut self, names: &[&str]) -> Self {
        self.layers = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_timings(mut self, timings: TimingConfig) -> Self {
        self.timings = timings;
        self
    }

    pub fn without_delays(self) -> Self {
        self.with_timings(TimingConfig {
            grow_delay: 0,
            consume_delay: 0,
            move_delay: 0,
        })
    }

    pub fn with_organism(mut self, spec: OrganismSpec, at: Coord) -> Self {
        self.organisms.push((spec, at));
        self
    }

    /// Builds the world. Organism ids follow insertion order.
    pub fn build(self) -> TestWorld {
        let mut world = World::new(self.width, self.height, &self.layers[..]);
        let mut ids = Vec::with_capacity(self.organisms.len());
        for (spec, at) in self.organisms {
            let id = world.spawn(spec);
            world
                .place(id, at)
                .expect("Failed to place organism in test builder");
            ids.push(id);
        }
        TestWorld {
            world,
            ids,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            timings: self.timings,
        }
    }
}

#[allow(dead_code)]
pub struct TestWorld {
    pub world: World,
    pub ids: Vec<EntityId>,
    pub rng: ChaCha8Rng,
    pub timings: TimingConfig,
}

#[allow(dead_code)]
impl TestWorld {
    pub fn tick(&mut self) -> ecoscript_core::scheduler::TickReport {
        self.world
            .tick(&mut self.rng, &self.timings)
            .expect("tick failed")
    }

    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn energy(&self, index: usize) -> i64 {
        self.world
            .organism(self.ids[index])
            .expect("organism not found")
            .energy()
    }
}

#[allow(dead_code)]
pub struct OrganismBuilder {
    spec: OrganismSpec,
}

#[allow(dead_code)]
impl OrganismBuilder {
    pub fn new(name: &str, symbol: char) -> Self {
        Self {
            spec: OrganismSpec::new(name, symbol),
        }
    }

    pub fn walkable(mut self, walkable: bool) -> Self {
        self.spec.attributes.walkable = walkable;
        self
    }

    pub fn energy(mut self, energy: i64) -> Self {
        self.spec.attributes.energy = energy;
        self
    }

    pub fn body(mut self, size: i64, mass: i64) -> Self {
        self.spec.attributes.size = size;
        self.spec.attributes.mass = mass;
        self
    }

    pub fn traits(mut self, traits: &[&str]) -> Self {
        self.spec = self.spec.with_traits(traits.iter().copied());
        self
    }

    pub fn ability(mut self, ability: Ability) -> Self {
        self.spec = self.spec.with_ability(ability);
        self
    }

    pub fn build(self) -> OrganismSpec {
        self.spec
    }
}

#[allow(dead_code)]
pub fn rock() -> OrganismSpec {
    OrganismSpec::new("rock", '#').with_attributes(Attributes {
        walkable: false,
        energy: 1000,
        size: 1,
        mass: 1,
    })
}
