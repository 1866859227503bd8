//! # Ecoscript Core
//!
//! The simulation kernel for Ecoscript, a tick-based ecosystem on a layered
//! grid.
//!
//! This crate contains:
//! - Occupancy cells and the [`space::Space`] query surface
//! - Organisms, their abilities and the behaviors that drive them
//! - Delayed actions captured as commits and applied exactly once
//! - The randomized tick scheduler
//! - Configuration, run metrics and structured logging
//!
//! ## Architecture
//!
//! Behaviors only read the world and describe what they want as a
//! [`effect::Commit`]. The commit travels through the organism's
//! [`activity::Activity`] and is applied by [`world::World::apply`] once its
//! delay has elapsed, after re-validating every cell operation it contains.
//! All randomness comes from a caller-supplied RNG, so a seeded RNG gives a
//! reproducible run.
//!
//! ## Example
//!
//! ```
//! use ecoscript_core::ability::Behavior;
//! use ecoscript_core::config::TimingConfig;
//! use ecoscript_core::organism::OrganismSpec;
//! use ecoscript_core::world::World;
//! use ecoscript_data::Coord;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut world = World::new(8, 8, &["ground"]);
//! let moss = world.spawn(OrganismSpec::new("moss", 'm').with_ability(Behavior::Grow.defaults()));
//! world.place(moss, Coord::planar(3, 3)).unwrap();
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let report = world.tick(&mut rng, &TimingConfig::default()).unwrap();
//! assert_eq!(report.ticked, 1);
//! ```

/// Behavior registry and typed ability properties
pub mod ability;
/// Per-organism delayed action state
pub mod activity;
/// Decision logic for each behavior
pub mod behavior;
/// Occupancy bookkeeping for a single grid cell
pub mod cell;
/// Configuration management for simulation parameters
pub mod config;
/// Deferred world mutations
pub mod effect;
/// Kernel error types
pub mod error;
/// Run statistics and logging setup
pub mod metrics;
/// Organisms and their construction specs
pub mod organism;
/// Tick scheduling
pub mod scheduler;
/// Spatial queries and layers
pub mod space;
/// The world: layers plus the organism arena
pub mod world;

pub use ability::{Ability, Behavior, Properties};
pub use config::{SimConfig, TimingConfig};
pub use effect::{Commit, CommitOutcome, Effect};
pub use error::{KernelError, OccupancyError, PropertyError};
pub use organism::{Organism, OrganismSpec};
pub use scheduler::TickReport;
pub use space::{Layer, Space};
pub use world::World;
