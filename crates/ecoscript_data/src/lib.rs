//! Plain data shared by the ecoscript kernel and its loaders: grid
//! coordinates, organism identifiers, trait tags and physical attributes.

pub mod coord;
pub mod entity;

pub use coord::{Coord, COMPASS};
pub use entity::{Attributes, EntityId, Trait};
