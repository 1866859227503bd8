//! Error types for the simulation kernel.
//!
//! Occupancy and property errors are expected outcomes that callers turn
//! into no-op turns or report at construction time. [`KernelError`] means the
//! spatial index can no longer be trusted and the simulation must stop.

use ecoscript_data::{Coord, EntityId};
use thiserror::Error;

/// Why an add, remove, move or destroy did not validate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OccupancyError {
    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Coord),

    #[error("cell {at} is occupied by {occupier}")]
    Occupied { at: Coord, occupier: EntityId },

    #[error("entity {entity} is already in cell {at}")]
    AlreadyPresent { entity: EntityId, at: Coord },

    #[error("entity {entity} is not in cell {at}")]
    NotPresent { entity: EntityId, at: Coord },

    #[error("entity {0} is not known to this world")]
    UnknownEntity(EntityId),
}

/// Problems turning caller-supplied properties into an ability.
#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("unknown behavior '{0}'")]
    UnknownBehavior(String),

    #[error("behavior '{behavior}' has no property '{key}'")]
    UnknownProperty { behavior: &'static str, key: String },

    #[error("invalid properties for behavior '{behavior}': {source}")]
    Malformed {
        behavior: &'static str,
        #[source]
        source: toml::de::Error,
    },

    #[error("property '{key}' of behavior '{behavior}' must be in {min}..={max}, got {value}")]
    OutOfRange {
        behavior: &'static str,
        key: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

/// Unrecoverable kernel failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("spatial index diverged: entity {entity} expected at {at}: {cause}")]
    IndexDiverged {
        entity: EntityId,
        at: Coord,
        cause: OccupancyError,
    },
}
