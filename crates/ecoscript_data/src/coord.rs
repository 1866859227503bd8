use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// Integer grid coordinate.
///
/// A coordinate without `z` is planar: it names a cell inside a single layer
/// and, when resolved against a world, addresses the ground layer. Arithmetic
/// keeps whichever layer component is present, so a planar offset added to a
/// layered position stays on that layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
}

/// The eight compass offsets, clockwise from north.
pub const COMPASS: [Coord; 8] = [
    Coord::planar(0, -1),
    Coord::planar(1, -1),
    Coord::planar(1, 0),
    Coord::planar(1, 1),
    Coord::planar(0, 1),
    Coord::planar(-1, 1),
    Coord::planar(-1, 0),
    Coord::planar(-1, -1),
];

impl Coord {
    #[must_use]
    pub const fn planar(x: i32, y: i32) -> Self {
        Self { x, y, z: None }
    }

    #[must_use]
    pub const fn spatial(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Layer index, with planar coordinates resolving to the ground layer.
    #[must_use]
    pub fn layer(self) -> i32 {
        self.z.unwrap_or(0)
    }

    #[must_use]
    pub fn is_spatial(self) -> bool {
        self.z.is_some()
    }

    /// Same x/y placed on layer `z`.
    #[must_use]
    pub fn on_layer(self, z: i32) -> Self {
        Self { z: Some(z), ..self }
    }

    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: combine(self.z, other.z, |a, b| a + b),
        }
    }

    #[must_use]
    pub fn minus(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: combine(self.z, other.z, |a, b| a - b),
        }
    }

    /// Applies `f` to every present component.
    #[must_use]
    pub fn map<F: Fn(i32) -> i32>(self, f: F) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
            z: self.z.map(&f),
        }
    }

    /// Unit direction: every component reduced to -1, 0 or 1.
    #[must_use]
    pub fn signum(self) -> Self {
        self.map(i32::signum)
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0 && self.z.unwrap_or(0) == 0
    }

    /// Orders by the sum of x and y. Only meant as a deterministic tie-break;
    /// distinct coordinates may compare equal.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        (i64::from(self.x) + i64::from(self.y)).cmp(&(i64::from(other.x) + i64::from(other.y)))
    }

    /// Row-major linear index for a row stride of `n` cells.
    #[must_use]
    pub fn flatten(self, n: usize) -> i64 {
        i64::from(self.x) + i64::from(self.y) * n as i64
    }

    /// Every coordinate in the square of the given radius around `self`,
    /// excluding `self`, in row-major order. Not filtered for bounds.
    #[must_use]
    pub fn neighborhood(self, radius: u32) -> Vec<Coord> {
        let r = radius as i32;
        let side = 2 * radius as usize + 1;
        let mut coords = Vec::with_capacity(side * side - 1);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                coords.push(self.plus(Coord::planar(dx, dy)));
            }
        }
        coords
    }

    /// [`Coord::neighborhood`] in a random order.
    pub fn shuffled_neighborhood<R: Rng + ?Sized>(self, radius: u32, rng: &mut R) -> Vec<Coord> {
        let mut coords = self.neighborhood(radius);
        coords.shuffle(rng);
        coords
    }

    /// A uniformly chosen compass offset.
    pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Coord {
        COMPASS[rng.gen_range(0..COMPASS.len())]
    }
}

fn combine(a: Option<i32>, b: Option<i32>, f: impl Fn(i32, i32) -> i32) -> Option<i32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(f(0, b)),
        (None, None) => None,
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        self.plus(rhs)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        self.minus(rhs)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "({}, {}, {})", self.x, self.y, z),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}
