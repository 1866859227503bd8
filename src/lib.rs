pub mod app;
pub mod display;
pub mod mapfile;

pub use app::Simulation;
pub use mapfile::{Mapfile, MapfileError};
