//! Mapfile loading.
//!
//! A mapfile is a TOML document describing the initial world: one or more
//! layers of symbol grids, a legend mapping symbols to entity kinds, and the
//! kinds themselves.
//!
//! ```toml
//! [defaults]
//! empty_tile = "."
//! display_legend = true
//!
//! [[atlas.layers]]
//! name = "ground"
//! grid = """
//! .*..
//! ..w.
//! """
//!
//! [[atlas.legend]]
//! symbol = "*"
//! entity = "shrub"
//!
//! [[atlas.legend]]
//! symbol = "w"
//! entity = "wolf"
//!
//! [entities.shrub]
//! name = "shrub"
//! symbol = "*"
//! traits = ["plant"]
//! attributes = { walkable = true, energy = 100, size = 1, mass = 3 }
//! abilities = [{ name = "grow", rate = 3 }]
//!
//! [entities.wolf]
//! name = "wolf"
//! symbol = "w"
//! attributes = { energy = 60, size = 2, mass = 4 }
//! abilities = [{ name = "consume", diet = ["plant"] }, { name = "wander" }]
//! ```
//!
//! A layer takes its grid either inline (`grid`) or from a text file
//! (`file`, relative to the mapfile). Every problem found while validating is
//! collected and reported together.

use ecoscript_core::ability::{Behavior, Properties};
use ecoscript_core::error::OccupancyError;
use ecoscript_core::organism::OrganismSpec;
use ecoscript_core::world::World;
use ecoscript_data::{Attributes, Coord};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapfileError {
    #[error("error reading mapfile '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing mapfile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid mapfile:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),

    #[error("could not place organism: {0}")]
    Placement(#[from] OccupancyError),
}

/// Display settings.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Defaults {
    /// Symbol for a tile with nothing on it.
    pub empty_tile: char,
    /// Print the legend under the rendered map.
    pub display_legend: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            empty_tile: '.',
            display_legend: false,
        }
    }
}

#[derive(Deserialize, Debug)]
struct RawMapfile {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    atlas: RawAtlas,
    #[serde(default)]
    entities: BTreeMap<String, RawEntity>,
}

#[derive(Deserialize, Debug, Default)]
struct RawAtlas {
    #[serde(default)]
    layers: Vec<RawLayer>,
    #[serde(default)]
    legend: Vec<RawLegendEntry>,
}

#[derive(Deserialize, Debug)]
struct RawLayer {
    name: String,
    grid: Option<String>,
    file: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
struct RawLegendEntry {
    symbol: char,
    entity: String,
}

#[derive(Deserialize, Debug)]
struct RawEntity {
    name: String,
    symbol: char,
    #[serde(default)]
    traits: Vec<String>,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    abilities: Vec<RawAbility>,
}

#[derive(Deserialize, Debug)]
struct RawAbility {
    name: String,
    #[serde(flatten)]
    properties: Properties,
}

/// One named grid of symbols, indexed `[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerGrid {
    pub name: String,
    pub rows: Vec<Vec<char>>,
}

/// A validated mapfile, ready to build worlds from.
#[derive(Debug, Clone)]
pub struct Mapfile {
    defaults: Defaults,
    layers: Vec<LayerGrid>,
    legend: BTreeMap<char, String>,
    entities: BTreeMap<String, OrganismSpec>,
    width: usize,
    height: usize,
}

impl Mapfile {
    /// Reads, parses and validates the mapfile at `path`. Layer files are
    /// resolved relative to its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapfileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MapfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&content, base_dir)
    }

    /// Parses and validates a mapfile document.
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self, MapfileError> {
        let raw: RawMapfile = toml::from_str(content)?;
        let mut problems = Vec::new();

        let layers = read_layers(&raw.atlas.layers, base_dir, &mut problems);
        let (width, height) = check_dimensions(&layers, &mut problems);
        let legend = read_legend(&raw, &mut problems);
        check_map_symbols(&layers, &legend, raw.defaults.empty_tile, &mut problems);
        let entities = read_entities(&raw.entities, &mut problems);

        if raw.entities.is_empty() {
            problems.push("`entities` must have at least one entry".to_string());
        }
        for (symbol, key) in &legend {
            if !raw.entities.contains_key(key) {
                problems.push(format!(
                    "legend symbol '{symbol}' refers to '{key}', but no entry is found in `entities`"
                ));
            }
        }

        if !problems.is_empty() {
            return Err(MapfileError::Invalid(problems));
        }

        Ok(Self {
            defaults: raw.defaults,
            layers,
            legend,
            entities,
            width,
            height,
        })
    }

    #[must_use]
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    #[must_use]
    pub fn layers(&self) -> &[LayerGrid] {
        &self.layers
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Symbol to entity key, in symbol order.
    #[must_use]
    pub fn legend(&self) -> &BTreeMap<char, String> {
        &self.legend
    }

    /// Construction spec for the entity kind stored under `key`.
    #[must_use]
    pub fn entity(&self, key: &str) -> Option<&OrganismSpec> {
        self.entities.get(key)
    }

    /// Builds a fresh world with one organism per non-empty tile.
    pub fn build_world(&self) -> Result<World, MapfileError> {
        let names: Vec<&str> = self.layers.iter().map(|l| l.name.as_str()).collect();
        let mut world = World::new(self.width, self.height, &names);

        for (z, layer) in self.layers.iter().enumerate() {
            for (y, row) in layer.rows.iter().enumerate() {
                for (x, &symbol) in row.iter().enumerate() {
                    if symbol == self.defaults.empty_tile {
                        continue;
                    }
                    let Some(spec) = self.legend.get(&symbol).and_then(|key| self.entities.get(key))
                    else {
                        continue;
                    };
                    let id = world.spawn(spec.clone());
                    world.place(id, Coord::spatial(x as i32, y as i32, z as i32))?;
                }
            }
        }

        tracing::debug!(
            width = self.width,
            height = self.height,
            depth = self.layers.len(),
            population = world.population(),
            "world built from mapfile"
        );
        Ok(world)
    }
}

fn gridify(text: &str) -> Vec<Vec<char>> {
    text.trim()
        .lines()
        .map(|row| row.trim().chars().collect())
        .collect()
}

fn read_layers(raw: &[RawLayer], base_dir: &Path, problems: &mut Vec<String>) -> Vec<LayerGrid> {
    if raw.is_empty() {
        problems.push("`atlas.layers` must have at least one entry".to_string());
    }
    let mut layers = Vec::with_capacity(raw.len());
    for layer in raw {
        let text = match (&layer.grid, &layer.file) {
            (Some(grid), None) => grid.clone(),
            (None, Some(file)) => {
                let path = base_dir.join(file);
                match std::fs::read_to_string(&path) {
                    Ok(text) => text,
                    Err(err) => {
                        problems.push(format!(
                            "layer '{}': cannot read '{}': {err}",
                            layer.name,
                            path.display()
                        ));
                        continue;
                    }
                }
            }
            (Some(_), Some(_)) => {
                problems.push(format!(
                    "layer '{}' sets both `grid` and `file`; use exactly one",
                    layer.name
                ));
                continue;
            }
            (None, None) => {
                problems.push(format!("layer '{}' needs one of `grid` or `file`", layer.name));
                continue;
            }
        };
        let rows = gridify(&text);
        if rows.is_empty() || rows[0].is_empty() {
            problems.push(format!("layer '{}' has an empty grid", layer.name));
            continue;
        }
        layers.push(LayerGrid {
            name: layer.name.clone(),
            rows,
        });
    }
    layers
}

/// Every row of every layer must match the first layer's first row.
fn check_dimensions(layers: &[LayerGrid], problems: &mut Vec<String>) -> (usize, usize) {
    let Some(first) = layers.first() else {
        return (0, 0);
    };
    let height = first.rows.len();
    let width = first.rows[0].len();
    for layer in layers {
        if layer.rows.len() != height {
            problems.push(format!(
                "layer '{}' has {} rows, expected {height}",
                layer.name,
                layer.rows.len()
            ));
        }
        for (y, row) in layer.rows.iter().enumerate() {
            if row.len() != width {
                problems.push(format!(
                    "layer '{}' row {y} has {} tiles, expected {width}",
                    layer.name,
                    row.len()
                ));
            }
        }
    }
    (width, height)
}

fn read_legend(raw: &RawMapfile, problems: &mut Vec<String>) -> BTreeMap<char, String> {
    if raw.atlas.legend.is_empty() {
        problems.push("`atlas.legend` must have at least one entry".to_string());
    }
    let mut legend = BTreeMap::new();
    for entry in &raw.atlas.legend {
        if entry.symbol == raw.defaults.empty_tile {
            problems.push(format!(
                "legend symbol '{}' is the empty tile",
                entry.symbol
            ));
        }
        if legend.insert(entry.symbol, entry.entity.clone()).is_some() {
            problems.push(format!(
                "symbol '{}' occurs more than once in `atlas.legend`",
                entry.symbol
            ));
        }
    }
    legend
}

fn check_map_symbols(
    layers: &[LayerGrid],
    legend: &BTreeMap<char, String>,
    empty_tile: char,
    problems: &mut Vec<String>,
) {
    let missing: BTreeSet<char> = layers
        .iter()
        .flat_map(|layer| layer.rows.iter().flatten().copied())
        .filter(|symbol| *symbol != empty_tile && !legend.contains_key(symbol))
        .collect();
    for symbol in missing {
        problems.push(format!("map symbol '{symbol}' not found in `atlas.legend`"));
    }
}

/// Upper bound for `energy`, `size` and `mass`.
const MAX_ATTRIBUTE: i64 = 1_000_000_000;

fn read_entities(
    raw: &BTreeMap<String, RawEntity>,
    problems: &mut Vec<String>,
) -> BTreeMap<String, OrganismSpec> {
    let mut entities = BTreeMap::new();
    for (key, entity) in raw {
        if entity.name.chars().count() < 2 {
            problems.push(format!(
                "entity '{key}': attribute \"name\" must have 2 or more characters"
            ));
        }
        let attrs = &entity.attributes;
        for (field, value) in [("energy", attrs.energy), ("size", attrs.size), ("mass", attrs.mass)] {
            if value < 1 {
                problems.push(format!(
                    "entity '{key}': attribute \"{field}\" must be 1 or greater"
                ));
            } else if value > MAX_ATTRIBUTE {
                problems.push(format!(
                    "entity '{key}': attribute \"{field}\" must be at most {MAX_ATTRIBUTE}"
                ));
            }
        }

        let mut spec = OrganismSpec::new(entity.name.clone(), entity.symbol)
            .with_attributes(*attrs)
            .with_traits(entity.traits.iter().map(String::as_str));
        for ability in &entity.abilities {
            let Some(behavior) = Behavior::from_name(&ability.name) else {
                problems.push(format!("entity '{key}': unknown behavior '{}'", ability.name));
                continue;
            };
            match behavior.ability(&ability.properties) {
                Ok(ability) => spec = spec.with_ability(ability),
                Err(err) => problems.push(format!("entity '{key}': {err}")),
            }
        }
        entities.insert(key.clone(), spec);
    }
    entities
}
