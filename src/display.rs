//! Plain-text rendering of a world layer.

use ecoscript_core::space::Space;
use ecoscript_core::world::World;
use ecoscript_data::Coord;
use std::collections::BTreeMap;
use std::fmt;

/// One layer of a world rendered as lines of symbols.
///
/// Each cell shows its most recently added resident, or the empty tile when
/// nothing stands on it.
pub struct LayerView<'a> {
    world: &'a World,
    layer: usize,
    empty_tile: char,
    legend: Option<&'a BTreeMap<char, String>>,
}

impl<'a> LayerView<'a> {
    pub fn new(world: &'a World, layer: usize, empty_tile: char) -> Self {
        Self {
            world,
            layer,
            empty_tile,
            legend: None,
        }
    }

    /// Lists symbol meanings under the map.
    #[must_use]
    pub fn with_legend(mut self, legend: &'a BTreeMap<char, String>) -> Self {
        self.legend = Some(legend);
        self
    }

    fn symbol_at(&self, at: Coord) -> char {
        self.world
            .cell(at)
            .and_then(|cell| cell.top())
            .and_then(|id| self.world.organism(id))
            .map_or(self.empty_tile, |organism| organism.symbol())
    }
}

impl fmt::Display for LayerView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let z = self.layer as i32;
        for y in 0..self.world.height() as i32 {
            let row: String = (0..self.world.width() as i32)
                .map(|x| self.symbol_at(Coord::spatial(x, y, z)))
                .collect();
            writeln!(f, "{row}")?;
        }
        if let Some(legend) = self.legend {
            writeln!(f)?;
            for (symbol, entity) in legend {
                writeln!(f, "{symbol}  {entity}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoscript_core::organism::OrganismSpec;
    use ecoscript_data::Attributes;

    fn walker(symbol: char) -> OrganismSpec {
        OrganismSpec::new("walker", symbol).with_attributes(Attributes {
            walkable: true,
            ..Attributes::default()
        })
    }

    #[test]
    fn test_render_empty_layer() {
        let world = World::new(3, 2, &["ground"]);
        assert_eq!(LayerView::new(&world, 0, '.').to_string(), "...\n...\n");
    }

    #[test]
    fn test_topmost_resident_shown() {
        let mut world = World::new(2, 1, &["ground"]);
        let a = world.spawn(walker('a'));
        let b = world.spawn(walker('b'));
        world.place(a, Coord::planar(1, 0)).unwrap();
        world.place(b, Coord::planar(1, 0)).unwrap();
        assert_eq!(LayerView::new(&world, 0, ' ').to_string(), " b\n");
    }

    #[test]
    fn test_other_layers_hidden() {
        let mut world = World::new(1, 1, &["ground", "air"]);
        let bird = world.spawn(walker('v'));
        world.place(bird, Coord::spatial(0, 0, 1)).unwrap();
        assert_eq!(LayerView::new(&world, 0, '.').to_string(), ".\n");
        assert_eq!(LayerView::new(&world, 1, '.').to_string(), "v\n");
    }

    #[test]
    fn test_legend_listing() {
        let world = World::new(1, 1, &["ground"]);
        let legend = BTreeMap::from([('*', "shrub".to_string())]);
        let text = LayerView::new(&world, 0, '.').with_legend(&legend).to_string();
        assert_eq!(text, ".\n\n*  shrub\n");
    }
}
