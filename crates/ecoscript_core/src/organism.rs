use crate::ability::Ability;
use crate::activity::Activity;
use ecoscript_data::{Attributes, EntityId, Trait};
use std::collections::BTreeSet;

/// Everything needed to create an organism, minus its id.
#[derive(Debug, Clone)]
pub struct OrganismSpec {
    pub name: String,
    pub symbol: char,
    pub attributes: Attributes,
    pub traits: BTreeSet<Trait>,
    pub abilities: Vec<Ability>,
}

impl OrganismSpec {
    pub fn new(name: impl Into<String>, symbol: char) -> Self {
        Self {
            name: name.into(),
            symbol,
            attributes: Attributes::default(),
            traits: BTreeSet::new(),
            abilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_traits<I, T>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Trait>,
    {
        self.traits.extend(traits.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }
}

/// A living thing on the grid.
#[derive(Debug, Clone)]
pub struct Organism {
    id: EntityId,
    name: String,
    symbol: char,
    attributes: Attributes,
    traits: BTreeSet<Trait>,
    abilities: Vec<Ability>,
    cursor: usize,
    activity: Activity,
}

impl Organism {
    pub(crate) fn new(id: EntityId, spec: OrganismSpec) -> Self {
        Self {
            id,
            name: spec.name,
            symbol: spec.symbol,
            attributes: spec.attributes,
            traits: spec.traits,
            abilities: spec.abilities,
            cursor: 0,
            activity: Activity::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn symbol(&self) -> char {
        self.symbol
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn energy(&self) -> i64 {
        self.attributes.energy
    }

    #[must_use]
    pub fn walkable(&self) -> bool {
        self.attributes.walkable
    }

    #[must_use]
    pub fn biomass(&self) -> i64 {
        self.attributes.biomass()
    }

    #[must_use]
    pub fn alive(&self) -> bool {
        self.attributes.energy > 0
    }

    /// Adds `energy` (negative to drain) and reports whether the organism is
    /// still alive.
    pub fn transfer(&mut self, energy: i64) -> bool {
        self.attributes.energy = self.attributes.energy.saturating_add(energy);
        self.alive()
    }

    pub fn end_life(&mut self) {
        self.attributes.energy = 0;
    }

    #[must_use]
    pub fn traits(&self) -> &BTreeSet<Trait> {
        &self.traits
    }

    #[must_use]
    pub fn has_any_trait(&self, wanted: &[Trait]) -> bool {
        wanted.iter().any(|t| self.traits.contains(t))
    }

    #[must_use]
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub(crate) fn ability_mut(&mut self, index: usize) -> Option<&mut Ability> {
        self.abilities.get_mut(index)
    }

    /// Index of the ability that decides next, or `None` without abilities.
    #[must_use]
    pub fn current_ability(&self) -> Option<usize> {
        if self.abilities.is_empty() {
            None
        } else {
            Some(self.cursor % self.abilities.len())
        }
    }

    /// Moves the round-robin cursor to the next ability.
    pub(crate) fn advance_cursor(&mut self) {
        if !self.abilities.is_empty() {
            self.cursor = (self.cursor + 1) % self.abilities.len();
        }
    }

    #[must_use]
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub(crate) fn activity_mut(&mut self) -> &mut Activity {
        &mut self.activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Behavior;

    fn organism(energy: i64) -> Organism {
        let spec = OrganismSpec::new("fern", 'f').with_attributes(Attributes {
            walkable: true,
            energy,
            size: 2,
            mass: 3,
        });
        Organism::new(EntityId(0), spec)
    }

    #[test]
    fn test_transfer_reports_alive() {
        let mut o = organism(10);
        assert!(o.transfer(-9));
        assert_eq!(o.energy(), 1);
        assert!(!o.transfer(-1));
        assert!(!o.alive());
        assert!(o.transfer(5));
    }

    #[test]
    fn test_end_life_zeroes_energy() {
        let mut o = organism(40);
        o.end_life();
        assert_eq!(o.energy(), 0);
        assert!(!o.alive());
    }

    #[test]
    fn test_biomass() {
        assert_eq!(organism(1).biomass(), 6);
    }

    #[test]
    fn test_energy_arithmetic_saturates() {
        let mut o = organism(i64::MAX - 1);
        assert!(o.transfer(10));
        assert_eq!(o.energy(), i64::MAX);

        let huge = OrganismSpec::new("whale", 'W').with_attributes(Attributes {
            walkable: false,
            energy: 1,
            size: i64::MAX,
            mass: 3,
        });
        assert_eq!(Organism::new(EntityId(3), huge).biomass(), i64::MAX);
    }

    #[test]
    fn test_cursor_cycles_through_every_ability() {
        let spec = OrganismSpec::new("wolf", 'w')
            .with_ability(Behavior::Grow.defaults())
            .with_ability(Behavior::Consume.defaults())
            .with_ability(Behavior::Wander.defaults());
        let mut o = Organism::new(EntityId(1), spec);
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(o.current_ability().unwrap());
            o.advance_cursor();
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_no_abilities_no_cursor() {
        let mut o = organism(1);
        assert_eq!(o.current_ability(), None);
        o.advance_cursor();
        assert_eq!(o.current_ability(), None);
    }

    #[test]
    fn test_trait_matching() {
        let spec = OrganismSpec::new("hare", 'h').with_traits(["prey", "herbivore"]);
        let o = Organism::new(EntityId(2), spec);
        assert!(o.has_any_trait(&[Trait::from("prey")]));
        assert!(!o.has_any_trait(&[Trait::from("plant")]));
        assert!(!o.has_any_trait(&[]));
    }
}
