mod common;

use common::{rock, OrganismBuilder, WorldBuilder};
use ecoscript_core::ability::{Ability, Behavior, ConsumeProps, GrowProps, MoveProps};
use ecoscript_core::behavior::DecisionContext;
use ecoscript_core::config::TimingConfig;
use ecoscript_core::effect::{CommitOutcome, Effect};
use ecoscript_core::space::Space;
use ecoscript_core::world::World;
use ecoscript_data::{Coord, EntityId, Trait, COMPASS};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn decide(world: &World, id: EntityId, at: Coord, seed: u64) -> ecoscript_core::behavior::Decision {
    let organism = world.organism(id).unwrap();
    let ability = organism.current_ability().unwrap();
    let timings = TimingConfig::default();
    let ctx = DecisionContext {
        world,
        organism,
        ability,
        position: at,
        timings: &timings,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    organism.abilities()[ability].execute(&ctx, &mut rng)
}

#[test]
fn test_grow_scenario() {
    let moss = OrganismBuilder::new("moss", 'm')
        .walkable(true)
        .energy(10)
        .ability(Ability::Grow(GrowProps { rate: 5 }))
        .build();
    let mut t = WorldBuilder::new(1, 1)
        .with_organism(moss, Coord::planar(0, 0))
        .build();
    let id = t.ids[0];

    let decision = decide(&t.world, id, Coord::planar(0, 0), 0);
    assert_eq!(decision.delay, 10);

    let mut activity = ecoscript_core::activity::Activity::new();
    assert!(activity.begin(decision.delay, decision.commit).is_none());
    let mut fired = 0;
    for _ in 0..10 {
        if let Some(commit) = activity.advance() {
            fired += 1;
            t.world.apply(commit).unwrap();
        }
    }
    assert_eq!(fired, 1);
    assert_eq!(t.energy(0), 15);
    assert!(activity.advance().is_none());
    assert_eq!(t.energy(0), 15);
}

#[test]
fn test_consume_success() {
    let fox = OrganismBuilder::new("fox", 'f')
        .energy(20)
        .ability(Ability::Consume(ConsumeProps {
            diet: vec![Trait::from("prey")],
        }))
        .build();
    let hare = OrganismBuilder::new("hare", 'h')
        .energy(4)
        .body(2, 3)
        .traits(&["prey"])
        .build();
    let mut t = WorldBuilder::new(3, 3)
        .with_organism(fox, Coord::planar(0, 0))
        .with_organism(hare, Coord::planar(1, 0))
        .build();
    let (predator, prey) = (t.ids[0], t.ids[1]);

    let decision = decide(&t.world, predator, Coord::planar(0, 0), 5);
    assert_eq!(decision.delay, 15);
    assert!(decision.commit.effects().iter().any(|e| matches!(
        e,
        Effect::Transfer { entity, energy: 6, .. } if *entity == predator
    )));

    let outcome = t.world.apply(decision.commit).unwrap();
    assert_eq!(outcome, CommitOutcome::Applied { deaths: 0 });
    assert_eq!(t.energy(0), 26);
    assert_gone!(t.world, prey);
    assert!(t.world.cell(Coord::planar(1, 0)).unwrap().is_empty());
}

#[test]
fn test_consume_ignores_inedible_and_self() {
    let fox = OrganismBuilder::new("fox", 'f')
        .traits(&["prey"])
        .ability(Ability::Consume(ConsumeProps {
            diet: vec![Trait::from("prey")],
        }))
        .build();
    let t = WorldBuilder::new(3, 3)
        .with_organism(fox, Coord::planar(1, 1))
        .with_organism(rock(), Coord::planar(0, 0))
        .build();

    for seed in 0..8 {
        let decision = decide(&t.world, t.ids[0], Coord::planar(1, 1), seed);
        assert!(decision.is_idle());
        assert_eq!(decision.delay, 0);
    }
}

#[test]
fn test_consume_with_empty_diet_is_idle() {
    let grazer = OrganismBuilder::new("grazer", 'g')
        .ability(Behavior::Consume.defaults())
        .build();
    let grass = OrganismBuilder::new("grass", '"').walkable(true).traits(&["plant"]).build();
    let t = WorldBuilder::new(2, 1)
        .with_organism(grazer, Coord::planar(0, 0))
        .with_organism(grass, Coord::planar(1, 0))
        .build();
    assert!(decide(&t.world, t.ids[0], Coord::planar(0, 0), 1).is_idle());
}

#[test]
fn test_move_follows_heading() {
    let snail = OrganismBuilder::new("snail", 's')
        .energy(10)
        .ability(Ability::Move(MoveProps {
            delta: Coord::planar(0, 1),
            speed: 1,
            effort: 2,
        }))
        .build();
    let mut t = WorldBuilder::new(3, 3)
        .with_organism(snail, Coord::planar(1, 0))
        .build();
    let id = t.ids[0];

    let decision = decide(&t.world, id, Coord::planar(1, 0), 0);
    assert_eq!(decision.delay, 10);
    t.world.apply(decision.commit).unwrap();
    assert_at!(t.world, id, Coord::planar(1, 1));
    assert_eq!(t.energy(0), 8);
}

#[test]
fn test_blocked_move_falls_back_within_speed() {
    let crab = OrganismBuilder::new("crab", 'c')
        .energy(10)
        .ability(Ability::Move(MoveProps {
            delta: Coord::planar(1, 0),
            speed: 1,
            effort: 0,
        }))
        .build();
    let mut t = WorldBuilder::new(3, 3)
        .with_organism(crab, Coord::planar(1, 1))
        .with_organism(rock(), Coord::planar(2, 1))
        .build();
    let id = t.ids[0];

    let decision = decide(&t.world, id, Coord::planar(1, 1), 9);
    t.world.apply(decision.commit).unwrap();
    let now = t.world.position_of(id).unwrap();
    assert_ne!((now.x, now.y), (1, 1));
    assert_ne!((now.x, now.y), (2, 1));

    let heading = t.world.organism(id).unwrap().abilities()[0].heading().unwrap();
    assert_eq!(Coord::planar(1, 1) + heading, Coord::planar(now.x, now.y));
    assert_eq!(t.energy(0), 10);
}

#[test]
fn test_boxed_in_move_is_idle() {
    let mole = OrganismBuilder::new("mole", 'o')
        .ability(Behavior::Move.defaults())
        .build();
    let mut builder = WorldBuilder::new(3, 3).with_organism(mole, Coord::planar(1, 1));
    for offset in COMPASS {
        builder = builder.with_organism(rock(), Coord::planar(1, 1) + offset);
    }
    let t = builder.build();
    assert!(decide(&t.world, t.ids[0], Coord::planar(1, 1), 4).is_idle());
}

#[test]
fn test_wander_picks_fresh_heading() {
    let moth = OrganismBuilder::new("moth", 'v')
        .energy(50)
        .ability(Ability::Wander(MoveProps {
            delta: Coord::planar(1, 0),
            speed: 1,
            effort: 1,
        }))
        .build();
    let t = WorldBuilder::new(5, 5)
        .with_organism(moth, Coord::planar(2, 2))
        .build();

    let headings: std::collections::HashSet<Coord> = (0..16)
        .filter_map(|seed| {
            decide(&t.world, t.ids[0], Coord::planar(2, 2), seed)
                .commit
                .effects()
                .iter()
                .find_map(|e| match e {
                    Effect::SetHeading { delta, .. } => Some(*delta),
                    _ => None,
                })
        })
        .collect();
    assert!(headings.len() > 1);
    assert!(headings.iter().all(|h| COMPASS.contains(h)));
}
