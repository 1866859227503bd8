use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecoscript_core::ability::{Ability, Behavior, ConsumeProps};
use ecoscript_core::config::TimingConfig;
use ecoscript_core::organism::OrganismSpec;
use ecoscript_core::space::Space;
use ecoscript_core::world::World;
use ecoscript_data::{Attributes, Coord, Trait};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn populated_world(side: usize) -> World {
    let mut world = World::new(side, side, &["ground"]);
    for y in 0..side as i32 {
        for x in 0..side as i32 {
            let at = Coord::planar(x, y);
            let spec = if (x + y) % 7 == 0 {
                OrganismSpec::new("fox", 'f')
                    .with_attributes(Attributes {
                        walkable: false,
                        energy: 500,
                        size: 1,
                        mass: 1,
                    })
                    .with_ability(Ability::Consume(ConsumeProps {
                        diet: vec![Trait::from("grass")],
                    }))
                    .with_ability(Behavior::Wander.defaults())
            } else if (x * y) % 3 == 0 {
                OrganismSpec::new("grass", '"')
                    .with_attributes(Attributes {
                        walkable: true,
                        energy: 5,
                        size: 1,
                        mass: 1,
                    })
                    .with_traits(["grass"])
                    .with_ability(Behavior::Grow.defaults())
            } else {
                continue;
            };
            let id = world.spawn(spec);
            if world.walkable(at) {
                let _ = world.place(id, at);
            }
        }
    }
    world
}

fn bench_tick_small(c: &mut Criterion) {
    let timings = TimingConfig::default();
    c.bench_function("tick_32x32", |b| {
        let mut world = populated_world(32);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| black_box(world.tick(&mut rng, &timings).map(|r| r.ticked)))
    });
}

fn bench_tick_instant(c: &mut Criterion) {
    let timings = TimingConfig {
        grow_delay: 0,
        consume_delay: 0,
        move_delay: 0,
    };
    c.bench_function("tick_64x64_no_delay", |b| {
        let mut world = populated_world(64);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| black_box(world.tick(&mut rng, &timings).map(|r| r.applied)))
    });
}

criterion_group!(benches, bench_tick_small, bench_tick_instant);
criterion_main!(benches);
