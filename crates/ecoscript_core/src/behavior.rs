//! Decision logic for each behavior.
//!
//! Deciding only reads the world; the returned [`Decision`] carries the
//! delay and the commit to apply once that delay has elapsed.

use crate::ability::{Ability, ConsumeProps, GrowProps, MoveProps};
use crate::config::TimingConfig;
use crate::effect::{Commit, Effect};
use crate::organism::Organism;
use crate::space::Space;
use crate::world::World;
use ecoscript_data::Coord;
use rand::Rng;

/// Everything a behavior may look at while deciding.
pub struct DecisionContext<'a> {
    pub world: &'a World,
    pub organism: &'a Organism,
    /// Index of the deciding ability within the organism's ability list.
    pub ability: usize,
    pub position: Coord,
    pub timings: &'a TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub delay: u32,
    pub commit: Commit,
}

impl Decision {
    /// Nothing to do this turn.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            delay: 0,
            commit: Commit::none(),
        }
    }

    #[must_use]
    pub fn after(delay: u32, commit: Commit) -> Self {
        Self { delay, commit }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.commit.is_empty()
    }
}

impl Ability {
    /// Decides what the organism in `ctx` will try to do.
    pub fn execute<R: Rng + ?Sized>(&self, ctx: &DecisionContext<'_>, rng: &mut R) -> Decision {
        let decision = match self {
            Ability::Grow(props) => grow(props, ctx),
            Ability::Consume(props) => consume(props, ctx, rng),
            Ability::Move(props) => {
                let heading = if props.delta.is_zero() {
                    Coord::random_direction(rng)
                } else {
                    props.delta
                };
                step(props, heading, ctx, rng)
            }
            Ability::Wander(props) => {
                let heading = Coord::random_direction(rng);
                step(props, heading, ctx, rng)
            }
        };
        tracing::trace!(
            entity = %ctx.organism.id(),
            behavior = self.name(),
            at = %ctx.position,
            delay = decision.delay,
            effects = decision.commit.len(),
            "decided"
        );
        decision
    }
}

fn grow(props: &GrowProps, ctx: &DecisionContext<'_>) -> Decision {
    Decision::after(
        ctx.timings.grow_delay,
        Commit::of(Effect::Transfer {
            entity: ctx.organism.id(),
            energy: props.rate,
            at: ctx.position,
        }),
    )
}

fn consume<R: Rng + ?Sized>(props: &ConsumeProps, ctx: &DecisionContext<'_>, rng: &mut R) -> Decision {
    if props.diet.is_empty() {
        return Decision::idle();
    }
    let actor = ctx.organism.id();
    for at in ctx.world.view_shuffled(ctx.position, 1, rng) {
        let Some(cell) = ctx.world.cell(at) else {
            continue;
        };
        for id in cell.shuffled(rng) {
            let Some(victim) = ctx.world.organism(id) else {
                continue;
            };
            if id == actor || !victim.has_any_trait(&props.diet) {
                continue;
            }
            return match ctx.world.destroy(victim, at) {
                Ok(destroy) => Decision::after(
                    ctx.timings.consume_delay,
                    destroy.with(Effect::Transfer {
                        entity: actor,
                        energy: victim.biomass(),
                        at: ctx.position,
                    }),
                ),
                Err(err) => {
                    tracing::trace!(entity = %actor, victim = %id, error = %err, "prey unavailable");
                    Decision::idle()
                }
            };
        }
    }
    Decision::idle()
}

fn step<R: Rng + ?Sized>(
    props: &MoveProps,
    heading: Coord,
    ctx: &DecisionContext<'_>,
    rng: &mut R,
) -> Decision {
    let origin = ctx.position;
    let mut destination = origin + heading;
    if !ctx.world.walkable(destination) {
        match ctx.world.random_walkable(origin, props.speed, rng) {
            Some(fallback) => destination = fallback,
            None => return Decision::idle(),
        }
    }

    let relocation = match ctx.world.move_entity(ctx.organism, origin, destination) {
        Ok(commit) => commit,
        Err(err) => {
            tracing::trace!(entity = %ctx.organism.id(), error = %err, "move refused");
            return Decision::idle();
        }
    };

    let entity = ctx.organism.id();
    let offset = destination - origin;
    let mut commit = Commit::of(Effect::SetHeading {
        entity,
        ability: ctx.ability,
        delta: Coord::planar(offset.x, offset.y),
    })
    .then(relocation);
    if props.effort != 0 {
        commit.push(Effect::Transfer {
            entity,
            energy: -props.effort,
            at: destination,
        });
    }
    Decision::after(ctx.timings.move_delay, commit)
}
