//! Tick scheduler.
//!
//! One tick visits every layer in stack order and, within a layer, every
//! cell in a freshly shuffled row and column order. Each resident gets at
//! most one turn per tick: it either advances its running activity or lets
//! its current ability decide. Commits released during the tick are applied
//! on the spot, so later turns observe earlier ones.

use crate::behavior::DecisionContext;
use crate::config::TimingConfig;
use crate::effect::CommitOutcome;
use crate::error::KernelError;
use crate::space::Space;
use crate::world::World;
use ecoscript_data::{Coord, EntityId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Summary of a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Value of the world clock after the tick.
    pub tick: u64,
    /// Organisms that took a turn.
    pub ticked: usize,
    /// Turns spent consulting an ability.
    pub decisions: usize,
    /// Non-empty commits applied.
    pub applied: usize,
    /// Commits dropped because they no longer validated.
    pub stale: usize,
    /// Organisms that starved.
    pub deaths: usize,
}

impl World {
    /// Runs one simulation step.
    ///
    /// Returns an error only when the spatial index diverged; the world must
    /// not be ticked again after that.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        timings: &TimingConfig,
    ) -> Result<TickReport, KernelError> {
        self.clock += 1;
        let mut report = TickReport {
            tick: self.clock,
            ..TickReport::default()
        };
        let mut ticked = HashSet::new();

        let mut ys: Vec<i32> = (0..self.height() as i32).collect();
        let mut xs: Vec<i32> = (0..self.width() as i32).collect();

        for z in 0..self.depth() as i32 {
            ys.shuffle(rng);
            for &y in &ys {
                xs.shuffle(rng);
                for &x in &xs {
                    let at = Coord::spatial(x, y, z);
                    self.tick_cell(at, rng, timings, &mut ticked, &mut report)?;
                }
            }
        }

        report.ticked = ticked.len();
        tracing::trace!(tick = report.tick, ticked = report.ticked, "tick complete");
        Ok(report)
    }

    fn tick_cell<R: Rng + ?Sized>(
        &mut self,
        at: Coord,
        rng: &mut R,
        timings: &TimingConfig,
        ticked: &mut HashSet<EntityId>,
        report: &mut TickReport,
    ) -> Result<(), KernelError> {
        let snapshot = match self.cell(at) {
            Some(cell) if !cell.is_empty() => cell.shuffled(rng),
            _ => return Ok(()),
        };

        for (i, id) in snapshot.into_iter().enumerate() {
            let Some(cell) = self.cell(at) else {
                break;
            };
            // Earlier turns may have emptied the cell.
            if i >= cell.population() {
                break;
            }
            if !cell.contains(id) || ticked.contains(&id) {
                continue;
            }
            ticked.insert(id);
            self.tick_organism(id, at, rng, timings, report)?;
        }
        Ok(())
    }

    fn tick_organism<R: Rng + ?Sized>(
        &mut self,
        id: EntityId,
        at: Coord,
        rng: &mut R,
        timings: &TimingConfig,
        report: &mut TickReport,
    ) -> Result<(), KernelError> {
        let Some(organism) = self.organism(id) else {
            return Ok(());
        };

        let released = if organism.activity().in_progress() {
            self.organism_mut(id)
                .and_then(|o| o.activity_mut().advance())
        } else {
            let Some(index) = organism.current_ability() else {
                return Ok(());
            };
            let ctx = DecisionContext {
                world: self,
                organism,
                ability: index,
                position: at,
                timings,
            };
            let decision = organism.abilities()[index].execute(&ctx, rng);
            report.decisions += 1;

            let Some(organism) = self.organism_mut(id) else {
                return Ok(());
            };
            organism.advance_cursor();
            organism.activity_mut().begin(decision.delay, decision.commit)
        };

        let Some(commit) = released else {
            return Ok(());
        };
        if commit.is_empty() {
            return Ok(());
        }
        match self.apply(commit)? {
            CommitOutcome::Applied { deaths } => {
                report.applied += 1;
                report.deaths += deaths;
            }
            CommitOutcome::Stale => report.stale += 1,
        }
        Ok(())
    }
}
