//! Run statistics and logging setup.

use crate::scheduler::TickReport;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Counters accumulated over a run.
#[derive(Debug, Clone)]
pub struct Metrics {
    tick_count: u64,
    population: usize,
    decisions: u64,
    applied: u64,
    stale: u64,
    deaths: u64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Metrics {
    /// Creates a collector that logs a summary every `log_interval` ticks.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: 0,
            population: 0,
            decisions: 0,
            applied: 0,
            stale: 0,
            deaths: 0,
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Folds one tick's report into the totals.
    pub fn record_tick(&mut self, report: &TickReport, population: usize, duration: Duration) {
        self.tick_count += 1;
        self.population = population;
        self.decisions += report.decisions as u64;
        self.applied += report.applied as u64;
        self.stale += report.stale as u64;
        self.deaths += report.deaths as u64;

        if report.tick % self.log_interval == 0 {
            tracing::info!(
                tick = report.tick,
                population,
                applied = self.applied,
                stale = self.stale,
                deaths = self.deaths,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Population after the last recorded tick.
    #[must_use]
    pub fn population(&self) -> usize {
        self.population
    }

    #[must_use]
    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    #[must_use]
    pub fn applied(&self) -> u64 {
        self.applied
    }

    #[must_use]
    pub fn stale(&self) -> u64 {
        self.stale
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global tracing subscriber. Honors `RUST_LOG`, defaulting to
/// `info`. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
