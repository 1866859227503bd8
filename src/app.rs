use anyhow::{Context, Result};
use ecoscript_core::config::SimConfig;
use ecoscript_core::metrics::Metrics;
use ecoscript_core::scheduler::TickReport;
use ecoscript_core::space::Space;
use ecoscript_core::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

use crate::display::LayerView;
use crate::mapfile::Mapfile;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// A world built from a mapfile together with everything needed to drive it.
pub struct Simulation {
    world: World,
    mapfile: Mapfile,
    config: SimConfig,
    metrics: Metrics,
    rng: ChaCha8Rng,
    seed: u64,
    layer: usize,
}

impl Simulation {
    /// Loads the simulation config.
    ///
    /// An explicit path must exist and parse. Without one, `config.toml` in
    /// the working directory is used when present, defaults otherwise.
    pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Path::new(DEFAULT_CONFIG_PATH),
            None => return Ok(SimConfig::default()),
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        SimConfig::from_toml(&content)
            .with_context(|| format!("Invalid config '{}'", path.display()))
    }

    pub fn new(mapfile: Mapfile, config: SimConfig) -> Result<Self> {
        config.validate()?;
        let world = mapfile.build_world()?;
        let seed = config.world.seed.unwrap_or_else(rand::random);
        Ok(Self {
            world,
            mapfile,
            metrics: Metrics::new(config.run.log_interval),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            layer: 0,
        })
    }

    /// Selects the layer shown by [`Simulation::render`].
    pub fn with_layer(mut self, layer: usize) -> Result<Self> {
        anyhow::ensure!(
            layer < self.world.depth(),
            "Layer {layer} does not exist (world has {} layers)",
            self.world.depth()
        );
        self.layer = layer;
        Ok(self)
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Seed the RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advances the world by one tick.
    pub fn step(&mut self) -> Result<TickReport> {
        let started = Instant::now();
        let report = self
            .world
            .tick(&mut self.rng, &self.config.timing)
            .with_context(|| format!("Simulation halted at tick {}", self.world.clock()))?;
        self.metrics
            .record_tick(&report, self.world.population(), started.elapsed());
        Ok(report)
    }

    /// The tick limit was reached or nothing is left alive.
    #[must_use]
    pub fn finished(&self) -> bool {
        let limit_reached = self
            .config
            .run
            .max_ticks
            .is_some_and(|max| self.world.clock() >= max);
        limit_reached || self.world.population() == 0
    }

    #[must_use]
    pub fn render(&self) -> String {
        let view = LayerView::new(&self.world, self.layer, self.mapfile.defaults().empty_tile);
        if self.mapfile.defaults().display_legend {
            view.with_legend(self.mapfile.legend()).to_string()
        } else {
            view.to_string()
        }
    }

    /// Ticks on a fixed wall-clock interval until [`Simulation::finished`]
    /// or Ctrl+C.
    pub async fn run(&mut self) -> Result<()> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Ctrl+C received, stopping simulation...");
            shutdown_clone.store(true, Ordering::SeqCst);
        });

        tracing::info!(
            seed = self.seed,
            fingerprint = %self.config.fingerprint(),
            width = self.world.width(),
            height = self.world.height(),
            depth = self.world.depth(),
            population = self.world.population(),
            "Simulation started"
        );

        let period = self.config.run.tick_interval_ms;
        let mut interval = (period > 0).then(|| {
            let mut interval = tokio::time::interval(Duration::from_millis(period));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        if self.config.run.render {
            println!("{}", self.render());
        }
        while !self.finished() && !shutdown.load(Ordering::SeqCst) {
            match interval.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => tokio::task::yield_now().await,
            }
            self.step()?;
            if self.config.run.render {
                println!("{}", self.render());
            }
        }

        tracing::info!(
            ticks = self.metrics.tick_count(),
            population = self.world.population(),
            applied = self.metrics.applied(),
            stale = self.metrics.stale(),
            deaths = self.metrics.deaths(),
            elapsed_ms = self.metrics.elapsed().as_millis() as u64,
            "Simulation finished"
        );
        Ok(())
    }
}
