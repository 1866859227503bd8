use anyhow::Result;
use clap::Parser;
use ecoscript_core::metrics::init_logging;
use ecoscript_lib::app::Simulation;
use ecoscript_lib::mapfile::Mapfile;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mapfile describing the initial world
    #[arg(short, long, default_value = "demos/Mapfile.toml")]
    mapfile: PathBuf,

    /// Custom config file path (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Milliseconds between ticks (0 runs as fast as possible)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Layer to display
    #[arg(long, default_value_t = 0)]
    layer: usize,

    /// Run without printing the map
    #[arg(long)]
    headless: bool,
}

async fn run(args: Args) -> Result<()> {
    let mut config = Simulation::load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(ticks) = args.ticks {
        config.run.max_ticks = Some(ticks);
    }
    if let Some(interval) = args.interval_ms {
        config.run.tick_interval_ms = interval;
    }
    if args.headless {
        config.run.render = false;
    }

    let mapfile = Mapfile::load(&args.mapfile)?;
    let mut sim = Simulation::new(mapfile, config)?.with_layer(args.layer)?;
    sim.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
