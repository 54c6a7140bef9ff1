use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use teaplant::{snapshot, Engine, RateConfig, WeatherSample};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless tea plant simulation runner")]
struct Cli {
    /// Path to the saved game; created on first run
    #[arg(long, default_value = "teaplant.json")]
    state: PathBuf,

    /// Rate config YAML (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated hours to run, stepped one hour at a time
    #[arg(long, default_value_t = 1)]
    hours: u64,

    /// Constant ambient temperature in °C for the run
    #[arg(long, default_value_t = 20.0)]
    temperature: f64,

    /// Treat the whole run as raining
    #[arg(long)]
    rain: bool,

    /// Water the plant by this much before running
    #[arg(long)]
    water: Option<f64>,

    /// Compress all per-hour rates 3600x (debug cycle mode)
    #[arg(long)]
    accelerated: bool,

    /// Seed for the bud-spawning RNG stream
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RateConfig::load(path)?,
        None => RateConfig::default(),
    };
    if cli.accelerated {
        config = config.accelerated();
    }

    let now = Utc::now();
    let mut state = snapshot::load_or_default(&cli.state, now);
    if let Some(amount) = cli.water {
        state.water(amount);
    }

    let mut engine = Engine::new(config, cli.seed);
    let sample = WeatherSample {
        temperature_c: Some(cli.temperature),
        is_raining: cli.rain,
        sun_intensity: 0.0,
    };
    for _ in 0..cli.hours {
        engine.step(&mut state, &sample, 1.0)?;
    }
    state.last_update = now;
    snapshot::save(&state, &cli.state)?;

    println!(
        "stage {:?}, growth {:.2}, hydration {:.2}, segments {} ({} withered), harvested {}",
        state.plant.stage,
        state.plant.growth,
        state.plant.hydration,
        state.plant.segments.len(),
        state.plant.withered_count(),
        state.tea_leaves_harvested
    );
    Ok(())
}
