use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::{
    config::RateConfig,
    rates,
    rng::{RngManager, SystemRng},
    state::{EnvironmentState, GameState, PlantState, Stage},
    systems::{GrowthSystem, HydrationSystem, StageSystem},
};

/// The environmental inputs one step runs under. For live ticks this is
/// derived from the committed environment; the catch-up simulator builds
/// one per historical hour instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    pub temperature_c: Option<f64>,
    pub is_raining: bool,
    pub sun_intensity: f64,
}

impl WeatherSample {
    pub fn from_environment(environment: &EnvironmentState, now: DateTime<Utc>) -> Self {
        Self {
            temperature_c: environment.weather.map(|w| w.temperature_c),
            is_raining: environment.weather.map(|w| w.is_raining).unwrap_or(false),
            sun_intensity: rates::sun_intensity(now, environment.sunrise, environment.sunset),
        }
    }
}

pub struct TickContext<'a> {
    pub config: &'a RateConfig,
    /// Simulated hours this step, time compression already applied.
    pub elapsed_hours: f64,
    pub temperature_c: Option<f64>,
    pub is_raining: bool,
    pub sun_intensity: f64,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &TickContext,
        plant: &mut PlantState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

/// Drives the fixed hydration → growth → stage pipeline over a committed
/// `GameState`. Single-threaded by construction: steps and user edits all
/// take `&mut`, so no tick can observe a half-applied edit.
pub struct Engine {
    config: RateConfig,
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
}

impl Engine {
    pub fn new(config: RateConfig, seed: u64) -> Self {
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(HydrationSystem::new()),
            Box::new(GrowthSystem::new()),
            Box::new(StageSystem::new()),
        ];
        Self {
            config,
            rng: RngManager::new(seed),
            systems,
        }
    }

    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// One simulation step of `elapsed_hours` wall hours under `sample`.
    /// A zero-length step is a no-op, and a dead plant is frozen: neither
    /// touches the state at all.
    pub fn step(
        &mut self,
        state: &mut GameState,
        sample: &WeatherSample,
        elapsed_hours: f64,
    ) -> Result<()> {
        if elapsed_hours <= 0.0 || state.plant.stage == Stage::Dead {
            return Ok(());
        }
        let ctx = TickContext {
            config: &self.config,
            elapsed_hours: elapsed_hours * self.config.time_compression,
            temperature_c: sample.temperature_c,
            is_raining: sample.is_raining,
            sun_intensity: sample.sun_intensity,
        };
        for system in &mut self.systems {
            let mut stream = self.rng.stream(system.name());
            system.run(&ctx, &mut state.plant, &mut stream)?;
        }
        Ok(())
    }

    /// Live tick: elapsed time comes from `last_update`, weather and sun
    /// from the committed environment. Always advances `last_update`,
    /// including for a dead plant, so a later catch-up is not asked to
    /// replay time the freeze already absorbed.
    pub fn tick_at(&mut self, state: &mut GameState, now: DateTime<Utc>) -> Result<()> {
        let elapsed_hours = (now - state.last_update).num_milliseconds() as f64 / 3_600_000.0;
        let sample = WeatherSample::from_environment(&state.environment, now);
        self.step(state, &sample, elapsed_hours)?;
        state.last_update = now;
        Ok(())
    }
}
