//! Offline catch-up: replays an absence hour-by-hour over historical
//! weather, running the same pipeline a live tick runs. One sample, one
//! simulated hour; the result matches having ticked throughout.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::{
    engine::{Engine, WeatherSample},
    rates,
    state::GameState,
    weather::HistoricalWeather,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatchupReport {
    pub hours_replayed: u64,
    pub hours_skipped: u64,
}

pub fn catch_up(
    engine: &mut Engine,
    state: &mut GameState,
    history: &HistoricalWeather,
    now: DateTime<Utc>,
) -> Result<CatchupReport> {
    history.validate()?;

    let mut report = CatchupReport::default();
    for sample in history.samples() {
        let Some(temperature) = sample.temperature_c else {
            // Data gap: the hour is dropped, not retried, and state does
            // not advance for it.
            report.hours_skipped += 1;
            continue;
        };
        let (sunrise, sunset) = history.sun_times_for(sample.time.date_naive());
        let weather = WeatherSample {
            temperature_c: Some(temperature),
            is_raining: sample.is_raining(),
            sun_intensity: rates::sun_intensity(sample.time, sunrise, sunset),
        };
        engine.step(state, &weather, 1.0)?;
        report.hours_replayed += 1;
    }

    state.last_update = now;
    tracing::info!(
        replayed = report.hours_replayed,
        skipped = report.hours_skipped,
        stage = ?state.plant.stage,
        "offline catch-up complete"
    );
    Ok(report)
}
