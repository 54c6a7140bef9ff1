//! Input contract for the out-of-scope weather client. The engine never
//! fetches anything; it consumes these shapes as-is, so they mirror the
//! provider's layout: parallel hourly arrays plus daily sun times.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(
        "hourly series lengths differ: {time} times, {temperature} temperatures, \
         {precipitation} precipitation values"
    )]
    MismatchedSeries {
        time: usize,
        temperature: usize,
        precipitation: usize,
    },
}

/// Parallel arrays, one entry per hour. A `None` temperature is a data
/// gap; the catch-up simulator skips that hour without advancing state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub time: Vec<DateTime<Utc>>,
    pub temperature: Vec<Option<f64>>,
    pub precipitation: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySunTimes {
    pub date: NaiveDate,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalWeather {
    pub hourly: HourlyWeather,
    pub daily: Vec<DailySunTimes>,
}

#[derive(Debug, Clone, Copy)]
pub struct HourSample {
    pub time: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub precipitation_mm: f64,
}

impl HourSample {
    pub fn is_raining(&self) -> bool {
        self.precipitation_mm > 0.0
    }
}

impl HistoricalWeather {
    pub fn validate(&self) -> Result<(), WeatherError> {
        let hourly = &self.hourly;
        if hourly.time.len() != hourly.temperature.len()
            || hourly.time.len() != hourly.precipitation.len()
        {
            return Err(WeatherError::MismatchedSeries {
                time: hourly.time.len(),
                temperature: hourly.temperature.len(),
                precipitation: hourly.precipitation.len(),
            });
        }
        Ok(())
    }

    /// Hourly samples in series order; the provider delivers them
    /// chronologically and the catch-up fold relies on that.
    pub fn samples(&self) -> impl Iterator<Item = HourSample> + '_ {
        self.hourly
            .time
            .iter()
            .zip(&self.hourly.temperature)
            .zip(&self.hourly.precipitation)
            .map(|((&time, &temperature_c), &precipitation_mm)| HourSample {
                time,
                temperature_c,
                precipitation_mm,
            })
    }

    pub fn sun_times_for(
        &self,
        date: NaiveDate,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self.daily.iter().find(|day| day.date == date) {
            Some(day) => (Some(day.sunrise), Some(day.sunset)),
            None => (None, None),
        }
    }
}
