//! Pure rate lookups: ambient conditions in, multiplicative factors out.
//! Nothing here touches state; every function is a plain table or formula.

use chrono::{DateTime, Utc};

use crate::config::RateConfig;

/// Factor applied outside the table and when no reading is available.
const TEMPERATURE_FLOOR: f64 = 0.2;

/// Growth factor per integer degree from 15 °C to 33 °C, peaking at 26 °C.
const TEMPERATURE_TABLE: [f64; 19] = [
    0.20, // 15
    0.30, // 16
    0.40, // 17
    0.50, // 18
    0.60, // 19
    0.70, // 20
    0.80, // 21
    0.85, // 22
    0.90, // 23
    0.95, // 24
    0.98, // 25
    1.00, // 26
    0.95, // 27
    0.90, // 28
    0.80, // 29
    0.65, // 30
    0.50, // 31
    0.35, // 32
    0.20, // 33
];

pub fn temperature_growth_factor(temperature_c: Option<f64>) -> f64 {
    let Some(temp) = temperature_c else {
        return TEMPERATURE_FLOOR;
    };
    let degree = temp.round() as i64;
    if !(15..=33).contains(&degree) {
        return TEMPERATURE_FLOOR;
    }
    TEMPERATURE_TABLE[(degree - 15) as usize]
}

/// Banded and deliberately non-monotonic: the plant grows best at moderate
/// hydration, not maximal. Zero below 10%, peak inside 30–40%, declining
/// to 0.5 from 90% up.
pub fn hydration_growth_factor(hydration: f64) -> f64 {
    let h = hydration.clamp(0.0, 1.0);
    if h < 0.10 {
        0.0
    } else if h < 0.20 {
        0.45
    } else if h < 0.30 {
        0.75
    } else if h < 0.35 {
        0.95
    } else if h <= 0.40 {
        1.0
    } else if h < 0.50 {
        0.90
    } else if h < 0.60 {
        0.80
    } else if h < 0.70 {
        0.70
    } else if h < 0.80 {
        0.60
    } else if h < 0.90 {
        0.55
    } else {
        0.50
    }
}

/// Linear between 1.0 (no sun) and the configured day multiplier at peak.
pub fn sun_growth_factor(sun_intensity: f64, config: &RateConfig) -> f64 {
    let intensity = sun_intensity.clamp(0.0, 1.0);
    1.0 + (config.day_growth_multiplier - 1.0) * intensity
}

/// Sine curve over the sunrise→sunset window: zero outside daylight,
/// peaking at local solar noon. Missing bounds or a degenerate window
/// (sunset at or before sunrise) read as no sun at all.
pub fn sun_intensity(
    now: DateTime<Utc>,
    sunrise: Option<DateTime<Utc>>,
    sunset: Option<DateTime<Utc>>,
) -> f64 {
    let (Some(rise), Some(set)) = (sunrise, sunset) else {
        return 0.0;
    };
    if set <= rise || now < rise || now > set {
        return 0.0;
    }
    let daylight = (set - rise).num_seconds() as f64;
    let elapsed = (now - rise).num_seconds() as f64;
    (std::f64::consts::PI * elapsed / daylight).sin().max(0.0)
}

/// Temperature multiplier on dehydration: hotter air dries the pot faster,
/// but cold can at most halve the base rate. No reading counts as 20 °C.
pub fn dehydration_temperature_multiplier(temperature_c: Option<f64>) -> f64 {
    let temp = temperature_c.unwrap_or(20.0);
    (1.0 + (temp - 20.0) * 0.05).max(0.5)
}
