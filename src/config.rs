use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::Stage;

fn default_time_compression() -> f64 {
    1.0
}

fn default_base_growth_per_hour() -> f64 {
    0.8
}

fn default_dehydration_per_hour() -> f64 {
    0.02
}

fn default_wither_hours_per_segment() -> f64 {
    12.0
}

fn default_bud_chance_per_hour() -> f64 {
    0.05
}

fn default_day_growth_multiplier() -> f64 {
    1.5
}

fn default_leaf_size_rate() -> f64 {
    0.6
}

fn default_sprout_at() -> f64 {
    0.5
}

fn default_young_at() -> f64 {
    1.0
}

fn default_mature_at() -> f64 {
    4.0
}

fn default_flowering_at() -> f64 {
    6.0
}

fn default_harvestable_at() -> f64 {
    8.0
}

fn default_leaf_thresholds() -> Vec<f64> {
    vec![1.5, 2.2, 2.9, 3.6]
}

fn default_flower_thresholds() -> Vec<f64> {
    vec![6.0, 6.6, 7.2]
}

/// Every tunable rate and threshold in one immutable value, constructed
/// once and threaded through each engine call. Nothing in the engine reads
/// ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    /// Uniform scale on elapsed hours. 1.0 for real time; the accelerated
    /// test mode sets 3600.0 so one wall-clock second counts as an hour.
    /// It never changes which thresholds or formulas apply.
    #[serde(default = "default_time_compression")]
    pub time_compression: f64,
    #[serde(default = "default_base_growth_per_hour")]
    pub base_growth_per_hour: f64,
    #[serde(default = "default_dehydration_per_hour")]
    pub dehydration_per_hour: f64,
    /// Hours at zero hydration before each additional segment withers.
    #[serde(default = "default_wither_hours_per_segment")]
    pub wither_hours_per_segment: f64,
    #[serde(default = "default_bud_chance_per_hour")]
    pub bud_chance_per_hour: f64,
    /// Growth multiplier at peak sun; 1.0 applies at night.
    #[serde(default = "default_day_growth_multiplier")]
    pub day_growth_multiplier: f64,
    /// Scales how fast a leaf closes on its target size, per unit of
    /// effective growth.
    #[serde(default = "default_leaf_size_rate")]
    pub leaf_size_rate: f64,
    #[serde(default = "default_sprout_at")]
    pub sprout_at: f64,
    #[serde(default = "default_young_at")]
    pub young_at: f64,
    #[serde(default = "default_mature_at")]
    pub mature_at: f64,
    #[serde(default = "default_flowering_at")]
    pub flowering_at: f64,
    #[serde(default = "default_harvestable_at")]
    pub harvestable_at: f64,
    /// Ordered growth values at which the nth leaf appears. At most one
    /// leaf spawns per threshold crossed.
    #[serde(default = "default_leaf_thresholds")]
    pub leaf_thresholds: Vec<f64>,
    #[serde(default = "default_flower_thresholds")]
    pub flower_thresholds: Vec<f64>,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            time_compression: default_time_compression(),
            base_growth_per_hour: default_base_growth_per_hour(),
            dehydration_per_hour: default_dehydration_per_hour(),
            wither_hours_per_segment: default_wither_hours_per_segment(),
            bud_chance_per_hour: default_bud_chance_per_hour(),
            day_growth_multiplier: default_day_growth_multiplier(),
            leaf_size_rate: default_leaf_size_rate(),
            sprout_at: default_sprout_at(),
            young_at: default_young_at(),
            mature_at: default_mature_at(),
            flowering_at: default_flowering_at(),
            harvestable_at: default_harvestable_at(),
            leaf_thresholds: default_leaf_thresholds(),
            flower_thresholds: default_flower_thresholds(),
        }
    }
}

impl RateConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rate config {}", path.display()))?;
        let config: RateConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Debug/test mode: compress a ten-hour cycle into about ten seconds.
    pub fn accelerated(mut self) -> Self {
        self.time_compression = 3600.0;
        self
    }

    /// Stage entry thresholds, highest first. The resolver takes the first
    /// entry whose threshold is at or below growth.
    pub fn stage_table(&self) -> [(Stage, f64); 6] {
        [
            (Stage::Harvestable, self.harvestable_at),
            (Stage::Flowering, self.flowering_at),
            (Stage::Mature, self.mature_at),
            (Stage::Young, self.young_at),
            (Stage::Sprout, self.sprout_at),
            (Stage::Seed, 0.0),
        ]
    }
}
