use anyhow::Result;

use crate::{
    config::RateConfig,
    engine::{System, TickContext},
    rates,
    rng::SystemRng,
    state::{PlantState, SegmentKind, BASE_X, BASE_Y},
};

const STEM_BASE_WIDTH: f64 = 4.0;
const LEAF_SPAWN_SIZE: f64 = 4.0;
const LEAF_TARGET_SIZE: f64 = 22.0;
const LEAF_ANGLE: f64 = 35.0;
const FLOWER_SIZE: f64 = 10.0;
const BUD_SIZE: f64 = 6.0;

/// The procedural automaton: advances the growth scalar and, at fixed
/// thresholds, mutates the segment list. Every structural branch is gated
/// on what already exists, so re-running it is idempotent per threshold.
pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(
        &mut self,
        ctx: &TickContext,
        plant: &mut PlantState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let hydration_factor = rates::hydration_growth_factor(plant.hydration);
        // Withered structure freezes growth entirely: the plant must be
        // pruned back to health before it grows more.
        if plant.any_withered() || hydration_factor <= 0.0 {
            return Ok(());
        }

        let rate = ctx.config.base_growth_per_hour
            * rates::sun_growth_factor(ctx.sun_intensity, ctx.config)
            * rates::temperature_growth_factor(ctx.temperature_c)
            * hydration_factor;
        let growth_before = plant.growth;
        plant.growth += rate * ctx.elapsed_hours;

        sprout_stem(plant, ctx.config);
        update_stem(plant, ctx.config);
        spawn_leaves(plant, ctx.config, growth_before);
        grow_leaves(plant, rate * ctx.elapsed_hours, ctx.config);
        spawn_flowers(plant, ctx.config);
        spawn_bud(plant, ctx, rng);
        clamp_at_harvestable(plant, ctx.config);
        Ok(())
    }
}

/// Seed→Stem: the seed segment is consumed and a stem takes its place at
/// the fixed base position.
fn sprout_stem(plant: &mut PlantState, config: &RateConfig) {
    if plant.growth < config.sprout_at {
        return;
    }
    let has_stem = plant
        .segments
        .iter()
        .any(|s| matches!(s.kind, SegmentKind::Stem { .. }));
    if has_stem {
        return;
    }
    let seed_ids: Vec<_> = plant
        .segments
        .iter()
        .filter(|s| matches!(s.kind, SegmentKind::Seed { .. }))
        .map(|s| s.id)
        .collect();
    for id in seed_ids {
        plant.remove_segment(id);
    }
    let height = stem_height_for(plant.growth, config);
    plant.push_segment(SegmentKind::Stem {
        x: BASE_X,
        y: BASE_Y,
        height,
        width: STEM_BASE_WIDTH + height * 0.02,
    });
}

fn update_stem(plant: &mut PlantState, config: &RateConfig) {
    let target = stem_height_for(plant.growth, config);
    for segment in &mut plant.segments {
        if let SegmentKind::Stem { height, width, .. } = &mut segment.kind {
            *height = target;
            *width = STEM_BASE_WIDTH + target * 0.02;
        }
    }
}

/// Piecewise-linear height over growth: within each stage the stem rises
/// from the previous stage's full height toward its own, reaching it at
/// 80% of the stage's span, then holds until the next stage begins.
fn stem_height_for(growth: f64, config: &RateConfig) -> f64 {
    let bands = [
        (config.sprout_at, config.young_at, 4.0, 20.0),
        (config.young_at, config.mature_at, 20.0, 80.0),
        (config.mature_at, config.flowering_at, 80.0, 140.0),
        (config.flowering_at, config.harvestable_at, 140.0, 200.0),
        (config.harvestable_at, config.harvestable_at + 1.0, 200.0, 260.0),
    ];
    if growth < config.sprout_at {
        return 0.0;
    }
    let (entry, next, from, to) = bands
        .into_iter()
        .rev()
        .find(|(entry, ..)| growth >= *entry)
        .unwrap_or(bands[0]);
    let full_at = entry + 0.8 * (next - entry);
    let t = if full_at > entry {
        ((growth - entry) / (full_at - entry)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    from + (to - from) * t
}

/// Exactly one leaf per threshold crossed from below this step,
/// alternating sides, capped by the threshold table length. Spawning keys
/// on the upward crossing, not on the count alone: a pruned leaf does not
/// reappear until the stage resolver's regression makes growth re-earn
/// its threshold.
fn spawn_leaves(plant: &mut PlantState, config: &RateConfig, growth_before: f64) {
    let crossed_total = config
        .leaf_thresholds
        .iter()
        .filter(|&&t| plant.growth >= t)
        .count();
    let crossings = config
        .leaf_thresholds
        .iter()
        .filter(|&&t| growth_before < t && plant.growth >= t)
        .count();
    let mut to_spawn = crossings.min(crossed_total.saturating_sub(plant.leaf_count()));
    while to_spawn > 0 {
        to_spawn -= 1;
        let index = plant.leaf_count();
        let side = if index % 2 == 0 { -1.0 } else { 1.0 };
        let stem_height = stem_height_for(plant.growth, config);
        plant.push_segment(SegmentKind::Leaf {
            x: BASE_X + side * 6.0,
            y: BASE_Y - stem_height * (0.35 + 0.12 * index as f64),
            angle: side * LEAF_ANGLE,
            current_size: LEAF_SPAWN_SIZE,
            target_size: LEAF_TARGET_SIZE,
        });
    }
}

/// Each live leaf closes asymptotically on its target size at a pace
/// proportional to the effective growth this step.
fn grow_leaves(plant: &mut PlantState, effective_growth: f64, config: &RateConfig) {
    let step = (config.leaf_size_rate * effective_growth).min(1.0);
    for segment in &mut plant.segments {
        if segment.withered {
            continue;
        }
        if let SegmentKind::Leaf {
            current_size,
            target_size,
            ..
        } = &mut segment.kind
        {
            *current_size += (*target_size - *current_size) * step;
        }
    }
}

fn spawn_flowers(plant: &mut PlantState, config: &RateConfig) {
    let crossed = config
        .flower_thresholds
        .iter()
        .filter(|&&t| plant.growth >= t)
        .count();
    while plant.flower_count() < crossed {
        let index = plant.flower_count();
        let side = if index % 2 == 0 { 1.0 } else { -1.0 };
        let stem_height = stem_height_for(plant.growth, config);
        plant.push_segment(SegmentKind::Flower {
            x: BASE_X + side * (10.0 + 4.0 * index as f64),
            y: BASE_Y - stem_height + 12.0 * index as f64,
            size: FLOWER_SIZE,
        });
    }
}

/// Past the harvestable threshold, at most one bud may appear per step:
/// a single Bernoulli trial against the per-hour chance, attached to the
/// first leaf in spawn order still lacking a bud.
fn spawn_bud(plant: &mut PlantState, ctx: &TickContext, rng: &mut SystemRng<'_>) {
    if plant.growth < ctx.config.harvestable_at {
        return;
    }
    let Some(leaf) = plant.first_leaf_without_bud() else {
        return;
    };
    let (x, y, angle) = match &leaf.kind {
        SegmentKind::Leaf { x, y, angle, .. } => (*x, *y, *angle),
        _ => return,
    };
    let leaf_id = leaf.id;
    let probability = (ctx.config.bud_chance_per_hour * ctx.elapsed_hours).min(1.0);
    if !rng.chance(probability) {
        return;
    }
    plant.push_segment(SegmentKind::Bud {
        x: x + angle.signum() * 4.0,
        y: y - 4.0,
        size: BUD_SIZE,
        angle,
        leaf_id,
    });
}

/// With a bud waiting on every leaf there is nothing left for growth to
/// trigger, so it parks on the threshold instead of drifting unboundedly.
fn clamp_at_harvestable(plant: &mut PlantState, config: &RateConfig) {
    if plant.every_leaf_has_bud() && plant.growth > config.harvestable_at {
        plant.growth = config.harvestable_at;
    }
}
