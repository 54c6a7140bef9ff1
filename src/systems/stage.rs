use anyhow::Result;

use crate::{
    engine::{System, TickContext},
    rng::SystemRng,
    state::{PlantState, Stage},
};

/// Derives the lifecycle stage from growth and structural health, and
/// claws growth back when the structure it paid for is gone.
pub struct StageSystem;

impl StageSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StageSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for StageSystem {
    fn name(&self) -> &str {
        "stage"
    }

    fn run(
        &mut self,
        ctx: &TickContext,
        plant: &mut PlantState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        regress_growth(plant, ctx);

        let next = resolve_stage(plant, ctx);
        if next != plant.stage {
            tracing::debug!(from = ?plant.stage, to = ?next, growth = plant.growth, "stage change");
            plant.stage = next;
        }
        Ok(())
    }
}

/// Growth is monotonic except here: if more leaf thresholds sit at or
/// below growth than the plant has healthy leaves, growth is clamped back
/// to the milestone its structure still justifies. Losing the fourth leaf
/// lands growth exactly on the three-leaf threshold.
fn regress_growth(plant: &mut PlantState, ctx: &TickContext) {
    let healthy = plant.healthy_leaf_count();
    let crossed = ctx
        .config
        .leaf_thresholds
        .iter()
        .filter(|&&t| plant.growth >= t)
        .count();
    if crossed <= healthy {
        return;
    }
    let milestone = if healthy == 0 {
        ctx.config.young_at
    } else {
        ctx.config.leaf_thresholds[healthy - 1]
    };
    plant.growth = plant.growth.min(milestone);
}

fn resolve_stage(plant: &PlantState, ctx: &TickContext) -> Stage {
    // A fully withered structure is terminal regardless of growth; the
    // engine short-circuits every later tick once Dead is set.
    if plant.all_withered() {
        return Stage::Dead;
    }
    if plant.any_withered() {
        return Stage::Withering;
    }
    ctx.config
        .stage_table()
        .into_iter()
        .find(|(_, threshold)| plant.growth >= *threshold)
        .map(|(stage, _)| stage)
        .unwrap_or(Stage::Seed)
}
