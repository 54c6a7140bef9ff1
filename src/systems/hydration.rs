use anyhow::Result;

use crate::{
    engine::{System, TickContext},
    rates,
    rng::SystemRng,
    state::PlantState,
};

/// Advances hydration, and once the plant has sat dry long enough, marks
/// segments withered one at a time. Runs first in the pipeline so growth
/// sees this step's hydration.
pub struct HydrationSystem;

impl HydrationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HydrationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HydrationSystem {
    fn name(&self) -> &str {
        "hydration"
    }

    fn run(
        &mut self,
        ctx: &TickContext,
        plant: &mut PlantState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if ctx.is_raining {
            // Rain overrides all dehydration for the interval.
            plant.hydration = 1.0;
            plant.time_at_zero_hydration = 0.0;
            return Ok(());
        }

        let rate = ctx.config.dehydration_per_hour
            * rates::dehydration_temperature_multiplier(ctx.temperature_c);
        plant.hydration = (plant.hydration - rate * ctx.elapsed_hours).max(0.0);

        if plant.hydration > 0.0 {
            plant.time_at_zero_hydration = 0.0;
            return Ok(());
        }

        plant.time_at_zero_hydration += ctx.elapsed_hours;
        let due = (plant.time_at_zero_hydration / ctx.config.wither_hours_per_segment)
            .floor()
            .max(0.0) as usize;
        let already = plant.withered_count();
        if due > already {
            wither_newest(plant, due - already);
        }
        Ok(())
    }
}

/// Newest growth dies first: walk the spawn order backwards, flagging
/// non-withered segments. Withering is monotonic; nothing un-withers.
fn wither_newest(plant: &mut PlantState, count: usize) {
    let mut remaining = count;
    for segment in plant.segments.iter_mut().rev() {
        if remaining == 0 {
            break;
        }
        if !segment.withered {
            segment.withered = true;
            remaining -= 1;
        }
    }
}
