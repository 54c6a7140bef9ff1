use chrono::{TimeZone, Utc};

use teaplant::state::SegmentKind;
use teaplant::{Engine, GameState, RateConfig, Stage, WeatherSample};

fn new_state() -> GameState {
    GameState::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
}

fn dry(temperature: f64) -> WeatherSample {
    WeatherSample {
        temperature_c: Some(temperature),
        is_raining: false,
        sun_intensity: 0.0,
    }
}

/// Waters to full before each one-hour step at the ideal temperature, so
/// growth advances by a fixed, predictable amount per step.
fn grow_until(engine: &mut Engine, state: &mut GameState, target: f64) {
    let mut guard = 0;
    while state.plant.growth < target {
        state.water(1.0);
        engine.step(state, &dry(26.0), 1.0).unwrap();
        guard += 1;
        assert!(guard < 1000, "growth failed to reach {target}");
    }
}

fn bud_count(state: &GameState) -> usize {
    state.plant.segments.iter().filter(|s| s.is_bud()).count()
}

#[test]
fn mild_dry_ten_hour_tick_matches_the_specified_rates() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);

    engine.step(&mut state, &dry(20.0), 10.0).unwrap();

    // Hydration lands on 0.3 first, so growth runs at the 0.95 hydration
    // factor with the 0.70 20-degree factor and no sun bonus.
    let expected = 0.8 * 1.0 * 0.70 * 0.95 * 10.0;
    assert!(
        (state.plant.growth - expected).abs() < 1e-9,
        "expected growth {expected}, got {}",
        state.plant.growth
    );
    assert_eq!(state.plant.stage, Stage::Mature);
    assert_eq!(state.plant.leaf_count(), 4);
}

#[test]
fn seed_becomes_stem_at_the_sprout_threshold() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);
    assert!(matches!(
        state.plant.segments[0].kind,
        SegmentKind::Seed { .. }
    ));

    engine.step(&mut state, &dry(26.0), 1.0).unwrap();

    assert!(state.plant.growth >= 0.5);
    assert!(
        !state
            .plant
            .segments
            .iter()
            .any(|s| matches!(s.kind, SegmentKind::Seed { .. })),
        "the seed is consumed by sprouting"
    );
    assert!(state
        .plant
        .segments
        .iter()
        .any(|s| matches!(s.kind, SegmentKind::Stem { .. })));
    assert_eq!(state.plant.stage, Stage::Sprout);
}

#[test]
fn leaves_spawn_one_per_threshold_on_alternating_sides() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);

    grow_until(&mut engine, &mut state, 2.5);

    let angles: Vec<f64> = state
        .plant
        .segments
        .iter()
        .filter_map(|s| match s.kind {
            SegmentKind::Leaf { angle, .. } => Some(angle),
            _ => None,
        })
        .collect();
    assert_eq!(angles.len(), 2, "two thresholds crossed, two leaves");
    assert!(angles[0] < 0.0 && angles[1] > 0.0, "sides alternate");
}

#[test]
fn leaf_and_flower_counts_cap_at_four_and_three() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);

    grow_until(&mut engine, &mut state, 7.5);

    assert_eq!(state.plant.leaf_count(), 4);
    assert_eq!(state.plant.flower_count(), 3);

    grow_until(&mut engine, &mut state, 9.0);
    assert_eq!(state.plant.leaf_count(), 4, "leaf cap holds");
    assert_eq!(state.plant.flower_count(), 3, "flower cap holds");
}

#[test]
fn leaves_grow_asymptotically_toward_their_target_size() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);
    grow_until(&mut engine, &mut state, 1.6);

    let size_at = |state: &GameState| -> f64 {
        state
            .plant
            .segments
            .iter()
            .find_map(|s| match s.kind {
                SegmentKind::Leaf { current_size, .. } => Some(current_size),
                _ => None,
            })
            .expect("a leaf exists")
    };
    let early = size_at(&state);

    grow_until(&mut engine, &mut state, 3.0);
    let later = size_at(&state);

    assert!(later > early, "leaf keeps growing after spawn");
    assert!(later < 22.0, "leaf never overshoots its target");
}

#[test]
fn buds_spawn_one_per_tick_and_growth_parks_on_the_harvest_threshold() {
    // Grow with bud spawning disabled, then flip to a certain chance.
    let mut quiet = RateConfig::default();
    quiet.bud_chance_per_hour = 0.0;
    let mut engine = Engine::new(quiet, 7);
    let mut state = new_state();
    grow_until(&mut engine, &mut state, 8.5);
    assert_eq!(bud_count(&state), 0, "no trials can succeed at chance 0");

    let mut certain = RateConfig::default();
    certain.bud_chance_per_hour = 1.0;
    let mut engine = Engine::new(certain, 7);

    state.water(1.0);
    engine.step(&mut state, &dry(26.0), 1.0).unwrap();
    assert_eq!(bud_count(&state), 1, "at most one bud per tick");

    let first_leaf = state
        .plant
        .segments
        .iter()
        .find(|s| s.is_leaf())
        .map(|s| s.id)
        .unwrap();
    let bud_leaf = state
        .plant
        .segments
        .iter()
        .find_map(|s| match s.kind {
            SegmentKind::Bud { leaf_id, .. } => Some(leaf_id),
            _ => None,
        })
        .unwrap();
    assert_eq!(bud_leaf, first_leaf, "buds fill leaves in spawn order");

    for _ in 0..3 {
        state.water(1.0);
        engine.step(&mut state, &dry(26.0), 1.0).unwrap();
    }
    assert_eq!(bud_count(&state), 4, "one bud per leaf");
    assert_eq!(
        state.plant.growth, 8.0,
        "growth parks on the threshold once every leaf carries a bud"
    );
}

#[test]
fn harvesting_a_bud_lets_the_leaf_bud_again() {
    let mut certain = RateConfig::default();
    certain.bud_chance_per_hour = 1.0;
    let mut engine = Engine::new(certain, 7);
    let mut state = new_state();
    grow_until(&mut engine, &mut state, 8.5);
    while bud_count(&state) < 4 {
        state.water(1.0);
        engine.step(&mut state, &dry(26.0), 1.0).unwrap();
    }

    let bud = state
        .plant
        .segments
        .iter()
        .find(|s| s.is_bud())
        .map(|s| s.id)
        .unwrap();
    let total = state.harvest(bud).unwrap();
    assert_eq!(total, 1);
    assert_eq!(state.tea_leaves_harvested, 1);
    assert_eq!(bud_count(&state), 3);

    state.water(1.0);
    engine.step(&mut state, &dry(26.0), 1.0).unwrap();
    assert_eq!(bud_count(&state), 4, "the freed leaf buds again");
}

#[test]
fn a_withered_segment_freezes_growth_entirely() {
    let mut state = new_state();
    state.plant.push_segment(SegmentKind::Leaf {
        x: 150.0,
        y: 270.0,
        angle: -35.0,
        current_size: 10.0,
        target_size: 22.0,
    });
    if let Some(last) = state.plant.segments.last_mut() {
        last.withered = true;
    }
    let mut engine = Engine::new(RateConfig::default(), 42);

    engine.step(&mut state, &dry(26.0), 10.0).unwrap();

    assert_eq!(state.plant.growth, 0.0, "withered structure blocks growth");
    assert_eq!(state.plant.stage, Stage::Withering);
}

#[test]
fn zero_hydration_freezes_growth() {
    let mut state = new_state();
    state.plant.hydration = 0.0;
    let mut engine = Engine::new(RateConfig::default(), 42);

    engine.step(&mut state, &dry(26.0), 1.0).unwrap();

    assert_eq!(state.plant.growth, 0.0);
}

#[test]
fn identical_seeds_replay_identically() {
    let run = |seed: u64| -> GameState {
        let mut state = new_state();
        let mut engine = Engine::new(RateConfig::default(), seed);
        grow_until(&mut engine, &mut state, 8.2);
        for _ in 0..10 {
            state.water(1.0);
            engine.step(&mut state, &dry(26.0), 1.0).unwrap();
        }
        state
    };

    assert_eq!(run(5).plant, run(5).plant, "same seed, same buds");
}
