use chrono::{Duration, TimeZone, Utc};

use teaplant::state::CurrentWeather;
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

fn grow_until(engine: &mut Engine, state: &mut GameState, target: f64) {
    let mut guard = 0;
    while state.plant.growth < target {
        state.water(1.0);
        engine.step(state, &dry(26.0), 1.0).unwrap();
        guard += 1;
        assert!(guard < 1000, "growth failed to reach {target}");
    }
}

#[test]
fn stage_progresses_through_the_threshold_table() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);
    assert_eq!(state.plant.stage, Stage::Seed);

    grow_until(&mut engine, &mut state, 0.6);
    assert_eq!(state.plant.stage, Stage::Sprout);

    grow_until(&mut engine, &mut state, 1.2);
    assert_eq!(state.plant.stage, Stage::Young);

    grow_until(&mut engine, &mut state, 4.1);
    assert_eq!(state.plant.stage, Stage::Mature);

    grow_until(&mut engine, &mut state, 6.1);
    assert_eq!(state.plant.stage, Stage::Flowering);

    grow_until(&mut engine, &mut state, 8.1);
    assert_eq!(state.plant.stage, Stage::Harvestable);
}

#[test]
fn pruning_the_fourth_leaf_clamps_growth_to_the_three_leaf_threshold() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);
    grow_until(&mut engine, &mut state, 3.7);
    assert_eq!(state.plant.leaf_count(), 4);

    let newest_leaf = state
        .plant
        .segments
        .iter()
        .rev()
        .find(|s| s.is_leaf())
        .map(|s| s.id)
        .unwrap();
    state.prune(newest_leaf).unwrap();
    assert_eq!(state.plant.leaf_count(), 3);

    // Park hydration below the growth band so the step only resolves.
    state.plant.hydration = 0.05;
    engine.step(&mut state, &dry(26.0), 1.0).unwrap();

    assert_eq!(
        state.plant.growth, 2.9,
        "growth falls back to the three-leaf threshold"
    );
    assert_eq!(state.plant.stage, Stage::Young);
    assert_eq!(state.plant.leaf_count(), 3, "the pruned leaf does not pop back");

    // Regrowing past the threshold earns the fourth leaf again.
    state.water(1.0);
    grow_until(&mut engine, &mut state, 3.7);
    assert_eq!(state.plant.leaf_count(), 4);
}

#[test]
fn a_fully_withered_plant_is_dead_and_frozen_forever() {
    let mut state = new_state();
    let mut engine = Engine::new(RateConfig::default(), 42);
    grow_until(&mut engine, &mut state, 2.5);
    assert!(state.plant.segments.len() >= 3);

    state.plant.hydration = 0.0;
    let hours = 12.0 * state.plant.segments.len() as f64;
    engine.step(&mut state, &dry(20.0), hours).unwrap();
    assert_eq!(state.plant.stage, Stage::Dead);

    let frozen = state.clone();

    let rain = WeatherSample {
        temperature_c: Some(18.0),
        is_raining: true,
        sun_intensity: 0.0,
    };
    engine.step(&mut state, &rain, 5.0).unwrap();
    assert_eq!(state, frozen, "no weather moves a dead plant");

    state.water(1.0);
    assert_eq!(state, frozen, "watering a dead plant is refused");

    engine.step(&mut state, &dry(26.0), 100.0).unwrap();
    assert_eq!(state, frozen);
}

#[test]
fn a_dead_plant_still_tracks_wall_time() {
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let mut state = GameState::new(start);
    state.environment.weather = Some(CurrentWeather {
        temperature_c: 20.0,
        is_raining: false,
    });
    state.plant.hydration = 0.0;
    let mut engine = Engine::new(RateConfig::default(), 42);

    // The lone seed withers after 12 dry hours; the plant dies.
    let later = start + Duration::hours(13);
    engine.tick_at(&mut state, later).unwrap();
    assert_eq!(state.plant.stage, Stage::Dead);

    let much_later = later + Duration::hours(48);
    engine.tick_at(&mut state, much_later).unwrap();
    assert_eq!(state.last_update, much_later, "the clock still advances");
    assert_eq!(state.plant.stage, Stage::Dead);
}

#[test]
fn reset_replants_but_keeps_the_harvest_total() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
    let mut state = new_state();
    state.tea_leaves_harvested = 3;
    state.plant.hydration = 0.0;
    state.plant.growth = 0.0;
    let mut engine = Engine::new(RateConfig::default(), 42);
    engine.step(&mut state, &dry(20.0), 24.0).unwrap();
    assert_eq!(state.plant.stage, Stage::Dead);

    state.reset(now);

    assert_eq!(state.plant.stage, Stage::Seed);
    assert_eq!(state.plant.hydration, 0.5);
    assert_eq!(state.plant.segments.len(), 1);
    assert_eq!(state.last_update, now);
    assert_eq!(state.tea_leaves_harvested, 3);
}
