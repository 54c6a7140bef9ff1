pub mod catchup;
pub mod config;
pub mod engine;
pub mod rates;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod weather;

pub use catchup::{catch_up, CatchupReport};
pub use config::RateConfig;
pub use engine::{Engine, WeatherSample};
pub use state::{GameState, PlantState, SegmentKind, Stage};
