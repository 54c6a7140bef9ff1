mod growth;
mod hydration;
mod stage;

pub use growth::GrowthSystem;
pub use hydration::HydrationSystem;
pub use stage::StageSystem;
