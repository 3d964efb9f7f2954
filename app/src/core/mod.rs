pub mod geo;
pub mod resilience;
pub mod time;
