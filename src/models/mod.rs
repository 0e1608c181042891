//! Core data models for match and player analytics.

mod ids;
mod match_record;
mod player;
mod series;
mod stats;

pub use ids::*;
pub use match_record::*;
pub use player::*;
pub use series::*;
pub use stats::*;
