//! Core data models: the three tournament exports and the statistics derived from them.

mod analysis;
mod decklist;
mod ids;
mod match_result;
mod stats;

pub use analysis::*;
pub use decklist::*;
pub use ids::*;
pub use match_result::*;
pub use stats::*;
