pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod input;
pub mod validation;

pub use config::*;
pub use engine::{
    breakdown, feature_contribution, rank, score, Deviation, FeatureContribution, ScoredResult,
    Scorer,
};
pub use error::InvalidInput;
pub use explain::{explain, rationale, WITHIN_IDEAL_RANGES};
pub use input::{parse_assignment, UserInput};
pub use validation::validate_options;
