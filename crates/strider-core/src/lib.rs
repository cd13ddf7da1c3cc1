// strider-core: Types, configuration, and errors for the Strider footstep planner.

pub mod config;
pub mod error;
pub mod math;
pub mod types;

pub use config::{CostWeights, GaitSettings, PlannerParameters, ScorerWeights, WiggleConfig};
pub use error::ConfigError;
pub use types::{Leg, Morphology, Stance, StepSequence};
