//! Planner and gait configuration.
//!
//! All tunables live here as read-only snapshots: the planner never mutates
//! them, and online re-tuning means building a new value and handing it to
//! subsequent calls. Cost and solver weights are configuration, not constants
//! baked into the evaluators.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Leg, Morphology, StepSequence};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_grid_resolution() -> f64 {
    0.05
}
const fn default_min_step_length() -> f64 {
    -0.25
}
const fn default_max_step_reach() -> f64 {
    0.6
}
const fn default_min_step_width() -> f64 {
    0.0
}
const fn default_max_step_width() -> f64 {
    0.15
}
const fn default_foot_half_length() -> f64 {
    0.07
}
const fn default_foot_half_width() -> f64 {
    0.04
}
const fn default_clearance_half_depth() -> f64 {
    0.04
}
const fn default_clearance_half_width() -> f64 {
    0.03
}
const fn default_max_step_yaw() -> f64 {
    0.25
}
const fn default_min_step_yaw() -> f64 {
    -0.25
}

const fn default_morphology() -> Morphology {
    Morphology::Quadruped
}
const fn default_stance_length() -> f64 {
    0.5
}
const fn default_stance_width() -> f64 {
    0.25
}
const fn default_max_forward_speed() -> f64 {
    0.4
}
const fn default_max_lateral_speed() -> f64 {
    0.2
}
const fn default_max_yaw_speed() -> f64 {
    0.5
}
const fn default_cycle_duration() -> f64 {
    0.8
}
const fn default_end_phase_shift() -> f64 {
    90.0
}

const fn default_along_weight() -> f64 {
    1.0
}
const fn default_perpendicular_weight() -> f64 {
    2.5
}
const fn default_yaw_weight() -> f64 {
    1.5
}

const fn default_forward_weight() -> f64 {
    -0.7
}
const fn default_backward_weight() -> f64 {
    -0.2
}
const fn default_upward_weight() -> f64 {
    -0.2
}
const fn default_downward_weight() -> f64 {
    -0.7
}
const fn default_angular_weight() -> f64 {
    -0.1
}
const fn default_goal_progress_weight() -> f64 {
    0.5
}

const fn default_rotation_weight() -> f64 {
    0.2
}
const fn default_max_solver_iterations() -> u32 {
    100
}

// ---------------------------------------------------------------------------
// PlannerParameters
// ---------------------------------------------------------------------------

/// Kinematic limits and discretization used by node expansion.
///
/// Shared, read-only for the duration of a planning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerParameters {
    /// Grid cell size in meters; every node coordinate is a multiple of this.
    #[serde(default = "default_grid_resolution")]
    pub grid_resolution: f64,

    /// Smallest longitudinal candidate offset from the nominal target
    /// (negative values allow stepping backward).
    #[serde(default = "default_min_step_length")]
    pub min_step_length: f64,

    /// Largest longitudinal candidate offset, and the Euclidean cap on how
    /// far the moving foot may travel from its pre-move position.
    #[serde(default = "default_max_step_reach")]
    pub max_step_reach: f64,

    /// Smallest lateral candidate offset from the nominal target.
    #[serde(default = "default_min_step_width")]
    pub min_step_width: f64,

    /// Largest lateral candidate offset from the nominal target.
    #[serde(default = "default_max_step_width")]
    pub max_step_width: f64,

    /// Foot footprint half-length (meters).
    #[serde(default = "default_foot_half_length")]
    pub foot_half_length: f64,

    /// Foot footprint half-width (meters).
    #[serde(default = "default_foot_half_width")]
    pub foot_half_width: f64,

    /// Longitudinal clearance half-extent added around each foot; the
    /// inflated boxes of any two planted feet must not overlap.
    #[serde(default = "default_clearance_half_depth")]
    pub clearance_half_depth: f64,

    /// Lateral clearance half-extent added around each foot.
    #[serde(default = "default_clearance_half_width")]
    pub clearance_half_width: f64,

    /// Maximum yaw change per step (radians).
    #[serde(default = "default_max_step_yaw")]
    pub max_step_yaw: f64,

    /// Minimum (most negative) yaw change per step (radians).
    #[serde(default = "default_min_step_yaw")]
    pub min_step_yaw: f64,
}

impl Default for PlannerParameters {
    fn default() -> Self {
        Self {
            grid_resolution: default_grid_resolution(),
            min_step_length: default_min_step_length(),
            max_step_reach: default_max_step_reach(),
            min_step_width: default_min_step_width(),
            max_step_width: default_max_step_width(),
            foot_half_length: default_foot_half_length(),
            foot_half_width: default_foot_half_width(),
            clearance_half_depth: default_clearance_half_depth(),
            clearance_half_width: default_clearance_half_width(),
            max_step_yaw: default_max_step_yaw(),
            min_step_yaw: default_min_step_yaw(),
        }
    }
}

impl PlannerParameters {
    /// Parameters sized for a biped: narrower sweep, lateral offsets kept
    /// outside the stationary foot's clearance band.
    pub fn biped() -> Self {
        Self {
            min_step_length: -0.15,
            max_step_reach: 0.45,
            min_step_width: 0.05,
            max_step_width: 0.2,
            ..Self::default()
        }
    }

    /// Half-extents of a foot's inflated clearance box.
    pub fn clearance_half_extents(&self) -> Vector2<f64> {
        Vector2::new(
            self.foot_half_length + self.clearance_half_depth,
            self.foot_half_width + self.clearance_half_width,
        )
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_resolution <= 0.0 {
            return Err(ConfigError::invalid("grid_resolution", "must be > 0"));
        }
        if self.max_step_reach <= 0.0 {
            return Err(ConfigError::invalid("max_step_reach", "must be > 0"));
        }
        if self.min_step_length > self.max_step_reach {
            return Err(ConfigError::invalid(
                "min_step_length",
                "must be <= max_step_reach",
            ));
        }
        if self.min_step_width > self.max_step_width {
            return Err(ConfigError::invalid(
                "min_step_width",
                "must be <= max_step_width",
            ));
        }
        if self.foot_half_length <= 0.0 || self.foot_half_width <= 0.0 {
            return Err(ConfigError::invalid("foot_half_length", "must be > 0"));
        }
        if self.clearance_half_depth < 0.0 || self.clearance_half_width < 0.0 {
            return Err(ConfigError::invalid("clearance_half_depth", "must be >= 0"));
        }
        if self.min_step_yaw > self.max_step_yaw {
            return Err(ConfigError::invalid(
                "min_step_yaw",
                "must be <= max_step_yaw",
            ));
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let params: Self = toml::from_str(&content)?;
        params.validate()?;
        Ok(params)
    }
}

// ---------------------------------------------------------------------------
// GaitSettings
// ---------------------------------------------------------------------------

/// Nominal gait shape and speed envelope.
///
/// Phase offsets follow the usual cycle convention: each leg lifts at its
/// offset within `[0, 1)` of the gait cycle. The end-phase shift slides the
/// hind pair relative to the front pair (90 deg = crawl, 180 deg = trot-like
/// pairing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitSettings {
    #[serde(default = "default_morphology")]
    pub morphology: Morphology,

    /// Nominal front-to-hind foot separation (meters). Zero for bipeds.
    #[serde(default = "default_stance_length")]
    pub stance_length: f64,

    /// Nominal left-to-right foot separation (meters).
    #[serde(default = "default_stance_width")]
    pub stance_width: f64,

    /// Speed cap along the body's forward axis (m/s).
    #[serde(default = "default_max_forward_speed")]
    pub max_forward_speed: f64,

    /// Speed cap along the body's lateral axis (m/s).
    #[serde(default = "default_max_lateral_speed")]
    pub max_lateral_speed: f64,

    /// Yaw rate cap (rad/s).
    #[serde(default = "default_max_yaw_speed")]
    pub max_yaw_speed: f64,

    /// Duration of one full gait cycle (seconds).
    #[serde(default = "default_cycle_duration")]
    pub cycle_duration: f64,

    /// Phase shift of the hind pair relative to the front pair, in degrees.
    #[serde(default = "default_end_phase_shift")]
    pub end_phase_shift: f64,
}

impl Default for GaitSettings {
    fn default() -> Self {
        Self {
            morphology: default_morphology(),
            stance_length: default_stance_length(),
            stance_width: default_stance_width(),
            max_forward_speed: default_max_forward_speed(),
            max_lateral_speed: default_max_lateral_speed(),
            max_yaw_speed: default_max_yaw_speed(),
            cycle_duration: default_cycle_duration(),
            end_phase_shift: default_end_phase_shift(),
        }
    }
}

impl GaitSettings {
    /// Settings for a biped: no front/hind axis, hip-width stance.
    pub fn biped() -> Self {
        Self {
            morphology: Morphology::Biped,
            stance_length: 0.0,
            stance_width: 0.2,
            ..Self::default()
        }
    }

    /// Step sequence table for this morphology.
    pub fn step_sequence(&self) -> StepSequence {
        match self.morphology {
            Morphology::Biped => StepSequence::biped_alternating(),
            Morphology::Quadruped => StepSequence::quadruped_crawl(),
        }
    }

    /// Liftoff phase of `leg` within `[0, 1)` of the gait cycle.
    pub fn phase_offset(&self, leg: Leg) -> f64 {
        match self.morphology {
            Morphology::Biped => {
                if leg == Leg::LEFT {
                    0.0
                } else {
                    0.5
                }
            }
            Morphology::Quadruped => {
                let shift = (self.end_phase_shift / 360.0).rem_euclid(1.0);
                match leg {
                    Leg::FRONT_LEFT => 0.0,
                    Leg::FRONT_RIGHT => 0.5,
                    Leg::HIND_LEFT => (0.5 + shift).rem_euclid(1.0),
                    _ => shift,
                }
            }
        }
    }

    /// Wall-clock time between the previous leg's liftoff and `moving_leg`'s,
    /// i.e. the time budget one step of the sequence represents.
    ///
    /// A zero increment is legitimate for pair gaits where two legs share a
    /// phase; the second member of the pair owes no additional travel.
    pub fn step_time_increment(&self, moving_leg: Leg) -> f64 {
        let seq = self.step_sequence();
        let prev = seq.previous(moving_leg);
        let delta = (self.phase_offset(moving_leg) - self.phase_offset(prev)).rem_euclid(1.0);
        delta * self.cycle_duration
    }

    /// Nominal foothold offset of `leg` from the stance center, in the
    /// stance-local frame (x forward, y left).
    pub fn nominal_foothold_offset(&self, leg: Leg) -> Vector2<f64> {
        Vector2::new(
            self.morphology.longitudinal_sign(leg) * self.stance_length * 0.5,
            self.morphology.lateral_sign(leg) * self.stance_width * 0.5,
        )
    }

    /// Diagonal half-extent of the nominal stance rectangle; the lever arm
    /// used to express yaw error as an arc length.
    pub fn arm_length(&self) -> f64 {
        0.5 * self.stance_length.hypot(self.stance_width)
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stance_width <= 0.0 {
            return Err(ConfigError::invalid("stance_width", "must be > 0"));
        }
        if self.stance_length < 0.0 {
            return Err(ConfigError::invalid("stance_length", "must be >= 0"));
        }
        if self.max_forward_speed <= 0.0 || self.max_lateral_speed <= 0.0 {
            return Err(ConfigError::invalid("max_forward_speed", "must be > 0"));
        }
        if self.max_yaw_speed <= 0.0 {
            return Err(ConfigError::invalid("max_yaw_speed", "must be > 0"));
        }
        if self.cycle_duration <= 0.0 {
            return Err(ConfigError::invalid("cycle_duration", "must be > 0"));
        }
        if !(0.0..360.0).contains(&self.end_phase_shift) {
            return Err(ConfigError::invalid(
                "end_phase_shift",
                "must be in [0, 360)",
            ));
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }
}

// ---------------------------------------------------------------------------
// CostWeights
// ---------------------------------------------------------------------------

/// Weights for the gait-tracking step cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Penalty per meter of end-center error along the desired travel line.
    #[serde(default = "default_along_weight")]
    pub along_weight: f64,

    /// Penalty per meter of end-center error perpendicular to the desired
    /// travel line. Deliberately larger than `along_weight`: drifting off the
    /// path costs more than under/overshooting along it.
    #[serde(default = "default_perpendicular_weight")]
    pub perpendicular_weight: f64,

    /// Penalty per meter of yaw-error arc length at the stance arm radius.
    #[serde(default = "default_yaw_weight")]
    pub yaw_weight: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            along_weight: default_along_weight(),
            perpendicular_weight: default_perpendicular_weight(),
            yaw_weight: default_yaw_weight(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScorerWeights
// ---------------------------------------------------------------------------

/// Weights for the biped footstep scorer.
///
/// Negative weights penalize, the positive goal-progress weight awards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerWeights {
    #[serde(default = "default_forward_weight")]
    pub forward: f64,
    #[serde(default = "default_backward_weight")]
    pub backward: f64,
    #[serde(default = "default_upward_weight")]
    pub upward: f64,
    #[serde(default = "default_downward_weight")]
    pub downward: f64,
    #[serde(default = "default_angular_weight")]
    pub angular: f64,
    #[serde(default = "default_goal_progress_weight")]
    pub goal_progress: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            forward: default_forward_weight(),
            backward: default_backward_weight(),
            upward: default_upward_weight(),
            downward: default_downward_weight(),
            angular: default_angular_weight(),
            goal_progress: default_goal_progress_weight(),
        }
    }
}

// ---------------------------------------------------------------------------
// WiggleConfig
// ---------------------------------------------------------------------------

/// Foothold wiggle solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WiggleConfig {
    /// Weight of the rotation term in the QP objective; below 1 so the
    /// solver prefers translating a foot into a region over rotating it.
    #[serde(default = "default_rotation_weight")]
    pub rotation_weight: f64,

    /// Iteration cap for the QP solve; the solver signals infeasibility
    /// rather than looping.
    #[serde(default = "default_max_solver_iterations")]
    pub max_solver_iterations: u32,
}

impl Default for WiggleConfig {
    fn default() -> Self {
        Self {
            rotation_weight: default_rotation_weight(),
            max_solver_iterations: default_max_solver_iterations(),
        }
    }
}

impl WiggleConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation_weight <= 0.0 {
            return Err(ConfigError::invalid("rotation_weight", "must be > 0"));
        }
        if self.max_solver_iterations == 0 {
            return Err(ConfigError::invalid(
                "max_solver_iterations",
                "must be > 0",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
