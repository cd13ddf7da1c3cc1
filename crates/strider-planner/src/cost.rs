//! Step transition costs.
//!
//! Two evaluators live here: the gait-tracking `step_cost` used as the
//! search edge weight, and the biped `score` heuristic that rates a
//! candidate footstep against an ideal one. Both are total functions: any
//! pair of valid nodes gets a finite value, degenerate directions contribute
//! zero instead of dividing by it.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Point2, Point3, Rotation2, Vector2};

use strider_core::config::{CostWeights, GaitSettings, ScorerWeights};
use strider_core::math::{snap_to_grid, wrap_angle};
use strider_core::types::Leg;

use crate::heading::HeadingProvider;
use crate::node::FootstepNode;

const DIRECTION_EPS: f64 = 1e-9;

/// Nominal gait-center motion for one step: where the gait center and the
/// moving foot would land if the step tracked the desired velocity exactly.
#[derive(Clone, Debug)]
pub struct NominalStep {
    /// Desired gait-center translation over this step's time increment.
    pub translation: Vector2<f64>,
    /// Gait center after the nominal translation.
    pub end_center: Point2<f64>,
    /// Facing at the end of the nominal step.
    pub end_yaw: f64,
}

/// Reconstruct the nominal end pose for the step that moves `moving_leg`
/// out of `start`.
///
/// The desired speed follows an ellipse-shaped envelope: full forward speed
/// straight ahead, the reduced lateral cap sideways, and the elliptical
/// radius in between. When the provider reports no heading the nominal
/// translation is zero and the step is priced as holding position.
pub fn nominal_step(
    start: &FootstepNode,
    moving_leg: Leg,
    gait: &GaitSettings,
    provider: &dyn HeadingProvider,
) -> NominalStep {
    let start_center = start.stance_center(gait.morphology);
    let start_yaw = start.nominal_yaw(gait.morphology);

    let translation = match provider.nominal_heading(&start_center) {
        Some(heading) => {
            // Express the heading in the stance frame to evaluate the
            // speed envelope, then integrate over this step's share of the
            // gait cycle.
            let local = Rotation2::new(-start_yaw) * heading.into_inner();
            let fx = gait.max_forward_speed;
            let fy = gait.max_lateral_speed;
            let denom = (fy * local.x).hypot(fx * local.y);
            let speed = if denom > DIRECTION_EPS {
                fx * fy / denom
            } else {
                0.0
            };
            heading.into_inner() * speed * gait.step_time_increment(moving_leg)
        }
        None => Vector2::zeros(),
    };

    let end_center = start_center + translation;
    let mut end_yaw = provider.nominal_yaw(&end_center).unwrap_or(start_yaw);
    // Prefer walking backward over spinning more than a quarter turn in one
    // step.
    if wrap_angle(end_yaw - start_yaw).abs() > FRAC_PI_2 {
        end_yaw = wrap_angle(end_yaw + PI);
    }

    NominalStep {
        translation,
        end_center,
        end_yaw,
    }
}

/// Where the moving foot would land on the nominal step, snapped to the
/// position grid.
pub fn nominal_end_foothold(
    start: &FootstepNode,
    moving_leg: Leg,
    gait: &GaitSettings,
    provider: &dyn HeadingProvider,
) -> Point2<f64> {
    let nominal = nominal_step(start, moving_leg, gait, provider);
    let foot = nominal.end_center
        + Rotation2::new(nominal.end_yaw) * gait.nominal_foothold_offset(moving_leg);
    let res = start.resolution();
    Point2::new(snap_to_grid(foot.x, res), snap_to_grid(foot.y, res))
}

/// Transition cost from `start` to `end`, used as the search edge weight.
///
/// The position term decomposes the end-center error against the line from
/// the start center to the nominal end center, charging drift perpendicular
/// to the desired travel line harder than error along it; with no nominal
/// translation it collapses to plain point distance. The rotation term is
/// the yaw error expressed as arc length at the stance arm radius.
/// Always finite and non-negative.
pub fn step_cost(
    start: &FootstepNode,
    end: &FootstepNode,
    gait: &GaitSettings,
    weights: &CostWeights,
    provider: &dyn HeadingProvider,
) -> f64 {
    let nominal = nominal_step(start, end.moving_leg(), gait, provider);

    let actual_center = end.stance_center(gait.morphology);
    let delta = actual_center - nominal.end_center;

    let position_cost = if nominal.translation.norm() > DIRECTION_EPS {
        let along_dir = nominal.translation.normalize();
        let along = delta.dot(&along_dir).abs();
        let perpendicular = (delta.x * (-along_dir.y) + delta.y * along_dir.x).abs();
        weights.along_weight * along + weights.perpendicular_weight * perpendicular
    } else {
        weights.perpendicular_weight * delta.norm()
    };

    let actual_yaw = end.nominal_yaw(gait.morphology);
    let yaw_error = wrap_angle(actual_yaw - nominal.end_yaw);
    let yaw_cost =
        weights.yaw_weight * 2.0 * gait.arm_length() * (0.5 * yaw_error.abs()).sin();

    position_cost + yaw_cost
}

// ---------------------------------------------------------------------------
// Biped footstep scorer
// ---------------------------------------------------------------------------

/// Full 3D footstep pose used by the biped scorer.
#[derive(Clone, Copy, Debug)]
pub struct Footstep {
    pub position: Point3<f64>,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Footstep {
    pub fn new(position: Point3<f64>, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            position,
            yaw,
            pitch,
            roll,
        }
    }

    /// Flat-ground footstep with only a yaw.
    pub fn planar(x: f64, y: f64, yaw: f64) -> Self {
        Self::new(Point3::new(x, y, 0.0), yaw, 0.0, 0.0)
    }

    fn forward_axis(&self) -> Vector2<f64> {
        Vector2::new(self.yaw.cos(), self.yaw.sin())
    }
}

/// Rate `candidate` against `ideal` for a biped step toward `goal`.
///
/// Each directional displacement (forward, backward, upward, downward) is
/// clipped to be non-negative before weighting, so motion *away* from a
/// penalized direction never earns a reward through that term. The goal
/// term is the signed progress of the candidate along the ideal-to-goal
/// direction. Higher scores are better with the default weights.
pub fn score(
    ideal: &Footstep,
    candidate: &Footstep,
    goal: &Point2<f64>,
    weights: &ScorerWeights,
) -> f64 {
    let displacement = candidate.position - ideal.position;
    let planar = Vector2::new(displacement.x, displacement.y);
    let forward_axis = ideal.forward_axis();

    let forward = planar.dot(&forward_axis).max(0.0);
    let backward = (-planar.dot(&forward_axis)).max(0.0);
    let upward = displacement.z.max(0.0);
    let downward = (-displacement.z).max(0.0);

    let angular = (wrap_angle(candidate.yaw - ideal.yaw).powi(2)
        + wrap_angle(candidate.pitch - ideal.pitch).powi(2)
        + wrap_angle(candidate.roll - ideal.roll).powi(2))
    .sqrt();

    let to_goal = goal - Point2::new(ideal.position.x, ideal.position.y);
    let goal_progress = if to_goal.norm() > DIRECTION_EPS {
        planar.dot(&to_goal.normalize())
    } else {
        0.0
    };

    weights.forward * forward
        + weights.backward * backward
        + weights.upward * upward
        + weights.downward * downward
        + weights.angular * angular
        + weights.goal_progress * goal_progress
}
