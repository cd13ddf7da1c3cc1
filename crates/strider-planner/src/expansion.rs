//! Successor generation for the footstep search.
//!
//! `expand` is a pure function of its inputs: it never mutates shared state,
//! so the search driver may expand many frontier nodes concurrently. The
//! returned successors carry no meaningful order; drivers must treat the
//! result as a set.

use log::debug;
use nalgebra::{Point2, Rotation2, Vector2};

use strider_core::config::{GaitSettings, PlannerParameters};
use strider_core::types::{Leg, Stance};

use crate::node::{midpoint, FootstepNode};

const REACH_EPS: f64 = 1e-9;

/// All legal successor nodes of `node`: the next leg in the gait sequence
/// moved to every candidate offset that respects reach and inter-leg
/// clearance. An empty result is valid (fully boxed-in stance).
pub fn expand(
    node: &FootstepNode,
    params: &PlannerParameters,
    gait: &GaitSettings,
) -> Vec<FootstepNode> {
    expand_toward(node, params, gait, None)
}

/// Like [`expand`], but additionally unions the goal stance's position for
/// the moving leg into the successor set when it is within reach and
/// clearance bounds, even if it falls off the candidate offset grid. This
/// keeps the goal reachable once the search gets close.
pub fn expand_toward(
    node: &FootstepNode,
    params: &PlannerParameters,
    gait: &GaitSettings,
    goal: Option<&Stance>,
) -> Vec<FootstepNode> {
    let sequence = gait.step_sequence();
    let moving = sequence.next(node.moving_leg());
    let yaw = node.nominal_yaw(gait.morphology);
    let rotation = Rotation2::new(yaw);

    // Nominal target: midpoint of the sequence-adjacent legs, pushed out by
    // the moving leg's half-stance offset in the stance frame.
    let adjacent_mid = midpoint(
        node.position(sequence.previous(moving)),
        node.position(sequence.next(moving)),
    );
    let nominal = adjacent_mid + rotation * gait.nominal_foothold_offset(moving);

    let before = node.position(moving);
    let lateral_sign = gait.morphology.lateral_sign(moving);
    let res = params.grid_resolution;

    let mut successors = Vec::new();
    let mut considered = 0usize;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let x_steps = ((params.max_step_reach - params.min_step_length) / res + REACH_EPS)
        .floor() as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let y_steps =
        ((params.max_step_width - params.min_step_width) / res + REACH_EPS).floor() as usize;

    for xi in 0..=x_steps {
        let x = params.min_step_length + xi as f64 * res;
        for yi in 0..=y_steps {
            let y = params.min_step_width + yi as f64 * res;
            considered += 1;

            let offset = rotation * Vector2::new(x, lateral_sign * y);
            let candidate = nominal + offset;
            if let Some(successor) = admit(node, moving, candidate, before, yaw, params) {
                successors.push(successor);
            }
        }
    }

    if let Some(goal) = goal {
        if goal.leg_count() == node.leg_count() {
            let target = goal.position(moving);
            if let Some(successor) = admit(node, moving, target, before, yaw, params) {
                if !successors.contains(&successor) {
                    successors.push(successor);
                }
            }
        }
    }

    debug!(
        "expand: leg {} -> {} of {} candidates admitted",
        gait.morphology.leg_name(moving),
        successors.len(),
        considered
    );

    successors
}

/// Snap a candidate, apply the reach and clearance filters, and pack the
/// surviving position into a successor node. `None` means filtered, which is
/// normal control flow rather than an error.
fn admit(
    node: &FootstepNode,
    moving: Leg,
    candidate: Point2<f64>,
    before: Point2<f64>,
    yaw: f64,
    params: &PlannerParameters,
) -> Option<FootstepNode> {
    let successor = node.with_moved_leg(moving, candidate);
    let placed = successor.position(moving);

    if (placed - before).norm() > params.max_step_reach + REACH_EPS {
        return None;
    }
    if clearance_conflict(node, moving, placed, yaw, params) {
        return None;
    }
    Some(successor)
}

/// True when the moving leg's inflated clearance box would overlap the
/// clearance box of any stationary leg. Boxes are axis-aligned in the
/// stance frame, so all positions are rotated into that frame first.
fn clearance_conflict(
    node: &FootstepNode,
    moving: Leg,
    candidate: Point2<f64>,
    yaw: f64,
    params: &PlannerParameters,
) -> bool {
    let into_local = Rotation2::new(-yaw);
    let half = params.clearance_half_extents();
    let candidate_local = into_local * candidate.coords;

    let count = node.leg_count() as u8;
    for leg in (0..count).map(Leg::new) {
        if leg == moving {
            continue;
        }
        let other_local = into_local * node.position(leg).coords;
        let dx = (candidate_local.x - other_local.x).abs();
        let dy = (candidate_local.y - other_local.y).abs();
        if dx < 2.0 * half.x - REACH_EPS && dy < 2.0 * half.y - REACH_EPS {
            return true;
        }
    }
    false
}
