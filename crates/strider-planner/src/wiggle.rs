//! Foothold wiggle: fit a foot polygon inside a terrain polygon.
//!
//! The fit is a 3-variable QP over `(tx, ty, theta)` with the rotation
//! linearized about the foot centroid: a vertex `p` maps to approximately
//! `p + (tx - theta * (p.y - c.y), ty + theta * (p.x - c.x))`. The
//! linearization is only valid for small `theta`; callers must pass tight
//! yaw bounds (the default is a few degrees). This is a designed
//! approximation, not a general SE(2) fit.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector, Vector2};

use strider_core::config::WiggleConfig;
use strider_geometry::{ConvexPolygon, PlanarRegion, RigidMotion2};

use crate::qp::{solve_dense_qp, QpOutcome};

/// Result of a wiggle: a rigid adjustment or an explicit failure.
///
/// Infeasibility is a value, not an error, so drivers can fall back to an
/// alternate terrain sub-polygon or drop the candidate. A returned motion
/// never contains non-finite components.
#[derive(Clone, Copy, Debug)]
pub enum WiggleResult {
    /// Rotate the foot about its own centroid by `rotation`, then translate.
    Fit(RigidMotion2),
    /// No transform satisfies the constraints.
    Infeasible,
}

impl WiggleResult {
    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible)
    }

    pub fn motion(&self) -> Option<&RigidMotion2> {
        match self {
            Self::Fit(motion) => Some(motion),
            Self::Infeasible => None,
        }
    }
}

/// Find the smallest rigid adjustment placing every vertex of `foot` inside
/// `terrain`, with the rotation bounded to `[min_yaw, max_yaw]`.
///
/// The objective `tx^2 + ty^2 + gamma * theta^2` (gamma < 1) prefers
/// translating a foot into the region over rotating it. Callers working
/// with multi-polygon regions should use [`wiggle_into_region`], which
/// performs best-overlap sub-polygon selection first.
pub fn wiggle(
    foot: &ConvexPolygon,
    terrain: &ConvexPolygon,
    min_yaw: f64,
    max_yaw: f64,
    config: &WiggleConfig,
) -> WiggleResult {
    let centroid = foot.centroid();
    let planes = terrain.half_planes();
    let vertices = foot.vertices();

    // One row per (vertex, terrain edge) pair, plus the two yaw bounds.
    let n_rows = vertices.len() * planes.len() + 2;
    let mut a = DMatrix::zeros(n_rows, 3);
    let mut b = DVector::zeros(n_rows);

    let mut row = 0;
    for vertex in vertices {
        let radius = vertex - centroid;
        // d/dtheta of the rotated vertex, at theta = 0.
        let tangent = Vector2::new(-radius.y, radius.x);
        for plane in &planes {
            a[(row, 0)] = plane.normal.x;
            a[(row, 1)] = plane.normal.y;
            a[(row, 2)] = plane.normal.dot(&tangent);
            b[row] = plane.slack(vertex);
            row += 1;
        }
    }

    a[(row, 2)] = 1.0;
    b[row] = max_yaw;
    row += 1;
    a[(row, 2)] = -1.0;
    b[row] = -min_yaw;

    let mut p = DMatrix::zeros(3, 3);
    p[(0, 0)] = 2.0;
    p[(1, 1)] = 2.0;
    p[(2, 2)] = 2.0 * config.rotation_weight;
    let q = DVector::zeros(3);

    debug!(
        "wiggle: {} vertices x {} edges -> {} constraint rows",
        vertices.len(),
        planes.len(),
        n_rows
    );

    let outcome = solve_dense_qp(
        &p,
        &q,
        &DMatrix::zeros(0, 3),
        &DVector::zeros(0),
        &a,
        &b,
        config.max_solver_iterations,
    );

    match outcome {
        QpOutcome::Solved(x) => {
            let motion = RigidMotion2::new(Vector2::new(x[0], x[1]), x[2]);
            if motion.is_finite() {
                WiggleResult::Fit(motion)
            } else {
                WiggleResult::Infeasible
            }
        }
        QpOutcome::Infeasible => WiggleResult::Infeasible,
        QpOutcome::NumericalError => {
            warn!("wiggle: QP solver reported a numerical error; treating as infeasible");
            WiggleResult::Infeasible
        }
    }
}

/// Wiggle a foot into the best-overlapping sub-polygon of a region.
///
/// The foot must be expressed in the region frame. When no sub-polygon
/// overlaps the foot at all, the placement is infeasible without solving.
pub fn wiggle_into_region(
    foot: &ConvexPolygon,
    region: &PlanarRegion,
    min_yaw: f64,
    max_yaw: f64,
    config: &WiggleConfig,
) -> WiggleResult {
    match region.best_overlap_polygon(foot) {
        Some(terrain) => wiggle(foot, terrain, min_yaw, max_yaw, config),
        None => WiggleResult::Infeasible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    const YAW_BOUND: f64 = 0.1;

    fn square(center: (f64, f64), half: f64) -> ConvexPolygon {
        ConvexPolygon::rectangle(Point2::new(center.0, center.1), half, half).unwrap()
    }

    #[test]
    fn foot_already_inside_needs_no_motion() {
        let foot = square((0.0, 0.0), 0.1);
        let terrain = square((0.0, 0.0), 0.5);
        let config = WiggleConfig::default();
        let result = wiggle(&foot, &terrain, -YAW_BOUND, YAW_BOUND, &config);
        let motion = result.motion().expect("feasible");
        assert_relative_eq!(motion.translation.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(motion.translation.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(motion.rotation, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn translation_only_case_recovers_offset() {
        // Identical squares, terrain shifted by (0.3, 0): with yaw pinned to
        // zero the unique feasible optimum is the pure translation.
        let foot = square((0.0, 0.0), 0.1);
        let terrain = square((0.3, 0.0), 0.1);
        let config = WiggleConfig::default();
        let result = wiggle(&foot, &terrain, 0.0, 0.0, &config);
        let motion = result.motion().expect("feasible");
        assert_relative_eq!(motion.translation.x, 0.3, epsilon = 1e-4);
        assert_relative_eq!(motion.translation.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(motion.rotation, 0.0, epsilon = 1e-6);
    }

    /// Every vertex satisfies every terrain half-plane up to solver tolerance.
    fn assert_inside(foot: &ConvexPolygon, terrain: &ConvexPolygon) {
        for v in foot.vertices() {
            for plane in terrain.half_planes() {
                assert!(
                    plane.slack(v) >= -1e-6,
                    "vertex {v:?} violates a terrain half-plane by {}",
                    -plane.slack(v)
                );
            }
        }
    }

    #[test]
    fn adjusted_foot_lies_inside_terrain() {
        let foot = square((0.45, 0.1), 0.1);
        let terrain = square((0.0, 0.0), 0.5);
        let config = WiggleConfig::default();
        let result = wiggle(&foot, &terrain, -YAW_BOUND, YAW_BOUND, &config);
        let motion = result.motion().expect("feasible");
        assert_inside(&motion.apply(&foot), &terrain);
    }

    #[test]
    fn partial_overlap_translates_minimally() {
        // Foot pokes out of the terrain's right edge by 0.05.
        let foot = square((0.45, 0.0), 0.1);
        let terrain = square((0.0, 0.0), 0.5);
        let config = WiggleConfig::default();
        let result = wiggle(&foot, &terrain, 0.0, 0.0, &config);
        let motion = result.motion().expect("feasible");
        assert_relative_eq!(motion.translation.x, -0.05, epsilon = 1e-4);
        assert_relative_eq!(motion.translation.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn oversized_foot_is_infeasible() {
        // The square's corners stick out of a snug diamond slot on opposite
        // sides; no translation can fix both, and the linearized rotation
        // cancels on opposing corners, so the QP itself has no solution.
        let foot = square((0.0, 0.0), 0.1);
        let diamond = ConvexPolygon::new(vec![
            Point2::new(0.15, 0.0),
            Point2::new(0.0, 0.15),
            Point2::new(-0.15, 0.0),
            Point2::new(0.0, -0.15),
        ])
        .unwrap();
        let config = WiggleConfig::default();
        assert!(wiggle(&foot, &diamond, 0.0, 0.0, &config).is_infeasible());
        assert!(wiggle(&foot, &diamond, -YAW_BOUND, YAW_BOUND, &config).is_infeasible());
    }

    #[test]
    fn inverted_yaw_bounds_are_infeasible() {
        let foot = square((0.0, 0.0), 0.1);
        let terrain = square((0.0, 0.0), 0.5);
        let config = WiggleConfig::default();
        let result = wiggle(&foot, &terrain, 0.2, -0.2, &config);
        assert!(result.is_infeasible());
    }

    #[test]
    fn yaw_bounds_are_respected() {
        let foot = square((0.6, 0.0), 0.1);
        let terrain = square((0.0, 0.0), 0.5);
        let config = WiggleConfig::default();
        let result = wiggle(&foot, &terrain, -YAW_BOUND, YAW_BOUND, &config);
        let motion = result.motion().expect("feasible");
        assert!(motion.rotation >= -YAW_BOUND - 1e-6);
        assert!(motion.rotation <= YAW_BOUND + 1e-6);
    }

    #[test]
    fn disjoint_region_is_infeasible_without_solving() {
        let foot = square((5.0, 5.0), 0.1);
        let region = PlanarRegion::in_world_frame(vec![
            square((0.0, 0.0), 0.5),
            square((2.0, 0.0), 0.5),
        ]);
        let config = WiggleConfig::default();
        let result = wiggle_into_region(&foot, &region, -YAW_BOUND, YAW_BOUND, &config);
        assert!(result.is_infeasible());
    }

    #[test]
    fn region_selection_picks_best_overlap_patch() {
        // Foot straddles the gap but overlaps the right patch more; the
        // adjustment should pull it fully into the right patch.
        let left = square((0.0, 0.0), 0.5);
        let right = square((1.1, 0.0), 0.5);
        let region = PlanarRegion::in_world_frame(vec![left, right.clone()]);
        let foot = square((0.58, 0.0), 0.1);
        let config = WiggleConfig::default();
        let result = wiggle_into_region(&foot, &region, -YAW_BOUND, YAW_BOUND, &config);
        let motion = result.motion().expect("feasible");
        assert_inside(&motion.apply(&foot), &right);
    }

    #[test]
    fn empty_region_is_infeasible() {
        let foot = square((0.0, 0.0), 0.1);
        let region = PlanarRegion::in_world_frame(vec![]);
        let config = WiggleConfig::default();
        let result = wiggle_into_region(&foot, &region, -YAW_BOUND, YAW_BOUND, &config);
        assert!(result.is_infeasible());
    }
}
