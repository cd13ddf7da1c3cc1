//! Discretized multi-leg stance nodes.
//!
//! Nodes are immutable: leg positions are snapped to the grid at
//! construction and never change afterwards. Nominal yaw and stance center
//! are derived from the leg positions on demand rather than stored, so they
//! can never go stale on a copied node.

use std::hash::{Hash, Hasher};

use nalgebra::Point2;

use strider_core::math::{snap_to_grid, wrap_angle};
use strider_core::types::{Leg, Morphology, Stance};

/// One state of the footstep search: all leg positions plus the leg that
/// most recently moved.
///
/// Equality and hashing use quantized integer grid cells and the moving leg
/// only, so two nodes whose floating-point coordinates round to the same
/// cells compare equal. The search driver relies on this for visited-state
/// deduplication.
#[derive(Clone, Debug)]
pub struct FootstepNode {
    positions: Vec<Point2<f64>>,
    moving_leg: Leg,
    resolution: f64,
}

impl FootstepNode {
    /// Build a node, snapping every coordinate to the grid.
    pub fn new(positions: Vec<Point2<f64>>, moving_leg: Leg, resolution: f64) -> Self {
        debug_assert!(resolution > 0.0);
        let positions = positions
            .into_iter()
            .map(|p| Point2::new(snap_to_grid(p.x, resolution), snap_to_grid(p.y, resolution)))
            .collect();
        Self {
            positions,
            moving_leg,
            resolution,
        }
    }

    /// Build from a stance, treating `moving_leg` as the most recent mover.
    pub fn from_stance(stance: &Stance, moving_leg: Leg, resolution: f64) -> Self {
        Self::new(stance.positions().to_vec(), moving_leg, resolution)
    }

    pub fn position(&self, leg: Leg) -> Point2<f64> {
        self.positions[leg.index()]
    }

    pub fn positions(&self) -> &[Point2<f64>] {
        &self.positions
    }

    pub fn moving_leg(&self) -> Leg {
        self.moving_leg
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn leg_count(&self) -> usize {
        self.positions.len()
    }

    /// Integer grid cell of a leg.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell(&self, leg: Leg) -> (i64, i64) {
        let p = self.positions[leg.index()];
        (
            (p.x / self.resolution).round() as i64,
            (p.y / self.resolution).round() as i64,
        )
    }

    /// Successor node with one leg moved; the new position is snapped.
    pub fn with_moved_leg(&self, leg: Leg, position: Point2<f64>) -> Self {
        let mut positions = self.positions.clone();
        positions[leg.index()] = Point2::new(
            snap_to_grid(position.x, self.resolution),
            snap_to_grid(position.y, self.resolution),
        );
        Self {
            positions,
            moving_leg: leg,
            resolution: self.resolution,
        }
    }

    /// Orientation implied by the reference legs: for bipeds, perpendicular
    /// to the left-to-right hip line; for quadrupeds, the direction from the
    /// hind-pair midpoint to the front-pair midpoint.
    pub fn nominal_yaw(&self, morphology: Morphology) -> f64 {
        match morphology {
            Morphology::Biped => {
                let v = self.position(Leg::RIGHT) - self.position(Leg::LEFT);
                if v.norm() < 1e-12 {
                    return 0.0;
                }
                wrap_angle(v.y.atan2(v.x) + std::f64::consts::FRAC_PI_2)
            }
            Morphology::Quadruped => {
                let v = self.front_midpoint() - self.hind_midpoint();
                if v.norm() < 1e-12 {
                    return 0.0;
                }
                v.y.atan2(v.x)
            }
        }
    }

    /// Midpoint of the reference legs (hip midpoint for bipeds, midpoint of
    /// the front/hind pair midpoints for quadrupeds).
    pub fn stance_center(&self, morphology: Morphology) -> Point2<f64> {
        match morphology {
            Morphology::Biped => midpoint(
                self.position(Leg::LEFT),
                self.position(Leg::RIGHT),
            ),
            Morphology::Quadruped => midpoint(self.front_midpoint(), self.hind_midpoint()),
        }
    }

    fn front_midpoint(&self) -> Point2<f64> {
        midpoint(
            self.position(Leg::FRONT_LEFT),
            self.position(Leg::FRONT_RIGHT),
        )
    }

    fn hind_midpoint(&self) -> Point2<f64> {
        midpoint(
            self.position(Leg::HIND_LEFT),
            self.position(Leg::HIND_RIGHT),
        )
    }
}

pub(crate) fn midpoint(a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    Point2::new(0.5 * (a.x + b.x), 0.5 * (a.y + b.y))
}

impl PartialEq for FootstepNode {
    fn eq(&self, other: &Self) -> bool {
        if self.moving_leg != other.moving_leg || self.positions.len() != other.positions.len() {
            return false;
        }
        let count = self.positions.len() as u8;
        (0..count)
            .map(Leg::new)
            .all(|leg| self.cell(leg) == other.cell(leg))
    }
}

impl Eq for FootstepNode {}

impl Hash for FootstepNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.moving_leg.hash(state);
        let count = self.positions.len() as u8;
        for leg in (0..count).map(Leg::new) {
            self.cell(leg).hash(state);
        }
    }
}
