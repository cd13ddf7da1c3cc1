//! Rigid 2D motions used to adjust foothold polygons.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::polygon::ConvexPolygon;

/// Rigid planar motion: rotate by `rotation` about a given center, then
/// translate by `translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidMotion2 {
    pub translation: Vector2<f64>,
    pub rotation: f64,
}

impl RigidMotion2 {
    pub fn new(translation: Vector2<f64>, rotation: f64) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector2::zeros(), 0.0)
    }

    /// All components finite. Results containing NaN or infinity must never
    /// be handed to callers; they are mapped to failure upstream.
    pub fn is_finite(&self) -> bool {
        self.translation.x.is_finite() && self.translation.y.is_finite() && self.rotation.is_finite()
    }

    /// Magnitude of the motion, with the rotation expressed as arc length at
    /// radius `arm`.
    pub fn magnitude(&self, arm: f64) -> f64 {
        self.translation.norm() + arm * self.rotation.abs()
    }

    /// Apply to a single point, rotating about `center`.
    pub fn apply_point(&self, point: &Point2<f64>, center: &Point2<f64>) -> Point2<f64> {
        let rot = Rotation2::new(self.rotation);
        center + rot * (point - center) + self.translation
    }

    /// Apply to a polygon, rotating about `center`.
    pub fn apply_about(&self, polygon: &ConvexPolygon, center: &Point2<f64>) -> ConvexPolygon {
        polygon
            .rotated_about(self.rotation, center)
            .translated(&self.translation)
    }

    /// Apply to a polygon, rotating about its own centroid.
    pub fn apply(&self, polygon: &ConvexPolygon) -> ConvexPolygon {
        self.apply_about(polygon, &polygon.centroid())
    }
}
