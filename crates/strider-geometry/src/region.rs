//! Planar terrain regions.
//!
//! A region is a set of convex polygons sharing one rigid transform to the
//! world frame. Obstacles make regions multiply-connected, hence zero or
//! more polygons rather than exactly one.

use nalgebra::{Isometry2, Point2};

use crate::polygon::ConvexPolygon;

/// One walkable terrain patch.
#[derive(Clone, Debug)]
pub struct PlanarRegion {
    transform_to_world: Isometry2<f64>,
    polygons: Vec<ConvexPolygon>,
}

impl PlanarRegion {
    pub fn new(transform_to_world: Isometry2<f64>, polygons: Vec<ConvexPolygon>) -> Self {
        Self {
            transform_to_world,
            polygons,
        }
    }

    /// Region with identity transform, for terrain already expressed in world
    /// coordinates.
    pub fn in_world_frame(polygons: Vec<ConvexPolygon>) -> Self {
        Self::new(Isometry2::identity(), polygons)
    }

    pub fn transform_to_world(&self) -> &Isometry2<f64> {
        &self.transform_to_world
    }

    pub fn polygons(&self) -> &[ConvexPolygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Membership test for a point in the region's own frame.
    pub fn contains_local(&self, point: &Point2<f64>) -> bool {
        self.polygons.iter().any(|p| p.contains(point))
    }

    /// Membership test for a world-frame point.
    pub fn contains_world(&self, point: &Point2<f64>) -> bool {
        let local = self.transform_to_world.inverse_transform_point(point);
        self.contains_local(&local)
    }

    /// Index and overlap area of the sub-polygon with the greatest overlap
    /// with `foot` (in the region frame). `None` when nothing overlaps.
    pub fn best_overlap(&self, foot: &ConvexPolygon) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, polygon) in self.polygons.iter().enumerate() {
            let area = polygon.overlap_area(foot);
            if area > 0.0 && best.map_or(true, |(_, b)| area > b) {
                best = Some((i, area));
            }
        }
        best
    }

    /// The sub-polygon with the greatest overlap with `foot`, if any overlaps.
    pub fn best_overlap_polygon(&self, foot: &ConvexPolygon) -> Option<&ConvexPolygon> {
        self.best_overlap(foot).map(|(i, _)| &self.polygons[i])
    }
}
