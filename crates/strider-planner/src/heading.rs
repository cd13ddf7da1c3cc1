//! Desired-velocity and heading providers.
//!
//! The cost evaluator never decides where the robot should go; it queries an
//! externally supplied provider for the desired travel direction and yaw at
//! a point. Body-path planners implement this trait; two simple
//! implementations are included for drivers and tests.

use nalgebra::{Point2, Unit, Vector2};

/// Source of the desired travel direction and facing at a point, typically
/// backed by a body-path plan.
pub trait HeadingProvider {
    /// Desired unit travel direction at `point` in the world frame, or
    /// `None` where no travel is desired.
    fn nominal_heading(&self, point: &Point2<f64>) -> Option<Unit<Vector2<f64>>>;

    /// Desired facing at `point`, or `None` where the path does not
    /// constrain it.
    fn nominal_yaw(&self, point: &Point2<f64>) -> Option<f64>;
}

/// Fixed direction and facing everywhere.
#[derive(Clone, Copy, Debug)]
pub struct ConstantHeading {
    heading: Option<Unit<Vector2<f64>>>,
    yaw: Option<f64>,
}

impl ConstantHeading {
    /// Travel along `direction`, facing along it. A (near-)zero direction
    /// means "hold position": no heading, no yaw preference.
    pub fn new(direction: Vector2<f64>) -> Self {
        let heading = Unit::try_new(direction, 1e-12);
        let yaw = heading.map(|h| h.y.atan2(h.x));
        Self { heading, yaw }
    }

    /// Travel along `direction` while facing `yaw` (crab-walking allowed).
    pub fn with_yaw(direction: Vector2<f64>, yaw: f64) -> Self {
        Self {
            heading: Unit::try_new(direction, 1e-12),
            yaw: Some(yaw),
        }
    }

    /// Hold position: no heading, no yaw preference.
    pub fn stationary() -> Self {
        Self {
            heading: None,
            yaw: None,
        }
    }
}

impl HeadingProvider for ConstantHeading {
    fn nominal_heading(&self, _point: &Point2<f64>) -> Option<Unit<Vector2<f64>>> {
        self.heading
    }

    fn nominal_yaw(&self, _point: &Point2<f64>) -> Option<f64> {
        self.yaw
    }
}

/// Heads straight at a goal point from anywhere, facing the goal.
#[derive(Clone, Copy, Debug)]
pub struct GoalHeading {
    goal: Point2<f64>,
}

impl GoalHeading {
    pub fn new(goal: Point2<f64>) -> Self {
        Self { goal }
    }
}

impl HeadingProvider for GoalHeading {
    fn nominal_heading(&self, point: &Point2<f64>) -> Option<Unit<Vector2<f64>>> {
        Unit::try_new(self.goal - point, 1e-9)
    }

    fn nominal_yaw(&self, point: &Point2<f64>) -> Option<f64> {
        let d = self.goal - point;
        if d.norm() < 1e-9 {
            None
        } else {
            Some(d.y.atan2(d.x))
        }
    }
}
