//! Convex polygon kernel for terrain-constrained foothold placement.
//!
//! Everything in this crate is pure and stateless: polygons are validated at
//! construction (degenerate inputs are unrepresentable afterwards), and all
//! operations return new values.

pub mod error;
pub mod motion;
pub mod polygon;
pub mod region;

pub use error::GeometryError;
pub use motion::RigidMotion2;
pub use polygon::{ConvexPolygon, HalfPlane};
pub use region::PlanarRegion;
