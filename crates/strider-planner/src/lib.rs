//! Footstep-candidate generation and terrain-constrained foothold placement
//! for legged robots.
//!
//! This crate is the engine an outer graph-search driver calls per frontier
//! node:
//!
//! 1. **Node Expansion** — legal successor stances (one leg moves at a time)
//!    respecting reach and inter-leg clearance
//! 2. **Step Cost Evaluator** — gait-tracking edge weights against a desired
//!    velocity/heading, plus a biped footstep scorer
//! 3. **Foothold Wiggle Solver** — a small-angle-linearized QP that fits a
//!    foot polygon inside a convex terrain patch
//!
//! # Architecture
//!
//! Every public operation is a pure, reentrant function over immutable
//! inputs: nodes are immutable value types, parameter structs are read-only
//! snapshots, and nothing here retains cross-call state. The search driver
//! may therefore expand, cost, and wiggle many frontier nodes in parallel
//! with no locking beyond its own frontier structure. The frontier policy
//! itself (ordering, termination, retries) lives in the driver, not here.

pub mod cost;
pub mod expansion;
pub mod heading;
pub mod node;
pub mod qp;
pub mod wiggle;

pub use cost::{nominal_end_foothold, nominal_step, score, step_cost, Footstep, NominalStep};
pub use expansion::{expand, expand_toward};
pub use heading::{ConstantHeading, GoalHeading, HeadingProvider};
pub use node::FootstepNode;
pub use qp::{solve_dense_qp, QpOutcome};
pub use wiggle::{wiggle, wiggle_into_region, WiggleResult};
