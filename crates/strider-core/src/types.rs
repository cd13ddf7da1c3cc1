//! Leg identifiers, robot morphology, and gait sequencing tables.
//!
//! Legs are plain indices and the gait sequence is a data table of next-leg
//! lookups, so expansion code stays free of virtual dispatch.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Leg
// ---------------------------------------------------------------------------

/// Index of a leg within a stance.
///
/// The meaning of each index depends on the [`Morphology`]: bipeds use
/// `LEFT`/`RIGHT`, quadrupeds use the four `FRONT_*`/`HIND_*` constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg(u8);

impl Leg {
    /// Biped left leg.
    pub const LEFT: Self = Self(0);
    /// Biped right leg.
    pub const RIGHT: Self = Self(1);

    /// Quadruped front-left leg.
    pub const FRONT_LEFT: Self = Self(0);
    /// Quadruped front-right leg.
    pub const FRONT_RIGHT: Self = Self(1);
    /// Quadruped hind-left leg.
    pub const HIND_LEFT: Self = Self(2);
    /// Quadruped hind-right leg.
    pub const HIND_RIGHT: Self = Self(3);

    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Morphology
// ---------------------------------------------------------------------------

/// Robot leg layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Morphology {
    /// Two legs: left (0) and right (1).
    Biped,
    /// Four legs: front-left (0), front-right (1), hind-left (2), hind-right (3).
    Quadruped,
}

impl Morphology {
    pub const fn leg_count(self) -> usize {
        match self {
            Self::Biped => 2,
            Self::Quadruped => 4,
        }
    }

    /// All legs of this morphology, in index order.
    pub fn legs(self) -> impl Iterator<Item = Leg> {
        let count = self.leg_count() as u8;
        (0..count).map(Leg::new)
    }

    /// Sign of a leg's longitudinal (forward) half-stance offset:
    /// +1 for front legs, -1 for hind legs, 0 for bipeds (no front/hind axis).
    pub const fn longitudinal_sign(self, leg: Leg) -> f64 {
        match self {
            Self::Biped => 0.0,
            Self::Quadruped => {
                if leg.index() < 2 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Sign of a leg's lateral (leftward) half-stance offset:
    /// +1 for left-side legs, -1 for right-side legs.
    pub const fn lateral_sign(self, leg: Leg) -> f64 {
        if leg.index() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    pub const fn leg_name(self, leg: Leg) -> &'static str {
        match (self, leg.index()) {
            (Self::Biped, 0) => "left",
            (Self::Biped, 1) => "right",
            (Self::Quadruped, 0) => "front-left",
            (Self::Quadruped, 1) => "front-right",
            (Self::Quadruped, 2) => "hind-left",
            (Self::Quadruped, 3) => "hind-right",
            _ => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// StepSequence
// ---------------------------------------------------------------------------

/// Cyclic order in which legs are moved, stored as a next-leg lookup table.
///
/// The table is plain data: `next[i]` is the index of the leg that moves
/// after leg `i`. Every leg appears exactly once in the cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepSequence {
    next: Vec<u8>,
}

impl StepSequence {
    /// Left/right alternation for bipeds.
    pub fn biped_alternating() -> Self {
        Self { next: vec![1, 0] }
    }

    /// Crawl sequencing for quadrupeds: FL, HR, FR, HL.
    ///
    /// Each step keeps three feet planted; diagonally opposite legs move in
    /// consecutive phases.
    pub fn quadruped_crawl() -> Self {
        // next[FL]=HR, next[FR]=HL, next[HL]=FL, next[HR]=FR
        Self {
            next: vec![3, 2, 0, 1],
        }
    }

    /// Build from an explicit cyclic order of legs.
    ///
    /// Returns `None` unless `order` is a permutation of `0..order.len()`.
    pub fn from_cycle(order: &[Leg]) -> Option<Self> {
        let n = order.len();
        if n < 2 {
            return None;
        }
        let mut next = vec![u8::MAX; n];
        for (i, leg) in order.iter().enumerate() {
            let successor = order[(i + 1) % n];
            if leg.index() >= n || next[leg.index()] != u8::MAX {
                return None;
            }
            #[allow(clippy::cast_possible_truncation)]
            {
                next[leg.index()] = successor.index() as u8;
            }
        }
        Some(Self { next })
    }

    pub fn leg_count(&self) -> usize {
        self.next.len()
    }

    /// Leg that moves after `leg`. Total over all legs of the morphology.
    pub fn next(&self, leg: Leg) -> Leg {
        Leg::new(self.next[leg.index()])
    }

    /// Leg that moved before `leg` in the cycle.
    pub fn previous(&self, leg: Leg) -> Leg {
        let target = leg.index();
        for (i, &n) in self.next.iter().enumerate() {
            if n as usize == target {
                #[allow(clippy::cast_possible_truncation)]
                return Leg::new(i as u8);
            }
        }
        unreachable!("step sequence is a complete cycle");
    }
}

// ---------------------------------------------------------------------------
// Stance
// ---------------------------------------------------------------------------

/// Ground contact positions of all legs, indexed by leg.
#[derive(Clone, Debug, PartialEq)]
pub struct Stance {
    positions: Vec<Point2<f64>>,
}

impl Stance {
    pub fn new(positions: Vec<Point2<f64>>) -> Self {
        Self { positions }
    }

    pub fn position(&self, leg: Leg) -> Point2<f64> {
        self.positions[leg.index()]
    }

    pub fn positions(&self) -> &[Point2<f64>] {
        &self.positions
    }

    pub fn leg_count(&self) -> usize {
        self.positions.len()
    }
}
