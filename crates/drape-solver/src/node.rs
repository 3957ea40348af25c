//! Point masses of the spring network.

use drape_types::{Scalar, Vec3};
use serde::{Deserialize, Serialize};

/// One mesh vertex as a simulated particle.
///
/// `position`, `velocity`, and `force` are the mutable state the driver
/// works on every sub-step. Mass, damping, and the fixed flag are set at
/// construction and never change during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Force accumulator. Zeroed by the driver at the start of each sub-step.
    pub force: Vec3,
    mass: Scalar,
    damping: Scalar,
    fixed: bool,
}

impl Node {
    /// Creates a node at rest.
    pub fn new(position: Vec3, mass: Scalar, damping: Scalar, fixed: bool) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
            damping,
            fixed,
        }
    }

    #[inline]
    pub fn mass(&self) -> Scalar {
        self.mass
    }

    #[inline]
    pub fn damping(&self) -> Scalar {
        self.damping
    }

    /// Fixed nodes are pinned anchors: integration never moves them.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    #[inline]
    pub fn reset_force(&mut self) {
        self.force = Vec3::ZERO;
    }

    /// Adds this node's own contributions: weight and viscous drag.
    ///
    /// `force += m·g − c·v`
    #[inline]
    pub fn compute_forces(&mut self, gravity: Vec3) {
        self.force += self.mass * gravity - self.damping * self.velocity;
    }

    /// Kinetic energy `0.5 * m * |v|²`.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass as f64 * self.velocity.length_squared() as f64
    }
}
