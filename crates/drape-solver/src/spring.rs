//! Damped Hookean springs between two nodes.
//!
//! A spring stores node handles, never references, so the node arena in
//! [`SpringNetwork`](crate::network::SpringNetwork) stays the only owner
//! of particle state.

use drape_types::constants::EPSILON;
use drape_types::{NodeId, Scalar, Vec3};
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// What a spring models in the cloth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringKind {
    /// Lies along an original mesh edge; resists stretch and compression.
    Traction,
    /// Joins the two wing vertices across a shared edge; resists folding.
    Bending,
}

/// An elastic link between nodes `a` and `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    a: NodeId,
    b: NodeId,
    kind: SpringKind,
    stiffness: Scalar,
    damping: Scalar,
    rest_length: Scalar,
    current_length: Scalar,
}

impl Spring {
    /// Creates a spring whose rest length is the current endpoint distance.
    ///
    /// # Panics
    /// If either handle is outside `nodes`. The network builder validates
    /// indices before calling this.
    pub fn new(
        kind: SpringKind,
        a: NodeId,
        b: NodeId,
        stiffness: Scalar,
        damping: Scalar,
        nodes: &[Node],
    ) -> Self {
        let rest_length = nodes[a.index()].position.distance(nodes[b.index()].position);
        Self {
            a,
            b,
            kind,
            stiffness,
            damping,
            rest_length,
            current_length: rest_length,
        }
    }

    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    #[inline]
    pub fn kind(&self) -> SpringKind {
        self.kind
    }

    #[inline]
    pub fn stiffness(&self) -> Scalar {
        self.stiffness
    }

    #[inline]
    pub fn damping(&self) -> Scalar {
        self.damping
    }

    #[inline]
    pub fn rest_length(&self) -> Scalar {
        self.rest_length
    }

    #[inline]
    pub fn current_length(&self) -> Scalar {
        self.current_length
    }

    /// Adds the spring force to both endpoints and returns the force
    /// applied to `a` (the force on `b` is its exact negation).
    ///
    /// With `u` the unit vector from `a` to `b` and `L` their distance:
    /// `f_a = (k·(L − L₀) + c·((v_b − v_a)·u))·u`.
    /// Coincident endpoints have no direction, so the spring contributes
    /// nothing that sub-step.
    pub fn compute_forces(&self, nodes: &mut [Node]) -> Vec3 {
        let (ia, ib) = (self.a.index(), self.b.index());
        let delta = nodes[ib].position - nodes[ia].position;
        let length = delta.length();
        if length <= EPSILON {
            return Vec3::ZERO;
        }

        let dir = delta / length;
        let relative_velocity = nodes[ib].velocity - nodes[ia].velocity;
        let magnitude = self.stiffness * (length - self.rest_length)
            + self.damping * relative_velocity.dot(dir);
        let force = magnitude * dir;

        nodes[ia].force += force;
        nodes[ib].force -= force;
        force
    }

    /// Recomputes `current_length` from the endpoint positions.
    #[inline]
    pub fn update_length(&mut self, nodes: &[Node]) {
        self.current_length = nodes[self.a.index()]
            .position
            .distance(nodes[self.b.index()].position);
    }

    /// Relative elongation `(L − L₀) / L₀`; zero for a zero rest length.
    pub fn strain(&self) -> Scalar {
        if self.rest_length <= EPSILON {
            0.0
        } else {
            (self.current_length - self.rest_length) / self.rest_length
        }
    }

    /// Elastic energy `0.5 * k * (L − L₀)²` at the last refreshed length.
    pub fn elastic_energy(&self) -> f64 {
        let stretch = (self.current_length - self.rest_length) as f64;
        0.5 * self.stiffness as f64 * stretch * stretch
    }

    /// True if the endpoints coincided when the spring was created.
    pub fn is_degenerate(&self) -> bool {
        self.rest_length <= EPSILON
    }
}
