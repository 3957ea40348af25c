//! Time integration of node state over one sub-step.
//!
//! Both schemes read the force accumulated earlier in the sub-step and
//! differ only in update order: explicit Euler moves the node with the
//! velocity it had at the start of the step, symplectic Euler moves it
//! with the velocity it has just been given.

use std::fmt;
use std::str::FromStr;

use drape_types::{DrapeError, Scalar};
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Integration scheme, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationMethod {
    /// `x += h·v`, then `v += h·a`.
    Explicit,
    /// `v += h·a`, then `x += h·v`. Semi-implicit Euler.
    #[default]
    Symplectic,
}

impl IntegrationMethod {
    /// Every accepted method, for CLI help and error messages.
    pub fn all() -> &'static [IntegrationMethod] {
        &[IntegrationMethod::Explicit, IntegrationMethod::Symplectic]
    }

    /// Lowercase name, as written in config files.
    pub fn name(self) -> &'static str {
        match self {
            IntegrationMethod::Explicit => "explicit",
            IntegrationMethod::Symplectic => "symplectic",
        }
    }

    /// Advances a single node by `h`. Fixed nodes are left untouched.
    #[inline]
    pub fn advance(self, node: &mut Node, h: Scalar) {
        if node.is_fixed() {
            return;
        }
        let acceleration = node.force / node.mass();
        match self {
            IntegrationMethod::Explicit => {
                node.position += h * node.velocity;
                node.velocity += h * acceleration;
            }
            IntegrationMethod::Symplectic => {
                node.velocity += h * acceleration;
                node.position += h * node.velocity;
            }
        }
    }

    /// Advances every node, in node order.
    pub fn integrate(self, nodes: &mut [Node], h: Scalar) {
        for node in nodes.iter_mut() {
            self.advance(node, h);
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegrationMethod {
    type Err = DrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explicit" => Ok(IntegrationMethod::Explicit),
            "symplectic" => Ok(IntegrationMethod::Symplectic),
            other => {
                let available: Vec<&str> = Self::all().iter().map(|m| m.name()).collect();
                Err(DrapeError::InvalidConfig(format!(
                    "Unknown integration method: '{other}'. Available: {}",
                    available.join(", ")
                )))
            }
        }
    }
}
