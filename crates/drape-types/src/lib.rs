//! # drape-types
//!
//! Shared types, handles, error types, and physical constants
//! for the Drape mass-spring cloth simulator.
//!
//! This crate has zero domain logic. It defines the vocabulary
//! that all other Drape crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{DrapeError, DrapeResult};
pub use ids::{NodeId, SpringId};
pub use scalar::Scalar;

// glam is the canonical vector type for every Drape crate.
pub use glam::Vec3;
