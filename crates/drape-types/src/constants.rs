//! Physical constants and simulation defaults.

use crate::Scalar;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Scalar = 9.81;

/// Default duration of one simulation tick (seconds). 1/50th of a second,
/// the usual fixed-update cadence of a host engine.
pub const DEFAULT_TIME_STEP: Scalar = 0.02;

/// Default number of integration sub-steps per tick.
pub const DEFAULT_SUBSTEPS: u32 = 10;

/// Default point mass per node (kg).
pub const DEFAULT_NODE_MASS: Scalar = 1.0;

/// Default stiffness of traction (edge) springs (N/m).
pub const DEFAULT_TRACTION_STIFFNESS: Scalar = 500.0;

/// Default stiffness of bending (cross-edge) springs (N/m).
pub const DEFAULT_BENDING_STIFFNESS: Scalar = 50.0;

/// Default damping coefficient shared by nodes and springs (N·s/m).
pub const DEFAULT_DAMPING: Scalar = 0.5;

/// Lengths below this are treated as coincident endpoints.
pub const EPSILON: Scalar = 1.0e-7;
