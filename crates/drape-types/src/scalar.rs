//! Scalar type alias for the simulation.

/// The floating-point type used throughout the simulation.
///
/// Matches the component type of [`glam::Vec3`], so positions, forces,
/// and material parameters all share one precision.
pub type Scalar = f32;
