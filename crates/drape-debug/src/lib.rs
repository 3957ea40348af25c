//! # drape-debug
//!
//! State snapshots for debugging simulation issues. A snapshot captures
//! node positions and velocities plus the simulation clock, serializes to
//! a compact binary form, and can be restored into a running simulation
//! for deterministic replay.

pub mod snapshot;

pub use snapshot::StateSnapshot;
