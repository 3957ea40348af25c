//! Simulation event types.
//!
//! Structured events emitted by the simulation driver once per tick.
//! Events are lightweight value types that carry just enough data to be
//! useful for monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the driver.
///
/// Events are tagged with the tick index and carry domain-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick number (0-indexed).
    pub tick: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Spring network was built from a mesh.
    TopologyBuilt {
        nodes: usize,
        traction_springs: usize,
        bending_springs: usize,
        non_manifold_edges: usize,
    },

    /// Tick completed.
    TickEnd {
        /// Sub-steps executed in this tick.
        substeps: u32,
        /// Simulation time after the tick (seconds).
        sim_time: f64,
        /// Wall-clock time for the whole tick (seconds).
        wall_time: f64,
    },

    /// Energy snapshot after a tick.
    Energy {
        /// Kinetic energy (0.5 * m * v^2).
        kinetic: f64,
        /// Elastic energy stored in springs (0.5 * k * dx^2).
        elastic: f64,
    },

    /// The pause flag changed.
    PauseChanged { paused: bool },
}

impl SimulationEvent {
    /// Creates a new event for the given tick.
    pub fn new(tick: u64, kind: EventKind) -> Self {
        Self { tick, kind }
    }
}
