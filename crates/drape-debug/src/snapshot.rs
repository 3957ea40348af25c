//! State snapshot serialization for replay and debugging.

use drape_solver::{Simulation, SpringNetwork};
use drape_types::{DrapeError, DrapeResult, Vec3};
use serde::{Deserialize, Serialize};

/// Dynamic state of a simulation at one tick.
///
/// Serialized with `bincode`. Only the mutable node state is stored; the
/// topology is rebuilt from the mesh, so a snapshot can only be restored
/// into a network with the same node count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Completed ticks when this snapshot was taken.
    pub tick: u64,
    /// Simulation time in seconds.
    pub sim_time: f64,
    /// Node positions (flat: [x0, y0, z0, x1, y1, z1, ...]).
    pub positions: Vec<f32>,
    /// Node velocities (flat: [vx0, vy0, vz0, ...]).
    pub velocities: Vec<f32>,
    /// Number of nodes.
    pub node_count: usize,
}

impl StateSnapshot {
    /// Captures the node state of a network.
    pub fn from_network(tick: u64, sim_time: f64, network: &SpringNetwork) -> Self {
        let n = network.node_count();
        let mut positions = Vec::with_capacity(n * 3);
        let mut velocities = Vec::with_capacity(n * 3);

        for node in network.nodes() {
            positions.extend_from_slice(&node.position.to_array());
            velocities.extend_from_slice(&node.velocity.to_array());
        }

        Self {
            tick,
            sim_time,
            positions,
            velocities,
            node_count: n,
        }
    }

    /// Captures the node state and clock of a simulation.
    pub fn capture(sim: &Simulation) -> Self {
        Self::from_network(sim.tick_count(), sim.sim_time(), sim.network())
    }

    /// Writes positions and velocities back into a network.
    ///
    /// Fixed nodes are restored too, so a snapshot taken from the same run
    /// leaves them bit-identical. Spring lengths are refreshed afterwards.
    pub fn apply_to(&self, network: &mut SpringNetwork) -> DrapeResult<()> {
        self.check_shape()?;
        if self.node_count != network.node_count() {
            return Err(DrapeError::InvalidMesh(format!(
                "Snapshot has {} nodes, network has {}",
                self.node_count,
                network.node_count()
            )));
        }

        let state = self.positions.chunks_exact(3).zip(self.velocities.chunks_exact(3));
        for (node, (p, v)) in network.nodes_mut().iter_mut().zip(state) {
            node.position = Vec3::from_slice(p);
            node.velocity = Vec3::from_slice(v);
            node.reset_force();
        }
        network.refresh_lengths();
        Ok(())
    }

    /// Restores node state and clock into a simulation.
    pub fn restore(&self, sim: &mut Simulation) -> DrapeResult<()> {
        self.apply_to(sim.network_mut())?;
        sim.set_clock(self.tick, self.sim_time);
        tracing::debug!(tick = self.tick, nodes = self.node_count, "snapshot restored");
        Ok(())
    }

    /// Position of node `i`, if present.
    pub fn position(&self, i: usize) -> Option<Vec3> {
        self.positions.get(i * 3..i * 3 + 3).map(Vec3::from_slice)
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> DrapeResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| DrapeError::Serialization(format!("Snapshot serialization failed: {e}")))
    }

    /// Deserializes from binary format and checks buffer lengths.
    pub fn from_bytes(data: &[u8]) -> DrapeResult<Self> {
        let snapshot: Self = bincode::deserialize(data).map_err(|e| {
            DrapeError::Serialization(format!("Snapshot deserialization failed: {e}"))
        })?;
        snapshot.check_shape()?;
        Ok(snapshot)
    }

    fn check_shape(&self) -> DrapeResult<()> {
        let expected = self.node_count * 3;
        if self.positions.len() != expected || self.velocities.len() != expected {
            return Err(DrapeError::Serialization(format!(
                "Snapshot buffers hold {} positions / {} velocities, expected {}",
                self.positions.len(),
                self.velocities.len(),
                expected
            )));
        }
        Ok(())
    }
}
