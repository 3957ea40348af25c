//! Fixed-tick simulation driver.
//!
//! The host calls [`Simulation::tick`] at a fixed cadence. Each tick runs
//! `substeps` sub-steps, and each sub-step runs five phases over the whole
//! network, never interleaved:
//!
//! ```text
//! 1. reset every node's force
//! 2. node forces     (node order)
//! 3. spring forces   (spring creation order)
//! 4. integrate nodes (node order)
//! 5. refresh spring lengths (spring creation order)
//! ```

use std::time::Instant;

use drape_mesh::TriangleMesh;
use drape_telemetry::{EventBus, EventKind, SimulationEvent};
use drape_types::{DrapeError, DrapeResult, Scalar, Vec3};

use crate::config::SimulationConfig;
use crate::network::SpringNetwork;

/// Outcome of one call to [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Index of the tick (ticks skipped while paused are not counted).
    pub tick: u64,
    /// Sub-steps actually executed; zero while paused.
    pub substeps_run: u32,
    /// Simulation time after the tick (seconds).
    pub sim_time: f64,
    /// Wall-clock time spent in the tick (seconds).
    pub wall_time: f64,
}

/// Owns a spring network and advances it in time.
pub struct Simulation {
    network: SpringNetwork,
    config: SimulationConfig,
    substep_size: Scalar,
    gravity: Vec3,
    paused: bool,
    tick_count: u64,
    sim_time: f64,
    bus: Option<EventBus>,
}

impl Simulation {
    /// Wraps a built network.
    ///
    /// Fails if the configuration is invalid or differs from the one the
    /// network was built with.
    pub fn new(network: SpringNetwork, config: SimulationConfig) -> DrapeResult<Self> {
        config.validate()?;
        if &config != network.config() {
            return Err(DrapeError::InvalidConfig(
                "Simulation config differs from the config the network was built with".into(),
            ));
        }
        tracing::debug!(
            nodes = network.node_count(),
            springs = network.spring_count(),
            method = %config.integration_method,
            substeps = config.substeps,
            "simulation created"
        );
        Ok(Self {
            substep_size: config.substep_size(),
            gravity: config.gravity_vec(),
            network,
            config,
            paused: false,
            tick_count: 0,
            sim_time: 0.0,
            bus: None,
        })
    }

    /// Wraps a built network, stepping it with its own build config.
    pub fn from_network(network: SpringNetwork) -> DrapeResult<Self> {
        let config = network.config().clone();
        Self::new(network, config)
    }

    /// Builds the network for `mesh` and wraps it.
    pub fn from_mesh(
        mesh: &TriangleMesh,
        pinned: &[bool],
        config: SimulationConfig,
    ) -> DrapeResult<Self> {
        let network = SpringNetwork::from_mesh(mesh, pinned, &config)?;
        Self::new(network, config)
    }

    /// Attaches a telemetry bus and announces the topology on it.
    pub fn attach_bus(&mut self, bus: EventBus) {
        let stats = self.network.stats();
        bus.emit(SimulationEvent::new(
            self.tick_count,
            EventKind::TopologyBuilt {
                nodes: self.network.node_count(),
                traction_springs: stats.traction_springs,
                bending_springs: stats.bending_springs,
                non_manifold_edges: stats.non_manifold_edges,
            },
        ));
        self.bus = Some(bus);
    }

    pub fn bus_mut(&mut self) -> Option<&mut EventBus> {
        self.bus.as_mut()
    }

    pub fn detach_bus(&mut self) -> Option<EventBus> {
        self.bus.take()
    }

    /// Runs one tick: `config.substeps` sub-steps, or nothing while paused.
    ///
    /// With a bus attached, every event pending on it (including this
    /// tick's) is dispatched to the sinks before returning.
    pub fn tick(&mut self) -> TickReport {
        if self.paused {
            return TickReport {
                tick: self.tick_count,
                substeps_run: 0,
                sim_time: self.sim_time,
                wall_time: 0.0,
            };
        }

        let start = Instant::now();
        self.advance(self.config.substeps);
        self.tick_count += 1;
        self.sim_time += self.config.time_step as f64;
        let wall_time = start.elapsed().as_secs_f64();

        tracing::trace!(tick = self.tick_count, sim_time = self.sim_time, "tick");

        if let Some(bus) = &mut self.bus {
            bus.emit(SimulationEvent::new(
                self.tick_count,
                EventKind::TickEnd {
                    substeps: self.config.substeps,
                    sim_time: self.sim_time,
                    wall_time,
                },
            ));
            bus.emit(SimulationEvent::new(
                self.tick_count,
                EventKind::Energy {
                    kinetic: self.network.kinetic_energy(),
                    elastic: self.network.elastic_energy(),
                },
            ));
            bus.flush();
        }

        TickReport {
            tick: self.tick_count,
            substeps_run: self.config.substeps,
            sim_time: self.sim_time,
            wall_time,
        }
    }

    /// Runs exactly `n` sub-steps, ignoring the pause flag.
    ///
    /// Does not advance the tick counter or simulation time.
    pub fn advance(&mut self, n: u32) {
        for _ in 0..n {
            self.substep();
        }
    }

    fn substep(&mut self) {
        let gravity = self.gravity;
        let h = self.substep_size;
        let method = self.config.integration_method;
        let (nodes, springs) = self.network.parts_mut();

        for node in nodes.iter_mut() {
            node.reset_force();
        }
        for node in nodes.iter_mut() {
            node.compute_forces(gravity);
        }
        for spring in springs.iter() {
            spring.compute_forces(nodes);
        }
        method.integrate(nodes, h);
        for spring in springs.iter_mut() {
            spring.update_length(nodes);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        tracing::debug!(paused, "pause toggled");
        if let Some(bus) = &self.bus {
            bus.emit(SimulationEvent::new(
                self.tick_count,
                EventKind::PauseChanged { paused },
            ));
        }
    }

    /// Flips the pause flag and returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    /// Copies node positions into the host mesh.
    pub fn write_back(&self, mesh: &mut TriangleMesh) -> DrapeResult<()> {
        mesh.write_positions(&self.network.positions())
    }

    pub fn network(&self) -> &SpringNetwork {
        &self.network
    }

    /// Mutable access for hosts that edit node state between ticks
    /// (dragging a vertex, restoring a snapshot).
    pub fn network_mut(&mut self) -> &mut SpringNetwork {
        &mut self.network
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Sub-step size `h`, fixed for the run.
    pub fn substep_size(&self) -> Scalar {
        self.substep_size
    }

    /// Completed (non-paused) ticks so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Restores the tick counter and clock, e.g. after loading a snapshot.
    pub fn set_clock(&mut self, tick_count: u64, sim_time: f64) {
        self.tick_count = tick_count;
        self.sim_time = sim_time;
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.network.positions()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.network.kinetic_energy()
    }

    pub fn elastic_energy(&self) -> f64 {
        self.network.elastic_energy()
    }

    pub fn max_strain(&self) -> f32 {
        self.network.max_strain()
    }
}
