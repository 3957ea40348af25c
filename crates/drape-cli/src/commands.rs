//! CLI command implementations.

use clap::Args;
use drape_debug::StateSnapshot;
use drape_mesh::generators::{quad_grid, top_row};
use drape_mesh::TriangleMesh;
use drape_solver::{IntegrationMethod, Simulation, SimulationConfig, SpringNetwork};
use drape_telemetry::{EventBus, TracingSink};

/// Arguments of `drape simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to simulation config (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Quads along X.
    #[arg(long, default_value_t = 10)]
    pub cols: usize,

    /// Quads along Y.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,

    /// Sheet width in meters.
    #[arg(long, default_value_t = 1.0)]
    pub width: f32,

    /// Sheet height in meters.
    #[arg(long, default_value_t = 1.0)]
    pub height: f32,

    /// Number of ticks to run.
    #[arg(short, long, default_value_t = 100)]
    pub ticks: u32,

    /// Pin the top row of vertices.
    #[arg(long)]
    pub pin_top: bool,

    /// Override the integration method (explicit, symplectic).
    #[arg(short, long)]
    pub method: Option<String>,

    /// Write the final mesh as JSON.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write a binary state snapshot of the final tick.
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Log every tick's telemetry events.
    #[arg(long)]
    pub trace_events: bool,
}

/// Run a simulation of a procedural sheet.
pub fn simulate(args: &SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("Drape Simulation");
    println!("────────────────");

    let mut config = match &args.config {
        Some(path) => {
            println!("Config:    {path}");
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };
    if let Some(method) = &args.method {
        config.integration_method = method.parse::<IntegrationMethod>()?;
        config.validate()?;
    }

    let mut mesh = quad_grid(args.cols, args.rows, args.width, args.height);
    let pinned = if args.pin_top {
        SpringNetwork::pin_mask(mesh.vertex_count(), &top_row(args.cols))?
    } else {
        Vec::new()
    };

    let mut sim = Simulation::from_mesh(&mesh, &pinned, config)?;
    if args.trace_events {
        let mut bus = EventBus::new();
        bus.add_sink(Box::new(TracingSink::new(tracing::Level::INFO)));
        sim.attach_bus(bus);
    }

    let stats = sim.network().stats();
    println!(
        "Mesh:      {} verts, {} tris",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    println!(
        "Springs:   {} traction, {} bending",
        stats.traction_springs, stats.bending_springs
    );
    println!(
        "Stepping:  {} × {} sub-steps (h = {:.2e}s), {}",
        args.ticks,
        sim.config().substeps,
        sim.substep_size(),
        sim.config().integration_method
    );
    println!();

    let mut wall_time = 0.0;
    for _ in 0..args.ticks {
        wall_time += sim.tick().wall_time;
    }
    if let Some(bus) = sim.bus_mut() {
        bus.finish();
    }

    let lowest = sim
        .positions()
        .iter()
        .map(|p| p.y)
        .fold(f32::INFINITY, f32::min);

    println!("Sim time:      {:.3}s", sim.sim_time());
    println!("Wall time:     {:.3}s", wall_time);
    println!("Kinetic E:     {:.6e}", sim.kinetic_energy());
    println!("Elastic E:     {:.6e}", sim.elastic_energy());
    println!("Max strain:    {:.4}", sim.max_strain());
    println!("Lowest Y:      {:.4}", lowest);

    if sim.positions().iter().any(|p| !p.is_finite()) {
        tracing::warn!("simulation diverged; try more substeps or the symplectic method");
    }

    sim.write_back(&mut mesh)?;

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&mesh)?)?;
        println!("Mesh written to: {path}");
    }
    if let Some(path) = &args.snapshot {
        std::fs::write(path, StateSnapshot::capture(&sim).to_bytes()?)?;
        println!("Snapshot written to: {path}");
    }

    Ok(())
}

/// Inspect a state snapshot.
pub fn inspect(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Drape Snapshot Inspector");
    println!("────────────────────────");
    println!();

    let data = std::fs::read(path)?;
    let snapshot = StateSnapshot::from_bytes(&data)?;

    println!("Tick:         {}", snapshot.tick);
    println!("Sim time:     {:.4}s", snapshot.sim_time);
    println!("Nodes:        {}", snapshot.node_count);

    if snapshot.node_count > 0 {
        let ys = snapshot.positions.iter().skip(1).step_by(3);
        let min_y = ys.clone().copied().fold(f32::INFINITY, f32::min);
        let max_y = ys.copied().fold(f32::NEG_INFINITY, f32::max);
        let max_speed = snapshot
            .velocities
            .chunks_exact(3)
            .map(|v| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt())
            .fold(0.0f32, f32::max);
        println!("Y range:      [{:.4}, {:.4}]", min_y, max_y);
        println!("Max speed:    {:.4} m/s", max_speed);
    }

    Ok(())
}

/// Validate a mesh or config.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Drape Validator");
    println!("───────────────");
    println!();

    if path.ends_with(".toml") {
        println!("Validating config: {path}");
        match SimulationConfig::load(path) {
            Ok(config) => println!(
                "✅ Config is valid ({} sub-steps, {}).",
                config.substeps, config.integration_method
            ),
            Err(e) => {
                println!("❌ Config validation failed: {e}");
                return Err(e.into());
            }
        }
    } else if path.ends_with(".json") {
        println!("Validating mesh: {path}");
        let content = std::fs::read_to_string(path)?;
        let mesh: TriangleMesh = serde_json::from_str(&content)?;
        match SpringNetwork::from_mesh(&mesh, &[], &SimulationConfig::default()) {
            Ok(network) => {
                let stats = network.stats();
                println!(
                    "✅ Mesh is valid ({} verts, {} tris, {} boundary edges).",
                    mesh.vertex_count(),
                    mesh.triangle_count(),
                    stats.boundary_edges
                );
                if stats.non_manifold_edges > 0 {
                    println!(
                        "⚠️  {} non-manifold edges: only the first two triangles get a bending spring.",
                        stats.non_manifold_edges
                    );
                }
            }
            Err(e) => {
                println!("❌ Mesh validation failed: {e}");
                return Err(e.into());
            }
        }
    } else {
        return Err(format!("Unsupported file format: {path} (use .toml or .json)").into());
    }

    Ok(())
}
