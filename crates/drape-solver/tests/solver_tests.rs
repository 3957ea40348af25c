//! Integration tests for drape-solver.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use drape_mesh::generators::{quad_grid, single_triangle, split_quad, top_row};
use drape_telemetry::{EventBus, EventKind, VecSink};
use drape_types::{DrapeError, NodeId, Vec3};
use drape_solver::{
    IntegrationMethod, Node, Simulation, SimulationConfig, Spring, SpringKind, SpringNetwork,
};

fn count_kind(network: &SpringNetwork, kind: SpringKind) -> usize {
    network.springs().iter().filter(|s| s.kind() == kind).count()
}

fn single_node_sim(method: IntegrationMethod) -> Simulation {
    let config = SimulationConfig {
        time_step: 0.01,
        substeps: 1,
        gravity: [0.0, -9.81, 0.0],
        integration_method: method,
        node_mass: 1.0,
        damping: 0.0,
        ..Default::default()
    };
    let network = SpringNetwork::build(&[Vec3::ZERO], &[], &[], &config).unwrap();
    Simulation::new(network, config).unwrap()
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn single_triangle_topology() {
    let config = SimulationConfig::default();
    let network = SpringNetwork::from_mesh(&single_triangle(), &[], &config).unwrap();

    assert_eq!(network.node_count(), 3);
    assert_eq!(network.spring_count(), 3);
    assert_eq!(count_kind(&network, SpringKind::Traction), 3);
    assert_eq!(count_kind(&network, SpringKind::Bending), 0);
    assert_eq!(network.stats().boundary_edges, 3);
}

#[test]
fn shared_edge_yields_one_bending_spring() {
    let config = SimulationConfig::default();
    let network = SpringNetwork::from_mesh(&split_quad(), &[], &config).unwrap();

    assert_eq!(network.node_count(), 4);
    assert_eq!(count_kind(&network, SpringKind::Traction), 5);
    assert_eq!(count_kind(&network, SpringKind::Bending), 1);

    let bending: Vec<&Spring> = network
        .springs()
        .iter()
        .filter(|s| s.kind() == SpringKind::Bending)
        .collect();
    let (a, b) = bending[0].endpoints();
    // Current triangle's wing first, then the stored wing.
    assert_eq!((a, b), (NodeId(3), NodeId(0)));
    assert_relative_eq!(bending[0].rest_length(), 2.0f32.sqrt());
    assert_eq!(bending[0].stiffness(), config.bending_stiffness);
}

#[test]
fn springs_follow_scan_order() {
    let config = SimulationConfig::default();
    let network = SpringNetwork::from_mesh(&split_quad(), &[], &config).unwrap();
    let order: Vec<(u32, u32, SpringKind)> = network
        .springs()
        .iter()
        .map(|s| {
            let (a, b) = s.endpoints();
            (a.0, b.0, s.kind())
        })
        .collect();

    // Triangle [0,1,2]: (0,1) (0,2) (1,2); triangle [1,3,2]: (1,3) (1,2)→bend (3,2)
    assert_eq!(
        order,
        vec![
            (0, 1, SpringKind::Traction),
            (0, 2, SpringKind::Traction),
            (1, 2, SpringKind::Traction),
            (1, 3, SpringKind::Traction),
            (3, 0, SpringKind::Bending),
            (3, 2, SpringKind::Traction),
        ]
    );
}

#[test]
fn no_duplicate_traction_springs() {
    let config = SimulationConfig::default();
    let mesh = quad_grid(4, 3, 1.0, 1.0);
    let network = SpringNetwork::from_mesh(&mesh, &[], &config).unwrap();

    let mut keys: Vec<(u32, u32)> = network
        .springs()
        .iter()
        .filter(|s| s.kind() == SpringKind::Traction)
        .map(|s| {
            let (a, b) = s.endpoints();
            (a.0.min(b.0), a.0.max(b.0))
        })
        .collect();
    let total = keys.len();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), total);

    // vertical + horizontal + diagonal edges of a 4×3 grid
    let edges = 3 * 5 + 4 * 4 + 4 * 3;
    assert_eq!(total, edges);
    // Every interior edge yields one bending spring.
    let interior = edges - network.stats().boundary_edges;
    assert_eq!(count_kind(&network, SpringKind::Bending), interior);
}

#[test]
fn non_manifold_edge_adds_no_extra_spring() {
    // Three triangles fan around edge (0, 1).
    let positions = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.5, 1.0, 0.0),
        Vec3::new(0.5, -1.0, 0.0),
        Vec3::new(0.5, 0.0, 1.0),
    ];
    let indices = [0, 1, 2, 0, 1, 3, 0, 1, 4];
    let config = SimulationConfig::default();
    let network = SpringNetwork::build(&positions, &indices, &[], &config).unwrap();

    assert_eq!(count_kind(&network, SpringKind::Bending), 1);
    assert_eq!(count_kind(&network, SpringKind::Traction), 7);
    assert_eq!(network.stats().non_manifold_edges, 1);
}

#[test]
fn rest_length_equals_current_length_after_build() {
    let config = SimulationConfig::default();
    let network = SpringNetwork::from_mesh(&quad_grid(3, 3, 2.0, 2.0), &[], &config).unwrap();
    for spring in network.springs() {
        assert_eq!(spring.current_length(), spring.rest_length());
        assert!(spring.rest_length() > 0.0);
    }
    assert_eq!(network.max_strain(), 0.0);
    assert_eq!(network.elastic_energy(), 0.0);
}

#[test]
fn nodes_follow_vertex_order_and_config() {
    let config = SimulationConfig {
        node_mass: 0.25,
        damping: 0.3,
        ..Default::default()
    };
    let mesh = split_quad();
    let network = SpringNetwork::from_mesh(&mesh, &[true, false, false, false], &config).unwrap();
    for (i, node) in network.nodes().iter().enumerate() {
        assert_eq!(node.position, mesh.position_vec3(i));
        assert_eq!(node.velocity, Vec3::ZERO);
        assert_eq!(node.mass(), 0.25);
        assert_eq!(node.damping(), 0.3);
    }
    assert!(network.node(NodeId(0)).unwrap().is_fixed());
    assert!(!network.node(NodeId(1)).unwrap().is_fixed());
}

#[test]
fn build_rejects_out_of_range_index() {
    let config = SimulationConfig::default();
    let err = SpringNetwork::build(&[Vec3::ZERO; 3], &[0, 1, 3], &[], &config).unwrap_err();
    assert!(matches!(err, DrapeError::InvalidMesh(_)));
}

#[test]
fn build_rejects_partial_triangle() {
    let config = SimulationConfig::default();
    let err = SpringNetwork::build(&[Vec3::ZERO; 3], &[0, 1], &[], &config).unwrap_err();
    assert!(matches!(err, DrapeError::InvalidMesh(_)));
}

#[test]
fn build_rejects_pin_mask_length() {
    let config = SimulationConfig::default();
    let result = SpringNetwork::from_mesh(&single_triangle(), &[true], &config);
    assert!(result.is_err());
}

#[test]
fn pin_mask_from_indices() {
    let mask = SpringNetwork::pin_mask(4, &[0, 3]).unwrap();
    assert_eq!(mask, vec![true, false, false, true]);
    assert!(SpringNetwork::pin_mask(4, &[4]).is_err());
}

// ─── Force Tests ──────────────────────────────────────────────

#[test]
fn node_forces_include_weight_and_drag() {
    let mut node = Node::new(Vec3::ZERO, 2.0, 0.5, false);
    node.velocity = Vec3::new(1.0, 0.0, 0.0);
    node.compute_forces(Vec3::new(0.0, -10.0, 0.0));
    assert_eq!(node.force, Vec3::new(-0.5, -20.0, 0.0));
    node.reset_force();
    assert_eq!(node.force, Vec3::ZERO);
}

#[test]
fn stretched_spring_pulls_endpoints_together() {
    let mut nodes = vec![
        Node::new(Vec3::ZERO, 1.0, 0.0, false),
        Node::new(Vec3::X, 1.0, 0.0, false),
    ];
    let spring = Spring::new(SpringKind::Traction, NodeId(0), NodeId(1), 10.0, 0.0, &nodes);
    nodes[1].position = Vec3::new(1.5, 0.0, 0.0);

    let f = spring.compute_forces(&mut nodes);
    assert_relative_eq!(f.x, 5.0);
    assert_relative_eq!(nodes[0].force.x, 5.0);
    assert_relative_eq!(nodes[1].force.x, -5.0);
}

#[test]
fn spring_damping_resists_separation() {
    let mut nodes = vec![
        Node::new(Vec3::ZERO, 1.0, 0.0, false),
        Node::new(Vec3::Y, 1.0, 0.0, false),
    ];
    let spring = Spring::new(SpringKind::Bending, NodeId(0), NodeId(1), 0.0, 2.0, &nodes);
    nodes[1].velocity = Vec3::new(3.0, 1.0, 0.0);

    // Only the component along the axis (y) is damped.
    let f = spring.compute_forces(&mut nodes);
    assert_relative_eq!(f.y, 2.0);
    assert_abs_diff_eq!(f.x, 0.0);
}

#[test]
fn coincident_endpoints_exert_no_force() {
    let mut nodes = vec![
        Node::new(Vec3::ONE, 1.0, 0.0, false),
        Node::new(Vec3::ONE, 1.0, 0.0, false),
    ];
    let spring = Spring::new(SpringKind::Traction, NodeId(0), NodeId(1), 100.0, 1.0, &nodes);
    nodes[1].velocity = Vec3::X;

    let f = spring.compute_forces(&mut nodes);
    assert_eq!(f, Vec3::ZERO);
    assert!(nodes.iter().all(|n| n.force == Vec3::ZERO));
    assert!(spring.is_degenerate());
    assert_eq!(spring.strain(), 0.0);
}

#[test]
fn spring_forces_cancel_across_network() {
    let config = SimulationConfig::default();
    let mut network = SpringNetwork::from_mesh(&quad_grid(3, 3, 1.0, 1.0), &[], &config).unwrap();

    // Deform and give the nodes some motion.
    for (i, node) in network.nodes_mut().iter_mut().enumerate() {
        let t = i as f32;
        node.position += Vec3::new(0.03 * t.sin(), 0.02 * t.cos(), 0.05 * (0.7 * t).sin());
        node.velocity = Vec3::new(0.1 * t.cos(), -0.2, 0.05 * t.sin());
    }

    let (nodes, springs) = network.parts_mut();
    for spring in springs.iter() {
        let before_a = nodes[spring.endpoints().0.index()].force;
        let before_b = nodes[spring.endpoints().1.index()].force;
        let f = spring.compute_forces(nodes);
        let added_a = nodes[spring.endpoints().0.index()].force - before_a;
        let added_b = nodes[spring.endpoints().1.index()].force - before_b;
        assert_abs_diff_eq!((added_a - f).length(), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!((added_b + f).length(), 0.0, epsilon = 1e-4);
    }

    let total: Vec3 = nodes.iter().map(|n| n.force).sum();
    assert_abs_diff_eq!(total.length(), 0.0, epsilon = 1e-3);
}

#[test]
fn strain_and_energy_track_length() {
    let mut nodes = vec![
        Node::new(Vec3::ZERO, 1.0, 0.0, false),
        Node::new(Vec3::new(2.0, 0.0, 0.0), 1.0, 0.0, false),
    ];
    let mut spring = Spring::new(SpringKind::Traction, NodeId(0), NodeId(1), 4.0, 0.0, &nodes);
    nodes[1].position.x = 3.0;
    spring.update_length(&nodes);

    assert_relative_eq!(spring.current_length(), 3.0);
    assert_relative_eq!(spring.strain(), 0.5);
    assert_relative_eq!(spring.elastic_energy(), 2.0);
}

// ─── Integrator Tests ─────────────────────────────────────────

#[test]
fn explicit_free_fall_matches_hand_computation() {
    let mut sim = single_node_sim(IntegrationMethod::Explicit);
    assert_relative_eq!(sim.substep_size(), 0.01);

    sim.advance(1);
    let node = &sim.network().nodes()[0];
    assert_abs_diff_eq!(node.velocity.y, -0.0981, epsilon = 1e-6);
    assert_eq!(node.position, Vec3::ZERO);

    sim.advance(1);
    let node = &sim.network().nodes()[0];
    assert_abs_diff_eq!(node.velocity.y, -0.1962, epsilon = 1e-6);
    assert_abs_diff_eq!(node.position.y, -0.000981, epsilon = 1e-7);
    assert_eq!(node.position.x, 0.0);
    assert_eq!(node.position.z, 0.0);
}

#[test]
fn symplectic_moves_with_updated_velocity() {
    let mut sim = single_node_sim(IntegrationMethod::Symplectic);
    sim.advance(1);
    let node = &sim.network().nodes()[0];
    assert_abs_diff_eq!(node.velocity.y, -0.0981, epsilon = 1e-6);
    assert_abs_diff_eq!(node.position.y, -0.000981, epsilon = 1e-7);
}

#[test]
fn methods_differ_under_force() {
    let mut explicit = Node::new(Vec3::ZERO, 1.0, 0.0, false);
    explicit.velocity = Vec3::new(1.0, 0.0, 0.0);
    explicit.force = Vec3::new(0.0, -2.0, 0.0);
    let mut symplectic = explicit.clone();

    IntegrationMethod::Explicit.advance(&mut explicit, 0.1);
    IntegrationMethod::Symplectic.advance(&mut symplectic, 0.1);

    assert_eq!(explicit.velocity, symplectic.velocity);
    assert_ne!(explicit.position, symplectic.position);
    assert_relative_eq!(explicit.position.y, 0.0);
    assert_relative_eq!(symplectic.position.y, -0.02);
}

#[test]
fn fixed_nodes_are_bit_identical() {
    let mesh = quad_grid(4, 4, 1.0, 1.0);
    let pinned = SpringNetwork::pin_mask(mesh.vertex_count(), &top_row(4)).unwrap();
    for &method in IntegrationMethod::all() {
        let config = SimulationConfig {
            integration_method: method,
            ..Default::default()
        };
        let mut sim = Simulation::from_mesh(&mesh, &pinned, config).unwrap();
        let before: Vec<Node> = sim.network().nodes().to_vec();

        for _ in 0..25 {
            sim.tick();
        }

        for (i, (old, new)) in before.iter().zip(sim.network().nodes()).enumerate() {
            if pinned[i] {
                assert_eq!(old.position.to_array().map(f32::to_bits), new.position.to_array().map(f32::to_bits));
                assert_eq!(old.velocity.to_array().map(f32::to_bits), new.velocity.to_array().map(f32::to_bits));
            } else {
                assert_ne!(old.position, new.position, "free node {i} should move");
            }
        }
    }
}

// ─── Driver Tests ─────────────────────────────────────────────

#[test]
fn paused_tick_changes_nothing() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let mut sim = Simulation::from_mesh(&mesh, &[], SimulationConfig::default()).unwrap();
    sim.tick();
    let before: Vec<Node> = sim.network().nodes().to_vec();

    sim.set_paused(true);
    let report = sim.tick();
    assert_eq!(report.substeps_run, 0);
    assert_eq!(report.tick, 1);
    assert_eq!(sim.network().nodes(), &before[..]);
    assert_eq!(sim.tick_count(), 1);

    assert!(!sim.toggle_pause());
    let report = sim.tick();
    assert_eq!(report.substeps_run, sim.config().substeps);
    assert_eq!(sim.tick_count(), 2);
}

#[test]
fn zero_substeps_changes_nothing() {
    let mut sim = Simulation::from_mesh(&split_quad(), &[], SimulationConfig::default()).unwrap();
    let before: Vec<Node> = sim.network().nodes().to_vec();
    sim.advance(0);
    assert_eq!(sim.network().nodes(), &before[..]);
}

#[test]
fn tick_advances_clock() {
    let config = SimulationConfig {
        time_step: 0.02,
        substeps: 4,
        ..Default::default()
    };
    let mut sim = Simulation::from_mesh(&single_triangle(), &[], config).unwrap();
    assert_relative_eq!(sim.substep_size(), 0.005);
    for _ in 0..5 {
        sim.tick();
    }
    assert_eq!(sim.tick_count(), 5);
    assert_relative_eq!(sim.sim_time(), 0.1, epsilon = 1e-6);
}

#[test]
fn spring_lengths_refreshed_after_each_substep() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let pinned = SpringNetwork::pin_mask(mesh.vertex_count(), &top_row(2)).unwrap();
    let mut sim = Simulation::from_mesh(&mesh, &pinned, SimulationConfig::default()).unwrap();
    sim.advance(3);

    let nodes = sim.network().nodes();
    for spring in sim.network().springs() {
        let (a, b) = spring.endpoints();
        let d = nodes[a.index()].position.distance(nodes[b.index()].position);
        assert_eq!(spring.current_length(), d);
    }
    assert!(sim.max_strain() > 0.0);
}

#[test]
fn runs_are_reproducible() {
    let mesh = quad_grid(5, 5, 1.0, 1.0);
    let pinned = SpringNetwork::pin_mask(mesh.vertex_count(), &[0, 5]).unwrap();
    let run = || {
        let mut sim = Simulation::from_mesh(&mesh, &pinned, SimulationConfig::default()).unwrap();
        for _ in 0..20 {
            sim.tick();
        }
        sim.positions()
    };
    assert_eq!(run(), run());
}

#[test]
fn hanging_sheet_stays_bounded() {
    let mesh = quad_grid(6, 6, 1.0, 1.0);
    let pinned = SpringNetwork::pin_mask(mesh.vertex_count(), &top_row(6)).unwrap();
    let mut sim = Simulation::from_mesh(&mesh, &pinned, SimulationConfig::stiff()).unwrap();
    for _ in 0..100 {
        sim.tick();
    }
    for p in sim.positions() {
        assert!(p.is_finite());
        assert!(p.y > -2.0, "sheet should hang, not fall away: {p:?}");
    }
}

#[test]
fn write_back_updates_mesh() {
    let mut mesh = single_triangle();
    let mut sim = Simulation::from_mesh(&mesh, &[], SimulationConfig::default()).unwrap();
    sim.tick();
    sim.write_back(&mut mesh).unwrap();
    for (i, p) in sim.positions().iter().enumerate() {
        assert_eq!(mesh.position_vec3(i), *p);
    }
}

#[test]
fn driver_emits_telemetry() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    let mut sim = Simulation::from_mesh(&split_quad(), &[], SimulationConfig::default()).unwrap();
    sim.attach_bus(bus);
    sim.tick();
    sim.set_paused(true);
    sim.tick();
    sim.bus_mut().unwrap().flush();

    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0].kind, EventKind::TopologyBuilt { bending_springs: 1, .. }));
    assert!(matches!(events[1].kind, EventKind::TickEnd { .. }));
    assert!(matches!(events[2].kind, EventKind::Energy { .. }));
    assert!(matches!(events[3].kind, EventKind::PauseChanged { paused: true }));
    assert!(sim.detach_bus().is_some());
}

#[test]
fn simulation_rejects_invalid_config() {
    let network =
        SpringNetwork::from_mesh(&single_triangle(), &[], &SimulationConfig::default()).unwrap();
    let config = SimulationConfig {
        substeps: 0,
        ..Default::default()
    };
    assert!(matches!(
        Simulation::new(network, config),
        Err(DrapeError::InvalidConfig(_))
    ));
}

#[test]
fn simulation_rejects_config_the_network_was_not_built_with() {
    let built_with = SimulationConfig {
        node_mass: 1.0,
        damping: 0.0,
        traction_stiffness: 10.0,
        ..Default::default()
    };
    let network = SpringNetwork::from_mesh(&split_quad(), &[], &built_with).unwrap();
    let other = SimulationConfig {
        node_mass: 50.0,
        damping: 3.0,
        traction_stiffness: 9999.0,
        ..Default::default()
    };
    assert!(matches!(
        Simulation::new(network.clone(), other),
        Err(DrapeError::InvalidConfig(_))
    ));

    let sim = Simulation::from_network(network).unwrap();
    assert_eq!(sim.config(), &built_with);
    for node in sim.network().nodes() {
        assert_eq!(node.mass(), sim.config().node_mass);
        assert_eq!(node.damping(), sim.config().damping);
    }
    for spring in sim.network().springs() {
        if spring.kind() == SpringKind::Traction {
            assert_eq!(spring.stiffness(), sim.config().traction_stiffness);
        }
    }
}

#[test]
fn tick_dispatches_events_without_manual_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    let mut sim = Simulation::from_mesh(&split_quad(), &[], SimulationConfig::default()).unwrap();
    sim.attach_bus(bus);
    assert!(sink.is_empty());

    sim.tick();
    assert_eq!(sink.len(), 3);
    sim.tick();
    assert_eq!(sink.len(), 5);
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn config_defaults_are_valid() {
    assert!(SimulationConfig::default().validate().is_ok());
    assert!(SimulationConfig::debug().validate().is_ok());
    assert!(SimulationConfig::stiff().validate().is_ok());
}

#[test]
fn config_rejects_bad_values() {
    let cases = [
        SimulationConfig { time_step: 0.0, ..Default::default() },
        SimulationConfig { node_mass: -1.0, ..Default::default() },
        SimulationConfig { traction_stiffness: -5.0, ..Default::default() },
        SimulationConfig { damping: f32::NAN, ..Default::default() },
        SimulationConfig { gravity: [0.0, f32::INFINITY, 0.0], ..Default::default() },
    ];
    for config in cases {
        assert!(config.validate().is_err(), "{config:?}");
    }
}

#[test]
fn config_toml_roundtrip() {
    let config = SimulationConfig::stiff();
    let text = config.to_toml_string().unwrap();
    let back = SimulationConfig::from_toml_str(&text).unwrap();
    assert_eq!(config, back);
}

#[test]
fn config_toml_partial_uses_defaults() {
    let config = SimulationConfig::from_toml_str(
        r#"
        substeps = 20
        integration_method = "explicit"
        "#,
    )
    .unwrap();
    assert_eq!(config.substeps, 20);
    assert_eq!(config.integration_method, IntegrationMethod::Explicit);
    assert_eq!(config.node_mass, SimulationConfig::default().node_mass);
}

#[test]
fn config_toml_unknown_method_is_fatal() {
    let err = SimulationConfig::from_toml_str(r#"integration_method = "runge_kutta""#).unwrap_err();
    assert!(matches!(err, DrapeError::InvalidConfig(_)));
}

#[test]
fn config_toml_unknown_field_is_rejected() {
    assert!(SimulationConfig::from_toml_str("stifness = 3.0").is_err());
}
