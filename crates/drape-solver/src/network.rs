//! Spring network construction from a triangle list.
//!
//! Every vertex becomes a [`Node`]. Triangles are scanned in input order
//! and, within a triangle `(v0, v1, v2)`, edges in the fixed order
//! `(v0,v1)`, `(v0,v2)`, `(v1,v2)`:
//!
//! - first sighting of an edge → traction spring along the edge
//! - second sighting → bending spring between the two wing vertices
//! - any later sighting (non-manifold) → no spring, counted and logged
//!
//! Spring creation order is also force-accumulation order, so this scan
//! order is what makes two runs over the same mesh bit-identical.

use drape_mesh::mesh::validate_indices;
use drape_mesh::{EdgeRegistry, EdgeVisit, TriangleMesh};
use drape_types::{DrapeError, DrapeResult, NodeId, SpringId, Vec3};

use crate::config::SimulationConfig;
use crate::node::Node;
use crate::spring::{Spring, SpringKind};

/// Summary of a topology build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub traction_springs: usize,
    pub bending_springs: usize,
    /// Distinct edges used by exactly one triangle.
    pub boundary_edges: usize,
    /// Distinct edges used by three or more triangles.
    pub non_manifold_edges: usize,
    /// Springs whose endpoints coincided at build time.
    pub degenerate_springs: usize,
}

/// Node arena plus the springs connecting it.
///
/// The configuration the network was built with is kept alongside it:
/// node mass, damping and spring stiffness are baked in at build time, so
/// the driver must step it with that same configuration.
#[derive(Debug, Clone)]
pub struct SpringNetwork {
    nodes: Vec<Node>,
    springs: Vec<Spring>,
    stats: BuildStats,
    config: SimulationConfig,
}

impl SpringNetwork {
    /// Builds the network for `positions` and a flat triangle index list.
    ///
    /// `pinned` is either empty (nothing pinned) or holds one flag per
    /// vertex. Index and mask errors are reported before anything is built.
    pub fn build(
        positions: &[Vec3],
        indices: &[u32],
        pinned: &[bool],
        config: &SimulationConfig,
    ) -> DrapeResult<Self> {
        config.validate()?;
        validate_indices(indices, positions.len())?;
        if !pinned.is_empty() && pinned.len() != positions.len() {
            return Err(DrapeError::InvalidMesh(format!(
                "Pinned array length ({}) != vertex count ({})",
                pinned.len(),
                positions.len()
            )));
        }

        let nodes: Vec<Node> = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let fixed = pinned.get(i).copied().unwrap_or(false);
                Node::new(p, config.node_mass, config.damping, fixed)
            })
            .collect();

        let triangle_count = indices.len() / 3;
        let mut registry = EdgeRegistry::with_triangle_capacity(triangle_count);
        let mut springs = Vec::with_capacity(triangle_count * 2);
        let mut stats = BuildStats::default();

        for tri in indices.chunks_exact(3) {
            let (v0, v1, v2) = (tri[0], tri[1], tri[2]);
            for (a, b, opposite) in [(v0, v1, v2), (v0, v2, v1), (v1, v2, v0)] {
                match registry.visit(a, b, opposite) {
                    EdgeVisit::First => {
                        springs.push(Spring::new(
                            SpringKind::Traction,
                            NodeId(a),
                            NodeId(b),
                            config.traction_stiffness,
                            config.damping,
                            &nodes,
                        ));
                        stats.traction_springs += 1;
                    }
                    EdgeVisit::Shared { other_vertex } => {
                        springs.push(Spring::new(
                            SpringKind::Bending,
                            NodeId(opposite),
                            NodeId(other_vertex),
                            config.bending_stiffness,
                            config.damping,
                            &nodes,
                        ));
                        stats.bending_springs += 1;
                    }
                    EdgeVisit::NonManifold { occurrences } => {
                        tracing::warn!(
                            edge = ?(a.min(b), a.max(b)),
                            occurrences,
                            "non-manifold edge, no bending spring added"
                        );
                    }
                }
            }
        }

        stats.boundary_edges = registry.boundary_edge_count();
        stats.non_manifold_edges = registry.non_manifold_edge_count();
        stats.degenerate_springs = springs.iter().filter(|s| s.is_degenerate()).count();
        if stats.degenerate_springs > 0 {
            tracing::warn!(
                count = stats.degenerate_springs,
                "springs with coincident endpoints will exert no force until separated"
            );
        }

        tracing::debug!(
            nodes = nodes.len(),
            traction = stats.traction_springs,
            bending = stats.bending_springs,
            boundary_edges = stats.boundary_edges,
            "spring network built"
        );

        Ok(Self {
            nodes,
            springs,
            stats,
            config: config.clone(),
        })
    }

    /// Builds the network for a validated mesh.
    pub fn from_mesh(
        mesh: &TriangleMesh,
        pinned: &[bool],
        config: &SimulationConfig,
    ) -> DrapeResult<Self> {
        mesh.validate()?;
        Self::build(&mesh.positions(), &mesh.indices, pinned, config)
    }

    /// Turns a list of pinned vertex indices into a per-vertex mask.
    pub fn pin_mask(vertex_count: usize, pinned: &[u32]) -> DrapeResult<Vec<bool>> {
        let mut mask = vec![false; vertex_count];
        for &v in pinned {
            let slot = mask.get_mut(v as usize).ok_or_else(|| {
                DrapeError::InvalidMesh(format!(
                    "Pinned vertex {v} is out of range (vertex count: {vertex_count})"
                ))
            })?;
            *slot = true;
        }
        Ok(mask)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    #[inline]
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Splits the borrow so springs can read and write the node arena.
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut [Node], &mut [Spring]) {
        (&mut self.nodes, &mut self.springs)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id.index())
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Configuration the network was built with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current node positions, in node order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    /// Recomputes every spring's current length from node positions.
    ///
    /// Call after editing node positions from outside the driver.
    pub fn refresh_lengths(&mut self) {
        let (nodes, springs) = self.parts_mut();
        for spring in springs.iter_mut() {
            spring.update_length(nodes);
        }
    }

    /// Total kinetic energy of all nodes.
    pub fn kinetic_energy(&self) -> f64 {
        self.nodes.iter().map(Node::kinetic_energy).sum()
    }

    /// Total elastic energy stored in all springs.
    pub fn elastic_energy(&self) -> f64 {
        self.springs.iter().map(Spring::elastic_energy).sum()
    }

    /// Largest absolute strain over all springs.
    pub fn max_strain(&self) -> f32 {
        self.springs
            .iter()
            .map(|s| s.strain().abs())
            .fold(0.0, f32::max)
    }
}
