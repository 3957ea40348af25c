//! Core triangle mesh type with SoA (Structure of Arrays) layout.
//!
//! The SoA layout stores each coordinate channel contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! The mesh is both the input to topology construction and the output
//! target the simulation writes positions back into every tick.

use serde::{Deserialize, Serialize};
use drape_types::{DrapeError, DrapeResult, Vec3};

/// A triangle mesh stored in Structure-of-Arrays layout.
///
/// Positions are expressed in whatever frame the host chose; the simulator
/// only requires that every vertex uses the same one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// X coordinates of all vertices.
    pub pos_x: Vec<f32>,
    /// Y coordinates of all vertices.
    pub pos_y: Vec<f32>,
    /// Z coordinates of all vertices.
    pub pos_z: Vec<f32>,

    /// Triangle indices, stored flat:
    /// `[t0v0, t0v1, t0v2, t1v0, t1v1, t1v2, ...]`
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i` as `[x, y, z]`.
    #[inline]
    pub fn position(&self, i: usize) -> [f32; 3] {
        [self.pos_x[i], self.pos_y[i], self.pos_z[i]]
    }

    /// Returns the position of vertex `i` as a `Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Gathers all positions into an AoS `Vec3` buffer.
    pub fn positions(&self) -> Vec<Vec3> {
        (0..self.vertex_count()).map(|i| self.position_vec3(i)).collect()
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Sets the position of vertex `i`.
    #[inline]
    pub fn set_position(&mut self, i: usize, x: f32, y: f32, z: f32) {
        self.pos_x[i] = x;
        self.pos_y[i] = y;
        self.pos_z[i] = z;
    }

    /// Overwrites every vertex position from an AoS buffer.
    ///
    /// Fails if the coordinate channels disagree in length or the buffer
    /// length differs from the vertex count; the mesh is left untouched in
    /// that case.
    pub fn write_positions(&mut self, positions: &[Vec3]) -> DrapeResult<()> {
        self.check_channels()?;
        if positions.len() != self.vertex_count() {
            return Err(DrapeError::InvalidMesh(format!(
                "Position buffer length ({}) != vertex count ({})",
                positions.len(),
                self.vertex_count()
            )));
        }
        for (i, p) in positions.iter().enumerate() {
            self.set_position(i, p.x, p.y, p.z);
        }
        Ok(())
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - Index count is a multiple of 3
    /// - Triangle indices are within bounds
    /// - No degenerate triangles (repeated vertex indices)
    pub fn validate(&self) -> DrapeResult<()> {
        self.check_channels()?;
        validate_indices(&self.indices, self.vertex_count())?;

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(DrapeError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        Ok(())
    }

    fn check_channels(&self) -> DrapeResult<()> {
        let n = self.pos_x.len();
        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(DrapeError::InvalidMesh(format!(
                "Position arrays have inconsistent lengths (x: {}, y: {}, z: {})",
                n,
                self.pos_y.len(),
                self.pos_z.len()
            )));
        }
        Ok(())
    }

    /// Constructs a mesh from interleaved AoS position data.
    ///
    /// Converts `[x0, y0, z0, x1, y1, z1, ...]` to SoA layout, the shape
    /// most host vertex buffers hand over.
    pub fn from_interleaved(positions: &[f32], indices: &[u32]) -> DrapeResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(DrapeError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);

        for p in positions.chunks_exact(3) {
            mesh.pos_x.push(p[0]);
            mesh.pos_y.push(p[1]);
            mesh.pos_z.push(p[2]);
        }
        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }

    /// Constructs a mesh from `Vec3` positions and a flat index list.
    pub fn from_positions(positions: &[Vec3], indices: &[u32]) -> DrapeResult<Self> {
        let mut mesh = Self::with_capacity(positions.len(), indices.len() / 3);
        for p in positions {
            mesh.pos_x.push(p.x);
            mesh.pos_y.push(p.y);
            mesh.pos_z.push(p.z);
        }
        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }
}

/// Checks that a flat triangle index list is well formed for `vertex_count`
/// vertices: a multiple of 3 long, and every index in range.
pub fn validate_indices(indices: &[u32], vertex_count: usize) -> DrapeResult<()> {
    if indices.len() % 3 != 0 {
        return Err(DrapeError::InvalidMesh(format!(
            "Index count ({}) is not divisible by 3",
            indices.len()
        )));
    }

    for (i, &idx) in indices.iter().enumerate() {
        if idx as usize >= vertex_count {
            return Err(DrapeError::InvalidMesh(format!(
                "Index {} at position {} is out of range (vertex count: {})",
                idx, i, vertex_count
            )));
        }
    }

    Ok(())
}
