//! Procedural mesh generators for tests, demos, and the CLI.
//!
//! These generators produce deterministic, resolution-configurable meshes
//! with consistent winding order.

use crate::mesh::TriangleMesh;

/// Generates a flat rectangular quad grid in the XY plane.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y,
/// centered at the origin at Z=0. Vertex rows run top to bottom, so the
/// first `cols + 1` vertices form the top edge.
///
/// # Arguments
/// - `cols` — Number of quads along X (vertex count = cols + 1).
/// - `rows` — Number of quads along Y (vertex count = rows + 1).
/// - `width` — Total width in meters.
/// - `height` — Total height in meters.
///
/// # Example
/// ```
/// use drape_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);  // 3×3 vertices
/// assert_eq!(mesh.triangle_count(), 8); // 2×2 quads × 2 tris each
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: f32, height: f32) -> TriangleMesh {
    let verts_x = cols + 1;
    let verts_y = rows + 1;
    let vertex_count = verts_x * verts_y;
    let tri_count = cols * rows * 2;

    let mut mesh = TriangleMesh::with_capacity(vertex_count, tri_count);

    let half_w = width / 2.0;
    let half_h = height / 2.0;

    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = if cols == 0 { 0.0 } else { i as f32 / cols as f32 };
            let v = if rows == 0 { 0.0 } else { j as f32 / rows as f32 };

            mesh.pos_x.push(-half_w + u * width);
            mesh.pos_y.push(half_h - v * height); // Top to bottom
            mesh.pos_z.push(0.0);
        }
    }

    // Two triangles per quad
    for j in 0..rows {
        for i in 0..cols {
            let top_left = (j * verts_x + i) as u32;
            let top_right = top_left + 1;
            let bot_left = top_left + verts_x as u32;
            let bot_right = bot_left + 1;

            mesh.indices.extend_from_slice(&[top_left, bot_left, top_right]);
            mesh.indices.extend_from_slice(&[top_right, bot_left, bot_right]);
        }
    }

    mesh
}

/// A single right triangle in the XY plane with unit legs.
pub fn single_triangle() -> TriangleMesh {
    TriangleMesh {
        pos_x: vec![0.0, 1.0, 0.0],
        pos_y: vec![0.0, 0.0, 1.0],
        pos_z: vec![0.0, 0.0, 0.0],
        indices: vec![0, 1, 2],
    }
}

/// A unit square split along its `1–2` diagonal into two triangles.
///
/// Vertices: `0 = (0,0)`, `1 = (1,0)`, `2 = (0,1)`, `3 = (1,1)`.
/// The shared edge is `(1, 2)`; its wing vertices are `0` and `3`.
pub fn split_quad() -> TriangleMesh {
    TriangleMesh {
        pos_x: vec![0.0, 1.0, 0.0, 1.0],
        pos_y: vec![0.0, 0.0, 1.0, 1.0],
        pos_z: vec![0.0; 4],
        indices: vec![0, 1, 2, 1, 3, 2],
    }
}

/// Indices of the top row of vertices of a [`quad_grid`] with `cols` quads
/// per row. Handy as a pinning set for a hanging sheet.
pub fn top_row(cols: usize) -> Vec<u32> {
    (0..=cols as u32).collect()
}
