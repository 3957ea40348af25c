//! # drape-mesh
//!
//! Triangle mesh representation with Structure-of-Arrays (SoA) layout,
//! plus the edge bookkeeping used when a mesh is turned into a spring network.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`] — Positions in per-channel SoA buffers and a flat
//!   triangle index list. Also the write-back target for simulated positions.
//! - [`EdgeRegistry`] — Deduplicates undirected edges while scanning
//!   triangles and remembers each edge's first opposite vertex.
//! - Procedural generators for test and demo meshes (quad grids, strips).

pub mod edges;
pub mod generators;
pub mod mesh;

pub use edges::{EdgeKey, EdgeRegistry, EdgeVisit};
pub use mesh::TriangleMesh;
