//! Edge registry used while scanning triangles.
//!
//! Every undirected vertex pair is keyed by `(min, max)` so `(a, b)` and
//! `(b, a)` land on the same record. The first triangle to produce an edge
//! stores its opposite ("wing") vertex; later triangles read it back to
//! connect the two wings across the shared edge.

use std::collections::HashMap;

/// Canonical key of an undirected edge: `lo < hi` for any non-degenerate edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub lo: u32,
    pub hi: u32,
}

impl EdgeKey {
    /// Builds the canonical key for the pair, independent of argument order.
    #[inline]
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }
}

/// Bookkeeping for one registered edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    /// Opposite vertex of the triangle that first produced this edge.
    pub other_vertex: u32,
    /// Number of triangles seen using this edge so far.
    pub occurrences: u32,
}

/// Outcome of visiting an edge from a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeVisit {
    /// The edge had never been seen; it is now registered.
    First,
    /// Second triangle on this edge. Carries the first triangle's wing vertex.
    Shared { other_vertex: u32 },
    /// Third or later triangle on this edge (non-manifold).
    NonManifold { occurrences: u32 },
}

/// Deduplicating edge map, keyed by ordered vertex pair.
#[derive(Debug, Default)]
pub struct EdgeRegistry {
    edges: HashMap<EdgeKey, EdgeRecord>,
}

impl EdgeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry sized for roughly `triangle_count` triangles.
    ///
    /// A closed manifold has about 1.5 edges per triangle.
    pub fn with_triangle_capacity(triangle_count: usize) -> Self {
        Self {
            edges: HashMap::with_capacity(triangle_count * 3 / 2 + 1),
        }
    }

    /// Records that a triangle uses edge `(a, b)` with wing vertex `opposite`.
    ///
    /// Only the first visit stores `opposite`; later visits leave the
    /// stored wing untouched and only bump the occurrence count.
    pub fn visit(&mut self, a: u32, b: u32, opposite: u32) -> EdgeVisit {
        let record = self
            .edges
            .entry(EdgeKey::new(a, b))
            .or_insert(EdgeRecord {
                other_vertex: opposite,
                occurrences: 0,
            });
        record.occurrences += 1;

        match record.occurrences {
            1 => EdgeVisit::First,
            2 => EdgeVisit::Shared {
                other_vertex: record.other_vertex,
            },
            n => EdgeVisit::NonManifold { occurrences: n },
        }
    }

    /// Looks up the record for edge `(a, b)` in either orientation.
    pub fn get(&self, a: u32, b: u32) -> Option<&EdgeRecord> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Number of distinct edges registered.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if no edge has been registered.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of edges used by exactly one triangle.
    pub fn boundary_edge_count(&self) -> usize {
        self.edges.values().filter(|r| r.occurrences == 1).count()
    }

    /// Number of edges used by more than two triangles.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edges.values().filter(|r| r.occurrences > 2).count()
    }
}
