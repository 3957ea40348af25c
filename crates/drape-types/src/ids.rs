//! Strongly-typed handles into the simulation arenas.
//!
//! Springs refer to their endpoints by [`NodeId`] rather than by reference,
//! so the node arena stays the single owner of all particle state.

use serde::{Deserialize, Serialize};

/// Index into the node (particle) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Index into the spring list, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpringId(pub u32);

impl NodeId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl SpringId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for SpringId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
