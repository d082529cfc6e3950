//! Type definitions for the edit mesh.

use glam::Vec3;

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Type-safe edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A vertex in the edit mesh
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    /// Model-space position
    pub position: Vec3,
}

/// An undirected edge between two vertices
///
/// Endpoints are stored with the lower vertex id first.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub vertices: [VertexId; 2],
}

impl Edge {
    /// The endpoint opposite `vertex`, or None if `vertex` is not on this edge
    pub fn other(&self, vertex: VertexId) -> Option<VertexId> {
        if self.vertices[0] == vertex {
            Some(self.vertices[1])
        } else if self.vertices[1] == vertex {
            Some(self.vertices[0])
        } else {
            None
        }
    }
}

/// A polygon face
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// Vertices in winding order
    pub vertices: Vec<VertexId>,
    /// Boundary edges in winding order (edge i joins vertex i and i + 1)
    pub edges: Vec<EdgeId>,
}

/// Errors that can occur while building or validating an edit mesh
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("Vertex index {index} out of range ({count} vertices)")]
    VertexOutOfRange { index: u32, count: usize },
    #[error("Degenerate edge: both endpoints are {0:?}")]
    DegenerateEdge(VertexId),
    #[error("Face {index} has {count} vertices, at least 3 are required")]
    FaceTooSmall { index: usize, count: usize },
    #[error("Non-finite position at {0:?}")]
    NonFinitePosition(VertexId),
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),
}
