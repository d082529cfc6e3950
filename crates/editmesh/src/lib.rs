//! Edit mesh data structure for loop operations
//!
//! Provides the topology information (vertex-edge adjacency, edge-face
//! adjacency, edge loops, islands) that a plain position buffer lacks.
//! Faces are optional: a mesh built from edges alone is a wire mesh and
//! still supports neighbor iteration and flood fill.

mod bounds;
mod construction;
mod groups;
mod topology;
mod types;
mod validation;

use std::collections::HashMap;

pub use bounds::Aabb;
pub use groups::VertexGroup;
pub use types::{Edge, EdgeId, Face, FaceId, MeshError, Vertex, VertexId};

/// Editable polygon mesh
///
/// Topology is fixed after construction; only vertex positions change.
#[derive(Debug, Clone, Default)]
pub struct EditMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    /// Map from ordered (lo, hi) vertex pair to edge
    pub(crate) edge_map: HashMap<(VertexId, VertexId), EdgeId>,
    /// Edges incident to each vertex, indexed by vertex
    pub(crate) vertex_edges: Vec<Vec<EdgeId>>,
    /// Faces bordering each edge, indexed by edge
    pub(crate) edge_faces: Vec<Vec<FaceId>>,
    /// Named per-vertex weight maps
    pub(crate) groups: HashMap<String, VertexGroup>,
}

#[cfg(test)]
pub(crate) mod test_meshes {
    use super::*;
    use glam::Vec3;

    /// Quad grid in the XZ plane with `cols` x `rows` vertices and unit spacing.
    ///
    /// Vertex (col, row) has index `row * cols + col`.
    pub fn grid(cols: u32, rows: u32) -> EditMesh {
        let mut positions = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                positions.push(Vec3::new(col as f32, 0.0, row as f32));
            }
        }
        let mut polygons = Vec::new();
        for row in 0..rows - 1 {
            for col in 0..cols - 1 {
                let i = row * cols + col;
                polygons.push(vec![i, i + 1, i + cols + 1, i + cols]);
            }
        }
        EditMesh::from_polygons(positions, &polygons).unwrap()
    }
}
