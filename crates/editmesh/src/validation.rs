//! Validation methods for EditMesh.
//!
//! Checks that the derived adjacency tables agree with the edge and face
//! lists. Construction always produces a valid mesh; validation guards meshes
//! whose positions were edited in place.

use super::types::MeshError;
use super::EditMesh;

impl EditMesh {
    /// Validate positions and topology.
    pub fn validate(&self) -> Result<(), MeshError> {
        for v in &self.vertices {
            if !v.position.is_finite() {
                return Err(MeshError::NonFinitePosition(v.id));
            }
        }

        if self.vertex_edges.len() != self.vertices.len() {
            return Err(MeshError::InvalidTopology(
                "Vertex adjacency table size mismatch".into(),
            ));
        }
        if self.edge_faces.len() != self.edges.len() {
            return Err(MeshError::InvalidTopology(
                "Edge face table size mismatch".into(),
            ));
        }

        for edge in &self.edges {
            let [a, b] = edge.vertices;
            if a == b {
                return Err(MeshError::DegenerateEdge(a));
            }
            for v in [a, b] {
                if self.vertex(v).is_none() {
                    return Err(MeshError::VertexOutOfRange {
                        index: v.0,
                        count: self.vertices.len(),
                    });
                }
                if !self.vertex_edges(v).contains(&edge.id) {
                    return Err(MeshError::InvalidTopology(format!(
                        "{:?} missing from adjacency of {:?}",
                        edge.id, v
                    )));
                }
            }
            if self.find_edge(a, b) != Some(edge.id) {
                return Err(MeshError::InvalidTopology(format!(
                    "{:?} missing from edge map",
                    edge.id
                )));
            }
        }

        for face in &self.faces {
            if face.vertices.len() < 3 || face.vertices.len() != face.edges.len() {
                return Err(MeshError::FaceTooSmall {
                    index: face.id.index(),
                    count: face.vertices.len(),
                });
            }
            for (i, &edge_id) in face.edges.iter().enumerate() {
                let a = face.vertices[i];
                let b = face.vertices[(i + 1) % face.vertices.len()];
                if self.find_edge(a, b) != Some(edge_id) {
                    return Err(MeshError::InvalidTopology(format!(
                        "{:?} edge {} does not join {:?} and {:?}",
                        face.id, i, a, b
                    )));
                }
                if !self.edge_faces(edge_id).contains(&face.id) {
                    return Err(MeshError::InvalidTopology(format!(
                        "{:?} missing from faces of {:?}",
                        face.id, edge_id
                    )));
                }
            }
        }

        Ok(())
    }
}
