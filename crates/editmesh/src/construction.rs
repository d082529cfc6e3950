//! Construction methods for EditMesh.

use glam::Vec3;

use super::types::{Edge, EdgeId, Face, FaceId, MeshError, Vertex, VertexId};
use super::EditMesh;

impl EditMesh {
    /// Build a mesh from vertex positions and polygon index lists.
    ///
    /// Edges are derived from polygon boundaries and shared between
    /// neighboring polygons.
    pub fn from_polygons(positions: Vec<Vec3>, polygons: &[Vec<u32>]) -> Result<Self, MeshError> {
        Self::from_parts(positions, &[], polygons)
    }

    /// Build a wire mesh (no faces) from vertex positions and edge pairs.
    pub fn from_edges(positions: Vec<Vec3>, edges: &[[u32; 2]]) -> Result<Self, MeshError> {
        Self::from_parts(positions, edges, &[])
    }

    /// Build a mesh from positions, loose edges, and polygons.
    ///
    /// Explicit edges receive the lowest edge ids, in the given order; polygon
    /// edges that are not already present follow in first-seen order.
    /// Duplicate edges are merged.
    pub fn from_parts(
        positions: Vec<Vec3>,
        edges: &[[u32; 2]],
        polygons: &[Vec<u32>],
    ) -> Result<Self, MeshError> {
        let vertex_count = positions.len();

        let vertices: Vec<Vertex> = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| {
                let id = VertexId(i as u32);
                if position.is_finite() {
                    Ok(Vertex { id, position })
                } else {
                    Err(MeshError::NonFinitePosition(id))
                }
            })
            .collect::<Result<_, _>>()?;

        let mut mesh = Self {
            vertices,
            vertex_edges: vec![Vec::new(); vertex_count],
            ..Default::default()
        };

        for &[a, b] in edges {
            let a = mesh.checked_vertex(a)?;
            let b = mesh.checked_vertex(b)?;
            mesh.insert_edge(a, b)?;
        }

        for (index, polygon) in polygons.iter().enumerate() {
            if polygon.len() < 3 {
                return Err(MeshError::FaceTooSmall {
                    index,
                    count: polygon.len(),
                });
            }

            let face_vertices: Vec<VertexId> = polygon
                .iter()
                .map(|&i| mesh.checked_vertex(i))
                .collect::<Result<_, _>>()?;

            let face_id = FaceId(mesh.faces.len() as u32);
            let mut face_edges = Vec::with_capacity(face_vertices.len());
            for (i, &a) in face_vertices.iter().enumerate() {
                let b = face_vertices[(i + 1) % face_vertices.len()];
                let edge_id = mesh.insert_edge(a, b)?;
                if !mesh.edge_faces[edge_id.index()].contains(&face_id) {
                    mesh.edge_faces[edge_id.index()].push(face_id);
                }
                face_edges.push(edge_id);
            }

            mesh.faces.push(Face {
                id: face_id,
                vertices: face_vertices,
                edges: face_edges,
            });
        }

        tracing::debug!(
            "EditMesh: built {} vertices, {} edges, {} faces",
            mesh.vertices.len(),
            mesh.edges.len(),
            mesh.faces.len()
        );

        Ok(mesh)
    }

    fn checked_vertex(&self, index: u32) -> Result<VertexId, MeshError> {
        if (index as usize) < self.vertices.len() {
            Ok(VertexId(index))
        } else {
            Err(MeshError::VertexOutOfRange {
                index,
                count: self.vertices.len(),
            })
        }
    }

    /// Insert an edge, returning the existing id if the pair is already present.
    fn insert_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, MeshError> {
        if a == b {
            return Err(MeshError::DegenerateEdge(a));
        }
        let key = canonical_pair(a, b);
        if let Some(&existing) = self.edge_map.get(&key) {
            return Ok(existing);
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            vertices: [key.0, key.1],
        });
        self.edge_faces.push(Vec::new());
        self.vertex_edges[key.0.index()].push(id);
        self.vertex_edges[key.1.index()].push(id);
        self.edge_map.insert(key, id);
        Ok(id)
    }
}

/// Order a vertex pair the way edge endpoints are stored.
pub(crate) fn canonical_pair(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_from_polygons_shares_edges() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 1.0),
        ];
        let mesh =
            EditMesh::from_polygons(positions, &[vec![0, 1, 4, 3], vec![1, 2, 5, 4]]).unwrap();
        assert_eq!(mesh.edge_count(), 7);

        let shared = mesh.find_edge(VertexId(1), VertexId(4)).unwrap();
        assert_eq!(mesh.edge_faces(shared).len(), 2);
        assert!(!mesh.is_boundary_edge(shared));
    }

    #[test]
    fn test_from_edges_wire() {
        let mesh = EditMesh::from_edges(square(), &[[0, 1], [1, 2], [2, 3], [1, 0]]).unwrap();
        assert_eq!(mesh.edge_count(), 3);
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.vertex_edges(VertexId(1)).len(), 2);
    }

    #[test]
    fn test_explicit_edges_come_first() {
        let mesh = EditMesh::from_parts(square(), &[[2, 3]], &[vec![0, 1, 2, 3]]).unwrap();
        assert_eq!(mesh.find_edge(VertexId(3), VertexId(2)), Some(EdgeId(0)));
        assert_eq!(mesh.edge_count(), 4);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            EditMesh::from_edges(square(), &[[0, 7]]),
            Err(MeshError::VertexOutOfRange { index: 7, count: 4 })
        ));
        assert!(matches!(
            EditMesh::from_edges(square(), &[[2, 2]]),
            Err(MeshError::DegenerateEdge(VertexId(2)))
        ));
        assert!(matches!(
            EditMesh::from_polygons(square(), &[vec![0, 1]]),
            Err(MeshError::FaceTooSmall { index: 0, count: 2 })
        ));

        let mut positions = square();
        positions[1].y = f32::NAN;
        assert!(matches!(
            EditMesh::from_edges(positions, &[]),
            Err(MeshError::NonFinitePosition(VertexId(1)))
        ));
    }

    #[test]
    fn test_canonical_pair() {
        assert_eq!(
            canonical_pair(VertexId(5), VertexId(2)),
            (VertexId(2), VertexId(5))
        );
    }
}
