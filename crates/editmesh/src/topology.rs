//! Topology query methods for EditMesh.

use glam::{Mat4, Vec3};

use super::bounds::Aabb;
use super::construction::canonical_pair;
use super::types::{Edge, EdgeId, FaceId, Vertex, VertexId};
use super::EditMesh;

impl EditMesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    /// Get edge by ID
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Get all vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get all edges
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Model-space position of a vertex
    pub fn position(&self, id: VertexId) -> Option<Vec3> {
        self.vertex(id).map(|v| v.position)
    }

    /// Set a vertex position (model space). Unknown ids are ignored.
    pub fn set_vertex_position(&mut self, id: VertexId, position: Vec3) {
        if let Some(v) = self.vertices.get_mut(id.index()) {
            v.position = position;
        }
    }

    /// World-space position of a vertex under `world`
    pub fn world_position(&self, id: VertexId, world: &Mat4) -> Option<Vec3> {
        self.position(id).map(|p| world.transform_point3(p))
    }

    /// World-space bounding box of all vertices
    pub fn world_bounds(&self, world: &Mat4) -> Aabb {
        let mut bounds = Aabb::empty();
        for v in &self.vertices {
            bounds.include_point(world.transform_point3(v.position));
        }
        bounds
    }

    // ========================================================================
    // Topology Queries
    // ========================================================================

    /// Edges incident to a vertex
    pub fn vertex_edges(&self, id: VertexId) -> &[EdgeId] {
        self.vertex_edges
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Faces bordering an edge
    pub fn edge_faces(&self, id: EdgeId) -> &[FaceId] {
        self.edge_faces
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Vertices connected to `id` by an edge
    pub fn adjacent_vertices(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_edges(id)
            .iter()
            .filter_map(move |&e| self.edge(e).and_then(|edge| edge.other(id)))
    }

    /// Find the edge joining two vertices, in either direction
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_map.get(&canonical_pair(a, b)).copied()
    }

    /// Check whether two edges border a common face
    pub fn edges_share_face(&self, a: EdgeId, b: EdgeId) -> bool {
        let faces_b = self.edge_faces(b);
        self.edge_faces(a).iter().any(|f| faces_b.contains(f))
    }

    /// Check if an edge borders exactly one face
    pub fn is_boundary_edge(&self, id: EdgeId) -> bool {
        self.edge_faces(id).len() == 1
    }

    /// Check if an edge borders no face
    pub fn is_wire_edge(&self, id: EdgeId) -> bool {
        self.edge_faces(id).is_empty()
    }
}
