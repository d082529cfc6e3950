//! Named per-vertex weight groups.

use std::collections::HashMap;

use super::types::VertexId;
use super::EditMesh;

/// Sparse per-vertex weights in [0, 1], keyed by vertex.
///
/// Vertices that were never assigned have no weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexGroup {
    pub name: String,
    weights: HashMap<VertexId, f32>,
}

impl VertexGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: HashMap::new(),
        }
    }

    /// Assign a weight, clamped to [0, 1]. Non-finite weights are stored as 0.
    pub fn set(&mut self, vertex: VertexId, weight: f32) {
        let weight = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.weights.insert(vertex, weight);
    }

    /// Weight of a vertex, if it was assigned
    pub fn get(&self, vertex: VertexId) -> Option<f32> {
        self.weights.get(&vertex).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl EditMesh {
    /// Get a vertex group by name
    pub fn vertex_group(&self, name: &str) -> Option<&VertexGroup> {
        self.groups.get(name)
    }

    /// Get or create a vertex group by name
    pub fn vertex_group_mut(&mut self, name: &str) -> &mut VertexGroup {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| VertexGroup::new(name))
    }
}
