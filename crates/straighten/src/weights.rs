//! Per-vertex modulation weights supplied by the host.

use std::collections::HashMap;

use editmesh::{VertexGroup, VertexId};

/// Source of per-vertex modulation weights in [0, 1].
///
/// `None` means the vertex has no weight; the propagation engine treats it
/// as 0.
pub trait VertexWeights {
    fn weight(&self, vertex: VertexId) -> Option<f32>;
}

impl VertexWeights for VertexGroup {
    fn weight(&self, vertex: VertexId) -> Option<f32> {
        self.get(vertex)
    }
}

impl VertexWeights for HashMap<VertexId, f32> {
    fn weight(&self, vertex: VertexId) -> Option<f32> {
        self.get(&vertex).map(|w| w.clamp(0.0, 1.0))
    }
}

/// Weight used as a multiplier, in [0, 1].
///
/// Unset and non-finite weights contribute nothing.
pub(crate) fn modulation(weights: &dyn VertexWeights, vertex: VertexId) -> f32 {
    match weights.weight(vertex) {
        Some(w) if w.is_finite() => w.clamp(0.0, 1.0),
        _ => 0.0,
    }
}
