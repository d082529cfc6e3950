//! Summary statistics and undo data for one invocation.

use std::collections::HashMap;
use std::fmt;

use editmesh::{EditMesh, VertexId};
use glam::Vec3;
use serde::Serialize;

use crate::error::StraightenWarning;
use crate::falloff::FalloffRadius;

/// What the operation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StraightenReport {
    /// Number of loop vertices flattened
    pub loop_count: usize,
    /// Number of non-loop vertices that received a propagated delta
    pub affected_count: usize,
    /// Largest propagated offset length (loop deltas excluded)
    pub max_shift: f32,
    /// Radius the falloff was evaluated with
    pub radius: FalloffRadius,
    pub warnings: Vec<StraightenWarning>,
}

impl fmt::Display for StraightenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loop: {} | Propagated: {} | Max shift: {:.6}",
            self.loop_count, self.affected_count, self.max_shift
        )
    }
}

/// Original model-space positions of every vertex an invocation wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSnapshot {
    positions: HashMap<VertexId, Vec3>,
}

impl PositionSnapshot {
    /// Merge positions, keeping the first recorded value for each vertex.
    pub fn record(&mut self, positions: HashMap<VertexId, Vec3>) {
        for (id, position) in positions {
            self.positions.entry(id).or_insert(position);
        }
    }

    pub fn get(&self, vertex: VertexId) -> Option<Vec3> {
        self.positions.get(&vertex).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Write the recorded positions back into the mesh.
    pub fn restore(&self, mesh: &mut EditMesh) {
        for (&id, &position) in &self.positions {
            mesh.set_vertex_position(id, position);
        }
    }
}
