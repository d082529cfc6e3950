//! Axis flattening of the loop vertices.
//!
//! The loop is forced onto a line along the kept axis: the two other world
//! components of every loop vertex are replaced by a common target. All
//! deltas are staged in a [`FlattenPlan`] before anything is written.

use std::collections::HashMap;

use editmesh::{EditMesh, VertexId};
use glam::{Mat4, Vec3};
use straighten_config::{Axis, StraightenParams};
use tracing::{debug, trace};

/// One loop vertex's displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopDelta {
    pub vertex: VertexId,
    /// World position before flattening
    pub before: Vec3,
    /// World displacement applied by flattening
    pub delta: Vec3,
}

impl LoopDelta {
    /// World position after flattening, exactly `before + delta`
    pub fn after(&self) -> Vec3 {
        self.before + self.delta
    }
}

/// Staged flattening of a loop.
#[derive(Debug, Clone)]
pub struct FlattenPlan {
    pub axis: Axis,
    /// World-space mean of the loop vertices
    pub centroid: Vec3,
    /// Target values of the two flattened components
    pub targets: [f32; 2],
    /// One entry per loop vertex, in loop vertex order
    pub entries: Vec<LoopDelta>,
}

impl FlattenPlan {
    /// Compute deltas for every loop vertex without touching the mesh.
    ///
    /// Vertices unknown to the mesh are skipped.
    pub fn compute(
        mesh: &EditMesh,
        world: &Mat4,
        loop_vertices: &[VertexId],
        params: &StraightenParams,
    ) -> Self {
        let world_positions: Vec<(VertexId, Vec3)> = loop_vertices
            .iter()
            .filter_map(|&v| mesh.world_position(v, world).map(|p| (v, p)))
            .collect();

        let centroid = if world_positions.is_empty() {
            Vec3::ZERO
        } else {
            world_positions.iter().map(|(_, p)| *p).sum::<Vec3>() / world_positions.len() as f32
        };

        let flat = params.axis.flattened();
        let targets = if params.flatten_to_zero {
            [0.0, 0.0]
        } else {
            [centroid[flat[0]], centroid[flat[1]]]
        };

        let entries = world_positions
            .into_iter()
            .map(|(vertex, before)| {
                let mut flattened = before;
                flattened[flat[0]] = targets[0];
                flattened[flat[1]] = targets[1];
                LoopDelta {
                    vertex,
                    before,
                    delta: flattened - before,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "FlattenPlan: {} loop vertices, axis={:?}, centroid={:?}, targets={:?}",
            entries.len(),
            params.axis,
            centroid,
            targets
        );

        Self {
            axis: params.axis,
            centroid,
            targets,
            entries,
        }
    }

    /// Write flattened positions into the mesh.
    ///
    /// Returns the original model-space positions of the written vertices.
    pub fn apply(&self, mesh: &mut EditMesh, inverse_world: &Mat4) -> HashMap<VertexId, Vec3> {
        let mut original_positions = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(original) = mesh.position(entry.vertex) else {
                continue;
            };
            original_positions.insert(entry.vertex, original);
            mesh.set_vertex_position(entry.vertex, inverse_world.transform_point3(entry.after()));
        }
        trace!("FlattenPlan::apply: wrote {} vertices", original_positions.len());
        original_positions
    }

    /// Pre-flatten world positions, for building the spatial index
    pub fn before_positions(&self) -> impl Iterator<Item = (VertexId, Vec3)> + '_ {
        self.entries.iter().map(|e| (e.vertex, e.before))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
