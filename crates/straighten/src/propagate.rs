//! Propagation of the loop's flatten deltas to the rest of the mesh.
//!
//! Every candidate vertex blends the deltas of its K nearest loop vertices
//! (by pre-flatten world position), weighted by the falloff. Planning only
//! reads the mesh; the plan is written in a separate step.

use std::collections::HashMap;

use editmesh::{EditMesh, VertexId};
use glam::{Mat4, Vec3};
use straighten_config::WEIGHT_EPSILON;
use tracing::{debug, trace};

use crate::falloff::Falloff;
use crate::flatten::FlattenPlan;
use crate::island::IslandMask;
use crate::loop_select::EdgeLoop;
use crate::spatial::LoopKdTree;
use crate::weights::{modulation, VertexWeights};

/// Everything the propagation engine reads.
pub struct PropagationContext<'a> {
    /// Model to world transform
    pub world: Mat4,
    /// Loop vertices; never candidates
    pub edge_loop: &'a EdgeLoop,
    /// Staged loop deltas; tree slots index into its entries
    pub flatten: &'a FlattenPlan,
    /// K-d tree over the plan's before positions
    pub tree: &'a LoopKdTree,
    pub falloff: Falloff,
    /// Restricts candidates when present
    pub island: Option<&'a IslandMask>,
    pub strength: f32,
    pub k_nearest: usize,
    /// World component zeroed in the blended delta
    pub locked_component: Option<usize>,
    pub weights: Option<&'a dyn VertexWeights>,
}

/// One planned vertex displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMove {
    pub vertex: VertexId,
    pub world_before: Vec3,
    /// World-space offset after strength, modulation and axis lock
    pub offset: Vec3,
}

/// Staged propagation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationPlan {
    /// Planned moves in ascending vertex order
    pub moves: Vec<VertexMove>,
    /// Largest offset length among the moves
    pub max_shift: f32,
}

impl PropagationPlan {
    /// Compute the offset of every candidate vertex.
    pub fn compute(mesh: &EditMesh, ctx: &PropagationContext<'_>) -> Self {
        trace!("PropagationPlan::compute: START");

        let mut plan = Self::default();
        if ctx.tree.is_empty() || ctx.k_nearest == 0 {
            trace!("PropagationPlan::compute: END (nothing to sample)");
            return plan;
        }

        let mut skipped_by_island = 0usize;
        let mut skipped_by_weight = 0usize;

        for vertex in mesh.vertices() {
            let id = vertex.id;
            if ctx.edge_loop.contains_vertex(id) {
                continue;
            }
            if let Some(island) = ctx.island {
                if !island.contains(id) {
                    skipped_by_island += 1;
                    continue;
                }
            }

            let world_before = ctx.world.transform_point3(vertex.position);
            let Some(offset) = blended_offset(ctx, world_before) else {
                skipped_by_weight += 1;
                continue;
            };

            let mut offset = offset * ctx.strength;
            if let Some(weights) = ctx.weights {
                offset *= modulation(weights, id);
            }
            if let Some(component) = ctx.locked_component {
                offset[component] = 0.0;
            }

            plan.max_shift = plan.max_shift.max(offset.length());
            plan.moves.push(VertexMove {
                vertex: id,
                world_before,
                offset,
            });
        }

        debug!(
            "PropagationPlan: {} vertices affected, {} outside island, {} without weight, max shift {:.6}",
            plan.moves.len(),
            skipped_by_island,
            skipped_by_weight,
            plan.max_shift
        );
        trace!("PropagationPlan::compute: END");
        plan
    }

    /// Write the planned positions.
    ///
    /// Returns the original model-space positions of the written vertices.
    pub fn apply(&self, mesh: &mut EditMesh, inverse_world: &Mat4) -> HashMap<VertexId, Vec3> {
        let mut original_positions = HashMap::with_capacity(self.moves.len());
        for m in &self.moves {
            let Some(original) = mesh.position(m.vertex) else {
                continue;
            };
            original_positions.insert(m.vertex, original);
            let new_world = m.world_before + m.offset;
            mesh.set_vertex_position(m.vertex, inverse_world.transform_point3(new_world));
        }
        original_positions
    }

    /// Number of vertices that receive a move
    pub fn affected_count(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Falloff-weighted mean of the nearest loop deltas, or `None` when the
/// total weight vanishes.
fn blended_offset(ctx: &PropagationContext<'_>, query: Vec3) -> Option<Vec3> {
    let mut weighted = Vec3::ZERO;
    let mut weight_sum = 0.0f32;

    for neighbor in ctx.tree.nearest(query, ctx.k_nearest) {
        let Some(entry) = ctx.flatten.entries.get(neighbor.slot) else {
            continue;
        };
        let w = ctx.falloff.weight(neighbor.distance);
        weighted += entry.delta * w;
        weight_sum += w;
    }

    (weight_sum > WEIGHT_EPSILON).then(|| weighted / weight_sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::falloff::{FalloffCurve, FalloffRadius};
    use crate::flatten::LoopDelta;
    use approx::assert_relative_eq;
    use editmesh::EdgeId;

    /// Loop along X at z = 0 (vertices 0..3) plus a parallel row at z = 1 (3..6).
    fn two_rows() -> EditMesh {
        let mut positions = Vec::new();
        for z in 0..2 {
            for x in 0..3 {
                positions.push(Vec3::new(x as f32, 0.0, z as f32));
            }
        }
        EditMesh::from_polygons(positions, &[vec![0, 1, 4, 3], vec![1, 2, 5, 4]]).unwrap()
    }

    fn row_loop() -> EdgeLoop {
        EdgeLoop {
            edges: vec![EdgeId(0), EdgeId(1)],
            vertices: vec![VertexId(0), VertexId(1), VertexId(2)],
            closed: false,
        }
    }

    /// A flatten plan with hand-picked deltas.
    fn synthetic_plan(mesh: &EditMesh, deltas: [Vec3; 3]) -> FlattenPlan {
        let entries = (0..3)
            .map(|i| LoopDelta {
                vertex: VertexId(i),
                before: mesh.position(VertexId(i)).unwrap(),
                delta: deltas[i as usize],
            })
            .collect();
        FlattenPlan {
            axis: straighten_config::Axis::X,
            centroid: Vec3::new(1.0, 0.0, 0.0),
            targets: [0.0, 0.0],
            entries,
        }
    }

    fn context<'a>(
        edge_loop: &'a EdgeLoop,
        flatten: &'a FlattenPlan,
        tree: &'a LoopKdTree,
        radius: FalloffRadius,
    ) -> PropagationContext<'a> {
        PropagationContext {
            world: Mat4::IDENTITY,
            edge_loop,
            flatten,
            tree,
            falloff: Falloff::new(FalloffCurve::Smooth, radius),
            island: None,
            strength: 1.0,
            k_nearest: 1,
            locked_component: None,
            weights: None,
        }
    }

    #[test]
    fn test_single_neighbor_copies_delta() {
        let mesh = two_rows();
        let edge_loop = row_loop();
        let delta = Vec3::new(0.0, 0.3, 0.0);
        let flatten = synthetic_plan(&mesh, [delta, Vec3::ZERO, Vec3::ZERO]);
        let tree = LoopKdTree::from_vertices(flatten.before_positions());
        let ctx = context(&edge_loop, &flatten, &tree, FalloffRadius::Unbounded);

        let plan = PropagationPlan::compute(&mesh, &ctx);
        assert_eq!(plan.affected_count(), 3);
        // Vertex 3 sits above loop vertex 0
        let m = plan.moves.iter().find(|m| m.vertex == VertexId(3)).unwrap();
        assert_eq!(m.offset, delta);
        assert_relative_eq!(plan.max_shift, 0.3);
    }

    #[test]
    fn test_strength_scales_offsets() {
        let mesh = two_rows();
        let edge_loop = row_loop();
        let d = Vec3::new(0.0, 0.2, 0.0);
        let flatten = synthetic_plan(&mesh, [d, d, d]);
        let tree = LoopKdTree::from_vertices(flatten.before_positions());

        let mut ctx = context(&edge_loop, &flatten, &tree, FalloffRadius::Finite(2.0));
        ctx.strength = 0.4;
        let weak = PropagationPlan::compute(&mesh, &ctx);
        ctx.strength = 0.8;
        let strong = PropagationPlan::compute(&mesh, &ctx);

        for (a, b) in weak.moves.iter().zip(&strong.moves) {
            assert_eq!(a.vertex, b.vertex);
            assert_relative_eq!(b.offset.y, 2.0 * a.offset.y, epsilon = 1e-6);
        }
        assert_relative_eq!(strong.max_shift, 2.0 * weak.max_shift, epsilon = 1e-6);
    }

    #[test]
    fn test_locked_component_is_zeroed() {
        let mesh = two_rows();
        let edge_loop = row_loop();
        let d = Vec3::new(0.1, 0.5, -0.2);
        let flatten = synthetic_plan(&mesh, [d, d, d]);
        let tree = LoopKdTree::from_vertices(flatten.before_positions());

        let mut ctx = context(&edge_loop, &flatten, &tree, FalloffRadius::Unbounded);
        ctx.locked_component = Some(1);
        let plan = PropagationPlan::compute(&mesh, &ctx);

        for m in &plan.moves {
            assert_eq!(m.offset.y, 0.0);
            assert_relative_eq!(m.offset.x, 0.1);
            assert_relative_eq!(m.offset.z, -0.2);
        }
        assert_relative_eq!(plan.max_shift, Vec3::new(0.1, 0.0, -0.2).length());
    }

    #[test]
    fn test_out_of_radius_untouched() {
        let mesh = two_rows();
        let edge_loop = row_loop();
        let d = Vec3::new(0.0, 1.0, 0.0);
        let flatten = synthetic_plan(&mesh, [d, d, d]);
        let tree = LoopKdTree::from_vertices(flatten.before_positions());

        // Row at z = 1 is exactly one radius away: weight 0
        let ctx = context(&edge_loop, &flatten, &tree, FalloffRadius::Finite(1.0));
        let plan = PropagationPlan::compute(&mesh, &ctx);
        assert!(plan.is_empty());
        assert_eq!(plan.max_shift, 0.0);
    }

    #[test]
    fn test_zero_modulation_still_counts() {
        let mesh = two_rows();
        let edge_loop = row_loop();
        let d = Vec3::new(0.0, 1.0, 0.0);
        let flatten = synthetic_plan(&mesh, [d, d, d]);
        let tree = LoopKdTree::from_vertices(flatten.before_positions());
        let weights: HashMap<VertexId, f32> = [(VertexId(4), 0.5)].into();

        let mut ctx = context(&edge_loop, &flatten, &tree, FalloffRadius::Unbounded);
        ctx.weights = Some(&weights);
        let plan = PropagationPlan::compute(&mesh, &ctx);

        assert_eq!(plan.affected_count(), 3);
        let offsets: Vec<f32> = plan.moves.iter().map(|m| m.offset.y).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_island_restricts_candidates() {
        let mesh = two_rows();
        let edge_loop = row_loop();
        let d = Vec3::new(0.0, 1.0, 0.0);
        let flatten = synthetic_plan(&mesh, [d, d, d]);
        let tree = LoopKdTree::from_vertices(flatten.before_positions());
        let island = IslandMask::from_seeds(&mesh, &[VertexId(4)]);

        let mut ctx = context(&edge_loop, &flatten, &tree, FalloffRadius::Unbounded);
        // Whole mesh is one island
        ctx.island = Some(&island);
        assert_eq!(PropagationPlan::compute(&mesh, &ctx).affected_count(), 3);

        let lonely = EditMesh::from_edges(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0), Vec3::Z],
            &[[0, 1], [1, 2]],
        )
        .unwrap();
        let lonely_island = IslandMask::from_seeds(&lonely, &edge_loop.vertices);
        let lonely_flatten = synthetic_plan(&lonely, [d, d, d]);
        let lonely_tree = LoopKdTree::from_vertices(lonely_flatten.before_positions());
        let mut ctx = context(
            &edge_loop,
            &lonely_flatten,
            &lonely_tree,
            FalloffRadius::Unbounded,
        );
        ctx.island = Some(&lonely_island);
        assert!(PropagationPlan::compute(&lonely, &ctx).is_empty());
    }

    #[test]
    fn test_plan_is_repeatable_and_apply_writes() {
        let mut mesh = two_rows();
        let edge_loop = row_loop();
        let flatten = synthetic_plan(
            &mesh,
            [Vec3::Y, Vec3::new(0.0, -0.5, 0.0), Vec3::new(0.0, 0.25, 0.0)],
        );
        let tree = LoopKdTree::from_vertices(flatten.before_positions());
        let mut ctx = context(&edge_loop, &flatten, &tree, FalloffRadius::Finite(3.0));
        ctx.k_nearest = 3;

        let first = PropagationPlan::compute(&mesh, &ctx);
        let second = PropagationPlan::compute(&mesh, &ctx);
        assert_eq!(first, second);

        let originals = first.apply(&mut mesh, &Mat4::IDENTITY);
        assert_eq!(originals.len(), 3);
        for m in &first.moves {
            assert_eq!(mesh.position(m.vertex), Some(m.world_before + m.offset));
            assert_eq!(originals[&m.vertex], m.world_before);
        }
    }
}
