//! Island restriction for propagation.
//!
//! An island is a connected component under edge adjacency. When enabled,
//! only vertices on the same island as the loop receive propagated deltas.

use std::collections::VecDeque;

use editmesh::{EditMesh, VertexId};
use tracing::trace;

/// Vertices reachable from the loop through edges.
#[derive(Debug, Clone)]
pub struct IslandMask {
    reachable: Vec<bool>,
    count: usize,
}

impl IslandMask {
    /// Flood-fill from every seed vertex.
    pub fn from_seeds(mesh: &EditMesh, seeds: &[VertexId]) -> Self {
        let mut reachable = vec![false; mesh.vertex_count()];
        let mut queue: VecDeque<VertexId> = VecDeque::new();

        for &seed in seeds {
            if let Some(slot) = reachable.get_mut(seed.index()) {
                if !*slot {
                    *slot = true;
                    queue.push_back(seed);
                }
            }
        }

        let mut count = queue.len();
        while let Some(current) = queue.pop_front() {
            for neighbor in mesh.adjacent_vertices(current) {
                let slot = &mut reachable[neighbor.index()];
                if !*slot {
                    *slot = true;
                    count += 1;
                    queue.push_back(neighbor);
                }
            }
        }

        trace!(
            "IslandMask: {} of {} vertices reachable from {} seeds",
            count,
            mesh.vertex_count(),
            seeds.len()
        );

        Self { reachable, count }
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.reachable.get(vertex.index()).copied().unwrap_or(false)
    }

    /// Number of reachable vertices (seeds included)
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Two disjoint wire chains: 0-1-2 and 3-4.
    fn two_chains() -> EditMesh {
        let positions = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        EditMesh::from_edges(positions, &[[0, 1], [1, 2], [3, 4]]).unwrap()
    }

    #[test]
    fn test_island_flood_fill() {
        let mesh = two_chains();
        let mask = IslandMask::from_seeds(&mesh, &[VertexId(0)]);
        assert_eq!(mask.len(), 3);
        assert!(mask.contains(VertexId(2)));
        assert!(!mask.contains(VertexId(3)));
        assert!(!mask.contains(VertexId(4)));
        assert!(!mask.contains(VertexId(99)));
    }

    #[test]
    fn test_island_multiple_seeds() {
        let mesh = two_chains();
        let mask = IslandMask::from_seeds(&mesh, &[VertexId(1), VertexId(4), VertexId(1)]);
        assert_eq!(mask.len(), 5);
    }

    #[test]
    fn test_island_isolated_vertex() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = EditMesh::from_edges(positions, &[[0, 1]]).unwrap();
        let mask = IslandMask::from_seeds(&mesh, &[VertexId(0)]);
        assert!(mask.contains(VertexId(1)));
        assert!(!mask.contains(VertexId(2)));
        assert!(!mask.is_empty());
    }
}
