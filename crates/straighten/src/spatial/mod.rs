//! Spatial index over loop vertices.
//!
//! This module provides a balanced k-d tree for K-nearest loop vertex
//! queries during propagation.
//!
//! The tree is built once from a fixed point set and never updated.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use editmesh::VertexId;
use glam::Vec3;

/// A balanced k-d tree of loop vertex positions.
///
/// Each point keeps its vertex id and its slot (insertion index), so callers
/// can map query results back to per-vertex data stored in parallel arrays.
#[derive(Debug, Clone, Default)]
pub struct LoopKdTree {
    items: Vec<KdItem>,
    nodes: Vec<KdNode>,
    root: Option<u32>,
}

/// An item stored in the tree: vertex ID and position.
#[derive(Debug, Clone, Copy)]
struct KdItem {
    vertex_id: VertexId,
    position: Vec3,
}

#[derive(Debug, Clone, Copy)]
struct KdNode {
    /// Index into `items` (also the slot reported by queries)
    item: u32,
    axis: u8,
    left: Option<u32>,
    right: Option<u32>,
}

/// A query result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub vertex_id: VertexId,
    /// Insertion index of the point
    pub slot: usize,
    /// Euclidean distance to the query point
    pub distance: f32,
}

/// Heap entry ordered by squared distance, then by slot.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance_sq: f32,
    slot: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_sq
            .total_cmp(&other.distance_sq)
            .then(self.slot.cmp(&other.slot))
    }
}

impl LoopKdTree {
    /// Build a balanced tree from vertex positions.
    ///
    /// Each level splits at the median along the axis of largest extent.
    pub fn from_vertices(vertices: impl IntoIterator<Item = (VertexId, Vec3)>) -> Self {
        let items: Vec<KdItem> = vertices
            .into_iter()
            .map(|(vertex_id, position)| KdItem {
                vertex_id,
                position,
            })
            .collect();

        let mut tree = Self {
            nodes: Vec::with_capacity(items.len()),
            items,
            root: None,
        };

        let mut order: Vec<u32> = (0..tree.items.len() as u32).collect();
        tree.root = tree.build(&mut order);
        tree
    }

    fn build(&mut self, order: &mut [u32]) -> Option<u32> {
        if order.is_empty() {
            return None;
        }

        let axis = self.split_axis(order);
        let mid = order.len() / 2;
        let items = &self.items;
        order.select_nth_unstable_by(mid, |&a, &b| {
            let pa = items[a as usize].position[axis];
            let pb = items[b as usize].position[axis];
            pa.total_cmp(&pb).then(a.cmp(&b))
        });

        let node_index = self.nodes.len() as u32;
        self.nodes.push(KdNode {
            item: order[mid],
            axis: axis as u8,
            left: None,
            right: None,
        });

        let (left, rest) = order.split_at_mut(mid);
        let left = self.build(left);
        let right = self.build(&mut rest[1..]);

        let node = &mut self.nodes[node_index as usize];
        node.left = left;
        node.right = right;
        Some(node_index)
    }

    /// Axis with the largest coordinate spread among the given items.
    fn split_axis(&self, order: &[u32]) -> usize {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for &i in order {
            let p = self.items[i as usize].position;
            min = min.min(p);
            max = max.max(p);
        }
        let extent = max - min;
        if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }

    /// Find up to `k` nearest points, ordered by ascending distance.
    ///
    /// Equal distances are ordered by insertion slot.
    pub fn nearest(&self, query: Vec3, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }
        let mut heap = BinaryHeap::with_capacity(k + 1);
        if let Some(root) = self.root {
            self.nearest_node(root, query, k, &mut heap);
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| self.neighbor(c))
            .collect()
    }

    fn nearest_node(
        &self,
        node_index: u32,
        query: Vec3,
        k: usize,
        heap: &mut BinaryHeap<Candidate>,
    ) {
        let node = self.nodes[node_index as usize];
        let item = self.items[node.item as usize];

        heap.push(Candidate {
            distance_sq: item.position.distance_squared(query),
            slot: node.item,
        });
        if heap.len() > k {
            heap.pop();
        }

        let axis = node.axis as usize;
        let diff = query[axis] - item.position[axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.nearest_node(near, query, k, heap);
        }
        if let Some(far) = far {
            // Visit ties too, so equal distances resolve by slot
            let worst = heap.peek().map_or(f32::INFINITY, |c| c.distance_sq);
            if heap.len() < k || diff * diff <= worst {
                self.nearest_node(far, query, k, heap);
            }
        }
    }

    fn neighbor(&self, candidate: Candidate) -> Neighbor {
        let item = self.items[candidate.slot as usize];
        Neighbor {
            vertex_id: item.vertex_id,
            slot: candidate.slot as usize,
            distance: candidate.distance_sq.sqrt(),
        }
    }

    /// Get the total number of points in the tree.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Depth of the deepest leaf (0 for an empty tree).
    pub fn depth(&self) -> usize {
        fn node_depth(tree: &LoopKdTree, node: Option<u32>) -> usize {
            match node {
                None => 0,
                Some(i) => {
                    let n = tree.nodes[i as usize];
                    1 + node_depth(tree, n.left).max(node_depth(tree, n.right))
                }
            }
        }
        node_depth(self, self.root)
    }
}
