//! Edge loop extraction from an edge selection.
//!
//! Two strategies:
//! - a single selected edge is expanded into its loop by walking the topology;
//! - a multi-edge selection is taken verbatim as the user's loop.

use std::collections::HashSet;

use editmesh::{EdgeId, EditMesh, VertexId};
use tracing::{debug, trace};

use crate::error::SelectionError;

/// The loop an operation acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLoop {
    /// Loop edges; walk order for an expanded loop, selection order otherwise
    pub edges: Vec<EdgeId>,
    /// Vertices touched by the loop edges, sorted and unique
    pub vertices: Vec<VertexId>,
    /// The walk returned to the seed edge
    pub closed: bool,
}

impl EdgeLoop {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.binary_search(&vertex).is_ok()
    }
}

/// Determine the loop for a selection.
pub fn extract_loop(mesh: &EditMesh, selected: &[EdgeId]) -> Result<EdgeLoop, SelectionError> {
    if selected.is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut seen = HashSet::new();
    let mut edges = Vec::with_capacity(selected.len());
    for &edge_id in selected {
        if mesh.edge(edge_id).is_none() {
            return Err(SelectionError::UnknownEdge(edge_id));
        }
        if seen.insert(edge_id) {
            edges.push(edge_id);
        }
    }

    let single_seed = (edges.len() == 1).then(|| edges[0]);
    let (edges, closed) = if let Some(seed) = single_seed {
        walk_loop(mesh, seed)
    } else {
        debug!("extract_loop: using {} selected edges verbatim", edges.len());
        (edges, false)
    };

    let mut vertices: Vec<VertexId> = edges
        .iter()
        .filter_map(|&e| mesh.edge(e))
        .flat_map(|edge| edge.vertices)
        .collect();
    vertices.sort_unstable();
    vertices.dedup();

    if vertices.len() < 2 {
        return Err(SelectionError::TooFewVertices(vertices.len()));
    }

    debug!(
        "extract_loop: {} edges, {} vertices, closed={}",
        edges.len(),
        vertices.len(),
        closed
    );

    Ok(EdgeLoop {
        edges,
        vertices,
        closed,
    })
}

/// Expand a seed edge in both directions.
fn walk_loop(mesh: &EditMesh, seed: EdgeId) -> (Vec<EdgeId>, bool) {
    let Some(edge) = mesh.edge(seed) else {
        return (vec![seed], false);
    };
    let [start, end] = edge.vertices;

    let mut visited = HashSet::from([seed]);
    let (forward, closed) = walk_direction(mesh, seed, end, &mut visited);
    if closed {
        let mut edges = vec![seed];
        edges.extend(forward);
        return (edges, true);
    }

    let (backward, _) = walk_direction(mesh, seed, start, &mut visited);
    let mut edges: Vec<EdgeId> = backward.into_iter().rev().collect();
    edges.push(seed);
    edges.extend(forward);
    (edges, false)
}

/// Walk from `seed` through `vertex` until the loop ends or closes.
///
/// Returns the edges found and whether the walk arrived back at the seed.
fn walk_direction(
    mesh: &EditMesh,
    seed: EdgeId,
    mut vertex: VertexId,
    visited: &mut HashSet<EdgeId>,
) -> (Vec<EdgeId>, bool) {
    let mut edges = Vec::new();
    let mut current = seed;

    while let Some(next) = next_loop_edge(mesh, current, vertex) {
        if next == seed {
            return (edges, true);
        }
        if !visited.insert(next) {
            trace!("walk_direction: {:?} already in loop, stopping", next);
            break;
        }
        edges.push(next);

        let Some(other) = mesh.edge(next).and_then(|e| e.other(vertex)) else {
            break;
        };
        vertex = other;
        current = next;
    }

    (edges, false)
}

/// The unambiguous continuation of `incoming` through vertex `at`, if any.
///
/// - Two edges at the vertex: continue on the other one.
/// - Four edges with faces: continue on the single edge sharing no face
///   with `incoming` (the opposite edge of a quad fan).
/// - Three edges on a boundary: continue on the other boundary edge.
pub fn next_loop_edge(mesh: &EditMesh, incoming: EdgeId, at: VertexId) -> Option<EdgeId> {
    let incident = mesh.vertex_edges(at);
    if !incident.contains(&incoming) {
        return None;
    }
    let mut others = incident.iter().copied().filter(|&e| e != incoming);

    match incident.len() {
        2 => others.next(),
        3 if mesh.is_boundary_edge(incoming) => {
            single(others.filter(|&e| mesh.is_boundary_edge(e)))
        }
        4 if !mesh.is_wire_edge(incoming) => {
            single(others.filter(|&e| !mesh.edges_share_face(incoming, e)))
        }
        _ => None,
    }
}

fn single(mut candidates: impl Iterator<Item = EdgeId>) -> Option<EdgeId> {
    let first = candidates.next()?;
    candidates.next().is_none().then_some(first)
}
