//! Error and warning types for the straighten operation.

use std::fmt;

use editmesh::{EdgeId, MeshError};
use serde::Serialize;

/// Errors in the edge selection handed to the operation.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("No edges selected")]
    Empty,
    #[error("Selected edge {0:?} does not exist")]
    UnknownEdge(EdgeId),
    #[error("Edge loop has {0} vertices, at least 2 are required")]
    TooFewVertices(usize),
}

/// Fatal errors. All of them are raised before the mesh is modified.
#[derive(Debug, thiserror::Error)]
pub enum StraightenError {
    #[error("Invalid context: {0}")]
    InvalidContext(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Non-fatal conditions reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StraightenWarning {
    /// The requested modulation group does not exist; modulation was skipped
    MissingWeightGroup(String),
    /// The mesh bounds have zero size, so the automatic radius resolved to 0
    DegenerateBounds,
}

impl fmt::Display for StraightenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StraightenWarning::MissingWeightGroup(name) => {
                write!(f, "Vertex group '{}' not found, modulation disabled", name)
            }
            StraightenWarning::DegenerateBounds => {
                write!(f, "Mesh bounds are degenerate, automatic radius is 0")
            }
        }
    }
}
