//! Edge loop straightening with falloff-based propagation.
//!
//! This crate flattens a selected edge loop onto a line along one principal
//! axis, then carries the resulting displacement into the surrounding mesh:
//! - Loop extraction from a seed edge or a verbatim edge selection
//! - Axis flattening to the loop centroid (or to zero)
//! - K-nearest blending of loop deltas through a balanced k-d tree
//! - Linear or smoothstep falloff, strength, island and weight-group masks
//!
//! # Architecture
//!
//! Each phase is split into a read-only plan and a write step, so every
//! error is reported before the mesh changes and hosts can stop between
//! phases. [`straighten_and_propagate`] runs all phases in order and returns
//! a [`StraightenReport`] plus a [`PositionSnapshot`] for undo.
//!
//! ## Key Components
//!
//! - **Loop select**: seed-edge walking and selection validation
//! - **Flatten**: centroid and per-vertex loop deltas
//! - **Spatial**: k-d tree over the loop's pre-flatten positions
//! - **Falloff**: radius resolution and weight curves
//! - **Propagate**: blended deltas for the rest of the mesh
//! - **Pipeline**: orchestration, logging and reporting

pub mod error;
pub mod falloff;
pub mod flatten;
pub mod island;
pub mod loop_select;
pub mod pipeline;
pub mod propagate;
pub mod report;
pub mod spatial;
pub mod weights;

pub use error::{SelectionError, StraightenError, StraightenWarning};
pub use falloff::{smoothstep, Falloff, FalloffCurve, FalloffRadius};
pub use flatten::{FlattenPlan, LoopDelta};
pub use island::IslandMask;
pub use loop_select::{extract_loop, next_loop_edge, EdgeLoop};
pub use pipeline::{straighten_and_propagate, straighten_and_propagate_with, StraightenOutcome};
pub use propagate::{PropagationContext, PropagationPlan, VertexMove};
pub use report::{PositionSnapshot, StraightenReport};
pub use spatial::{LoopKdTree, Neighbor};
pub use weights::VertexWeights;

pub use straighten_config::{Axis, RadiusMode, StraightenParams};
