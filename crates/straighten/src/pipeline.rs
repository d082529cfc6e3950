//! Straighten-and-propagate entry points.
//!
//! Orchestrates one invocation:
//! 1. Validate the context and extract the loop (no writes yet)
//! 2. Flatten the loop and write it
//! 3. Plan propagation from the loop's before positions and deltas
//! 4. Write the plan and report

use editmesh::{EdgeId, EditMesh};
use glam::Mat4;
use straighten_config::StraightenParams;
use tracing::{debug, info, trace, warn};

use crate::error::{StraightenError, StraightenWarning};
use crate::falloff::{Falloff, FalloffCurve, FalloffRadius};
use crate::flatten::FlattenPlan;
use crate::island::IslandMask;
use crate::loop_select::extract_loop;
use crate::propagate::{PropagationContext, PropagationPlan};
use crate::report::{PositionSnapshot, StraightenReport};
use crate::spatial::LoopKdTree;
use crate::weights::VertexWeights;

/// Result of a successful invocation.
#[derive(Debug, Clone)]
pub struct StraightenOutcome {
    pub report: StraightenReport,
    /// Original positions of every written vertex
    pub snapshot: PositionSnapshot,
}

/// Straighten the selected loop and propagate the change.
///
/// Modulation uses the mesh vertex group named by
/// `params.modulation_group`, if any.
pub fn straighten_and_propagate(
    mesh: &mut EditMesh,
    world: Mat4,
    selected: &[EdgeId],
    params: &StraightenParams,
) -> Result<StraightenOutcome, StraightenError> {
    straighten_and_propagate_with(mesh, world, selected, params, None)
}

/// Like [`straighten_and_propagate`], with an explicit modulation source.
///
/// An injected `weights` takes precedence over `params.modulation_group`.
/// Every error is returned before the mesh is modified.
pub fn straighten_and_propagate_with(
    mesh: &mut EditMesh,
    world: Mat4,
    selected: &[EdgeId],
    params: &StraightenParams,
    weights: Option<&dyn VertexWeights>,
) -> Result<StraightenOutcome, StraightenError> {
    debug!("straighten_and_propagate: START selected={}", selected.len());
    let params = params.sanitized();

    let inverse_world = check_context(mesh, &world)?;
    mesh.validate()?;
    let edge_loop = extract_loop(mesh, selected)?;

    let mut warnings = Vec::new();

    let use_group = weights.is_none() && params.modulation_group.is_some();
    if let Some(name) = params.modulation_group.as_deref() {
        if use_group && mesh.vertex_group(name).is_none() {
            warn!("Vertex group '{}' not found, modulating nothing", name);
            warnings.push(StraightenWarning::MissingWeightGroup(name.to_string()));
        }
    }

    let (radius, radius_warning) = FalloffRadius::resolve(&params, &mesh.world_bounds(&world));
    if let Some(warning) = radius_warning {
        warn!("{}", warning);
        warnings.push(warning);
    }
    let falloff = Falloff::new(FalloffCurve::from_smooth_flag(params.smooth), radius);
    debug!("straighten_and_propagate: radius={:?}, curve={:?}", radius, falloff.curve);

    let island = params
        .only_same_island
        .then(|| IslandMask::from_seeds(mesh, &edge_loop.vertices));

    // Flatten
    let flatten = FlattenPlan::compute(mesh, &world, &edge_loop.vertices, &params);
    let mut snapshot = PositionSnapshot::default();
    snapshot.record(flatten.apply(mesh, &inverse_world));

    // Propagate
    let tree = LoopKdTree::from_vertices(flatten.before_positions());
    trace!("straighten_and_propagate: k-d tree depth {}", tree.depth());

    let group = if use_group {
        params
            .modulation_group
            .as_deref()
            .and_then(|name| mesh.vertex_group(name))
    } else {
        None
    };
    let modulation = weights.or(group.map(|g| g as &dyn VertexWeights));

    let ctx = PropagationContext {
        world,
        edge_loop: &edge_loop,
        flatten: &flatten,
        tree: &tree,
        falloff,
        island: island.as_ref(),
        strength: params.strength,
        k_nearest: params.k_nearest,
        locked_component: params.locked_component(),
        weights: modulation,
    };
    let propagation = PropagationPlan::compute(mesh, &ctx);
    snapshot.record(propagation.apply(mesh, &inverse_world));

    let report = StraightenReport {
        loop_count: flatten.len(),
        affected_count: propagation.affected_count(),
        max_shift: propagation.max_shift,
        radius,
        warnings,
    };
    info!("{}", report);
    debug!("straighten_and_propagate: END wrote {} vertices", snapshot.len());

    Ok(StraightenOutcome { report, snapshot })
}

/// Reject an empty mesh or an unusable world transform.
///
/// Returns the inverse world transform.
fn check_context(mesh: &EditMesh, world: &Mat4) -> Result<Mat4, StraightenError> {
    if mesh.is_empty() {
        return Err(StraightenError::InvalidContext("mesh has no vertices".into()));
    }
    if !world.is_finite() {
        return Err(StraightenError::InvalidContext(
            "world transform is not finite".into(),
        ));
    }
    let det = world.determinant();
    if !det.is_finite() || det == 0.0 {
        return Err(StraightenError::InvalidContext(format!(
            "world transform is not invertible (determinant {})",
            det
        )));
    }
    let inverse = world.inverse();
    if !inverse.is_finite() {
        return Err(StraightenError::InvalidContext(
            "world transform inverse is not finite".into(),
        ));
    }
    Ok(inverse)
}
