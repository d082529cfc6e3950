//! Falloff curves and radius resolution for propagation.
//!
//! A propagated vertex blends the deltas of its nearest loop vertices, each
//! weighted by how close that loop vertex is relative to the falloff radius.

use editmesh::Aabb;
use serde::Serialize;
use straighten_config::{RadiusMode, StraightenParams, AUTO_RADIUS_FACTOR};

use crate::error::StraightenWarning;

/// Cubic Hermite ease `x²(3 − 2x)` with `x` clamped to [0, 1].
pub fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Falloff curve for propagation influence.
///
/// Determines how influence decreases from a loop vertex to the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FalloffCurve {
    /// Linear falloff: weight = 1 - distance/radius
    Linear,
    /// Smooth falloff: hermite interpolation
    #[default]
    Smooth,
}

impl FalloffCurve {
    pub fn from_smooth_flag(smooth: bool) -> Self {
        if smooth {
            FalloffCurve::Smooth
        } else {
            FalloffCurve::Linear
        }
    }

    /// Calculate weight at a given normalized distance (0.0 = at the loop, 1.0 = radius).
    pub fn evaluate(&self, normalized_distance: f32) -> f32 {
        let t = 1.0 - normalized_distance.clamp(0.0, 1.0);
        match self {
            FalloffCurve::Linear => t,
            FalloffCurve::Smooth => smoothstep(t),
        }
    }
}

/// Falloff radius after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FalloffRadius {
    /// Radius in world units, used literally (may be exactly 0)
    Finite(f32),
    /// No attenuation with distance
    Unbounded,
}

impl FalloffRadius {
    /// Resolve the configured radius against the mesh's world-space bounds.
    ///
    /// A positive radius is kept. A non-positive radius becomes either
    /// [`AUTO_RADIUS_FACTOR`] times the bounds diagonal or unbounded,
    /// depending on the radius mode.
    pub fn resolve(
        params: &StraightenParams,
        world_bounds: &Aabb,
    ) -> (FalloffRadius, Option<StraightenWarning>) {
        if params.radius > 0.0 {
            return (FalloffRadius::Finite(params.radius), None);
        }
        match params.radius_mode {
            RadiusMode::Unbounded => (FalloffRadius::Unbounded, None),
            RadiusMode::Auto => {
                let radius = AUTO_RADIUS_FACTOR * world_bounds.diagonal();
                if radius > 0.0 {
                    (FalloffRadius::Finite(radius), None)
                } else {
                    (
                        FalloffRadius::Finite(0.0),
                        Some(StraightenWarning::DegenerateBounds),
                    )
                }
            }
        }
    }

    /// Distance scaled into the curve's [0, 1] domain.
    ///
    /// A zero radius gives full weight at distance 0 and none beyond it.
    pub fn normalize(&self, distance: f32) -> f32 {
        match *self {
            FalloffRadius::Unbounded => 0.0,
            FalloffRadius::Finite(r) if r > 0.0 => distance / r,
            FalloffRadius::Finite(_) => {
                if distance > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn value(&self) -> Option<f32> {
        match *self {
            FalloffRadius::Finite(r) => Some(r),
            FalloffRadius::Unbounded => None,
        }
    }
}

/// Distance-to-weight mapping used by the propagation engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Falloff {
    pub curve: FalloffCurve,
    pub radius: FalloffRadius,
}

impl Falloff {
    pub fn new(curve: FalloffCurve, radius: FalloffRadius) -> Self {
        Self { curve, radius }
    }

    /// Weight in [0, 1] for a loop vertex at `distance`.
    pub fn weight(&self, distance: f32) -> f32 {
        self.curve.evaluate(self.radius.normalize(distance))
    }
}
