//! Shared configuration for loop straightening
//!
//! This crate provides the single source of truth for the parameters of the
//! straighten-and-propagate operation, their defaults, and their limits.
//! Hosts either build [`StraightenParams`] directly or load it from JSON.

use serde::{Deserialize, Serialize};

/// Default number of nearest loop vertices blended per propagated vertex
pub const DEFAULT_K_NEAREST: usize = 5;

/// Smallest accepted neighbor count
pub const MIN_K_NEAREST: usize = 1;

/// Largest accepted neighbor count
pub const MAX_K_NEAREST: usize = 12;

/// Default propagation strength (1.0 = full delta)
pub const DEFAULT_STRENGTH: f32 = 1.0;

/// Fraction of the world-space bounding-box diagonal used as the automatic radius
pub const AUTO_RADIUS_FACTOR: f32 = 0.15;

/// Weight sums at or below this value leave a vertex untouched
pub const WEIGHT_EPSILON: f32 = 1e-12;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse straighten parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Principal axis kept as the loop's line direction.
///
/// The two remaining axes are the ones that get flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis (X = 0, Y = 1, Z = 2)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two component indices that are flattened when this axis is kept
    pub fn flattened(self) -> [usize; 2] {
        match self {
            Axis::X => [1, 2],
            Axis::Y => [0, 2],
            Axis::Z => [0, 1],
        }
    }
}

/// How a non-positive radius is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadiusMode {
    /// Derive the radius from the mesh bounds
    #[default]
    Auto,
    /// No falloff: every found neighbor contributes at full weight
    Unbounded,
}

/// Parameters for one straighten-and-propagate invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StraightenParams {
    /// Axis kept as the line direction
    pub axis: Axis,
    /// Flatten to 0 instead of the loop centroid
    pub flatten_to_zero: bool,
    /// Falloff radius in world units (<= 0 defers to `radius_mode`)
    pub radius: f32,
    /// Interpretation of a non-positive radius
    pub radius_mode: RadiusMode,
    /// Overall propagation influence, 0.0 to 1.0
    pub strength: f32,
    /// Use smoothstep falloff instead of linear
    pub smooth: bool,
    /// Loop vertices sampled per propagated vertex
    pub k_nearest: usize,
    /// Only propagate to vertices connected to the loop
    pub only_same_island: bool,
    /// Keep Y unchanged on propagated vertices.
    ///
    /// Only takes effect when `axis` is Y, and flattening with axis Y never
    /// moves Y, so the lock cannot change a result. Other axes are never
    /// locked.
    pub keep_axis_on_propagate: bool,
    /// Named vertex group used to modulate propagation
    pub modulation_group: Option<String>,
}

impl Default for StraightenParams {
    fn default() -> Self {
        Self {
            axis: Axis::Y,
            flatten_to_zero: false,
            radius: 0.0,
            radius_mode: RadiusMode::Auto,
            strength: DEFAULT_STRENGTH,
            smooth: true,
            k_nearest: DEFAULT_K_NEAREST,
            only_same_island: true,
            keep_axis_on_propagate: true,
            modulation_group: None,
        }
    }
}

impl StraightenParams {
    /// Create parameters with the given axis and defaults for everything else
    pub fn with_axis(axis: Axis) -> Self {
        Self {
            axis,
            ..Default::default()
        }
    }

    /// Load parameters from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize parameters to JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy with every numeric field forced into its accepted range.
    ///
    /// A non-finite radius becomes 0 and a non-finite strength becomes 0.
    pub fn sanitized(&self) -> Self {
        let radius = if self.radius.is_finite() {
            self.radius.max(0.0)
        } else {
            0.0
        };
        let strength = if self.strength.is_finite() {
            self.strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            radius,
            strength,
            k_nearest: self.k_nearest.clamp(MIN_K_NEAREST, MAX_K_NEAREST),
            ..self.clone()
        }
    }

    /// Component index locked during propagation, if any.
    ///
    /// Only the vertical (Y) axis is ever locked.
    pub fn locked_component(&self) -> Option<usize> {
        (self.keep_axis_on_propagate && self.axis == Axis::Y).then_some(Axis::Y.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = StraightenParams::default();
        assert_eq!(params.axis, Axis::Y);
        assert_eq!(params.radius, 0.0);
        assert_eq!(params.radius_mode, RadiusMode::Auto);
        assert_eq!(params.strength, DEFAULT_STRENGTH);
        assert_eq!(params.k_nearest, DEFAULT_K_NEAREST);
        assert!(params.smooth);
        assert!(params.only_same_island);
        assert!(params.keep_axis_on_propagate);
        assert!(params.modulation_group.is_none());
    }

    #[test]
    fn test_axis_components() {
        assert_eq!(Axis::X.flattened(), [1, 2]);
        assert_eq!(Axis::Y.flattened(), [0, 2]);
        assert_eq!(Axis::Z.flattened(), [0, 1]);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert!(!axis.flattened().contains(&axis.index()));
        }
    }

    #[test]
    fn test_sanitized_clamps_ranges() {
        let params = StraightenParams {
            radius: -3.0,
            strength: 1.7,
            k_nearest: 40,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(params.radius, 0.0);
        assert_eq!(params.strength, 1.0);
        assert_eq!(params.k_nearest, MAX_K_NEAREST);

        let params = StraightenParams {
            radius: f32::NAN,
            strength: f32::INFINITY,
            k_nearest: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(params.radius, 0.0);
        assert_eq!(params.strength, 0.0);
        assert_eq!(params.k_nearest, MIN_K_NEAREST);
    }

    #[test]
    fn test_locked_component_only_for_y() {
        assert_eq!(StraightenParams::with_axis(Axis::Y).locked_component(), Some(1));
        assert_eq!(StraightenParams::with_axis(Axis::X).locked_component(), None);
        assert_eq!(StraightenParams::with_axis(Axis::Z).locked_component(), None);

        let mut params = StraightenParams::with_axis(Axis::Y);
        params.keep_axis_on_propagate = false;
        assert_eq!(params.locked_component(), None);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let params =
            StraightenParams::from_json_str(r#"{"axis":"Z","radius":2.5,"k_nearest":3}"#).unwrap();
        assert_eq!(params.axis, Axis::Z);
        assert_eq!(params.radius, 2.5);
        assert_eq!(params.k_nearest, 3);
        assert_eq!(params.strength, DEFAULT_STRENGTH);
        assert!(params.smooth);
    }

    #[test]
    fn test_json_round_trip() {
        let params = StraightenParams {
            modulation_group: Some("Mask".to_string()),
            radius_mode: RadiusMode::Unbounded,
            ..StraightenParams::with_axis(Axis::X)
        };
        let json = params.to_json_string().unwrap();
        assert_eq!(StraightenParams::from_json_str(&json).unwrap(), params);
    }

    #[test]
    fn test_json_invalid() {
        assert!(matches!(
            StraightenParams::from_json_str("{\"axis\": \"W\"}"),
            Err(ConfigError::Parse(_))
        ));
    }
}
