//! Wafer Sampler - deterministic sampling point selection for wafer metrology
//!
//! This library selects, scores, and translates spatial sampling points on a
//! semiconductor wafer die grid. Four interchangeable strategies generate
//! ordered point selections under geometric masks and count constraints;
//! a read-only scorer rates a selection's quality and a read-only translator
//! converts it into a tool-executable recipe.
//!
//! # Example
//!
//! ```rust
//! use wafer_sampler::model::{
//!     DiePoint, ProcessConstraints, SamplingRequest, ToolProfile, ValidDieMask, WaferGeometry,
//! };
//!
//! let request = SamplingRequest {
//!     wafer_geometry: WaferGeometry {
//!         wafer_size_mm: 300.0,
//!         die_pitch_x_mm: 10.0,
//!         die_pitch_y_mm: 10.0,
//!         valid_die_mask: ValidDieMask::EdgeExclusion { radius_mm: Some(140.0) },
//!         origin: Default::default(),
//!         notch_orientation_deg: 0.0,
//!     },
//!     process_constraints: ProcessConstraints {
//!         process_step: "ETCH_01".to_string(),
//!         criticality: Default::default(),
//!         min_sampling_points: 5,
//!         max_sampling_points: 25,
//!         allowed_strategy_set: vec![],
//!     },
//!     tool_profile: ToolProfile {
//!         tool_type: "OCD".to_string(),
//!         vendor: "ACME".to_string(),
//!         model: None,
//!         coordinate_system_supported: vec![],
//!         max_points_per_wafer: 49,
//!         edge_die_supported: true,
//!         ordering_required: false,
//!         recipe_format: Default::default(),
//!     },
//!     strategy_id: "CENTER_EDGE".to_string(),
//!     strategy_config: None,
//! };
//!
//! let output = wafer_sampler::sample(&request).unwrap();
//! assert_eq!(output.ordered_points[0], DiePoint::new(0, 0));
//! ```

pub mod error;
pub mod model;
pub mod score;
pub mod strategy;
pub mod trace;
pub mod translate;

pub use error::{ErrorCategory, ErrorCode, SamplingError};
pub use model::{
    RecipeRequest, RecipeResult, SamplingOutput, SamplingRequest, ScoreReport, ScoreRequest,
};
pub use strategy::{StrategyKind, StrategyRegistry};

/// Select sampling points for a request
///
/// Resolves the strategy from a fresh registry and runs it. The strategy
/// validates the request, generates and filters candidates, resolves the
/// target count, and enforces min/max bounds; the returned record is final
/// and must not be mutated, reordered, or filtered by downstream consumers.
pub fn sample(request: &SamplingRequest) -> Result<SamplingOutput, SamplingError> {
    let registry = StrategyRegistry::new();
    sample_with_registry(&registry, request)
}

/// Select sampling points using a caller-held registry
///
/// The registry is read-only after construction, so callers serving many
/// requests can build it once and share it.
pub fn sample_with_registry(
    registry: &StrategyRegistry,
    request: &SamplingRequest,
) -> Result<SamplingOutput, SamplingError> {
    let kind = registry.resolve(&request.strategy_id)?;
    kind.select_points(request)
}

/// Score a sampling output without modifying it
pub fn score(request: &ScoreRequest) -> ScoreReport {
    score::score(request)
}

/// Translate a sampling output into a tool recipe without modifying it
pub fn translate(request: &RecipeRequest) -> RecipeResult {
    translate::translate(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DiePoint, ProcessConstraints, ToolProfile, ValidDieMask, WaferGeometry,
    };

    fn request(strategy_id: &str) -> SamplingRequest {
        SamplingRequest {
            wafer_geometry: WaferGeometry {
                wafer_size_mm: 300.0,
                die_pitch_x_mm: 10.0,
                die_pitch_y_mm: 10.0,
                valid_die_mask: ValidDieMask::EdgeExclusion {
                    radius_mm: Some(140.0),
                },
                origin: Default::default(),
                notch_orientation_deg: 0.0,
            },
            process_constraints: ProcessConstraints {
                process_step: String::new(),
                criticality: Default::default(),
                min_sampling_points: 5,
                max_sampling_points: 25,
                allowed_strategy_set: vec![],
            },
            tool_profile: ToolProfile {
                tool_type: String::new(),
                vendor: String::new(),
                model: None,
                coordinate_system_supported: vec![],
                max_points_per_wafer: 49,
                edge_die_supported: true,
                ordering_required: false,
                recipe_format: Default::default(),
            },
            strategy_id: strategy_id.to_string(),
            strategy_config: None,
        }
    }

    #[test]
    fn test_sample_dispatches_all_strategies() {
        for id in ["CENTER_EDGE", "EDGE_ONLY", "GRID_UNIFORM", "ZONE_RING_N"] {
            let output = sample(&request(id)).expect("strategy should succeed");
            assert_eq!(output.strategy_id, id);
            assert!(!output.ordered_points.is_empty());
        }
    }

    #[test]
    fn test_sample_unknown_strategy() {
        let err = sample(&request("SPIRAL")).unwrap_err();
        assert!(matches!(err, SamplingError::UnknownStrategy { .. }));
    }

    #[test]
    fn test_center_edge_starts_at_center() {
        let output = sample(&request("CENTER_EDGE")).unwrap();
        assert_eq!(output.ordered_points[0], DiePoint::new(0, 0));
    }
}
