//! Data model for sampling requests, configuration, and outputs

pub mod catalog;
pub mod config;
pub mod request;
pub mod wafer;

pub use catalog::{CoordinateSystem, Criticality, ProcessConstraints, RecipeFormat, ToolProfile};
pub use config::{
    parse_advanced_config, resolve_target_point_count, AdvancedConfig, AllocationMode,
    CenterEdgeAdvancedConfig, CommonStrategyConfig, EdgeOnlyAdvancedConfig, GridAlignment,
    GridUniformAdvancedConfig, RadialSpacing, StrategyConfig, ZoneRingAdvancedConfig,
    DEFAULT_DETERMINISTIC_SEED,
};
pub use request::{
    RecipeRequest, RecipeResult, SamplingOutput, SamplingRequest, SamplingTrace, ScoreReport,
    ScoreRequest, ToolRecipe,
};
pub use wafer::{DiePoint, Origin, ValidDieMask, WaferGeometry};
