//! Boundary records: sampling requests and outputs, score and recipe records

use serde::{Deserialize, Serialize};

use super::catalog::{ProcessConstraints, ToolProfile};
use super::config::StrategyConfig;
use super::wafer::{DiePoint, WaferGeometry};

/// Input record for a strategy invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingRequest {
    pub wafer_geometry: WaferGeometry,
    pub process_constraints: ProcessConstraints,
    pub tool_profile: ToolProfile,
    pub strategy_id: String,
    #[serde(default)]
    pub strategy_config: Option<StrategyConfig>,
}

impl SamplingRequest {
    /// The common config section, defaults if absent
    pub fn common_config(&self) -> super::config::CommonStrategyConfig {
        self.strategy_config
            .as_ref()
            .and_then(|c| c.common.clone())
            .unwrap_or_default()
    }

    /// The raw advanced config section, if present
    pub fn advanced_config(&self) -> Option<&serde_json::Value> {
        self.strategy_config.as_ref().and_then(|c| c.advanced.as_ref())
    }
}

/// Audit metadata attached to every sampling output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingTrace {
    pub strategy_version: String,
    pub generated_at: String,
}

/// The selected points in measurement traversal order
///
/// Selection order is semantically meaningful. Once produced, this record is
/// read-only for all downstream consumers: scoring and translation take it by
/// shared reference and never add, remove, reorder, or mutate points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingOutput {
    pub strategy_id: String,
    pub ordered_points: Vec<DiePoint>,
    pub trace: SamplingTrace,
}

/// Input record for the L4 scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub wafer_geometry: WaferGeometry,
    pub process_constraints: ProcessConstraints,
    pub sampling_output: SamplingOutput,
}

/// Quality report produced by the L4 scorer, all scores in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub coverage_score: f64,
    pub statistical_score: f64,
    pub risk_alignment_score: f64,
    pub overall_score: f64,
    pub warnings: Vec<String>,
    pub version: String,
}

/// Input record for the L5 recipe translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub wafer_geometry: WaferGeometry,
    pub tool_profile: ToolProfile,
    pub sampling_output: SamplingOutput,
}

/// Tool-executable recipe produced by the L5 translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRecipe {
    pub recipe_id: String,
    pub tool_type: String,
    pub recipe_payload: serde_json::Value,
    pub translation_notes: Vec<String>,
    pub recipe_format_version: String,
}

/// Recipe plus non-blocking warnings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResult {
    pub tool_recipe: ToolRecipe,
    pub warnings: Vec<String>,
}
