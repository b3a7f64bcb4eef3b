//! Process and tool catalog types consumed by the sampling pipeline

use serde::{Deserialize, Serialize};

/// Process criticality level, consumed by the risk-alignment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Criticality {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    #[default]
    Medium,
    #[serde(rename = "LOW")]
    Low,
}

/// Coordinate systems a tool can accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    #[serde(rename = "MM")]
    Mm,
    #[serde(rename = "DIE_GRID")]
    DieGrid,
}

impl CoordinateSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystem::Mm => "MM",
            CoordinateSystem::DieGrid => "DIE_GRID",
        }
    }
}

/// Sampling constraints attached to a process step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConstraints {
    #[serde(default)]
    pub process_step: String,
    #[serde(default)]
    pub criticality: Criticality,
    /// Lower bound on selected points, non-negative
    pub min_sampling_points: usize,
    /// Upper bound on selected points, must be >= the minimum
    pub max_sampling_points: usize,
    /// Strategy ids permitted for this process; empty means unrestricted
    #[serde(default)]
    pub allowed_strategy_set: Vec<String>,
}

impl ProcessConstraints {
    /// Whether the allow-list permits the given strategy
    pub fn allows(&self, strategy_id: &str) -> bool {
        self.allowed_strategy_set.is_empty()
            || self.allowed_strategy_set.iter().any(|s| s == strategy_id)
    }
}

/// Recipe output format advertised by a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFormat {
    /// JSON, CSV, or TEXT
    pub r#type: String,
    pub version: String,
}

impl Default for RecipeFormat {
    fn default() -> Self {
        Self {
            r#type: "JSON".to_string(),
            version: "1.0".to_string(),
        }
    }
}

/// Metrology tool capabilities and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolProfile {
    #[serde(default)]
    pub tool_type: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_coordinate_systems")]
    pub coordinate_system_supported: Vec<CoordinateSystem>,
    /// Hard cap on measurement points per wafer, at least 1
    pub max_points_per_wafer: usize,
    #[serde(default = "default_true")]
    pub edge_die_supported: bool,
    #[serde(default)]
    pub ordering_required: bool,
    #[serde(default)]
    pub recipe_format: RecipeFormat,
}

fn default_coordinate_systems() -> Vec<CoordinateSystem> {
    vec![CoordinateSystem::Mm]
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allow_list_is_unrestricted() {
        let constraints = ProcessConstraints {
            process_step: String::new(),
            criticality: Criticality::Medium,
            min_sampling_points: 0,
            max_sampling_points: 10,
            allowed_strategy_set: vec![],
        };
        assert!(constraints.allows("CENTER_EDGE"));
        assert!(constraints.allows("ANYTHING"));
    }

    #[test]
    fn test_allow_list_restricts() {
        let constraints = ProcessConstraints {
            process_step: "ETCH_01".to_string(),
            criticality: Criticality::High,
            min_sampling_points: 0,
            max_sampling_points: 10,
            allowed_strategy_set: vec!["GRID_UNIFORM".to_string()],
        };
        assert!(constraints.allows("GRID_UNIFORM"));
        assert!(!constraints.allows("CENTER_EDGE"));
    }

    #[test]
    fn test_tool_profile_defaults() {
        let tool: ToolProfile =
            serde_json::from_str(r#"{"max_points_per_wafer": 49}"#).unwrap();
        assert_eq!(tool.max_points_per_wafer, 49);
        assert!(tool.edge_die_supported);
        assert!(!tool.ordering_required);
        assert_eq!(tool.recipe_format.r#type, "JSON");
    }
}
