//! Strategy configuration: common overlay plus strict per-strategy schemas
//!
//! The common section applies uniformly to every strategy. Advanced sections
//! are validated against the schema for the strategy they target; unknown
//! fields and out-of-range values are rejected before any geometric work.

use serde::{Deserialize, Serialize};

use crate::error::SamplingError;

/// Default RNG seed for stochastic extension points when none is requested
///
/// Threaded through the request as configuration rather than read from a
/// module constant at use sites, so it participates in the same record
/// discipline as every other config value.
pub const DEFAULT_DETERMINISTIC_SEED: u64 = 42;

/// Strategy-specific default target point counts
const STRATEGY_DEFAULT_TARGETS: &[(&str, usize)] = &[
    ("CENTER_EDGE", 20),
    ("GRID_UNIFORM", 30),
    ("EDGE_ONLY", 15),
    ("ZONE_RING_N", 25),
];

/// Fallback target when the strategy id has no registered default
const FALLBACK_DEFAULT_TARGET: usize = 20;

/// Configuration shared by all sampling strategies
///
/// All fields are optional; defaults are filled by the explicit resolution
/// policy in [`resolve_target_point_count`] and [`CommonStrategyConfig::resolved_seed`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonStrategyConfig {
    /// Desired number of points; unset means the strategy default
    #[serde(default)]
    pub target_point_count: Option<usize>,

    /// Exclude points within this many mm of the wafer edge; 0 = no exclusion
    #[serde(default)]
    pub edge_exclusion_mm: f64,

    /// Rotation offset in degrees [0, 360); unset means no rotation
    #[serde(default)]
    pub rotation_seed: Option<u32>,

    /// RNG seed for stochastic extension points; unset resolves to the default
    #[serde(default)]
    pub deterministic_seed: Option<u64>,
}

impl CommonStrategyConfig {
    /// Rotation offset in degrees, unset resolving to 0
    pub fn rotation_offset(&self) -> f64 {
        self.rotation_seed.map(f64::from).unwrap_or(0.0)
    }

    /// RNG seed, unset resolving to [`DEFAULT_DETERMINISTIC_SEED`]
    pub fn resolved_seed(&self) -> u64 {
        self.deterministic_seed.unwrap_or(DEFAULT_DETERMINISTIC_SEED)
    }

    /// Range checks not expressible in the serde schema
    pub fn validate(&self, strategy_id: &str) -> Result<(), SamplingError> {
        if self.target_point_count == Some(0) {
            return Err(SamplingError::invalid_config(
                strategy_id,
                "target_point_count must be at least 1",
            ));
        }
        if self.edge_exclusion_mm < 0.0 {
            return Err(SamplingError::invalid_config(
                strategy_id,
                "edge_exclusion_mm must be non-negative",
            ));
        }
        if let Some(rotation) = self.rotation_seed {
            if rotation >= 360 {
                return Err(SamplingError::invalid_config(
                    strategy_id,
                    format!("rotation_seed must be in [0, 360), got {rotation}"),
                ));
            }
        }
        Ok(())
    }
}

/// Ring spacing distribution for CENTER_EDGE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RadialSpacing {
    #[serde(rename = "UNIFORM")]
    #[default]
    Uniform,
    #[serde(rename = "EXPONENTIAL")]
    Exponential,
}

/// Grid alignment mode for GRID_UNIFORM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridAlignment {
    #[serde(rename = "CENTER")]
    #[default]
    Center,
    #[serde(rename = "CORNER")]
    Corner,
}

/// Point allocation mode for ZONE_RING_N
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AllocationMode {
    #[serde(rename = "AREA_PROPORTIONAL")]
    #[default]
    AreaProportional,
    #[serde(rename = "UNIFORM")]
    Uniform,
    #[serde(rename = "EDGE_HEAVY")]
    EdgeHeavy,
}

/// Advanced configuration for CENTER_EDGE
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CenterEdgeAdvancedConfig {
    /// Fraction of points allocated to the center region, [0, 1]
    #[serde(default = "default_center_weight")]
    pub center_weight: f64,
    /// Number of concentric rings, [2, 5]
    #[serde(default = "default_ring_count")]
    pub ring_count: u32,
    #[serde(default)]
    pub radial_spacing: RadialSpacing,
}

fn default_center_weight() -> f64 {
    0.2
}

fn default_ring_count() -> u32 {
    3
}

impl Default for CenterEdgeAdvancedConfig {
    fn default() -> Self {
        Self {
            center_weight: default_center_weight(),
            ring_count: default_ring_count(),
            radial_spacing: RadialSpacing::default(),
        }
    }
}

/// Advanced configuration for GRID_UNIFORM
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridUniformAdvancedConfig {
    /// Grid spacing in mm; unset derives from die pitch
    #[serde(default)]
    pub grid_pitch_mm: Option<f64>,
    /// Sub-die randomization factor, [0, 0.3]
    #[serde(default)]
    pub jitter_ratio: f64,
    #[serde(default)]
    pub grid_alignment: GridAlignment,
}

impl Default for GridUniformAdvancedConfig {
    fn default() -> Self {
        Self {
            grid_pitch_mm: None,
            jitter_ratio: 0.0,
            grid_alignment: GridAlignment::default(),
        }
    }
}

/// Advanced configuration for EDGE_ONLY
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeOnlyAdvancedConfig {
    /// Width of the edge sampling band in mm, [5, 50]
    #[serde(default = "default_edge_band_width")]
    pub edge_band_width_mm: f64,
    /// Target angular spacing in degrees, [15, 90]
    #[serde(default = "default_angular_spacing")]
    pub angular_spacing_deg: f64,
    #[serde(default = "default_true")]
    pub prioritize_corners: bool,
}

fn default_edge_band_width() -> f64 {
    10.0
}

fn default_angular_spacing() -> f64 {
    45.0
}

fn default_true() -> bool {
    true
}

impl Default for EdgeOnlyAdvancedConfig {
    fn default() -> Self {
        Self {
            edge_band_width_mm: default_edge_band_width(),
            angular_spacing_deg: default_angular_spacing(),
            prioritize_corners: true,
        }
    }
}

/// Advanced configuration for ZONE_RING_N
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneRingAdvancedConfig {
    /// Number of concentric rings, [2, 10]
    #[serde(default = "default_num_rings")]
    pub num_rings: u32,
    #[serde(default)]
    pub allocation_mode: AllocationMode,
}

fn default_num_rings() -> u32 {
    3
}

impl Default for ZoneRingAdvancedConfig {
    fn default() -> Self {
        Self {
            num_rings: default_num_rings(),
            allocation_mode: AllocationMode::default(),
        }
    }
}

/// Typed advanced configuration, one variant per strategy
#[derive(Debug, Clone)]
pub enum AdvancedConfig {
    CenterEdge(CenterEdgeAdvancedConfig),
    GridUniform(GridUniformAdvancedConfig),
    EdgeOnly(EdgeOnlyAdvancedConfig),
    ZoneRing(ZoneRingAdvancedConfig),
}

/// Complete strategy configuration with common and advanced sections
///
/// The advanced section stays untyped until the strategy id is known, then
/// [`parse_advanced_config`] dispatches it to the matching schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    #[serde(default)]
    pub common: Option<CommonStrategyConfig>,
    #[serde(default)]
    pub advanced: Option<serde_json::Value>,
}

/// Validate and parse the advanced section for the given strategy
///
/// Missing sections parse to all-defaults. Unknown fields, type mismatches,
/// and out-of-range values fail with `InvalidStrategyConfig`.
pub fn parse_advanced_config(
    strategy_id: &str,
    advanced: Option<&serde_json::Value>,
) -> Result<AdvancedConfig, SamplingError> {
    fn parse<T: for<'de> Deserialize<'de> + Default>(
        strategy_id: &str,
        advanced: Option<&serde_json::Value>,
    ) -> Result<T, SamplingError> {
        match advanced {
            None => Ok(T::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| SamplingError::invalid_config(strategy_id, e.to_string())),
        }
    }

    let config = match strategy_id {
        "CENTER_EDGE" => {
            let config: CenterEdgeAdvancedConfig = parse(strategy_id, advanced)?;
            if !(0.0..=1.0).contains(&config.center_weight) {
                return Err(SamplingError::invalid_config(
                    strategy_id,
                    format!("center_weight must be in [0, 1], got {}", config.center_weight),
                ));
            }
            if !(2..=5).contains(&config.ring_count) {
                return Err(SamplingError::invalid_config(
                    strategy_id,
                    format!("ring_count must be in [2, 5], got {}", config.ring_count),
                ));
            }
            AdvancedConfig::CenterEdge(config)
        }
        "GRID_UNIFORM" => {
            let config: GridUniformAdvancedConfig = parse(strategy_id, advanced)?;
            if let Some(pitch) = config.grid_pitch_mm {
                if pitch <= 0.0 {
                    return Err(SamplingError::invalid_config(
                        strategy_id,
                        format!("grid_pitch_mm must be positive, got {pitch}"),
                    ));
                }
            }
            if !(0.0..=0.3).contains(&config.jitter_ratio) {
                return Err(SamplingError::invalid_config(
                    strategy_id,
                    format!("jitter_ratio must be in [0, 0.3], got {}", config.jitter_ratio),
                ));
            }
            AdvancedConfig::GridUniform(config)
        }
        "EDGE_ONLY" => {
            let config: EdgeOnlyAdvancedConfig = parse(strategy_id, advanced)?;
            if !(5.0..=50.0).contains(&config.edge_band_width_mm) {
                return Err(SamplingError::invalid_config(
                    strategy_id,
                    format!(
                        "edge_band_width_mm must be in [5, 50], got {}",
                        config.edge_band_width_mm
                    ),
                ));
            }
            if !(15.0..=90.0).contains(&config.angular_spacing_deg) {
                return Err(SamplingError::invalid_config(
                    strategy_id,
                    format!(
                        "angular_spacing_deg must be in [15, 90], got {}",
                        config.angular_spacing_deg
                    ),
                ));
            }
            AdvancedConfig::EdgeOnly(config)
        }
        "ZONE_RING_N" => {
            let config: ZoneRingAdvancedConfig = parse(strategy_id, advanced)?;
            if !(2..=10).contains(&config.num_rings) {
                return Err(SamplingError::invalid_config(
                    strategy_id,
                    format!("num_rings must be in [2, 10], got {}", config.num_rings),
                ));
            }
            AdvancedConfig::ZoneRing(config)
        }
        other => {
            return Err(SamplingError::invalid_config(
                other,
                "no advanced config schema registered for this strategy",
            ));
        }
    };

    Ok(config)
}

/// Resolve the target point count using the explicit default policy
///
/// 1. Use the requested value if provided, else the strategy default.
/// 2. Clamp to `[min_sampling_points, min(max_sampling_points, tool_max)]`.
///
/// Shared verbatim by every strategy; divergence here is a defect.
pub fn resolve_target_point_count(
    requested: Option<usize>,
    strategy_id: &str,
    min_sampling_points: usize,
    max_sampling_points: usize,
    tool_max: usize,
) -> usize {
    let base = requested.unwrap_or_else(|| {
        STRATEGY_DEFAULT_TARGETS
            .iter()
            .find(|(id, _)| *id == strategy_id)
            .map(|(_, n)| *n)
            .unwrap_or(FALLBACK_DEFAULT_TARGET)
    });

    let upper = max_sampling_points.min(tool_max);
    min_sampling_points.max(base.min(upper))
}
