//! Strategy registry: string identifiers to a closed set of strategy kinds
//!
//! Dispatch is a fixed enum with a lookup table built at startup. Adding a
//! strategy means adding a variant and a registration line; there is no
//! runtime or dynamic loading path.

use std::collections::HashMap;

use crate::error::SamplingError;
use crate::model::{SamplingOutput, SamplingRequest};

use super::{center_edge, edge_only, grid_uniform, zone_ring};

/// The closed set of sampling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    CenterEdge,
    EdgeOnly,
    GridUniform,
    ZoneRing,
}

impl StrategyKind {
    /// Unique strategy identifier
    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::CenterEdge => center_edge::STRATEGY_ID,
            StrategyKind::EdgeOnly => edge_only::STRATEGY_ID,
            StrategyKind::GridUniform => grid_uniform::STRATEGY_ID,
            StrategyKind::ZoneRing => zone_ring::STRATEGY_ID,
        }
    }

    /// Strategy version recorded in output traces
    pub fn version(&self) -> &'static str {
        match self {
            StrategyKind::CenterEdge => center_edge::STRATEGY_VERSION,
            StrategyKind::EdgeOnly => edge_only::STRATEGY_VERSION,
            StrategyKind::GridUniform => grid_uniform::STRATEGY_VERSION,
            StrategyKind::ZoneRing => zone_ring::STRATEGY_VERSION,
        }
    }

    /// Run point selection for this strategy
    pub fn select_points(
        &self,
        request: &SamplingRequest,
    ) -> Result<SamplingOutput, SamplingError> {
        match self {
            StrategyKind::CenterEdge => center_edge::select(request),
            StrategyKind::EdgeOnly => edge_only::select(request),
            StrategyKind::GridUniform => grid_uniform::select(request),
            StrategyKind::ZoneRing => zone_ring::select(request),
        }
    }
}

/// Registry mapping strategy identifiers to kinds
#[derive(Debug)]
pub struct StrategyRegistry {
    strategies: HashMap<&'static str, StrategyKind>,
}

impl StrategyRegistry {
    /// Build the registry with every known strategy registered
    pub fn new() -> Self {
        let mut strategies = HashMap::new();
        for kind in [
            StrategyKind::CenterEdge,
            StrategyKind::EdgeOnly,
            StrategyKind::GridUniform,
            StrategyKind::ZoneRing,
        ] {
            strategies.insert(kind.id(), kind);
        }
        Self { strategies }
    }

    /// Resolve a strategy id, failing with `UnknownStrategy` if absent
    pub fn resolve(&self, strategy_id: &str) -> Result<StrategyKind, SamplingError> {
        self.strategies.get(strategy_id).copied().ok_or_else(|| {
            SamplingError::UnknownStrategy {
                id: strategy_id.to_string(),
                registered: self.list_ids(),
            }
        })
    }

    /// Whether a strategy id is registered
    pub fn contains(&self, strategy_id: &str) -> bool {
        self.strategies.contains_key(strategy_id)
    }

    /// All registered identifiers, sorted for stable output
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.strategies.keys().map(|s| s.to_string()).collect();
        ids.sort();
        ids
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
