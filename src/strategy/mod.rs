//! Sampling strategy engine
//!
//! Four deterministic point-selection strategies over the die grid, sharing a
//! single validation/masking/constraint pipeline. Strategies only select
//! points; nothing downstream of selection may mutate, reorder, or filter
//! the output.

pub mod center_edge;
pub mod common;
pub mod edge_only;
pub mod grid_uniform;
pub mod registry;
pub mod zone_ring;

pub use registry::{StrategyKind, StrategyRegistry};
