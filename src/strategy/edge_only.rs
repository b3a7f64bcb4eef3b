//! EDGE_ONLY strategy: edge-first traversal of the wafer disc
//!
//! A dense disc scan ordered by distance descending puts the outermost dies
//! at the front, so truncation keeps the wafer boundary. Ties resolve by
//! rotated angle, then `(x, y)`.

use log::debug;

use crate::error::SamplingError;
use crate::model::{
    parse_advanced_config, resolve_target_point_count, SamplingOutput, SamplingRequest,
    SamplingTrace,
};
use crate::strategy::common;
use crate::trace;

pub const STRATEGY_ID: &str = "EDGE_ONLY";
pub const STRATEGY_VERSION: &str = "1.0";

/// Select sampling points with edge-first ordering
pub fn select(request: &SamplingRequest) -> Result<SamplingOutput, SamplingError> {
    common::validate_request(request, STRATEGY_ID)?;
    let config = request.common_config();
    config.validate(STRATEGY_ID)?;
    // Schema-validated; edge_band_width_mm/angular_spacing_deg/
    // prioritize_corners are forward-declared extension points.
    let _advanced = parse_advanced_config(STRATEGY_ID, request.advanced_config())?;

    let geometry = &request.wafer_geometry;
    let candidates = common::sort_edge_first(
        common::generate_disc_candidates(geometry),
        geometry.die_pitch_x_mm,
        geometry.die_pitch_y_mm,
        config.rotation_offset(),
    );
    debug!("{STRATEGY_ID}: {} edge-ordered candidates", candidates.len());

    let valid = common::apply_filters(candidates, geometry, &config);

    let target = resolve_target_point_count(
        config.target_point_count,
        STRATEGY_ID,
        request.process_constraints.min_sampling_points,
        request.process_constraints.max_sampling_points,
        request.tool_profile.max_points_per_wafer,
    );

    let selected = common::enforce_point_bounds(
        valid,
        request.process_constraints.min_sampling_points,
        target,
    )?;

    Ok(SamplingOutput {
        strategy_id: STRATEGY_ID.to_string(),
        ordered_points: selected,
        trace: SamplingTrace {
            strategy_version: STRATEGY_VERSION.to_string(),
            generated_at: trace::generated_at(),
        },
    })
}
