//! GRID_UNIFORM strategy: canonical ordering plus stride subsampling
//!
//! The disc scan is sorted into canonical order (distance, rotated angle,
//! coordinates) and thinned by selecting evenly spaced indices. Even spacing
//! through the canonical sequence approximates uniform spatial coverage
//! without true geometric gridding.

use log::debug;

use crate::error::SamplingError;
use crate::model::{
    parse_advanced_config, resolve_target_point_count, SamplingOutput, SamplingRequest,
    SamplingTrace,
};
use crate::strategy::common;
use crate::trace;

pub const STRATEGY_ID: &str = "GRID_UNIFORM";
pub const STRATEGY_VERSION: &str = "1.0";

/// Select sampling points with uniform stride coverage
pub fn select(request: &SamplingRequest) -> Result<SamplingOutput, SamplingError> {
    common::validate_request(request, STRATEGY_ID)?;
    let config = request.common_config();
    config.validate(STRATEGY_ID)?;
    // Schema-validated; grid_pitch_mm/jitter_ratio/grid_alignment are
    // forward-declared extension points.
    let _advanced = parse_advanced_config(STRATEGY_ID, request.advanced_config())?;

    let geometry = &request.wafer_geometry;
    let candidates = common::sort_canonical(
        common::generate_disc_candidates(geometry),
        geometry.die_pitch_x_mm,
        geometry.die_pitch_y_mm,
        config.rotation_offset(),
    );

    let valid = common::apply_filters(candidates, geometry, &config);

    let target = resolve_target_point_count(
        config.target_point_count,
        STRATEGY_ID,
        request.process_constraints.min_sampling_points,
        request.process_constraints.max_sampling_points,
        request.tool_profile.max_points_per_wafer,
    );

    let strided = common::select_with_stride(&valid, target);
    debug!(
        "{STRATEGY_ID}: stride selected {} of {} valid candidates",
        strided.len(),
        valid.len()
    );

    let selected = common::enforce_point_bounds(
        strided,
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
