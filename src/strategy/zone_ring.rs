//! ZONE_RING_N strategy: proportional allocation across N concentric annuli
//!
//! The wafer radius is divided into `num_rings` equal-width annuli. Each ring
//! receives a share of the target proportional to its annular area, every
//! non-empty ring gets at least one point while budget remains, and the
//! rounding remainder goes to the outer rings first. Within a ring, selection
//! is canonical order plus stride; ring selections concatenate innermost
//! first.
//!
//! `num_rings` comes from the typed advanced config only.

use log::debug;

use crate::error::SamplingError;
use crate::model::{
    parse_advanced_config, resolve_target_point_count, AdvancedConfig, DiePoint, SamplingOutput,
    SamplingRequest, SamplingTrace, WaferGeometry,
};
use crate::strategy::common;
use crate::trace;

pub const STRATEGY_ID: &str = "ZONE_RING_N";
pub const STRATEGY_VERSION: &str = "1.0";

/// Select sampling points with ring-proportional allocation
pub fn select(request: &SamplingRequest) -> Result<SamplingOutput, SamplingError> {
    common::validate_request(request, STRATEGY_ID)?;
    let config = request.common_config();
    config.validate(STRATEGY_ID)?;

    let advanced = parse_advanced_config(STRATEGY_ID, request.advanced_config())?;
    let num_rings = match advanced {
        AdvancedConfig::ZoneRing(zone) => zone.num_rings as usize,
        // parse_advanced_config dispatches on STRATEGY_ID
        _ => unreachable!("advanced config variant mismatch"),
    };

    let geometry = &request.wafer_geometry;
    let candidates = common::generate_disc_candidates(geometry);
    let valid = common::apply_filters(candidates, geometry, &config);

    let rings = classify_into_rings(&valid, num_rings, geometry);

    let target = resolve_target_point_count(
        config.target_point_count,
        STRATEGY_ID,
        request.process_constraints.min_sampling_points,
        request.process_constraints.max_sampling_points,
        request.tool_profile.max_points_per_wafer,
    );

    let selected = allocate_and_select(&rings, target, geometry, config.rotation_offset());

    let final_points = common::enforce_point_bounds(
        selected,
        request.process_constraints.min_sampling_points,
        target,
    )?;

    Ok(SamplingOutput {
        strategy_id: STRATEGY_ID.to_string(),
        ordered_points: final_points,
        trace: SamplingTrace {
            strategy_version: STRATEGY_VERSION.to_string(),
            generated_at: trace::generated_at(),
        },
    })
}

/// Bucket candidates into equal-width annuli by distance from center
///
/// Ring k spans `[kR/N, (k+1)R/N)`; points at exactly the wafer radius clamp
/// into the outermost ring.
fn classify_into_rings(
    candidates: &[DiePoint],
    num_rings: usize,
    geometry: &WaferGeometry,
) -> Vec<Vec<DiePoint>> {
    let ring_width = geometry.radius_mm() / num_rings as f64;
    let mut rings = vec![Vec::new(); num_rings];

    for point in candidates {
        let distance =
            common::distance_mm(*point, geometry.die_pitch_x_mm, geometry.die_pitch_y_mm);
        let index = ((distance / ring_width) as usize).min(num_rings - 1);
        rings[index].push(*point);
    }

    rings
}

/// Area-proportional allocation, then per-ring canonical sort and stride
fn allocate_and_select(
    rings: &[Vec<DiePoint>],
    target_count: usize,
    geometry: &WaferGeometry,
    rotation_offset: f64,
) -> Vec<DiePoint> {
    let num_rings = rings.len();
    let radius = geometry.radius_mm();

    // Annular areas without the constant factor; it cancels in the proportion
    let ring_areas: Vec<f64> = (0..num_rings)
        .map(|k| {
            let inner = k as f64 * radius / num_rings as f64;
            let outer = (k + 1) as f64 * radius / num_rings as f64;
            outer * outer - inner * inner
        })
        .collect();
    let total_area: f64 = ring_areas.iter().sum();

    let mut allocations = vec![0usize; num_rings];
    let mut allocated_total = 0usize;
    for k in 0..num_rings {
        let mut allocated = (target_count as f64 * ring_areas[k] / total_area) as usize;
        // A non-empty ring always gets a point while budget remains
        if allocated == 0 && !rings[k].is_empty() && allocated_total < target_count {
            allocated = 1;
        }
        allocations[k] = allocated;
        allocated_total += allocated;
    }

    // Rounding remainder goes outermost-first to rings with spare dies
    let mut remaining = target_count.saturating_sub(allocated_total);
    for k in (0..num_rings).rev() {
        if remaining == 0 {
            break;
        }
        if rings[k].len() > allocations[k] {
            allocations[k] += 1;
            remaining -= 1;
        }
    }

    debug!("{STRATEGY_ID}: ring allocations {:?}", allocations);

    let mut selected = Vec::with_capacity(target_count);
    for (ring_dies, ring_target) in rings.iter().zip(&allocations) {
        if ring_dies.is_empty() || *ring_target == 0 {
            continue;
        }
        let sorted = common::sort_canonical(
            ring_dies.clone(),
            geometry.die_pitch_x_mm,
            geometry.die_pitch_y_mm,
            rotation_offset,
        );
        selected.extend(common::select_with_stride(&sorted, *ring_target));
    }

    selected
}
