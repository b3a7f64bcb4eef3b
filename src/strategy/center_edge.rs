//! CENTER_EDGE strategy: ring-priority selection around the wafer center
//!
//! Candidates are emitted ring by ring outward from `(0,0)`. Within a ring the
//! four cardinal points come first, then the four diagonals, then the rest of
//! the ring boundary sorted by rotated angle. Front-loading the structurally
//! significant points means truncation keeps a symmetric pattern.

use log::debug;

use crate::error::SamplingError;
use crate::model::{
    parse_advanced_config, resolve_target_point_count, DiePoint, SamplingOutput, SamplingRequest,
    SamplingTrace,
};
use crate::strategy::common;
use crate::trace;

pub const STRATEGY_ID: &str = "CENTER_EDGE";
pub const STRATEGY_VERSION: &str = "1.0";

/// Select sampling points in deterministic ring order
pub fn select(request: &SamplingRequest) -> Result<SamplingOutput, SamplingError> {
    common::validate_request(request, STRATEGY_ID)?;
    let config = request.common_config();
    config.validate(STRATEGY_ID)?;
    // Schema-validated; center_weight/ring_count/radial_spacing are
    // forward-declared extension points with no generation effect yet.
    let _advanced = parse_advanced_config(STRATEGY_ID, request.advanced_config())?;

    let rotation_offset = config.rotation_offset();
    let candidates = generate_ring_candidates(request, rotation_offset);
    debug!("{STRATEGY_ID}: {} ring candidates", candidates.len());

    let valid = common::apply_filters(candidates, &request.wafer_geometry, &config);

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

/// Candidates in ring order: center die first, then rings 1..=max outward
fn generate_ring_candidates(request: &SamplingRequest, rotation_offset: f64) -> Vec<DiePoint> {
    let max_ring = common::max_ring_index(&request.wafer_geometry);

    let mut candidates = vec![DiePoint::new(0, 0)];
    for ring in 1..=max_ring {
        candidates.extend(generate_ring_points(ring, rotation_offset));
    }
    candidates
}

/// Points of one Chebyshev ring, cardinals then diagonals then angular fill
fn generate_ring_points(ring: i32, rotation_offset: f64) -> Vec<DiePoint> {
    let mut points = vec![
        DiePoint::new(0, ring),
        DiePoint::new(ring, 0),
        DiePoint::new(0, -ring),
        DiePoint::new(-ring, 0),
    ];

    if ring > 1 {
        points.extend([
            DiePoint::new(ring, ring),
            DiePoint::new(ring, -ring),
            DiePoint::new(-ring, -ring),
            DiePoint::new(-ring, ring),
        ]);
    }

    if ring > 2 {
        let mut boundary: Vec<DiePoint> = Vec::new();
        for x in -ring..=ring {
            for y in -ring..=ring {
                if x.abs().max(y.abs()) == ring {
                    let point = DiePoint::new(x, y);
                    if !points.contains(&point) {
                        boundary.push(point);
                    }
                }
            }
        }

        // Angular ordering over raw die coordinates; rotation shifts the
        // tie-break, never the cardinal/diagonal priority above.
        boundary.sort_by(|a, b| {
            let angle_a = common::apply_rotation(common::angle_deg(*a, 1.0, 1.0), rotation_offset);
            let angle_b = common::apply_rotation(common::angle_deg(*b, 1.0, 1.0), rotation_offset);
            angle_a
                .total_cmp(&angle_b)
                .then(a.die_x.cmp(&b.die_x))
                .then(a.die_y.cmp(&b.die_y))
        });
        points.extend(boundary);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_one_is_cardinals_only() {
        let points = generate_ring_points(1, 0.0);
        assert_eq!(
            points,
            vec![
                DiePoint::new(0, 1),
                DiePoint::new(1, 0),
                DiePoint::new(0, -1),
                DiePoint::new(-1, 0),
            ]
        );
    }

    #[test]
    fn test_ring_two_adds_diagonals() {
        let points = generate_ring_points(2, 0.0);
        assert_eq!(points.len(), 8);
        assert_eq!(points[4], DiePoint::new(2, 2));
        assert_eq!(points[7], DiePoint::new(-2, 2));
    }

    #[test]
    fn test_ring_three_fills_boundary_by_angle() {
        let points = generate_ring_points(3, 0.0);
        // Full ring boundary: 8 * ring points
        assert_eq!(points.len(), 24);
        // Cardinals and diagonals keep priority over the angular fill
        assert_eq!(points[0], DiePoint::new(0, 3));
        assert_eq!(points[4], DiePoint::new(3, 3));
        // First fill point is the smallest positive angle on the boundary
        assert_eq!(points[8], DiePoint::new(3, 1));
    }

    #[test]
    fn test_boundary_fill_has_no_duplicates() {
        let points = generate_ring_points(4, 0.0);
        let mut seen = std::collections::HashSet::new();
        for p in &points {
            assert!(seen.insert((p.die_x, p.die_y)), "duplicate {:?}", p);
        }
        assert_eq!(points.len(), 32);
    }

    #[test]
    fn test_rotation_reorders_fill_only() {
        let baseline = generate_ring_points(3, 0.0);
        let rotated = generate_ring_points(3, 180.0);
        // Priority points are untouched
        assert_eq!(baseline[..8], rotated[..8]);
        // The angular fill starts from the opposite side
        assert_ne!(baseline[8], rotated[8]);
    }
}
