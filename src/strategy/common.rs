//! Shared pipeline stages composed by every sampling strategy
//!
//! Validation, mask filtering, candidate generation, canonical ordering,
//! stride subsampling, and min/max enforcement all live here so the four
//! strategies cannot drift apart on the parts they share. Strategy modules
//! contribute only their generation/ordering logic.
//!
//! All helpers are pure and deterministic; validation happens at the strategy
//! boundary, not inside the geometry functions.

use std::cmp::Ordering;
use std::collections::HashSet;

use log::{debug, warn};

use crate::error::SamplingError;
use crate::model::{
    CommonStrategyConfig, DiePoint, SamplingRequest, ValidDieMask, WaferGeometry,
};

/// Euclidean distance of a die's physical position from wafer center, in mm
pub fn distance_mm(point: DiePoint, pitch_x: f64, pitch_y: f64) -> f64 {
    let (x_mm, y_mm) = point.position_mm(pitch_x, pitch_y);
    (x_mm * x_mm + y_mm * y_mm).sqrt()
}

/// Angular position of a die in degrees, normalized to [0, 360)
pub fn angle_deg(point: DiePoint, pitch_x: f64, pitch_y: f64) -> f64 {
    let (x_mm, y_mm) = point.position_mm(pitch_x, pitch_y);
    let mut angle = y_mm.atan2(x_mm).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

/// Apply a rotation offset to an angle, normalized to [0, 360)
pub fn apply_rotation(base_angle_deg: f64, rotation_offset_deg: f64) -> f64 {
    (base_angle_deg + rotation_offset_deg).rem_euclid(360.0)
}

/// Drop points whose centers fall within `exclusion_mm` of the wafer edge
///
/// Identity when `exclusion_mm <= 0`. Input order is preserved.
pub fn apply_edge_exclusion(
    points: Vec<DiePoint>,
    geometry: &WaferGeometry,
    exclusion_mm: f64,
) -> Vec<DiePoint> {
    if exclusion_mm <= 0.0 {
        return points;
    }

    let max_distance = geometry.radius_mm() - exclusion_mm;
    let before = points.len();
    let kept: Vec<DiePoint> = points
        .into_iter()
        .filter(|p| distance_mm(*p, geometry.die_pitch_x_mm, geometry.die_pitch_y_mm) <= max_distance)
        .collect();

    if kept.len() < before {
        debug!(
            "edge exclusion {}mm dropped {} of {} candidates",
            exclusion_mm,
            before - kept.len(),
            before
        );
    }
    kept
}

/// Filter candidates through the wafer's valid-die mask
///
/// Candidate order is preserved. An unrecognized mask tag passes everything
/// through; that contract is logged so upstream data bugs stay visible.
pub fn apply_die_mask(candidates: Vec<DiePoint>, geometry: &WaferGeometry) -> Vec<DiePoint> {
    match &geometry.valid_die_mask {
        ValidDieMask::EdgeExclusion { radius_mm } => match radius_mm {
            None => candidates,
            Some(radius) => candidates
                .into_iter()
                .filter(|p| {
                    distance_mm(*p, geometry.die_pitch_x_mm, geometry.die_pitch_y_mm) <= *radius
                })
                .collect(),
        },
        ValidDieMask::ExplicitList { valid_die_list } => {
            if valid_die_list.is_empty() {
                return candidates;
            }
            let valid: HashSet<(i32, i32)> =
                valid_die_list.iter().map(|p| (p.die_x, p.die_y)).collect();
            candidates
                .into_iter()
                .filter(|p| valid.contains(&(p.die_x, p.die_y)))
                .collect()
        }
        ValidDieMask::Unknown => {
            warn!("unrecognized valid_die_mask type, passing all candidates through");
            candidates
        }
    }
}

/// Mask filtering followed by common-config edge exclusion
pub fn apply_filters(
    candidates: Vec<DiePoint>,
    geometry: &WaferGeometry,
    common: &CommonStrategyConfig,
) -> Vec<DiePoint> {
    let masked = apply_die_mask(candidates, geometry);
    apply_edge_exclusion(masked, geometry, common.edge_exclusion_mm)
}

/// Largest die-grid ring index to consider for this wafer
///
/// Per-axis `trunc(radius / pitch) + 1`, max of the two axes.
pub fn max_ring_index(geometry: &WaferGeometry) -> i32 {
    let radius = geometry.radius_mm();
    let rings_x = (radius / geometry.die_pitch_x_mm) as i32 + 1;
    let rings_y = (radius / geometry.die_pitch_y_mm) as i32 + 1;
    rings_x.max(rings_y)
}

/// All die positions whose centers fall within the wafer radius
///
/// Scans the bounding grid row-major from the negative corner; callers apply
/// their own ordering afterwards.
pub fn generate_disc_candidates(geometry: &WaferGeometry) -> Vec<DiePoint> {
    let max_ring = max_ring_index(geometry);
    let radius = geometry.radius_mm();

    let mut candidates = Vec::new();
    for x in -max_ring..=max_ring {
        for y in -max_ring..=max_ring {
            let point = DiePoint::new(x, y);
            if distance_mm(point, geometry.die_pitch_x_mm, geometry.die_pitch_y_mm) <= radius {
                candidates.push(point);
            }
        }
    }
    debug!("disc scan produced {} candidates", candidates.len());
    candidates
}

/// Canonical ordering: distance ascending, rotated angle ascending, then (x, y)
pub fn sort_canonical(
    mut points: Vec<DiePoint>,
    pitch_x: f64,
    pitch_y: f64,
    rotation_offset: f64,
) -> Vec<DiePoint> {
    points.sort_by(|a, b| {
        compare_keys(
            canonical_key(*a, pitch_x, pitch_y, rotation_offset),
            canonical_key(*b, pitch_x, pitch_y, rotation_offset),
            *a,
            *b,
        )
    });
    points
}

/// Edge-first ordering: distance descending, rotated angle ascending, then (x, y)
pub fn sort_edge_first(
    mut points: Vec<DiePoint>,
    pitch_x: f64,
    pitch_y: f64,
    rotation_offset: f64,
) -> Vec<DiePoint> {
    points.sort_by(|a, b| {
        let (da, aa) = canonical_key(*a, pitch_x, pitch_y, rotation_offset);
        let (db, ab) = canonical_key(*b, pitch_x, pitch_y, rotation_offset);
        compare_keys((-da, aa), (-db, ab), *a, *b)
    });
    points
}

fn canonical_key(point: DiePoint, pitch_x: f64, pitch_y: f64, rotation_offset: f64) -> (f64, f64) {
    let dist = distance_mm(point, pitch_x, pitch_y);
    let angle = apply_rotation(angle_deg(point, pitch_x, pitch_y), rotation_offset);
    (dist, angle)
}

fn compare_keys(a: (f64, f64), b: (f64, f64), pa: DiePoint, pb: DiePoint) -> Ordering {
    a.0.total_cmp(&b.0)
        .then(a.1.total_cmp(&b.1))
        .then(pa.die_x.cmp(&pb.die_x))
        .then(pa.die_y.cmp(&pb.die_y))
}

/// Select evenly spaced indices from an ordered sequence
///
/// Index `i` maps to `floor(i * len / target)`. Returns the whole sequence
/// when the target covers it.
pub fn select_with_stride(candidates: &[DiePoint], target_count: usize) -> Vec<DiePoint> {
    if candidates.is_empty() {
        return Vec::new();
    }
    if target_count >= candidates.len() {
        return candidates.to_vec();
    }

    let stride = candidates.len() as f64 / target_count as f64;
    (0..target_count)
        .map(|i| candidates[(i as f64 * stride) as usize])
        .collect()
}

/// Enforce min/max point-count bounds on an ordered candidate list
///
/// Fails when fewer than `min_points` candidates survive filtering; otherwise
/// truncates to the first `clamp(available, min_points, max_points)` entries,
/// preserving the strategy's selection order.
pub fn enforce_point_bounds(
    candidates: Vec<DiePoint>,
    min_points: usize,
    max_points: usize,
) -> Result<Vec<DiePoint>, SamplingError> {
    let available = candidates.len();
    if available < min_points {
        return Err(SamplingError::CannotMeetMinPoints {
            required: min_points,
            available,
        });
    }

    let take = available.min(max_points).max(min_points);
    let mut selected = candidates;
    selected.truncate(take);
    Ok(selected)
}

/// Pre-flight request validation, shared by all strategies
///
/// Check order is fixed for error-message determinism: allow-list membership,
/// wafer positivity, pitch positivity, constraint ordering, tool capacity.
/// Non-negativity of `min_sampling_points` is enforced by its unsigned type.
pub fn validate_request(request: &SamplingRequest, strategy_id: &str) -> Result<(), SamplingError> {
    if !request.process_constraints.allows(strategy_id) {
        return Err(SamplingError::DisallowedStrategy {
            id: strategy_id.to_string(),
            allowed: request.process_constraints.allowed_strategy_set.clone(),
        });
    }

    let geometry = &request.wafer_geometry;
    if geometry.wafer_size_mm <= 0.0 {
        return Err(SamplingError::invalid_wafer_spec(
            "wafer_size_mm must be positive",
        ));
    }
    if geometry.die_pitch_x_mm <= 0.0 || geometry.die_pitch_y_mm <= 0.0 {
        return Err(SamplingError::invalid_wafer_spec(
            "die_pitch_x_mm and die_pitch_y_mm must be positive",
        ));
    }

    let constraints = &request.process_constraints;
    if constraints.max_sampling_points < constraints.min_sampling_points {
        return Err(SamplingError::invalid_constraints(
            "max_sampling_points must be >= min_sampling_points",
        ));
    }
    if request.tool_profile.max_points_per_wafer < 1 {
        return Err(SamplingError::invalid_constraints(
            "tool max_points_per_wafer must be at least 1",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Origin, ProcessConstraints, ToolProfile};

    fn geometry(mask: ValidDieMask) -> WaferGeometry {
        WaferGeometry {
            wafer_size_mm: 300.0,
            die_pitch_x_mm: 10.0,
            die_pitch_y_mm: 10.0,
            valid_die_mask: mask,
            origin: Origin::Center,
            notch_orientation_deg: 0.0,
        }
    }

    #[test]
    fn test_distance_and_angle() {
        assert_eq!(distance_mm(DiePoint::new(3, 4), 10.0, 10.0), 50.0);
        assert_eq!(angle_deg(DiePoint::new(1, 0), 10.0, 10.0), 0.0);
        assert_eq!(angle_deg(DiePoint::new(0, 1), 10.0, 10.0), 90.0);
        // atan2 negatives are shifted into [0, 360)
        assert_eq!(angle_deg(DiePoint::new(0, -1), 10.0, 10.0), 270.0);
    }

    #[test]
    fn test_apply_rotation_wraps() {
        assert_eq!(apply_rotation(270.0, 180.0), 90.0);
        assert_eq!(apply_rotation(0.0, 0.0), 0.0);
        assert_eq!(apply_rotation(45.0, 0.0), 45.0);
    }

    #[test]
    fn test_edge_exclusion_identity_when_zero() {
        let geometry = geometry(ValidDieMask::default());
        let points = vec![DiePoint::new(14, 0), DiePoint::new(0, 0)];
        assert_eq!(
            apply_edge_exclusion(points.clone(), &geometry, 0.0),
            points
        );
    }

    #[test]
    fn test_edge_exclusion_drops_near_edge() {
        let geometry = geometry(ValidDieMask::default());
        // (14, 0) sits at 140mm, within 10mm of the 150mm edge
        let points = vec![DiePoint::new(0, 0), DiePoint::new(14, 0)];
        let kept = apply_edge_exclusion(points, &geometry, 10.0);
        assert_eq!(kept, vec![DiePoint::new(0, 0), DiePoint::new(14, 0)]);

        let points = vec![DiePoint::new(0, 0), DiePoint::new(14, 0)];
        let kept = apply_edge_exclusion(points, &geometry, 10.1);
        assert_eq!(kept, vec![DiePoint::new(0, 0)]);
    }

    #[test]
    fn test_mask_edge_exclusion_unset_radius_is_permissive() {
        let geometry = geometry(ValidDieMask::EdgeExclusion { radius_mm: None });
        let points = vec![DiePoint::new(100, 100)];
        assert_eq!(apply_die_mask(points.clone(), &geometry), points);
    }

    #[test]
    fn test_mask_explicit_list_membership() {
        let geometry = geometry(ValidDieMask::ExplicitList {
            valid_die_list: vec![DiePoint::new(0, 0), DiePoint::new(1, 0)],
        });
        let points = vec![DiePoint::new(1, 0), DiePoint::new(2, 0), DiePoint::new(0, 0)];
        // Order of the candidate list is preserved
        assert_eq!(
            apply_die_mask(points, &geometry),
            vec![DiePoint::new(1, 0), DiePoint::new(0, 0)]
        );
    }

    #[test]
    fn test_mask_unknown_is_permissive() {
        let geometry = geometry(ValidDieMask::Unknown);
        let points = vec![DiePoint::new(99, 99)];
        assert_eq!(apply_die_mask(points.clone(), &geometry), points);
    }

    #[test]
    fn test_disc_candidates_stay_in_radius() {
        let geometry = geometry(ValidDieMask::default());
        let candidates = generate_disc_candidates(&geometry);
        assert!(candidates.contains(&DiePoint::new(0, 0)));
        assert!(candidates.contains(&DiePoint::new(15, 0)));
        assert!(!candidates.contains(&DiePoint::new(16, 0)));
        for p in &candidates {
            assert!(distance_mm(*p, 10.0, 10.0) <= 150.0);
        }
    }

    #[test]
    fn test_canonical_sort_center_first() {
        let points = vec![DiePoint::new(2, 0), DiePoint::new(0, 0), DiePoint::new(1, 0)];
        let sorted = sort_canonical(points, 10.0, 10.0, 0.0);
        assert_eq!(
            sorted,
            vec![DiePoint::new(0, 0), DiePoint::new(1, 0), DiePoint::new(2, 0)]
        );
    }

    #[test]
    fn test_edge_first_sort_outermost_first() {
        let points = vec![DiePoint::new(1, 0), DiePoint::new(3, 0), DiePoint::new(2, 0)];
        let sorted = sort_edge_first(points, 10.0, 10.0, 0.0);
        assert_eq!(
            sorted,
            vec![DiePoint::new(3, 0), DiePoint::new(2, 0), DiePoint::new(1, 0)]
        );
    }

    #[test]
    fn test_rotation_changes_angular_tiebreak() {
        // Same distance, different angles: rotation re-ranks them
        let points = vec![DiePoint::new(0, 1), DiePoint::new(1, 0)];
        let unrotated = sort_canonical(points.clone(), 10.0, 10.0, 0.0);
        assert_eq!(unrotated[0], DiePoint::new(1, 0)); // 0 deg before 90 deg
        let rotated = sort_canonical(points, 10.0, 10.0, 300.0);
        assert_eq!(rotated[0], DiePoint::new(0, 1)); // 90+300=30 deg before 0+300=300 deg
    }

    #[test]
    fn test_stride_selection_spacing() {
        let candidates: Vec<DiePoint> = (0..10).map(|x| DiePoint::new(x, 0)).collect();
        let selected = select_with_stride(&candidates, 3);
        // floor(i * 10/3) = 0, 3, 6
        assert_eq!(
            selected,
            vec![DiePoint::new(0, 0), DiePoint::new(3, 0), DiePoint::new(6, 0)]
        );
    }

    #[test]
    fn test_stride_target_covering_returns_all() {
        let candidates: Vec<DiePoint> = (0..4).map(|x| DiePoint::new(x, 0)).collect();
        assert_eq!(select_with_stride(&candidates, 4), candidates);
        assert_eq!(select_with_stride(&candidates, 10), candidates);
        assert!(select_with_stride(&[], 3).is_empty());
    }

    #[test]
    fn test_enforce_bounds_truncates_in_order() {
        let candidates: Vec<DiePoint> = (0..10).map(|x| DiePoint::new(x, 0)).collect();
        let selected = enforce_point_bounds(candidates, 2, 4).unwrap();
        assert_eq!(selected.len(), 4);
        assert_eq!(selected[0], DiePoint::new(0, 0));
    }

    #[test]
    fn test_enforce_bounds_fails_below_minimum() {
        let candidates = vec![DiePoint::new(0, 0), DiePoint::new(1, 0)];
        let err = enforce_point_bounds(candidates, 5, 10).unwrap_err();
        assert!(matches!(
            err,
            SamplingError::CannotMeetMinPoints {
                required: 5,
                available: 2
            }
        ));
    }

    fn valid_request() -> SamplingRequest {
        SamplingRequest {
            wafer_geometry: geometry(ValidDieMask::default()),
            process_constraints: ProcessConstraints {
                process_step: String::new(),
                criticality: Default::default(),
                min_sampling_points: 5,
                max_sampling_points: 25,
                allowed_strategy_set: vec![],
            },
            tool_profile: ToolProfile {
                tool_type: String::new(),
                vendor: String::new(),
                model: None,
                coordinate_system_supported: vec![],
                max_points_per_wafer: 49,
                edge_die_supported: true,
                ordering_required: false,
                recipe_format: Default::default(),
            },
            strategy_id: "CENTER_EDGE".to_string(),
            strategy_config: None,
        }
    }

    #[test]
    fn test_validate_accepts_valid_request() {
        assert!(validate_request(&valid_request(), "CENTER_EDGE").is_ok());
    }

    #[test]
    fn test_validate_disallowed_strategy() {
        let mut request = valid_request();
        request.process_constraints.allowed_strategy_set = vec!["EDGE_ONLY".to_string()];
        let err = validate_request(&request, "CENTER_EDGE").unwrap_err();
        assert!(matches!(err, SamplingError::DisallowedStrategy { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut request = valid_request();
        request.wafer_geometry.wafer_size_mm = 0.0;
        assert!(matches!(
            validate_request(&request, "CENTER_EDGE").unwrap_err(),
            SamplingError::InvalidWaferSpec { .. }
        ));

        let mut request = valid_request();
        request.wafer_geometry.die_pitch_y_mm = -1.0;
        assert!(matches!(
            validate_request(&request, "CENTER_EDGE").unwrap_err(),
            SamplingError::InvalidWaferSpec { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_constraints() {
        let mut request = valid_request();
        request.process_constraints.min_sampling_points = 30;
        assert!(matches!(
            validate_request(&request, "CENTER_EDGE").unwrap_err(),
            SamplingError::InvalidConstraints { .. }
        ));

        let mut request = valid_request();
        request.tool_profile.max_points_per_wafer = 0;
        assert!(matches!(
            validate_request(&request, "CENTER_EDGE").unwrap_err(),
            SamplingError::InvalidConstraints { .. }
        ));
    }
}
