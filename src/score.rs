//! Read-only scoring of sampling outputs
//!
//! Evaluates an L3 selection for spatial coverage, statistical adequacy, and
//! alignment with process criticality, then combines the three into a
//! weighted overall score. Scoring never touches the selection it is handed;
//! the request is taken by shared reference and only read.

use crate::model::{
    Criticality, DiePoint, ProcessConstraints, ScoreReport, ScoreRequest, WaferGeometry,
};
use crate::strategy::common::distance_mm;

pub const SCORER_VERSION: &str = "1.0";

const COVERAGE_WEIGHT: f64 = 0.3;
const STATISTICAL_WEIGHT: f64 = 0.4;
const RISK_WEIGHT: f64 = 0.3;

/// Score a sampling output for quality and adequacy
pub fn score(request: &ScoreRequest) -> ScoreReport {
    let points = &request.sampling_output.ordered_points;
    let geometry = &request.wafer_geometry;
    let constraints = &request.process_constraints;

    let coverage_score = coverage_score(points, geometry);
    let statistical_score = statistical_score(points, constraints);
    let risk_alignment_score = risk_alignment_score(points, constraints, geometry);
    let overall_score = overall(coverage_score, statistical_score, risk_alignment_score);

    let warnings = score_warnings(
        points,
        constraints,
        coverage_score,
        statistical_score,
        risk_alignment_score,
        overall_score,
    );

    ScoreReport {
        coverage_score,
        statistical_score,
        risk_alignment_score,
        overall_score,
        warnings,
        version: SCORER_VERSION.to_string(),
    }
}

/// Ring-diversity coverage: which of the four radial bands are hit
///
/// Band 0 is the immediate center (within one x-pitch), then inner, middle,
/// and outer thirds of the wafer radius. Score is bands hit out of four.
fn coverage_score(points: &[DiePoint], geometry: &WaferGeometry) -> f64 {
    if points.is_empty() {
        return 0.0;
    }

    let radius = geometry.radius_mm();
    let mut bands_hit = [false; 4];
    for point in points {
        let distance = distance_mm(*point, geometry.die_pitch_x_mm, geometry.die_pitch_y_mm);
        let band = if distance <= geometry.die_pitch_x_mm {
            0
        } else if distance <= radius * 0.33 {
            1
        } else if distance <= radius * 0.67 {
            2
        } else {
            3
        };
        bands_hit[band] = true;
    }

    let hit = bands_hit.iter().filter(|b| **b).count();
    (hit as f64 / 4.0).min(1.0)
}

/// Statistical adequacy: 1.0 at or above the minimum, linear penalty below
fn statistical_score(points: &[DiePoint], constraints: &ProcessConstraints) -> f64 {
    let count = points.len();
    let min_points = constraints.min_sampling_points;

    if count >= min_points || min_points == 0 {
        1.0
    } else {
        count as f64 / min_points as f64
    }
}

/// Alignment between spatial distribution and process criticality
fn risk_alignment_score(
    points: &[DiePoint],
    constraints: &ProcessConstraints,
    geometry: &WaferGeometry,
) -> f64 {
    if points.is_empty() {
        return 0.0;
    }

    match constraints.criticality {
        Criticality::High => high_criticality_score(points, geometry),
        Criticality::Medium => medium_criticality_score(points, geometry),
        Criticality::Low => low_criticality_score(points),
    }
}

/// HIGH criticality wants strong edge coverage and enough total points
fn high_criticality_score(points: &[DiePoint], geometry: &WaferGeometry) -> f64 {
    let outer_threshold = geometry.radius_mm() * 0.67;
    let edge_points = points
        .iter()
        .filter(|p| {
            distance_mm(**p, geometry.die_pitch_x_mm, geometry.die_pitch_y_mm) > outer_threshold
        })
        .count();

    let required_edge_ratio = 0.3;
    let edge_ratio = edge_points as f64 / points.len() as f64;
    let edge_score = (edge_ratio / required_edge_ratio).min(1.0);

    let min_points_for_high = 8.0;
    let point_adequacy = (points.len() as f64 / min_points_for_high).min(1.0);

    (edge_score + point_adequacy) / 2.0
}

/// MEDIUM criticality wants a balance of center and edge coverage
fn medium_criticality_score(points: &[DiePoint], geometry: &WaferGeometry) -> f64 {
    let radius = geometry.radius_mm();
    let center_threshold = radius * 0.33;
    let edge_threshold = radius * 0.67;

    let mut center_points = 0usize;
    let mut edge_points = 0usize;
    for point in points {
        let distance = distance_mm(*point, geometry.die_pitch_x_mm, geometry.die_pitch_y_mm);
        if distance <= center_threshold {
            center_points += 1;
        } else if distance > edge_threshold {
            edge_points += 1;
        }
    }

    let center_ratio = center_points as f64 / points.len() as f64;
    let edge_ratio = edge_points as f64 / points.len() as f64;

    let center_score = if (0.2..=0.6).contains(&center_ratio) {
        1.0
    } else {
        (1.0 - (center_ratio - 0.4).abs()).max(0.5)
    };
    let edge_score = if (0.15..=0.4).contains(&edge_ratio) {
        1.0
    } else {
        (1.0 - (edge_ratio - 0.25).abs()).max(0.5)
    };

    (center_score + edge_score) / 2.0
}

/// LOW criticality is forgiving: a handful of points scores full marks
fn low_criticality_score(points: &[DiePoint]) -> f64 {
    let min_reasonable = 3;
    if points.len() >= min_reasonable {
        1.0
    } else {
        0.7 + (points.len() as f64 / min_reasonable as f64) * 0.3
    }
}

fn overall(coverage: f64, statistical: f64, risk: f64) -> f64 {
    let weighted =
        coverage * COVERAGE_WEIGHT + statistical * STATISTICAL_WEIGHT + risk * RISK_WEIGHT;
    weighted.clamp(0.0, 1.0)
}

fn score_warnings(
    points: &[DiePoint],
    constraints: &ProcessConstraints,
    coverage: f64,
    statistical: f64,
    risk: f64,
    overall_score: f64,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if statistical < 0.8 && points.len() < constraints.min_sampling_points {
        warnings.push("INSUFFICIENT_SAMPLING_POINTS".to_string());
    }
    if coverage < 0.5 {
        warnings.push("POOR_SPATIAL_COVERAGE".to_string());
    }
    if risk < 0.7 {
        if constraints.criticality == Criticality::High {
            warnings.push("HIGH_CRITICALITY_INADEQUATE_COVERAGE".to_string());
        } else {
            warnings.push("SUBOPTIMAL_RISK_ALIGNMENT".to_string());
        }
    }
    if overall_score < 0.6 {
        warnings.push("OVERALL_SAMPLING_QUALITY_LOW".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Origin, SamplingOutput, SamplingTrace, ValidDieMask};

    fn geometry() -> WaferGeometry {
        WaferGeometry {
            wafer_size_mm: 300.0,
            die_pitch_x_mm: 10.0,
            die_pitch_y_mm: 10.0,
            valid_die_mask: ValidDieMask::default(),
            origin: Origin::Center,
            notch_orientation_deg: 0.0,
        }
    }

    fn constraints(criticality: Criticality, min: usize) -> ProcessConstraints {
        ProcessConstraints {
            process_step: String::new(),
            criticality,
            min_sampling_points: min,
            max_sampling_points: 50,
            allowed_strategy_set: vec![],
        }
    }

    fn request(points: Vec<DiePoint>, criticality: Criticality, min: usize) -> ScoreRequest {
        ScoreRequest {
            wafer_geometry: geometry(),
            process_constraints: constraints(criticality, min),
            sampling_output: SamplingOutput {
                strategy_id: "CENTER_EDGE".to_string(),
                ordered_points: points,
                trace: SamplingTrace {
                    strategy_version: "1.0".to_string(),
                    generated_at: "2024-01-01T12:00:00Z".to_string(),
                },
            },
        }
    }

    #[test]
    fn test_empty_selection_scores_zero_coverage() {
        let report = score(&request(vec![], Criticality::Medium, 0));
        assert_eq!(report.coverage_score, 0.0);
        assert_eq!(report.risk_alignment_score, 0.0);
    }

    #[test]
    fn test_all_scores_within_unit_interval() {
        let points = vec![
            DiePoint::new(0, 0),
            DiePoint::new(3, 0),
            DiePoint::new(8, 0),
            DiePoint::new(14, 0),
        ];
        for criticality in [Criticality::High, Criticality::Medium, Criticality::Low] {
            let report = score(&request(points.clone(), criticality, 2));
            for value in [
                report.coverage_score,
                report.statistical_score,
                report.risk_alignment_score,
                report.overall_score,
            ] {
                assert!((0.0..=1.0).contains(&value), "out of range: {value}");
            }
        }
    }

    #[test]
    fn test_full_band_spread_scores_full_coverage() {
        // Center, inner, middle, outer bands all hit
        let points = vec![
            DiePoint::new(0, 0),
            DiePoint::new(3, 0),
            DiePoint::new(8, 0),
            DiePoint::new(14, 0),
        ];
        let report = score(&request(points, Criticality::Medium, 1));
        assert_eq!(report.coverage_score, 1.0);
    }

    #[test]
    fn test_statistical_penalty_below_minimum() {
        let points = vec![DiePoint::new(0, 0), DiePoint::new(1, 0)];
        let report = score(&request(points, Criticality::Low, 4));
        assert_eq!(report.statistical_score, 0.5);
        assert!(report
            .warnings
            .contains(&"INSUFFICIENT_SAMPLING_POINTS".to_string()));
    }

    #[test]
    fn test_high_criticality_rewards_edge_heavy_selection() {
        let edge_heavy: Vec<DiePoint> = (0..10)
            .map(|i| if i < 5 { DiePoint::new(14, i) } else { DiePoint::new(-14, i - 5) })
            .collect();
        let center_only: Vec<DiePoint> = (0..10).map(|i| DiePoint::new(0, i % 2)).collect();

        let edge_report = score(&request(edge_heavy, Criticality::High, 1));
        let center_report = score(&request(center_only, Criticality::High, 1));
        assert!(edge_report.risk_alignment_score > center_report.risk_alignment_score);
        assert!(center_report
            .warnings
            .contains(&"HIGH_CRITICALITY_INADEQUATE_COVERAGE".to_string()));
    }

    #[test]
    fn test_low_criticality_is_forgiving() {
        let points = vec![DiePoint::new(0, 0), DiePoint::new(1, 0), DiePoint::new(0, 1)];
        let report = score(&request(points, Criticality::Low, 1));
        assert_eq!(report.risk_alignment_score, 1.0);
    }
}
