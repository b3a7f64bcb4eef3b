//! Read-only translation of sampling outputs into tool-executable recipes
//!
//! Converts die-grid coordinates to mm, enforces wafer boundary and tool
//! limits with deterministic truncation, and emits a tool-specific payload
//! with translation notes for traceability. The sampling output is only read;
//! the selection order from L3 is preserved through every step.

use log::debug;

use crate::model::{
    CoordinateSystem, DiePoint, Origin, RecipeRequest, RecipeResult, ToolProfile, ToolRecipe,
    WaferGeometry,
};
use crate::trace;

pub const TRANSLATOR_VERSION: &str = "1.0";

/// Fraction of the wafer radius beyond which dies count as edge dies
const EDGE_DIE_RADIUS_RATIO: f64 = 0.8;

/// Truncation beyond this fraction of the tool limit raises a warning
const SIGNIFICANT_TRUNCATION_RATIO: f64 = 0.2;

/// A selected point with its physical position resolved
#[derive(Debug, Clone, Copy, PartialEq)]
struct MmPoint {
    x_mm: f64,
    y_mm: f64,
    die: DiePoint,
}

/// Translate a sampling output into a tool recipe
pub fn translate(request: &RecipeRequest) -> RecipeResult {
    let geometry = &request.wafer_geometry;
    let tool = &request.tool_profile;

    let mut notes = Vec::new();
    let mut warnings = Vec::new();

    let mm_points = convert_to_mm(
        &request.sampling_output.ordered_points,
        geometry,
        &mut notes,
    );
    let in_bounds = apply_wafer_boundary(mm_points, geometry, &mut notes);
    let final_points = apply_tool_constraints(in_bounds, geometry, tool, &mut notes, &mut warnings);

    let payload = build_payload(&final_points, tool, geometry);
    let recipe_id = recipe_id(tool, &final_points, &notes);

    RecipeResult {
        tool_recipe: ToolRecipe {
            recipe_id,
            tool_type: tool.tool_type.clone(),
            recipe_payload: payload,
            translation_notes: notes,
            recipe_format_version: tool.recipe_format.version.clone(),
        },
        warnings,
    }
}

/// Die grid to physical mm, honoring the wafer origin convention
fn convert_to_mm(
    points: &[DiePoint],
    geometry: &WaferGeometry,
    notes: &mut Vec<String>,
) -> Vec<MmPoint> {
    let mm_points: Vec<MmPoint> = points
        .iter()
        .map(|die| {
            let (mut x_mm, mut y_mm) =
                die.position_mm(geometry.die_pitch_x_mm, geometry.die_pitch_y_mm);
            if geometry.origin == Origin::BottomLeft {
                x_mm += geometry.radius_mm();
                y_mm += geometry.radius_mm();
            }
            MmPoint {
                x_mm,
                y_mm,
                die: *die,
            }
        })
        .collect();

    if !mm_points.is_empty() {
        notes.push(format!(
            "Converted {} die coordinates to mm using pitch_x={}mm, pitch_y={}mm",
            mm_points.len(),
            geometry.die_pitch_x_mm,
            geometry.die_pitch_y_mm
        ));
    }
    mm_points
}

/// Drop points outside the wafer radius, preserving order
fn apply_wafer_boundary(
    points: Vec<MmPoint>,
    geometry: &WaferGeometry,
    notes: &mut Vec<String>,
) -> Vec<MmPoint> {
    let radius = geometry.radius_mm();
    let before = points.len();
    let kept: Vec<MmPoint> = points
        .into_iter()
        .filter(|p| (p.x_mm * p.x_mm + p.y_mm * p.y_mm).sqrt() <= radius)
        .collect();

    let filtered = before - kept.len();
    if filtered > 0 {
        notes.push(format!(
            "Filtered {filtered} points outside wafer boundary (radius={radius}mm)"
        ));
    }
    kept
}

/// Edge-die filtering and deterministic first-N truncation to the tool cap
fn apply_tool_constraints(
    points: Vec<MmPoint>,
    geometry: &WaferGeometry,
    tool: &ToolProfile,
    notes: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Vec<MmPoint> {
    if points.is_empty() {
        return points;
    }
    let incoming = points.len();

    let mut kept = points;
    if !tool.edge_die_supported {
        let edge_limit = geometry.radius_mm() * EDGE_DIE_RADIUS_RATIO;
        let before = kept.len();
        kept.retain(|p| (p.x_mm * p.x_mm + p.y_mm * p.y_mm).sqrt() <= edge_limit);
        let dropped = before - kept.len();
        if dropped > 0 {
            notes.push(format!(
                "Dropped {dropped} edge dies not supported by tool (beyond {edge_limit}mm)"
            ));
        }
    }

    let max_points = tool.max_points_per_wafer;
    if kept.len() > max_points {
        let truncated = kept.len() - max_points;
        kept.truncate(max_points);
        notes.push(format!(
            "Truncated {truncated} points to meet tool limit (max_points_per_wafer={max_points})"
        ));
        if truncated as f64 > max_points as f64 * SIGNIFICANT_TRUNCATION_RATIO {
            warnings.push("SIGNIFICANT_POINT_TRUNCATION".to_string());
        }
    }

    debug!(
        "tool constraints kept {} of {} translated points",
        kept.len(),
        incoming
    );
    notes.push(format!(
        "Applied tool constraints: kept_count={}, dropped_count={}",
        kept.len(),
        incoming - kept.len()
    ));
    kept
}

/// Round a coordinate to micrometer precision for the payload
fn round_um(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn build_payload(
    points: &[MmPoint],
    tool: &ToolProfile,
    geometry: &WaferGeometry,
) -> serde_json::Value {
    let measurement_points: Vec<serde_json::Value> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            serde_json::json!({
                "point_id": i + 1,
                "x_mm": round_um(p.x_mm),
                "y_mm": round_um(p.y_mm),
                "die_x": p.die.die_x,
                "die_y": p.die.die_y,
            })
        })
        .collect();

    // Prefer the die grid when the tool accepts it, else fall back to mm
    let coordinate_system = if tool
        .coordinate_system_supported
        .contains(&CoordinateSystem::DieGrid)
    {
        CoordinateSystem::DieGrid
    } else {
        CoordinateSystem::Mm
    };

    serde_json::json!({
        "tool_type": tool.tool_type,
        "vendor": tool.vendor,
        "coordinate_system": coordinate_system.as_str(),
        "measurement_points": measurement_points,
        "point_count": points.len(),
        "measurement_order": if tool.ordering_required { "SEQUENTIAL" } else { "OPTIMIZED" },
        "format_type": tool.recipe_format.r#type,
        "format_version": tool.recipe_format.version,
        "wafer_info": {
            "wafer_size_mm": geometry.wafer_size_mm,
            "die_pitch_x_mm": geometry.die_pitch_x_mm,
            "die_pitch_y_mm": geometry.die_pitch_y_mm,
        },
    })
}

/// Deterministic recipe id from tool identity and the selected endpoints
fn recipe_id(tool: &ToolProfile, points: &[MmPoint], notes: &[String]) -> String {
    let mut signature = format!("{}", points.len());
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        signature.push_str(&format!(
            "_{:.1}_{:.1}_{:.1}_{:.1}",
            first.x_mm, first.y_mm, last.x_mm, last.y_mm
        ));
    }
    let content = format!(
        "{}_{}_{}_{}",
        tool.tool_type,
        tool.vendor,
        signature,
        notes.len()
    );
    trace::content_id(&content)
}
