//! Wafer geometry types: die grid points, valid-die masks, wafer spec

use serde::{Deserialize, Serialize};

/// Integer die-grid coordinate relative to wafer center
///
/// Die units, not mm; physical position is `(die_x * pitch_x, die_y * pitch_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiePoint {
    pub die_x: i32,
    pub die_y: i32,
}

impl DiePoint {
    pub fn new(die_x: i32, die_y: i32) -> Self {
        Self { die_x, die_y }
    }

    /// Physical position in mm for the given die pitches
    pub fn position_mm(&self, pitch_x: f64, pitch_y: f64) -> (f64, f64) {
        (self.die_x as f64 * pitch_x, self.die_y as f64 * pitch_y)
    }
}

/// Which dies on the wafer are valid measurement candidates
///
/// An unrecognized mask tag deserializes to `Unknown` and passes all
/// candidates through unfiltered. That fallback is deliberate: masks come
/// from external wafer map files, and a new tag must not reject the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValidDieMask {
    /// Keep dies whose center distance from wafer center is within the radius
    #[serde(rename = "EDGE_EXCLUSION")]
    EdgeExclusion {
        #[serde(default)]
        radius_mm: Option<f64>,
    },

    /// Keep only the listed dies
    #[serde(rename = "EXPLICIT_LIST")]
    ExplicitList {
        #[serde(default)]
        valid_die_list: Vec<DiePoint>,
    },

    /// Unrecognized tag, treated permissively
    #[serde(other)]
    Unknown,
}

impl Default for ValidDieMask {
    fn default() -> Self {
        ValidDieMask::EdgeExclusion { radius_mm: None }
    }
}

/// Wafer coordinate origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Origin {
    #[serde(rename = "CENTER")]
    #[default]
    Center,
    #[serde(rename = "BOTTOM_LEFT")]
    BottomLeft,
}

/// Wafer dimensions, die pitch, and valid-die mask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaferGeometry {
    /// Wafer diameter in mm, strictly positive
    pub wafer_size_mm: f64,
    /// Die pitch along x in mm, strictly positive
    pub die_pitch_x_mm: f64,
    /// Die pitch along y in mm, strictly positive
    pub die_pitch_y_mm: f64,
    #[serde(default)]
    pub valid_die_mask: ValidDieMask,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub notch_orientation_deg: f64,
}

impl WaferGeometry {
    /// Wafer radius in mm
    pub fn radius_mm(&self) -> f64 {
        self.wafer_size_mm / 2.0
    }
}
