//! Projection of raw scans into camera space and beam layers.
//!
//! For every raw point:
//! - permute axes into the camera convention,
//! - apply the slider rotation and translation,
//! - reject points behind the camera or projecting outside the image,
//! - bucket the point into the beam layer whose tangent is the lower bound
//!   of its elevation ratio (measured on the unrotated sensor ray, so the
//!   layer is a property of the beam and not of the calibration).
//!
//! Points keep their acquisition order inside each layer.

use super::beams::{BeamTable, LAYER_COUNT};
use super::params::CalibrationParams;
use crate::types::{LayeredPoint, RawPoint};
use log::debug;
use nalgebra::{Matrix3, Vector3};

/// Per-layer point lists, index = beam layer.
pub type BeamLayers = Vec<Vec<LayeredPoint>>;

#[derive(Clone, Debug)]
pub struct CalibrationProjector {
    width: usize,
    height: usize,
    focal: f64,
    cx: f64,
    cy: f64,
    rotation: Matrix3<f64>,
    translation: Vector3<f64>,
    beams: BeamTable,
}

impl CalibrationProjector {
    pub fn new(params: &CalibrationParams) -> Self {
        let (cx, cy) = params.principal_point();
        Self {
            width: params.width,
            height: params.height,
            focal: params.focal,
            cx,
            cy,
            rotation: params.rotation(),
            translation: params.translation(),
            beams: BeamTable::new(),
        }
    }

    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    pub fn beams(&self) -> &BeamTable {
        &self.beams
    }

    /// Pinhole projection of a camera-frame point to a pixel, or `None` when
    /// it lies behind the camera or outside the image.
    #[inline]
    pub fn pixel_of(&self, p: &Vector3<f64>) -> Option<(usize, usize)> {
        if p.z <= 0.0 {
            return None;
        }
        let u = (self.cx + self.focal * p.x / p.z).floor();
        let v = (self.cy + self.focal * p.y / p.z).floor();
        if u < 0.0 || v < 0.0 || u >= self.width as f64 || v >= self.height as f64 {
            return None;
        }
        Some((u as usize, v as usize))
    }

    /// Calibrate, project and bucket a single raw point.
    pub fn project_point(&self, raw: &RawPoint) -> Option<LayeredPoint> {
        let sensor = raw.to_camera_axes();
        let pos = self.rotation * sensor + self.translation;
        let (u, v) = self.pixel_of(&pos)?;
        let horizontal = (sensor.x * sensor.x + sensor.z * sensor.z).sqrt();
        if horizontal <= 0.0 {
            return None;
        }
        let layer = self.beams.layer_of(sensor.y / horizontal);
        Some(LayeredPoint { pos, layer, u, v })
    }

    /// Project a whole scan. The input is left untouched.
    pub fn project(&self, points: &[RawPoint]) -> BeamLayers {
        let mut layers: BeamLayers = vec![Vec::new(); LAYER_COUNT];
        for p in points.iter().filter_map(|raw| self.project_point(raw)) {
            layers[p.layer].push(p);
        }
        debug!(
            "CalibrationProjector::project input={} kept={}",
            points.len(),
            layers.iter().map(Vec::len).sum::<usize>()
        );
        layers
    }
}
