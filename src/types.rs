use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Point in the range sensor frame. The camera looks along -x; sensor y
/// maps to image right and sensor z to image up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RawPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Axis permutation into camera convention (x right, y down, z forward).
    #[inline]
    pub fn to_camera_axes(&self) -> Vector3<f64> {
        Vector3::new(self.y, -self.z, -self.x)
    }
}

/// Camera-frame point assigned to a beam layer, with its projected pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayeredPoint {
    /// Camera-frame position after calibration.
    pub pos: Vector3<f64>,
    /// Beam layer in `0..LAYER_COUNT`, ascending with elevation.
    pub layer: usize,
    /// Projected image column.
    pub u: usize,
    /// Projected image row.
    pub v: usize,
}

impl LayeredPoint {
    /// Lateral offset (camera x).
    #[inline]
    pub fn lateral(&self) -> f64 {
        self.pos.x
    }

    /// Forward depth (camera z).
    #[inline]
    pub fn forward(&self) -> f64 {
        self.pos.z
    }
}
