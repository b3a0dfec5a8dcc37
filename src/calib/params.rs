//! Calibration and mode parameters for one scan + camera pair.
//!
//! Rotation and translation come from integer "sliders" in `0..=1000`
//! centred at 500: one rotation unit is 1/1000 rad, one translation unit is
//! 1/100 of the scan's length unit.

use super::beams::LAYER_COUNT;
use crate::error::{DepthError, Result};
use crate::strategy::Method;
use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Neutral slider position.
pub const SLIDER_CENTER: i32 = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Pinhole focal length in pixels (shared by both axes).
    #[serde(alias = "f_xy")]
    pub focal: f64,
    pub roll: i32,
    pub pitch: i32,
    pub yaw: i32,
    #[serde(alias = "X")]
    pub x: i32,
    #[serde(alias = "Y")]
    pub y: i32,
    #[serde(alias = "Z")]
    pub z: i32,
    /// Guide image is the RGB camera (`<id>_rgb.png`) rather than thermal.
    #[serde(alias = "isRGB")]
    pub is_rgb: bool,
    /// Interpolate to every image row instead of the 64 beam rows.
    #[serde(alias = "isFullHeight")]
    pub is_full_height: bool,
    pub method: Method,
    /// Beam count of the simulated coarse sensor.
    pub layer_count: usize,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            focal: 640.0,
            roll: SLIDER_CENTER,
            pitch: SLIDER_CENTER,
            yaw: SLIDER_CENTER,
            x: SLIDER_CENTER,
            y: SLIDER_CENTER,
            z: SLIDER_CENTER,
            is_rgb: true,
            is_full_height: false,
            method: Method::Linear,
            layer_count: 16,
        }
    }
}

/// Slider value → radians.
#[inline]
pub fn slider_to_radians(v: i32) -> f64 {
    (v - SLIDER_CENTER) as f64 / 1000.0
}

/// Slider value → length units.
#[inline]
pub fn slider_to_offset(v: i32) -> f64 {
    (v - SLIDER_CENTER) as f64 / 100.0
}

impl CalibrationParams {
    /// `Rz(yaw) · Ry(pitch) · Rx(roll)`.
    pub fn rotation(&self) -> Matrix3<f64> {
        Rotation3::from_euler_angles(
            slider_to_radians(self.roll),
            slider_to_radians(self.pitch),
            slider_to_radians(self.yaw),
        )
        .into_inner()
    }

    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(
            slider_to_offset(self.x),
            slider_to_offset(self.y),
            slider_to_offset(self.z),
        )
    }

    /// Principal point, at the integer half of the image size.
    #[inline]
    pub fn principal_point(&self) -> (f64, f64) {
        ((self.width / 2) as f64, (self.height / 2) as f64)
    }

    /// Stride between kept layers of the down-sampled grid.
    #[inline]
    pub fn layer_stride(&self) -> usize {
        LAYER_COUNT / self.layer_count.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DepthError::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.focal > 0.0 && self.focal.is_finite()) {
            return Err(DepthError::InvalidFocalLength(self.focal));
        }
        if self.layer_count == 0 || self.layer_count > LAYER_COUNT {
            return Err(DepthError::InvalidLayerCount {
                got: self.layer_count,
                max: LAYER_COUNT,
            });
        }
        Ok(())
    }
}
