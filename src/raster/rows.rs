//! Analytic mapping from (beam layer, image column) to image row.
//!
//! The row is found by casting the column's ray at the layer's fixed
//! elevation through the calibration rotation, so it is defined for every
//! column whether or not the layer produced a sample there. Translation is
//! ignored: the mapping describes the ray direction at infinity.

use crate::calib::{BeamTable, CalibrationParams, LAYER_COUNT};
use crate::image::RowIndexGrid;
use nalgebra::{Matrix3, Vector3};

const EPS: f64 = 1e-12;

/// Camera geometry needed to trace beam rays.
#[derive(Clone, Debug)]
pub struct BeamRayTracer {
    width: usize,
    height: usize,
    focal: f64,
    cx: f64,
    cy: f64,
    rotation: Matrix3<f64>,
}

impl BeamRayTracer {
    pub fn new(params: &CalibrationParams) -> Self {
        let (cx, cy) = params.principal_point();
        Self {
            width: params.width,
            height: params.height,
            focal: params.focal,
            cx,
            cy,
            rotation: params.rotation(),
        }
    }

    /// Image row hit by the beam with elevation tangent `tan` at column `col`,
    /// clamped into the image. Degenerate rays fall back to the centre row.
    pub fn row_at(&self, tan: f64, col: usize) -> usize {
        let r = &self.rotation;
        let f = self.focal;
        let c = col as f64 - self.cx;

        let x_coef = f * r[(0, 0)] - c * r[(2, 0)];
        let rhs = (c * r[(2, 1)] - f * r[(0, 1)]) * tan + (c * r[(2, 2)] - f * r[(0, 2)]);
        let row = if x_coef.abs() > EPS {
            let cam = r * Vector3::new(rhs / x_coef, tan, 1.0);
            if cam.z > EPS {
                (self.cy + f * cam.y / cam.z).floor()
            } else {
                self.cy
            }
        } else {
            self.cy
        };
        row.clamp(0.0, (self.height - 1) as f64) as usize
    }

    /// Full 64-layer row-index grid.
    pub fn row_grid(&self, beams: &BeamTable) -> RowIndexGrid {
        let mut grid = RowIndexGrid::filled(self.width, LAYER_COUNT, 0);
        for layer in 0..LAYER_COUNT {
            let tan = beams.tan(layer);
            for col in 0..self.width {
                grid.set(col, layer, self.row_at(tan, col));
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CalibrationParams {
        CalibrationParams {
            width: 160,
            height: 120,
            focal: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn identity_rotation_gives_flat_rows() {
        let tracer = BeamRayTracer::new(&params());
        let tan = 0.1;
        let expected = (60.0f64 + 100.0 * tan).floor() as usize;
        for col in [0, 40, 80, 159] {
            assert_eq!(tracer.row_at(tan, col), expected);
        }
    }

    #[test]
    fn rows_ascend_with_layer() {
        let tracer = BeamRayTracer::new(&params());
        let grid = tracer.row_grid(&BeamTable::new());
        assert_eq!(grid.h, LAYER_COUNT);
        for col in [0, 80, 159] {
            for layer in 1..LAYER_COUNT {
                assert!(grid.get(col, layer) >= grid.get(col, layer - 1));
            }
        }
    }

    #[test]
    fn rows_stay_inside_the_image() {
        let p = CalibrationParams {
            roll: 900,
            pitch: 100,
            yaw: 700,
            ..params()
        };
        let tracer = BeamRayTracer::new(&p);
        let grid = tracer.row_grid(&BeamTable::new());
        assert!(grid.data.iter().all(|&v| v < p.height));
    }

    #[test]
    fn rotation_about_optical_axis_tilts_the_scanline() {
        let p = CalibrationParams {
            roll: 500,
            pitch: 500,
            yaw: 600,
            ..params()
        };
        let tracer = BeamRayTracer::new(&p);
        let tan = 0.0;
        // rotation about the optical axis turns a horizontal beam into a slope
        assert_ne!(tracer.row_at(tan, 10), tracer.row_at(tan, 150));
    }
}
