//! Rasterization of occlusion-filtered layers into per-column grids.
//!
//! Each layer becomes one grid row:
//! - `reference`: a sample's depth at the column it projects to, sentinel
//!   elsewhere; the row-index grid records the sample's actual image row at
//!   that column.
//! - `reference_interpolated`: depth at every column, following the 3D line
//!   between consecutive samples (perspective-correct), and extending the
//!   end samples' depths to the image borders.
//!
//! Every `64 / layer_count`-th layer is then copied out to simulate a
//! coarser sensor.

use super::rows::BeamRayTracer;
use crate::calib::{BeamLayers, BeamTable, CalibrationParams, LAYER_COUNT};
use crate::image::{DepthGrid, ImageViewMut, RowIndexGrid};
use crate::types::LayeredPoint;
use log::debug;

const EPS: f64 = 1e-12;

/// All grids produced for one frame.
#[derive(Clone, Debug)]
pub struct RasterizedFrame {
    /// 64-layer sparse samples (ground truth for evaluation).
    pub reference: DepthGrid,
    /// 64-layer scan-line interpolated depths.
    pub reference_interpolated: DepthGrid,
    /// 64-layer row-index grid.
    pub reference_rows: RowIndexGrid,
    /// Down-sampled sparse samples.
    pub sparse: DepthGrid,
    /// Down-sampled scan-line interpolated depths.
    pub sparse_interpolated: DepthGrid,
    /// Down-sampled row-index grid.
    pub sparse_rows: RowIndexGrid,
}

#[derive(Clone, Debug)]
pub struct ScanlineRasterizer {
    width: usize,
    focal: f64,
    cx: f64,
    layer_count: usize,
    layer_stride: usize,
    tracer: BeamRayTracer,
    beams: BeamTable,
}

impl ScanlineRasterizer {
    pub fn new(params: &CalibrationParams) -> Self {
        let (cx, _) = params.principal_point();
        Self {
            width: params.width,
            focal: params.focal,
            cx,
            layer_count: params.layer_count,
            layer_stride: params.layer_stride(),
            tracer: BeamRayTracer::new(params),
            beams: BeamTable::new(),
        }
    }

    /// Depth where the ray through image column `col` meets the line through
    /// `a` and `b` in the camera x–z plane. Degenerate geometry (ray parallel
    /// to the segment, or an intersection behind the camera) falls back to
    /// `a`'s depth.
    pub fn depth_on_segment(&self, a: &LayeredPoint, b: &LayeredPoint, col: usize) -> f64 {
        let t = (col as f64 - self.cx) / self.focal;
        let dx = b.pos.x - a.pos.x;
        let dz = b.pos.z - a.pos.z;
        let denom = t * dz - dx;
        if denom.abs() <= EPS {
            return a.pos.z;
        }
        let z = (a.pos.x * dz - a.pos.z * dx) / denom;
        if z > 0.0 && z.is_finite() {
            z
        } else {
            a.pos.z
        }
    }

    /// Rasterize one layer into its three grid rows. An empty layer leaves
    /// the rows untouched.
    pub fn rasterize_layer(
        &self,
        points: &[LayeredPoint],
        depth: &mut [f64],
        interpolated: &mut [f64],
        rows: &mut [usize],
    ) {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };
        let w = self.width;

        let mut now = 0usize;
        while now < first.u.min(w) {
            interpolated[now] = first.pos.z;
            now += 1;
        }
        for pair in points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            depth[a.u] = a.pos.z;
            rows[a.u] = a.v;
            while now < b.u.min(w) {
                interpolated[now] = self.depth_on_segment(a, b, now);
                now += 1;
            }
        }
        depth[last.u] = last.pos.z;
        rows[last.u] = last.v;
        while now < w {
            interpolated[now] = last.pos.z;
            now += 1;
        }
    }

    /// Rasterize all 64 layers and derive the down-sampled grids.
    pub fn rasterize(&self, layers: &BeamLayers) -> RasterizedFrame {
        let w = self.width;
        let mut reference = DepthGrid::empty(w, LAYER_COUNT);
        let mut reference_interpolated = DepthGrid::empty(w, LAYER_COUNT);
        let mut reference_rows = self.tracer.row_grid(&self.beams);

        for (layer, points) in layers.iter().enumerate().take(LAYER_COUNT) {
            self.rasterize_layer(
                points,
                reference.row_mut(layer),
                reference_interpolated.row_mut(layer),
                reference_rows.row_mut(layer),
            );
        }

        let sparse = reference.select_rows(self.layer_stride, self.layer_count);
        let sparse_interpolated =
            reference_interpolated.select_rows(self.layer_stride, self.layer_count);
        let sparse_rows = reference_rows.select_rows(self.layer_stride, self.layer_count);
        debug!(
            "ScanlineRasterizer::rasterize w={} samples={} sparse_layers={} stride={}",
            w,
            reference.valid_count(),
            self.layer_count,
            self.layer_stride
        );

        RasterizedFrame {
            reference,
            reference_interpolated,
            reference_rows,
            sparse,
            sparse_interpolated,
            sparse_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{is_valid_depth, ImageView};
    use nalgebra::Vector3;

    fn params() -> CalibrationParams {
        CalibrationParams {
            width: 20,
            height: 10,
            focal: 10.0,
            layer_count: 16,
            ..Default::default()
        }
    }

    fn pt(x: f64, z: f64, u: usize, v: usize) -> LayeredPoint {
        LayeredPoint {
            pos: Vector3::new(x, 0.0, z),
            layer: 0,
            u,
            v,
        }
    }

    #[test]
    fn segment_depth_is_exact_on_a_fronto_parallel_wall() {
        let r = ScanlineRasterizer::new(&params());
        // wall at z = 5 between x = -2 and x = 3
        let a = pt(-2.0, 5.0, 6, 5);
        let b = pt(3.0, 5.0, 16, 5);
        for col in 6..16 {
            assert!((r.depth_on_segment(&a, &b, col) - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn segment_depth_follows_slanted_line_not_linear_blend() {
        let r = ScanlineRasterizer::new(&params());
        // line from (0, 4) to (4, 8): z = x + 4; ray at col 14 → t = 0.4
        let a = pt(0.0, 4.0, 10, 5);
        let b = pt(4.0, 8.0, 15, 5);
        let z = r.depth_on_segment(&a, &b, 14);
        // z = 0.4 z + 4 → z = 4 / 0.6
        assert!((z - 4.0 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn layer_row_edges_extend_endpoint_depths() {
        let r = ScanlineRasterizer::new(&params());
        let pts = vec![pt(-2.0, 5.0, 6, 4), pt(3.0, 5.0, 16, 6)];
        let mut depth = vec![-1.0; 20];
        let mut interp = vec![-1.0; 20];
        let mut rows = vec![0usize; 20];
        r.rasterize_layer(&pts, &mut depth, &mut interp, &mut rows);
        assert_eq!(depth[6], 5.0);
        assert_eq!(depth[16], 5.0);
        assert_eq!(rows[6], 4);
        assert_eq!(rows[16], 6);
        assert_eq!(depth.iter().filter(|z| is_valid_depth(**z)).count(), 2);
        assert!(interp.iter().all(|z| (z - 5.0).abs() < 1e-12));
    }

    #[test]
    fn empty_layer_stays_sentinel() {
        let r = ScanlineRasterizer::new(&params());
        let layers: BeamLayers = vec![Vec::new(); LAYER_COUNT];
        let frame = r.rasterize(&layers);
        assert_eq!(frame.reference.valid_count(), 0);
        assert_eq!(frame.reference_interpolated.valid_count(), 0);
        assert_eq!(frame.sparse.h, 16);
        assert_eq!(frame.sparse_rows.h, 16);
    }

    #[test]
    fn down_sampling_keeps_every_stride_layer() {
        let r = ScanlineRasterizer::new(&params());
        let mut layers: BeamLayers = vec![Vec::new(); LAYER_COUNT];
        layers[8].push(pt(0.0, 7.0, 10, 3));
        layers[9].push(pt(0.0, 9.0, 10, 3));
        let frame = r.rasterize(&layers);
        // stride 4: layer 8 → sparse row 2, layer 9 dropped
        assert_eq!(frame.sparse.get(10, 2), 7.0);
        assert_eq!(frame.sparse.valid_count(), 1);
        assert_eq!(frame.sparse_rows.row(2), frame.reference_rows.row(8));
        assert_eq!(frame.sparse_interpolated.row(2), frame.reference_interpolated.row(8));
    }
}
