//! Frame scoring against the 64-layer reference and the CSV report.
//!
//! The dense output is first read back on the comparison rows (see
//! [`RowTargets`](crate::raster::RowTargets)), then compared cell by cell
//! with the reference samples. Only cells where the reference holds a
//! sample take part; `coverage` is the share of those the output also
//! filled.

use crate::image::{is_valid_depth, DepthGrid};
use crate::pipeline::CompletionReport;
use crate::strategy::{gather, scatter};
use serde::Serialize;
use std::io::{self, Write};

/// Block-SSIM stabilisers, relative to the dynamic range.
const SSIM_K1: f64 = 0.01;
const SSIM_K2: f64 = 0.03;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameScores {
    pub ssim: f64,
    pub mse: f64,
    pub mre: f64,
    pub coverage: f64,
}

/// Dense output expressed on the comparison rows.
pub fn reproject(report: &CompletionReport) -> DepthGrid {
    let rows = &report.rows;
    if rows.target_rows == rows.comparison_rows {
        return report.dense.clone();
    }
    let image = scatter(&report.dense, &rows.target_rows, report.image_height);
    gather(&image, &rows.comparison_rows)
}

/// Score one frame. SSIM uses square blocks of the down-sampling stride.
pub fn evaluate_report(report: &CompletionReport) -> FrameScores {
    let estimate = reproject(report);
    let reference = &report.frame.reference;
    let block = (reference.h / report.layer_count.max(1)).max(1);
    let (mse, mre, compared) = errors(reference, &estimate);
    let support = reference.valid_count();
    FrameScores {
        ssim: ssim(reference, &estimate, block),
        mse,
        mre,
        coverage: if support > 0 {
            compared as f64 / support as f64
        } else {
            0.0
        },
    }
}

/// Mean squared and mean relative error over cells valid in both grids,
/// with the number of such cells. Both means are 0 when nothing overlaps.
pub fn errors(reference: &DepthGrid, estimate: &DepthGrid) -> (f64, f64, usize) {
    let mut sq = 0.0;
    let mut rel = 0.0;
    let mut n = 0usize;
    for (&r, &e) in reference.data.iter().zip(&estimate.data) {
        if !is_valid_depth(r) || !is_valid_depth(e) {
            continue;
        }
        let d = e - r;
        sq += d * d;
        rel += d.abs() / r;
        n += 1;
    }
    if n == 0 {
        return (0.0, 0.0, 0);
    }
    (sq / n as f64, rel / n as f64, n)
}

pub fn mse(reference: &DepthGrid, estimate: &DepthGrid) -> f64 {
    errors(reference, estimate).0
}

pub fn mre(reference: &DepthGrid, estimate: &DepthGrid) -> f64 {
    errors(reference, estimate).1
}

/// Mean SSIM over non-overlapping `block × block` tiles.
///
/// Cells without a reference sample are zero in both grids, as are invalid
/// estimates. The dynamic range is the largest reference depth.
pub fn ssim(reference: &DepthGrid, estimate: &DepthGrid, block: usize) -> f64 {
    let block = block.max(1);
    let (w, h) = (reference.w, reference.h);
    let (bw, bh) = (w / block, h / block);
    if bw == 0 || bh == 0 {
        return 0.0;
    }
    let range = reference
        .data
        .iter()
        .copied()
        .filter(|&z| is_valid_depth(z))
        .fold(0.0f64, f64::max);
    let range = if range > 0.0 { range } else { 1.0 };
    let c1 = (SSIM_K1 * range).powi(2);
    let c2 = (SSIM_K2 * range).powi(2);

    let masked = |x: usize, y: usize| -> (f64, f64) {
        let r = reference.get(x, y);
        if !is_valid_depth(r) {
            return (0.0, 0.0);
        }
        let e = estimate.get(x, y);
        (r, if is_valid_depth(e) { e } else { 0.0 })
    };

    let n = (block * block) as f64;
    let mut total = 0.0;
    for by in 0..bh {
        for bx in 0..bw {
            let (mut sr, mut se, mut srr, mut see, mut sre) = (0.0, 0.0, 0.0, 0.0, 0.0);
            for y in by * block..(by + 1) * block {
                for x in bx * block..(bx + 1) * block {
                    let (r, e) = masked(x, y);
                    sr += r;
                    se += e;
                    srr += r * r;
                    see += e * e;
                    sre += r * e;
                }
            }
            let (mr, me) = (sr / n, se / n);
            let var_r = (srr / n - mr * mr).max(0.0);
            let var_e = (see / n - me * me).max(0.0);
            let cov = sre / n - mr * me;
            total += ((2.0 * mr * me + c1) * (2.0 * cov + c2))
                / ((mr * mr + me * me + c1) * (var_r + var_e + c2));
        }
    }
    total / (bw * bh) as f64
}

/// CSV report, one row per frame.
pub struct ReportWriter<W: Write> {
    out: W,
    rows: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, rows: 0 }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "frame,elapsed_ms,ssim,mse,mre")
    }

    pub fn write_row(&mut self, frame: u32, elapsed_ms: f64, scores: &FrameScores) -> io::Result<()> {
        self.rows += 1;
        writeln!(
            self.out,
            "{},{:.3},{:.6},{:.6},{:.6}",
            frame, elapsed_ms, scores.ssim, scores.mse, scores.mre
        )
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::NO_DEPTH;

    fn sparse_reference() -> DepthGrid {
        let mut g = DepthGrid::empty(8, 8);
        for y in 0..8 {
            for x in (y % 2..8).step_by(2) {
                g.set(x, y, 2.0 + (x + y) as f64 * 0.5);
            }
        }
        g
    }

    #[test]
    fn perfect_reconstruction_scores_ideal() {
        let reference = sparse_reference();
        let mut estimate = reference.clone();
        // extra output where the reference has no sample is ignored
        estimate.set(1, 0, 42.0);
        let (mse, mre, n) = errors(&reference, &estimate);
        assert_eq!(n, reference.valid_count());
        assert_eq!(mse, 0.0);
        assert_eq!(mre, 0.0);
        assert!((ssim(&reference, &estimate, 4) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_offset_gives_expected_errors() {
        let reference = DepthGrid::from_vec(2, 1, vec![2.0, 4.0]);
        let estimate = DepthGrid::from_vec(2, 1, vec![3.0, 5.0]);
        assert!((mse(&reference, &estimate) - 1.0).abs() < 1e-12);
        assert!((mre(&reference, &estimate) - 0.375).abs() < 1e-12);
    }

    #[test]
    fn disjoint_support_has_no_overlap() {
        let reference = DepthGrid::from_vec(2, 1, vec![2.0, NO_DEPTH]);
        let estimate = DepthGrid::from_vec(2, 1, vec![NO_DEPTH, 5.0]);
        assert_eq!(errors(&reference, &estimate), (0.0, 0.0, 0));
    }

    #[test]
    fn degraded_estimate_lowers_ssim() {
        let reference = sparse_reference();
        let mut estimate = reference.clone();
        for z in estimate.data.iter_mut().step_by(3) {
            if is_valid_depth(*z) {
                *z *= 3.0;
            }
        }
        assert!(ssim(&reference, &estimate, 4) < 0.99);
    }

    #[test]
    fn report_writer_emits_header_and_rows() {
        let mut writer = ReportWriter::new(Vec::new());
        writer.write_header().unwrap();
        let scores = FrameScores {
            ssim: 0.5,
            mse: 1.25,
            mre: 0.1,
            coverage: 1.0,
        };
        writer.write_row(1100, 12.0, &scores).unwrap();
        assert_eq!(writer.rows_written(), 1);
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "frame,elapsed_ms,ssim,mse,mre\n1100,12.000,0.500000,1.250000,0.100000\n"
        );
    }
}
