//! Pixel-weighted average strategy (PWAS).
//!
//! The down-sampled grid is scattered into image space, then every target
//! cell averages the valid scattered samples inside an `r × r` window of the
//! target grid. Each neighbour's weight is the product of
//! - a spatial Gaussian on the window offset (`sigma_s`),
//! - a colour Gaussian on the guide-image difference to the centre
//!   (`sigma_r`),
//! - the neighbour's credibility, a Gaussian on the guide's local colour
//!   Laplacian (`sigma_c`), which discounts samples sitting on image edges.
//!
//! Rows are independent and computed in parallel.

use super::{scatter, Interpolator, Method, PwasOptions, StrategyInput};
use crate::error::Result;
use crate::image::{is_valid_depth, DepthGrid, GuideView, RowIndexGrid, NO_DEPTH};
use log::debug;
use rayon::prelude::*;

const NEIGHBOURS_4: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Clone, Debug, Default)]
pub struct PwasStrategy {
    options: PwasOptions,
}

impl PwasStrategy {
    pub fn new(options: PwasOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PwasOptions {
        &self.options
    }

    /// Credibility of every target cell.
    pub fn credibility(&self, guide: GuideView<'_>, target_rows: &RowIndexGrid) -> Vec<f64> {
        let w = target_rows.w;
        let two_sigma_c_sq = 2.0 * self.options.sigma_c * self.options.sigma_c;
        let mut cred = vec![0.0; target_rows.data.len()];
        cred.par_chunks_mut(w.max(1))
            .enumerate()
            .for_each(|(i, out_row)| {
                for (j, c) in out_row.iter_mut().enumerate() {
                    let v = target_rows.get(j, i);
                    let centre = guide.get(j, v);
                    let mut lap = [0.0f64; 3];
                    let mut count = 0.0;
                    for (dx, dy) in NEIGHBOURS_4 {
                        let x = j as i64 + dx;
                        let y = v as i64 + dy;
                        if x < 0 || y < 0 || x >= guide.w as i64 || y >= guide.h as i64 {
                            continue;
                        }
                        let px = guide.get(x as usize, y as usize);
                        for k in 0..3 {
                            lap[k] += px[k];
                        }
                        count += 1.0;
                    }
                    let norm_sq: f64 = (0..3)
                        .map(|k| {
                            let g = lap[k] - count * centre[k];
                            g * g
                        })
                        .sum();
                    *c = (-norm_sq / two_sigma_c_sq).exp();
                }
            });
        cred
    }

    fn filter(
        &self,
        image: &DepthGrid,
        guide: GuideView<'_>,
        target_rows: &RowIndexGrid,
        cred: &[f64],
    ) -> DepthGrid {
        let (w, h) = (target_rows.w, target_rows.h);
        let r = self.options.r.max(1) as i64;
        let (lo, hi) = (-(r / 2), r - 1 - r / 2);
        let two_sigma_s_sq = 2.0 * self.options.sigma_s * self.options.sigma_s;
        let two_sigma_r_sq = 2.0 * self.options.sigma_r * self.options.sigma_r;

        let mut out = DepthGrid::empty(w, h);
        out.data
            .par_chunks_mut(w.max(1))
            .enumerate()
            .for_each(|(i, out_row)| {
                for (j, z_out) in out_row.iter_mut().enumerate() {
                    let v0 = target_rows.get(j, i);
                    let mut acc = 0.0;
                    let mut coef = 0.0;
                    for dy in lo..=hi {
                        let ii = i as i64 + dy;
                        if ii < 0 || ii >= h as i64 {
                            continue;
                        }
                        for dx in lo..=hi {
                            let jj = j as i64 + dx;
                            if jj < 0 || jj >= w as i64 {
                                continue;
                            }
                            let (ii, jj) = (ii as usize, jj as usize);
                            let v1 = target_rows.get(jj, ii);
                            let z = image.get(jj, v1);
                            if !is_valid_depth(z) {
                                continue;
                            }
                            let spatial = (-((dx * dx + dy * dy) as f64) / two_sigma_s_sq).exp();
                            let range =
                                (-guide.color_dist_sq(j, v0, jj, v1) / two_sigma_r_sq).exp();
                            let weight = spatial * range * cred[ii * w + jj];
                            acc += weight * z;
                            coef += weight;
                        }
                    }
                    *z_out = if coef > 0.0 { acc / coef } else { NO_DEPTH };
                }
            });
        out
    }
}

impl Interpolator for PwasStrategy {
    fn method(&self) -> Method {
        Method::Pwas
    }

    fn needs_guide(&self) -> bool {
        true
    }

    fn interpolate(&self, input: &StrategyInput<'_>) -> Result<DepthGrid> {
        let guide = input.require_guide("pwas")?;
        let image = scatter(input.base, input.base_rows, input.params.height);
        let cred = self.credibility(guide, input.target_rows);
        let out = self.filter(&image, guide, input.target_rows, &cred);
        debug!(
            "PwasStrategy::interpolate r={} sigma_c={} sigma_s={} sigma_r={} valid_out={}/{}",
            self.options.r,
            self.options.sigma_c,
            self.options.sigma_s,
            self.options.sigma_r,
            out.valid_count(),
            out.data.len()
        );
        Ok(out)
    }
}
