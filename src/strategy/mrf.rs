//! Markov-random-field strategy.
//!
//! Minimises, over the target grid,
//!
//! ```text
//! E(z) = Σ_data k · (z_p − d_p)² + Σ_(p,q) w_pq · (z_p − z_q)²
//! ```
//!
//! where data pixels are target cells holding a scattered sample `d_p`, the
//! pairs are 4-connected neighbours and `w_pq = exp(−‖c_p − c_q‖² / 2σ²)`
//! follows the guide image colours. The quadratic energy is solved with
//! Gauss–Seidel sweeps started from the linear fill, which also defines the
//! support: cells the linear fill cannot reach stay at the sentinel.

use super::linear::LinearStrategy;
use super::{scatter, Interpolator, LinearOptions, Method, MrfOptions, StrategyInput};
use crate::error::Result;
use crate::image::{is_valid_depth, DepthGrid, GuideView, RowIndexGrid};
use log::debug;

#[derive(Clone, Debug, Default)]
pub struct MrfStrategy {
    options: MrfOptions,
    init: LinearStrategy,
}

/// Smoothness weights to the right and lower neighbour of every cell.
struct EdgeWeights {
    right: Vec<f64>,
    down: Vec<f64>,
}

impl EdgeWeights {
    fn new(guide: GuideView<'_>, rows: &RowIndexGrid, sigma: f64) -> Self {
        let (w, h) = (rows.w, rows.h);
        let two_sigma_sq = 2.0 * sigma * sigma;
        let weight = |x0: usize, y0: usize, x1: usize, y1: usize| {
            let d = guide.color_dist_sq(x0, rows.get(x0, y0), x1, rows.get(x1, y1));
            (-d / two_sigma_sq).exp()
        };
        let mut right = vec![0.0; w * h];
        let mut down = vec![0.0; w * h];
        for y in 0..h {
            for x in 0..w {
                if x + 1 < w {
                    right[y * w + x] = weight(x, y, x + 1, y);
                }
                if y + 1 < h {
                    down[y * w + x] = weight(x, y, x, y + 1);
                }
            }
        }
        Self { right, down }
    }
}

impl MrfStrategy {
    pub fn new(options: MrfOptions, init: LinearOptions) -> Self {
        Self {
            options,
            init: LinearStrategy::new(init),
        }
    }

    /// One Gauss–Seidel sweep; returns the largest absolute update.
    fn sweep(&self, z: &mut DepthGrid, data: &DepthGrid, edges: &EdgeWeights) -> f64 {
        let (w, h) = (z.w, z.h);
        let k = self.options.k_data;
        let mut max_delta: f64 = 0.0;
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                if !is_valid_depth(z.data[i]) {
                    continue;
                }
                let mut num = 0.0;
                let mut den = 0.0;
                let d = data.data[i];
                if is_valid_depth(d) {
                    num += k * d;
                    den += k;
                }
                let mut add = |j: usize, wt: f64| {
                    let zn = z.data[j];
                    if is_valid_depth(zn) {
                        num += wt * zn;
                        den += wt;
                    }
                };
                if x + 1 < w {
                    add(i + 1, edges.right[i]);
                }
                if x > 0 {
                    add(i - 1, edges.right[i - 1]);
                }
                if y + 1 < h {
                    add(i + w, edges.down[i]);
                }
                if y > 0 {
                    add(i - w, edges.down[i - w]);
                }
                if den > 0.0 {
                    let next = num / den;
                    if is_valid_depth(next) {
                        max_delta = max_delta.max((next - z.data[i]).abs());
                        z.data[i] = next;
                    }
                }
            }
        }
        max_delta
    }
}

impl Interpolator for MrfStrategy {
    fn method(&self) -> Method {
        Method::Mrf
    }

    fn needs_guide(&self) -> bool {
        true
    }

    fn interpolate(&self, input: &StrategyInput<'_>) -> Result<DepthGrid> {
        let guide = input.require_guide("mrf")?;
        let image = scatter(input.base, input.base_rows, input.params.height);
        let data = super::gather(&image, input.target_rows);
        let mut z = self.init.interpolate(input)?;
        let edges = EdgeWeights::new(guide, input.target_rows, self.options.sigma);

        let mut iterations = 0;
        let mut last_delta = 0.0;
        while iterations < self.options.max_iterations {
            last_delta = self.sweep(&mut z, &data, &edges);
            iterations += 1;
            if last_delta < self.options.tolerance {
                break;
            }
        }
        debug!(
            "MrfStrategy::interpolate iterations={} last_delta={:.3e} data_cells={} valid_out={}/{}",
            iterations,
            last_delta,
            data.valid_count(),
            z.valid_count(),
            z.data.len()
        );
        Ok(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calib::CalibrationParams;
    use crate::image::GuideImage;

    #[test]
    fn constant_data_is_a_fixed_point() {
        let p = CalibrationParams {
            width: 6,
            height: 6,
            focal: 6.0,
            ..Default::default()
        };
        let guide = GuideImage::solid(6, 6, [10, 20, 30]);
        let rows = RowIndexGrid::identity(6, 6);
        let mut base = DepthGrid::empty(6, 6);
        base.set(1, 1, 3.0);
        base.set(4, 4, 3.0);
        let input = StrategyInput {
            base: &base,
            base_rows: &rows,
            target_rows: &rows,
            params: &p,
            guide: Some(guide.as_view()),
        };
        let out = MrfStrategy::default().interpolate(&input).unwrap();
        assert_eq!(out.valid_count(), 36);
        assert!(out.data.iter().all(|&z| (z - 3.0).abs() < 1e-9));
    }

    #[test]
    fn solution_stays_between_data_values() {
        let p = CalibrationParams {
            width: 5,
            height: 1,
            focal: 5.0,
            ..Default::default()
        };
        let guide = GuideImage::solid(5, 1, [0, 0, 0]);
        let rows = RowIndexGrid::identity(5, 1);
        let base = DepthGrid::from_vec(5, 1, vec![2.0, -1.0, -1.0, -1.0, 10.0]);
        let input = StrategyInput {
            base: &base,
            base_rows: &rows,
            target_rows: &rows,
            params: &p,
            guide: Some(guide.as_view()),
        };
        let out = MrfStrategy::default().interpolate(&input).unwrap();
        assert!(out.data.windows(2).all(|w| w[0] <= w[1] + 1e-9));
        assert!(out.data.iter().all(|&z| (2.0 - 1e-9..=10.0 + 1e-9).contains(&z)));
    }
}
