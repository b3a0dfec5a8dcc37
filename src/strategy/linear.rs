//! Two-pass separable scan-line fill.
//!
//! Each 1D pass looks, for every cell, for the nearest valid cell on either
//! side. Both found → distance-weighted blend; one found → copy it; none →
//! sentinel. The second pass runs on the output of the first, so the pass
//! order matters wherever the input is not smooth.

use super::{gather, scatter, Interpolator, LinearOptions, Method, StrategyInput};
use crate::error::Result;
use crate::image::{is_valid_depth, DepthGrid, ImageViewMut, NO_DEPTH};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOrder {
    /// Columns first, then rows.
    #[default]
    VerticalFirst,
    /// Rows first, then columns.
    HorizontalFirst,
}

/// Fill one line in place.
pub fn fill_line(line: &mut [f64]) {
    let n = line.len();
    let mut before = vec![None; n];
    let mut last = None;
    for (i, slot) in before.iter_mut().enumerate() {
        if is_valid_depth(line[i]) {
            last = Some(i);
        }
        *slot = last;
    }
    let mut after = vec![None; n];
    let mut next = None;
    for i in (0..n).rev() {
        if is_valid_depth(line[i]) {
            next = Some(i);
        }
        after[i] = next;
    }

    // Writes only touch invalid cells, so neighbours read below are stable.
    for i in 0..n {
        line[i] = match (before[i], after[i]) {
            (None, None) => NO_DEPTH,
            (Some(a), Some(b)) if a < b => {
                let (za, zb) = (line[a], line[b]);
                (zb * (i - a) as f64 + za * (b - i) as f64) / (b - a) as f64
            }
            (Some(a), _) => line[a],
            (None, Some(b)) => line[b],
        };
    }
}

fn fill_rows(grid: &mut DepthGrid) {
    for y in 0..grid.h {
        fill_line(grid.row_mut(y));
    }
}

fn fill_columns(grid: &mut DepthGrid) {
    let mut column = vec![NO_DEPTH; grid.h];
    for x in 0..grid.w {
        for (y, c) in column.iter_mut().enumerate() {
            *c = grid.get(x, y);
        }
        fill_line(&mut column);
        for (y, &c) in column.iter().enumerate() {
            grid.set(x, y, c);
        }
    }
}

/// Separable fill of a whole grid.
pub fn separable_fill(grid: &DepthGrid, order: FillOrder) -> DepthGrid {
    let mut out = grid.clone();
    match order {
        FillOrder::VerticalFirst => {
            fill_columns(&mut out);
            fill_rows(&mut out);
        }
        FillOrder::HorizontalFirst => {
            fill_rows(&mut out);
            fill_columns(&mut out);
        }
    }
    out
}

#[derive(Clone, Debug, Default)]
pub struct LinearStrategy {
    options: LinearOptions,
}

impl LinearStrategy {
    pub fn new(options: LinearOptions) -> Self {
        Self { options }
    }
}

impl Interpolator for LinearStrategy {
    fn method(&self) -> Method {
        Method::Linear
    }

    /// Fill in image space (every image row), then read back the target rows.
    fn interpolate(&self, input: &StrategyInput<'_>) -> Result<DepthGrid> {
        let image = scatter(input.base, input.base_rows, input.params.height);
        let filled = separable_fill(&image, self.options.order);
        let out = gather(&filled, input.target_rows);
        debug!(
            "LinearStrategy::interpolate order={:?} seeds={} valid_out={}/{}",
            self.options.order,
            image.valid_count(),
            out.valid_count(),
            out.data.len()
        );
        Ok(out)
    }
}
