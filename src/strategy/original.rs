//! Baseline strategy: nearest sample along the image column.
//!
//! Each target cell copies the scattered sample closest in image rows within
//! its own column (ties go to the upper sample). Columns that never received
//! a sample stay at the sentinel.

use super::{scatter, Interpolator, Method, StrategyInput};
use crate::error::Result;
use crate::image::{is_valid_depth, DepthGrid, NO_DEPTH};

#[derive(Clone, Debug, Default)]
pub struct OriginalStrategy;

impl OriginalStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for OriginalStrategy {
    fn method(&self) -> Method {
        Method::Original
    }

    fn interpolate(&self, input: &StrategyInput<'_>) -> Result<DepthGrid> {
        let image = scatter(input.base, input.base_rows, input.params.height);
        let rows = input.target_rows;
        let mut out = DepthGrid::empty(rows.w, rows.h);

        let mut above: Vec<Option<usize>> = vec![None; image.h];
        let mut below: Vec<Option<usize>> = vec![None; image.h];
        for x in 0..image.w {
            let mut last = None;
            for (y, slot) in above.iter_mut().enumerate() {
                if is_valid_depth(image.get(x, y)) {
                    last = Some(y);
                }
                *slot = last;
            }
            let mut next = None;
            for y in (0..image.h).rev() {
                if is_valid_depth(image.get(x, y)) {
                    next = Some(y);
                }
                below[y] = next;
            }

            for y in 0..rows.h {
                let v = rows.get(x, y);
                if v >= image.h {
                    continue;
                }
                let nearest = match (above[v], below[v]) {
                    (Some(a), Some(b)) => Some(if v - a <= b - v { a } else { b }),
                    (a, b) => a.or(b),
                };
                let z = nearest.map_or(NO_DEPTH, |row| image.get(x, row));
                out.set(x, y, z);
            }
        }
        Ok(out)
    }
}
