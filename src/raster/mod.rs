//! Scan-line rasterization and row-index bookkeeping.
//!
//! - [`rows`] – analytic (layer, column) → image row mapping.
//! - [`rasterizer`] – per-layer depth grids and down-sampling.
//!
//! [`RowTargets`] decides which row-index grid the interpolation strategies
//! fill and which one evaluation compares against.

pub mod rasterizer;
pub mod rows;

pub use rasterizer::{RasterizedFrame, ScanlineRasterizer};
pub use rows::BeamRayTracer;

use crate::image::RowIndexGrid;

/// Row-index grids used after rasterization.
#[derive(Clone, Debug)]
pub struct RowTargets {
    /// Rows the strategies produce depth for.
    pub target_rows: RowIndexGrid,
    /// Rows the reference grid lives on, used to read the dense output back
    /// for comparison.
    pub comparison_rows: RowIndexGrid,
}

impl RowTargets {
    /// Default mode: strategies fill the 64 beam rows and are compared on
    /// the same rows.
    ///
    /// Full-height mode: strategies fill every image row (identity grid) and
    /// the beam rows become the comparison grid.
    pub fn select(reference_rows: &RowIndexGrid, height: usize, full_height: bool) -> Self {
        if full_height {
            Self {
                target_rows: RowIndexGrid::identity(reference_rows.w, height),
                comparison_rows: reference_rows.clone(),
            }
        } else {
            Self {
                target_rows: reference_rows.clone(),
                comparison_rows: reference_rows.clone(),
            }
        }
    }
}
