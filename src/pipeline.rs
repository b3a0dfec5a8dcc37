//! Per-frame completion pipeline.
//!
//! [`DepthCompleter`] validates the configuration and builds every stage once;
//! [`DepthCompleter::process`] then runs one frame:
//! projection → occlusion → rasterization → row targets → strategy.
//!
//! Typical usage:
//! ```no_run
//! use depth_completion::{CompletionParams, DepthCompleter};
//! use depth_completion::types::RawPoint;
//!
//! # fn example(points: Vec<RawPoint>) -> Result<(), depth_completion::DepthError> {
//! let completer = DepthCompleter::new(CompletionParams::default())?;
//! let report = completer.process(&points, None)?;
//! println!("valid cells: {}", report.dense.valid_count());
//! # Ok(())
//! # }
//! ```

use crate::calib::{CalibrationParams, CalibrationProjector};
use crate::diagnostics::TimingBreakdown;
use crate::error::{DepthError, Result};
use crate::image::filters::{blur_rgb, GaussianFilter};
use crate::image::{DepthGrid, GuideImage};
use crate::occlusion::LayerOcclusionFilter;
use crate::raster::{RasterizedFrame, RowTargets, ScanlineRasterizer};
use crate::strategy::{Interpolator, Method, Strategy, StrategyInput, StrategyOptions};
use crate::types::RawPoint;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Which down-sampled grid the strategies receive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseSource {
    /// Scan-line interpolated layers (every column filled where the layer has
    /// samples).
    #[default]
    Interpolated,
    /// Raw samples only.
    Sparse,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionParams {
    pub calibration: CalibrationParams,
    pub strategy: StrategyOptions,
    pub base_source: BaseSource,
    /// Blur the guide image before the strategies read it.
    pub blur_guide: bool,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            calibration: CalibrationParams::default(),
            strategy: StrategyOptions::default(),
            base_source: BaseSource::default(),
            blur_guide: true,
        }
    }
}

impl CompletionParams {
    pub fn with_method(mut self, method: Method) -> Self {
        self.calibration.method = method;
        self
    }
}

/// Everything produced for one frame.
#[derive(Clone, Debug)]
pub struct CompletionReport {
    pub method: Method,
    /// Dense output shaped like `rows.target_rows`.
    pub dense: DepthGrid,
    pub frame: RasterizedFrame,
    pub rows: RowTargets,
    pub layer_count: usize,
    pub image_height: usize,
    pub timing: TimingBreakdown,
}

pub struct DepthCompleter {
    params: CompletionParams,
    projector: CalibrationProjector,
    occlusion: LayerOcclusionFilter,
    rasterizer: ScanlineRasterizer,
    strategy: Strategy,
    blur: GaussianFilter,
}

impl DepthCompleter {
    /// Validate the parameters and build the pipeline.
    pub fn new(params: CompletionParams) -> Result<Self> {
        params.calibration.validate()?;
        let calib = &params.calibration;
        Ok(Self {
            projector: CalibrationProjector::new(calib),
            occlusion: LayerOcclusionFilter::new(),
            rasterizer: ScanlineRasterizer::new(calib),
            strategy: Strategy::new(calib.method, &params.strategy),
            blur: GaussianFilter::default(),
            params,
        })
    }

    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Run one frame. `guide` is required by image-guided methods and must
    /// match the calibrated image size.
    pub fn process(
        &self,
        points: &[RawPoint],
        guide: Option<&GuideImage>,
    ) -> Result<CompletionReport> {
        let calib = &self.params.calibration;
        if self.strategy.needs_guide() && guide.is_none() {
            return Err(DepthError::MissingGuide(self.strategy.method().name()));
        }
        debug!(
            "DepthCompleter::process start points={} method={} w={} h={} layers={}",
            points.len(),
            calib.method,
            calib.width,
            calib.height,
            calib.layer_count
        );
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let start = Instant::now();
        let blurred = match guide {
            Some(img) if self.params.blur_guide && self.strategy.needs_guide() => {
                Some(blur_rgb(img, &self.blur))
            }
            _ => None,
        };
        let guide_view = blurred.as_ref().or(guide).map(GuideImage::as_view);
        timing.lap("guide", start);

        let start = Instant::now();
        let layers = self.projector.project(points);
        timing.lap("projection", start);

        let start = Instant::now();
        let layers = self.occlusion.filter(&layers);
        timing.lap("occlusion", start);

        let start = Instant::now();
        let frame = self.rasterizer.rasterize(&layers);
        let rows = RowTargets::select(&frame.reference_rows, calib.height, calib.is_full_height);
        timing.lap("rasterization", start);

        let start = Instant::now();
        let base = match self.params.base_source {
            BaseSource::Interpolated => &frame.sparse_interpolated,
            BaseSource::Sparse => &frame.sparse,
        };
        let input = StrategyInput {
            base,
            base_rows: &frame.sparse_rows,
            target_rows: &rows.target_rows,
            params: calib,
            guide: guide_view,
        };
        let dense = self.strategy.interpolate(&input)?;
        timing.lap("interpolation", start);

        timing.total_ms = crate::diagnostics::elapsed_ms(total_start);
        debug!(
            "DepthCompleter::process done valid={}/{} total_ms={:.3}",
            dense.valid_count(),
            dense.data.len(),
            timing.total_ms
        );

        Ok(CompletionReport {
            method: self.strategy.method(),
            dense,
            frame,
            rows,
            layer_count: calib.layer_count,
            image_height: calib.height,
            timing,
        })
    }
}
