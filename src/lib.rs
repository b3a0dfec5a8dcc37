#![doc = include_str!("../README.md")]

// Core pipeline
pub mod calib;
pub mod error;
pub mod image;
pub mod occlusion;
pub mod pipeline;
pub mod raster;
pub mod strategy;
pub mod types;

// Diagnostics, scoring and the file-facing surface used by the binaries.
pub mod config;
pub mod diagnostics;
pub mod evaluate;
pub mod frames;
pub mod pointcloud;

// --- High-level re-exports -------------------------------------------------

pub use crate::calib::CalibrationParams;
pub use crate::error::{DepthError, Result};
pub use crate::pipeline::{BaseSource, CompletionParams, CompletionReport, DepthCompleter};
pub use crate::strategy::{Method, StrategyOptions};

pub use crate::diagnostics::{StageTiming, TimingBreakdown};
pub use crate::evaluate::{evaluate_report, FrameScores, ReportWriter};

// --- Prelude ---------------------------------------------------------------

/// Everything needed to run one frame and score it.
///
/// ```no_run
/// use depth_completion::prelude::*;
///
/// # fn main() -> Result<(), DepthError> {
/// let points = vec![RawPoint::new(-10.0, 0.5, -0.2), RawPoint::new(-10.0, 0.0, -0.2)];
/// let params = CompletionParams::default().with_method(Method::Linear);
/// let completer = DepthCompleter::new(params)?;
/// let report = completer.process(&points, None)?;
/// println!("mre={:.4}", evaluate_report(&report).mre);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{DepthGrid, GuideImage};
    pub use crate::types::RawPoint;
    pub use crate::{
        evaluate_report, CalibrationParams, CompletionParams, CompletionReport, DepthCompleter,
        DepthError, FrameScores, Method,
    };
}
