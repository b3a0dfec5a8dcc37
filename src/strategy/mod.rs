//! Interpolation strategies turning the down-sampled grid into a dense one.
//!
//! All strategies share one contract ([`StrategyInput`] → dense
//! [`DepthGrid`] shaped like `target_rows`) and are selected once from the
//! configured [`Method`]:
//!
//! - [`linear`] – two-pass separable scan-line fill.
//! - [`pwas`] – credibility-weighted, edge-aware filter on the guide image.
//! - [`mrf`] – smoothness + data energy over the pixel graph.
//! - [`original`] – nearest sample along the image column.
//!
//! Cells no strategy can reach stay at [`NO_DEPTH`].

pub mod linear;
pub mod mrf;
pub mod options;
pub mod original;
pub mod pwas;

pub use linear::{fill_line, separable_fill, FillOrder, LinearStrategy};
pub use mrf::MrfStrategy;
pub use options::{LinearOptions, MrfOptions, PwasOptions, StrategyOptions};
pub use original::OriginalStrategy;
pub use pwas::PwasStrategy;

use crate::calib::CalibrationParams;
use crate::error::{DepthError, Result};
use crate::image::{is_valid_depth, DepthGrid, GuideView, RowIndexGrid, NO_DEPTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interpolation method selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Linear,
    Mrf,
    Pwas,
    Original,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Linear, Method::Mrf, Method::Pwas, Method::Original];

    pub fn name(self) -> &'static str {
        match self {
            Method::Linear => "linear",
            Method::Mrf => "mrf",
            Method::Pwas => "pwas",
            Method::Original => "original",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = DepthError;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| DepthError::UnknownMethod(s.to_string()))
    }
}

/// Everything a strategy may read.
#[derive(Clone, Copy, Debug)]
pub struct StrategyInput<'a> {
    /// Down-sampled depth grid (sentinel where the coarse sensor saw nothing).
    pub base: &'a DepthGrid,
    /// Image row of each `base` cell.
    pub base_rows: &'a RowIndexGrid,
    /// Image row of each output cell; defines the output shape.
    pub target_rows: &'a RowIndexGrid,
    pub params: &'a CalibrationParams,
    /// Blurred guide image, required by image-guided strategies.
    pub guide: Option<GuideView<'a>>,
}

impl<'a> StrategyInput<'a> {
    /// Guide view checked against the calibrated image size.
    pub fn require_guide(&self, method: &'static str) -> Result<GuideView<'a>> {
        let guide = self.guide.ok_or(DepthError::MissingGuide(method))?;
        if guide.w != self.params.width || guide.h != self.params.height {
            return Err(DepthError::GuideSizeMismatch {
                got_w: guide.w,
                got_h: guide.h,
                want_w: self.params.width,
                want_h: self.params.height,
            });
        }
        Ok(guide)
    }
}

/// Common strategy interface.
pub trait Interpolator {
    fn method(&self) -> Method;

    fn needs_guide(&self) -> bool {
        false
    }

    fn interpolate(&self, input: &StrategyInput<'_>) -> Result<DepthGrid>;
}

/// Closed set of strategies, built once from the configuration.
#[derive(Clone, Debug)]
pub enum Strategy {
    Linear(LinearStrategy),
    Mrf(MrfStrategy),
    Pwas(PwasStrategy),
    Original(OriginalStrategy),
}

impl Strategy {
    pub fn new(method: Method, options: &StrategyOptions) -> Self {
        match method {
            Method::Linear => Strategy::Linear(LinearStrategy::new(options.linear.clone())),
            Method::Mrf => Strategy::Mrf(MrfStrategy::new(
                options.mrf.clone(),
                options.linear.clone(),
            )),
            Method::Pwas => Strategy::Pwas(PwasStrategy::new(options.pwas.clone())),
            Method::Original => Strategy::Original(OriginalStrategy::new()),
        }
    }

    fn inner(&self) -> &dyn Interpolator {
        match self {
            Strategy::Linear(s) => s,
            Strategy::Mrf(s) => s,
            Strategy::Pwas(s) => s,
            Strategy::Original(s) => s,
        }
    }
}

impl Interpolator for Strategy {
    fn method(&self) -> Method {
        self.inner().method()
    }

    fn needs_guide(&self) -> bool {
        self.inner().needs_guide()
    }

    fn interpolate(&self, input: &StrategyInput<'_>) -> Result<DepthGrid> {
        self.inner().interpolate(input)
    }
}

/// Write every valid `base` cell into an image-sized (`height` rows) grid at
/// its recorded row. Untouched cells stay at the sentinel.
pub fn scatter(base: &DepthGrid, base_rows: &RowIndexGrid, height: usize) -> DepthGrid {
    let mut image = DepthGrid::empty(base.w, height);
    for y in 0..base.h {
        for x in 0..base.w {
            let z = base.get(x, y);
            let row = base_rows.get(x, y);
            if is_valid_depth(z) && row < height {
                image.set(x, row, z);
            }
        }
    }
    image
}

/// Read an image-sized grid back at `rows`.
pub fn gather(image: &DepthGrid, rows: &RowIndexGrid) -> DepthGrid {
    let mut out = DepthGrid::empty(rows.w, rows.h);
    for y in 0..rows.h {
        for x in 0..rows.w {
            let row = rows.get(x, y);
            let z = if row < image.h { image.get(x, row) } else { NO_DEPTH };
            out.set(x, y, z);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip_through_from_str() {
        for m in Method::ALL {
            assert_eq!(m.name().parse::<Method>().unwrap(), m);
        }
    }

    #[test]
    fn unknown_method_is_a_configuration_error() {
        let err = "bilateral".parse::<Method>().unwrap_err();
        assert!(matches!(err, DepthError::UnknownMethod(ref s) if s == "bilateral"));
        assert!("Linear".parse::<Method>().is_err());
    }

    #[test]
    fn strategy_reports_its_method() {
        let opts = StrategyOptions::default();
        for m in Method::ALL {
            assert_eq!(Strategy::new(m, &opts).method(), m);
        }
        assert!(Strategy::new(Method::Pwas, &opts).needs_guide());
        assert!(!Strategy::new(Method::Linear, &opts).needs_guide());
    }

    #[test]
    fn scatter_then_gather_recovers_samples() {
        let base = DepthGrid::from_vec(3, 2, vec![1.0, -1.0, 3.0, 4.0, 5.0, -1.0]);
        let rows = RowIndexGrid::from_vec(3, 2, vec![1, 1, 2, 4, 5, 5]);
        let image = scatter(&base, &rows, 6);
        assert_eq!(image.valid_count(), 4);
        assert_eq!(image.get(2, 2), 3.0);
        let back = gather(&image, &rows);
        assert_eq!(back.get(0, 0), 1.0);
        assert_eq!(back.get(1, 1), 5.0);
        assert!(!back.is_valid(1, 0));
    }
}
