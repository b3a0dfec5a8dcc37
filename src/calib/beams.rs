//! Fixed elevation geometry of the 64-beam scanner.
//!
//! Beams are spaced `BEAM_STEP_DEG` apart starting at `BEAM_MIN_DEG`; the
//! table stores their tangents in ascending order so a point's elevation
//! ratio can be bucketed with a binary search.

/// Number of beam layers of the scanner.
pub const LAYER_COUNT: usize = 64;

/// Elevation of the lowest beam (degrees).
pub const BEAM_MIN_DEG: f64 = -16.6 + 0.26349;

/// Angular spacing between adjacent beams (degrees).
pub const BEAM_STEP_DEG: f64 = 0.52698;

/// Ascending table of beam tangents.
#[derive(Clone, Debug)]
pub struct BeamTable {
    tans: [f64; LAYER_COUNT],
}

impl BeamTable {
    pub fn new() -> Self {
        let mut tans = [0.0; LAYER_COUNT];
        for (i, t) in tans.iter_mut().enumerate() {
            *t = (BEAM_MIN_DEG + i as f64 * BEAM_STEP_DEG).to_radians().tan();
        }
        Self { tans }
    }

    #[inline]
    pub fn tan(&self, layer: usize) -> f64 {
        self.tans[layer]
    }

    pub fn tans(&self) -> &[f64] {
        &self.tans
    }

    /// First layer whose tangent is `>= ratio`; ratios above the top beam
    /// land on the top layer.
    #[inline]
    pub fn layer_of(&self, ratio: f64) -> usize {
        self.tans
            .partition_point(|&t| t < ratio)
            .min(LAYER_COUNT - 1)
    }
}

impl Default for BeamTable {
    fn default() -> Self {
        Self::new()
    }
}
