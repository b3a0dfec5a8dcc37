//! Calibration of the range scan against the camera.
//!
//! - [`params`] – slider-encoded calibration and mode flags.
//! - [`beams`] – the fixed 64-beam elevation table.
//! - [`projector`] – projection of raw points into camera space and layers.

pub mod beams;
pub mod params;
pub mod projector;

pub use beams::{BeamTable, LAYER_COUNT};
pub use params::{slider_to_offset, slider_to_radians, CalibrationParams, SLIDER_CENTER};
pub use projector::{BeamLayers, CalibrationProjector};
