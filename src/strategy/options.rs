//! Tunable parameters of the interpolation strategies.

use super::linear::FillOrder;
use serde::{Deserialize, Serialize};

/// Per-strategy knobs; only the selected strategy's block is read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyOptions {
    pub linear: LinearOptions,
    pub pwas: PwasOptions,
    pub mrf: MrfOptions,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearOptions {
    /// Which axis the first fill pass runs along.
    pub order: FillOrder,
}

/// PWAS filter parameters.
///
/// - `sigma_c`: credibility falloff against the guide's local colour
///   Laplacian; larger trusts samples near edges more.
/// - `sigma_s`: spatial falloff in grid cells.
/// - `sigma_r`: colour-similarity falloff.
/// - `r`: window side length in grid cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PwasOptions {
    pub sigma_c: f64,
    pub sigma_s: f64,
    pub sigma_r: f64,
    pub r: usize,
}

impl Default for PwasOptions {
    fn default() -> Self {
        Self {
            sigma_c: 1000.0,
            sigma_s: 1.6,
            sigma_r: 19.0,
            r: 7,
        }
    }
}

/// MRF solver parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MrfOptions {
    /// Weight of the data term at sampled pixels.
    pub k_data: f64,
    /// Colour falloff of the smoothness weights.
    pub sigma: f64,
    pub max_iterations: usize,
    /// Stop once the largest per-sweep update is below this (depth units).
    pub tolerance: f64,
}

impl Default for MrfOptions {
    fn default() -> Self {
        Self {
            k_data: 4.0,
            sigma: 20.0,
            max_iterations: 200,
            tolerance: 1e-4,
        }
    }
}
