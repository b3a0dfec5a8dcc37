use crate::strategy::PwasOptions;
use serde::{Deserialize, Serialize};

/// Inclusive arithmetic range `start, start + step, ..., <= stop`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl ParamRange {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// A single value.
    pub fn fixed(v: f64) -> Self {
        Self::new(v, v, 1.0)
    }

    pub fn values(&self) -> Vec<f64> {
        if self.step.is_nan() || self.step <= 0.0 || self.stop < self.start {
            return vec![self.start];
        }
        let n = ((self.stop - self.start) / self.step + 1e-9).floor() as usize + 1;
        (0..n).map(|i| self.start + i as f64 * self.step).collect()
    }
}

/// PWAS parameter grid searched by `pwas_tune`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuneConfig {
    pub sigma_c: ParamRange,
    pub sigma_s: ParamRange,
    pub sigma_r: ParamRange,
    pub r: Vec<usize>,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            sigma_c: ParamRange::new(10.0, 1000.0, 10.0),
            sigma_s: ParamRange::new(0.1, 1.6, 0.1),
            sigma_r: ParamRange::new(1.0, 91.0, 10.0),
            r: vec![1, 3, 5, 7],
        }
    }
}

impl TuneConfig {
    /// Every combination, in sigma_c → sigma_s → sigma_r → r order.
    pub fn combinations(&self) -> Vec<PwasOptions> {
        let (cs, ss, rs) = (
            self.sigma_c.values(),
            self.sigma_s.values(),
            self.sigma_r.values(),
        );
        let mut out = Vec::with_capacity(cs.len() * ss.len() * rs.len() * self.r.len());
        for &sigma_c in &cs {
            for &sigma_s in &ss {
                for &sigma_r in &rs {
                    for &r in &self.r {
                        out.push(PwasOptions {
                            sigma_c,
                            sigma_s,
                            sigma_r,
                            r,
                        });
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive_of_stop() {
        let v = ParamRange::new(0.1, 1.6, 0.1).values();
        assert_eq!(v.len(), 16);
        assert!((v[15] - 1.6).abs() < 1e-9);
        assert_eq!(ParamRange::new(1.0, 91.0, 10.0).values().len(), 10);
    }

    #[test]
    fn degenerate_range_yields_start() {
        assert_eq!(ParamRange::new(3.0, 1.0, 1.0).values(), vec![3.0]);
        assert_eq!(ParamRange::new(3.0, 9.0, 0.0).values(), vec![3.0]);
        assert_eq!(ParamRange::fixed(2.5).values(), vec![2.5]);
    }

    #[test]
    fn combinations_cover_the_grid() {
        let cfg = TuneConfig {
            sigma_c: ParamRange::fixed(100.0),
            sigma_s: ParamRange::new(1.0, 2.0, 1.0),
            sigma_r: ParamRange::fixed(19.0),
            r: vec![3, 5, 7],
        };
        let combos = cfg.combinations();
        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0].r, 3);
        assert_eq!(combos[5].sigma_s, 2.0);
    }
}
