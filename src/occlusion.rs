//! Per-layer occlusion removal.
//!
//! Inside one beam layer the scanner emits points in azimuth order, so the
//! layer is swept once in acquisition order with a monotonic stack: a new
//! point pops every trailing kept point whose lateral/forward ratio is not
//! strictly smaller than its own (`kept.x · new.z >= new.x · kept.z`).
//! The survivors have strictly increasing ratios, hence non-decreasing
//! image columns. O(N) amortised per layer.

use crate::calib::BeamLayers;
use crate::types::LayeredPoint;
use log::debug;

/// `true` when `kept` is angularly dominated by `new` and must be dropped.
#[inline]
pub fn is_dominated(kept: &LayeredPoint, new: &LayeredPoint) -> bool {
    kept.lateral() * new.forward() >= new.lateral() * kept.forward()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LayerOcclusionFilter;

impl LayerOcclusionFilter {
    pub fn new() -> Self {
        Self
    }

    /// Filter a single layer, keeping acquisition order of the survivors.
    pub fn filter_layer(&self, points: &[LayeredPoint]) -> Vec<LayeredPoint> {
        let mut kept: Vec<LayeredPoint> = Vec::with_capacity(points.len());
        for p in points {
            while let Some(last) = kept.last() {
                if !is_dominated(last, p) {
                    break;
                }
                kept.pop();
            }
            kept.push(*p);
        }
        kept
    }

    /// Filter every layer.
    pub fn filter(&self, layers: &BeamLayers) -> BeamLayers {
        let out: BeamLayers = layers.iter().map(|l| self.filter_layer(l)).collect();
        debug!(
            "LayerOcclusionFilter::filter before={} after={}",
            layers.iter().map(Vec::len).sum::<usize>(),
            out.iter().map(Vec::len).sum::<usize>()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn pt(x: f64, z: f64) -> LayeredPoint {
        LayeredPoint {
            pos: Vector3::new(x, 0.0, z),
            layer: 0,
            u: 0,
            v: 0,
        }
    }

    #[test]
    fn increasing_ratios_are_all_kept() {
        let pts = vec![pt(-2.0, 10.0), pt(-1.0, 10.0), pt(0.5, 5.0), pt(3.0, 6.0)];
        let kept = LayerOcclusionFilter::new().filter_layer(&pts);
        assert_eq!(kept, pts);
    }

    #[test]
    fn later_point_pops_dominated_tail() {
        // the second and third points swing back past the fourth
        let pts = vec![pt(-2.0, 10.0), pt(1.0, 10.0), pt(2.0, 10.0), pt(0.0, 4.0)];
        let kept = LayerOcclusionFilter::new().filter_layer(&pts);
        assert_eq!(kept, vec![pt(-2.0, 10.0), pt(0.0, 4.0)]);
    }

    #[test]
    fn equal_ratio_keeps_the_newer_point() {
        let pts = vec![pt(1.0, 10.0), pt(0.5, 5.0)];
        let kept = LayerOcclusionFilter::new().filter_layer(&pts);
        assert_eq!(kept, vec![pt(0.5, 5.0)]);
    }

    #[test]
    fn survivors_are_never_dominated_by_later_survivors() {
        let xs = [0.3, -1.0, 2.0, 1.5, -0.2, 3.0, 2.9, 4.0, -5.0, 6.0];
        let zs = [5.0, 9.0, 7.0, 3.0, 8.0, 6.0, 4.0, 9.5, 10.0, 7.0];
        let pts: Vec<_> = xs.iter().zip(zs).map(|(&x, z)| pt(x, z)).collect();
        let kept = LayerOcclusionFilter::new().filter_layer(&pts);
        assert!(!kept.is_empty());
        for i in 0..kept.len() {
            for j in i + 1..kept.len() {
                assert!(!is_dominated(&kept[i], &kept[j]));
            }
        }
    }

    #[test]
    fn empty_layer_stays_empty() {
        let layers: BeamLayers = vec![Vec::new(); 3];
        let out = LayerOcclusionFilter::new().filter(&layers);
        assert!(out.iter().all(Vec::is_empty));
    }
}
