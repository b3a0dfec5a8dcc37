//! Separable smoothing of the guide image.
//!
//! The guide is lightly blurred before the image-guided strategies read it so
//! single-pixel sensor noise does not dominate the colour weights.
use super::rgb::GuideImage;

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order), odd length.
    fn taps(&self) -> &[f32];
}

/// Normalised sampled Gaussian.
#[derive(Clone, Debug)]
pub struct GaussianFilter {
    taps: Vec<f32>,
}

impl GaussianFilter {
    /// Build `2·radius + 1` normalised taps for the given sigma.
    pub fn new(radius: usize, sigma: f32) -> Self {
        let sigma = sigma.max(1e-3);
        let mut taps: Vec<f32> = (0..=2 * radius)
            .map(|i| {
                let d = i as f32 - radius as f32;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }
}

impl Default for GaussianFilter {
    /// 3×3 kernel with sigma 0.5.
    fn default() -> Self {
        Self::new(1, 0.5)
    }
}

impl SeparableFilter for GaussianFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Blur every channel with `filter` horizontally then vertically, clamping at
/// the borders.
pub fn blur_rgb<F: SeparableFilter>(image: &GuideImage, filter: &F) -> GuideImage {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return image.clone();
    }
    let taps = filter.taps();
    let radius = (taps.len() / 2) as i64;
    let src = image.data();

    let mut tmp = vec![0f32; 3 * w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; 3];
            for (k, &t) in taps.iter().enumerate() {
                let xx = (x as i64 + k as i64 - radius).clamp(0, w as i64 - 1) as usize;
                let i = 3 * (y * w + xx);
                for c in 0..3 {
                    acc[c] += t * src[i + c] as f32;
                }
            }
            tmp[3 * (y * w + x)..3 * (y * w + x) + 3].copy_from_slice(&acc);
        }
    }

    let mut out = vec![0u8; 3 * w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; 3];
            for (k, &t) in taps.iter().enumerate() {
                let yy = (y as i64 + k as i64 - radius).clamp(0, h as i64 - 1) as usize;
                let i = 3 * (yy * w + x);
                for c in 0..3 {
                    acc[c] += t * tmp[i + c];
                }
            }
            for c in 0..3 {
                out[3 * (y * w + x) + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    GuideImage::new(w, h, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_taps_are_normalised_and_symmetric() {
        let f = GaussianFilter::default();
        let taps = f.taps();
        assert_eq!(taps.len(), 3);
        assert!((taps.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((taps[0] - taps[2]).abs() < 1e-7);
        assert!(taps[1] > taps[0]);
    }

    #[test]
    fn blur_keeps_flat_image_flat() {
        let img = GuideImage::solid(5, 4, [40, 120, 200]);
        let out = blur_rgb(&img, &GaussianFilter::default());
        assert_eq!(out.data(), img.data());
    }
}
