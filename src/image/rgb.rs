//! Colour guide image used by the image-guided strategies.

/// Owned interleaved 8-bit RGB buffer.
#[derive(Clone, Debug)]
pub struct GuideImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GuideImage {
    /// Wrap raw interleaved RGB bytes (`3 · width · height` of them).
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), 3 * width * height, "RGB buffer size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    /// Uniform image filled with one colour.
    pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(3 * width * height);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = 3 * (y * self.width + x);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Borrow as a read-only view.
    pub fn as_view(&self) -> GuideView<'_> {
        GuideView {
            w: self.width,
            h: self.height,
            data: &self.data,
        }
    }
}

/// Borrowed RGB view.
#[derive(Clone, Copy, Debug)]
pub struct GuideView<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [u8],
}

impl<'a> GuideView<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f64; 3] {
        let i = 3 * (y * self.w + x);
        [
            self.data[i] as f64,
            self.data[i + 1] as f64,
            self.data[i + 2] as f64,
        ]
    }

    /// Squared Euclidean distance between two pixels' colours.
    #[inline]
    pub fn color_dist_sq(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        let a = self.get(x0, y0);
        let b = self.get(x1, y1);
        (0..3).map(|c| (a[c] - b[c]) * (a[c] - b[c])).sum()
    }
}
