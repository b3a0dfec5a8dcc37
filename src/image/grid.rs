//! Dense row-major grids for depth values and row indices.
//!
//! A grid row is one beam layer (or one image row in full-height mode) and a
//! grid column is an image column. Accessors take `(x, y)` = (column, row),
//! matching the rest of the image module.
//!
//! Depth grids use [`NO_DEPTH`] as the "no data" sentinel; any value `<= 0`
//! is treated as missing.

/// Sentinel stored where no depth is available.
pub const NO_DEPTH: f64 = -1.0;

/// Returns `true` for a usable (strictly positive, finite) depth.
#[inline]
pub fn is_valid_depth(z: f64) -> bool {
    z > 0.0 && z.is_finite()
}

/// Owned `w × h` grid in row-major order (stride == width).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    /// Number of columns
    pub w: usize,
    /// Number of rows
    pub h: usize,
    /// Backing storage in row-major order
    pub data: Vec<T>,
}

/// `[layer][column]` → forward depth.
pub type DepthGrid = Grid<f64>;

/// `[layer][column]` → image row.
pub type RowIndexGrid = Grid<usize>;

impl<T: Copy> Grid<T> {
    /// Construct a grid with every cell set to `value`.
    pub fn filled(w: usize, h: usize, value: T) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Panics if the length does not match.
    pub fn from_vec(w: usize, h: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), w * h, "grid buffer must hold w * h cells");
        Self { w, h, data }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Copy out the rows `0, stride, 2·stride, …` (`count` of them).
    pub fn select_rows(&self, stride: usize, count: usize) -> Self {
        let mut data = Vec::with_capacity(count * self.w);
        for i in 0..count {
            let y = i * stride;
            data.extend_from_slice(&self.data[y * self.w..(y + 1) * self.w]);
        }
        Self::from_vec(self.w, count, data)
    }
}

impl DepthGrid {
    /// All-sentinel depth grid.
    pub fn empty(w: usize, h: usize) -> Self {
        Self::filled(w, h, NO_DEPTH)
    }

    #[inline]
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        is_valid_depth(self.get(x, y))
    }

    /// Number of cells holding a usable depth.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|z| is_valid_depth(**z)).count()
    }
}

impl RowIndexGrid {
    /// Grid where row `y` maps to image row `y` in every column.
    pub fn identity(w: usize, h: usize) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            data.extend(std::iter::repeat(y).take(w));
        }
        Self::from_vec(w, h, data)
    }
}

impl<T: Copy> crate::image::traits::ImageView for Grid<T> {
    type Pixel = T;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[T] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl<T: Copy> crate::image::traits::ImageViewMut for Grid<T> {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}
