pub mod filters;
pub mod grid;
pub mod io;
pub mod rgb;
pub mod traits;

pub use self::grid::{is_valid_depth, DepthGrid, Grid, RowIndexGrid, NO_DEPTH};
pub use self::rgb::{GuideImage, GuideView};
pub use self::traits::{ImageView, ImageViewMut, Rows};
