use thiserror::Error;

/// Errors raised while configuring or running the completion pipeline.
#[derive(Error, Debug)]
pub enum DepthError {
    #[error("unknown interpolation method '{0}' (expected linear, mrf, pwas or original)")]
    UnknownMethod(String),

    #[error("layer count must be between 1 and {max}, got {got}")]
    InvalidLayerCount { got: usize, max: usize },

    #[error("image size must be positive, got {width}x{height}")]
    InvalidImageSize { width: usize, height: usize },

    #[error("focal length must be positive, got {0}")]
    InvalidFocalLength(f64),

    #[error("guide image is {got_w}x{got_h}, calibration expects {want_w}x{want_h}")]
    GuideSizeMismatch {
        got_w: usize,
        got_h: usize,
        want_w: usize,
        want_h: usize,
    },

    #[error("method '{0}' needs a guide image")]
    MissingGuide(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DepthError>;
