//! Per-frame input files.
//!
//! A frame `<id>` lives in one directory as `<id>.pcd` plus the guide image,
//! `<id>_rgb.png` for the RGB camera or `<id>.png` for the thermal one.

use crate::image::io::load_guide_image;
use crate::image::GuideImage;
use crate::pointcloud::load_pcd;
use crate::types::RawPoint;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePaths {
    pub points: PathBuf,
    pub guide: PathBuf,
}

impl FramePaths {
    pub fn new(data_dir: &Path, frame: u32, is_rgb: bool) -> Self {
        let guide = if is_rgb {
            format!("{frame}_rgb.png")
        } else {
            format!("{frame}.png")
        };
        Self {
            points: data_dir.join(format!("{frame}.pcd")),
            guide: data_dir.join(guide),
        }
    }
}

/// Loaded inputs of one frame.
#[derive(Clone, Debug)]
pub struct FrameInputs {
    pub frame: u32,
    pub points: Vec<RawPoint>,
    pub guide: GuideImage,
}

pub fn load_frame(data_dir: &Path, frame: u32, is_rgb: bool) -> Result<FrameInputs, String> {
    let paths = FramePaths::new(data_dir, frame, is_rgb);
    let guide = load_guide_image(&paths.guide)?;
    let points = load_pcd(&paths.points)?;
    Ok(FrameInputs {
        frame,
        points,
        guide,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_name_follows_camera_kind() {
        let dir = Path::new("data");
        let rgb = FramePaths::new(dir, 1100, true);
        assert_eq!(rgb.points, Path::new("data/1100.pcd"));
        assert_eq!(rgb.guide, Path::new("data/1100_rgb.png"));
        assert_eq!(FramePaths::new(dir, 7, false).guide, Path::new("data/7.png"));
    }

    #[test]
    fn missing_files_are_reported() {
        let err = load_frame(Path::new("/nonexistent"), 1, true).unwrap_err();
        assert!(err.contains("1_rgb.png"));
    }
}
