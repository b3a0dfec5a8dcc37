//! I/O helpers for guide images, depth previews and JSON.
//!
//! - `load_guide_image`: read a PNG/JPEG/etc. into an owned RGB buffer.
//! - `save_depth_png`: write a depth grid as an 8-bit preview (near = bright).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::grid::{is_valid_depth, DepthGrid};
use super::rgb::GuideImage;
use super::traits::ImageView;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as 8-bit RGB. Grayscale (thermal) inputs are
/// expanded to three equal channels.
pub fn load_guide_image(path: &Path) -> Result<GuideImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(GuideImage::new(width, height, img.into_raw()))
}

/// Save a depth grid as grayscale, mapping `(0, max_depth]` to `[255, 1]`.
/// Missing cells are written black.
pub fn save_depth_png(grid: &DepthGrid, max_depth: f64, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let max_depth = if max_depth > 0.0 { max_depth } else { 1.0 };
    let mut out = GrayImage::new(grid.w as u32, grid.h as u32);
    for (y, row) in grid.rows().enumerate() {
        for (x, &z) in row.iter().enumerate() {
            let v = if is_valid_depth(z) {
                (255.0 * (1.0 - (z / max_depth).min(1.0))).clamp(1.0, 255.0)
            } else {
                0.0
            };
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
