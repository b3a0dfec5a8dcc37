use super::tune::TuneConfig;
use crate::pipeline::CompletionParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Directory holding `<frame>.pcd` and the guide images.
    pub data_dir: PathBuf,
    pub frames: Vec<u32>,
    /// CSV report path.
    pub report_out: PathBuf,
    /// When set, depth previews of every frame are written here.
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
    #[serde(default)]
    pub params: CompletionParams,
    /// Search ranges for `pwas_tune`.
    #[serde(default)]
    pub tune: TuneConfig,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
