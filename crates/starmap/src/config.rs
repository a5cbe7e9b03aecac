//! Starmap configuration. Loaded from `starmap.ron` at startup.

use serde::{Deserialize, Serialize};
use stargen::{GalaxySettings, SurveyExtent};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "starmap.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarmapConfig {
    /// Directory holding `stars.csv` and the optional companion, planet and moon tables.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,
    /// Chunk to list, as `"R_Theta_Z"`.
    #[serde(default = "default_chunk")]
    pub chunk: String,
    /// Star names to resolve through the catalog overlay.
    #[serde(default = "default_names")]
    pub names: Vec<String>,
    /// Maximum stars printed from the chunk listing.
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,
    #[serde(default)]
    pub galaxy: GalaxySettings,
    #[serde(default)]
    pub survey: SurveyConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub extent: SurveyExtent,
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("stellar_data")
}
fn default_chunk() -> String {
    "260_0_0".to_string()
}
fn default_names() -> Vec<String> {
    vec!["Sol".to_string(), "Alpha Centauri".to_string(), "Proxima Centauri".to_string()]
}
fn default_listing_limit() -> usize {
    10
}

impl Default for StarmapConfig {
    fn default() -> Self {
        Self {
            catalog_dir: default_catalog_dir(),
            chunk: default_chunk(),
            names: default_names(),
            listing_limit: default_listing_limit(),
            galaxy: GalaxySettings::default(),
            survey: SurveyConfig::default(),
        }
    }
}

impl StarmapConfig {
    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(config) => return config,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }
}
