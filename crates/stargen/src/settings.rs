//! Tunables for a [`Galaxy`](crate::Galaxy). Every field has a serde default so
//! partial config files stay valid.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxySettings {
    /// Stellar density at the solar calibration point, stars per cubic light-year.
    #[serde(default = "default_solar_density")]
    pub solar_density: f64,
    /// Upper bound on calibrated stellar density, stars per cubic light-year.
    #[serde(default = "default_max_stellar_density")]
    pub max_stellar_density: f64,
    /// Per-chunk star count cap. Memory policy for the densest central chunks,
    /// not a physical limit.
    #[serde(default = "default_max_stars_per_chunk")]
    pub max_stars_per_chunk: u64,
    /// Rogue object density as a fraction of stellar density.
    #[serde(default = "default_rogue_ratio")]
    pub rogue_ratio: f64,
    /// Memoise generated stars by seed.
    #[serde(default = "default_true")]
    pub cache_stars: bool,
}

fn default_solar_density() -> f64 {
    0.004
}
fn default_max_stellar_density() -> f64 {
    288.0
}
fn default_max_stars_per_chunk() -> u64 {
    50_000_000
}
fn default_rogue_ratio() -> f64 {
    0.001
}
fn default_true() -> bool {
    true
}

impl Default for GalaxySettings {
    fn default() -> Self {
        Self {
            solar_density: default_solar_density(),
            max_stellar_density: default_max_stellar_density(),
            max_stars_per_chunk: default_max_stars_per_chunk(),
            rogue_ratio: default_rogue_ratio(),
            cache_stars: default_true(),
        }
    }
}
