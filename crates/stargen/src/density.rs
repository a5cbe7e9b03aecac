//! Analytic stellar density field.
//!
//! The normalised field is the sum of three components:
//!
//! - a flattened Sérsic bulge with a soft outer truncation,
//! - an exponential disk whose scale height and radial weight interpolate from
//!   the core outwards and which is cut off by a sigmoid edge,
//! - a power-law halo tapered at very large radius.
//!
//! The disk term is multiplied by the spiral-arm factor. A single global scale
//! converts normalised units to stars per cubic light-year, solved once so the
//! in-plane density at the solar radius equals the configured target.

use crate::region::{Population, Region};
use crate::settings::GalaxySettings;
use crate::spiral::{dominant_arm, smoothstep, spiral_factor};
use galaxy_core::{solar_calibration_point, Cylindrical, Position};

// Bulge
const BULGE_SERSIC_N: f64 = 4.0;
const BULGE_EFFECTIVE_RADIUS: f64 = 3_000.0;
/// Normalised density at the effective radius.
const BULGE_AMPLITUDE: f64 = 2.0;
/// Vertical axis ratio of the bulge ellipsoid.
const BULGE_FLATTENING: f64 = 0.5;
const BULGE_CUTOFF: f64 = 8_000.0;

// Disk
const DISK_SCALE_LENGTH: f64 = 8_500.0;
const CORE_RADIUS: f64 = 1_000.0;
const BULGE_RADIUS: f64 = 5_000.0;
const TRANSITION_RADIUS: f64 = 10_000.0;
const DISK_EDGE: f64 = 50_000.0;
const DISK_EDGE_WIDTH: f64 = 2_500.0;
/// Disk weight inside the core, relative to the pure exponential.
const INNER_DISK_WEIGHT: f64 = 0.35;
const CORE_SCALE_HEIGHT: f64 = 1_800.0;
const BULGE_SCALE_HEIGHT: f64 = 1_400.0;
const THIN_SCALE_HEIGHT: f64 = 1_000.0;
const FLARE_START: f64 = 30_000.0;
const FLARE_FACTOR: f64 = 0.6;
const THICK_DISK_FRACTION: f64 = 0.12;
const THICK_SCALE_HEIGHT: f64 = 3_000.0;

// Halo
const HALO_AMPLITUDE: f64 = 0.05;
const HALO_CORE_RADIUS: f64 = 10_000.0;
const HALO_SLOPE: f64 = 3.5;
const HALO_OUTER_RADIUS: f64 = 150_000.0;
const HALO_TAPER: f64 = 8_000.0;

// Classification thresholds
const THIN_DISK_HEIGHT: f64 = 1_000.0;
const HALO_HEIGHT: f64 = 6_000.0;
const HALO_RADIUS: f64 = 55_000.0;
const ARM_MAX_HEIGHT: f64 = 3_000.0;
/// Fraction of an arm's peak strength needed to name the region after it.
const ARM_REGION_THRESHOLD: f64 = 0.5;
const INNER_DISK_RADIUS: f64 = 15_000.0;
const MID_DISK_RADIUS: f64 = 35_000.0;

/// Radius of the flattened bulge ellipsoid through `(r, z)`.
fn ellipsoidal_radius(r: f64, z: f64) -> f64 {
    r.hypot(z / BULGE_FLATTENING)
}

fn bulge_term(r: f64, z: f64) -> f64 {
    let m = ellipsoidal_radius(r, z);
    let b_n = 2.0 * BULGE_SERSIC_N - 1.0 / 3.0;
    let sersic = (-b_n * ((m / BULGE_EFFECTIVE_RADIUS).powf(1.0 / BULGE_SERSIC_N) - 1.0)).exp();
    let truncation = (-(m / BULGE_CUTOFF).powi(2)).exp();
    BULGE_AMPLITUDE * sersic * truncation
}

/// Thin-disk scale height at radius `r`: core, bulge and disk values blended
/// smoothly, with a flare towards the edge.
fn disk_scale_height(r: f64) -> f64 {
    let mut h = lerp(CORE_SCALE_HEIGHT, BULGE_SCALE_HEIGHT, smoothstep(CORE_RADIUS, BULGE_RADIUS, r));
    h = lerp(h, THIN_SCALE_HEIGHT, smoothstep(BULGE_RADIUS, TRANSITION_RADIUS, r));
    h * (1.0 + FLARE_FACTOR * smoothstep(FLARE_START, DISK_EDGE, r))
}

fn disk_radial_profile(r: f64) -> f64 {
    let inner = lerp(INNER_DISK_WEIGHT, 1.0, smoothstep(CORE_RADIUS, TRANSITION_RADIUS, r));
    let edge = 1.0 / (1.0 + ((r - DISK_EDGE) / DISK_EDGE_WIDTH).exp());
    (-r / DISK_SCALE_LENGTH).exp() * inner * edge
}

fn disk_vertical_profile(r: f64, z: f64) -> f64 {
    let z = z.abs();
    let thin = (-z / disk_scale_height(r)).exp();
    let thick = (-z / THICK_SCALE_HEIGHT).exp();
    (1.0 - THICK_DISK_FRACTION) * thin + THICK_DISK_FRACTION * thick
}

fn halo_term(position: Position) -> f64 {
    let s = position.length();
    let profile = (1.0 + s / HALO_CORE_RADIUS).powf(-HALO_SLOPE);
    let taper = if s > HALO_OUTER_RADIUS {
        (-(s - HALO_OUTER_RADIUS) / HALO_TAPER).exp()
    } else {
        1.0
    };
    HALO_AMPLITUDE * profile * taper
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Uncalibrated density at `position`. Zero for non-finite input.
pub fn normalized_density(position: Position) -> f64 {
    if !position.is_finite() {
        return 0.0;
    }
    let (r, theta, z) = (position.radius(), position.azimuth(), position.height());
    let disk = disk_radial_profile(r) * disk_vertical_profile(r, z) * spiral_factor(r, theta);
    let total = bulge_term(r, z) + disk + halo_term(position);
    total.max(0.0)
}

/// Calibrated stellar and rogue density field plus the region classifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField {
    scale: f64,
    max_stellar_density: f64,
    rogue_ratio: f64,
}

impl Default for DensityField {
    fn default() -> Self {
        Self::new(&GalaxySettings::default())
    }
}

impl DensityField {
    /// Solve the global scale so the calibration point hits `settings.solar_density`.
    pub fn new(settings: &GalaxySettings) -> Self {
        let reference = normalized_density(solar_calibration_point());
        let target = settings.solar_density.max(0.0);
        let scale = if reference > 0.0 { target / reference } else { 0.0 };
        Self {
            scale,
            max_stellar_density: settings.max_stellar_density.max(0.0),
            rogue_ratio: settings.rogue_ratio.max(0.0),
        }
    }

    /// Normalised units to stars per cubic light-year.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Uncalibrated model density: the sum of the galactic components.
    pub fn density_at(&self, position: Position) -> f64 {
        normalized_density(position)
    }

    /// Stars per cubic light-year, capped at the configured maximum.
    pub fn stellar_density_at(&self, position: Position) -> f64 {
        (self.density_at(position) * self.scale).min(self.max_stellar_density)
    }

    /// Free-floating sub-stellar objects per cubic light-year.
    pub fn rogue_density_at(&self, position: Position) -> f64 {
        self.stellar_density_at(position) * self.rogue_ratio
    }

    /// Spiral multiplier at `position` (1 away from every arm).
    pub fn spiral_factor_at(&self, position: Position) -> f64 {
        if !position.is_finite() {
            return 1.0;
        }
        spiral_factor(position.radius(), position.azimuth())
    }

    pub fn determine_population(&self, position: Position) -> Population {
        let (r, z) = (position.radius(), position.height().abs());
        if ellipsoidal_radius(r, z) < BULGE_RADIUS {
            Population::Bulge
        } else if z > HALO_HEIGHT || r > HALO_RADIUS || !position.is_finite() {
            Population::Halo
        } else if z > THIN_DISK_HEIGHT {
            Population::ThickDisk
        } else {
            Population::ThinDisk
        }
    }

    pub fn determine_region(&self, position: Position) -> Region {
        let (r, z) = (position.radius(), position.height().abs());
        let m = ellipsoidal_radius(r, z);
        if m < CORE_RADIUS {
            return Region::GalacticCenter;
        }
        if m < BULGE_RADIUS {
            return Region::CentralBulge;
        }
        if z > HALO_HEIGHT || r > HALO_RADIUS || !position.is_finite() {
            return Region::Halo;
        }
        if z < ARM_MAX_HEIGHT {
            if let Some((arm, relative)) = dominant_arm(r, position.azimuth()) {
                if relative >= ARM_REGION_THRESHOLD {
                    return Region::Arm(arm.name);
                }
            }
        }
        if r < INNER_DISK_RADIUS {
            Region::InnerDisk
        } else if r < MID_DISK_RADIUS {
            Region::MidDisk
        } else {
            Region::OuterDisk
        }
    }
}
