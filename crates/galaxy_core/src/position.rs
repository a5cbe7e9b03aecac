//! Galactocentric positions and cylindrical helpers.
//!
//! Positions are plain `DVec3` in light-years with the galactic plane at z = 0.
//! Cylindrical radius, azimuth and height are always derived, never stored.

use glam::DVec3;
use std::f64::consts::{PI, TAU};

/// A galactocentric position in light-years.
pub type Position = DVec3;

/// Galactocentric radius of the Sun in light-years.
pub const SOLAR_RADIUS_LY: f64 = 26_050.0;
/// Azimuth of the Sun in degrees (places it mid-chunk at `260_0_0`).
pub const SOLAR_AZIMUTH_DEG: f64 = 0.5;
/// Height of the Sun above the galactic plane in light-years.
pub const SOLAR_HEIGHT_LY: f64 = 50.0;

/// Cylindrical views of a galactocentric position.
pub trait Cylindrical {
    /// Build a position from cylindrical radius, azimuth (radians) and height.
    fn from_cylindrical(r: f64, theta: f64, z: f64) -> Self;
    /// Distance from the rotation axis.
    fn radius(&self) -> f64;
    /// Azimuth in radians, in `[0, 2π)`.
    fn azimuth(&self) -> f64;
    /// Height above (or below) the galactic plane.
    fn height(&self) -> f64;
}

impl Cylindrical for DVec3 {
    fn from_cylindrical(r: f64, theta: f64, z: f64) -> Self {
        DVec3::new(r * theta.cos(), r * theta.sin(), z)
    }

    fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    fn azimuth(&self) -> f64 {
        let theta = self.y.atan2(self.x);
        if theta < 0.0 {
            // -0.0 and tiny negatives can round up to exactly TAU
            (theta + TAU) % TAU
        } else {
            theta
        }
    }

    fn height(&self) -> f64 {
        self.z
    }
}

/// Galactocentric position of the Sun.
pub fn solar_position() -> Position {
    Position::from_cylindrical(SOLAR_RADIUS_LY, SOLAR_AZIMUTH_DEG.to_radians(), SOLAR_HEIGHT_LY)
}

/// In-plane point at the solar radius, used to calibrate the density field.
pub fn solar_calibration_point() -> Position {
    Position::from_cylindrical(SOLAR_RADIUS_LY, SOLAR_AZIMUTH_DEG.to_radians(), 0.0)
}

/// Wrap an angle into `[-π, π]`. Non-finite input folds to 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    wrapped.clamp(-PI, PI)
}
