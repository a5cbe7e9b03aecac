//! Cylindrical chunk grid.
//!
//! The galaxy is cut into wedges 100 ly deep radially, 1° wide in azimuth and
//! 100 ly tall. A chunk is named by `(r, theta, z)` indices and formatted as
//! `"R_Theta_Z"`.

use crate::error::{GalaxyError, Result};
use crate::position::{Cylindrical, Position};
use std::fmt;
use std::str::FromStr;

/// Radial and vertical edge length of a chunk in light-years.
pub const CHUNK_SIZE_LY: f64 = 100.0;
/// Angular width of a chunk in degrees.
pub const CHUNK_ANGLE_DEG: f64 = 1.0;
/// Number of angular chunks in a full ring.
pub const THETA_CHUNKS: i32 = 360;
/// Largest radial index (11-bit field).
pub const MAX_CHUNK_R: i32 = (1 << 11) - 1;
/// Vertical index range (8-bit field, centred on the plane).
pub const MIN_CHUNK_Z: i32 = -128;
pub const MAX_CHUNK_Z: i32 = 127;

/// Index of one wedge of cylindrical space. Always within the addressable ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    r: i32,
    theta: i32,
    z: i32,
}

/// Extents of a chunk: radii and heights in light-years, azimuths in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
    pub r_min: f64,
    pub r_max: f64,
    pub theta_min: f64,
    pub theta_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl ChunkBounds {
    pub fn delta_r(&self) -> f64 {
        self.r_max - self.r_min
    }

    pub fn delta_theta(&self) -> f64 {
        self.theta_max - self.theta_min
    }

    pub fn delta_z(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Map unit-interval fractions along each axis to a position inside the chunk.
    pub fn lerp(&self, fr: f64, ftheta: f64, fz: f64) -> Position {
        let r = self.r_min + fr * self.delta_r();
        let theta = self.theta_min + ftheta * self.delta_theta();
        let z = self.z_min + fz * self.delta_z();
        Position::from_cylindrical(r, theta, z)
    }
}

impl ChunkCoord {
    /// Build a chunk coordinate, rejecting indices outside the addressable ranges.
    pub fn new(r: i32, theta: i32, z: i32) -> Result<Self> {
        let in_range = (0..=MAX_CHUNK_R).contains(&r)
            && (0..THETA_CHUNKS).contains(&theta)
            && (MIN_CHUNK_Z..=MAX_CHUNK_Z).contains(&z);
        if !in_range {
            return Err(GalaxyError::InvalidCoordinate {
                r: r as i64,
                theta: theta as i64,
                z: z as i64,
            });
        }
        Ok(Self { r, theta, z })
    }

    /// Build from indices already known to be in range (bit-field decoding).
    pub(crate) fn from_parts(r: i32, theta: i32, z: i32) -> Self {
        debug_assert!(Self::new(r, theta, z).is_ok(), "chunk ({r}, {theta}, {z}) out of range");
        Self { r, theta, z }
    }

    /// The chunk containing a galactocentric position.
    pub fn for_position(position: Position) -> Result<Self> {
        let r = (position.radius() / CHUNK_SIZE_LY).floor();
        let theta = (position.azimuth().to_degrees() / CHUNK_ANGLE_DEG).floor();
        let z = (position.height() / CHUNK_SIZE_LY).floor();
        if !(r.is_finite() && theta.is_finite() && z.is_finite()) {
            return Err(GalaxyError::InvalidCoordinate {
                r: i64::MAX,
                theta: i64::MAX,
                z: i64::MAX,
            });
        }
        // Azimuths within an ulp of 2π land on 360.
        let theta = (theta as i64).rem_euclid(THETA_CHUNKS as i64);
        let (r, z) = (r as i64, z as i64);
        if r > MAX_CHUNK_R as i64 || z < MIN_CHUNK_Z as i64 || z > MAX_CHUNK_Z as i64 {
            return Err(GalaxyError::InvalidCoordinate { r, theta, z });
        }
        Self::new(r as i32, theta as i32, z as i32)
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn theta(&self) -> i32 {
        self.theta
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn bounds(&self) -> ChunkBounds {
        let r_min = self.r as f64 * CHUNK_SIZE_LY;
        let theta_min = (self.theta as f64 * CHUNK_ANGLE_DEG).to_radians();
        let z_min = self.z as f64 * CHUNK_SIZE_LY;
        ChunkBounds {
            r_min,
            r_max: r_min + CHUNK_SIZE_LY,
            theta_min,
            theta_max: ((self.theta + 1) as f64 * CHUNK_ANGLE_DEG).to_radians(),
            z_min,
            z_max: z_min + CHUNK_SIZE_LY,
        }
    }

    /// Volume in cubic light-years.
    ///
    /// The innermost ring uses the exact wedge-from-origin area so the
    /// singular chunk is not overestimated.
    pub fn volume(&self) -> f64 {
        let b = self.bounds();
        if self.r == 0 {
            0.5 * b.delta_theta() * b.delta_r() * b.delta_r() * b.delta_z()
        } else {
            let avg_radius = 0.5 * (b.r_min + b.r_max);
            avg_radius * b.delta_r() * b.delta_theta() * b.delta_z()
        }
    }

    /// Geometric centre of the wedge.
    pub fn center(&self) -> Position {
        self.bounds().lerp(0.5, 0.5, 0.5)
    }

    /// True when `position` falls inside this chunk.
    pub fn contains(&self, position: Position) -> bool {
        Self::for_position(position).map_or(false, |c| c == *self)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.r, self.theta, self.z)
    }
}

impl FromStr for ChunkCoord {
    type Err = GalaxyError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || GalaxyError::InvalidChunkId(s.to_string());
        let mut parts = s.trim().split('_');
        let mut next = || -> Result<i32> {
            parts
                .next()
                .and_then(|p| p.parse::<i32>().ok())
                .ok_or_else(malformed)
        };
        let (r, theta, z) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(malformed());
        }
        Self::new(r, theta, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn chunk_id_parses_and_formats_symmetrically() {
        let chunk: ChunkCoord = "260_0_-3".parse().unwrap();
        assert_eq!((chunk.r(), chunk.theta(), chunk.z()), (260, 0, -3));
        assert_eq!(chunk.to_string(), "260_0_-3");
    }

    #[test]
    fn malformed_or_out_of_range_ids_are_rejected() {
        assert!(matches!("260_0".parse::<ChunkCoord>(), Err(GalaxyError::InvalidChunkId(_))));
        assert!(matches!("a_b_c".parse::<ChunkCoord>(), Err(GalaxyError::InvalidChunkId(_))));
        assert!(matches!("1_2_3_4".parse::<ChunkCoord>(), Err(GalaxyError::InvalidChunkId(_))));
        assert!(matches!(
            "260_360_0".parse::<ChunkCoord>(),
            Err(GalaxyError::InvalidCoordinate { .. })
        ));
        assert!(ChunkCoord::new(-1, 0, 0).is_err());
        assert!(ChunkCoord::new(MAX_CHUNK_R + 1, 0, 0).is_err());
        assert!(ChunkCoord::new(0, 0, MIN_CHUNK_Z - 1).is_err());
        assert!(ChunkCoord::new(MAX_CHUNK_R, THETA_CHUNKS - 1, MAX_CHUNK_Z).is_ok());
    }

    #[test]
    fn center_maps_back_to_same_chunk() {
        for (r, theta, z) in [(0, 0, 0), (260, 0, 0), (17, 359, -128), (2047, 180, 127)] {
            let chunk = ChunkCoord::new(r, theta, z).unwrap();
            assert_eq!(ChunkCoord::for_position(chunk.center()).unwrap(), chunk);
            assert!(chunk.contains(chunk.center()));
        }
    }

    #[test]
    fn innermost_chunk_uses_wedge_volume() {
        let core = ChunkCoord::new(0, 10, 0).unwrap();
        let expected = 0.5 * 1f64.to_radians() * CHUNK_SIZE_LY * CHUNK_SIZE_LY * CHUNK_SIZE_LY;
        assert_relative_eq!(core.volume(), expected, max_relative = 1e-12);

        let ring = ChunkCoord::new(260, 0, 0).unwrap();
        let expected = 26_050.0 * CHUNK_SIZE_LY * 1f64.to_radians() * CHUNK_SIZE_LY;
        assert_relative_eq!(ring.volume(), expected, max_relative = 1e-12);
    }

    #[test]
    fn positions_outside_grid_are_invalid() {
        let far = Position::new(300_000.0, 0.0, 0.0);
        assert!(matches!(
            ChunkCoord::for_position(far),
            Err(GalaxyError::InvalidCoordinate { .. })
        ));
        let high = Position::new(1000.0, 0.0, 20_000.0);
        assert!(ChunkCoord::for_position(high).is_err());
        assert!(ChunkCoord::for_position(Position::new(f64::NAN, 0.0, 0.0)).is_err());
    }
}
