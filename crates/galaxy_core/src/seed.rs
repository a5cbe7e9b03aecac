//! 64-bit seed codec.
//!
//! Every object in the galaxy is addressed by one integer:
//!
//! ```text
//!  63        53 52      44 43     36 35 34 33                 0
//! +-----------+----------+--------+--+--+--------------------+
//! |  chunk r  | chunk θ  | z+128  |Rg|Rl|    local index     |
//! +-----------+----------+--------+--+--+--------------------+
//! ```
//!
//! `Rg` marks rogue objects, `Rl` marks real catalog stars. Seed `0` is the
//! central massive compact object and nothing else: the procedural star slot
//! that would pack to it (index 0 of chunk `0_0_-128`) does not exist.

use crate::chunk::{ChunkCoord, MAX_CHUNK_R, MIN_CHUNK_Z, THETA_CHUNKS};
use crate::error::{GalaxyError, Result};
use std::fmt;
use std::str::FromStr;

/// Width of the object index field (including the two flag bits).
pub const INDEX_BITS: u32 = 36;
const Z_BITS: u32 = 8;
const THETA_BITS: u32 = 9;

const Z_SHIFT: u32 = INDEX_BITS;
const THETA_SHIFT: u32 = Z_SHIFT + Z_BITS;
const R_SHIFT: u32 = THETA_SHIFT + THETA_BITS;

/// Added to the signed chunk z so the field stays unsigned.
pub const Z_OFFSET: i32 = -MIN_CHUNK_Z;

/// Mask of the full 36-bit index field.
pub const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;
/// Index bit 35: the object is a free-floating rogue body.
pub const ROGUE_FLAG: u64 = 1 << 35;
/// Index bit 34: the object is a star from the real catalog.
pub const REAL_FLAG: u64 = 1 << 34;
/// Largest index usable by a single kind of object.
pub const MAX_LOCAL_INDEX: u64 = REAL_FLAG - 1;

/// Universal 64-bit addressing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seed(u64);

/// Chunk and raw index field of a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedSeed {
    pub chunk: ChunkCoord,
    /// The full 36-bit index field, flag bits included.
    pub index: u64,
}

/// What a seed refers to, decided once at the seed boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    /// The central massive compact object (seed 0).
    Core,
    Star { chunk: ChunkCoord, index: u64 },
    Rogue { chunk: ChunkCoord, index: u64 },
    RealStar { chunk: ChunkCoord, catalog_index: u64 },
    /// Angular field outside `0..360`; no encoder produces these.
    Unassigned,
}

/// Fieldless tag of [`SeedKind`] for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedKindTag {
    Core,
    Star,
    Rogue,
    RealStar,
    Unassigned,
}

impl fmt::Display for SeedKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeedKindTag::Core => "core",
            SeedKindTag::Star => "star",
            SeedKindTag::Rogue => "rogue",
            SeedKindTag::RealStar => "real-star",
            SeedKindTag::Unassigned => "unassigned",
        };
        f.write_str(s)
    }
}

impl SeedKind {
    pub fn tag(&self) -> SeedKindTag {
        match self {
            SeedKind::Core => SeedKindTag::Core,
            SeedKind::Star { .. } => SeedKindTag::Star,
            SeedKind::Rogue { .. } => SeedKindTag::Rogue,
            SeedKind::RealStar { .. } => SeedKindTag::RealStar,
            SeedKind::Unassigned => SeedKindTag::Unassigned,
        }
    }
}

/// Pack chunk indices and a raw index field into a seed.
///
/// `index` is the whole 36-bit field; flag bits are the caller's business.
pub fn encode(r: i32, theta: i32, z: i32, index: i64) -> Result<Seed> {
    let chunk = ChunkCoord::new(r, theta, z)?;
    if index < 0 {
        return Err(GalaxyError::InvalidIndex(index as u64));
    }
    Seed::from_parts(chunk, index as u64)
}

fn theta_field(raw: u64) -> i32 {
    ((raw >> THETA_SHIFT) & ((1 << THETA_BITS) - 1)) as i32
}

/// Unpack a seed. Never fails: every 64-bit value maps to an in-range chunk.
///
/// Angular fields of 360 and above wrap; [`Seed::kind`] reports those seeds
/// as [`SeedKind::Unassigned`] so no accessor resolves them.
pub fn decode(seed: Seed) -> DecodedSeed {
    let raw = seed.0;
    let r = (raw >> R_SHIFT) as i32;
    let theta = theta_field(raw) % THETA_CHUNKS;
    let z = ((raw >> Z_SHIFT) & ((1 << Z_BITS) - 1)) as i32 - Z_OFFSET;
    debug_assert!(r <= MAX_CHUNK_R);
    DecodedSeed {
        chunk: ChunkCoord::from_parts(r, theta, z),
        index: raw & INDEX_MASK,
    }
}

impl Seed {
    /// The central massive compact object.
    pub const CORE: Seed = Seed(0);

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The signed form used by external interfaces.
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }

    pub const fn from_i64(value: i64) -> Self {
        Self(value as u64)
    }

    /// Pack a chunk and a raw 36-bit index field.
    ///
    /// The all-zero packing belongs to the core and is rejected.
    pub fn from_parts(chunk: ChunkCoord, index: u64) -> Result<Self> {
        if index > INDEX_MASK {
            return Err(GalaxyError::InvalidIndex(index));
        }
        let r = chunk.r() as u64;
        let theta = chunk.theta() as u64;
        let z = (chunk.z() + Z_OFFSET) as u64;
        let raw = (r << R_SHIFT) | (theta << THETA_SHIFT) | (z << Z_SHIFT) | index;
        if raw == Self::CORE.0 {
            return Err(GalaxyError::InvalidIndex(index));
        }
        Ok(Self(raw))
    }

    /// First procedural star index usable in `chunk`: 1 for the chunk whose
    /// index 0 would collide with the core seed, 0 everywhere else.
    pub fn first_star_index(chunk: ChunkCoord) -> u64 {
        u64::from(chunk.r() == 0 && chunk.theta() == 0 && chunk.z() == MIN_CHUNK_Z)
    }

    /// Seed of the `index`-th procedural star in `chunk`.
    pub fn star(chunk: ChunkCoord, index: u64) -> Result<Self> {
        Self::from_parts(chunk, checked_local(index)?)
    }

    /// Seed of the `index`-th rogue object in `chunk`.
    pub fn rogue(chunk: ChunkCoord, index: u64) -> Result<Self> {
        Self::from_parts(chunk, checked_local(index)? | ROGUE_FLAG)
    }

    /// Seed of a real catalog star stored in `chunk`.
    pub fn real(chunk: ChunkCoord, catalog_index: u64) -> Result<Self> {
        Self::from_parts(chunk, checked_local(catalog_index)? | REAL_FLAG)
    }

    pub fn decode(self) -> DecodedSeed {
        decode(self)
    }

    pub fn chunk(self) -> ChunkCoord {
        decode(self).chunk
    }

    /// Classify the seed once so callers can dispatch with a single match.
    pub fn kind(self) -> SeedKind {
        if self == Self::CORE {
            return SeedKind::Core;
        }
        if theta_field(self.0) >= THETA_CHUNKS {
            return SeedKind::Unassigned;
        }
        let DecodedSeed { chunk, index } = decode(self);
        if index & ROGUE_FLAG != 0 {
            // A stray real bit stays in the index and can never be in range.
            SeedKind::Rogue {
                chunk,
                index: index & !ROGUE_FLAG,
            }
        } else if index & REAL_FLAG != 0 {
            SeedKind::RealStar {
                chunk,
                catalog_index: index & MAX_LOCAL_INDEX,
            }
        } else {
            SeedKind::Star { chunk, index }
        }
    }
}

fn checked_local(index: u64) -> Result<u64> {
    if index > MAX_LOCAL_INDEX {
        Err(GalaxyError::InvalidIndex(index))
    } else {
        Ok(index)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

impl FromStr for Seed {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Seed::from_i64)
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Seed::from_i64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roundtrip_preserves_chunk_and_index() {
        let cases = [
            (0, 0, 0, 0),
            (260, 0, 0, 17),
            (MAX_CHUNK_R, THETA_CHUNKS - 1, 127, INDEX_MASK as i64),
            (1, 359, -128, 1 << 20),
            (1024, 180, -1, 12_345_678_901),
        ];
        for (r, theta, z, index) in cases {
            let seed = encode(r, theta, z, index).unwrap();
            let decoded = seed.decode();
            assert_eq!(
                (decoded.chunk.r(), decoded.chunk.theta(), decoded.chunk.z(), decoded.index),
                (r, theta, z, index as u64)
            );
        }
    }

    #[test]
    fn origin_chunk_is_not_the_core_seed() {
        let seed = encode(0, 0, 0, 0).unwrap();
        assert_ne!(seed, Seed::CORE);
        let d = decode(seed);
        assert_eq!((d.chunk.r(), d.chunk.theta(), d.chunk.z(), d.index), (0, 0, 0, 0));
        assert_eq!(Seed::CORE.kind(), SeedKind::Core);
    }

    #[test]
    fn out_of_range_encode_fails() {
        assert!(matches!(encode(-1, 0, 0, 0), Err(GalaxyError::InvalidCoordinate { .. })));
        assert!(matches!(encode(0, 360, 0, 0), Err(GalaxyError::InvalidCoordinate { .. })));
        assert!(matches!(encode(0, 0, 128, 0), Err(GalaxyError::InvalidCoordinate { .. })));
        assert!(matches!(encode(0, 0, 0, -1), Err(GalaxyError::InvalidIndex(_))));
        assert!(matches!(
            encode(0, 0, 0, 1 << INDEX_BITS),
            Err(GalaxyError::InvalidIndex(_))
        ));
        let chunk = ChunkCoord::new(5, 5, 5).unwrap();
        assert!(matches!(Seed::star(chunk, REAL_FLAG), Err(GalaxyError::InvalidIndex(_))));
    }

    #[test]
    fn any_value_decodes_in_range() {
        for raw in [u64::MAX, 0x8000_0000_0000_0000, 0x0123_4567_89ab_cdef, 1] {
            let d = decode(Seed::from_raw(raw));
            assert!(ChunkCoord::new(d.chunk.r(), d.chunk.theta(), d.chunk.z()).is_ok());
            assert!(d.index <= INDEX_MASK);
        }
    }

    #[test]
    fn flags_separate_star_rogue_and_real_namespaces() {
        let chunk = ChunkCoord::new(260, 0, 0).unwrap();
        for index in [0, 1, 99, MAX_LOCAL_INDEX] {
            let star = Seed::star(chunk, index).unwrap();
            let rogue = Seed::rogue(chunk, index).unwrap();
            let real = Seed::real(chunk, index).unwrap();
            assert_ne!(star, rogue);
            assert_ne!(star, real);
            assert_ne!(rogue, real);
            assert_eq!(star.kind(), SeedKind::Star { chunk, index });
            assert_eq!(rogue.kind(), SeedKind::Rogue { chunk, index });
            assert_eq!(real.kind(), SeedKind::RealStar { chunk, catalog_index: index });
        }
    }

    #[test]
    fn core_slot_is_never_packed_for_a_star() {
        let bottom = ChunkCoord::new(0, 0, MIN_CHUNK_Z).unwrap();
        assert!(matches!(Seed::star(bottom, 0), Err(GalaxyError::InvalidIndex(0))));
        assert!(encode(0, 0, MIN_CHUNK_Z, 0).is_err());
        assert_eq!(Seed::first_star_index(bottom), 1);
        assert_eq!(Seed::first_star_index(ChunkCoord::new(0, 0, MIN_CHUNK_Z + 1).unwrap()), 0);

        let next = Seed::star(bottom, 1).unwrap();
        assert_eq!(next.kind(), SeedKind::Star { chunk: bottom, index: 1 });
        // Flagged namespaces never reach zero.
        assert_ne!(Seed::rogue(bottom, 0).unwrap(), Seed::CORE);
        assert_ne!(Seed::real(bottom, 0).unwrap(), Seed::CORE);
    }

    #[test]
    fn out_of_range_theta_is_unassigned() {
        let canonical = Seed::star(ChunkCoord::new(260, 5, 0).unwrap(), 3).unwrap();
        let aliased = Seed::from_raw(canonical.raw() + ((THETA_CHUNKS as u64) << THETA_SHIFT));
        assert_eq!(aliased.chunk(), canonical.chunk());
        assert_eq!(aliased.kind(), SeedKind::Unassigned);
        assert_eq!(aliased.kind().tag(), SeedKindTag::Unassigned);
        assert_eq!(canonical.kind().tag(), SeedKindTag::Star);
    }

    #[test]
    fn signed_form_roundtrips_through_strings() {
        let chunk = ChunkCoord::new(2000, 12, -4).unwrap();
        let seed = Seed::star(chunk, 42).unwrap();
        assert!(seed.as_i64() < 0, "top radial bit lands in the sign bit");
        let parsed: Seed = seed.to_string().parse().unwrap();
        assert_eq!(parsed, seed);
        assert_eq!(Seed::from(seed.as_i64()), seed);
    }
}
