//! Per-chunk object counts by midpoint quadrature over the density field.

use crate::density::DensityField;
use crate::settings::GalaxySettings;
use galaxy_core::{ChunkCoord, Position, SeedStream, StreamDomain, MAX_LOCAL_INDEX};

/// Sample points per axis; the chunk is sampled on a 3×3×3 grid.
const SAMPLES_PER_AXIS: usize = 3;

/// Cell midpoints of the quadrature grid as fractions of each axis.
const SAMPLE_FRACTIONS: [f64; SAMPLES_PER_AXIS] = [1.0 / 6.0, 0.5, 5.0 / 6.0];

/// Turns the continuous density field into the number of objects that exist
/// in each chunk. No randomness for stars; rogue counts add one chunk-keyed
/// Bernoulli draw.
#[derive(Debug, Clone)]
pub struct PopulationEstimator {
    field: DensityField,
    max_per_chunk: u64,
}

impl PopulationEstimator {
    pub fn new(field: DensityField, max_per_chunk: u64) -> Self {
        Self {
            field,
            max_per_chunk: max_per_chunk.min(MAX_LOCAL_INDEX + 1),
        }
    }

    pub fn from_settings(settings: &GalaxySettings) -> Self {
        Self::new(DensityField::new(settings), settings.max_stars_per_chunk)
    }

    pub fn field(&self) -> &DensityField {
        &self.field
    }

    /// Mean of `density` over the 27 grid points, times the chunk volume.
    pub fn integrate(&self, chunk: ChunkCoord, density: impl Fn(&DensityField, Position) -> f64) -> f64 {
        let bounds = chunk.bounds();
        let mut sum = 0.0;
        for fr in SAMPLE_FRACTIONS {
            for ftheta in SAMPLE_FRACTIONS {
                for fz in SAMPLE_FRACTIONS {
                    sum += density(&self.field, bounds.lerp(fr, ftheta, fz));
                }
            }
        }
        let samples = (SAMPLES_PER_AXIS * SAMPLES_PER_AXIS * SAMPLES_PER_AXIS) as f64;
        let total = sum / samples * chunk.volume();
        if total.is_finite() {
            total.max(0.0)
        } else {
            0.0
        }
    }

    /// Unrounded expected star count.
    pub fn expected_stars(&self, chunk: ChunkCoord) -> f64 {
        self.integrate(chunk, DensityField::stellar_density_at)
    }

    /// Unrounded expected rogue object count.
    pub fn expected_rogues(&self, chunk: ChunkCoord) -> f64 {
        self.integrate(chunk, DensityField::rogue_density_at)
    }

    /// Number of procedural stars in `chunk`; valid indices are `0..count`
    /// (from 1 in the chunk given by [`Seed::first_star_index`]).
    ///
    /// [`Seed::first_star_index`]: galaxy_core::Seed::first_star_index
    pub fn expected_count(&self, chunk: ChunkCoord) -> u64 {
        let count = self.expected_stars(chunk).round() as u64;
        if count > self.max_per_chunk {
            log::debug!("chunk {chunk}: {count} stars capped to {}", self.max_per_chunk);
        }
        count.min(self.max_per_chunk)
    }

    /// Number of rogue objects in `chunk`.
    ///
    /// Below one expected object this is a single Bernoulli trial; otherwise
    /// the integer part plus a Bernoulli trial on the remainder. The draw is
    /// keyed by the chunk so the count never changes.
    pub fn rogue_count(&self, chunk: ChunkCoord) -> u64 {
        let expected = self.expected_rogues(chunk);
        let mut stream = SeedStream::for_chunk(chunk, StreamDomain::RogueCount);
        let whole = expected.floor();
        let extra = u64::from(stream.chance(expected - whole));
        (whole as u64 + extra).min(self.max_per_chunk)
    }
}

impl Default for PopulationEstimator {
    fn default() -> Self {
        Self::from_settings(&GalaxySettings::default())
    }
}
