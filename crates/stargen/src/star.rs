//! Star records and the seed → star synthesizer.

use crate::catalog::CatalogRecord;
use crate::density::DensityField;
use crate::overlay::CatalogOverlay;
use crate::population::PopulationEstimator;
use crate::region::{Population, Region};
use crate::stellar::{blackbody_to_rgb, StellarFamily, StellarType, CENTRAL_BLACK_HOLE_MASS};
use crate::system::SystemSummarizer;
use galaxy_core::{
    ChunkCoord, Cylindrical, GalaxyError, Position, Result, Seed, SeedKind, SeedKindTag,
    SeedStream, StreamDomain,
};
use serde::Serialize;
use std::sync::Arc;

/// Name of the central massive compact object.
pub const CENTRAL_OBJECT_NAME: &str = "Sagittarius A*";

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub seed: Seed,
    pub position: Position,
    pub stellar_type: StellarType,
    /// Solar masses.
    pub mass: f64,
    /// Kelvin.
    pub temperature: f64,
    /// Solar luminosities.
    pub luminosity: f64,
    pub color: [f32; 3],
    pub population: Population,
    pub region: Region,
    pub planet_count: u32,
    pub is_multiple: bool,
    pub system_name: String,
    /// Set for stars taken from the real catalog.
    pub catalog: Option<Arc<CatalogRecord>>,
}

/// Flat per-star record for export layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarExport {
    pub seed: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: f64,
    /// Azimuth in degrees.
    pub theta: f64,
    pub stellar_type: StellarType,
    pub mass: f64,
    pub temperature: f64,
    pub luminosity: f64,
    pub color_r: f32,
    pub color_g: f32,
    pub color_b: f32,
    pub population: Population,
    pub region: &'static str,
    pub planet_count: u32,
    pub is_multiple: bool,
    pub system_name: String,
    pub is_real: bool,
}

impl Star {
    pub fn is_real(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn export(&self) -> StarExport {
        StarExport {
            seed: self.seed.as_i64(),
            x: self.position.x,
            y: self.position.y,
            z: self.position.z,
            r: self.position.radius(),
            theta: self.position.azimuth().to_degrees(),
            stellar_type: self.stellar_type,
            mass: self.mass,
            temperature: self.temperature,
            luminosity: self.luminosity,
            color_r: self.color[0],
            color_g: self.color[1],
            color_b: self.color[2],
            population: self.population,
            region: self.region.label(),
            planet_count: self.planet_count,
            is_multiple: self.is_multiple,
            system_name: self.system_name.clone(),
            is_real: self.is_real(),
        }
    }
}

/// The object behind seed 0.
pub fn central_object() -> Star {
    let props = StellarType::SupermassiveBlackHole.properties();
    Star {
        seed: Seed::CORE,
        position: Position::ZERO,
        stellar_type: StellarType::SupermassiveBlackHole,
        mass: CENTRAL_BLACK_HOLE_MASS,
        temperature: props.temperature,
        luminosity: props.luminosity,
        color: blackbody_to_rgb(props.temperature),
        population: Population::Bulge,
        region: Region::GalacticCenter,
        planet_count: 0,
        is_multiple: false,
        system_name: CENTRAL_OBJECT_NAME.to_string(),
        catalog: None,
    }
}

/// Strata per axis for a chunk holding `count` stars: the smallest `s` with
/// `s³ ≥ count`.
pub fn strata_per_axis(count: u64) -> u64 {
    let mut s = (count as f64).cbrt().ceil().max(1.0) as u64;
    while s > 1 && (s - 1).pow(3) >= count {
        s -= 1;
    }
    while s.pow(3) < count {
        s += 1;
    }
    s
}

/// `(r, theta, z)` stratum of star `index` in a chunk of `count` stars.
pub fn stratum_of(index: u64, count: u64) -> (u64, u64, u64) {
    let s = strata_per_axis(count);
    let cell = index % (s * s * s);
    (cell / (s * s), (cell / s) % s, cell % s)
}

// Family weights: main sequence, giants, brown dwarfs, remnants.
fn family_weights(population: Population) -> [(StellarFamily, f64); 4] {
    let [ms, giant, bd, remnant] = match population {
        Population::ThinDisk => [0.78, 0.02, 0.12, 0.08],
        Population::ThickDisk => [0.76, 0.03, 0.10, 0.11],
        Population::Bulge => [0.72, 0.05, 0.08, 0.15],
        Population::Halo => [0.74, 0.02, 0.09, 0.15],
    };
    [
        (StellarFamily::MainSequence, ms),
        (StellarFamily::Giant, giant),
        (StellarFamily::BrownDwarf, bd),
        (StellarFamily::Remnant, remnant),
    ]
}

fn main_sequence_weights(population: Population) -> [(StellarType, f64); 7] {
    use StellarType::*;
    let [o, b, a, f, g, k] = match population {
        Population::ThinDisk => [0.00003, 0.0013, 0.006, 0.03, 0.076, 0.121],
        Population::ThickDisk => [0.0, 0.0002, 0.002, 0.02, 0.08, 0.14],
        Population::Bulge => [0.00001, 0.0005, 0.003, 0.025, 0.08, 0.14],
        Population::Halo => [0.0, 0.0, 0.001, 0.015, 0.07, 0.15],
    };
    let m = 1.0 - (o + b + a + f + g + k);
    [(O, o), (B, b), (A, a), (F, f), (G, g), (K, k), (M, m)]
}

fn giant_weights(population: Population) -> [(StellarType, f64); 4] {
    use StellarType::*;
    let [red, blue, red_super, blue_super] = match population {
        Population::ThinDisk => [0.90, 0.06, 0.03, 0.01],
        _ => [0.97, 0.01, 0.02, 0.0],
    };
    [(RedGiant, red), (BlueGiant, blue), (RedSupergiant, red_super), (BlueSupergiant, blue_super)]
}

const BROWN_DWARF_WEIGHTS: [(StellarType, f64); 3] =
    [(StellarType::L, 0.5), (StellarType::T, 0.35), (StellarType::Y, 0.15)];

const REMNANT_WEIGHTS: [(StellarType, f64); 3] = [
    (StellarType::WhiteDwarf, 0.93),
    (StellarType::NeutronStar, 0.06),
    (StellarType::StellarBlackHole, 0.01),
];

/// Stellar density (stars/ly³) above which the crowded-region adjustments apply.
const CROWDED_DENSITY: f64 = 1.0;
const CROWDED_REMNANT_BOOST: f64 = 3.0;
const CROWDED_BROWN_DWARF_FACTOR: f64 = 0.5;

fn is_young(stellar_type: StellarType) -> bool {
    use StellarType::*;
    matches!(stellar_type, O | B | A | BlueGiant | BlueSupergiant)
}

/// Pick an entry with probability proportional to its weight using one
/// uniform variate, and return the variate rescaled into the chosen slot so
/// it can drive a nested pick. `None` when no entry has positive weight.
fn pick_weighted<T: Copy>(u: f64, entries: &[(T, f64)]) -> Option<(T, f64)> {
    let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
    let mut cursor = u.clamp(0.0, 1.0) * total;
    let mut last = None;
    for &(item, weight) in entries {
        if weight <= 0.0 {
            continue;
        }
        if cursor < weight {
            return Some((item, cursor / weight));
        }
        cursor -= weight;
        last = Some((item, 1.0 - f64::EPSILON));
    }
    // Rounding at the top of the range lands on the last populated slot.
    last
}

/// Resolve a stellar type from one uniform draw.
///
/// The draw first picks a family from the population's table (remnants
/// boosted and brown dwarfs cut in crowded regions), then a type within the
/// family. Young massive types are weighted up by the spiral-arm factor.
pub fn classify(u: f64, population: Population, spiral_factor: f64, stellar_density: f64) -> StellarType {
    let mut families = family_weights(population);
    if stellar_density > CROWDED_DENSITY {
        for (family, weight) in families.iter_mut() {
            match family {
                StellarFamily::Remnant => *weight *= CROWDED_REMNANT_BOOST,
                StellarFamily::BrownDwarf => *weight *= CROWDED_BROWN_DWARF_FACTOR,
                _ => {}
            }
        }
    }
    let (family, u) = pick_weighted(u, &families).unwrap_or((StellarFamily::MainSequence, u));

    let boost = |(ty, w): (StellarType, f64)| {
        if is_young(ty) {
            (ty, w * spiral_factor.max(1.0))
        } else {
            (ty, w)
        }
    };
    let picked = match family {
        StellarFamily::MainSequence => pick_weighted(u, &main_sequence_weights(population).map(boost)),
        StellarFamily::Giant => pick_weighted(u, &giant_weights(population).map(boost)),
        StellarFamily::BrownDwarf => pick_weighted(u, &BROWN_DWARF_WEIGHTS),
        StellarFamily::Remnant => pick_weighted(u, &REMNANT_WEIGHTS),
    };
    picked.map_or(StellarType::M, |(ty, _)| ty)
}

/// Rebuilds procedural stars from their seeds.
#[derive(Clone)]
pub struct StarSynthesizer {
    estimator: PopulationEstimator,
    overlay: Arc<CatalogOverlay>,
    systems: Arc<dyn SystemSummarizer>,
}

impl StarSynthesizer {
    pub fn new(
        estimator: PopulationEstimator,
        overlay: Arc<CatalogOverlay>,
        systems: Arc<dyn SystemSummarizer>,
    ) -> Self {
        Self {
            estimator,
            overlay,
            systems,
        }
    }

    pub fn field(&self) -> &DensityField {
        self.estimator.field()
    }

    pub fn estimator(&self) -> &PopulationEstimator {
        &self.estimator
    }

    /// Star for a procedural seed, or the central object for seed 0.
    ///
    /// Rogue and real-catalog seeds are rejected with `WrongAccessor`.
    pub fn star_by_seed(&self, seed: Seed) -> Result<Star> {
        match seed.kind() {
            SeedKind::Core => Ok(central_object()),
            SeedKind::Star { chunk, index } => {
                let count = self.estimator.expected_count(chunk);
                self.star_in_chunk(chunk, index, count)
            }
            SeedKind::Unassigned => Err(GalaxyError::NotFound {
                seed,
                suppressed: false,
            }),
            other => Err(GalaxyError::WrongAccessor {
                seed,
                expected: SeedKindTag::Star,
                found: other.tag(),
            }),
        }
    }

    /// Star `index` of a chunk already known to hold `count` stars.
    pub fn star_in_chunk(&self, chunk: ChunkCoord, index: u64, count: u64) -> Result<Star> {
        let seed = Seed::star(chunk, index)?;
        if index >= count {
            return Err(GalaxyError::NotFound {
                seed,
                suppressed: false,
            });
        }

        let mut stream = SeedStream::for_seed(seed, StreamDomain::Star);
        let (u_r, u_theta, u_z) = (stream.uniform(), stream.uniform(), stream.uniform());
        let u_type = stream.uniform();
        let u_suppress = stream.uniform();

        let s = strata_per_axis(count) as f64;
        let (sr, stheta, sz) = stratum_of(index, count);
        let position = chunk.bounds().lerp(
            (sr as f64 + u_r) / s,
            (stheta as f64 + u_theta) / s,
            (sz as f64 + u_z) / s,
        );

        if self.overlay.is_suppressed(position, u_suppress) {
            return Err(GalaxyError::NotFound {
                seed,
                suppressed: true,
            });
        }

        let field = self.estimator.field();
        let population = field.determine_population(position);
        let stellar_type = classify(
            u_type,
            population,
            field.spiral_factor_at(position),
            field.stellar_density_at(position),
        );
        let props = stellar_type.properties();
        let summary = self.systems.summarize(
            seed,
            stellar_type,
            props.mass,
            props.temperature,
            props.luminosity,
        );

        Ok(Star {
            seed,
            position,
            stellar_type,
            mass: props.mass,
            temperature: props.temperature,
            luminosity: props.luminosity,
            color: blackbody_to_rgb(props.temperature),
            population,
            region: field.determine_region(position),
            planet_count: summary.planet_count,
            is_multiple: summary.is_multiple,
            system_name: summary.name,
            catalog: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::row;
    use crate::catalog::CatalogTables;
    use crate::system::ProceduralSystems;
    use approx::assert_relative_eq;
    use galaxy_core::{solar_position, MAX_LOCAL_INDEX};

    fn synthesizer(overlay: CatalogOverlay) -> StarSynthesizer {
        StarSynthesizer::new(
            PopulationEstimator::default(),
            Arc::new(overlay),
            Arc::new(ProceduralSystems),
        )
    }

    fn solar_chunk() -> ChunkCoord {
        "260_0_0".parse().unwrap()
    }

    #[test]
    fn seed_zero_is_the_central_object() {
        let star = synthesizer(CatalogOverlay::empty()).star_by_seed(Seed::CORE).unwrap();
        assert_relative_eq!(star.mass, 4_310_000.0);
        assert_eq!(star.temperature, 0.0);
        assert_eq!(star.luminosity, 0.0);
        assert_eq!(star.region.label(), "galactic center");
    }

    #[test]
    fn same_seed_gives_identical_star() {
        let synth = synthesizer(CatalogOverlay::empty());
        let seed = Seed::star(solar_chunk(), 123).unwrap();
        assert_eq!(synth.star_by_seed(seed).unwrap(), synth.star_by_seed(seed).unwrap());
    }

    #[test]
    fn every_index_in_the_solar_chunk_exists() {
        let synth = synthesizer(CatalogOverlay::empty());
        let chunk = solar_chunk();
        let count = synth.estimator().expected_count(chunk);
        assert!(count > 0);
        for index in 0..count {
            let star = synth.star_in_chunk(chunk, index, count).unwrap();
            assert!(chunk.contains(star.position), "index {index} escaped its chunk");
        }
    }

    #[test]
    fn indices_past_the_count_are_not_found() {
        let synth = synthesizer(CatalogOverlay::empty());
        let chunk = solar_chunk();
        let count = synth.estimator().expected_count(chunk);
        for index in [count, count + 1, MAX_LOCAL_INDEX] {
            let seed = Seed::star(chunk, index).unwrap();
            assert!(matches!(
                synth.star_by_seed(seed),
                Err(GalaxyError::NotFound { suppressed: false, .. })
            ));
        }
        let empty_halo = Seed::star("2000_0_0".parse().unwrap(), 0).unwrap();
        assert!(matches!(synth.star_by_seed(empty_halo), Err(GalaxyError::NotFound { .. })));
    }

    #[test]
    fn rogue_and_real_seeds_are_rejected() {
        let synth = synthesizer(CatalogOverlay::empty());
        let rogue = Seed::rogue(solar_chunk(), 0).unwrap();
        let real = Seed::real(solar_chunk(), 0).unwrap();
        assert!(matches!(
            synth.star_by_seed(rogue),
            Err(GalaxyError::WrongAccessor { found: SeedKindTag::Rogue, .. })
        ));
        assert!(matches!(
            synth.star_by_seed(real),
            Err(GalaxyError::WrongAccessor { found: SeedKindTag::RealStar, .. })
        ));
    }

    #[test]
    fn neighbouring_indices_use_different_strata() {
        for count in [8, 9, 27, 1_000, 17_000] {
            assert_ne!(stratum_of(0, count), stratum_of(1, count));
        }
        assert_eq!(strata_per_axis(8), 2);
        assert_eq!(strata_per_axis(9), 3);
        assert_eq!(strata_per_axis(1), 1);
        assert_eq!(strata_per_axis(0), 1);

        let synth = synthesizer(CatalogOverlay::empty());
        let chunk = solar_chunk();
        let count = synth.estimator().expected_count(chunk);
        let a = synth.star_in_chunk(chunk, 0, count).unwrap();
        let b = synth.star_in_chunk(chunk, 1, count).unwrap();
        let s = strata_per_axis(count) as f64;
        let z_cell = |p: Position| ((p.z - chunk.bounds().z_min) / chunk.bounds().delta_z() * s).floor();
        assert_ne!(z_cell(a.position), z_cell(b.position));
    }

    #[test]
    fn catalog_suppresses_slots_near_sol() {
        let tables = CatalogTables::assemble(vec![row("Sol", 0.0, "G2V")], vec![], vec![], vec![]);
        let with_catalog = synthesizer(CatalogOverlay::from_tables(tables));
        let without = synthesizer(CatalogOverlay::empty());
        let chunk = solar_chunk();
        let count = without.estimator().expected_count(chunk);

        let mut suppressed = 0;
        for index in 0..count {
            match with_catalog.star_in_chunk(chunk, index, count) {
                Ok(star) => {
                    // Surviving slots are bit-identical to the uncatalogued galaxy.
                    assert_eq!(star, without.star_in_chunk(chunk, index, count).unwrap());
                    assert!(star.position.distance(solar_position()) >= 50.0);
                }
                Err(GalaxyError::NotFound { suppressed: true, .. }) => suppressed += 1,
                Err(e) => panic!("unexpected {e}"),
            }
        }
        assert!(suppressed > 0);
    }

    #[test]
    fn classification_tracks_population_and_crowding() {
        // The bottom of the range is the first main-sequence type with weight.
        assert_eq!(classify(0.0, Population::ThinDisk, 1.0, 0.004), StellarType::O);
        assert_eq!(classify(0.0, Population::Halo, 1.0, 0.004), StellarType::A);
        assert_eq!(classify(0.999_999, Population::ThinDisk, 1.0, 0.004), StellarType::StellarBlackHole);

        let remnants = |density: f64| {
            (0..10_000)
                .map(|i| classify(i as f64 / 10_000.0, Population::Bulge, 1.0, density))
                .filter(|t| t.family() == StellarFamily::Remnant)
                .count()
        };
        assert!(remnants(50.0) > 2 * remnants(0.01));
    }

    #[test]
    fn arms_favour_young_stars() {
        let young = |factor: f64| {
            (0..100_000)
                .map(|i| classify(i as f64 / 100_000.0, Population::ThinDisk, factor, 0.004))
                .filter(|t| is_young(*t))
                .count()
        };
        assert!(young(2.0) > young(1.0));
    }

    #[test]
    fn export_carries_flat_fields() {
        let synth = synthesizer(CatalogOverlay::empty());
        let star = synth.star_by_seed(Seed::star(solar_chunk(), 7).unwrap()).unwrap();
        let row = star.export();
        assert_eq!(row.seed, star.seed.as_i64());
        assert!(!row.is_real);
        assert_relative_eq!(row.r, star.position.radius(), max_relative = 1e-12);
        assert!((0.0..360.0).contains(&row.theta));
    }
}
