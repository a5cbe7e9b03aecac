//! Free-floating planetary-mass objects.
//!
//! Rogue objects share the chunk grid with stars but live in the rogue-flagged
//! index namespace. Counts are small, so positions are plain uniform draws
//! inside the chunk rather than stratified.

use crate::population::PopulationEstimator;
use crate::region::{Population, Region};
use galaxy_core::{
    ChunkCoord, GalaxyError, Position, Result, Seed, SeedKind, SeedKindTag, SeedStream,
    StreamDomain,
};

/// Earth masses per Jupiter mass.
pub const EARTH_MASSES_PER_JUPITER: f64 = 317.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RogueArchetype {
    Terrestrial,
    SuperEarth,
    IceGiant,
    GasGiant,
    SuperJupiter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RogueOrigin {
    /// Ejected from its birth system.
    Ejected,
    /// Collapsed in isolation.
    Formed,
}

impl RogueOrigin {
    pub fn label(self) -> &'static str {
        match self {
            RogueOrigin::Ejected => "ejected",
            RogueOrigin::Formed => "formed",
        }
    }
}

struct ArchetypeTraits {
    weight: f64,
    /// Mass range in Jupiter masses; drawn log-uniformly.
    mass_jupiter: (f64, f64),
    /// `radius_earth = coefficient * mass_earth ^ exponent`.
    radius_coefficient: f64,
    radius_exponent: f64,
    /// Internal heat sets the equilibrium temperature range (K).
    temperature: (f64, f64),
    moon_probability: f64,
    max_moons: u32,
    ejected_probability: f64,
}

impl RogueArchetype {
    pub const ALL: [RogueArchetype; 5] = [
        RogueArchetype::Terrestrial,
        RogueArchetype::SuperEarth,
        RogueArchetype::IceGiant,
        RogueArchetype::GasGiant,
        RogueArchetype::SuperJupiter,
    ];

    fn traits(self) -> ArchetypeTraits {
        match self {
            RogueArchetype::Terrestrial => ArchetypeTraits {
                weight: 0.35,
                mass_jupiter: (0.0003, 0.006),
                radius_coefficient: 1.0,
                radius_exponent: 0.279,
                temperature: (20.0, 40.0),
                moon_probability: 0.05,
                max_moons: 1,
                ejected_probability: 0.9,
            },
            RogueArchetype::SuperEarth => ArchetypeTraits {
                weight: 0.25,
                mass_jupiter: (0.006, 0.03),
                radius_coefficient: 1.0,
                radius_exponent: 0.279,
                temperature: (25.0, 50.0),
                moon_probability: 0.15,
                max_moons: 2,
                ejected_probability: 0.85,
            },
            RogueArchetype::IceGiant => ArchetypeTraits {
                weight: 0.18,
                mass_jupiter: (0.03, 0.15),
                radius_coefficient: 0.7,
                radius_exponent: 0.589,
                temperature: (40.0, 70.0),
                moon_probability: 0.5,
                max_moons: 5,
                ejected_probability: 0.75,
            },
            RogueArchetype::GasGiant => ArchetypeTraits {
                weight: 0.15,
                mass_jupiter: (0.15, 3.0),
                radius_coefficient: 14.4,
                radius_exponent: -0.044,
                temperature: (60.0, 150.0),
                moon_probability: 0.8,
                max_moons: 12,
                ejected_probability: 0.6,
            },
            RogueArchetype::SuperJupiter => ArchetypeTraits {
                weight: 0.07,
                mass_jupiter: (3.0, 13.0),
                radius_coefficient: 14.4,
                radius_exponent: -0.044,
                temperature: (150.0, 600.0),
                moon_probability: 0.85,
                max_moons: 15,
                ejected_probability: 0.3,
            },
        }
    }

    /// Pick an archetype from one uniform draw.
    fn pick(u: f64) -> Self {
        let total: f64 = Self::ALL.iter().map(|a| a.traits().weight).sum();
        let mut cursor = u.clamp(0.0, 1.0) * total;
        for archetype in Self::ALL {
            let weight = archetype.traits().weight;
            if cursor < weight {
                return archetype;
            }
            cursor -= weight;
        }
        RogueArchetype::SuperJupiter
    }

    /// Radius in Earth radii for a mass in Jupiter masses.
    pub fn radius_for_mass(self, mass_jupiter: f64) -> f64 {
        let t = self.traits();
        t.radius_coefficient * (mass_jupiter * EARTH_MASSES_PER_JUPITER).powf(t.radius_exponent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoguePlanet {
    pub seed: Seed,
    pub position: Position,
    /// Jupiter masses.
    pub mass: f64,
    /// Earth radii.
    pub radius: f64,
    /// Kelvin.
    pub temperature: f64,
    pub archetype: RogueArchetype,
    pub origin: RogueOrigin,
    pub moon_count: u32,
    pub population: Population,
    pub region: Region,
}

/// Rebuilds rogue objects from their seeds.
#[derive(Debug, Clone)]
pub struct RogueSynthesizer {
    estimator: PopulationEstimator,
}

impl RogueSynthesizer {
    pub fn new(estimator: PopulationEstimator) -> Self {
        Self { estimator }
    }

    pub fn rogue_count(&self, chunk: ChunkCoord) -> u64 {
        self.estimator.rogue_count(chunk)
    }

    /// Rogue object for a rogue-flagged seed.
    pub fn rogue_by_seed(&self, seed: Seed) -> Result<RoguePlanet> {
        match seed.kind() {
            SeedKind::Rogue { chunk, index } => {
                if index >= self.rogue_count(chunk) {
                    return Err(GalaxyError::NotFound {
                        seed,
                        suppressed: false,
                    });
                }
                Ok(self.generate(seed, chunk))
            }
            SeedKind::Unassigned => Err(GalaxyError::NotFound {
                seed,
                suppressed: false,
            }),
            other => Err(GalaxyError::WrongAccessor {
                seed,
                expected: SeedKindTag::Rogue,
                found: other.tag(),
            }),
        }
    }

    /// Every rogue object in `chunk`.
    pub fn rogues_in_chunk(&self, chunk: ChunkCoord) -> Vec<RoguePlanet> {
        (0..self.rogue_count(chunk))
            .filter_map(|index| Seed::rogue(chunk, index).ok())
            .map(|seed| self.generate(seed, chunk))
            .collect()
    }

    fn generate(&self, seed: Seed, chunk: ChunkCoord) -> RoguePlanet {
        let mut stream = SeedStream::for_seed(seed, StreamDomain::Rogue);
        let position = chunk
            .bounds()
            .lerp(stream.uniform(), stream.uniform(), stream.uniform());

        let archetype = RogueArchetype::pick(stream.uniform());
        let traits = archetype.traits();
        let (lo, hi) = traits.mass_jupiter;
        let mass = lo * (hi / lo).powf(stream.uniform());
        let temperature = stream.range(traits.temperature.0, traits.temperature.1);
        let origin = if stream.chance(traits.ejected_probability) {
            RogueOrigin::Ejected
        } else {
            RogueOrigin::Formed
        };
        let has_moons = stream.chance(traits.moon_probability);
        let moon_roll = stream.uniform();
        let moon_count = if has_moons {
            1 + (moon_roll * traits.max_moons as f64) as u32
        } else {
            0
        };

        let field = self.estimator.field();
        RoguePlanet {
            seed,
            position,
            mass,
            radius: archetype.radius_for_mass(mass),
            temperature,
            archetype,
            origin,
            moon_count,
            population: field.determine_population(position),
            region: field.determine_region(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn synth() -> RogueSynthesizer {
        RogueSynthesizer::new(PopulationEstimator::default())
    }

    #[test]
    fn solar_chunk_rogues_are_stable() {
        let synth = synth();
        let chunk: ChunkCoord = "260_0_0".parse().unwrap();
        let rogues = synth.rogues_in_chunk(chunk);
        assert_eq!(rogues.len() as u64, synth.rogue_count(chunk));
        assert!(!rogues.is_empty());
        for rogue in &rogues {
            assert!(chunk.contains(rogue.position));
            assert_eq!(synth.rogue_by_seed(rogue.seed).unwrap(), *rogue);
            let (lo, hi) = rogue.archetype.traits().mass_jupiter;
            assert!(rogue.mass >= lo && rogue.mass <= hi);
            assert!(rogue.moon_count <= rogue.archetype.traits().max_moons);
        }
    }

    #[test]
    fn out_of_range_rogues_are_not_found() {
        let synth = synth();
        let chunk: ChunkCoord = "260_0_0".parse().unwrap();
        let past = Seed::rogue(chunk, synth.rogue_count(chunk)).unwrap();
        assert!(matches!(synth.rogue_by_seed(past), Err(GalaxyError::NotFound { .. })));
    }

    #[test]
    fn star_seeds_are_rejected() {
        let chunk: ChunkCoord = "260_0_0".parse().unwrap();
        let star = Seed::star(chunk, 0).unwrap();
        assert!(matches!(
            synth().rogue_by_seed(star),
            Err(GalaxyError::WrongAccessor { expected: SeedKindTag::Rogue, found: SeedKindTag::Star, .. })
        ));
        assert!(matches!(synth().rogue_by_seed(Seed::CORE), Err(GalaxyError::WrongAccessor { .. })));
    }

    #[test]
    fn radius_follows_mass_power_laws() {
        // One Jupiter mass should come out near eleven Earth radii.
        assert_relative_eq!(RogueArchetype::GasGiant.radius_for_mass(1.0), 11.2, max_relative = 0.05);
        // One Earth mass is one Earth radius.
        let earth = 1.0 / EARTH_MASSES_PER_JUPITER;
        assert_relative_eq!(RogueArchetype::Terrestrial.radius_for_mass(earth), 1.0, max_relative = 1e-9);
    }

    #[test]
    fn archetype_pick_covers_the_table() {
        assert_eq!(RogueArchetype::pick(0.0), RogueArchetype::Terrestrial);
        assert_eq!(RogueArchetype::pick(0.999_999), RogueArchetype::SuperJupiter);
        assert_eq!(RogueArchetype::pick(0.5), RogueArchetype::SuperEarth);
    }
}
