//! Narrow seam to the planetary system generator.
//!
//! The star synthesizer only needs aggregate metadata about a star's system.
//! Anything richer (planet and moon trees, companion orbits) lives behind
//! [`SystemSummarizer`] and is joined back by seed.

use crate::stellar::{StellarFamily, StellarType};
use galaxy_core::{Seed, SeedStream, StreamDomain};
use rand::prelude::*;

/// Aggregate system metadata copied into a [`Star`](crate::Star).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSummary {
    pub planet_count: u32,
    pub is_multiple: bool,
    pub name: String,
}

/// Turns a star's identity and physical properties into system metadata.
/// Must be a pure function of its inputs.
pub trait SystemSummarizer: Send + Sync {
    fn summarize(
        &self,
        seed: Seed,
        stellar_type: StellarType,
        mass: f64,
        temperature: f64,
        luminosity: f64,
    ) -> SystemSummary;
}

/// Built-in summarizer: planet counts by type, a multiplicity roll and a
/// syllable-table name, all drawn from the seed's system stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralSystems;

/// Inclusive range of planet counts a star of this type tends to have.
pub fn planet_range(stellar_type: StellarType) -> (u32, u32) {
    use StellarType::*;
    match stellar_type {
        O | BlueSupergiant => (0, 2),
        B | BlueGiant => (0, 3),
        A => (1, 5),
        F | G => (2, 8),
        K => (2, 7),
        M => (1, 5),
        RedGiant => (1, 4),
        RedSupergiant => (0, 2),
        L | T | Y => (0, 3),
        WhiteDwarf => (0, 2),
        NeutronStar => (0, 1),
        StellarBlackHole | SupermassiveBlackHole => (0, 0),
    }
}

/// Chance the system has more than one star.
fn multiplicity(stellar_type: StellarType) -> f64 {
    use StellarType::*;
    match stellar_type {
        O | B | BlueGiant | BlueSupergiant => 0.7,
        A | F => 0.5,
        G => 0.45,
        K => 0.35,
        M => 0.25,
        RedGiant | RedSupergiant => 0.3,
        L | T | Y => 0.15,
        WhiteDwarf => 0.3,
        NeutronStar => 0.1,
        StellarBlackHole => 0.05,
        SupermassiveBlackHole => 0.0,
    }
}

impl SystemSummarizer for ProceduralSystems {
    fn summarize(
        &self,
        seed: Seed,
        stellar_type: StellarType,
        _mass: f64,
        _temperature: f64,
        _luminosity: f64,
    ) -> SystemSummary {
        let mut rng = SeedStream::for_seed(seed, StreamDomain::System);
        let (lo, hi) = planet_range(stellar_type);
        let planet_count = rng.gen_range(lo..=hi);
        let is_multiple = rng.gen_bool(multiplicity(stellar_type));
        let name = if stellar_type.family() == StellarFamily::Remnant {
            catalog_designation(&mut rng, stellar_type)
        } else {
            system_name(&mut rng)
        };
        SystemSummary {
            planet_count,
            is_multiple,
            name,
        }
    }
}

/// Survey-style designation for compact objects, e.g. `"WD 0412+118"`.
fn catalog_designation(rng: &mut impl Rng, stellar_type: StellarType) -> String {
    let ra = rng.gen_range(0..2400);
    let dec = rng.gen_range(-899..=899);
    format!("{} {:04}{:+04}", stellar_type.code(), ra, dec)
}

fn system_name(rng: &mut impl Rng) -> String {
    if rng.gen_bool(0.3) {
        let surveys = ["HD", "HIP", "GJ", "LHS", "Ross", "Wolf", "Luyten", "Kepler", "TOI"];
        let survey = surveys[rng.gen_range(0..surveys.len())];
        return format!("{} {}", survey, rng.gen_range(1..99_999));
    }

    let prefixes = [
        "Alp", "Bet", "Gam", "Del", "Eps", "Zet", "The", "Kap", "Lam", "Sig", "Tau", "Ups", "Phi",
        "Chi", "Psi", "Ome", "Rig", "Veg", "Pro", "Arc", "Sir", "Pol", "Den", "Alt", "Cap", "Ald",
        "Ant", "Spi", "For", "Cen", "Lac", "Pav", "Ind", "Ara", "Nor", "Cru",
    ];
    let middles = [
        "ar", "el", "an", "or", "en", "al", "ir", "ul", "ax", "on", "is", "us", "em", "os", "in",
        "at",
    ];
    let suffixes = ["a", "us", "is", "i", "ae", "ix", "on", "um"];

    let mut name = String::new();
    name.push_str(prefixes[rng.gen_range(0..prefixes.len())]);
    name.push_str(middles[rng.gen_range(0..middles.len())]);
    if rng.gen_bool(0.5) {
        name.push_str(suffixes[rng.gen_range(0..suffixes.len())]);
    }
    if rng.gen_bool(0.25) {
        name.push_str(&format!("-{}", rng.gen_range(1..999)));
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::ChunkCoord;

    fn seed(index: u64) -> Seed {
        Seed::star(ChunkCoord::new(260, 0, 0).unwrap(), index).unwrap()
    }

    #[test]
    fn same_seed_same_summary() {
        let systems = ProceduralSystems;
        let a = systems.summarize(seed(5), StellarType::G, 0.95, 5_600.0, 0.9);
        let b = systems.summarize(seed(5), StellarType::G, 0.95, 5_600.0, 0.9);
        assert_eq!(a, b);
        assert!(!a.name.is_empty());
    }

    #[test]
    fn planet_counts_respect_type_ranges() {
        let systems = ProceduralSystems;
        for i in 0..200 {
            for ty in [StellarType::M, StellarType::G, StellarType::NeutronStar] {
                let (lo, hi) = planet_range(ty);
                let s = systems.summarize(seed(i), ty, 1.0, 1.0, 1.0);
                assert!((lo..=hi).contains(&s.planet_count));
            }
        }
    }

    #[test]
    fn black_holes_have_no_planets() {
        let s = ProceduralSystems.summarize(seed(1), StellarType::StellarBlackHole, 10.0, 0.0, 0.0);
        assert_eq!(s.planet_count, 0);
        assert!(s.name.starts_with("BH "));
    }
}
