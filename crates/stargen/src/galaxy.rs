//! The galaxy facade: one entry point that routes any seed to the right
//! generator and lists chunk contents.

use crate::cache::StarCache;
use crate::density::DensityField;
use crate::overlay::CatalogOverlay;
use crate::population::PopulationEstimator;
use crate::rogue::{RoguePlanet, RogueSynthesizer};
use crate::settings::GalaxySettings;
use crate::star::{Star, StarSynthesizer};
use crate::system::{ProceduralSystems, SystemSummarizer};
use galaxy_core::{ChunkCoord, GalaxyError, Result, Seed, SeedKind, SeedKindTag};
use rayon::prelude::*;
use std::sync::Arc;

/// Anything a seed can resolve to.
#[derive(Debug, Clone, PartialEq)]
pub enum GalaxyObject {
    Star(Star),
    Rogue(RoguePlanet),
}

impl GalaxyObject {
    pub fn seed(&self) -> Seed {
        match self {
            GalaxyObject::Star(star) => star.seed,
            GalaxyObject::Rogue(rogue) => rogue.seed,
        }
    }
}

pub struct Galaxy {
    settings: GalaxySettings,
    estimator: PopulationEstimator,
    stars: StarSynthesizer,
    rogues: RogueSynthesizer,
    overlay: Arc<CatalogOverlay>,
    cache: Option<StarCache>,
}

impl Galaxy {
    pub fn new(
        settings: GalaxySettings,
        overlay: Arc<CatalogOverlay>,
        systems: Arc<dyn SystemSummarizer>,
    ) -> Self {
        let estimator = PopulationEstimator::from_settings(&settings);
        log::debug!(
            "density scale {:.6e} stars/ly³ per unit, {} catalog systems",
            estimator.field().scale(),
            overlay.len()
        );
        Self {
            stars: StarSynthesizer::new(estimator.clone(), Arc::clone(&overlay), systems),
            rogues: RogueSynthesizer::new(estimator.clone()),
            cache: settings.cache_stars.then(StarCache::new),
            estimator,
            overlay,
            settings,
        }
    }

    /// Purely procedural galaxy with the built-in system summarizer.
    pub fn procedural(settings: GalaxySettings) -> Self {
        Self::new(settings, Arc::new(CatalogOverlay::empty()), Arc::new(ProceduralSystems))
    }

    pub fn settings(&self) -> &GalaxySettings {
        &self.settings
    }

    pub fn density(&self) -> &DensityField {
        self.estimator.field()
    }

    pub fn estimator(&self) -> &PopulationEstimator {
        &self.estimator
    }

    pub fn overlay(&self) -> &CatalogOverlay {
        &self.overlay
    }

    pub fn cached_stars(&self) -> usize {
        self.cache.as_ref().map_or(0, StarCache::len)
    }

    pub fn expected_count(&self, chunk: ChunkCoord) -> u64 {
        self.estimator.expected_count(chunk)
    }

    pub fn rogue_count(&self, chunk: ChunkCoord) -> u64 {
        self.rogues.rogue_count(chunk)
    }

    /// Resolve any seed.
    pub fn object_by_seed(&self, seed: Seed) -> Result<GalaxyObject> {
        match seed.kind() {
            SeedKind::Rogue { .. } => self.rogues.rogue_by_seed(seed).map(GalaxyObject::Rogue),
            SeedKind::Core
            | SeedKind::Star { .. }
            | SeedKind::RealStar { .. }
            | SeedKind::Unassigned => self.star_by_seed(seed).map(GalaxyObject::Star),
        }
    }

    /// Star behind a core, procedural or catalog seed.
    pub fn star_by_seed(&self, seed: Seed) -> Result<Star> {
        if let Some(star) = self.cache.as_ref().and_then(|c| c.get(seed)) {
            return Ok(star);
        }
        let star = match seed.kind() {
            SeedKind::RealStar { .. } => self.overlay.star_by_seed(seed, self.density())?,
            SeedKind::Rogue { .. } => {
                return Err(GalaxyError::WrongAccessor {
                    seed,
                    expected: SeedKindTag::Star,
                    found: SeedKindTag::Rogue,
                })
            }
            SeedKind::Core | SeedKind::Star { .. } | SeedKind::Unassigned => {
                self.stars.star_by_seed(seed)?
            }
        };
        if let Some(cache) = &self.cache {
            cache.insert(star.clone());
        }
        Ok(star)
    }

    pub fn rogue_by_seed(&self, seed: Seed) -> Result<RoguePlanet> {
        self.rogues.rogue_by_seed(seed)
    }

    pub fn seed_for_name(&self, name: &str) -> Result<Seed> {
        self.overlay.seed_for_name(name)
    }

    pub fn star_by_name(&self, name: &str) -> Result<Star> {
        self.star_by_seed(self.seed_for_name(name)?)
    }

    /// Procedural stars of `chunk` (suppressed slots skipped) followed by the
    /// catalog stars stored there.
    pub fn stars_in_chunk(&self, chunk: ChunkCoord) -> Vec<Star> {
        let count = self.expected_count(chunk);
        log::debug!("listing chunk {chunk}: {count} procedural slots");
        let mut stars: Vec<Star> = (Seed::first_star_index(chunk)..count)
            .into_par_iter()
            .filter_map(|index| match self.stars.star_in_chunk(chunk, index, count) {
                Ok(star) => Some(star),
                Err(GalaxyError::NotFound { suppressed: true, .. }) => None,
                Err(e) => {
                    log::warn!("chunk {chunk} index {index}: {e}");
                    None
                }
            })
            .collect();
        stars.extend(self.overlay.stars_in_chunk(chunk, self.density()));
        stars
    }

    pub fn rogues_in_chunk(&self, chunk: ChunkCoord) -> Vec<RoguePlanet> {
        self.rogues.rogues_in_chunk(chunk)
    }
}

impl Default for Galaxy {
    fn default() -> Self {
        Self::procedural(GalaxySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::row;
    use crate::catalog::{CatalogTables, CompanionRow};
    use galaxy_core::solar_position;

    fn catalog_galaxy() -> Galaxy {
        let stars = vec![
            row("Sol", 0.0, "G2V"),
            row("Procyon A", 11.4, "F5IV-V"),
            row("Procyon B", 11.4, "DQZ"),
            row("Alpha Centauri A", 4.37, "G2V"),
            row("Proxima Centauri", 4.24, "M5.5Ve"),
        ];
        let mapping = vec![CompanionRow {
            companion_name: "Proxima Centauri".to_string(),
            primary_star_name: "Alpha Centauri A".to_string(),
        }];
        let overlay = CatalogOverlay::from_tables(CatalogTables::assemble(stars, mapping, vec![], vec![]));
        Galaxy::new(GalaxySettings::default(), Arc::new(overlay), Arc::new(ProceduralSystems))
    }

    fn solar_chunk() -> ChunkCoord {
        ChunkCoord::for_position(solar_position()).unwrap()
    }

    #[test]
    fn object_by_seed_routes_every_kind() {
        let galaxy = catalog_galaxy();
        let chunk = solar_chunk();

        let core = galaxy.object_by_seed(Seed::CORE).unwrap();
        assert!(matches!(core, GalaxyObject::Star(ref s) if s.system_name == "Sagittarius A*"));

        let star = galaxy.object_by_seed(Seed::star(chunk, 3).unwrap());
        assert!(matches!(star, Ok(GalaxyObject::Star(_)) | Err(GalaxyError::NotFound { suppressed: true, .. })));

        let rogue = galaxy.object_by_seed(Seed::rogue(chunk, 0).unwrap()).unwrap();
        assert!(matches!(rogue, GalaxyObject::Rogue(_)));

        let sol = galaxy.object_by_seed(galaxy.seed_for_name("Sol").unwrap()).unwrap();
        assert!(matches!(sol, GalaxyObject::Star(ref s) if s.is_real()));
    }

    #[test]
    fn star_accessor_rejects_rogue_seeds() {
        let galaxy = Galaxy::default();
        let rogue = Seed::rogue(solar_chunk(), 0).unwrap();
        assert!(matches!(
            galaxy.star_by_seed(rogue),
            Err(GalaxyError::WrongAccessor { expected: SeedKindTag::Star, .. })
        ));
    }

    #[test]
    fn cached_lookups_match_fresh_ones() {
        let cached = Galaxy::default();
        let fresh = Galaxy::procedural(GalaxySettings {
            cache_stars: false,
            ..GalaxySettings::default()
        });
        let seed = Seed::star(solar_chunk(), 42).unwrap();
        let first = cached.star_by_seed(seed).unwrap();
        assert_eq!(cached.cached_stars(), 1);
        assert_eq!(cached.star_by_seed(seed).unwrap(), first);
        assert_eq!(fresh.star_by_seed(seed).unwrap(), first);
        assert_eq!(fresh.cached_stars(), 0);
    }

    #[test]
    fn solar_listing_merges_catalog_without_companions() {
        let galaxy = catalog_galaxy();
        let chunk = solar_chunk();
        let listed = galaxy.stars_in_chunk(chunk);
        let real: Vec<&str> = listed
            .iter()
            .filter(|s| s.is_real())
            .map(|s| s.system_name.as_str())
            .collect();
        assert_eq!(real, ["Sol", "Procyon A", "Alpha Centauri A"]);
        let procedural = listed.len() - real.len();
        assert!(procedural > 0 && (procedural as u64) < galaxy.expected_count(chunk));
        assert!(listed.iter().all(|s| chunk.contains(s.position)));
    }

    #[test]
    fn names_resolve_to_listed_stars() {
        let galaxy = catalog_galaxy();
        let b = galaxy.star_by_name("Procyon B").unwrap();
        let a = galaxy.star_by_name("Procyon A").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.system_name, "Procyon A");
    }

    #[test]
    fn bottom_core_chunk_never_lists_seed_zero() {
        let galaxy = Galaxy::default();
        let chunk: ChunkCoord = "0_0_-128".parse().unwrap();
        let count = galaxy.expected_count(chunk);
        assert!(count >= 1);

        let listed = galaxy.stars_in_chunk(chunk);
        assert_eq!(listed.len() as u64, count - 1);
        for star in &listed {
            assert_ne!(star.seed, Seed::CORE);
            assert_eq!(&galaxy.star_by_seed(star.seed).unwrap(), star);
        }
        assert_eq!(galaxy.star_by_seed(Seed::CORE).unwrap().system_name, "Sagittarius A*");
    }

    #[test]
    fn unassigned_seeds_are_not_found() {
        let galaxy = Galaxy::default();
        let star = Seed::star(solar_chunk(), 3).unwrap();
        let aliased = Seed::from_raw(star.raw() | (0x1ff << 44));
        assert_eq!(aliased.kind(), SeedKind::Unassigned);
        assert!(matches!(galaxy.star_by_seed(aliased), Err(GalaxyError::NotFound { .. })));
        assert!(matches!(galaxy.rogue_by_seed(aliased), Err(GalaxyError::NotFound { .. })));
        assert!(matches!(galaxy.object_by_seed(aliased), Err(GalaxyError::NotFound { .. })));
    }

    #[test]
    fn empty_halo_chunk_lists_nothing() {
        let galaxy = Galaxy::default();
        let chunk: ChunkCoord = "2000_0_0".parse().unwrap();
        assert_eq!(galaxy.expected_count(chunk), 0);
        assert!(galaxy.stars_in_chunk(chunk).is_empty());
        assert!(galaxy.rogues_in_chunk(chunk).is_empty());
    }
}
