//! Real catalog stars layered over the procedural galaxy.
//!
//! Every catalog primary gets a permanent real-flagged seed in the chunk that
//! contains it. Procedural slots near Sol are suppressed with a tiered
//! probability, and chunk listings append the catalog stars, so the bubble
//! carved out of the procedural field is refilled by real data.

use crate::catalog::{CatalogRecord, CatalogTables};
use crate::density::DensityField;
use crate::star::Star;
use crate::stellar::blackbody_to_rgb;
use galaxy_core::{
    solar_position, ChunkCoord, GalaxyError, Position, Result, Seed, SeedKind, SeedKindTag,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Suppression tiers: (outer distance from the anchor in ly, probability).
pub const SUPPRESSION_TIERS: [(f64, f64); 4] = [(50.0, 1.0), (60.0, 0.75), (70.0, 0.5), (80.0, 0.25)];

/// Beyond this distance no procedural slot is suppressed.
pub const SUPPRESSION_OUTER_RADIUS: f64 = 80.0;

/// Probability that a procedural star `distance` ly from the anchor is dropped.
pub fn suppression_probability(distance: f64) -> f64 {
    if distance.is_nan() {
        return 0.0;
    }
    SUPPRESSION_TIERS
        .iter()
        .find(|(outer, _)| distance < *outer)
        .map_or(0.0, |(_, p)| *p)
}

#[derive(Debug, Clone)]
pub struct CatalogOverlay {
    records: Vec<Arc<CatalogRecord>>,
    seeds: Vec<Seed>,
    by_name: HashMap<String, usize>,
    by_chunk: HashMap<ChunkCoord, Vec<usize>>,
    /// Companion name → primary name.
    companions: HashMap<String, String>,
    anchor: Position,
}

impl Default for CatalogOverlay {
    fn default() -> Self {
        Self::empty()
    }
}

impl CatalogOverlay {
    /// No real stars: nothing is suppressed and nothing is appended.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            seeds: Vec::new(),
            by_name: HashMap::new(),
            by_chunk: HashMap::new(),
            companions: HashMap::new(),
            anchor: solar_position(),
        }
    }

    pub fn from_tables(tables: CatalogTables) -> Self {
        let mut overlay = Self::empty();
        for record in tables.records {
            let chunk = match ChunkCoord::for_position(record.position) {
                Ok(chunk) => chunk,
                Err(e) => {
                    log::warn!("catalog star {:?} is off the chunk grid: {}", record.name, e);
                    continue;
                }
            };
            let index = overlay.records.len();
            let seed = match Seed::real(chunk, index as u64) {
                Ok(seed) => seed,
                Err(e) => {
                    log::warn!("catalog star {:?} has no seed: {}", record.name, e);
                    continue;
                }
            };
            overlay.by_name.insert(record.name.clone(), index);
            overlay.by_chunk.entry(chunk).or_default().push(index);
            overlay.seeds.push(seed);
            overlay.records.push(Arc::new(record));
        }
        overlay.companions = tables.companions;
        overlay
    }

    /// Load a catalog directory, degrading to an empty overlay on failure.
    pub fn load_or_empty(dir: &Path) -> Self {
        match CatalogTables::load_dir(dir) {
            Ok(tables) => {
                let overlay = Self::from_tables(tables);
                log::info!(
                    "loaded {} catalog systems ({} companions) from {}",
                    overlay.len(),
                    overlay.companions.len(),
                    dir.display()
                );
                overlay
            }
            Err(e) => {
                log::warn!("{e}; continuing with no real stars");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = (Seed, &CatalogRecord)> {
        self.seeds.iter().copied().zip(self.records.iter().map(|r| r.as_ref()))
    }

    /// Protected position the suppression tiers are measured from.
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// Primary name for a companion, if `name` is one.
    pub fn primary_of(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        if let Some(primary) = self.companions.get(name) {
            return Some(primary);
        }
        self.companions
            .iter()
            .find(|(companion, _)| companion.eq_ignore_ascii_case(name))
            .map(|(_, primary)| primary.as_str())
    }

    /// Resolve a star name to its seed.
    ///
    /// Companions redirect to their primary. Matching tries exact, then
    /// case-insensitive exact, then case-insensitive prefix, then substring,
    /// each in catalog order.
    pub fn seed_for_name(&self, name: &str) -> Result<Seed> {
        let query = self.primary_of(name).unwrap_or(name.trim());
        if let Some(&i) = self.by_name.get(query) {
            return Ok(self.seeds[i]);
        }
        let lowered = query.to_lowercase();
        if !lowered.is_empty() {
            let strategies: [&dyn Fn(&str) -> bool; 3] = [
                &|n: &str| n == lowered,
                &|n: &str| n.starts_with(lowered.as_str()),
                &|n: &str| n.contains(lowered.as_str()),
            ];
            for strategy in strategies {
                if let Some(i) = self.records.iter().position(|r| strategy(&r.name.to_lowercase())) {
                    return Ok(self.seeds[i]);
                }
            }
        }
        Err(GalaxyError::CatalogLookupFailure(name.to_string()))
    }

    pub fn suppression_probability_at(&self, position: Position) -> f64 {
        suppression_probability(position.distance(self.anchor))
    }

    /// Whether the procedural slot at `position` gives way to real data, given
    /// the slot's own uniform draw `roll`. Never true without a catalog.
    pub fn is_suppressed(&self, position: Position, roll: f64) -> bool {
        !self.is_empty() && roll < self.suppression_probability_at(position)
    }

    fn star_at(&self, index: usize, field: &DensityField) -> Star {
        let record = &self.records[index];
        Star {
            seed: self.seeds[index],
            position: record.position,
            stellar_type: record.stellar_type,
            mass: record.mass,
            temperature: record.temperature,
            luminosity: record.luminosity,
            color: blackbody_to_rgb(record.temperature),
            population: field.determine_population(record.position),
            region: field.determine_region(record.position),
            planet_count: record.planets.len() as u32,
            is_multiple: !record.companions.is_empty(),
            system_name: record.name.clone(),
            catalog: Some(Arc::clone(record)),
        }
    }

    /// The catalog star behind a real-flagged seed.
    pub fn star_by_seed(&self, seed: Seed, field: &DensityField) -> Result<Star> {
        match seed.kind() {
            SeedKind::RealStar {
                chunk,
                catalog_index,
            } => {
                let index = catalog_index as usize;
                let known = self.seeds.get(index).is_some_and(|s| s.chunk() == chunk);
                if known {
                    Ok(self.star_at(index, field))
                } else {
                    Err(GalaxyError::NotFound {
                        seed,
                        suppressed: false,
                    })
                }
            }
            SeedKind::Unassigned => Err(GalaxyError::NotFound {
                seed,
                suppressed: false,
            }),
            other => Err(GalaxyError::WrongAccessor {
                seed,
                expected: SeedKindTag::RealStar,
                found: other.tag(),
            }),
        }
    }

    /// Every catalog primary stored in `chunk`.
    pub fn stars_in_chunk(&self, chunk: ChunkCoord, field: &DensityField) -> Vec<Star> {
        self.by_chunk
            .get(&chunk)
            .map(|indices| indices.iter().map(|&i| self.star_at(i, field)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::row;
    use crate::catalog::CompanionRow;

    fn overlay() -> CatalogOverlay {
        let stars = vec![
            row("Sol", 0.0, "G2V"),
            row("Procyon A", 11.4, "F5IV-V"),
            row("Procyon B", 11.4, "DQZ"),
            row("Alpha Centauri A", 4.37, "G2V"),
            row("Proxima Centauri", 4.24, "M5.5Ve"),
            row("Barnard's Star", 5.96, "M4Ve"),
            row("Far Away", 5_000.0, "K0V"),
        ];
        let mapping = vec![CompanionRow {
            companion_name: "Proxima Centauri".to_string(),
            primary_star_name: "Alpha Centauri A".to_string(),
        }];
        CatalogOverlay::from_tables(CatalogTables::assemble(stars, mapping, vec![], vec![]))
    }

    #[test]
    fn companions_resolve_to_their_primary() {
        let o = overlay();
        assert_eq!(o.seed_for_name("Procyon B").unwrap(), o.seed_for_name("Procyon A").unwrap());
        assert_eq!(
            o.seed_for_name("proxima centauri").unwrap(),
            o.seed_for_name("Alpha Centauri A").unwrap()
        );
    }

    #[test]
    fn name_resolution_falls_through_strategies() {
        let o = overlay();
        let barnard = o.seed_for_name("Barnard's Star").unwrap();
        assert_eq!(o.seed_for_name("BARNARD'S STAR").unwrap(), barnard);
        assert_eq!(o.seed_for_name("barn").unwrap(), barnard);
        assert_eq!(o.seed_for_name("'s st").unwrap(), barnard);
        assert!(matches!(
            o.seed_for_name("Vega"),
            Err(GalaxyError::CatalogLookupFailure(_))
        ));
        assert!(o.seed_for_name("").is_err());
    }

    #[test]
    fn seeds_are_real_flagged_and_in_the_right_chunk() {
        let o = overlay();
        for (seed, record) in o.records() {
            assert!(matches!(seed.kind(), SeedKind::RealStar { .. }));
            assert_eq!(seed.chunk(), ChunkCoord::for_position(record.position).unwrap());
        }
    }

    #[test]
    fn chunk_listing_never_holds_a_companion() {
        let o = overlay();
        let field = DensityField::default();
        let sol_chunk = ChunkCoord::for_position(solar_position()).unwrap();
        let listed = o.stars_in_chunk(sol_chunk, &field);
        let names: Vec<&str> = listed.iter().map(|s| s.system_name.as_str()).collect();
        assert!(names.contains(&"Sol"));
        assert!(names.contains(&"Procyon A"));
        assert!(!names.contains(&"Procyon B"));
        assert!(!names.contains(&"Proxima Centauri"));
        let procyon = listed.iter().find(|s| s.system_name == "Procyon A").unwrap();
        assert!(procyon.is_multiple);
        assert!(procyon.catalog.is_some());
    }

    #[test]
    fn real_seed_roundtrips_to_its_star() {
        let o = overlay();
        let field = DensityField::default();
        let seed = o.seed_for_name("Sol").unwrap();
        let sol = o.star_by_seed(seed, &field).unwrap();
        assert_eq!(sol.system_name, "Sol");
        assert_eq!(sol.seed, seed);

        let stray = Seed::real(seed.chunk(), 9_999).unwrap();
        assert!(matches!(
            o.star_by_seed(stray, &field),
            Err(GalaxyError::NotFound { suppressed: false, .. })
        ));
        assert!(matches!(
            o.star_by_seed(Seed::CORE, &field),
            Err(GalaxyError::WrongAccessor { .. })
        ));
    }

    #[test]
    fn suppression_is_tiered_and_monotone() {
        let mut last = f64::INFINITY;
        for step in 0..200 {
            let p = suppression_probability(step as f64 * 0.5);
            assert!(p <= last);
            last = p;
        }
        assert_eq!(suppression_probability(0.0), 1.0);
        assert_eq!(suppression_probability(55.0), 0.75);
        assert_eq!(suppression_probability(SUPPRESSION_OUTER_RADIUS), 0.0);
        assert_eq!(suppression_probability(1e9), 0.0);
    }

    fn assert_degraded(o: &CatalogOverlay) {
        assert!(o.is_empty());
        assert_eq!(o.len(), 0);
        assert!(!o.is_suppressed(solar_position(), 0.0));
        assert!(o.seed_for_name("Sol").is_err());
    }

    #[test]
    fn missing_catalog_directory_loads_no_real_stars() {
        let dir = std::env::temp_dir().join(format!("stargen-no-catalog-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        assert_degraded(&CatalogOverlay::load_or_empty(&dir));
    }

    #[test]
    fn malformed_stars_table_loads_no_real_stars() {
        let dir = std::env::temp_dir().join(format!("stargen-bad-catalog-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(crate::catalog::STARS_FILE), "this is not,a star table\ngarbage,row\n").unwrap();
        assert_degraded(&CatalogOverlay::load_or_empty(&dir));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_overlay_never_suppresses() {
        let empty = CatalogOverlay::empty();
        assert!(!empty.is_suppressed(solar_position(), 0.0));
        assert!(overlay().is_suppressed(solar_position(), 0.0));
    }
}
