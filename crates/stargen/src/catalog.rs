//! Real star catalog tables and their CSV loader.
//!
//! A catalog directory holds up to four tables:
//!
//! | file                    | required | columns |
//! |-------------------------|----------|---------|
//! | `stars.csv`             | yes      | `name,x,y,z,stellar_class,mass,temperature,luminosity[,absolute_magnitude]` |
//! | `companion_mapping.csv` | no       | `companion_name,primary_star_name` |
//! | `planets.csv`           | no       | `host,name,semi_major_axis_au,eccentricity,period_days,mass_earth,radius_earth` |
//! | `moons.csv`             | no       | `host_planet,name,semi_major_axis_km,period_days,mass_earth,radius_earth` |
//!
//! Star positions are light-years relative to Sol.

use crate::stellar::StellarType;
use galaxy_core::{solar_position, GalaxyError, Position, Result};
use glam::DVec3;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const STARS_FILE: &str = "stars.csv";
pub const COMPANIONS_FILE: &str = "companion_mapping.csv";
pub const PLANETS_FILE: &str = "planets.csv";
pub const MOONS_FILE: &str = "moons.csv";

/// Name of the reference star every catalog position is measured from.
pub const SOL: &str = "Sol";

/// One row of `stars.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StarRow {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub stellar_class: String,
    pub mass: f64,
    pub temperature: f64,
    pub luminosity: f64,
    #[serde(default)]
    pub absolute_magnitude: Option<f64>,
}

/// One row of `companion_mapping.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompanionRow {
    pub companion_name: String,
    pub primary_star_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoonRecord {
    pub host_planet: String,
    pub name: String,
    pub semi_major_axis_km: f64,
    pub period_days: f64,
    pub mass_earth: f64,
    pub radius_earth: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanetRecord {
    pub host: String,
    pub name: String,
    pub semi_major_axis_au: f64,
    pub eccentricity: f64,
    pub period_days: f64,
    pub mass_earth: f64,
    pub radius_earth: f64,
    #[serde(skip)]
    pub moons: Vec<MoonRecord>,
}

/// A star bound to a catalog primary.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionRecord {
    pub name: String,
    pub stellar_class: String,
    pub stellar_type: StellarType,
    pub mass: f64,
    pub temperature: f64,
    pub luminosity: f64,
    pub heliocentric: DVec3,
}

/// A primary catalog star with everything bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub name: String,
    /// Galactocentric position in light-years.
    pub position: Position,
    /// Position relative to Sol in light-years.
    pub heliocentric: DVec3,
    pub stellar_class: String,
    pub stellar_type: StellarType,
    pub mass: f64,
    pub temperature: f64,
    pub luminosity: f64,
    pub absolute_magnitude: Option<f64>,
    pub companions: Vec<CompanionRecord>,
    pub planets: Vec<PlanetRecord>,
}

/// Joined catalog: primaries with their companions, planets and moons, plus
/// the companion → primary name map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTables {
    pub records: Vec<CatalogRecord>,
    pub companions: HashMap<String, String>,
}

impl CatalogTables {
    /// Load the tables in `dir`. Fails when `stars.csv` is missing,
    /// unreadable or holds no valid row; other malformed rows are skipped
    /// with a warning.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let stars_path = dir.join(STARS_FILE);
        let stars: Vec<StarRow> = read_table(&stars_path, true)?;
        if stars.is_empty() {
            return Err(GalaxyError::DataLoadFailure {
                path: stars_path,
                reason: "no valid star rows".to_string(),
            });
        }
        let companions: Vec<CompanionRow> = read_table(&dir.join(COMPANIONS_FILE), false)?;
        let planets: Vec<PlanetRecord> = read_table(&dir.join(PLANETS_FILE), false)?;
        let moons: Vec<MoonRecord> = read_table(&dir.join(MOONS_FILE), false)?;
        Ok(Self::assemble(stars, companions, planets, moons))
    }

    /// Join raw rows into catalog records. Sol is added when the rows lack
    /// it; no rows give no records.
    pub fn assemble(
        mut stars: Vec<StarRow>,
        companion_rows: Vec<CompanionRow>,
        planets: Vec<PlanetRecord>,
        moons: Vec<MoonRecord>,
    ) -> Self {
        if !stars.is_empty() && !stars.iter().any(|s| s.name == SOL) {
            stars.insert(0, sol_row());
        }

        let known: HashSet<&str> = stars.iter().map(|s| s.name.as_str()).collect();
        let mut companions: HashMap<String, String> = HashMap::new();
        for row in &companion_rows {
            let (companion, primary) = (row.companion_name.trim(), row.primary_star_name.trim());
            if companion.is_empty() || primary.is_empty() || companion == primary {
                continue;
            }
            companions.insert(companion.to_string(), primary.to_string());
        }
        for star in &stars {
            if companions.contains_key(&star.name) {
                continue;
            }
            if let Some(primary) = suffix_primary(&star.name) {
                if known.contains(primary.as_str()) {
                    companions.insert(star.name.clone(), primary);
                }
            }
        }
        resolve_chains(&mut companions);

        let mut records: Vec<CatalogRecord> = Vec::new();
        let mut index_by_name: HashMap<String, usize> = HashMap::new();
        let mut bound: Vec<&StarRow> = Vec::new();
        for row in &stars {
            match companions.get(&row.name) {
                Some(primary) if known.contains(primary.as_str()) => bound.push(row),
                _ => {
                    if index_by_name.contains_key(&row.name) {
                        log::warn!("duplicate catalog star {:?} ignored", row.name);
                        continue;
                    }
                    index_by_name.insert(row.name.clone(), records.len());
                    records.push(primary_record(row));
                }
            }
        }
        // Mappings to primaries that never appeared are dropped.
        companions.retain(|_, primary| index_by_name.contains_key(primary));

        for row in bound {
            if let Some(&i) = companions.get(&row.name).and_then(|p| index_by_name.get(p)) {
                records[i].companions.push(companion_record(row));
            }
        }

        let planets = attach_moons(planets, moons);
        let lowered: HashMap<String, usize> = index_by_name
            .iter()
            .map(|(name, &i)| (name.to_lowercase(), i))
            .collect();
        for planet in planets {
            let host = planet.host.trim();
            let primary = companions.get(host).map(String::as_str).unwrap_or(host);
            let target = index_by_name
                .get(primary)
                .or_else(|| lowered.get(&primary.to_lowercase()))
                .copied();
            match target {
                Some(i) => records[i].planets.push(planet),
                None => log::warn!("planet {:?} has unknown host {:?}", planet.name, planet.host),
            }
        }

        Self {
            records,
            companions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn sol_row() -> StarRow {
    StarRow {
        name: SOL.to_string(),
        x: 0.0,
        y: 0.0,
        z: 0.0,
        stellar_class: "G2V".to_string(),
        mass: 1.0,
        temperature: 5_778.0,
        luminosity: 1.0,
        absolute_magnitude: Some(4.83),
    }
}

/// `"Sirius B"` → `"Sirius A"`. Only single uppercase suffix letters other
/// than `A` qualify.
fn suffix_primary(name: &str) -> Option<String> {
    let (stem, suffix) = name.trim().rsplit_once(' ')?;
    let mut chars = suffix.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letter.is_ascii_uppercase() || letter == 'A' || stem.is_empty() {
        return None;
    }
    Some(format!("{stem} A"))
}

/// Point every companion at its final primary (A → B → C becomes A → C).
fn resolve_chains(companions: &mut HashMap<String, String>) {
    let keys: Vec<String> = companions.keys().cloned().collect();
    for key in keys {
        let mut target = companions[&key].clone();
        let mut hops = 0;
        while let Some(next) = companions.get(&target) {
            if next == &key || hops > companions.len() {
                break;
            }
            target = next.clone();
            hops += 1;
        }
        companions.insert(key, target);
    }
}

fn heliocentric(row: &StarRow) -> DVec3 {
    DVec3::new(row.x, row.y, row.z)
}

fn primary_record(row: &StarRow) -> CatalogRecord {
    let helio = heliocentric(row);
    CatalogRecord {
        name: row.name.clone(),
        position: solar_position() + helio,
        heliocentric: helio,
        stellar_class: row.stellar_class.clone(),
        stellar_type: StellarType::from_spectral_class(&row.stellar_class),
        mass: row.mass,
        temperature: row.temperature,
        luminosity: row.luminosity,
        absolute_magnitude: row.absolute_magnitude,
        companions: Vec::new(),
        planets: Vec::new(),
    }
}

fn companion_record(row: &StarRow) -> CompanionRecord {
    CompanionRecord {
        name: row.name.clone(),
        stellar_class: row.stellar_class.clone(),
        stellar_type: StellarType::from_spectral_class(&row.stellar_class),
        mass: row.mass,
        temperature: row.temperature,
        luminosity: row.luminosity,
        heliocentric: heliocentric(row),
    }
}

fn attach_moons(mut planets: Vec<PlanetRecord>, moons: Vec<MoonRecord>) -> Vec<PlanetRecord> {
    let index: HashMap<String, usize> = planets
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.clone(), i))
        .collect();
    for moon in moons {
        match index.get(moon.host_planet.trim()) {
            Some(&i) => planets[i].moons.push(moon),
            None => log::warn!("moon {:?} has unknown host {:?}", moon.name, moon.host_planet),
        }
    }
    planets
}

/// Read every well-formed row of a CSV table. A missing optional table is empty.
fn read_table<T: DeserializeOwned>(path: &Path, required: bool) -> Result<Vec<T>> {
    if !required && !path.exists() {
        return Ok(Vec::new());
    }
    let load_failure = |reason: String| GalaxyError::DataLoadFailure {
        path: path.to_path_buf(),
        reason,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| load_failure(e.to_string()))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                log::debug!("{}: skipping row: {}", path.display(), e);
            }
        }
    }
    if skipped > 0 {
        log::warn!("{}: skipped {} malformed rows", path.display(), skipped);
    }
    Ok(rows)
}
