//! Starmap: prints a chunk of the procedural galaxy with its real-catalog
//! overlay, resolves a few star names and optionally surveys the galaxy.

mod config;

use anyhow::{Context, Result};
use config::{StarmapConfig, CONFIG_FILE};
use galaxy_core::{ChunkCoord, Seed};
use stargen::{CatalogOverlay, Galaxy, GalaxySurvey, ProceduralSystems, Star};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = StarmapConfig::load(&config_path);

    let overlay = Arc::new(CatalogOverlay::load_or_empty(&config.catalog_dir));
    let galaxy = Galaxy::new(config.galaxy.clone(), overlay, Arc::new(ProceduralSystems));

    let core = galaxy.star_by_seed(Seed::CORE)?;
    println!("seed 0: {} ({}, {:.2e} M☉)", core.system_name, core.stellar_type, core.mass);

    let chunk: ChunkCoord = config
        .chunk
        .parse()
        .with_context(|| format!("chunk {:?} in {}", config.chunk, config_path.display()))?;
    print_chunk(&galaxy, chunk, config.listing_limit);

    for name in &config.names {
        match galaxy.star_by_name(name) {
            Ok(star) => println!("{name:>20} -> {}", describe(&star)),
            Err(e) => println!("{name:>20} -> {e}"),
        }
    }

    if config.survey.enabled {
        run_survey(&galaxy, &config);
    }
    Ok(())
}

fn describe(star: &Star) -> String {
    let e = star.export();
    format!(
        "{} [{}] {} {:.2} M☉ {:.0} K r={:.1} θ={:.3}° z={:.1} {} {}{}",
        e.system_name,
        star.seed,
        e.stellar_type,
        e.mass,
        e.temperature,
        e.r,
        e.theta,
        e.z,
        e.region,
        e.planet_count,
        if e.is_real { " planets (catalog)" } else { " planets" },
    )
}

fn print_chunk(galaxy: &Galaxy, chunk: ChunkCoord, limit: usize) {
    let expected = galaxy.expected_count(chunk);
    let stars = galaxy.stars_in_chunk(chunk);
    let real = stars.iter().filter(|s| s.is_real()).count();
    println!(
        "chunk {chunk}: {expected} procedural slots, {} listed ({real} catalog), {} rogue objects",
        stars.len(),
        galaxy.rogue_count(chunk)
    );
    for star in stars.iter().filter(|s| s.is_real()).chain(stars.iter().filter(|s| !s.is_real())).take(limit) {
        println!("  {}", describe(star));
    }
    for rogue in galaxy.rogues_in_chunk(chunk).iter().take(limit) {
        println!(
            "  rogue [{}] {:?} {:.4} MJ {:.1} R⊕ {:.0} K {} {} moons",
            rogue.seed,
            rogue.archetype,
            rogue.mass,
            rogue.radius,
            rogue.temperature,
            rogue.origin.label(),
            rogue.moon_count
        );
    }
}

fn run_survey(galaxy: &Galaxy, config: &StarmapConfig) {
    let survey = GalaxySurvey::new(galaxy.estimator().clone(), config.survey.extent.clone());
    let cancel = AtomicBool::new(false);
    let report = survey.run(&cancel, |p| {
        let step = (p.rings_total / 10).max(1);
        if p.rings_done % step == 0 || p.rings_done == p.rings_total {
            log::info!("survey {:.0}% ({}/{})", p.fraction() * 100.0, p.rings_done, p.rings_total);
        }
    });
    println!(
        "survey: ~{:.3e} stars, ~{:.3e} rogue objects over {}/{} rings",
        report.stars, report.rogues, report.rings_completed, report.rings_total
    );
    for (population, stars) in &report.by_population {
        println!("  {population:>12}: ~{stars:.3e}");
    }
}
