//! Whole-galaxy population survey as an interruptible batch task.
//!
//! The survey sums expected counts over a block of chunk rings. Each radial
//! ring is one unit of work; rings run in parallel and report progress as they
//! finish. Every `theta_stride`-th angular chunk is sampled and the ring total
//! scaled back up by the share of the 360 angular chunks actually sampled.

use crate::population::PopulationEstimator;
use crate::region::Population;
use galaxy_core::{ChunkCoord, MAX_CHUNK_R, MAX_CHUNK_Z, MIN_CHUNK_Z, THETA_CHUNKS};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Chunk-index extent of a survey (inclusive bounds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyExtent {
    #[serde(default)]
    pub r_min: i32,
    #[serde(default = "default_r_max")]
    pub r_max: i32,
    #[serde(default = "default_z_min")]
    pub z_min: i32,
    #[serde(default = "default_z_max")]
    pub z_max: i32,
    #[serde(default = "default_theta_stride")]
    pub theta_stride: i32,
}

fn default_r_max() -> i32 {
    600
}
fn default_z_min() -> i32 {
    -30
}
fn default_z_max() -> i32 {
    29
}
fn default_theta_stride() -> i32 {
    10
}

impl Default for SurveyExtent {
    fn default() -> Self {
        Self {
            r_min: 0,
            r_max: default_r_max(),
            z_min: default_z_min(),
            z_max: default_z_max(),
            theta_stride: default_theta_stride(),
        }
    }
}

impl SurveyExtent {
    /// Clamp to the addressable grid.
    fn clamped(&self) -> Self {
        let r_min = self.r_min.clamp(0, MAX_CHUNK_R);
        let z_min = self.z_min.clamp(MIN_CHUNK_Z, MAX_CHUNK_Z);
        Self {
            r_min,
            r_max: self.r_max.clamp(r_min, MAX_CHUNK_R),
            z_min,
            z_max: self.z_max.clamp(z_min, MAX_CHUNK_Z),
            theta_stride: self.theta_stride.clamp(1, THETA_CHUNKS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyProgress {
    pub rings_done: usize,
    pub rings_total: usize,
}

impl SurveyProgress {
    pub fn fraction(&self) -> f64 {
        if self.rings_total == 0 {
            1.0
        } else {
            self.rings_done as f64 / self.rings_total as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyReport {
    /// Estimated procedural stars in the surveyed volume.
    pub stars: f64,
    /// Estimated rogue objects in the surveyed volume.
    pub rogues: f64,
    /// Star estimate split by the population at each chunk centre.
    pub by_population: BTreeMap<Population, f64>,
    pub rings_completed: usize,
    pub rings_total: usize,
    /// False when the survey was cancelled; totals then cover finished rings only.
    pub completed: bool,
}

#[derive(Default)]
struct RingTotals {
    stars: f64,
    rogues: f64,
    by_population: BTreeMap<Population, f64>,
}

pub struct GalaxySurvey {
    estimator: PopulationEstimator,
    extent: SurveyExtent,
}

impl GalaxySurvey {
    pub fn new(estimator: PopulationEstimator, extent: SurveyExtent) -> Self {
        Self {
            estimator,
            extent: extent.clamped(),
        }
    }

    pub fn extent(&self) -> &SurveyExtent {
        &self.extent
    }

    /// Run to completion or until `cancel` is set. `progress` is called from
    /// worker threads after each finished ring.
    pub fn run(&self, cancel: &AtomicBool, progress: impl Fn(SurveyProgress) + Sync) -> SurveyReport {
        let extent = &self.extent;
        let rings_total = (extent.r_max - extent.r_min + 1) as usize;
        log::info!(
            "survey: rings {}..={}, z {}..={}, theta stride {}",
            extent.r_min,
            extent.r_max,
            extent.z_min,
            extent.z_max,
            extent.theta_stride
        );

        let done = AtomicUsize::new(0);
        let rings: Vec<RingTotals> = (extent.r_min..=extent.r_max)
            .into_par_iter()
            .filter_map(|r| {
                let ring = self.survey_ring(r, cancel)?;
                let rings_done = done.fetch_add(1, Ordering::Relaxed) + 1;
                progress(SurveyProgress {
                    rings_done,
                    rings_total,
                });
                Some(ring)
            })
            .collect();

        let mut report = SurveyReport {
            rings_completed: rings.len(),
            rings_total,
            completed: rings.len() == rings_total,
            ..SurveyReport::default()
        };
        for ring in rings {
            report.stars += ring.stars;
            report.rogues += ring.rogues;
            for (population, count) in ring.by_population {
                *report.by_population.entry(population).or_default() += count;
            }
        }
        if report.completed {
            log::info!("survey finished: ~{:.3e} stars, ~{:.3e} rogues", report.stars, report.rogues);
        } else {
            log::info!("survey cancelled after {}/{} rings", report.rings_completed, rings_total);
        }
        report
    }

    /// Totals for one radial ring, or `None` if cancelled part-way.
    fn survey_ring(&self, r: i32, cancel: &AtomicBool) -> Option<RingTotals> {
        let extent = &self.extent;
        let weight = theta_scale(extent.theta_stride);
        let field = self.estimator.field();
        let mut totals = RingTotals::default();
        for z in extent.z_min..=extent.z_max {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            for theta in (0..THETA_CHUNKS).step_by(extent.theta_stride as usize) {
                let Ok(chunk) = ChunkCoord::new(r, theta, z) else {
                    continue;
                };
                let stars = self.estimator.expected_count(chunk) as f64 * weight;
                totals.stars += stars;
                totals.rogues += self.estimator.expected_rogues(chunk) * weight;
                let population = field.determine_population(chunk.center());
                *totals.by_population.entry(population).or_default() += stars;
            }
        }
        log::debug!("survey ring {r}: ~{:.3e} stars", totals.stars);
        Some(totals)
    }
}

/// Weight of one sampled angular chunk when every `stride`-th one is taken.
fn theta_scale(stride: i32) -> f64 {
    let stride = stride.clamp(1, THETA_CHUNKS);
    let sampled = (THETA_CHUNKS + stride - 1) / stride;
    THETA_CHUNKS as f64 / sampled as f64
}
