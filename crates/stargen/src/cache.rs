//! Optional seed → star memo cache shared across worker threads.

use crate::star::Star;
use galaxy_core::{splitmix64, Seed};
use std::collections::HashMap;
use std::sync::RwLock;

const SHARDS: usize = 16;
/// Entries per shard before the shard is cleared.
const SHARD_CAPACITY: usize = 65_536;

/// Sharded map of generated stars. Dropping entries only costs recomputation.
#[derive(Debug)]
pub struct StarCache {
    shards: Vec<RwLock<HashMap<Seed, Star>>>,
}

impl Default for StarCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StarCache {
    pub fn new() -> Self {
        Self {
            shards: (0..SHARDS).map(|_| RwLock::new(HashMap::new())).collect(),
        }
    }

    fn shard(&self, seed: Seed) -> &RwLock<HashMap<Seed, Star>> {
        &self.shards[(splitmix64(seed.raw()) % SHARDS as u64) as usize]
    }

    pub fn get(&self, seed: Seed) -> Option<Star> {
        // A poisoned shard only means a writer panicked mid-insert; treat as a miss.
        self.shard(seed).read().ok()?.get(&seed).cloned()
    }

    pub fn insert(&self, star: Star) {
        if let Ok(mut shard) = self.shard(star.seed).write() {
            if shard.len() >= SHARD_CAPACITY {
                shard.clear();
            }
            shard.insert(star.seed, star);
        }
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .filter_map(|s| s.read().ok().map(|m| m.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            if let Ok(mut m) = shard.write() {
                m.clear();
            }
        }
    }
}
