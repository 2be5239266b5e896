use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic seeding for demand sweeps.
///
/// Streams are derived through `DefaultHasher`, whose output is not
/// guaranteed stable across Rust releases, so a seed only reproduces the
/// same demands when built with the same toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    master_seed: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self { master_seed: seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    // Derive a stream for a named consumer by hashing it with the master seed
    pub fn get_rng(&self, name: &str) -> ChaCha8Rng {
        let mut hasher = DefaultHasher::new();
        self.master_seed.hash(&mut hasher);
        name.hash(&mut hasher);
        ChaCha8Rng::seed_from_u64(hasher.finish())
    }
}
