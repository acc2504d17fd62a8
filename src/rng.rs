// src/rng.rs
//! Random Number Generation for Monte Carlo Pricing
//!
//! Two modes are supported:
//! 1. **Fresh**: every call seeds a new generator from OS entropy, so repeated
//!    pricings are independent and not reproducible.
//! 2. **Seeded**: a caller-chosen `u64` seed gives a reproducible stream
//!    (used by tests and benchmarks).
//!
//! For parallel simulation an [`RngFactory`] derives one independent
//! `StdRng` per chunk from a single base seed, so the result does not depend
//! on how rayon schedules the chunks.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Factory whose base seed is drawn from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(fresh_seed())
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Create a standard RNG for a specific stream (chunk, path or thread)
    pub fn create_std_rng(&self, stream_id: u64) -> StdRng {
        // splitmix64 finaliser keeps neighbouring stream ids decorrelated
        let mut z = self
            .base_seed
            .wrapping_add(stream_id.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        StdRng::seed_from_u64(z ^ (z >> 31))
    }
}

/// Draw a new seed from OS entropy
pub fn fresh_seed() -> u64 {
    rand::thread_rng().next_u64()
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Fill a vector with `n` independent standard-normal draws
pub fn normal_samples<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| get_normal_draw(rng)).collect()
}
