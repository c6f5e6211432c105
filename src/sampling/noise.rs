//! Random sources for path generation.
//!
//! Each regeneration draws one generation seed from the engine's master
//! generator, and every path gets its own ChaCha stream derived from
//! `(generation_seed, path_id)`. Paths are therefore reproducible no matter
//! how the work is split across threads.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::error::{PathIntegralError, Result};

/// Seedable random source.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    rng: ChaCha20Rng,
}

impl NoiseGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Unseeded generator; every run differs.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Independent stream for one path of one generation.
    pub fn from_path_id(generation_seed: u64, path_id: u64) -> Self {
        // golden-ratio increment spreads neighbouring ids over the seed space
        let seed = generation_seed.wrapping_add(path_id.wrapping_mul(0x9e3779b97f4a7c15));
        Self::new(seed)
    }

    /// Draw the seed for the next generation.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub fn rng(&mut self) -> &mut ChaCha20Rng {
        &mut self.rng
    }
}

/// Perturbation added to every interior point of the straight-line guess.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathNoise {
    /// Uniform offset in [-amplitude, amplitude)
    Uniform { amplitude: f64 },
    /// Normal offset with standard deviation sigma
    Gaussian { sigma: f64 },
    /// No perturbation: the straight line itself
    None,
}

impl Default for PathNoise {
    fn default() -> Self {
        PathNoise::Uniform { amplitude: 0.5 }
    }
}

impl PathNoise {
    /// Offsets must be finite and non-negative in scale.
    pub fn validate(&self) -> Result<()> {
        let (name, value) = match *self {
            PathNoise::Uniform { amplitude } => ("amplitude", amplitude),
            PathNoise::Gaussian { sigma } => ("sigma", sigma),
            PathNoise::None => return Ok(()),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(PathIntegralError::invalid(name, value, "must be finite and non-negative"));
        }
        Ok(())
    }

    /// Draw one offset. `None` consumes no randomness.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            PathNoise::Uniform { amplitude } => (rng.gen::<f64>() - 0.5) * 2.0 * amplitude,
            PathNoise::Gaussian { sigma } => {
                let z: f64 = StandardNormal.sample(rng);
                z * sigma
            }
            PathNoise::None => 0.0,
        }
    }
}
