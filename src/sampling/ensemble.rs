//! Ensemble engine: builds, weights and normalizes a full set of paths.
//!
//! The engine owns the most recently published ensemble behind an `Arc`.
//! A regeneration builds the replacement off to the side (in parallel across
//! paths when enabled), sums the amplitudes once every path exists, divides,
//! and only then swaps the pointer. Readers holding an older snapshot keep it
//! intact; nobody can observe a half-built or half-normalized ensemble.

use std::sync::Arc;

use nalgebra::Complex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::noise::{NoiseGenerator, PathNoise};
use super::path::Path;
use super::traits::HarmonicPotential;
use crate::error::{PathIntegralError, Result};
use crate::params::SimulationParameters;

/// Engine settings that are not physics parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Master seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Interior-point perturbation
    pub noise: PathNoise,
    /// Generate paths on the rayon pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            noise: PathNoise::default(),
            parallel: true,
        }
    }
}

/// How the amplitudes of an ensemble were normalized.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Normalization {
    /// No paths, nothing to divide
    Empty,
    /// Real and imaginary parts divided by their respective sums
    Normalized { sum_real: f64, sum_imag: f64 },
    /// A sum was exactly zero; amplitudes were left on the unit circle
    Degenerate { sum_real: f64, sum_imag: f64 },
}

/// The paths of one regeneration together with the snapshot that made them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PathEnsemble {
    pub generation: u64,
    pub params: SimulationParameters,
    pub normalization: Normalization,
    pub paths: Vec<Path>,
}

impl PathEnsemble {
    pub fn empty(params: SimulationParameters) -> Self {
        Self {
            generation: 0,
            params,
            normalization: Normalization::Empty,
            paths: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    /// Σ amplitude, accumulated in path order.
    pub fn amplitude_sum(&self) -> Complex<f64> {
        self.paths
            .iter()
            .fold(Complex::new(0.0, 0.0), |acc, p| acc + p.amplitude)
    }

    /// Fails with `DegenerateNormalization` if the amplitudes could not be normalized.
    pub fn ensure_normalized(&self) -> Result<()> {
        match self.normalization {
            Normalization::Degenerate { sum_real, sum_imag } => {
                Err(PathIntegralError::DegenerateNormalization { sum_real, sum_imag })
            }
            _ => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a PathEnsemble {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Divide every amplitude component-wise by the ensemble sums.
///
/// Division is by the sum of real parts and the sum of imaginary parts
/// separately, not by the complex modulus, so |amplitude| is not bounded by 1
/// afterwards. When either sum is exactly zero (or not finite) nothing is
/// modified.
pub(crate) fn normalize_amplitudes(paths: &mut [Path]) -> Result<(f64, f64)> {
    let mut sum_real = 0.0;
    let mut sum_imag = 0.0;
    for path in paths.iter() {
        sum_real += path.amplitude.re;
        sum_imag += path.amplitude.im;
    }

    let degenerate = |sum: f64| sum == 0.0 || !sum.is_finite();
    if degenerate(sum_real) || degenerate(sum_imag) {
        return Err(PathIntegralError::DegenerateNormalization { sum_real, sum_imag });
    }

    for path in paths.iter_mut() {
        path.amplitude.re /= sum_real;
        path.amplitude.im /= sum_imag;
    }
    Ok((sum_real, sum_imag))
}

/// Owns the current ensemble and the random source that regenerates it.
#[derive(Debug)]
pub struct EnsembleEngine {
    config: EngineConfig,
    noise: NoiseGenerator,
    potential: HarmonicPotential,
    current: Arc<PathEnsemble>,
    generation: u64,
}

impl EnsembleEngine {
    /// An engine holding an empty ensemble until the first regeneration.
    pub fn new(config: EngineConfig) -> Self {
        let noise = match config.seed {
            Some(seed) => NoiseGenerator::new(seed),
            None => NoiseGenerator::from_entropy(),
        };
        Self {
            config,
            noise,
            potential: HarmonicPotential,
            current: Arc::new(PathEnsemble::empty(SimulationParameters::default())),
            generation: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Restart the master random stream.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.noise = NoiseGenerator::new(seed);
    }

    /// Snapshot of the last published ensemble.
    pub fn current_ensemble(&self) -> Arc<PathEnsemble> {
        Arc::clone(&self.current)
    }

    /// Build, weight and normalize a new ensemble, then publish it.
    ///
    /// Invalid parameters are rejected before anything is sampled, and
    /// parameters whose action or phase overflows are rejected before anything
    /// is published; either way the previous ensemble stays published. A
    /// degenerate normalization is not an error here: the ensemble is published
    /// with raw unit-circle amplitudes and `Normalization::Degenerate`.
    pub fn regenerate(&mut self, params: &SimulationParameters) -> Result<Arc<PathEnsemble>> {
        if let Err(err) = params.validate().and_then(|_| self.config.noise.validate()) {
            warn!(%err, "rejecting regeneration");
            return Err(err);
        }

        let (paths, normalization) = if params.num_paths == 0 {
            (Vec::new(), Normalization::Empty)
        } else {
            let generation_seed = self.noise.next_seed();
            let mut paths = self.sample_paths(params, generation_seed);
            if let Some(path) = paths.iter().find(|p| !p.phase.is_finite()) {
                let err = PathIntegralError::invalid(
                    "phase",
                    path.phase,
                    "action or phase overflowed, dt or hbar is too small",
                );
                warn!(%err, action = path.action, "rejecting regeneration");
                return Err(err);
            }
            let normalization = match normalize_amplitudes(&mut paths) {
                Ok((sum_real, sum_imag)) => Normalization::Normalized { sum_real, sum_imag },
                Err(PathIntegralError::DegenerateNormalization { sum_real, sum_imag }) => {
                    warn!(sum_real, sum_imag, "amplitude sum cancelled, keeping raw amplitudes");
                    Normalization::Degenerate { sum_real, sum_imag }
                }
                Err(err) => return Err(err),
            };
            (paths, normalization)
        };

        self.generation += 1;
        let ensemble = Arc::new(PathEnsemble {
            generation: self.generation,
            params: *params,
            normalization,
            paths,
        });
        self.current = Arc::clone(&ensemble);

        debug!(
            generation = self.generation,
            n_paths = params.num_paths,
            time_steps = params.time_steps,
            ?normalization,
            "published ensemble"
        );
        Ok(ensemble)
    }

    fn sample_paths(&self, params: &SimulationParameters, generation_seed: u64) -> Vec<Path> {
        let noise = &self.config.noise;
        let potential = &self.potential;
        let sample = |i: usize| {
            let mut gen = NoiseGenerator::from_path_id(generation_seed, i as u64);
            Path::sample(params, noise, potential, gen.rng())
        };

        if self.config.parallel {
            (0..params.num_paths).into_par_iter().map(sample).collect()
        } else {
            (0..params.num_paths).map(sample).collect()
        }
    }
}
