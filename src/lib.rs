//! Rust Feynman - discretized path-integral sampling in Rust
//!
//! This crate samples ensembles of real-time paths of a particle in a harmonic
//! potential between two pinned endpoints, weights each path by exp(-iS/ħ) and
//! normalizes the ensemble for display.

pub mod error;
pub mod params;
pub mod sampling;
pub mod observables;
pub mod driver;
pub mod io;
pub mod logging;

#[cfg(test)]
mod tests;

// Re-export commonly used types at crate root
pub use error::{PathIntegralError, Result};
pub use params::{SimulationParameters, ParameterChange};
pub use sampling::{Potential, HarmonicPotential, NoiseGenerator, PathNoise, Path, generate_random_path, calculate_action, EngineConfig, EnsembleEngine, Normalization, PathEnsemble};
pub use observables::EnsembleSummary;
pub use driver::{ScheduleConfig, Simulation};
pub use io::{RunConfig, read_run_config, write_ensemble};
