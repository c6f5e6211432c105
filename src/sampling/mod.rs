//! Sampling module - path generation, action and ensemble normalization.

mod traits;
mod noise;
mod path;
mod ensemble;

pub use traits::{Potential, HarmonicPotential};
pub use noise::{NoiseGenerator, PathNoise};
pub use path::{Path, generate_random_path, calculate_action};
pub use ensemble::{EngineConfig, EnsembleEngine, Normalization, PathEnsemble};
