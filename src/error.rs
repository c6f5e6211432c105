//! Error type shared by the sampler, the engine and the configuration loader.

use thiserror::Error;

/// Errors surfaced by path-integral sampling.
#[derive(Debug, Error)]
pub enum PathIntegralError {
    /// A simulation parameter is outside its valid range. Raised before any
    /// path is sampled.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The real or imaginary amplitude sum cancelled to exactly zero.
    #[error("degenerate normalization: sum_real = {sum_real}, sum_imag = {sum_imag}")]
    DegenerateNormalization { sum_real: f64, sum_imag: f64 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl PathIntegralError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}

pub type Result<T> = std::result::Result<T, PathIntegralError>;
