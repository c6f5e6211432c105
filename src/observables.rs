//! Ensemble-level observables.

use nalgebra::{Complex, DVector};
use serde::Serialize;

use crate::sampling::PathEnsemble;

/// Summary statistics of one ensemble.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EnsembleSummary {
    pub generation: u64,
    pub n_paths: usize,
    pub min_action: f64,
    pub mean_action: f64,
    pub max_action: f64,
    /// Σ amplitude after normalization (1 + i for a normalized ensemble)
    pub total_amplitude: Complex<f64>,
    /// Position at each time slice averaged over paths
    pub mean_trajectory: DVector<f64>,
}

impl EnsembleSummary {
    /// Returns `None` for an empty ensemble.
    pub fn from_ensemble(ensemble: &PathEnsemble) -> Option<Self> {
        let first = ensemble.paths.first()?;
        let n = ensemble.len() as f64;

        let mut min_action = f64::INFINITY;
        let mut max_action = f64::NEG_INFINITY;
        let mut action_sum = 0.0;
        let mut trajectory = DVector::<f64>::zeros(first.positions.len());
        for path in ensemble.iter() {
            min_action = min_action.min(path.action);
            max_action = max_action.max(path.action);
            action_sum += path.action;
            trajectory += DVector::from_column_slice(&path.positions);
        }

        Some(Self {
            generation: ensemble.generation,
            n_paths: ensemble.len(),
            min_action,
            mean_action: action_sum / n,
            max_action,
            total_amplitude: ensemble.amplitude_sum(),
            mean_trajectory: trajectory / n,
        })
    }

    /// Largest deviation of the mean trajectory from the straight line between
    /// its endpoints.
    pub fn max_deviation_from_line(&self) -> f64 {
        let len = self.mean_trajectory.len();
        if len < 2 {
            return 0.0;
        }
        let start = self.mean_trajectory[0];
        let end = self.mean_trajectory[len - 1];
        let steps = (len - 1) as f64;
        self.mean_trajectory
            .iter()
            .enumerate()
            .map(|(t, &x)| {
                let alpha = t as f64 / steps;
                (x - ((1.0 - alpha) * start + alpha * end)).abs()
            })
            .fold(0.0, f64::max)
    }
}
