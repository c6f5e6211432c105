//! Simulation parameters and single-parameter updates.

use serde::{Deserialize, Serialize};

use crate::error::{PathIntegralError, Result};

/// Immutable snapshot of everything one regeneration consumes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SimulationParameters {
    /// Number of trajectories in the ensemble
    pub num_paths: usize,
    /// Number of time intervals per trajectory (positions = time_steps + 1)
    pub time_steps: usize,
    /// Reduced Planck constant analogue, phase = -S / hbar
    pub hbar: f64,
    /// Particle mass
    pub mass: f64,
    /// Time-step width
    pub dt: f64,
    /// Spatial perturbation scale. Validated and carried along, but neither the
    /// path generator nor the action reads it.
    pub dx: f64,
    /// Pinned first coordinate of every path
    pub start_pos: f64,
    /// Pinned last coordinate of every path
    pub end_pos: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            num_paths: 500,
            time_steps: 30,
            hbar: 1.0,
            mass: 1.0,
            dt: 0.1,
            dx: 0.1,
            start_pos: -2.0,
            end_pos: 2.0,
        }
    }
}

impl SimulationParameters {
    /// Reject snapshots that would make sampling or the phase undefined.
    pub fn validate(&self) -> Result<()> {
        if self.time_steps < 1 {
            return Err(PathIntegralError::invalid(
                "time_steps",
                self.time_steps as f64,
                "at least one time step is required",
            ));
        }
        positive("hbar", self.hbar)?;
        positive("mass", self.mass)?;
        positive("dt", self.dt)?;
        positive("dx", self.dx)?;
        finite("start_pos", self.start_pos)?;
        finite("end_pos", self.end_pos)?;
        Ok(())
    }

    /// Return a copy with one parameter replaced. The copy is not validated.
    pub fn with_change(mut self, change: ParameterChange) -> Self {
        match change {
            ParameterChange::NumPaths(n) => self.num_paths = n,
            ParameterChange::TimeSteps(n) => self.time_steps = n,
            ParameterChange::Hbar(v) => self.hbar = v,
            ParameterChange::Mass(v) => self.mass = v,
            ParameterChange::Dt(v) => self.dt = v,
            ParameterChange::Dx(v) => self.dx = v,
            ParameterChange::StartPos(v) => self.start_pos = v,
            ParameterChange::EndPos(v) => self.end_pos = v,
        }
        self
    }
}

/// One externally settable parameter, as delivered by a slider or setter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterChange {
    NumPaths(usize),
    TimeSteps(usize),
    Hbar(f64),
    Mass(f64),
    Dt(f64),
    Dx(f64),
    StartPos(f64),
    EndPos(f64),
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(PathIntegralError::invalid(name, value, "must be strictly positive"));
    }
    Ok(())
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PathIntegralError::invalid(name, value, "must be finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = SimulationParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.num_paths, 500);
        assert_eq!(params.time_steps, 30);
    }

    #[test]
    fn test_zero_hbar_rejected() {
        let params = SimulationParameters::default().with_change(ParameterChange::Hbar(0.0));
        match params.validate() {
            Err(PathIntegralError::InvalidParameter { name, .. }) => assert_eq!(name, "hbar"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_dt_and_time_steps_rejected() {
        let base = SimulationParameters::default();
        assert!(base.with_change(ParameterChange::Dt(0.0)).validate().is_err());
        assert!(base.with_change(ParameterChange::TimeSteps(0)).validate().is_err());
        assert!(base.with_change(ParameterChange::TimeSteps(1)).validate().is_ok());
    }

    #[test]
    fn test_non_finite_boundary_rejected() {
        let base = SimulationParameters::default();
        assert!(base.with_change(ParameterChange::StartPos(f64::NAN)).validate().is_err());
        assert!(base.with_change(ParameterChange::EndPos(f64::INFINITY)).validate().is_err());
    }

    #[test]
    fn test_empty_ensemble_is_valid() {
        let params = SimulationParameters::default().with_change(ParameterChange::NumPaths(0));
        assert!(params.validate().is_ok());
    }
}
