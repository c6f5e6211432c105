//! Driving loop for the ensemble engine.
//!
//! `Simulation` turns ticks into regenerations on a fixed interval and
//! regenerates immediately on parameter changes and explicit requests. It
//! knows nothing about frame rates or rendering; whoever owns the loop calls
//! `update()` once per tick and reads `current_ensemble()` to draw.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::params::{ParameterChange, SimulationParameters};
use crate::sampling::{EngineConfig, EnsembleEngine, PathEnsemble};

/// Regeneration cadence.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Regenerate every `interval` ticks; 0 disables the cadence
    pub interval: u64,
    /// Simulated time advanced per tick
    pub frame_time: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: 300,
            frame_time: 0.016,
        }
    }
}

#[derive(Debug)]
pub struct Simulation {
    params: SimulationParameters,
    schedule: ScheduleConfig,
    engine: EnsembleEngine,
    current_frame: u64,
    total_time: f64,
    paused: bool,
}

impl Simulation {
    /// Build the engine and publish a first ensemble.
    pub fn new(
        params: SimulationParameters,
        engine: EngineConfig,
        schedule: ScheduleConfig,
    ) -> Result<Self> {
        let mut engine = EnsembleEngine::new(engine);
        engine.regenerate(&params)?;
        Ok(Self {
            params,
            schedule,
            engine,
            current_frame: 0,
            total_time: 0.0,
            paused: false,
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_ensemble(&self) -> Arc<PathEnsemble> {
        self.engine.current_ensemble()
    }

    /// Advance one tick. Returns true if the tick regenerated the ensemble.
    pub fn update(&mut self) -> Result<bool> {
        if self.paused {
            return Ok(false);
        }

        self.current_frame += 1;
        self.total_time += self.schedule.frame_time;

        let interval = self.schedule.interval;
        if interval > 0 && self.current_frame % interval == 0 {
            debug!(frame = self.current_frame, "scheduled regeneration");
            self.engine.regenerate(&self.params)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Apply one parameter change and regenerate. An invalid change is
    /// rejected; parameters and ensemble stay as they were.
    pub fn set_parameter(&mut self, change: ParameterChange) -> Result<Arc<PathEnsemble>> {
        let candidate = self.params.with_change(change);
        match self.engine.regenerate(&candidate) {
            Ok(ensemble) => {
                debug!(?change, "parameter changed");
                self.params = candidate;
                Ok(ensemble)
            }
            Err(err) => {
                debug!(?change, %err, "parameter change rejected");
                Err(err)
            }
        }
    }

    /// Regenerate now with the current parameters.
    pub fn request_regenerate(&mut self) -> Result<Arc<PathEnsemble>> {
        debug!(frame = self.current_frame, "regeneration requested");
        self.engine.regenerate(&self.params)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}
