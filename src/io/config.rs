// Configuration is read from yaml, every section optional:
//
// params:
//   num_paths: 500
//   time_steps: 30
//   hbar: 1.0
//   mass: 1.0
//   dt: 0.1
//   dx: 0.1
//   start_pos: -2.0
//   end_pos: 2.0
// engine:
//   seed: 42
//   noise: { kind: uniform, amplitude: 0.5 }
//   parallel: true
// schedule:
//   interval: 300
//   frame_time: 0.016

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use serde::{Deserialize, Serialize};

use crate::driver::ScheduleConfig;
use crate::error::Result;
use crate::params::SimulationParameters;
use crate::sampling::{EngineConfig, PathEnsemble};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub params: SimulationParameters,
    pub engine: EngineConfig,
    pub schedule: ScheduleConfig,
}

/// Read a run configuration in yaml format.
pub fn read_run_config(filename: &str) -> Result<RunConfig> {
    let file = File::open(filename)?;
    let reader = BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    Ok(config)
}

/// Dump an ensemble (positions, actions, amplitudes) in yaml format.
pub fn write_ensemble(filename: &str, ensemble: &PathEnsemble) -> Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    serde_yaml::to_writer(&mut writer, ensemble)?;
    writer.flush()?;
    Ok(())
}
