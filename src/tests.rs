use approx::assert_relative_eq;

use crate::driver::{ScheduleConfig, Simulation};
use crate::io::{read_run_config, write_ensemble, RunConfig};
use crate::observables::EnsembleSummary;
use crate::params::{ParameterChange, SimulationParameters};
use crate::sampling::{EngineConfig, PathEnsemble, PathNoise};

fn temp_file(name: &str) -> String {
    let mut path = std::env::temp_dir();
    path.push(format!("rust_feynman_{}_{}", std::process::id(), name));
    path.to_string_lossy().into_owned()
}

#[test]
fn test_config_to_simulation_run() {
    let config_path = temp_file("run.yml");
    std::fs::write(
        &config_path,
        "params:\n  num_paths: 40\n  time_steps: 12\nengine:\n  seed: 2024\nschedule:\n  interval: 3\n",
    )
    .unwrap();
    let config = read_run_config(&config_path).unwrap();
    std::fs::remove_file(&config_path).ok();

    let mut sim = Simulation::new(config.params, config.engine, config.schedule).unwrap();
    for _ in 0..9 {
        sim.update().unwrap();
    }
    let ensemble = sim.current_ensemble();
    assert_eq!(ensemble.generation, 4);
    assert_eq!(ensemble.len(), 40);

    let summary = EnsembleSummary::from_ensemble(&ensemble).unwrap();
    assert_relative_eq!(summary.total_amplitude.re, 1.0, epsilon = 1e-9);
    assert_relative_eq!(summary.total_amplitude.im, 1.0, epsilon = 1e-9);
}

#[test]
fn test_written_ensemble_reads_back() {
    let config = RunConfig {
        params: SimulationParameters::default().with_change(ParameterChange::NumPaths(5)),
        engine: EngineConfig {
            seed: Some(99),
            ..EngineConfig::default()
        },
        schedule: ScheduleConfig::default(),
    };
    let sim = Simulation::new(config.params, config.engine, config.schedule).unwrap();
    let ensemble = sim.current_ensemble();

    let out = temp_file("ensemble.yml");
    write_ensemble(&out, &ensemble).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    std::fs::remove_file(&out).ok();

    let back: PathEnsemble = serde_yaml::from_str(&text).unwrap();
    assert_eq!(back.len(), 5);
    assert_eq!(back.params, ensemble.params);
    for (a, b) in back.iter().zip(ensemble.iter()) {
        assert_eq!(a.positions.len(), b.positions.len());
        assert_relative_eq!(a.action, b.action, epsilon = 1e-12);
        assert_relative_eq!(a.amplitude.re, b.amplitude.re, epsilon = 1e-12);
    }
}

#[test]
fn test_two_seeded_simulations_agree() {
    let params = SimulationParameters::default();
    let engine = EngineConfig {
        seed: Some(5),
        ..EngineConfig::default()
    };
    let schedule = ScheduleConfig {
        interval: 2,
        ..ScheduleConfig::default()
    };
    let mut a = Simulation::new(params, engine, schedule).unwrap();
    let mut b = Simulation::new(params, engine, schedule).unwrap();
    for _ in 0..6 {
        a.update().unwrap();
        b.update().unwrap();
    }
    a.set_parameter(ParameterChange::Mass(2.0)).unwrap();
    b.set_parameter(ParameterChange::Mass(2.0)).unwrap();
    assert_eq!(*a.current_ensemble(), *b.current_ensemble());
}

#[test]
fn test_larger_hbar_slows_phase_spread() {
    // same seed, larger hbar: the phases shrink by the same factor
    let params = SimulationParameters::default().with_change(ParameterChange::NumPaths(200));
    let engine = EngineConfig {
        seed: Some(17),
        noise: PathNoise::Gaussian { sigma: 0.5 },
        parallel: true,
    };
    let a = Simulation::new(params, engine, ScheduleConfig::default()).unwrap();
    let b = Simulation::new(
        params.with_change(ParameterChange::Hbar(10.0)),
        engine,
        ScheduleConfig::default(),
    )
    .unwrap();
    let ea = a.current_ensemble();
    let eb = b.current_ensemble();
    for (pa, pb) in ea.iter().zip(eb.iter()) {
        assert_relative_eq!(pb.phase * 10.0, pa.phase, epsilon = 1e-9, max_relative = 1e-12);
    }
}
