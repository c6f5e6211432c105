use clap::Parser;
use tracing::info;

use rust_feynman::{
    logging, read_run_config, write_ensemble, EnsembleSummary, PathIntegralError, RunConfig,
    Simulation,
};

#[derive(Parser, Debug)]
#[command(version, about = "Discretized Feynman path-integral sampler for a harmonic oscillator", long_about = None)]
struct Args {
    /// YAML run configuration; defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Master seed, overrides the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of driver ticks to run
    #[arg(short, long, default_value_t = 900)]
    ticks: u64,

    /// Write the final ensemble to this YAML file
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<(), PathIntegralError> {
    logging::init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => read_run_config(path)?,
        None => RunConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.engine.seed = Some(seed);
    }

    let params = config.params;
    info!(
        n_paths = params.num_paths,
        time_steps = params.time_steps,
        hbar = params.hbar,
        mass = params.mass,
        dt = params.dt,
        start = params.start_pos,
        end = params.end_pos,
        "starting path-integral sampler"
    );

    let mut sim = Simulation::new(params, config.engine, config.schedule)?;
    report(&sim);
    for _ in 0..args.ticks {
        if sim.update()? {
            report(&sim);
        }
    }

    let ensemble = sim.current_ensemble();
    if let Some(path) = &args.output {
        write_ensemble(path, &ensemble)?;
        info!(file = %path, generation = ensemble.generation, "ensemble written");
    }
    Ok(())
}

fn report(sim: &Simulation) {
    let ensemble = sim.current_ensemble();
    match EnsembleSummary::from_ensemble(&ensemble) {
        Some(summary) => info!(
            frame = sim.current_frame(),
            generation = summary.generation,
            min_action = summary.min_action,
            mean_action = summary.mean_action,
            max_action = summary.max_action,
            max_deviation = summary.max_deviation_from_line(),
            normalization = ?ensemble.normalization,
            "ensemble regenerated"
        ),
        None => info!(frame = sim.current_frame(), "ensemble is empty"),
    }
}
