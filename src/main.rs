use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tracing::{Level, error, info};

use dg_euler::error::Result;
use dg_euler::initialization::{initialize_params_by_file, initialize_problem, initialize_solver};
use dg_euler::io::write_to_csv::write_to_csv;

fn run(config_path: &str) -> Result<()> {
    let config = initialize_params_by_file(config_path)?;
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
    info!(config = config_path, "run description loaded");

    let problem = initialize_problem(&config)?;
    let mut solver = initialize_solver(&problem, &config)?;
    fs::create_dir_all(&config.output_dir)?;
    let output_dir = Path::new(&config.output_dir);
    let reason = solver.solve(|solver| {
        let path = output_dir.join(format!("solution_{:06}.csv", solver.curr_step));
        write_to_csv(solver, &path.to_string_lossy())?;
        info!(path = %path.display(), "snapshot written");
        Ok(())
    })?;
    info!(?reason, time = solver.curr_time, "done");
    Ok(())
}

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "inputs/solverparam.json".to_string());
    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // the subscriber may not be installed yet when the config fails to load
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
