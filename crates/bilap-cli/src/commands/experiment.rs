use crate::cli::{ExperimentArgs, ExperimentKind};
use crate::config::{ExperimentSettings, PartialConfig};
use crate::error::Result;
use crate::output;
use crate::utils::progress::CliProgressHandler;
use bilap::engine::progress::ProgressReporter;
use bilap::workflows::experiments;
use bilap::workflows::tables::TableRow;
use std::path::Path;
use tracing::info;

pub fn run(args: ExperimentArgs, config_path: Option<&Path>, quiet: bool) -> Result<()> {
    let settings = PartialConfig::load(config_path)?.merge_experiment(&args)?;
    info!(
        kind = ?args.kind,
        grid_size = settings.experiment.hamiltonian.grid.size(),
        output_dir = ?settings.output_dir,
        "Resolved experiment settings."
    );

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let ExperimentSettings {
        experiment,
        output_dir,
    } = settings;
    let output_dir = output_dir.as_deref();
    let hamiltonian = &experiment.hamiltonian;

    match args.kind {
        ExperimentKind::Modes => {
            let rows = experiments::mode_sweep(hamiltonian, experiment.mode_count, &reporter)?;
            emit("modes", "Mode decomposition", &rows, output_dir)?;
        }
        ExperimentKind::Invariance => {
            let rows =
                experiments::invariance_sweep(hamiltonian, experiment.mode_count, &reporter)?;
            emit("invariance", "Shift invariance", &rows, output_dir)?;
        }
        ExperimentKind::Scaling => {
            let rows = experiments::grid_sweep(hamiltonian, &experiment.grid_sizes, &reporter)?;
            emit("scaling", "Grid scaling", &rows, output_dir)?;
        }
        ExperimentKind::Primes => {
            let rows = experiments::prime_set_sweep(
                hamiltonian,
                &experiment.prime_sets,
                experiment.analysis_mode,
                &reporter,
            )?;
            emit("primes", "Prime set comparison", &rows, output_dir)?;
        }
        ExperimentKind::All => {
            let report = experiments::run_all(&experiment, &reporter)?;
            emit("modes", "Mode decomposition", &report.modes, output_dir)?;
            emit("invariance", "Shift invariance", &report.invariance, output_dir)?;
            emit("scaling", "Grid scaling", &report.grid, output_dir)?;
            emit("primes", "Prime set comparison", &report.prime_sets, output_dir)?;
        }
    }

    Ok(())
}

fn emit<R: TableRow>(name: &str, title: &str, rows: &[R], output_dir: Option<&Path>) -> Result<()> {
    println!("\n{}\n{}", title, output::render_table(rows));
    if let Some(dir) = output_dir {
        let path = output::write_table(dir, name, rows)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tempfile::tempdir;

    fn args(argv: &[&str]) -> ExperimentArgs {
        match Cli::parse_from(argv).command {
            Commands::Experiment(args) => args,
            _ => panic!("Expected 'experiment' subcommand"),
        }
    }

    #[test]
    fn experiment_writes_csv_only_into_requested_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("results");
        let out_str = out.to_str().unwrap();
        let parsed = args(&[
            "bilap", "experiment", "scaling", "-n", "20", "--grid-sizes", "10,20", "-o", out_str,
        ]);
        run(parsed, None, true).unwrap();
        let content = std::fs::read_to_string(out.join("scaling.csv")).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(!out.join("modes.csv").exists());
    }

    #[test]
    fn experiment_without_output_dir_writes_nothing() {
        let parsed = args(&["bilap", "experiment", "modes", "-n", "12", "--modes", "3"]);
        assert!(parsed.output_dir.is_none());
        run(parsed, None, true).unwrap();
    }

    #[test]
    fn experiment_propagates_invalid_parameters() {
        let parsed = args(&["bilap", "experiment", "primes", "-n", "6", "-S", "experiments.prime-sets=2,7"]);
        assert!(run(parsed, None, true).is_err());
    }
}
