use super::tables::{GridRow, InvarianceRow, ModeRow, PrimeSetRow};
use crate::engine::analyzer::SpectralAnalyzer;
use crate::engine::config::{ExperimentConfig, HamiltonianConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Every table produced by [`run_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentReport {
    pub modes: Vec<ModeRow>,
    pub invariance: Vec<InvarianceRow>,
    pub grid: Vec<GridRow>,
    pub prime_sets: Vec<PrimeSetRow>,
}

/// Energy decomposition of the lowest `min(n_modes, N)` modes.
#[instrument(skip_all, name = "mode_sweep", fields(n_modes = n_modes))]
pub fn mode_sweep(
    config: &HamiltonianConfig,
    n_modes: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<ModeRow>, EngineError> {
    let count = n_modes.min(config.grid.size());
    let phase = reporter.phase("Mode Sweep", count as u64);
    let analyzer = SpectralAnalyzer::new(config.clone())?;

    let mut rows = Vec::with_capacity(count);
    for n in 0..count {
        let decomposition = analyzer.decompose_energy(n)?;
        rows.push(ModeRow::from(&decomposition));
        phase.tick();
    }

    info!(rows = rows.len(), "Mode sweep finished.");
    Ok(rows)
}

/// Shift-invariance of the lowest `min(n_modes, N)` modes under every configured prime.
#[instrument(skip_all, name = "invariance_sweep", fields(n_modes = n_modes))]
pub fn invariance_sweep(
    config: &HamiltonianConfig,
    n_modes: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<InvarianceRow>, EngineError> {
    let count = n_modes.min(config.grid.size());
    let phase = reporter.phase("Invariance Sweep", count as u64);
    let analyzer = SpectralAnalyzer::new(config.clone())?;
    let primes = config.primes.primes();

    let mut rows = Vec::with_capacity(count);
    for n in 0..count {
        let (eigenvalue, _) = analyzer.eigenstate(n)?;
        let invariance = primes
            .iter()
            .map(|&p| analyzer.check_valuation_invariance(n, p).map(|v| (p, v)))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(InvarianceRow {
            mode: n,
            eigenvalue,
            invariance,
        });
        phase.tick();
    }

    info!(rows = rows.len(), "Invariance sweep finished.");
    Ok(rows)
}

/// λ0, λ1 and the mode-1 ratio at each grid size, primes and weights held fixed.
#[instrument(skip_all, name = "grid_sweep", fields(points = grid_sizes.len()))]
pub fn grid_sweep(
    config: &HamiltonianConfig,
    grid_sizes: &[usize],
    reporter: &ProgressReporter,
) -> Result<Vec<GridRow>, EngineError> {
    let phase = reporter.phase("Grid Sweep", grid_sizes.len() as u64);

    #[cfg(not(feature = "parallel"))]
    let iterator = grid_sizes.iter();

    #[cfg(feature = "parallel")]
    let iterator = grid_sizes.par_iter();

    let results: Vec<Result<GridRow, EngineError>> = iterator
        .map(|&grid_size| {
            let row = grid_point(config, grid_size);
            phase.tick();
            row
        })
        .collect();

    let rows = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!(rows = rows.len(), "Grid sweep finished.");
    Ok(rows)
}

fn grid_point(config: &HamiltonianConfig, grid_size: usize) -> Result<GridRow, EngineError> {
    let analyzer = SpectralAnalyzer::new(config.with_grid_size(grid_size)?)?;
    let lowest = analyzer.eigenvalues(2)?;
    let (ground, first) = (lowest[0], lowest[1]);
    let decomposition = analyzer.decompose_energy(1)?;
    Ok(GridRow {
        grid_size,
        period: analyzer.grid().period(),
        ground,
        first,
        ratio: decomposition.analytic_to_valuation_ratio(),
        theoretical_first: analyzer.theoretical_first_mode(),
    })
}

/// Channel split of `mode` for each prime set at unit weights, grid held fixed.
#[instrument(skip_all, name = "prime_set_sweep", fields(points = prime_sets.len(), mode = mode))]
pub fn prime_set_sweep(
    config: &HamiltonianConfig,
    prime_sets: &[Vec<u64>],
    mode: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<PrimeSetRow>, EngineError> {
    let phase = reporter.phase("Prime Set Sweep", prime_sets.len() as u64);

    #[cfg(not(feature = "parallel"))]
    let iterator = prime_sets.iter();

    #[cfg(feature = "parallel")]
    let iterator = prime_sets.par_iter();

    let results: Vec<Result<PrimeSetRow, EngineError>> = iterator
        .map(|primes| {
            let row = config
                .with_primes(primes)
                .and_then(SpectralAnalyzer::new)
                .and_then(|analyzer| analyzer.decompose_energy(mode))
                .map(|decomposition| PrimeSetRow {
                    primes: primes.clone(),
                    ..PrimeSetRow::from(&decomposition)
                });
            phase.tick();
            row
        })
        .collect();

    let rows = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!(rows = rows.len(), "Prime set sweep finished.");
    Ok(rows)
}

/// Runs all four sweeps in sequence.
#[instrument(skip_all, name = "experiments_workflow")]
pub fn run_all(
    config: &ExperimentConfig,
    reporter: &ProgressReporter,
) -> Result<ExperimentReport, EngineError> {
    info!(
        grid_size = config.hamiltonian.grid.size(),
        modes = config.mode_count,
        "Starting experiment suite."
    );
    let modes = mode_sweep(&config.hamiltonian, config.mode_count, reporter)?;
    let invariance = invariance_sweep(&config.hamiltonian, config.mode_count, reporter)?;
    let grid = grid_sweep(&config.hamiltonian, &config.grid_sizes, reporter)?;
    let prime_sets = prime_set_sweep(
        &config.hamiltonian,
        &config.prime_sets,
        config.analysis_mode,
        reporter,
    )?;
    info!("Experiment suite complete.");
    Ok(ExperimentReport {
        modes,
        invariance,
        grid,
        prime_sets,
    })
}
