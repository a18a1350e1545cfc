use super::error::EngineError;
use crate::core::models::grid::{Grid, PeriodMapping};
use crate::core::models::primes::{DEFAULT_PRIMES, PrimeSet};
use thiserror::Error;

pub const DEFAULT_MODE_COUNT: usize = 10;
pub const DEFAULT_GRID_SIZES: [usize; 4] = [50, 100, 200, 400];
pub const DEFAULT_ANALYSIS_MODE: usize = 1;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// A validated grid and prime set; everything needed to assemble one Hamiltonian.
#[derive(Debug, Clone, PartialEq)]
pub struct HamiltonianConfig {
    pub grid: Grid,
    pub primes: PrimeSet,
}

impl HamiltonianConfig {
    pub fn builder() -> HamiltonianConfigBuilder {
        HamiltonianConfigBuilder::new()
    }

    /// Same primes, weights and period mapping on a grid of a different size.
    pub fn with_grid_size(&self, grid_size: usize) -> Result<Self, EngineError> {
        let grid = Grid::with_mapping(grid_size, self.grid.mapping())?;
        let weights = self.primes.weights();
        let primes = PrimeSet::new(&self.primes.primes(), Some(weights.as_slice()), grid_size)?;
        Ok(Self { grid, primes })
    }

    /// Same grid with a different prime set, each prime at unit weight.
    pub fn with_primes(&self, primes: &[u64]) -> Result<Self, EngineError> {
        let primes = PrimeSet::new(primes, None, self.grid.size())?;
        Ok(Self {
            grid: self.grid,
            primes,
        })
    }
}

#[derive(Default)]
pub struct HamiltonianConfigBuilder {
    grid_size: Option<usize>,
    period: Option<f64>,
    primes: Option<Vec<u64>>,
    weights: Option<Vec<f64>>,
}

impl HamiltonianConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_size(mut self, n: usize) -> Self {
        self.grid_size = Some(n);
        self
    }
    /// Overrides the default `T = ln(N)` half-period.
    pub fn period(mut self, period: f64) -> Self {
        self.period = Some(period);
        self
    }
    pub fn period_override(mut self, period: Option<f64>) -> Self {
        self.period = period;
        self
    }
    pub fn primes(mut self, primes: Vec<u64>) -> Self {
        self.primes = Some(primes);
        self
    }
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn build(self) -> Result<HamiltonianConfig, EngineError> {
        let grid_size = self
            .grid_size
            .ok_or(ConfigError::MissingParameter("grid_size"))?;
        let mapping = match self.period {
            Some(period) => PeriodMapping::Fixed(period),
            None => PeriodMapping::Logarithmic,
        };
        let grid = Grid::with_mapping(grid_size, mapping)?;
        let primes = self.primes.unwrap_or_else(|| DEFAULT_PRIMES.to_vec());
        let primes = PrimeSet::new(&primes, self.weights.as_deref(), grid_size)?;
        Ok(HamiltonianConfig { grid, primes })
    }
}

/// Sweep parameters shared by the experiment workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub hamiltonian: HamiltonianConfig,
    pub mode_count: usize,
    pub grid_sizes: Vec<usize>,
    pub prime_sets: Vec<Vec<u64>>,
    pub analysis_mode: usize,
}

#[derive(Default)]
pub struct ExperimentConfigBuilder {
    hamiltonian: Option<HamiltonianConfig>,
    mode_count: Option<usize>,
    grid_sizes: Option<Vec<usize>>,
    prime_sets: Option<Vec<Vec<u64>>>,
    analysis_mode: Option<usize>,
}

impl ExperimentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hamiltonian(mut self, config: HamiltonianConfig) -> Self {
        self.hamiltonian = Some(config);
        self
    }
    pub fn mode_count(mut self, count: usize) -> Self {
        self.mode_count = Some(count);
        self
    }
    pub fn grid_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.grid_sizes = Some(sizes);
        self
    }
    pub fn prime_sets(mut self, sets: Vec<Vec<u64>>) -> Self {
        self.prime_sets = Some(sets);
        self
    }
    pub fn analysis_mode(mut self, mode: usize) -> Self {
        self.analysis_mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<ExperimentConfig, ConfigError> {
        Ok(ExperimentConfig {
            hamiltonian: self
                .hamiltonian
                .ok_or(ConfigError::MissingParameter("hamiltonian"))?,
            mode_count: self.mode_count.unwrap_or(DEFAULT_MODE_COUNT),
            grid_sizes: self
                .grid_sizes
                .unwrap_or_else(|| DEFAULT_GRID_SIZES.to_vec()),
            prime_sets: self
                .prime_sets
                .unwrap_or_else(|| vec![vec![2, 3], vec![2, 3, 5], vec![2, 3, 5, 7]]),
            analysis_mode: self.analysis_mode.unwrap_or(DEFAULT_ANALYSIS_MODE),
        })
    }
}
