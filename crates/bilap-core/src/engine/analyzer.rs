use super::config::HamiltonianConfig;
use super::error::EngineError;
use super::spectrum::Spectrum;
use super::tasks::{energy_decomposition, valuation_invariance};
use crate::core::decomposition::EnergyDecomposition;
use crate::core::models::grid::Grid;
use crate::core::models::primes::{PrimeSet, validate_modulus};
use crate::core::operators::combined::{CombinedOperator, build_combined};
use nalgebra::DVector;
use once_cell::sync::OnceCell;
use tracing::{info, instrument};

/// Owns one assembled Hamiltonian and lazily computes its full spectrum.
///
/// The spectrum is computed at most once, on the first query that needs it, and
/// reused afterwards. A failed diagonalization caches nothing, and a query with
/// bad arguments leaves an already cached spectrum untouched.
#[derive(Debug)]
pub struct SpectralAnalyzer {
    config: HamiltonianConfig,
    operator: CombinedOperator,
    spectrum: OnceCell<Spectrum>,
}

impl SpectralAnalyzer {
    #[instrument(skip_all, name = "analyzer_new", fields(grid_size = config.grid.size()))]
    pub fn new(config: HamiltonianConfig) -> Result<Self, EngineError> {
        let operator = build_combined(&config.grid, &config.primes)?;
        info!(
            period = config.grid.period(),
            primes = ?config.primes.primes(),
            "Hamiltonian assembled."
        );
        Ok(Self {
            config,
            operator,
            spectrum: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &HamiltonianConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.config.grid
    }

    pub fn primes(&self) -> &PrimeSet {
        &self.config.primes
    }

    pub fn operator(&self) -> &CombinedOperator {
        &self.operator
    }

    pub fn size(&self) -> usize {
        self.config.grid.size()
    }

    pub fn is_diagonalized(&self) -> bool {
        self.spectrum.get().is_some()
    }

    /// The full spectrum, diagonalizing on first use.
    pub fn spectrum(&self) -> Result<&Spectrum, EngineError> {
        self.spectrum
            .get_or_try_init(|| Spectrum::from_symmetric(self.operator.matrix()))
    }

    /// The lowest `min(count, N)` eigenvalues in ascending order.
    pub fn eigenvalues(&self, count: usize) -> Result<&[f64], EngineError> {
        Ok(self.spectrum()?.lowest(count))
    }

    /// Eigenvalue and unit eigenvector of mode `n`.
    pub fn eigenstate(&self, n: usize) -> Result<(f64, DVector<f64>), EngineError> {
        let spectrum = self.spectrum()?;
        match (spectrum.eigenvalue(n), spectrum.eigenvector_owned(n)) {
            (Some(value), Some(vector)) => Ok((value, vector)),
            _ => Err(EngineError::IndexOutOfRange {
                index: n,
                len: spectrum.len(),
            }),
        }
    }

    /// Mode `n` sampled on the grid as `(x_i, ψ_i)` pairs.
    pub fn eigenstate_series(&self, n: usize) -> Result<Vec<(f64, f64)>, EngineError> {
        let (_, psi) = self.eigenstate(n)?;
        Ok(self
            .config
            .grid
            .coordinates()
            .into_iter()
            .zip(psi.iter().copied())
            .collect())
    }

    #[instrument(skip(self), name = "decompose_energy")]
    pub fn decompose_energy(&self, n: usize) -> Result<EnergyDecomposition, EngineError> {
        let (eigenvalue, psi) = self.eigenstate(n)?;
        Ok(energy_decomposition::run(&self.operator, &psi, n, eigenvalue))
    }

    /// `‖S_p ψ_n − ψ_n‖ / ‖ψ_n‖` for mode `n`. `prime` must be a prime below the grid size.
    #[instrument(skip(self), name = "check_valuation_invariance")]
    pub fn check_valuation_invariance(&self, n: usize, prime: u64) -> Result<f64, EngineError> {
        validate_modulus(prime, self.size())?;
        let (_, psi) = self.eigenstate(n)?;
        Ok(valuation_invariance::run(&psi, prime))
    }

    /// `(π/T)²`, the continuum first excited eigenvalue of the analytic part.
    pub fn theoretical_first_mode(&self) -> f64 {
        self.config.grid.theoretical_first_mode()
    }

    /// `λ1 − λ0`.
    pub fn spectral_gap(&self) -> Result<f64, EngineError> {
        let spectrum = self.spectrum()?;
        spectrum.gap().ok_or(EngineError::IndexOutOfRange {
            index: 1,
            len: spectrum.len(),
        })
    }
}
