//! # Bi-Laplacian Core Library
//!
//! Construction and spectral analysis of the bi-Laplacian Hamiltonian
//! `H = L + Σ_p w_p · H_p` on a periodic grid: a discrete second-derivative operator
//! plus one shift-difference penalty per prime.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture to keep concerns separate.
//!
//! - **[`core`]: The Foundation.** Stateless parameter models (`Grid`, `PrimeSet`), pure
//!   operator construction (`build_analytic`, `build_prime_operator`, `build_combined`),
//!   and the `EnergyDecomposition` record.
//!
//! - **[`engine`]: The Logic Core.** The `SpectralAnalyzer`, which diagonalizes the
//!   combined operator once, memoizes the spectrum, and answers per-mode queries such as
//!   energy decomposition and shift invariance. Configuration, errors, and progress
//!   reporting live here as well.
//!
//! - **[`workflows`]: The Public API.** Parameter sweeps over grid size, prime set, and
//!   mode index that compose the engine into reproducible result tables.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bilap::engine::{analyzer::SpectralAnalyzer, config::HamiltonianConfig};
//!
//! let config = HamiltonianConfig::builder().grid_size(100).primes(vec![2, 3]).build()?;
//! let analyzer = SpectralAnalyzer::new(config)?;
//! let energy = analyzer.decompose_energy(1)?;
//! println!("λ1 = {:.6}, analytic = {:.6}", energy.total(), energy.analytic());
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
