//! # Engine Module
//!
//! This module turns an assembled Hamiltonian into answers: eigenvalues, eigenvectors,
//! per-mode energy decompositions, and shift-invariance measurements.
//!
//! ## Overview
//!
//! The [`SpectralAnalyzer`](analyzer::SpectralAnalyzer) owns one combined operator and
//! diagonalizes it lazily. The full spectrum is computed on the first query, validated
//! for symmetry, finiteness, eigenpair residuals, and eigenvector normalization, and then
//! memoized so that every later query is a lookup plus a cheap task.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Builders for Hamiltonian and sweep parameters
//! - **Spectrum** ([`spectrum`]) - Sorted, sign-normalized, validated eigendecomposition
//! - **Analyzer** ([`analyzer`]) - Memoized spectrum plus per-mode queries
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Parameter, configuration, and numerical failures
//!
//! ## Failure Semantics
//!
//! - Invalid grid sizes, moduli, weights, and mode indices surface as parameter errors
//! - A diagonalization that fails validation surfaces as a numerical instability and
//!   leaves no spectrum cached, so a later query retries from scratch
//! - A rejected query never disturbs an already cached spectrum

pub mod analyzer;
pub mod config;
pub mod error;
pub mod progress;
pub mod spectrum;
pub(crate) mod tasks;
