//! # Workflows Module
//!
//! This module composes the engine into reproducible experiments. Each workflow holds
//! every parameter fixed except the one it sweeps, builds a fresh
//! [`SpectralAnalyzer`](crate::engine::analyzer::SpectralAnalyzer) per sweep point,
//! and returns one table row per point.
//!
//! ## Architecture
//!
//! - **Experiments** ([`experiments`]) - Mode, invariance, grid-size, and prime-set sweeps
//! - **Tables** ([`tables`]) - Row types and CSV export over any `io::Write` sink
//!
//! ## Reproducibility
//!
//! Every row can be recomputed on its own from the configuration that produced it:
//! a mode row is `decompose_energy(n)`, an invariance cell is
//! `check_valuation_invariance(n, p)`. Row order always follows input order, also
//! when sweep points are evaluated in parallel.

pub mod experiments;
pub mod tables;
