//! # Core Models Module
//!
//! This module contains the immutable parameter models that every operator in the
//! library is built from.
//!
//! ## Overview
//!
//! A bi-Laplacian Hamiltonian is fully determined by two inputs: the periodic grid the
//! states live on and the set of primes (with weights) whose shift penalties are added
//! to the analytic Laplacian. The models here validate those inputs once, at
//! construction, so that downstream code can rely on their invariants:
//!
//! - **Grid** - `N ≥ 2` samples on a ring of half-length `T > 0`
//! - **Prime set** - distinct primes, each paired with a finite non-negative weight
//! - **Component identifiers** - typed labels for the addends of the combined operator
//!
//! ## Key Components
//!
//! - [`grid`] - Grid size, half-period, spacing, and the `N → T` mapping
//! - [`primes`] - Validated prime moduli and their weights
//! - [`ids`] - The `ComponentId` label used by energy decompositions
//! - [`error`] - The `ParameterError` raised on malformed input
//!
//! ## Usage
//!
//! ```ignore
//! use bilap::core::models::{grid::Grid, primes::PrimeSet};
//!
//! let grid = Grid::new(100)?;
//! let primes = PrimeSet::new(&[2, 3], None, grid.size())?;
//! ```

pub mod error;
pub mod grid;
pub mod ids;
pub mod primes;
