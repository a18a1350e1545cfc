//! # Core Module
//!
//! This module provides the stateless building blocks of the library: validated
//! parameter models, deterministic operator construction, and the energy-accounting
//! record produced for each eigenmode.
//!
//! ## Overview
//!
//! Nothing in `core` diagonalizes or caches anything. Given a grid and a prime set it
//! assembles the periodic Laplacian, one shift-difference penalty per prime, and their
//! weighted sum, keeping every addend so that energies can later be attributed to the
//! part of the operator that produced them.
//!
//! ## Architecture
//!
//! - **Parameter Models** ([`models`]) - Grid, prime set, component identifiers, errors
//! - **Operator Construction** ([`operators`]) - Analytic, shift, prime, and combined operators
//! - **Energy Accounting** ([`decomposition`]) - Per-mode split of energy across addends
//!
//! ## Numerical Conventions
//!
//! - Grid spacing is `Δ = 2T/N` and the Laplacian couples cyclic neighbours with `-1/Δ²`
//! - The prime penalty is `(S_p − I)ᵗ(S_p − I) / (ln p)²` with `(S_p ψ)[i] = ψ[(i+p) mod N]`
//! - Every addend annihilates constant vectors exactly, not merely to rounding error

pub mod decomposition;
pub mod models;
pub mod operators;
