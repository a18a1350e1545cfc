//! # Operators Module
//!
//! Deterministic construction of the dense symmetric matrices that make up the
//! bi-Laplacian Hamiltonian
//!
//! ```text
//! H = L + Σ_p w_p · H_p,    H_p = (S_p − I)ᵗ(S_p − I) / (ln p)²
//! ```
//!
//! where `L` is the periodic three-point Laplacian on the grid and `S_p` is the cyclic
//! shift by `p` positions.
//!
//! ## Key Components
//!
//! - [`analytic`] - The periodic discrete Laplacian
//! - [`shift`] - The cyclic shift permutation, as a matrix and as a vector operation
//! - [`prime`] - The per-prime shift-difference penalty
//! - [`combined`] - The weighted sum, retaining every labeled addend for decomposition
//!
//! Every addend has rows summing to exactly zero in floating point, so an exactly
//! constant vector is annihilated by each of them without rounding residue.

pub mod analytic;
pub mod combined;
pub mod prime;
pub mod shift;

use nalgebra::{DMatrix, DVector};

/// Evaluates `ψᵗ A ψ`.
#[inline]
pub fn quadratic_form(matrix: &DMatrix<f64>, psi: &DVector<f64>) -> f64 {
    psi.dot(&(matrix * psi))
}

/// Largest absolute difference between mirrored off-diagonal entries.
pub fn max_asymmetry(matrix: &DMatrix<f64>) -> f64 {
    let n = matrix.nrows().min(matrix.ncols());
    let mut worst: f64 = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            worst = worst.max((matrix[(i, j)] - matrix[(j, i)]).abs());
        }
    }
    worst
}
