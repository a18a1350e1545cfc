use crate::core::models::grid::Grid;
use nalgebra::DMatrix;

/// Builds the periodic three-point Laplacian `-(ψ[i-1] - 2ψ[i] + ψ[i+1]) / Δ²`.
///
/// The stencil wraps cyclically at both ends of the grid. When the two neighbours of a
/// sample coincide (`N = 2`) their couplings accumulate, so every row still sums to zero.
pub fn build_analytic(grid: &Grid) -> DMatrix<f64> {
    let n = grid.size();
    let h = grid.spacing();
    let coupling = 1.0 / (h * h);

    let mut laplacian = DMatrix::zeros(n, n);
    for i in 0..n {
        laplacian[(i, i)] += 2.0 * coupling;
        laplacian[(i, (i + 1) % n)] -= coupling;
        laplacian[(i, (i + n - 1) % n)] -= coupling;
    }
    laplacian
}
