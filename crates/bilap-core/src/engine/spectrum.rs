use super::error::EngineError;
use crate::core::operators::max_asymmetry;
use nalgebra::{DMatrix, DVector, DVectorView, SymmetricEigen};
use tracing::{debug, instrument, warn};

/// Relative bound on `|H_ij − H_ji|`; anything larger would surface as imaginary parts.
pub const SYMMETRY_TOLERANCE: f64 = 1e-12;
/// Relative bound on `‖Hψ − λψ‖` for every eigenpair.
pub const RESIDUAL_TOLERANCE: f64 = 1e-8;
/// Absolute bound on `|‖ψ‖ − 1|` for every eigenvector.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-8;

const QR_ITERATIONS_PER_ROW: usize = 1000;
const JACOBI_MAX_SWEEPS: usize = 50;

/// Eigenvalues in ascending order with their unit eigenvectors stored as columns.
#[derive(Debug, Clone)]
pub struct Spectrum {
    eigenvalues: Vec<f64>,
    eigenvectors: DMatrix<f64>,
}

impl Spectrum {
    /// Diagonalizes a real symmetric matrix and validates the result.
    ///
    /// nalgebra's implicit QR supplies an orthonormal starting basis only. Its
    /// eigenvectors are unreliable inside the degenerate pairs of circulant operators,
    /// so the matrix is projected onto that basis and finished with cyclic Jacobi
    /// rotations, which converge in a sweep or two when the basis is already good.
    ///
    /// Eigenvectors are sign-normalized so that their largest-magnitude entry is
    /// positive, which makes repeated runs reproduce identical vectors.
    #[instrument(skip_all, name = "diagonalize", fields(size = matrix.nrows()))]
    pub fn from_symmetric(matrix: &DMatrix<f64>) -> Result<Self, EngineError> {
        let n = matrix.nrows();
        if n == 0 || matrix.ncols() != n {
            return Err(EngineError::NumericalInstability(format!(
                "expected a non-empty square matrix, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::NumericalInstability(
                "operator contains non-finite entries".to_string(),
            ));
        }

        let scale = matrix.amax().max(1.0);
        let asymmetry = max_asymmetry(matrix);
        if asymmetry > SYMMETRY_TOLERANCE * scale {
            warn!(asymmetry, "Operator is not symmetric; refusing to diagonalize.");
            return Err(EngineError::NumericalInstability(format!(
                "operator asymmetry {:.3e} exceeds tolerance; eigenvalues would not be real",
                asymmetry
            )));
        }

        let mut basis = match SymmetricEigen::try_new(
            matrix.clone(),
            f64::EPSILON,
            QR_ITERATIONS_PER_ROW * n.max(10),
        ) {
            Some(eigen) => eigen.eigenvectors.qr().q(),
            None => {
                debug!("Implicit QR did not converge; starting Jacobi from the identity.");
                DMatrix::identity(n, n)
            }
        };
        let projected = basis.transpose() * (matrix * &basis);
        let mut reduced = (&projected + projected.transpose()) * 0.5;
        let sweeps = jacobi_diagonalize(&mut reduced, &mut basis).ok_or_else(|| {
            EngineError::NumericalInstability(format!(
                "Jacobi rotations did not converge within {} sweeps",
                JACOBI_MAX_SWEEPS
            ))
        })?;
        debug!(sweeps, "Jacobi refinement converged.");

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| reduced[(a, a)].total_cmp(&reduced[(b, b)]));

        let eigenvalues: Vec<f64> = order.iter().map(|&i| reduced[(i, i)]).collect();
        let mut eigenvectors = DMatrix::from_fn(n, n, |r, c| basis[(r, order[c])]);
        for mut column in eigenvectors.column_iter_mut() {
            let pivot = column.iamax();
            if column[pivot] < 0.0 {
                column.neg_mut();
            }
        }

        let spectrum = Self {
            eigenvalues,
            eigenvectors,
        };
        spectrum.validate_against(matrix, scale)?;

        debug!(
            ground = spectrum.eigenvalues[0],
            top = spectrum.eigenvalues[n - 1],
            "Spectrum computed."
        );
        Ok(spectrum)
    }

    fn validate_against(&self, matrix: &DMatrix<f64>, scale: f64) -> Result<(), EngineError> {
        if let Some(bad) = self.eigenvalues.iter().position(|v| !v.is_finite()) {
            return Err(EngineError::NumericalInstability(format!(
                "eigenvalue {} is not finite",
                bad
            )));
        }

        let images = matrix * &self.eigenvectors;
        for (n, &lambda) in self.eigenvalues.iter().enumerate() {
            let psi = self.eigenvectors.column(n);
            let norm_error = (psi.norm() - 1.0).abs();
            if norm_error > NORMALIZATION_TOLERANCE {
                return Err(EngineError::NumericalInstability(format!(
                    "eigenvector {} has norm error {:.3e}",
                    n, norm_error
                )));
            }
            let residual = (images.column(n) - psi * lambda).norm();
            if residual > RESIDUAL_TOLERANCE * scale {
                return Err(EngineError::NumericalInstability(format!(
                    "eigenpair {} has residual {:.3e}",
                    n, residual
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// The first `min(count, len)` eigenvalues.
    pub fn lowest(&self, count: usize) -> &[f64] {
        &self.eigenvalues[..count.min(self.len())]
    }

    pub fn eigenvalue(&self, n: usize) -> Option<f64> {
        self.eigenvalues.get(n).copied()
    }

    pub fn eigenvector(&self, n: usize) -> Option<DVectorView<'_, f64>> {
        (n < self.len()).then(|| self.eigenvectors.column(n))
    }

    pub fn eigenvector_owned(&self, n: usize) -> Option<DVector<f64>> {
        self.eigenvector(n).map(|v| v.clone_owned())
    }

    pub fn eigenvectors(&self) -> &DMatrix<f64> {
        &self.eigenvectors
    }

    pub fn ground_energy(&self) -> f64 {
        self.eigenvalues[0]
    }

    /// `λ1 − λ0`, or `None` for a one-dimensional spectrum.
    pub fn gap(&self) -> Option<f64> {
        (self.len() >= 2).then(|| self.eigenvalues[1] - self.eigenvalues[0])
    }
}

/// Cyclic Jacobi rotations on the symmetric matrix `a` until every off-diagonal
/// entry is negligible against its Frobenius norm. Each rotation is also applied
/// to the columns of `basis`. Returns the number of sweeps performed, or `None`
/// if the sweep limit is reached first.
fn jacobi_diagonalize(a: &mut DMatrix<f64>, basis: &mut DMatrix<f64>) -> Option<usize> {
    let n = a.nrows();
    let negligible = f64::EPSILON * a.norm() / n as f64;
    // Column-major storage: entry (row r, column c) lives at c * n + r.
    let a = a.as_mut_slice();
    let v = basis.as_mut_slice();

    for sweep in 0..JACOBI_MAX_SWEEPS {
        let converged = (1..n).all(|q| a[q * n..q * n + q].iter().all(|x| x.abs() <= negligible));
        if converged {
            return Some(sweep);
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[q * n + p];
                if apq.abs() <= negligible {
                    a[q * n + p] = 0.0;
                    a[p * n + q] = 0.0;
                    continue;
                }

                let theta = 0.5 * (a[q * n + q] - a[p * n + p]) / apq;
                let t = theta.signum() / (theta.abs() + theta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let s = t * c;
                let tau = s / (1.0 + c);

                a[p * n + p] -= t * apq;
                a[q * n + q] += t * apq;
                a[q * n + p] = 0.0;
                a[p * n + q] = 0.0;

                for r in (0..n).filter(|&r| r != p && r != q) {
                    let g = a[p * n + r];
                    let h = a[q * n + r];
                    let rp = g - s * (h + g * tau);
                    let rq = h + s * (g - h * tau);
                    a[p * n + r] = rp;
                    a[r * n + p] = rp;
                    a[q * n + r] = rq;
                    a[r * n + q] = rq;
                }

                let (left, right) = v.split_at_mut(q * n);
                let column_p = &mut left[p * n..(p + 1) * n];
                let column_q = &mut right[..n];
                for (g, h) in column_p.iter_mut().zip(column_q.iter_mut()) {
                    let (vp, vq) = (*g, *h);
                    *g = vp - s * (vq + vp * tau);
                    *h = vq + s * (vp - vq * tau);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grid::Grid;
    use crate::core::models::primes::PrimeSet;
    use crate::core::operators::combined::build_combined;

    fn ring(n: usize, primes: &[u64]) -> DMatrix<f64> {
        let grid = Grid::new(n).unwrap();
        let primes = PrimeSet::new(primes, None, n).unwrap();
        build_combined(&grid, &primes).unwrap().matrix().clone()
    }

    #[test]
    fn from_symmetric_sorts_eigenvalues_ascending() {
        let matrix = DMatrix::from_diagonal(&DVector::from_vec(vec![3.0, -1.0, 2.0, 0.5]));
        let spectrum = Spectrum::from_symmetric(&matrix).unwrap();
        for (got, want) in spectrum.eigenvalues().iter().zip([-1.0, 0.5, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-12);
        }
        let v0 = spectrum.eigenvector(0).unwrap();
        assert!((v0[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn eigenvectors_are_unit_and_sign_normalized() {
        let matrix = DMatrix::from_row_slice(3, 3, &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0]);
        let spectrum = Spectrum::from_symmetric(&matrix).unwrap();
        for n in 0..3 {
            let v = spectrum.eigenvector(n).unwrap();
            assert!((v.norm() - 1.0).abs() < 1e-12);
            let pivot = v.iamax();
            assert!(v[pivot] > 0.0);
        }
    }

    #[test]
    fn lowest_clamps_to_spectrum_length() {
        let matrix = DMatrix::<f64>::identity(3, 3);
        let spectrum = Spectrum::from_symmetric(&matrix).unwrap();
        assert_eq!(spectrum.lowest(0).len(), 0);
        assert_eq!(spectrum.lowest(2).len(), 2);
        assert_eq!(spectrum.lowest(10).len(), 3);
        assert!(spectrum.eigenvector(3).is_none());
        assert_eq!(spectrum.eigenvalue(3), None);
    }

    #[test]
    fn asymmetric_matrix_is_reported_as_instability() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 0.0, 1.0]);
        let err = Spectrum::from_symmetric(&matrix).unwrap_err();
        assert!(err.is_numerical_instability());
    }

    #[test]
    fn non_finite_entries_are_reported_as_instability() {
        let mut matrix = DMatrix::<f64>::identity(3, 3);
        matrix[(1, 1)] = f64::NAN;
        assert!(Spectrum::from_symmetric(&matrix)
            .unwrap_err()
            .is_numerical_instability());
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let matrix = DMatrix::<f64>::zeros(2, 3);
        assert!(Spectrum::from_symmetric(&matrix).is_err());
    }

    #[test]
    fn gap_is_difference_of_lowest_two() {
        let matrix = DMatrix::from_diagonal(&DVector::from_vec(vec![0.0, 4.0, 1.5]));
        let spectrum = Spectrum::from_symmetric(&matrix).unwrap();
        assert!((spectrum.gap().unwrap() - 1.5).abs() < 1e-12);
        assert!(spectrum.ground_energy().abs() < 1e-12);
    }

    #[test]
    fn jacobi_diagonalizes_from_identity_basis() {
        let original =
            DMatrix::from_row_slice(3, 3, &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0]);
        let mut a = original.clone();
        let mut basis = DMatrix::identity(3, 3);
        let sweeps = jacobi_diagonalize(&mut a, &mut basis).unwrap();
        assert!(sweeps > 0);

        let mut diagonal: Vec<f64> = a.diagonal().iter().copied().collect();
        diagonal.sort_by(f64::total_cmp);
        let root2 = 2f64.sqrt();
        for (got, want) in diagonal.iter().zip([2.0 - root2, 2.0, 2.0 + root2]) {
            assert!((got - want).abs() < 1e-12, "{} vs {}", got, want);
        }
        let restored = &basis * DMatrix::from_diagonal(&a.diagonal()) * basis.transpose();
        assert!((restored - original).amax() < 1e-12);
    }

    #[test]
    fn jacobi_stops_immediately_on_diagonal_input() {
        let mut a = DMatrix::from_diagonal(&DVector::from_vec(vec![1.0, 5.0, -2.0]));
        let mut basis = DMatrix::identity(3, 3);
        assert_eq!(jacobi_diagonalize(&mut a, &mut basis), Some(0));
        assert_eq!(basis, DMatrix::identity(3, 3));
    }

    #[test]
    fn degenerate_circulant_spectra_pass_validation() {
        for n in [2, 3, 10, 20, 30, 50, 64, 100, 101, 150] {
            let primes: Vec<u64> = [2, 3].into_iter().filter(|&p| p < n as u64).collect();
            let spectrum = Spectrum::from_symmetric(&ring(n, &primes)).unwrap();
            assert_eq!(spectrum.len(), n);
            assert!(spectrum.ground_energy().abs() < 1e-10, "N={}", n);
        }
    }

    #[test]
    fn reference_ring_keeps_first_excited_pair_degenerate() {
        let spectrum = Spectrum::from_symmetric(&ring(100, &[2, 3])).unwrap();
        let values = spectrum.eigenvalues();
        assert!((values[1] - 0.5274033).abs() < 1e-5, "λ1 = {}", values[1]);
        assert!((values[2] - values[1]).abs() < 1e-10);
        assert!(values[3] > values[2] + 1e-3);
    }

    #[test]
    fn large_ring_passes_residual_checks() {
        let matrix = ring(400, &[2, 3]);
        let spectrum = Spectrum::from_symmetric(&matrix).unwrap();
        let lambda = DMatrix::from_diagonal(&DVector::from_column_slice(spectrum.eigenvalues()));
        let vectors = spectrum.eigenvectors();
        let residual = (&matrix * vectors - vectors * lambda).amax();
        assert!(residual < RESIDUAL_TOLERANCE * matrix.amax());
    }
}
