use super::shift::shift_matrix;
use crate::core::models::error::ParameterError;
use crate::core::models::primes::validate_modulus;
use nalgebra::DMatrix;

/// Builds `H_p = (S_p − I)ᵗ(S_p − I) / (ln p)²` on a ring of `size` samples.
///
/// `prime` must be a prime strictly smaller than `size`; a larger modulus wraps the
/// shift around the ring and no longer measures the intended displacement.
pub fn build_prime_operator(size: usize, prime: u64) -> Result<DMatrix<f64>, ParameterError> {
    validate_modulus(prime, size)?;

    let difference = shift_matrix(size, prime) - DMatrix::<f64>::identity(size, size);
    let gram = difference.transpose() * &difference;
    let log_p = (prime as f64).ln();

    Ok(gram / (log_p * log_p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operators::max_asymmetry;
    use nalgebra::{DVector, SymmetricEigen};

    #[test]
    fn build_prime_operator_has_expected_stencil() {
        let h2 = build_prime_operator(7, 2).unwrap();
        let scale = 1.0 / 2f64.ln().powi(2);
        for i in 0..7 {
            assert!((h2[(i, i)] - 2.0 * scale).abs() < 1e-15);
            assert!((h2[(i, (i + 2) % 7)] + scale).abs() < 1e-15);
            assert!((h2[(i, (i + 5) % 7)] + scale).abs() < 1e-15);
            assert_eq!(h2[(i, (i + 1) % 7)], 0.0);
        }
    }

    #[test]
    fn build_prime_operator_is_symmetric_and_positive_semidefinite() {
        let h3 = build_prime_operator(20, 3).unwrap();
        assert_eq!(max_asymmetry(&h3), 0.0);
        let eigen = SymmetricEigen::new(h3);
        assert!(eigen.eigenvalues.iter().all(|&v| v > -1e-12));
    }

    #[test]
    fn rows_sum_to_exactly_zero() {
        for (n, p) in [(4, 2), (6, 3), (50, 7), (100, 97)] {
            let hp = build_prime_operator(n, p).unwrap();
            let ones = DVector::from_element(n, 1.0);
            assert!((&hp * &ones).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn half_ring_shift_doubles_off_diagonal() {
        // p = N/2 makes the forward and backward neighbours coincide.
        let h2 = build_prime_operator(4, 2).unwrap();
        let scale = 1.0 / 2f64.ln().powi(2);
        assert!((h2[(0, 2)] + 2.0 * scale).abs() < 1e-15);
    }

    #[test]
    fn build_prime_operator_rejects_invalid_moduli() {
        assert_eq!(
            build_prime_operator(10, 11).unwrap_err(),
            ParameterError::PrimeOutOfRange {
                prime: 11,
                grid_size: 10
            }
        );
        assert_eq!(
            build_prime_operator(10, 9).unwrap_err(),
            ParameterError::NotPrime(9)
        );
        assert_eq!(
            build_prime_operator(10, 0).unwrap_err(),
            ParameterError::NotPrime(0)
        );
    }
}
