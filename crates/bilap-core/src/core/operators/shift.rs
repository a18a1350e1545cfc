use nalgebra::{DMatrix, DVector};

/// Permutation matrix `S_p` with `(S_p ψ)[i] = ψ[(i + p) mod N]`.
pub fn shift_matrix(size: usize, shift: u64) -> DMatrix<f64> {
    let offset = (shift % size as u64) as usize;
    let mut matrix = DMatrix::zeros(size, size);
    for i in 0..size {
        matrix[(i, (i + offset) % size)] = 1.0;
    }
    matrix
}

/// Applies `S_p` to a vector without materializing the permutation.
pub fn apply_shift(psi: &DVector<f64>, shift: u64) -> DVector<f64> {
    let size = psi.len();
    if size == 0 {
        return psi.clone();
    }
    let offset = (shift % size as u64) as usize;
    DVector::from_fn(size, |i, _| psi[(i + offset) % size])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_matrix_rolls_indices_backwards() {
        let s2 = shift_matrix(10, 2);
        let v = DVector::from_fn(10, |i, _| i as f64);
        let shifted = &s2 * &v;
        let expected: Vec<f64> = [2, 3, 4, 5, 6, 7, 8, 9, 0, 1]
            .iter()
            .map(|&x| x as f64)
            .collect();
        assert_eq!(shifted.as_slice(), expected.as_slice());
    }

    #[test]
    fn apply_shift_matches_matrix_product() {
        let v = DVector::from_fn(13, |i, _| (i as f64).sin());
        for p in [2, 3, 5, 7, 11] {
            assert_eq!(apply_shift(&v, p), &shift_matrix(13, p) * &v);
        }
    }

    #[test]
    fn shift_matrix_is_a_permutation() {
        let s = shift_matrix(9, 5);
        for row in s.row_iter() {
            assert_eq!(row.sum(), 1.0);
        }
        for col in s.column_iter() {
            assert_eq!(col.sum(), 1.0);
        }
    }

    #[test]
    fn shift_by_grid_size_is_identity() {
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(apply_shift(&v, 3), v);
        assert_eq!(shift_matrix(3, 3), DMatrix::identity(3, 3));
    }
}
