//! Dense basis-matrix inversion via Gauss-Jordan elimination with partial pivoting.
//!
//! The simplex solver keeps its basis inverse explicitly, either by refactoring
//! from scratch (see [`crate::simplex::basis::ExplicitReinversion`]) or by a
//! product-form eta update (see [`crate::simplex::basis::EtaUpdate`]). Both
//! strategies bottom out in [`invert_dense`] for the pieces that need a true
//! inverse: the initial identity basis never needs it, but a re-inversion does.
//!
//! ## Example
//! ```
//! use faer::Mat;
//! use pivot::linalg::lu::invert_dense;
//!
//! let m = Mat::from_fn(2, 2, |i, j| [[4.0, 3.0], [6.0, 3.0]][i][j]);
//! let inv = invert_dense(&m).unwrap();
//! let identity = &m * &inv;
//! assert!((identity[(0, 0)] - 1.0).abs() < 1e-9);
//! ```

use faer::Mat;
use problemo::Problem;
use problemo::common::IntoCommonProblem;

use crate::E;
use crate::error::NumericalError;

/// Inverts a square dense matrix with Gauss-Jordan elimination and partial pivoting.
///
/// Returns [`NumericalError::RankDeficient`] (wrapped in a [`Problem`]) if no
/// pivot above a small tolerance can be found in some column, i.e. the matrix
/// is singular to working precision.
pub fn invert_dense(mat: &Mat<E>) -> Result<Mat<E>, Problem> {
    let m = mat.nrows();
    debug_assert_eq!(m, mat.ncols(), "basis matrix must be square");

    let mut aug = Mat::<E>::zeros(m, 2 * m);
    for i in 0..m {
        for j in 0..m {
            aug[(i, j)] = mat[(i, j)];
        }
        aug[(i, m + i)] = 1.0;
    }

    for col in 0..m {
        let mut pivot_row = col;
        let mut pivot_val = aug[(col, col)].abs();
        for row in (col + 1)..m {
            let candidate = aug[(row, col)].abs();
            if candidate > pivot_val {
                pivot_val = candidate;
                pivot_row = row;
            }
        }
        if pivot_val < 1e-11 {
            return Err(NumericalError::RankDeficient.to_string().gloss());
        }
        if pivot_row != col {
            for j in 0..(2 * m) {
                let tmp = aug[(col, j)];
                aug[(col, j)] = aug[(pivot_row, j)];
                aug[(pivot_row, j)] = tmp;
            }
        }

        let pivot = aug[(col, col)];
        for j in 0..(2 * m) {
            aug[(col, j)] /= pivot;
        }

        for row in 0..m {
            if row == col {
                continue;
            }
            let factor = aug[(row, col)];
            if factor != 0.0 {
                for j in 0..(2 * m) {
                    aug[(row, j)] -= factor * aug[(col, j)];
                }
            }
        }
    }

    let mut inv = Mat::<E>::zeros(m, m);
    for i in 0..m {
        for j in 0..m {
            inv[(i, j)] = aug[(i, m + j)];
        }
    }
    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverts_a_well_conditioned_matrix() {
        let mat = Mat::from_fn(3, 3, |i, j| {
            [[2.0, 0.0, 0.0], [1.0, 3.0, 0.0], [0.0, -1.0, 4.0]][i][j]
        });
        let inv = invert_dense(&mat).unwrap();
        let product = &mat * &inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product[(i, j)] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn requires_partial_pivoting() {
        let mat = Mat::from_fn(2, 2, |i, j| [[0.0, 1.0], [1.0, 1.0]][i][j]);
        let inv = invert_dense(&mat).unwrap();
        let product = &mat * &inv;
        assert!((product[(0, 0)] - 1.0).abs() < 1e-9);
        assert!((product[(1, 1)] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_a_singular_matrix() {
        let mat = Mat::from_fn(2, 2, |i, j| [[1.0, 2.0], [2.0, 4.0]][i][j]);
        assert!(invert_dense(&mat).is_err());
    }
}
