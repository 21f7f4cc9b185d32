//! Small dense linear-algebra helpers shared by the simplex solver and the
//! basis-inverse strategies.

use faer::{Col, ColRef, Mat, unzip, zip};

use crate::E;

/// Extracts column `j` of a dense matrix as an owned column vector.
pub(crate) fn column(mat: &Mat<E>, j: usize) -> Col<E> {
    Col::from_fn(mat.nrows(), |i| mat[(i, j)])
}

/// Computes `c^T * mat`, i.e. a row vector times a matrix, returned as a column
/// vector of the same length as `mat`'s columns.
pub(crate) fn left_mul(c: &Col<E>, mat: &Mat<E>) -> Col<E> {
    let m = mat.nrows();
    let n = mat.ncols();
    Col::from_fn(n, |k| {
        let mut total = E::from(0.);
        for i in 0..m {
            total += c[i] * mat[(i, k)];
        }
        total
    })
}

/// Dot product of two column vectors of equal length.
pub(crate) fn dot<'a>(x1: ColRef<'a, E>, x2: ColRef<'a, E>) -> E {
    let mut total = E::from(0.);
    zip!(x1, x2).for_each(|unzip!(x1, x2)| total += *x1 * *x2);
    total
}

/// True when every entry of `x` is at or below zero, within tolerance.
pub(crate) fn is_col_nonpositive<'a>(x: ColRef<'a, E>, tol: E) -> bool {
    let mut res = true;
    zip!(x).for_each(|unzip!(x)| {
        if *x > tol {
            res = false;
        }
    });
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_mul_matches_manual_row_times_matrix() {
        let c = Col::from_fn(2, |i| [2.0, 3.0][i]);
        let mat = Mat::from_fn(2, 2, |i, j| [[1.0, 0.0], [0.0, 1.0]][i][j]);
        let w = left_mul(&c, &mat);
        assert_eq!(w[0], 2.0);
        assert_eq!(w[1], 3.0);
    }

    #[test]
    fn dot_computes_inner_product() {
        let x1 = Col::from_fn(3, |i| [1.0, 2.0, 3.0][i]);
        let x2 = Col::from_fn(3, |i| [4.0, 5.0, 6.0][i]);
        assert_eq!(dot(x1.as_ref(), x2.as_ref()), 32.0);
    }

    #[test]
    fn is_col_nonpositive_detects_a_positive_entry() {
        let x = Col::from_fn(3, |i| [-1.0, 0.0, 0.2][i]);
        assert!(!is_col_nonpositive(x.as_ref(), 1e-9));
        let y = Col::from_fn(3, |i| [-1.0, 0.0, -0.2][i]);
        assert!(is_col_nonpositive(y.as_ref(), 1e-9));
    }
}
