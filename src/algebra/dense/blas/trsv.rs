#![allow(non_snake_case)]
use super::level1::{strided_index, strided_len};
use crate::algebra::*;

/// Solves op(A) x = b for triangular A, overwriting b with x.
///
/// No singularity test is performed.
pub fn trsv<T: FloatT>(
    uplo: MatrixTriangle,
    trans: MatrixShape,
    diag: MatrixDiag,
    A: BorrowedMatrix<'_, T>,
    x: &mut [T],
    incx: isize,
) -> Result<(), LapackError> {
    let n = A.nrows();
    if !A.is_square() {
        return Err(LapackError::illegal("TRSV", 6));
    }
    if incx == 0 || x.len() < strided_len(n, incx) {
        return Err(LapackError::illegal("TRSV", 8));
    }
    if n == 0 {
        return Ok(());
    }

    let px = strided_index(n, incx);
    let nounit = diag == MatrixDiag::NonUnit;

    match (trans, uplo) {
        // x := inv(A) x, backward substitution
        (MatrixShape::N, MatrixTriangle::Triu) => {
            for j in (0..n).rev() {
                if x[px(j)] != T::zero() {
                    let col = A.col(j);
                    if nounit {
                        x[px(j)] /= col[j];
                    }
                    let temp = x[px(j)];
                    for i in (0..j).rev() {
                        x[px(i)] -= temp * col[i];
                    }
                }
            }
        }
        // x := inv(A) x, forward substitution
        (MatrixShape::N, MatrixTriangle::Tril) => {
            for j in 0..n {
                if x[px(j)] != T::zero() {
                    let col = A.col(j);
                    if nounit {
                        x[px(j)] /= col[j];
                    }
                    let temp = x[px(j)];
                    for i in (j + 1)..n {
                        x[px(i)] -= temp * col[i];
                    }
                }
            }
        }
        // x := inv(Aᵀ) x
        (MatrixShape::T, MatrixTriangle::Triu) => {
            for j in 0..n {
                let col = A.col(j);
                let mut temp = x[px(j)];
                for i in 0..j {
                    temp -= col[i] * x[px(i)];
                }
                if nounit {
                    temp /= col[j];
                }
                x[px(j)] = temp;
            }
        }
        (MatrixShape::T, MatrixTriangle::Tril) => {
            for j in (0..n).rev() {
                let col = A.col(j);
                let mut temp = x[px(j)];
                for i in ((j + 1)..n).rev() {
                    temp -= col[i] * x[px(i)];
                }
                if nounit {
                    temp /= col[j];
                }
                x[px(j)] = temp;
            }
        }
    }
    Ok(())
}

#[test]
#[rustfmt::skip]
fn test_trsv() {
    use itertools::iproduct;

    let U = Matrix::<f64>::from(&[
        [2., 1., -1.],
        [0., 4.,  2.],
        [0., 0.,  1.],
    ]);
    let L = U.transpose();
    let xtrue = [1., -2., 3.];

    for (uplo, trans, diag) in iproduct!(
        [MatrixTriangle::Triu, MatrixTriangle::Tril],
        [MatrixShape::N, MatrixShape::T],
        [MatrixDiag::Unit, MatrixDiag::NonUnit]
    ) {
        let A = if uplo == MatrixTriangle::Triu { &U } else { &L };

        // b = op(A) x, formed densely on the referenced triangle
        let mut b = [0.; 3];
        for i in 0..3 {
            for j in 0..3 {
                let (r, c) = if trans == MatrixShape::N { (i, j) } else { (j, i) };
                let inside = match uplo {
                    MatrixTriangle::Triu => r <= c,
                    MatrixTriangle::Tril => r >= c,
                };
                let a = if r == c && diag == MatrixDiag::Unit { 1. } else if inside { A[(r, c)] } else { 0. };
                b[i] += a * xtrue[j];
            }
        }

        trsv(uplo, trans, diag, A.rb(), &mut b, 1).unwrap();
        assert_eq!(b, xtrue);
    }
}
