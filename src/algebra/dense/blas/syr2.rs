#![allow(non_snake_case)]
use super::level1::{strided_index, strided_len};
use crate::algebra::*;

/// A ← αxyᵀ + αyxᵀ + A for symmetric A.
///
/// Only the `uplo` triangle of A is referenced and updated.
pub fn syr2<T: FloatT>(
    uplo: MatrixTriangle,
    α: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    mut A: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let n = A.nrows();
    if !A.is_square() {
        return Err(LapackError::illegal("SYR2", 8));
    }
    if incx == 0 || x.len() < strided_len(n, incx) {
        return Err(LapackError::illegal("SYR2", 5));
    }
    if incy == 0 || y.len() < strided_len(n, incy) {
        return Err(LapackError::illegal("SYR2", 7));
    }
    if n == 0 || α == T::zero() {
        return Ok(());
    }

    let px = strided_index(n, incx);
    let py = strided_index(n, incy);
    for j in 0..n {
        let (xj, yj) = (x[px(j)], y[py(j)]);
        if xj == T::zero() && yj == T::zero() {
            continue;
        }
        let temp1 = α * yj;
        let temp2 = α * xj;
        let rows = match uplo {
            MatrixTriangle::Triu => 0..(j + 1),
            MatrixTriangle::Tril => j..n,
        };
        let col = A.col_mut(j);
        for i in rows {
            col[i] += x[px(i)] * temp1 + y[py(i)] * temp2;
        }
    }
    Ok(())
}

#[test]
#[rustfmt::skip]
fn test_syr2() {
    let mut A = Matrix::<f64>::identity(3);
    A[(2, 0)] = 99.;   // not referenced
    syr2(MatrixTriangle::Triu, 1., &[1., 2., 0.], 1, &[0., 1., 1.], 1, A.rb_mut()).unwrap();

    // x yᵀ + y xᵀ = [0 1 1; 1 4 2; 1 2 0]
    let Atest = Matrix::<f64>::from(&[
        [ 1., 1., 1.],
        [ 0., 5., 2.],
        [99., 0., 1.],
    ]);
    assert_eq!(A, Atest);
}
