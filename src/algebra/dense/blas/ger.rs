#![allow(non_snake_case)]
use super::level1::{strided_index, strided_len};
use crate::algebra::*;

/// A ← αxyᵀ + A
pub fn ger<T: FloatT>(
    α: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    mut A: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let (m, n) = A.size();
    if incx == 0 || x.len() < strided_len(m, incx) {
        return Err(LapackError::illegal("GER", 5));
    }
    if incy == 0 || y.len() < strided_len(n, incy) {
        return Err(LapackError::illegal("GER", 7));
    }
    if m == 0 || n == 0 || α == T::zero() {
        return Ok(());
    }

    let px = strided_index(m, incx);
    let py = strided_index(n, incy);
    for j in 0..n {
        let yj = y[py(j)];
        if yj != T::zero() {
            let temp = α * yj;
            for (i, a) in A.col_mut(j).iter_mut().enumerate() {
                *a += x[px(i)] * temp;
            }
        }
    }
    Ok(())
}

#[test]
#[rustfmt::skip]
fn test_ger() {
    let mut A = Matrix::<f64>::from(&[
        [1., 0., 0.],
        [0., 1., 0.],
    ]);
    ger(2., &[1., -1.], 1, &[3., 0., 1.], 1, A.rb_mut()).unwrap();

    let Atest = Matrix::<f64>::from(&[
        [ 7.,  0.,  2.],
        [-6.,  1., -2.],
    ]);
    assert_eq!(A, Atest);
}
