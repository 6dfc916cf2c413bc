#![allow(non_snake_case)]
use super::level1::{strided, strided_len};
use crate::algebra::*;

/// y ← α op(A) x + βy
///
/// For `trans = N`, x has A.ncols() elements and y has A.nrows(), and the
/// other way round for `trans = T`.  With α = 0 and β = 1 the call returns
/// immediately.
pub fn gemv<T: FloatT>(
    trans: MatrixShape,
    α: T,
    A: BorrowedMatrix<'_, T>,
    x: &[T],
    incx: isize,
    β: T,
    y: &mut [T],
    incy: isize,
) -> Result<(), LapackError> {
    let (m, n) = A.size();
    let (lenx, leny) = match trans {
        MatrixShape::N => (n, m),
        MatrixShape::T => (m, n),
    };

    if incx == 0 || x.len() < strided_len(lenx, incx) {
        return Err(LapackError::illegal("GEMV", 8));
    }
    if incy == 0 || y.len() < strided_len(leny, incy) {
        return Err(LapackError::illegal("GEMV", 11));
    }

    if m == 0 || n == 0 || (α == T::zero() && β == T::one()) {
        return Ok(());
    }

    // y ← βy first
    if β != T::one() {
        for iy in strided(leny, incy) {
            y[iy] = if β == T::zero() { T::zero() } else { β * y[iy] };
        }
    }
    if α == T::zero() {
        return Ok(());
    }

    match trans {
        MatrixShape::N => {
            for (j, jx) in strided(n, incx).enumerate() {
                let temp = α * x[jx];
                for (&a, iy) in A.col(j).iter().zip(strided(m, incy)) {
                    y[iy] += temp * a;
                }
            }
        }
        MatrixShape::T => {
            for (j, jy) in strided(n, incy).enumerate() {
                let mut temp = T::zero();
                for (&a, ix) in A.col(j).iter().zip(strided(m, incx)) {
                    temp += a * x[ix];
                }
                y[jy] += α * temp;
            }
        }
    }
    Ok(())
}

macro_rules! generate_test_gemv {
    ($fxx:ty, $test_name:ident) => {
        #[test]
        #[rustfmt::skip]
        fn $test_name() {
            use crate::algebra::test_utils::to_T;

            let A = Matrix::<$fxx>::from(&[
                [ 1.,  2.,  3.],
                [-1.,  0.,  4.],
            ]);

            let x: Vec<$fxx> = to_T(&[1., -1., 2.]);
            let mut y: Vec<$fxx> = to_T(&[1., 1.]);
            gemv(MatrixShape::N, (2.).as_T(), A.rb(), &x, 1, (-1.).as_T(), &mut y, 1).unwrap();
            assert_eq!(y, to_T::<$fxx>(&[9., 13.]));

            // transposed, with a reversed output vector
            let x: Vec<$fxx> = to_T(&[2., 1.]);
            let mut y: Vec<$fxx> = to_T(&[0., 0., 0.]);
            gemv(MatrixShape::T, (1.).as_T(), A.rb(), &x, 1, (0.).as_T(), &mut y, -1).unwrap();
            assert_eq!(y, to_T::<$fxx>(&[10., 4., 1.]));

            // bad increment leaves y untouched
            let err = gemv(MatrixShape::T, (1.).as_T(), A.rb(), &x, 0, (0.).as_T(), &mut y, 1);
            assert_eq!(err.unwrap_err().info(), -8);
            assert_eq!(y, to_T::<$fxx>(&[10., 4., 1.]));
        }
    };
}

generate_test_gemv!(f64, test_gemv_f64);
generate_test_gemv!(half::f16, test_gemv_f16);
generate_test_gemv!(half::bf16, test_gemv_bf16);
