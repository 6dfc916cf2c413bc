#![allow(non_snake_case)]
use super::level1::{strided_index, strided_len};
use crate::algebra::*;

/// y ← αAx + βy for symmetric A.
///
/// Only the `uplo` triangle of A (and its diagonal) is referenced.
pub fn symv<T: FloatT>(
    uplo: MatrixTriangle,
    α: T,
    A: BorrowedMatrix<'_, T>,
    x: &[T],
    incx: isize,
    β: T,
    y: &mut [T],
    incy: isize,
) -> Result<(), LapackError> {
    let n = A.nrows();
    if !A.is_square() {
        return Err(LapackError::illegal("SYMV", 4));
    }
    if incx == 0 || x.len() < strided_len(n, incx) {
        return Err(LapackError::illegal("SYMV", 7));
    }
    if incy == 0 || y.len() < strided_len(n, incy) {
        return Err(LapackError::illegal("SYMV", 10));
    }

    if n == 0 || (α == T::zero() && β == T::one()) {
        return Ok(());
    }

    let px = strided_index(n, incx);
    let py = strided_index(n, incy);

    if β != T::one() {
        for iy in (0..n).map(&py) {
            y[iy] = if β == T::zero() { T::zero() } else { β * y[iy] };
        }
    }
    if α == T::zero() {
        return Ok(());
    }

    match uplo {
        MatrixTriangle::Triu => {
            for j in 0..n {
                let col = A.col(j);
                let temp1 = α * x[px(j)];
                let mut temp2 = T::zero();
                for i in 0..j {
                    y[py(i)] += temp1 * col[i];
                    temp2 += col[i] * x[px(i)];
                }
                y[py(j)] += temp1 * col[j] + α * temp2;
            }
        }
        MatrixTriangle::Tril => {
            for j in 0..n {
                let col = A.col(j);
                let temp1 = α * x[px(j)];
                let mut temp2 = T::zero();
                y[py(j)] += temp1 * col[j];
                for i in (j + 1)..n {
                    y[py(i)] += temp1 * col[i];
                    temp2 += col[i] * x[px(i)];
                }
                y[py(j)] += α * temp2;
            }
        }
    }
    Ok(())
}

macro_rules! generate_test_symv {
    ($fxx:ty, $test_name:ident) => {
        #[test]
        #[rustfmt::skip]
        fn $test_name() {
            use crate::algebra::test_utils::to_T;

            // garbage in the unreferenced triangle must be ignored
            let Au = Matrix::<$fxx>::from(&[
                [ 1.,  2.,   4.],
                [99.,  3.,   5.],
                [99., 99.,   6.],
            ]);
            let Al = Au.transpose();

            for (uplo, A) in [(MatrixTriangle::Triu, &Au), (MatrixTriangle::Tril, &Al)] {
                let x: Vec<$fxx> = to_T(&[1., -2., 3.]);
                let mut y: Vec<$fxx> = to_T(&[-4., -1., 3.]);
                symv(uplo, (2.).as_T(), A.rb(), &x, 1, (3.).as_T(), &mut y, 1).unwrap();
                assert_eq!(y, to_T::<$fxx>(&[6., 19., 33.]));
            }
        }
    };
}

generate_test_symv!(f32, test_symv_f32);
generate_test_symv!(f64, test_symv_f64);
generate_test_symv!(half::f16, test_symv_f16);
