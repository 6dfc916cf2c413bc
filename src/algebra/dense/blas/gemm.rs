#![allow(non_snake_case)]
use crate::algebra::*;

// C ← βC, without reading C when β = 0
pub(crate) fn scale_block<T: FloatT>(β: T, C: &mut BorrowedMatrixMut<'_, T>) {
    if β == T::one() {
        return;
    }
    for j in 0..C.ncols() {
        for c in C.col_mut(j) {
            *c = if β == T::zero() { T::zero() } else { β * *c };
        }
    }
}

/// C ← α op(A) op(B) + βC
///
/// C is m×n, op(A) is m×k and op(B) is k×n.  With α = 0 the product is not
/// formed and C is only scaled (or zeroed when β = 0).
pub fn gemm<T: FloatT>(
    transa: MatrixShape,
    transb: MatrixShape,
    α: T,
    A: BorrowedMatrix<'_, T>,
    B: BorrowedMatrix<'_, T>,
    β: T,
    mut C: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let (m, n) = C.size();
    let (am, k) = match transa {
        MatrixShape::N => A.size(),
        MatrixShape::T => (A.ncols(), A.nrows()),
    };
    let (bk, bn) = match transb {
        MatrixShape::N => B.size(),
        MatrixShape::T => (B.ncols(), B.nrows()),
    };
    if am != m {
        return Err(LapackError::illegal("GEMM", 7));
    }
    if bk != k || bn != n {
        return Err(LapackError::illegal("GEMM", 9));
    }

    if m == 0 || n == 0 || ((α == T::zero() || k == 0) && β == T::one()) {
        return Ok(());
    }

    if α == T::zero() {
        scale_block(β, &mut C);
        return Ok(());
    }

    match (transa, transb) {
        (MatrixShape::N, MatrixShape::N) => {
            for j in 0..n {
                let bcol = B.col(j);
                let ccol = C.col_mut(j);
                scale_col(β, ccol);
                for (l, &b) in bcol.iter().enumerate() {
                    let temp = α * b;
                    for (c, &a) in ccol.iter_mut().zip(A.col(l)) {
                        *c += temp * a;
                    }
                }
            }
        }
        (MatrixShape::T, MatrixShape::N) => {
            for j in 0..n {
                let bcol = B.col(j);
                for i in 0..m {
                    let temp = dot_cols(A.col(i), bcol);
                    update(&mut C[(i, j)], α * temp, β);
                }
            }
        }
        (MatrixShape::N, MatrixShape::T) => {
            for j in 0..n {
                let ccol = C.col_mut(j);
                scale_col(β, ccol);
                for l in 0..k {
                    let temp = α * B[(j, l)];
                    for (c, &a) in ccol.iter_mut().zip(A.col(l)) {
                        *c += temp * a;
                    }
                }
            }
        }
        (MatrixShape::T, MatrixShape::T) => {
            for j in 0..n {
                for i in 0..m {
                    let acol = A.col(i);
                    let mut temp = T::zero();
                    for (l, &a) in acol.iter().enumerate() {
                        temp += a * B[(j, l)];
                    }
                    update(&mut C[(i, j)], α * temp, β);
                }
            }
        }
    }
    Ok(())
}

#[inline]
fn scale_col<T: FloatT>(β: T, col: &mut [T]) {
    if β == T::zero() {
        col.iter_mut().for_each(|c| *c = T::zero());
    } else if β != T::one() {
        col.iter_mut().for_each(|c| *c *= β);
    }
}

#[inline]
fn dot_cols<T: FloatT>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b).fold(T::zero(), |acc, (&a, &b)| acc + a * b)
}

// c ← v + βc, without reading c when β = 0
#[inline]
fn update<T: FloatT>(c: &mut T, v: T, β: T) {
    *c = if β == T::zero() { v } else { v + β * *c };
}

#[test]
#[rustfmt::skip]
fn test_gemm() {
    use itertools::iproduct;

    let A = Matrix::<f64>::from(&[
        [ 1.,  2.],
        [ 0.,  1.],
        [-1.,  3.],
    ]);
    let B = Matrix::<f64>::from(&[
        [ 2.,  1., 0., 1.],
        [-1.,  4., 1., 2.],
    ]);

    // A*B + ones
    let Ctest = Matrix::<f64>::from(&[
        [ 1., 10., 3., 6.],
        [ 0.,  5., 2., 3.],
        [-4., 12., 4., 6.],
    ]);

    for (ta, tb) in iproduct!([MatrixShape::N, MatrixShape::T], [MatrixShape::N, MatrixShape::T]) {
        let Aop = if ta == MatrixShape::N { A.clone() } else { A.transpose() };
        let Bop = if tb == MatrixShape::N { B.clone() } else { B.transpose() };
        let mut C = Matrix::<f64>::from(&[[1.; 4]; 3]);
        gemm(ta, tb, 1., Aop.rb(), Bop.rb(), 1., C.rb_mut()).unwrap();
        assert_eq!(C, Ctest);
    }

    // α = 0, β = 0 zeroes C without reading A or B
    let mut C = Matrix::<f64>::from(&[[f64::NAN; 4]; 3]);
    gemm(MatrixShape::N, MatrixShape::N, 0., A.rb(), B.rb(), 0., C.rb_mut()).unwrap();
    assert!(C.data.iter().all(|&c| c == 0.));

    // mismatched inner dimension
    let mut C = Matrix::<f64>::zeros((3, 4));
    let err = gemm(MatrixShape::T, MatrixShape::N, 1., A.rb(), B.rb(), 0., C.rb_mut());
    assert_eq!(err.unwrap_err().info(), -7);
}
