#![allow(non_snake_case)]
use crate::algebra::*;

/// Symmetric rank-2k update of the `uplo` triangle of C.
///
/// With `trans = N`, C ← α(ABᵀ + BAᵀ) + βC for n×k matrices A and B.  With
/// `trans = T`, C ← α(AᵀB + BᵀA) + βC for k×n matrices A and B.  The other
/// triangle of C is not touched.
pub fn syr2k<T: FloatT>(
    uplo: MatrixTriangle,
    trans: MatrixShape,
    α: T,
    A: BorrowedMatrix<'_, T>,
    B: BorrowedMatrix<'_, T>,
    β: T,
    mut C: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    if !C.is_square() {
        return Err(LapackError::illegal("SYR2K", 12));
    }
    let n = C.nrows();
    let (an, k) = match trans {
        MatrixShape::N => A.size(),
        MatrixShape::T => (A.ncols(), A.nrows()),
    };
    if an != n {
        return Err(LapackError::illegal("SYR2K", 7));
    }
    if B.size() != A.size() {
        return Err(LapackError::illegal("SYR2K", 9));
    }

    if n == 0 || ((α == T::zero() || k == 0) && β == T::one()) {
        return Ok(());
    }

    // rows of column j inside the referenced triangle
    let rows = |j: usize| match uplo {
        MatrixTriangle::Triu => 0..(j + 1),
        MatrixTriangle::Tril => j..n,
    };

    if α == T::zero() {
        for j in 0..n {
            let ccol = &mut C.col_mut(j)[rows(j)];
            for c in ccol {
                *c = if β == T::zero() { T::zero() } else { β * *c };
            }
        }
        return Ok(());
    }

    match trans {
        MatrixShape::N => {
            for j in 0..n {
                let ccol = &mut C.col_mut(j)[rows(j)];
                if β == T::zero() {
                    ccol.iter_mut().for_each(|c| *c = T::zero());
                } else if β != T::one() {
                    ccol.iter_mut().for_each(|c| *c *= β);
                }
                for l in 0..k {
                    let (ajl, bjl) = (A[(j, l)], B[(j, l)]);
                    if ajl != T::zero() || bjl != T::zero() {
                        let temp1 = α * bjl;
                        let temp2 = α * ajl;
                        let acol = &A.col(l)[rows(j)];
                        let bcol = &B.col(l)[rows(j)];
                        for ((c, &a), &b) in ccol.iter_mut().zip(acol).zip(bcol) {
                            *c += a * temp1 + b * temp2;
                        }
                    }
                }
            }
        }
        MatrixShape::T => {
            for j in 0..n {
                let (aj, bj) = (A.col(j), B.col(j));
                for i in rows(j) {
                    let (ai, bi) = (A.col(i), B.col(i));
                    let mut temp1 = T::zero();
                    let mut temp2 = T::zero();
                    for l in 0..k {
                        temp1 += ai[l] * bj[l];
                        temp2 += bi[l] * aj[l];
                    }
                    let v = α * temp1 + α * temp2;
                    let c = &mut C[(i, j)];
                    *c = if β == T::zero() { v } else { β * *c + v };
                }
            }
        }
    }
    Ok(())
}

macro_rules! generate_test_syr2k {
    ($fxx:ty, $test_name:ident) => {
        #[test]
        #[rustfmt::skip]
        fn $test_name() {

            let A = Matrix::<$fxx>::from(&[
                [ 1., -5.],
                [-4.,  3.],
                [ 2.,  6.],
            ]);

            let B = Matrix::<$fxx>::from(&[
                [ 4.,  5.],
                [ 2., -2.],
                [-3., -2.],
            ]);

            let Ctest = Matrix::<$fxx>::from(&[
                [-83.,  22.,  90.],
                [  0., -55.,  -4.],
                [  0.,   0., -71.],
            ]);

            let (α, β): ($fxx, $fxx) = ((2.).as_T(), (1.).as_T());

            //NB: modifies upper triangle only
            let mut C = Matrix::<$fxx>::identity(3);
            syr2k(MatrixTriangle::Triu, MatrixShape::N, α, A.rb(), B.rb(), β, C.rb_mut()).unwrap();
            assert_eq!(C, Ctest);

            // the transposed form gives the same update
            let (At, Bt) = (A.transpose(), B.transpose());
            let mut C = Matrix::<$fxx>::identity(3);
            syr2k(MatrixTriangle::Triu, MatrixShape::T, α, At.rb(), Bt.rb(), β, C.rb_mut()).unwrap();
            assert_eq!(C, Ctest);

            // and the lower triangle is the mirror image
            let mut C = Matrix::<$fxx>::identity(3);
            syr2k(MatrixTriangle::Tril, MatrixShape::N, α, A.rb(), B.rb(), β, C.rb_mut()).unwrap();
            assert_eq!(C, Ctest.transpose());
        }
    };
}

generate_test_syr2k!(f32, test_syr2k_f32);
generate_test_syr2k!(f64, test_syr2k_f64);
generate_test_syr2k!(half::f16, test_syr2k_f16);
