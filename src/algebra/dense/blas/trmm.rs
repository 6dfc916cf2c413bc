#![allow(non_snake_case)]
use crate::algebra::*;

// Operand access for the triangular multiply.  The triangular factor A
// and the general matrix B are either separate matrices, or two disjoint
// blocks of one matrix that share rows or columns (as happens when a
// block reflector factor is assembled from its own sub-blocks).
trait TrmmOperands<T> {
    fn a(&self, i: usize, j: usize) -> T;
    fn b(&self, i: usize, j: usize) -> T;
    fn b_mut(&mut self, i: usize, j: usize) -> &mut T;
}

struct Separate<'a, 'b, T> {
    A: BorrowedMatrix<'a, T>,
    B: BorrowedMatrixMut<'b, T>,
}

impl<T: FloatT> TrmmOperands<T> for Separate<'_, '_, T> {
    #[inline]
    fn a(&self, i: usize, j: usize) -> T {
        self.A[(i, j)]
    }
    #[inline]
    fn b(&self, i: usize, j: usize) -> T {
        self.B[(i, j)]
    }
    #[inline]
    fn b_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.B[(i, j)]
    }
}

struct SharedBlocks<'a, T> {
    M: BorrowedMatrixMut<'a, T>,
    a_at: (usize, usize),
    b_at: (usize, usize),
}

impl<T: FloatT> TrmmOperands<T> for SharedBlocks<'_, T> {
    #[inline]
    fn a(&self, i: usize, j: usize) -> T {
        self.M[(self.a_at.0 + i, self.a_at.1 + j)]
    }
    #[inline]
    fn b(&self, i: usize, j: usize) -> T {
        self.M[(self.b_at.0 + i, self.b_at.1 + j)]
    }
    #[inline]
    fn b_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.M[(self.b_at.0 + i, self.b_at.1 + j)]
    }
}

/// B ← α op(A) B (left) or B ← α B op(A) (right) for triangular A.
///
/// B is m×n and A is m×m (left) or n×n (right).  Only the `uplo` triangle
/// of A is referenced, and its diagonal is taken as one for a unit `diag`.
pub fn trmm<T: FloatT>(
    side: MatrixSide,
    uplo: MatrixTriangle,
    transa: MatrixShape,
    diag: MatrixDiag,
    α: T,
    A: BorrowedMatrix<'_, T>,
    B: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let (m, n) = B.size();
    let na = if side == MatrixSide::Left { m } else { n };
    if A.size() != (na, na) {
        return Err(LapackError::illegal("TRMM", 8));
    }
    let mut ops = Separate { A, B };
    trmm_kernel(side, uplo, transa, diag, α, m, n, &mut ops);
    Ok(())
}

/// [`trmm`] for a triangular block at `a_at` and an m×n block at `b_at`
/// of the same matrix.  The two blocks must not overlap.
pub(crate) fn trmm_within<T: FloatT>(
    side: MatrixSide,
    uplo: MatrixTriangle,
    transa: MatrixShape,
    diag: MatrixDiag,
    α: T,
    M: BorrowedMatrixMut<'_, T>,
    a_at: (usize, usize),
    b_at: (usize, usize),
    m: usize,
    n: usize,
) {
    let na = if side == MatrixSide::Left { m } else { n };
    let overlap = |p: usize, lp: usize, q: usize, lq: usize| p < q + lq && q < p + lp;
    debug_assert!(
        na == 0
            || m == 0
            || n == 0
            || !(overlap(a_at.0, na, b_at.0, m) && overlap(a_at.1, na, b_at.1, n))
    );
    debug_assert!(a_at.0 + na <= M.nrows() && a_at.1 + na <= M.ncols());
    debug_assert!(b_at.0 + m <= M.nrows() && b_at.1 + n <= M.ncols());

    let mut ops = SharedBlocks { M, a_at, b_at };
    trmm_kernel(side, uplo, transa, diag, α, m, n, &mut ops);
}

fn trmm_kernel<T: FloatT, O: TrmmOperands<T>>(
    side: MatrixSide,
    uplo: MatrixTriangle,
    transa: MatrixShape,
    diag: MatrixDiag,
    α: T,
    m: usize,
    n: usize,
    X: &mut O,
) {
    if m == 0 || n == 0 {
        return;
    }
    let zero = T::zero();
    let nounit = diag == MatrixDiag::NonUnit;

    if α == zero {
        for j in 0..n {
            for i in 0..m {
                *X.b_mut(i, j) = zero;
            }
        }
        return;
    }

    match (side, transa, uplo) {
        // B := α A B
        (MatrixSide::Left, MatrixShape::N, MatrixTriangle::Triu) => {
            for j in 0..n {
                for k in 0..m {
                    let bkj = X.b(k, j);
                    if bkj != zero {
                        let mut temp = α * bkj;
                        for i in 0..k {
                            let aik = X.a(i, k);
                            *X.b_mut(i, j) += temp * aik;
                        }
                        if nounit {
                            temp *= X.a(k, k);
                        }
                        *X.b_mut(k, j) = temp;
                    }
                }
            }
        }
        (MatrixSide::Left, MatrixShape::N, MatrixTriangle::Tril) => {
            for j in 0..n {
                for k in (0..m).rev() {
                    let bkj = X.b(k, j);
                    if bkj != zero {
                        let temp = α * bkj;
                        *X.b_mut(k, j) = if nounit { temp * X.a(k, k) } else { temp };
                        for i in (k + 1)..m {
                            let aik = X.a(i, k);
                            *X.b_mut(i, j) += temp * aik;
                        }
                    }
                }
            }
        }
        // B := α Aᵀ B
        (MatrixSide::Left, MatrixShape::T, MatrixTriangle::Triu) => {
            for j in 0..n {
                for i in (0..m).rev() {
                    let mut temp = X.b(i, j);
                    if nounit {
                        temp *= X.a(i, i);
                    }
                    for k in 0..i {
                        temp += X.a(k, i) * X.b(k, j);
                    }
                    *X.b_mut(i, j) = α * temp;
                }
            }
        }
        (MatrixSide::Left, MatrixShape::T, MatrixTriangle::Tril) => {
            for j in 0..n {
                for i in 0..m {
                    let mut temp = X.b(i, j);
                    if nounit {
                        temp *= X.a(i, i);
                    }
                    for k in (i + 1)..m {
                        temp += X.a(k, i) * X.b(k, j);
                    }
                    *X.b_mut(i, j) = α * temp;
                }
            }
        }
        // B := α B A
        (MatrixSide::Right, MatrixShape::N, MatrixTriangle::Triu) => {
            for j in (0..n).rev() {
                let temp = if nounit { α * X.a(j, j) } else { α };
                scale_b_col(X, m, j, temp);
                for k in 0..j {
                    let akj = X.a(k, j);
                    if akj != zero {
                        add_b_col(X, m, j, k, α * akj);
                    }
                }
            }
        }
        (MatrixSide::Right, MatrixShape::N, MatrixTriangle::Tril) => {
            for j in 0..n {
                let temp = if nounit { α * X.a(j, j) } else { α };
                scale_b_col(X, m, j, temp);
                for k in (j + 1)..n {
                    let akj = X.a(k, j);
                    if akj != zero {
                        add_b_col(X, m, j, k, α * akj);
                    }
                }
            }
        }
        // B := α B Aᵀ
        (MatrixSide::Right, MatrixShape::T, MatrixTriangle::Triu) => {
            for k in 0..n {
                for j in 0..k {
                    let ajk = X.a(j, k);
                    if ajk != zero {
                        add_b_col(X, m, j, k, α * ajk);
                    }
                }
                let temp = if nounit { α * X.a(k, k) } else { α };
                scale_b_col(X, m, k, temp);
            }
        }
        (MatrixSide::Right, MatrixShape::T, MatrixTriangle::Tril) => {
            for k in (0..n).rev() {
                for j in (k + 1)..n {
                    let ajk = X.a(j, k);
                    if ajk != zero {
                        add_b_col(X, m, j, k, α * ajk);
                    }
                }
                let temp = if nounit { α * X.a(k, k) } else { α };
                scale_b_col(X, m, k, temp);
            }
        }
    }
}

#[inline]
fn scale_b_col<T: FloatT, O: TrmmOperands<T>>(X: &mut O, m: usize, j: usize, s: T) {
    if s != T::one() {
        for i in 0..m {
            *X.b_mut(i, j) *= s;
        }
    }
}

// B(:,j) += s B(:,k)
#[inline]
fn add_b_col<T: FloatT, O: TrmmOperands<T>>(X: &mut O, m: usize, j: usize, k: usize, s: T) {
    for i in 0..m {
        let bik = X.b(i, k);
        *X.b_mut(i, j) += s * bik;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::test_utils::max_abs_diff;
    use itertools::iproduct;

    // dense copy of op(A) honoring uplo and diag
    fn dense_op(A: &Matrix<f64>, uplo: MatrixTriangle, trans: MatrixShape, diag: MatrixDiag) -> Matrix<f64> {
        let n = A.nrows();
        let mut D = Matrix::<f64>::zeros((n, n));
        for j in 0..n {
            for i in 0..n {
                let inside = match uplo {
                    MatrixTriangle::Triu => i <= j,
                    MatrixTriangle::Tril => i >= j,
                };
                D[(i, j)] = if i == j && diag == MatrixDiag::Unit {
                    1.
                } else if inside {
                    A[(i, j)]
                } else {
                    0.
                };
            }
        }
        if trans == MatrixShape::T {
            D.transpose()
        } else {
            D
        }
    }

    #[test]
    #[rustfmt::skip]
    fn test_trmm_all_variants() {
        let A = Matrix::<f64>::from(&[
            [ 2., -1.,  3.],
            [ 5.,  1.,  4.],
            [-2.,  6., -3.],
        ]);
        let B0 = Matrix::<f64>::from(&[
            [ 1.,  0.,  2.],
            [-1.,  3.,  1.],
            [ 4., -2.,  1.],
        ]);

        for (side, uplo, trans, diag) in iproduct!(
            [MatrixSide::Left, MatrixSide::Right],
            [MatrixTriangle::Triu, MatrixTriangle::Tril],
            [MatrixShape::N, MatrixShape::T],
            [MatrixDiag::Unit, MatrixDiag::NonUnit]
        ) {
            let D = dense_op(&A, uplo, trans, diag);
            let mut expected = Matrix::<f64>::zeros((3, 3));
            match side {
                MatrixSide::Left => gemm(MatrixShape::N, MatrixShape::N, 2., D.rb(), B0.rb(), 0., expected.rb_mut()).unwrap(),
                MatrixSide::Right => gemm(MatrixShape::N, MatrixShape::N, 2., B0.rb(), D.rb(), 0., expected.rb_mut()).unwrap(),
            }

            let mut B = B0.clone();
            trmm(side, uplo, trans, diag, 2., A.rb(), B.rb_mut()).unwrap();
            assert_eq!(max_abs_diff(&B, &expected), 0.);

            // same product with A and B packed side by side in one matrix
            let mut M = Matrix::<f64>::zeros((3, 6));
            M.view_mut(0, 0, 3, 3).data.copy_from_slice(&A.data);
            M.view_mut(0, 3, 3, 3).data.copy_from_slice(&B0.data);
            trmm_within(side, uplo, trans, diag, 2., M.rb_mut(), (0, 0), (0, 3), 3, 3);
            assert_eq!(max_abs_diff(&M.view(0, 3, 3, 3), &expected), 0.);
        }
    }

    #[test]
    fn test_trmm_alpha_zero() {
        let A = Matrix::<f64>::identity(2);
        let mut B = Matrix::<f64>::from(&[[f64::NAN, 1.], [2., 3.]]);
        trmm(MatrixSide::Left, MatrixTriangle::Triu, MatrixShape::N, MatrixDiag::NonUnit, 0., A.rb(), B.rb_mut()).unwrap();
        assert!(B.data.iter().all(|&b| b == 0.));
    }
}
