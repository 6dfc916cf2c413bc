#![allow(non_snake_case)]
use crate::algebra::*;

// Reduction of a symmetric matrix to tridiagonal form T = Qᵀ A Q.
//
// With `uplo = Triu`, Q = H(n-2) … H(0) and reflector i has v(i) = 1,
// v(i+1:n) = 0, with v(0:i) stored in A(0:i, i+1) above the superdiagonal.
// With `uplo = Tril`, Q = H(0) … H(n-2) and reflector i has v(0:i+1) = 0,
// v(i+1) = 1, with v(i+2:n) stored in A(i+2:n, i) below the subdiagonal.

fn check_tridiag_args<T>(
    routine: &'static str,
    A: &BorrowedMatrixMut<'_, T>,
    d: &[T],
    e: &[T],
    tau: &[T],
) -> Result<usize, LapackError> {
    if A.nrows() != A.ncols() {
        return Err(LapackError::illegal(routine, 4));
    }
    let n = A.nrows();
    let nm1 = n.saturating_sub(1);
    if d.len() < n {
        return Err(LapackError::illegal(routine, 5));
    }
    if e.len() < nm1 {
        return Err(LapackError::illegal(routine, 6));
    }
    if tau.len() < nm1 {
        return Err(LapackError::illegal(routine, 7));
    }
    Ok(n)
}

/// Unblocked reduction of the `uplo` triangle of A to tridiagonal form.
///
/// On exit d holds the diagonal, e the off-diagonal and tau the reflector
/// factors, while the `uplo` triangle of A holds the reflector vectors
/// outside the tridiagonal band.
pub fn sytd2<T: FloatT>(
    uplo: MatrixTriangle,
    mut A: BorrowedMatrixMut<'_, T>,
    d: &mut [T],
    e: &mut [T],
    tau: &mut [T],
) -> Result<(), LapackError> {
    let n = check_tridiag_args("SYTD2", &A, d, e, tau)?;
    if n == 0 {
        return Ok(());
    }
    let half: T = (0.5).as_T();

    match uplo {
        MatrixTriangle::Triu => {
            for i in (0..(n - 1)).rev() {
                // annihilate A(0:i, i+1)
                let (mut left, mut right) = A.rb_mut().into_split_at_col(i + 1);
                let v = &mut right.col_mut(0)[..=i];
                let taui = {
                    let (x, alpha) = v.split_at_mut(i);
                    larfg(i + 1, &mut alpha[0], x, 1)
                };
                e[i] = v[i];

                if taui != T::zero() {
                    v[i] = T::one();
                    let mut Ai = left.view_mut(0, 0, i + 1, i + 1);
                    let w = &mut tau[..=i];

                    // x = τ A v, then w = x - ½ τ (xᵀv) v
                    symv(uplo, taui, Ai.rb(), v, 1, T::zero(), w, 1)?;
                    let alpha = -half * taui * dot(i + 1, w, 1, v, 1);
                    axpy(i + 1, alpha, v, 1, w, 1);

                    // A = A - v wᵀ - w vᵀ
                    syr2(uplo, -T::one(), v, 1, w, 1, Ai.rb_mut())?;
                    v[i] = e[i];
                }
                d[i + 1] = right[(i + 1, 0)];
                tau[i] = taui;
            }
            d[0] = A[(0, 0)];
        }
        MatrixTriangle::Tril => {
            for i in 0..(n - 1) {
                // annihilate A(i+2:n, i)
                let (mut left, mut right) = A.rb_mut().into_split_at_col(i + 1);
                let v = &mut left.col_mut(i)[(i + 1)..];
                let taui = {
                    let (alpha, x) = v.split_at_mut(1);
                    larfg(n - i - 1, &mut alpha[0], x, 1)
                };
                e[i] = v[0];

                if taui != T::zero() {
                    v[0] = T::one();
                    let mut Ai = right.view_mut(i + 1, 0, n - i - 1, n - i - 1);
                    let w = &mut tau[i..(n - 1)];

                    symv(uplo, taui, Ai.rb(), v, 1, T::zero(), w, 1)?;
                    let alpha = -half * taui * dot(n - i - 1, w, 1, v, 1);
                    axpy(n - i - 1, alpha, v, 1, w, 1);

                    syr2(uplo, -T::one(), v, 1, w, 1, Ai.rb_mut())?;
                    v[0] = e[i];
                }
                d[i] = left[(i, i)];
                tau[i] = taui;
            }
            d[n - 1] = A[(n - 1, n - 1)];
        }
    }
    Ok(())
}

/// Reduces nb rows and columns of A to tridiagonal form and returns the
/// n×nb matrix W needed to update the rest of the matrix as
/// A ← A - V Wᵀ - W Vᵀ.
///
/// With `uplo = Triu` the last nb columns are reduced, with `uplo = Tril`
/// the first nb.  The reduced entries of the off-diagonal go to e and the
/// reflector factors to tau, at the positions they would have in a full
/// reduction.  The off-diagonal entries of A next to the reduced columns
/// are left set to one, the unit element of each reflector.
pub fn latrd<T: FloatT>(
    uplo: MatrixTriangle,
    nb: usize,
    mut A: BorrowedMatrixMut<'_, T>,
    e: &mut [T],
    tau: &mut [T],
    mut W: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let n = A.nrows();
    if !A.is_square() || nb > n {
        return Err(LapackError::illegal("LATRD", 4));
    }
    if W.nrows() < n || W.ncols() < nb {
        return Err(LapackError::illegal("LATRD", 9));
    }
    if n == 0 || nb == 0 {
        return Ok(());
    }
    let half: T = (0.5).as_T();
    let one = T::one();
    let zero = T::zero();
    let ldw = W.ld as isize;
    let lda = A.ld as isize;

    match uplo {
        MatrixTriangle::Triu => {
            for i in ((n - nb)..n).rev() {
                let iw = i + nb - n;
                let nr = n - i - 1;

                if nr > 0 {
                    // update A(0:i+1, i)
                    let (mut left, right) = A.rb_mut().into_split_at_col(i + 1);
                    let ai = &mut left.col_mut(i)[..=i];
                    gemv(MatrixShape::N, -one, right.view(0, 0, i + 1, nr), W.row_from(i, iw + 1), ldw, one, ai, 1)?;
                    gemv(MatrixShape::N, -one, W.view(0, iw + 1, i + 1, nr), right.row_from(i, 0), lda, one, ai, 1)?;
                }

                if i > 0 {
                    // annihilate A(0:i-1, i)
                    let ai = &mut A.col_mut(i)[..i];
                    let (x, alpha) = ai.split_at_mut(i - 1);
                    tau[i - 1] = larfg(i, &mut alpha[0], x, 1);
                    e[i - 1] = alpha[0];
                    alpha[0] = one;

                    // W(0:i, iw)
                    let Ar = A.rb();
                    let v = &Ar.col(i)[..i];
                    let (mut Wl, Wr) = W.rb_mut().into_split_at_col(iw + 1);
                    let (wtop, wbot) = Wl.col_mut(iw).split_at_mut(i);
                    symv(uplo, one, Ar.view(0, 0, i, i), v, 1, zero, wtop, 1)?;
                    if nr > 0 {
                        let wbot = &mut wbot[1..];
                        let Wnext = Wr.view(0, 0, i, nr);
                        let Anext = Ar.view(0, i + 1, i, nr);
                        gemv(MatrixShape::T, one, Wnext, v, 1, zero, wbot, 1)?;
                        gemv(MatrixShape::N, -one, Anext, wbot, 1, one, wtop, 1)?;
                        gemv(MatrixShape::T, one, Anext, v, 1, zero, wbot, 1)?;
                        gemv(MatrixShape::N, -one, Wnext, wbot, 1, one, wtop, 1)?;
                    }
                    scal(i, tau[i - 1], wtop, 1);
                    let alpha = -half * tau[i - 1] * dot(i, wtop, 1, v, 1);
                    axpy(i, alpha, v, 1, wtop, 1);
                }
            }
        }
        MatrixTriangle::Tril => {
            for i in 0..nb {
                // update A(i:n, i)
                if i > 0 {
                    let (left, mut right) = A.rb_mut().into_split_at_col(i);
                    let ai = &mut right.col_mut(0)[i..];
                    gemv(MatrixShape::N, -one, left.view(i, 0, n - i, i), W.row_from(i, 0), ldw, one, ai, 1)?;
                    gemv(MatrixShape::N, -one, W.view(i, 0, n - i, i), left.row_from(i, 0), lda, one, ai, 1)?;
                }

                if i < n - 1 {
                    // annihilate A(i+2:n, i)
                    let ai = &mut A.col_mut(i)[(i + 1)..];
                    let (alpha, x) = ai.split_at_mut(1);
                    tau[i] = larfg(n - i - 1, &mut alpha[0], x, 1);
                    e[i] = alpha[0];
                    alpha[0] = one;

                    // W(i+1:n, i)
                    let Ar = A.rb();
                    let v = &Ar.col(i)[(i + 1)..];
                    let (Wl, mut Wr) = W.rb_mut().into_split_at_col(i);
                    let (wtop, wbot) = Wr.col_mut(0).split_at_mut(i + 1);
                    let wtop = &mut wtop[..i];
                    let Wprev = Wl.view(i + 1, 0, n - i - 1, i);
                    let Aprev = Ar.view(i + 1, 0, n - i - 1, i);

                    symv(uplo, one, Ar.view(i + 1, i + 1, n - i - 1, n - i - 1), v, 1, zero, wbot, 1)?;
                    gemv(MatrixShape::T, one, Wprev, v, 1, zero, wtop, 1)?;
                    gemv(MatrixShape::N, -one, Aprev, wtop, 1, one, wbot, 1)?;
                    gemv(MatrixShape::T, one, Aprev, v, 1, zero, wtop, 1)?;
                    gemv(MatrixShape::N, -one, Wprev, wtop, 1, one, wbot, 1)?;
                    scal(n - i - 1, tau[i], wbot, 1);
                    let alpha = -half * tau[i] * dot(n - i - 1, wbot, 1, v, 1);
                    axpy(n - i - 1, alpha, v, 1, wbot, 1);
                }
            }
        }
    }
    Ok(())
}

/// Workspace length for which [`sytrd`] runs fully blocked.
pub fn sytrd_workspace(n: usize, bs: BlockSizes) -> usize {
    usize::max(1, n * bs.nb)
}

/// Blocked reduction of the `uplo` triangle of A to tridiagonal form.
///
/// Output as for [`sytd2`].  Blocks of `bs.nb` columns are reduced with
/// [`latrd`] and folded into the rest of the matrix by one rank-2k update
/// each, which needs a workspace of n·nb entries.  With a shorter
/// workspace the block size is reduced, down to the unblocked code.
pub fn sytrd<T: FloatT>(
    uplo: MatrixTriangle,
    mut A: BorrowedMatrixMut<'_, T>,
    d: &mut [T],
    e: &mut [T],
    tau: &mut [T],
    work: &mut [T],
    bs: BlockSizes,
) -> Result<(), LapackError> {
    let n = check_tridiag_args("SYTRD", &A, d, e, tau)?;
    if n == 0 {
        return Ok(());
    }

    let mut nb = bs.nb;
    let mut nx = n;
    if nb > 1 && nb < n {
        nx = usize::max(nb, bs.nx);
        if nx < n && work.len() < n * nb {
            nb = usize::max(work.len() / n, 1);
            if nb < bs.nbmin {
                nx = n;
            }
        }
    } else {
        nb = 1;
    }
    let ldwork = n;

    match uplo {
        MatrixTriangle::Triu => {
            // columns kk..n are reduced in blocks, the rest unblocked
            let kk = if nx < n { n - ((n - nx + nb - 1) / nb) * nb } else { n };
            let mut i = n;
            while i >= kk + nb {
                i -= nb;
                let m = i + nb;
                {
                    let W = BorrowedMatrixMut::from_slice_mut(&mut work[..ldwork * nb], m, nb, ldwork)
                        .map_err(|_| LapackError::illegal("SYTRD", 9))?;
                    latrd(uplo, nb, A.view_mut(0, 0, m, m), e, tau, W)?;
                }

                // A(0:i, 0:i) -= V Wᵀ + W Vᵀ
                let W = BorrowedMatrix::from_slice(&work[..ldwork * nb], i, nb, ldwork)
                    .map_err(|_| LapackError::illegal("SYTRD", 9))?;
                let (mut Aii, Arest) = A.rb_mut().into_split_at_col(i);
                syr2k(uplo, MatrixShape::N, -T::one(), Arest.view(0, 0, i, nb), W, T::one(), Aii.view_mut(0, 0, i, i))?;

                for j in i..(i + nb) {
                    A[(j - 1, j)] = e[j - 1];
                    d[j] = A[(j, j)];
                }
            }
            sytd2(uplo, A.view_mut(0, 0, kk, kk), &mut d[..kk], e, tau)?;
        }
        MatrixTriangle::Tril => {
            let mut i = 0;
            while nx < n && i + nx < n {
                let m = n - i;
                {
                    let W = BorrowedMatrixMut::from_slice_mut(&mut work[..ldwork * nb], m, nb, ldwork)
                        .map_err(|_| LapackError::illegal("SYTRD", 9))?;
                    latrd(uplo, nb, A.view_mut(i, i, m, m), &mut e[i..], &mut tau[i..], W)?;
                }

                // A(i+nb:n, i+nb:n) -= V Wᵀ + W Vᵀ
                let W = BorrowedMatrix::from_slice(&work[..ldwork * nb], m, nb, ldwork)
                    .map_err(|_| LapackError::illegal("SYTRD", 9))?;
                let (Av, mut Arest) = A.rb_mut().into_split_at_col(i + nb);
                syr2k(
                    uplo,
                    MatrixShape::N,
                    -T::one(),
                    Av.view(i + nb, i, m - nb, nb),
                    W.view(nb, 0, m - nb, nb),
                    T::one(),
                    Arest.view_mut(i + nb, 0, m - nb, m - nb),
                )?;

                for j in i..(i + nb) {
                    A[(j + 1, j)] = e[j];
                    d[j] = A[(j, j)];
                }
                i += nb;
            }
            let m = n - i;
            sytd2(uplo, A.view_mut(i, i, m, m), &mut d[i..], &mut e[i..], &mut tau[i..])?;
        }
    }
    Ok(())
}
