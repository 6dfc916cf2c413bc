#![allow(non_snake_case)]
use crate::algebra::*;

fn check_org_args<T>(
    routine: &'static str,
    k: usize,
    A: &BorrowedMatrixMut<'_, T>,
    tau: &[T],
) -> Result<(), LapackError> {
    let (m, n) = A.size();
    if n > m {
        return Err(LapackError::illegal(routine, 2));
    }
    if k > n {
        return Err(LapackError::illegal(routine, 3));
    }
    if tau.len() < k {
        return Err(LapackError::illegal(routine, 6));
    }
    Ok(())
}

// block size actually used by orgql/orgqr for k reflectors and the given
// workspace, or None for the unblocked code
fn blocking<T>(k: usize, n: usize, work: &[T], bs: BlockSizes) -> Option<usize> {
    let mut nb = bs.nb;
    if nb <= 1 || nb >= k || bs.nx >= k {
        return None;
    }
    if work.len() < n * nb {
        nb = work.len() / n;
    }
    if nb >= bs.nbmin && nb > 1 && nb < k {
        Some(nb)
    } else {
        None
    }
}

/// Generates the m×n matrix Q with orthonormal columns defined as the last
/// n columns of the product of k reflectors H(k)…H(1) of order m, as left
/// by a QL factorization.
///
/// Reflector i is stored in column n-k+i of A, with its unit element at
/// row m-n+(n-k+i).  `work` needs n entries.
pub fn org2l<T: FloatT>(
    k: usize,
    mut A: BorrowedMatrixMut<'_, T>,
    tau: &[T],
    work: &mut [T],
) -> Result<(), LapackError> {
    check_org_args("ORG2L", k, &A, tau)?;
    let (m, n) = A.size();
    if work.len() < n {
        return Err(LapackError::illegal("ORG2L", 7));
    }
    if n == 0 {
        return Ok(());
    }

    // columns 0:n-k become columns of the unit matrix
    for j in 0..(n - k) {
        let col = A.col_mut(j);
        col.iter_mut().for_each(|a| *a = T::zero());
        col[m - n + j] = T::one();
    }

    for i in 0..k {
        let jj = n - k + i;
        let rows = m - n + jj + 1;

        // apply H(i) to A(0:rows, 0:jj) from the left
        let (left, mut right) = A.rb_mut().into_split_at_col(jj);
        larf1l(MatrixSide::Left, &right.col(0)[..rows], tau[i], left.into_view(0, 0, rows, jj), work)?;

        let col = right.col_mut(0);
        scal(rows - 1, -tau[i], col, 1);
        col[rows - 1] = T::one() - tau[i];
        col[rows..].iter_mut().for_each(|a| *a = T::zero());
    }
    Ok(())
}

/// Generates the m×n matrix Q with orthonormal columns defined as the
/// first n columns of the product of k reflectors H(1)…H(k) of order m, as
/// left by a QR factorization.
///
/// Reflector i is stored in column i of A, with its unit element on the
/// diagonal.  `work` needs n entries.
pub fn org2r<T: FloatT>(
    k: usize,
    mut A: BorrowedMatrixMut<'_, T>,
    tau: &[T],
    work: &mut [T],
) -> Result<(), LapackError> {
    check_org_args("ORG2R", k, &A, tau)?;
    let (m, n) = A.size();
    if work.len() < n {
        return Err(LapackError::illegal("ORG2R", 7));
    }
    if n == 0 {
        return Ok(());
    }

    // columns k:n become columns of the unit matrix
    for j in k..n {
        let col = A.col_mut(j);
        col.iter_mut().for_each(|a| *a = T::zero());
        col[j] = T::one();
    }

    for i in (0..k).rev() {
        // apply H(i) to A(i:m, i+1:n) from the left
        let (mut left, right) = A.rb_mut().into_split_at_col(i + 1);
        if i + 1 < n {
            larf1f(MatrixSide::Left, &left.col(i)[i..], tau[i], right.into_view(i, 0, m - i, n - i - 1), work)?;
        }

        let col = left.col_mut(i);
        scal(m - i - 1, -tau[i], &mut col[(i + 1)..], 1);
        col[i] = T::one() - tau[i];
        col[..i].iter_mut().for_each(|a| *a = T::zero());
    }
    Ok(())
}

/// Blocked version of [`org2l`].
///
/// `work` needs at least n entries, and n·nb for the blocked code.
pub fn orgql<T: FloatT>(
    k: usize,
    mut A: BorrowedMatrixMut<'_, T>,
    tau: &[T],
    work: &mut [T],
    bs: BlockSizes,
) -> Result<(), LapackError> {
    check_org_args("ORGQL", k, &A, tau)?;
    let (m, n) = A.size();
    if work.len() < usize::max(1, n) {
        return Err(LapackError::illegal("ORGQL", 8));
    }
    if n == 0 {
        return Ok(());
    }

    let Some(nb) = blocking(k, n, work, bs) else {
        return org2l(k, A, tau, work);
    };

    // the last kk columns are handled in blocks, the first ones unblocked
    let kk = usize::min(k, ((k - bs.nx + nb - 1) / nb) * nb);
    for j in 0..(n - kk) {
        A.col_mut(j)[(m - kk)..].iter_mut().for_each(|a| *a = T::zero());
    }
    org2l(k - kk, A.view_mut(0, 0, m - kk, n - kk), tau, work)?;

    let mut i = k - kk;
    while i < k {
        let ib = usize::min(nb, k - i);
        let jb = n - k + i;
        let rows = m - k + i + ib;

        if jb > 0 {
            // apply H = H(i+ib-1)…H(i) to A(0:rows, 0:jb) from the left
            let (tw, rest) = work.split_at_mut(ib * ib);
            let mut Tf = BorrowedMatrixMut::from_slice_mut(tw, ib, ib, ib).map_err(|_| LapackError::illegal("ORGQL", 8))?;
            let W = BorrowedMatrixMut::from_slice_mut(rest, jb, ib, jb).map_err(|_| LapackError::illegal("ORGQL", 8))?;

            let (C, Vblk) = A.rb_mut().into_split_at_col(jb);
            let V = Vblk.into_ref().into_view(0, 0, rows, ib);
            larft(ReflectorDirection::Backward, ReflectorStorage::Columnwise, V, &tau[i..(i + ib)], Tf.rb_mut())?;
            larfb(
                MatrixSide::Left,
                MatrixShape::N,
                ReflectorDirection::Backward,
                ReflectorStorage::Columnwise,
                V,
                Tf.rb(),
                C.into_view(0, 0, rows, jb),
                W,
            )?;
        }

        // the current block itself
        org2l(ib, A.view_mut(0, jb, rows, ib), &tau[i..(i + ib)], work)?;
        for j in jb..(jb + ib) {
            A.col_mut(j)[rows..].iter_mut().for_each(|a| *a = T::zero());
        }
        i += ib;
    }
    Ok(())
}

/// Blocked version of [`org2r`].
///
/// `work` needs at least n entries, and n·nb for the blocked code.
pub fn orgqr<T: FloatT>(
    k: usize,
    mut A: BorrowedMatrixMut<'_, T>,
    tau: &[T],
    work: &mut [T],
    bs: BlockSizes,
) -> Result<(), LapackError> {
    check_org_args("ORGQR", k, &A, tau)?;
    let (m, n) = A.size();
    if work.len() < usize::max(1, n) {
        return Err(LapackError::illegal("ORGQR", 8));
    }
    if n == 0 {
        return Ok(());
    }

    let Some(nb) = blocking(k, n, work, bs) else {
        return org2r(k, A, tau, work);
    };

    // the first kk columns are handled in blocks, the last ones unblocked
    let ki = ((k - bs.nx - 1) / nb) * nb;
    let kk = usize::min(k, ki + nb);
    for j in kk..n {
        A.col_mut(j)[..kk].iter_mut().for_each(|a| *a = T::zero());
    }
    if kk < n {
        org2r(k - kk, A.view_mut(kk, kk, m - kk, n - kk), &tau[kk..], work)?;
    }

    let mut i = ki + nb;
    while i > 0 {
        i -= nb;
        let ib = usize::min(nb, k - i);

        if i + ib < n {
            // apply H = H(i)…H(i+ib-1) to A(i:m, i+ib:n) from the left
            let nc = n - i - ib;
            let (tw, rest) = work.split_at_mut(ib * ib);
            let mut Tf = BorrowedMatrixMut::from_slice_mut(tw, ib, ib, ib).map_err(|_| LapackError::illegal("ORGQR", 8))?;
            let W = BorrowedMatrixMut::from_slice_mut(rest, nc, ib, nc).map_err(|_| LapackError::illegal("ORGQR", 8))?;

            let (Vblk, C) = A.rb_mut().into_split_at_col(i + ib);
            let V = Vblk.into_ref().into_view(i, i, m - i, ib);
            larft(ReflectorDirection::Forward, ReflectorStorage::Columnwise, V, &tau[i..(i + ib)], Tf.rb_mut())?;
            larfb(
                MatrixSide::Left,
                MatrixShape::N,
                ReflectorDirection::Forward,
                ReflectorStorage::Columnwise,
                V,
                Tf.rb(),
                C.into_view(i, 0, m - i, nc),
                W,
            )?;
        }

        org2r(ib, A.view_mut(i, i, m - i, ib), &tau[i..(i + ib)], work)?;
        for j in i..(i + ib) {
            A.col_mut(j)[..i].iter_mut().for_each(|a| *a = T::zero());
        }
    }
    Ok(())
}

/// Workspace length for which [`orgtr`] runs fully blocked.
pub fn orgtr_workspace(n: usize, bs: BlockSizes) -> usize {
    usize::max(1, n.saturating_sub(1) * bs.nb)
}

/// Overwrites A with the orthogonal matrix Q of a reduction to tridiagonal
/// form, from the reflectors left in A and tau by [`sytrd`] with the same
/// `uplo`.
///
/// `work` needs at least max(1, n-1) entries.  Longer workspaces allow the
/// blocked code, see [`orgtr_workspace`].
pub fn orgtr<T: FloatT>(
    uplo: MatrixTriangle,
    mut A: BorrowedMatrixMut<'_, T>,
    tau: &[T],
    work: &mut [T],
    bs: BlockSizes,
) -> Result<(), LapackError> {
    if !A.is_square() {
        return Err(LapackError::illegal("ORGTR", 3));
    }
    let n = A.nrows();
    let nm1 = n.saturating_sub(1);
    if tau.len() < nm1 {
        return Err(LapackError::illegal("ORGTR", 5));
    }
    if work.len() < usize::max(1, nm1) {
        return Err(LapackError::illegal("ORGTR", 7));
    }
    if n == 0 {
        return Ok(());
    }

    match uplo {
        MatrixTriangle::Triu => {
            // shift the reflector vectors one column to the left and make
            // the last row and column those of the unit matrix
            for j in 0..nm1 {
                let (mut left, right) = A.rb_mut().into_split_at_col(j + 1);
                let col = left.col_mut(j);
                col[..j].copy_from_slice(&right.col(0)[..j]);
                col[n - 1] = T::zero();
            }
            let last = A.col_mut(n - 1);
            last.iter_mut().for_each(|a| *a = T::zero());
            last[n - 1] = T::one();

            orgql(nm1, A.view_mut(0, 0, nm1, nm1), tau, work, bs)
        }
        MatrixTriangle::Tril => {
            // shift the reflector vectors one column to the right and make
            // the first row and column those of the unit matrix
            for j in (1..n).rev() {
                let (left, mut right) = A.rb_mut().into_split_at_col(j);
                let col = right.col_mut(0);
                col[0] = T::zero();
                col[(j + 1)..].copy_from_slice(&left.col(j - 1)[(j + 1)..]);
            }
            let first = A.col_mut(0);
            first.iter_mut().for_each(|a| *a = T::zero());
            first[0] = T::one();

            orgqr(nm1, A.view_mut(1, 1, nm1, nm1), tau, work, bs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::test_utils::{matmul, max_abs_diff, random_symmetric, tridiagonal};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn reduce_and_form_q(uplo: MatrixTriangle, A0: &Matrix<f64>, bs: BlockSizes, lwork: usize) -> (Matrix<f64>, Vec<f64>, Vec<f64>) {
        let n = A0.nrows();
        let mut A = A0.clone();
        let (mut d, mut e, mut tau) = (vec![0.; n], vec![0.; n.max(1) - 1], vec![0.; n.max(1) - 1]);
        let mut work = vec![0.; lwork.max(sytrd_workspace(n, bs))];
        sytrd(uplo, A.rb_mut(), &mut d, &mut e, &mut tau, &mut work, bs).unwrap();

        let mut work = vec![0.; lwork];
        orgtr(uplo, A.rb_mut(), &tau, &mut work, bs).unwrap();
        (A, d, e)
    }

    fn check_q(A0: &Matrix<f64>, Q: &Matrix<f64>, d: &[f64], e: &[f64]) {
        let n = A0.nrows();
        let QtQ = matmul(&Q.transpose(), Q);
        assert!(max_abs_diff(&QtQ, &Matrix::<f64>::identity(n)) < 1e-13);
        let QTQt = matmul(&matmul(Q, &tridiagonal(d, e)), &Q.transpose());
        assert!(max_abs_diff(&QTQt, A0) < 1e-13);
    }

    #[test]
    fn test_orgtr_unblocked() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let bs = BlockSizes::lookup(BlockedRoutine::Orgqr);
        for n in [1, 2, 3, 7] {
            let A0 = random_symmetric(&mut rng, n);
            for uplo in [MatrixTriangle::Triu, MatrixTriangle::Tril] {
                let (Q, d, e) = reduce_and_form_q(uplo, &A0, bs, n.max(2) - 1);
                check_q(&A0, &Q, &d, &e);
            }
        }
    }

    #[test]
    fn test_orgtr_blocked() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let bs = BlockSizes { nb: 3, nbmin: 2, nx: 2 };
        for n in [6, 10, 11] {
            let A0 = random_symmetric(&mut rng, n);
            for uplo in [MatrixTriangle::Triu, MatrixTriangle::Tril] {
                let (Q, d, e) = reduce_and_form_q(uplo, &A0, bs, orgtr_workspace(n, bs));
                check_q(&A0, &Q, &d, &e);

                // same Q as the unblocked code
                let (Qu, _, _) = reduce_and_form_q(uplo, &A0, bs, n - 1);
                assert!(max_abs_diff(&Q, &Qu) < 1e-13);
            }
        }
    }

    #[test]
    fn test_org2r_identity_when_no_reflectors() {
        let mut A = Matrix::<f64>::zeros((4, 3));
        A.fill(5.);
        let mut work = [0.; 3];
        org2r(0, A.rb_mut(), &[], &mut work).unwrap();
        let mut I = Matrix::<f64>::zeros((4, 3));
        for i in 0..3 {
            I[(i, i)] = 1.;
        }
        assert_eq!(A, I);

        // a QL generator puts the unit block at the bottom
        A.fill(5.);
        org2l(0, A.rb_mut(), &[], &mut work).unwrap();
        let mut I = Matrix::<f64>::zeros((4, 3));
        for i in 0..3 {
            I[(i + 1, i)] = 1.;
        }
        assert_eq!(A, I);
    }

    #[test]
    fn test_orgtr_bad_args() {
        let mut A = Matrix::<f64>::zeros((3, 3));
        let mut work = [0.; 1];
        let err = orgtr(MatrixTriangle::Triu, A.rb_mut(), &[0., 0.], &mut work, BlockSizes::lookup(BlockedRoutine::Orgql));
        assert_eq!(info(&err), -7);
        let err = orgtr(MatrixTriangle::Triu, A.rb_mut(), &[0.], &mut [0.; 2], BlockSizes::lookup(BlockedRoutine::Orgql));
        assert_eq!(info(&err), -5);

        let mut A = Matrix::<f64>::zeros((2, 3));
        let err = orgqr(1, A.rb_mut(), &[0.], &mut [0.; 3], BlockSizes::lookup(BlockedRoutine::Orgqr));
        assert_eq!(info(&err), -2);
    }
}
