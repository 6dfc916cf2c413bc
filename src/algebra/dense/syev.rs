#![allow(non_snake_case)]
use crate::algebra::*;

/// Tunables of the [`syev`] driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyevParams {
    /// block size of the tridiagonal reduction and of the generation of Q
    pub block_size: usize,
    /// sweeps of the QL/QR iteration allowed per eigenvalue, on average
    pub max_iter_per_eigenvalue: usize,
}

impl Default for SyevParams {
    fn default() -> Self {
        Self {
            block_size: BlockSizes::lookup(BlockedRoutine::Sytrd).nb,
            max_iter_per_eigenvalue: 30,
        }
    }
}

impl SyevParams {
    fn sytrd_blocks(&self) -> BlockSizes {
        BlockSizes::lookup(BlockedRoutine::Sytrd).with_block_size(Some(self.block_size))
    }

    fn orgtr_blocks(&self, uplo: MatrixTriangle) -> BlockSizes {
        let routine = match uplo {
            MatrixTriangle::Triu => BlockedRoutine::Orgql,
            MatrixTriangle::Tril => BlockedRoutine::Orgqr,
        };
        BlockSizes::lookup(routine).with_block_size(Some(self.block_size))
    }
}

/// Optimal workspace length of [`syev`] for a matrix of order n.
pub fn syev_workspace(n: usize, params: &SyevParams) -> usize {
    usize::max(1, (usize::max(1, params.block_size) + 2) * n)
}

/// Smallest workspace length accepted by [`syev`] for a matrix of order n.
pub fn syev_min_workspace(n: usize) -> usize {
    usize::max(1, (3 * n).saturating_sub(1))
}

/// All eigenvalues and optionally eigenvectors of a real symmetric matrix.
///
/// Only the `uplo` triangle of A is read.  On exit w holds the eigenvalues
/// in ascending order.  With `jobz = Vectors` A is overwritten by the
/// orthonormal eigenvectors, column j belonging to w\[j\]; otherwise the
/// `uplo` triangle of A, including the diagonal, is destroyed.
///
/// `work` needs at least [`syev_min_workspace`] entries, and on success
/// `work[0]` returns the optimal length [`syev_workspace`].
///
/// The matrix is scaled into the safe range of the working format when its
/// largest entry is very small or very large, and the eigenvalues are
/// scaled back afterwards.  When the QL/QR iteration fails to converge the
/// error reports the number of off-diagonal entries of the intermediate
/// tridiagonal form that did not converge to zero, and only the leading
/// eigenvalues that were scaled back are meaningful.
pub fn syev<T: FloatT>(
    jobz: EigenJob,
    uplo: MatrixTriangle,
    mut A: BorrowedMatrixMut<'_, T>,
    w: &mut [T],
    work: &mut [T],
    params: &SyevParams,
) -> Result<(), LapackError> {
    if !A.is_square() {
        return Err(LapackError::illegal("SYEV", 4));
    }
    let n = A.nrows();
    if w.len() < n {
        return Err(LapackError::illegal("SYEV", 6));
    }
    if work.len() < syev_min_workspace(n) {
        return Err(LapackError::illegal("SYEV", 8));
    }
    let wantz = jobz == EigenJob::Vectors;
    let lwkopt = syev_workspace(n, params);

    if n == 0 {
        work[0] = roundup_lwork(lwkopt);
        return Ok(());
    }
    if n == 1 {
        w[0] = A[(0, 0)];
        work[0] = (2.).as_T();
        if wantz {
            A[(0, 0)] = T::one();
        }
        return Ok(());
    }

    // safe range for the largest entry of A
    let safmin = lamch::<T>(b'S');
    let eps = lamch::<T>(b'E');
    let smlnum = safmin / eps;
    let bignum = T::one() / smlnum;
    let rmin = smlnum.sqrt();
    let rmax = bignum.sqrt();

    let anrm = lansy(NormType::Max, uplo, A.rb(), &mut []);
    let target = if anrm > T::zero() && anrm < rmin {
        Some(rmin)
    } else if anrm > rmax {
        Some(rmax)
    } else {
        None
    };
    if let Some(target) = target {
        log::debug!("SYEV: scaling matrix of norm {} to {}", anrm, target);
        let kind = match uplo {
            MatrixTriangle::Triu => ScaleKind::Upper,
            MatrixTriangle::Tril => ScaleKind::Lower,
        };
        lascl(kind, anrm, target, A.rb_mut())?;
    }

    let maxit = params.max_iter_per_eigenvalue;
    let (e, rest) = work.split_at_mut(n);
    {
        let (tau, wrk) = rest.split_at_mut(n);
        sytrd(uplo, A.rb_mut(), w, &mut e[..n - 1], &mut tau[..n - 1], wrk, params.sytrd_blocks())?;
        if wantz {
            orgtr(uplo, A.rb_mut(), &tau[..n - 1], wrk, params.orgtr_blocks(uplo))?;
        }
    }

    let status = if wantz {
        steqr(ComputeZ::Update, &mut w[..n], &mut e[..n - 1], A.rb_mut(), rest, maxit)
    } else {
        sterf(&mut w[..n], &mut e[..n - 1], maxit)
    };

    if let Some(target) = target {
        let imax = match status {
            Err(LapackError::NoConvergence { count }) => count.saturating_sub(1),
            _ => n,
        };
        scale_vector(target, anrm, &mut w[..imax])?;
    }
    status?;

    work[0] = roundup_lwork(lwkopt);
    Ok(())
}

// ---------------------------------------------------------
// tests
// ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::test_utils::{matmul, max_abs_diff, random_symmetric, to_f64, to_T};
    use half::{bf16, f16};
    use itertools::iproduct;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run<T: FloatT>(jobz: EigenJob, uplo: MatrixTriangle, A: &mut Matrix<T>) -> Result<Vec<T>, LapackError> {
        let n = A.nrows();
        let params = SyevParams::default();
        let mut w = vec![T::zero(); n];
        let mut work = vec![T::zero(); syev_workspace(n, &params)];
        syev(jobz, uplo, A.rb_mut(), &mut w, &mut work, &params).map(|_| w)
    }

    #[test]
    #[rustfmt::skip]
    fn test_syev_2x2() {
        for uplo in [MatrixTriangle::Triu, MatrixTriangle::Tril] {
            let mut A = Matrix::<f64>::from(&[
                [2., 1.],
                [1., 2.],
            ]);
            let w = run(EigenJob::Vectors, uplo, &mut A).unwrap();
            assert!((w[0] - 1.).abs() < 1e-15 && (w[1] - 3.).abs() < 1e-15);

            let s = std::f64::consts::FRAC_1_SQRT_2;
            // columns are (1,-1)/√2 and (1,1)/√2 up to sign
            assert!((A[(0, 0)] * A[(1, 0)] + 0.5).abs() < 1e-15);
            assert!((A[(0, 1)] * A[(1, 1)] - 0.5).abs() < 1e-15);
            assert!((A[(0, 0)].abs() - s).abs() < 1e-15);
        }
    }

    #[test]
    fn test_syev_trivial_sizes() {
        let mut A = Matrix::<f16>::zeros((0, 0));
        let mut work = [f16::ZERO];
        syev(EigenJob::Vectors, MatrixTriangle::Triu, A.rb_mut(), &mut [], &mut work, &SyevParams::default()).unwrap();
        assert_eq!(work[0], f16::ONE);

        let mut A = Matrix::<f16>::from(&[[-3.5]]);
        let mut w = [f16::ZERO];
        let mut work = [f16::ZERO; 2];
        syev(EigenJob::Vectors, MatrixTriangle::Tril, A.rb_mut(), &mut w, &mut work, &SyevParams::default()).unwrap();
        assert_eq!(w[0].to_f32(), -3.5);
        assert_eq!(A[(0, 0)], f16::ONE);
        assert_eq!(work[0].to_f32(), 2.);
    }

    #[test]
    fn test_syev_values_match_vectors() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for (n, uplo) in iproduct!([3, 8, 17, 40], [MatrixTriangle::Triu, MatrixTriangle::Tril]) {
            let A0 = random_symmetric(&mut rng, n);

            let mut A = A0.clone();
            let wv = run(EigenJob::Vectors, uplo, &mut A).unwrap();
            let mut B = A0.clone();
            let wn = run(EigenJob::Values, uplo, &mut B).unwrap();

            assert!(wv.windows(2).all(|p| p[0] <= p[1]));
            for (a, b) in wv.iter().zip(wn.iter()) {
                assert!((a - b).abs() < 1e-12);
            }

            // A V = V diag(w)
            let AV = matmul(&A0, &A);
            let mut VD = A.clone();
            for j in 0..n {
                VD.col_mut(j).iter_mut().for_each(|v| *v *= wv[j]);
            }
            assert!(max_abs_diff(&AV, &VD) < 1e-12);
            assert!(max_abs_diff(&matmul(&A.transpose(), &A), &Matrix::<f64>::identity(n)) < 1e-13);
        }
    }

    #[test]
    fn test_syev_blocked_path() {
        // order beyond the crossover of the blocked reduction
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let n = 70;
        let A0 = random_symmetric(&mut rng, n);
        let params = SyevParams {
            block_size: 8,
            ..SyevParams::default()
        };
        for uplo in [MatrixTriangle::Triu, MatrixTriangle::Tril] {
            let mut A = A0.clone();
            let mut w = vec![0.; n];
            let mut work = vec![0.; syev_workspace(n, &params)];
            syev(EigenJob::Vectors, uplo, A.rb_mut(), &mut w, &mut work, &params).unwrap();
            assert_eq!(work[0] as usize, syev_workspace(n, &params));
            let AV = matmul(&A0, &A);
            for j in 0..n {
                for i in 0..n {
                    assert!((AV[(i, j)] - A[(i, j)] * w[j]).abs() < 1e-11);
                }
            }

            // the minimal workspace gives the same eigenvalues
            let mut B = A0.clone();
            let mut w2 = vec![0.; n];
            let mut work = vec![0.; syev_min_workspace(n)];
            syev(EigenJob::Values, uplo, B.rb_mut(), &mut w2, &mut work, &params).unwrap();
            for (a, b) in w.iter().zip(w2.iter()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_syev_scaled_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let n = 6;
        let A0 = random_symmetric(&mut rng, n);
        let w0 = run(EigenJob::Values, MatrixTriangle::Triu, &mut A0.clone()).unwrap();

        for c in [1e-300, 1e300] {
            let mut A = A0.map(|a| a * c);
            let w = run(EigenJob::Vectors, MatrixTriangle::Triu, &mut A).unwrap();
            for (a, b) in w.iter().zip(w0.iter()) {
                assert!((a / c - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_syev_half_precision() {
        fn check<T: FloatT>(tol: f64) {
            let mut rng = ChaCha8Rng::seed_from_u64(10);
            let n = 8;
            let A0 = random_symmetric(&mut rng, n);
            let wref = run(EigenJob::Values, MatrixTriangle::Tril, &mut A0.clone()).unwrap();

            let mut A = Matrix::<T>::new_from_slice((n, n), &to_T::<T>(A0.data()));
            let w = to_f64(&run(EigenJob::Vectors, MatrixTriangle::Tril, &mut A).unwrap());
            for (a, b) in w.iter().zip(wref.iter()) {
                assert!((a - b).abs() < tol);
            }
            let V = A.map(|v| v.to_f64().unwrap());
            assert!(max_abs_diff(&matmul(&V.transpose(), &V), &Matrix::<f64>::identity(n)) < tol);
        }
        check::<f16>(0.1);
        check::<bf16>(0.5);
        check::<f32>(1e-5);
    }

    #[test]
    fn test_syev_bad_args() {
        let params = SyevParams::default();
        let mut A = Matrix::<f64>::zeros((3, 2));
        let mut w = [0.; 3];
        let mut work = [0.; 8];
        let r = syev(EigenJob::Values, MatrixTriangle::Triu, A.rb_mut(), &mut w, &mut work, &params);
        assert_eq!(info(&r), -4);

        let mut A = Matrix::<f64>::identity(3);
        let r = syev(EigenJob::Values, MatrixTriangle::Triu, A.rb_mut(), &mut w[..2], &mut work, &params);
        assert_eq!(info(&r), -6);
        let r = syev(EigenJob::Values, MatrixTriangle::Triu, A.rb_mut(), &mut w, &mut work[..7], &params);
        assert_eq!(info(&r), -8);
        // nothing was touched
        assert_eq!(A, Matrix::<f64>::identity(3));
        assert_eq!(w, [0.; 3]);
    }

    #[test]
    fn test_syev_nan_does_not_converge() {
        let mut A = Matrix::<f64>::identity(4);
        A[(0, 1)] = f64::NAN;
        A[(1, 2)] = 1.;
        let r = run(EigenJob::Vectors, MatrixTriangle::Triu, &mut A);
        assert!(info(&r) > 0);
    }
}
