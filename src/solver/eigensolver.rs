#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::*;
use std::marker::PhantomData;

// A failed call of the raw interface.  Errors raised by the core driver
// number the arguments of the core routine, which has no layout argument,
// and are shifted by one in the returned status.
enum Failure {
    Core(LapackError),
    Wrapper(LapackError),
}

impl Failure {
    fn error(&self) -> &LapackError {
        match self {
            Failure::Core(e) | Failure::Wrapper(e) => e,
        }
    }

    fn info(&self) -> i32 {
        match self {
            Failure::Core(e) => match e.info() {
                info if info < 0 => info - 1,
                info => info,
            },
            Failure::Wrapper(e) => e.info(),
        }
    }
}

// a zero filled buffer, or None if the allocation fails
fn try_zeros<T: FloatT>(len: usize) -> Option<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).ok()?;
    v.resize(len, T::zero());
    Some(v)
}

/// Symmetric eigensolver context.
///
/// Holds the [`EigenSettings`] that the classical global state of a
/// LAPACKE style interface would otherwise carry, so that independent
/// solvers with different settings can coexist.
#[derive(Debug, Clone, Default)]
pub struct EigenSolver<T> {
    pub settings: EigenSettings,
    phantom: PhantomData<T>,
}

impl<T> EigenSolver<T>
where
    T: FloatT,
{
    pub fn new(settings: EigenSettings) -> Self {
        Self {
            settings,
            phantom: PhantomData,
        }
    }

    /// Eigenvalues, and eigenvectors when `jobz = Vectors`, of the symmetric
    /// matrix held in the `uplo` triangle of A.
    ///
    /// Allocates the optimal workspace and calls [`syev`].  On success the
    /// eigenvalues are returned in ascending order, and A holds the
    /// eigenvectors if they were requested.  A NaN in the referenced
    /// triangle is reported as an illegal value of the matrix argument of
    /// the classical interface when `nancheck` is set.  The error hook is
    /// not invoked.
    pub fn solve(
        &self,
        jobz: EigenJob,
        uplo: MatrixTriangle,
        mut A: BorrowedMatrixMut<'_, T>,
    ) -> Result<Vec<T>, LapackError> {
        if !A.is_square() {
            return Err(LapackError::illegal("SYEV", 4));
        }
        let n = A.nrows();
        if self.settings.nancheck && (0..n).any(|j| A.col(j)[triangle(uplo, j, n)].has_nan()) {
            return Err(LapackError::illegal("LAPACKE_syev", 5));
        }
        let params = self.settings.syev_params();
        let mut w = try_zeros(n).ok_or(LapackError::WorkspaceAllocation { routine: "SYEV" })?;
        let mut work =
            try_zeros(syev_workspace(n, &params)).ok_or(LapackError::WorkspaceAllocation { routine: "SYEV" })?;
        syev(jobz, uplo, A.rb_mut(), &mut w, &mut work, &params)?;
        Ok(w)
    }

    /// Classical interface.  Computes all eigenvalues, and optionally the
    /// eigenvectors, of the n×n symmetric matrix in `a`.
    ///
    /// `layout` is [`MatrixLayout::ROW_MAJOR`] or [`MatrixLayout::COL_MAJOR`],
    /// `jobz` is `b'N'` for eigenvalues only or `b'V'` for eigenvectors too,
    /// and `uplo` is `b'U'` or `b'L'` for the triangle of `a` that is read.
    /// Eigenvalues are written to w in ascending order.
    ///
    /// Returns 0 on success, -i if argument i had an illegal value or
    /// contains NaN, i > 0 if i off-diagonal entries of the intermediate
    /// tridiagonal form did not converge to zero, and
    /// [`WORK_MEMORY_ERROR`] or [`TRANSPOSE_MEMORY_ERROR`] if a buffer could
    /// not be allocated.
    #[allow(clippy::too_many_arguments)]
    pub fn syev(&self, layout: i32, jobz: u8, uplo: u8, n: i32, a: &mut [T], lda: i32, w: &mut [T]) -> i32 {
        let Some(matrix_layout) = MatrixLayout::from_code(layout) else {
            return self.fail(Failure::Wrapper(LapackError::illegal("LAPACKE_syev", 1)));
        };

        // NaN in the input is not an error of the caller's arguments, so
        // the hook is skipped
        if self.settings.nancheck {
            if let (Some(uplo), Ok(n), Ok(lda)) = (MatrixTriangle::from_char(uplo), usize::try_from(n), usize::try_from(lda)) {
                if n > 0 && lda >= n && a.len() >= storage_len(matrix_layout, n, n, lda) && sy_nancheck(matrix_layout, uplo, n, a, lda) {
                    return -5;
                }
            }
        }

        // workspace query, which also validates the arguments
        let mut query = [T::zero()];
        let status = self.syev_work(layout, jobz, uplo, n, a, lda, w, &mut query, -1);
        if status != 0 {
            return status;
        }

        // the query result may not be exact in a 16 bit format, so the
        // length is taken from its integer form
        let lwork = syev_workspace(n as usize, &self.settings.syev_params());
        let Some(mut work) = try_zeros::<T>(lwork) else {
            return self.fail(Failure::Wrapper(LapackError::WorkspaceAllocation {
                routine: "LAPACKE_syev",
            }));
        };
        let Ok(lwork) = i32::try_from(lwork) else {
            return self.fail(Failure::Wrapper(LapackError::WorkspaceAllocation {
                routine: "LAPACKE_syev",
            }));
        };
        self.syev_work(layout, jobz, uplo, n, a, lda, w, &mut work, lwork)
    }

    /// Classical interface with a caller supplied workspace of length
    /// `lwork`.  With `lwork = -1` the optimal workspace length is written
    /// to `work[0]` and nothing else is done.  Otherwise as [`Self::syev`],
    /// except that the input is not checked for NaN.
    #[allow(clippy::too_many_arguments)]
    pub fn syev_work(
        &self,
        layout: i32,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [T],
        lda: i32,
        w: &mut [T],
        work: &mut [T],
        lwork: i32,
    ) -> i32 {
        let result = match MatrixLayout::from_code(layout) {
            Some(MatrixLayout::ColMajor) => self.syev_col_major(jobz, uplo, n, a, lda, w, work, lwork),
            Some(MatrixLayout::RowMajor) => self.syev_row_major(jobz, uplo, n, a, lda, w, work, lwork),
            None => Err(Failure::Wrapper(LapackError::illegal("LAPACKE_syev_work", 1))),
        };
        match result {
            Ok(()) => 0,
            Err(failure) => self.fail(failure),
        }
    }

    fn fail(&self, failure: Failure) -> i32 {
        self.settings.error_hook.raise(failure.error());
        failure.info()
    }

    #[allow(clippy::too_many_arguments)]
    fn syev_col_major(
        &self,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [T],
        lda: i32,
        w: &mut [T],
        work: &mut [T],
        lwork: i32,
    ) -> Result<(), Failure> {
        let (jobz, uplo, n) = parse_flags(jobz, uplo, n)?;
        let lda = match usize::try_from(lda) {
            Ok(lda) if lda >= usize::max(1, n) => lda,
            _ => return Err(core_illegal(5)),
        };
        if lwork == -1 {
            return self.query(n, work);
        }
        let A = BorrowedMatrixMut::from_slice_mut(a, n, n, lda).map_err(|_| core_illegal(4))?;
        self.run_core(jobz, uplo, A, w, work, lwork)
    }

    #[allow(clippy::too_many_arguments)]
    fn syev_row_major(
        &self,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [T],
        lda: i32,
        w: &mut [T],
        work: &mut [T],
        lwork: i32,
    ) -> Result<(), Failure> {
        if lda < n {
            return Err(Failure::Wrapper(LapackError::illegal("LAPACKE_syev_work", 6)));
        }
        let (jobz, uplo, n) = parse_flags(jobz, uplo, n)?;
        let lda = usize::try_from(lda).map_err(|_| core_illegal(5))?;
        let ldt = usize::max(1, n);

        if lwork == -1 {
            return self.query(n, work);
        }

        if a.len() < storage_len(MatrixLayout::RowMajor, n, n, lda) {
            return Err(core_illegal(4));
        }
        let mut at = try_zeros::<T>(ldt * n).ok_or(Failure::Wrapper(LapackError::TransposeAllocation {
            routine: "LAPACKE_syev_work",
        }))?;
        log::debug!("LAPACKE_syev_work: transposing {}x{} row major input", n, n);
        sy_trans(MatrixLayout::RowMajor, uplo, n, a, lda, &mut at, ldt);

        let At = BorrowedMatrixMut::from_slice_mut(&mut at, n, n, ldt).map_err(|_| core_illegal(4))?;
        let result = self.run_core(jobz, uplo, At, w, work, lwork);

        // the matrix is written back even when the iteration failed
        if matches!(result, Ok(()) | Err(Failure::Core(LapackError::NoConvergence { .. }))) {
            match jobz {
                EigenJob::Vectors => ge_trans(MatrixLayout::ColMajor, n, n, &at, ldt, a, lda),
                EigenJob::Values => sy_trans(MatrixLayout::ColMajor, uplo, n, &at, ldt, a, lda),
            }
        }
        result
    }

    fn query(&self, n: usize, work: &mut [T]) -> Result<(), Failure> {
        let Some(slot) = work.first_mut() else {
            return Err(core_illegal(7));
        };
        *slot = roundup_lwork(syev_workspace(n, &self.settings.syev_params()));
        Ok(())
    }

    fn run_core(
        &self,
        jobz: EigenJob,
        uplo: MatrixTriangle,
        A: BorrowedMatrixMut<'_, T>,
        w: &mut [T],
        work: &mut [T],
        lwork: i32,
    ) -> Result<(), Failure> {
        let params = self.settings.syev_params();
        let lwork = match usize::try_from(lwork) {
            Ok(lwork) if lwork <= work.len() => lwork,
            _ => return Err(core_illegal(8)),
        };
        syev(jobz, uplo, A, w, &mut work[..lwork], &params).map_err(Failure::Core)
    }
}

fn core_illegal(index: i32) -> Failure {
    Failure::Core(LapackError::illegal("SYEV", index))
}

fn parse_flags(jobz: u8, uplo: u8, n: i32) -> Result<(EigenJob, MatrixTriangle, usize), Failure> {
    let jobz = EigenJob::from_char(jobz).ok_or(core_illegal(1))?;
    let uplo = MatrixTriangle::from_char(uplo).ok_or(core_illegal(2))?;
    let n = usize::try_from(n).map_err(|_| core_illegal(3))?;
    Ok((jobz, uplo, n))
}

// rows of column j inside the `uplo` triangle
fn triangle(uplo: MatrixTriangle, j: usize, n: usize) -> std::ops::Range<usize> {
    match uplo {
        MatrixTriangle::Triu => 0..(j + 1),
        MatrixTriangle::Tril => j..n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    const COL: i32 = MatrixLayout::COL_MAJOR;
    const ROW: i32 = MatrixLayout::ROW_MAJOR;

    #[test]
    fn test_syev_2x2_both_layouts() {
        let solver = EigenSolver::<f64>::default();
        for layout in [COL, ROW] {
            let mut a = [2., 1., 1., 2.];
            let mut w = [0.; 2];
            assert_eq!(solver.syev(layout, b'V', b'U', 2, &mut a, 2, &mut w), 0);
            assert!((w[0] - 1.).abs() < 1e-15 && (w[1] - 3.).abs() < 1e-15);

            // second eigenvector is (1,1)/√2 up to sign, in either layout
            let (v0, v1) = match layout {
                COL => (a[2], a[3]),
                _ => (a[1], a[3]),
            };
            assert!((v0 * v1 - 0.5).abs() < 1e-15);
        }
    }

    #[test]
    fn test_row_major_padding_untouched() {
        // 3×3 row major with lda 4, the padding column is never written
        let solver = EigenSolver::<f16>::default();
        let pad = f16::from_f32(-7.);
        #[rustfmt::skip]
        let mut a: Vec<f16> = [
            4., 1., 0., -7.,
            1., 3., 1., -7.,
            0., 1., 2., -7.,
        ].iter().map(|&x: &f32| f16::from_f32(x)).collect();
        let mut w = [f16::ZERO; 3];
        assert_eq!(solver.syev(ROW, b'v', b'l', 3, &mut a, 4, &mut w), 0);
        assert!(a.iter().skip(3).step_by(4).all(|&x| x == pad));
        assert!(w.windows(2).all(|p| p[0] <= p[1]));
        let trace: f32 = w.iter().map(|x| x.to_f32()).sum();
        assert!((trace - 9.).abs() < 0.05);
    }

    #[test]
    fn test_workspace_query() {
        let solver = EigenSolver::<f16>::new(EigenSettingsBuilder::default().block_size(Some(4)).build().unwrap());
        let mut a = [f16::ZERO; 9];
        let mut w = [f16::ZERO; 3];
        let mut work = [f16::ZERO];
        assert_eq!(solver.syev_work(COL, b'N', b'U', 3, &mut a, 3, &mut w, &mut work, -1), 0);
        assert_eq!(work[0].to_f32(), 18.);
        assert_eq!(solver.syev_work(ROW, b'N', b'U', 3, &mut a, 3, &mut w, &mut work, -1), 0);
        assert_eq!(work[0].to_f32(), 18.);

        // minimal workspace is 3n-1
        let mut work = [f16::ZERO; 8];
        assert_eq!(solver.syev_work(COL, b'N', b'U', 3, &mut a, 3, &mut w, &mut work, 7), -9);
        assert_eq!(solver.syev_work(COL, b'N', b'U', 3, &mut a, 3, &mut w, &mut work, 9), -9);
        assert_eq!(solver.syev_work(COL, b'N', b'U', 3, &mut a, 3, &mut w, &mut work, 8), 0);
    }

    #[test]
    fn test_bad_arguments() {
        let solver = EigenSolver::<f32>::default();
        let mut a = [1f32; 16];
        let mut w = [0f32; 4];
        assert_eq!(solver.syev(100, b'V', b'U', 4, &mut a, 4, &mut w), -1);
        assert_eq!(solver.syev(COL, b'X', b'U', 4, &mut a, 4, &mut w), -2);
        assert_eq!(solver.syev(COL, b'V', b'X', 4, &mut a, 4, &mut w), -3);
        assert_eq!(solver.syev(COL, b'V', b'U', -1, &mut a, 4, &mut w), -4);
        assert_eq!(solver.syev(COL, b'V', b'U', 4, &mut a[..10], 4, &mut w), -5);
        assert_eq!(solver.syev(COL, b'V', b'U', 4, &mut a, 3, &mut w), -6);
        assert_eq!(solver.syev(ROW, b'V', b'U', 4, &mut a, 3, &mut w), -6);
        assert_eq!(solver.syev(COL, b'V', b'U', 4, &mut a, 4, &mut w[..3]), -7);
        // nothing was touched
        assert!(a.iter().all(|&x| x == 1.));
        assert!(w.iter().all(|&x| x == 0.));

        // n = 0 is legal
        assert_eq!(solver.syev(COL, b'V', b'U', 0, &mut [], 1, &mut []), 0);
    }

    #[test]
    fn test_nancheck() {
        let mut a = [1., f64::NAN, 0., 1.];
        let mut w = [0.; 2];

        // NaN in the unreferenced triangle is ignored
        let solver = EigenSolver::<f64>::default();
        let checks = solver.settings.nancheck;
        assert_eq!(solver.syev(COL, b'N', b'U', 2, &mut a, 2, &mut w), 0);
        a = [1., f64::NAN, 0., 1.];
        let status = solver.syev(COL, b'N', b'L', 2, &mut a, 2, &mut w);
        if checks {
            assert_eq!(status, -5);
        }

        let solver = EigenSolver::<f64>::new(EigenSettingsBuilder::default().nancheck(true).build().unwrap());
        a = [1., f64::NAN, 0., 1.];
        assert_eq!(solver.syev(COL, b'N', b'L', 2, &mut a, 2, &mut w), -5);
        assert_eq!(solver.syev(ROW, b'N', b'U', 2, &mut a, 2, &mut w), -5);
        assert!(a[1].is_nan());

        let mut A = Matrix::<f64>::from(&[[1., 0.], [f64::NAN, 1.]]);
        assert_eq!(info(&solver.solve(EigenJob::Values, MatrixTriangle::Tril, A.rb_mut())), -5);
        let w = solver.solve(EigenJob::Values, MatrixTriangle::Triu, A.rb_mut()).unwrap();
        assert_eq!(w, vec![1., 1.]);

        // with the check off the NaN reaches the iteration
        let solver = EigenSolver::<f64>::new(EigenSettingsBuilder::default().nancheck(false).build().unwrap());
        let mut a = [1., f64::NAN, f64::NAN, 1., 2., 1., 0., 1., 3.];
        let mut w = [0.; 3];
        assert!(solver.syev(COL, b'V', b'L', 3, &mut a, 3, &mut w) > 0);
    }
}
