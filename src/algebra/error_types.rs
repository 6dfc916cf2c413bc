use thiserror::Error;

/// Status code returned when the thin wrapper cannot allocate its workspace.
pub const WORK_MEMORY_ERROR: i32 = -1010;
/// Status code returned when the thin wrapper cannot allocate a transposed copy.
pub const TRANSPOSE_MEMORY_ERROR: i32 = -1011;

/// Error type returned by the BLAS-like and LAPACK-like dense routines.
///
/// Every variant maps to the integer status convention of the classical
/// interface through [`LapackError::info`]: zero for success, a negative
/// 1-based parameter index for illegal arguments, and a positive count for
/// convergence failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LapackError {
    /// An argument to `routine` was illegal.  `index` is the 1-based
    /// position of the argument in the classical calling sequence.
    #[error("parameter number {index} had an illegal value on entry to {routine}")]
    IllegalParameter { routine: &'static str, index: i32 },
    /// The tridiagonal QL/QR iteration ran out of sweeps with `count`
    /// off-diagonal entries not yet converged to zero.
    #[error("the algorithm failed to converge; {count} off-diagonal elements did not converge to zero")]
    NoConvergence { count: usize },
    /// The wrapper layer could not allocate its workspace.
    #[error("not enough memory to allocate work array in {routine}")]
    WorkspaceAllocation { routine: &'static str },
    /// The wrapper layer could not allocate a transposed copy of the input.
    #[error("not enough memory to transpose matrix in {routine}")]
    TransposeAllocation { routine: &'static str },
}

impl LapackError {
    pub(crate) fn illegal(routine: &'static str, index: i32) -> Self {
        LapackError::IllegalParameter { routine, index }
    }

    /// The classical integer status for this error.
    pub fn info(&self) -> i32 {
        match self {
            LapackError::IllegalParameter { index, .. } => -index,
            LapackError::NoConvergence { count } => *count as i32,
            LapackError::WorkspaceAllocation { .. } => WORK_MEMORY_ERROR,
            LapackError::TransposeAllocation { .. } => TRANSPOSE_MEMORY_ERROR,
        }
    }
}

/// Integer status of a routine result, 0 on success.
pub fn info<R>(result: &Result<R, LapackError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.info(),
    }
}

/// Error type returned by matrix construction from raw storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixFormatError {
    /// leading dimension smaller than the row count
    #[error("leading dimension {ld} is smaller than max(1, {nrows})")]
    BadLeadingDimension { ld: usize, nrows: usize },
    /// slice too short to hold the matrix
    #[error("storage of length {len} cannot hold the matrix (need {required})")]
    InsufficientStorage { len: usize, required: usize },
}

#[test]
fn test_info_codes() {
    assert_eq!(LapackError::illegal("SYEV", 3).info(), -3);
    assert_eq!(LapackError::NoConvergence { count: 2 }.info(), 2);
    assert_eq!(
        LapackError::WorkspaceAllocation { routine: "SYEV" }.info(),
        WORK_MEMORY_ERROR
    );
    assert_eq!(info::<()>(&Ok(())), 0);
}
