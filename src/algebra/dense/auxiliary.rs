#![allow(non_snake_case)]
use crate::algebra::*;

/// Routines whose block sizes are chosen by [`BlockSizes::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedRoutine {
    /// reduction to tridiagonal form
    Sytrd,
    /// generation of Q from a QL factorization
    Orgql,
    /// generation of Q from a QR factorization
    Orgqr,
}

/// Tuning parameters of the blocked routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSizes {
    /// block size
    pub nb: usize,
    /// smallest block size for which blocking is used
    pub nbmin: usize,
    /// crossover point below which the unblocked code is used
    pub nx: usize,
}

impl BlockSizes {
    pub fn lookup(routine: BlockedRoutine) -> Self {
        match routine {
            BlockedRoutine::Sytrd => Self {
                nb: 32,
                nbmin: 2,
                nx: 32,
            },
            BlockedRoutine::Orgql | BlockedRoutine::Orgqr => Self {
                nb: 32,
                nbmin: 2,
                nx: 128,
            },
        }
    }

    /// replaces the block size when an override is given
    pub fn with_block_size(mut self, nb: Option<usize>) -> Self {
        if let Some(nb) = nb {
            self.nb = usize::max(1, nb);
        }
        self
    }
}

/// A workspace length as a value of the working format.
///
/// Lengths that are not exactly representable are rounded up, so that a
/// length returned by a workspace query and read back is never too short.
/// Lengths beyond the range of the format become infinite.
pub fn roundup_lwork<T: FloatT>(lwork: usize) -> T {
    let mut w: T = (lwork as f64).as_T();
    if let Some(back) = w.to_f64() {
        if back < lwork as f64 {
            w = w * (T::one() + T::epsilon());
        }
    }
    w
}

/// Reads a workspace length written by [`roundup_lwork`].
pub fn lwork_from_float<T: FloatT>(w: T) -> usize {
    w.to_f64().map_or(usize::MAX, |w| {
        if w.is_finite() {
            w.max(0.).ceil() as usize
        } else {
            usize::MAX
        }
    })
}

/// Multiplies the `kind` part of A by cto/cfrom.
///
/// The product is formed through a sequence of safe partial factors, so
/// that neither the ratio nor any intermediate result over- or underflows
/// when the final result is representable.
pub fn lascl<T: FloatT>(
    kind: ScaleKind,
    cfrom: T,
    cto: T,
    mut A: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    if cfrom == T::zero() || cfrom.is_nan() {
        return Err(LapackError::illegal("LASCL", 4));
    }
    if cto.is_nan() {
        return Err(LapackError::illegal("LASCL", 5));
    }
    let (m, n) = A.size();
    if m == 0 || n == 0 {
        return Ok(());
    }

    let smlnum = MachineParameters::<T>::new().sfmin;
    let bignum = T::one() / smlnum;

    let mut cfromc = cfrom;
    let mut ctoc = cto;

    loop {
        let cfrom1 = cfromc * smlnum;
        let mul;
        let done;
        if cfrom1 == cfromc {
            // cfromc is infinite; the result is a signed zero or NaN
            mul = ctoc / cfromc;
            done = true;
        } else {
            let cto1 = ctoc / bignum;
            if cto1 == ctoc {
                // ctoc is zero or infinite
                mul = ctoc;
                done = true;
                cfromc = T::one();
            } else if cfrom1.abs() > ctoc.abs() && ctoc != T::zero() {
                mul = smlnum;
                done = false;
                cfromc = cfrom1;
            } else if cto1.abs() > cfromc.abs() {
                mul = bignum;
                done = false;
                ctoc = cto1;
            } else {
                mul = ctoc / cfromc;
                done = true;
                if mul == T::one() {
                    return Ok(());
                }
            }
        }

        for j in 0..n {
            let rows = match kind {
                ScaleKind::General => 0..m,
                ScaleKind::Lower => usize::min(j, m)..m,
                ScaleKind::Upper => 0..usize::min(j + 1, m),
                ScaleKind::Hessenberg => 0..usize::min(j + 2, m),
            };
            for a in &mut A.col_mut(j)[rows] {
                *a *= mul;
            }
        }

        if done {
            return Ok(());
        }
    }
}

/// Sets the strictly `uplo` part of A (all of it for `None`) to α and the
/// diagonal to β.
pub fn laset<T: FloatT>(uplo: Option<MatrixTriangle>, α: T, β: T, mut A: BorrowedMatrixMut<'_, T>) {
    let (m, n) = A.size();
    for j in 0..n {
        let col = A.col_mut(j);
        let rows = match uplo {
            Some(MatrixTriangle::Triu) => 0..usize::min(j, m),
            Some(MatrixTriangle::Tril) => usize::min(j + 1, m)..m,
            None => 0..m,
        };
        col[rows].iter_mut().for_each(|a| *a = α);
    }
    for i in 0..usize::min(m, n) {
        A[(i, i)] = β;
    }
}

/// Copies the `uplo` triangle of A (all of A for `None`) into B.
pub fn lacpy<T: FloatT>(
    uplo: Option<MatrixTriangle>,
    A: BorrowedMatrix<'_, T>,
    mut B: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let (m, n) = A.size();
    if B.nrows() < m || B.ncols() < n {
        return Err(LapackError::illegal("LACPY", 7));
    }
    for j in 0..n {
        let rows = match uplo {
            Some(MatrixTriangle::Triu) => 0..usize::min(j + 1, m),
            Some(MatrixTriangle::Tril) => usize::min(j, m)..m,
            None => 0..m,
        };
        B.col_mut(j)[rows.clone()].copy_from_slice(&A.col(j)[rows]);
    }
    Ok(())
}

// partitions at or below this size are insertion sorted
const LASRT_SELECT: usize = 20;
// enough for any slice length below 2^32
const LASRT_STACK: usize = 32;

/// Sorts d in increasing or decreasing order.
///
/// Quicksort with a median of three pivot on an explicit stack, switching
/// to insertion sort for short partitions.  The smaller half of every
/// partition is processed first, which bounds the stack depth by log₂(n).
pub fn lasrt<T: FloatT>(order: SortOrder, d: &mut [T]) {
    let n = d.len();
    if n <= 1 {
        return;
    }
    // out of order pair for the chosen direction
    let before = |a: T, b: T| match order {
        SortOrder::Increasing => a < b,
        SortOrder::Decreasing => a > b,
    };

    let mut stack = [(0usize, 0usize); LASRT_STACK];
    let mut top = 1;
    stack[0] = (0, n - 1);

    while top > 0 {
        top -= 1;
        let (start, end) = stack[top];

        if end - start <= LASRT_SELECT {
            for i in (start + 1)..=end {
                let mut j = i;
                while j > start && before(d[j], d[j - 1]) {
                    d.swap(j, j - 1);
                    j -= 1;
                }
            }
            continue;
        }

        // median of three
        let d1 = d[start];
        let d2 = d[end];
        let d3 = d[(start + end) / 2];
        let pivot = if d1 < d2 {
            if d3 < d1 {
                d1
            } else if d3 < d2 {
                d3
            } else {
                d2
            }
        } else if d3 < d2 {
            d2
        } else if d3 < d1 {
            d3
        } else {
            d1
        };

        // Hoare partition; on exit d[start..=j] precede d[j+1..=end]
        let mut i = start as isize - 1;
        let mut j = end as isize + 1;
        loop {
            loop {
                j -= 1;
                if !before(pivot, d[j as usize]) {
                    break;
                }
            }
            loop {
                i += 1;
                if !before(d[i as usize], pivot) {
                    break;
                }
            }
            if i < j {
                d.swap(i as usize, j as usize);
            } else {
                break;
            }
        }
        let j = j as usize;

        debug_assert!(top + 2 <= LASRT_STACK);
        if j - start > end - j - 1 {
            stack[top] = (start, j);
            stack[top + 1] = (j + 1, end);
        } else {
            stack[top] = (j + 1, end);
            stack[top + 1] = (start, j);
        }
        top += 2;
    }
}
