use crate::algebra::*;

// Helpers for matrices handed over as raw storage in either layout.
// The index of element (i, j) of a matrix with leading dimension ld is
// i + j*ld in column major and i*ld + j in row major storage.

fn index(layout: MatrixLayout, i: usize, j: usize, ld: usize) -> usize {
    match layout {
        MatrixLayout::ColMajor => i + j * ld,
        MatrixLayout::RowMajor => i * ld + j,
    }
}

// rows 0..=j of column j for the upper triangle, rows j..n for the lower
fn triangle_rows(uplo: MatrixTriangle, j: usize, n: usize) -> std::ops::Range<usize> {
    match uplo {
        MatrixTriangle::Triu => 0..(j + 1),
        MatrixTriangle::Tril => j..n,
    }
}

/// Storage length needed by an m×n matrix with leading dimension ld.
pub fn storage_len(layout: MatrixLayout, m: usize, n: usize, ld: usize) -> usize {
    let (rows, cols) = match layout {
        MatrixLayout::ColMajor => (m, n),
        MatrixLayout::RowMajor => (n, m),
    };
    if rows == 0 || cols == 0 {
        0
    } else {
        (cols - 1) * ld + rows
    }
}

/// True if the m×n matrix stored in `a` has a NaN entry.
pub fn ge_nancheck<T: FloatT>(layout: MatrixLayout, m: usize, n: usize, a: &[T], ld: usize) -> bool {
    // each contiguous run of storage is checked as one slice
    let (rows, cols) = match layout {
        MatrixLayout::ColMajor => (m, n),
        MatrixLayout::RowMajor => (n, m),
    };
    (0..cols).any(|j| a[j * ld..j * ld + rows].has_nan())
}

/// True if the `uplo` triangle of the n×n symmetric matrix stored in `a`
/// has a NaN entry.  The other triangle is not read.
pub fn sy_nancheck<T: FloatT>(layout: MatrixLayout, uplo: MatrixTriangle, n: usize, a: &[T], ld: usize) -> bool {
    // the upper triangle of a row major matrix is stored like the lower
    // triangle of a column major one
    let uplo = match layout {
        MatrixLayout::ColMajor => uplo,
        MatrixLayout::RowMajor => uplo.transpose(),
    };
    (0..n).any(|j| {
        let rows = triangle_rows(uplo, j, n);
        a[rows.start + j * ld..rows.end + j * ld].has_nan()
    })
}

/// Copies the m×n matrix `src`, stored in `layout`, into `dst` stored in
/// the other layout.
pub fn ge_trans<T: Copy>(layout: MatrixLayout, m: usize, n: usize, src: &[T], ldsrc: usize, dst: &mut [T], lddst: usize) {
    let out = match layout {
        MatrixLayout::ColMajor => MatrixLayout::RowMajor,
        MatrixLayout::RowMajor => MatrixLayout::ColMajor,
    };
    for j in 0..n {
        for i in 0..m {
            dst[index(out, i, j, lddst)] = src[index(layout, i, j, ldsrc)];
        }
    }
}

/// As [`ge_trans`] for the `uplo` triangle of an n×n symmetric matrix.
/// Entries of `dst` outside the triangle are left alone.
pub fn sy_trans<T: Copy>(
    layout: MatrixLayout,
    uplo: MatrixTriangle,
    n: usize,
    src: &[T],
    ldsrc: usize,
    dst: &mut [T],
    lddst: usize,
) {
    let out = match layout {
        MatrixLayout::ColMajor => MatrixLayout::RowMajor,
        MatrixLayout::RowMajor => MatrixLayout::ColMajor,
    };
    for j in 0..n {
        for i in triangle_rows(uplo, j, n) {
            dst[index(out, i, j, lddst)] = src[index(layout, i, j, ldsrc)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nancheck() {
        // 2×3 column major with ld 3, padding rows hold NaN
        let nan = f64::NAN;
        let mut a = vec![1., 2., nan, 3., 4., nan, 5., 6.];
        assert_eq!(storage_len(MatrixLayout::ColMajor, 2, 3, 3), 8);
        assert!(!ge_nancheck(MatrixLayout::ColMajor, 2, 3, &a, 3));
        a[4] = nan;
        assert!(ge_nancheck(MatrixLayout::ColMajor, 2, 3, &a, 3));

        // 3×3 with NaN only strictly below the diagonal in column major
        let mut s = vec![1., nan, nan, 2., 3., nan, 4., 5., 6.];
        assert!(!sy_nancheck(MatrixLayout::ColMajor, MatrixTriangle::Triu, 3, &s, 3));
        assert!(sy_nancheck(MatrixLayout::ColMajor, MatrixTriangle::Tril, 3, &s, 3));
        // read as row major the same storage holds the transpose
        assert!(!sy_nancheck(MatrixLayout::RowMajor, MatrixTriangle::Tril, 3, &s, 3));
        assert!(sy_nancheck(MatrixLayout::RowMajor, MatrixTriangle::Triu, 3, &s, 3));
        s[4] = nan;
        assert!(sy_nancheck(MatrixLayout::ColMajor, MatrixTriangle::Triu, 3, &s, 3));
    }

    #[test]
    fn test_transposes() {
        // row major 2×3 with ld 4
        let a = [1., 2., 3., 0., 4., 5., 6., 0.];
        let mut b = [0.; 6];
        ge_trans(MatrixLayout::RowMajor, 2, 3, &a, 4, &mut b, 2);
        assert_eq!(b, [1., 4., 2., 5., 3., 6.]);

        let mut c = [0.; 8];
        ge_trans(MatrixLayout::ColMajor, 2, 3, &b, 2, &mut c, 4);
        assert_eq!(c, a);

        // upper triangle of a row major symmetric matrix
        let s = [1., 2., 3., -1., 4., 5., -1., -1., 6.];
        let mut t = [0.; 9];
        sy_trans(MatrixLayout::RowMajor, MatrixTriangle::Triu, 3, &s, 3, &mut t, 3);
        assert_eq!(t, [1., 0., 0., 2., 4., 0., 3., 5., 6.]);
    }
}
