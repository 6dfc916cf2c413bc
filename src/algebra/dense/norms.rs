#![allow(non_snake_case)]
use crate::algebra::*;

/// Updates a scaled sum of squares.
///
/// Returns `(scl, smsq)` such that scl²·smsq = Σ x(i)² + scale²·sumsq,
/// accumulated with the same three bucket scheme as [`nrm2`].  A NaN in
/// `scale` or `sumsq` is returned unchanged.
pub fn lassq<T: FloatT>(n: usize, x: &[T], incx: isize, scale: T, sumsq: T) -> (T, T) {
    let (mut scale, mut sumsq) = (scale, sumsq);
    if scale.is_nan() || sumsq.is_nan() {
        return (scale, sumsq);
    }
    if sumsq == T::zero() {
        scale = T::one();
    }
    if scale == T::zero() {
        scale = T::one();
        sumsq = T::zero();
    }
    if n == 0 {
        return (scale, sumsq);
    }

    let BlueConstants {
        tsml,
        tbig,
        ssml,
        sbig,
    } = BlueConstants::<T>::new();

    let mut notbig = true;
    let mut asml = T::zero();
    let mut amed = T::zero();
    let mut abig = T::zero();

    for ix in strided(n, incx) {
        let ax = x[ix].abs();
        if ax > tbig {
            abig += (ax * sbig) * (ax * sbig);
            notbig = false;
        } else if ax < tsml {
            if notbig {
                asml += (ax * ssml) * (ax * ssml);
            }
        } else {
            amed += ax * ax;
        }
    }

    // fold the incoming sum into the matching bucket
    if sumsq > T::zero() {
        let ax = scale * sumsq.sqrt();
        if ax > tbig {
            if scale > T::one() {
                scale *= sbig;
                abig += scale * (scale * sumsq);
            } else {
                abig += scale * (scale * (sbig * (sbig * sumsq)));
            }
        } else if ax < tsml {
            if notbig {
                if scale < T::one() {
                    scale *= ssml;
                    asml += scale * (scale * sumsq);
                } else {
                    asml += scale * (scale * (ssml * (ssml * sumsq)));
                }
            }
        } else {
            amed += scale * (scale * sumsq);
        }
    }

    combine_buckets(asml, amed, abig, ssml, sbig)
}

// value = max(value, v), except that a NaN sticks
#[inline]
fn max_nan<T: FloatT>(value: T, v: T) -> T {
    if value < v || v.is_nan() {
        v
    } else {
        value
    }
}

/// Norm of a symmetric matrix stored in its `uplo` triangle.
///
/// The one and infinity norms coincide for symmetric matrices and need a
/// workspace of length n.  Entries outside the `uplo` triangle are never
/// read, and NaN entries propagate into the result.
pub fn lansy<T: FloatT>(norm: NormType, uplo: MatrixTriangle, A: BorrowedMatrix<'_, T>, work: &mut [T]) -> T {
    assert!(A.is_square());
    let n = A.nrows();
    if n == 0 {
        return T::zero();
    }

    let rows = |j: usize| match uplo {
        MatrixTriangle::Triu => 0..(j + 1),
        MatrixTriangle::Tril => j..n,
    };

    match norm {
        NormType::Max => {
            let mut value = T::zero();
            for j in 0..n {
                for &a in &A.col(j)[rows(j)] {
                    value = max_nan(value, a.abs());
                }
            }
            value
        }
        NormType::One | NormType::Inf => {
            assert!(work.len() >= n);
            let work = &mut work[..n];
            let mut value = T::zero();
            match uplo {
                MatrixTriangle::Triu => {
                    for j in 0..n {
                        let col = A.col(j);
                        let mut sum = T::zero();
                        for i in 0..j {
                            let absa = col[i].abs();
                            sum += absa;
                            work[i] += absa;
                        }
                        work[j] = sum + col[j].abs();
                    }
                    for &w in work.iter() {
                        value = max_nan(value, w);
                    }
                }
                MatrixTriangle::Tril => {
                    work.iter_mut().for_each(|w| *w = T::zero());
                    for j in 0..n {
                        let col = A.col(j);
                        let mut sum = work[j] + col[j].abs();
                        for i in (j + 1)..n {
                            let absa = col[i].abs();
                            sum += absa;
                            work[i] += absa;
                        }
                        value = max_nan(value, sum);
                    }
                }
            }
            value
        }
        NormType::Frobenius => {
            // strict triangle, counted twice
            let (mut scale, mut sum) = (T::zero(), T::one());
            for j in 0..n {
                let strict = match uplo {
                    MatrixTriangle::Triu => &A.col(j)[..j],
                    MatrixTriangle::Tril => &A.col(j)[(j + 1)..],
                };
                (scale, sum) = lassq(strict.len(), strict, 1, scale, sum);
            }
            sum *= (2.).as_T();

            // diagonal
            (scale, sum) = lassq(n, A.data(), (A.ld + 1) as isize, scale, sum);
            scale * sum.sqrt()
        }
    }
}

/// Norm of the symmetric tridiagonal matrix with diagonal d and
/// off-diagonal e.
pub fn lanst<T: FloatT>(norm: NormType, d: &[T], e: &[T]) -> T {
    let n = d.len();
    if n == 0 {
        return T::zero();
    }
    let e = &e[..n - 1];

    match norm {
        NormType::Max => {
            let mut value = d[n - 1].abs();
            for (&di, &ei) in d.iter().zip(e) {
                value = max_nan(value, di.abs());
                value = max_nan(value, ei.abs());
            }
            value
        }
        NormType::One | NormType::Inf => {
            if n == 1 {
                return d[0].abs();
            }
            let mut value = max_nan(d[0].abs() + e[0].abs(), e[n - 2].abs() + d[n - 1].abs());
            for i in 1..(n - 1) {
                let sum = d[i].abs() + e[i].abs() + e[i - 1].abs();
                value = max_nan(value, sum);
            }
            value
        }
        NormType::Frobenius => {
            let (mut scale, mut sum) = (T::zero(), T::one());
            if n > 1 {
                (scale, sum) = lassq(n - 1, e, 1, scale, sum);
                sum *= (2.).as_T();
            }
            (scale, sum) = lassq(n, d, 1, scale, sum);
            scale * sum.sqrt()
        }
    }
}
