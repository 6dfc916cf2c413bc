#![allow(non_snake_case)]
use crate::algebra::*;

// Vector arguments are (slice, increment) pairs.  A negative increment
// traverses the vector from its end, so that logical element i lives at
// x[(n-1-i)*|inc|].  Every routine is a no-op for n = 0.

/// storage positions of the n logical elements of a strided vector
#[inline]
pub(crate) fn strided(n: usize, inc: isize) -> impl Iterator<Item = usize> {
    (0..n).map(strided_index(n, inc))
}

/// position of logical element i of a strided vector of length n
#[inline]
pub(crate) fn strided_index(n: usize, inc: isize) -> impl Fn(usize) -> usize {
    let start = if inc < 0 {
        (n.saturating_sub(1)) as isize * (-inc)
    } else {
        0
    };
    move |i| (start + i as isize * inc) as usize
}

/// minimum slice length holding n elements with increment inc
#[inline]
pub(crate) fn strided_len(n: usize, inc: isize) -> usize {
    if n == 0 {
        0
    } else {
        1 + (n - 1) * inc.unsigned_abs()
    }
}

/// y ← x
pub fn copy<T: FloatT>(n: usize, x: &[T], incx: isize, y: &mut [T], incy: isize) {
    if incx == 1 && incy == 1 {
        y[..n].copy_from_slice(&x[..n]);
        return;
    }
    for (ix, iy) in strided(n, incx).zip(strided(n, incy)) {
        y[iy] = x[ix];
    }
}

/// x ↔ y
pub fn swap<T: FloatT>(n: usize, x: &mut [T], incx: isize, y: &mut [T], incy: isize) {
    for (ix, iy) in strided(n, incx).zip(strided(n, incy)) {
        std::mem::swap(&mut x[ix], &mut y[iy]);
    }
}

/// x ← αx
pub fn scal<T: FloatT>(n: usize, α: T, x: &mut [T], incx: isize) {
    if incx == 0 {
        return;
    }
    for ix in strided(n, incx) {
        x[ix] *= α;
    }
}

/// y ← αx + y
pub fn axpy<T: FloatT>(n: usize, α: T, x: &[T], incx: isize, y: &mut [T], incy: isize) {
    if n == 0 || α == T::zero() {
        return;
    }
    for (ix, iy) in strided(n, incx).zip(strided(n, incy)) {
        y[iy] += α * x[ix];
    }
}

/// xᵀy, accumulated in the working precision
pub fn dot<T: FloatT>(n: usize, x: &[T], incx: isize, y: &[T], incy: isize) -> T {
    let mut out = T::zero();
    for (ix, iy) in strided(n, incx).zip(strided(n, incy)) {
        out += x[ix] * y[iy];
    }
    out
}

/// Euclidean norm ‖x‖₂.
///
/// Squares are accumulated into three buckets (small, medium and large
/// magnitudes) with Blue's scaling constants, so that no intermediate
/// overflows or underflows even in 16-bit formats.  The norm of an empty
/// vector is zero.
pub fn nrm2<T: FloatT>(n: usize, x: &[T], incx: isize) -> T {
    if n == 0 {
        return T::zero();
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

    let (scl, sumsq) = combine_buckets(asml, amed, abig, ssml, sbig);
    scl * sumsq.sqrt()
}

// Folds the three accumulators of Blue's algorithm into a single
// (scale, sumsq) pair with value scale² · sumsq.
pub(crate) fn combine_buckets<T: FloatT>(asml: T, amed: T, abig: T, ssml: T, sbig: T) -> (T, T) {
    if abig > T::zero() {
        let mut abig = abig;
        // combine abig and amed if amed > 0
        if amed > T::zero() || amed.is_nan() {
            abig += (amed * sbig) * sbig;
        }
        (T::one() / sbig, abig)
    } else if asml > T::zero() {
        // combine amed and asml if asml > 0
        if amed > T::zero() || amed.is_nan() {
            let amed = amed.sqrt();
            let asml = asml.sqrt() / ssml;
            let (ymin, ymax) = if asml > amed {
                (amed, asml)
            } else {
                (asml, amed)
            };
            let r = ymin / ymax;
            (T::one(), ymax * ymax * (T::one() + r * r))
        } else {
            (T::one() / ssml, asml)
        }
    } else {
        (T::one(), amed)
    }
}
