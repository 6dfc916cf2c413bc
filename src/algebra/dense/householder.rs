#![allow(non_snake_case)]
use crate::algebra::*;

// Elementary reflectors H = I - τ v vᵀ.  The unit element of v is never
// stored: it is the first entry of v for the "f" routines and the last
// entry for the "l" routines, and the slice entry at that position is
// not read.

/// Generates an elementary reflector H such that H (α, x) = (β, 0).
///
/// On exit `alpha` holds β and x holds v(1:n-1).  Returns τ, which is zero
/// (H = I) when x is already zero.  If β is tiny, x and α are rescaled up
/// to 20 times before the reflector is formed, and the scaling is undone
/// on β.
pub fn larfg<T: FloatT>(n: usize, alpha: &mut T, x: &mut [T], incx: isize) -> T {
    if n <= 1 {
        return T::zero();
    }

    let mut xnorm = nrm2(n - 1, x, incx);
    if xnorm == T::zero() {
        return T::zero();
    }

    let mut beta = -alpha.lapy2(xnorm).sign(*alpha);
    let mach = MachineParameters::<T>::new();
    let safmin = mach.sfmin / mach.eps;

    let mut knt = 0;
    if beta.abs() < safmin {
        // xnorm and beta may be inaccurate; scale x and recompute them
        let rsafmn = T::one() / safmin;
        loop {
            knt += 1;
            scal(n - 1, rsafmn, x, incx);
            beta *= rsafmn;
            *alpha *= rsafmn;
            if beta.abs() >= safmin || knt >= 20 {
                break;
            }
        }
        xnorm = nrm2(n - 1, x, incx);
        beta = -alpha.lapy2(xnorm).sign(*alpha);
    }

    let tau = (beta - *alpha) / beta;
    scal(n - 1, T::one() / (*alpha - beta), x, incx);

    for _ in 0..knt {
        beta *= safmin;
    }
    *alpha = beta;
    tau
}

/// Number of leading rows of A up to its last non-zero row.
pub fn ilalr<T: FloatT>(A: BorrowedMatrix<'_, T>) -> usize {
    let (m, n) = A.size();
    if m == 0 || n == 0 {
        return 0;
    }
    if A[(m - 1, 0)] != T::zero() || A[(m - 1, n - 1)] != T::zero() {
        return m;
    }
    (0..n)
        .filter_map(|j| A.col(j).iter().rposition(|&a| a != T::zero()))
        .map(|i| i + 1)
        .max()
        .unwrap_or(0)
}

/// Number of leading columns of A up to its last non-zero column.
pub fn ilalc<T: FloatT>(A: BorrowedMatrix<'_, T>) -> usize {
    let (m, n) = A.size();
    if m == 0 || n == 0 {
        return 0;
    }
    if A[(0, n - 1)] != T::zero() || A[(m - 1, n - 1)] != T::zero() {
        return n;
    }
    (0..n)
        .rev()
        .find(|&j| A.col(j).iter().any(|&a| a != T::zero()))
        .map_or(0, |j| j + 1)
}

/// Applies H = I - τ v vᵀ with v(0) = 1 to C from the left or the right.
///
/// v has length m (left) or n (right).  Trailing zeros of v and the
/// matching zero columns (left) or rows (right) of C are skipped.  `work`
/// needs n (left) or m (right) entries.
pub fn larf1f<T: FloatT>(side: MatrixSide, v: &[T], τ: T, mut C: BorrowedMatrixMut<'_, T>, work: &mut [T]) -> Result<(), LapackError> {
    let (m, n) = C.size();
    let nv = if side == MatrixSide::Left { m } else { n };
    if v.len() < nv {
        return Err(LapackError::illegal("LARF1F", 5));
    }
    let nw = if side == MatrixSide::Left { n } else { m };
    if work.len() < nw {
        return Err(LapackError::illegal("LARF1F", 9));
    }
    if τ == T::zero() || nv == 0 {
        return Ok(());
    }

    // v(lastv-1) is the last non-zero entry, or the unit entry
    let mut lastv = nv;
    while lastv > 1 && v[lastv - 1] == T::zero() {
        lastv -= 1;
    }
    let v = &v[..lastv];

    match side {
        MatrixSide::Left => {
            let lastc = ilalc(C.view(0, 0, lastv, n));
            if lastc == 0 {
                return Ok(());
            }
            if lastv == 1 {
                let s = T::one() - τ;
                for j in 0..lastc {
                    C[(0, j)] *= s;
                }
                return Ok(());
            }
            let w = &mut work[..lastc];
            // w = C(1:lastv, 0:lastc)ᵀ v(1:lastv) + C(0, 0:lastc)ᵀ
            gemv(MatrixShape::T, T::one(), C.view(1, 0, lastv - 1, lastc), &v[1..], 1, T::zero(), w, 1)?;
            for (j, wj) in w.iter_mut().enumerate() {
                *wj += C[(0, j)];
            }
            for (j, &wj) in w.iter().enumerate() {
                C[(0, j)] -= τ * wj;
            }
            ger(-τ, &v[1..], 1, w, 1, C.view_mut(1, 0, lastv - 1, lastc))?;
        }
        MatrixSide::Right => {
            let lastc = ilalr(C.view(0, 0, m, lastv));
            if lastc == 0 {
                return Ok(());
            }
            if lastv == 1 {
                let s = T::one() - τ;
                C.col_mut(0)[..lastc].iter_mut().for_each(|c| *c *= s);
                return Ok(());
            }
            let w = &mut work[..lastc];
            // w = C(0:lastc, 1:lastv) v(1:lastv) + C(0:lastc, 0)
            gemv(MatrixShape::N, T::one(), C.view(0, 1, lastc, lastv - 1), &v[1..], 1, T::zero(), w, 1)?;
            axpy(lastc, T::one(), C.col(0), 1, w, 1);
            axpy(lastc, -τ, w, 1, C.col_mut(0), 1);
            ger(-τ, w, 1, &v[1..], 1, C.view_mut(0, 1, lastc, lastv - 1))?;
        }
    }
    Ok(())
}

/// Applies H = I - τ v vᵀ with v(len-1) = 1 to C from the left or the right.
///
/// Like [`larf1f`], with the unit element at the end of v.  Leading zeros
/// of v are skipped.
pub fn larf1l<T: FloatT>(side: MatrixSide, v: &[T], τ: T, mut C: BorrowedMatrixMut<'_, T>, work: &mut [T]) -> Result<(), LapackError> {
    let (m, n) = C.size();
    let nv = if side == MatrixSide::Left { m } else { n };
    if v.len() < nv {
        return Err(LapackError::illegal("LARF1L", 5));
    }
    let nw = if side == MatrixSide::Left { n } else { m };
    if work.len() < nw {
        return Err(LapackError::illegal("LARF1L", 9));
    }
    if τ == T::zero() || nv == 0 {
        return Ok(());
    }

    let last = nv - 1;
    let mut firstv = 0;
    while firstv < last && v[firstv] == T::zero() {
        firstv += 1;
    }
    let len = last - firstv;
    let vhead = &v[firstv..last];

    match side {
        MatrixSide::Left => {
            let lastc = ilalc(C.view(firstv, 0, len + 1, n));
            if lastc == 0 {
                return Ok(());
            }
            if len == 0 {
                let s = T::one() - τ;
                for j in 0..lastc {
                    C[(last, j)] *= s;
                }
                return Ok(());
            }
            let w = &mut work[..lastc];
            // w = C(firstv:last, 0:lastc)ᵀ vhead + C(last, 0:lastc)ᵀ
            gemv(MatrixShape::T, T::one(), C.view(firstv, 0, len, lastc), vhead, 1, T::zero(), w, 1)?;
            for (j, wj) in w.iter_mut().enumerate() {
                *wj += C[(last, j)];
            }
            for (j, &wj) in w.iter().enumerate() {
                C[(last, j)] -= τ * wj;
            }
            ger(-τ, vhead, 1, w, 1, C.view_mut(firstv, 0, len, lastc))?;
        }
        MatrixSide::Right => {
            let lastc = ilalr(C.view(0, firstv, m, len + 1));
            if lastc == 0 {
                return Ok(());
            }
            if len == 0 {
                let s = T::one() - τ;
                C.col_mut(last)[..lastc].iter_mut().for_each(|c| *c *= s);
                return Ok(());
            }
            let w = &mut work[..lastc];
            // w = C(0:lastc, firstv:last) vhead + C(0:lastc, last)
            gemv(MatrixShape::N, T::one(), C.view(0, firstv, lastc, len), vhead, 1, T::zero(), w, 1)?;
            axpy(lastc, T::one(), C.col(last), 1, w, 1);
            axpy(lastc, -τ, w, 1, C.col_mut(last), 1);
            ger(-τ, w, 1, vhead, 1, C.view_mut(0, firstv, lastc, len))?;
        }
    }
    Ok(())
}

/// Forms the triangular factor T of a block reflector H = I - V T Vᵀ
/// (columnwise) or H = I - Vᵀ T V (rowwise).
///
/// V holds k reflectors of order n, so it is n×k when stored columnwise
/// and k×n when stored rowwise.  For a forward product H = H(1)…H(k) the
/// factor is upper triangular, for a backward product H = H(k)…H(1) it is
/// lower triangular.  The unit elements and the zero part of V are not
/// read, and neither is the opposite triangle of T.
///
/// The factor is assembled recursively from the factors of the two halves
/// of the reflector set.
pub fn larft<T: FloatT>(
    direct: ReflectorDirection,
    storev: ReflectorStorage,
    V: BorrowedMatrix<'_, T>,
    tau: &[T],
    mut Tf: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let (n, k) = match storev {
        ReflectorStorage::Columnwise => V.size(),
        ReflectorStorage::Rowwise => (V.ncols(), V.nrows()),
    };
    if tau.len() < k {
        return Err(LapackError::illegal("LARFT", 7));
    }
    if Tf.size() != (k, k) {
        return Err(LapackError::illegal("LARFT", 8));
    }
    if n == 0 || k == 0 {
        return Ok(());
    }
    if n == 1 || k == 1 {
        Tf[(0, 0)] = tau[0];
        return Ok(());
    }

    let l = k / 2;
    let one = T::one();
    use MatrixShape::{N, T as Tr};
    use MatrixSide::{Left, Right};
    use MatrixTriangle::{Tril, Triu};
    use MatrixDiag::{NonUnit, Unit};

    match (direct, storev) {
        (ReflectorDirection::Forward, ReflectorStorage::Columnwise) => {
            // V = [V11 0; V21 V22; V31 V32], V11 and V22 unit lower
            larft(direct, storev, V.view(0, 0, n, l), &tau[..l], Tf.view_mut(0, 0, l, l))?;
            larft(direct, storev, V.view(l, l, n - l, k - l), &tau[l..k], Tf.view_mut(l, l, k - l, k - l))?;

            // T12 = V21ᵀ V22 + V31ᵀ V32
            for j in 0..(k - l) {
                for i in 0..l {
                    Tf[(i, l + j)] = V[(l + j, i)];
                }
            }
            trmm(Right, Tril, N, Unit, one, V.view(l, l, k - l, k - l), Tf.view_mut(0, l, l, k - l))?;
            gemm(Tr, N, one, V.view(k, 0, n - k, l), V.view(k, l, n - k, k - l), one, Tf.view_mut(0, l, l, k - l))?;

            // T12 = -T11 T12 T22
            trmm_within(Left, Triu, N, NonUnit, -one, Tf.rb_mut(), (0, 0), (0, l), l, k - l);
            trmm_within(Right, Triu, N, NonUnit, one, Tf.rb_mut(), (l, l), (0, l), l, k - l);
        }
        (ReflectorDirection::Forward, ReflectorStorage::Rowwise) => {
            // V = [V11 V12 V13; 0 V22 V23], V11 and V22 unit upper
            larft(direct, storev, V.view(0, 0, l, n), &tau[..l], Tf.view_mut(0, 0, l, l))?;
            larft(direct, storev, V.view(l, l, k - l, n - l), &tau[l..k], Tf.view_mut(l, l, k - l, k - l))?;

            // T12 = V12 V22ᵀ + V13 V23ᵀ
            for j in 0..(k - l) {
                for i in 0..l {
                    Tf[(i, l + j)] = V[(i, l + j)];
                }
            }
            trmm(Right, Triu, Tr, Unit, one, V.view(l, l, k - l, k - l), Tf.view_mut(0, l, l, k - l))?;
            gemm(N, Tr, one, V.view(0, k, l, n - k), V.view(l, k, k - l, n - k), one, Tf.view_mut(0, l, l, k - l))?;

            trmm_within(Left, Triu, N, NonUnit, -one, Tf.rb_mut(), (0, 0), (0, l), l, k - l);
            trmm_within(Right, Triu, N, NonUnit, one, Tf.rb_mut(), (l, l), (0, l), l, k - l);
        }
        (ReflectorDirection::Backward, ReflectorStorage::Columnwise) => {
            // V = [V11 V12; V21 V22; 0 V32] with the unit upper blocks V21
            // and V32 ending at rows n-k+l and n
            let p = n - k;
            larft(direct, storev, V.view(0, 0, p + l, l), &tau[..l], Tf.view_mut(0, 0, l, l))?;
            larft(direct, storev, V.view(0, l, n, k - l), &tau[l..k], Tf.view_mut(l, l, k - l, k - l))?;

            // T21 = V22ᵀ V21 + V12ᵀ V11
            for j in 0..l {
                for i in 0..(k - l) {
                    Tf[(l + i, j)] = V[(p + j, l + i)];
                }
            }
            trmm(Right, Triu, N, Unit, one, V.view(p, 0, l, l), Tf.view_mut(l, 0, k - l, l))?;
            gemm(Tr, N, one, V.view(0, l, p, k - l), V.view(0, 0, p, l), one, Tf.view_mut(l, 0, k - l, l))?;

            // T21 = -T22 T21 T11
            trmm_within(Left, Tril, N, NonUnit, -one, Tf.rb_mut(), (l, l), (l, 0), k - l, l);
            trmm_within(Right, Tril, N, NonUnit, one, Tf.rb_mut(), (0, 0), (l, 0), k - l, l);
        }
        (ReflectorDirection::Backward, ReflectorStorage::Rowwise) => {
            // V = [V11 V12 0; V21 V22 V23] with the unit lower blocks V12
            // and V23 ending at columns n-k+l and n
            let p = n - k;
            larft(direct, storev, V.view(0, 0, l, p + l), &tau[..l], Tf.view_mut(0, 0, l, l))?;
            larft(direct, storev, V.view(l, 0, k - l, n), &tau[l..k], Tf.view_mut(l, l, k - l, k - l))?;

            // T21 = V22 V12ᵀ + V21 V11ᵀ
            for j in 0..l {
                for i in 0..(k - l) {
                    Tf[(l + i, j)] = V[(l + i, p + j)];
                }
            }
            trmm(Right, Tril, Tr, Unit, one, V.view(0, p, l, l), Tf.view_mut(l, 0, k - l, l))?;
            gemm(N, Tr, one, V.view(l, 0, k - l, p), V.view(0, 0, l, p), one, Tf.view_mut(l, 0, k - l, l))?;

            trmm_within(Left, Tril, N, NonUnit, -one, Tf.rb_mut(), (l, l), (l, 0), k - l, l);
            trmm_within(Right, Tril, N, NonUnit, one, Tf.rb_mut(), (0, 0), (l, 0), k - l, l);
        }
    }
    Ok(())
}

/// Applies the block reflector H = I - V T Vᵀ (or its transpose) to C
/// from the left or the right.
///
/// V and T are as produced for [`larft`], with k = T.nrows() reflectors of
/// order m (left) or n (right).  `work` must be at least n×k (left) or
/// m×k (right).
#[allow(clippy::too_many_arguments)]
pub fn larfb<T: FloatT>(
    side: MatrixSide,
    trans: MatrixShape,
    direct: ReflectorDirection,
    storev: ReflectorStorage,
    V: BorrowedMatrix<'_, T>,
    Tf: BorrowedMatrix<'_, T>,
    mut C: BorrowedMatrixMut<'_, T>,
    work: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let (m, n) = C.size();
    let k = Tf.nrows();
    let nv = if side == MatrixSide::Left { m } else { n };
    let nw = if side == MatrixSide::Left { n } else { m };

    let vsize = match storev {
        ReflectorStorage::Columnwise => (nv, k),
        ReflectorStorage::Rowwise => (k, nv),
    };
    if V.size() != vsize || k > nv {
        return Err(LapackError::illegal("LARFB", 9));
    }
    if !Tf.is_square() {
        return Err(LapackError::illegal("LARFB", 11));
    }
    if work.nrows() < nw || work.ncols() < k {
        return Err(LapackError::illegal("LARFB", 15));
    }
    if m == 0 || n == 0 || k == 0 {
        return Ok(());
    }
    let mut W = work.into_view(0, 0, nw, k);

    let one = T::one();
    let nr = nv - k;
    // offset of the unit triangle of V and of the remaining part of C
    let (unit_at, rest_at) = match direct {
        ReflectorDirection::Forward => (0, k),
        ReflectorDirection::Backward => (nr, 0),
    };
    // storage triangle of the unit block and of T
    let (vtri, ttri) = match (direct, storev) {
        (ReflectorDirection::Forward, ReflectorStorage::Columnwise) => (MatrixTriangle::Tril, MatrixTriangle::Triu),
        (ReflectorDirection::Forward, ReflectorStorage::Rowwise) => (MatrixTriangle::Triu, MatrixTriangle::Triu),
        (ReflectorDirection::Backward, ReflectorStorage::Columnwise) => (MatrixTriangle::Triu, MatrixTriangle::Tril),
        (ReflectorDirection::Backward, ReflectorStorage::Rowwise) => (MatrixTriangle::Tril, MatrixTriangle::Tril),
    };
    // Vu is the unit block and Vr the rest of V, in stored orientation.
    // vop turns Vu and Vr into their columnwise form.
    let (Vu, Vr, vop) = match storev {
        ReflectorStorage::Columnwise => (V.view(unit_at, 0, k, k), V.view(rest_at, 0, nr, k), MatrixShape::N),
        ReflectorStorage::Rowwise => (V.view(0, unit_at, k, k), V.view(0, rest_at, k, nr), MatrixShape::T),
    };
    let top = if side == MatrixSide::Left { trans.flip() } else { trans };

    match side {
        MatrixSide::Left => {
            // W = Cuᵀ Vu + Crᵀ Vr
            for j in 0..k {
                for i in 0..n {
                    W[(i, j)] = C[(unit_at + j, i)];
                }
            }
            trmm(MatrixSide::Right, vtri, vop, MatrixDiag::Unit, one, Vu, W.rb_mut())?;
            if nr > 0 {
                gemm(MatrixShape::T, vop, one, C.view(rest_at, 0, nr, n), Vr, one, W.rb_mut())?;
            }
            // W = W op(T)ᵀ
            trmm(MatrixSide::Right, ttri, top, MatrixDiag::NonUnit, one, Tf, W.rb_mut())?;

            // C = C - V Wᵀ
            if nr > 0 {
                gemm(vop, MatrixShape::T, -one, Vr, W.rb(), one, C.view_mut(rest_at, 0, nr, n))?;
            }
            trmm(MatrixSide::Right, vtri, vop.flip(), MatrixDiag::Unit, one, Vu, W.rb_mut())?;
            for j in 0..k {
                for i in 0..n {
                    C[(unit_at + j, i)] -= W[(i, j)];
                }
            }
        }
        MatrixSide::Right => {
            // W = Cu Vu + Cr Vr
            for j in 0..k {
                W.col_mut(j).copy_from_slice(C.col(unit_at + j));
            }
            trmm(MatrixSide::Right, vtri, vop, MatrixDiag::Unit, one, Vu, W.rb_mut())?;
            if nr > 0 {
                gemm(MatrixShape::N, vop, one, C.view(0, rest_at, m, nr), Vr, one, W.rb_mut())?;
            }
            // W = W op(T)
            trmm(MatrixSide::Right, ttri, top, MatrixDiag::NonUnit, one, Tf, W.rb_mut())?;

            // C = C - W Vᵀ
            if nr > 0 {
                gemm(MatrixShape::N, vop.flip(), -one, W.rb(), Vr, one, C.view_mut(0, rest_at, m, nr))?;
            }
            trmm(MatrixSide::Right, vtri, vop.flip(), MatrixDiag::Unit, one, Vu, W.rb_mut())?;
            for j in 0..k {
                for (c, &w) in C.col_mut(unit_at + j).iter_mut().zip(W.col(j)) {
                    *c -= w;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::test_utils::{matmul, max_abs_diff, random_matrix};
    use itertools::iproduct;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    // I - τ v vᵀ
    fn dense_reflector(v: &[f64], τ: f64) -> Matrix<f64> {
        let n = v.len();
        let mut H = Matrix::<f64>::identity(n);
        for j in 0..n {
            for i in 0..n {
                H[(i, j)] -= τ * v[i] * v[j];
            }
        }
        H
    }

    // explicit reflector vector i of a block, with the unit and zero
    // entries filled in
    fn reflector_vector(V: &Matrix<f64>, direct: ReflectorDirection, storev: ReflectorStorage, i: usize) -> Vec<f64> {
        let Vc = match storev {
            ReflectorStorage::Columnwise => V.clone(),
            ReflectorStorage::Rowwise => V.transpose(),
        };
        let (n, k) = Vc.size;
        let unit = match direct {
            ReflectorDirection::Forward => i,
            ReflectorDirection::Backward => n - k + i,
        };
        (0..n)
            .map(|r| match (direct, r.cmp(&unit)) {
                (_, std::cmp::Ordering::Equal) => 1.,
                (ReflectorDirection::Forward, std::cmp::Ordering::Less) => 0.,
                (ReflectorDirection::Backward, std::cmp::Ordering::Greater) => 0.,
                _ => Vc[(r, i)],
            })
            .collect()
    }

    #[test]
    fn test_larfg_annihilates() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in 1..=16 {
            for case in 0..4 {
                let mut x: Vec<f64> = match case {
                    0 => (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect(),
                    1 => vec![0.5; n],
                    2 => vec![0.; n],
                    _ => (0..n).map(|i| if i == n / 2 { 1e300 } else { 1e-3 }).collect(),
                };
                let orig = x.clone();
                let mut alpha = x[0];
                let tau = larfg(n, &mut alpha, &mut x[1..], 1);

                let mut v = x.clone();
                v[0] = 1.;
                let H = dense_reflector(&v, tau);
                let scale = orig.iter().fold(0f64, |a, &b| a.max(b.abs())).max(1e-300);
                for i in 0..n {
                    let hx: f64 = (0..n).map(|j| H[(i, j)] * orig[j]).sum();
                    let expected = if i == 0 { alpha } else { 0. };
                    assert!((hx - expected).abs() <= 1e-13 * scale, "n = {n}, case = {case}");
                }
            }
        }
    }

    #[test]
    fn test_larfg_tiny_beta() {
        // the reflector is formed after rescaling x
        let mut x = [3e-310f64, 4e-310];
        let mut alpha = 0f64;
        let tau = larfg(3, &mut alpha, &mut x, 1);
        assert!((alpha.abs() - 5e-310).abs() < 1e-320);
        assert_eq!(tau, 1.);
    }

    #[test]
    fn test_larf_trims_and_applies() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let τ = 1.3;
        for side in [MatrixSide::Left, MatrixSide::Right] {
            let (m, n) = (6, 5);
            let nv = if side == MatrixSide::Left { m } else { n };
            let mut C = random_matrix(&mut rng, m, n);
            // a zero column and a zero row to be skipped
            C.col_mut(n - 1).fill(0.);
            for j in 0..n {
                C[(m - 1, j)] = 0.;
            }

            let mut v: Vec<f64> = (0..nv).map(|_| rng.gen_range(-1.0..1.0)).collect();
            v[nv - 1] = 0.;
            v[nv - 2] = 0.;
            let mut work = vec![0.; usize::max(m, n)];

            // unit first
            let mut vf = v.clone();
            vf[0] = 1.;
            let H = dense_reflector(&vf, τ);
            let expected = if side == MatrixSide::Left { matmul(&H, &C) } else { matmul(&C, &H) };
            let mut Cf = C.clone();
            vf[0] = 99.;
            larf1f(side, &vf, τ, Cf.rb_mut(), &mut work).unwrap();
            assert!(max_abs_diff(&Cf, &expected) < 1e-14);

            // unit last
            let mut vl = v.clone();
            vl.reverse();
            vl[nv - 1] = 1.;
            let H = dense_reflector(&vl, τ);
            let expected = if side == MatrixSide::Left { matmul(&H, &C) } else { matmul(&C, &H) };
            let mut Cl = C.clone();
            vl[nv - 1] = 99.;
            larf1l(side, &vl, τ, Cl.rb_mut(), &mut work).unwrap();
            assert!(max_abs_diff(&Cl, &expected) < 1e-14);
        }
    }

    #[test]
    fn test_larf_short_workspace() {
        let v = [1., 0.5, 0.25];
        let C0 = Matrix::<f64>::from(&[
            [1., 2.],
            [3., 4.],
            [5., 6.],
        ]);

        // left needs ncols(C) = 2 entries, right needs nrows(C) = 2 entries
        let mut C = C0.clone();
        let err = larf1f(MatrixSide::Left, &v, 1.2, C.rb_mut(), &mut [0.]);
        assert_eq!(err, Err(LapackError::illegal("LARF1F", 9)));
        let err = larf1l(MatrixSide::Left, &v, 1.2, C.rb_mut(), &mut []);
        assert_eq!(err, Err(LapackError::illegal("LARF1L", 9)));
        assert_eq!(C, C0);

        let mut C = C0.transpose();
        let err = larf1f(MatrixSide::Right, &v, 1.2, C.rb_mut(), &mut [0.]);
        assert_eq!(err, Err(LapackError::illegal("LARF1F", 9)));
        let err = larf1l(MatrixSide::Right, &v, 1.2, C.rb_mut(), &mut []);
        assert_eq!(err, Err(LapackError::illegal("LARF1L", 9)));
        assert_eq!(C, C0.transpose());

        // checked before the early return for τ = 0
        let mut C = Matrix::<f64>::identity(3);
        let err = larf1f(MatrixSide::Left, &v, 0., C.rb_mut(), &mut []);
        assert_eq!(err, Err(LapackError::illegal("LARF1F", 9)));
    }

    #[test]
    fn test_larft_base_cases() {
        let V = Matrix::<f64>::from(&[[1.], [0.5]]);
        let mut Tf = Matrix::<f64>::from(&[[0.]]);
        larft(ReflectorDirection::Forward, ReflectorStorage::Columnwise, V.rb(), &[1.5], Tf.rb_mut()).unwrap();
        assert_eq!(Tf[(0, 0)], 1.5);

        let V = Matrix::<f64>::zeros((0, 0));
        let mut Tf = Matrix::<f64>::zeros((0, 0));
        larft(ReflectorDirection::Backward, ReflectorStorage::Rowwise, V.rb(), &[], Tf.rb_mut()).unwrap();
    }

    #[test]
    fn test_block_reflector_matches_product() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (nv, k, nc) = (9, 5, 4);

        for (direct, storev, side, trans) in iproduct!(
            [ReflectorDirection::Forward, ReflectorDirection::Backward],
            [ReflectorStorage::Columnwise, ReflectorStorage::Rowwise],
            [MatrixSide::Left, MatrixSide::Right],
            [MatrixShape::N, MatrixShape::T]
        ) {
            let V = match storev {
                ReflectorStorage::Columnwise => random_matrix(&mut rng, nv, k),
                ReflectorStorage::Rowwise => random_matrix(&mut rng, k, nv),
            };
            let tau: Vec<f64> = (0..k).map(|_| rng.gen_range(0.5..1.5)).collect();

            // explicit product of the reflectors
            let mut H = Matrix::<f64>::identity(nv);
            for i in 0..k {
                let Hi = dense_reflector(&reflector_vector(&V, direct, storev, i), tau[i]);
                H = match direct {
                    ReflectorDirection::Forward => matmul(&H, &Hi),
                    ReflectorDirection::Backward => matmul(&Hi, &H),
                };
            }
            let Hop = if trans == MatrixShape::N { H } else { H.transpose() };

            let C = match side {
                MatrixSide::Left => random_matrix(&mut rng, nv, nc),
                MatrixSide::Right => random_matrix(&mut rng, nc, nv),
            };
            let expected = match side {
                MatrixSide::Left => matmul(&Hop, &C),
                MatrixSide::Right => matmul(&C, &Hop),
            };

            // garbage in the opposite triangle of T must not matter
            let mut Tf = Matrix::<f64>::from(&[[99.; 5]; 5]);
            larft(direct, storev, V.rb(), &tau, Tf.rb_mut()).unwrap();

            let mut Cb = C.clone();
            let mut work = Matrix::<f64>::zeros((nc, k));
            larfb(side, trans, direct, storev, V.rb(), Tf.rb(), Cb.rb_mut(), work.rb_mut()).unwrap();
            let scale = expected.data.iter().fold(1f64, |a, &b| a.max(b.abs()));
            assert!(
                max_abs_diff(&Cb, &expected) < 1e-12 * scale,
                "{direct:?} {storev:?} {side:?} {trans:?}"
            );
        }
    }
}
