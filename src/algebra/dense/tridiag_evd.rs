#![allow(non_snake_case)]
use crate::algebra::*;

/// Eigenvalues of the symmetric 2×2 matrix [a b; b c].
///
/// Returns `(rt1, rt2)` with |rt1| ≥ |rt2|.  rt1 is accurate to a few ulps
/// and rt2 is computed from rt1 and the determinant, which keeps it
/// accurate unless it suffers from cancellation in the determinant itself.
pub fn lae2<T: FloatT>(a: T, b: T, c: T) -> (T, T) {
    let half: T = (0.5).as_T();
    let two: T = (2.).as_T();

    let sm = a + c;
    let df = a - c;
    let adf = df.abs();
    let tb = b + b;
    let ab = tb.abs();
    let (acmx, acmn) = if a.abs() > c.abs() { (a, c) } else { (c, a) };

    let rt = if adf > ab {
        adf * (T::one() + (ab / adf) * (ab / adf)).sqrt()
    } else if adf < ab {
        ab * (T::one() + (adf / ab) * (adf / ab)).sqrt()
    } else {
        ab * two.sqrt()
    };

    if sm < T::zero() {
        let rt1 = half * (sm - rt);
        (rt1, (acmx / rt1) * acmn - (b / rt1) * b)
    } else if sm > T::zero() {
        let rt1 = half * (sm + rt);
        (rt1, (acmx / rt1) * acmn - (b / rt1) * b)
    } else {
        (half * rt, -half * rt)
    }
}

/// Eigen-decomposition of the symmetric 2×2 matrix [a b; b c].
///
/// Returns `(rt1, rt2, cs1, sn1)` with |rt1| ≥ |rt2| and (cs1, sn1) the
/// unit right eigenvector for rt1, so that
///
/// ```text
/// [ cs1  sn1 ] [ a  b ] [ cs1 -sn1 ]  =  [ rt1  0  ]
/// [-sn1  cs1 ] [ b  c ] [ sn1  cs1 ]     [  0  rt2 ]
/// ```
pub fn laev2<T: FloatT>(a: T, b: T, c: T) -> (T, T, T, T) {
    let half: T = (0.5).as_T();
    let two: T = (2.).as_T();
    let one = T::one();

    let sm = a + c;
    let df = a - c;
    let adf = df.abs();
    let tb = b + b;
    let ab = tb.abs();
    let (acmx, acmn) = if a.abs() > c.abs() { (a, c) } else { (c, a) };

    let rt = if adf > ab {
        adf * (one + (ab / adf) * (ab / adf)).sqrt()
    } else if adf < ab {
        ab * (one + (adf / ab) * (adf / ab)).sqrt()
    } else {
        ab * two.sqrt()
    };

    let (rt1, rt2, sgn1) = if sm < T::zero() {
        let rt1 = half * (sm - rt);
        (rt1, (acmx / rt1) * acmn - (b / rt1) * b, -1)
    } else if sm > T::zero() {
        let rt1 = half * (sm + rt);
        (rt1, (acmx / rt1) * acmn - (b / rt1) * b, 1)
    } else {
        (half * rt, -half * rt, 1)
    };

    // eigenvector
    let (cs, sgn2) = if df >= T::zero() { (df + rt, 1) } else { (df - rt, -1) };
    let (mut cs1, mut sn1);
    if cs.abs() > ab {
        let ct = -tb / cs;
        sn1 = one / (one + ct * ct).sqrt();
        cs1 = ct * sn1;
    } else if ab == T::zero() {
        cs1 = one;
        sn1 = T::zero();
    } else {
        let tn = -cs / tb;
        cs1 = one / (one + tn * tn).sqrt();
        sn1 = tn * cs1;
    }
    if sgn1 == sgn2 {
        let tn = cs1;
        cs1 = -sn1;
        sn1 = tn;
    }
    (rt1, rt2, cs1, sn1)
}

/// Plane rotation with
///
/// ```text
/// [  c  s ] [ f ]  =  [ r ]
/// [ -s  c ] [ g ]     [ 0 ]
/// ```
///
/// returned as `(c, s, r)`.  With g = 0 the rotation is the identity, and
/// with f = 0 it swaps the entries (c = 0, r = |g|).  Otherwise r has the
/// sign of f.  Arguments close to the limits of the format are scaled
/// before squaring.
pub fn lartg<T: FloatT>(f: T, g: T) -> (T, T, T) {
    let one = T::one();
    let zero = T::zero();
    let safmin = MachineParameters::<T>::new().sfmin;
    let safmax = one / safmin;
    let rtmin = safmin.sqrt();
    let rtmax = (safmax / (2.).as_T()).sqrt();

    let f1 = f.abs();
    let g1 = g.abs();
    if g == zero {
        (one, zero, f)
    } else if f == zero {
        (zero, one.sign(g), g1)
    } else if f1 > rtmin && f1 < rtmax && g1 > rtmin && g1 < rtmax {
        let d = (f * f + g * g).sqrt();
        let c = f1 / d;
        let r = d.sign(f);
        (c, g / r, r)
    } else {
        let u = T::min(safmax, T::max(safmin, T::max(f1, g1)));
        let fs = f / u;
        let gs = g / u;
        let d = (fs * fs + gs * gs).sqrt();
        let c = fs.abs() / d;
        let r = d.sign(f);
        (c, gs / r, r * u)
    }
}

/// Applies a sequence of z-1 plane rotations to A from the left (z = m)
/// or the right (z = n).
///
/// Rotation k acts on the pair of rows (left) or columns (right) chosen by
/// `pivot`: (k, k+1), (0, k+1) or (k, z-1).  For a pair (p, q) with
/// entries x, y the rotation gives p ← c·x + s·y and q ← c·y - s·x.  The
/// rotations are applied in the order 0, 1, … for `Forward` and in reverse
/// for `Backward`.
pub fn lasr<T: FloatT>(
    side: MatrixSide,
    pivot: RotationPivot,
    direct: ReflectorDirection,
    c: &[T],
    s: &[T],
    mut A: BorrowedMatrixMut<'_, T>,
) -> Result<(), LapackError> {
    let (m, n) = A.size();
    let z = if side == MatrixSide::Left { m } else { n };
    let nrot = z.saturating_sub(1);
    if c.len() < nrot {
        return Err(LapackError::illegal("LASR", 6));
    }
    if s.len() < nrot {
        return Err(LapackError::illegal("LASR", 7));
    }
    if m == 0 || n == 0 || nrot == 0 {
        return Ok(());
    }

    for idx in 0..nrot {
        let k = match direct {
            ReflectorDirection::Forward => idx,
            ReflectorDirection::Backward => nrot - 1 - idx,
        };
        let (ct, st) = (c[k], s[k]);
        if ct == T::one() && st == T::zero() {
            continue;
        }
        let (p, q) = match pivot {
            RotationPivot::Variable => (k, k + 1),
            RotationPivot::Top => (0, k + 1),
            RotationPivot::Bottom => (k, z - 1),
        };

        match side {
            MatrixSide::Left => {
                for j in 0..n {
                    let col = A.col_mut(j);
                    let (x, y) = (col[p], col[q]);
                    col[q] = ct * y - st * x;
                    col[p] = st * y + ct * x;
                }
            }
            MatrixSide::Right => {
                let (mut left, mut right) = A.rb_mut().into_split_at_col(q);
                for (xp, yq) in left.col_mut(p).iter_mut().zip(right.col_mut(0)) {
                    let (x, y) = (*xp, *yq);
                    *yq = ct * y - st * x;
                    *xp = st * y + ct * x;
                }
            }
        }
    }
    Ok(())
}

// Thresholds of the tridiagonal QL/QR iterations.  Unreduced blocks are
// scaled so that their largest entry lies in [ssfmin, ssfmax], inside
// which squares and products of entries are safe.
struct SafeRange<T> {
    eps: T,
    eps2: T,
    safmin: T,
    ssfmin: T,
    ssfmax: T,
}

impl<T: FloatT> SafeRange<T> {
    fn new() -> Self {
        let mp = MachineParameters::<T>::new();
        let eps = mp.eps;
        let eps2 = eps * eps;
        let safmin = mp.sfmin;
        let safmax = T::one() / safmin;
        let ssfmax = safmax.sqrt() / (3.).as_T();
        // in binary16 the lower bound exceeds the upper one
        let ssfmin = T::min(safmin.sqrt() / eps2, ssfmax);
        Self {
            eps,
            eps2,
            safmin,
            ssfmin,
            ssfmax,
        }
    }

    // target norm for a block of norm anorm, if it needs scaling
    fn target(&self, anorm: T) -> Option<T> {
        if anorm > self.ssfmax {
            Some(self.ssfmax)
        } else if anorm < self.ssfmin {
            Some(self.ssfmin)
        } else {
            None
        }
    }
}

// x ← x·cto/cfrom without over- or underflow
pub(crate) fn scale_vector<T: FloatT>(cfrom: T, cto: T, x: &mut [T]) -> Result<(), LapackError> {
    let len = x.len();
    if len == 0 {
        return Ok(());
    }
    let X = BorrowedMatrixMut::from_slice_mut(x, len, 1, len).map_err(|_| LapackError::illegal("LASCL", 9))?;
    lascl(ScaleKind::General, cfrom, cto, X)
}

fn count_unconverged<T: FloatT>(e: &[T]) -> usize {
    e.iter().filter(|&&ei| ei != T::zero()).count()
}

/// All eigenvalues of the symmetric tridiagonal matrix with diagonal d
/// and off-diagonal e, by the root free variant of the QL/QR iteration.
///
/// On exit d holds the eigenvalues in ascending order and e is destroyed.
/// The iteration stops after `maxit` sweeps per eigenvalue in total; the
/// number of off-diagonal entries that did not converge to zero is then
/// returned as [`LapackError::NoConvergence`] and d holds the values
/// reached so far, unsorted.
pub fn sterf<T: FloatT>(d: &mut [T], e: &mut [T], maxit: usize) -> Result<(), LapackError> {
    let n = d.len();
    if e.len() < n.saturating_sub(1) {
        return Err(LapackError::illegal("STERF", 3));
    }
    if n <= 1 {
        return Ok(());
    }

    let sr = SafeRange::<T>::new();
    let zero = T::zero();
    let one = T::one();
    let two: T = (2.).as_T();
    let nmaxit = n * maxit;
    let mut jtot = 0;
    let mut l1 = 0;

    while l1 < n {
        // look for a small off-diagonal entry to split at
        if l1 > 0 {
            e[l1 - 1] = zero;
        }
        let mut m = l1;
        while m < n - 1 {
            if e[m].abs() <= (d[m].abs().sqrt() * d[m + 1].abs().sqrt()) * sr.eps {
                e[m] = zero;
                break;
            }
            m += 1;
        }

        let mut l = l1;
        let lsv = l;
        let mut lend = m;
        let lendsv = lend;
        l1 = m + 1;
        if lend == l {
            continue;
        }

        // scale the block d(l:lend), e(l:lend-1)
        let anorm = lanst(NormType::Max, &d[l..=lend], &e[l..lend]);
        if anorm == zero {
            continue;
        }
        let target = sr.target(anorm);
        if let Some(to) = target {
            scale_vector(anorm, to, &mut d[l..=lend])?;
            scale_vector(anorm, to, &mut e[l..lend])?;
        }
        for ei in &mut e[l..lend] {
            *ei = *ei * *ei;
        }

        // QL if the top of the block is the larger end, QR otherwise
        if d[lend].abs() < d[l].abs() {
            lend = lsv;
            l = lendsv;
        }

        if lend >= l {
            loop {
                let mut m = l;
                while m < lend {
                    if e[m].abs() <= sr.eps2 * (d[m] * d[m + 1]).abs() {
                        break;
                    }
                    m += 1;
                }
                if m < lend {
                    e[m] = zero;
                }
                let mut p = d[l];

                if m == l {
                    // eigenvalue found
                    l += 1;
                    if l > lend {
                        break;
                    }
                    continue;
                }
                if m == l + 1 {
                    let (rt1, rt2) = lae2(d[l], e[l].sqrt(), d[l + 1]);
                    d[l] = rt1;
                    d[l + 1] = rt2;
                    e[l] = zero;
                    l += 2;
                    if l > lend {
                        break;
                    }
                    continue;
                }
                if jtot == nmaxit {
                    break;
                }
                jtot += 1;

                // shift
                let rte = e[l].sqrt();
                let mut sigma = (d[l + 1] - p) / (two * rte);
                let r = sigma.lapy2(one);
                sigma = p - (rte / (sigma + r.sign(sigma)));

                let mut c = one;
                let mut s = zero;
                let mut gamma = d[m] - sigma;
                p = gamma * gamma;

                for i in (l..m).rev() {
                    let bb = e[i];
                    let r = p + bb;
                    if i != m - 1 {
                        e[i + 1] = s * r;
                    }
                    let oldc = c;
                    c = p / r;
                    s = bb / r;
                    let oldgam = gamma;
                    let alpha = d[i];
                    gamma = c * (alpha - sigma) - s * oldgam;
                    d[i + 1] = oldgam + (alpha - gamma);
                    p = if c != zero { (gamma * gamma) / c } else { oldc * bb };
                }
                e[l] = s * p;
                d[l] = sigma + gamma;
            }
        } else {
            loop {
                let mut m = l;
                while m > lend {
                    if e[m - 1].abs() <= sr.eps2 * (d[m] * d[m - 1]).abs() {
                        break;
                    }
                    m -= 1;
                }
                if m > lend {
                    e[m - 1] = zero;
                }
                let mut p = d[l];

                if m == l {
                    if l == lend {
                        break;
                    }
                    l -= 1;
                    continue;
                }
                if m + 1 == l {
                    let (rt1, rt2) = lae2(d[l], e[l - 1].sqrt(), d[l - 1]);
                    d[l] = rt1;
                    d[l - 1] = rt2;
                    e[l - 1] = zero;
                    if l < lend + 2 {
                        break;
                    }
                    l -= 2;
                    continue;
                }
                if jtot == nmaxit {
                    break;
                }
                jtot += 1;

                let rte = e[l - 1].sqrt();
                let mut sigma = (d[l - 1] - p) / (two * rte);
                let r = sigma.lapy2(one);
                sigma = p - (rte / (sigma + r.sign(sigma)));

                let mut c = one;
                let mut s = zero;
                let mut gamma = d[m] - sigma;
                p = gamma * gamma;

                for i in m..l {
                    let bb = e[i];
                    let r = p + bb;
                    if i != m {
                        e[i - 1] = s * r;
                    }
                    let oldc = c;
                    c = p / r;
                    s = bb / r;
                    let oldgam = gamma;
                    let alpha = d[i + 1];
                    gamma = c * (alpha - sigma) - s * oldgam;
                    d[i] = oldgam + (alpha - gamma);
                    p = if c != zero { (gamma * gamma) / c } else { oldc * bb };
                }
                e[l - 1] = s * p;
                d[l] = sigma + gamma;
            }
        }

        // undo the scaling; e holds squares and is not needed any more
        if let Some(to) = target {
            scale_vector(to, anorm, &mut d[lsv..=lendsv])?;
        }

        if jtot >= nmaxit {
            let count = count_unconverged(&e[..(n - 1)]);
            if count > 0 {
                log::warn!("STERF: {count} off-diagonal entries left after {jtot} sweeps");
                return Err(LapackError::NoConvergence { count });
            }
        }
    }

    lasrt(SortOrder::Increasing, d);
    Ok(())
}

/// Workspace length for [`steqr`].
pub fn steqr_workspace(compz: ComputeZ, n: usize) -> usize {
    match compz {
        ComputeZ::ValuesOnly => 0,
        _ => 2 * n.saturating_sub(1),
    }
}

/// All eigenvalues and optionally eigenvectors of the symmetric tridiagonal
/// matrix with diagonal d and off-diagonal e, by the implicit QL/QR
/// iteration with Wilkinson shift.
///
/// With `compz = Update`, Z holds on entry the orthogonal matrix that
/// reduced the original matrix to tridiagonal form and is overwritten by
/// the eigenvectors of the original matrix.  With `compz = Identity`, Z is
/// initialized to the unit matrix and receives the eigenvectors of the
/// tridiagonal matrix.  Z is not referenced for `ValuesOnly`.
///
/// On exit d holds the eigenvalues in ascending order, with the columns of
/// Z in matching order, and e is destroyed.  The iteration gives up after
/// `maxit` sweeps per eigenvalue in total, see [`sterf`].
pub fn steqr<T: FloatT>(
    compz: ComputeZ,
    d: &mut [T],
    e: &mut [T],
    mut Z: BorrowedMatrixMut<'_, T>,
    work: &mut [T],
    maxit: usize,
) -> Result<(), LapackError> {
    let n = d.len();
    let wantz = compz != ComputeZ::ValuesOnly;
    if e.len() < n.saturating_sub(1) {
        return Err(LapackError::illegal("STEQR", 4));
    }
    if wantz && Z.size() != (n, n) {
        return Err(LapackError::illegal("STEQR", 6));
    }
    if work.len() < steqr_workspace(compz, n) {
        return Err(LapackError::illegal("STEQR", 7));
    }
    if n == 0 {
        return Ok(());
    }
    if compz == ComputeZ::Identity {
        laset(None, T::zero(), T::one(), Z.rb_mut());
    }
    if n == 1 {
        return Ok(());
    }

    // saved rotations, cosines and sines
    let (cw, sw): (&mut [T], &mut [T]) = if wantz {
        let (cw, rest) = work.split_at_mut(n - 1);
        (cw, &mut rest[..(n - 1)])
    } else {
        (&mut [], &mut [])
    };

    let sr = SafeRange::<T>::new();
    let zero = T::zero();
    let one = T::one();
    let two: T = (2.).as_T();
    let nmaxit = n * maxit;
    let mut jtot = 0;
    let mut l1 = 0;

    while l1 < n {
        if l1 > 0 {
            e[l1 - 1] = zero;
        }
        let mut m = l1;
        while m < n - 1 {
            let tst = e[m].abs();
            if tst == zero {
                break;
            }
            if tst <= (d[m].abs().sqrt() * d[m + 1].abs().sqrt()) * sr.eps {
                e[m] = zero;
                break;
            }
            m += 1;
        }

        let mut l = l1;
        let lsv = l;
        let mut lend = m;
        let lendsv = lend;
        l1 = m + 1;
        if lend == l {
            continue;
        }

        let anorm = lanst(NormType::Max, &d[l..=lend], &e[l..lend]);
        if anorm == zero {
            continue;
        }
        let target = sr.target(anorm);
        if let Some(to) = target {
            scale_vector(anorm, to, &mut d[l..=lend])?;
            scale_vector(anorm, to, &mut e[l..lend])?;
        }

        if d[lend].abs() < d[l].abs() {
            lend = lsv;
            l = lendsv;
        }

        if lend > l {
            // QL iteration
            loop {
                let mut m = l;
                while m < lend {
                    let tst = e[m].abs() * e[m].abs();
                    if tst <= (sr.eps2 * d[m].abs()) * d[m + 1].abs() + sr.safmin {
                        break;
                    }
                    m += 1;
                }
                if m < lend {
                    e[m] = zero;
                }
                let mut p = d[l];

                if m == l {
                    l += 1;
                    if l > lend {
                        break;
                    }
                    continue;
                }
                if m == l + 1 {
                    let (rt1, rt2) = if wantz {
                        let (rt1, rt2, c, s) = laev2(d[l], e[l], d[l + 1]);
                        cw[l] = c;
                        sw[l] = s;
                        let rot = l..(l + 1);
                        lasr(
                            MatrixSide::Right,
                            RotationPivot::Variable,
                            ReflectorDirection::Backward,
                            &cw[rot.clone()],
                            &sw[rot],
                            Z.view_mut(0, l, n, 2),
                        )?;
                        (rt1, rt2)
                    } else {
                        lae2(d[l], e[l], d[l + 1])
                    };
                    d[l] = rt1;
                    d[l + 1] = rt2;
                    e[l] = zero;
                    l += 2;
                    if l > lend {
                        break;
                    }
                    continue;
                }
                if jtot == nmaxit {
                    break;
                }
                jtot += 1;

                // shift
                let mut g = (d[l + 1] - p) / (two * e[l]);
                let r = g.lapy2(one);
                g = d[m] - p + (e[l] / (g + r.sign(g)));

                let mut s = one;
                let mut c = one;
                p = zero;

                for i in (l..m).rev() {
                    let f = s * e[i];
                    let b = c * e[i];
                    let (cn, sn, r) = lartg(g, f);
                    c = cn;
                    s = sn;
                    if i != m - 1 {
                        e[i + 1] = r;
                    }
                    g = d[i + 1] - p;
                    let r = (d[i] - g) * s + two * c * b;
                    p = s * r;
                    d[i + 1] = g + p;
                    g = c * r - b;

                    if wantz {
                        cw[i] = c;
                        sw[i] = -s;
                    }
                }
                if wantz {
                    lasr(
                        MatrixSide::Right,
                        RotationPivot::Variable,
                        ReflectorDirection::Backward,
                        &cw[l..m],
                        &sw[l..m],
                        Z.view_mut(0, l, n, m - l + 1),
                    )?;
                }
                d[l] -= p;
                e[l] = g;
            }
        } else {
            // QR iteration
            loop {
                let mut m = l;
                while m > lend {
                    let tst = e[m - 1].abs() * e[m - 1].abs();
                    if tst <= (sr.eps2 * d[m].abs()) * d[m - 1].abs() + sr.safmin {
                        break;
                    }
                    m -= 1;
                }
                if m > lend {
                    e[m - 1] = zero;
                }
                let mut p = d[l];

                if m == l {
                    if l == lend {
                        break;
                    }
                    l -= 1;
                    continue;
                }
                if m + 1 == l {
                    let (rt1, rt2) = if wantz {
                        let (rt1, rt2, c, s) = laev2(d[l - 1], e[l - 1], d[l]);
                        cw[m] = c;
                        sw[m] = s;
                        let rot = m..(m + 1);
                        lasr(
                            MatrixSide::Right,
                            RotationPivot::Variable,
                            ReflectorDirection::Forward,
                            &cw[rot.clone()],
                            &sw[rot],
                            Z.view_mut(0, l - 1, n, 2),
                        )?;
                        (rt1, rt2)
                    } else {
                        lae2(d[l - 1], e[l - 1], d[l])
                    };
                    d[l - 1] = rt1;
                    d[l] = rt2;
                    e[l - 1] = zero;
                    if l < lend + 2 {
                        break;
                    }
                    l -= 2;
                    continue;
                }
                if jtot == nmaxit {
                    break;
                }
                jtot += 1;

                let mut g = (d[l - 1] - p) / (two * e[l - 1]);
                let r = g.lapy2(one);
                g = d[m] - p + (e[l - 1] / (g + r.sign(g)));

                let mut s = one;
                let mut c = one;
                p = zero;

                for i in m..l {
                    let f = s * e[i];
                    let b = c * e[i];
                    let (cn, sn, r) = lartg(g, f);
                    c = cn;
                    s = sn;
                    if i != m {
                        e[i - 1] = r;
                    }
                    g = d[i] - p;
                    let r = (d[i + 1] - g) * s + two * c * b;
                    p = s * r;
                    d[i] = g + p;
                    g = c * r - b;

                    if wantz {
                        cw[i] = c;
                        sw[i] = s;
                    }
                }
                if wantz {
                    lasr(
                        MatrixSide::Right,
                        RotationPivot::Variable,
                        ReflectorDirection::Forward,
                        &cw[m..l],
                        &sw[m..l],
                        Z.view_mut(0, m, n, l - m + 1),
                    )?;
                }
                d[l] -= p;
                e[l - 1] = g;
            }
        }

        if let Some(to) = target {
            scale_vector(to, anorm, &mut d[lsv..=lendsv])?;
            scale_vector(to, anorm, &mut e[lsv..lendsv])?;
        }

        if jtot >= nmaxit {
            let count = count_unconverged(&e[..(n - 1)]);
            if count > 0 {
                log::warn!("STEQR: {count} off-diagonal entries left after {jtot} sweeps");
                return Err(LapackError::NoConvergence { count });
            }
        }
    }

    if !wantz {
        lasrt(SortOrder::Increasing, d);
        return Ok(());
    }

    // selection sort, so that each eigenvector column moves at most once
    for i in 0..(n - 1) {
        let mut k = i;
        let mut p = d[i];
        for (j, &dj) in d.iter().enumerate().skip(i + 1) {
            if dj < p {
                k = j;
                p = dj;
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            let (mut left, mut right) = Z.rb_mut().into_split_at_col(k);
            swap(n, left.col_mut(i), 1, right.col_mut(0), 1);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::test_utils::{matmul, max_abs_diff, random_matrix, to_T, tridiagonal};
    use half::f16;
    use itertools::iproduct;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const MAXIT: usize = 30;

    #[test]
    fn test_lae2_laev2() {
        let (rt1, rt2) = lae2(2f64, 1., 2.);
        assert!((rt1 - 3.).abs() < 1e-15 && (rt2 - 1.).abs() < 1e-15);

        for (a, b, c) in [(2f64, 1f64, 2f64), (1., -3., 4.), (-2., 0.5, -7.), (0., 0., 0.), (5., 0., 1.)] {
            let (rt1, rt2, cs, sn) = laev2(a, b, c);
            assert!(rt1.abs() >= rt2.abs());
            // [cs sn] is the eigenvector of rt1
            assert!((a * cs + b * sn - rt1 * cs).abs() < 1e-14);
            assert!((b * cs + c * sn - rt1 * sn).abs() < 1e-14);
            assert!((cs * cs + sn * sn - 1.).abs() < 1e-15);
            assert!((rt1 + rt2 - (a + c)).abs() < 1e-14);
        }
    }

    #[test]
    fn test_lartg() {
        let (c, s, r) = lartg(3f64, 4.);
        assert!((c - 0.6).abs() < 1e-15 && (s - 0.8).abs() < 1e-15 && (r - 5.).abs() < 1e-15);

        // r takes the sign of f
        let (c, s, r) = lartg(-3f64, 4.);
        assert!((c - 0.6).abs() < 1e-15 && (s + 0.8).abs() < 1e-15 && (r + 5.).abs() < 1e-15);

        assert_eq!(lartg(2f64, 0.), (1., 0., 2.));
        assert_eq!(lartg(0f64, -2.), (0., -1., 2.));

        // large arguments in half precision are scaled first
        let (c, s, r) = lartg(f16::from_f32(30000.), f16::from_f32(40000.));
        assert!((c.to_f32() - 0.6).abs() < 2e-3);
        assert!((s.to_f32() - 0.8).abs() < 2e-3);
        assert!((r.to_f32() - 50000.).abs() < 200.);
    }

    // dense plane rotation acting on rows or columns (p, q)
    fn plane(n: usize, p: usize, q: usize, c: f64, s: f64) -> Matrix<f64> {
        let mut P = Matrix::<f64>::identity(n);
        P[(p, p)] = c;
        P[(p, q)] = s;
        P[(q, p)] = -s;
        P[(q, q)] = c;
        P
    }

    #[test]
    fn test_lasr_all_variants() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let (m, n) = (4, 5);
        let A0 = random_matrix(&mut rng, m, n);

        let sides = [MatrixSide::Left, MatrixSide::Right];
        let pivots = [RotationPivot::Variable, RotationPivot::Top, RotationPivot::Bottom];
        let directs = [ReflectorDirection::Forward, ReflectorDirection::Backward];

        for (side, pivot, direct) in iproduct!(sides, pivots, directs) {
            let z = if side == MatrixSide::Left { m } else { n };
            let angles: Vec<f64> = (0..(z - 1)).map(|_| rng.gen_range(0.0..6.0)).collect();
            let c: Vec<f64> = angles.iter().map(|t| t.cos()).collect();
            let s: Vec<f64> = angles.iter().map(|t| t.sin()).collect();

            let mut expected = A0.clone();
            let order: Vec<usize> = match direct {
                ReflectorDirection::Forward => (0..(z - 1)).collect(),
                ReflectorDirection::Backward => (0..(z - 1)).rev().collect(),
            };
            for k in order {
                let (p, q) = match pivot {
                    RotationPivot::Variable => (k, k + 1),
                    RotationPivot::Top => (0, k + 1),
                    RotationPivot::Bottom => (k, z - 1),
                };
                let P = plane(z, p, q, c[k], s[k]);
                expected = match side {
                    MatrixSide::Left => matmul(&P, &expected),
                    MatrixSide::Right => matmul(&expected, &P.transpose()),
                };
            }

            let mut A = A0.clone();
            lasr(side, pivot, direct, &c, &s, A.rb_mut()).unwrap();
            assert!(max_abs_diff(&A, &expected) < 1e-14, "{side:?} {pivot:?} {direct:?}");
        }
    }

    fn random_tridiagonal(rng: &mut ChaCha8Rng, n: usize) -> (Vec<f64>, Vec<f64>) {
        let d = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let e = (0..n.saturating_sub(1)).map(|_| rng.gen_range(-1.0..1.0)).collect();
        (d, e)
    }

    #[test]
    fn test_steqr_eigenvectors() {
        let mut rng = ChaCha8Rng::seed_from_u64(33);
        for n in [1, 2, 3, 5, 12, 20] {
            let (d0, e0) = random_tridiagonal(&mut rng, n);
            let T0 = tridiagonal(&d0, &e0);

            let (mut d, mut e) = (d0.clone(), e0.clone());
            let mut Z = Matrix::<f64>::zeros((n, n));
            let mut work = vec![0.; steqr_workspace(ComputeZ::Identity, n)];
            steqr(ComputeZ::Identity, &mut d, &mut e, Z.rb_mut(), &mut work, MAXIT).unwrap();

            assert!(d.windows(2).all(|w| w[0] <= w[1]));
            let ZtZ = matmul(&Z.transpose(), &Z);
            assert!(max_abs_diff(&ZtZ, &Matrix::<f64>::identity(n)) < 1e-13);
            let ZDZt = matmul(&matmul(&Z, &tridiagonal(&d, &vec![0.; n.saturating_sub(1)])), &Z.transpose());
            assert!(max_abs_diff(&ZDZt, &T0) < 1e-13);

            // the eigenvalue only paths agree
            let (mut d1, mut e1) = (d0.clone(), e0.clone());
            steqr(ComputeZ::ValuesOnly, &mut d1, &mut e1, Matrix::<f64>::zeros((0, 0)).rb_mut(), &mut [], MAXIT).unwrap();
            let (mut d2, mut e2) = (d0.clone(), e0.clone());
            sterf(&mut d2, &mut e2, MAXIT).unwrap();
            for i in 0..n {
                assert!((d1[i] - d[i]).abs() < 1e-13);
                assert!((d2[i] - d[i]).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn test_steqr_update_and_split() {
        // a zero off-diagonal entry splits the matrix into two blocks
        let d0 = [4., 1., -2., 3., 0.5];
        let e0 = [1., 0., 2., -1.];
        let n = d0.len();

        // start from a non-trivial orthogonal matrix
        let Q = plane(n, 1, 3, 0.6, 0.8);
        let mut Z = Q.clone();
        let (mut d, mut e) = (d0.to_vec(), e0.to_vec());
        let mut work = vec![0.; steqr_workspace(ComputeZ::Update, n)];
        steqr(ComputeZ::Update, &mut d, &mut e, Z.rb_mut(), &mut work, MAXIT).unwrap();

        // Z = Q V with V the eigenvectors of the tridiagonal matrix
        let V = matmul(&Q.transpose(), &Z);
        let TV = matmul(&tridiagonal(&d0, &e0), &V);
        for j in 0..n {
            for i in 0..n {
                assert!((TV[(i, j)] - d[j] * V[(i, j)]).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn test_tridiagonal_scaling() {
        let mut rng = ChaCha8Rng::seed_from_u64(35);
        let (d0, e0) = random_tridiagonal(&mut rng, 8);
        let (mut dref, mut eref) = (d0.clone(), e0.clone());
        sterf(&mut dref, &mut eref, MAXIT).unwrap();

        for factor in [1e-160, 1e160] {
            let (mut d, mut e): (Vec<f64>, Vec<f64>) = (d0.iter().map(|x| x * factor).collect(), e0.iter().map(|x| x * factor).collect());
            sterf(&mut d, &mut e, MAXIT).unwrap();
            for (x, y) in d.iter().zip(&dref) {
                assert!((x / factor - y).abs() < 1e-13);
            }

            let (mut d, mut e): (Vec<f64>, Vec<f64>) = (d0.iter().map(|x| x * factor).collect(), e0.iter().map(|x| x * factor).collect());
            steqr(ComputeZ::ValuesOnly, &mut d, &mut e, Matrix::<f64>::zeros((0, 0)).rb_mut(), &mut [], MAXIT).unwrap();
            for (x, y) in d.iter().zip(&dref) {
                assert!((x / factor - y).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn test_tridiagonal_half_precision() {
        let mut rng = ChaCha8Rng::seed_from_u64(37);
        let n = 8;
        let (d0, e0) = random_tridiagonal(&mut rng, n);
        let (dh, eh): (Vec<f16>, Vec<f16>) = (to_T(&d0), to_T(&e0));

        // reference from the rounded inputs
        let mut dref: Vec<f64> = dh.iter().map(|x| x.to_f64()).collect();
        let mut eref: Vec<f64> = eh.iter().map(|x| x.to_f64()).collect();
        sterf(&mut dref, &mut eref, MAXIT).unwrap();

        let (mut d, mut e) = (dh.clone(), eh.clone());
        sterf(&mut d, &mut e, MAXIT).unwrap();
        for (x, y) in d.iter().zip(&dref) {
            assert!((x.to_f64() - y).abs() < 0.05);
        }

        let (mut d, mut e) = (dh.clone(), eh.clone());
        let mut Z = Matrix::<f16>::zeros((n, n));
        let mut work = vec![f16::ZERO; steqr_workspace(ComputeZ::Identity, n)];
        steqr(ComputeZ::Identity, &mut d, &mut e, Z.rb_mut(), &mut work, MAXIT).unwrap();
        for (x, y) in d.iter().zip(&dref) {
            assert!((x.to_f64() - y).abs() < 0.05);
        }
        let Zd = Z.map(|x| x.to_f64());
        assert!(max_abs_diff(&matmul(&Zd.transpose(), &Zd), &Matrix::<f64>::identity(n)) < 0.05);
    }

    #[test]
    fn test_no_convergence_reported() {
        // a NaN never deflates, so the sweeps run out
        let d0 = [1., 2., 3., 4., 5.];
        let e0 = [1., f64::NAN, 1., 1.];

        let (mut d, mut e) = (d0.to_vec(), e0.to_vec());
        let err = sterf(&mut d, &mut e, MAXIT);
        assert!(matches!(err, Err(LapackError::NoConvergence { count }) if count > 0));

        let (mut d, mut e) = (d0.to_vec(), e0.to_vec());
        let mut Z = Matrix::<f64>::zeros((5, 5));
        let mut work = vec![0.; 8];
        let err = steqr(ComputeZ::Identity, &mut d, &mut e, Z.rb_mut(), &mut work, MAXIT);
        assert!(info(&err) > 0);
    }

    #[test]
    fn test_steqr_bad_args() {
        let (mut d, mut e) = (vec![1., 2., 3.], vec![1.]);
        let mut Z = Matrix::<f64>::zeros((3, 3));
        let err = steqr(ComputeZ::Identity, &mut d, &mut e, Z.rb_mut(), &mut [0.; 4], MAXIT);
        assert_eq!(info(&err), -4);

        let mut e = vec![1., 1.];
        let mut Z = Matrix::<f64>::zeros((2, 3));
        let err = steqr(ComputeZ::Identity, &mut d, &mut e, Z.rb_mut(), &mut [0.; 4], MAXIT);
        assert_eq!(info(&err), -6);

        let mut Z = Matrix::<f64>::zeros((3, 3));
        let err = steqr(ComputeZ::Identity, &mut d, &mut e, Z.rb_mut(), &mut [0.; 3], MAXIT);
        assert_eq!(info(&err), -7);

        // n = 1 with a fresh Z gives the unit vector
        let mut Z = Matrix::<f64>::zeros((1, 1));
        steqr(ComputeZ::Identity, &mut [7.], &mut [], Z.rb_mut(), &mut [], MAXIT).unwrap();
        assert_eq!(Z[(0, 0)], 1.);
    }
}
