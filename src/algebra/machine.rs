use crate::algebra::{lsame, AsFloatT, FloatT};

/// Machine constants of a floating point format.
///
/// This is the value form of the classical `xLAMCH` query.  Every field is
/// derived from the [`FloatFormat`](crate::algebra::FloatFormat) constants of
/// `T` together with the `num_traits` extreme values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineParameters<T> {
    /// relative machine epsilon
    pub eps: T,
    /// safe minimum, such that 1/sfmin does not overflow
    pub sfmin: T,
    /// radix of the machine
    pub base: T,
    /// eps * base
    pub prec: T,
    /// number of (base) digits in the mantissa
    pub t: T,
    /// 1 when rounding occurs in addition
    pub rnd: T,
    /// minimum exponent before (gradual) underflow
    pub emin: T,
    /// underflow threshold, base^(emin-1)
    pub rmin: T,
    /// largest exponent before overflow
    pub emax: T,
    /// overflow threshold, (base^emax)*(1-eps)
    pub rmax: T,
}

impl<T> MachineParameters<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        let one = T::one();
        let eps = T::epsilon();
        let tiny = T::min_positive_value();
        let huge = T::max_value();

        // smallest number whose reciprocal does not overflow, one ulp
        // above 1/huge since 1/small may round up
        let small = one / huge;
        let sfmin = if small >= tiny { small * (one + eps) } else { tiny };

        let base: T = T::RADIX.as_T();

        Self {
            eps,
            sfmin,
            base,
            prec: eps * base,
            t: T::DIGITS.as_T(),
            rnd: one,
            emin: (T::MIN_EXP as f64).as_T(),
            rmin: tiny,
            emax: (T::MAX_EXP as f64).as_T(),
            rmax: huge,
        }
    }

    /// Answers a single character `xLAMCH` query.
    ///
    /// Recognised characters (case insensitive) are E, S, B, P, N, R, M, U,
    /// L and O.  Any other character returns zero.
    pub fn query(&self, cmach: u8) -> T {
        const TABLE: [u8; 10] = [b'E', b'S', b'B', b'P', b'N', b'R', b'M', b'U', b'L', b'O'];
        let hit = TABLE.iter().position(|&c| lsame(cmach, c));

        match hit {
            Some(0) => self.eps,
            Some(1) => self.sfmin,
            Some(2) => self.base,
            Some(3) => self.prec,
            Some(4) => self.t,
            Some(5) => self.rnd,
            Some(6) => self.emin,
            Some(7) => self.rmin,
            Some(8) => self.emax,
            Some(9) => self.rmax,
            _ => T::zero(),
        }
    }
}

impl<T> Default for MachineParameters<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `MachineParameters::<T>::new().query(cmach)`.
pub fn lamch<T: FloatT>(cmach: u8) -> T {
    MachineParameters::<T>::new().query(cmach)
}

/// Blue's scaling constants for overflow-safe sums of squares.
///
/// Values below `tsml` are accumulated after scaling up by `ssml`, values
/// above `tbig` after scaling down by `sbig`, and everything in between is
/// accumulated unscaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BlueConstants<T> {
    pub tsml: T,
    pub tbig: T,
    pub ssml: T,
    pub sbig: T,
}

impl<T> BlueConstants<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        let radix = T::RADIX as f64;
        let t = T::DIGITS as i32;
        let (emin, emax) = (T::MIN_EXP, T::MAX_EXP);

        let floor_half = |k: i32| k.div_euclid(2);
        let ceil_half = |k: i32| -((-k).div_euclid(2));

        Self {
            tsml: radix.powi(ceil_half(emin - 1)).as_T(),
            tbig: radix.powi(floor_half(emax - t + 1)).as_T(),
            ssml: radix.powi(-floor_half(emin - t)).as_T(),
            sbig: radix.powi(-ceil_half(emax + t - 1)).as_T(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::{bf16, f16};

    #[test]
    fn test_lamch_f16() {
        let p = MachineParameters::<f16>::new();
        assert_eq!(p.eps, f16::from_f32(0.0009765625));
        assert_eq!(p.base, f16::from_f32(2.0));
        assert_eq!(p.prec, f16::from_f32(0.001953125));
        assert_eq!(p.rmax, f16::MAX);
        // 1/65504 is below the smallest normal, so sfmin is the smallest normal
        assert_eq!(p.sfmin, f16::MIN_POSITIVE);
        assert!((f16::ONE / p.sfmin).is_finite());
        assert_eq!(lamch::<f16>(b'e'), p.eps);
        assert_eq!(lamch::<f16>(b'O'), p.rmax);
        assert_eq!(lamch::<f16>(b'x'), f16::ZERO);
    }

    #[test]
    fn test_lamch_bf16() {
        let p = MachineParameters::<bf16>::new();
        assert_eq!(p.eps, bf16::from_f32(0.0078125));
        assert_eq!(p.t, bf16::from_f32(8.0));
        assert!((bf16::ONE / p.sfmin).is_finite());
    }

    #[test]
    fn test_blue_constants() {
        let c = BlueConstants::<f16>::new();
        assert_eq!(c.tsml, f16::from_f32(2f32.powi(-7)));
        assert_eq!(c.tbig, f16::from_f32(8.0));
        assert_eq!(c.ssml, f16::from_f32(4096.0));
        assert_eq!(c.sbig, f16::from_f32(2f32.powi(-13)));

        let c = BlueConstants::<f64>::new();
        assert_eq!(c.tsml, 2f64.powi(-511));
        assert_eq!(c.tbig, 2f64.powi(486));
        assert_eq!(c.ssml, 2f64.powi(537));
        assert_eq!(c.sbig, 2f64.powi(-538));
    }
}
