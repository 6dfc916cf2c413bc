use super::{FloatT, ScalarMath};

impl<T: FloatT> ScalarMath for T {
    type T = T;

    fn sign(&self, b: T) -> T {
        if b >= T::zero() {
            self.abs()
        } else {
            -self.abs()
        }
    }

    fn lapy2(&self, y: T) -> T {
        let x = *self;
        if x.is_nan() {
            return x;
        }
        if y.is_nan() {
            return y;
        }

        let xabs = x.abs();
        let yabs = y.abs();
        let w = T::max(xabs, yabs);
        let z = T::min(xabs, yabs);

        if z == T::zero() || w > T::max_value() {
            w
        } else {
            let r = z / w;
            w * (T::one() + r * r).sqrt()
        }
    }
}

/// Case-insensitive comparison of two single character flags.
#[inline]
pub fn lsame(a: u8, b: u8) -> bool {
    a.eq_ignore_ascii_case(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_lsame() {
        assert!(lsame(b'u', b'U'));
        assert!(lsame(b'L', b'L'));
        assert!(!lsame(b'U', b'L'));
    }

    #[test]
    fn test_sign() {
        assert_eq!((3.0f64).sign(-0.5), -3.0);
        assert_eq!((-3.0f64).sign(2.0), 3.0);
        assert_eq!((-3.0f64).sign(0.0), 3.0);
    }

    #[test]
    fn test_lapy2() {
        assert_eq!((3.0f64).lapy2(-4.0), 5.0);
        assert_eq!((0.0f64).lapy2(-2.0), 2.0);
        assert!(f64::NAN.lapy2(1.0).is_nan());

        // x² overflows in binary16 but the result does not
        let x = f16::from_f32(300.0);
        let y = f16::from_f32(400.0);
        assert_eq!(x.lapy2(y), f16::from_f32(500.0));
    }
}
