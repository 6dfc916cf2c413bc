use super::{FloatT, VectorMath};
use itertools::izip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn has_nan(&self) -> bool {
        self.iter().any(|x| x.is_nan())
    }

    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for &v in self {
            if v.is_nan() {
                return T::nan();
            }
            out = T::max(out, v.abs());
        }
        out
    }

    fn norm_inf_diff(&self, b: &[T]) -> T {
        assert_eq!(self.len(), b.len());
        let mut out = T::zero();
        for (&s, &b) in izip!(self, b) {
            let v = s - b;
            if v.is_nan() {
                return T::nan();
            }
            out = T::max(out, v.abs());
        }
        out
    }

    fn is_sorted_ascending(&self) -> bool {
        self.windows(2).all(|w| w[0] <= w[1])
    }
}

#[test]
fn test_vecmath() {
    let x = [1.0, -4.0, 2.5];
    let y = [1.0, -3.0, 2.0];
    assert_eq!(x.norm_inf(), 4.0);
    assert_eq!(x.norm_inf_diff(&y), 1.0);
    assert!(!x.is_sorted_ascending());
    assert!([-1.0, 0.0, 0.0, 3.0].is_sorted_ascending());
    assert!([1.0, f64::NAN].has_nan());
}
