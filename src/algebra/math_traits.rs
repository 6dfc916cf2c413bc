use super::FloatT;

// Scalar and vector helpers that sit below the BLAS-like layer.
// Implemented generically for floats of type FloatT.

/// Scalar operations on [`FloatT`](crate::algebra::FloatT)

pub trait ScalarMath {
    type T: FloatT;

    /// Fortran style `SIGN`: returns |self| carrying the sign of `b`.
    fn sign(&self, b: Self::T) -> Self::T;

    /// sqrt(x² + y²), avoiding unnecessary overflow and destructive underflow.
    ///
    /// A NaN in either argument is returned unchanged.
    fn lapy2(&self, y: Self::T) -> Self::T;
}

/// Vector operations on slices of [`FloatT`](crate::algebra::FloatT)

pub trait VectorMath {
    type T;

    /// true if any element is NaN
    fn has_nan(&self) -> bool;

    /// Inf-norm
    fn norm_inf(&self) -> Self::T;

    /// Inf-norm of an elementwise difference
    fn norm_inf_diff(&self, b: &Self) -> Self::T;

    /// true if values are non-decreasing
    fn is_sorted_ascending(&self) -> bool;
}
