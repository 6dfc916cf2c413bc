//! Dense linear algebra for reduced precision floating point.
//!
//! This module contains the scalar utilities, the floating point format
//! descriptions, the dense matrix views, and the BLAS/LAPACK style routines
//! on which the symmetric eigensolver is built.

mod error_types;
pub use error_types::*;
mod floats;
pub use floats::*;
mod machine;
pub use machine::*;
mod math_traits;
pub use math_traits::*;
mod matrix_traits;
pub use matrix_traits::*;
mod matrix_types;
pub use matrix_types::*;
mod scalarmath;
pub use scalarmath::*;
mod vecmath;

pub mod dense;
pub use dense::*;

#[cfg(test)]
pub(crate) mod test_utils {
    #![allow(non_snake_case)]
    use super::*;

    pub(crate) fn to_T<T: FloatT>(v: &[f64]) -> Vec<T> {
        v.iter().map(|&x| x.as_T()).collect()
    }

    pub(crate) fn to_f64<T: FloatT>(v: &[T]) -> Vec<f64> {
        v.iter().map(|x| x.to_f64().unwrap()).collect()
    }

    pub(crate) fn random_matrix(rng: &mut rand_chacha::ChaCha8Rng, m: usize, n: usize) -> Matrix<f64> {
        use rand::Rng;
        let mut A = Matrix::<f64>::zeros((m, n));
        A.data.iter_mut().for_each(|a| *a = rng.gen_range(-1.0..1.0));
        A
    }

    pub(crate) fn random_symmetric(rng: &mut rand_chacha::ChaCha8Rng, n: usize) -> Matrix<f64> {
        let mut A = random_matrix(rng, n, n);
        A.symmetrize(MatrixTriangle::Triu);
        A
    }

    pub(crate) fn matmul(A: &Matrix<f64>, B: &Matrix<f64>) -> Matrix<f64> {
        let mut C = Matrix::<f64>::zeros((A.nrows(), B.ncols()));
        gemm(MatrixShape::N, MatrixShape::N, 1., A.rb(), B.rb(), 0., C.rb_mut()).unwrap();
        C
    }

    // dense symmetric tridiagonal matrix with diagonal d and off-diagonal e
    pub(crate) fn tridiagonal(d: &[f64], e: &[f64]) -> Matrix<f64> {
        let n = d.len();
        let mut T = Matrix::<f64>::zeros((n, n));
        for i in 0..n {
            T[(i, i)] = d[i];
            if i + 1 < n {
                T[(i + 1, i)] = e[i];
                T[(i, i + 1)] = e[i];
            }
        }
        T
    }

    // largest absolute entrywise difference of two matrices, in f64
    pub(crate) fn max_abs_diff<S1, S2, T>(A: &DenseStorageMatrix<S1, T>, B: &DenseStorageMatrix<S2, T>) -> f64
    where
        S1: AsRef<[T]>,
        S2: AsRef<[T]>,
        T: FloatT,
    {
        assert_eq!(A.size, B.size);
        let (m, n) = A.size;
        let mut out = 0f64;
        for j in 0..n {
            for i in 0..m {
                let d = A[(i, j)].to_f64().unwrap() - B[(i, j)].to_f64().unwrap();
                out = f64::max(out, d.abs());
            }
        }
        out
    }
}
