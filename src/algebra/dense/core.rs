#![allow(non_snake_case)]
use crate::algebra::*;

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        Self {
            size,
            ld: usize::max(1, m),
            data: vec![T::zero(); m * n],
            phantom: std::marker::PhantomData,
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut A = Self::zeros((n, n));
        A.set_identity();
        A
    }

    /// new matrix from column major data
    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert_eq!(m * n, src.len());
        Self {
            size,
            ld: usize::max(1, m),
            data: src.to_vec(),
            phantom: std::marker::PhantomData,
        }
    }

    /// owned copy of the transpose
    pub fn transpose(&self) -> Self {
        let (m, n) = self.size;
        let mut B = Self::zeros((n, m));
        for j in 0..n {
            for i in 0..m {
                B[(j, i)] = self[(i, j)];
            }
        }
        B
    }
}

impl<S, T> DenseStorageMatrix<S, T>
where
    T: FloatT,
    S: AsMut<[T]> + AsRef<[T]>,
{
    pub fn set_identity(&mut self) {
        assert!(self.is_square());
        self.fill(T::zero());
        for i in 0..self.ncols() {
            self[(i, i)] = T::one();
        }
    }

    /// Copies the populated triangle into the other one.
    pub fn symmetrize(&mut self, uplo: MatrixTriangle) {
        assert!(self.is_square());
        let n = self.ncols();
        for j in 0..n {
            for i in (j + 1)..n {
                match uplo {
                    MatrixTriangle::Triu => self[(i, j)] = self[(j, i)],
                    MatrixTriangle::Tril => self[(j, i)] = self[(i, j)],
                }
            }
        }
    }
}

// Build from row major nested arrays of f64 literals, converted
// into the target format.  Mostly for writing literal matrices.
impl<T, const M: usize, const N: usize> From<&[[f64; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[f64; N]; M]) -> Self {
        let mut A = Self::zeros((M, N));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                A[(i, j)] = v.as_T();
            }
        }
        A
    }
}

#[test]
#[rustfmt::skip]
fn test_matrix_construction() {
    let A = Matrix::<f64>::from(&[
        [1., 2., 3.],
        [4., 5., 6.],
    ]);
    assert_eq!(A.size, (2, 3));
    assert_eq!(A.data, vec![1., 4., 2., 5., 3., 6.]);

    let B = A.transpose();
    assert_eq!(B[(2, 1)], 6.);

    let mut C = Matrix::<f64>::from(&[
        [1., 2.],
        [9., 3.],
    ]);
    C.symmetrize(MatrixTriangle::Triu);
    assert_eq!(C[(1, 0)], 2.);

    assert_eq!(Matrix::<f64>::identity(2).data, vec![1., 0., 0., 1.]);
}
