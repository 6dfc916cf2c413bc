use crate::algebra::*;
use std::ops::{Index, IndexMut};

/// Core dense matrix type for owned and borrowed matrices.
///
/// Data is stored in column major format with an explicit leading dimension,
/// so that element `(i, j)` lives at `data[i + j * ld]`.  Sub-blocks of a
/// matrix can be addressed as borrowed views without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseStorageMatrix<S, T>
where
    S: AsRef<[T]>,
{
    /// dimensions
    pub size: (usize, usize),
    /// leading dimension (column stride)
    pub ld: usize,
    /// vector of data in column major format
    pub data: S,
    pub(crate) phantom: std::marker::PhantomData<T>,
}

pub type Matrix<T> = DenseStorageMatrix<Vec<T>, T>;
pub type BorrowedMatrix<'a, T> = DenseStorageMatrix<&'a [T], T>;
pub type BorrowedMatrixMut<'a, T> = DenseStorageMatrix<&'a mut [T], T>;

impl<T: Copy> Copy for DenseStorageMatrix<&[T], T> {}

/// Number of storage elements spanned by an m×n block with leading dimension ld.
#[inline]
pub(crate) fn storage_span(m: usize, n: usize, ld: usize) -> usize {
    if m == 0 || n == 0 {
        0
    } else {
        (n - 1) * ld + m
    }
}

fn check_storage(
    len: usize,
    m: usize,
    n: usize,
    ld: usize,
) -> Result<(), MatrixFormatError> {
    if ld < usize::max(1, m) {
        return Err(MatrixFormatError::BadLeadingDimension { ld, nrows: m });
    }
    let required = storage_span(m, n, ld);
    if len < required {
        return Err(MatrixFormatError::InsufficientStorage { len, required });
    }
    Ok(())
}

impl<S, T> ShapedMatrix for DenseStorageMatrix<S, T>
where
    S: AsRef<[T]>,
{
    fn nrows(&self) -> usize {
        self.size.0
    }
    fn ncols(&self) -> usize {
        self.size.1
    }
}

impl<S, T> DenseStorageMatrix<S, T>
where
    S: AsRef<[T]>,
{
    #[inline]
    pub fn index_linear(&self, idx: (usize, usize)) -> usize {
        debug_assert!(idx.0 < self.size.0 && idx.1 < self.size.1);
        idx.0 + self.ld * idx.1
    }

    pub fn data(&self) -> &[T] {
        self.data.as_ref()
    }

    // index in data at which column `col` starts, or the end
    // of the data for the one-past-the-end column
    fn col_offset(&self, col: usize) -> usize {
        assert!(col <= self.size.1);
        if col == self.size.1 {
            self.data().len()
        } else {
            col * self.ld
        }
    }

    fn block_range(&self, r: usize, c: usize, m: usize, n: usize) -> std::ops::Range<usize> {
        assert!(r + m <= self.size.0 && c + n <= self.size.1);
        let span = storage_span(m, n, self.ld);
        if span == 0 {
            0..0
        } else {
            let start = r + c * self.ld;
            start..start + span
        }
    }

    /// column `col` as a contiguous slice of length `nrows`
    pub fn col(&self, col: usize) -> &[T] {
        let m = self.size.0;
        assert!(col < self.size.1);
        let start = col * self.ld;
        &self.data()[start..start + m]
    }

    /// Storage from element (r, c) onwards.  Row r from column c on is the
    /// strided vector of this slice with increment `ld`.
    pub(crate) fn row_from(&self, r: usize, c: usize) -> &[T] {
        let start = self.index_linear((r, c));
        &self.data()[start..]
    }

    /// borrowed view of the whole matrix
    pub fn rb(&self) -> BorrowedMatrix<'_, T> {
        self.view(0, 0, self.size.0, self.size.1)
    }

    /// borrowed view of the m×n block starting at (r, c)
    pub fn view(&self, r: usize, c: usize, m: usize, n: usize) -> BorrowedMatrix<'_, T> {
        let range = self.block_range(r, c, m, n);
        BorrowedMatrix {
            size: (m, n),
            ld: self.ld,
            data: &self.data()[range],
            phantom: std::marker::PhantomData,
        }
    }

    /// compact owned copy (leading dimension equal to the row count)
    pub fn to_matrix(&self) -> Matrix<T>
    where
        T: Copy,
    {
        let (m, n) = self.size;
        let mut data = Vec::with_capacity(m * n);
        for j in 0..n {
            data.extend_from_slice(self.col(j));
        }
        Matrix {
            size: (m, n),
            ld: usize::max(1, m),
            data,
            phantom: std::marker::PhantomData,
        }
    }

    /// elementwise conversion into a compact owned matrix
    pub fn map<U, F>(&self, f: F) -> Matrix<U>
    where
        T: Copy,
        F: Fn(T) -> U,
    {
        let (m, n) = self.size;
        let mut data = Vec::with_capacity(m * n);
        for j in 0..n {
            data.extend(self.col(j).iter().map(|&x| f(x)));
        }
        Matrix {
            size: (m, n),
            ld: usize::max(1, m),
            data,
            phantom: std::marker::PhantomData,
        }
    }
}

impl<S, T> DenseStorageMatrix<S, T>
where
    S: AsMut<[T]> + AsRef<[T]>,
{
    pub fn data_mut(&mut self) -> &mut [T] {
        self.data.as_mut()
    }

    pub fn col_mut(&mut self, col: usize) -> &mut [T] {
        let m = self.size.0;
        assert!(col < self.size.1);
        let start = col * self.ld;
        &mut self.data_mut()[start..start + m]
    }

    /// mutably borrowed view of the whole matrix
    pub fn rb_mut(&mut self) -> BorrowedMatrixMut<'_, T> {
        let (m, n) = self.size;
        self.view_mut(0, 0, m, n)
    }

    /// mutably borrowed view of the m×n block starting at (r, c)
    pub fn view_mut(&mut self, r: usize, c: usize, m: usize, n: usize) -> BorrowedMatrixMut<'_, T> {
        let range = self.block_range(r, c, m, n);
        let ld = self.ld;
        BorrowedMatrixMut {
            size: (m, n),
            ld,
            data: &mut self.data_mut()[range],
            phantom: std::marker::PhantomData,
        }
    }

    /// splits into the columns `[0, col)` and `[col, ncols)`
    pub fn split_at_col_mut(
        &mut self,
        col: usize,
    ) -> (BorrowedMatrixMut<'_, T>, BorrowedMatrixMut<'_, T>) {
        self.rb_mut().into_split_at_col(col)
    }

    pub fn fill(&mut self, v: T)
    where
        T: Copy,
    {
        for j in 0..self.size.1 {
            self.col_mut(j).iter_mut().for_each(|x| *x = v);
        }
    }
}

impl<'a, T> BorrowedMatrix<'a, T> {
    /// Wraps caller storage as an m×n column major matrix with leading dimension `ld`.
    pub fn from_slice(
        data: &'a [T],
        m: usize,
        n: usize,
        ld: usize,
    ) -> Result<Self, MatrixFormatError> {
        check_storage(data.len(), m, n, ld)?;
        Ok(Self {
            size: (m, n),
            ld,
            data,
            phantom: std::marker::PhantomData,
        })
    }

    /// view of a sub-block that keeps the lifetime of the source
    pub fn into_view(self, r: usize, c: usize, m: usize, n: usize) -> BorrowedMatrix<'a, T> {
        let range = self.block_range(r, c, m, n);
        BorrowedMatrix {
            size: (m, n),
            ld: self.ld,
            data: &self.data[range],
            phantom: std::marker::PhantomData,
        }
    }

    pub fn into_col(self, col: usize) -> &'a [T] {
        let m = self.size.0;
        assert!(col < self.size.1);
        let start = col * self.ld;
        &self.data[start..start + m]
    }

    pub fn into_split_at_col(self, col: usize) -> (BorrowedMatrix<'a, T>, BorrowedMatrix<'a, T>) {
        let (m, n) = self.size;
        let mid = self.col_offset(col);
        let (left, right) = self.data.split_at(mid);
        (
            BorrowedMatrix {
                size: (m, col),
                ld: self.ld,
                data: left,
                phantom: std::marker::PhantomData,
            },
            BorrowedMatrix {
                size: (m, n - col),
                ld: self.ld,
                data: right,
                phantom: std::marker::PhantomData,
            },
        )
    }
}

impl<'a, T> BorrowedMatrixMut<'a, T> {
    /// Wraps caller storage as an m×n column major matrix with leading dimension `ld`.
    pub fn from_slice_mut(
        data: &'a mut [T],
        m: usize,
        n: usize,
        ld: usize,
    ) -> Result<Self, MatrixFormatError> {
        check_storage(data.len(), m, n, ld)?;
        Ok(Self {
            size: (m, n),
            ld,
            data,
            phantom: std::marker::PhantomData,
        })
    }

    pub fn into_view(self, r: usize, c: usize, m: usize, n: usize) -> BorrowedMatrixMut<'a, T> {
        let range = self.block_range(r, c, m, n);
        BorrowedMatrixMut {
            size: (m, n),
            ld: self.ld,
            data: &mut self.data[range],
            phantom: std::marker::PhantomData,
        }
    }

    pub fn into_col_mut(self, col: usize) -> &'a mut [T] {
        let m = self.size.0;
        assert!(col < self.size.1);
        let start = col * self.ld;
        &mut self.data[start..start + m]
    }

    pub fn into_split_at_col(
        self,
        col: usize,
    ) -> (BorrowedMatrixMut<'a, T>, BorrowedMatrixMut<'a, T>) {
        let (m, n) = self.size;
        let ld = self.ld;
        let mid = self.col_offset(col);
        let (left, right) = self.data.split_at_mut(mid);
        (
            BorrowedMatrixMut {
                size: (m, col),
                ld,
                data: left,
                phantom: std::marker::PhantomData,
            },
            BorrowedMatrixMut {
                size: (m, n - col),
                ld,
                data: right,
                phantom: std::marker::PhantomData,
            },
        )
    }

    /// read-only view with the full lifetime of the source
    pub fn into_ref(self) -> BorrowedMatrix<'a, T> {
        BorrowedMatrix {
            size: self.size,
            ld: self.ld,
            data: self.data,
            phantom: std::marker::PhantomData,
        }
    }
}

impl<S, T> Index<(usize, usize)> for DenseStorageMatrix<S, T>
where
    S: AsRef<[T]>,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &T {
        let lidx = self.index_linear(idx);
        &self.data()[lidx]
    }
}

impl<S, T> IndexMut<(usize, usize)> for DenseStorageMatrix<S, T>
where
    S: AsRef<[T]> + AsMut<[T]>,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data_mut()[lidx]
    }
}
