// Flag types for the BLAS/LAPACK style routines.  Each flag
// can be parsed from its single character form (case insensitive)
// and converted back to it.

use crate::algebra::lsame;

macro_rules! impl_char_flag {
    ($name:ident { $($variant:ident => $c:expr),+ $(,)? }) => {
        impl $name {
            /// Parse from the single character form, ignoring case.
            pub fn from_char(c: u8) -> Option<Self> {
                $(
                    if lsame(c, $c) {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            /// The canonical upper case character form.
            pub fn as_blas_char(&self) -> u8 {
                match self {
                    $($name::$variant => $c,)+
                }
            }
        }
    };
}

/// Matrix orientation marker
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MatrixShape {
    /// Normal matrix orientation
    N,
    /// Transposed matrix orientation
    T,
}
impl_char_flag!(MatrixShape { N => b'N', T => b'T' });

impl MatrixShape {
    pub fn flip(&self) -> Self {
        match self {
            MatrixShape::N => MatrixShape::T,
            MatrixShape::T => MatrixShape::N,
        }
    }
}

/// Matrix shape marker for triangular matrices
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MatrixTriangle {
    /// Upper triangular matrix
    Triu,
    /// Lower triangular matrix
    Tril,
}
impl_char_flag!(MatrixTriangle { Triu => b'U', Tril => b'L' });

impl MatrixTriangle {
    pub fn transpose(&self) -> Self {
        match self {
            MatrixTriangle::Triu => MatrixTriangle::Tril,
            MatrixTriangle::Tril => MatrixTriangle::Triu,
        }
    }
}

/// Side of a matrix product on which an operator is applied
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MatrixSide {
    Left,
    Right,
}
impl_char_flag!(MatrixSide { Left => b'L', Right => b'R' });

/// Whether a triangular matrix has an implicit unit diagonal
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MatrixDiag {
    Unit,
    NonUnit,
}
impl_char_flag!(MatrixDiag { Unit => b'U', NonUnit => b'N' });

/// Order in which the reflectors of a block reflector are multiplied
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ReflectorDirection {
    /// H = H(1) H(2) ... H(k)
    Forward,
    /// H = H(k) ... H(2) H(1)
    Backward,
}
impl_char_flag!(ReflectorDirection { Forward => b'F', Backward => b'B' });

/// How the reflector vectors of a block reflector are stored
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ReflectorStorage {
    Columnwise,
    Rowwise,
}
impl_char_flag!(ReflectorStorage { Columnwise => b'C', Rowwise => b'R' });

/// Plane in which each rotation of a rotation sequence acts
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum RotationPivot {
    /// rotation k acts in plane (k, k+1)
    Variable,
    /// rotation k acts in plane (1, k+1)
    Top,
    /// rotation k acts in plane (k, z)
    Bottom,
}
impl_char_flag!(RotationPivot { Variable => b'V', Top => b'T', Bottom => b'B' });

/// Matrix norm selector
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum NormType {
    /// max(abs(A(i,j)))
    Max,
    /// maximum column sum
    One,
    /// maximum row sum
    Inf,
    /// square root of the sum of squares
    Frobenius,
}

impl NormType {
    pub fn from_char(c: u8) -> Option<Self> {
        match c.to_ascii_uppercase() {
            b'M' => Some(NormType::Max),
            b'O' | b'1' => Some(NormType::One),
            b'I' => Some(NormType::Inf),
            b'F' | b'E' => Some(NormType::Frobenius),
            _ => None,
        }
    }
    pub fn as_blas_char(&self) -> u8 {
        match self {
            NormType::Max => b'M',
            NormType::One => b'O',
            NormType::Inf => b'I',
            NormType::Frobenius => b'F',
        }
    }
}

/// Sort direction
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SortOrder {
    Increasing,
    Decreasing,
}
impl_char_flag!(SortOrder { Increasing => b'I', Decreasing => b'D' });

/// Eigenvalue-only or eigenvalue-and-eigenvector computation
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EigenJob {
    Values,
    Vectors,
}
impl_char_flag!(EigenJob { Values => b'N', Vectors => b'V' });

/// Treatment of the orthogonal factor by the tridiagonal QL/QR iteration
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ComputeZ {
    /// eigenvalues only
    ValuesOnly,
    /// Z holds an orthogonal matrix on entry and is post multiplied
    Update,
    /// Z is initialized to the identity
    Identity,
}
impl_char_flag!(ComputeZ { ValuesOnly => b'N', Update => b'V', Identity => b'I' });

/// Structure of a matrix scaled by `lascl`
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ScaleKind {
    General,
    Lower,
    Upper,
    Hessenberg,
}
impl_char_flag!(ScaleKind { General => b'G', Lower => b'L', Upper => b'U', Hessenberg => b'H' });

/// Storage order of a caller's matrix at the API boundary
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MatrixLayout {
    RowMajor,
    ColMajor,
}

impl MatrixLayout {
    pub const ROW_MAJOR: i32 = 101;
    pub const COL_MAJOR: i32 = 102;

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            Self::ROW_MAJOR => Some(MatrixLayout::RowMajor),
            Self::COL_MAJOR => Some(MatrixLayout::ColMajor),
            _ => None,
        }
    }
    pub fn code(&self) -> i32 {
        match self {
            MatrixLayout::RowMajor => Self::ROW_MAJOR,
            MatrixLayout::ColMajor => Self::COL_MAJOR,
        }
    }
}

#[test]
fn test_flag_parsing() {
    assert_eq!(MatrixTriangle::from_char(b'u'), Some(MatrixTriangle::Triu));
    assert_eq!(MatrixTriangle::from_char(b'x'), None);
    assert_eq!(EigenJob::from_char(b'v'), Some(EigenJob::Vectors));
    assert_eq!(NormType::from_char(b'1'), Some(NormType::One));
    assert_eq!(NormType::from_char(b'e'), Some(NormType::Frobenius));
    assert_eq!(ComputeZ::Identity.as_blas_char(), b'I');
    assert_eq!(MatrixLayout::from_code(101), Some(MatrixLayout::RowMajor));
    assert_eq!(MatrixLayout::from_code(100), None);
    assert_eq!(MatrixShape::N.flip(), MatrixShape::T);
}
