//! BLAS-like kernels on strided vectors and column major views.
//!
//! Routines that can receive inconsistent shapes return a [`LapackError`]
//! carrying the 1-based index of the offending argument in the classical
//! calling sequence, and leave their outputs untouched in that case.
//!
//! [`LapackError`]: crate::algebra::LapackError

mod level1;
pub use level1::*;

mod gemv;
pub use gemv::*;
mod ger;
pub use ger::*;
mod symv;
pub use symv::*;
mod syr2;
pub use syr2::*;
mod trsv;
pub use trsv::*;

mod gemm;
pub use gemm::*;
mod syr2k;
pub use syr2k::*;
mod trmm;
pub use trmm::*;
