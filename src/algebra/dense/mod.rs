//! Column major dense matrices and the LAPACK-like routines of the
//! symmetric eigensolver, layered from BLAS kernels up to the driver.

mod types;
pub use types::*;
mod core;

pub mod blas;
pub use blas::*;

mod auxiliary;
pub use auxiliary::*;
mod norms;
pub use norms::*;
mod householder;
pub use householder::*;
mod tridiag;
pub use tridiag::*;
mod orgtr;
pub use orgtr::*;
mod tridiag_evd;
pub use tridiag_evd::*;
mod syev;
pub use syev::*;
