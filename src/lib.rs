//! __halfeig__ is a dense symmetric eigensolver written for reduced
//! precision floating point.  It computes all eigenvalues, and optionally
//! the eigenvectors, of a real symmetric matrix in the way of the LAPACK
//! `SYEV` driver:
//!
//! 1. the matrix is reduced to symmetric tridiagonal form T = QᵀAQ with
//!    blocked Householder reflections,
//! 2. Q is formed explicitly from the reflectors when eigenvectors are
//!    wanted,
//! 3. T is diagonalized by the implicit QL/QR iteration with Wilkinson
//!    shift, accumulating the plane rotations into Q.
//!
//! All routines are generic over the working format through the
//! [`FloatT`](crate::algebra::FloatT) trait, with implementations for the
//! 16 bit formats [`half::f16`] and [`half::bf16`] as well as `f32` and
//! `f64`.  Every intermediate result is rounded to the working format, and
//! the driver scales matrices into the safe range of that format first.
//!
//! ```
//! use halfeig::algebra::*;
//! use half::f16;
//!
//! let mut A = Matrix::<f16>::from(&[[2., 1.], [1., 2.]]);
//! let params = SyevParams::default();
//! let mut w = vec![f16::ZERO; 2];
//! let mut work = vec![f16::ZERO; syev_workspace(2, &params)];
//! syev(EigenJob::Vectors, MatrixTriangle::Triu, A.rb_mut(), &mut w, &mut work, &params).unwrap();
//! assert!((w[0].to_f32() - 1.).abs() < 1e-2);
//! assert!((w[1].to_f32() - 3.).abs() < 1e-2);
//! ```
//!
//! The [`solver`] module provides the same computation behind the classical
//! integer status interface, with row major support and workspace queries.
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate version
pub fn version() -> &'static str {
    VERSION
}

pub mod algebra;
pub mod solver;
