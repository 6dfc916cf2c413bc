//! Eigensolver front end.
//!
//! The [`EigenSolver`] context wraps the core [`syev`](crate::algebra::syev)
//! driver behind the classical LAPACKE style interface: raw character
//! flags, row or column major storage, integer status codes and a
//! workspace query.  Its [`EigenSettings`] replace the process wide state
//! of that interface, i.e. the NaN check flag and the error handler.

mod eigensolver;
pub use eigensolver::*;
mod error_hook;
pub use error_hook::*;
mod layout;
pub use layout::*;
mod settings;
pub use settings::*;
