//! Numeric derivatives, scalar search, minimization and nonlinear least
//! squares.
//!
//! Every routine works on fixed-size stack vectors and takes its callbacks
//! through the capability traits [`Func1d`](crate::Func1d),
//! [`FuncNd`](crate::FuncNd) and [`FuncNds`](crate::FuncNds), so closures,
//! `fn` items and model structs are all accepted. Behaviour is configured by
//! one [`OptimalOptions`] value shared by all of them.
//!
//! # Derivatives
//!
//! - [`derivative`]: central difference or Ridders extrapolation
//! - [`grad`], [`jacobian`]: central differences with step `dx`
//!
//! # Scalar search
//!
//! - [`region`]: advance-retreat bracketing of a minimum
//! - [`fminbnd`]: Brent minimization inside a bracket
//! - [`fzero`]: discrete Newton root search
//!
//! # Minimization
//!
//! - [`fminunc`]: Nelder–Mead or conjugate gradient
//! - [`fmincon`]: exterior penalty or augmented Lagrangian over
//!   `c(x) ≤ 0`, `ceq(x) = 0`
//!
//! # Least squares
//!
//! - [`lsqnonlin`]: Gauss-Newton, Levenberg-Marquardt or subsampled
//!   Gauss-Newton
//! - [`lsqnonlin_rkf`]: Huber / Tukey IRLS on top of `lsqnonlin`
//!
//! Exhausting an iteration budget is not an error: results carry
//! `converged: false` with the best point found, and a `tracing` warning is
//! emitted. Errors are reserved for singular systems, invalid arguments and
//! searches that cannot proceed.

mod diff;
mod fmincon;
mod fminunc;
mod lsq;
mod options;
mod robust;
mod search;

#[cfg(test)]
mod tests;

pub use diff::{derivative, grad, jacobian};
pub use fmincon::fmincon;
pub use fminunc::fminunc;
pub use lsq::{lsqnonlin, Residuals};
pub use options::{DiffMode, FminMode, FminconMode, LsqMode, OptimalOptions, RobustMode};
pub use robust::lsqnonlin_rkf;
pub use search::{fminbnd, fzero, region};

use crate::linalg::LinalgError;
use crate::matrix::vector::Vector;

/// Errors from optimization routines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimError {
    /// A linear system in the iteration has no unique solution.
    Singular,
    /// A structural argument is unusable (zero bracket step and the like).
    InvalidArgument,
    /// [`region`] expanded its budget without bracketing a minimum.
    BracketNotFound,
    /// The objective or an iterate became NaN or infinite.
    NotFinite,
}

impl core::fmt::Display for OptimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OptimError::Singular => write!(f, "singular system in iteration"),
            OptimError::InvalidArgument => write!(f, "invalid argument"),
            OptimError::BracketNotFound => write!(f, "no bracket found; objective may be unbounded"),
            OptimError::NotFinite => write!(f, "computed value is NaN or infinity"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OptimError {}

impl From<LinalgError> for OptimError {
    fn from(_: LinalgError) -> Self {
        OptimError::Singular
    }
}

/// Result of a scalar search ([`fminbnd`], [`fzero`]).
#[derive(Debug, Clone, Copy)]
pub struct ScalarResult<T> {
    pub x: T,
    /// `f(x)`.
    pub fx: T,
    pub iterations: usize,
    /// `false` if the iteration budget ran out first.
    pub converged: bool,
}

/// Result of [`fminunc`] and [`fmincon`].
#[derive(Debug, Clone, Copy)]
pub struct MinResult<T, const N: usize> {
    /// Best point found.
    pub x: Vector<T, N>,
    /// Objective at `x`. For [`fmincon`] this is the original objective,
    /// without penalty terms.
    pub fx: T,
    /// Inner iterations for [`fminunc`], outer iterations for [`fmincon`].
    pub iterations: usize,
    pub converged: bool,
}

/// Result of [`lsqnonlin`] and [`lsqnonlin_rkf`].
#[derive(Debug, Clone, Copy)]
pub struct LsqResult<T, const N: usize> {
    pub x: Vector<T, N>,
    /// Sum of squared residuals at `x`.
    pub cost: T,
    pub iterations: usize,
    pub converged: bool,
}
