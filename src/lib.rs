//! # numcal
//!
//! Fixed-dimension numerical methods for tracking and fitting workloads:
//! curve fitting, scalar search, multivariate optimization, nonlinear least
//! squares, explicit Runge-Kutta integration and Kalman filtering. No-std
//! compatible; every solver works on stack-allocated const-generic matrices.
//!
//! ## Quick start
//!
//! ```
//! use numcal::optim::{fminunc, OptimalOptions};
//! use numcal::Vector;
//!
//! let f = |x: &Vector<f64, 2>| {
//!     60.0 - 10.0 * x[0] - 4.0 * x[1] + x[0] * x[0] + x[1] * x[1] - x[0] * x[1]
//! };
//! let r = fminunc(&f, &Vector::from_array([0.0, 0.0]), &OptimalOptions::default()).unwrap();
//! assert!((r.x[0] - 8.0).abs() < 1e-4);
//! assert!((r.fx - 8.0).abs() < 1e-4);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: `Matrix<T, M, N>` with column-major `[[T; M]; N]` storage.
//!   [`Vector<T, N>`] is a row vector, [`ColumnVector<T, N>`] a column vector.
//! - [`linalg`]: LU (partial pivoting) and Cholesky decompositions, with
//!   `a.solve(&b)`, `a.inverse()`, `a.det()`, `a.cholesky()` shortcuts.
//! - [`interp`]: Newton divided-difference interpolation, Horner polynomials
//!   and least-squares fitting over an explicit monomial basis (requires `alloc`).
//! - [`optim`]: numeric derivatives, bracketing, Brent minimization, secant
//!   root search, Nelder–Mead and conjugate-gradient minimization, penalty
//!   and augmented-Lagrangian constrained minimization, Gauss-Newton /
//!   Levenberg-Marquardt / subsampled least squares and robust IRLS.
//!   Requires `optim`.
//! - [`ode`]: tableau-driven explicit Runge-Kutta stepping with RK2/RK3/RK4
//!   presets, trajectory buffers and a lazy trajectory iterator. Requires `ode`.
//! - [`estimate`]: linear Kalman filter and extended Kalman filter.
//! - [`traits`]: [`Scalar`], [`FloatScalar`] and the function capabilities
//!   [`Func1d`], [`FuncNd`], [`FuncNds`], [`Ode`] accepted by the solvers.
//!
//! ## Diagnostics
//!
//! Solvers emit [`tracing`] events: `debug` on termination, `warn` when an
//! iteration budget runs out, `trace` per outer iteration. Install any
//! subscriber to see them; nothing is printed otherwise.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Implies `alloc`. Hardware FPU via system libm |
//! | `alloc` | via std  | Interpolation tables, curve fitting, ODE trajectory buffers |
//! | `optim` | yes      | Search, optimization, least squares |
//! | `ode`   | yes      | Runge-Kutta integration |
//! | `all`   | no       | Everything |
//!
//! Without `std`, floats go through the pure-Rust `libm` backend of
//! `num-traits`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod estimate;
#[cfg(feature = "alloc")]
pub mod interp;
pub mod linalg;
pub mod matrix;
#[cfg(feature = "ode")]
pub mod ode;
#[cfg(feature = "optim")]
pub mod optim;
pub mod traits;

pub use matrix::aliases::{
    ColumnVector2, ColumnVector3, ColumnVector4, ColumnVector5, Matrix2, Matrix3, Matrix4,
    Matrix5, Matrix6, Vector2, Vector3, Vector4,
};
pub use matrix::vector::{ColumnVector, Vector};
pub use matrix::Matrix;
pub use traits::{FloatScalar, Func1d, FuncNd, FuncNds, Ode, Scalar};
