//! Recursive state estimation: linear and extended Kalman filters.
//!
//! Both filters are fixed-size (`N` states, `M` measurements), hold every
//! matrix on the stack and are driven by the caller in a
//! `predict` → `correct` cycle. State vectors are [`ColumnVector`]s.
//!
//! # Linear Kalman filter
//!
//! ```
//! use numcal::estimate::KalmanFilter;
//! use numcal::{ColumnVector, Matrix};
//!
//! // 1-D constant velocity: state [position, velocity], position measured
//! let t = 0.01;
//! let mut kf = KalmanFilter::<f64, 2, 1>::new();
//! kf.init(&ColumnVector::from_column([50.0, 0.0]), 1e5);
//! kf.set_a(&Matrix::new([[1.0, t], [0.0, 1.0]]));
//! kf.set_h(&Matrix::new([[1.0, 0.0]]));
//! kf.set_q(&Matrix::scaled_eye(1e-1));
//! kf.set_r(&Matrix::new([[1e-3]]));
//!
//! for i in 0..=100 {
//!     kf.predict();
//!     kf.correct(&ColumnVector::from_column([50.0 + 0.3 * i as f64])).unwrap();
//! }
//! assert!((kf.state()[(0, 0)] - 80.0).abs() < 1e-2);
//! assert!((kf.state()[(1, 0)] - 30.0).abs() < 1e-2);
//! ```
//!
//! # Extended Kalman filter
//!
//! [`ExtendedKalmanFilter`] propagates the state through nonlinear `Fa`/`Fh`
//! and the covariance through the Jacobians `Ja`/`Jh`. Set the Jacobians
//! with [`set_ja`](ExtendedKalmanFilter::set_ja) and
//! [`set_jh`](ExtendedKalmanFilter::set_jh) at the current linearization
//! point before every cycle, or let
//! [`predict_fd`](ExtendedKalmanFilter::predict_fd) and
//! [`correct_fd`](ExtendedKalmanFilter::correct_fd) difference them.

mod ekf;
mod kalman;


pub use ekf::ExtendedKalmanFilter;
pub use kalman::KalmanFilter;

use crate::matrix::vector::ColumnVector;
use crate::traits::FloatScalar;
use crate::Matrix;

/// Errors from state estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimateError {
    /// Innovation covariance is singular (cannot compute Kalman gain).
    SingularInnovation,
}

impl core::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EstimateError::SingularInnovation => {
                write!(f, "innovation covariance is singular")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EstimateError {}

/// Gain `K = P⁻ Hᵀ S⁻¹` for innovation covariance `S`.
fn gain<T: FloatScalar, const N: usize, const M: usize>(
    p_prior: &Matrix<T, N, N>,
    h: &Matrix<T, M, N>,
    s: &Matrix<T, M, M>,
) -> Result<Matrix<T, N, M>, EstimateError> {
    let s_inv = s.inverse().map_err(|_| EstimateError::SingularInnovation)?;
    Ok(*p_prior * h.transpose() * s_inv)
}

/// Central-difference Jacobian of `f: ColumnVector<T,N> → ColumnVector<T,M>`.
///
/// Step per component is `∛ε · max(|x_j|, 1)`.
pub(crate) fn fd_jacobian<T: FloatScalar, const N: usize, const M: usize>(
    f: &impl Fn(&ColumnVector<T, N>) -> ColumnVector<T, M>,
    x: &ColumnVector<T, N>,
) -> Matrix<T, M, N> {
    let cbrt_eps = T::epsilon().cbrt();
    let two = T::lit(2.0);
    let mut jac = Matrix::<T, M, N>::zeros();

    for j in 0..N {
        let xj = x[(j, 0)];
        let h = cbrt_eps * xj.abs().max(T::one());
        let mut fwd = *x;
        fwd[(j, 0)] = xj + h;
        let mut bwd = *x;
        bwd[(j, 0)] = xj - h;
        let df = (f(&fwd) - f(&bwd)) / (two * h);
        jac.set_col(j, &df.to_row());
    }

    jac
}
