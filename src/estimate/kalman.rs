use crate::matrix::vector::ColumnVector;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::{gain, EstimateError};

/// Linear Kalman filter with `N` states, `M` measurements and an optional
/// `C`-dimensional control input.
///
/// A freshly built filter has `A`, `H`, `Q`, `R` and `P` set to identity
/// and `B` to zero. The model matrices may be replaced between any two
/// calls, e.g. to account for a varying time step.
///
/// ```
/// use numcal::estimate::KalmanFilter;
/// use numcal::{ColumnVector, Matrix};
///
/// // Position/velocity driven by a commanded acceleration
/// let t = 0.1;
/// let mut kf = KalmanFilter::<f64, 2, 1, 1>::new();
/// kf.init(&ColumnVector::from_column([0.0, 0.0]), 1.0);
/// kf.set_a(&Matrix::new([[1.0, t], [0.0, 1.0]]));
/// kf.set_b(&Matrix::new([[0.5 * t * t], [t]]));
/// kf.set_h(&Matrix::new([[1.0, 0.0]]));
///
/// let prior = kf.predict_control(&ColumnVector::from_column([2.0]));
/// assert!((prior[(1, 0)] - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct KalmanFilter<T, const N: usize, const M: usize, const C: usize = 0> {
    x: ColumnVector<T, N>,
    x_prior: ColumnVector<T, N>,
    p: Matrix<T, N, N>,
    p_prior: Matrix<T, N, N>,
    a: Matrix<T, N, N>,
    h: Matrix<T, M, N>,
    b: Matrix<T, N, C>,
    q: Matrix<T, N, N>,
    r: Matrix<T, M, M>,
    k: Matrix<T, N, M>,
}

impl<T: FloatScalar, const N: usize, const M: usize, const C: usize> KalmanFilter<T, N, M, C> {
    pub fn new() -> Self {
        let p = Matrix::eye();
        Self {
            x: ColumnVector::zeros(),
            x_prior: ColumnVector::zeros(),
            p,
            p_prior: p,
            a: Matrix::eye(),
            h: Matrix::from_fn(|i, j| if i == j { T::one() } else { T::zero() }),
            b: Matrix::zeros(),
            q: Matrix::eye(),
            r: Matrix::eye(),
            k: Matrix::zeros(),
        }
    }

    /// Reset the estimate to `x0` with covariance `error · I`.
    pub fn init(&mut self, x0: &ColumnVector<T, N>, error: T) {
        self.init_with(x0, &Matrix::scaled_eye(error));
    }

    /// Reset the estimate to `x0` with covariance `p0`.
    pub fn init_with(&mut self, x0: &ColumnVector<T, N>, p0: &Matrix<T, N, N>) {
        self.x = *x0;
        self.x_prior = *x0;
        self.set_p(p0);
    }

    pub fn set_a(&mut self, a: &Matrix<T, N, N>) {
        self.a = *a;
    }

    pub fn set_h(&mut self, h: &Matrix<T, M, N>) {
        self.h = *h;
    }

    pub fn set_b(&mut self, b: &Matrix<T, N, C>) {
        self.b = *b;
    }

    /// Process noise covariance.
    pub fn set_q(&mut self, q: &Matrix<T, N, N>) {
        self.q = *q;
    }

    /// Measurement noise covariance.
    pub fn set_r(&mut self, r: &Matrix<T, M, M>) {
        self.r = *r;
    }

    /// Overwrite both the posterior and prior covariance.
    pub fn set_p(&mut self, p: &Matrix<T, N, N>) {
        self.p = *p;
        self.p_prior = *p;
    }

    /// Posterior state estimate `x`.
    #[inline]
    pub fn state(&self) -> &ColumnVector<T, N> {
        &self.x
    }

    /// Prior state estimate `x⁻` from the last predict.
    #[inline]
    pub fn prior(&self) -> &ColumnVector<T, N> {
        &self.x_prior
    }

    #[inline]
    pub fn covariance(&self) -> &Matrix<T, N, N> {
        &self.p
    }

    #[inline]
    pub fn prior_covariance(&self) -> &Matrix<T, N, N> {
        &self.p_prior
    }

    /// Gain from the last correct.
    #[inline]
    pub fn gain(&self) -> &Matrix<T, N, M> {
        &self.k
    }

    /// `x⁻ = A x`, `P⁻ = A P Aᵀ + Q`. Returns the prior estimate.
    pub fn predict(&mut self) -> &ColumnVector<T, N> {
        self.x_prior = self.a * self.x;
        self.propagate_covariance();
        &self.x_prior
    }

    /// `x⁻ = A x + B u`, `P⁻ = A P Aᵀ + Q`. Returns the prior estimate.
    pub fn predict_control(&mut self, u: &ColumnVector<T, C>) -> &ColumnVector<T, N> {
        self.x_prior = self.a * self.x + self.b * *u;
        self.propagate_covariance();
        &self.x_prior
    }

    fn propagate_covariance(&mut self) {
        self.p_prior = self.a * self.p * self.a.transpose() + self.q;
    }

    /// Fold in measurement `z` and return the posterior estimate.
    ///
    /// `K = P⁻Hᵀ(HP⁻Hᵀ + R)⁻¹`, `x = x⁻ + K(z − Hx⁻)`, `P = (I − KH)P⁻`, symmetrized.
    /// On a singular innovation covariance the filter is left unchanged.
    pub fn correct(&mut self, z: &ColumnVector<T, M>) -> Result<&ColumnVector<T, N>, EstimateError> {
        let ht = self.h.transpose();
        let s = self.h * self.p_prior * ht + self.r;
        self.k = gain(&self.p_prior, &self.h, &s)?;
        self.x = self.x_prior + self.k * (*z - self.h * self.x_prior);
        self.p = ((Matrix::<T, N, N>::eye() - self.k * self.h) * self.p_prior).symmetrize();
        Ok(&self.x)
    }
}

impl<T: FloatScalar, const N: usize, const M: usize, const C: usize> Default
    for KalmanFilter<T, N, M, C>
{
    fn default() -> Self {
        Self::new()
    }
}
