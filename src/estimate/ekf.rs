use crate::matrix::vector::ColumnVector;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::{fd_jacobian, gain, EstimateError};

/// Extended Kalman filter with `N` states and `M` measurements.
///
/// The state is advanced by `Fa` and observed through `Fh`; covariance is
/// carried by the linearizations `Ja = ∂Fa/∂x` and `Jh = ∂Fh/∂x`, together
/// with the noise Jacobians `W` (process) and `V` (measurement):
///
/// - predict: `x⁻ = Fa(x)`, `P⁻ = Ja P Jaᵀ + W Q Wᵀ`
/// - correct: `K = P⁻Jhᵀ(Jh P⁻ Jhᵀ + V R Vᵀ)⁻¹`, `x = x⁻ + K(z − Fh(x⁻))`,
///   `P = (I − K Jh) P⁻`
///
/// [`predict`](Self::predict) and [`correct`](Self::correct) use whatever
/// `Ja`/`Jh` were last set. The filter cannot tell a stale Jacobian from a
/// fresh one: set `Ja` at `x` before predicting and `Jh` at `x⁻` before
/// correcting, or use [`predict_fd`](Self::predict_fd) and
/// [`correct_fd`](Self::correct_fd).
///
/// # Example
///
/// ```
/// use numcal::estimate::ExtendedKalmanFilter;
/// use numcal::{ColumnVector, Matrix};
///
/// // Range to a fixed beacon at the origin, constant-velocity target
/// let t = 0.1;
/// let fa = move |x: &ColumnVector<f64, 2>| ColumnVector::from_column([x[(0, 0)] + t * x[(1, 0)], x[(1, 0)]]);
/// let fh = |x: &ColumnVector<f64, 2>| ColumnVector::from_column([x[(0, 0)].abs()]);
///
/// let mut ekf = ExtendedKalmanFilter::new(fa, fh);
/// ekf.init(&ColumnVector::from_column([10.0, 0.0]), 10.0);
/// ekf.set_q(&Matrix::scaled_eye(1e-4));
/// ekf.set_r(&Matrix::new([[1e-2]]));
///
/// for i in 1..=50 {
///     ekf.predict_fd();
///     let range = 10.0 + 0.1 * i as f64;
///     ekf.correct_fd(&ColumnVector::from_column([range])).unwrap();
/// }
/// assert!((ekf.state()[(1, 0)] - 1.0).abs() < 0.05);
/// ```
#[derive(Debug, Clone)]
pub struct ExtendedKalmanFilter<T, const N: usize, const M: usize, Fa, Fh> {
    fa: Fa,
    fh: Fh,
    x: ColumnVector<T, N>,
    x_prior: ColumnVector<T, N>,
    p: Matrix<T, N, N>,
    p_prior: Matrix<T, N, N>,
    ja: Matrix<T, N, N>,
    jh: Matrix<T, M, N>,
    w: Matrix<T, N, N>,
    v: Matrix<T, M, M>,
    q: Matrix<T, N, N>,
    r: Matrix<T, M, M>,
    k: Matrix<T, N, M>,
}

impl<T, const N: usize, const M: usize, Fa, Fh> ExtendedKalmanFilter<T, N, M, Fa, Fh>
where
    T: FloatScalar,
    Fa: Fn(&ColumnVector<T, N>) -> ColumnVector<T, N>,
    Fh: Fn(&ColumnVector<T, N>) -> ColumnVector<T, M>,
{
    /// Build a filter from the propagation and observation functions.
    ///
    /// All matrices start at identity (`Jh` with ones on its leading
    /// diagonal), the state at zero.
    pub fn new(fa: Fa, fh: Fh) -> Self {
        let p = Matrix::eye();
        Self {
            fa,
            fh,
            x: ColumnVector::zeros(),
            x_prior: ColumnVector::zeros(),
            p,
            p_prior: p,
            ja: Matrix::eye(),
            jh: Matrix::from_fn(|i, j| if i == j { T::one() } else { T::zero() }),
            w: Matrix::eye(),
            v: Matrix::eye(),
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

    /// State Jacobian `∂Fa/∂x`, evaluated at the current posterior.
    pub fn set_ja(&mut self, ja: &Matrix<T, N, N>) {
        self.ja = *ja;
    }

    /// Observation Jacobian `∂Fh/∂x`, evaluated at the current prior.
    pub fn set_jh(&mut self, jh: &Matrix<T, M, N>) {
        self.jh = *jh;
    }

    pub fn set_w(&mut self, w: &Matrix<T, N, N>) {
        self.w = *w;
    }

    pub fn set_v(&mut self, v: &Matrix<T, M, M>) {
        self.v = *v;
    }

    pub fn set_q(&mut self, q: &Matrix<T, N, N>) {
        self.q = *q;
    }

    pub fn set_r(&mut self, r: &Matrix<T, M, M>) {
        self.r = *r;
    }

    pub fn set_p(&mut self, p: &Matrix<T, N, N>) {
        self.p = *p;
        self.p_prior = *p;
    }

    #[inline]
    pub fn state(&self) -> &ColumnVector<T, N> {
        &self.x
    }

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

    #[inline]
    pub fn gain(&self) -> &Matrix<T, N, M> {
        &self.k
    }

    /// Advance through `Fa` with the last `Ja`. Returns the prior estimate.
    pub fn predict(&mut self) -> &ColumnVector<T, N> {
        self.x_prior = (self.fa)(&self.x);
        self.p_prior =
            self.ja * self.p * self.ja.transpose() + self.w * self.q * self.w.transpose();
        &self.x_prior
    }

    /// Difference `Ja` at the posterior, then [`predict`](Self::predict).
    pub fn predict_fd(&mut self) -> &ColumnVector<T, N> {
        self.ja = fd_jacobian(&self.fa, &self.x);
        self.predict()
    }

    /// Fold in measurement `z` with the last `Jh`. Returns the posterior
    /// estimate; on a singular innovation covariance the filter is left
    /// unchanged.
    pub fn correct(&mut self, z: &ColumnVector<T, M>) -> Result<&ColumnVector<T, N>, EstimateError> {
        let jh = self.jh;
        self.update(&jh, z)?;
        Ok(&self.x)
    }

    /// Difference `Jh` at the prior, then [`correct`](Self::correct) with it.
    /// The new `Jh` is kept only if the update succeeds.
    pub fn correct_fd(
        &mut self,
        z: &ColumnVector<T, M>,
    ) -> Result<&ColumnVector<T, N>, EstimateError> {
        let jh = fd_jacobian(&self.fh, &self.x_prior);
        self.update(&jh, z)?;
        self.jh = jh;
        Ok(&self.x)
    }

    fn update(&mut self, jh: &Matrix<T, M, N>, z: &ColumnVector<T, M>) -> Result<(), EstimateError> {
        let s = *jh * self.p_prior * jh.transpose() + self.v * self.r * self.v.transpose();
        self.k = gain(&self.p_prior, jh, &s)?;
        self.x = self.x_prior + self.k * (*z - (self.fh)(&self.x_prior));
        self.p = ((Matrix::<T, N, N>::eye() - self.k * *jh) * self.p_prior).symmetrize();
        Ok(())
    }
}
