use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, FuncNd, FuncNds};
use crate::Matrix;

use super::diff::{jacobian, row_gradient};
use super::search::line_min;
use super::{LsqMode, LsqResult, OptimError, OptimalOptions};

/// Damping beyond which Levenberg-Marquardt gives up on finding a
/// decreasing step.
const LM_MAX_LAMBDA: f64 = 1e12;
const LM_MIN_LAMBDA: f64 = 1e-12;

/// A residual vector given as `M` independent scalar functions.
///
/// Each row can be evaluated on its own, which makes subsampled
/// Gauss-Newton cheap.
///
/// ```
/// use numcal::optim::Residuals;
/// use numcal::{FuncNd, FuncNds, Vector};
///
/// let r0 = |x: &Vector<f64, 2>| x[0] + x[1] - 6.0;
/// let r1 = |x: &Vector<f64, 2>| x[0] - x[1] - 4.0;
/// let r = Residuals([&r0 as &dyn FuncNd<f64, 2>, &r1]);
/// assert_eq!(r.eval_row(&Vector::from_array([5.0, 1.0]), 1), 0.0);
/// ```
pub struct Residuals<'a, T, const N: usize, const M: usize>(pub [&'a dyn FuncNd<T, N>; M]);

impl<T: FloatScalar, const N: usize, const M: usize> FuncNds<T, N, M> for Residuals<'_, T, N, M> {
    fn eval(&self, x: &Vector<T, N>) -> Vector<T, M> {
        Vector::from_array(core::array::from_fn(|i| self.0[i].eval(x)))
    }

    #[inline]
    fn eval_row(&self, x: &Vector<T, N>, i: usize) -> T {
        self.0[i].eval(x)
    }
}

/// Nonlinear least squares: minimize `‖r(x)‖²`.
///
/// Dispatches on `options.lsq_mode`:
///
/// - [`LsqMode::GaussNewton`]: solves `JᵀJ d = −Jᵀr` with a central-difference
///   Jacobian, then line-searches along `d` on the full cost. Stops when the
///   accepted step is shorter than `tol`.
/// - [`LsqMode::LevenbergMarquardt`]: solves `(JᵀJ + λI) d = −Jᵀr`, accepting
///   the step only if the cost drops. `λ` shrinks by `lm_decrease` on
///   success and grows by `lm_increase` on failure. Stops when `‖Jᵀr‖ < tol`
///   or a trial step is negligible relative to `x`.
/// - [`LsqMode::SubsampledGaussNewton`]: Gauss-Newton with `J` and `r` built
///   from `subsample` rows drawn without replacement each iteration, from
///   an RNG seeded with `seed`.
///
/// # Errors
///
/// [`OptimError::Singular`] if the normal equations cannot be solved
/// (fewer independent residuals than unknowns), plus the line-search errors
/// of [`region`](super::region).
///
/// ```
/// use numcal::optim::{lsqnonlin, LsqMode, OptimalOptions};
/// use numcal::Vector;
///
/// let r = |x: &Vector<f64, 2>| Vector::from_array([x[0] + x[1] - 6.0, x[0] - x[1] - 4.0]);
/// let opts = OptimalOptions { lsq_mode: LsqMode::LevenbergMarquardt, ..OptimalOptions::default() };
/// let fit = lsqnonlin(&r, &Vector::from_array([0.0, 0.0]), &opts).unwrap();
/// assert!((fit.x[0] - 5.0).abs() < 1e-3);
/// assert!((fit.x[1] - 1.0).abs() < 1e-3);
/// ```
pub fn lsqnonlin<T, F, const N: usize, const M: usize>(
    r: &F,
    x0: &Vector<T, N>,
    options: &OptimalOptions<T>,
) -> Result<LsqResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let result = weighted(r, x0, &[T::one(); M], options)?;
    if result.converged {
        tracing::debug!(
            mode = ?options.lsq_mode,
            iterations = result.iterations,
            cost = ?result.cost,
            "lsqnonlin converged"
        );
    } else {
        tracing::warn!(
            mode = ?options.lsq_mode,
            max_iter = options.max_iter,
            "lsqnonlin did not converge"
        );
    }
    Ok(result)
}

/// Minimize `Σ wᵢ rᵢ(x)²` with the solver selected by `options.lsq_mode`.
pub(crate) fn weighted<T, F, const N: usize, const M: usize>(
    r: &F,
    x0: &Vector<T, N>,
    w: &[T; M],
    options: &OptimalOptions<T>,
) -> Result<LsqResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    match options.lsq_mode {
        LsqMode::GaussNewton => gauss_newton(r, x0, w, options, None),
        LsqMode::LevenbergMarquardt => levenberg_marquardt(r, x0, w, options),
        LsqMode::SubsampledGaussNewton => {
            let sampler = RowSampler::new(options.subsample, N, options.seed);
            gauss_newton(r, x0, w, options, Some(sampler))
        }
    }
}

pub(crate) fn cost<T, F, const N: usize, const M: usize>(r: &F, x: &Vector<T, N>, w: &[T; M]) -> T
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let res = r.eval(x);
    (0..M).fold(T::zero(), |acc, i| acc + w[i] * res[i] * res[i])
}

/// Draws distinct residual rows by partial Fisher–Yates shuffle.
struct RowSampler<const M: usize> {
    rng: SmallRng,
    count: usize,
    rows: [usize; M],
}

impl<const M: usize> RowSampler<M> {
    fn new(requested: usize, unknowns: usize, seed: u64) -> Self {
        let count = if requested == 0 { (M + 1) / 2 } else { requested };
        Self {
            rng: SmallRng::seed_from_u64(seed),
            count: count.max(unknowns).min(M),
            rows: core::array::from_fn(|i| i),
        }
    }

    fn draw(&mut self) -> &[usize] {
        for k in 0..self.count {
            let j = self.rng.gen_range(k..M);
            self.rows.swap(k, j);
        }
        &self.rows[..self.count]
    }
}

/// Accumulate `A += w·j·jᵀ`, `b −= w·j·r`.
fn accumulate<T: FloatScalar, const N: usize>(
    a: &mut Matrix<T, N, N>,
    b: &mut Vector<T, N>,
    j: &Vector<T, N>,
    r: T,
    w: T,
) {
    *a = *a + j.outer(j) * w;
    *b = *b - *j * (w * r);
}

/// Weighted normal equations `(JᵀWJ, −JᵀWr)` over every row.
fn normal_equations<T, F, const N: usize, const M: usize>(
    r: &F,
    x: &Vector<T, N>,
    w: &[T; M],
    options: &OptimalOptions<T>,
) -> (Matrix<T, N, N>, Vector<T, N>)
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let jac: Matrix<T, M, N> = jacobian(r, x, options);
    let res = r.eval(x);
    let mut a = Matrix::zeros();
    let mut b = Vector::zeros();
    for i in 0..M {
        accumulate(&mut a, &mut b, &jac.row(i), res[i], w[i]);
    }
    (a, b)
}

/// Weighted normal equations over the listed rows only.
fn sampled_normal_equations<T, F, const N: usize, const M: usize>(
    r: &F,
    x: &Vector<T, N>,
    w: &[T; M],
    rows: &[usize],
    options: &OptimalOptions<T>,
) -> (Matrix<T, N, N>, Vector<T, N>)
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let mut a = Matrix::zeros();
    let mut b = Vector::zeros();
    for &i in rows {
        let j = row_gradient::<T, F, N, M>(r, x, i, options);
        accumulate(&mut a, &mut b, &j, r.eval_row(x, i), w[i]);
    }
    (a, b)
}

/// Solve a symmetric system, trying Cholesky first and LU if that fails.
fn solve_normal<T: FloatScalar, const N: usize>(
    a: &Matrix<T, N, N>,
    b: &Vector<T, N>,
) -> Result<Vector<T, N>, OptimError> {
    if let Ok(chol) = a.cholesky() {
        return Ok(chol.solve(b));
    }
    Ok(a.solve(b)?)
}

fn gauss_newton<T, F, const N: usize, const M: usize>(
    r: &F,
    x0: &Vector<T, N>,
    w: &[T; M],
    options: &OptimalOptions<T>,
    mut sampler: Option<RowSampler<M>>,
) -> Result<LsqResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let mut x = *x0;
    let mut fx = cost(r, &x, w);

    for iter in 0..options.max_iter {
        let (a, b) = match sampler.as_mut() {
            Some(s) => sampled_normal_equations(r, &x, w, s.draw(), options),
            None => normal_equations(r, &x, w, options),
        };
        let d = solve_normal(&a, &b)?;

        let phi = |alpha: T| cost(r, &(x + d * alpha), w);
        let (alpha, f_next) = line_min(&phi, options)?;
        let step = d * alpha;
        x = x + step;
        fx = f_next;

        if step.norm() < options.tol {
            return Ok(LsqResult {
                x,
                cost: fx,
                iterations: iter + 1,
                converged: true,
            });
        }
    }

    Ok(LsqResult {
        x,
        cost: fx,
        iterations: options.max_iter,
        converged: false,
    })
}

fn levenberg_marquardt<T, F, const N: usize, const M: usize>(
    r: &F,
    x0: &Vector<T, N>,
    w: &[T; M],
    options: &OptimalOptions<T>,
) -> Result<LsqResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let max_lambda = T::lit(LM_MAX_LAMBDA);
    let min_lambda = T::lit(LM_MIN_LAMBDA);
    let mut x = *x0;
    let mut fx = cost(r, &x, w);
    let mut lambda = options.lm_lambda;

    for iter in 0..options.max_iter {
        let (a, b) = normal_equations(r, &x, w, options);
        if b.norm() < options.tol {
            return Ok(LsqResult {
                x,
                cost: fx,
                iterations: iter,
                converged: true,
            });
        }

        // Raise the damping until the step lowers the cost
        let d = loop {
            let d = solve_normal(&(a + Matrix::scaled_eye(lambda)), &b)?;
            if d.norm() < options.tol * (x.norm() + options.tol) {
                return Ok(LsqResult {
                    x,
                    cost: fx,
                    iterations: iter,
                    converged: true,
                });
            }
            let f_trial = cost(r, &(x + d), w);
            if f_trial < fx {
                fx = f_trial;
                lambda = (lambda * options.lm_decrease).max(min_lambda);
                break d;
            }
            lambda = lambda * options.lm_increase;
            if lambda > max_lambda {
                tracing::warn!(iterations = iter, "levenberg-marquardt damping exhausted");
                return Ok(LsqResult {
                    x,
                    cost: fx,
                    iterations: iter,
                    converged: false,
                });
            }
        };
        x = x + d;
    }

    Ok(LsqResult {
        x,
        cost: fx,
        iterations: options.max_iter,
        converged: false,
    })
}
