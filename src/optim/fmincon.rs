use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, FuncNd};

use super::diff::grad;
use super::fminunc::{fminunc, unconstrained};
use super::{FminconMode, MinResult, OptimError, OptimalOptions};

/// Constrained local minimization of `f: Tⁿ → T`.
///
/// Minimizes `f(x)` subject to `c[i](x) ≤ 0` and `ceq[j](x) = 0`. The
/// constrained problem is replaced by a sequence of unconstrained ones,
/// each solved with [`fminunc`] and warm-started from the previous
/// solution. Dispatches on `options.fmincon_mode`:
///
/// - [`FminconMode::ExteriorPenalty`]: minimizes
///   `f + μ·(Σ ceq² + Σ max(c, 0)²)`, starting at `μ = exterior` and
///   multiplying by `penalty_growth` after each outer iteration.
/// - [`FminconMode::Lagrangian`]: augmented Lagrangian with one multiplier
///   per constraint, updated after each outer iteration. The penalty weight
///   starts at `lagrangian_mu` and grows only when the violation fails to
///   shrink by a factor of four.
///
/// The conjugate-gradient subproblems are driven by the exact gradient of
/// the penalized objective, assembled from [`grad`](super::grad) of `f` and
/// of each constraint, so difference steps never straddle the kink of
/// `max(c, 0)`.
///
/// Stops once the worst violation falls below `tol`; `converged` is set
/// only when the last subproblem converged as well. `iterations` counts
/// outer iterations. With both constraint lists empty this is exactly
/// [`fminunc`].
///
/// ```
/// use numcal::optim::{fmincon, OptimalOptions};
/// use numcal::{FuncNd, Vector};
///
/// let f = |x: &Vector<f64, 2>| {
///     60.0 - 10.0 * x[0] - 4.0 * x[1] + x[0] * x[0] + x[1] * x[1] - x[0] * x[1]
/// };
/// let on_line = |x: &Vector<f64, 2>| x[0] + x[1] - 10.0;
/// let ceq: [&dyn FuncNd<f64, 2>; 1] = [&on_line];
///
/// let r = fmincon(&f, &Vector::from_array([0.0, 0.0]), &[], &ceq, &OptimalOptions::default())
///     .unwrap();
/// assert!((r.x[0] - 6.0).abs() < 1e-3);
/// assert!((r.x[1] - 4.0).abs() < 1e-3);
/// ```
pub fn fmincon<T, F, const N: usize, const P: usize, const Q: usize>(
    f: &F,
    x0: &Vector<T, N>,
    c: &[&dyn FuncNd<T, N>; P],
    ceq: &[&dyn FuncNd<T, N>; Q],
    options: &OptimalOptions<T>,
) -> Result<MinResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
{
    if P == 0 && Q == 0 {
        return fminunc(f, x0, options);
    }
    match options.fmincon_mode {
        FminconMode::ExteriorPenalty => exterior_penalty(f, x0, c, ceq, options),
        FminconMode::Lagrangian => augmented_lagrangian(f, x0, c, ceq, options),
    }
}

/// Largest constraint violation at `x`, zero when feasible.
fn violation<T, const N: usize, const P: usize, const Q: usize>(
    x: &Vector<T, N>,
    c: &[&dyn FuncNd<T, N>; P],
    ceq: &[&dyn FuncNd<T, N>; Q],
) -> T
where
    T: FloatScalar,
{
    let ineq = c.iter().map(|g| g.eval(x).max(T::zero()));
    let eq = ceq.iter().map(|h| h.eval(x).abs());
    ineq.chain(eq).fold(T::zero(), |worst, v| worst.max(v))
}

/// Result for a feasible `x`, converged only if its subproblem was.
fn finish<T, F, const N: usize>(
    f: &F,
    x: Vector<T, N>,
    iterations: usize,
    inner_converged: bool,
) -> MinResult<T, N>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
{
    if inner_converged {
        tracing::debug!(outer_iterations = iterations, "fmincon converged");
    } else {
        tracing::warn!(
            outer_iterations = iterations,
            "fmincon reached feasibility but its last subproblem did not converge"
        );
    }
    MinResult {
        x,
        fx: f.eval(&x),
        iterations,
        converged: inner_converged,
    }
}

fn exterior_penalty<T, F, const N: usize, const P: usize, const Q: usize>(
    f: &F,
    x0: &Vector<T, N>,
    c: &[&dyn FuncNd<T, N>; P],
    ceq: &[&dyn FuncNd<T, N>; Q],
    options: &OptimalOptions<T>,
) -> Result<MinResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
{
    let two = T::lit(2.0);
    let mut mu = options.exterior;
    let mut x = *x0;

    for outer in 0..options.outer_iter {
        let penalized = |z: &Vector<T, N>| {
            let ineq = c
                .iter()
                .map(|g| g.eval(z).max(T::zero()).powi(2))
                .fold(T::zero(), |acc, v| acc + v);
            let eq = ceq
                .iter()
                .map(|h| h.eval(z).powi(2))
                .fold(T::zero(), |acc, v| acc + v);
            f.eval(z) + mu * (ineq + eq)
        };
        let penalized_grad = |z: &Vector<T, N>| {
            let mut gz = grad(f, z, options);
            for g in c {
                let v = g.eval(z);
                if v > T::zero() {
                    gz = gz + grad(*g, z, options) * (two * mu * v);
                }
            }
            for h in ceq {
                gz = gz + grad(*h, z, options) * (two * mu * h.eval(z));
            }
            gz
        };
        let inner = unconstrained(&penalized, &penalized_grad, &x, options)?;
        x = inner.x;

        let viol = violation(&x, c, ceq);
        tracing::trace!(
            outer,
            mu = ?mu,
            violation = ?viol,
            inner_converged = inner.converged,
            "exterior penalty"
        );
        if viol < options.tol {
            return Ok(finish(f, x, outer + 1, inner.converged));
        }
        mu = mu * options.penalty_growth;
    }

    tracing::warn!(outer_iter = options.outer_iter, "fmincon did not reach feasibility");
    Ok(MinResult {
        x,
        fx: f.eval(&x),
        iterations: options.outer_iter,
        converged: false,
    })
}

fn augmented_lagrangian<T, F, const N: usize, const P: usize, const Q: usize>(
    f: &F,
    x0: &Vector<T, N>,
    c: &[&dyn FuncNd<T, N>; P],
    ceq: &[&dyn FuncNd<T, N>; Q],
    options: &OptimalOptions<T>,
) -> Result<MinResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
{
    let half = T::lit(0.5);
    let quarter = T::lit(0.25);
    let mut mu = options.lagrangian_mu;
    let mut lambda = [T::zero(); Q];
    let mut nu = [T::zero(); P];
    let mut x = *x0;
    let mut prev = T::infinity();

    for outer in 0..options.outer_iter {
        let lagrangian = |z: &Vector<T, N>| {
            let mut v = f.eval(z);
            for (h, &l) in ceq.iter().zip(&lambda) {
                let hz = h.eval(z);
                v = v + l * hz + half * mu * hz * hz;
            }
            // Powell-Hestenes-Rockafellar form for inequalities
            for (g, &n) in c.iter().zip(&nu) {
                let shifted = (n + mu * g.eval(z)).max(T::zero());
                v = v + (shifted * shifted - n * n) / (mu + mu);
            }
            v
        };
        let lagrangian_grad = |z: &Vector<T, N>| {
            let mut gz = grad(f, z, options);
            for (h, &l) in ceq.iter().zip(&lambda) {
                gz = gz + grad(*h, z, options) * (l + mu * h.eval(z));
            }
            for (g, &n) in c.iter().zip(&nu) {
                let shifted = (n + mu * g.eval(z)).max(T::zero());
                if shifted > T::zero() {
                    gz = gz + grad(*g, z, options) * shifted;
                }
            }
            gz
        };
        let inner = unconstrained(&lagrangian, &lagrangian_grad, &x, options)?;
        x = inner.x;

        for (h, l) in ceq.iter().zip(lambda.iter_mut()) {
            *l = *l + mu * h.eval(&x);
        }
        for (g, n) in c.iter().zip(nu.iter_mut()) {
            *n = (*n + mu * g.eval(&x)).max(T::zero());
        }

        let viol = violation(&x, c, ceq);
        tracing::trace!(
            outer,
            mu = ?mu,
            violation = ?viol,
            inner_converged = inner.converged,
            "augmented lagrangian"
        );
        if viol < options.tol {
            return Ok(finish(f, x, outer + 1, inner.converged));
        }
        if viol > quarter * prev {
            mu = mu * options.penalty_growth;
        }
        prev = viol;
    }

    tracing::warn!(outer_iter = options.outer_iter, "fmincon did not reach feasibility");
    Ok(MinResult {
        x,
        fx: f.eval(&x),
        iterations: options.outer_iter,
        converged: false,
    })
}
