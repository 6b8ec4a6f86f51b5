use crate::traits::{FloatScalar, Func1d};

use super::{OptimError, OptimalOptions, ScalarResult};

/// Expansion budget of [`region`].
const MAX_EXPANSIONS: usize = 64;

/// Bracket a local minimum of `f` by advance-retreat search.
///
/// Starting from `x0` with trial step `delta`, the window walks downhill and
/// doubles its step until the middle point of three is lowest. The returned
/// `(a, b)` satisfies `a < b` and contains a local minimum.
///
/// # Errors
///
/// [`OptimError::InvalidArgument`] for a zero or non-finite `delta`,
/// [`OptimError::NotFinite`] if `f` returns NaN, and
/// [`OptimError::BracketNotFound`] when `f` keeps decreasing for 64
/// expansions (typically an unbounded objective).
///
/// ```
/// use numcal::optim::region;
///
/// let (a, b) = region(&|x: f64| x * x - 4.0 * x + 7.0, -5.0, 1.0).unwrap();
/// assert!(a < 2.0 && 2.0 < b);
/// ```
pub fn region<T, F>(f: &F, x0: T, delta: T) -> Result<(T, T), OptimError>
where
    T: FloatScalar,
    F: Func1d<T> + ?Sized,
{
    if delta == T::zero() || !delta.is_finite() {
        return Err(OptimError::InvalidArgument);
    }
    let three = T::lit(3.0);
    let mut x = x0;
    let mut d = delta;
    for _ in 0..MAX_EXPANSIONS {
        let f1 = finite(f.eval(x))?;
        let f2 = finite(f.eval(x + d))?;
        if f1 > f2 {
            let f3 = finite(f.eval(x + three * d))?;
            if f2 < f3 {
                return Ok(ordered(x, x + three * d));
            }
            if f2 == f3 {
                return Ok(ordered(x + d, x + three * d));
            }
            x = x + d;
        } else if f1 < f2 {
            let f0 = finite(f.eval(x - d))?;
            if f0 > f1 {
                return Ok(ordered(x - d, x + d));
            }
            if f0 == f1 {
                return Ok(ordered(x - d, x));
            }
            x = x - three * d;
        } else {
            return Ok(ordered(x, x + d));
        }
        d = d + d;
    }
    Err(OptimError::BracketNotFound)
}

fn finite<T: FloatScalar>(v: T) -> Result<T, OptimError> {
    if v.is_nan() {
        Err(OptimError::NotFinite)
    } else {
        Ok(v)
    }
}

fn ordered<T: FloatScalar>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Minimize `f` on `[a, b]` with Brent's method.
///
/// Golden-section steps guarantee progress; parabolic interpolation through
/// the three best points takes over when it lands well inside the bracket.
/// Terminates when the bracket around the best point is narrower than
/// `2·(√ε·|x| + tol/3)`.
///
/// ```
/// use numcal::optim::{fminbnd, region, OptimalOptions};
///
/// let f = |x: f64| x * x - 4.0 * x + 7.0;
/// let (a, b) = region(&f, -5.0, 1.0).unwrap();
/// let r = fminbnd(&f, a, b, &OptimalOptions::default());
/// assert!((r.x - 2.0).abs() < 1e-4);
/// assert!((r.fx - 3.0).abs() < 1e-4);
/// ```
pub fn fminbnd<T, F>(f: &F, a: T, b: T, options: &OptimalOptions<T>) -> ScalarResult<T>
where
    T: FloatScalar,
    F: Func1d<T> + ?Sized,
{
    let (mut a, mut b) = ordered(a, b);
    let half = T::lit(0.5);
    let two = T::lit(2.0);
    // (3 - √5) / 2
    let golden = T::lit(0.381_966_011_250_105_1);
    let sqrt_eps = T::epsilon().sqrt();
    let tol3 = options.tol / T::lit(3.0);

    let mut x = a + golden * (b - a);
    let mut w = x;
    let mut v = x;
    let mut fx = f.eval(x);
    let mut fw = fx;
    let mut fv = fx;
    // d: last step, e: the step before it
    let mut d = T::zero();
    let mut e = T::zero();

    for iter in 0..options.max_iter {
        let xm = half * (a + b);
        let tol1 = sqrt_eps * x.abs() + tol3;
        let tol2 = two * tol1;
        if (x - xm).abs() <= tol2 - half * (b - a) {
            tracing::debug!(iterations = iter, "fminbnd converged");
            return ScalarResult {
                x,
                fx,
                iterations: iter,
                converged: true,
            };
        }

        let mut parabolic = false;
        if e.abs() > tol1 {
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = two * (q - r);
            if q > T::zero() {
                p = -p;
            }
            q = q.abs();
            let etemp = e;
            e = d;
            if p.abs() < (half * q * etemp).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = if xm >= x { tol1 } else { -tol1 };
                }
                parabolic = true;
            }
        }
        if !parabolic {
            e = if x >= xm { a - x } else { b - x };
            d = golden * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else if d >= T::zero() {
            x + tol1
        } else {
            x - tol1
        };
        let fu = f.eval(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    tracing::warn!(max_iter = options.max_iter, "fminbnd did not converge");
    ScalarResult {
        x,
        fx,
        iterations: options.max_iter,
        converged: false,
    }
}

/// Minimize `f` along a ray: bracket from `[0, 1]`, then Brent.
pub(crate) fn line_min<T, F>(f: &F, options: &OptimalOptions<T>) -> Result<(T, T), OptimError>
where
    T: FloatScalar,
    F: Func1d<T> + ?Sized,
{
    let (a, b) = region(f, T::zero(), T::one())?;
    let r = fminbnd(f, a, b, options);
    Ok((r.x, r.fx))
}

/// Root of `f` by discrete Newton iteration.
///
/// Each step replaces the derivative with a forward difference of width
/// `options.secant_step`: `x ← x − h·f(x) / (f(x + h) − f(x))`. Stops when
/// the update is smaller than `options.tol` or `f(x)` is exactly zero.
///
/// # Errors
///
/// [`OptimError::NotFinite`] if an iterate stops being finite, e.g. when the
/// difference quotient vanishes on a flat stretch of `f`.
///
/// ```
/// use numcal::optim::{fzero, OptimalOptions};
///
/// let r = fzero(&|x: f64| x * x - 4.0, 2.5, &OptimalOptions::default()).unwrap();
/// assert!((r.x - 2.0).abs() < 1e-6);
/// ```
pub fn fzero<T, F>(f: &F, x0: T, options: &OptimalOptions<T>) -> Result<ScalarResult<T>, OptimError>
where
    T: FloatScalar,
    F: Func1d<T> + ?Sized,
{
    let h = options.secant_step;
    let mut x = x0;
    let mut fx = f.eval(x);
    for iter in 0..options.max_iter {
        if fx == T::zero() {
            return Ok(ScalarResult {
                x,
                fx,
                iterations: iter,
                converged: true,
            });
        }
        let step = h * fx / (f.eval(x + h) - fx);
        x = x - step;
        if !x.is_finite() {
            return Err(OptimError::NotFinite);
        }
        fx = f.eval(x);
        if step.abs() < options.tol {
            tracing::debug!(iterations = iter + 1, "fzero converged");
            return Ok(ScalarResult {
                x,
                fx,
                iterations: iter + 1,
                converged: true,
            });
        }
    }
    tracing::warn!(max_iter = options.max_iter, "fzero did not converge");
    Ok(ScalarResult {
        x,
        fx,
        iterations: options.max_iter,
        converged: false,
    })
}
