use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, FuncNd};

use super::diff::grad;
use super::search::line_min;
use super::{FminMode, MinResult, OptimError, OptimalOptions};

/// Unconstrained local minimization of `f: Tⁿ → T`.
///
/// Dispatches on `options.fmin_mode`:
///
/// - [`FminMode::ConjGrad`]: Polak–Ribière conjugate gradient. Gradients
///   come from [`grad`](super::grad) with step `dx`; each direction is
///   searched with [`region`](super::region) + [`fminbnd`](super::fminbnd).
///   Stops when `‖∇f‖ < tol`. The direction resets to steepest descent
///   whenever it stops being a descent direction, or when the line search
///   makes no progress along it. A stall along steepest descent ends the
///   run with `converged == false`.
/// - [`FminMode::Simplex`]: Nelder–Mead. The initial simplex offsets `x0`
///   by `100·dx` along each axis. Stops when every vertex lies within `tol`
///   of the best one, in both objective value and position.
///
/// The best point found is returned even when the budget runs out
/// (`converged == false`). Only a local minimum is sought.
///
/// # Errors
///
/// [`OptimError::BracketNotFound`] (conjugate gradient only) if the
/// objective decreases without bound along a search direction, and
/// [`OptimError::NotFinite`] if it evaluates to NaN there.
///
/// ```
/// use numcal::optim::{fminunc, FminMode, OptimalOptions};
/// use numcal::Vector;
///
/// let rosenbrock = |x: &Vector<f64, 2>| {
///     100.0 * (x[1] - x[0] * x[0]).powi(2) + (1.0 - x[0]).powi(2)
/// };
/// let opts = OptimalOptions { fmin_mode: FminMode::Simplex, ..OptimalOptions::default() };
/// let r = fminunc(&rosenbrock, &Vector::from_array([1.0, -2.0]), &opts).unwrap();
/// assert!(r.converged);
/// assert!((r.x[0] - 1.0).abs() < 1e-3 && (r.x[1] - 1.0).abs() < 1e-3);
/// ```
pub fn fminunc<T, F, const N: usize>(
    f: &F,
    x0: &Vector<T, N>,
    options: &OptimalOptions<T>,
) -> Result<MinResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
{
    let gradient = |x: &Vector<T, N>| grad(f, x, options);
    let result = unconstrained(f, &gradient, x0, options)?;
    if result.converged {
        tracing::debug!(
            mode = ?options.fmin_mode,
            iterations = result.iterations,
            fx = ?result.fx,
            "fminunc converged"
        );
    } else {
        tracing::warn!(
            mode = ?options.fmin_mode,
            iterations = result.iterations,
            "fminunc did not converge"
        );
    }
    Ok(result)
}

/// [`fminunc`] without logging, with the conjugate-gradient path driven by
/// `gradient` instead of differencing `f` directly.
pub(super) fn unconstrained<T, F, G, const N: usize>(
    f: &F,
    gradient: &G,
    x0: &Vector<T, N>,
    options: &OptimalOptions<T>,
) -> Result<MinResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
    G: Fn(&Vector<T, N>) -> Vector<T, N>,
{
    match options.fmin_mode {
        FminMode::ConjGrad => conj_grad(f, gradient, x0, options),
        FminMode::Simplex => Ok(nelder_mead(f, x0, options)),
    }
}

fn conj_grad<T, F, G, const N: usize>(
    f: &F,
    gradient: &G,
    x0: &Vector<T, N>,
    options: &OptimalOptions<T>,
) -> Result<MinResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
    G: Fn(&Vector<T, N>) -> Vector<T, N>,
{
    let mut x = *x0;
    let mut fx = f.eval(&x);
    let mut g = gradient(&x);
    let mut s = -g;
    let mut steepest = true;

    for iter in 0..options.max_iter {
        if g.norm() < options.tol {
            return Ok(MinResult {
                x,
                fx,
                iterations: iter,
                converged: true,
            });
        }

        let phi = |alpha: T| f.eval(&(x + s * alpha));
        let (alpha, f_next) = line_min(&phi, options)?;
        let step = s * alpha;

        // No representable progress along s
        if step.norm() <= T::epsilon() * (T::one() + (x + step).norm()) && f_next >= fx {
            if steepest {
                tracing::debug!(
                    iterations = iter + 1,
                    gradient_norm = ?g.norm(),
                    "conjugate gradient stalled"
                );
                return Ok(MinResult {
                    x,
                    fx,
                    iterations: iter + 1,
                    converged: false,
                });
            }
            s = -g;
            steepest = true;
            continue;
        }
        x = x + step;
        fx = f_next;

        let g_next = gradient(&x);
        let beta = ((g_next.dot(&g_next) - g_next.dot(&g)) / g.dot(&g)).max(T::zero());
        s = s * beta - g_next;
        steepest = beta == T::zero();
        if s.dot(&g_next) >= T::zero() {
            s = -g_next;
            steepest = true;
        }
        g = g_next;
    }

    Ok(MinResult {
        x,
        fx,
        iterations: options.max_iter,
        converged: false,
    })
}

#[derive(Clone, Copy)]
struct Vertex<T, const N: usize> {
    x: Vector<T, N>,
    f: T,
}

/// `N + 1` vertices, kept sorted by objective value. The best vertex lives
/// apart from the rest since `[_; N + 1]` is not expressible here.
struct Simplex<T, const N: usize> {
    best: Vertex<T, N>,
    rest: [Vertex<T, N>; N],
}

impl<T: FloatScalar, const N: usize> Simplex<T, N> {
    fn get(&self, i: usize) -> &Vertex<T, N> {
        if i == 0 {
            &self.best
        } else {
            &self.rest[i - 1]
        }
    }

    fn set(&mut self, i: usize, v: Vertex<T, N>) {
        if i == 0 {
            self.best = v;
        } else {
            self.rest[i - 1] = v;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        match (i, j) {
            (0, j) => core::mem::swap(&mut self.best, &mut self.rest[j - 1]),
            (i, 0) => core::mem::swap(&mut self.best, &mut self.rest[i - 1]),
            (i, j) => self.rest.swap(i - 1, j - 1),
        }
    }

    /// Stable insertion sort; equal values keep their order.
    fn sort(&mut self) {
        for i in 1..=N {
            let mut j = i;
            while j > 0 && self.get(j).f < self.get(j - 1).f {
                self.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    fn worst(&self) -> &Vertex<T, N> {
        self.get(N)
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vector<T, N> {
        let mut c = self.best.x;
        for v in &self.rest[..N - 1] {
            c = c + v.x;
        }
        c / T::lit(N as f64)
    }

    fn collapsed(&self, tol: T) -> bool {
        self.rest.iter().all(|v| {
            (v.f - self.best.f).abs() <= tol && (v.x - self.best.x).norm_inf() <= tol
        })
    }
}

fn nelder_mead<T, F, const N: usize>(
    f: &F,
    x0: &Vector<T, N>,
    options: &OptimalOptions<T>,
) -> MinResult<T, N>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
{
    let vertex = |x: Vector<T, N>| Vertex { x, f: f.eval(&x) };
    let edge = options.dx * T::lit(100.0);
    let half = T::lit(0.5);
    let two = T::lit(2.0);
    let three = T::lit(3.0);

    let mut simplex = Simplex {
        best: vertex(*x0),
        rest: core::array::from_fn(|i| {
            let mut x = *x0;
            x[i] = x[i] + edge;
            vertex(x)
        }),
    };

    for iter in 0..options.max_iter {
        simplex.sort();
        if N == 0 || simplex.collapsed(options.tol) {
            return MinResult {
                x: simplex.best.x,
                fx: simplex.best.f,
                iterations: iter,
                converged: true,
            };
        }

        let xb = simplex.centroid();
        let worst = *simplex.worst();
        let reflected = vertex(xb * two - worst.x);

        if reflected.f < simplex.best.f {
            let expanded = vertex(xb * three - worst.x * two);
            let keep = if expanded.f < reflected.f { expanded } else { reflected };
            simplex.set(N, keep);
        } else if reflected.f < simplex.get(N - 1).f {
            simplex.set(N, reflected);
        } else {
            let contracted = if reflected.f < worst.f {
                let c = vertex(xb + (reflected.x - xb) * half);
                (c.f <= reflected.f).then_some(c)
            } else {
                let c = vertex(xb + (worst.x - xb) * half);
                (c.f < worst.f).then_some(c)
            };
            match contracted {
                Some(c) => simplex.set(N, c),
                None => {
                    let best = simplex.best.x;
                    for v in simplex.rest.iter_mut() {
                        *v = vertex(best + (v.x - best) * half);
                    }
                }
            }
        }
    }

    simplex.sort();
    MinResult {
        x: simplex.best.x,
        fx: simplex.best.f,
        iterations: options.max_iter,
        converged: false,
    }
}
