use core::ops::{Add, Mul, Sub};

use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, Func1d, FuncNd, FuncNds};
use crate::Matrix;

use super::{DiffMode, OptimalOptions};

/// Base step of [`derivative`].
const DERIVATIVE_STEP: f64 = 1e-3;

/// Combine central-difference quotients `d(h)` according to `mode`.
///
/// Ridders evaluates `d` at `2h`, `h` and `h/2` and cancels the `h²` and
/// `h⁴` error terms by Richardson extrapolation.
fn extrapolate<T, V>(d: impl Fn(T) -> V, h: T, mode: DiffMode) -> V
where
    T: FloatScalar,
    V: Copy + Add<Output = V> + Sub<Output = V> + Mul<T, Output = V>,
{
    match mode {
        DiffMode::Central => d(h),
        DiffMode::Ridders => {
            let two = T::lit(2.0);
            let four = T::lit(4.0);
            let third = T::one() / T::lit(3.0);
            let d1 = d(h * two);
            let d2 = d(h);
            let d3 = d(h / two);
            let r1 = (d2 * four - d1) * third;
            let r2 = (d3 * four - d2) * third;
            (r2 * T::lit(16.0) - r1) * (T::one() / T::lit(15.0))
        }
    }
}

/// Numeric derivative `f'(x)`.
///
/// [`DiffMode::Central`] uses a single central difference with `h = 1e-3`.
/// [`DiffMode::Ridders`] evaluates central differences at `2h`, `h` and
/// `h/2` and removes the `h²` and `h⁴` error terms by Richardson
/// extrapolation, for three times the evaluations.
///
/// ```
/// use numcal::optim::{derivative, DiffMode, OptimalOptions};
///
/// let f = |x: f64| x.powi(7) - x.powi(5);
/// let opts = OptimalOptions { diff_mode: DiffMode::Ridders, ..OptimalOptions::default() };
/// assert!((derivative(&f, 1.0, &opts) - 2.0).abs() < 1e-10);
/// ```
pub fn derivative<T, F>(f: &F, x: T, options: &OptimalOptions<T>) -> T
where
    T: FloatScalar,
    F: Func1d<T> + ?Sized,
{
    let central = |h: T| (f.eval(x + h) - f.eval(x - h)) / (h + h);
    extrapolate(central, T::lit(DERIVATIVE_STEP), options.diff_mode)
}

/// Gradient of `f: Tⁿ → T` by differences along each axis with step
/// `options.dx`, refined per component when `diff_mode` is
/// [`DiffMode::Ridders`].
///
/// Costs `2N` evaluations, `6N` with Ridders.
pub fn grad<T, F, const N: usize>(f: &F, x: &Vector<T, N>, options: &OptimalOptions<T>) -> Vector<T, N>
where
    T: FloatScalar,
    F: FuncNd<T, N> + ?Sized,
{
    let mut g = Vector::<T, N>::zeros();
    for j in 0..N {
        let central = |h: T| {
            let mut xp = *x;
            let mut xm = *x;
            xp[j] = xp[j] + h;
            xm[j] = xm[j] - h;
            (f.eval(&xp) - f.eval(&xm)) / (h + h)
        };
        g[j] = extrapolate(central, options.dx, options.diff_mode);
    }
    g
}

/// Jacobian of `f: Tⁿ → Tᵐ`, `J[(i, j)] = ∂fᵢ/∂xⱼ`, one column per axis
/// with the same differencing as [`grad`].
///
/// ```
/// use numcal::optim::{jacobian, OptimalOptions};
/// use numcal::Vector;
///
/// // f(x) = [x0², x0·x1]
/// let f = |x: &Vector<f64, 2>| Vector::from_array([x[0] * x[0], x[0] * x[1]]);
/// let j = jacobian(&f, &Vector::from_array([3.0, 4.0]), &OptimalOptions::default());
/// assert!((j[(0, 0)] - 6.0).abs() < 1e-9);
/// assert!((j[(1, 0)] - 4.0).abs() < 1e-9);
/// assert!((j[(1, 1)] - 3.0).abs() < 1e-9);
/// ```
pub fn jacobian<T, F, const N: usize, const M: usize>(
    f: &F,
    x: &Vector<T, N>,
    options: &OptimalOptions<T>,
) -> Matrix<T, M, N>
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let mut jac = Matrix::<T, M, N>::zeros();
    for j in 0..N {
        let central = |h: T| {
            let mut xp = *x;
            let mut xm = *x;
            xp[j] = xp[j] + h;
            xm[j] = xm[j] - h;
            (f.eval(&xp) - f.eval(&xm)) * (T::one() / (h + h))
        };
        jac.set_col(j, &extrapolate(central, options.dx, options.diff_mode));
    }
    jac
}

/// Gradient of a single residual row, `∂rᵢ/∂x`, via [`FuncNds::eval_row`].
pub(crate) fn row_gradient<T, F, const N: usize, const M: usize>(
    f: &F,
    x: &Vector<T, N>,
    i: usize,
    options: &OptimalOptions<T>,
) -> Vector<T, N>
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    let mut g = Vector::<T, N>::zeros();
    for j in 0..N {
        let central = |h: T| {
            let mut xp = *x;
            let mut xm = *x;
            xp[j] = xp[j] + h;
            xm[j] = xm[j] - h;
            (f.eval_row(&xp, i) - f.eval_row(&xm, i)) / (h + h)
        };
        g[j] = extrapolate(central, options.dx, options.diff_mode);
    }
    g
}
