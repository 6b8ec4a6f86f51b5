use core::fmt::Debug;
use num_traits::{Float, Num, NumCast, One, Zero};

use crate::matrix::vector::Vector;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Real floating-point element type (`f32`, `f64`).
///
/// Everything past plain matrix arithmetic (decompositions, norms, solvers,
/// filters) is bounded on this trait.
pub trait FloatScalar: Scalar + Float {
    /// Convert an `f64` constant into `Self`.
    ///
    /// Exact for `f64`, rounded for `f32`.
    #[inline]
    fn lit(v: f64) -> Self {
        <Self as NumCast>::from(v).unwrap_or_else(Self::nan)
    }
}

impl<T: Scalar + Float> FloatScalar for T {}

// ── Function capabilities ───────────────────────────────────────────
//
// Solvers take their callbacks through these traits. Closures and `fn`
// items with the matching signature implement them automatically; any
// other type (a model struct, a list of scalar functions) can opt in.

/// Scalar function of one variable, `f: T → T`.
pub trait Func1d<T> {
    fn eval(&self, x: T) -> T;
}

impl<T, F> Func1d<T> for F
where
    F: Fn(T) -> T,
{
    #[inline]
    fn eval(&self, x: T) -> T {
        self(x)
    }
}

/// Scalar function of a vector, `f: Tⁿ → T`.
///
/// ```
/// use numcal::{FuncNd, Vector};
///
/// let f = |x: &Vector<f64, 2>| x[0] * x[1];
/// assert_eq!(f.eval(&Vector::from_array([2.0, 3.0])), 6.0);
/// ```
pub trait FuncNd<T, const N: usize> {
    fn eval(&self, x: &Vector<T, N>) -> T;
}

impl<T, F, const N: usize> FuncNd<T, N> for F
where
    F: Fn(&Vector<T, N>) -> T,
{
    #[inline]
    fn eval(&self, x: &Vector<T, N>) -> T {
        self(x)
    }
}

/// Vector function of a vector, `f: Tⁿ → Tᵐ`.
///
/// `eval_row` returns a single output component. The default evaluates the
/// whole function; implementors that can produce one row cheaply (such as a
/// list of independent scalar functions) should override it.
pub trait FuncNds<T: Scalar, const N: usize, const M: usize> {
    fn eval(&self, x: &Vector<T, N>) -> Vector<T, M>;

    #[inline]
    fn eval_row(&self, x: &Vector<T, N>, i: usize) -> T {
        self.eval(x)[i]
    }
}

impl<T, F, const N: usize, const M: usize> FuncNds<T, N, M> for F
where
    T: Scalar,
    F: Fn(&Vector<T, N>) -> Vector<T, M>,
{
    #[inline]
    fn eval(&self, x: &Vector<T, N>) -> Vector<T, M> {
        self(x)
    }
}

/// One first-order differential equation `ẋᵢ = f(t, x)`.
///
/// The state vector holds every component of the coupled system; the
/// function returns the derivative of a single component.
pub trait Ode<T, const S: usize> {
    fn eval(&self, t: T, x: &Vector<T, S>) -> T;
}

impl<T, F, const S: usize> Ode<T, S> for F
where
    F: Fn(T, &Vector<T, S>) -> T,
{
    #[inline]
    fn eval(&self, t: T, x: &Vector<T, S>) -> T {
        self(t, x)
    }
}
