use crate::matrix::vector::Vector;
use crate::traits::{Ode, Scalar};

/// Right-hand side `ẋ = f(t, x)` of a first-order system of `S` equations.
///
/// Implemented by every `Fn(T, &Vector<T, S>) -> Vector<T, S>` and by
/// [`Odes`].
pub trait OdeSystem<T, const S: usize> {
    fn eval(&self, t: T, x: &Vector<T, S>) -> Vector<T, S>;
}

impl<T, F, const S: usize> OdeSystem<T, S> for F
where
    F: Fn(T, &Vector<T, S>) -> Vector<T, S>,
{
    #[inline]
    fn eval(&self, t: T, x: &Vector<T, S>) -> Vector<T, S> {
        self(t, x)
    }
}

/// A coupled system assembled from one scalar [`Ode`] per state component.
///
/// ```
/// use numcal::ode::{Odes, OdeSystem};
/// use numcal::{Ode, Vector};
///
/// // Harmonic oscillator: ẋ₀ = x₁, ẋ₁ = −x₀
/// let pos = |_t: f64, x: &Vector<f64, 2>| x[1];
/// let vel = |_t: f64, x: &Vector<f64, 2>| -x[0];
/// let sys = Odes([&pos as &dyn Ode<f64, 2>, &vel]);
/// let dx = sys.eval(0.0, &Vector::from_array([1.0, 0.0]));
/// assert_eq!(dx.to_array(), [0.0, -1.0]);
/// ```
pub struct Odes<'a, T, const S: usize>(pub [&'a dyn Ode<T, S>; S]);

impl<T: Scalar, const S: usize> OdeSystem<T, S> for Odes<'_, T, S> {
    fn eval(&self, t: T, x: &Vector<T, S>) -> Vector<T, S> {
        Vector::from_array(core::array::from_fn(|i| self.0[i].eval(t, x)))
    }
}
