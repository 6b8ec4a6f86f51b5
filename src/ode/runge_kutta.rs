#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;

use super::{OdeError, OdeSystem, Tableau};

/// One explicit Runge-Kutta step of size `h` from `(t, x)`.
fn advance<T, F, const S: usize, const K: usize>(
    system: &F,
    tableau: &Tableau<T, K>,
    t: T,
    x: &Vector<T, S>,
    h: T,
) -> Vector<T, S>
where
    T: FloatScalar,
    F: OdeSystem<T, S>,
{
    let mut k = [Vector::<T, S>::zeros(); K];
    for i in 0..K {
        let mut xi = *x;
        for j in 0..i {
            xi = xi + k[j] * (h * tableau.a[i][j]);
        }
        k[i] = system.eval(t + tableau.c[i] * h, &xi);
    }
    let mut slope = Vector::<T, S>::zeros();
    for i in 0..K {
        slope = slope + k[i] * tableau.b[i];
    }
    *x + slope * h
}

/// Fixed-step explicit Runge-Kutta integrator for `S` coupled equations.
///
/// The stepping algorithm is the same for every method; only the
/// [`Tableau`] changes. [`rk2`](RungeKutta::rk2), [`rk3`](RungeKutta::rk3)
/// and [`rk4`](RungeKutta::rk4) build the usual presets.
///
/// ```
/// use numcal::ode::RungeKutta;
/// use numcal::Vector;
///
/// // ẋ = −2x − 2, x(0) = 0  ⇒  x(t) = e^(−2t) − 1
/// let mut rk = RungeKutta::rk4(|_t: f64, x: &Vector<f64, 1>| Vector::from_array([-2.0 * x[0] - 2.0]));
/// rk.init(0.0, &Vector::from_array([0.0]));
/// let xs = rk.solve(0.01, 100).unwrap();
/// assert_eq!(xs.len(), 101);
/// assert!((xs[100][0] - ((-2.0_f64).exp() - 1.0)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct RungeKutta<T, F, const S: usize, const K: usize> {
    system: F,
    tableau: Tableau<T, K>,
    t: T,
    x: Vector<T, S>,
    initialized: bool,
}

impl<T, F, const S: usize, const K: usize> RungeKutta<T, F, S, K>
where
    T: FloatScalar,
    F: OdeSystem<T, S>,
{
    pub fn new(system: F, tableau: Tableau<T, K>) -> Self {
        Self {
            system,
            tableau,
            t: T::zero(),
            x: Vector::zeros(),
            initialized: false,
        }
    }

    /// Set the current time and state, discarding any previous progress.
    pub fn init(&mut self, t0: T, x0: &Vector<T, S>) {
        self.t = t0;
        self.x = *x0;
        self.initialized = true;
    }

    fn check_init(&self) -> Result<(), OdeError> {
        if self.initialized {
            Ok(())
        } else {
            Err(OdeError::NotInitialized)
        }
    }

    /// Advance one step of size `h` and return the new state.
    pub fn step(&mut self, h: T) -> Result<&Vector<T, S>, OdeError> {
        self.check_init()?;
        self.x = advance(&self.system, &self.tableau, self.t, &self.x, h);
        self.t = self.t + h;
        Ok(&self.x)
    }

    pub fn time(&self) -> T {
        self.t
    }

    pub fn state(&self) -> &Vector<T, S> {
        &self.x
    }

    pub fn tableau(&self) -> &Tableau<T, K> {
        &self.tableau
    }

    /// Integrate `n` steps of size `h` from the current state.
    ///
    /// Returns `n + 1` states, the current one first. The integrator itself
    /// is left where it was, so repeated calls return the same trajectory.
    #[cfg(feature = "alloc")]
    pub fn solve(&self, h: T, n: usize) -> Result<Vec<Vector<T, S>>, OdeError> {
        self.check_init()?;
        let mut out = Vec::with_capacity(n + 1);
        let mut t = self.t;
        let mut x = self.x;
        out.push(x);
        for _ in 0..n {
            x = advance(&self.system, &self.tableau, t, &x, h);
            t = t + h;
            out.push(x);
        }
        Ok(out)
    }

    /// Lazily step `n` times, yielding each new state.
    ///
    /// The iterator drives this integrator, so the sequence is single-pass:
    /// once consumed, [`time`](Self::time) and [`state`](Self::state) sit at
    /// the last yielded point. Call [`init`](Self::init) to start over.
    ///
    /// ```
    /// use numcal::ode::RungeKutta;
    /// use numcal::Vector;
    ///
    /// let mut rk = RungeKutta::rk2(|_t: f64, _x: &Vector<f64, 1>| Vector::fill(1.0));
    /// rk.init(0.0, &Vector::from_array([0.0]));
    /// let last = rk.generate(0.5, 4).unwrap().last().unwrap();
    /// assert!((last[0] - 2.0).abs() < 1e-12);
    /// assert!((rk.time() - 2.0).abs() < 1e-12);
    /// ```
    pub fn generate(&mut self, h: T, n: usize) -> Result<Trajectory<'_, T, F, S, K>, OdeError> {
        self.check_init()?;
        Ok(Trajectory {
            rk: self,
            h,
            remaining: n,
        })
    }
}

impl<T: FloatScalar, F: OdeSystem<T, S>, const S: usize> RungeKutta<T, F, S, 2> {
    /// Second order, explicit midpoint rule.
    pub fn rk2(system: F) -> Self {
        Self::new(system, Tableau::midpoint())
    }
}

impl<T: FloatScalar, F: OdeSystem<T, S>, const S: usize> RungeKutta<T, F, S, 3> {
    /// Third order, Kutta's method.
    pub fn rk3(system: F) -> Self {
        Self::new(system, Tableau::kutta3())
    }
}

impl<T: FloatScalar, F: OdeSystem<T, S>, const S: usize> RungeKutta<T, F, S, 4> {
    /// Fourth order, the classical method.
    pub fn rk4(system: F) -> Self {
        Self::new(system, Tableau::classic4())
    }
}

/// Single-pass iterator over integrator states, from
/// [`RungeKutta::generate`].
pub struct Trajectory<'a, T, F, const S: usize, const K: usize> {
    rk: &'a mut RungeKutta<T, F, S, K>,
    h: T,
    remaining: usize,
}

impl<T, F, const S: usize, const K: usize> Iterator for Trajectory<'_, T, F, S, K>
where
    T: FloatScalar,
    F: OdeSystem<T, S>,
{
    type Item = Vector<T, S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rk = &mut *self.rk;
        rk.x = advance(&rk.system, &rk.tableau, rk.t, &rk.x, self.h);
        rk.t = rk.t + self.h;
        Some(rk.x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, F, const S: usize, const K: usize> ExactSizeIterator for Trajectory<'_, T, F, S, K>
where
    T: FloatScalar,
    F: OdeSystem<T, S>,
{
}

impl<T, F, const S: usize, const K: usize> FusedIterator for Trajectory<'_, T, F, S, K>
where
    T: FloatScalar,
    F: OdeSystem<T, S>,
{
}
