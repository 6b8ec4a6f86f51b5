use crate::traits::FloatScalar;

/// Butcher tableau of an explicit `K`-stage Runge-Kutta method.
///
/// Only the strictly lower triangle of `a` is read, so any upper entries
/// are ignored. Order conditions are not checked; a tableau whose `b` does
/// not sum to one integrates the wrong equation without complaint.
///
/// ```
/// use numcal::ode::Tableau;
///
/// // Ralston's second-order method
/// let ralston = Tableau::new(
///     [0.0_f64, 2.0 / 3.0],
///     [0.25, 0.75],
///     [[0.0, 0.0], [2.0 / 3.0, 0.0]],
/// );
/// assert_eq!(ralston.stages(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tableau<T, const K: usize> {
    /// Stage time offsets, as fractions of the step.
    pub c: [T; K],
    /// Output weights.
    pub b: [T; K],
    /// Stage coupling, `a[i][j]` for `j < i`.
    pub a: [[T; K]; K],
}

impl<T: FloatScalar, const K: usize> Tableau<T, K> {
    pub fn new(c: [T; K], b: [T; K], a: [[T; K]; K]) -> Self {
        Self { c, b, a }
    }

    pub fn stages(&self) -> usize {
        K
    }
}

impl<T: FloatScalar> Tableau<T, 2> {
    /// Explicit midpoint rule, second order.
    pub fn midpoint() -> Self {
        let z = T::zero();
        let half = T::lit(0.5);
        Self::new([z, half], [z, T::one()], [[z, z], [half, z]])
    }
}

impl<T: FloatScalar> Tableau<T, 3> {
    /// Kutta's third-order method.
    pub fn kutta3() -> Self {
        let z = T::zero();
        let half = T::lit(0.5);
        let sixth = T::lit(1.0 / 6.0);
        Self::new(
            [z, half, T::one()],
            [sixth, T::lit(2.0 / 3.0), sixth],
            [[z, z, z], [half, z, z], [-T::one(), T::lit(2.0), z]],
        )
    }
}

impl<T: FloatScalar> Tableau<T, 4> {
    /// The classical fourth-order method.
    pub fn classic4() -> Self {
        let z = T::zero();
        let half = T::lit(0.5);
        let sixth = T::lit(1.0 / 6.0);
        let third = T::lit(1.0 / 3.0);
        Self::new(
            [z, half, half, T::one()],
            [sixth, third, third, sixth],
            [
                [z, z, z, z],
                [half, z, z, z],
                [z, half, z, z],
                [z, z, T::one(), z],
            ],
        )
    }
}
