use alloc::vec::Vec;

use crate::traits::{FloatScalar, Func1d};

use super::{check_samples, InterpError};

/// Newton divided-difference interpolant.
///
/// Row `i` of the table holds the `i + 1` divided differences ending at node
/// `i`; the diagonal entries are the Newton-form coefficients. Appending a
/// node computes one new row from the previous one and leaves every existing
/// entry untouched. Nodes need not be sorted but must be distinct.
#[derive(Debug, Clone)]
pub struct Interpolator<T> {
    xs: Vec<T>,
    table: Vec<Vec<T>>,
}

impl<T: FloatScalar> Interpolator<T> {
    /// Interpolant through `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// [`InterpError::Empty`], [`InterpError::LengthMismatch`], or
    /// [`InterpError::DuplicateNode`] if two `xs` coincide.
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpError> {
        check_samples(xs, ys)?;
        let mut interp = Self {
            xs: Vec::with_capacity(xs.len()),
            table: Vec::with_capacity(xs.len()),
        };
        for (&x, &y) in xs.iter().zip(ys) {
            interp.push(x, y)?;
        }
        Ok(interp)
    }

    /// Append a node. Chainable:
    ///
    /// ```
    /// use numcal::interp::Interpolator;
    ///
    /// let mut sq = Interpolator::new(&[1.0_f64, 2.0], &[1.0, 4.0]).unwrap();
    /// sq.add(3.0, 9.0)?.add(4.0, 16.0)?;
    /// assert!((sq.eval(1.5) - 2.25).abs() < 1e-12);
    /// # Ok::<(), numcal::interp::InterpError>(())
    /// ```
    pub fn add(&mut self, x: T, y: T) -> Result<&mut Self, InterpError> {
        self.push(x, y)?;
        Ok(self)
    }

    fn push(&mut self, x: T, y: T) -> Result<(), InterpError> {
        if self.xs.iter().any(|&xi| xi == x) {
            return Err(InterpError::DuplicateNode);
        }
        let n = self.xs.len();
        let mut row = Vec::with_capacity(n + 1);
        row.push(y);
        if let Some(prev) = self.table.last() {
            for k in 1..=n {
                let d = (row[k - 1] - prev[k - 1]) / (x - self.xs[n - k]);
                row.push(d);
            }
        }
        self.xs.push(x);
        self.table.push(row);
        Ok(())
    }

    /// Evaluate the Newton form `Σ f[x₀..xᵢ] · Π_{j<i} (x − xⱼ)`.
    pub fn eval(&self, x: T) -> T {
        let mut y = T::zero();
        let mut prod = T::one();
        for (i, (&xi, row)) in self.xs.iter().zip(&self.table).enumerate() {
            y = y + row[i] * prod;
            prod = prod * (x - xi);
        }
        y
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Node abscissae in insertion order.
    pub fn nodes(&self) -> &[T] {
        &self.xs
    }

    /// Newton-form coefficients `f[x₀], f[x₀,x₁], …`.
    pub fn coefficients(&self) -> impl Iterator<Item = T> + '_ {
        self.table.iter().enumerate().map(|(i, row)| row[i])
    }
}

impl<T: FloatScalar> Func1d<T> for Interpolator<T> {
    #[inline]
    fn eval(&self, x: T) -> T {
        Interpolator::eval(self, x)
    }
}
