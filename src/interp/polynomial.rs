use alloc::vec::Vec;

use crate::traits::{FloatScalar, Func1d};

/// Polynomial `a₀ + a₁x + … + aₙxⁿ`.
///
/// ```
/// use numcal::interp::Polynomial;
///
/// let p = Polynomial::new(vec![1.0_f64, 2.0, 3.0]); // 1 + 2x + 3x²
/// assert_eq!(p.eval(2.0), 17.0);
/// assert_eq!(p.derivative().eval(2.0), 14.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<T> {
    coeffs: Vec<T>,
}

impl<T: FloatScalar> Polynomial<T> {
    /// Coefficients in ascending power order.
    pub fn new(coeffs: impl Into<Vec<T>>) -> Self {
        Self {
            coeffs: coeffs.into(),
        }
    }

    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Highest power carried (trailing zero coefficients included).
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Horner evaluation. An empty polynomial is identically zero.
    pub fn eval(&self, x: T) -> T {
        self.coeffs
            .iter()
            .rev()
            .fold(T::zero(), |acc, &a| acc * x + a)
    }

    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, &a)| a * T::lit(k as f64))
            .collect();
        Self { coeffs }
    }
}

impl<T: FloatScalar> Func1d<T> for Polynomial<T> {
    #[inline]
    fn eval(&self, x: T) -> T {
        Polynomial::eval(self, x)
    }
}
