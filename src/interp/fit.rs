use crate::linalg::LinalgError;
use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, Func1d};
use crate::Matrix;

use super::{check_samples, InterpError};

/// Set of monomial exponents selecting the terms of a fit.
///
/// `Basis::new([0, 2])` fits `c₀ + c₁x²`. Exponents must be strictly
/// increasing, which also rules out repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Basis<const K: usize> {
    exps: [u32; K],
}

impl<const K: usize> Basis<K> {
    pub fn new(exps: [u32; K]) -> Result<Self, InterpError> {
        if K == 0 || exps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(InterpError::InvalidBasis);
        }
        Ok(Self { exps })
    }

    /// Every power from `0` to `K - 1`, i.e. a full polynomial of degree `K - 1`.
    pub fn dense() -> Self {
        Self {
            exps: core::array::from_fn(|i| i as u32),
        }
    }

    pub fn exponents(&self) -> &[u32; K] {
        &self.exps
    }
}

impl Basis<2> {
    /// `c₀ + c₁x`
    pub fn linear() -> Self {
        Self { exps: [0, 1] }
    }
}

impl Basis<3> {
    /// `c₀ + c₁x + c₂x²`
    pub fn quadratic() -> Self {
        Self { exps: [0, 1, 2] }
    }
}

/// Least-squares fit of `y ≈ Σ cₖ · x^eₖ` over a [`Basis`].
///
/// The Gram matrix `AᵀA` and right-hand side `Aᵀy` are accumulated sample by
/// sample and solved with Cholesky, so [`add`](CurveFitter::add) is O(K²) and
/// samples are not retained.
///
/// ```
/// use numcal::interp::{Basis, CurveFitter};
///
/// let fit = CurveFitter::new(
///     &[1.0_f64, 2.0, 3.0, 4.0],
///     &[0.0, 2.0, 1.0, 3.0],
///     Basis::new([0, 1]).unwrap(),
/// ).unwrap();
/// assert!((fit.coeffs()[0] + 0.5).abs() < 1e-12); // intercept
/// assert!((fit.coeffs()[1] - 0.8).abs() < 1e-12); // slope
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurveFitter<T, const K: usize> {
    basis: Basis<K>,
    gram: Matrix<T, K, K>,
    rhs: Vector<T, K>,
    samples: usize,
    coeffs: [T; K],
}

impl<T: FloatScalar, const K: usize> CurveFitter<T, K> {
    /// Fit the samples `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// [`InterpError::Empty`] / [`InterpError::LengthMismatch`] for malformed
    /// input, [`InterpError::TooFewSamples`] when `xs.len() < K`, and
    /// [`InterpError::Singular`] when the samples cannot separate the basis
    /// terms (for example repeated abscissae).
    pub fn new(xs: &[T], ys: &[T], basis: Basis<K>) -> Result<Self, InterpError> {
        check_samples(xs, ys)?;
        if xs.len() < K {
            return Err(InterpError::TooFewSamples);
        }
        let mut fit = Self {
            basis,
            gram: Matrix::zeros(),
            rhs: Vector::zeros(),
            samples: 0,
            coeffs: [T::zero(); K],
        };
        for (&x, &y) in xs.iter().zip(ys) {
            fit.accumulate(x, y);
        }
        fit.coeffs = fit.solve()?;
        Ok(fit)
    }

    fn terms(&self, x: T) -> Vector<T, K> {
        Vector::from_array(self.basis.exps.map(|e| x.powi(e as i32)))
    }

    fn accumulate(&mut self, x: T, y: T) {
        let phi = self.terms(x);
        self.gram = self.gram + phi.outer(&phi);
        self.rhs = self.rhs + phi * y;
        self.samples += 1;
    }

    fn solve(&self) -> Result<[T; K], InterpError> {
        let chol = self.gram.cholesky().map_err(|_: LinalgError| InterpError::Singular)?;
        Ok(chol.solve(&self.rhs).to_array())
    }

    /// Add one sample and refit. On failure the fitter is left unchanged.
    pub fn add(&mut self, x: T, y: T) -> Result<&mut Self, InterpError> {
        let mut next = *self;
        next.accumulate(x, y);
        next.coeffs = next.solve()?;
        *self = next;
        Ok(self)
    }

    /// Fitted coefficients, one per basis exponent.
    pub fn coeffs(&self) -> &[T; K] {
        &self.coeffs
    }

    pub fn basis(&self) -> &Basis<K> {
        &self.basis
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn eval(&self, x: T) -> T {
        self.terms(x).dot(&Vector::from_array(self.coeffs))
    }
}

impl<T: FloatScalar, const K: usize> Func1d<T> for CurveFitter<T, K> {
    #[inline]
    fn eval(&self, x: T) -> T {
        CurveFitter::eval(self, x)
    }
}
