//! Interpolation and curve fitting.
//!
//! - [`Polynomial`]: explicit coefficients, Horner evaluation.
//! - [`Interpolator`]: Newton divided-difference interpolation through
//!   every node; nodes can be appended one at a time in O(n).
//! - [`CurveFitter`]: least-squares fit over an explicit monomial
//!   [`Basis`], accumulated as normal equations so samples can be appended.
//!
//! All three implement [`Func1d`](crate::Func1d), so they can be handed
//! straight to the scalar search routines in [`optim`](crate::optim).
//!
//! # Examples
//!
//! ```
//! use numcal::interp::Interpolator;
//!
//! let mut f = Interpolator::new(&[1.0_f64, 2.0, 3.0], &[0.0, 1.0, 0.0]).unwrap();
//! assert!((f.eval(0.0) + 3.0).abs() < 1e-12);
//!
//! f.add(0.0, 1.0).unwrap();
//! assert!((f.eval(4.0) + 7.0).abs() < 1e-12);
//! ```

mod fit;
mod newton;
mod polynomial;

#[cfg(test)]
mod tests;

pub use fit::{Basis, CurveFitter};
pub use newton::Interpolator;
pub use polynomial::Polynomial;

/// Errors from interpolant and fitter construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpError {
    /// No samples were supplied.
    Empty,
    /// `xs` and `ys` have different lengths.
    LengthMismatch,
    /// Two interpolation nodes share an x-coordinate.
    DuplicateNode,
    /// Basis exponents are empty or not strictly increasing.
    InvalidBasis,
    /// Fewer samples than basis terms.
    TooFewSamples,
    /// The normal equations of the fit are singular.
    Singular,
}

impl core::fmt::Display for InterpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InterpError::Empty => write!(f, "no samples supplied"),
            InterpError::LengthMismatch => write!(f, "xs and ys must have the same length"),
            InterpError::DuplicateNode => write!(f, "interpolation nodes must have distinct x values"),
            InterpError::InvalidBasis => {
                write!(f, "basis exponents must be non-empty and strictly increasing")
            }
            InterpError::TooFewSamples => write!(f, "fewer samples than basis terms"),
            InterpError::Singular => write!(f, "normal equations are singular"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InterpError {}

fn check_samples<T>(xs: &[T], ys: &[T]) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::LengthMismatch);
    }
    if xs.is_empty() {
        return Err(InterpError::Empty);
    }
    Ok(())
}
