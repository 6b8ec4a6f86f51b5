//! Dense decompositions for the small systems the solvers produce:
//! normal equations (`JᵀJ`), innovation covariances, curve-fit Gram matrices.

pub(crate) mod cholesky;
pub(crate) mod lu;

pub use cholesky::CholeskyDecomposition;
pub use lu::LuDecomposition;

/// Factorization failures.
///
/// ```
/// use numcal::Matrix;
/// use numcal::linalg::LinalgError;
///
/// // Two identical measurement rows give a rank-deficient Gram matrix
/// let gram = Matrix::new([[2.0_f64, 6.0], [6.0, 18.0]]);
/// assert_eq!(gram.lu().unwrap_err(), LinalgError::Singular);
///
/// let indefinite = Matrix::new([[1.0_f64, 3.0], [3.0, 1.0]]);
/// assert_eq!(indefinite.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinalgError {
    /// A pivot vanished relative to the largest entry.
    Singular,
    /// Cholesky met a non-positive diagonal.
    NotPositiveDefinite,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "singular matrix"),
            LinalgError::NotPositiveDefinite => write!(f, "matrix not positive definite"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
