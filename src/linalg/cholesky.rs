use crate::linalg::LinalgError;
use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

/// Cholesky factorization `A = L·Lᵀ` of a symmetric positive-definite matrix.
///
/// Only the lower triangle of the input is read.
///
/// ```
/// use numcal::{Matrix, Vector};
///
/// let a = Matrix::new([[4.0_f64, 2.0], [2.0, 3.0]]);
/// let chol = a.cholesky().unwrap();
/// let x = chol.solve(&Vector::from_array([8.0, 7.0]));
/// assert!((x[0] - 1.25).abs() < 1e-12);
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CholeskyDecomposition<T, const N: usize> {
    l: Matrix<T, N, N>,
}

impl<T: FloatScalar, const N: usize> CholeskyDecomposition<T, N> {
    /// Factor `a`.
    ///
    /// A diagonal that vanishes to round-off, relative to the largest input
    /// diagonal, counts as not positive definite. This catches the
    /// rank-deficient Gram matrices of degenerate fits.
    pub fn new(a: &Matrix<T, N, N>) -> Result<Self, LinalgError> {
        let scale = (0..N).fold(T::zero(), |m, i| m.max(a[(i, i)].abs()));
        let floor = T::epsilon() * scale * T::lit(N as f64);
        let mut l = Matrix::<T, N, N>::zeros();

        for j in 0..N {
            let mut d = a[(j, j)];
            for k in 0..j {
                d = d - l[(j, k)] * l[(j, k)];
            }
            if !(d > floor) {
                return Err(LinalgError::NotPositiveDefinite);
            }
            let ljj = d.sqrt();
            l[(j, j)] = ljj;

            for i in (j + 1)..N {
                let mut s = a[(i, j)];
                for k in 0..j {
                    s = s - l[(i, k)] * l[(j, k)];
                }
                l[(i, j)] = s / ljj;
            }
        }

        Ok(Self { l })
    }

    /// Lower-triangular factor (zeros above the diagonal).
    pub fn l(&self) -> &Matrix<T, N, N> {
        &self.l
    }

    fn solve_array(&self, b: &[T; N]) -> [T; N] {
        let mut x = *b;
        // L y = b
        for i in 0..N {
            for k in 0..i {
                x[i] = x[i] - self.l[(i, k)] * x[k];
            }
            x[i] = x[i] / self.l[(i, i)];
        }
        // Lᵀ x = y
        for i in (0..N).rev() {
            for k in (i + 1)..N {
                x[i] = x[i] - self.l[(k, i)] * x[k];
            }
            x[i] = x[i] / self.l[(i, i)];
        }
        x
    }

    /// Solve `Ax = b`.
    pub fn solve(&self, b: &Vector<T, N>) -> Vector<T, N> {
        Vector::from_array(self.solve_array(&b.to_array()))
    }

    pub fn inverse(&self) -> Matrix<T, N, N> {
        let mut inv = Matrix::zeros();
        for c in 0..N {
            let e: [T; N] = core::array::from_fn(|i| if i == c { T::one() } else { T::zero() });
            inv.data[c] = self.solve_array(&e);
        }
        inv
    }

    /// `det(A) = (Π Lᵢᵢ)²`.
    pub fn det(&self) -> T {
        let p = (0..N).fold(T::one(), |p, i| p * self.l[(i, i)]);
        p * p
    }
}

impl<T: FloatScalar, const N: usize> Matrix<T, N, N> {
    /// Cholesky decomposition, `A = L·Lᵀ`.
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T, N>, LinalgError> {
        CholeskyDecomposition::new(self)
    }
}
