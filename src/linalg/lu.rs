use crate::linalg::LinalgError;
use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

/// LU decomposition with partial pivoting, `PA = LU`.
///
/// L (unit diagonal, implicit) and U are packed into one matrix.
///
/// ```
/// use numcal::{Matrix, Vector};
///
/// let a = Matrix::new([[2.0_f64, 1.0], [5.0, 3.0]]);
/// let lu = a.lu().unwrap();
/// let x = lu.solve(&Vector::from_array([4.0, 11.0]));
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LuDecomposition<T, const N: usize> {
    lu: Matrix<T, N, N>,
    perm: [usize; N],
    even: bool,
}

impl<T: FloatScalar, const N: usize> LuDecomposition<T, N> {
    /// Factor `a`.
    ///
    /// A pivot that is negligible relative to the largest entry of `a` is
    /// reported as [`LinalgError::Singular`].
    pub fn new(a: &Matrix<T, N, N>) -> Result<Self, LinalgError> {
        let mut lu = *a;
        let mut perm: [usize; N] = core::array::from_fn(|i| i);
        let mut even = true;
        let threshold = T::epsilon() * a.max_abs();

        for k in 0..N {
            let mut p = k;
            for r in (k + 1)..N {
                if lu[(r, k)].abs() > lu[(p, k)].abs() {
                    p = r;
                }
            }
            if lu[(p, k)].abs() <= threshold {
                return Err(LinalgError::Singular);
            }
            if p != k {
                perm.swap(k, p);
                for c in 0..N {
                    let tmp = lu[(k, c)];
                    lu[(k, c)] = lu[(p, c)];
                    lu[(p, c)] = tmp;
                }
                even = !even;
            }

            let pivot = lu[(k, k)];
            for r in (k + 1)..N {
                let factor = lu[(r, k)] / pivot;
                lu[(r, k)] = factor;
                for c in (k + 1)..N {
                    lu[(r, c)] = lu[(r, c)] - factor * lu[(k, c)];
                }
            }
        }

        Ok(Self { lu, perm, even })
    }

    fn solve_array(&self, b: &[T; N]) -> [T; N] {
        let mut x: [T; N] = core::array::from_fn(|i| b[self.perm[i]]);
        for i in 0..N {
            for j in 0..i {
                x[i] = x[i] - self.lu[(i, j)] * x[j];
            }
        }
        for i in (0..N).rev() {
            for j in (i + 1)..N {
                x[i] = x[i] - self.lu[(i, j)] * x[j];
            }
            x[i] = x[i] / self.lu[(i, i)];
        }
        x
    }

    /// Solve `Ax = b`.
    pub fn solve(&self, b: &Vector<T, N>) -> Vector<T, N> {
        Vector::from_array(self.solve_array(&b.to_array()))
    }

    /// `A⁻¹`, one solve per unit column.
    pub fn inverse(&self) -> Matrix<T, N, N> {
        let mut inv = Matrix::zeros();
        for c in 0..N {
            let e: [T; N] = core::array::from_fn(|i| if i == c { T::one() } else { T::zero() });
            inv.data[c] = self.solve_array(&e);
        }
        inv
    }

    pub fn det(&self) -> T {
        let sign = if self.even { T::one() } else { -T::one() };
        (0..N).fold(sign, |d, i| d * self.lu[(i, i)])
    }
}

/// Convenience methods on square matrices.
impl<T: FloatScalar, const N: usize> Matrix<T, N, N> {
    /// LU decomposition with partial pivoting.
    pub fn lu(&self) -> Result<LuDecomposition<T, N>, LinalgError> {
        LuDecomposition::new(self)
    }

    /// Solve `Ax = b` via LU.
    ///
    /// ```
    /// use numcal::{Matrix, Vector};
    /// let a = Matrix::new([[2.0_f64, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]);
    /// let x = a.solve(&Vector::from_array([8.0, -11.0, -3.0])).unwrap();
    /// assert!((x[0] - 2.0).abs() < 1e-12);
    /// assert!((x[2] + 1.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &Vector<T, N>) -> Result<Vector<T, N>, LinalgError> {
        Ok(self.lu()?.solve(b))
    }

    /// Matrix inverse via LU.
    pub fn inverse(&self) -> Result<Self, LinalgError> {
        Ok(self.lu()?.inverse())
    }

    /// Determinant; a singular matrix has determinant zero.
    pub fn det(&self) -> T {
        self.lu().map_or(T::zero(), |lu| lu.det())
    }
}
