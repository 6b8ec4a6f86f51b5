use crate::matrix::vector::Vector;
use crate::traits::Scalar;
use crate::Matrix;

impl<T: Copy, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Build element-wise from `f(row, col)`.
    ///
    /// ```
    /// use numcal::Matrix;
    /// let hilbert: Matrix<f64, 3, 3> = Matrix::from_fn(|i, j| 1.0 / (i + j + 1) as f64);
    /// assert_eq!(hilbert[(1, 2)], 0.25);
    /// ```
    pub fn from_fn(f: impl Fn(usize, usize) -> T) -> Self {
        Self {
            data: core::array::from_fn(|col| core::array::from_fn(|row| f(row, col))),
        }
    }
}

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Row `i` as a vector.
    pub fn row(&self, i: usize) -> Vector<T, N> {
        Vector::from_array(core::array::from_fn(|j| self.data[j][i]))
    }

    pub fn set_col(&mut self, j: usize, v: &Vector<T, M>) {
        self.data[j] = v.to_array();
    }
}
