pub mod aliases;
mod norm;
mod ops;
mod square;
mod util;
pub mod vector;

use core::ops::{Index, IndexMut};

use crate::traits::Scalar;

/// Dense `M`×`N` matrix stored on the stack.
///
/// Storage is column-major (`data[col][row]`) and the type is `Copy`.
/// All solver state in this crate lives in these matrices, so no heap is
/// touched by a filter cycle or an optimizer iteration.
///
/// ```
/// use numcal::Matrix;
///
/// // Constant-velocity transition for a 0.5 s step
/// let a = Matrix::new([[1.0, 0.5], [0.0, 1.0]]);
/// assert_eq!(a[(0, 1)], 0.5);
/// assert_eq!(a.ncols(), 2);
///
/// let p: Matrix<f64, 2, 2> = Matrix::eye();
/// let prior = a * p * a.transpose();
/// assert_eq!(prior[(0, 0)], 1.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const M: usize, const N: usize> {
    pub(crate) data: [[T; M]; N],
}

impl<T: Copy, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Create a matrix from row-major nested arrays (`rows[i][j]` is row `i`,
    /// column `j`).
    pub fn new(rows: [[T; N]; M]) -> Self {
        let data = core::array::from_fn(|col| core::array::from_fn(|row| rows[row][col]));
        Self { data }
    }
}

impl<T, const M: usize, const N: usize> Matrix<T, M, N> {
    #[inline]
    pub const fn nrows(&self) -> usize {
        M
    }

    #[inline]
    pub const fn ncols(&self) -> usize {
        N
    }
}

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Matrix of zeros.
    pub fn zeros() -> Self {
        Self {
            data: [[T::zero(); M]; N],
        }
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Identity matrix.
    pub fn eye() -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.data[i][i] = T::one();
        }
        m
    }
}

impl<T, const M: usize, const N: usize> Index<(usize, usize)> for Matrix<T, M, N> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[col][row]
    }
}

impl<T, const M: usize, const N: usize> IndexMut<(usize, usize)> for Matrix<T, M, N> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[col][row]
    }
}

pub use aliases::*;

#[cfg(test)]
mod tests {
    use crate::Matrix;

    #[test]
    fn rows_are_given_in_reading_order() {
        let h = Matrix::new([[1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]]);
        assert_eq!(h.nrows(), 2);
        assert_eq!(h.ncols(), 4);
        assert_eq!(h[(1, 2)], 1.0);
        assert_eq!(h[(0, 2)], 0.0);
        assert_eq!(h.data[2], [0.0, 1.0]);
    }

    #[test]
    fn identity_and_zero() {
        let k: Matrix<f64, 4, 2> = Matrix::zeros();
        assert!(k.data.iter().flatten().all(|&v| v == 0.0));

        let p: Matrix<f32, 3, 3> = Matrix::eye();
        assert_eq!(p[(2, 2)], 1.0);
        assert_eq!(p[(0, 2)], 0.0);
    }

    #[test]
    fn write_through_index() {
        let mut q: Matrix<i64, 2, 2> = Matrix::zeros();
        q[(0, 1)] = -3;
        assert_eq!(q[(0, 1)], -3);
        assert_eq!(q[(1, 0)], 0);
    }
}
