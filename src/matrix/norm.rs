use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, Scalar};
use crate::Matrix;

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }
}

impl<T: FloatScalar, const N: usize> Vector<T, N> {
    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Largest absolute component.
    pub fn norm_inf(&self) -> T {
        (0..N).fold(T::zero(), |m, i| m.max(self[i].abs()))
    }
}

impl<T: FloatScalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Largest absolute element.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .flatten()
            .fold(T::zero(), |m, v| m.max(v.abs()))
    }

    /// `true` when no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|v| v.is_finite())
    }
}
