use crate::matrix::vector::Vector;
use crate::traits::Scalar;
use crate::Matrix;

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Diagonal matrix with `v` on the diagonal.
    pub fn from_diag(v: &Vector<T, N>) -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.data[i][i] = v[i];
        }
        m
    }

    /// `s · I`.
    pub fn scaled_eye(s: T) -> Self {
        Self::from_diag(&Vector::fill(s))
    }

    /// Symmetric part `(A + Aᵀ) / 2`, used to scrub round-off asymmetry
    /// from covariance updates.
    pub fn symmetrize(&self) -> Self {
        let two = T::one() + T::one();
        let mut out = *self;
        for i in 0..N {
            for j in (i + 1)..N {
                let v = (self.data[j][i] + self.data[i][j]) / two;
                out.data[j][i] = v;
                out.data[i][j] = v;
            }
        }
        out
    }
}
