use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::Scalar;
use crate::Matrix;

// ── Element-wise binary ops ─────────────────────────────────────────

macro_rules! elementwise {
    ($Op:ident, $method:ident, $OpAssign:ident, $assign:ident, $op:tt) => {
        impl<T: Scalar, const M: usize, const N: usize> $Op for Matrix<T, M, N> {
            type Output = Self;

            #[inline]
            fn $method(mut self, rhs: Self) -> Self {
                self.$assign(rhs);
                self
            }
        }

        impl<T: Scalar, const M: usize, const N: usize> $OpAssign for Matrix<T, M, N> {
            #[inline]
            fn $assign(&mut self, rhs: Self) {
                for (lc, rc) in self.data.iter_mut().zip(rhs.data.iter()) {
                    for (l, &r) in lc.iter_mut().zip(rc.iter()) {
                        *l = *l $op r;
                    }
                }
            }
        }

        impl<T: Scalar, const M: usize, const N: usize> $Op<&Matrix<T, M, N>> for &Matrix<T, M, N> {
            type Output = Matrix<T, M, N>;

            #[inline]
            fn $method(self, rhs: &Matrix<T, M, N>) -> Matrix<T, M, N> {
                (*self).$method(*rhs)
            }
        }
    };
}

elementwise!(Add, add, AddAssign, add_assign, +);
elementwise!(Sub, sub, SubAssign, sub_assign, -);

impl<T: Scalar, const M: usize, const N: usize> Neg for Matrix<T, M, N> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for v in self.data.iter_mut().flatten() {
            *v = T::zero() - *v;
        }
        self
    }
}

// ── Scaling ─────────────────────────────────────────────────────────

impl<T: Scalar, const M: usize, const N: usize> MulAssign<T> for Matrix<T, M, N> {
    fn mul_assign(&mut self, rhs: T) {
        for v in self.data.iter_mut().flatten() {
            *v = *v * rhs;
        }
    }
}

impl<T: Scalar, const M: usize, const N: usize> Mul<T> for Matrix<T, M, N> {
    type Output = Self;

    #[inline]
    fn mul(mut self, rhs: T) -> Self {
        self *= rhs;
        self
    }
}

impl<T: Scalar, const M: usize, const N: usize> Div<T> for Matrix<T, M, N> {
    type Output = Self;

    fn div(mut self, rhs: T) -> Self {
        for v in self.data.iter_mut().flatten() {
            *v = *v / rhs;
        }
        self
    }
}

// scalar * matrix needs concrete impls (orphan rule)
macro_rules! scalar_lhs_mul {
    ($($t:ty),*) => {
        $(
            impl<const M: usize, const N: usize> Mul<Matrix<$t, M, N>> for $t {
                type Output = Matrix<$t, M, N>;

                #[inline]
                fn mul(self, rhs: Matrix<$t, M, N>) -> Matrix<$t, M, N> {
                    rhs * self
                }
            }
        )*
    };
}

scalar_lhs_mul!(f32, f64);

// ── Matrix product: (M×N) · (N×P) → (M×P) ──────────────────────────

impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>>
    for Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Matrix<T, M, P> {
        let mut out = Matrix::<T, M, P>::zeros();
        // column-major friendly: accumulate columns of self scaled by rhs entries
        for j in 0..P {
            for k in 0..N {
                let r = rhs.data[j][k];
                for i in 0..M {
                    out.data[j][i] = out.data[j][i] + self.data[k][i] * r;
                }
            }
        }
        out
    }
}

impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<&Matrix<T, N, P>>
    for &Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    #[inline]
    fn mul(self, rhs: &Matrix<T, N, P>) -> Matrix<T, M, P> {
        (*self) * (*rhs)
    }
}

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Transpose, (M×N) → (N×M).
    pub fn transpose(&self) -> Matrix<T, N, M> {
        let mut out = Matrix::<T, N, M>::zeros();
        for j in 0..N {
            for i in 0..M {
                out.data[i][j] = self.data[j][i];
            }
        }
        out
    }
}
