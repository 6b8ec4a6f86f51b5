use core::ops::{Index, IndexMut};

use crate::traits::Scalar;
use crate::Matrix;

/// Row vector (1×N matrix).
///
/// This is the argument type of every optimizer and ODE right-hand side.
///
/// ```
/// use numcal::Vector;
///
/// let v = Vector::from_array([3.0_f64, 4.0]);
/// assert_eq!(v[1], 4.0);
/// assert_eq!(v.dot(&v), 25.0);
/// assert!((v.norm() - 5.0).abs() < 1e-12);
/// ```
pub type Vector<T, const N: usize> = Matrix<T, 1, N>;

/// Column vector (N×1 matrix), the state and measurement type of the filters.
pub type ColumnVector<T, const N: usize> = Matrix<T, N, 1>;

impl<T: Scalar, const N: usize> Vector<T, N> {
    #[inline]
    pub fn from_array(data: [T; N]) -> Self {
        Self { data: data.map(|v| [v]) }
    }

    /// Every element set to `value`.
    #[inline]
    pub fn fill(value: T) -> Self {
        Self {
            data: [[value]; N],
        }
    }

    /// Unit vector along axis `i`.
    pub fn basis(i: usize) -> Self {
        let mut v = Self::zeros();
        v[i] = T::one();
        v
    }

    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Copy out as a plain array.
    #[inline]
    pub fn to_array(&self) -> [T; N] {
        self.data.map(|c| c[0])
    }

    pub fn dot(&self, rhs: &Self) -> T {
        self.data
            .iter()
            .zip(rhs.data.iter())
            .fold(T::zero(), |acc, (a, b)| acc + a[0] * b[0])
    }

    /// Outer product `selfᵀ · rhs`, an N×P matrix.
    pub fn outer<const P: usize>(&self, rhs: &Vector<T, P>) -> Matrix<T, N, P> {
        let mut out = Matrix::<T, N, P>::zeros();
        for i in 0..N {
            for j in 0..P {
                out[(i, j)] = self[i] * rhs[j];
            }
        }
        out
    }
}

impl<T: Scalar, const N: usize> ColumnVector<T, N> {
    /// Column vector from a 1D array.
    ///
    /// ```
    /// use numcal::ColumnVector;
    /// let cv = ColumnVector::from_column([1.0, 2.0, 3.0]);
    /// assert_eq!(cv[(2, 0)], 3.0);
    /// ```
    #[inline]
    pub fn from_column(data: [T; N]) -> Self {
        Self { data: [data] }
    }

    /// Reinterpret as a row vector.
    #[inline]
    pub fn to_row(&self) -> Vector<T, N> {
        self.transpose()
    }
}

// v[i] instead of v[(0, i)]
impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i][0]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i][0]
    }
}
