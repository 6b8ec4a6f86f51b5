//! Shorthand names for the small sizes the filters and solvers use.

use crate::matrix::vector::{ColumnVector, Vector};
use crate::Matrix;

/// 2×2 matrix.
pub type Matrix2<T> = Matrix<T, 2, 2>;
/// 3×3 matrix.
pub type Matrix3<T> = Matrix<T, 3, 3>;
/// 4×4 matrix.
pub type Matrix4<T> = Matrix<T, 4, 4>;
/// 5×5 matrix.
pub type Matrix5<T> = Matrix<T, 5, 5>;
/// 6×6 matrix.
pub type Matrix6<T> = Matrix<T, 6, 6>;

/// 2-element row vector.
pub type Vector2<T> = Vector<T, 2>;
/// 3-element row vector.
pub type Vector3<T> = Vector<T, 3>;
/// 4-element row vector.
pub type Vector4<T> = Vector<T, 4>;

/// 2-element column vector.
pub type ColumnVector2<T> = ColumnVector<T, 2>;
/// 3-element column vector.
pub type ColumnVector3<T> = ColumnVector<T, 3>;
/// 4-element column vector.
pub type ColumnVector4<T> = ColumnVector<T, 4>;
/// 5-element column vector.
pub type ColumnVector5<T> = ColumnVector<T, 5>;
