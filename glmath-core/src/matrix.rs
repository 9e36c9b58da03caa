/// 4x4 matrix type and its core operations.
///
/// # Layout
///
/// [`Mat4`] stores 16 coefficients in **column-major** order, the layout a
/// `uniformMatrix4fv(.., transpose = false, ..)` upload expects:
///
/// ```text
/// | m[0] m[4] m[8]  m[12] |
/// | m[1] m[5] m[9]  m[13] |
/// | m[2] m[6] m[10] m[14] |
/// | m[3] m[7] m[11] m[15] |
/// ```
///
/// Coefficient `(row, col)` lives at index `col * 4 + row`. Matrices act on
/// column vectors, so `(a * b) * v == a * (b * v)`.

use crate::error::{Error, Result};
use crate::vector::{Vec3, Vec4};
use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Index, Mul};

/// Determinant magnitude at or below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-8;

/// A 4x4 `f32` matrix in column-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Mat4 {
    pub const ZERO: Self = Self { m: [0.0; 16] };

    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Wraps 16 coefficients that are already column-major.
    #[inline]
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Builds a matrix from rows written the way the math reads.
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut m = [0.0; 16];
        let mut row = 0;
        while row < 4 {
            let mut col = 0;
            while col < 4 {
                m[col * 4 + row] = rows[row][col];
                col += 1;
            }
            row += 1;
        }
        Self { m }
    }

    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        let mut m = [0.0; 16];
        for (i, c) in [c0, c1, c2, c3].iter().enumerate() {
            m[i * 4..i * 4 + 4].copy_from_slice(&c.to_array());
        }
        Self { m }
    }

    #[inline]
    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.m
    }

    /// Coefficients in upload order.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.m
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    #[inline]
    pub fn col(&self, i: usize) -> Vec4 {
        Vec4::new(
            self.m[i * 4],
            self.m[i * 4 + 1],
            self.m[i * 4 + 2],
            self.m[i * 4 + 3],
        )
    }

    #[inline]
    pub fn row(&self, i: usize) -> Vec4 {
        Vec4::new(self.m[i], self.m[4 + i], self.m[8 + i], self.m[12 + i])
    }

    /// Swaps `m[i*4+j]` with `m[j*4+i]`.
    pub fn transpose(&self) -> Self {
        let mut out = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                out[i * 4 + j] = self.m[j * 4 + i];
            }
        }
        Self { m: out }
    }

    /// Matrix product `self * other`.
    ///
    /// Column `j` of the result is `self` applied to column `j` of `other`,
    /// so the product applies `other` first.
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4)
                    .map(|k| self.get(row, k) * other.get(k, col))
                    .sum();
            }
        }
        Self { m: out }
    }

    /// Applies the matrix to a homogeneous column vector.
    pub fn transform(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    /// Applies the matrix to a point (`w = 1`), dropping the resulting `w`.
    ///
    /// No perspective divide; use [`Mat4::transform`] with
    /// [`Vec4::to_cartesian`] for projective matrices.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform(Vec4::from_point(p)).truncate()
    }

    /// Applies the matrix to a direction (`w = 0`), ignoring translation.
    #[inline]
    pub fn transform_vector(&self, d: Vec3) -> Vec3 {
        self.transform(Vec4::from_direction(d)).truncate()
    }

    /// Determinant of the 3x3 submatrix left after deleting `row` and `col`.
    ///
    /// Evaluated in `f64`: a product of three large `f32` coefficients
    /// overflows `f32` long before the inverse does.
    fn minor(&self, row: usize, col: usize) -> f64 {
        let mut sub = [0.0f64; 9];
        let mut n = 0;
        for c in (0..4).filter(|&c| c != col) {
            for r in (0..4).filter(|&r| r != row) {
                sub[n] = self.get(r, c) as f64;
                n += 1;
            }
        }
        // sub is column-major 3x3
        sub[0] * (sub[4] * sub[8] - sub[7] * sub[5])
            - sub[3] * (sub[1] * sub[8] - sub[7] * sub[2])
            + sub[6] * (sub[1] * sub[5] - sub[4] * sub[2])
    }

    fn cofactor_f64(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    /// Signed minor `(-1)^(row+col) * minor(row, col)`.
    #[inline]
    pub fn cofactor(&self, row: usize, col: usize) -> f32 {
        self.cofactor_f64(row, col) as f32
    }

    fn determinant_f64(&self) -> f64 {
        (0..4)
            .map(|r| self.get(r, 0) as f64 * self.cofactor_f64(r, 0))
            .sum()
    }

    /// Laplace expansion down the first column.
    ///
    /// Saturates to infinity when the exact value is beyond `f32` range.
    pub fn determinant(&self) -> f32 {
        self.determinant_f64() as f32
    }

    /// Inverse by the adjugate method.
    ///
    /// All 16 cofactors are computed, the determinant is taken from the first
    /// column's entries and cofactors, and the adjugate (transposed cofactor
    /// matrix) is scaled by `1/det`. The arithmetic runs in `f64`, so a
    /// determinant outside `f32` range does not make a well-conditioned
    /// matrix look singular.
    ///
    /// Returns [`Error::SingularMatrix`] when `|det| <= SINGULAR_EPSILON`,
    /// the determinant is not finite, or an inverse coefficient does not fit
    /// in an `f32`.
    pub fn try_inverse(&self) -> Result<Self> {
        let mut cof = [0.0f64; 16];
        for col in 0..4 {
            for row in 0..4 {
                cof[col * 4 + row] = self.cofactor_f64(row, col);
            }
        }

        let det: f64 = (0..4).map(|r| self.m[r] as f64 * cof[r]).sum();
        if !det.is_finite() || det.abs() <= SINGULAR_EPSILON as f64 {
            return Err(Error::SingularMatrix {
                determinant: det as f32,
            });
        }

        let inv_det = 1.0 / det;
        // adj(M)[row][col] = C[col][row]
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (cof[row * 4 + col] * inv_det) as f32;
            }
        }
        let inverse = Self { m: out };
        if !inverse.is_finite() {
            return Err(Error::SingularMatrix {
                determinant: det as f32,
            });
        }
        Ok(inverse)
    }

    /// Inverse-transpose, for carrying surface normals through `self`.
    ///
    /// Recompute whenever the model matrix changes.
    pub fn normal_matrix(&self) -> Result<Self> {
        Ok(self.try_inverse()?.transpose())
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|x| x.is_finite())
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl Mul<&Mat4> for &Mat4 {
    type Output = Mat4;

    #[inline]
    fn mul(self, rhs: &Mat4) -> Mat4 {
        self.mul_mat(rhs)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.transform(rhs)
    }
}

impl Index<usize> for Mat4 {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.m[i]
    }
}

impl From<Mat4> for [f32; 16] {
    fn from(m: Mat4) -> Self {
        m.m
    }
}

impl From<Mat4> for nalgebra::Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        // nalgebra is column-major as well
        nalgebra::Matrix4::from_column_slice(&m.m)
    }
}

impl From<nalgebra::Matrix4<f32>> for Mat4 {
    fn from(m: nalgebra::Matrix4<f32>) -> Self {
        let mut out = [0.0; 16];
        out.copy_from_slice(m.as_slice());
        Self { m: out }
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample() -> Mat4 {
        Mat4::from_rows([
            [2.0, 0.0, 1.0, 3.0],
            [1.0, 3.0, 0.0, -1.0],
            [0.0, 1.0, 4.0, 2.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn general() -> Mat4 {
        Mat4::from_rows([
            [4.0, 7.0, 2.0, 3.0],
            [0.0, 5.0, 0.0, 1.0],
            [1.0, 0.0, 6.0, 2.0],
            [3.0, 1.0, 0.0, 2.0],
        ])
    }

    #[test]
    fn test_column_major_layout() {
        let m = sample();
        // translation column sits at indices 12..15
        assert_eq!(m[12], 3.0);
        assert_eq!(m[13], -1.0);
        assert_eq!(m[14], 2.0);
        assert_eq!(m.get(0, 3), 3.0);
        assert_eq!(m.col(3), Vec4::new(3.0, -1.0, 2.0, 1.0));
        assert_eq!(m.row(0), Vec4::new(2.0, 0.0, 1.0, 3.0));
    }

    #[test]
    fn test_transpose() {
        let m = general();
        let t = m.transpose();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(t[i * 4 + j], m[j * 4 + i]);
            }
        }
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_identity_multiply() {
        let m = general();
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn test_multiply_applies_right_first() {
        let a = sample();
        let b = general();
        let v = Vec4::new(1.0, -2.0, 0.5, 1.0);
        assert_relative_eq!((a * b) * v, a * (b * v), epsilon = 1e-4);
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let a = sample();
        let b = general();
        let expected: nalgebra::Matrix4<f32> =
            nalgebra::Matrix4::from(a) * nalgebra::Matrix4::from(b);
        assert_relative_eq!(a * b, Mat4::from(expected), epsilon = 1e-5);
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Mat4::IDENTITY.determinant(), 1.0);
        // upper block det: 2*(12-0) - 0 + 1*(1-0) = 25
        assert_relative_eq!(sample().determinant(), 25.0, epsilon = 1e-4);
        let n: nalgebra::Matrix4<f32> = general().into();
        assert_relative_eq!(general().determinant(), n.determinant(), epsilon = 1e-3);
    }

    #[test]
    fn test_inverse_identity_product() {
        for m in [sample(), general()] {
            let inv = m.try_inverse().unwrap();
            assert_abs_diff_eq!(m * inv, Mat4::IDENTITY, epsilon = 1e-4);
            assert_abs_diff_eq!(inv * m, Mat4::IDENTITY, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_inverse_involution() {
        let m = general();
        let back = m.try_inverse().unwrap().try_inverse().unwrap();
        assert_relative_eq!(back, m, epsilon = 1e-4, max_relative = 1e-4);
    }

    #[test]
    fn test_inverse_matches_nalgebra() {
        let m = general();
        let expected = nalgebra::Matrix4::from(m).try_inverse().unwrap();
        assert_relative_eq!(m.try_inverse().unwrap(), Mat4::from(expected), epsilon = 1e-5);
    }

    #[test]
    fn test_singular_matrix() {
        let flat = Mat4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert!(matches!(
            flat.try_inverse(),
            Err(Error::SingularMatrix { .. })
        ));

        let dependent = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 4.0, 6.0, 8.0],
            [0.0, 1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
        ]);
        assert!(dependent.try_inverse().is_err());
        assert!(Mat4::ZERO.try_inverse().is_err());
    }

    #[test]
    fn test_large_scale_inverts() {
        // det = 1e39 is beyond f32 range, the inverse is not
        let m = Mat4::scale(1e13, 1e13, 1e13);
        assert!(m.determinant().is_infinite());
        let inv = m.try_inverse().unwrap();
        assert_relative_eq!(inv.get(0, 0), 1e-13, max_relative = 1e-6);
        assert_relative_eq!(inv.get(3, 3), 1.0);
        assert_abs_diff_eq!(m * inv, Mat4::IDENTITY, epsilon = 1e-5);
    }

    #[test]
    fn test_non_finite_input_is_singular() {
        let mut m = Mat4::IDENTITY.to_cols_array();
        m[0] = f32::NAN;
        assert!(Mat4::from_cols_array(m).try_inverse().is_err());
    }

    #[test]
    fn test_normal_matrix() {
        let m = sample();
        let n = m.normal_matrix().unwrap();
        assert_relative_eq!(n, m.try_inverse().unwrap().transpose());
    }

    #[test]
    fn test_transform_point_and_vector() {
        let m = sample();
        let p = m.transform_point(Vec3::ZERO);
        assert_eq!(p, Vec3::new(3.0, -1.0, 2.0));
        let d = m.transform_vector(Vec3::ZERO);
        assert_eq!(d, Vec3::ZERO);
    }

    #[test]
    fn test_from_cols() {
        let m = Mat4::from_cols(
            Vec4::new(1.0, 2.0, 3.0, 4.0),
            Vec4::new(5.0, 6.0, 7.0, 8.0),
            Vec4::new(9.0, 10.0, 11.0, 12.0),
            Vec4::new(13.0, 14.0, 15.0, 16.0),
        );
        let expected: Vec<f32> = (1..=16).map(|i| i as f32).collect();
        assert_eq!(m.as_slice(), expected.as_slice());
    }
}
