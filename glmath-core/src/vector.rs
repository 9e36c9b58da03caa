/// Three- and four-component vectors
use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

/// Length below which `normalize` gives up and returns the zero vector.
pub const NORMALIZE_EPSILON: f32 = 1e-5;

/// A 3-component vector used for positions, directions and colors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub const fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product. Zero when the inputs are parallel.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Scales the vector to unit length.
    ///
    /// Vectors no longer than [`NORMALIZE_EPSILON`] normalize to
    /// [`Vec3::ZERO`]; callers must tolerate a zero result.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > NORMALIZE_EPSILON {
            self / len
        } else {
            Self::ZERO
        }
    }

    /// Component-wise product, used to modulate colors.
    #[inline]
    pub fn mul_elem(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of bounds: {}", i),
        }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl From<nalgebra::Vector3<f32>> for Vec3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for nalgebra::Vector3<f32> {
    fn from(v: Vec3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vec3 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

/// A homogeneous 4-component vector.
///
/// Points carry `w = 1` and pick up translation; directions carry `w = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn from_point(p: Vec3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    #[inline]
    pub const fn from_direction(d: Vec3) -> Self {
        Self::new(d.x, d.y, d.z, 0.0)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Drops `w` without dividing.
    #[inline]
    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Perspective divide. `None` when `w` is too close to zero to divide by.
    pub fn to_cartesian(self) -> Option<Vec3> {
        if self.w.abs() < 1e-6 {
            return None;
        }
        Some(self.truncate() / self.w)
    }
}

impl AbsDiffEq for Vec4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Vec4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_sub() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -1.0, 4.0);
        assert_eq!(a + b, Vec3::new(1.5, 1.0, 7.0));
        assert_eq!(a - b, Vec3::new(0.5, 3.0, -1.0));
    }

    #[test]
    fn test_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -5.0, 6.0);
        assert_eq!(a.dot(b), 12.0);
        assert_eq!(Vec3::X.dot(Vec3::Y), 0.0);
    }

    #[test]
    fn test_cross_right_handed() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
    }

    #[test]
    fn test_cross_parallel_is_zero() {
        for v in [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.3, 7.5, 0.01),
            Vec3::ZERO,
        ] {
            assert_eq!(v.cross(v), Vec3::ZERO);
            assert_eq!(v.cross(v * 2.0), Vec3::ZERO);
        }
        assert_eq!(Vec3::X.cross(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_normalize() {
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert_relative_eq!(n, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-6);
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_idempotent() {
        let v = Vec3::new(-2.0, 0.5, 9.0);
        let once = v.normalize();
        assert_relative_eq!(once.normalize(), once, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        assert_eq!(Vec3::splat(1e-6).normalize(), Vec3::ZERO);
        // Just above the threshold still normalizes
        let tiny = Vec3::new(2e-5, 0.0, 0.0).normalize();
        assert_relative_eq!(tiny, Vec3::X, epsilon = 1e-6);
    }

    #[test]
    fn test_vec4_cartesian() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0);
        assert_eq!(v.to_cartesian(), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(Vec4::from_direction(Vec3::X).to_cartesian(), None);
        assert_eq!(Vec4::from_point(Vec3::Y).w, 1.0);
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        let n: nalgebra::Vector3<f32> = v.into();
        assert_eq!(n.y, -2.0);
        assert_eq!(Vec3::from(n), v);
    }
}
