//! Vector, matrix and color primitives shared by every other module.
//!
//! World-space math is done in `f64` (matching the teacher's `nalgebra::Vector3<f64>`
//! convention); colors stay in `f64` too so `ColorRGB` composes cleanly with radiance math.

use nalgebra::{Vector3 as NVector3, Vector4};

pub const PI: f64 = std::f64::consts::PI;

/// `|a - b| < 1e-6` for every scalar comparison in the crate that needs a tolerance.
pub fn are_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UNIT_X: Vector3 = Vector3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const UNIT_Y: Vector3 = Vector3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const UNIT_Z: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    pub fn splat(v: f64) -> Self {
        Vector3::new(v, v, v)
    }

    pub fn dot(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn sqr_magnitude(self) -> f64 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f64 {
        self.sqr_magnitude().sqrt()
    }

    /// Normalizes in place and returns the pre-normalization length.
    pub fn normalize(&mut self) -> f64 {
        let len = self.magnitude();
        self.x /= len;
        self.y /= len;
        self.z /= len;
        len
    }

    /// Returns a normalized copy without mutating `self`.
    pub fn normalized(self) -> Vector3 {
        let mut v = self;
        v.normalize();
        v
    }

    pub fn min(a: Vector3, b: Vector3) -> Vector3 {
        Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
    }

    pub fn max(a: Vector3, b: Vector3) -> Vector3 {
        Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
    }

    /// `v - 2*(v.n)*n`
    pub fn reflect(v: Vector3, n: Vector3) -> Vector3 {
        v - n * (2.0 * v.dot(n))
    }

    pub fn get(self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("Vector3 axis index out of range: {axis}"),
        }
    }

    pub fn to_nalgebra(self) -> NVector3<f64> {
        NVector3::new(self.x, self.y, self.z)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Vector3::ZERO
    }
}

impl std::ops::Index<usize> for Vector3 {
    type Output = f64;
    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 axis index out of range: {axis}"),
        }
    }
}

impl std::ops::Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl std::ops::Mul<f64> for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Div<f64> for Vector3 {
    type Output = Vector3;
    fn div(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Three non-negative color channels. Radiance math can temporarily exceed 1.0 per
/// channel; `max_to_one` is the only place values get pulled back into `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRGB {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorRGB {
    pub const BLACK: ColorRGB = ColorRGB { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: ColorRGB = ColorRGB { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        ColorRGB { r, g, b }
    }

    pub fn splat(v: f64) -> Self {
        ColorRGB::new(v, v, v)
    }

    pub fn max_channel(self) -> f64 {
        self.r.max(self.g).max(self.b)
    }

    /// If the largest channel exceeds 1, scale all channels down by its reciprocal;
    /// otherwise clamp each channel into `[0,1]` individually.
    pub fn max_to_one(self) -> ColorRGB {
        let max = self.max_channel();
        if max > 1.0 {
            self * (1.0 / max)
        } else {
            ColorRGB::new(self.r.max(0.0), self.g.max(0.0), self.b.max(0.0))
        }
    }

    /// Quantizes a tone-mapped color to 8-bit channels, clamped to `[0,255]`.
    pub fn to_u8(self) -> [u8; 3] {
        let to_channel = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        [to_channel(self.r), to_channel(self.g), to_channel(self.b)]
    }
}

impl std::ops::Add for ColorRGB {
    type Output = ColorRGB;
    fn add(self, rhs: ColorRGB) -> ColorRGB {
        ColorRGB::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl std::ops::AddAssign for ColorRGB {
    fn add_assign(&mut self, rhs: ColorRGB) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for ColorRGB {
    type Output = ColorRGB;
    fn sub(self, rhs: ColorRGB) -> ColorRGB {
        ColorRGB::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl std::ops::Mul<f64> for ColorRGB {
    type Output = ColorRGB;
    fn mul(self, rhs: f64) -> ColorRGB {
        ColorRGB::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl std::ops::Mul<ColorRGB> for ColorRGB {
    type Output = ColorRGB;
    fn mul(self, rhs: ColorRGB) -> ColorRGB {
        ColorRGB::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl std::ops::Div<f64> for ColorRGB {
    type Output = ColorRGB;
    fn div(self, rhs: f64) -> ColorRGB {
        ColorRGB::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

/// A 4x4 transform, backed by `nalgebra::Matrix4<f64>`. `transform_point` applies the
/// translation column; `transform_vector` drops it (for normals/directions).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    inner: nalgebra::Matrix4<f64>,
}

impl Matrix4 {
    pub fn identity() -> Self {
        Matrix4 { inner: nalgebra::Matrix4::identity() }
    }

    pub fn translation(t: Vector3) -> Self {
        Matrix4 { inner: nalgebra::Matrix4::new_translation(&t.to_nalgebra()) }
    }

    pub fn scale(s: Vector3) -> Self {
        Matrix4 { inner: nalgebra::Matrix4::new_nonuniform_scaling(&s.to_nalgebra()) }
    }

    pub fn rotation_x(angle: f64) -> Self {
        Matrix4 { inner: nalgebra::Matrix4::from_scaled_axis(NVector3::x() * angle) }
    }

    pub fn rotation_y(angle: f64) -> Self {
        Matrix4 { inner: nalgebra::Matrix4::from_scaled_axis(NVector3::y() * angle) }
    }

    pub fn compose(matrices: &[Matrix4]) -> Self {
        let mut acc = Matrix4::identity();
        for m in matrices {
            acc = acc.then(*m);
        }
        acc
    }

    /// `self` applied first, then `other` (`other.inner * self.inner`).
    pub fn then(self, other: Matrix4) -> Matrix4 {
        Matrix4 { inner: other.inner * self.inner }
    }

    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let v = Vector4::new(p.x, p.y, p.z, 1.0);
        let r = self.inner * v;
        Vector3::new(r.x, r.y, r.z)
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        let v4 = Vector4::new(v.x, v.y, v.z, 0.0);
        let r = self.inner * v4;
        Vector3::new(r.x, r.y, r.z)
    }
}
