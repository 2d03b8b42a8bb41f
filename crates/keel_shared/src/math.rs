//! Mathematical types shared between engine subsystems.
//!
//! These are the canonical representations used by components, systems,
//! and the scene serialization layer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Coordinate axis selector.
///
/// Used where an algorithm picks one axis of a vector at runtime,
/// e.g. the minimum-overlap axis of an AABB penetration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All three axes, in component order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}

/// 3D Vector - position, velocity, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// All-ones vector
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction, or zero for degenerate input.
    ///
    /// Contact vectors can legitimately collapse to zero length (e.g. two
    /// sphere centers coinciding), so the degenerate case must not produce
    /// NaN components.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq <= f32::EPSILON {
            Self::ZERO
        } else {
            self * (1.0 / len_sq.sqrt())
        }
    }

    /// Reflects this vector about a unit normal: `v - 2*(v.n)*n`.
    #[must_use]
    pub fn reflect(self, normal: Self) -> Self {
        self - normal * (2.0 * self.dot(normal))
    }

    /// Returns the component on the given axis.
    #[must_use]
    pub const fn axis(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Sets the component on the given axis.
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// 4x4 row-major matrix.
///
/// Row 3 carries the translation, so `world_mat.translation()` is the
/// world-space position of a transform - the convention every consumer of
/// `Transform::world_mat` relies on.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    /// Rows in memory order.
    pub rows: [[f32; 4]; 4],
}

impl Mat4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a scale matrix.
    #[must_use]
    pub const fn from_scale(s: Vec3) -> Self {
        Self {
            rows: [
                [s.x, 0.0, 0.0, 0.0],
                [0.0, s.y, 0.0, 0.0],
                [0.0, 0.0, s.z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a translation matrix.
    #[must_use]
    pub const fn from_translation(t: Vec3) -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [t.x, t.y, t.z, 1.0],
            ],
        }
    }

    /// Creates a rotation matrix from Euler angles (radians), applied X then Y then Z.
    #[must_use]
    pub fn from_euler(e: Vec3) -> Self {
        let (sx, cx) = e.x.sin_cos();
        let (sy, cy) = e.y.sin_cos();
        let (sz, cz) = e.z.sin_cos();

        let rot_x = Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, cx, sx, 0.0],
                [0.0, -sx, cx, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        };
        let rot_y = Self {
            rows: [
                [cy, 0.0, -sy, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [sy, 0.0, cy, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        };
        let rot_z = Self {
            rows: [
                [cz, sz, 0.0, 0.0],
                [-sz, cz, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        };

        rot_x * rot_y * rot_z
    }

    /// Composes scale, Euler rotation, and translation into one matrix.
    #[must_use]
    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Vec3, translation: Vec3) -> Self {
        Self::from_scale(scale) * Self::from_euler(rotation) * Self::from_translation(translation)
    }

    /// Returns the translation part (row 3).
    #[must_use]
    pub const fn translation(&self) -> Vec3 {
        Vec3::new(self.rows[3][0], self.rows[3][1], self.rows[3][2])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.rows[r][0] * rhs.rows[0][c]
                    + self.rows[r][1] * rhs.rows[1][c]
                    + self.rows[r][2] * rhs.rows[2][c]
                    + self.rows[r][3] * rhs.rows[3][c];
            }
        }
        Self { rows: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot_and_length() {
        let a = Vec3::new(3.0, 4.0, 0.0);
        assert!((a.length_squared() - 25.0).abs() < f32::EPSILON);
        assert!((a.length() - 5.0).abs() < f32::EPSILON);
        assert!((a.dot(Vec3::X) - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_normalize_or_zero_handles_degenerate() {
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);

        let n = Vec3::new(0.0, 3.0, 0.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_about_axis() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let r = v.reflect(Vec3::Y);
        assert!((r.x - 1.0).abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
        assert!((r.z - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_mat4_translation_row() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::ONE,
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 3.0),
        );
        let t = m.translation();
        assert!((t.x - 1.0).abs() < 1e-6);
        assert!((t.y - 2.0).abs() < 1e-6);
        assert!((t.z - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_axis_indexing() {
        let mut v = Vec3::ZERO;
        v.set_axis(Axis::Z, 4.0);
        assert!((v.axis(Axis::Z) - 4.0).abs() < f32::EPSILON);
        assert!(v.axis(Axis::X).abs() < f32::EPSILON);
    }
}
