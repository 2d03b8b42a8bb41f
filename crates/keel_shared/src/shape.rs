//! Collision geometry.
//!
//! Shapes are stored in local space on a collider and translated into world
//! space once per frame from the owning transform. Rotation is deliberately
//! not applied: spheres are rotation-invariant and the AABB stays
//! axis-aligned by construction.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Sphere: center + radius.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Sphere {
    /// Center in the shape's own space.
    pub center: Vec3,
    /// Radius. Non-positive radii never report a hit.
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns this sphere moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            radius: self.radius,
        }
    }
}

/// Axis-aligned bounding box: min/max corners.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new AABB from min/max corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an AABB centered at `center` with the given half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half extents of the box.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Clamps a point into the box - the closest point on/inside the box.
    #[must_use]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Returns this box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Tagged union over every collision shape a collider can carry.
///
/// `Shape::None` is a valid state: the collider participates in no
/// narrow-phase test until a real shape is assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// No shape assigned; never collides.
    #[default]
    None,
    /// Sphere shape.
    Sphere(Sphere),
    /// Axis-aligned box shape.
    Aabb(Aabb),
}

impl Shape {
    /// `true` when no shape is assigned.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns this shape moved by `offset` (local -> world).
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        match self {
            Self::None => Self::None,
            Self::Sphere(s) => Self::Sphere(s.translated(offset)),
            Self::Aabb(b) => Self::Aabb(b.translated(offset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_translated() {
        let s = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
        let w = s.translated(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(w.center, Vec3::new(1.0, 5.0, 0.0));
        assert!((w.radius - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_aabb_closest_point_clamps() {
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(b.closest_point(Vec3::new(5.0, 0.5, -9.0)), Vec3::new(1.0, 0.5, -1.0));
        // Points inside the box map to themselves.
        assert_eq!(b.closest_point(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_aabb_center_half_extents_roundtrip() {
        let b = Aabb::from_center_half_extents(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.center(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(b.half_extents(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_shape_none_stays_none() {
        assert!(Shape::None.translated(Vec3::ONE).is_none());
    }
}
