//! World placement of an entity.

use keel_shared::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Scale / rotation / translation plus the cached world matrix.
///
/// The matrix is derived state: it is rebuilt by [`Self::update_matrix`]
/// (systems call it once per frame before anything reads world-space data)
/// and is not serialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transform {
    /// Scale factors per axis.
    pub scale: Vec3,
    /// Euler rotation in radians, applied X then Y then Z.
    pub rotate: Vec3,
    /// Translation in world units.
    pub translate: Vec3,
    /// Cached world matrix; translation lives in row 3.
    #[serde(skip)]
    pub world_mat: Mat4,
}

impl Transform {
    /// Creates a transform at `translate` with unit scale and no rotation.
    #[must_use]
    pub fn at(translate: Vec3) -> Self {
        let mut transform = Self {
            translate,
            ..Self::default()
        };
        transform.update_matrix();
        transform
    }

    /// Rebuilds the world matrix from scale, rotation, and translation.
    pub fn update_matrix(&mut self) {
        self.world_mat =
            Mat4::from_scale_rotation_translation(self.scale, self.rotate, self.translate);
    }

    /// World-space position, read from the cached matrix.
    #[must_use]
    pub fn world_translation(&self) -> Vec3 {
        self.world_mat.translation()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotate: Vec3::ZERO,
            translate: Vec3::ZERO,
            world_mat: Mat4::IDENTITY,
        }
    }
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_translation_follows_translate() {
        let mut t = Transform::default();
        t.translate = Vec3::new(3.0, -1.0, 2.0);
        assert_eq!(t.world_translation(), Vec3::ZERO, "stale until update_matrix");

        t.update_matrix();
        let w = t.world_translation();
        assert!((w.x - 3.0).abs() < 1e-6);
        assert!((w.y + 1.0).abs() < 1e-6);
        assert!((w.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_at_is_pre_updated() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        assert!((t.world_translation().y - 2.0).abs() < 1e-6);
    }
}
