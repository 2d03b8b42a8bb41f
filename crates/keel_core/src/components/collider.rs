//! Collision volume of an entity, plus the per-pair contact state machine.
//!
//! Enter/Stay/Exit transitions are not queued as events. Each collider keeps
//! two plain maps - this frame's contact states and the previous frame's -
//! and every transition is derived locally by diffing the two. The protocol
//! is driven by the collision check system, once per frame, in this order:
//!
//! 1. [`Collider::start_collision`] on every collider (snapshot + clear)
//! 2. [`Collider::update_world_shape`] from the owning transform
//! 3. [`Collider::set_collision_state`] per overlapping pair
//! 4. [`Collider::end_collision`] on every collider (derive `Exit`)

use std::collections::HashMap;

use keel_shared::{Shape, Vec3};
use serde::{Deserialize, Serialize};

use crate::ecs::{Component, EntityId};

/// Contact status of an ordered entity pair, for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionState {
    /// Not in contact.
    #[default]
    None,
    /// Contact began this frame.
    Enter,
    /// Contact continued from the previous frame.
    Stay,
    /// Contact ended this frame.
    Exit,
}

/// Collision volume component.
///
/// The local shape is authored data; the world shape is derived once per
/// frame by translating the local shape to the owner's world position.
/// Rotation is intentionally not applied (see [`keel_shared::shape`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Collider {
    /// Local-space shape.
    shape: Shape,
    /// World-space shape, refreshed each frame.
    #[serde(skip)]
    world_shape: Shape,
    /// Inactive colliders take part in no pair test.
    is_active: bool,
    /// Other entity -> contact state, this frame.
    #[serde(skip)]
    collision_state_map: HashMap<EntityId, CollisionState>,
    /// Other entity -> contact state, previous frame.
    #[serde(skip)]
    pre_collision_state_map: HashMap<EntityId, CollisionState>,
}

impl Collider {
    /// Creates an active collider with the given local shape.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            world_shape: shape,
            is_active: true,
            collision_state_map: HashMap::new(),
            pre_collision_state_map: HashMap::new(),
        }
    }

    /// Local-space shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Replaces the local shape. The world shape catches up on the next
    /// [`Self::update_world_shape`].
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.world_shape = shape;
    }

    /// World-space shape as of the last refresh.
    #[must_use]
    pub fn world_shape(&self) -> &Shape {
        &self.world_shape
    }

    /// Whether this collider takes part in pair tests.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Enables or disables this collider.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Begins a collision frame: the current state map becomes the previous
    /// map, and the current map starts empty.
    ///
    /// This must run on *every* active collider before any pair test of the
    /// frame - the pair loop is free to visit colliders in any order, and no
    /// test may observe a half-cleared map.
    pub fn start_collision(&mut self) {
        self.pre_collision_state_map = std::mem::take(&mut self.collision_state_map);
    }

    /// Recomputes the world shape from the owner's world translation.
    pub fn update_world_shape(&mut self, world_translation: Vec3) {
        self.world_shape = self.shape.translated(world_translation);
    }

    /// Records a contact with `other` this frame.
    ///
    /// The transition is derived from this collider's *own* previous map:
    /// no entry (or `None`) last frame means `Enter`, anything else `Stay`.
    pub fn set_collision_state(&mut self, other: EntityId) {
        let was_touching = !matches!(
            self.pre_collision_state_map.get(&other),
            None | Some(CollisionState::None)
        );
        let state = if was_touching {
            CollisionState::Stay
        } else {
            CollisionState::Enter
        };
        self.collision_state_map.insert(other, state);
    }

    /// Ends a collision frame: every contact present last frame but absent
    /// this frame becomes `Exit`.
    ///
    /// Entries that were already `Exit` last frame are skipped individually,
    /// so a lost contact emits `Exit` exactly once and then drops out of
    /// both maps.
    pub fn end_collision(&mut self) {
        for (&other, &state) in &self.pre_collision_state_map {
            if state == CollisionState::Exit {
                continue;
            }
            let current = self
                .collision_state_map
                .get(&other)
                .copied()
                .unwrap_or_default();
            if current == CollisionState::None {
                self.collision_state_map.insert(other, CollisionState::Exit);
            }
        }
    }

    /// This frame's contact state with `other` (`None` when untracked).
    #[must_use]
    pub fn collision_state(&self, other: EntityId) -> CollisionState {
        self.collision_state_map
            .get(&other)
            .copied()
            .unwrap_or_default()
    }

    /// This frame's full contact state map.
    #[must_use]
    pub fn collision_state_map(&self) -> &HashMap<EntityId, CollisionState> {
        &self.collision_state_map
    }
}

impl Default for Collider {
    /// An active collider with no shape: tracked, but never colliding until
    /// a shape is assigned.
    fn default() -> Self {
        Self::new(Shape::None)
    }
}

impl Component for Collider {
    fn type_name() -> &'static str {
        "Collider"
    }

    fn finalize(&mut self) {
        self.collision_state_map.clear();
        self.pre_collision_state_map.clear();
    }
}

#[cfg(test)]
mod tests {
    use keel_shared::Sphere;

    use super::*;

    fn other() -> EntityId {
        EntityId::new(9)
    }

    /// Drives one protocol frame with an optional contact.
    fn frame(collider: &mut Collider, touching: bool) {
        collider.start_collision();
        if touching {
            collider.set_collision_state(other());
        }
        collider.end_collision();
    }

    #[test]
    fn test_enter_stay_exit_sequence() {
        let mut c = Collider::new(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0)));

        frame(&mut c, false);
        assert_eq!(c.collision_state(other()), CollisionState::None);

        frame(&mut c, true);
        assert_eq!(c.collision_state(other()), CollisionState::Enter);

        frame(&mut c, true);
        assert_eq!(c.collision_state(other()), CollisionState::Stay);

        frame(&mut c, false);
        assert_eq!(c.collision_state(other()), CollisionState::Exit);

        // The pair drops out of tracking entirely - no repeated Exit.
        frame(&mut c, false);
        assert_eq!(c.collision_state(other()), CollisionState::None);
        assert!(c.collision_state_map().is_empty());
    }

    #[test]
    fn test_retouch_after_exit_is_enter() {
        let mut c = Collider::new(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0)));

        frame(&mut c, true);
        frame(&mut c, false);
        assert_eq!(c.collision_state(other()), CollisionState::Exit);

        frame(&mut c, true);
        assert_eq!(c.collision_state(other()), CollisionState::Enter);
    }

    #[test]
    fn test_exit_per_entry_not_per_map() {
        // Two contacts lost on different frames: each still gets its Exit,
        // regardless of where the other sits in map iteration order.
        let mut c = Collider::new(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0)));
        let first = EntityId::new(1);
        let second = EntityId::new(2);

        c.start_collision();
        c.set_collision_state(first);
        c.set_collision_state(second);
        c.end_collision();

        // `first` is lost, `second` stays.
        c.start_collision();
        c.set_collision_state(second);
        c.end_collision();
        assert_eq!(c.collision_state(first), CollisionState::Exit);
        assert_eq!(c.collision_state(second), CollisionState::Stay);

        // Now `second` is lost; the stale Exit entry for `first` must not
        // short-circuit the diff.
        c.start_collision();
        c.end_collision();
        assert_eq!(c.collision_state(second), CollisionState::Exit);
        assert_eq!(c.collision_state(first), CollisionState::None);
    }

    #[test]
    fn test_world_shape_refresh() {
        let mut c = Collider::new(Shape::Sphere(Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0)));
        c.update_world_shape(Vec3::new(0.0, 5.0, 0.0));

        let Shape::Sphere(world) = c.world_shape() else {
            panic!("shape kind must be preserved");
        };
        assert_eq!(world.center, Vec3::new(1.0, 5.0, 0.0));
    }

    #[test]
    fn test_finalize_clears_state() {
        let mut c = Collider::new(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0)));
        frame(&mut c, true);

        Component::finalize(&mut c);
        assert!(c.collision_state_map().is_empty());
    }
}
