//! Rigidbody integration: velocity from acceleration, position from
//! velocity.

use crate::components::{Rigidbody, Transform};
use crate::config::EngineConfig;
use crate::ecs::{EntityId, EntityRoster, System, SystemCategory, SystemContext};

/// Moves entities by their rigidbody state, in the `Movement` category.
///
/// Per entity and frame:
/// - gravity feeds into the acceleration (scaled by mass, capped by the
///   fall-speed limit)
/// - velocity integrates the acceleration, then is clamped on the XZ plane
///   and vertically
/// - the translation integrates the velocity and the world matrix is
///   refreshed
pub struct RigidbodyMovementSystem {
    roster: EntityRoster,
    gravity: f32,
}

impl RigidbodyMovementSystem {
    /// Creates the system with an explicit gravity acceleration.
    #[must_use]
    pub fn new(gravity: f32) -> Self {
        Self {
            roster: EntityRoster::new(),
            gravity,
        }
    }

    /// Creates the system with the configured gravity.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.gravity)
    }
}

impl System for RigidbodyMovementSystem {
    fn category(&self) -> SystemCategory {
        SystemCategory::Movement
    }

    fn initialize(&mut self, ctx: &mut SystemContext<'_>) {
        ctx.components.register_array::<Transform>();
        ctx.components.register_array::<Rigidbody>();
    }

    fn roster(&self) -> &EntityRoster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut EntityRoster {
        &mut self.roster
    }

    fn update_entity(&mut self, ctx: &mut SystemContext<'_>, entity: EntityId) {
        let has_transform = ctx.components.has_component::<Transform>(entity);
        let has_rigidbody = ctx.components.has_component::<Rigidbody>(entity);
        if !has_transform || !has_rigidbody {
            if !has_transform {
                tracing::error!("{entity} is subscribed to movement but has no Transform");
            }
            if !has_rigidbody {
                tracing::error!("{entity} is subscribed to movement but has no Rigidbody");
            }
            return;
        }

        let delta_time = ctx.delta_time;
        let gravity = self.gravity;

        let Some(rigidbody) = ctx.components.component_mut::<Rigidbody>(entity) else {
            return;
        };
        if !rigidbody.is_active() {
            return;
        }

        // --- velocity update ---
        let mut acceleration = rigidbody.acceleration();
        let max_fall_speed = rigidbody.max_fall_speed();
        if rigidbody.use_gravity() {
            acceleration.y -= (gravity * rigidbody.mass()).min(max_fall_speed);
        }
        rigidbody.set_acceleration(acceleration);

        let mut velocity = rigidbody.velocity() + acceleration * delta_time;

        // XZ plane speed cap.
        let max_xz = rigidbody.max_xz_speed();
        let xz_sq = velocity.x * velocity.x + velocity.z * velocity.z;
        if xz_sq >= max_xz * max_xz {
            let scale = max_xz / xz_sq.sqrt();
            velocity.x *= scale;
            velocity.z *= scale;
        }
        // Vertical speed cap.
        if velocity.y * velocity.y >= max_fall_speed * max_fall_speed {
            velocity.y = if velocity.y > 0.0 {
                max_fall_speed
            } else {
                -max_fall_speed
            };
        }
        rigidbody.set_velocity(velocity);

        // --- position update ---
        let step = velocity * delta_time;
        if let Some(transform) = ctx.components.component_mut::<Transform>(entity) {
            transform.translate += step;
            transform.update_matrix();
        }
    }
}
