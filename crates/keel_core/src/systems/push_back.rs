//! Collision resolution: translate entities out of penetration.

use crate::components::{CollisionPushBackInfo, CollisionPushBackType, ContactInfo, Rigidbody, Transform};
use crate::ecs::{EntityId, EntityRoster, System, SystemCategory, SystemContext};

/// Applies the resolution policy to every contact the collision check
/// recorded this frame.
///
/// Runs in the `Collision` category and must be registered *after*
/// [`CollisionCheckSystem`](crate::CollisionCheckSystem), so the contact
/// records it consumes are from the current frame.
pub struct CollisionPushBackSystem {
    roster: EntityRoster,
}

impl CollisionPushBackSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roster: EntityRoster::new(),
        }
    }
}

impl Default for CollisionPushBackSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CollisionPushBackSystem {
    fn category(&self) -> SystemCategory {
        SystemCategory::Collision
    }

    fn roster(&self) -> &EntityRoster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut EntityRoster {
        &mut self.roster
    }

    fn update_entity(&mut self, ctx: &mut SystemContext<'_>, entity: EntityId) {
        let has_transform = ctx.components.has_component::<Transform>(entity);
        let record = ctx.components.component::<CollisionPushBackInfo>(entity);

        // A malformed entity is skipped, never fatal: one bad subscription
        // must not abort the frame.
        if !has_transform || record.is_none() {
            if !has_transform {
                tracing::error!("{entity} is subscribed to push-back but has no Transform");
            }
            if record.is_none() {
                tracing::error!(
                    "{entity} is subscribed to push-back but has no CollisionPushBackInfo"
                );
            }
            return;
        }

        let record = record.unwrap_or_else(|| unreachable!("checked above"));
        let push_back_type = record.push_back_type();
        if push_back_type == CollisionPushBackType::None {
            return;
        }
        let contacts: Vec<ContactInfo> = record.contacts().values().copied().collect();
        if contacts.is_empty() {
            return;
        }

        for contact in &contacts {
            // Common part of both policies: clear the penetration.
            if let Some(transform) = ctx.components.component_mut::<Transform>(entity) {
                transform.translate += contact.push_vec;
            }

            if push_back_type == CollisionPushBackType::Reflect {
                if let Some(rigidbody) = ctx.components.component_mut::<Rigidbody>(entity) {
                    let normal = contact.push_vec.normalize_or_zero();
                    if normal.length_squared() > 0.0 {
                        let reflected = rigidbody.velocity().reflect(normal);
                        rigidbody.set_velocity(reflected);

                        // Keep the acceleration magnitude, point it where the
                        // body is now heading.
                        let magnitude = rigidbody.acceleration().length();
                        rigidbody.set_acceleration(reflected.normalize_or_zero() * magnitude);
                    }
                }
            }
        }

        if let Some(transform) = ctx.components.component_mut::<Transform>(entity) {
            transform.update_matrix();
        }
    }
}

#[cfg(test)]
mod tests {
    use keel_shared::Vec3;

    use super::*;
    use crate::ecs::SystemRunner;
    use crate::scene::Scene;

    fn setup(policy: CollisionPushBackType) -> (Scene, SystemRunner, EntityId) {
        let mut scene = Scene::new();
        let entity = scene.spawn("crate");
        scene
            .components_mut()
            .add_component(entity, Transform::at(Vec3::ZERO));
        scene
            .components_mut()
            .add_component(entity, CollisionPushBackInfo::new(policy));

        let mut runner = SystemRunner::new();
        runner.register(Box::new(CollisionPushBackSystem::new()));
        runner.subscribe(entity);

        (scene, runner, entity)
    }

    fn record_contact(scene: &mut Scene, entity: EntityId, push_vec: Vec3) {
        scene
            .components_mut()
            .component_mut::<CollisionPushBackInfo>(entity)
            .unwrap()
            .add_contact(
                EntityId::new(99),
                ContactInfo {
                    push_vec,
                    contact_point: Vec3::ZERO,
                },
            );
    }

    #[test]
    fn test_none_policy_is_inert() {
        let (mut scene, mut runner, entity) = setup(CollisionPushBackType::None);
        scene.components_mut().add_component(entity, Rigidbody::new());
        scene
            .components_mut()
            .component_mut::<Rigidbody>(entity)
            .unwrap()
            .set_velocity(Vec3::new(1.0, 0.0, 0.0));
        record_contact(&mut scene, entity, Vec3::new(0.0, 3.0, 0.0));

        runner.run_frame(&mut scene, 0.016);

        let transform = scene.components().component::<Transform>(entity).unwrap();
        assert_eq!(transform.translate, Vec3::ZERO);
        let rigidbody = scene.components().component::<Rigidbody>(entity).unwrap();
        assert_eq!(rigidbody.velocity(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_push_back_translates_out() {
        let (mut scene, mut runner, entity) = setup(CollisionPushBackType::PushBack);
        record_contact(&mut scene, entity, Vec3::new(-0.25, 0.0, 0.0));

        runner.run_frame(&mut scene, 0.016);

        let transform = scene.components().component::<Transform>(entity).unwrap();
        assert!((transform.translate.x + 0.25).abs() < 1e-6);
        // The world matrix was refreshed along with the translation.
        assert!((transform.world_translation().x + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_mirrors_velocity() {
        let (mut scene, mut runner, entity) = setup(CollisionPushBackType::Reflect);
        scene.components_mut().add_component(entity, Rigidbody::new());
        {
            let rigidbody = scene
                .components_mut()
                .component_mut::<Rigidbody>(entity)
                .unwrap();
            rigidbody.set_velocity(Vec3::new(0.0, -2.0, 0.0));
            rigidbody.set_acceleration(Vec3::new(0.0, -5.0, 0.0));
        }
        // Contact from below: normal is +Y.
        record_contact(&mut scene, entity, Vec3::new(0.0, 0.5, 0.0));

        runner.run_frame(&mut scene, 0.016);

        let rigidbody = scene.components().component::<Rigidbody>(entity).unwrap();
        assert_eq!(rigidbody.velocity(), Vec3::new(0.0, 2.0, 0.0));
        // Acceleration keeps its magnitude, now pointing with the velocity.
        assert!((rigidbody.acceleration().y - 5.0).abs() < 1e-5);

        let transform = scene.components().component::<Transform>(entity).unwrap();
        assert!((transform.translate.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_missing_components_skip_entity() {
        let mut scene = Scene::new();
        let broken = scene.spawn("broken");
        // Subscribed with neither Transform nor CollisionPushBackInfo.
        let mut runner = SystemRunner::new();
        runner.register(Box::new(CollisionPushBackSystem::new()));
        runner.subscribe(broken);

        // Must not panic; the frame carries on.
        runner.run_frame(&mut scene, 0.016);
        assert!(scene.entities().is_alive(broken));
    }
}
