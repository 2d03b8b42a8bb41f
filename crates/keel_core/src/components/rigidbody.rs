//! Linear physics state of an entity.

use keel_shared::Vec3;
use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Velocity/acceleration state consumed by the movement system and the
/// `Reflect` push-back policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rigidbody {
    velocity: Vec3,
    acceleration: Vec3,
    mass: f32,
    use_gravity: bool,
    max_xz_speed: f32,
    max_fall_speed: f32,
    is_active: bool,
}

impl Rigidbody {
    /// Creates a rigidbody at rest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Sets the velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Current acceleration.
    #[must_use]
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Sets the acceleration.
    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Mass in arbitrary gameplay units; scales gravity.
    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Sets the mass.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    /// Whether gravity applies to this body.
    #[must_use]
    pub fn use_gravity(&self) -> bool {
        self.use_gravity
    }

    /// Enables or disables gravity for this body.
    pub fn set_use_gravity(&mut self, use_gravity: bool) {
        self.use_gravity = use_gravity;
    }

    /// Speed cap on the XZ plane.
    #[must_use]
    pub fn max_xz_speed(&self) -> f32 {
        self.max_xz_speed
    }

    /// Sets the XZ speed cap.
    pub fn set_max_xz_speed(&mut self, max_xz_speed: f32) {
        self.max_xz_speed = max_xz_speed;
    }

    /// Vertical speed cap.
    #[must_use]
    pub fn max_fall_speed(&self) -> f32 {
        self.max_fall_speed
    }

    /// Sets the vertical speed cap.
    pub fn set_max_fall_speed(&mut self, max_fall_speed: f32) {
        self.max_fall_speed = max_fall_speed;
    }

    /// Whether the movement system integrates this body.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Enables or disables integration.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            mass: 1.0,
            use_gravity: false,
            max_xz_speed: f32::MAX,
            max_fall_speed: f32::MAX,
            is_active: true,
        }
    }
}

impl Component for Rigidbody {
    fn type_name() -> &'static str {
        "Rigidbody"
    }
}
