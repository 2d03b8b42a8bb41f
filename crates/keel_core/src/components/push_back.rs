//! Collision resolution policy and the recorded contact geometry.

use std::collections::HashMap;

use keel_shared::Vec3;
use serde::{Deserialize, Serialize};

use crate::ecs::{Component, EntityId};

/// How the push-back system resolves a recorded contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPushBackType {
    /// Record contacts, apply no response.
    #[default]
    None,
    /// Translate the entity out of penetration.
    PushBack,
    /// Translate out of penetration and mirror the velocity about the
    /// contact normal.
    Reflect,
}

/// Penetration data for one contact, computed by the narrow phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactInfo {
    /// Separation vector: points from the penetrating entity toward the
    /// free side, scaled to clear the overlap.
    pub push_vec: Vec3,
    /// Contact point in world space.
    pub contact_point: Vec3,
}

/// Per-entity contact record consumed by the push-back system.
///
/// The contact map is transient frame state: the collision check system
/// clears it at the start of every frame and refills it from the narrow
/// phase, keyed by the other entity's handle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollisionPushBackInfo {
    /// Resolution policy for this entity.
    push_back_type: CollisionPushBackType,
    /// Other entity -> contact recorded this frame.
    #[serde(skip)]
    contacts: HashMap<EntityId, ContactInfo>,
}

impl CollisionPushBackInfo {
    /// Creates a record with the given policy.
    #[must_use]
    pub fn new(push_back_type: CollisionPushBackType) -> Self {
        Self {
            push_back_type,
            contacts: HashMap::new(),
        }
    }

    /// The resolution policy.
    #[must_use]
    pub fn push_back_type(&self) -> CollisionPushBackType {
        self.push_back_type
    }

    /// Sets the resolution policy.
    pub fn set_push_back_type(&mut self, push_back_type: CollisionPushBackType) {
        self.push_back_type = push_back_type;
    }

    /// Records the contact with `other` for this frame.
    pub fn add_contact(&mut self, other: EntityId, info: ContactInfo) {
        self.contacts.insert(other, info);
    }

    /// Contacts recorded this frame.
    #[must_use]
    pub fn contacts(&self) -> &HashMap<EntityId, ContactInfo> {
        &self.contacts
    }

    /// Drops every recorded contact (start of frame).
    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }
}

impl Component for CollisionPushBackInfo {
    fn type_name() -> &'static str {
        "CollisionPushBackInfo"
    }

    fn finalize(&mut self) {
        self.contacts.clear();
    }
}
