//! Pairwise collision detection.
//!
//! Broad phase: every unordered pair of distinct subscribed entities, with
//! an inner scan over each entity's collider list. There is no spatial
//! structure - exhaustive O(n^2) enumeration is acceptable at the engine's
//! target entity counts, and the pair loop is confined to
//! [`CollisionCheckSystem::run`] so an acceleration structure can replace it
//! without touching the narrow phase.
//!
//! Narrow phase: shape-pair predicates using squared comparisons on the hit
//! path, plus penetration geometry for entities that asked for push-back.

use keel_shared::{Aabb, Axis, Shape, Sphere, Vec3};

use crate::components::{Collider, CollisionPushBackInfo, CollisionPushBackType, ContactInfo, Transform};
use crate::ecs::{
    ComponentRegistry, EntityId, EntityRoster, System, SystemCategory, SystemContext,
};

/// Outcome of one narrow-phase test.
///
/// Contact geometry is only computed for sides that asked for push-back;
/// a plain overlap query costs no sqrt.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairTest {
    /// Whether the shapes overlap.
    pub hit: bool,
    /// Penetration data for the first shape's entity, when it pushes back.
    pub contact_a: Option<ContactInfo>,
    /// Penetration data for the second shape's entity, when it pushes back.
    pub contact_b: Option<ContactInfo>,
}

impl PairTest {
    const MISS: Self = Self {
        hit: false,
        contact_a: None,
        contact_b: None,
    };

    const PLAIN_HIT: Self = Self {
        hit: true,
        contact_a: None,
        contact_b: None,
    };

    /// The same test with the two sides swapped.
    #[must_use]
    const fn swapped(self) -> Self {
        Self {
            hit: self.hit,
            contact_a: self.contact_b,
            contact_b: self.contact_a,
        }
    }
}

/// Runs the narrow-phase test for any two world-space shapes.
///
/// `a_push`/`b_push` declare whether each side wants penetration geometry;
/// the overlap is split between the sides that do. Mixed-type dispatch is
/// symmetric: `(Sphere, Aabb)` delegates to the canonical `(Aabb, Sphere)`
/// form with both arguments and roles swapped, so the boolean result cannot
/// depend on argument order. `Shape::None` never hits.
#[must_use]
pub fn check_collision_pair(a: &Shape, b: &Shape, a_push: bool, b_push: bool) -> PairTest {
    match (a, b) {
        (Shape::None, _) | (_, Shape::None) => PairTest::MISS,
        (Shape::Sphere(sa), Shape::Sphere(sb)) => sphere_sphere(sa, sb, a_push, b_push),
        (Shape::Aabb(ba), Shape::Aabb(bb)) => aabb_aabb(ba, bb, a_push, b_push),
        (Shape::Aabb(box_a), Shape::Sphere(sb)) => aabb_sphere(box_a, sb, a_push, b_push),
        (Shape::Sphere(sa), Shape::Aabb(box_b)) => {
            aabb_sphere(box_b, sa, b_push, a_push).swapped()
        }
    }
}

/// Overlap share per pushing side: the full overlap when only one side
/// resolves, half each when both do.
fn overlap_rate(a_push: bool, b_push: bool) -> f32 {
    1.0 / f32::from(u8::from(a_push) + u8::from(b_push))
}

fn sphere_sphere(a: &Sphere, b: &Sphere, a_push: bool, b_push: bool) -> PairTest {
    let diff = a.center - b.center;
    let radius_sum = a.radius + b.radius;
    if diff.length_squared() >= radius_sum * radius_sum {
        return PairTest::MISS;
    }
    if !a_push && !b_push {
        return PairTest::PLAIN_HIT;
    }

    let rate = overlap_rate(a_push, b_push);
    let normal = diff.normalize_or_zero();
    let overlap = radius_sum - diff.length();

    let mut result = PairTest::PLAIN_HIT;
    if a_push {
        let push_vec = normal * overlap * rate;
        result.contact_a = Some(ContactInfo {
            push_vec,
            contact_point: a.center + push_vec.normalize_or_zero() * a.radius,
        });
    }
    if b_push {
        let push_vec = -normal * overlap * rate;
        result.contact_b = Some(ContactInfo {
            push_vec,
            contact_point: b.center + push_vec.normalize_or_zero() * b.radius,
        });
    }
    result
}

fn aabb_aabb(a: &Aabb, b: &Aabb, a_push: bool, b_push: bool) -> PairTest {
    // Strict comparisons: boxes sharing exactly one face still collide
    // (closed-interval convention).
    if a.max.x < b.min.x || a.min.x > b.max.x {
        return PairTest::MISS;
    }
    if a.max.y < b.min.y || a.min.y > b.max.y {
        return PairTest::MISS;
    }
    if a.max.z < b.min.z || a.min.z > b.max.z {
        return PairTest::MISS;
    }
    if !a_push && !b_push {
        return PairTest::PLAIN_HIT;
    }

    // Overlap interval per axis.
    let overlap_min = Vec3::new(
        a.min.x.max(b.min.x),
        a.min.y.max(b.min.y),
        a.min.z.max(b.min.z),
    );
    let overlap_max = Vec3::new(
        a.max.x.min(b.max.x),
        a.max.y.min(b.max.y),
        a.max.z.min(b.max.z),
    );

    // Separate along the axis of least penetration.
    let mut axis = Axis::X;
    let mut min_overlap = overlap_max.x - overlap_min.x;
    for candidate in [Axis::Y, Axis::Z] {
        let overlap = overlap_max.axis(candidate) - overlap_min.axis(candidate);
        if overlap < min_overlap {
            min_overlap = overlap;
            axis = candidate;
        }
    }

    let rate = overlap_rate(a_push, b_push);
    let dir = if a.center().axis(axis) < b.center().axis(axis) {
        -1.0
    } else {
        1.0
    };

    let contact_point = overlap_min + (overlap_max - overlap_min) * rate;

    let mut result = PairTest::PLAIN_HIT;
    if a_push {
        let mut push_vec = Vec3::ZERO;
        push_vec.set_axis(axis, min_overlap * rate * dir);
        result.contact_a = Some(ContactInfo {
            push_vec,
            contact_point,
        });
    }
    if b_push {
        let mut push_vec = Vec3::ZERO;
        push_vec.set_axis(axis, min_overlap * rate * -dir);
        result.contact_b = Some(ContactInfo {
            push_vec,
            contact_point,
        });
    }
    result
}

fn aabb_sphere(a: &Aabb, b: &Sphere, a_push: bool, b_push: bool) -> PairTest {
    let closest = a.closest_point(b.center);
    let to_closest = closest - b.center;
    if to_closest.length_squared() >= b.radius * b.radius {
        return PairTest::MISS;
    }
    if !a_push && !b_push {
        return PairTest::PLAIN_HIT;
    }

    let rate = overlap_rate(a_push, b_push);
    let mut result = PairTest::PLAIN_HIT;

    if a_push {
        result.contact_a = Some(ContactInfo {
            push_vec: to_closest.normalize_or_zero() * (b.radius - to_closest.length()) * rate,
            contact_point: b.center + closest.normalize_or_zero() * b.radius,
        });
    }

    if b_push {
        // Push the sphere out along the dominant axis of separation, so a
        // sphere resting on a box face slides along it instead of drifting.
        let diff = b.center - closest;
        let mut normal = Vec3::ZERO;
        let (ax, ay, az) = (diff.x.abs(), diff.y.abs(), diff.z.abs());
        if ax >= ay && ax >= az {
            normal.x = if diff.x > 0.0 { 1.0 } else { -1.0 };
        } else if ay >= ax && ay >= az {
            normal.y = if diff.y > 0.0 { 1.0 } else { -1.0 };
        } else {
            normal.z = if diff.z > 0.0 { 1.0 } else { -1.0 };
        }

        result.contact_b = Some(ContactInfo {
            push_vec: normal * (b.radius - to_closest.length() * rate),
            contact_point: closest,
        });
    }

    result
}

/// One recorded overlap: which collider of which entity touched whom.
struct PairHit {
    entity: EntityId,
    collider_index: usize,
    other: EntityId,
}

/// The collision check system.
///
/// Runs the full per-frame protocol in the `Collision` category:
///
/// 1. start: every collider snapshots and clears its state maps, world
///    shapes are refreshed from transforms, contact records are cleared
/// 2. scan: every unordered entity pair, every collider pair, through
///    [`check_collision_pair`]
/// 3. apply: record Enter/Stay states and contact geometry
/// 4. end: every collider derives its `Exit` states
///
/// The scan phase reads shapes immutably and buffers its findings; state is
/// written only in the apply phase. The buffers persist across frames to
/// keep the steady-state frame allocation-free.
pub struct CollisionCheckSystem {
    roster: EntityRoster,
    hits: Vec<PairHit>,
    contacts: Vec<(EntityId, EntityId, ContactInfo)>,
}

impl CollisionCheckSystem {
    /// Creates the system with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roster: EntityRoster::new(),
            hits: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Phase 1: open the frame on every subscribed entity.
    fn start_frame(ctx: &mut SystemContext<'_>, snapshot: &[EntityId]) {
        for &entity in snapshot {
            if let Some(transform) = ctx.components.component_mut::<Transform>(entity) {
                transform.update_matrix();
            }
            let translation = ctx
                .components
                .component::<Transform>(entity)
                .map_or(Vec3::ZERO, Transform::world_translation);

            if let Some(colliders) = ctx.components.components_mut::<Collider>(entity) {
                for collider in colliders.iter_mut() {
                    collider.start_collision();
                    if collider.is_active() {
                        collider.update_world_shape(translation);
                    }
                }
            }

            if let Some(info) = ctx.components.component_mut::<CollisionPushBackInfo>(entity) {
                info.clear_contacts();
            }
        }
    }

    /// Phase 2: the exhaustive pair scan. Findings go into the buffers.
    fn scan_pairs(&mut self, components: &ComponentRegistry, snapshot: &[EntityId]) {
        for (i, &a) in snapshot.iter().enumerate() {
            let a_push = wants_push_back(components, a);
            let Some(a_colliders) = components.components::<Collider>(a) else {
                continue;
            };

            for &b in &snapshot[i + 1..] {
                let b_push = wants_push_back(components, b);
                let Some(b_colliders) = components.components::<Collider>(b) else {
                    continue;
                };

                for (ai, collider_a) in a_colliders.iter().enumerate() {
                    if !collider_a.is_active() {
                        continue;
                    }
                    for (bi, collider_b) in b_colliders.iter().enumerate() {
                        if !collider_b.is_active() {
                            continue;
                        }

                        let test = check_collision_pair(
                            collider_a.world_shape(),
                            collider_b.world_shape(),
                            a_push,
                            b_push,
                        );
                        if !test.hit {
                            continue;
                        }

                        self.hits.push(PairHit {
                            entity: a,
                            collider_index: ai,
                            other: b,
                        });
                        self.hits.push(PairHit {
                            entity: b,
                            collider_index: bi,
                            other: a,
                        });
                        if let Some(info) = test.contact_a {
                            self.contacts.push((a, b, info));
                        }
                        if let Some(info) = test.contact_b {
                            self.contacts.push((b, a, info));
                        }
                    }
                }
            }
        }
    }

    /// Phase 3: write the buffered findings back into components.
    ///
    /// Deferring the writes is observationally identical to writing inside
    /// the scan: `set_collision_state` reads only the receiver's pre-frame
    /// snapshot, and each (receiver, other) key is written by exactly one
    /// pair.
    fn apply_findings(&mut self, ctx: &mut SystemContext<'_>) {
        for hit in self.hits.drain(..) {
            if let Some(collider) =
                ctx.components.component_at_mut::<Collider>(hit.entity, hit.collider_index)
            {
                collider.set_collision_state(hit.other);
            }
        }
        for (entity, other, info) in self.contacts.drain(..) {
            if let Some(record) = ctx.components.component_mut::<CollisionPushBackInfo>(entity) {
                record.add_contact(other, info);
            }
        }
    }

    /// Phase 4: close the frame on every subscribed entity.
    fn end_frame(ctx: &mut SystemContext<'_>, snapshot: &[EntityId]) {
        for &entity in snapshot {
            if let Some(colliders) = ctx.components.components_mut::<Collider>(entity) {
                for collider in colliders.iter_mut() {
                    collider.end_collision();
                }
            }
        }
    }
}

/// `true` when the entity records penetration geometry.
fn wants_push_back(components: &ComponentRegistry, entity: EntityId) -> bool {
    components
        .component::<CollisionPushBackInfo>(entity)
        .is_some_and(|info| info.push_back_type() != CollisionPushBackType::None)
}

impl Default for CollisionCheckSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CollisionCheckSystem {
    fn category(&self) -> SystemCategory {
        SystemCategory::Collision
    }

    fn initialize(&mut self, ctx: &mut SystemContext<'_>) {
        ctx.components.register_array::<Transform>();
        ctx.components.register_array::<Collider>();
        ctx.components.register_array::<CollisionPushBackInfo>();
    }

    fn finalize(&mut self) {
        self.hits.clear();
        self.contacts.clear();
    }

    fn roster(&self) -> &EntityRoster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut EntityRoster {
        &mut self.roster
    }

    /// The three-phase protocol replaces the default per-entity dispatch.
    ///
    /// The id list is snapshotted once at the top: entities despawned by
    /// gameplay code mid-frame still finish this frame and leave the roster
    /// at the start of the next.
    fn run(&mut self, ctx: &mut SystemContext<'_>) {
        self.roster_mut().prune_dead(ctx.entities);
        let snapshot = self.roster().snapshot();

        Self::start_frame(ctx, &snapshot);
        self.scan_pairs(ctx.components, &snapshot);
        self.apply_findings(ctx);
        Self::end_frame(ctx, &snapshot);
    }
}
