// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit compilation: one controller's ray, resolved into an ordered list
//! of (intersection, event target) pairs.
//!
//! A raw intersection names a geometry leaf; the event targets are every
//! *registered* node on that leaf's ancestor chain, self-inclusive and
//! near-to-far, with no early termination — one hit on a mesh nested in
//! two registered groups yields three pairs for the same intersection.
//! The flat list is ordered primarily by intersection distance and
//! secondarily by ancestor nearness.

use std::collections::HashSet;
use std::rc::Rc;

use glam::Vec3;
use pointwood_scene::{Intersection, NodeId, Pose, Ray, Scene};

use crate::registry::Registry;
use crate::types::Controller;

/// One (intersection, target) pair of a compiled hit list.
#[derive(Clone, Debug)]
pub struct HitPair {
    /// The geometric intersection behind this pair.
    pub intersection: Intersection,
    /// The registered ancestor (or the hit node itself) to dispatch to.
    pub target: NodeId,
}

/// One controller's resolved hits for one evaluation.
#[derive(Clone, Debug)]
pub struct CompiledHits {
    /// Flat dispatch list: distance-ordered, then ancestor-near-to-far.
    pub pairs: Vec<HitPair>,
    /// Every raw intersection, distance-ordered. Shared into each event.
    pub intersections: Rc<[Intersection]>,
    /// Identity set of every target yielded, for O(1) "was this node hit
    /// at all" queries.
    pub hit_set: HashSet<NodeId>,
}

impl CompiledHits {
    /// An empty result (used when the registry is empty and the cast is
    /// skipped entirely).
    pub fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            intersections: Vec::new().into(),
            hit_set: HashSet::new(),
        }
    }
}

/// The pointing ray of a controller pose: origin at the controller's
/// world position, direction its local `-Z` rotated into world space
/// (translation and scale excluded).
pub fn controller_ray(pose: Pose) -> Ray {
    Ray::new(pose.position, pose.rotation * Vec3::NEG_Z)
}

/// Cast `controller`'s ray against every registered subtree and compile
/// the flat dispatch list.
///
/// World poses must be current; the engine runs
/// [`Scene::update_world`] before compiling.
pub fn compile_hits(scene: &Scene, registry: &Registry, controller: &Controller) -> CompiledHits {
    if registry.is_empty() {
        return CompiledHits::empty();
    }
    let ray = controller_ray(controller.pose);
    let intersections = scene.cast_ray(ray, registry.targets().iter().copied());

    let mut pairs = Vec::new();
    let mut hit_set = HashSet::new();
    for intersection in &intersections {
        for target in scene.ancestors(intersection.node) {
            if registry.contains(target) {
                pairs.push(HitPair {
                    intersection: *intersection,
                    target,
                });
                hit_set.insert(target);
            }
        }
    }
    CompiledHits {
        pairs,
        intersections: intersections.into(),
        hit_set,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ControllerId, Handedness};
    use glam::Quat;
    use pointwood_scene::{Collider, LocalNode};

    const EPS: f32 = 1e-5;

    fn controller(pose: Pose) -> Controller {
        Controller {
            id: ControllerId(0),
            handedness: Handedness::Right,
            pose,
        }
    }

    fn noop(
        reg: &mut Registry,
        node: NodeId,
        kind: crate::types::InteractionKind,
    ) -> crate::types::HandlerId {
        reg.register(node, kind, |_, _| {})
    }

    #[test]
    fn ray_points_along_rotated_forward_axis() {
        let ray = controller_ray(Pose::IDENTITY);
        assert!((ray.direction - Vec3::NEG_Z).length() < EPS);

        // A half turn about Y points the ray down +Z, from wherever the
        // controller sits.
        let pose = Pose::new(Vec3::new(5.0, 1.0, 0.0), Quat::from_rotation_y(core::f32::consts::PI));
        let ray = controller_ray(pose);
        assert!((ray.origin - pose.position).length() < EPS);
        assert!((ray.direction - Vec3::Z).length() < EPS);
    }

    #[test]
    fn empty_registry_short_circuits() {
        let mut scene = Scene::new();
        let _ball = scene.insert(
            None,
            LocalNode {
                pose: Pose::from_position(Vec3::new(0.0, 0.0, -2.0)),
                collider: Some(Collider::Sphere { radius: 1.0 }),
            },
        );
        scene.update_world();
        let reg = Registry::new();
        let hits = compile_hits(&scene, &reg, &controller(Pose::IDENTITY));
        assert!(hits.pairs.is_empty());
        assert!(hits.intersections.is_empty());
        assert!(hits.hit_set.is_empty());
    }

    #[test]
    fn ancestors_expand_near_to_far_per_intersection() {
        let mut scene = Scene::new();
        let grandparent = scene.insert(None, LocalNode::default());
        let parent = scene.insert(Some(grandparent), LocalNode::default());
        let leaf = scene.insert(
            Some(parent),
            LocalNode {
                pose: Pose::from_position(Vec3::new(0.0, 0.0, -3.0)),
                collider: Some(Collider::Sphere { radius: 0.5 }),
            },
        );
        scene.update_world();

        let mut reg = Registry::new();
        noop(&mut reg, grandparent, crate::types::InteractionKind::Select);
        noop(&mut reg, parent, crate::types::InteractionKind::Select);

        let hits = compile_hits(&scene, &reg, &controller(Pose::IDENTITY));
        assert_eq!(hits.intersections.len(), 1);
        let targets: Vec<NodeId> = hits.pairs.iter().map(|p| p.target).collect();
        // The leaf itself is unregistered and yields no pair; parent
        // comes before grandparent.
        assert_eq!(targets, vec![parent, grandparent]);
        assert!(hits.hit_set.contains(&parent));
        assert!(hits.hit_set.contains(&grandparent));
        assert!(!hits.hit_set.contains(&leaf));
    }

    #[test]
    fn distance_order_is_primary_ancestor_order_secondary() {
        let mut scene = Scene::new();
        let near_group = scene.insert(None, LocalNode::default());
        let near_leaf = scene.insert(
            Some(near_group),
            LocalNode {
                pose: Pose::from_position(Vec3::new(0.0, 0.0, -2.0)),
                collider: Some(Collider::Sphere { radius: 0.5 }),
            },
        );
        let far = scene.insert(
            None,
            LocalNode {
                pose: Pose::from_position(Vec3::new(0.0, 0.0, -8.0)),
                collider: Some(Collider::Sphere { radius: 0.5 }),
            },
        );
        scene.update_world();

        let mut reg = Registry::new();
        noop(&mut reg, far, crate::types::InteractionKind::Select);
        noop(&mut reg, near_leaf, crate::types::InteractionKind::Select);
        noop(&mut reg, near_group, crate::types::InteractionKind::Select);

        let hits = compile_hits(&scene, &reg, &controller(Pose::IDENTITY));
        let targets: Vec<NodeId> = hits.pairs.iter().map(|p| p.target).collect();
        assert_eq!(targets, vec![near_leaf, near_group, far]);
        // Both pairs of the near intersection share one distance.
        assert!((hits.pairs[0].intersection.distance - hits.pairs[1].intersection.distance).abs() < EPS);
        assert!(hits.pairs[2].intersection.distance > hits.pairs[0].intersection.distance);
    }

    #[test]
    fn registered_group_exposes_descendant_geometry() {
        let mut scene = Scene::new();
        let group = scene.insert(None, LocalNode::default());
        let mesh = scene.insert(
            Some(group),
            LocalNode {
                pose: Pose::from_position(Vec3::new(0.0, 0.0, -4.0)),
                collider: Some(Collider::Cuboid {
                    half_extents: Vec3::splat(0.5),
                }),
            },
        );
        scene.update_world();

        // Only the group carries handlers; the mesh is still testable.
        let mut reg = Registry::new();
        noop(&mut reg, group, crate::types::InteractionKind::Hover);

        let hits = compile_hits(&scene, &reg, &controller(Pose::IDENTITY));
        assert_eq!(hits.intersections.len(), 1);
        assert_eq!(hits.intersections[0].node, mesh);
        assert_eq!(hits.pairs.len(), 1);
        assert_eq!(hits.pairs[0].target, group);
    }
}
