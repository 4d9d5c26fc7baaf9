// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointwood Scene: a generational 3D scene arena with rigid poses and ray casting.
//!
//! Pointwood Scene is the spatial substrate for ray-driven interaction: a
//! tree of nodes addressed by stable generational handles, each with a
//! local [`Pose`] (position + orientation, no scale), an optional
//! [`Collider`], and a parent link. Nothing here owns application state;
//! higher layers key their own side tables by [`NodeId`].
//!
//! - Parent links form a tree (no cycles; a reparent under a descendant is
//!   rejected as a no-op).
//! - World poses are cached and recomputed by [`Scene::update_world`],
//!   which walks every root recursively.
//! - [`Scene::cast_ray`] intersects a ray with the subtrees of a set of
//!   roots, visiting each node at most once even when roots are nested,
//!   and returns hits sorted by increasing distance.
//!
//! # Example
//!
//! ```
//! use pointwood_scene::{Collider, LocalNode, Pose, Ray, Scene};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let group = scene.insert(None, LocalNode::default());
//! let ball = scene.insert(
//!     Some(group),
//!     LocalNode {
//!         pose: Pose::from_position(Vec3::new(0.0, 0.0, -3.0)),
//!         collider: Some(Collider::Sphere { radius: 0.5 }),
//!     },
//! );
//! scene.update_world();
//!
//! let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
//! let hits = scene.cast_ray(ray, [group]);
//! assert_eq!(hits[0].node, ball);
//! assert!((hits[0].distance - 2.5).abs() < 1e-5);
//! ```

mod raycast;
mod types;

use std::collections::HashSet;

pub use types::{Collider, Intersection, Pose, Ray};

/// Identifier for a node in the scene (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Local data for a node.
#[derive(Clone, Debug, Default)]
pub struct LocalNode {
    /// Pose relative to parent space.
    pub pose: Pose,
    /// Optional pickable geometry, centered at the node's local origin.
    pub collider: Option<Collider>,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
    world: Pose,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            world: Pose::IDENTITY,
        }
    }
}

/// The scene arena.
pub struct Scene {
    nodes: Vec<Option<Node>>, // generational slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            if self.is_alive(p) {
                self.link_parent(id, p);
            }
        }
        id
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` under `new_parent`, keeping its local pose.
    ///
    /// Reparenting under the node itself or one of its descendants would
    /// create a cycle and is a no-op.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) || self.ancestors(p).any(|a| a == id) {
                return;
            }
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Update a node's local pose.
    pub fn set_local_pose(&mut self, id: NodeId, pose: Pose) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.pose = pose;
        }
    }

    /// Update a node's collider.
    pub fn set_collider(&mut self, id: NodeId, collider: Option<Collider>) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.collider = collider;
        }
    }

    /// A node's local pose, or `None` for a dangling handle.
    pub fn local_pose(&self, id: NodeId) -> Option<Pose> {
        self.node_opt(id).map(|n| n.local.pose)
    }

    /// A node's cached world pose, or `None` for a dangling handle.
    ///
    /// Valid after the last [`Scene::update_world`].
    pub fn world_pose(&self, id: NodeId) -> Option<Pose> {
        self.node_opt(id).map(|n| n.world)
    }

    /// A node's parent, or `None` for roots and dangling handles.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Iterate `id`, `parent(id)`, … up to the root (near-to-far,
    /// inclusive of `id` itself).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.is_alive(id).then_some(id);
        core::iter::successors(start, move |&n| self.parent(n))
    }

    /// Recompute cached world poses for every node, walking from each root.
    pub fn update_world(&mut self) {
        let roots: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId uses 32-bit indices by design."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();
        for root in roots {
            self.update_world_recursive(root, Pose::IDENTITY);
        }
    }

    /// Cast a world-space ray against the subtrees rooted at `roots`.
    ///
    /// Each node is visited at most once even when roots are nested.
    /// Results are sorted by increasing distance; NaN distances compare
    /// equal so the sort stays stable. World poses must be current (run
    /// [`Scene::update_world`] after mutating poses).
    pub fn cast_ray(&self, ray: Ray, roots: impl IntoIterator<Item = NodeId>) -> Vec<Intersection> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for root in roots {
            if self.is_alive(root) {
                self.cast_recursive(root, &ray, &mut seen, &mut out);
            }
        }
        out.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        out
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn update_world_recursive(&mut self, id: NodeId, parent_pose: Pose) {
        let (world, children) = {
            let node = self.node_mut(id);
            node.world = parent_pose.mul(node.local.pose);
            (node.world, node.children.clone())
        };
        for child in children {
            self.update_world_recursive(child, world);
        }
    }

    fn cast_recursive(
        &self,
        id: NodeId,
        ray: &Ray,
        seen: &mut HashSet<NodeId>,
        out: &mut Vec<Intersection>,
    ) {
        if !seen.insert(id) {
            return;
        }
        let node = self.node(id);
        if let Some(collider) = &node.local.collider {
            let inv = node.world.inverse();
            let origin = inv.transform_point(ray.origin);
            let dir = inv.transform_vector(ray.direction);
            if let Some(t) = raycast::intersect_local(origin, dir, collider) {
                let local_point = origin + dir * t;
                out.push(Intersection {
                    node: id,
                    distance: t,
                    point: node.world.transform_point(local_point),
                    normal: node.world.transform_vector(raycast::local_normal(local_point, collider)),
                });
            }
        }
        for child in node.children.clone() {
            self.cast_recursive(child, ray, seen, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;
    use glam::{Quat, Vec3};

    const EPS: f32 = 1e-4;

    fn sphere_at(scene: &mut Scene, parent: Option<NodeId>, pos: Vec3, radius: f32) -> NodeId {
        scene.insert(
            parent,
            LocalNode {
                pose: Pose::from_position(pos),
                collider: Some(Collider::Sphere { radius }),
            },
        )
    }

    #[test]
    fn world_pose_composes_down_the_tree() {
        let mut scene = Scene::new();
        let root = scene.insert(
            None,
            LocalNode {
                pose: Pose::new(Vec3::new(0.0, 0.0, -2.0), Quat::from_rotation_y(FRAC_PI_2)),
                ..Default::default()
            },
        );
        let child = scene.insert(
            Some(root),
            LocalNode {
                pose: Pose::from_position(Vec3::new(1.0, 0.0, 0.0)),
                ..Default::default()
            },
        );
        scene.update_world();

        // Child local +X is rotated onto world -Z by the root's quarter turn.
        let world = scene.world_pose(child).unwrap();
        assert!((world.position - Vec3::new(0.0, 0.0, -3.0)).length() < EPS);
    }

    #[test]
    fn cast_orders_by_distance() {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalNode::default());
        let far = sphere_at(&mut scene, Some(root), Vec3::new(0.0, 0.0, -10.0), 0.5);
        let near = sphere_at(&mut scene, Some(root), Vec3::new(0.0, 0.0, -2.0), 0.5);
        scene.update_world();

        let hits = scene.cast_ray(Ray::new(Vec3::ZERO, Vec3::NEG_Z), [root]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn nested_roots_do_not_duplicate_hits() {
        let mut scene = Scene::new();
        let outer = scene.insert(None, LocalNode::default());
        let inner = scene.insert(Some(outer), LocalNode::default());
        let leaf = sphere_at(&mut scene, Some(inner), Vec3::new(0.0, 0.0, -3.0), 0.5);
        scene.update_world();

        // Both the outer group and the inner group are cast roots; the
        // leaf must still appear exactly once.
        let hits = scene.cast_ray(Ray::new(Vec3::ZERO, Vec3::NEG_Z), [outer, inner]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, leaf);
    }

    #[test]
    fn hit_point_and_normal_are_world_space() {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalNode::default());
        let ball = sphere_at(&mut scene, Some(root), Vec3::new(0.0, 0.0, -4.0), 1.0);
        scene.update_world();

        let hits = scene.cast_ray(Ray::new(Vec3::ZERO, Vec3::NEG_Z), [root]);
        assert_eq!(hits[0].node, ball);
        assert!((hits[0].point - Vec3::new(0.0, 0.0, -3.0)).length() < EPS);
        assert!((hits[0].normal - Vec3::Z).length() < EPS);
    }

    #[test]
    fn rotated_parent_moves_child_collider() {
        let mut scene = Scene::new();
        let pivot = scene.insert(
            None,
            LocalNode {
                pose: Pose::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2)),
                ..Default::default()
            },
        );
        // Child sits at local -Z; after the parent's quarter turn it lands
        // on world -X.
        let child = sphere_at(&mut scene, Some(pivot), Vec3::new(0.0, 0.0, -5.0), 0.5);
        scene.update_world();

        let miss = scene.cast_ray(Ray::new(Vec3::ZERO, Vec3::NEG_Z), [pivot]);
        assert!(miss.is_empty());
        let hit = scene.cast_ray(Ray::new(Vec3::ZERO, Vec3::NEG_X), [pivot]);
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].node, child);
    }

    #[test]
    fn remove_frees_subtree_and_invalidates_handles() {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalNode::default());
        let child = scene.insert(Some(root), LocalNode::default());
        let grandchild = scene.insert(Some(child), LocalNode::default());

        scene.remove(child);
        assert!(scene.is_alive(root));
        assert!(!scene.is_alive(child));
        assert!(!scene.is_alive(grandchild));

        // Slot reuse bumps the generation; stale handles stay dead.
        let fresh = scene.insert(None, LocalNode::default());
        assert!(scene.is_alive(fresh));
        assert!(!scene.is_alive(child));
    }

    #[test]
    fn reparent_keeps_local_pose_and_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.insert(None, LocalNode::default());
        let b = scene.insert(
            Some(a),
            LocalNode {
                pose: Pose::from_position(Vec3::new(1.0, 0.0, 0.0)),
                ..Default::default()
            },
        );
        let c = scene.insert(Some(b), LocalNode::default());

        // A cycle: reparenting `a` under its grandchild must be refused.
        scene.reparent(a, Some(c));
        assert_eq!(scene.parent(a), None);

        scene.reparent(b, None);
        scene.update_world();
        assert_eq!(scene.parent(b), None);
        let world = scene.world_pose(b).unwrap();
        assert!((world.position - Vec3::new(1.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn ancestors_walks_near_to_far() {
        let mut scene = Scene::new();
        let a = scene.insert(None, LocalNode::default());
        let b = scene.insert(Some(a), LocalNode::default());
        let c = scene.insert(Some(b), LocalNode::default());

        let chain: Vec<NodeId> = scene.ancestors(c).collect();
        assert_eq!(chain, vec![c, b, a]);
        assert!(scene.ancestors(NodeId::new(99, 1)).next().is_none());
    }

    #[test]
    fn cast_skips_dead_roots() {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalNode::default());
        let ball = sphere_at(&mut scene, Some(root), Vec3::new(0.0, 0.0, -2.0), 0.5);
        scene.update_world();
        scene.remove(root);

        let hits = scene.cast_ray(Ray::new(Vec3::ZERO, Vec3::NEG_Z), [root, ball]);
        assert!(hits.is_empty());
    }
}
