// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core geometry types: rigid poses, rays, colliders, and intersections.

use glam::{Quat, Vec3};

use crate::NodeId;

/// A rigid transform: rotation then translation, no scale.
///
/// Poses compose like matrices: `a.mul(b)` applies `b` first, then `a`.
/// Scale is deliberately absent; ray directions transform by rotation only.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    /// Translation component.
    pub position: Vec3,
    /// Rotation component. Expected to be a unit quaternion.
    pub rotation: Quat,
}

impl Pose {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a pose from a position and rotation.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a pure translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Compose two poses. `self` is applied after `rhs`.
    #[must_use]
    pub fn mul(self, rhs: Self) -> Self {
        Self {
            position: self.position + self.rotation * rhs.position,
            rotation: self.rotation * rhs.rotation,
        }
    }

    /// The inverse pose, such that `p.mul(p.inverse())` is the identity
    /// up to float tolerance.
    #[must_use]
    pub fn inverse(self) -> Self {
        let inv = self.rotation.inverse();
        Self {
            position: -(inv * self.position),
            rotation: inv,
        }
    }

    /// Transform a point (rotation and translation).
    pub fn transform_point(self, p: Vec3) -> Vec3 {
        self.position + self.rotation * p
    }

    /// Transform a direction (rotation only).
    pub fn transform_vector(self, v: Vec3) -> Vec3 {
        self.rotation * v
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A ray in world space with a normalized direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// Precondition: `direction` is finite and non-zero. Degenerate input
    /// is a contract violation by the caller and is only checked in debug
    /// builds.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(
            direction.is_finite() && direction.length_squared() > 0.0,
            "ray direction must be finite and non-zero"
        );
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// The point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Pickable geometry attached to a node, centered at the node's origin in
/// local space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Collider {
    /// A sphere of the given radius.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
    /// An axis-aligned box with the given half extents.
    Cuboid {
        /// Half extent along each local axis.
        half_extents: Vec3,
    },
}

/// A single ray/geometry intersection in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    /// The node whose collider was hit.
    pub node: NodeId,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// World-space surface normal at the hit point.
    pub normal: Vec3,
}
