// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray/collider intersection primitives.
//!
//! All tests run in the collider's local space (the caller transforms the
//! ray by the inverse world pose). Distances are preserved because poses
//! are rigid. A ray starting inside a collider reports the far (exit)
//! intersection, mirroring the usual slab-test behavior.

use glam::Vec3;

use crate::types::Collider;

/// Intersect a local-space ray with a collider.
///
/// Returns the hit parameter `t >= 0` along the ray, or `None` on a miss.
pub(crate) fn intersect_local(origin: Vec3, dir: Vec3, collider: &Collider) -> Option<f32> {
    match *collider {
        Collider::Sphere { radius } => ray_sphere(origin, dir, radius),
        Collider::Cuboid { half_extents } => ray_cuboid(origin, dir, half_extents),
    }
}

/// Surface normal of a collider at a local-space point on its boundary.
pub(crate) fn local_normal(point: Vec3, collider: &Collider) -> Vec3 {
    match *collider {
        Collider::Sphere { .. } => point.normalize_or_zero(),
        Collider::Cuboid { half_extents } => cuboid_normal(point, half_extents),
    }
}

fn ray_sphere(origin: Vec3, dir: Vec3, radius: f32) -> Option<f32> {
    // |o + t d|^2 = r^2 with d normalized.
    let b = origin.dot(dir);
    let c = origin.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let t = -b - sqrt;
    if t >= 0.0 {
        return Some(t);
    }
    let t = -b + sqrt;
    (t >= 0.0).then_some(t)
}

fn ray_cuboid(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let inv_dir = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);

    let t1 = (-half.x - origin.x) * inv_dir.x;
    let t2 = (half.x - origin.x) * inv_dir.x;
    let t3 = (-half.y - origin.y) * inv_dir.y;
    let t4 = (half.y - origin.y) * inv_dir.y;
    let t5 = (-half.z - origin.z) * inv_dir.z;
    let t6 = (half.z - origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    // Entire box behind the origin.
    if tmax < 0.0 {
        return None;
    }
    if tmin > tmax {
        return None;
    }
    // Origin inside the box: report the exit point.
    Some(if tmin < 0.0 { tmax } else { tmin })
}

fn cuboid_normal(point: Vec3, half: Vec3) -> Vec3 {
    // The face whose boundary the point is proportionally closest to wins.
    let r = Vec3::new(
        (point.x / half.x).abs(),
        (point.y / half.y).abs(),
        (point.z / half.z).abs(),
    );
    if r.x >= r.y && r.x >= r.z {
        Vec3::new(point.x.signum(), 0.0, 0.0)
    } else if r.y >= r.z {
        Vec3::new(0.0, point.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, point.z.signum())
    }
}
