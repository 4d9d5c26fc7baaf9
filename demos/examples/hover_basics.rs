// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover basics.
//!
//! Sweep a controller ray across two spheres and watch hover enter/leave
//! fire once per transition, per hand.
//!
//! Run:
//! - `cargo run -p pointwood_demos --example hover_basics`

use glam::{Quat, Vec3};
use pointwood_interact::{
    Controller, ControllerId, Handedness, InteractionKind, Interactions,
};
use pointwood_scene::{Collider, LocalNode, Pose, Scene};

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut scene = Scene::new();
    let left_ball = scene.insert(
        None,
        LocalNode {
            pose: Pose::from_position(Vec3::new(-1.0, 0.0, -4.0)),
            collider: Some(Collider::Sphere { radius: 0.5 }),
        },
    );
    let right_ball = scene.insert(
        None,
        LocalNode {
            pose: Pose::from_position(Vec3::new(1.0, 0.0, -4.0)),
            collider: Some(Collider::Sphere { radius: 0.5 }),
        },
    );

    let mut engine = Interactions::new();
    for (ball, name) in [(left_ball, "left ball"), (right_ball, "right ball")] {
        engine.register(&scene, ball, InteractionKind::Hover, move |_, ev| {
            let hit = ev.intersection().unwrap();
            println!("enter {name} at distance {:.2}", hit.distance);
        });
        engine.register(&scene, ball, InteractionKind::Blur, move |_, _| {
            println!("leave {name}");
        });
    }

    // Sweep the ray from left to right over 60 steps.
    let controller_id = ControllerId(0);
    for step in 0..60 {
        let t = step as f32 / 59.0;
        // Aim at x from -1.2 to +1.2 on the z=-4 plane.
        let yaw = (0.3 - 0.6 * t).atan();
        let controller = Controller {
            id: controller_id,
            handedness: Handedness::Right,
            pose: Pose::new(Vec3::ZERO, Quat::from_rotation_y(yaw)),
        };
        engine.tick(&mut scene, &[controller]);
    }

    assert!(engine.is_hovered(Handedness::Right, right_ball));
    assert!(!engine.is_hovered(Handedness::Right, left_ball));
    println!(
        "closest at end: {:?}",
        engine.closest_hit(Handedness::Right).map(|h| h.distance)
    );
}
