// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grab and drag.
//!
//! Pick up a cube with a select press, carry it along a controller arc,
//! and drop it with the release. The grab-time offset between controller
//! and cube is preserved throughout.
//!
//! Run:
//! - `cargo run -p pointwood_demos --example grab_drag`

use glam::{Quat, Vec3};
use pointwood_interact::{Controller, ControllerId, DeviceEvent, Handedness, Interactions};
use pointwood_scene::{Collider, LocalNode, Pose, Scene};

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut scene = Scene::new();
    let cube_start = Pose::from_position(Vec3::new(0.0, 0.0, -3.0));
    let cube = scene.insert(
        None,
        LocalNode {
            pose: cube_start,
            collider: Some(Collider::Cuboid {
                half_extents: Vec3::splat(0.4),
            }),
        },
    );

    let mut engine = Interactions::new();
    let binding = engine.bind_grab(&scene, cube).unwrap();

    let hand = |pose| Controller {
        id: ControllerId(0),
        handedness: Handedness::Right,
        pose,
    };

    // Press while pointing at the cube.
    let grab_pose = Pose::IDENTITY;
    engine.device_event(&mut scene, &hand(grab_pose), DeviceEvent::SelectStart);
    assert!(engine.is_held(&binding));

    // Carry the cube along a short arc: translate right and twist.
    for step in 1..=30 {
        let t = step as f32 / 30.0;
        let pose = Pose::new(
            Vec3::new(1.5 * t, 0.3 * t, 0.0),
            Quat::from_rotation_y(0.8 * t),
        );
        engine.tick(&mut scene, &[hand(pose)]);
    }
    let carried = scene.local_pose(cube).unwrap();
    println!("carried to {:?}", carried.position);
    assert!((carried.position - cube_start.position).length() > 1.0);

    // Release; the cube stays where it was dropped.
    engine.device_event(&mut scene, &hand(Pose::IDENTITY), DeviceEvent::SelectEnd);
    assert!(!engine.is_held(&binding));
    engine.tick(&mut scene, &[hand(Pose::from_position(Vec3::new(-2.0, 0.0, 0.0)))]);
    let dropped = scene.local_pose(cube).unwrap();
    assert_eq!(carried.position, dropped.position);
    println!("dropped at {:?}", dropped.position);
}
