// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray-driven interaction dispatch over a [`pointwood_scene::Scene`]:
//! hover, select, squeeze, and grab for XR-style controllers.
//!
//! The [`Interactions`] engine is the entry point. Nodes opt in by
//! registering handlers (directly or through the [`Interactive`]
//! builder); the application drives the engine with per-frame
//! [`Interactions::tick`] calls and forwards gestures through
//! [`Interactions::device_event`]. Each evaluation casts every
//! controller's ray, expands hits to their registered ancestors, and
//! walks the resulting list near-to-far, honoring propagation stops.
//!
//! Everything is single-threaded: the engine borrows the scene only for
//! the duration of a call, and handlers receive the scene mutably.
//!
//! ```
//! use glam::Vec3;
//! use pointwood_interact::{
//!     Controller, ControllerId, DeviceEvent, Handedness, InteractionKind, Interactions,
//! };
//! use pointwood_scene::{Collider, LocalNode, Pose, Scene};
//!
//! let mut scene = Scene::new();
//! let button = scene.insert(
//!     None,
//!     LocalNode {
//!         pose: Pose::from_position(Vec3::new(0.0, 0.0, -2.0)),
//!         collider: Some(Collider::Sphere { radius: 0.5 }),
//!     },
//! );
//!
//! let mut engine = Interactions::new();
//! engine.register(&scene, button, InteractionKind::Select, |_, event| {
//!     println!("selected at {:?}", event.intersection().unwrap().point);
//! });
//!
//! // The device layer reports one controller at the origin, aiming -Z.
//! let controller = Controller {
//!     id: ControllerId(0),
//!     handedness: Handedness::Right,
//!     pose: Pose::IDENTITY,
//! };
//! engine.tick(&mut scene, &[controller]);
//! assert!(engine.is_hovered(Handedness::Right, button));
//! engine.device_event(&mut scene, &controller, DeviceEvent::Select);
//! ```

mod dispatch;
mod engine;
mod grab;
mod hits;
mod hover;
mod interactive;
mod registry;
mod types;

pub use engine::{GrabBinding, Interactions};
pub use hits::{CompiledHits, HitPair, compile_hits, controller_ray};
pub use hover::HoverTracker;
pub use interactive::{Interactive, InteractiveBinding};
pub use registry::Registry;
pub use types::{
    Controller, ControllerId, DeviceEvent, EventPayload, Handedness, HandlerFn, HandlerId,
    InteractionEvent, InteractionKind, KindSet, MissHandler,
};
