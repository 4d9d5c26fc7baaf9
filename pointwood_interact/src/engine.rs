// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interaction engine: owns the registry, hover state, and grabs,
//! and drives them from ticks and device events.
//!
//! The engine is single-threaded and externally driven. Call
//! [`Interactions::tick`] once per frame with the current controller
//! snapshots, and [`Interactions::device_event`] whenever the device
//! layer reports a gesture. Both recompute world poses and re-cast before
//! acting, so handlers always see hits against current geometry.

use std::cell::RefCell;
use std::rc::Rc;

use pointwood_scene::{Intersection, NodeId, Scene};

use crate::dispatch::{self, DispatchMode, run_dispatch};
use crate::grab::{self, GrabEntry, GrabState};
use crate::hits::{CompiledHits, compile_hits};
use crate::hover::HoverTracker;
use crate::registry::Registry;
use crate::types::{
    Controller, DeviceEvent, Handedness, HandlerId, InteractionEvent, InteractionKind, MissHandler,
};

/// Handle to one grab-enabled node, returned by
/// [`Interactions::bind_grab`] and consumed by
/// [`Interactions::unbind_grab`].
pub struct GrabBinding {
    node: NodeId,
    start: HandlerId,
    state: Rc<RefCell<GrabState>>,
}

impl core::fmt::Debug for GrabBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GrabBinding")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

/// Ray-interaction engine over a [`Scene`].
#[derive(Default)]
pub struct Interactions {
    registry: Registry,
    hover: HoverTracker,
    grabs: Vec<GrabEntry>,
    select_missed_fallback: Option<MissHandler>,
    warned_dead_registration: bool,
}

impl core::fmt::Debug for Interactions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interactions")
            .field("registry", &self.registry)
            .field("hover", &self.hover)
            .field("grabs", &self.grabs.len())
            .finish_non_exhaustive()
    }
}

impl Interactions {
    /// Create an engine with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `(node, kind)`.
    ///
    /// Returns `None` without registering if `node` is not alive in
    /// `scene`; the first such call logs a warning.
    pub fn register(
        &mut self,
        scene: &Scene,
        node: NodeId,
        kind: InteractionKind,
        handler: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> Option<HandlerId> {
        if !scene.is_alive(node) {
            if !self.warned_dead_registration {
                self.warned_dead_registration = true;
                tracing::warn!(node = ?node, "ignoring handler registration for a dead node");
            }
            return None;
        }
        Some(self.registry.register(node, kind, handler))
    }

    /// Remove one handler. When the node's last handler goes, its hover
    /// state is dropped silently (no `Blur` fires).
    pub fn unregister(&mut self, node: NodeId, kind: InteractionKind, id: HandlerId) -> bool {
        let removed = self.registry.unregister(node, kind, id);
        if removed && !self.registry.contains(node) {
            self.hover.purge_node(node);
        }
        removed
    }

    /// Whether `node` currently has any handler registered.
    pub fn is_registered(&self, node: NodeId) -> bool {
        self.registry.contains(node)
    }

    /// Every target `hand`'s ray currently rests on.
    pub fn hovered(&self, hand: Handedness) -> Vec<NodeId> {
        self.hover.hovered(hand)
    }

    /// Whether `hand`'s ray currently rests on `node`.
    pub fn is_hovered(&self, hand: Handedness, node: NodeId) -> bool {
        self.hover.is_hovered(hand, node)
    }

    /// The nearest raw intersection of `hand`'s ray as of the last tick.
    pub fn closest_hit(&self, hand: Handedness) -> Option<&Intersection> {
        self.hover.closest(hand)
    }

    /// Install the global select-miss fallback, replacing any previous
    /// one. It fires once per select event whose ray hit no registered
    /// node at all.
    pub fn on_select_missed_global(
        &mut self,
        handler: impl FnMut(&mut Scene, &Controller, &[Intersection]) + 'static,
    ) {
        self.select_missed_fallback = Some(Box::new(handler));
    }

    /// Drop the global select-miss fallback.
    pub fn clear_select_missed_global(&mut self) {
        self.select_missed_fallback = None;
    }

    /// Per-frame evaluation: update world poses, then per controller
    /// leave stale hovers, enter fresh ones, and advance grabs.
    pub fn tick(&mut self, scene: &mut Scene, controllers: &[Controller]) {
        scene.update_world();
        for controller in controllers {
            let hits = compile_hits(scene, &self.registry, controller);
            self.hover
                .set_closest(controller.handedness, hits.intersections.first().copied());
            // Leave before enter, so a handler seeing Hover knows every
            // stale Blur already ran.
            for node in self.hover.hovered(controller.handedness) {
                if !hits.hit_set.contains(&node) {
                    dispatch::blur_node(
                        scene,
                        &self.registry,
                        &mut self.hover,
                        controller,
                        hits.intersections.clone(),
                        node,
                    );
                }
            }
            run_dispatch(
                scene,
                &self.registry,
                &mut self.hover,
                controller,
                &hits,
                DispatchMode::HoverConfirm,
            );
        }
        grab::advance(scene, &self.grabs, controllers);
    }

    /// Deliver one gesture from the device layer.
    ///
    /// The controller's ray is re-cast at its current pose, so the hits
    /// reflect this instant rather than the last tick. `Select` also
    /// notifies miss listeners; `SelectEnd` releases any grab held by
    /// this controller, whether or not the ray still touches the node.
    pub fn device_event(&mut self, scene: &mut Scene, controller: &Controller, event: DeviceEvent) {
        scene.update_world();
        let hits = compile_hits(scene, &self.registry, controller);
        tracing::debug!(?event, controller = ?controller.id, pairs = hits.pairs.len(), "device event");
        if event == DeviceEvent::Select {
            self.notify_select_missed(scene, controller, &hits);
        }
        run_dispatch(
            scene,
            &self.registry,
            &mut self.hover,
            controller,
            &hits,
            DispatchMode::Discrete(event.kind()),
        );
        if event == DeviceEvent::SelectEnd {
            grab::release_for(&self.grabs, controller.id);
        }
    }

    /// Make `node` grabbable: a select-start hitting it picks it up, the
    /// controller carries it, and the controller's select-end releases it.
    ///
    /// Returns `None` if `node` is not alive in `scene`.
    pub fn bind_grab(&mut self, scene: &Scene, node: NodeId) -> Option<GrabBinding> {
        let state = Rc::new(RefCell::new(GrabState::Idle));
        let shared = state.clone();
        let start = self.register(scene, node, InteractionKind::SelectStart, move |_, event| {
            let mut state = shared.borrow_mut();
            // A second controller's select-start while held is ignored;
            // first grabber wins until it releases.
            if matches!(*state, GrabState::Idle) {
                tracing::debug!(node = ?event.target, controller = ?event.controller.id, "grab started");
                *state = GrabState::Held {
                    controller: event.controller.id,
                    inv_prev: event.controller.pose.inverse(),
                };
            }
        })?;
        self.grabs.push(GrabEntry {
            node,
            state: state.clone(),
        });
        Some(GrabBinding { node, start, state })
    }

    /// Undo [`Interactions::bind_grab`]: any grab in progress is dropped
    /// where the node stands and the select-start handler is removed.
    pub fn unbind_grab(&mut self, binding: GrabBinding) {
        self.registry
            .unregister(binding.node, InteractionKind::SelectStart, binding.start);
        if !self.registry.contains(binding.node) {
            self.hover.purge_node(binding.node);
        }
        self.grabs
            .retain(|entry| !Rc::ptr_eq(&entry.state, &binding.state));
    }

    /// Whether the binding's node is currently being carried.
    pub fn is_held(&self, binding: &GrabBinding) -> bool {
        matches!(*binding.state.borrow(), GrabState::Held { .. })
    }

    fn notify_select_missed(
        &mut self,
        scene: &mut Scene,
        controller: &Controller,
        hits: &CompiledHits,
    ) {
        for node in self.registry.targets().to_vec() {
            if hits.hit_set.contains(&node) {
                continue;
            }
            let handlers = self.registry.handlers(node, InteractionKind::SelectMissed);
            if handlers.is_empty() {
                continue;
            }
            let mut event =
                InteractionEvent::context(node, *controller, hits.intersections.clone());
            for handler in &handlers {
                (handler.borrow_mut())(scene, &mut event);
            }
        }
        if hits.hit_set.is_empty() {
            if let Some(fallback) = &mut self.select_missed_fallback {
                fallback(scene, controller, &hits.intersections);
            }
        }
    }
}
