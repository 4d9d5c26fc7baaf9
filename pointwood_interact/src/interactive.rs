// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A builder bundling one handler per interaction kind, bound to a node
//! in one step.
//!
//! [`Interactive`] is sugar over [`Interactions::register`]: fill the
//! slots you care about, bind once, and keep the returned
//! [`InteractiveBinding`] to take everything down again together.

use pointwood_scene::{NodeId, Scene};

use crate::engine::Interactions;
use crate::types::{HandlerId, InteractionEvent, InteractionKind};

type Slot = Option<Box<dyn FnMut(&mut Scene, &mut InteractionEvent)>>;

/// One optional handler per interaction kind. Construct with
/// [`Interactive::new`], fill with the `on_*` methods, then
/// [`Interactive::bind`].
#[derive(Default)]
pub struct Interactive {
    hover: Slot,
    blur: Slot,
    select_start: Slot,
    select_end: Slot,
    select: Slot,
    squeeze_start: Slot,
    squeeze_end: Slot,
    squeeze: Slot,
    select_missed: Slot,
}

impl core::fmt::Debug for Interactive {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interactive")
            .field("slots", &self.slots_set())
            .finish_non_exhaustive()
    }
}

impl Interactive {
    /// An empty builder with every slot unset.
    pub fn new() -> Self {
        Self::default()
    }

    fn slots_set(&self) -> usize {
        [
            &self.hover,
            &self.blur,
            &self.select_start,
            &self.select_end,
            &self.select,
            &self.squeeze_start,
            &self.squeeze_end,
            &self.squeeze,
            &self.select_missed,
        ]
        .into_iter()
        .filter(|s| s.is_some())
        .count()
    }

    /// Set the [`InteractionKind::Hover`] handler.
    pub fn on_hover(mut self, h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static) -> Self {
        self.hover = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::Blur`] handler.
    pub fn on_blur(mut self, h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static) -> Self {
        self.blur = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::SelectStart`] handler.
    pub fn on_select_start(
        mut self,
        h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> Self {
        self.select_start = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::SelectEnd`] handler.
    pub fn on_select_end(
        mut self,
        h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> Self {
        self.select_end = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::Select`] handler.
    pub fn on_select(mut self, h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static) -> Self {
        self.select = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::SqueezeStart`] handler.
    pub fn on_squeeze_start(
        mut self,
        h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> Self {
        self.squeeze_start = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::SqueezeEnd`] handler.
    pub fn on_squeeze_end(
        mut self,
        h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> Self {
        self.squeeze_end = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::Squeeze`] handler.
    pub fn on_squeeze(
        mut self,
        h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> Self {
        self.squeeze = Some(Box::new(h));
        self
    }

    /// Set the [`InteractionKind::SelectMissed`] handler.
    pub fn on_select_missed(
        mut self,
        h: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> Self {
        self.select_missed = Some(Box::new(h));
        self
    }

    /// Register every set slot on `node`.
    ///
    /// Returns `None` (registering nothing) if `node` is not alive in
    /// `scene`. A builder with no slots set binds nothing and returns an
    /// empty binding.
    pub fn bind(
        self,
        engine: &mut Interactions,
        scene: &Scene,
        node: NodeId,
    ) -> Option<InteractiveBinding> {
        let slots: Vec<(InteractionKind, Box<dyn FnMut(&mut Scene, &mut InteractionEvent)>)> = [
            (InteractionKind::Hover, self.hover),
            (InteractionKind::Blur, self.blur),
            (InteractionKind::SelectStart, self.select_start),
            (InteractionKind::SelectEnd, self.select_end),
            (InteractionKind::Select, self.select),
            (InteractionKind::SqueezeStart, self.squeeze_start),
            (InteractionKind::SqueezeEnd, self.squeeze_end),
            (InteractionKind::Squeeze, self.squeeze),
            (InteractionKind::SelectMissed, self.select_missed),
        ]
        .into_iter()
        .filter_map(|(kind, slot)| slot.map(|h| (kind, h)))
        .collect();

        let mut ids = Vec::with_capacity(slots.len());
        for (kind, handler) in slots {
            match engine.register(scene, node, kind, handler) {
                Some(id) => ids.push((kind, id)),
                None => {
                    // Dead node. Roll back whatever already landed.
                    for (kind, id) in ids {
                        engine.unregister(node, kind, id);
                    }
                    return None;
                }
            }
        }
        Some(InteractiveBinding { node, ids })
    }
}

/// Handle to one bound [`Interactive`], used to unregister all of its
/// handlers at once.
#[derive(Debug)]
pub struct InteractiveBinding {
    node: NodeId,
    ids: Vec<(InteractionKind, HandlerId)>,
}

impl InteractiveBinding {
    /// The node the handlers are bound to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Unregister every handler this binding installed.
    pub fn unbind(self, engine: &mut Interactions) {
        for (kind, id) in self.ids {
            engine.unregister(self.node, kind, id);
        }
    }
}
