// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the dispatch engine: interaction kinds, controllers,
//! events, and handler signatures.
//!
//! These types describe the dispatch protocol. They are referenced by the
//! [`engine`](crate::engine) and consumed by application handlers.

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use pointwood_scene::{Intersection, NodeId, Pose, Scene};

/// Which hand a controller is tracked as.
///
/// Hover state is kept independently per handedness, so two controllers
/// can hover different nodes at once.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Handedness {
    /// The left hand.
    Left,
    /// The right hand.
    Right,
    /// An untracked or headset-mounted device.
    None,
}

impl Handedness {
    /// Dense index for per-hand state arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::None => 2,
        }
    }
}

/// Identity of a tracked pointing device.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ControllerId(pub u32);

/// Observed snapshot of one tracked pointing device.
///
/// The device layer owns controller lifetime; the engine only reads a
/// per-frame list of these.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Controller {
    /// Stable device identity.
    pub id: ControllerId,
    /// Which hand the device is tracked as.
    pub handedness: Handedness,
    /// Current world pose. The pointing ray leaves `pose.position` along
    /// the pose's local `-Z`.
    pub pose: Pose,
}

/// The closed set of interaction types a node can listen for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InteractionKind {
    /// Ray entered the node's hit-set.
    Hover,
    /// Ray left the node's hit-set. Carries no specific intersection.
    Blur,
    /// Select gesture began while hitting the node.
    SelectStart,
    /// Select gesture ended while hitting the node.
    SelectEnd,
    /// Full select gesture on the node.
    Select,
    /// Squeeze gesture began while hitting the node.
    SqueezeStart,
    /// Squeeze gesture ended while hitting the node.
    SqueezeEnd,
    /// Full squeeze gesture on the node.
    Squeeze,
    /// A select fired but did not hit this node. Carries no specific
    /// intersection.
    SelectMissed,
}

impl InteractionKind {
    /// Whether events of this kind carry a specific intersection.
    ///
    /// `Blur` and `SelectMissed` carry only the full intersection list
    /// for context.
    pub fn carries_intersection(self) -> bool {
        !matches!(self, Self::Blur | Self::SelectMissed)
    }

    /// The single-bit [`KindSet`] for this kind.
    pub fn as_set(self) -> KindSet {
        match self {
            Self::Hover => KindSet::HOVER,
            Self::Blur => KindSet::BLUR,
            Self::SelectStart => KindSet::SELECT_START,
            Self::SelectEnd => KindSet::SELECT_END,
            Self::Select => KindSet::SELECT,
            Self::SqueezeStart => KindSet::SQUEEZE_START,
            Self::SqueezeEnd => KindSet::SQUEEZE_END,
            Self::Squeeze => KindSet::SQUEEZE,
            Self::SelectMissed => KindSet::SELECT_MISSED,
        }
    }
}

bitflags! {
    /// Set of interaction kinds, used to summarize what a node listens for.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KindSet: u16 {
        /// [`InteractionKind::Hover`]
        const HOVER = 1 << 0;
        /// [`InteractionKind::Blur`]
        const BLUR = 1 << 1;
        /// [`InteractionKind::SelectStart`]
        const SELECT_START = 1 << 2;
        /// [`InteractionKind::SelectEnd`]
        const SELECT_END = 1 << 3;
        /// [`InteractionKind::Select`]
        const SELECT = 1 << 4;
        /// [`InteractionKind::SqueezeStart`]
        const SQUEEZE_START = 1 << 5;
        /// [`InteractionKind::SqueezeEnd`]
        const SQUEEZE_END = 1 << 6;
        /// [`InteractionKind::Squeeze`]
        const SQUEEZE = 1 << 7;
        /// [`InteractionKind::SelectMissed`]
        const SELECT_MISSED = 1 << 8;
    }
}

/// A discrete input event as reported by the device layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeviceEvent {
    /// Full select gesture (press + release).
    Select,
    /// Select press.
    SelectStart,
    /// Select release.
    SelectEnd,
    /// Full squeeze gesture.
    Squeeze,
    /// Squeeze press.
    SqueezeStart,
    /// Squeeze release.
    SqueezeEnd,
}

impl DeviceEvent {
    /// The interaction kind dispatched for this device event.
    pub fn kind(self) -> InteractionKind {
        match self {
            Self::Select => InteractionKind::Select,
            Self::SelectStart => InteractionKind::SelectStart,
            Self::SelectEnd => InteractionKind::SelectEnd,
            Self::Squeeze => InteractionKind::Squeeze,
            Self::SqueezeStart => InteractionKind::SqueezeStart,
            Self::SqueezeEnd => InteractionKind::SqueezeEnd,
        }
    }
}

/// Payload of an [`InteractionEvent`], split by interaction family.
#[derive(Clone, Debug)]
pub enum EventPayload {
    /// With-intersection kinds: the specific intersection that produced
    /// this event, plus the propagation-stop flag.
    Hit {
        /// The intersection behind this (hit, target) pair.
        intersection: Intersection,
        /// Whether propagation has been stopped on this event.
        stopped: bool,
    },
    /// Without-intersection kinds (`Blur`, `SelectMissed`): only the full
    /// intersection list is available for context.
    Context,
}

/// One delivered interaction, constructed fresh per (hit, target) pair
/// and discarded after its handlers return.
#[derive(Clone, Debug)]
pub struct InteractionEvent {
    /// The registered node this event is addressed to.
    pub target: NodeId,
    /// Snapshot of the controller that produced the event.
    pub controller: Controller,
    /// Every intersection of this controller's ray this evaluation, in
    /// distance order.
    pub intersections: Rc<[Intersection]>,
    /// With- or without-intersection payload.
    pub payload: EventPayload,
}

impl InteractionEvent {
    pub(crate) fn with_hit(
        target: NodeId,
        controller: Controller,
        intersections: Rc<[Intersection]>,
        intersection: Intersection,
    ) -> Self {
        Self {
            target,
            controller,
            intersections,
            payload: EventPayload::Hit {
                intersection,
                stopped: false,
            },
        }
    }

    pub(crate) fn context(
        target: NodeId,
        controller: Controller,
        intersections: Rc<[Intersection]>,
    ) -> Self {
        Self {
            target,
            controller,
            intersections,
            payload: EventPayload::Context,
        }
    }

    /// The specific intersection, for with-intersection kinds.
    pub fn intersection(&self) -> Option<&Intersection> {
        match &self.payload {
            EventPayload::Hit { intersection, .. } => Some(intersection),
            EventPayload::Context => None,
        }
    }

    /// Whether propagation has been stopped on this event.
    pub fn stopped(&self) -> bool {
        match &self.payload {
            EventPayload::Hit { stopped, .. } => *stopped,
            EventPayload::Context => false,
        }
    }

    /// Stop propagation: no later (intersection, target) pair of the same
    /// dispatch pass will be delivered. No-op on without-intersection
    /// events.
    pub fn stop_propagation(&mut self) {
        match &mut self.payload {
            EventPayload::Hit { stopped, .. } => *stopped = true,
            EventPayload::Context => {}
        }
    }
}

/// Handler callback signature. Handlers may freely mutate the scene.
pub type HandlerFn = dyn FnMut(&mut Scene, &mut InteractionEvent);

/// A registered handler, shared so in-flight dispatch holds its own
/// snapshot independent of registry mutation.
pub(crate) type Handler = Rc<RefCell<HandlerFn>>;

/// Identifier of one registered handler, used for removal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HandlerId(pub(crate) u64);

/// Global select-miss callback: fired once per controller per select
/// event when no registered node was hit at all.
pub type MissHandler = Box<dyn FnMut(&mut Scene, &Controller, &[Intersection])>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_families() {
        assert!(InteractionKind::Hover.carries_intersection());
        assert!(InteractionKind::Select.carries_intersection());
        assert!(InteractionKind::Squeeze.carries_intersection());
        assert!(!InteractionKind::Blur.carries_intersection());
        assert!(!InteractionKind::SelectMissed.carries_intersection());
    }

    #[test]
    fn kind_bits_are_distinct() {
        let kinds = [
            InteractionKind::Hover,
            InteractionKind::Blur,
            InteractionKind::SelectStart,
            InteractionKind::SelectEnd,
            InteractionKind::Select,
            InteractionKind::SqueezeStart,
            InteractionKind::SqueezeEnd,
            InteractionKind::Squeeze,
            InteractionKind::SelectMissed,
        ];
        let mut acc = KindSet::empty();
        for k in kinds {
            assert!(!acc.intersects(k.as_set()));
            acc |= k.as_set();
        }
        assert_eq!(acc.bits().count_ones(), 9);
    }

    #[test]
    fn device_events_map_to_with_intersection_kinds() {
        let events = [
            DeviceEvent::Select,
            DeviceEvent::SelectStart,
            DeviceEvent::SelectEnd,
            DeviceEvent::Squeeze,
            DeviceEvent::SqueezeStart,
            DeviceEvent::SqueezeEnd,
        ];
        for e in events {
            assert!(e.kind().carries_intersection());
        }
    }

    #[test]
    fn stop_propagation_is_noop_on_context_events() {
        let mut scene = Scene::new();
        let node = scene.insert(None, Default::default());
        let controller = Controller {
            id: ControllerId(0),
            handedness: Handedness::Right,
            pose: Pose::IDENTITY,
        };
        let mut event = InteractionEvent::context(node, controller, Vec::new().into());
        event.stop_propagation();
        assert!(!event.stopped());
        assert!(event.intersection().is_none());
    }
}
