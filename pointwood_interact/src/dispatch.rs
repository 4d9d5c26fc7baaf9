// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch loop: walking a compiled hit list in order and invoking
//! handlers, honoring propagation stops.
//!
//! Two modes share the loop. `Discrete` delivers one gesture kind to every
//! pair until a handler stops propagation. `HoverConfirm` reconciles the
//! hit list against hover state: fresh targets get their `Hover` handlers
//! and a record, already-hovered targets are skipped, and a record whose
//! stop flag is set re-asserts the stop on every later evaluation without
//! re-running handlers.
//!
//! A stop raised *by a handler* on a target that was already hovered also
//! re-cancels hover on every hovered target at or before the stopping
//! pair; their `Blur` handlers run and the targets re-enter on the next
//! evaluation that reaches them. Record-propagated stops and stops on a
//! freshly entered target only cut the walk short.

use std::collections::HashSet;
use std::rc::Rc;

use pointwood_scene::{Intersection, NodeId, Scene};

use crate::hits::CompiledHits;
use crate::hover::{HoverRecord, HoverTracker};
use crate::registry::Registry;
use crate::types::{Controller, InteractionEvent, InteractionKind};

/// What one pass over a compiled hit list delivers.
#[derive(Copy, Clone, Debug)]
pub(crate) enum DispatchMode {
    /// Deliver `kind` to every pair until stopped.
    Discrete(InteractionKind),
    /// Reconcile hover state: enter fresh targets, honor stored stops.
    HoverConfirm,
}

/// Walk `hits.pairs` in order under `mode`.
pub(crate) fn run_dispatch(
    scene: &mut Scene,
    registry: &Registry,
    hover: &mut HoverTracker,
    controller: &Controller,
    hits: &CompiledHits,
    mode: DispatchMode,
) {
    let hand = controller.handedness;
    for (i, pair) in hits.pairs.iter().enumerate() {
        let target = pair.target;
        match mode {
            DispatchMode::Discrete(kind) => {
                let handlers = registry.handlers(target, kind);
                if handlers.is_empty() {
                    continue;
                }
                let mut event = InteractionEvent::with_hit(
                    target,
                    *controller,
                    hits.intersections.clone(),
                    pair.intersection,
                );
                for handler in &handlers {
                    (handler.borrow_mut())(scene, &mut event);
                }
                if event.stopped() {
                    tracing::trace!(?kind, node = ?target, "propagation stopped");
                    // A handler-raised stop on an already-hovered target
                    // also re-cancels hover up to and including this pair.
                    if hover.record(hand, target).is_some() {
                        cancel_up_to(scene, registry, hover, controller, hits, i);
                    }
                    break;
                }
            }
            DispatchMode::HoverConfirm => {
                if let Some(record) = hover.record(hand, target) {
                    if record.stopped {
                        // Stored stop from an earlier evaluation keeps
                        // suppressing deeper pairs, without handlers and
                        // without re-cancel.
                        break;
                    }
                    continue;
                }
                let handlers = registry.handlers(target, InteractionKind::Hover);
                let mut stopped = false;
                if !handlers.is_empty() {
                    let mut event = InteractionEvent::with_hit(
                        target,
                        *controller,
                        hits.intersections.clone(),
                        pair.intersection,
                    );
                    for handler in &handlers {
                        (handler.borrow_mut())(scene, &mut event);
                    }
                    stopped = event.stopped();
                    tracing::trace!(node = ?target, ?hand, stopped, "hover enter");
                }
                // The record is written after the handlers so the stored
                // flag is the final one. A stop raised on a fresh enter
                // does not cancel the target's own brand-new hover.
                hover.insert(
                    hand,
                    target,
                    HoverRecord {
                        stopped,
                        intersection: pair.intersection,
                    },
                );
                if stopped {
                    break;
                }
            }
        }
    }
}

/// Re-cancel hover on every hovered target among `hits.pairs[..=upto]`,
/// firing their `Blur` handlers.
fn cancel_up_to(
    scene: &mut Scene,
    registry: &Registry,
    hover: &mut HoverTracker,
    controller: &Controller,
    hits: &CompiledHits,
    upto: usize,
) {
    let mut seen = HashSet::new();
    for pair in &hits.pairs[..=upto] {
        if !seen.insert(pair.target) {
            continue;
        }
        if hover.record(controller.handedness, pair.target).is_some() {
            blur_node(
                scene,
                registry,
                hover,
                controller,
                hits.intersections.clone(),
                pair.target,
            );
        }
    }
}

/// Leave `node` for this controller's hand: run its `Blur` handlers with
/// a context event, then drop the hover record.
pub(crate) fn blur_node(
    scene: &mut Scene,
    registry: &Registry,
    hover: &mut HoverTracker,
    controller: &Controller,
    intersections: Rc<[Intersection]>,
    node: NodeId,
) {
    tracing::trace!(node = ?node, hand = ?controller.handedness, "hover leave");
    let handlers = registry.handlers(node, InteractionKind::Blur);
    if !handlers.is_empty() {
        let mut event = InteractionEvent::context(node, *controller, intersections);
        for handler in &handlers {
            (handler.borrow_mut())(scene, &mut event);
        }
    }
    hover.remove(controller.handedness, node);
}
