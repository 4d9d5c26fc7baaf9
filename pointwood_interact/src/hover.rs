// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover bookkeeping, independent per handedness.
//!
//! The tracker records which targets a hand's ray currently rests on and
//! whether propagation was stopped when each record was made. Enter/leave
//! reconciliation itself lives in the dispatcher; this module only stores
//! the state the reconciliation reads and writes.

use std::collections::HashMap;

use pointwood_scene::{Intersection, NodeId};

use crate::types::Handedness;

/// What is remembered about one hovered target.
#[derive(Copy, Clone, Debug)]
pub(crate) struct HoverRecord {
    /// Whether propagation was stopped at this target when the record was
    /// made. A stopped record keeps suppressing deeper pairs on later
    /// evaluations without re-running handlers.
    pub stopped: bool,
    /// The intersection that caused the hover.
    pub intersection: Intersection,
}

/// Per-handedness hover state: hovered targets and closest raw hit.
#[derive(Default)]
pub struct HoverTracker {
    records: [HashMap<NodeId, HoverRecord>; 3],
    closest: [Option<Intersection>; 3],
}

impl core::fmt::Debug for HoverTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HoverTracker")
            .field("hovered", &self.records.each_ref().map(HashMap::len))
            .finish_non_exhaustive()
    }
}

impl HoverTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `hand`'s ray currently rests on `node`.
    pub fn is_hovered(&self, hand: Handedness, node: NodeId) -> bool {
        self.records[hand.index()].contains_key(&node)
    }

    /// Every target `hand` currently hovers, in no particular order.
    pub fn hovered(&self, hand: Handedness) -> Vec<NodeId> {
        self.records[hand.index()].keys().copied().collect()
    }

    /// The nearest raw intersection of `hand`'s ray as of the last tick,
    /// whether or not any handler ran for it.
    pub fn closest(&self, hand: Handedness) -> Option<&Intersection> {
        self.closest[hand.index()].as_ref()
    }

    pub(crate) fn record(&self, hand: Handedness, node: NodeId) -> Option<&HoverRecord> {
        self.records[hand.index()].get(&node)
    }

    pub(crate) fn insert(&mut self, hand: Handedness, node: NodeId, record: HoverRecord) {
        self.records[hand.index()].insert(node, record);
    }

    pub(crate) fn remove(&mut self, hand: Handedness, node: NodeId) -> bool {
        self.records[hand.index()].remove(&node).is_some()
    }

    pub(crate) fn set_closest(&mut self, hand: Handedness, hit: Option<Intersection>) {
        self.closest[hand.index()] = hit;
    }

    /// Forget `node` everywhere without firing anything. Used when the
    /// node leaves the registry or the scene.
    pub(crate) fn purge_node(&mut self, node: NodeId) {
        for map in &mut self.records {
            map.remove(&node);
        }
        for slot in &mut self.closest {
            if slot.is_some_and(|hit| hit.node == node) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pointwood_scene::{LocalNode, Scene};

    fn hit(node: NodeId, distance: f32) -> Intersection {
        Intersection {
            node,
            distance,
            point: Vec3::new(0.0, 0.0, -distance),
            normal: Vec3::Z,
        }
    }

    #[test]
    fn hands_are_independent() {
        let mut scene = Scene::new();
        let n = scene.insert(None, LocalNode::default());
        let mut tracker = HoverTracker::new();
        tracker.insert(
            Handedness::Left,
            n,
            HoverRecord {
                stopped: false,
                intersection: hit(n, 1.0),
            },
        );
        assert!(tracker.is_hovered(Handedness::Left, n));
        assert!(!tracker.is_hovered(Handedness::Right, n));
        assert!(!tracker.is_hovered(Handedness::None, n));

        assert!(tracker.remove(Handedness::Left, n));
        assert!(!tracker.remove(Handedness::Left, n));
        assert!(tracker.hovered(Handedness::Left).is_empty());
    }

    #[test]
    fn purge_clears_records_and_closest() {
        let mut scene = Scene::new();
        let a = scene.insert(None, LocalNode::default());
        let b = scene.insert(None, LocalNode::default());
        let mut tracker = HoverTracker::new();
        for hand in [Handedness::Left, Handedness::Right] {
            tracker.insert(
                hand,
                a,
                HoverRecord {
                    stopped: true,
                    intersection: hit(a, 2.0),
                },
            );
        }
        tracker.set_closest(Handedness::Left, Some(hit(a, 2.0)));
        tracker.set_closest(Handedness::Right, Some(hit(b, 3.0)));

        tracker.purge_node(a);
        assert!(!tracker.is_hovered(Handedness::Left, a));
        assert!(!tracker.is_hovered(Handedness::Right, a));
        assert!(tracker.closest(Handedness::Left).is_none());
        // b's closest hit is untouched.
        assert_eq!(tracker.closest(Handedness::Right).unwrap().node, b);
    }

    #[test]
    fn record_keeps_stop_flag() {
        let mut scene = Scene::new();
        let n = scene.insert(None, LocalNode::default());
        let mut tracker = HoverTracker::new();
        tracker.insert(
            Handedness::Right,
            n,
            HoverRecord {
                stopped: true,
                intersection: hit(n, 0.5),
            },
        );
        let record = tracker.record(Handedness::Right, n).unwrap();
        assert!(record.stopped);
        assert!((record.intersection.distance - 0.5).abs() < 1e-6);
    }
}
