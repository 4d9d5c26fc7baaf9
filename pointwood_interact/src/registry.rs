// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The object registry: which nodes listen for which interactions.
//!
//! A node is present here exactly while it has at least one handler, so
//! registry membership doubles as the "participates in ray casting" test.
//! Handler lists are ordered by registration; lookups hand out snapshots
//! (cloned handles) so an in-flight dispatch is isolated from concurrent
//! registry mutation — removal takes effect for the next evaluation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pointwood_scene::{NodeId, Scene};

use crate::types::{Handler, HandlerId, InteractionEvent, InteractionKind, KindSet};

struct NodeEntry {
    kinds: KindSet,
    slots: HashMap<InteractionKind, Vec<(HandlerId, Handler)>>,
}

impl NodeEntry {
    fn new() -> Self {
        Self {
            kinds: KindSet::empty(),
            slots: HashMap::new(),
        }
    }
}

/// Mapping from node to per-kind ordered handler lists.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<NodeId, NodeEntry>,
    // Insertion-ordered node list so cast targets and miss scans are
    // deterministic.
    order: Vec<NodeId>,
    next_handler: u64,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("nodes", &self.order.len())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no node is registered at all.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `node` has any handler registered.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    /// Whether `node` has at least one handler for `kind`.
    pub fn listens_for(&self, node: NodeId, kind: InteractionKind) -> bool {
        self.entries
            .get(&node)
            .is_some_and(|e| e.kinds.contains(kind.as_set()))
    }

    /// Registered nodes in registration order. These are the ray-cast
    /// subtree roots.
    pub fn targets(&self) -> &[NodeId] {
        &self.order
    }

    /// Append a handler for `(node, kind)`, creating the node entry on
    /// first registration.
    pub fn register(
        &mut self,
        node: NodeId,
        kind: InteractionKind,
        handler: impl FnMut(&mut Scene, &mut InteractionEvent) + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        let entry = self.entries.entry(node).or_insert_with(|| {
            self.order.push(node);
            NodeEntry::new()
        });
        entry.kinds |= kind.as_set();
        let handler: Handler = Rc::new(RefCell::new(handler));
        entry.slots.entry(kind).or_default().push((id, handler));
        id
    }

    /// Remove one handler. Returns true if it was found; the node entry
    /// is pruned entirely when its last handler goes.
    pub fn unregister(&mut self, node: NodeId, kind: InteractionKind, id: HandlerId) -> bool {
        let Some(entry) = self.entries.get_mut(&node) else {
            return false;
        };
        let Some(list) = entry.slots.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(hid, _)| *hid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            entry.slots.remove(&kind);
            entry.kinds -= kind.as_set();
        }
        if entry.slots.is_empty() {
            self.entries.remove(&node);
            self.order.retain(|n| *n != node);
        }
        removed
    }

    /// Snapshot of the handlers for `(node, kind)`, in registration order.
    pub(crate) fn handlers(&self, node: NodeId, kind: InteractionKind) -> Vec<Handler> {
        self.entries
            .get(&node)
            .and_then(|e| e.slots.get(&kind))
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }
}
