// Copyright 2026 the Pointwood Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grab bookkeeping: carrying a node along with the controller that
//! picked it up.
//!
//! A grab never rewrites a node's local pose from scratch. Each tick the
//! held node's pose is composed with the controller's motion since the
//! previous tick, so whatever offset existed between the controller and
//! the node at grab time is preserved, and releasing at the original
//! controller pose restores the original node pose exactly.

use std::cell::RefCell;
use std::rc::Rc;

use pointwood_scene::{NodeId, Pose, Scene};

use crate::types::{Controller, ControllerId};

/// Where a grab-bound node stands.
#[derive(Copy, Clone, Debug)]
pub(crate) enum GrabState {
    /// Not held; select-start on the node will pick it up.
    Idle,
    /// Held by `controller`.
    Held {
        /// The controller carrying the node.
        controller: ControllerId,
        /// Inverse of the controller's pose as of the previous advance.
        inv_prev: Pose,
    },
}

/// One grab-bound node tracked by the engine.
pub(crate) struct GrabEntry {
    pub(crate) node: NodeId,
    /// Shared with the select-start handler that initiates the grab.
    pub(crate) state: Rc<RefCell<GrabState>>,
}

/// Advance every held node by its controller's motion since the last
/// tick. Runs after hover dispatch; recomputes world poses once if any
/// node moved.
pub(crate) fn advance(scene: &mut Scene, grabs: &[GrabEntry], controllers: &[Controller]) {
    let mut moved = false;
    for entry in grabs {
        let mut state = entry.state.borrow_mut();
        let GrabState::Held {
            controller,
            inv_prev,
        } = &mut *state
        else {
            continue;
        };
        // A controller absent from this tick's list contributes no
        // motion; the grab stays held and resumes when it reappears.
        let Some(current) = controllers.iter().find(|c| c.id == *controller) else {
            continue;
        };
        let Some(local) = scene.local_pose(entry.node) else {
            tracing::warn!(node = ?entry.node, "held node was removed, dropping grab");
            *state = GrabState::Idle;
            continue;
        };
        let delta = inv_prev.mul(current.pose);
        scene.set_local_pose(entry.node, local.mul(delta));
        *inv_prev = current.pose.inverse();
        moved = true;
    }
    if moved {
        scene.update_world();
    }
}

/// Release every grab held by `controller`. Returns how many were let go.
pub(crate) fn release_for(grabs: &[GrabEntry], controller: ControllerId) -> usize {
    let mut released = 0;
    for entry in grabs {
        let mut state = entry.state.borrow_mut();
        if matches!(*state, GrabState::Held { controller: held, .. } if held == controller) {
            tracing::debug!(node = ?entry.node, ?controller, "grab released");
            *state = GrabState::Idle;
            released += 1;
        }
    }
    released
}
