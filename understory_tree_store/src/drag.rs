// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-and-drop seam: the handler trait and its response types.

use core::fmt;

use futures::future::LocalBoxFuture;

use crate::error::DropError;
use crate::item::{TreeItem, TreeNode};

/// What a drop onto a target would do.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DropEffect {
    /// The selection is reparented under (or above) the target.
    #[default]
    Move,
    /// The selection is duplicated under (or above) the target.
    Copy,
}

/// Result of [`DragHandler::on_drop`].
pub enum DropResponse {
    /// The handler decided synchronously. The store does not refresh.
    Done(bool),
    /// The handler started a server-side mutation.
    ///
    /// The store awaits it, then refreshes the common parent of the moved
    /// nodes and the target. `Ok(false)` reports a rejected drop; an error is
    /// logged and treated as non-fatal.
    Pending(LocalBoxFuture<'static, Result<bool, DropError>>),
}

impl fmt::Debug for DropResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(accepted) => f.debug_tuple("Done").field(accepted).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Drag-and-drop collaborator.
///
/// Configuring a handler makes the tree draggable. Only
/// [`on_drop`](DragHandler::on_drop) is required; the eligibility hooks
/// default to permissive answers.
///
/// Before consulting [`drop_eligible`](DragHandler::drop_eligible) the store
/// always forbids dropping a selection onto one of its own members, their
/// descendants, or their ancestors.
pub trait DragHandler<T: TreeItem> {
    /// Performs the drop of `selected` onto `target`.
    ///
    /// `above` is `true` when the drop lands above the target (as a sibling)
    /// rather than inside it.
    fn on_drop(&self, selected: &[&TreeNode<T>], target: &TreeNode<T>, above: bool)
    -> DropResponse;

    /// Whether the current selection may be dragged at all.
    fn drag_eligible(&self, selected: &[&TreeNode<T>]) -> bool {
        let _ = selected;
        true
    }

    /// Whether `selected` may be dropped onto `target`.
    fn drop_eligible(&self, selected: &[&TreeNode<T>], target: &TreeNode<T>, above: bool) -> bool {
        let _ = (selected, target, above);
        true
    }

    /// Which effect a drop of `selected` onto `target` would have.
    fn drop_effect(
        &self,
        selected: &[&TreeNode<T>],
        target: &TreeNode<T>,
        above: bool,
    ) -> DropEffect {
        let _ = (selected, target, above);
        DropEffect::Move
    }
}
