// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store configuration.

use core::fmt;

use alloc::boxed::Box;

use crate::drag::DragHandler;
use crate::item::TreeItem;

/// Options fixed for the lifetime of a [`TreeStore`](crate::TreeStore).
///
/// ```
/// # use understory_tree_store::{TreeItem, TreeStoreOptions};
/// # struct Page;
/// # impl TreeItem for Page { type Id = u32; fn id(&self) -> u32 { 0 } }
/// let options = TreeStoreOptions::<Page>::default()
///     .with_single_select(true)
///     .with_view_depth(3);
/// assert_eq!(options.view_depth, Some(3));
/// ```
pub struct TreeStoreOptions<T: TreeItem> {
    /// Every selection replaces the previous one.
    pub single_select: bool,
    /// Initial maximum number of visible levels; `None` is unbounded.
    pub view_depth: Option<u32>,
    /// Drag-and-drop collaborator. `None` disables dragging.
    pub drag: Option<Box<dyn DragHandler<T>>>,
}

impl<T: TreeItem> Default for TreeStoreOptions<T> {
    fn default() -> Self {
        Self {
            single_select: false,
            view_depth: None,
            drag: None,
        }
    }
}

impl<T: TreeItem> TreeStoreOptions<T> {
    /// Sets [`single_select`](Self::single_select).
    #[must_use]
    pub fn with_single_select(mut self, single_select: bool) -> Self {
        self.single_select = single_select;
        self
    }

    /// Sets the initial view depth. Zero is treated as one.
    #[must_use]
    pub fn with_view_depth(mut self, depth: u32) -> Self {
        self.view_depth = Some(depth.max(1));
        self
    }

    /// Installs a drag handler, making the tree draggable.
    #[must_use]
    pub fn with_drag_handler(mut self, handler: impl DragHandler<T> + 'static) -> Self {
        self.drag = Some(Box::new(handler));
        self
    }
}

impl<T: TreeItem> fmt::Debug for TreeStoreOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStoreOptions")
            .field("single_select", &self.single_select)
            .field("view_depth", &self.view_depth)
            .field("drag", &self.drag.is_some())
            .finish()
    }
}
