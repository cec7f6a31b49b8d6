// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item model: the caller-supplied payload trait and the store-managed node record.

use core::fmt;
use core::hash::Hash;

use alloc::vec::Vec;

/// A payload record supplied by a [`TreeSource`](crate::TreeSource).
///
/// The store is agnostic to the payload shape beyond its identifier and an
/// optional "has children" hint. Everything else (titles, permissions, paths)
/// stays in the payload and is reachable through [`TreeNode::item`].
pub trait TreeItem {
    /// Identifier type. Must be unique within the materialized tree.
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// Returns this record's identifier.
    fn id(&self) -> Self::Id;

    /// Hint from the data source about whether this record has children.
    ///
    /// `None` and `Some(true)` both make the node eligible for expansion.
    /// `Some(false)` marks a known leaf, which [`TreeStore::open`](crate::TreeStore::open)
    /// will not fetch.
    fn has_children(&self) -> Option<bool> {
        None
    }
}

/// Shorthand for the identifier type of a [`TreeItem`].
pub type ItemId<T> = <T as TreeItem>::Id;

bitflags::bitflags! {
    /// Per-node state flags maintained by the store.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Children are materialized and shown.
        const OPEN    = 0b0000_0001;
        /// A fetch for this node's children is in flight.
        const LOADING = 0b0000_0010;
    }
}

/// A materialized node: store metadata composed with a caller payload.
///
/// Parent and child links are ids into the store's index rather than owning
/// pointers, so a node never keeps another node alive.
#[derive(Clone, Debug)]
pub struct TreeNode<T: TreeItem> {
    pub(crate) id: T::Id,
    pub(crate) parent: Option<T::Id>,
    pub(crate) level: u32,
    pub(crate) flags: NodeFlags,
    pub(crate) children: Option<Vec<T::Id>>,
    pub(crate) item: T,
}

impl<T: TreeItem> TreeNode<T> {
    /// Wraps a freshly fetched payload, stamping its parent and level.
    pub(crate) fn new(item: T, parent: Option<T::Id>, level: u32) -> Self {
        Self {
            id: item.id(),
            parent,
            level,
            flags: NodeFlags::empty(),
            children: None,
            item,
        }
    }

    /// Returns the node identifier.
    #[must_use]
    pub fn id(&self) -> &T::Id {
        &self.id
    }

    /// Returns the parent identifier, or `None` for top-level nodes.
    #[must_use]
    pub fn parent(&self) -> Option<&T::Id> {
        self.parent.as_ref()
    }

    /// Depth from the synthetic root. Top-level nodes are level `1`.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the node's state flags.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Returns `true` if the node's children are currently expanded.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.flags.contains(NodeFlags::OPEN)
    }

    /// Returns `true` while a fetch for this node's children is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.flags.contains(NodeFlags::LOADING)
    }

    /// Materialized children, present only while the node is open.
    #[must_use]
    pub fn children(&self) -> Option<&[T::Id]> {
        self.children.as_deref()
    }

    /// Returns `false` only for nodes the source marked as leaves.
    #[must_use]
    pub fn can_open(&self) -> bool {
        self.item.has_children() != Some(false)
    }

    /// Returns the caller payload.
    #[must_use]
    pub fn item(&self) -> &T {
        &self.item
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.flags.set(NodeFlags::OPEN, open);
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.flags.set(NodeFlags::LOADING, loading);
    }
}
