// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The data-source seam: how the store asks for children.

use alloc::vec::Vec;
use futures::future::LocalBoxFuture;

use crate::item::{TreeItem, TreeNode};

/// Supplies children for a node on demand.
///
/// The store calls [`fetch_children`](TreeSource::fetch_children) with `None`
/// to load the top-level items and with a materialized node to load that
/// node's children. The returned future must not borrow the node; copy
/// whatever the request needs (usually the id) before building it.
///
/// Implementations typically wrap a GraphQL or REST client. They may batch or
/// memoize requests; the store never retries.
pub trait TreeSource<T: TreeItem> {
    /// Error produced when a fetch fails.
    type Error: core::error::Error + 'static;

    /// Fetches the children of `parent`, or the top-level items for `None`.
    fn fetch_children(
        &self,
        parent: Option<&TreeNode<T>>,
    ) -> LocalBoxFuture<'static, Result<Vec<T>, Self::Error>>;
}
