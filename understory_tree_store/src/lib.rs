// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tree Store: a lazily materialized, observable tree.
//!
//! This crate keeps the client-side model behind a hierarchical navigator such
//! as a CMS page tree. Only the top level and the children of expanded nodes
//! are ever held in memory; everything else is fetched on demand from a
//! [`TreeSource`]. On top of that partial tree the store tracks:
//!
//! - **Expansion**: which nodes are open, and which are currently loading.
//! - **Selection**: a multi-select set with primary and anchor roles
//!   ([`TreeSelection`]), plus shift-click range selection over visible rows.
//! - **Focus**: a single keyboard-focused node.
//! - **View window**: a breadcrumb-style window root and a maximum number of
//!   visible levels. Focusing a node near the bottom of the window slides the
//!   window down so deep trees stay readable.
//! - **Drag and drop**: eligibility checks and delegation to a
//!   [`DragHandler`], followed by a refresh of the smallest subtree that
//!   covers both the moved nodes and the target.
//!
//! Every public mutation ends with one notification. Listeners registered via
//! [`TreeStore::subscribe`] receive a shared borrow of the [`TreeState`].
//!
//! ## Consistency
//!
//! Nodes refer to each other by id through a flat index. After every
//! operation completes:
//!
//! - every id reachable from the root items or an open node's children is in
//!   the index, and vice versa;
//! - every selected id and the focused id are in the index;
//! - the window root, if any, is in the index and open.
//!
//! Refreshing a subtree keeps descendants open when their ids reappear, drops
//! vanished ids from the selection, and moves focus somewhere sensible.
//!
//! ## Concurrency
//!
//! The store is single-threaded and cooperative: cloning it shares state, and
//! its futures are meant for a local executor. At most one refresh runs at a
//! time; a second request for the same subtree shares the running one.
//!
//! ## Minimal example
//!
//! ```rust
//! use futures::FutureExt;
//! use futures::future::LocalBoxFuture;
//! use understory_tree_store::{SelectOptions, TreeItem, TreeNode, TreeSource, TreeStore};
//!
//! #[derive(Clone, Debug)]
//! struct Page {
//!     id: u32,
//!     leaf: bool,
//! }
//!
//! impl TreeItem for Page {
//!     type Id = u32;
//!
//!     fn id(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn has_children(&self) -> Option<bool> {
//!         Some(!self.leaf)
//!     }
//! }
//!
//! struct Site;
//!
//! impl TreeSource<Page> for Site {
//!     type Error = core::convert::Infallible;
//!
//!     fn fetch_children(
//!         &self,
//!         parent: Option<&TreeNode<Page>>,
//!     ) -> LocalBoxFuture<'static, Result<Vec<Page>, Self::Error>> {
//!         let pages = match parent.map(|p| *p.id()) {
//!             None => vec![Page { id: 1, leaf: false }],
//!             Some(1) => vec![Page { id: 2, leaf: true }, Page { id: 3, leaf: true }],
//!             Some(_) => vec![],
//!         };
//!         futures::future::ready(Ok(pages)).boxed_local()
//!     }
//! }
//!
//! futures::executor::block_on(async {
//!     let store: TreeStore<Page, Site> = TreeStore::new(Site);
//!     store.refresh(None).await.unwrap();
//!     store.open(&1).await.unwrap();
//!     store.select(&3, SelectOptions::default());
//!
//!     let state = store.state();
//!     assert_eq!(state.root_items(), Some(&[1][..]));
//!     assert_eq!(state.get(&1).and_then(|n| n.children()), Some(&[2, 3][..]));
//!     assert_eq!(state.focused(), Some(&3));
//!     assert!(state.is_selected(&3));
//! });
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The `futures` dependency is
//! built with its `std` feature for shared futures.

#![no_std]

extern crate alloc;

mod drag;
mod error;
mod item;
mod navigate;
mod observe;
mod options;
mod selection;
mod source;
mod state;
mod store;

pub use drag::{DragHandler, DropEffect, DropResponse};
pub use error::{DropError, FetchError};
pub use item::{ItemId, NodeFlags, TreeItem, TreeNode};
pub use navigate::Navigation;
pub use observe::Subscription;
pub use options::TreeStoreOptions;
pub use selection::TreeSelection;
pub use source::TreeSource;
pub use state::{Ancestors, TreeState, VisibleRow};
pub use store::{SelectOptions, TreeStore};
