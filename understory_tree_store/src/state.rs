// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The observable tree snapshot and the traversal helpers that keep it consistent.

use core::cell::Cell;

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::item::{ItemId, TreeItem, TreeNode};
use crate::selection::TreeSelection;

/// Root-to-parent chain of ids. Most CMS trees are shallow.
pub(crate) type Lineage<K> = SmallVec<[K; 8]>;

/// A row of the windowed view, in depth-first display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleRow<K> {
    /// Node shown on this row.
    pub id: K,
    /// Depth relative to the window root; rows directly under it are `1`.
    pub depth: u32,
}

/// Snapshot of everything a renderer needs to paint the tree.
///
/// The store owns the only mutable copy and hands out shared borrows of it
/// to listeners after every change.
#[derive(Clone, Debug)]
pub struct TreeState<T: TreeItem> {
    pub(crate) root_items: Option<Vec<T::Id>>,
    pub(crate) items_by_id: HashMap<T::Id, TreeNode<T>>,
    pub(crate) focused: Option<T::Id>,
    pub(crate) selection: TreeSelection<T::Id>,
    pub(crate) view_under: Option<T::Id>,
    pub(crate) view_depth: Option<u32>,
    pub(crate) draggable: bool,
    pub(crate) dragging: bool,
    pub(crate) selected_undraggable: bool,
    /// Tree-wide loading holds; a root refresh and a pending drop may overlap.
    pub(crate) loading: Cell<u32>,
    pub(crate) revision: Cell<u64>,
}

impl<T: TreeItem> TreeState<T> {
    pub(crate) fn new(view_depth: Option<u32>, draggable: bool) -> Self {
        Self {
            root_items: None,
            items_by_id: HashMap::new(),
            focused: None,
            selection: TreeSelection::new(),
            view_under: None,
            view_depth,
            draggable,
            dragging: false,
            selected_undraggable: false,
            loading: Cell::new(0),
            revision: Cell::new(0),
        }
    }

    /// Top-level ids, or `None` before the first load.
    #[must_use]
    pub fn root_items(&self) -> Option<&[T::Id]> {
        self.root_items.as_deref()
    }

    /// The flat index over every materialized node.
    #[must_use]
    pub fn items_by_id(&self) -> &HashMap<T::Id, TreeNode<T>> {
        &self.items_by_id
    }

    /// Looks up a materialized node.
    #[must_use]
    pub fn get(&self, id: &T::Id) -> Option<&TreeNode<T>> {
        self.items_by_id.get(id)
    }

    /// Returns `true` if `id` is materialized.
    #[must_use]
    pub fn contains(&self, id: &T::Id) -> bool {
        self.items_by_id.contains_key(id)
    }

    /// Number of materialized nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items_by_id.len()
    }

    /// Returns `true` if nothing is materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items_by_id.is_empty()
    }

    /// The node owning keyboard focus.
    #[must_use]
    pub fn focused(&self) -> Option<&T::Id> {
        self.focused.as_ref()
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &TreeSelection<T::Id> {
        &self.selection
    }

    /// Selected nodes in selection order.
    #[must_use]
    pub fn selected_items(&self) -> Vec<&TreeNode<T>> {
        self.selection
            .iter()
            .filter_map(|id| self.items_by_id.get(id))
            .collect()
    }

    /// Returns `true` if `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selection.contains(id)
    }

    /// Window root for breadcrumb-style display; `None` shows the true root.
    #[must_use]
    pub fn view_under(&self) -> Option<&T::Id> {
        self.view_under.as_ref()
    }

    /// Maximum number of levels shown at once; `None` is unbounded.
    #[must_use]
    pub fn view_depth(&self) -> Option<u32> {
        self.view_depth
    }

    /// Ids shown at the top of the window: the window root's children, or
    /// the root items when no window root is set.
    #[must_use]
    pub fn view_items(&self) -> &[T::Id] {
        match &self.view_under {
            Some(id) => self
                .items_by_id
                .get(id)
                .and_then(TreeNode::children)
                .unwrap_or(&[]),
            None => self.root_items.as_deref().unwrap_or(&[]),
        }
    }

    /// `true` when a drag handler is configured.
    #[must_use]
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// `true` between a successful drag start and the drop or cancel.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// `true` when the drag handler rejects the current selection.
    #[must_use]
    pub fn selected_undraggable(&self) -> bool {
        self.selected_undraggable
    }

    /// `true` while the whole tree is loading (root refresh or pending drop).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.get() > 0
    }

    /// Counter bumped on every notification.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Iterates the ancestors of `id`, nearest first. Unknown ids yield nothing.
    pub fn ancestors<'a>(&'a self, id: &T::Id) -> Ancestors<'a, T> {
        Ancestors {
            state: self,
            next: self.items_by_id.get(id).and_then(|n| n.parent.as_ref()),
        }
    }

    /// Returns `true` if `ancestor` is a proper ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: &T::Id, id: &T::Id) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Every materialized descendant of `id`, depth-first, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: &T::Id) -> Vec<T::Id> {
        let mut out = Vec::new();
        if let Some(children) = self.items_by_id.get(id).and_then(TreeNode::children) {
            self.collect_subtrees(children, &mut out);
        }
        out
    }

    /// The deepest node that is a proper ancestor of every id in `ids`.
    ///
    /// Returns `None` for a single id, for ids that share no materialized
    /// ancestor, or when any id is unknown. `None` stands for the synthetic
    /// root above the top-level items.
    #[must_use]
    pub fn find_common_parent(&self, ids: &[T::Id]) -> Option<T::Id> {
        let (first, rest) = ids.split_first()?;
        if rest.is_empty() {
            return None;
        }
        let mut common = self.lineage(first);
        for id in rest {
            let other = self.lineage(id);
            let shared = common
                .iter()
                .zip(other.iter())
                .take_while(|(a, b)| a == b)
                .count();
            common.truncate(shared);
            if common.is_empty() {
                return None;
            }
        }
        common.pop()
    }

    /// Depth-first rows under the window root, limited to `view_depth` levels.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<VisibleRow<T::Id>> {
        let mut rows = Vec::new();
        self.push_rows(self.view_items(), 1, &mut rows);
        rows
    }

    /// Root-to-parent chain of proper ancestors of `id`.
    pub(crate) fn lineage(&self, id: &T::Id) -> Lineage<T::Id> {
        let mut chain: Lineage<T::Id> = self.ancestors(id).cloned().collect();
        chain.reverse();
        chain
    }

    /// Depth of `id` relative to the window root, or `None` when the node is
    /// not below it.
    pub(crate) fn window_depth(&self, id: &T::Id) -> Option<u32> {
        let node = self.items_by_id.get(id)?;
        match &self.view_under {
            None => Some(node.level),
            Some(root) => {
                let base = self.items_by_id.get(root)?.level;
                (node.level > base && self.is_ancestor(root, id)).then(|| node.level - base)
            }
        }
    }

    /// Moves focus to `id`, sliding the view window when it falls outside,
    /// reaches the window's last level, or lands on its midpoint.
    ///
    /// Returns `false` for unknown ids.
    pub(crate) fn focus_node(&mut self, id: &T::Id) -> bool {
        if !self.items_by_id.contains_key(id) {
            return false;
        }
        self.focused = Some(id.clone());
        self.slide_window(true);
        true
    }

    /// Puts focus back on `id` after nodes left the index. Unlike
    /// [`focus_node`](Self::focus_node) this leaves a midpoint focus alone,
    /// so a freshly repaired window stays where it is.
    pub(crate) fn restore_focus(&mut self, id: &T::Id) {
        if self.items_by_id.contains_key(id) {
            self.focused = Some(id.clone());
            self.slide_window(false);
        }
    }

    /// Re-roots the window around the focused node if it sits outside the
    /// window or on its last visible level.
    ///
    /// With `midpoint`, a node at relative depth `view_depth / 2` below an
    /// explicit window root also slides the window, one level up per step.
    pub(crate) fn slide_window(&mut self, midpoint: bool) {
        let Some(id) = self.focused.clone() else {
            return;
        };
        let depth = self.window_depth(&id);
        match self.view_depth {
            Some(max) => {
                let at_midpoint =
                    midpoint && self.view_under.is_some() && depth == Some(max / 2);
                if at_midpoint || depth.is_none_or(|d| d >= max) {
                    let steps = (max / 2 + 1) as usize;
                    self.view_under = self.ancestors(&id).nth(steps - 1).cloned();
                }
            }
            None => {
                if depth.is_none() {
                    self.view_under = None;
                }
            }
        }
    }

    /// Moves the window root up until it names an open node (or the true root).
    pub(crate) fn repair_view(&mut self, start: Option<T::Id>) {
        let mut candidate = start;
        while let Some(id) = candidate {
            match self.items_by_id.get(&id) {
                Some(node) if node.is_open() => {
                    self.view_under = Some(id);
                    return;
                }
                Some(node) => candidate = node.parent.clone(),
                None => candidate = None,
            }
        }
        self.view_under = None;
    }

    /// Removes every materialized descendant of `id` and collapses it.
    pub(crate) fn collapse(&mut self, id: &T::Id) {
        let removed = self.descendants(id);
        for child in &removed {
            self.items_by_id.remove(child);
        }
        if let Some(node) = self.items_by_id.get_mut(id) {
            node.children = None;
            node.set_open(false);
        }
    }

    /// Removes `id` and its subtree from wherever it is currently attached.
    pub(crate) fn detach(&mut self, id: &T::Id) {
        let Some(node) = self.items_by_id.get(id) else {
            return;
        };
        let parent = node.parent.clone();
        for child in self.descendants(id) {
            self.items_by_id.remove(&child);
        }
        self.items_by_id.remove(id);
        let siblings = match parent {
            Some(p) => self
                .items_by_id
                .get_mut(&p)
                .and_then(|n| n.children.as_mut()),
            None => self.root_items.as_mut(),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|s| s != id);
        }
    }

    /// Replaces the children of `target` (or the top level) with freshly
    /// fetched nodes.
    ///
    /// `top` lists the direct children in order; `nodes` holds them plus any
    /// re-opened descendants. Nodes that already exist elsewhere have moved
    /// and are detached from their old place first. When an id shows up under
    /// two parents, the first in display order wins. Returns `false`, leaving
    /// the state untouched, when `target` is gone or the result would make
    /// `target` its own descendant.
    pub(crate) fn install_children(
        &mut self,
        target: Option<&T::Id>,
        top: Vec<T::Id>,
        nodes: Vec<TreeNode<T>>,
    ) -> bool {
        if let Some(id) = target {
            if !self.items_by_id.contains_key(id) {
                return false;
            }
            if nodes
                .iter()
                .any(|n| &n.id == id || self.is_ancestor(&n.id, id))
            {
                log::warn!("children of {id:?} include the node itself or an ancestor");
                return false;
            }
        }

        let stale = match target {
            Some(id) => self.descendants(id),
            None => {
                let mut out = Vec::new();
                if let Some(roots) = self.root_items.as_deref() {
                    self.collect_subtrees(roots, &mut out);
                }
                out
            }
        };
        for id in &stale {
            self.items_by_id.remove(id);
        }
        for node in &nodes {
            if self.items_by_id.contains_key(&node.id) {
                self.detach(&node.id);
            }
        }

        let mut batch: HashMap<T::Id, TreeNode<T>> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if batch.contains_key(&node.id) {
                log::warn!("duplicate id {:?} in fetched children", node.id);
                continue;
            }
            batch.insert(node.id.clone(), node);
        }
        let top = self.adopt(target, top, &mut batch);

        match target {
            Some(id) => {
                if let Some(node) = self.items_by_id.get_mut(id) {
                    node.set_open(!top.is_empty());
                    node.children = (!top.is_empty()).then_some(top);
                }
            }
            None => self.root_items = Some(top),
        }
        true
    }

    /// Moves the listed children of `parent` from `batch` into the index,
    /// recursively, and returns the ids actually placed.
    ///
    /// An id is placed at most once, under the parent it was fetched for.
    fn adopt(
        &mut self,
        parent: Option<&T::Id>,
        ids: Vec<T::Id>,
        batch: &mut HashMap<T::Id, TreeNode<T>>,
    ) -> Vec<T::Id> {
        let mut placed = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(mut node) = batch.remove(&id) else {
                continue;
            };
            if node.parent.as_ref() != parent {
                batch.insert(id, node);
                continue;
            }
            if let Some(children) = node.children.take() {
                let children = self.adopt(Some(&id), children, batch);
                node.set_open(!children.is_empty());
                node.children = (!children.is_empty()).then_some(children);
            }
            self.items_by_id.insert(id.clone(), node);
            placed.push(id);
        }
        placed
    }

    /// The first id in display order, used when focus has nowhere else to go.
    pub(crate) fn first_visible(&self) -> Option<T::Id> {
        self.view_items()
            .first()
            .or_else(|| self.root_items.as_deref().and_then(<[_]>::first))
            .cloned()
    }

    fn collect_subtrees(&self, ids: &[T::Id], out: &mut Vec<T::Id>) {
        for id in ids {
            out.push(id.clone());
            if let Some(children) = self.items_by_id.get(id).and_then(TreeNode::children) {
                self.collect_subtrees(children, out);
            }
        }
    }

    fn push_rows(&self, ids: &[T::Id], depth: u32, rows: &mut Vec<VisibleRow<T::Id>>) {
        for id in ids {
            rows.push(VisibleRow {
                id: id.clone(),
                depth,
            });
            if self.view_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            if let Some(node) = self.items_by_id.get(id)
                && node.is_open()
                && let Some(children) = node.children()
            {
                self.push_rows(children, depth + 1, rows);
            }
        }
    }
}

/// Iterator over a node's ancestors, nearest first.
#[derive(Debug)]
pub struct Ancestors<'a, T: TreeItem> {
    state: &'a TreeState<T>,
    next: Option<&'a ItemId<T>>,
}

impl<'a, T: TreeItem> Iterator for Ancestors<'a, T> {
    type Item = &'a ItemId<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self
            .state
            .items_by_id
            .get(id)
            .and_then(|n| n.parent.as_ref());
        Some(id)
    }
}
