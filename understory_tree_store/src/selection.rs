// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Id-keyed selection bookkeeping for tree nodes.

use core::hash::Hash;

use alloc::vec::Vec;
use hashbrown::HashSet;

/// The set of selected node ids plus primary/anchor roles and a revision.
///
/// Membership is answered through a hash set so that sweeps against the
/// store's index stay linear; the ordered `items` vector is the cached
/// "selected items" sequence handed to renderers. The order is insertion
/// order and carries no meaning beyond being stable.
///
/// - **Primary** is the most recently selected id. The store falls back to it
///   when the focused node disappears during a refresh.
/// - **Anchor** is the pivot for range selection (shift-click), set by
///   replacing the selection with a single id.
#[derive(Clone, Debug)]
pub struct TreeSelection<K> {
    members: HashSet<K>,
    items: Vec<K>,
    primary: Option<K>,
    anchor: Option<K>,
    revision: u64,
}

impl<K> Default for TreeSelection<K> {
    fn default() -> Self {
        Self {
            members: HashSet::new(),
            items: Vec::new(),
            primary: None,
            anchor: None,
            revision: 0,
        }
    }
}

impl<K> TreeSelection<K> {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the selected ids in insertion order.
    #[must_use]
    pub fn items(&self) -> &[K] {
        &self.items
    }

    /// Returns an iterator over the selected ids.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.items.iter()
    }

    /// Returns the most recently selected id, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&K> {
        self.primary.as_ref()
    }

    /// Returns the range-selection pivot, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&K> {
        self.anchor.as_ref()
    }

    /// Returns the revision counter.
    ///
    /// Bumped only when the contents, primary, or anchor actually change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<K> TreeSelection<K>
where
    K: Clone + Eq + Hash,
{
    /// Returns `true` if `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.members.contains(id)
    }

    /// Removes everything, including primary and anchor.
    pub fn clear(&mut self) {
        if self.items.is_empty() && self.primary.is_none() && self.anchor.is_none() {
            return;
        }
        self.members.clear();
        self.items.clear();
        self.primary = None;
        self.anchor = None;
        self.bump_revision();
    }

    /// Replaces the selection with `id`, which becomes primary and anchor.
    pub fn select_only(&mut self, id: K) {
        if self.items.len() == 1
            && self.items[0] == id
            && self.primary.as_ref() == Some(&id)
            && self.anchor.as_ref() == Some(&id)
        {
            return;
        }
        self.members.clear();
        self.items.clear();
        self.members.insert(id.clone());
        self.items.push(id.clone());
        self.primary = Some(id.clone());
        self.anchor = Some(id);
        self.bump_revision();
    }

    /// Adds `id` if absent. Either way it becomes the primary id.
    ///
    /// The anchor is set only when the selection was empty.
    pub fn add(&mut self, id: K) {
        if self.members.contains(&id) {
            if self.primary.as_ref() != Some(&id) {
                self.primary = Some(id);
                self.bump_revision();
            }
            return;
        }
        if self.anchor.is_none() {
            self.anchor = Some(id.clone());
        }
        self.members.insert(id.clone());
        self.items.push(id.clone());
        self.primary = Some(id);
        self.bump_revision();
    }

    /// Removes `id` if present, clearing any role it held.
    pub fn remove(&mut self, id: &K) {
        if !self.members.remove(id) {
            return;
        }
        self.items.retain(|k| k != id);
        self.drop_roles(id);
        self.bump_revision();
    }

    /// Makes a selected `id` the primary id. No-op if `id` is not selected.
    pub fn set_primary(&mut self, id: &K) {
        if !self.members.contains(id) || self.primary.as_ref() == Some(id) {
            return;
        }
        self.primary = Some(id.clone());
        self.bump_revision();
    }

    /// Replaces the selection with a batch of ids, ignoring duplicates.
    ///
    /// The previous anchor is kept if it is still present; otherwise the first
    /// id becomes the anchor. The last id becomes primary.
    pub fn replace_with<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = K>,
    {
        let mut members = HashSet::new();
        let mut items = Vec::new();
        for id in ids {
            if members.insert(id.clone()) {
                items.push(id);
            }
        }

        let anchor = match &self.anchor {
            Some(old) if members.contains(old) => Some(old.clone()),
            _ => items.first().cloned(),
        };
        let primary = items.last().cloned();

        if items == self.items && primary == self.primary && anchor == self.anchor {
            return;
        }
        self.members = members;
        self.items = items;
        self.primary = primary;
        self.anchor = anchor;
        self.bump_revision();
    }

    /// Keeps only the ids for which `keep` returns `true`.
    ///
    /// Returns the number of ids removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let before = self.items.len();
        let mut dropped = Vec::new();
        self.items.retain(|id| {
            let kept = keep(id);
            if !kept {
                dropped.push(id.clone());
            }
            kept
        });
        for id in &dropped {
            self.members.remove(id);
            self.drop_roles(id);
        }
        let removed = before - self.items.len();
        if removed > 0 {
            self.bump_revision();
        }
        removed
    }

    fn drop_roles(&mut self, id: &K) {
        if self.primary.as_ref() == Some(id) {
            self.primary = self.items.last().cloned();
        }
        if self.anchor.as_ref() == Some(id) {
            self.anchor = None;
        }
        if self.items.is_empty() {
            self.primary = None;
            self.anchor = None;
        }
    }
}
