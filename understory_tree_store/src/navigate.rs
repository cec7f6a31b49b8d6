// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard navigation intents over the windowed rows.

use crate::item::{TreeItem, TreeNode};
use crate::state::TreeState;

/// A keyboard navigation intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Next visible row (arrow down).
    Next,
    /// Previous visible row (arrow up). From the first row this climbs to
    /// the window root so the window can slide upward.
    Previous,
    /// The focused node's parent (arrow left on a collapsed node).
    Parent,
    /// The focused node's first child, if it is open (arrow right).
    FirstChild,
    /// First visible row (home).
    First,
    /// Last visible row (end).
    Last,
}

impl<T: TreeItem> TreeState<T> {
    /// Resolves a navigation intent to the id that should receive focus.
    ///
    /// Without a focused node every intent lands on the first visible row.
    /// Returns `None` when there is nowhere to go.
    #[must_use]
    pub fn navigation_target(&self, nav: Navigation) -> Option<T::Id> {
        let rows = self.visible_rows();
        let Some(current) = self.focused.as_ref() else {
            return rows.first().map(|row| row.id.clone());
        };
        let position = rows.iter().position(|row| &row.id == current);
        match nav {
            Navigation::First => rows.first().map(|row| row.id.clone()),
            Navigation::Last => rows.last().map(|row| row.id.clone()),
            Navigation::Next => match position {
                Some(idx) => rows.get(idx + 1).map(|row| row.id.clone()),
                None => rows.first().map(|row| row.id.clone()),
            },
            Navigation::Previous => match position {
                Some(0) => self.view_under.clone(),
                Some(idx) => Some(rows[idx - 1].id.clone()),
                None => rows.first().map(|row| row.id.clone()),
            },
            Navigation::Parent => self.get(current).and_then(TreeNode::parent).cloned(),
            Navigation::FirstChild => self
                .get(current)
                .filter(|node| node.is_open())
                .and_then(TreeNode::children)
                .and_then(<[_]>::first)
                .cloned(),
        }
    }
}
