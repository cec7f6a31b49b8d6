// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: an in-memory page site with scriptable latency and failures.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use understory_tree_store::{TreeItem, TreeNode, TreeSource, TreeState, TreeStore};

/// A CMS page as the fake server reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub has_children: Option<bool>,
}

impl TreeItem for Page {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn has_children(&self) -> Option<bool> {
        self.has_children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteError(pub String);

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site error: {}", self.0)
    }
}

impl std::error::Error for SiteError {}

#[derive(Default)]
struct SiteData {
    children: HashMap<Option<String>, Vec<Page>>,
    calls: Vec<Option<String>>,
    failing: HashSet<Option<String>>,
    hold: bool,
    gates: Vec<oneshot::Sender<()>>,
}

/// In-memory page hierarchy. Clones share the same data, so a test can keep a
/// handle after moving one into the store.
///
/// Responses are computed when a fetch resolves, not when it is issued, so a
/// held fetch observes edits made while it was pending.
#[derive(Clone, Default)]
pub struct FakeSite {
    data: Rc<RefCell<SiteData>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the children of `parent`. A `true` flag marks a page that has
    /// children; `false` marks a leaf.
    pub fn set_children(&self, parent: Option<&str>, pages: &[(&str, bool)]) {
        let pages = pages
            .iter()
            .map(|(id, has_children)| Page {
                id: (*id).to_string(),
                has_children: Some(*has_children),
            })
            .collect();
        self.data
            .borrow_mut()
            .children
            .insert(parent.map(str::to_string), pages);
    }

    /// Every fetch issued so far, by parent id.
    pub fn calls(&self) -> Vec<Option<String>> {
        self.data.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.data.borrow().calls.len()
    }

    pub fn clear_calls(&self) {
        self.data.borrow_mut().calls.clear();
    }

    pub fn fail(&self, parent: Option<&str>, failing: bool) {
        let key = parent.map(str::to_string);
        let mut data = self.data.borrow_mut();
        if failing {
            data.failing.insert(key);
        } else {
            data.failing.remove(&key);
        }
    }

    /// While held, fetches stay pending until [`FakeSite::release`].
    pub fn hold(&self, hold: bool) {
        self.data.borrow_mut().hold = hold;
    }

    /// Unblocks every held fetch. Returns how many were waiting.
    pub fn release(&self) -> usize {
        let gates: Vec<_> = self.data.borrow_mut().gates.drain(..).collect();
        let count = gates.len();
        for gate in gates {
            let _ = gate.send(());
        }
        count
    }

    pub fn held(&self) -> usize {
        self.data.borrow().gates.len()
    }

    /// Live handles to the shared site data, including ones captured by
    /// pending fetches.
    pub fn handles(&self) -> usize {
        Rc::strong_count(&self.data)
    }
}

impl TreeSource<Page> for FakeSite {
    type Error = SiteError;

    fn fetch_children(
        &self,
        parent: Option<&TreeNode<Page>>,
    ) -> LocalBoxFuture<'static, Result<Vec<Page>, SiteError>> {
        let key = parent.map(|node| node.id().clone());
        let gate = {
            let mut data = self.data.borrow_mut();
            data.calls.push(key.clone());
            data.hold.then(|| {
                let (tx, rx) = oneshot::channel();
                data.gates.push(tx);
                rx
            })
        };
        let data = Rc::clone(&self.data);
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let data = data.borrow();
            if data.failing.contains(&key) {
                return Err(SiteError(format!("cannot list {key:?}")));
            }
            Ok(data.children.get(&key).cloned().unwrap_or_default())
        }
        .boxed_local()
    }
}

pub type Store = TreeStore<Page, FakeSite>;

pub fn id(s: &str) -> String {
    s.to_string()
}

pub fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// ```text
/// home
///   about
///   blog
///     post-1
///     post-2
///   team
///     alice
/// contact
/// ```
pub fn site() -> FakeSite {
    let site = FakeSite::new();
    site.set_children(None, &[("home", true), ("contact", false)]);
    site.set_children(
        Some("home"),
        &[("about", false), ("blog", true), ("team", true)],
    );
    site.set_children(Some("blog"), &[("post-1", false), ("post-2", false)]);
    site.set_children(Some("team"), &[("alice", false)]);
    site
}

/// A single chain `l1 -> l2 -> ... -> l6`.
pub fn chain_site() -> FakeSite {
    let site = FakeSite::new();
    site.set_children(None, &[("l1", true)]);
    for level in 1..6 {
        let parent = format!("l{level}");
        let child = format!("l{}", level + 1);
        site.set_children(Some(parent.as_str()), &[(child.as_str(), level + 1 < 6)]);
    }
    site
}

/// Opens every id in order, on top of a root refresh.
pub fn load(store: &Store, open: &[&str]) {
    futures::executor::block_on(async {
        store.refresh(None).await.expect("root refresh");
        for node in open {
            store.open(&id(node)).await.expect("open");
        }
    });
}

/// Spawns `future` on `pool`, returning a slot that receives its output.
pub fn spawn<F>(pool: &LocalPool, future: F) -> Rc<RefCell<Option<F::Output>>>
where
    F: Future + 'static,
    F::Output: 'static,
{
    let slot = Rc::new(RefCell::new(None));
    let out = Rc::clone(&slot);
    pool.spawner()
        .spawn_local(async move {
            let value = future.await;
            *out.borrow_mut() = Some(value);
        })
        .expect("spawn on local pool");
    slot
}

/// Checks the index, selection, focus, and window invariants.
pub fn assert_consistent(state: &TreeState<Page>) {
    let mut reachable = HashSet::new();
    let mut stack: Vec<(String, Option<String>, u32)> = state
        .root_items()
        .unwrap_or(&[])
        .iter()
        .map(|id| (id.clone(), None, 1))
        .collect();
    while let Some((id, parent, level)) = stack.pop() {
        let node = state
            .get(&id)
            .unwrap_or_else(|| panic!("{id} is linked but not indexed"));
        assert_eq!(node.parent(), parent.as_ref(), "parent link of {id}");
        assert_eq!(node.level(), level, "level of {id}");
        assert!(reachable.insert(id.clone()), "{id} is linked twice");
        assert_eq!(
            node.children().is_some(),
            node.is_open(),
            "children present iff open for {id}"
        );
        for child in node.children().unwrap_or(&[]) {
            stack.push((child.clone(), Some(id.clone()), level + 1));
        }
    }
    let indexed: HashSet<String> = state.items_by_id().keys().cloned().collect();
    assert_eq!(indexed, reachable, "index matches reachable nodes");

    for selected in state.selection().iter() {
        assert!(state.contains(selected), "selected {selected} is indexed");
    }
    if !state.is_empty() {
        let focused = state.focused().expect("non-empty tree has focus");
        assert!(state.contains(focused), "focused {focused} is indexed");
    }
    if let Some(view) = state.view_under() {
        assert!(
            state.get(view).is_some_and(|n| n.is_open()),
            "window root {view} is indexed and open"
        );
    }
}
