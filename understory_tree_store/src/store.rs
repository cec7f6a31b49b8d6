// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree store: fetch orchestration, selection, focus, windowing, drag-and-drop.

use core::cell::{Cell, Ref, RefCell};
use core::fmt;

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::drag::{DragHandler, DropEffect, DropResponse};
use crate::error::FetchError;
use crate::item::{TreeItem, TreeNode};
use crate::navigate::Navigation;
use crate::observe::{self, Listeners, Subscription};
use crate::options::TreeStoreOptions;
use crate::source::TreeSource;
use crate::state::TreeState;

type RefreshResult<E> = Result<(), FetchError<E>>;
type SharedRefresh<E> = Shared<LocalBoxFuture<'static, RefreshResult<E>>>;

/// How [`TreeStore::select`] changes the selection.
///
/// The default is a plain click: replace the selection and notify.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SelectOptions {
    /// Empty the selection first and move focus to the node.
    pub clear: bool,
    /// Notify listeners afterwards.
    pub notify: bool,
    /// Deselect the node if it is already selected.
    pub toggle: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            clear: true,
            notify: true,
            toggle: false,
        }
    }
}

impl SelectOptions {
    /// Plain click: the node becomes the only selected node.
    #[must_use]
    pub fn replacing() -> Self {
        Self::default()
    }

    /// Add the node to the existing selection.
    #[must_use]
    pub fn adding() -> Self {
        Self {
            clear: false,
            ..Self::default()
        }
    }

    /// Ctrl-click: flip the node's membership.
    #[must_use]
    pub fn toggling() -> Self {
        Self {
            clear: false,
            toggle: true,
            ..Self::default()
        }
    }

    /// Suppress the notification.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.notify = false;
        self
    }
}

struct InFlight<K, E> {
    ticket: u64,
    target: Option<K>,
    future: SharedRefresh<E>,
}

/// Children fetched for one refresh, including re-opened descendants.
struct Loaded<T: TreeItem> {
    top: Vec<T::Id>,
    nodes: Vec<TreeNode<T>>,
}

struct Inner<T: TreeItem, S: TreeSource<T>> {
    source: S,
    drag: Option<Box<dyn DragHandler<T>>>,
    single_select: bool,
    state: RefCell<TreeState<T>>,
    listeners: Rc<RefCell<Listeners<TreeState<T>>>>,
    in_flight: RefCell<Option<InFlight<T::Id, S::Error>>>,
    next_ticket: Cell<u64>,
}

/// Clears a loading flag when dropped, whether the work finished, failed, or
/// was abandoned.
struct LoadingGuard<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    inner: Weak<Inner<T, S>>,
    target: Option<T::Id>,
    ticket: Option<u64>,
}

impl<T, S> LoadingGuard<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    fn acquire(inner: &Rc<Inner<T, S>>, target: Option<T::Id>, ticket: Option<u64>) -> Self {
        {
            let mut state = inner.state.borrow_mut();
            match &target {
                None => state.loading.set(state.loading.get().saturating_add(1)),
                Some(id) => {
                    if let Some(node) = state.items_by_id.get_mut(id) {
                        node.set_loading(true);
                    }
                }
            }
        }
        Self {
            inner: Rc::downgrade(inner),
            target,
            ticket,
        }
    }
}

impl<T, S> Drop for LoadingGuard<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.finish_loading(self.target.as_ref(), self.ticket);
        }
    }
}

impl<T, S> Inner<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    fn notify(&self) {
        let Ok(state) = self.state.try_borrow() else {
            log::debug!("notification skipped, tree state is being mutated");
            return;
        };
        state.revision.set(state.revision.get().wrapping_add(1));
        match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.notify(&state),
            Err(_) => log::debug!("notification skipped, listeners are already running"),
        }
    }

    fn finish_loading(&self, target: Option<&T::Id>, ticket: Option<u64>) {
        match target {
            None => match self.state.try_borrow() {
                Ok(state) => state.loading.set(state.loading.get().saturating_sub(1)),
                Err(_) => log::debug!("tree loading flag left set, state is being mutated"),
            },
            Some(id) => match self.state.try_borrow_mut() {
                Ok(mut state) => {
                    if let Some(node) = state.items_by_id.get_mut(id) {
                        node.set_loading(false);
                    }
                }
                Err(_) => log::debug!("loading flag of {id:?} left set, state is borrowed"),
            },
        }
        if let Some(ticket) = ticket
            && let Ok(mut slot) = self.in_flight.try_borrow_mut()
            && slot.as_ref().is_some_and(|f| f.ticket == ticket)
        {
            slot.take();
        }
        self.notify();
    }

    fn fetch_nodes(
        &self,
        parent: Option<&TreeNode<T>>,
    ) -> LocalBoxFuture<'static, Result<Vec<TreeNode<T>>, FetchError<S::Error>>> {
        let parent_id = parent.map(|p| p.id.clone());
        let level = parent.map_or(1, |p| p.level + 1);
        let request = self.source.fetch_children(parent);
        async move {
            let items = request.await.map_err(FetchError::new)?;
            Ok(items
                .into_iter()
                .map(|item| TreeNode::new(item, parent_id.clone(), level))
                .collect())
        }
        .boxed_local()
    }

    /// Fetches the children of `parent` and, for every child whose current
    /// node is open, its children as well.
    fn load(
        this: &Rc<Self>,
        parent: Option<&TreeNode<T>>,
    ) -> LocalBoxFuture<'static, Result<Loaded<T>, FetchError<S::Error>>> {
        let request = this.fetch_nodes(parent);
        let this = Rc::downgrade(this);
        async move {
            let fetched = request.await?;
            let mut loaded = Loaded {
                top: Vec::with_capacity(fetched.len()),
                nodes: Vec::new(),
            };
            for mut node in fetched {
                let reopen = this.upgrade().and_then(|inner| {
                    let was_open = inner
                        .state
                        .borrow()
                        .get(&node.id)
                        .is_some_and(TreeNode::is_open);
                    (was_open && node.can_open()).then(|| Self::load(&inner, Some(&node)))
                });
                if let Some(request) = reopen {
                    let below = request.await?;
                    if !below.top.is_empty() {
                        node.children = Some(below.top);
                        node.set_open(true);
                        loaded.nodes.extend(below.nodes);
                    }
                }
                loaded.top.push(node.id.clone());
                loaded.nodes.push(node);
            }
            Ok(loaded)
        }
        .boxed_local()
    }

    /// Holds only a weak handle across awaits, so a refresh parked in the
    /// single-flight slot does not keep the store alive.
    fn run_refresh(
        this: Weak<Self>,
        target: Option<T::Id>,
        notify: bool,
        ticket: u64,
    ) -> LocalBoxFuture<'static, RefreshResult<S::Error>> {
        async move {
            let Some(inner) = this.upgrade() else {
                return Ok(());
            };
            let _guard = LoadingGuard::acquire(&inner, target.clone(), Some(ticket));
            if notify {
                inner.notify();
            }
            let request = {
                let state = inner.state.borrow();
                match &target {
                    None => Self::load(&inner, None),
                    Some(id) => match state.get(id) {
                        Some(node) => Self::load(&inner, Some(node)),
                        None => {
                            log::debug!("refresh of unknown node {id:?} ignored");
                            return Ok(());
                        }
                    },
                }
            };
            drop(inner);
            let loaded = request.await?;

            let Some(inner) = this.upgrade() else {
                return Ok(());
            };
            let mut state = inner.state.borrow_mut();
            if state.install_children(target.as_ref(), loaded.top, loaded.nodes) {
                inner.settle(&mut state, None, target.clone());
            } else {
                log::debug!("refresh of {target:?} discarded, node left the tree");
            }
            Ok(())
        }
        .boxed_local()
    }

    /// Restores the selection, window, and focus invariants after nodes
    /// left the index.
    fn settle(
        &self,
        state: &mut TreeState<T>,
        preferred_focus: Option<T::Id>,
        view_start: Option<T::Id>,
    ) {
        state
            .selection
            .retain(|id| state.items_by_id.contains_key(id));

        if let Some(view) = state.view_under.clone()
            && !state.get(&view).is_some_and(TreeNode::is_open)
        {
            let start = if state.contains(&view) {
                Some(view)
            } else {
                view_start
            };
            state.repair_view(start);
        }

        let focus_valid = state
            .focused
            .as_ref()
            .is_some_and(|id| state.contains(id));
        if !focus_valid {
            let next = preferred_focus
                .filter(|id| state.contains(id))
                .or_else(|| state.selection.primary().cloned())
                .or_else(|| state.first_visible());
            match next {
                Some(id) => state.restore_focus(&id),
                None => state.focused = None,
            }
        }

        self.update_drag_eligibility(state);
    }

    fn update_drag_eligibility(&self, state: &mut TreeState<T>) {
        let undraggable = match &self.drag {
            Some(handler) if !state.selection.is_empty() => {
                !handler.drag_eligible(&state.selected_items())
            }
            _ => false,
        };
        state.selected_undraggable = undraggable;
    }

    fn drop_eligible_in(&self, state: &TreeState<T>, target: &T::Id, above: bool) -> bool {
        let Some(target_node) = state.get(target) else {
            return false;
        };
        if state.selection.is_empty()
            || state.selection.contains(target)
            || state.ancestors(target).any(|a| state.selection.contains(a))
            || state.selection.iter().any(|s| state.is_ancestor(target, s))
        {
            return false;
        }
        match &self.drag {
            Some(handler) => handler.drop_eligible(&state.selected_items(), target_node, above),
            None => true,
        }
    }
}

/// An observable, lazily materialized tree.
///
/// The store holds only what is currently expanded (plus the top level),
/// keeps a flat id index over it, and tracks selection, keyboard focus, a
/// sliding view window, and drag state. Children come from a [`TreeSource`];
/// drops are delegated to a [`DragHandler`].
///
/// The store is single-threaded: it is cheap to clone (clones share state)
/// and its futures are meant for a local executor such as the browser event
/// loop. Every public mutation ends with one notification to subscribers.
///
/// Nodes are addressed by id. Operations given an id that is not
/// materialized are silently ignored, since such ids are usually stale
/// references left over from a refresh.
pub struct TreeStore<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    inner: Rc<Inner<T, S>>,
}

impl<T, S> Clone for TreeStore<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, S> fmt::Debug for TreeStore<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("TreeStore");
        if let Ok(state) = self.inner.state.try_borrow() {
            out.field("revision", &state.revision.get())
                .field("materialized", &state.len())
                .field("selected", &state.selection.len())
                .field("loading", &state.is_loading());
        }
        let refreshing = self
            .inner
            .in_flight
            .try_borrow()
            .is_ok_and(|slot| slot.is_some());
        out.field("refreshing", &refreshing)
            .finish_non_exhaustive()
    }
}

impl<T, S> TreeStore<T, S>
where
    T: TreeItem + 'static,
    S: TreeSource<T> + 'static,
{
    /// Creates an empty store with default options.
    ///
    /// Nothing is fetched until the first [`refresh`](Self::refresh).
    pub fn new(source: S) -> Self {
        Self::with_options(source, TreeStoreOptions::default())
    }

    /// Creates an empty store with the given options.
    pub fn with_options(source: S, options: TreeStoreOptions<T>) -> Self {
        let state = TreeState::new(options.view_depth, options.drag.is_some());
        Self {
            inner: Rc::new(Inner {
                source,
                drag: options.drag,
                single_select: options.single_select,
                state: RefCell::new(state),
                listeners: Rc::new(RefCell::new(Listeners::new())),
                in_flight: RefCell::new(None),
                next_ticket: Cell::new(0),
            }),
        }
    }

    /// Borrows the current state.
    ///
    /// Do not hold the borrow across an `.await` on this store.
    pub fn state(&self) -> Ref<'_, TreeState<T>> {
        self.inner.state.borrow()
    }

    /// Returns the data source.
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Registers a listener called with the new state after every change.
    ///
    /// Listeners must not call back into the store synchronously.
    pub fn subscribe(&self, listener: impl FnMut(&TreeState<T>) + 'static) -> Subscription {
        observe::subscribe(&self.inner.listeners, Box::new(listener))
    }

    /// Fetches the children of `parent` (or the top level) as detached nodes.
    ///
    /// The nodes carry their level and parent but are not added to the
    /// store; no state changes.
    pub fn fetch(
        &self,
        parent: Option<&TreeNode<T>>,
    ) -> LocalBoxFuture<'static, Result<Vec<TreeNode<T>>, FetchError<S::Error>>> {
        self.inner.fetch_nodes(parent)
    }

    /// Re-fetches the children of `target`, or the whole tree for `None`.
    ///
    /// Open descendants whose ids reappear stay open and are re-fetched;
    /// everything else under `target` is discarded. Selected ids that
    /// vanished are deselected, and focus moves to the last-selected or first
    /// visible node if the focused node vanished. Refreshing a collapsed node
    /// opens it when it has children.
    ///
    /// Only one refresh runs at a time. A call for the same target as the
    /// running refresh shares its result; a call for another target waits
    /// for it before starting.
    ///
    /// # Errors
    ///
    /// Returns the source's error. The loading flag is cleared and the
    /// target's children are left as they were.
    pub async fn refresh(&self, target: Option<&T::Id>) -> Result<(), FetchError<S::Error>> {
        self.refresh_with(target.cloned(), true).await
    }

    async fn refresh_with(&self, target: Option<T::Id>, notify: bool) -> RefreshResult<S::Error> {
        loop {
            let running = self
                .inner
                .in_flight
                .borrow()
                .as_ref()
                .map(|f| (f.target.clone(), f.future.clone()));
            let Some((running_target, future)) = running else {
                break;
            };
            if future.peek().is_some() {
                self.inner.in_flight.borrow_mut().take();
                continue;
            }
            if running_target == target {
                return future.await;
            }
            // Failures belong to the caller that started it.
            let _ = future.await;
        }

        let ticket = self.inner.next_ticket.get();
        self.inner.next_ticket.set(ticket.wrapping_add(1));
        let future =
            Inner::run_refresh(Rc::downgrade(&self.inner), target.clone(), notify, ticket).shared();
        *self.inner.in_flight.borrow_mut() = Some(InFlight {
            ticket,
            target,
            future: future.clone(),
        });
        future.await
    }

    /// Expands `id`, fetching its children.
    ///
    /// No-op for unknown ids, open nodes, and known leaves. A second `open`
    /// of the same node while the first is loading joins the first.
    ///
    /// # Errors
    ///
    /// Returns the source's error; the node stays collapsed.
    pub async fn open(&self, id: &T::Id) -> Result<(), FetchError<S::Error>> {
        let wanted = self
            .inner
            .state
            .borrow()
            .get(id)
            .is_some_and(|node| !node.is_open() && node.can_open());
        if !wanted {
            return Ok(());
        }
        self.refresh_with(Some(id.clone()), false).await
    }

    /// Collapses `id`, discarding its materialized descendants.
    ///
    /// Idempotent: closing a collapsed node changes nothing and does not notify.
    pub fn close(&self, id: &T::Id) {
        {
            let mut state = self.inner.state.borrow_mut();
            let Some(node) = state.get(id) else {
                return;
            };
            if !node.is_open() && node.children.is_none() {
                return;
            }
            state.collapse(id);
            self.inner
                .settle(&mut state, Some(id.clone()), Some(id.clone()));
        }
        self.inner.notify();
    }

    /// Opens a collapsed node or closes an open one.
    ///
    /// # Errors
    ///
    /// Returns the source's error when opening fails.
    pub async fn toggle(&self, id: &T::Id) -> Result<(), FetchError<S::Error>> {
        let open = self.inner.state.borrow().get(id).map(TreeNode::is_open);
        match open {
            Some(true) => {
                self.close(id);
                Ok(())
            }
            Some(false) => self.open(id).await,
            None => Ok(()),
        }
    }

    /// Moves keyboard focus to `id`.
    ///
    /// When the node lies outside the view window, on the window's last
    /// visible level, or on its midpoint below a window root, the window
    /// slides so the node sits half a window below the new window root.
    /// `None` is ignored.
    pub fn focus(&self, id: Option<&T::Id>) {
        let Some(id) = id else {
            return;
        };
        let moved = self.inner.state.borrow_mut().focus_node(id);
        if moved {
            self.inner.notify();
        }
    }

    /// Moves focus according to a keyboard navigation intent.
    ///
    /// Returns the newly focused id, or `None` if focus did not move.
    pub fn navigate(&self, nav: Navigation) -> Option<T::Id> {
        let target = {
            let mut state = self.inner.state.borrow_mut();
            let target = state.navigation_target(nav)?;
            if state.focused.as_ref() == Some(&target) {
                return None;
            }
            state.focus_node(&target);
            target
        };
        self.inner.notify();
        Some(target)
    }

    /// Selects `id` according to `options`.
    ///
    /// With `single_select` configured the selection is always replaced.
    /// Toggling an already selected node deselects it, unless the selection
    /// is being replaced and other nodes are selected.
    pub fn select(&self, id: &T::Id, options: SelectOptions) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.contains(id) {
                log::debug!("select of unknown node {id:?} ignored");
                return;
            }
            let clear = options.clear || self.inner.single_select;
            let selected = state.selection.contains(id);
            if options.toggle && selected && (!clear || state.selection.len() == 1) {
                state.selection.remove(id);
            } else if clear {
                state.selection.select_only(id.clone());
            } else {
                state.selection.add(id.clone());
            }
            if clear {
                state.focus_node(id);
            }
            self.inner.update_drag_eligibility(&mut state);
        }
        if options.notify {
            self.inner.notify();
        }
    }

    /// Extends the selection from the anchor to `id` over the visible rows
    /// (shift-click) and focuses `id`.
    ///
    /// Falls back to selecting only `id` when there is no anchor, the anchor
    /// is not visible, or `single_select` is configured.
    pub fn select_range(&self, id: &T::Id) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.contains(id) {
                return;
            }
            let anchor = state
                .selection
                .anchor()
                .cloned()
                .filter(|_| !self.inner.single_select);
            let range = anchor.and_then(|anchor| {
                let rows = state.visible_rows();
                let a = rows.iter().position(|row| row.id == anchor)?;
                let b = rows.iter().position(|row| &row.id == id)?;
                let (start, end) = if a <= b { (a, b) } else { (b, a) };
                Some(
                    rows[start..=end]
                        .iter()
                        .map(|row| row.id.clone())
                        .collect::<Vec<_>>(),
                )
            });
            match range {
                Some(range) => {
                    state.selection.replace_with(range);
                    state.selection.set_primary(id);
                }
                None => state.selection.select_only(id.clone()),
            }
            state.focus_node(id);
            self.inner.update_drag_eligibility(&mut state);
        }
        self.inner.notify();
    }

    /// Removes `id` from the selection.
    pub fn deselect(&self, id: &T::Id) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.selection.contains(id) {
                return;
            }
            state.selection.remove(id);
            self.inner.update_drag_eligibility(&mut state);
        }
        self.inner.notify();
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.inner.state.borrow().is_selected(id)
    }

    /// The deepest node that is a proper ancestor of every id in `ids`.
    ///
    /// See [`TreeState::find_common_parent`].
    pub fn find_common_parent(&self, ids: &[T::Id]) -> Option<T::Id> {
        self.inner.state.borrow().find_common_parent(ids)
    }

    /// Starts dragging from `id`.
    ///
    /// Dragging an unselected node makes it the only selected node. Returns
    /// `false` when already dragging, when no drag handler is configured, or
    /// when the handler rejects the selection.
    pub fn drag_start(&self, id: &T::Id) -> bool {
        let started = {
            let mut state = self.inner.state.borrow_mut();
            if state.dragging || !state.draggable || !state.contains(id) {
                return false;
            }
            if !state.selection.contains(id) {
                state.selection.select_only(id.clone());
                state.focus_node(id);
                self.inner.update_drag_eligibility(&mut state);
            }
            state.dragging = !state.selected_undraggable;
            state.dragging
        };
        self.inner.notify();
        started
    }

    /// Cancels an in-progress drag without dropping.
    pub fn drag_end(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.dragging {
                return;
            }
            state.dragging = false;
        }
        self.inner.notify();
    }

    /// Whether the selection may be dropped onto `target`.
    ///
    /// Always `false` for an empty selection and for targets on a selected
    /// node's lineage: the node itself, its descendants, and its ancestors.
    /// Otherwise the drag handler decides.
    pub fn drop_eligible(&self, target: &T::Id, above: bool) -> bool {
        let state = self.inner.state.borrow();
        self.inner.drop_eligible_in(&state, target, above)
    }

    /// The effect a drop of the selection onto `target` would have.
    pub fn drop_effect(&self, target: &T::Id, above: bool) -> DropEffect {
        let state = self.inner.state.borrow();
        match (&self.inner.drag, state.get(target)) {
            (Some(handler), Some(target_node)) => {
                handler.drop_effect(&state.selected_items(), target_node, above)
            }
            _ => DropEffect::default(),
        }
    }

    /// Drops the selection onto `target` (inside it, or above it as a sibling).
    ///
    /// Returns `Ok(false)` without calling the handler when no handler is
    /// configured or the drop is not eligible. A synchronous handler answer
    /// is returned as is. A pending handler is awaited; a failure is logged
    /// and swallowed. Afterwards the common parent of the selection and the
    /// target (or the whole tree) is refreshed to pick up server changes.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the follow-up refresh fails.
    pub async fn drop_onto(
        &self,
        target: &T::Id,
        above: bool,
    ) -> Result<bool, FetchError<S::Error>> {
        let Some(handler) = self.inner.drag.as_deref() else {
            return Ok(false);
        };
        if !self.drop_eligible(target, above) {
            return Ok(false);
        }

        self.inner.state.borrow_mut().dragging = false;
        let guard = LoadingGuard::acquire(&self.inner, None, None);
        self.inner.notify();

        let (response, common) = {
            let state = self.inner.state.borrow();
            let Some(target_node) = state.get(target) else {
                return Ok(false);
            };
            let mut scope: Vec<T::Id> = state.selection.items().to_vec();
            scope.push(target.clone());
            let common = state.find_common_parent(&scope);
            let response = handler.on_drop(&state.selected_items(), target_node, above);
            (response, common)
        };

        match response {
            DropResponse::Done(accepted) => {
                drop(guard);
                Ok(accepted)
            }
            DropResponse::Pending(pending) => {
                let accepted = match pending.await {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        log::warn!("drop onto {target:?} failed: {err}");
                        true
                    }
                };
                drop(guard);
                self.refresh(common.as_ref()).await?;
                Ok(accepted)
            }
        }
    }

    /// Re-roots the view window at `id`, or at the true root for `None`.
    ///
    /// Unknown ids and nodes that are not open are ignored. If the focused
    /// node falls outside the new window, focus moves to the window's first
    /// row.
    pub fn set_view_under(&self, id: Option<&T::Id>) {
        {
            let mut state = self.inner.state.borrow_mut();
            if let Some(id) = id
                && !state.get(id).is_some_and(TreeNode::is_open)
            {
                log::debug!("view root {id:?} ignored, node is unknown or collapsed");
                return;
            }
            state.view_under = id.cloned();
            let max = state.view_depth;
            let inside = state.focused.as_ref().is_some_and(|f| {
                state
                    .window_depth(f)
                    .is_some_and(|d| max.is_none_or(|max| d <= max))
            });
            if !inside && let Some(first) = state.view_items().first().cloned() {
                state.focused = Some(first);
            }
        }
        self.inner.notify();
    }

    /// Changes how many levels are visible at once; `None` is unbounded.
    ///
    /// The window slides around the focused node if needed. Zero is treated
    /// as one.
    pub fn set_view_depth(&self, depth: Option<u32>) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.view_depth = depth.map(|d| d.max(1));
            state.slide_window(false);
        }
        self.inner.notify();
    }
}
