#![forbid(unsafe_code)]

//! In-memory document implementing [`Host`].
//!
//! `HeadlessDocument` models just enough of a browser document for the
//! overlay controllers: an element tree rooted at a body, focus with a log
//! of every move, attributes/classes/text, document listener bookkeeping,
//! a frame request counter, and a scriptable native confirm.
//!
//! It is a cheap `Clone` handle; clones share the same document.
//!
//! # Invariants
//!
//! 1. The body always exists and is always connected.
//! 2. Removing an element detaches its whole subtree; if focus was inside it,
//!    focus falls back to the body (`active_element() == None`).
//! 3. `attach_count() - detach_count() == listener_count()` at all times.
//!
//! # Example
//!
//! ```
//! use tapedeck_core::element::ElementInfo;
//! use tapedeck_core::headless::HeadlessDocument;
//! use tapedeck_core::host::Host;
//!
//! let doc = HeadlessDocument::new();
//! let menu = doc.create(doc.body(), ElementInfo::generic());
//! let item = doc.create(menu, ElementInfo::button());
//! assert!(doc.contains(menu, item));
//! assert_eq!(doc.descendants(menu), vec![item]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};

use crate::element::{ElementId, ElementInfo};
use crate::host::{FocusOptions, Host, HostError, ListenerId, ListenerKind, ListenerOptions};

/// One recorded focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRecord {
    pub target: ElementId,
    pub options: FocusOptions,
}

#[derive(Debug, Default)]
struct Node {
    info: ElementInfo,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: AHashMap<String, String>,
    classes: AHashSet<String>,
    text: String,
}

#[derive(Debug)]
struct DocumentState {
    nodes: AHashMap<ElementId, Node>,
    body: ElementId,
    next_element: u64,
    active: Option<ElementId>,
    focus_log: Vec<FocusRecord>,
    listeners: AHashMap<ListenerId, (ListenerKind, ListenerOptions)>,
    next_listener: u64,
    attach_count: usize,
    detach_count: usize,
    frame_requests: usize,
    native_confirm: Option<bool>,
    native_prompts: Vec<String>,
}

impl DocumentState {
    fn new() -> Self {
        let body = ElementId::new(0);
        let mut nodes = AHashMap::new();
        nodes.insert(body, Node::default());
        Self {
            nodes,
            body,
            next_element: 1,
            active: None,
            focus_log: Vec::new(),
            listeners: AHashMap::new(),
            next_listener: 1,
            attach_count: 0,
            detach_count: 0,
            frame_requests: 0,
            native_confirm: None,
            native_prompts: Vec::new(),
        }
    }

    fn is_connected(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.body {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        false
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        if !self.nodes.contains_key(&ancestor) {
            return false;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        false
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Node, HostError> {
        self.nodes.get_mut(&id).ok_or(HostError::Missing(id))
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.nodes.get_mut(&id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|child| *child != id);
        }
    }
}

/// Shared in-memory document.
#[derive(Debug, Clone)]
pub struct HeadlessDocument {
    inner: Rc<RefCell<DocumentState>>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// Create a document containing only a body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DocumentState::new())),
        }
    }

    /// The body element.
    #[must_use]
    pub fn body(&self) -> ElementId {
        self.inner.borrow().body
    }

    /// Create an element and append it to `parent`.
    ///
    /// If `parent` does not exist the element is created detached.
    pub fn create(&self, parent: ElementId, info: ElementInfo) -> ElementId {
        let id = self.create_detached(info);
        self.append(parent, id);
        id
    }

    /// Create an element that is not attached anywhere.
    pub fn create_detached(&self, info: ElementInfo) -> ElementId {
        let mut state = self.inner.borrow_mut();
        let id = ElementId::new(state.next_element);
        state.next_element += 1;
        state.nodes.insert(
            id,
            Node {
                info,
                ..Node::default()
            },
        );
        id
    }

    /// Move `child` under `parent` (appended last). Ignored when either is
    /// unknown or when it would create a cycle.
    pub fn append(&self, parent: ElementId, child: ElementId) {
        let mut state = self.inner.borrow_mut();
        if !state.nodes.contains_key(&parent)
            || !state.nodes.contains_key(&child)
            || state.contains(child, parent)
        {
            return;
        }
        state.detach(child);
        if let Some(node) = state.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = state.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    /// Remove an element (and its subtree) from the document.
    ///
    /// The nodes stay known to the document so late references resolve to
    /// [`HostError::Detached`] instead of [`HostError::Missing`].
    pub fn remove(&self, id: ElementId) {
        let mut state = self.inner.borrow_mut();
        if id == state.body {
            return;
        }
        if let Some(active) = state.active
            && state.contains(id, active)
        {
            state.active = None;
        }
        state.detach(id);
    }

    /// Replace an element's interactive properties.
    pub fn set_info(&self, id: ElementId, info: ElementInfo) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&id) {
            node.info = info;
        }
    }

    /// Toggle the `disabled` flag.
    pub fn set_disabled(&self, id: ElementId, disabled: bool) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&id) {
            node.info.disabled = disabled;
        }
    }

    /// Simulate the user focusing an element (click or native Tab).
    pub fn user_focus(&self, id: ElementId) -> Result<(), HostError> {
        self.focus(id, FocusOptions::default())
    }

    /// Drop focus back to the body.
    pub fn blur(&self) {
        self.inner.borrow_mut().active = None;
    }

    #[must_use]
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(&id)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    #[must_use]
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.inner
            .borrow()
            .nodes
            .get(&id)
            .is_some_and(|n| n.classes.contains(class))
    }

    #[must_use]
    pub fn text(&self, id: ElementId) -> Option<String> {
        self.inner.borrow().nodes.get(&id).map(|n| n.text.clone())
    }

    /// Every focus move performed through [`Host::focus`], oldest first.
    #[must_use]
    pub fn focus_log(&self) -> Vec<FocusRecord> {
        self.inner.borrow().focus_log.clone()
    }

    #[must_use]
    pub fn last_focus(&self) -> Option<FocusRecord> {
        self.inner.borrow().focus_log.last().copied()
    }

    /// Currently registered listeners of `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Total registered listeners.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Whether every registered listener of `kind` uses the capture phase.
    #[must_use]
    pub fn listeners_capture(&self, kind: ListenerKind) -> bool {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|(k, _)| *k == kind)
            .all(|(_, options)| options.capture)
    }

    /// Number of successful `add_listener` calls.
    #[must_use]
    pub fn attach_count(&self) -> usize {
        self.inner.borrow().attach_count
    }

    /// Number of successful `remove_listener` calls.
    #[must_use]
    pub fn detach_count(&self) -> usize {
        self.inner.borrow().detach_count
    }

    /// Number of `request_animation_frame` calls so far.
    #[must_use]
    pub fn frame_requests(&self) -> usize {
        self.inner.borrow().frame_requests
    }

    /// Script the native confirm: `None` means the platform has none.
    pub fn set_native_confirm(&self, answer: Option<bool>) {
        self.inner.borrow_mut().native_confirm = answer;
    }

    /// Messages passed to the native confirm.
    #[must_use]
    pub fn native_prompts(&self) -> Vec<String> {
        self.inner.borrow().native_prompts.clone()
    }
}

impl Host for HeadlessDocument {
    fn is_connected(&self, id: ElementId) -> bool {
        self.inner.borrow().is_connected(id)
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.inner.borrow().contains(ancestor, node)
    }

    fn element(&self, id: ElementId) -> Option<ElementInfo> {
        self.inner.borrow().nodes.get(&id).map(|n| n.info)
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let state = self.inner.borrow();
        let mut out = Vec::new();
        let Some(node) = state.nodes.get(&root) else {
            return out;
        };
        let mut stack: Vec<ElementId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = state.nodes.get(&id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn active_element(&self) -> Option<ElementId> {
        self.inner.borrow().active
    }

    fn focus(&self, id: ElementId, options: FocusOptions) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        let info = state.nodes.get(&id).ok_or(HostError::Missing(id))?.info;
        if !state.is_connected(id) {
            return Err(HostError::Detached(id));
        }
        if info.disabled || !(info.is_tabbable() || info.tab_index.is_some()) {
            return Err(HostError::NotFocusable(id));
        }
        state.active = Some(id);
        state.focus_log.push(FocusRecord {
            target: id,
            options,
        });
        Ok(())
    }

    fn set_attribute(&self, id: ElementId, name: &str, value: &str) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        state
            .node_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&self, id: ElementId, name: &str) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        state.node_mut(id)?.attributes.remove(name);
        Ok(())
    }

    fn set_class(&self, id: ElementId, class: &str, enabled: bool) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        let node = state.node_mut(id)?;
        if enabled {
            node.classes.insert(class.to_string());
        } else {
            node.classes.remove(class);
        }
        Ok(())
    }

    fn set_text(&self, id: ElementId, text: &str) -> Result<(), HostError> {
        let mut state = self.inner.borrow_mut();
        let node = state.node_mut(id)?;
        node.text.clear();
        node.text.push_str(text);
        Ok(())
    }

    fn add_listener(&self, kind: ListenerKind, options: ListenerOptions) -> ListenerId {
        let mut state = self.inner.borrow_mut();
        let id = ListenerId::new(state.next_listener);
        state.next_listener += 1;
        state.listeners.insert(id, (kind, options));
        state.attach_count += 1;
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.listeners.remove(&id).is_some() {
            state.detach_count += 1;
            true
        } else {
            false
        }
    }

    fn request_animation_frame(&self) {
        self.inner.borrow_mut().frame_requests += 1;
    }

    fn native_confirm(&self, message: &str) -> Option<bool> {
        let mut state = self.inner.borrow_mut();
        let answer = state.native_confirm?;
        state.native_prompts.push(message.to_string());
        Some(answer)
    }
}
