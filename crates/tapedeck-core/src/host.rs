#![forbid(unsafe_code)]

//! The host boundary.
//!
//! [`Host`] is everything an overlay controller may ask of its environment:
//! tree queries, focus, a handful of presentation attributes, document-level
//! listener registration, frame scheduling, and the native blocking confirm.
//! List rendering, networking and theming never cross this boundary.
//!
//! # Ownership
//!
//! Implementations are cheap `Clone` handles onto shared document state
//! (like `web_sys::Document`). Methods take `&self`; interior mutability is
//! the implementation's business. This lets a controller hold a handle for
//! its whole lifetime and lets RAII guards detach listeners on drop.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown element | Never rendered | Queries return `None`/`false`, mutations return [`HostError::Missing`] |
//! | Detached element | Removed from document | `is_connected` is `false`, focus returns [`HostError::Detached`] |
//! | Unknown listener | Already removed | `remove_listener` returns `false` |

use core::fmt;

use crate::element::{ElementId, ElementInfo};

/// `aria-hidden` attribute name.
pub const ATTR_ARIA_HIDDEN: &str = "aria-hidden";
/// `aria-expanded` attribute name (set on triggers).
pub const ATTR_ARIA_EXPANDED: &str = "aria-expanded";
/// `hidden` attribute name.
pub const ATTR_HIDDEN: &str = "hidden";
/// Class marking an overlay as visible.
pub const CLASS_OPEN: &str = "is-open";

/// Errors from host mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The element does not exist.
    Missing(ElementId),
    /// The element exists but is not attached to the document.
    Detached(ElementId),
    /// The element cannot take focus (disabled).
    NotFocusable(ElementId),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(id) => write!(f, "element {id} does not exist"),
            Self::Detached(id) => write!(f, "element {id} is not attached to the document"),
            Self::NotFocusable(id) => write!(f, "element {id} cannot receive focus"),
        }
    }
}

impl std::error::Error for HostError {}

/// How focus should be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusOptions {
    /// Do not scroll the element into view.
    pub prevent_scroll: bool,
    /// Show the focus ring.
    pub focus_visible: bool,
    /// Restore the element's caret/selection.
    pub restore_selection: bool,
}

impl FocusOptions {
    /// Quiet focus: no ring, no scroll, no selection restore.
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            prevent_scroll: true,
            focus_visible: false,
            restore_selection: false,
        }
    }
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self {
            prevent_scroll: false,
            focus_visible: true,
            restore_selection: true,
        }
    }
}

/// Document-level listener kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    KeyDown,
}

/// Listener registration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Register in the capture phase.
    pub capture: bool,
}

impl ListenerOptions {
    #[must_use]
    pub const fn capture() -> Self {
        Self { capture: true }
    }
}

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host environment seen by overlay controllers.
pub trait Host: Clone {
    /// Whether the element exists and is attached to the document.
    fn is_connected(&self, id: ElementId) -> bool;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

    /// Interactive properties of an element.
    fn element(&self, id: ElementId) -> Option<ElementInfo>;

    /// Descendants of `root` in document order, `root` excluded.
    fn descendants(&self, root: ElementId) -> Vec<ElementId>;

    /// The element that currently has focus, `None` for the document body.
    fn active_element(&self) -> Option<ElementId>;

    /// Move focus to an element.
    fn focus(&self, id: ElementId, options: FocusOptions) -> Result<(), HostError>;

    fn set_attribute(&self, id: ElementId, name: &str, value: &str) -> Result<(), HostError>;

    fn remove_attribute(&self, id: ElementId, name: &str) -> Result<(), HostError>;

    fn set_class(&self, id: ElementId, class: &str, enabled: bool) -> Result<(), HostError>;

    /// Replace the text content of an element.
    fn set_text(&self, id: ElementId, text: &str) -> Result<(), HostError>;

    /// Attach a document-level listener. The host routes matching events to
    /// the owning controller's `handle_event` while it is registered.
    fn add_listener(&self, kind: ListenerKind, options: ListenerOptions) -> ListenerId;

    /// Detach a listener. Returns `false` if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Ask for a callback at the next paint boundary. The host answers by
    /// calling the controller's `run_animation_frame`.
    fn request_animation_frame(&self);

    /// Synchronous native confirmation, `None` when the platform has none.
    fn native_confirm(&self, message: &str) -> Option<bool>;
}
