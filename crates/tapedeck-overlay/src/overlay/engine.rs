#![forbid(unsafe_code)]

//! The shared overlay state machine.
//!
//! # Invariants
//!
//! 1. Listeners are attached iff the overlay is open: one pointerdown
//!    (capture) and one keydown listener, owned by a [`ListenerGuard`].
//! 2. The three visibility signals (`is-open` class, `aria-hidden`, `hidden`)
//!    are always written together.
//! 3. The element focused before `open()` is consumed by the matching close
//!    and never restored by a later cycle.
//! 4. The policy's `on_close` runs exactly once per open/close cycle.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Root or trigger not rendered | Missing from document | `open()` on a closed overlay returns [`OpenOutcome::Unavailable`] |
//! | Root detached while open | Removed mid-cycle | `open()` stays [`OpenOutcome::Refocused`]; `close()` still releases listeners |
//! | Double open | `open()` while open | Re-focus first element, [`OpenOutcome::Refocused`] |
//! | Double close | `close()` while closed | Returns `false`, nothing detached |
//! | Host mutation error | Element vanished mid-cycle | Logged, state still transitions |
//! | Late frame | Frame delivered after close | `run_animation_frame()` returns `false` |

use tapedeck_core::element::ElementId;
use tapedeck_core::event::{Event, EventResult, KeyCode, KeyEvent, PointerEvent};
use tapedeck_core::host::{
    ATTR_ARIA_EXPANDED, ATTR_ARIA_HIDDEN, ATTR_HIDDEN, CLASS_OPEN, FocusOptions, Host, HostError,
};

use super::config::OverlayConfig;
use super::focusable::{FocusScope, focusable_elements};
use super::listeners::ListenerGuard;
use super::policy::{ClosePolicy, CloseReason};

/// Result of [`OverlayController::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The overlay was closed and is now open.
    Opened,
    /// The overlay was already open; focus moved back to its first element.
    Refocused,
    /// The root or trigger is not in the document; nothing happened.
    Unavailable,
}

/// How [`OverlayController::close`] treats focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOptions {
    /// Move focus back to the element focused before opening.
    pub restore_focus: bool,
    /// Options for that focus move.
    pub focus: FocusOptions,
}

impl Default for CloseOptions {
    fn default() -> Self {
        Self {
            restore_focus: true,
            focus: FocusOptions::default(),
        }
    }
}

impl CloseOptions {
    /// Close without touching focus.
    #[must_use]
    pub fn keep_focus() -> Self {
        Self {
            restore_focus: false,
            ..Self::default()
        }
    }

    /// Restore focus with the given options.
    #[must_use]
    pub fn restore_with(focus: FocusOptions) -> Self {
        Self {
            restore_focus: true,
            focus,
        }
    }
}

#[derive(Debug)]
struct OverlayState<H: Host> {
    open: bool,
    previously_focused: Option<ElementId>,
    listeners: Option<ListenerGuard<H>>,
    pending_focus: bool,
}

impl<H: Host> Default for OverlayState<H> {
    fn default() -> Self {
        Self {
            open: false,
            previously_focused: None,
            listeners: None,
            pending_focus: false,
        }
    }
}

/// Open/close lifecycle, focus capture and restore, and the Tab trap for one
/// overlay surface.
///
/// The host delivers document events to [`handle_event`](Self::handle_event)
/// while the overlay's listeners are registered, and answers
/// `request_animation_frame` by calling
/// [`run_animation_frame`](Self::run_animation_frame).
#[derive(Debug)]
pub struct OverlayController<H: Host, P: ClosePolicy> {
    host: H,
    root: ElementId,
    trigger: Option<ElementId>,
    fallback_focus: Option<ElementId>,
    scope: FocusScope,
    config: OverlayConfig,
    policy: P,
    state: OverlayState<H>,
}

impl<H: Host, P: ClosePolicy> OverlayController<H, P> {
    /// A closed controller for the overlay rooted at `root`.
    pub fn new(host: H, root: ElementId, policy: P) -> Self {
        Self {
            host,
            root,
            trigger: None,
            fallback_focus: None,
            scope: FocusScope::Subtree,
            config: OverlayConfig::default(),
            policy,
            state: OverlayState::default(),
        }
    }

    /// The control that opens this overlay. Pointer activity inside it does
    /// not count as outside.
    #[must_use]
    pub fn with_trigger(mut self, trigger: ElementId) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Focus target used when the captured element is gone at close time.
    #[must_use]
    pub fn with_fallback_focus(mut self, fallback: ElementId) -> Self {
        self.fallback_focus = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: FocusScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_fallback_focus(&mut self, fallback: Option<ElementId>) {
        self.fallback_focus = fallback;
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    #[must_use]
    pub fn trigger(&self) -> Option<ElementId> {
        self.trigger
    }

    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.open
    }

    /// Whether the root (and trigger, if any) are attached to the document.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.host.is_connected(self.root)
            && self
                .trigger
                .is_none_or(|trigger| self.host.is_connected(trigger))
    }

    /// Whether an initial focus move is waiting for the next frame.
    #[must_use]
    pub fn has_pending_focus(&self) -> bool {
        self.state.pending_focus
    }

    /// Tabbable elements inside the overlay, in Tab order.
    pub fn focusable_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        focusable_elements(&self.host, self.root, &self.scope)
    }

    pub fn open(&mut self) -> OpenOutcome {
        if self.state.open {
            self.focus_first();
            return OpenOutcome::Refocused;
        }

        if !self.is_rendered() {
            #[cfg(feature = "tracing")]
            tracing::debug!(root = %self.root, "overlay not rendered, open ignored");
            return OpenOutcome::Unavailable;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("overlay_open", root = %self.root).entered();

        self.state.previously_focused = self.host.active_element();
        self.state.open = true;
        self.apply_visibility(true);
        self.state.listeners = Some(ListenerGuard::attach(&self.host));
        self.sync_trigger();

        // Focus right after un-hiding can be dropped by the renderer.
        self.state.pending_focus = true;
        self.host.request_animation_frame();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            previously_focused = ?self.state.previously_focused,
            "overlay opened"
        );
        OpenOutcome::Opened
    }

    /// Perform the initial focus move scheduled by `open()`. Returns whether
    /// focus was moved.
    pub fn run_animation_frame(&mut self) -> bool {
        if !std::mem::take(&mut self.state.pending_focus) || !self.state.open {
            return false;
        }
        self.focus_first()
    }

    /// Close and notify the policy with [`CloseReason::Programmatic`].
    pub fn close(&mut self, options: CloseOptions) -> bool {
        self.close_with(CloseReason::Programmatic, options)
    }

    /// Close for `reason`. Returns `false` if the overlay was already closed.
    pub fn close_with(&mut self, reason: CloseReason, options: CloseOptions) -> bool {
        if !self.state.open {
            return false;
        }

        #[cfg(feature = "tracing")]
        let _span =
            tracing::debug_span!("overlay_close", root = %self.root, reason = reason.as_str())
                .entered();

        self.state.open = false;
        self.state.pending_focus = false;
        self.apply_visibility(false);
        self.state.listeners = None;
        self.sync_trigger();

        let previous = self.state.previously_focused.take();
        if options.restore_focus {
            self.restore_focus(previous, options.focus);
        }

        self.policy.on_close(reason);

        #[cfg(feature = "tracing")]
        tracing::debug!(reason = reason.as_str(), "overlay closed");
        true
    }

    /// Route a document event. Closed overlays ignore everything.
    pub fn handle_event(&mut self, event: &Event) -> EventResult {
        if !self.state.open {
            return EventResult::Ignored;
        }
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key),
            Event::Key(_) => EventResult::Ignored,
            Event::Pointer(pointer) => self.handle_pointer(pointer),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        if key.code == KeyCode::Escape {
            if !self.config.close_on_escape {
                return EventResult::Ignored;
            }
            self.close_with(CloseReason::Escape, CloseOptions::default());
            return EventResult::Handled;
        }

        match key.is_tab() {
            Some(backward) if self.config.trap_focus => self.trap_tab(backward),
            _ => EventResult::Ignored,
        }
    }

    fn trap_tab(&mut self, backward: bool) -> EventResult {
        let focusables: Vec<ElementId> = self.focusable_elements().collect();
        let (Some(&first), Some(&last)) = (focusables.first(), focusables.last()) else {
            self.close_with(CloseReason::EmptyTrap, CloseOptions::default());
            return EventResult::Handled;
        };

        let active = self.host.active_element();
        let target = match active {
            Some(current) if Some(current) == self.trigger => {
                if backward {
                    last
                } else {
                    first
                }
            }
            Some(current) if backward && current == first => last,
            Some(current) if !backward && current == last => first,
            Some(current) if focusables.contains(&current) => return EventResult::Ignored,
            _ => {
                if backward {
                    last
                } else {
                    first
                }
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(from = ?active, to = %target, backward, "focus trap move");
        self.focus_logged(target, FocusOptions::default());
        EventResult::Handled
    }

    fn handle_pointer(&mut self, pointer: &PointerEvent) -> EventResult {
        if !self.config.close_on_outside_pointer {
            return EventResult::Ignored;
        }
        let inside = pointer.target.is_some_and(|target| {
            self.host.contains(self.root, target)
                || self
                    .trigger
                    .is_some_and(|trigger| self.host.contains(trigger, target))
        });
        if !inside {
            let focus = self.policy.outside_focus();
            self.close_with(CloseReason::OutsidePointer, CloseOptions::restore_with(focus));
        }
        // The pointerdown itself proceeds either way.
        EventResult::Ignored
    }

    fn focus_first(&self) -> bool {
        match self.focusable_elements().next() {
            Some(first) => self.focus_logged(first, FocusOptions::default()),
            None => false,
        }
    }

    fn restore_focus(&self, previous: Option<ElementId>, options: FocusOptions) {
        let candidates = [previous, self.fallback_focus];
        for target in candidates.into_iter().flatten() {
            if self.host.is_connected(target) && self.focus_logged(target, options) {
                return;
            }
        }
    }

    fn focus_logged(&self, target: ElementId, options: FocusOptions) -> bool {
        host_op("focus", self.host.focus(target, options))
    }

    fn apply_visibility(&self, visible: bool) {
        let host = &self.host;
        let root = self.root;
        host_op("set_class", host.set_class(root, CLASS_OPEN, visible));
        host_op(
            "set_attribute",
            host.set_attribute(root, ATTR_ARIA_HIDDEN, if visible { "false" } else { "true" }),
        );
        if visible {
            host_op("remove_attribute", host.remove_attribute(root, ATTR_HIDDEN));
        } else {
            host_op("set_attribute", host.set_attribute(root, ATTR_HIDDEN, ""));
        }
    }

    fn sync_trigger(&self) {
        if !self.config.sync_trigger_expanded {
            return;
        }
        if let Some(trigger) = self.trigger {
            let expanded = if self.state.open { "true" } else { "false" };
            host_op(
                "set_attribute",
                self.host.set_attribute(trigger, ATTR_ARIA_EXPANDED, expanded),
            );
        }
    }
}

/// Host failures are logged and swallowed.
fn host_op(op: &'static str, result: Result<(), HostError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(op, error = %err, "host operation failed");
            #[cfg(not(feature = "tracing"))]
            let _ = (op, err);
            false
        }
    }
}
