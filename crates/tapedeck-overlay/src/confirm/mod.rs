#![forbid(unsafe_code)]

//! Modal confirmation dialog with a deferred answer.
//!
//! [`ConfirmDialog::prompt`] fills the dialog surface with the given copy,
//! opens it, and returns a [`Deferred<bool>`] that settles exactly once:
//! `true` when the confirm control is activated, `false` for cancel, Escape,
//! an outside pointerdown, an empty focus trap or a programmatic close.
//!
//! # Invariants
//!
//! 1. At most one prompt is open per dialog. A second `prompt()` while one is
//!    open gets an already-settled `false`; the open prompt is untouched.
//! 2. A prompt that cannot render never leaves its caller waiting: the host's
//!    native confirm answers, or the result is `false`.
//! 3. The Tab cycle covers only the confirm and cancel controls.
//!
//! # Keyboard
//!
//! | Key | Focus on | Effect |
//! |-----|----------|--------|
//! | Enter | anything but cancel | confirm |
//! | Enter | cancel | left to the cancel control |
//! | Escape | anything | cancel |
//! | Tab / Shift+Tab | anything | cycle confirm and cancel |

mod presets;

pub use presets::{ConfirmCopy, ConfirmPreset, builtin_catalog, keys};

use tapedeck_core::element::ElementId;
use tapedeck_core::event::{Event, EventResult, KeyCode};
use tapedeck_core::host::Host;

use crate::deferred::Deferred;
use crate::overlay::{
    CloseOptions, ClosePolicy, CloseReason, DeferredResult, FocusScope, OpenOutcome,
    OverlayConfig, OverlayController,
};

/// Class applied to the confirm control for destructive prompts.
pub const CLASS_DANGER: &str = "is-danger";

/// The elements making up a rendered confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmSurface {
    pub root: ElementId,
    pub title: ElementId,
    pub message: ElementId,
    pub confirm: ElementId,
    pub cancel: ElementId,
}

/// Copy and options for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmConfig {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    /// Render the confirm control with the danger tone.
    pub destructive: bool,
    /// Focus target after closing when the previously focused element is gone.
    pub return_focus: Option<ElementId>,
}

impl ConfirmConfig {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            destructive: false,
            return_focus: None,
        }
    }

    #[must_use]
    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    #[must_use]
    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    #[must_use]
    pub fn destructive(mut self, destructive: bool) -> Self {
        self.destructive = destructive;
        self
    }

    #[must_use]
    pub fn return_focus(mut self, target: ElementId) -> Self {
        self.return_focus = Some(target);
        self
    }

    /// Text handed to a native confirm when the surface is unavailable.
    #[must_use]
    pub fn native_text(&self) -> String {
        if self.message.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.message)
        }
    }
}

/// Confirmation dialog controller.
#[derive(Debug)]
pub struct ConfirmDialog<H: Host> {
    host: H,
    surface: Option<ConfirmSurface>,
    overlay: Option<OverlayController<H, DeferredResult>>,
    copy: ConfirmCopy,
}

impl<H: Host> ConfirmDialog<H> {
    /// Dialog rendered into `surface`.
    pub fn new(host: H, surface: ConfirmSurface) -> Self {
        let overlay = OverlayController::new(host.clone(), surface.root, DeferredResult::new())
            .with_scope(FocusScope::Explicit(vec![surface.confirm, surface.cancel]));
        Self {
            host,
            surface: Some(surface),
            overlay: Some(overlay),
            copy: ConfirmCopy::default(),
        }
    }

    /// Dialog with no surface; every prompt goes to the native fallback.
    pub fn native_only(host: H) -> Self {
        Self {
            host,
            surface: None,
            overlay: None,
            copy: ConfirmCopy::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.overlay = self.overlay.map(|overlay| overlay.with_config(config));
        self
    }

    /// Copy used by the preset prompts.
    #[must_use]
    pub fn with_copy(mut self, copy: ConfirmCopy) -> Self {
        self.copy = copy;
        self
    }

    #[must_use]
    pub fn surface(&self) -> Option<&ConfirmSurface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.overlay.as_ref().is_some_and(OverlayController::is_open)
    }

    /// Whether the dialog root and both controls are in the document.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.surface.is_some_and(|surface| {
            [surface.root, surface.confirm, surface.cancel]
                .into_iter()
                .all(|id| self.host.is_connected(id))
        })
    }

    /// Show the dialog and return its eventual answer.
    pub fn prompt(&mut self, config: ConfirmConfig) -> Deferred<bool> {
        if self.is_open() {
            #[cfg(feature = "tracing")]
            tracing::debug!(title = %config.title, "confirm already open, rejecting prompt");
            return Deferred::settled(false);
        }

        let surface = match self.surface {
            Some(surface) if self.is_rendered() => surface,
            _ => return self.native_fallback(&config),
        };
        let Some(overlay) = self.overlay.as_mut() else {
            return Deferred::settled(false);
        };

        render_copy(&self.host, &surface, &config);
        overlay.set_fallback_focus(config.return_focus);

        let answer = overlay.policy_mut().arm();
        if overlay.open() != OpenOutcome::Opened {
            overlay.policy_mut().on_close(CloseReason::Programmatic);
        }
        answer
    }

    /// Prompt with the move-to-trash preset.
    pub fn confirm_move(&mut self, count: usize) -> Deferred<bool> {
        let config = self.copy.move_to_trash(count);
        self.prompt(config)
    }

    /// Prompt with the permanent-delete preset.
    pub fn confirm_permanent_delete(&mut self, count: usize) -> Deferred<bool> {
        let config = self.copy.permanent_delete(count);
        self.prompt(config)
    }

    /// Activation of the confirm control. Settles `true`.
    pub fn confirm(&mut self) -> bool {
        self.close_with(CloseReason::Confirmed)
    }

    /// Activation of the cancel control. Settles `false`.
    pub fn cancel(&mut self) -> bool {
        self.close_with(CloseReason::Cancelled)
    }

    /// Close from outside the dialog. Settles `false`.
    pub fn close(&mut self) -> bool {
        self.close_with(CloseReason::Programmatic)
    }

    pub fn handle_event(&mut self, event: &Event) -> EventResult {
        let Some(surface) = self.surface else {
            return EventResult::Ignored;
        };
        let Some(overlay) = self.overlay.as_mut() else {
            return EventResult::Ignored;
        };
        if !overlay.is_open() {
            return EventResult::Ignored;
        }

        match event {
            Event::Key(key) if key.is_press() && key.code == KeyCode::Enter => {
                if self.host.active_element() == Some(surface.cancel) {
                    return EventResult::Ignored;
                }
                overlay.close_with(CloseReason::Confirmed, CloseOptions::default());
                EventResult::Handled
            }
            _ => overlay.handle_event(event),
        }
    }

    pub fn run_animation_frame(&mut self) -> bool {
        self.overlay
            .as_mut()
            .is_some_and(OverlayController::run_animation_frame)
    }

    /// The underlying engine, absent for native-only dialogs.
    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayController<H, DeferredResult>> {
        self.overlay.as_ref()
    }

    fn close_with(&mut self, reason: CloseReason) -> bool {
        self.overlay
            .as_mut()
            .is_some_and(|overlay| overlay.close_with(reason, CloseOptions::default()))
    }

    fn native_fallback(&self, config: &ConfirmConfig) -> Deferred<bool> {
        let answer = self.host.native_confirm(&config.native_text());
        #[cfg(feature = "tracing")]
        tracing::debug!(?answer, "confirm surface unavailable, used native fallback");
        Deferred::settled(answer.unwrap_or(false))
    }
}

fn render_copy<H: Host>(host: &H, surface: &ConfirmSurface, config: &ConfirmConfig) {
    let writes = [
        host.set_text(surface.title, &config.title),
        host.set_text(surface.message, &config.message),
        host.set_text(surface.confirm, &config.confirm_label),
        host.set_text(surface.cancel, &config.cancel_label),
        host.set_class(surface.confirm, CLASS_DANGER, config.destructive),
    ];
    for result in writes {
        if let Err(err) = result {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "failed to render confirm copy");
            #[cfg(not(feature = "tracing"))]
            let _ = err;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapedeck_core::element::ElementInfo;
    use tapedeck_core::event::{KeyEvent, Modifiers};
    use tapedeck_core::headless::HeadlessDocument;

    struct Fixture {
        doc: HeadlessDocument,
        opener: ElementId,
        outside: ElementId,
        surface: ConfirmSurface,
    }

    fn fixture() -> Fixture {
        let doc = HeadlessDocument::new();
        let opener = doc.create(doc.body(), ElementInfo::button());
        let outside = doc.create(doc.body(), ElementInfo::button());
        let root = doc.create(doc.body(), ElementInfo::generic());
        let surface = ConfirmSurface {
            root,
            title: doc.create(root, ElementInfo::generic()),
            message: doc.create(root, ElementInfo::generic()),
            confirm: doc.create(root, ElementInfo::button()),
            cancel: doc.create(root, ElementInfo::button()),
        };
        Fixture {
            doc,
            opener,
            outside,
            surface,
        }
    }

    fn dialog(f: &Fixture) -> ConfirmDialog<HeadlessDocument> {
        ConfirmDialog::new(f.doc.clone(), f.surface)
    }

    fn open(f: &Fixture, dialog: &mut ConfirmDialog<HeadlessDocument>) -> Deferred<bool> {
        f.doc.user_focus(f.opener).unwrap();
        let answer = dialog.prompt(ConfirmConfig::new("Title", "Body"));
        dialog.run_animation_frame();
        answer
    }

    #[test]
    fn prompt_renders_copy_and_focuses_confirm() {
        let f = fixture();
        let mut dialog = dialog(&f);
        f.doc.user_focus(f.opener).unwrap();
        let answer = dialog.prompt(
            ConfirmConfig::new("Delete recording permanently", "Gone for good.")
                .confirm_label("Delete permanently")
                .cancel_label("Keep")
                .destructive(true),
        );

        assert!(!answer.is_settled());
        assert!(dialog.is_open());
        assert_eq!(
            f.doc.text(f.surface.title).as_deref(),
            Some("Delete recording permanently")
        );
        assert_eq!(f.doc.text(f.surface.message).as_deref(), Some("Gone for good."));
        assert_eq!(f.doc.text(f.surface.confirm).as_deref(), Some("Delete permanently"));
        assert_eq!(f.doc.text(f.surface.cancel).as_deref(), Some("Keep"));
        assert!(f.doc.has_class(f.surface.confirm, CLASS_DANGER));

        assert!(dialog.run_animation_frame());
        assert_eq!(f.doc.active_element(), Some(f.surface.confirm));
    }

    #[test]
    fn confirm_settles_true_and_restores_focus() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);

        assert!(dialog.confirm());
        assert_eq!(answer.peek(), Some(true));
        assert_eq!(f.doc.active_element(), Some(f.opener));
        assert_eq!(f.doc.total_listeners(), 0);
        assert!(!dialog.confirm());
    }

    #[test]
    fn cancel_settles_false() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);
        dialog.cancel();
        assert_eq!(answer.peek(), Some(false));
    }

    #[test]
    fn open_prompt_blocks_native_fallback_after_surface_removal() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let first = open(&f, &mut dialog);
        f.doc.remove(f.surface.root);
        f.doc.set_native_confirm(Some(true));

        let second = dialog.prompt(ConfirmConfig::new("Second", ""));
        assert_eq!(second.peek(), Some(false));
        assert!(f.doc.native_prompts().is_empty());
        assert!(dialog.is_open());
        assert!(!first.is_settled());

        assert!(dialog.close());
        assert_eq!(first.peek(), Some(false));
        assert_eq!(f.doc.total_listeners(), 0);
    }

    #[test]
    fn escape_settles_false() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);
        assert_eq!(
            dialog.handle_event(&Event::key(KeyCode::Escape)),
            EventResult::Handled
        );
        assert_eq!(answer.peek(), Some(false));
        assert_eq!(f.doc.active_element(), Some(f.opener));
    }

    #[test]
    fn enter_confirms_unless_on_cancel() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);

        f.doc.user_focus(f.surface.cancel).unwrap();
        assert_eq!(
            dialog.handle_event(&Event::key(KeyCode::Enter)),
            EventResult::Ignored
        );
        assert!(dialog.is_open());

        f.doc.user_focus(f.surface.confirm).unwrap();
        assert_eq!(
            dialog.handle_event(&Event::key(KeyCode::Enter)),
            EventResult::Handled
        );
        assert_eq!(answer.peek(), Some(true));
    }

    #[test]
    fn outside_pointer_settles_false_with_normal_focus() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);
        dialog.handle_event(&Event::pointer_down(f.outside));
        assert_eq!(answer.peek(), Some(false));
        let last = f.doc.last_focus().unwrap();
        assert_eq!(last.target, f.opener);
        assert!(last.options.focus_visible);
    }

    #[test]
    fn tab_cycles_confirm_and_cancel_only() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let _answer = open(&f, &mut dialog);
        let shift_tab = Event::Key(KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT));

        f.doc.user_focus(f.surface.cancel).unwrap();
        dialog.handle_event(&Event::key(KeyCode::Tab));
        assert_eq!(f.doc.active_element(), Some(f.surface.confirm));
        dialog.handle_event(&shift_tab);
        assert_eq!(f.doc.active_element(), Some(f.surface.cancel));
    }

    #[test]
    fn disabled_controls_leave_trap_empty() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);
        f.doc.set_disabled(f.surface.confirm, true);
        f.doc.set_disabled(f.surface.cancel, true);

        dialog.handle_event(&Event::key(KeyCode::Tab));
        assert!(!dialog.is_open());
        assert_eq!(answer.peek(), Some(false));
    }

    #[test]
    fn second_prompt_settles_false_immediately() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let first = open(&f, &mut dialog);

        let second = dialog.prompt(ConfirmConfig::new("Other", "Other body"));
        assert_eq!(second.peek(), Some(false));
        assert!(!first.is_settled());
        assert_eq!(f.doc.text(f.surface.title).as_deref(), Some("Title"));
        assert_eq!(f.doc.attach_count(), 2);

        dialog.confirm();
        assert_eq!(first.peek(), Some(true));
    }

    #[test]
    fn missing_surface_uses_native_confirm() {
        let f = fixture();
        f.doc.remove(f.surface.root);
        f.doc.set_native_confirm(Some(true));
        let mut dialog = dialog(&f);

        let answer = dialog.prompt(ConfirmConfig::new("Delete?", "Really."));
        assert_eq!(answer.peek(), Some(true));
        assert_eq!(f.doc.native_prompts(), vec!["Delete?\n\nReally.".to_string()]);
        assert_eq!(f.doc.total_listeners(), 0);
    }

    #[test]
    fn missing_surface_without_native_settles_false() {
        let f = fixture();
        let mut dialog = ConfirmDialog::native_only(f.doc.clone());
        assert!(!dialog.is_rendered());
        let answer = dialog.prompt(ConfirmConfig::new("Delete?", ""));
        assert_eq!(answer.peek(), Some(false));
        assert_eq!(dialog.handle_event(&Event::key(KeyCode::Enter)), EventResult::Ignored);
    }

    #[test]
    fn missing_cancel_control_counts_as_unrendered() {
        let f = fixture();
        f.doc.remove(f.surface.cancel);
        let mut dialog = dialog(&f);
        let answer = dialog.prompt(ConfirmConfig::new("Delete?", ""));
        assert_eq!(answer.peek(), Some(false));
        assert!(!dialog.is_open());
    }

    #[test]
    fn return_focus_used_when_opener_is_gone() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let transient = f.doc.create(f.doc.body(), ElementInfo::button());
        f.doc.user_focus(transient).unwrap();
        let answer = dialog.prompt(ConfirmConfig::new("t", "m").return_focus(f.opener));
        f.doc.remove(transient);

        dialog.cancel();
        assert_eq!(answer.peek(), Some(false));
        assert_eq!(f.doc.active_element(), Some(f.opener));
    }

    #[test]
    fn programmatic_close_settles_false() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);
        assert!(dialog.close());
        assert_eq!(answer.peek(), Some(false));
    }

    #[test]
    fn dropping_dialog_settles_false() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let answer = open(&f, &mut dialog);
        drop(dialog);
        assert_eq!(answer.peek(), Some(false));
        assert_eq!(f.doc.total_listeners(), 0);
    }

    #[test]
    fn preset_prompt_uses_copy() {
        let f = fixture();
        let mut dialog = dialog(&f);
        let _answer = dialog.confirm_permanent_delete(2);
        assert_eq!(
            f.doc.text(f.surface.title).as_deref(),
            Some("Delete 2 recordings permanently")
        );
        assert!(f.doc.has_class(f.surface.confirm, CLASS_DANGER));
        dialog.cancel();

        let _answer = dialog.confirm_move(1);
        assert_eq!(
            f.doc.text(f.surface.title).as_deref(),
            Some("Move recording to trash")
        );
        assert!(!f.doc.has_class(f.surface.confirm, CLASS_DANGER));
    }

    #[test]
    fn escape_can_be_suppressed() {
        let f = fixture();
        let mut dialog =
            dialog(&f).with_config(OverlayConfig::default().close_on_escape(false));
        let answer = open(&f, &mut dialog);
        dialog.handle_event(&Event::key(KeyCode::Escape));
        assert!(dialog.is_open());
        assert!(!answer.is_settled());
    }
}
