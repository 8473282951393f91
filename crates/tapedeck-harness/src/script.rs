#![forbid(unsafe_code)]

//! Scripted interaction with a controller, with invariant checks after
//! every step.
//!
//! A script is a list of [`Step`]s. [`run_script`] applies them to a
//! [`Subject`] (a fixture wrapping a menu or dialog) and after each one
//! verifies the properties every overlay must keep:
//!
//! 1. Listeners: two while open (pointerdown with capture, keydown), none
//!    while closed, and `attach - detach == live`.
//! 2. Visibility: class, `aria-hidden` and `hidden` agree with `is_open`.
//! 3. Variant checks from [`Subject::check`] (expanded sync for menus, at
//!    most one pending answer for dialogs).

use proptest::prelude::*;
use tapedeck_core::element::ElementId;
use tapedeck_core::event::{Event, EventResult, KeyCode, KeyEvent, Modifiers, PointerEvent};
use tapedeck_core::headless::HeadlessDocument;
use tapedeck_core::host::{ATTR_ARIA_HIDDEN, ATTR_HIDDEN, CLASS_OPEN, Host, ListenerKind};
use tapedeck_overlay::confirm::ConfirmConfig;

use crate::fixtures::{ConfirmFixture, MenuFixture};

/// One user or program action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open,
    Close,
    Frame,
    Tab,
    ShiftTab,
    Escape,
    Enter,
    /// Pointerdown on the n-th item (modulo item count).
    PointerInside(usize),
    PointerOutside,
    PointerTrigger,
    /// User focuses the n-th item (modulo item count).
    FocusItem(usize),
    FocusOutside,
    Blur,
    /// Toggle the disabled state of the n-th item.
    ToggleDisabled(usize),
    Confirm,
    Cancel,
}

impl Step {
    /// Proptest strategy over all steps, item indices below `max_index`.
    pub fn strategy(max_index: usize) -> impl Strategy<Value = Step> {
        let max_index = max_index.max(1);
        prop_oneof![
            3 => Just(Step::Open),
            2 => Just(Step::Close),
            2 => Just(Step::Frame),
            3 => Just(Step::Tab),
            2 => Just(Step::ShiftTab),
            1 => Just(Step::Escape),
            1 => Just(Step::Enter),
            1 => (0..max_index).prop_map(Step::PointerInside),
            1 => Just(Step::PointerOutside),
            1 => Just(Step::PointerTrigger),
            2 => (0..max_index).prop_map(Step::FocusItem),
            1 => Just(Step::FocusOutside),
            1 => Just(Step::Blur),
            1 => (0..max_index).prop_map(Step::ToggleDisabled),
            1 => Just(Step::Confirm),
            1 => Just(Step::Cancel),
        ]
    }
}

/// A controller under test plus the document it lives in.
pub trait Subject {
    fn document(&self) -> &HeadlessDocument;
    fn root(&self) -> ElementId;
    /// Elements that `PointerInside`, `FocusItem` and `ToggleDisabled` address.
    fn items(&self) -> Vec<ElementId>;
    fn outside(&self) -> ElementId;
    /// Trigger element, or `None` for overlays opened without one.
    fn trigger(&self) -> Option<ElementId>;
    fn is_open(&self) -> bool;
    fn open(&mut self);
    fn close(&mut self);
    fn frame(&mut self);
    fn dispatch(&mut self, event: &Event) -> EventResult;
    fn confirm(&mut self) {}
    fn cancel(&mut self) {}
    /// Variant-specific invariants.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

fn pick(items: &[ElementId], index: usize) -> Option<ElementId> {
    if items.is_empty() {
        None
    } else {
        items.get(index % items.len()).copied()
    }
}

fn apply<S: Subject>(subject: &mut S, step: Step) {
    let doc = subject.document().clone();
    let items = subject.items();
    match step {
        Step::Open => subject.open(),
        Step::Close => subject.close(),
        Step::Frame => subject.frame(),
        Step::Tab => {
            subject.dispatch(&Event::key(KeyCode::Tab));
        }
        Step::ShiftTab => {
            let key = KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);
            subject.dispatch(&Event::Key(key));
        }
        Step::Escape => {
            subject.dispatch(&Event::key(KeyCode::Escape));
        }
        Step::Enter => {
            subject.dispatch(&Event::key(KeyCode::Enter));
        }
        Step::PointerInside(index) => {
            let target = pick(&items, index).unwrap_or_else(|| subject.root());
            subject.dispatch(&Event::pointer_down(target));
        }
        Step::PointerOutside => {
            let target = subject.outside();
            subject.dispatch(&Event::pointer_down(target));
        }
        Step::PointerTrigger => {
            let target = subject.trigger();
            subject.dispatch(&Event::Pointer(PointerEvent::new(target)));
        }
        Step::FocusItem(index) => {
            if let Some(item) = pick(&items, index) {
                // Disabled items refuse focus; that is part of the scenario.
                let _ = doc.user_focus(item);
            }
        }
        Step::FocusOutside => {
            let _ = doc.user_focus(subject.outside());
        }
        Step::Blur => doc.blur(),
        Step::ToggleDisabled(index) => {
            if let Some(item) = pick(&items, index) {
                let disabled = doc.element(item).is_some_and(|info| info.disabled);
                doc.set_disabled(item, !disabled);
            }
        }
        Step::Confirm => subject.confirm(),
        Step::Cancel => subject.cancel(),
    }
}

fn check_common<S: Subject>(subject: &S) -> Result<(), String> {
    let doc = subject.document();
    let root = subject.root();
    let open = subject.is_open();

    let live = doc.total_listeners();
    let expected = if open { 2 } else { 0 };
    if live != expected {
        return Err(format!("open={open} but {live} listeners attached"));
    }
    if doc.attach_count() - doc.detach_count() != live {
        return Err(format!(
            "attach {} - detach {} != live {live}",
            doc.attach_count(),
            doc.detach_count()
        ));
    }
    if open
        && (doc.listener_count(ListenerKind::PointerDown) != 1
            || !doc.listeners_capture(ListenerKind::PointerDown)
            || doc.listener_count(ListenerKind::KeyDown) != 1)
    {
        return Err("open overlay lacks capture pointerdown + keydown".to_string());
    }

    let class = doc.has_class(root, CLASS_OPEN);
    let aria_hidden = doc.attribute(root, ATTR_ARIA_HIDDEN);
    let hidden = doc.attribute(root, ATTR_HIDDEN).is_some();
    let visible = class && aria_hidden.as_deref() == Some("false") && !hidden;
    let concealed = !class && aria_hidden.as_deref() == Some("true") && hidden;
    if doc.is_connected(root) && !(if open { visible } else { concealed }) {
        return Err(format!(
            "visibility disagrees: open={open} class={class} aria-hidden={aria_hidden:?} hidden={hidden}"
        ));
    }
    Ok(())
}

/// Apply `steps` in order, checking invariants after each. Returns the first
/// violation with the index of the step that caused it.
pub fn run_script<S: Subject>(subject: &mut S, steps: &[Step]) -> Result<(), String> {
    for (index, step) in steps.iter().enumerate() {
        apply(subject, *step);
        check_common(subject)
            .and_then(|()| subject.check())
            .map_err(|err| format!("after step {index} ({step:?}): {err}"))?;
    }
    Ok(())
}

impl Subject for MenuFixture {
    fn document(&self) -> &HeadlessDocument {
        &self.doc
    }

    fn root(&self) -> ElementId {
        self.panel
    }

    fn items(&self) -> Vec<ElementId> {
        self.items.clone()
    }

    fn outside(&self) -> ElementId {
        self.outside
    }

    fn trigger(&self) -> Option<ElementId> {
        Some(self.trigger)
    }

    fn is_open(&self) -> bool {
        self.menu.is_open()
    }

    fn open(&mut self) {
        self.menu.open();
    }

    fn close(&mut self) {
        self.menu.close();
    }

    fn frame(&mut self) {
        self.menu.run_animation_frame();
    }

    fn dispatch(&mut self, event: &Event) -> EventResult {
        self.menu.handle_event(event)
    }

    fn check(&self) -> Result<(), String> {
        let expected = if self.menu.is_open() { "true" } else { "false" };
        match self.expanded() {
            Some(value) if value == expected => Ok(()),
            other => Err(format!("aria-expanded {other:?}, expected {expected}")),
        }
    }
}

impl Subject for ConfirmFixture {
    fn document(&self) -> &HeadlessDocument {
        &self.doc
    }

    fn root(&self) -> ElementId {
        self.surface.root
    }

    fn items(&self) -> Vec<ElementId> {
        self.controls().to_vec()
    }

    fn outside(&self) -> ElementId {
        self.outside
    }

    fn trigger(&self) -> Option<ElementId> {
        None
    }

    fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    fn open(&mut self) {
        let answer = self.dialog.prompt(ConfirmConfig::new(
            "Delete recording permanently",
            "This cannot be undone.",
        ));
        self.answers.push(answer);
    }

    fn close(&mut self) {
        self.dialog.close();
    }

    fn frame(&mut self) {
        self.dialog.run_animation_frame();
    }

    fn dispatch(&mut self, event: &Event) -> EventResult {
        self.dialog.handle_event(event)
    }

    fn confirm(&mut self) {
        self.dialog.confirm();
    }

    fn cancel(&mut self) {
        self.dialog.cancel();
    }

    fn check(&self) -> Result<(), String> {
        let pending = self.answers.iter().filter(|a| !a.is_settled()).count();
        let allowed = usize::from(self.dialog.is_open());
        if pending != allowed {
            return Err(format!(
                "{pending} pending answers while open={}",
                self.dialog.is_open()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapedeck_overlay::deferred::Deferred;

    #[test]
    fn simple_menu_script_passes() {
        let mut f = MenuFixture::new(3);
        let steps = [
            Step::Open,
            Step::Frame,
            Step::Tab,
            Step::ShiftTab,
            Step::PointerOutside,
            Step::Open,
            Step::Escape,
            Step::Close,
        ];
        run_script(&mut f, &steps).unwrap();
        assert!(!f.menu.is_open());
    }

    #[test]
    fn dialog_script_settles_every_answer() {
        let mut f = ConfirmFixture::new();
        let steps = [
            Step::Open,
            Step::Open,
            Step::Enter,
            Step::Open,
            Step::PointerOutside,
            Step::Open,
            Step::Cancel,
        ];
        run_script(&mut f, &steps).unwrap();
        assert_eq!(f.answers.len(), 4);
        let settled: Vec<_> = f.answers.iter().map(Deferred::peek).collect();
        assert_eq!(
            settled,
            vec![Some(true), Some(false), Some(false), Some(false)]
        );
    }

    #[test]
    fn pick_wraps_and_handles_empty() {
        let ids = [ElementId::new(1), ElementId::new(2)];
        assert_eq!(pick(&ids, 3), Some(ElementId::new(2)));
        assert_eq!(pick(&[], 0), None);
    }
}
