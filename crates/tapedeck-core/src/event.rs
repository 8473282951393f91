#![forbid(unsafe_code)]

//! Input events delivered to overlay controllers.
//!
//! Hosts translate their native events (DOM `keydown`/`pointerdown`, or
//! crossterm key events behind the `crossterm` feature) into [`Event`] and pass
//! them to the controller whose listeners are attached.
//!
//! # Design Notes
//!
//! - Pointer events only carry the hit target; geometry stays on the host.
//! - `Modifiers` use bitflags for easy combination.
//! - `BackTab` is normalised to Shift+Tab by [`KeyEvent::is_tab`].

use bitflags::bitflags;

use crate::element::ElementId;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A document-level `keydown`.
    Key(KeyEvent),
    /// A document-level capturing `pointerdown`.
    Pointer(PointerEvent),
}

impl Event {
    /// Shorthand for a key press without modifiers.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Shorthand for a pointer press on `target`.
    #[must_use]
    pub const fn pointer_down(target: ElementId) -> Self {
        Self::Pointer(PointerEvent::new(Some(target)))
    }

    /// Convert a crossterm event. Only key presses are mapped.
    #[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(key) => KeyEvent::from_crossterm(key).map(Self::Key),
            _ => None,
        }
    }
}

/// What the controller did with an event.
///
/// `Handled` means the host must suppress the default action (the browser's
/// own Tab move, form submission on Enter, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    #[default]
    Ignored,
    Handled,
}

impl EventResult {
    #[inline]
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    /// `Some(shift)` when this is a Tab key, `None` otherwise.
    #[must_use]
    pub fn is_tab(&self) -> Option<bool> {
        match self.code {
            KeyCode::Tab => Some(self.modifiers.contains(Modifiers::SHIFT)),
            KeyCode::BackTab => Some(true),
            _ => None,
        }
    }

    /// Convert a crossterm key event.
    #[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::KeyEvent) -> Option<Self> {
        use crossterm::event as cte;

        let code = match event.code {
            cte::KeyCode::Enter => KeyCode::Enter,
            cte::KeyCode::Esc => KeyCode::Escape,
            cte::KeyCode::Tab => KeyCode::Tab,
            cte::KeyCode::BackTab => KeyCode::BackTab,
            cte::KeyCode::Backspace => KeyCode::Backspace,
            cte::KeyCode::Up => KeyCode::Up,
            cte::KeyCode::Down => KeyCode::Down,
            cte::KeyCode::Left => KeyCode::Left,
            cte::KeyCode::Right => KeyCode::Right,
            cte::KeyCode::Char(c) => KeyCode::Char(c),
            _ => return None,
        };

        let mut modifiers = Modifiers::NONE;
        if event.modifiers.contains(cte::KeyModifiers::SHIFT) {
            modifiers |= Modifiers::SHIFT;
        }
        if event.modifiers.contains(cte::KeyModifiers::ALT) {
            modifiers |= Modifiers::ALT;
        }
        if event.modifiers.contains(cte::KeyModifiers::CONTROL) {
            modifiers |= Modifiers::CTRL;
        }
        if event.modifiers.contains(cte::KeyModifiers::SUPER)
            || event.modifiers.contains(cte::KeyModifiers::META)
        {
            modifiers |= Modifiers::SUPER;
        }

        let kind = match event.kind {
            cte::KeyEventKind::Press => KeyEventKind::Press,
            cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
            cte::KeyEventKind::Release => KeyEventKind::Release,
        };

        Some(Self {
            code,
            modifiers,
            kind,
        })
    }
}

/// Key codes the overlays care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    /// Shift+Tab as reported by terminals.
    BackTab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,
    /// Key is being held (repeat event).
    Repeat,
    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer press observed by the capturing document listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Innermost element under the pointer; `None` for the bare document.
    pub target: Option<ElementId>,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(target: Option<ElementId>) -> Self {
        Self { target }
    }
}
