#![forbid(unsafe_code)]

//! What closing an overlay means to its owner.
//!
//! The engine is the same for every overlay. A [`ClosePolicy`] decides the
//! two things that differ between variants: how focus is restored after an
//! outside pointer dismissal, and what happens once the overlay has closed.
//!
//! | Policy | Outside-pointer focus | On close |
//! |--------|-----------------------|----------|
//! | [`FireAndForget`] | silent (no ring, no scroll, no selection) | nothing |
//! | [`DeferredResult`] | normal | settles the pending `Deferred<bool>` |

use core::fmt;

use tapedeck_core::host::FocusOptions;

use crate::deferred::{Deferred, Resolver, deferred};

/// Why an overlay closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// `close()` called by the owner.
    Programmatic,
    /// Escape pressed.
    Escape,
    /// Pointerdown outside the overlay and its trigger.
    OutsidePointer,
    /// Tab pressed with nothing focusable inside.
    EmptyTrap,
    /// The confirm control was activated.
    Confirmed,
    /// The cancel control was activated.
    Cancelled,
}

impl CloseReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Programmatic => "programmatic",
            Self::Escape => "escape",
            Self::OutsidePointer => "outside_pointer",
            Self::EmptyTrap => "empty_trap",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific close behavior.
pub trait ClosePolicy {
    /// Focus options used when an outside pointerdown restores focus.
    fn outside_focus(&self) -> FocusOptions {
        FocusOptions::default()
    }

    /// Called once per close, after listeners are gone and focus is restored.
    fn on_close(&mut self, reason: CloseReason);
}

/// Menus: closing is only a side effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct FireAndForget;

impl ClosePolicy for FireAndForget {
    fn outside_focus(&self) -> FocusOptions {
        FocusOptions::silent()
    }

    fn on_close(&mut self, _reason: CloseReason) {}
}

/// Dialogs: every close settles a `Deferred<bool>`, `true` only for
/// [`CloseReason::Confirmed`].
#[derive(Debug, Default)]
pub struct DeferredResult {
    resolver: Option<Resolver<bool>>,
}

impl DeferredResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh resolver and return its deferred value. A resolver
    /// that was still live is settled `false` first.
    pub fn arm(&mut self) -> Deferred<bool> {
        if let Some(stale) = self.resolver.take() {
            stale.settle(false);
        }
        let (resolver, value) = deferred();
        self.resolver = Some(resolver);
        value
    }

    /// Whether a resolver is waiting to be settled.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.resolver.is_some()
    }
}

impl ClosePolicy for DeferredResult {
    fn on_close(&mut self, reason: CloseReason) {
        if let Some(resolver) = self.resolver.take() {
            resolver.settle(reason == CloseReason::Confirmed);
        }
    }
}
