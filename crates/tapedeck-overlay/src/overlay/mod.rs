#![forbid(unsafe_code)]

//! The overlay engine shared by menus and dialogs.
//!
//! [`OverlayController`] owns visibility, focus capture and restore, the Tab
//! trap, Escape and outside-pointer dismissal. It is generic over a
//! [`ClosePolicy`] that supplies the variant-specific parts:
//!
//! - [`FireAndForget`] for transient surfaces such as the app menu.
//! - [`DeferredResult`] for modal surfaces whose opener awaits an answer.
//!
//! # Focus Lifecycle
//!
//! 1. `open()` records the focused element and requests an animation frame.
//! 2. `run_animation_frame()` focuses the first focusable element.
//! 3. Tab and Shift+Tab cycle inside the overlay.
//! 4. Any close restores the recorded element, else the fallback.

mod config;
mod engine;
mod focusable;
mod listeners;
mod policy;

pub use config::OverlayConfig;
pub use engine::{CloseOptions, OpenOutcome, OverlayController};
pub use focusable::{FocusScope, focusable_elements};
pub use listeners::ListenerGuard;
pub use policy::{ClosePolicy, CloseReason, DeferredResult, FireAndForget};
