#![forbid(unsafe_code)]

//! Overlay controllers for the Tapedeck dashboard.
//!
//! - [`overlay`]: the shared engine (visibility, focus trap, dismissal).
//! - [`menu`]: the disclosure menu anchored to a trigger.
//! - [`confirm`]: the modal confirmation dialog with a deferred answer.
//! - [`deferred`]: the single-threaded future the dialog hands out.
//!
//! All controllers talk to their environment through
//! [`tapedeck_core::host::Host`] and never touch rendering directly.
//!
//! # Feature Flags
//!
//! - `tracing`: emit `debug`/`trace`/`warn` events for open, close, trap
//!   moves and failed host operations.

pub mod confirm;
pub mod deferred;
pub mod menu;
pub mod overlay;

pub use confirm::{ConfirmConfig, ConfirmCopy, ConfirmDialog, ConfirmPreset, ConfirmSurface};
pub use deferred::{Deferred, Resolver};
pub use menu::MenuController;
pub use overlay::{
    CloseOptions, ClosePolicy, CloseReason, DeferredResult, FireAndForget, FocusScope,
    OpenOutcome, OverlayConfig, OverlayController,
};
