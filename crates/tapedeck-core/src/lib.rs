#![forbid(unsafe_code)]

//! Core types shared by the Tapedeck dashboard overlays.
//!
//! - [`element`]: element handles and the tabbability rule.
//! - [`event`]: keyboard and pointer events delivered by the host.
//! - [`host`]: the [`Host`](host::Host) trait, the only boundary the overlay
//!   controllers talk to.
//! - [`headless`]: an in-memory [`Host`](host::Host) for tests and
//!   server-side previews.
//! - [`logging`]: production log setup (behind `tracing-json`).

pub mod element;
pub mod event;
pub mod headless;
pub mod host;
pub mod logging;

pub use element::{ElementId, ElementInfo, ElementKind};
pub use event::{Event, EventResult, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent};
pub use host::{FocusOptions, Host, HostError, ListenerId, ListenerKind, ListenerOptions};
