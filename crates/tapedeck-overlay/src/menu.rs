#![forbid(unsafe_code)]

//! Disclosure menu anchored to a trigger button.
//!
//! The menu produces no result; opening and closing are side effects. The
//! trigger's `aria-expanded` tracks the open state on every transition,
//! including Escape and outside-pointer dismissals. Outside dismissals hand
//! focus back to the trigger silently.
//!
//! # Example
//!
//! ```
//! use tapedeck_core::element::ElementInfo;
//! use tapedeck_core::headless::HeadlessDocument;
//! use tapedeck_overlay::menu::MenuController;
//!
//! let doc = HeadlessDocument::new();
//! let trigger = doc.create(doc.body(), ElementInfo::button());
//! let panel = doc.create(doc.body(), ElementInfo::generic());
//! doc.create(panel, ElementInfo::link().with_destination(true));
//!
//! let mut menu = MenuController::new(doc.clone(), panel, trigger);
//! assert!(menu.toggle());
//! assert_eq!(doc.attribute(trigger, "aria-expanded").as_deref(), Some("true"));
//! assert!(!menu.toggle());
//! assert_eq!(doc.attribute(trigger, "aria-expanded").as_deref(), Some("false"));
//! ```

use tapedeck_core::element::ElementId;
use tapedeck_core::event::{Event, EventResult};
use tapedeck_core::host::Host;

use crate::overlay::{
    CloseOptions, FireAndForget, OpenOutcome, OverlayConfig, OverlayController,
};

/// Application menu controller.
#[derive(Debug)]
pub struct MenuController<H: Host> {
    overlay: OverlayController<H, FireAndForget>,
}

impl<H: Host> MenuController<H> {
    /// Menu rooted at `panel`, opened by `trigger`. The trigger is also the
    /// focus fallback when the previously focused element is gone.
    pub fn new(host: H, panel: ElementId, trigger: ElementId) -> Self {
        let overlay = OverlayController::new(host, panel, FireAndForget)
            .with_trigger(trigger)
            .with_fallback_focus(trigger)
            .with_config(OverlayConfig::menu());
        Self { overlay }
    }

    #[must_use]
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.overlay = self.overlay.with_config(config);
        self
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.overlay.is_rendered()
    }

    /// Open if closed, close if open. Returns the new open state.
    pub fn toggle(&mut self) -> bool {
        if self.overlay.is_open() {
            self.close();
        } else {
            self.open();
        }
        self.overlay.is_open()
    }

    pub fn open(&mut self) -> OpenOutcome {
        self.overlay.open()
    }

    pub fn close(&mut self) -> bool {
        self.overlay.close(CloseOptions::default())
    }

    pub fn close_with_options(&mut self, options: CloseOptions) -> bool {
        self.overlay.close(options)
    }

    pub fn handle_event(&mut self, event: &Event) -> EventResult {
        self.overlay.handle_event(event)
    }

    pub fn run_animation_frame(&mut self) -> bool {
        self.overlay.run_animation_frame()
    }

    pub fn focusable_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.overlay.focusable_elements()
    }

    /// The underlying engine.
    #[must_use]
    pub fn overlay(&self) -> &OverlayController<H, FireAndForget> {
        &self.overlay
    }
}
