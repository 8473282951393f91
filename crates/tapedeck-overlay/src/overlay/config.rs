#![forbid(unsafe_code)]

//! Overlay behavior switches.

/// Which interactions an overlay responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Escape closes the overlay.
    pub close_on_escape: bool,
    /// A pointerdown outside the overlay and its trigger closes it.
    pub close_on_outside_pointer: bool,
    /// Tab and Shift+Tab cycle inside the overlay.
    pub trap_focus: bool,
    /// Mirror the open state into the trigger's `aria-expanded`.
    pub sync_trigger_expanded: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            close_on_outside_pointer: true,
            trap_focus: true,
            sync_trigger_expanded: false,
        }
    }
}

impl OverlayConfig {
    /// Defaults for a disclosure menu: like [`Default`], plus `aria-expanded`
    /// syncing on the trigger.
    #[must_use]
    pub fn menu() -> Self {
        Self::default().sync_trigger_expanded(true)
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn close_on_outside_pointer(mut self, close: bool) -> Self {
        self.close_on_outside_pointer = close;
        self
    }

    #[must_use]
    pub fn trap_focus(mut self, trap: bool) -> Self {
        self.trap_focus = trap;
        self
    }

    #[must_use]
    pub fn sync_trigger_expanded(mut self, sync: bool) -> Self {
        self.sync_trigger_expanded = sync;
        self
    }
}
