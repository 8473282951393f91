#![forbid(unsafe_code)]

//! Element handles and the metadata the overlay controllers inspect.
//!
//! The controllers never look at markup. They only need to know what kind of
//! control an element is, whether it is disabled, and whether it carries an
//! explicit tab index. Everything else stays on the host side.

use core::fmt;

/// Opaque handle to an element owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw host identifier.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse element classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    /// A hyperlink. Only tabbable when it has a destination.
    Link,
    /// A push button.
    Button,
    /// Any other element (containers, headings, text).
    #[default]
    Generic,
}

/// Snapshot of an element's interactive properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementInfo {
    pub kind: ElementKind,
    /// Link destination present (`href`).
    pub has_destination: bool,
    pub disabled: bool,
    /// Explicit `tabindex`, if any.
    pub tab_index: Option<i32>,
}

impl ElementInfo {
    /// Info for a plain element.
    #[must_use]
    pub const fn generic() -> Self {
        Self {
            kind: ElementKind::Generic,
            has_destination: false,
            disabled: false,
            tab_index: None,
        }
    }

    /// Info for an enabled button.
    #[must_use]
    pub const fn button() -> Self {
        Self {
            kind: ElementKind::Button,
            has_destination: false,
            disabled: false,
            tab_index: None,
        }
    }

    /// Info for an anchor without a destination. Chain
    /// [`with_destination`](Self::with_destination) for a real link.
    #[must_use]
    pub const fn link() -> Self {
        Self {
            kind: ElementKind::Link,
            has_destination: false,
            disabled: false,
            tab_index: None,
        }
    }

    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub const fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    #[must_use]
    pub const fn with_destination(mut self, has_destination: bool) -> Self {
        self.has_destination = has_destination;
        self
    }

    /// Whether Tab navigation may land on this element.
    ///
    /// Disabled elements never qualify. Otherwise: links with a destination,
    /// buttons, and anything with an explicit non-negative tab index.
    #[must_use]
    pub const fn is_tabbable(&self) -> bool {
        if self.disabled {
            return false;
        }
        if let Some(index) = self.tab_index {
            return index >= 0;
        }
        match self.kind {
            ElementKind::Link => self.has_destination,
            ElementKind::Button => true,
            ElementKind::Generic => false,
        }
    }
}
