#![forbid(unsafe_code)]

//! Reference documents for overlay tests.
//!
//! Every fixture builds its own [`HeadlessDocument`] with the same shape:
//!
//! ```text
//! body
//! ├── opener / trigger   (button)
//! ├── outside            (button, never part of an overlay)
//! └── root               (overlay surface, starts hidden)
//!     └── items...       (focusable controls)
//! ```

use tapedeck_core::element::{ElementId, ElementInfo};
use tapedeck_core::headless::HeadlessDocument;
use tapedeck_core::host::{ATTR_ARIA_EXPANDED, ATTR_ARIA_HIDDEN, ATTR_HIDDEN, Host};
use tapedeck_overlay::confirm::{ConfirmDialog, ConfirmSurface};
use tapedeck_overlay::deferred::Deferred;
use tapedeck_overlay::menu::MenuController;
use tapedeck_overlay::overlay::{FireAndForget, OverlayController};

fn preset(doc: &HeadlessDocument, id: ElementId, name: &str, value: &str) {
    doc.set_attribute(id, name, value)
        .expect("fixture element exists");
}

fn hidden_root(doc: &HeadlessDocument) -> ElementId {
    let root = doc.create(doc.body(), ElementInfo::generic());
    preset(doc, root, ATTR_HIDDEN, "");
    preset(doc, root, ATTR_ARIA_HIDDEN, "true");
    root
}

/// Application menu: a trigger button and a panel of links.
#[derive(Debug)]
pub struct MenuFixture {
    pub doc: HeadlessDocument,
    pub trigger: ElementId,
    pub outside: ElementId,
    pub panel: ElementId,
    pub items: Vec<ElementId>,
    pub menu: MenuController<HeadlessDocument>,
}

impl MenuFixture {
    /// A menu with `item_count` links.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        let doc = HeadlessDocument::new();
        let trigger = doc.create(doc.body(), ElementInfo::button());
        let outside = doc.create(doc.body(), ElementInfo::button());
        let panel = hidden_root(&doc);
        let items = (0..item_count)
            .map(|_| doc.create(panel, ElementInfo::link().with_destination(true)))
            .collect();
        preset(&doc, trigger, ATTR_ARIA_EXPANDED, "false");
        let menu = MenuController::new(doc.clone(), panel, trigger);
        Self {
            doc,
            trigger,
            outside,
            panel,
            items,
            menu,
        }
    }

    /// Current `aria-expanded` of the trigger.
    #[must_use]
    pub fn expanded(&self) -> Option<String> {
        self.doc.attribute(self.trigger, ATTR_ARIA_EXPANDED)
    }

    /// Put focus on the trigger, as a click on it would.
    pub fn focus_trigger(&self) {
        self.doc
            .user_focus(self.trigger)
            .expect("trigger is focusable");
    }
}

/// Confirmation dialog: title, message, confirm and cancel controls.
#[derive(Debug)]
pub struct ConfirmFixture {
    pub doc: HeadlessDocument,
    pub opener: ElementId,
    pub outside: ElementId,
    pub surface: ConfirmSurface,
    pub dialog: ConfirmDialog<HeadlessDocument>,
    /// Answers handed out by prompts driven through [`crate::script`].
    pub answers: Vec<Deferred<bool>>,
}

impl Default for ConfirmFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmFixture {
    #[must_use]
    pub fn new() -> Self {
        let doc = HeadlessDocument::new();
        let opener = doc.create(doc.body(), ElementInfo::button());
        let outside = doc.create(doc.body(), ElementInfo::button());
        let root = hidden_root(&doc);
        let surface = ConfirmSurface {
            root,
            title: doc.create(root, ElementInfo::generic()),
            message: doc.create(root, ElementInfo::generic()),
            confirm: doc.create(root, ElementInfo::button()),
            cancel: doc.create(root, ElementInfo::button()),
        };
        let dialog = ConfirmDialog::new(doc.clone(), surface);
        Self {
            doc,
            opener,
            outside,
            surface,
            dialog,
            answers: Vec::new(),
        }
    }

    /// Same document, but the dialog surface was never rendered.
    #[must_use]
    pub fn unrendered() -> Self {
        let fixture = Self::new();
        fixture.doc.remove(fixture.surface.root);
        fixture
    }

    /// Put focus on the button that opens the dialog.
    pub fn focus_opener(&self) {
        self.doc
            .user_focus(self.opener)
            .expect("opener is focusable");
    }

    /// The two controls in trap order.
    #[must_use]
    pub fn controls(&self) -> [ElementId; 2] {
        [self.surface.confirm, self.surface.cancel]
    }
}

/// Bare engine over a subtree of buttons, for trap tests.
#[derive(Debug)]
pub struct TrapFixture {
    pub doc: HeadlessDocument,
    pub trigger: ElementId,
    pub outside: ElementId,
    pub root: ElementId,
    pub items: Vec<ElementId>,
    pub overlay: OverlayController<HeadlessDocument, FireAndForget>,
}

impl TrapFixture {
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        let doc = HeadlessDocument::new();
        let trigger = doc.create(doc.body(), ElementInfo::button());
        let outside = doc.create(doc.body(), ElementInfo::button());
        let root = hidden_root(&doc);
        let items = (0..item_count)
            .map(|_| doc.create(root, ElementInfo::button()))
            .collect();
        let overlay =
            OverlayController::new(doc.clone(), root, FireAndForget).with_trigger(trigger);
        Self {
            doc,
            trigger,
            outside,
            root,
            items,
            overlay,
        }
    }
}
