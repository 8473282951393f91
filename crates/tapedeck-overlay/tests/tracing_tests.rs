#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! With spans and events:
//!   cargo test -p tapedeck-overlay --features tracing --test tracing_tests
//!
//! Without the feature nothing is emitted:
//!   cargo test -p tapedeck-overlay --test tracing_tests -- silent

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tapedeck_core::element::ElementInfo;
use tapedeck_core::event::{Event, KeyCode};
use tapedeck_core::headless::HeadlessDocument;
#[cfg(feature = "tracing")]
use tapedeck_overlay::confirm::ConfirmSurface;
use tapedeck_overlay::confirm::{ConfirmConfig, ConfirmDialog};
use tapedeck_overlay::menu::MenuController;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Captured {
    name: String,
    level: tracing::Level,
    fields: HashMap<String, String>,
}

struct Capture {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(HashMap::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            level: *attrs.metadata().level(),
            fields: visitor.0,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(HashMap::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            name: event.metadata().name().to_string(),
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

fn with_capture<F: FnOnce()>(f: F) -> CaptureHandle {
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: Arc::clone(&spans),
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn menu_fixture() -> (HeadlessDocument, MenuController<HeadlessDocument>) {
    let doc = HeadlessDocument::new();
    let trigger = doc.create(doc.body(), ElementInfo::button());
    let panel = doc.create(doc.body(), ElementInfo::generic());
    doc.create(panel, ElementInfo::button());
    let menu = MenuController::new(doc.clone(), panel, trigger);
    (doc, menu)
}

#[test]
#[cfg(feature = "tracing")]
fn open_and_close_spans_carry_reason() {
    let (_doc, mut menu) = menu_fixture();
    let handle = with_capture(|| {
        menu.open();
        menu.handle_event(&Event::key(KeyCode::Escape));
    });

    let spans = handle.spans();
    assert!(spans.iter().any(|s| s.name == "overlay_open"));
    let close = spans
        .iter()
        .find(|s| s.name == "overlay_close")
        .expect("close span");
    assert_eq!(close.fields.get("reason").map(String::as_str), Some("escape"));
    assert_eq!(close.level, tracing::Level::DEBUG);
}

#[test]
#[cfg(feature = "tracing")]
fn failed_host_operation_warns() {
    let (doc, mut menu) = menu_fixture();
    let trigger = menu.overlay().trigger().expect("menu trigger");
    doc.user_focus(trigger).unwrap();
    menu.open();
    doc.set_disabled(trigger, true);

    let handle = with_capture(|| {
        menu.close();
    });

    let warnings: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert!(!warnings.is_empty(), "expected warnings for an unfocusable trigger");
    assert!(warnings.iter().all(|w| w.fields.contains_key("op")));
}

#[test]
#[cfg(feature = "tracing")]
fn trap_moves_are_traced() {
    let (doc, mut menu) = menu_fixture();
    menu.open();
    doc.blur();

    let handle = with_capture(|| {
        menu.handle_event(&Event::key(KeyCode::Tab));
    });

    assert!(
        handle
            .events()
            .iter()
            .any(|e| e.level == tracing::Level::TRACE && e.fields.contains_key("to")),
        "expected a trap move event"
    );
}

#[test]
#[cfg(feature = "tracing")]
fn rejected_prompt_is_logged() {
    let doc = HeadlessDocument::new();
    let root = doc.create(doc.body(), ElementInfo::generic());
    let surface = ConfirmSurface {
        root,
        title: doc.create(root, ElementInfo::generic()),
        message: doc.create(root, ElementInfo::generic()),
        confirm: doc.create(root, ElementInfo::button()),
        cancel: doc.create(root, ElementInfo::button()),
    };
    let mut dialog = ConfirmDialog::new(doc.clone(), surface);
    let _first = dialog.prompt(ConfirmConfig::new("First", ""));

    let handle = with_capture(|| {
        let _second = dialog.prompt(ConfirmConfig::new("Second", ""));
    });

    let events = handle.events();
    let rejected = events
        .iter()
        .find(|e| e.fields.get("title").map(String::as_str) == Some("Second"))
        .expect("rejection event");
    assert_eq!(rejected.level, tracing::Level::DEBUG);
}

#[test]
#[cfg(not(feature = "tracing"))]
fn silent_without_feature() {
    let (_doc, mut menu) = menu_fixture();
    let handle = with_capture(|| {
        menu.toggle();
        menu.handle_event(&Event::key(KeyCode::Tab));
        menu.toggle();
    });
    assert!(handle.spans().is_empty());
    assert!(handle.events().is_empty());
}

#[test]
#[cfg(not(feature = "tracing"))]
fn silent_confirm_without_feature() {
    let doc = HeadlessDocument::new();
    let handle = with_capture(|| {
        let mut dialog = ConfirmDialog::native_only(doc.clone());
        let answer = dialog.prompt(ConfirmConfig::new("Delete?", ""));
        assert_eq!(answer.peek(), Some(false));
    });
    assert!(handle.events().is_empty());
}
