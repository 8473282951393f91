#![forbid(unsafe_code)]

//! JSONL logging for integration tests.
//!
//! Each line is one JSON object with `schema_version`, `seq`, `run_id`,
//! `event`, any context fields set on the logger, then the per-line fields.
//! Lines go to stderr only when `TAPEDECK_TEST_LOG` is set to a truthy value,
//! so a normal `cargo test` run stays quiet.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

/// Environment switch that turns stderr output on.
pub const TEST_LOG_ENV: &str = "TAPEDECK_TEST_LOG";

const SCHEMA_VERSION: u64 = 1;

/// Sequenced JSONL logger scoped to one test.
#[derive(Debug)]
pub struct TestJsonlLogger {
    run_id: String,
    seq: AtomicU64,
    context: Map<String, Value>,
    enabled: bool,
}

impl TestJsonlLogger {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        let enabled = std::env::var(TEST_LOG_ENV)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        Self {
            run_id: run_id.into(),
            seq: AtomicU64::new(0),
            context: Map::new(),
            enabled,
        }
    }

    /// Force output on or off regardless of the environment.
    #[must_use]
    pub fn with_output(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Add a field repeated on every line.
    pub fn add_context(&mut self, key: &str, value: impl Into<Value>) {
        self.context.insert(key.to_string(), value.into());
    }

    /// Build one line without printing it.
    #[must_use]
    pub fn emit_line(&self, event: &str, fields: &[(&str, Value)]) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut line = Map::new();
        line.insert("schema_version".into(), SCHEMA_VERSION.into());
        line.insert("seq".into(), seq.into());
        line.insert("run_id".into(), self.run_id.clone().into());
        line.insert("event".into(), event.into());
        if !self.context.is_empty() {
            line.insert("context".into(), Value::Object(self.context.clone()));
        }
        for (key, value) in fields {
            line.insert((*key).to_string(), value.clone());
        }
        Value::Object(line).to_string()
    }

    /// Build a line and print it to stderr when output is enabled.
    pub fn log(&self, event: &str, fields: &[(&str, Value)]) {
        let line = self.emit_line(event, fields);
        if self.enabled {
            eprintln!("{line}");
        }
    }
}
