#![forbid(unsafe_code)]

//! Test harness for the Tapedeck overlay controllers.
//!
//! - [`fixtures`]: standard menu, dialog and trap documents on a
//!   [`HeadlessDocument`](tapedeck_core::headless::HeadlessDocument).
//! - [`script`]: a small step language driving a controller, shared by the
//!   property tests and the fuzz target.
//! - [`jsonl`]: structured JSONL test logs.

pub mod fixtures;
pub mod jsonl;
pub mod script;

pub use fixtures::{ConfirmFixture, MenuFixture, TrapFixture};
pub use jsonl::TestJsonlLogger;
pub use script::{Step, Subject, run_script};
