#![no_main]

//! Drive menus and confirm dialogs with arbitrary interaction scripts.
//!
//! Any invariant violation reported by `run_script` is a crash.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tapedeck_harness::{ConfirmFixture, MenuFixture, Step, run_script};

#[derive(Debug, Arbitrary)]
enum FuzzStep {
    Open,
    Close,
    Frame,
    Tab,
    ShiftTab,
    Escape,
    Enter,
    PointerInside(u8),
    PointerOutside,
    PointerTrigger,
    FocusItem(u8),
    FocusOutside,
    Blur,
    ToggleDisabled(u8),
    Confirm,
    Cancel,
}

impl From<FuzzStep> for Step {
    fn from(step: FuzzStep) -> Self {
        match step {
            FuzzStep::Open => Step::Open,
            FuzzStep::Close => Step::Close,
            FuzzStep::Frame => Step::Frame,
            FuzzStep::Tab => Step::Tab,
            FuzzStep::ShiftTab => Step::ShiftTab,
            FuzzStep::Escape => Step::Escape,
            FuzzStep::Enter => Step::Enter,
            FuzzStep::PointerInside(n) => Step::PointerInside(usize::from(n)),
            FuzzStep::PointerOutside => Step::PointerOutside,
            FuzzStep::PointerTrigger => Step::PointerTrigger,
            FuzzStep::FocusItem(n) => Step::FocusItem(usize::from(n)),
            FuzzStep::FocusOutside => Step::FocusOutside,
            FuzzStep::Blur => Step::Blur,
            FuzzStep::ToggleDisabled(n) => Step::ToggleDisabled(usize::from(n)),
            FuzzStep::Confirm => Step::Confirm,
            FuzzStep::Cancel => Step::Cancel,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    menu_items: u8,
    steps: Vec<FuzzStep>,
}

fuzz_target!(|input: Input| {
    let steps: Vec<Step> = input.steps.into_iter().take(256).map(Step::from).collect();

    let mut menu = MenuFixture::new(usize::from(input.menu_items % 8));
    if let Err(violation) = run_script(&mut menu, &steps) {
        panic!("menu: {violation}");
    }

    let mut dialog = ConfirmFixture::new();
    if let Err(violation) = run_script(&mut dialog, &steps) {
        panic!("dialog: {violation}");
    }
});
