#![forbid(unsafe_code)]

//! Property tests: random interaction scripts never break overlay invariants.
//!
//! Each case builds a fresh fixture, runs a generated [`Step`] script through
//! [`run_script`] (which checks listener accounting, visibility signals and
//! variant-specific invariants after every step), then checks end-state
//! properties.

use proptest::prelude::*;
use tapedeck_core::event::{Event, KeyCode, KeyEvent, Modifiers};
use tapedeck_core::host::Host;
use tapedeck_harness::{ConfirmFixture, MenuFixture, Step, TrapFixture, run_script};
use tapedeck_overlay::confirm::ConfirmConfig;
use tapedeck_overlay::overlay::{CloseOptions, OpenOutcome};

fn script(max_index: usize) -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(Step::strategy(max_index), 0..64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn menu_scripts_keep_invariants(items in 0usize..5, steps in script(6)) {
        let mut f = MenuFixture::new(items);
        if let Err(violation) = run_script(&mut f, &steps) {
            prop_assert!(false, "{}", violation);
        }
    }

    #[test]
    fn dialog_scripts_keep_invariants(steps in script(2)) {
        let mut f = ConfirmFixture::new();
        if let Err(violation) = run_script(&mut f, &steps) {
            prop_assert!(false, "{}", violation);
        }

        // Closing whatever is left settles every answer.
        f.dialog.close();
        prop_assert!(f.answers.iter().all(|a| a.is_settled()));
    }

    #[test]
    fn repeated_open_never_adds_listeners(items in 1usize..6, repeats in 1usize..10) {
        let mut f = TrapFixture::new(items);
        prop_assert_eq!(f.overlay.open(), OpenOutcome::Opened);
        for _ in 0..repeats {
            prop_assert_eq!(f.overlay.open(), OpenOutcome::Refocused);
        }
        prop_assert_eq!(f.doc.attach_count(), 2);
        prop_assert!(f.overlay.close(CloseOptions::default()));
        prop_assert!(!f.overlay.close(CloseOptions::default()));
        prop_assert_eq!(f.doc.detach_count(), 2);
    }

    #[test]
    fn tab_cycle_visits_every_item(items in 1usize..8) {
        let mut f = TrapFixture::new(items);
        f.overlay.open();
        f.overlay.run_animation_frame();

        // Emulate the host's natural Tab for inner elements: move to the
        // next item when the trap leaves the key alone.
        let mut seen = Vec::new();
        for _ in 0..items * 2 {
            let active = f.doc.active_element();
            seen.push(active);
            let handled = f.overlay.handle_event(&Event::key(KeyCode::Tab)).is_handled();
            if !handled {
                let position = f.items.iter().position(|i| Some(*i) == active);
                prop_assert!(position.is_some());
                if let Some(next) = position.and_then(|p| f.items.get(p + 1)) {
                    f.doc.user_focus(*next).unwrap();
                }
            }
        }
        for item in &f.items {
            prop_assert!(seen.contains(&Some(*item)));
        }
        prop_assert!(seen.iter().all(|s| s.is_some_and(|id| f.doc.contains(f.root, id))));
    }

    #[test]
    fn shift_tab_on_first_always_lands_on_last(items in 1usize..8) {
        let mut f = TrapFixture::new(items);
        f.overlay.open();
        f.doc.user_focus(f.items[0]).unwrap();
        let shift_tab = Event::Key(KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT));
        f.overlay.handle_event(&shift_tab);
        prop_assert_eq!(f.doc.active_element(), f.items.last().copied());
    }

    #[test]
    fn close_restores_previous_when_connected(focus_outside in any::<bool>(), remove in any::<bool>()) {
        let mut f = TrapFixture::new(2);
        let previous = if focus_outside { f.outside } else { f.trigger };
        f.doc.user_focus(previous).unwrap();
        f.overlay.open();
        f.overlay.run_animation_frame();
        if remove {
            f.doc.remove(previous);
        }
        f.overlay.close(CloseOptions::default());

        if remove {
            prop_assert_ne!(f.doc.active_element(), Some(previous));
        } else {
            prop_assert_eq!(f.doc.active_element(), Some(previous));
        }
    }

    #[test]
    fn rejected_prompts_never_disturb_the_open_one(extra in 1usize..5, confirm in any::<bool>()) {
        let mut f = ConfirmFixture::new();
        let first = f.dialog.prompt(ConfirmConfig::new("first", ""));
        for n in 0..extra {
            let rejected = f.dialog.prompt(ConfirmConfig::new(format!("extra {n}"), ""));
            prop_assert_eq!(rejected.peek(), Some(false));
        }
        prop_assert!(!first.is_settled());

        if confirm {
            f.dialog.confirm();
        } else {
            f.dialog.cancel();
        }
        prop_assert_eq!(first.peek(), Some(confirm));
    }
}
