#![forbid(unsafe_code)]

//! Single-threaded deferred values.
//!
//! A [`Resolver`] / [`Deferred`] pair shares one slot. The resolver writes it
//! at most once; the deferred side reads it, either by polling it as a
//! [`Future`] or through the synchronous [`Deferred::peek`] and
//! [`Deferred::take`].
//!
//! # Invariants
//!
//! 1. A slot is settled at most once. The first `settle` wins.
//! 2. Dropping an unsettled [`Resolver`] settles with `T::default()`, so an
//!    awaiting caller can never hang on a resolver that went away.
//! 3. Settling wakes the most recently registered waker.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Poll after completion | Value already taken | `Poll::Pending` forever |
//! | Resolver dropped | Owner discarded | Settles with `T::default()` |

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct Slot<T> {
    value: Option<T>,
    settled: bool,
    waker: Option<Waker>,
}

impl<T> Slot<T> {
    fn fill(&mut self, value: T) {
        if self.settled {
            return;
        }
        self.settled = true;
        self.value = Some(value);
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// Create a linked resolver and deferred value.
#[must_use]
pub fn deferred<T: Default>() -> (Resolver<T>, Deferred<T>) {
    let slot = Rc::new(RefCell::new(Slot {
        value: None,
        settled: false,
        waker: None,
    }));
    (
        Resolver {
            slot: Some(Rc::clone(&slot)),
        },
        Deferred { slot },
    )
}

/// The reading half.
pub struct Deferred<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Deferred<T> {
    /// A value that is already settled.
    #[must_use]
    pub fn settled(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value: Some(value),
                settled: true,
                waker: None,
            })),
        }
    }

    /// Whether the resolver has written a value (taken or not).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.slot.borrow().settled
    }

    /// Remove the settled value, if present.
    pub fn take(&mut self) -> Option<T> {
        self.slot.borrow_mut().value.take()
    }
}

impl<T: Clone> Deferred<T> {
    /// Copy of the settled value, if present and not yet taken.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        self.slot.borrow().value.clone()
    }
}

impl<T> Future for Deferred<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut slot = self.slot.borrow_mut();
        match slot.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                if !slot.settled {
                    slot.waker = Some(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Deferred")
            .field("settled", &slot.settled)
            .field("value", &slot.value)
            .finish()
    }
}

/// The writing half. Settles with `T::default()` if dropped unsettled.
pub struct Resolver<T: Default> {
    slot: Option<Rc<RefCell<Slot<T>>>>,
}

impl<T: Default> Resolver<T> {
    /// Write the value and wake the reader.
    pub fn settle(mut self, value: T) {
        if let Some(slot) = self.slot.take() {
            slot.borrow_mut().fill(value);
        }
    }
}

impl<T: Default> Drop for Resolver<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.borrow_mut().fill(T::default());
        }
    }
}

impl<T: Default> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("live", &self.slot.is_some())
            .finish()
    }
}
