#![forbid(unsafe_code)]

//! Scoped document listener registration.
//!
//! An open overlay holds exactly one [`ListenerGuard`]: a capturing
//! pointerdown listener plus a keydown listener. Dropping the guard detaches
//! both, so every close path (including dropping the controller) releases
//! them exactly once.

use std::fmt;

use tapedeck_core::host::{Host, ListenerId, ListenerKind, ListenerOptions};

/// Owns the document listeners of one open overlay.
pub struct ListenerGuard<H: Host> {
    host: H,
    pointer: ListenerId,
    key: ListenerId,
}

impl<H: Host> ListenerGuard<H> {
    /// Register both listeners on `host`.
    #[must_use]
    pub fn attach(host: &H) -> Self {
        let pointer = host.add_listener(ListenerKind::PointerDown, ListenerOptions::capture());
        let key = host.add_listener(ListenerKind::KeyDown, ListenerOptions::default());
        Self {
            host: host.clone(),
            pointer,
            key,
        }
    }

    #[must_use]
    pub fn pointer(&self) -> ListenerId {
        self.pointer
    }

    #[must_use]
    pub fn key(&self) -> ListenerId {
        self.key
    }
}

impl<H: Host> Drop for ListenerGuard<H> {
    fn drop(&mut self) {
        self.host.remove_listener(self.pointer);
        self.host.remove_listener(self.key);
    }
}

impl<H: Host> fmt::Debug for ListenerGuard<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("pointer", &self.pointer)
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapedeck_core::headless::HeadlessDocument;

    #[test]
    fn attach_registers_capture_pointer_and_keydown() {
        let doc = HeadlessDocument::new();
        let guard = ListenerGuard::attach(&doc);

        assert_eq!(doc.listener_count(ListenerKind::PointerDown), 1);
        assert_eq!(doc.listener_count(ListenerKind::KeyDown), 1);
        assert!(doc.listeners_capture(ListenerKind::PointerDown));
        assert_ne!(guard.pointer(), guard.key());
    }

    #[test]
    fn drop_detaches_both() {
        let doc = HeadlessDocument::new();
        let guard = ListenerGuard::attach(&doc);
        drop(guard);

        assert_eq!(doc.total_listeners(), 0);
        assert_eq!(doc.attach_count(), 2);
        assert_eq!(doc.detach_count(), 2);
    }
}
