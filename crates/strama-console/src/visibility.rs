//! Document visibility signal
//!
//! The hosting application owns the platform's visibility events and
//! publishes them here; the polling scheduler only consumes the signal.
//! Backed by a watch channel so the scheduler always sees the latest
//! value and never queues stale transitions.

use std::sync::Arc;

use tokio::sync::watch;

/// Publisher half, held by the hosting application.
#[derive(Debug)]
pub struct VisibilityPublisher {
    tx: watch::Sender<bool>,
}

impl VisibilityPublisher {
    /// Publish a visibility change. Publishing the current value is
    /// harmless.
    pub fn set_visible(&self, visible: bool) {
        let _ = self.tx.send(visible);
    }
}

/// Consumer half, handed to the polling scheduler.
#[derive(Debug, Clone)]
pub struct VisibilitySignal {
    rx: watch::Receiver<bool>,
    // Keeps the sender alive for signals without a publisher, so the
    // receiver never observes a closed channel.
    _keepalive: Option<Arc<watch::Sender<bool>>>,
}

impl VisibilitySignal {
    /// Whether the document is currently visible.
    pub fn is_visible(&self) -> bool {
        *self.rx.borrow()
    }

    /// Signal that is permanently visible, for hosts without a
    /// visibility source and for tests.
    pub fn always_visible() -> Self {
        let (tx, rx) = watch::channel(true);
        Self {
            rx,
            _keepalive: Some(Arc::new(tx)),
        }
    }

    pub(crate) fn receiver(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }
}

/// Create a visibility channel. Starts visible.
pub fn visibility_channel() -> (VisibilityPublisher, VisibilitySignal) {
    let (tx, rx) = watch::channel(true);
    (
        VisibilityPublisher { tx },
        VisibilitySignal {
            rx,
            _keepalive: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_visible() {
        let (_publisher, signal) = visibility_channel();
        assert!(signal.is_visible());
    }

    #[test]
    fn test_publish_and_observe() {
        let (publisher, signal) = visibility_channel();
        publisher.set_visible(false);
        assert!(!signal.is_visible());
        publisher.set_visible(true);
        assert!(signal.is_visible());
    }

    #[test]
    fn test_always_visible() {
        let signal = VisibilitySignal::always_visible();
        assert!(signal.is_visible());
    }
}
