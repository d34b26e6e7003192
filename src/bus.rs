//! Synchronous in-process publish/subscribe for mirror-set changes.

use crate::types::MirrorChangeEvent;

/// Opaque handle returned by [`MirrorChangeBus::subscribe`], used to
/// unsubscribe. Handles are never reused within one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Handler = Box<dyn Fn(&MirrorChangeEvent) + Send>;

/// Delivers [`MirrorChangeEvent`]s to registered handlers on the publishing
/// thread. Delivery order is reverse registration order (most recently
/// registered handler first); this is a contract, not an accident of the
/// backing container. Events are fire-and-forget: nothing is persisted or
/// replayed, and publishing with no subscribers does nothing.
#[derive(Default)]
pub struct MirrorChangeBus {
    subscribers: Vec<(u64, Handler)>,
    next_handle: u64,
}

impl MirrorChangeBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> Subscription
    where
        F: Fn(&MirrorChangeEvent) + Send + 'static,
    {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.subscribers.push((handle, Box::new(handler)));
        Subscription(handle)
    }

    /// Removes a subscriber. Unknown or already-removed handles are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers
            .retain(|(handle, _)| *handle != subscription.0);
    }

    pub fn publish(&self, event: &MirrorChangeEvent) {
        tracing::debug!(
            bus.kind = ?event.kind,
            bus.mirror = %event.descriptor.name,
            bus.subscribers = self.subscribers.len(),
            "publish mirror change"
        );
        for (_, handler) in self.subscribers.iter().rev() {
            handler(event);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
