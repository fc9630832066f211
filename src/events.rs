use alloc::sync::Arc;
use alloc::vec::Vec;

/// A dashboard lifecycle event.
///
/// Item-scoped events carry a one-element slice; batch-scoped events carry the whole batch;
/// [`DashEvent::Unload`] (instance teardown) carries an empty slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DashEvent {
    /// An item was detected and is about to be processed.
    ItemFound,
    /// An item finished classification and registration.
    ItemProcessed,
    /// An item scrolled into view (its content is restored by the time this fires).
    ItemVisible,
    /// An item scrolled completely out of view (fires before its content is archived).
    ItemHidden,
    /// A batch of items was discovered.
    BatchFound,
    /// A batch finished processing.
    BatchProcessed,
    /// All images in a batch finished loading.
    BatchImgsLoaded,
    /// The layout engine reported a batch as laid out.
    BatchLaidOut,
    /// The dashboard instance is about to be destroyed.
    Unload,
}

/// A listener invoked with the event's items.
pub type EventCallback<E> = Arc<dyn Fn(&[E]) + Send + Sync>;

/// A composed event source.
///
/// The controller owns one of these instead of inheriting emitter behavior; listeners are
/// bound to explicit [`DashEvent`] values rather than derived from option names.
pub struct Emitter<E> {
    listeners: Vec<(DashEvent, EventCallback<E>)>,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn on(&mut self, event: DashEvent, callback: EventCallback<E>) {
        self.listeners.push((event, callback));
    }

    /// Invokes every listener bound to `event`, in registration order.
    pub fn emit(&self, event: DashEvent, items: &[E]) {
        for (bound, callback) in &self.listeners {
            if *bound == event {
                callback(items);
            }
        }
    }

    pub fn listener_count(&self, event: DashEvent) -> usize {
        self.listeners.iter().filter(|(e, _)| *e == event).count()
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
