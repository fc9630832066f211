use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::slice;

use crate::archive::{ItemSlot, Unloader};
use crate::events::Emitter;
use crate::key::KeyMap;
use crate::observer::{MutationBatcher, MutationRecord, ObserveOptions};
use crate::visibility::InOutTracker;
use crate::{
    DashError, DashEvent, DashOptions, Dom, ItemKey, LayoutConfig, TrackStrategy, Transition,
};

/// Marker class on every element accepted as a dashboard item.
pub const CLASS_INCLUDED: &str = "dup-item";
/// Marker class added once an item's batch is fully laid out.
pub const CLASS_PROCESSED: &str = "dup-processed";

/// Identifies one pending batch across the asynchronous image-load wait.
pub type BatchId = u64;

/// Where a batch is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatchPhase {
    /// Delivered by the mutation batcher, nothing done yet.
    Discovered,
    /// Items are being marked and registered, one item at a time.
    Classified,
    /// Items are registered with the archive and have visibility trackers.
    Registered,
    /// Items were handed to the layout engine.
    LayoutPending,
    /// Waiting for the adapter's image-load completion.
    ImagesLoading,
    /// Final positioning ran for this batch.
    LaidOut,
}

/// The external masonry-style layout engine.
///
/// The controller treats it as a black box: items go in via [`LayoutEngine::add_items`],
/// positioning is requested via [`LayoutEngine::layout`], and the engine's layout-complete
/// notification flows back through [`Dash::notify_layout_complete`].
pub trait LayoutEngine<E> {
    /// Registers newly discovered items with the engine.
    fn add_items(&mut self, items: &[E]);

    /// Positions the given items, or runs a full layout when `items` is `None`.
    fn layout(&mut self, items: Option<&[E]>);

    /// Tears the engine down.
    fn destroy(&mut self);
}

struct TrackedItem<E> {
    tracker: InOutTracker,
    slot: ItemSlot<E>,
}

struct PendingBatch<E> {
    items: Vec<E>,
    phase: BatchPhase,
}

/// The dashboard controller.
///
/// `Dash` orchestrates the mutation batcher, the per-item visibility trackers, the content
/// archive, and the external layout engine. It is entirely adapter-driven: construction
/// processes the synchronous initial batch, and afterwards the adapter forwards mutation
/// records, per-element viewport transitions, image-load completions, and layout completions
/// into the `notify_*` methods. All work happens on the caller's tick; nothing blocks.
pub struct Dash<D: Dom, L: LayoutEngine<D::Elem>> {
    layout: L,
    events: Emitter<D::Elem>,
    batcher: MutationBatcher<D>,
    unloader: Option<Unloader<D>>,
    trackers: KeyMap<TrackedItem<D::Elem>>,
    batches: BTreeMap<BatchId, PendingBatch<D::Elem>>,
    next_batch: BatchId,
    first_batch_done: bool,
    active: bool,
    strategy: TrackStrategy,
}

impl<D: Dom, L: LayoutEngine<D::Elem>> Dash<D, L> {
    /// Builds the controller and processes the initial batch.
    ///
    /// `make_layout` constructs the external engine from the container and the layout
    /// configuration; the engine is expected to run its initial full layout itself (the
    /// initial batch is deliberately not passed through [`LayoutEngine::add_items`]).
    ///
    /// Fails synchronously on an invalid container or a malformed item selector.
    pub fn new(
        dom: &mut D,
        options: DashOptions<D::Elem>,
        make_layout: impl FnOnce(&D::Elem, &LayoutConfig) -> L,
    ) -> Result<Self, DashError> {
        let DashOptions {
            container,
            item_selector,
            purge_unmatching,
            layout: layout_config,
            item_id_attr,
            unload,
            unload_mode,
            strategy,
            listeners,
        } = options;

        let mut events = Emitter::new();
        for (event, callback) in listeners {
            events.on(event, callback);
        }

        let layout = make_layout(&container, &layout_config);
        let unloader = if unload {
            Some(Unloader::new(item_id_attr, unload_mode))
        } else {
            None
        };

        let observe = ObserveOptions::new()
            .with_selector(item_selector)
            .with_purge(purge_unmatching);
        let (batcher, initial) = MutationBatcher::new(dom, container, observe)?;

        ddebug!(
            initial = initial.len(),
            unload,
            ?strategy,
            "Dash::new"
        );

        let mut dash = Self {
            layout,
            events,
            batcher,
            unloader,
            trackers: KeyMap::new(),
            batches: BTreeMap::new(),
            next_batch: 0,
            first_batch_done: false,
            active: true,
            strategy,
        };
        dash.process_batch(dom, initial)?;
        // The initial scan counts as the first batch even when it is empty; the
        // engine's initial full layout only covers what exists at construction.
        dash.first_batch_done = true;
        Ok(dash)
    }

    pub fn layout_engine(&self) -> &L {
        &self.layout
    }

    pub fn layout_engine_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    pub fn unloader(&self) -> Option<&Unloader<D>> {
        self.unloader.as_ref()
    }

    /// Whether the instance has not been destroyed yet.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Binds an additional listener after construction.
    pub fn on(&mut self, event: DashEvent, callback: impl Fn(&[D::Elem]) + Send + Sync + 'static) {
        self.events.on(event, alloc::sync::Arc::new(callback));
    }

    /// The phase of a pending batch, if the id is known.
    pub fn batch_phase(&self, batch: BatchId) -> Option<BatchPhase> {
        self.batches.get(&batch).map(|b| b.phase)
    }

    /// The number of batches the controller still remembers.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Feeds one observation cycle's mutation records through the batcher.
    ///
    /// Returns the id of the resulting pending batch, or `None` when the cycle produced no
    /// items (an all-filtered cycle never reaches the processing pipeline). The adapter uses
    /// the returned id to report the batch's image-load completion later. Filter errors abort
    /// the batch and propagate.
    pub fn notify_mutations(
        &mut self,
        dom: &mut D,
        records: &[MutationRecord<D::Elem>],
    ) -> Result<Option<BatchId>, DashError> {
        if !self.active {
            return Ok(None);
        }
        let batch = self.batcher.process(dom, records)?;
        self.process_batch(dom, batch)
    }

    /// Reports that every image in a pending batch finished loading.
    ///
    /// Runs final positioning for the loaded items, marks the batch's items as processed, and
    /// moves the batch to [`BatchPhase::LaidOut`]. Unknown ids and repeated completions are
    /// ignored.
    pub fn notify_images_loaded(&mut self, dom: &mut D, batch: BatchId, loaded: &[D::Elem]) {
        if !self.active {
            return;
        }

        let items = match self.batches.get(&batch) {
            Some(pending) if pending.phase == BatchPhase::ImagesLoading => pending.items.clone(),
            Some(pending) => {
                dtrace!(batch, phase = ?pending.phase, "images-loaded ignored: wrong phase");
                return;
            }
            None => {
                dwarn!(batch, "images-loaded ignored: unknown batch id");
                return;
            }
        };

        self.events.emit(DashEvent::BatchImgsLoaded, &items);
        self.layout.layout(Some(loaded));
        for item in &items {
            dom.add_class(item, CLASS_PROCESSED);
        }
        if let Some(pending) = self.batches.get_mut(&batch) {
            pending.phase = BatchPhase::LaidOut;
        }
    }

    /// Forwards the layout engine's layout-complete notification to event listeners.
    pub fn notify_layout_complete(&mut self, items: &[D::Elem]) {
        if !self.active {
            return;
        }
        self.events.emit(DashEvent::BatchLaidOut, items);
    }

    /// Feeds one raw viewport transition for an element.
    ///
    /// The element's strategy machine decides whether anything fires. On an accepted enter
    /// the item's content is reloaded *before* `ItemVisible` is emitted, so listeners never
    /// observe a visible-but-unrendered item; on an accepted exit `ItemHidden` is emitted
    /// while the content is still rendered, then the item is unloaded.
    ///
    /// Elements without a tracker (unloading disabled, or never registered) are ignored.
    pub fn notify_visibility(&mut self, dom: &mut D, elem: &D::Elem, transition: Transition) {
        if !self.active {
            return;
        }
        let Some(unloader) = self.unloader.as_mut() else {
            return;
        };
        let Some(attr) = dom.attribute(elem, unloader.id_attr()) else {
            return;
        };
        let key = ItemKey::from_attr(&attr);
        let Some(tracked) = self.trackers.get_mut(&key) else {
            return;
        };

        match tracked.tracker.observe(transition) {
            Some(Transition::Enter) => {
                unloader.reload(dom, &tracked.slot);
                self.events.emit(DashEvent::ItemVisible, slice::from_ref(elem));
            }
            Some(Transition::Exit) => {
                self.events.emit(DashEvent::ItemHidden, slice::from_ref(elem));
                unloader.unload(dom, &tracked.slot);
            }
            None => {}
        }
    }

    /// Destroys the instance.
    ///
    /// Emits [`DashEvent::Unload`], tears down the layout engine, drops the pending-batch
    /// table, and cancels every outstanding per-item visibility tracker. Afterwards all
    /// `notify_*` calls are inert.
    pub fn destroy(&mut self) {
        if !self.active {
            return;
        }
        ddebug!(trackers = self.trackers.len(), batches = self.batches.len(), "destroy");
        self.active = false;
        self.events.emit(DashEvent::Unload, &[]);
        self.layout.destroy();
        self.trackers.clear();
        self.batches.clear();
    }

    /// Runs a discovered batch through classification, registration, and layout hand-off.
    fn process_batch(
        &mut self,
        dom: &mut D,
        items: Vec<D::Elem>,
    ) -> Result<Option<BatchId>, DashError> {
        if items.is_empty() {
            return Ok(None);
        }

        self.events.emit(DashEvent::BatchFound, &items);

        let id = self.next_batch;
        self.next_batch += 1;
        self.batches.insert(
            id,
            PendingBatch {
                items: items.clone(),
                phase: BatchPhase::Discovered,
            },
        );

        self.set_phase(id, BatchPhase::Classified);
        for item in &items {
            self.events.emit(DashEvent::ItemFound, slice::from_ref(item));
            dom.add_class(item, CLASS_INCLUDED);
            if let Some(unloader) = self.unloader.as_mut() {
                let slot = match unloader.add_elem(dom, item) {
                    Ok(slot) => slot,
                    Err(err) => {
                        // A batch that fails registration leaves no pending entry.
                        self.batches.remove(&id);
                        return Err(err.into());
                    }
                };
                self.trackers.insert(
                    slot.key().clone(),
                    TrackedItem {
                        tracker: InOutTracker::new(self.strategy),
                        slot,
                    },
                );
            }
            self.events.emit(DashEvent::ItemProcessed, slice::from_ref(item));
        }
        self.set_phase(id, BatchPhase::Registered);

        // The very first batch is covered by the engine's initial full layout.
        if self.first_batch_done {
            self.layout.add_items(&items);
        } else {
            self.first_batch_done = true;
        }
        self.set_phase(id, BatchPhase::LayoutPending);

        self.events.emit(DashEvent::BatchProcessed, &items);
        self.set_phase(id, BatchPhase::ImagesLoading);

        dtrace!(id, items = items.len(), "batch pending images");
        Ok(Some(id))
    }

    fn set_phase(&mut self, batch: BatchId, phase: BatchPhase) {
        if let Some(pending) = self.batches.get_mut(&batch) {
            pending.phase = phase;
        }
    }
}

impl<D: Dom, L: LayoutEngine<D::Elem>> core::fmt::Debug for Dash<D, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dash")
            .field("active", &self.active)
            .field("strategy", &self.strategy)
            .field("first_batch_done", &self.first_batch_done)
            .field("trackers", &self.trackers.len())
            .field("batches", &self.batches.len())
            .finish_non_exhaustive()
    }
}
