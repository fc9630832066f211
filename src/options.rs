use alloc::string::String;
use alloc::vec::Vec;

use crate::events::{DashEvent, EventCallback};
use crate::{TrackStrategy, UnloadMode};

/// Configuration handed to the external layout engine at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Whether the engine should lay out on its own initialization.
    pub init_layout: bool,
    /// Shrink the container to the span of the items instead of filling the available space
    /// (enables centering).
    pub fit_width: bool,
    /// Fixed column width in pixels; `None` lets the engine infer it.
    pub column_width: Option<u32>,
    /// Length of the item-placement animation; `0` disables animation.
    pub transition_duration_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            init_layout: false,
            fit_width: true,
            column_width: None,
            transition_duration_ms: 0,
        }
    }
}

/// Configuration for [`crate::Dash`].
///
/// Heavy fields (listeners) are `Arc`-stored callbacks, so options are cheap to clone.
pub struct DashOptions<E> {
    /// The element to coordinate as a dashboard container.
    pub container: E,
    /// Selector a child must match to count as an item. `None` includes every child.
    pub item_selector: Option<String>,
    /// Remove children that fail `item_selector` from the document entirely.
    pub purge_unmatching: bool,
    pub layout: LayoutConfig,
    /// Attribute carrying each item's stable identity. Missing values are synthesized.
    pub item_id_attr: String,
    /// Unload items scrolled out of view to save rendering cost.
    pub unload: bool,
    pub unload_mode: UnloadMode,
    /// How enter/exit transitions are paired into reload/unload actions.
    pub strategy: TrackStrategy,
    /// Explicit event → listener bindings, wired into the emitter at init.
    pub listeners: Vec<(DashEvent, EventCallback<E>)>,
}

impl<E> DashOptions<E> {
    pub fn new(container: E) -> Self {
        Self {
            container,
            item_selector: None,
            purge_unmatching: false,
            layout: LayoutConfig::default(),
            item_id_attr: String::from("id"),
            unload: true,
            unload_mode: UnloadMode::default(),
            strategy: TrackStrategy::default(),
            listeners: Vec::new(),
        }
    }

    pub fn with_item_selector(mut self, selector: Option<impl Into<String>>) -> Self {
        self.item_selector = selector.map(Into::into);
        self
    }

    pub fn with_purge_unmatching(mut self, purge: bool) -> Self {
        self.purge_unmatching = purge;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_item_id_attr(mut self, attr: impl Into<String>) -> Self {
        self.item_id_attr = attr.into();
        self
    }

    pub fn with_unload(mut self, unload: bool) -> Self {
        self.unload = unload;
        self
    }

    pub fn with_unload_mode(mut self, mode: UnloadMode) -> Self {
        self.unload_mode = mode;
        self
    }

    pub fn with_strategy(mut self, strategy: TrackStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Binds a listener to an event. May be called repeatedly, including for the same event.
    pub fn with_listener(
        mut self,
        event: DashEvent,
        callback: impl Fn(&[E]) + Send + Sync + 'static,
    ) -> Self {
        self.listeners.push((event, alloc::sync::Arc::new(callback)));
        self
    }
}

impl<E: Clone> Clone for DashOptions<E> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            item_selector: self.item_selector.clone(),
            purge_unmatching: self.purge_unmatching,
            layout: self.layout,
            item_id_attr: self.item_id_attr.clone(),
            unload: self.unload,
            unload_mode: self.unload_mode,
            strategy: self.strategy,
            listeners: self.listeners.clone(),
        }
    }
}

impl<E> core::fmt::Debug for DashOptions<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DashOptions")
            .field("item_selector", &self.item_selector)
            .field("purge_unmatching", &self.purge_unmatching)
            .field("layout", &self.layout)
            .field("item_id_attr", &self.item_id_attr)
            .field("unload", &self.unload)
            .field("unload_mode", &self.unload_mode)
            .field("strategy", &self.strategy)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
