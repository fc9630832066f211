use alloc::string::String;
use alloc::vec::Vec;

use crate::{ConfigError, Dom, FilterError};

/// What a mutation record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationKind {
    /// Children were added to or removed from the target.
    ChildList,
    /// An attribute changed on the target.
    Attributes,
    /// Text content changed on the target.
    CharacterData,
}

/// One raw change notification, as reported by the platform's mutation mechanism.
#[derive(Clone, Debug)]
pub struct MutationRecord<E> {
    pub kind: MutationKind,
    /// The element the mutation happened on.
    pub target: E,
    pub added: Vec<E>,
    pub removed: Vec<E>,
}

impl<E> MutationRecord<E> {
    /// A child-list record with added nodes only, the common case for item discovery.
    pub fn child_list(target: E, added: Vec<E>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added,
            removed: Vec::new(),
        }
    }
}

/// Which mutations the batcher pays attention to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchConfig {
    pub child_list: bool,
    /// When false (the default), only records targeting the container itself are considered.
    pub subtree: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            child_list: true,
            subtree: false,
        }
    }
}

/// Configuration for [`MutationBatcher`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObserveOptions {
    /// Selector additions must match to be included in a batch. `None` matches everything.
    pub selector: Option<String>,
    /// Remove non-matching additions from the document instead of merely skipping them.
    pub purge: bool,
    pub watch: WatchConfig,
}

impl ObserveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selector(mut self, selector: Option<impl Into<String>>) -> Self {
        self.selector = selector.map(Into::into);
        self
    }

    pub fn with_purge(mut self, purge: bool) -> Self {
        self.purge = purge;
        self
    }

    pub fn with_watch(mut self, watch: WatchConfig) -> Self {
        self.watch = watch;
        self
    }
}

/// Turns raw mutation records into filtered, ordered item batches.
///
/// Construction performs a one-time synchronous scan of the container's current children and
/// returns them as the initial batch; afterwards the adapter feeds live records through
/// [`MutationBatcher::process`]. The batcher itself registers nothing with the platform —
/// subscribing to the native notification mechanism is the adapter's job.
pub struct MutationBatcher<D: Dom> {
    container: D::Elem,
    selector: Option<String>,
    purge: bool,
    watch: WatchConfig,
}

impl<D: Dom> core::fmt::Debug for MutationBatcher<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MutationBatcher")
            .field("selector", &self.selector)
            .field("purge", &self.purge)
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

impl<D: Dom> MutationBatcher<D> {
    /// Validates the container, scans its current children, and returns the batcher together
    /// with the initial batch.
    ///
    /// The initial batch is produced exactly once, before any live record can be processed.
    /// With `purge` enabled, children failing the selector are removed from the document as
    /// they are scanned; otherwise they are only excluded from the batch.
    pub fn new(
        dom: &mut D,
        container: D::Elem,
        options: ObserveOptions,
    ) -> Result<(Self, Vec<D::Elem>), ConfigError> {
        if !dom.contains(&container) {
            return Err(ConfigError::InvalidContainer);
        }

        let batcher = Self {
            container,
            selector: options.selector,
            purge: options.purge,
            watch: options.watch,
        };

        let mut initial = Vec::new();
        for child in dom.children(&batcher.container) {
            if batcher.accept(dom, &child)? {
                initial.push(child);
            } else if batcher.purge {
                dom.remove(&child);
            }
        }
        ddebug!(initial = initial.len(), purge = batcher.purge, "initial scan");

        Ok((batcher, initial))
    }

    pub fn container(&self) -> &D::Elem {
        &self.container
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Filters one notification cycle's records into a batch, preserving discovery order.
    ///
    /// Only child-list additions are considered; removals and attribute changes are ignored,
    /// as are records outside the watch configuration. Non-matching additions are removed
    /// (purge) or dropped. A returned empty batch means the cycle produced nothing — callers
    /// must not hand it to their batch handler.
    pub fn process(
        &self,
        dom: &mut D,
        records: &[MutationRecord<D::Elem>],
    ) -> Result<Vec<D::Elem>, FilterError> {
        let mut batch = Vec::new();

        for record in records {
            if record.kind != MutationKind::ChildList || !self.watch.child_list {
                continue;
            }
            if !self.watch.subtree && record.target != self.container {
                continue;
            }
            for added in &record.added {
                if self.accept(dom, added)? {
                    batch.push(added.clone());
                } else if self.purge {
                    dom.remove(added);
                }
            }
        }

        dtrace!(records = records.len(), extracted = batch.len(), "process");
        Ok(batch)
    }

    fn accept(&self, dom: &D, elem: &D::Elem) -> Result<bool, FilterError> {
        match &self.selector {
            None => Ok(true),
            Some(selector) => dom.matches(elem, selector),
        }
    }
}
