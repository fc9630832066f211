//! A headless coordination engine for scrollable item dashboards.
//!
//! This crate covers the parts of a masonry-style dashboard that are not the layout math:
//! batched mutation observation of a container element, per-item scroll-visibility tracking
//! with pluggable trigger strategies, and a content archive that unloads off-screen items
//! (and restores them) to save rendering cost.
//!
//! It is UI-agnostic. An adapter layer is expected to provide:
//! - a document backend (the [`Dom`] trait) the engine manipulates through opaque handles
//! - mutation records from whatever change-notification mechanism the platform has
//! - per-element viewport enter/exit transitions
//! - image-load and layout-complete completions for each batch
//!
//! The actual positioning of items is delegated to an external [`LayoutEngine`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod archive;
mod dash;
mod dom;
mod error;
mod events;
mod key;
mod observer;
mod options;
mod types;
mod visibility;


pub use archive::{ArchiveEntry, ItemSlot, UNLOADED_CLASS, UnloadMode, Unloader};
pub use dash::{BatchId, BatchPhase, CLASS_INCLUDED, CLASS_PROCESSED, Dash, LayoutEngine};
pub use dom::Dom;
pub use error::{ArchiveError, ConfigError, DashError, FilterError};
pub use events::{DashEvent, Emitter, EventCallback};
pub use key::ItemKey;
pub use observer::{MutationBatcher, MutationKind, MutationRecord, ObserveOptions, WatchConfig};
pub use options::{DashOptions, LayoutConfig};
pub use types::Size;
pub use visibility::{InOutTracker, TrackStrategy, Transition};
