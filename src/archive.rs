use alloc::string::String;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{ArchiveError, Dom, ItemKey, Size};

/// Marker class present on an element while its content is archived.
pub const UNLOADED_CLASS: &str = "ulded";

/// How an item's content is captured when it is unloaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnloadMode {
    /// Capture serialized markup and re-parse it on reload. Cheaper to hold, but attached
    /// behavior and state of descendant nodes (listeners, embedded players) is lost.
    Markup,
    /// Detach the live child nodes and re-attach the same nodes on reload, preserving their
    /// state.
    #[default]
    Node,
}

#[derive(Clone, Debug)]
enum Captured<E> {
    Markup(String),
    Nodes(Vec<E>),
}

/// The archived content of one item, held while the item is unloaded.
#[derive(Clone, Debug)]
pub struct ArchiveEntry<E> {
    content: Captured<E>,
    size: Size,
}

impl<E> ArchiveEntry<E> {
    /// The item's bounding box at the moment it was unloaded.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// The per-item controller handle returned by [`Unloader::add_elem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSlot<E> {
    key: ItemKey,
    elem: E,
}

impl<E> ItemSlot<E> {
    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn elem(&self) -> &E {
        &self.elem
    }
}

/// The content archive: removes off-screen items' content from the document and restores it,
/// keyed by a stable per-item identity.
///
/// Identities are read from a configured attribute; elements without one get a synthesized
/// monotonically increasing key, persisted back onto the element so repeated registration is
/// idempotent. The counter is owned by the unloader instance — identities are scoped to one
/// dashboard, not process-wide.
///
/// Entries are never pruned while the unloader is alive; an identity is forgotten only when
/// the whole unloader is dropped.
pub struct Unloader<D: Dom> {
    id_attr: String,
    mode: UnloadMode,
    next_key: u64,
    archive: KeyMap<ArchiveEntry<D::Elem>>,
    registered: KeyMap<D::Elem>,
}

impl<D: Dom> Unloader<D> {
    pub fn new(id_attr: impl Into<String>, mode: UnloadMode) -> Self {
        Self {
            id_attr: id_attr.into(),
            mode,
            next_key: 0,
            archive: KeyMap::new(),
            registered: KeyMap::new(),
        }
    }

    pub fn id_attr(&self) -> &str {
        &self.id_attr
    }

    pub fn mode(&self) -> UnloadMode {
        self.mode
    }

    /// The number of currently archived entries.
    pub fn archived_len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the item with this identity is currently unloaded.
    pub fn is_unloaded(&self, key: &ItemKey) -> bool {
        self.archive.contains_key(key)
    }

    /// The archived entry for an identity, while the item is unloaded.
    pub fn entry(&self, key: &ItemKey) -> Option<&ArchiveEntry<D::Elem>> {
        self.archive.get(key)
    }

    /// Registers the element and returns its per-item slot.
    ///
    /// An existing identity attribute is reused; otherwise the next counter value is
    /// synthesized and written back onto the element. Registering the same element twice
    /// returns a slot bound to the same identity.
    ///
    /// An externally supplied identity already registered to a *different* element fails fast
    /// rather than silently sharing an archive slot.
    pub fn add_elem(
        &mut self,
        dom: &mut D,
        elem: &D::Elem,
    ) -> Result<ItemSlot<D::Elem>, ArchiveError> {
        let key = match dom.attribute(elem, &self.id_attr) {
            Some(attr) if !attr.is_empty() => {
                let key = ItemKey::from_attr(&attr);
                if let Some(existing) = self.registered.get(&key) {
                    if existing != elem {
                        return Err(ArchiveError::IdentityCollision(key));
                    }
                }
                key
            }
            _ => {
                self.next_key += 1;
                let key = ItemKey::synthesized(self.next_key);
                dom.set_attribute(elem, &self.id_attr, key.as_str());
                key
            }
        };

        self.registered.insert(key.clone(), elem.clone());
        Ok(ItemSlot {
            key,
            elem: elem.clone(),
        })
    }

    /// Archives the item's content.
    ///
    /// Pins the current bounding box as fixed inline dimensions (so the layout around the
    /// item does not collapse), captures the content per the configured mode, empties the
    /// element, and adds the [`UNLOADED_CLASS`] marker. A no-op if the identity is already
    /// archived: an entry is captured at most once before being reloaded, so an accidental
    /// second unload cannot capture the already-emptied element.
    pub fn unload(&mut self, dom: &mut D, slot: &ItemSlot<D::Elem>) {
        if self.archive.contains_key(&slot.key) {
            dtrace!(key = slot.key.as_str(), "unload: already archived");
            return;
        }

        let size = dom.content_size(&slot.elem);
        dom.set_fixed_size(&slot.elem, Some(size));

        let content = match self.mode {
            UnloadMode::Markup => {
                let markup = dom.inner_markup(&slot.elem);
                dom.set_inner_markup(&slot.elem, "");
                Captured::Markup(markup)
            }
            UnloadMode::Node => Captured::Nodes(dom.take_children(&slot.elem)),
        };

        ddebug!(key = slot.key.as_str(), ?size, "unload");
        self.archive.insert(slot.key.clone(), ArchiveEntry { content, size });
        dom.add_class(&slot.elem, UNLOADED_CLASS);
    }

    /// Restores the item's archived content.
    ///
    /// An archive miss is a silent no-op: reloading twice, or reloading something that was
    /// never unloaded, is safe. On a hit the content is restored per mode, the fixed inline
    /// dimensions are cleared, the entry is deleted, and the marker class removed.
    pub fn reload(&mut self, dom: &mut D, slot: &ItemSlot<D::Elem>) {
        let Some(entry) = self.archive.remove(&slot.key) else {
            dtrace!(key = slot.key.as_str(), "reload: archive miss");
            return;
        };

        ddebug!(key = slot.key.as_str(), "reload");
        match entry.content {
            Captured::Markup(markup) => dom.set_inner_markup(&slot.elem, &markup),
            Captured::Nodes(children) => dom.append_children(&slot.elem, children),
        }
        dom.set_fixed_size(&slot.elem, None);
        dom.remove_class(&slot.elem, UNLOADED_CLASS);
    }
}

impl<D: Dom> core::fmt::Debug for Unloader<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Unloader")
            .field("id_attr", &self.id_attr)
            .field("mode", &self.mode)
            .field("next_key", &self.next_key)
            .field("archived", &self.archive.len())
            .field("registered", &self.registered.len())
            .finish_non_exhaustive()
    }
}
