use alloc::string::String;
use alloc::vec::Vec;

use crate::{FilterError, Size};

/// The document backend the engine manipulates.
///
/// This crate never owns a document: an adapter implements `Dom` over whatever element
/// representation the platform has (a real DOM via bindings, a retained-mode scene graph, an
/// in-memory tree in tests) and hands elements around as opaque `Elem` handles.
///
/// Every method maps to one capability the core relies on; anything else the platform can do
/// is invisible to the engine.
pub trait Dom {
    /// An opaque, cheaply cloneable element handle.
    type Elem: Clone + PartialEq;

    /// Whether the element is currently part of the document.
    fn contains(&self, elem: &Self::Elem) -> bool;

    /// The element's direct children, in document order.
    fn children(&self, parent: &Self::Elem) -> Vec<Self::Elem>;

    /// Detaches the element from its parent.
    fn remove(&mut self, elem: &Self::Elem);

    /// Whether the element matches a selector expression.
    ///
    /// A malformed selector is reported as a [`FilterError`]; the engine propagates it rather
    /// than swallowing it.
    fn matches(&self, elem: &Self::Elem, selector: &str) -> Result<bool, FilterError>;

    fn attribute(&self, elem: &Self::Elem, name: &str) -> Option<String>;

    fn set_attribute(&mut self, elem: &Self::Elem, name: &str, value: &str);

    fn add_class(&mut self, elem: &Self::Elem, class: &str);

    fn remove_class(&mut self, elem: &Self::Elem, class: &str);

    /// The element's current bounding box.
    fn content_size(&self, elem: &Self::Elem) -> Size;

    /// Pins (`Some`) or clears (`None`) fixed inline dimensions on the element.
    fn set_fixed_size(&mut self, elem: &Self::Elem, size: Option<Size>);

    /// Serializes the element's content (the markup-mode capture).
    fn inner_markup(&self, elem: &Self::Elem) -> String;

    /// Replaces the element's content by parsing serialized markup. An empty string empties
    /// the element.
    fn set_inner_markup(&mut self, elem: &Self::Elem, markup: &str);

    /// Detaches and returns the element's child nodes (the node-mode capture). The returned
    /// handles stay alive off-document until re-attached.
    fn take_children(&mut self, elem: &Self::Elem) -> Vec<Self::Elem>;

    /// Re-attaches previously detached nodes, preserving their identity and state.
    fn append_children(&mut self, elem: &Self::Elem, children: Vec<Self::Elem>);
}
