use alloc::string::String;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KeyMap<V> = HashMap<ItemKey, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<V> = BTreeMap<ItemKey, V>;

/// The stable identity of a dashboard item.
///
/// Identities live in the element's id attribute: externally supplied values are taken as-is,
/// synthesized values are rendered into the same attribute. Both end up in one string-keyed
/// space, so re-reading the attribute on repeated registration yields the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemKey(String);

impl ItemKey {
    /// Builds a key from an attribute value found on the element.
    pub fn from_attr(value: &str) -> Self {
        Self(String::from(value))
    }

    /// Builds a key from a synthesized counter value.
    pub(crate) fn synthesized(n: u64) -> Self {
        Self(alloc::format!("{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
