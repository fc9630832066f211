use alloc::string::String;

use thiserror::Error;

use crate::ItemKey;

/// A fatal setup-time error.
///
/// Configuration problems are detected synchronously when the observer or dashboard is
/// constructed; nothing is partially wired when one of these is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The container element is not part of the document backend.
    #[error("container element is not part of the document")]
    InvalidContainer,
    /// The configured item selector failed during the initial scan.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// A malformed filter/selector expression.
///
/// These are not swallowed: they propagate out of the observation path and abort the current
/// batch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("filter selector `{selector}` is malformed: {reason}")]
pub struct FilterError {
    pub selector: String,
    pub reason: String,
}

impl FilterError {
    pub fn new(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

/// An error raised by the content archive.
///
/// Note that an archive miss on reload is deliberately *not* an error: reloading something
/// that was never unloaded is a silent no-op.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArchiveError {
    /// Two distinct elements carry the same externally supplied identity. Silently sharing an
    /// archive slot would make unload/reload restore the wrong content, so registration fails
    /// fast instead.
    #[error("identity `{0}` is already registered to a different element")]
    IdentityCollision(ItemKey),
}

/// Any error the dashboard controller can surface.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DashError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
