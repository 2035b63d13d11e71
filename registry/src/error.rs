//! Error types for registry loading.

use thiserror::Error;

/// Errors that prevent a registry document from being used at all.
///
/// Per-command problems are not errors; they are recorded as
/// [`SkippedCommand`](crate::SkippedCommand)s and the command is dropped.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registry file could not be read.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Registry document is not well-formed XML.
    #[error("XML error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    /// A collection the loader depends on is absent.
    #[error("registry has no <{0}> element")]
    MissingElement(&'static str),
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
