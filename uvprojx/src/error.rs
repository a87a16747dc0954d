//! Error types for descriptor lookup and parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DescriptorError>;

/// Failures while locating or reading a project descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor file does not exist.
    #[error("descriptor '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    /// Reading the descriptor failed.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is not well-formed XML.
    #[error("XML parse failed: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The descriptor has no `Cads` build-settings node.
    #[error("no C compiler settings (Cads) found in descriptor")]
    MissingBuildSettings,

    /// Walking the search directory failed.
    #[error("failed to search '{}': {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl DescriptorError {
    /// Returns `true` for the "no usable data" case, where the XML was read
    /// but carries no build-settings node.
    pub fn is_missing_build_settings(&self) -> bool {
        matches!(self, DescriptorError::MissingBuildSettings)
    }
}
