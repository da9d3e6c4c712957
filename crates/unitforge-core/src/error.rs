//! Unified error handling for unitforge
//!
//! A single error type covers the whole export pipeline. Recoverable
//! conditions (malformed faces, zero-face meshes, degenerate numerics)
//! never surface here; they are absorbed where they occur. Anything that
//! reaches this type aborts the export.

use thiserror::Error;

/// Unified error type for all unitforge operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Filesystem failure while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Scene Document Errors ====================

    /// The scene document could not be deserialized
    #[error("Malformed scene document: {0}")]
    Document(#[from] serde_json::Error),

    /// The scene document violates a structural requirement
    #[error("Invalid scene: {message}")]
    InvalidScene { message: String },

    /// An object names a parent that does not exist in the document
    #[error("Object '{child}' references missing parent '{parent}'")]
    MissingParent { child: String, parent: String },

    // ==================== Scene Graph Errors ====================

    /// Two nodes resolved to the same fully-qualified path
    #[error("Duplicate node path: '{path}'")]
    DuplicateNodePath { path: String },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid-scene error
    pub fn invalid_scene(message: impl Into<String>) -> Self {
        Error::InvalidScene {
            message: message.into(),
        }
    }

    /// Check if this is a structural error in the input scene rather
    /// than an environment failure
    pub fn is_scene_error(&self) -> bool {
        matches!(
            self,
            Error::Document(_)
                | Error::InvalidScene { .. }
                | Error::MissingParent { .. }
                | Error::DuplicateNodePath { .. }
        )
    }
}
