//! Error taxonomy for preset reconciliation.
//!
//! Every variant is terminal for the invocation that produced it. A preset
//! that cannot be found by name is not an error and never shows up here.
//! Messages embed the underlying cause text.

use std::path::PathBuf;

use crate::contract::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Missing required argument: {0}")]
    MissingField(&'static str),

    #[error("Invalid container '{value}', expected one of: {expected}")]
    InvalidContainer { value: String, expected: String },

    #[error("No specs provided for Video, Audio, or Thumbnails")]
    EmptyEncodingSpec,

    #[error("Wrong path for preset_document: {}", .path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("Can't open preset_document {}: {cause}", .path.display())]
    DocumentRead { path: PathBuf, cause: std::io::Error },

    #[error("Malformed preset_document {}: {reason}", .path.display())]
    DocumentParse { path: PathBuf, reason: String },

    #[error("Failed to list presets: {0}")]
    List(ClientError),

    #[error("Invalid preset settings for {name}: {cause}")]
    Create { name: String, cause: ClientError },

    #[error("Failed to delete preset {name}/{id}: {cause}")]
    Delete {
        name: String,
        id: String,
        cause: ClientError,
    },

    #[error("Preset name '{name}' is ambiguous, matched ids: {}", .ids.join(", "))]
    AmbiguousName { name: String, ids: Vec<String> },
}
