//! Loading of preset documents: JSON files carrying the encoding blocks
//! that are forwarded, unmodified, to the create call.
//!
//! ```json
//! {
//!   "Container": "mp4",
//!   "Name": "sd_300",
//!   "Type": "Custom",
//!   "Video": { "Codec": "H.264" },
//!   "Audio": { "Codec": "AAC" },
//!   "Thumbnails": { "Format": "png" }
//! }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::error::ReconcileError;

/// Parsed preset document. Only the encoding blocks are acted upon; the
/// remaining keys are informational.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetDocument {
    #[serde(rename = "Container", default)]
    pub container: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Video", default)]
    pub video: Option<Value>,
    #[serde(rename = "Audio", default)]
    pub audio: Option<Value>,
    #[serde(rename = "Thumbnails", default)]
    pub thumbnails: Option<Value>,
}

impl PresetDocument {
    pub fn encoding(&self) -> EncodingSpec {
        EncodingSpec {
            video: self.video.clone(),
            audio: self.audio.clone(),
            thumbnails: self.thumbnails.clone(),
        }
    }
}

/// The three opaque encoding blocks of a preset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodingSpec {
    pub video: Option<Value>,
    pub audio: Option<Value>,
    pub thumbnails: Option<Value>,
}

impl EncodingSpec {
    /// True when none of the blocks carries any settings.
    pub fn is_empty(&self) -> bool {
        [&self.video, &self.audio, &self.thumbnails]
            .into_iter()
            .all(|block| block_is_empty(block.as_ref()))
    }

    /// Drop blocks that carry no settings so they are not sent at all.
    pub fn populated(self) -> EncodingSpec {
        let keep = |block: Option<Value>| block.filter(|v| !block_is_empty(Some(v)));
        EncodingSpec {
            video: keep(self.video),
            audio: keep(self.audio),
            thumbnails: keep(self.thumbnails),
        }
    }
}

fn block_is_empty(block: Option<&Value>) -> bool {
    match block {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Read and parse a preset document from disk.
pub fn load_preset_document<P: AsRef<Path>>(path: P) -> Result<PresetDocument, ReconcileError> {
    let path = path.as_ref();
    info!(document_path = ?path, "Loading preset document");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, document_path = ?path, "Failed to read preset document");
        if e.kind() == ErrorKind::NotFound {
            ReconcileError::DocumentNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReconcileError::DocumentRead {
                path: path.to_path_buf(),
                cause: e,
            }
        }
    })?;

    let raw: Value = serde_json::from_str(&content).map_err(|e| {
        error!(error = ?e, document_path = ?path, "Failed to parse preset document JSON");
        ReconcileError::DocumentParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    if !raw.is_object() {
        error!(document_path = ?path, "Preset document is not a JSON object");
        return Err(ReconcileError::DocumentParse {
            path: path.to_path_buf(),
            reason: "top level must be an object".to_string(),
        });
    }

    let document: PresetDocument = serde_json::from_value(raw).map_err(|e| {
        error!(error = ?e, document_path = ?path, "Preset document has unexpected field types");
        ReconcileError::DocumentParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    info!(
        document_path = ?path,
        has_video = document.video.is_some(),
        has_audio = document.audio.is_some(),
        has_thumbnails = document.thumbnails.is_some(),
        "Preset document loaded"
    );
    Ok(document)
}
