//! Desired state for a single preset, as declared by the caller.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ReconcileError;

/// Output container formats accepted by the transcoding service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Flac,
    Flv,
    Fmp4,
    Gif,
    Mp3,
    Mp4,
    Mpg,
    Mxf,
    Oga,
    Ogg,
    Ts,
    Webm,
}

impl Container {
    pub const ALL: [Container; 12] = [
        Container::Flac,
        Container::Flv,
        Container::Fmp4,
        Container::Gif,
        Container::Mp3,
        Container::Mp4,
        Container::Mpg,
        Container::Mxf,
        Container::Oga,
        Container::Ogg,
        Container::Ts,
        Container::Webm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Flac => "flac",
            Container::Flv => "flv",
            Container::Fmp4 => "fmp4",
            Container::Gif => "gif",
            Container::Mp3 => "mp3",
            Container::Mp4 => "mp4",
            Container::Mpg => "mpg",
            Container::Mxf => "mxf",
            Container::Oga => "oga",
            Container::Ogg => "ogg",
            Container::Ts => "ts",
            Container::Webm => "webm",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Container {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Container::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ReconcileError::InvalidContainer {
                value: s.to_string(),
                expected: Container::ALL
                    .iter()
                    .map(Container::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
}

impl FromStr for DesiredState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(DesiredState::Present),
            "absent" => Ok(DesiredState::Absent),
            other => Err(format!(
                "invalid state '{other}', expected one of: present, absent"
            )),
        }
    }
}

/// What the caller wants the remote catalog to look like for one preset name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresetDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub container: Option<Container>,
    #[serde(default)]
    pub state: DesiredState,
    /// Delete and create again when the preset already exists. Only
    /// meaningful with `state = present`.
    #[serde(default)]
    pub recreate: bool,
    /// JSON file holding the Video/Audio/Thumbnails blocks.
    #[serde(default)]
    pub preset_document: Option<PathBuf>,
}

impl PresetDescriptor {
    /// Check the fields required for the declared state.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.name.is_empty() {
            error!("Descriptor has no preset name");
            return Err(ReconcileError::MissingField("name"));
        }
        if self.state == DesiredState::Present && self.container.is_none() {
            error!(preset_name = %self.name, "Descriptor has no container for state=present");
            return Err(ReconcileError::MissingField("container"));
        }
        debug!(preset_name = %self.name, state = ?self.state, "Descriptor validated");
        Ok(())
    }
}
