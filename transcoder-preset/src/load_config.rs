/// `load_config` module: loads a YAML task file describing one preset and how to reach the service.
///
/// This module is the only place where user-supplied YAML is parsed into the
/// strongly-typed [`PresetDescriptor`] the core reconcilers consume.
///
/// # Responsibilities
/// - Parse the task file into type-safe Rust structs
/// - Validate the descriptor so bad input fails before any credentials are needed
/// - Keep secrets out of the file: credentials always come from the environment
/// - Resolve a relative `preset_document` against the task file's directory
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
///
/// ```yaml
/// preset:
///   name: sd_300
///   description: "Preset test"
///   container: mp4
///   state: present
///   recreate: false
///   preset_document: presets/sd_300.json
/// connection:
///   region: us-east-1
/// strict_names: false
/// ```
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use transcoder_preset_core::locator::NameMatchPolicy;
use transcoder_preset_core::PresetDescriptor;

#[derive(Debug, Deserialize)]
pub struct TaskConfig {
    pub preset: PresetDescriptor,
    #[serde(default)]
    pub connection: ConnectionSection,
    /// Fail instead of picking the first preset when a name is used more than once.
    #[serde(default)]
    pub strict_names: bool,
}

impl TaskConfig {
    pub fn name_policy(&self) -> NameMatchPolicy {
        if self.strict_names {
            NameMatchPolicy::RejectDuplicates
        } else {
            NameMatchPolicy::FirstMatch
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectionSection {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Loads a YAML task file (no secrets) and validates the preset descriptor in it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TaskConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading task file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Task file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let mut task: TaskConfig = match serde_yaml::from_str(&config_content) {
        Ok(task) => {
            info!(config_path = ?path_ref, "Parsed task YAML successfully");
            task
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse task YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if let Some(document) = task.preset.preset_document.take() {
        task.preset.preset_document = Some(resolve_document_path(path_ref, document));
    }

    if let Err(e) = task.preset.validate() {
        error!(error = %e, config_path = ?path_ref, "Task file describes an invalid preset");
        return Err(anyhow::Error::new(e).context(format!("Invalid preset in {}", path_ref.display())));
    }

    info!(
        preset_name = %task.preset.name,
        state = ?task.preset.state,
        strict_names = task.strict_names,
        "Task loaded"
    );
    Ok(task)
}

/// Relative document paths are relative to the directory holding the task file.
fn resolve_document_path(task_path: &Path, document: PathBuf) -> PathBuf {
    if document.is_absolute() {
        return document;
    }
    match task_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            let resolved = dir.join(&document);
            debug!(document = ?document, resolved = ?resolved, "Resolved preset_document against task file directory");
            resolved
        }
        _ => document,
    }
}
