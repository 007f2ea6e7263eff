//! Present/absent reconciliation of a single preset.
//!
//! Each call observes the catalog once, then performs at most one mutating
//! call, or the strictly sequential delete + create pair when recreating.
//! There is no retry and no rollback: a create that fails after a
//! successful delete leaves the preset absent.
//!
//! # Check mode
//! With [`ReconcileOptions::check_mode`] set, the catalog is still read and
//! the descriptor still validated, but no create or delete is issued. The
//! outcome reports what would change. Ids and arns are only reported when
//! they belong to a preset that was actually observed and still exists.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::contract::{CreatePresetRequest, PresetClient, PresetSummary};
use crate::descriptor::{Container, DesiredState, PresetDescriptor};
use crate::document::{load_preset_document, EncodingSpec, PresetDocument};
use crate::error::ReconcileError;
use crate::locator::{find_preset_by_name, NameMatchPolicy};

pub const MSG_EXISTS: &str = "Preset already exists";
pub const MSG_CREATED: &str = "Preset created successfully";
pub const MSG_RECREATED: &str = "Preset recreated successfully";
pub const MSG_DELETED: &str = "Preset deleted successfully";
pub const MSG_NOT_FOUND: &str = "Preset not found";
pub const MSG_WOULD_CREATE: &str = "Preset would be created";
pub const MSG_WOULD_RECREATE: &str = "Preset would be recreated";
pub const MSG_WOULD_DELETE: &str = "Preset would be deleted";

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Report intended changes without issuing create or delete calls.
    pub check_mode: bool,
    pub name_policy: NameMatchPolicy,
}

/// Result reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    pub name: String,
    pub id: Option<String>,
    pub arn: Option<String>,
    pub msg: String,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ReconcileOutcome {
    fn new(name: &str, preset: Option<&PresetSummary>, msg: &str, changed: bool) -> Self {
        ReconcileOutcome {
            name: name.to_string(),
            id: preset.map(|p| p.id.clone()),
            arn: preset.map(|p| p.arn.clone()),
            msg: msg.to_string(),
            changed,
            warning: None,
        }
    }
}

/// Dispatch on the descriptor's desired state.
pub async fn reconcile<C>(
    client: &C,
    descriptor: &PresetDescriptor,
    options: ReconcileOptions,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: PresetClient + ?Sized,
{
    match descriptor.state {
        DesiredState::Present => ensure_present(client, descriptor, options).await,
        DesiredState::Absent => ensure_absent(client, descriptor, options).await,
    }
}

/// Make sure a preset with the descriptor's name exists, creating it (or
/// deleting and creating it again when `recreate` is set).
pub async fn ensure_present<C>(
    client: &C,
    descriptor: &PresetDescriptor,
    options: ReconcileOptions,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: PresetClient + ?Sized,
{
    let name = require_name(descriptor)?;
    let container = descriptor.container.ok_or_else(|| {
        error!(preset_name = %name, "[PRESENT][ERROR] No container given");
        ReconcileError::MissingField("container")
    })?;

    let existing = find_preset_by_name(client, name, options.name_policy).await?;

    if let Some(preset) = &existing {
        if !descriptor.recreate {
            info!(preset_name = %name, preset_id = %preset.id, "[PRESENT] Preset exists, nothing to do");
            return Ok(ReconcileOutcome::new(name, Some(preset), MSG_EXISTS, false));
        }
    }

    // Must stay ahead of the recreate delete: a bad document leaves the preset untouched.
    let encoding = encoding_from_descriptor(descriptor, container)?;

    if options.check_mode {
        let msg = if existing.is_some() {
            MSG_WOULD_RECREATE
        } else {
            MSG_WOULD_CREATE
        };
        info!(preset_name = %name, msg, "[PRESENT][CHECK] Skipping mutating calls");
        return Ok(ReconcileOutcome::new(name, None, msg, true));
    }

    if let Some(preset) = &existing {
        delete_by_id(client, name, &preset.id).await?;
    }

    let req = CreatePresetRequest {
        name: name.to_string(),
        description: descriptor.description.clone(),
        container: container.to_string(),
        video: encoding.video,
        audio: encoding.audio,
        thumbnails: encoding.thumbnails,
    };
    info!(preset_name = %name, %container, "[PRESENT] Creating preset");
    let created = client.create_preset(req).await.map_err(|e| {
        error!(error = ?e, preset_name = %name, "[PRESENT][ERROR] create_preset failed");
        ReconcileError::Create {
            name: name.to_string(),
            cause: e,
        }
    })?;

    if let Some(warning) = &created.warning {
        warn!(preset_name = %name, %warning, "[PRESENT] Service accepted preset with a warning");
    }
    info!(
        preset_name = %created.preset.name,
        preset_id = %created.preset.id,
        "[PRESENT] Preset created"
    );

    let msg = if existing.is_some() {
        MSG_RECREATED
    } else {
        MSG_CREATED
    };
    let mut outcome = ReconcileOutcome::new(&created.preset.name, Some(&created.preset), msg, true);
    outcome.warning = created.warning;
    Ok(outcome)
}

/// Make sure no preset with the descriptor's name exists. Deleting a preset
/// that is not there is a no-op, not an error.
pub async fn ensure_absent<C>(
    client: &C,
    descriptor: &PresetDescriptor,
    options: ReconcileOptions,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: PresetClient + ?Sized,
{
    let name = require_name(descriptor)?;

    let Some(preset) = find_preset_by_name(client, name, options.name_policy).await? else {
        info!(preset_name = %name, "[ABSENT] Preset not found, nothing to do");
        return Ok(ReconcileOutcome::new(name, None, MSG_NOT_FOUND, false));
    };

    if options.check_mode {
        info!(preset_name = %name, preset_id = %preset.id, "[ABSENT][CHECK] Skipping delete");
        return Ok(ReconcileOutcome::new(name, Some(&preset), MSG_WOULD_DELETE, true));
    }

    delete_by_id(client, name, &preset.id).await?;
    Ok(ReconcileOutcome::new(name, Some(&preset), MSG_DELETED, true))
}

fn require_name(descriptor: &PresetDescriptor) -> Result<&str, ReconcileError> {
    if descriptor.name.is_empty() {
        error!("[RECONCILE][ERROR] No preset name given");
        return Err(ReconcileError::MissingField("name"));
    }
    Ok(&descriptor.name)
}

fn encoding_from_descriptor(
    descriptor: &PresetDescriptor,
    container: Container,
) -> Result<EncodingSpec, ReconcileError> {
    let document = match &descriptor.preset_document {
        Some(path) => load_preset_document(path)?,
        None => PresetDocument::default(),
    };

    if let Some(doc_container) = document.container.as_deref() {
        if doc_container != container.as_str() {
            warn!(
                preset_name = %descriptor.name,
                document_container = doc_container,
                %container,
                "Preset document names a different container, using the declared one"
            );
        }
    }

    let encoding = document.encoding();
    if encoding.is_empty() {
        error!(preset_name = %descriptor.name, "[PRESENT][ERROR] No Video, Audio or Thumbnails settings");
        return Err(ReconcileError::EmptyEncodingSpec);
    }
    Ok(encoding.populated())
}

async fn delete_by_id<C>(client: &C, name: &str, id: &str) -> Result<(), ReconcileError>
where
    C: PresetClient + ?Sized,
{
    info!(preset_name = %name, preset_id = %id, "Deleting preset");
    client.delete_preset(id.to_string()).await.map_err(|e| {
        error!(error = ?e, preset_name = %name, preset_id = %id, "[ERROR] delete_preset failed");
        ReconcileError::Delete {
            name: name.to_string(),
            id: id.to_string(),
            cause: e,
        }
    })
}
