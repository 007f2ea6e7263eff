//! Find a preset by its human-assigned name.
//!
//! Names are not unique in the remote catalog. The default policy treats
//! the first match in ascending listing order as *the* preset with that
//! name; [`NameMatchPolicy::RejectDuplicates`] reads the whole catalog and
//! refuses to pick when more than one preset carries the name.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::contract::{PresetClient, PresetSummary};
use crate::error::ReconcileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatchPolicy {
    /// Stop at the first exact match.
    #[default]
    FirstMatch,
    /// Scan every page and fail on more than one match.
    RejectDuplicates,
}

/// Walk the catalog page by page looking for an exact, case-sensitive name
/// match. `Ok(None)` means no preset has that name.
pub async fn find_preset_by_name<C>(
    client: &C,
    name: &str,
    policy: NameMatchPolicy,
) -> Result<Option<PresetSummary>, ReconcileError>
where
    C: PresetClient + ?Sized,
{
    info!(preset_name = %name, ?policy, "[LOCATE] Looking up preset by name");

    let mut matches: Vec<PresetSummary> = Vec::new();
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut page_token: Option<String> = None;
    let mut page_no = 0usize;

    loop {
        page_no += 1;
        let page = client.list_presets(page_token.clone()).await.map_err(|e| {
            error!(error = ?e, preset_name = %name, page = page_no, "[LOCATE][ERROR] Listing presets failed");
            ReconcileError::List(e)
        })?;
        debug!(
            page = page_no,
            count = page.presets.len(),
            has_next = page.next_page_token.is_some(),
            "[LOCATE] Fetched page"
        );

        for preset in page.presets {
            if preset.name != name {
                continue;
            }
            match policy {
                NameMatchPolicy::FirstMatch => {
                    info!(preset_name = %name, preset_id = %preset.id, page = page_no, "[LOCATE] Found preset");
                    return Ok(Some(preset));
                }
                NameMatchPolicy::RejectDuplicates => matches.push(preset),
            }
        }

        match page.next_page_token {
            Some(token) if !seen_tokens.contains(&token) => {
                seen_tokens.insert(token.clone());
                page_token = Some(token);
            }
            Some(token) => {
                warn!(page_token = %token, "[LOCATE] Service repeated a page token, stopping pagination");
                break;
            }
            None => break,
        }
    }

    match matches.len() {
        0 => {
            info!(preset_name = %name, pages = page_no, "[LOCATE] No preset with that name");
            Ok(None)
        }
        1 => {
            let found = matches.remove(0);
            info!(preset_name = %name, preset_id = %found.id, "[LOCATE] Found unique preset");
            Ok(Some(found))
        }
        _ => {
            let ids: Vec<String> = matches.into_iter().map(|p| p.id).collect();
            error!(preset_name = %name, ?ids, "[LOCATE][ERROR] Preset name is ambiguous");
            Err(ReconcileError::AmbiguousName {
                name: name.to_string(),
                ids,
            })
        }
    }
}
