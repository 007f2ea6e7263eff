//! JSON result reporting on stdout.

use serde_json::json;
use transcoder_preset_core::ReconcileOutcome;

/// Render a successful outcome.
pub fn render_outcome(outcome: &ReconcileOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

/// Render a fatal error as `{"failed": true, "msg": ...}`. The message
/// carries the full cause chain.
pub fn render_failure(err: &anyhow::Error) -> String {
    json!({
        "failed": true,
        "changed": false,
        "msg": format!("{err:#}"),
    })
    .to_string()
}
