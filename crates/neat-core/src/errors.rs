use neat_domain::ManifestError;
use serde_json::{json, Value};

use crate::context::CommandInfo;
use crate::outcome::{CommandStatus, ExecutionOutcome};

/// Map a manifest read failure onto a user-error outcome with a hint, when
/// the error chain carries a [`ManifestError`].
pub fn manifest_error_outcome(err: &anyhow::Error) -> Option<ExecutionOutcome> {
    let manifest_err = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ManifestError>())?;
    let hint = match manifest_err {
        ManifestError::Parse { .. } => "Fix package.json syntax and rerun `neat init`.",
        ManifestError::NotAnObject { .. } => {
            "Replace the top-level value of package.json with a JSON object."
        }
    };
    Some(ExecutionOutcome::user_error(
        manifest_err.to_string(),
        json!({
            "reason": "invalid_manifest",
            "hint": hint,
        }),
    ))
}

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome, _code: i32) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let prefix = format!("neat {}", info.name);
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
