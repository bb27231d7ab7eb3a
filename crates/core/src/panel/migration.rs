//! Upgrading stored options to the current version.

use serde_json::Value;
use tracing::info;

use crate::error::{EcuError, Result};

use super::PanelOptions;

pub const CURRENT_VERSION: &str = "1.0.0";
const LEGACY_VERSION: &str = "0.9.0";

/// Deep-merge two JSON values: child fields win, arrays replace entirely.
pub fn deep_merge(parent: &Value, child: &Value) -> Value {
    match (parent, child) {
        (Value::Object(pm), Value::Object(cm)) => {
            let mut merged = pm.clone();
            for (key, child_val) in cm {
                let next = match pm.get(key) {
                    Some(parent_val) => deep_merge(parent_val, child_val),
                    None => child_val.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, child) => child.clone(),
    }
}

/// Bring stored options up to [`CURRENT_VERSION`].
///
/// - no `version`: merged over the defaults and stamped current
/// - `0.9.0`: stamped current, otherwise unchanged
/// - anything else: parsed as is
pub fn migrate(stored: Value) -> Result<PanelOptions> {
    if !stored.is_object() {
        return Err(EcuError::Migration(
            "stored options must be a JSON object".to_string(),
        ));
    }

    let version = stored
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string);

    let upgraded = match version.as_deref() {
        None => {
            let defaults = serde_json::to_value(PanelOptions::default())?;
            let mut merged = deep_merge(&defaults, &stored);
            merged["version"] = Value::String(CURRENT_VERSION.to_string());
            info!(to = CURRENT_VERSION, "migrated unversioned panel options");
            merged
        }
        Some(LEGACY_VERSION) => {
            let mut bumped = stored;
            bumped["version"] = Value::String(CURRENT_VERSION.to_string());
            info!(from = LEGACY_VERSION, to = CURRENT_VERSION, "migrated panel options");
            bumped
        }
        Some(_) => stored,
    };

    serde_json::from_value(upgraded).map_err(|e| EcuError::Migration(e.to_string()))
}
