//! Settings documents and reconciliation.
//!
//! A project's effective settings map tool name -> parameter map, all string
//! values. An incoming update names the full set of tools the project should
//! run (the tool list is replaced wholly) but each named tool's parameters
//! are merged over defaults, not replaced. Reconciliation is a pure function
//! from (effective, incoming) to a new document; nothing is mutated in place.

use crate::error::{FenceError, Result};
use crate::tools::ToolKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Parameter name -> string value for one tool.
pub type ToolSettings = IndexMap<String, String>;

/// The persisted effective-settings document for a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDoc(pub IndexMap<String, ToolSettings>);

impl SettingsDoc {
    /// Parses a stored settings document.
    ///
    /// # Errors
    /// Returns the underlying JSON error.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    #[must_use]
    pub fn get(&self, tool: &str) -> Option<&ToolSettings> {
        self.0.get(tool)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ToolSettings> {
        self.0.iter()
    }
}

/// An incoming partial settings document, parsed leniently.
///
/// Keys are the caller's tool names as written. A value of `None` marks a
/// per-tool entry that was not a flat object of scalars; such an entry fails
/// verification downstream but still counts toward the kept tool list.
pub type IncomingSettings = IndexMap<String, Option<ToolSettings>>;

/// Parses an incoming settings update.
///
/// The top level must be a JSON object; anything else is an invalid settings
/// document. Scalar parameter values (numbers, booleans) are coerced to
/// strings, matching the all-string settings contract.
///
/// # Errors
/// `FenceError::InvalidSettings` when the text is not a JSON object.
pub fn parse_incoming(text: &str) -> Result<IncomingSettings> {
    // Deserializing into the map directly keeps the caller's tool order,
    // which later drives execution order during a fence run.
    let tools: IndexMap<String, Value> =
        serde_json::from_str(text).map_err(|_| FenceError::InvalidSettings)?;

    let mut incoming = IncomingSettings::new();
    for (tool, params) in tools {
        incoming.insert(tool, coerce_params(&params));
    }
    Ok(incoming)
}

fn coerce_params(value: &Value) -> Option<ToolSettings> {
    let Value::Object(params) = value else {
        return None;
    };
    let mut settings = ToolSettings::new();
    for (key, v) in params {
        let coerced = match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        settings.insert(key.clone(), coerced);
    }
    Some(settings)
}

/// Merges an incoming update into the effective settings.
///
/// For each tool named in the update: unknown names are skipped silently; a
/// tool whose override fails verification is skipped for this cycle, leaving
/// its existing effective entry untouched; otherwise a missing entry is seeded
/// from the tool's defaults and the override's recognized parameters are
/// overlaid key by key. Finally, every effective entry whose tool is absent
/// from the update is dropped. An empty update therefore empties the document.
#[must_use]
pub fn reconcile(effective: &SettingsDoc, incoming: &IncomingSettings) -> SettingsDoc {
    let mut next = effective.clone();
    let mut keep: HashSet<&'static str> = HashSet::new();

    for (name, override_params) in incoming {
        let Some(kind) = ToolKind::lookup(name) else {
            tracing::debug!(tool = %name, "unrecognized tool in settings update, skipping");
            continue;
        };
        keep.insert(kind.name());

        let tool = kind.tool();
        let valid = override_params
            .as_ref()
            .is_some_and(|params| tool.verify_settings(params));
        if !valid {
            tracing::debug!(tool = kind.name(), "settings rejected, keeping existing entry");
            continue;
        }

        let entry = next
            .0
            .entry(kind.name().to_string())
            .or_insert_with(|| tool.default_settings());
        if let Some(params) = override_params {
            for (key, value) in params {
                if tool.descriptor().has_parameter(key) {
                    entry.insert(key.clone(), value.clone());
                }
            }
        }
    }

    // The update's tool list is authoritative; everything else goes,
    // including stale entries no lookup recognizes.
    next.0.retain(|name, _| keep.contains(name.as_str()));
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_values_coerce_to_strings() {
        let incoming = parse_incoming(r#"{"maven":{"command":"mvn test","retries":3,"quiet":true}}"#)
            .unwrap();
        let params = incoming["maven"].as_ref().unwrap();
        assert_eq!(params["retries"], "3");
        assert_eq!(params["quiet"], "true");
    }

    #[test]
    fn nested_value_marks_entry_invalid() {
        let incoming = parse_incoming(r#"{"maven":{"command":{"deep":1}}}"#).unwrap();
        assert!(incoming["maven"].is_none());
    }

    #[test]
    fn non_object_top_level_is_invalid() {
        assert!(matches!(
            parse_incoming("[1,2]"),
            Err(FenceError::InvalidSettings)
        ));
        assert!(matches!(
            parse_incoming("not json"),
            Err(FenceError::InvalidSettings)
        ));
    }
}
