//! Static tool metadata.
//!
//! A descriptor declares a tool's parameters, their defaults, and what values
//! they accept. Defaults and validation are both derived from it, so the two
//! cannot drift apart.

use crate::settings::ToolSettings;
use indexmap::IndexMap;
use serde::Serialize;

/// One configurable parameter of a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub default: &'static str,
    /// Closed set of accepted values; open-valued when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<&'static [&'static str]>,
    /// Required prefix for open-valued parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'static str>,
    pub description: &'static str,
}

impl ParameterSpec {
    fn accepts(&self, value: &str) -> bool {
        if let Some(allowed) = self.allowed {
            return allowed.contains(&value);
        }
        if let Some(prefix) = self.prefix {
            return value.starts_with(prefix);
        }
        true
    }
}

/// Machine-readable description of a tool: name plus parameter schema.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub parameters: IndexMap<&'static str, ParameterSpec>,
}

impl ToolDescriptor {
    /// One canonical default value per parameter.
    #[must_use]
    pub fn defaults(&self) -> ToolSettings {
        self.parameters
            .iter()
            .map(|(name, spec)| ((*name).to_string(), spec.default.to_string()))
            .collect()
    }

    /// Validates a settings override against the schema.
    ///
    /// Fails closed on a bad value for a known parameter. Unrecognized keys
    /// are ignored, not rejected, so forward-compatible extras don't break
    /// validation.
    #[must_use]
    pub fn accepts(&self, settings: &ToolSettings) -> bool {
        settings.iter().all(|(key, value)| {
            self.parameters
                .get(key.as_str())
                .is_none_or(|spec| spec.accepts(value))
        })
    }

    #[must_use]
    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ToolDescriptor {
        let mut parameters = IndexMap::new();
        parameters.insert(
            "mode",
            ParameterSpec {
                default: "fast",
                allowed: Some(&["fast", "slow"]),
                prefix: None,
                description: "run mode",
            },
        );
        parameters.insert(
            "cmd",
            ParameterSpec {
                default: "run build",
                allowed: None,
                prefix: Some("run"),
                description: "command line",
            },
        );
        ToolDescriptor {
            name: "demo",
            parameters,
        }
    }

    #[test]
    fn defaults_cover_every_parameter() {
        let d = descriptor().defaults();
        assert_eq!(d.get("mode").map(String::as_str), Some("fast"));
        assert_eq!(d.get("cmd").map(String::as_str), Some("run build"));
    }

    #[test]
    fn closed_set_rejects_outsiders() {
        let mut s = ToolSettings::new();
        s.insert("mode".to_string(), "medium".to_string());
        assert!(!descriptor().accepts(&s));
        s.insert("mode".to_string(), "slow".to_string());
        assert!(descriptor().accepts(&s));
    }

    #[test]
    fn prefix_guard_applies_to_open_values() {
        let mut s = ToolSettings::new();
        s.insert("cmd".to_string(), "rm -rf".to_string());
        assert!(!descriptor().accepts(&s));
        s.insert("cmd".to_string(), "run clean".to_string());
        assert!(descriptor().accepts(&s));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut s = ToolSettings::new();
        s.insert("future_option".to_string(), "whatever".to_string());
        assert!(descriptor().accepts(&s));
    }
}
