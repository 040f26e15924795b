// Copyright (c) 2025 - Cowboy AI, Inc.
//! Redfish event MessageId parsing
//!
//! A MessageId has the form `Registry.Version.MessageName`, where the version
//! may itself contain dots (`Alert.1.0.0.ShutDown`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A MessageId split into its parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventMessageId {
    pub registry: String,
    pub version: String,
    pub message: String,
}

impl EventMessageId {
    /// Split a MessageId. Never fails; missing parts are empty.
    pub fn parse(message_id: &str) -> Self {
        let segments: Vec<&str> = message_id.trim().split('.').collect();
        match segments.as_slice() {
            [] => Self::default(),
            [message] => Self {
                message: message.to_string(),
                ..Self::default()
            },
            [registry, message] => Self {
                registry: registry.to_string(),
                message: message.to_string(),
                ..Self::default()
            },
            [registry, version @ .., message] => Self {
                registry: registry.to_string(),
                version: version.join("."),
                message: message.to_string(),
            },
        }
    }

    /// Registry name with the first `n` version fields, e.g. `Alert.1.0`
    pub fn registry_prefix(&self, n: usize) -> String {
        let (version, included) = version_fields(&self.version, ".", n);
        if included == 0 {
            self.registry.clone()
        } else {
            format!("{}.{}", self.registry, version)
        }
    }
}

impl fmt::Display for EventMessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [self.registry.as_str(), self.version.as_str(), self.message.as_str()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Returns `(registry, version, message)` for a MessageId
pub fn parse_message_id(message_id: &str) -> (String, String, String) {
    let EventMessageId {
        registry,
        version,
        message,
    } = EventMessageId::parse(message_id);
    (registry, version, message)
}

/// First `n` `delim`-separated fields of `version`, and how many were used
///
/// `version_fields("1.0.0", ".", 2)` is `("1.0", 2)`; asking for more fields
/// than exist returns the whole version.
pub fn version_fields(version: &str, delim: &str, n: usize) -> (String, usize) {
    if version.is_empty() || n == 0 {
        return (String::new(), 0);
    }
    let fields: Vec<&str> = version.split(delim).take(n).collect();
    (fields.join(delim), fields.len())
}
