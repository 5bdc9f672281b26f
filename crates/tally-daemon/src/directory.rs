//! Best-effort display-name resolution.
//!
//! The gateway resolves guild members it knows about and sends the names
//! alongside each invocation. Lookups that miss fall back to a raw-id
//! placeholder; name resolution never fails a command.

use std::collections::HashMap;

use serde_json::Value;

/// Display names supplied with a single invocation.
#[derive(Debug, Default)]
pub struct Directory {
    names: HashMap<String, String>,
}

impl Directory {
    /// Build from the request's optional `display_names` map.
    pub fn from_params(params: &Value) -> Self {
        let mut names = HashMap::new();
        if let Some(map) = params.get("display_names").and_then(|v| v.as_object()) {
            for (user_id, name) in map {
                if let Some(name) = name.as_str() {
                    names.insert(user_id.clone(), name.to_string());
                }
            }
        }
        Self { names }
    }

    /// Resolve a user id to a display name, falling back to a placeholder.
    pub fn resolve(&self, user_id: &str) -> String {
        self.names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown User ({user_id})"))
    }
}
