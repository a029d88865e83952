//! Manual schema selection for a single file.
//!
//! The `yaml.schemas` setting maps a schema URI to one file pattern or a list
//! of them. Choosing a schema for a file rewrites that map so the file is
//! associated with the chosen schema only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `yaml.schemas` settings object.
pub type SchemaSettings = Map<String, Value>;

/// A schema as reported by the language server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SchemaInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub uri: String,
}

impl SchemaInfo {
    /// Display name: the schema name, or its URI when unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.uri)
    }
}

/// A selectable schema, flagged when it already applies to the current file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaChoice {
    #[serde(flatten)]
    pub schema: SchemaInfo,
    #[serde(default)]
    pub used_for_current_file: bool,
    #[serde(default)]
    pub from_store: bool,
}

impl SchemaChoice {
    pub fn label(&self) -> String {
        match &self.schema.description {
            Some(description) => format!("{} {description}", self.schema.display_name()),
            None => self.schema.display_name().to_string(),
        }
    }
}

/// Order choices for a picker: schemas in use first, then by label.
pub fn sort_choices(choices: &mut [SchemaChoice]) {
    choices.sort_by_cached_key(|choice| (!choice.used_for_current_file, choice.label().to_lowercase()));
}

/// Associate `file_uri` with `schema_uri`, removing it from every other schema.
///
/// List entries left empty by the removal are kept as empty lists. An entry
/// holding some other truthy value (a number, `true`, an object) is left as
/// is and the file is not added to it.
pub fn assign_schema(settings: &SchemaSettings, file_uri: &str, schema_uri: &str) -> SchemaSettings {
    let mut updated = remove_file(settings, file_uri);

    let entry = match updated.remove(schema_uri) {
        Some(Value::Array(mut patterns)) => {
            patterns.push(file_uri.into());
            Value::Array(patterns)
        }
        Some(Value::String(existing)) if !existing.is_empty() => {
            Value::Array(vec![existing.into(), file_uri.into()])
        }
        Some(other) if is_truthy(&other) => {
            tracing::warn!(schema_uri, "unexpected yaml.schemas entry, leaving it unchanged");
            other
        }
        _ => file_uri.into(),
    };
    updated.insert(schema_uri.to_string(), entry);

    updated
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn remove_file(settings: &SchemaSettings, file_uri: &str) -> SchemaSettings {
    settings
        .iter()
        .filter_map(|(schema, value)| match value {
            Value::String(pattern) if pattern == file_uri => None,
            Value::Array(patterns) => {
                let kept = patterns.iter().filter(|p| p.as_str() != Some(file_uri)).cloned().collect();
                Some((schema.clone(), Value::Array(kept)))
            }
            other => Some((schema.clone(), other.clone())),
        })
        .collect()
}
