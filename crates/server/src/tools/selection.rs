//! schema_select and schema_choices tool implementations.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemabridge_core::{Error, SchemaChoice, SchemaSettings, assign_schema, sort_choices};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the schema_select tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSelectParams {
    /// Current value of the `yaml.schemas` setting.
    #[serde(default)]
    pub settings: SchemaSettings,
    /// URI of the file to associate.
    pub file_uri: String,
    /// URI of the chosen schema.
    pub schema_uri: String,
}

/// Parameters for the schema_choices tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemaChoicesParams {
    /// Schemas reported by the language server for the current file.
    pub choices: Vec<SchemaChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LabeledChoice {
    pub label: String,
    #[serde(flatten)]
    pub choice: SchemaChoice,
}

/// Implementation of the schema_select tool: returns the updated settings.
pub fn select_impl(params: SchemaSelectParams) -> Result<CallToolResult, McpError> {
    if params.file_uri.is_empty() || params.schema_uri.is_empty() {
        return Err(Error::InvalidInput("fileUri and schemaUri are required".into()).into());
    }

    let updated = assign_schema(&params.settings, &params.file_uri, &params.schema_uri);
    let json = serde_json::to_string_pretty(&updated)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize settings: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Implementation of the schema_choices tool: labels and orders the choices.
pub fn choices_impl(params: SchemaChoicesParams) -> Result<CallToolResult, McpError> {
    let mut choices = params.choices;
    sort_choices(&mut choices);

    let labeled: Vec<LabeledChoice> =
        choices.into_iter().map(|choice| LabeledChoice { label: choice.label(), choice }).collect();
    let json = serde_json::to_string_pretty(&labeled)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize choices: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::text_of;
    use serde_json::{Value, json};

    #[test]
    fn test_select_impl() {
        let params: SchemaSelectParams = serde_json::from_value(json!({
            "settings": { "https://example.com/a.json": "file:///w/app.yaml" },
            "fileUri": "file:///w/app.yaml",
            "schemaUri": "https://example.com/b.json"
        }))
        .unwrap();

        let result = select_impl(params).unwrap();
        let settings: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(settings, json!({ "https://example.com/b.json": "file:///w/app.yaml" }));
    }

    #[test]
    fn test_select_impl_requires_uris() {
        let params = SchemaSelectParams {
            settings: SchemaSettings::new(),
            file_uri: String::new(),
            schema_uri: "https://example.com/b.json".into(),
        };
        assert_eq!(select_impl(params).unwrap_err().code.0, -32602);
    }

    #[test]
    fn test_choices_impl_orders_and_labels() {
        let params: SchemaChoicesParams = serde_json::from_value(json!({
            "choices": [
                { "uri": "https://example.com/z.json", "name": "zeta" },
                { "uri": "https://example.com/c.json", "name": "Compose", "description": "compose files",
                  "usedForCurrentFile": true }
            ]
        }))
        .unwrap();

        let result = choices_impl(params).unwrap();
        let labeled: Vec<LabeledChoice> = serde_json::from_str(&text_of(&result)).unwrap();
        let labels: Vec<&str> = labeled.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Compose compose files", "zeta"]);
    }
}
