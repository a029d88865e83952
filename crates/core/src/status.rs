//! Status text describing which schemas apply to the active YAML document.

use crate::selection::SchemaInfo;

/// Status line for a document, e.g. `yaml Compose` or `yaml No JSON Schema`.
pub fn status_text(prefix: &str, schemas: &[SchemaInfo]) -> String {
    match schemas {
        [] => format!("{prefix} No JSON Schema"),
        [schema] => format!("{prefix} {}", schema.display_name()),
        _ => format!("{prefix} Multiple JSON Schemas..."),
    }
}
