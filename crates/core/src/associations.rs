//! Schema associations contributed by installed extensions.
//!
//! An extension declares `contributes.yamlValidation` in its `package.json`:
//!
//! ```json
//! { "contributes": { "yamlValidation": [
//!     { "fileMatch": "docker-compose.yml", "url": "./schemas/compose.json" }
//! ] } }
//! ```
//!
//! The language server expects absolute schema URIs and file patterns that
//! are rooted, so both are normalized here.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::Error;

/// Patterns that are already rooted: a URI scheme, an absolute path or a negation.
static ROOTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+://|/|!)").expect("valid regex"));

const SETTINGS_PLACEHOLDERS: &[(&str, &str)] = &[
    ("%APP_SETTINGS_HOME%", "/User"),
    ("%MACHINE_SETTINGS_HOME%", "/Machine"),
    ("%APP_WORKSPACES_HOME%", "/Workspaces"),
];

/// A schema and the file patterns it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAssociation {
    pub file_match: Vec<String>,
    pub uri: String,
}

/// A parsed extension manifest and the directory it was installed in.
#[derive(Debug, Clone)]
pub struct ExtensionManifest {
    pub extension_path: PathBuf,
    pub package_json: Value,
}

impl ExtensionManifest {
    /// Read `<dir>/package.json`.
    pub async fn load(dir: &Path) -> Result<Self, Error> {
        let path = dir.join("package.json");
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::Manifest(format!("{}: {e}", path.display())))?;
        let package_json =
            serde_json::from_str(&raw).map_err(|e| Error::Manifest(format!("{}: {e}", path.display())))?;

        Ok(Self { extension_path: dir.to_path_buf(), package_json })
    }
}

/// Load the manifests of every extension directory, skipping unreadable ones.
pub async fn load_manifests(dirs: &[PathBuf]) -> Vec<ExtensionManifest> {
    let mut manifests = Vec::with_capacity(dirs.len());
    for dir in dirs {
        match ExtensionManifest::load(dir).await {
            Ok(manifest) => manifests.push(manifest),
            Err(e) => tracing::warn!(error = %e, "skipping extension manifest"),
        }
    }
    manifests
}

/// Collect the `yamlValidation` contributions of all manifests.
///
/// Entries without a string `url` or without string file patterns are ignored.
pub fn collect_associations(manifests: &[ExtensionManifest]) -> Vec<SchemaAssociation> {
    let mut associations = Vec::new();

    for manifest in manifests {
        let Some(contributions) = manifest
            .package_json
            .pointer("/contributes/yamlValidation")
            .and_then(Value::as_array)
        else {
            continue;
        };

        for contribution in contributions {
            let Some(url) = contribution.get("url").and_then(Value::as_str) else {
                continue;
            };
            let patterns: Vec<&str> = match contribution.get("fileMatch") {
                Some(Value::String(pattern)) => vec![pattern.as_str()],
                Some(Value::Array(patterns)) => patterns.iter().filter_map(Value::as_str).collect(),
                _ => continue,
            };

            let uri = match resolve_schema_uri(&manifest.extension_path, url) {
                Ok(uri) => uri,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring yamlValidation entry");
                    continue;
                }
            };

            associations.push(SchemaAssociation {
                file_match: patterns.into_iter().map(normalize_file_match).collect(),
                uri,
            });
        }
    }

    associations
}

/// Resolve an extension-relative `./` schema URL against the extension directory.
fn resolve_schema_uri(extension_path: &Path, url: &str) -> Result<String, Error> {
    if !url.starts_with("./") {
        return Ok(url.to_string());
    }

    let base = Url::from_directory_path(extension_path)
        .map_err(|_| Error::InvalidUrl(format!("extension path is not absolute: {}", extension_path.display())))?;
    base.join(url)
        .map(String::from)
        .map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))
}

fn normalize_file_match(pattern: &str) -> String {
    if pattern.starts_with('%') {
        SETTINGS_PLACEHOLDERS
            .iter()
            .fold(pattern.to_string(), |acc, (placeholder, root)| acc.replacen(placeholder, root, 1))
    } else if ROOTED_PATTERN.is_match(pattern) {
        pattern.to_string()
    } else {
        format!("/{pattern}")
    }
}
