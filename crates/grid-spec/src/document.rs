//! Spec documents
//!
//! Loads a [`ModelSpec`] from a JSON, YAML, or TOML document of the shape
//!
//! ```json
//! { "resource": "Card", "fields": { "CardId": { "kind": "id", "isDataKey": true } } }
//! ```
//!
//! Field order in the document is the column order of the grid.

use crate::error::SpecError;
use crate::field::FieldSpec;
use crate::kind::FieldKind;
use crate::model::ModelSpec;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Serialized form of a model spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecDocument {
    /// REST resource name
    pub resource: String,
    /// Ordered field map
    pub fields: IndexMap<String, FieldSpec>,
}

impl SpecDocument {
    /// Validate into a spec
    ///
    /// # Errors
    /// Any [`SpecError`] configuration error.
    pub fn into_spec(self) -> Result<ModelSpec, SpecError> {
        ModelSpec::new(self.resource, self.fields)
    }
}

impl From<&ModelSpec> for SpecDocument {
    fn from(spec: &ModelSpec) -> Self {
        Self {
            resource: spec.resource().to_string(),
            fields: spec.to_fields(),
        }
    }
}

/// Document encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
    Toml,
}

impl SpecFormat {
    /// Pick a format from a file extension
    ///
    /// # Errors
    /// `UnsupportedFormat` for anything but json/yaml/yml/toml.
    pub fn from_path(path: &Path) -> Result<Self, SpecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(SpecError::UnsupportedFormat(ext)),
        }
    }

    /// Name used in error messages
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

/// Parse and validate a spec document
///
/// # Errors
/// `UnknownKind` for a kind outside the closed set, `Document` for other
/// malformed input, otherwise any validation error.
pub fn parse_spec(content: &str, format: SpecFormat) -> Result<ModelSpec, SpecError> {
    let raw: Value = match format {
        SpecFormat::Json => {
            serde_json::from_str(content).map_err(|e| SpecError::document(format.name(), e))?
        }
        SpecFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| SpecError::document(format.name(), e))?
        }
        SpecFormat::Toml => {
            toml::from_str(content).map_err(|e| SpecError::document(format.name(), e))?
        }
    };
    check_kinds(&raw)?;
    let document: SpecDocument =
        serde_json::from_value(raw).map_err(|e| SpecError::document(format.name(), e))?;
    document.into_spec()
}

/// Surface an undeclared `kind` as `UnknownKind` rather than a shape error
fn check_kinds(raw: &Value) -> Result<(), SpecError> {
    let fields = raw.get("fields").and_then(Value::as_object);
    for field in fields.into_iter().flat_map(|fields| fields.values()) {
        if let Some(kind) = field.get("kind").and_then(Value::as_str) {
            kind.parse::<FieldKind>()?;
        }
    }
    Ok(())
}

/// Load a spec document from disk, choosing the format by extension
///
/// # Errors
/// `Io`, `UnsupportedFormat`, `Document`, or any validation error.
pub fn load_spec(path: impl AsRef<Path>) -> Result<ModelSpec, SpecError> {
    let path = path.as_ref();
    let format = SpecFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_spec(&content, format)
}

/// Serialize a spec as pretty JSON
///
/// # Errors
/// `Document` if serialization fails.
pub fn to_json(spec: &ModelSpec) -> Result<String, SpecError> {
    serde_json::to_string_pretty(&SpecDocument::from(spec))
        .map_err(|e| SpecError::document("json", e))
}
