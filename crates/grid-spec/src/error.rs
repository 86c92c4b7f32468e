//! Error types for model specifications
//!
//! Every variant is a configuration error: it is raised while a
//! [`ModelSpec`](crate::ModelSpec) is built or loaded, never while rows are
//! rendered.

use std::path::PathBuf;

/// Configuration errors in a model specification
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// A field declared a kind outside the closed kind set
    #[error("unknown field kind: '{0}'")]
    UnknownKind(String),

    /// The model declares no fields
    #[error("model '{0}' declares no fields")]
    EmptyModel(String),

    /// No field is marked as the data key
    #[error("model '{0}' has no data key field")]
    MissingDataKey(String),

    /// More than one field is marked as the data key
    #[error("model '{resource}' has multiple data key fields: {fields:?}")]
    MultipleDataKeys { resource: String, fields: Vec<String> },

    /// More than one field is marked as the display name
    #[error("model '{resource}' has multiple display name fields: {fields:?}")]
    MultipleDisplayNames { resource: String, fields: Vec<String> },

    /// The data key is a set-valued or relational field
    #[error("data key '{field}' must be a scalar kind, got '{kind}'")]
    NonScalarDataKey { field: String, kind: String },

    /// A dropdown field has no value field to select on
    #[error("dropdown field '{0}' requires selectValueField")]
    MissingSelectValueField(String),

    /// Number-only formatting options on another kind
    #[error("field '{field}' sets {option}, which only applies to number fields")]
    NumericOptionOnNonNumber { field: String, option: &'static str },

    /// Resource name is empty
    #[error("model resource name must not be empty")]
    EmptyResource,

    /// Spec document could not be parsed
    #[error("invalid {format} spec document: {message}")]
    Document { format: &'static str, message: String },

    /// Spec document has an unsupported extension
    #[error("unsupported spec document extension: '{0}'")]
    UnsupportedFormat(String),

    /// IO error while reading a spec document
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SpecError {
    /// Create document error for a format
    pub fn document(format: &'static str, message: impl ToString) -> Self {
        Self::Document {
            format,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_data_keys_lists_fields() {
        let err = SpecError::MultipleDataKeys {
            resource: "Card".to_string(),
            fields: vec!["CardId".to_string(), "Value".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("CardId"));
        assert!(msg.contains("Value"));
    }
}
