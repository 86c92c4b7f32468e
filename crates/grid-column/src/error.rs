//! Error types for column bindings

use grid_filter::FilterError;
use grid_spec::FieldKind;

/// Errors raised while turning user input into predicates or cell values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnError {
    /// Filter input cannot be read as the widget's operand type
    #[error("invalid filter input '{input}': expected {expected}")]
    InvalidFilterInput { input: String, expected: &'static str },

    /// Edit input cannot be read as the field's value type
    #[error("invalid value '{input}': expected {expected}")]
    InvalidEditInput { input: String, expected: &'static str },

    /// Token does not name any configured select item
    #[error("'{0}' is not one of the configured items")]
    UnknownSelectItem(String),

    /// The editor keeps the stored value and accepts no input
    #[error("{0} fields cannot be edited")]
    NotEditable(FieldKind),

    /// Predicate construction failed
    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl ColumnError {
    pub(crate) fn filter_input(input: &str, expected: &'static str) -> Self {
        Self::InvalidFilterInput {
            input: input.to_string(),
            expected,
        }
    }

    pub(crate) fn edit_input(input: &str, expected: &'static str) -> Self {
        Self::InvalidEditInput {
            input: input.to_string(),
            expected,
        }
    }
}
