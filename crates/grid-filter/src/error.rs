//! Error types for filter state

use crate::predicate::MatchMode;
use grid_spec::FieldKind;

/// Filter cache and predicate errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// Field is not declared by the model
    #[error("no filter slot for field '{0}'")]
    UnknownField(String),

    /// Mode is not offered for the field's kind
    #[error("match mode '{mode}' is not available for {kind} field '{field}'")]
    ModeNotAllowed {
        field: String,
        kind: FieldKind,
        mode: MatchMode,
    },

    /// Operand cannot be compared in the requested mode
    #[error("{operand} operand cannot be used with match mode '{mode}'")]
    OperandMismatch {
        mode: MatchMode,
        operand: &'static str,
    },

    /// Operand type cannot be compared against the field's values
    #[error("{operand} operand cannot filter {kind} field '{field}'")]
    OperandKindMismatch {
        field: String,
        kind: FieldKind,
        operand: &'static str,
    },
}
