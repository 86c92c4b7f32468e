//! Field kinds and data-type classification
//!
//! [`FieldKind`] is the closed set of UI categories a field can belong to.
//! Every consumer matches on it exhaustively, so adding a kind is a
//! compile-time change rather than a new implicit branch.

use crate::error::SpecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UI category of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    /// Identity column (exact-match filtering)
    Id,
    /// Numeric value with optional decimal places and suffix
    Number,
    /// Free text
    Text,
    /// Timestamp rendered in a fixed human-readable style
    Date,
    /// True/false flag
    Boolean,
    /// Set-valued field filtered against a static item list
    Multiselect,
    /// Related collection displayed as a read-only selection control
    Dropdown,
}

impl FieldKind {
    /// All kinds, in declaration order
    pub const ALL: [FieldKind; 7] = [
        Self::Id,
        Self::Number,
        Self::Text,
        Self::Date,
        Self::Boolean,
        Self::Multiselect,
        Self::Dropdown,
    ];

    /// Wire name of the kind
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Number => "number",
            Self::Text => "text",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Multiselect => "multiselect",
            Self::Dropdown => "dropdown",
        }
    }

    /// Whether values of this kind compare as scalars
    ///
    /// Set-valued and relational kinds hold arrays of values or related
    /// objects and cannot act as an identity or take part in free-text
    /// filtering.
    #[inline]
    #[must_use]
    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Multiselect | Self::Dropdown)
    }

    /// Default sort/filter classification for the kind
    #[inline]
    #[must_use]
    pub fn default_data_type(self) -> DataType {
        match self {
            Self::Id | Self::Number => DataType::Numeric,
            Self::Text => DataType::Text,
            Self::Date => DataType::Date,
            Self::Boolean => DataType::Boolean,
            Self::Multiselect => DataType::Multiselect,
            Self::Dropdown => DataType::Dropdown,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SpecError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<String> for FieldKind {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Sort/filter data-type classification of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Compared numerically
    Numeric,
    /// Compared as text
    Text,
    /// Compared as timestamps
    Date,
    /// Compared as booleans
    Boolean,
    /// Set membership
    Multiselect,
    /// Related collection
    Dropdown,
}

impl DataType {
    /// Wire name of the data type
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Multiselect => "multiselect",
            Self::Dropdown => "dropdown",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_wire_name() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.as_str().parse::<FieldKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "currency".parse::<FieldKind>().unwrap_err();
        assert!(matches!(err, SpecError::UnknownKind(ref k) if k == "currency"));
    }

    #[test]
    fn unknown_kind_fails_deserialization() {
        let result: Result<FieldKind, _> = serde_json::from_str("\"rating\"");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("rating"));
    }

    #[test]
    fn id_and_number_classify_as_numeric() {
        assert_eq!(FieldKind::Id.default_data_type(), DataType::Numeric);
        assert_eq!(FieldKind::Number.default_data_type(), DataType::Numeric);
        assert_eq!(FieldKind::Date.default_data_type(), DataType::Date);
        assert_eq!(FieldKind::Text.default_data_type(), DataType::Text);
    }

    #[test]
    fn relational_kinds_are_not_scalar() {
        assert!(!FieldKind::Multiselect.is_scalar());
        assert!(!FieldKind::Dropdown.is_scalar());
        assert!(FieldKind::Boolean.is_scalar());
    }
}
