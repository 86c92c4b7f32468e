//! Cell editors

use crate::error::ColumnError;
use grid_filter::value::parse_timestamp;
use grid_spec::{FieldKind, FieldSpec};
use serde_json::{Number, Value};

const STORED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Edit input appropriate to a field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEditor {
    /// Integer or string identity
    Identity,
    /// Free text
    Text,
    /// Number, optionally rounded to fixed decimals
    Number { decimal_places: Option<u8> },
    /// Timestamp
    Date,
    /// Checkbox
    Checkbox,
    /// Keeps the stored value; no input widget is rendered
    Passthrough(FieldKind),
}

impl CellEditor {
    /// Editor for a field, `None` when the field is read-only
    #[must_use]
    pub fn for_field(spec: &FieldSpec) -> Option<Self> {
        if spec.is_read_only {
            return None;
        }
        Some(match spec.kind {
            FieldKind::Id => Self::Identity,
            FieldKind::Text => Self::Text,
            FieldKind::Number => Self::Number {
                decimal_places: spec.decimal_places,
            },
            FieldKind::Date => Self::Date,
            FieldKind::Boolean => Self::Checkbox,
            FieldKind::Multiselect | FieldKind::Dropdown => Self::Passthrough(spec.kind),
        })
    }

    /// Whether an input widget is shown
    #[inline]
    #[must_use]
    pub fn renders_input(&self) -> bool {
        !matches!(self, Self::Passthrough(_))
    }

    /// Parse raw edit input into the value sent to the server
    ///
    /// Empty input clears the field to `null`, except for text which keeps
    /// the empty string.
    ///
    /// # Errors
    /// - `InvalidEditInput` when the text does not fit the field's type
    /// - `NotEditable` for pass-through editors
    pub fn parse(&self, input: &str) -> Result<Value, ColumnError> {
        let trimmed = input.trim();
        if trimmed.is_empty() && !matches!(self, Self::Text | Self::Passthrough(_)) {
            return Ok(Value::Null);
        }

        match self {
            Self::Identity => Ok(trimmed
                .parse::<i64>()
                .map_or_else(|_| Value::String(trimmed.to_string()), Value::from)),
            Self::Text => Ok(Value::String(input.to_string())),
            Self::Number { decimal_places } => {
                let n: f64 = trimmed
                    .parse()
                    .map_err(|_| ColumnError::edit_input(input, "a number"))?;
                let n = match decimal_places {
                    Some(places) => {
                        let factor = 10f64.powi(i32::from(*places));
                        (n * factor).round() / factor
                    }
                    None => n,
                };
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    #[allow(clippy::cast_possible_truncation)]
                    return Ok(Value::from(n as i64));
                }
                Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| ColumnError::edit_input(input, "a finite number"))
            }
            Self::Date => parse_timestamp(trimmed)
                .map(|ts| Value::String(ts.format(STORED_DATE_FORMAT).to_string()))
                .ok_or_else(|| ColumnError::edit_input(input, "a date")),
            Self::Checkbox => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "on" => Ok(Value::Bool(true)),
                "false" | "no" | "n" | "0" | "off" => Ok(Value::Bool(false)),
                _ => Err(ColumnError::edit_input(input, "yes or no")),
            },
            Self::Passthrough(kind) => Err(ColumnError::NotEditable(*kind)),
        }
    }
}
