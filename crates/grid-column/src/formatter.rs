//! Cell formatters
//!
//! A [`CellFormatter`] turns the stored value of one field into what the
//! grid displays. Formatting never fails: values that do not fit the kind
//! fall back to their raw text.

use grid_filter::value::{as_number, as_timestamp, is_truthy};
use grid_spec::{value_text, FieldKind, FieldSpec, SelectItem};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const DATE_DISPLAY_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

/// Read-only selection control shown for relational cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectControl {
    /// Currently selected value
    pub value: Option<Value>,
    /// Options derived from the related collection
    pub options: Vec<SelectItem>,
    /// Always true: the control displays, it does not edit
    pub read_only: bool,
}

impl SelectControl {
    /// Label of the selected option
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        let value = self.value.as_ref()?;
        self.options
            .iter()
            .find(|o| grid_spec::keys_equal(&o.value, value))
            .map(|o| o.label.as_str())
    }
}

/// Displayed content of one cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    Text(String),
    Select(SelectControl),
}

impl CellValue {
    /// Text content, `None` for controls
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Select(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Select(control) => f.write_str(control.selected_label().unwrap_or_default()),
        }
    }
}

/// Per-kind display rule
#[derive(Debug, Clone, PartialEq)]
pub enum CellFormatter {
    /// Value as-is, `""` when absent
    Raw,
    /// Grouped number with optional fixed decimals and suffix
    Number {
        decimal_places: Option<u8>,
        suffix: Option<String>,
    },
    /// Fixed human-readable date style
    Date,
    /// `Y` / `N`
    Indicator,
    /// Always empty
    Blank,
    /// Read-only selection control over a related collection
    Select {
        value_field: String,
        label_field: Option<String>,
    },
}

impl CellFormatter {
    /// Formatter for a field
    #[must_use]
    pub fn for_field(spec: &FieldSpec) -> Self {
        match spec.kind {
            FieldKind::Id | FieldKind::Text => Self::Raw,
            FieldKind::Number => Self::Number {
                decimal_places: spec.decimal_places,
                suffix: spec.display_suffix.clone(),
            },
            FieldKind::Date => Self::Date,
            FieldKind::Boolean => Self::Indicator,
            FieldKind::Multiselect => Self::Blank,
            FieldKind::Dropdown => Self::Select {
                value_field: spec.select_value_field.clone().unwrap_or_default(),
                label_field: spec.select_label_field.clone(),
            },
        }
    }

    /// Format a stored value (`None` when the field is absent)
    #[must_use]
    pub fn format(&self, value: Option<&Value>) -> CellValue {
        let value = value.unwrap_or(&Value::Null);
        match self {
            Self::Raw => CellValue::Text(value_text(value)),
            Self::Number {
                decimal_places,
                suffix,
            } => CellValue::Text(match (value, as_number(value)) {
                (Value::Null, _) => String::new(),
                (_, Some(n)) => {
                    let mut text = format_number(n, *decimal_places);
                    if let Some(suffix) = suffix {
                        text.push_str(suffix);
                    }
                    text
                }
                (other, None) => value_text(other),
            }),
            Self::Date => CellValue::Text(match as_timestamp(value) {
                Some(ts) => ts.format(DATE_DISPLAY_FORMAT).to_string(),
                None => value_text(value),
            }),
            Self::Indicator => CellValue::Text(if is_truthy(value) { "Y" } else { "N" }.to_string()),
            Self::Blank => CellValue::Text(String::new()),
            Self::Select {
                value_field,
                label_field,
            } => CellValue::Select(select_control(value, value_field, label_field.as_deref())),
        }
    }
}

/// Options and selection for a related collection
fn select_control(value: &Value, value_field: &str, label_field: Option<&str>) -> SelectControl {
    let related = value.as_array().map(Vec::as_slice).unwrap_or_default();

    let options = related
        .iter()
        .filter_map(|item| {
            let option_value = item.get(value_field)?.clone();
            let label = label_field
                .and_then(|field| item.get(field))
                .filter(|v| !v.is_null())
                .map_or_else(|| value_text(&option_value), value_text);
            Some(SelectItem::new(label, option_value))
        })
        .collect();

    SelectControl {
        value: related.first().and_then(|first| first.get(value_field)).cloned(),
        options,
        read_only: true,
    }
}

/// Fixed or natural decimals with thousands grouping
#[must_use]
pub fn format_number(value: f64, decimal_places: Option<u8>) -> String {
    let text = match decimal_places {
        Some(places) => format!("{:.*}", usize::from(places), value),
        None => value.to_string(),
    };
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(formatter: &CellFormatter, value: Value) -> String {
        formatter.format(Some(&value)).to_string()
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(1234.5, Some(2)), "1,234.50");
        assert_eq!(format_number(-1_234_567.0, None), "-1,234,567");
        assert_eq!(format_number(999.0, Some(0)), "999");
        assert_eq!(format_number(0.25, None), "0.25");
    }

    #[test]
    fn number_with_suffix() {
        let f = CellFormatter::for_field(&FieldSpec::number().with_decimal_places(1).with_suffix(" pts"));
        assert_eq!(text(&f, json!(13)), "13.0 pts");
        assert_eq!(text(&f, json!(null)), "");
        assert_eq!(text(&f, json!("n/a")), "n/a");
    }

    #[test]
    fn date_style() {
        let f = CellFormatter::Date;
        assert_eq!(text(&f, json!("2025-08-30T21:31:37.123")), "Aug 30, 2025 9:31 PM");
        assert_eq!(text(&f, json!("2025-01-05T08:05:00Z")), "Jan 5, 2025 8:05 AM");
        assert_eq!(text(&f, json!(null)), "");
        assert_eq!(text(&f, json!("later")), "later");
    }

    #[test]
    fn boolean_indicator() {
        let f = CellFormatter::Indicator;
        assert_eq!(text(&f, json!(true)), "Y");
        assert_eq!(text(&f, json!(false)), "N");
        assert_eq!(text(&f, json!(null)), "N");
    }

    #[test]
    fn raw_and_blank() {
        assert_eq!(CellFormatter::Raw.format(None), CellValue::Text(String::new()));
        assert_eq!(text(&CellFormatter::Raw, json!(42)), "42");
        assert_eq!(text(&CellFormatter::Blank, json!(["a", "b"])), "");
    }

    #[test]
    fn dropdown_select_control() {
        let f = CellFormatter::for_field(&FieldSpec::dropdown("PokerPlayerId", "DisplayName"));
        let players = json!([
            {"PokerPlayerId": 4, "DisplayName": "Ada"},
            {"PokerPlayerId": 9, "DisplayName": null},
        ]);
        let CellValue::Select(control) = f.format(Some(&players)) else {
            panic!("expected select control");
        };
        assert_eq!(control.value, Some(json!(4)));
        assert!(control.read_only);
        assert_eq!(
            control.options,
            vec![SelectItem::new("Ada", 4), SelectItem::new("9", 9)]
        );
        assert_eq!(control.selected_label(), Some("Ada"));

        let CellValue::Select(empty) = f.format(None) else {
            panic!("expected select control");
        };
        assert_eq!(empty.value, None);
        assert!(empty.options.is_empty());
    }
}
