//! Per-field specification
//!
//! [`FieldSpec`] mirrors the literal configuration surface of a model:
//! `{kind, width?, isHidden?, isReadOnly?, isDataKey?, isDisplayName?,
//! frozen?, dataType?, decimalPlaces?, displaySuffix?, selectValueField?,
//! selectLabelField?, selectItems?}`.

use crate::kind::{DataType, FieldKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Static option for multiselect filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    /// Text shown to the user
    pub label: String,
    /// Value compared against the row
    pub value: Value,
}

impl SelectItem {
    /// Create new select item
    #[inline]
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Configuration of one column of a record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldSpec {
    /// UI category
    pub kind: FieldKind,
    /// Minimum column width (CSS length)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Column is not rendered
    #[serde(default)]
    pub is_hidden: bool,
    /// Column has no editor
    #[serde(default)]
    pub is_read_only: bool,
    /// Field is the record identity
    #[serde(default)]
    pub is_data_key: bool,
    /// Field names the record in user-facing messages
    #[serde(default)]
    pub is_display_name: bool,
    /// Column stays pinned on wide viewports
    #[serde(default)]
    pub frozen: bool,
    /// Explicit sort/filter classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Decimal places for number formatting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u8>,
    /// Suffix appended to formatted numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_suffix: Option<String>,
    /// Key of the value inside related items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_value_field: Option<String>,
    /// Key of the label inside related items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_label_field: Option<String>,
    /// Static item list for multiselect filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_items: Option<Vec<SelectItem>>,
}

impl FieldSpec {
    /// Create spec of the given kind with every flag off
    #[inline]
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            width: None,
            is_hidden: false,
            is_read_only: false,
            is_data_key: false,
            is_display_name: false,
            frozen: false,
            data_type: None,
            decimal_places: None,
            display_suffix: None,
            select_value_field: None,
            select_label_field: None,
            select_items: None,
        }
    }

    /// Identity field; usually also the data key
    ///
    /// ```rust
    /// use grid_spec::{FieldKind, FieldSpec};
    ///
    /// let key = FieldSpec::id().data_key().read_only();
    /// assert_eq!(key.kind, FieldKind::Id);
    /// assert!(key.is_data_key && key.is_read_only);
    /// ```
    #[inline]
    #[must_use]
    pub fn id() -> Self {
        Self::new(FieldKind::Id)
    }

    /// Numeric field
    #[inline]
    #[must_use]
    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    /// Free-text field
    #[inline]
    #[must_use]
    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    /// Timestamp field
    #[inline]
    #[must_use]
    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    /// Yes/no field
    #[inline]
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// Multiselect field filtered against `items`
    #[inline]
    #[must_use]
    pub fn multiselect(items: Vec<SelectItem>) -> Self {
        let mut spec = Self::new(FieldKind::Multiselect);
        spec.select_items = Some(items);
        spec
    }

    /// Dropdown over a related collection
    #[inline]
    #[must_use]
    pub fn dropdown(value_field: impl Into<String>, label_field: impl Into<String>) -> Self {
        let mut spec = Self::new(FieldKind::Dropdown);
        spec.select_value_field = Some(value_field.into());
        spec.select_label_field = Some(label_field.into());
        spec
    }

    /// Mark as data key
    #[inline]
    #[must_use]
    pub fn data_key(mut self) -> Self {
        self.is_data_key = true;
        self
    }

    /// Mark as display name
    #[inline]
    #[must_use]
    pub fn display_name(mut self) -> Self {
        self.is_display_name = true;
        self
    }

    /// Mark as read-only
    #[inline]
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    /// Mark as hidden
    #[inline]
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Mark as frozen
    #[inline]
    #[must_use]
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// With minimum width
    #[inline]
    #[must_use]
    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// With data-type override
    #[inline]
    #[must_use]
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// With decimal places
    #[inline]
    #[must_use]
    pub fn with_decimal_places(mut self, places: u8) -> Self {
        self.decimal_places = Some(places);
        self
    }

    /// With display suffix
    #[inline]
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.display_suffix = Some(suffix.into());
        self
    }

    /// Effective sort/filter classification
    #[inline]
    #[must_use]
    pub fn effective_data_type(&self) -> DataType {
        self.data_type.unwrap_or_else(|| self.kind.default_data_type())
    }

    /// Static select items, empty when none were configured
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[SelectItem] {
        self.select_items.as_deref().unwrap_or_default()
    }
}
