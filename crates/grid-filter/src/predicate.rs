//! Typed filter predicates
//!
//! A [`FilterPredicate`] is a match mode plus an optional operand. A predicate
//! without an operand is neutral: it passes every row. Constructors reject
//! operand/mode pairs that cannot be evaluated, so evaluation itself never
//! fails.

use crate::error::FilterError;
use crate::value::{as_number, as_timestamp, is_truthy};
use chrono::NaiveDate;
use grid_spec::{keys_equal, value_text, FieldKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Comparison applied between the row value and the operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    #[serde(rename = "startsWith")]
    StartsWith,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "notContains")]
    NotContains,
    #[serde(rename = "endsWith")]
    EndsWith,
    #[serde(rename = "equals")]
    Equals,
    #[serde(rename = "notEquals")]
    NotEquals,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessThanOrEqual,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    #[serde(rename = "dateIs")]
    DateIs,
    #[serde(rename = "dateIsNot")]
    DateIsNot,
    #[serde(rename = "dateBefore")]
    DateBefore,
    #[serde(rename = "dateAfter")]
    DateAfter,
}

use MatchMode::{
    Between, Contains, DateAfter, DateBefore, DateIs, DateIsNot, EndsWith, Equals,
    GreaterThan, GreaterThanOrEqual, In, LessThan, LessThanOrEqual, NotContains, NotEquals,
    StartsWith,
};

impl MatchMode {
    /// Modes a field of `kind` may use
    #[must_use]
    pub fn allowed_for(kind: FieldKind) -> &'static [MatchMode] {
        match kind {
            FieldKind::Id => &[Equals, NotEquals, LessThan, LessThanOrEqual, GreaterThan, GreaterThanOrEqual],
            FieldKind::Number => &[Between, Equals, NotEquals, LessThan, LessThanOrEqual, GreaterThan, GreaterThanOrEqual],
            FieldKind::Date => &[DateIs, DateIsNot, DateBefore, DateAfter, Between],
            FieldKind::Boolean => &[Equals],
            FieldKind::Multiselect => &[In],
            FieldKind::Text | FieldKind::Dropdown => {
                &[StartsWith, Contains, NotContains, EndsWith, Equals, NotEquals]
            }
        }
    }

    /// Mode a freshly built filter of `kind` starts with
    #[must_use]
    pub fn default_for(kind: FieldKind) -> MatchMode {
        match kind {
            FieldKind::Id | FieldKind::Boolean => Equals,
            FieldKind::Number => Between,
            FieldKind::Date => DateIs,
            FieldKind::Multiselect => In,
            FieldKind::Text | FieldKind::Dropdown => Contains,
        }
    }

    /// Wire name of the mode
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StartsWith => "startsWith",
            Contains => "contains",
            NotContains => "notContains",
            EndsWith => "endsWith",
            Equals => "equals",
            NotEquals => "notEquals",
            In => "in",
            Between => "between",
            LessThan => "lt",
            LessThanOrEqual => "lte",
            GreaterThan => "gt",
            GreaterThanOrEqual => "gte",
            DateIs => "dateIs",
            DateIsNot => "dateIsNot",
            DateBefore => "dateBefore",
            DateAfter => "dateAfter",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Operand {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    NumberRange { min: Option<f64>, max: Option<f64> },
    DateRange { from: Option<NaiveDate>, to: Option<NaiveDate> },
    Set(Vec<Value>),
}

impl Operand {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::NumberRange { .. } => "number range",
            Self::DateRange { .. } => "date range",
            Self::Set(_) => "set",
        }
    }

    fn fits(&self, mode: MatchMode) -> bool {
        match self {
            Self::Text(_) => matches!(
                mode,
                StartsWith | Contains | NotContains | EndsWith | Equals | NotEquals
            ),
            Self::Number(_) => matches!(
                mode,
                Equals | NotEquals | LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual
            ),
            Self::Bool(_) => mode == Equals,
            Self::Date(_) => matches!(mode, DateIs | DateIsNot | DateBefore | DateAfter),
            Self::NumberRange { .. } | Self::DateRange { .. } => mode == Between,
            Self::Set(_) => mode == In,
        }
    }

    /// Whether the operand can be compared against values of a `kind` field
    pub(crate) fn fits_kind(&self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Id => matches!(self, Self::Number(_) | Self::Text(_)),
            FieldKind::Number => matches!(self, Self::Number(_) | Self::NumberRange { .. }),
            FieldKind::Date => matches!(self, Self::Date(_) | Self::DateRange { .. }),
            FieldKind::Boolean => matches!(self, Self::Bool(_)),
            FieldKind::Multiselect => matches!(self, Self::Set(_)),
            FieldKind::Text | FieldKind::Dropdown => matches!(self, Self::Text(_)),
        }
    }
}

/// Match mode plus optional operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    mode: MatchMode,
    operand: Option<Operand>,
}

impl FilterPredicate {
    /// Predicate that passes every row
    #[inline]
    #[must_use]
    pub fn neutral(mode: MatchMode) -> Self {
        Self {
            mode,
            operand: None,
        }
    }

    /// Neutral predicate in the default mode of `kind`
    #[inline]
    #[must_use]
    pub fn neutral_for(kind: FieldKind) -> Self {
        Self::neutral(MatchMode::default_for(kind))
    }

    /// Create predicate
    ///
    /// # Errors
    /// `OperandMismatch` when the operand cannot be compared in `mode`.
    pub fn new(mode: MatchMode, operand: Operand) -> Result<Self, FilterError> {
        if !operand.fits(mode) {
            return Err(FilterError::OperandMismatch {
                mode,
                operand: operand.type_name(),
            });
        }
        Ok(Self {
            mode,
            operand: Some(operand),
        })
    }

    /// Case-insensitive substring predicate
    #[inline]
    #[must_use]
    pub fn contains(text: impl Into<String>) -> Self {
        Self {
            mode: Contains,
            operand: Some(Operand::Text(text.into())),
        }
    }

    /// Exact-match predicate
    #[inline]
    #[must_use]
    pub fn equals(value: Value) -> Self {
        let operand = match value {
            Value::Bool(b) => Operand::Bool(b),
            Value::Number(n) => n.as_f64().map_or_else(|| Operand::Text(n.to_string()), Operand::Number),
            other => Operand::Text(value_text(&other)),
        };
        Self {
            mode: Equals,
            operand: Some(operand),
        }
    }

    /// Closed numeric range; a missing bound is open
    #[inline]
    #[must_use]
    pub fn between(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            mode: Between,
            operand: Some(Operand::NumberRange { min, max }),
        }
    }

    /// Inclusion in a set of values
    #[inline]
    #[must_use]
    pub fn one_of(values: Vec<Value>) -> Self {
        Self {
            mode: In,
            operand: Some(Operand::Set(values)),
        }
    }

    /// Match mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Operand, `None` when neutral
    #[inline]
    #[must_use]
    pub fn operand(&self) -> Option<&Operand> {
        self.operand.as_ref()
    }

    /// Whether the predicate passes every row
    #[inline]
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        match &self.operand {
            None => true,
            Some(Operand::Text(t)) => t.is_empty(),
            Some(Operand::Set(s)) => s.is_empty(),
            Some(Operand::NumberRange { min, max }) => min.is_none() && max.is_none(),
            Some(Operand::DateRange { from, to }) => from.is_none() && to.is_none(),
            Some(_) => false,
        }
    }

    /// Evaluate against a cell value (`None` when the field is absent)
    #[must_use]
    pub fn matches(&self, value: Option<&Value>) -> bool {
        if self.is_neutral() {
            return true;
        }
        let value = value.unwrap_or(&Value::Null);
        let Some(operand) = &self.operand else {
            return true;
        };

        match operand {
            Operand::Text(needle) => match_text(self.mode, value, needle),
            Operand::Number(n) => as_number(value).is_some_and(|v| compare_number(self.mode, v, *n)),
            Operand::Bool(b) => !value.is_null() && is_truthy(value) == *b,
            Operand::Date(d) => as_timestamp(value).is_some_and(|ts| {
                let day = ts.date();
                match self.mode {
                    DateIs => day == *d,
                    DateIsNot => day != *d,
                    DateBefore => day < *d,
                    DateAfter => day > *d,
                    _ => true,
                }
            }),
            Operand::NumberRange { min, max } => as_number(value).is_some_and(|v| {
                min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m)
            }),
            Operand::DateRange { from, to } => as_timestamp(value).is_some_and(|ts| {
                let day = ts.date();
                from.map_or(true, |f| day >= f) && to.map_or(true, |t| day <= t)
            }),
            Operand::Set(items) => match value {
                Value::Array(values) => values
                    .iter()
                    .any(|v| items.iter().any(|item| keys_equal(v, item))),
                scalar => items.iter().any(|item| keys_equal(scalar, item)),
            },
        }
    }
}

fn match_text(mode: MatchMode, value: &Value, needle: &str) -> bool {
    let haystack = value_text(value).to_lowercase();
    let needle = needle.to_lowercase();
    match mode {
        StartsWith => haystack.starts_with(&needle),
        Contains => haystack.contains(&needle),
        NotContains => !haystack.contains(&needle),
        EndsWith => haystack.ends_with(&needle),
        Equals => haystack == needle,
        NotEquals => haystack != needle,
        _ => true,
    }
}

fn compare_number(mode: MatchMode, value: f64, operand: f64) -> bool {
    match mode {
        Equals => (value - operand).abs() < f64::EPSILON,
        NotEquals => (value - operand).abs() >= f64::EPSILON,
        LessThan => value < operand,
        LessThanOrEqual => value <= operand,
        GreaterThan => value > operand,
        GreaterThanOrEqual => value >= operand,
        _ => true,
    }
}
