//! Filter-input widgets
//!
//! Each widget turns the raw text a user typed into a typed
//! [`FilterPredicate`]. Empty input always yields the neutral predicate of
//! the requested mode.

use crate::error::ColumnError;
use chrono::NaiveDate;
use grid_filter::value::parse_timestamp;
use grid_filter::{FilterPredicate, MatchMode, Operand};
use grid_spec::{value_text, FieldKind, FieldSpec, SelectItem};
use serde_json::Value;

const RANGE_SEPARATOR: &str = "..";

/// Filter input appropriate to a field kind
#[derive(Debug, Clone, PartialEq)]
pub enum FilterWidget {
    /// Exact numeric or string match (`id`)
    ExactMatch,
    /// Numeric range or comparison (`number`)
    NumericRange,
    /// Calendar day or day range (`date`)
    DateRange,
    /// Any / yes / no (`boolean`)
    TriState,
    /// Membership in a static item list (`multiselect`)
    Inclusion { items: Vec<SelectItem> },
    /// Case-insensitive text match (`text`, `dropdown`)
    Substring,
}

impl FilterWidget {
    /// Widget for a field
    #[must_use]
    pub fn for_field(spec: &FieldSpec) -> Self {
        match spec.kind {
            FieldKind::Id => Self::ExactMatch,
            FieldKind::Number => Self::NumericRange,
            FieldKind::Date => Self::DateRange,
            FieldKind::Boolean => Self::TriState,
            FieldKind::Multiselect => Self::Inclusion {
                items: spec.items().to_vec(),
            },
            FieldKind::Text | FieldKind::Dropdown => Self::Substring,
        }
    }

    /// Mode used when the caller does not pick one
    #[must_use]
    pub fn default_mode(&self) -> MatchMode {
        match self {
            Self::ExactMatch | Self::TriState => MatchMode::Equals,
            Self::NumericRange => MatchMode::Between,
            Self::DateRange => MatchMode::DateIs,
            Self::Inclusion { .. } => MatchMode::In,
            Self::Substring => MatchMode::Contains,
        }
    }

    /// Parse raw input into a predicate
    ///
    /// Ranges are written `min..max`; either bound may be omitted. Inclusion
    /// input is a comma-separated list of item labels or values.
    ///
    /// # Errors
    /// - `InvalidFilterInput` when the text does not fit the operand type
    /// - `UnknownSelectItem` for an inclusion token naming no item
    /// - `Filter` when the mode cannot take the parsed operand
    pub fn parse(&self, mode: Option<MatchMode>, input: &str) -> Result<FilterPredicate, ColumnError> {
        let mode = mode.unwrap_or_else(|| self.default_mode());
        let input = input.trim();
        if input.is_empty() {
            return Ok(FilterPredicate::neutral(mode));
        }

        let operand = match self {
            Self::ExactMatch => input
                .parse::<f64>()
                .map_or_else(|_| Operand::Text(input.to_string()), Operand::Number),
            Self::NumericRange if mode == MatchMode::Between => parse_number_range(input)?,
            Self::NumericRange => Operand::Number(parse_number(input)?),
            Self::DateRange if mode == MatchMode::Between => parse_date_range(input)?,
            Self::DateRange => Operand::Date(parse_date(input)?),
            Self::TriState => match parse_tri_state(input)? {
                Some(flag) => Operand::Bool(flag),
                None => return Ok(FilterPredicate::neutral(mode)),
            },
            Self::Inclusion { items } => Operand::Set(parse_inclusion(items, input)?),
            Self::Substring => Operand::Text(input.to_string()),
        };

        Ok(FilterPredicate::new(mode, operand)?)
    }
}

fn parse_number(input: &str) -> Result<f64, ColumnError> {
    input
        .trim()
        .parse()
        .map_err(|_| ColumnError::filter_input(input, "a number"))
}

fn parse_date(input: &str) -> Result<NaiveDate, ColumnError> {
    parse_timestamp(input)
        .map(|ts| ts.date())
        .ok_or_else(|| ColumnError::filter_input(input, "a date"))
}

fn split_range<'a>(input: &'a str) -> (Option<&'a str>, Option<&'a str>) {
    let bound = |s: &'a str| Some(s.trim()).filter(|s| !s.is_empty());
    match input.split_once(RANGE_SEPARATOR) {
        Some((from, to)) => (bound(from), bound(to)),
        None => (bound(input), bound(input)),
    }
}

fn parse_number_range(input: &str) -> Result<Operand, ColumnError> {
    let (min, max) = split_range(input);
    Ok(Operand::NumberRange {
        min: min.map(parse_number).transpose()?,
        max: max.map(parse_number).transpose()?,
    })
}

fn parse_date_range(input: &str) -> Result<Operand, ColumnError> {
    let (from, to) = split_range(input);
    Ok(Operand::DateRange {
        from: from.map(parse_date).transpose()?,
        to: to.map(parse_date).transpose()?,
    })
}

fn parse_tri_state(input: &str) -> Result<Option<bool>, ColumnError> {
    match input.to_ascii_lowercase().as_str() {
        "any" | "all" => Ok(None),
        "true" | "yes" | "y" | "1" => Ok(Some(true)),
        "false" | "no" | "n" | "0" => Ok(Some(false)),
        _ => Err(ColumnError::filter_input(input, "yes, no or any")),
    }
}

fn parse_inclusion(items: &[SelectItem], input: &str) -> Result<Vec<Value>, ColumnError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            items
                .iter()
                .find(|item| {
                    item.label.eq_ignore_ascii_case(token) || value_text(&item.value) == token
                })
                .map(|item| item.value.clone())
                .ok_or_else(|| ColumnError::UnknownSelectItem(token.to_string()))
        })
        .collect()
}
