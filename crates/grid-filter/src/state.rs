//! Persistent filter state
//!
//! [`FilterState`] holds one predicate per model field plus the reserved
//! global free-text filter. It is a value: every update returns a new state
//! that shares structure with the old one, so no two columns can alias the
//! same mutable predicate.

use crate::predicate::FilterPredicate;
use grid_spec::{value_text, ModelSpec, RowRecord};
use im::OrdMap;
use std::sync::Arc;

/// Free-text filter evaluated across the model's global-filter fields
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalFilter {
    value: String,
    fields: Arc<[String]>,
}

impl Default for GlobalFilter {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl GlobalFilter {
    /// Neutral global filter over `fields`
    #[inline]
    #[must_use]
    pub fn new(fields: impl Into<Arc<[String]>>) -> Self {
        Self {
            value: String::new(),
            fields: fields.into(),
        }
    }

    /// Current search text
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Fields searched
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the filter passes every row
    #[inline]
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Same fields, new search text
    #[inline]
    #[must_use]
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fields: Arc::clone(&self.fields),
        }
    }

    /// Case-insensitive substring match against any searched field
    #[must_use]
    pub fn matches(&self, row: &RowRecord) -> bool {
        if self.is_neutral() {
            return true;
        }
        let needle = self.value.trim().to_lowercase();
        self.fields.iter().any(|field| {
            row.get(field)
                .is_some_and(|v| value_text(v).to_lowercase().contains(&needle))
        })
    }
}

/// One entry of a filter state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterEntry<'a> {
    /// Per-field predicate
    Field(&'a str, &'a FilterPredicate),
    /// The reserved global entry
    Global(&'a GlobalFilter),
}

/// Applied filters of a grid
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    fields: OrdMap<String, FilterPredicate>,
    global: GlobalFilter,
}

impl FilterState {
    /// One neutral predicate per field plus a neutral global entry
    #[must_use]
    pub fn defaults(model: &ModelSpec) -> Self {
        let fields = model
            .fields()
            .map(|(name, spec)| (name.to_string(), FilterPredicate::neutral_for(spec.kind)))
            .collect();
        Self {
            fields,
            global: GlobalFilter::new(model.global_filter_fields().to_vec()),
        }
    }

    /// Predicate of a field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FilterPredicate> {
        self.fields.get(field)
    }

    /// Global entry
    #[inline]
    #[must_use]
    pub fn global(&self) -> &GlobalFilter {
        &self.global
    }

    /// Check if a field slot exists
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// New state with `field` set to `predicate`
    #[must_use]
    pub fn with_field(&self, field: &str, predicate: FilterPredicate) -> Self {
        Self {
            fields: self.fields.update(field.to_string(), predicate),
            global: self.global.clone(),
        }
    }

    /// New state with a different global search text
    #[must_use]
    pub fn with_global(&self, value: impl Into<String>) -> Self {
        Self {
            fields: self.fields.clone(),
            global: self.global.with_value(value),
        }
    }

    /// Number of entries, global included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + 1
    }

    /// Never empty: the global entry always exists
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All entries: fields by name, then the global entry
    pub fn entries(&self) -> impl Iterator<Item = FilterEntry<'_>> {
        self.fields
            .iter()
            .map(|(name, predicate)| FilterEntry::Field(name.as_str(), predicate))
            .chain(std::iter::once(FilterEntry::Global(&self.global)))
    }

    /// Field names with a non-neutral predicate
    pub fn active_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, predicate)| !predicate.is_neutral())
            .map(|(name, _)| name.as_str())
    }

    /// Whether every entry passes every row
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.global.is_neutral() && self.fields.values().all(FilterPredicate::is_neutral)
    }

    /// Whether `row` passes every field predicate and the global filter
    #[must_use]
    pub fn matches(&self, row: &RowRecord) -> bool {
        self.global.matches(row)
            && self
                .fields
                .iter()
                .all(|(field, predicate)| predicate.matches(row.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_spec::FieldSpec;

    fn model() -> ModelSpec {
        ModelSpec::builder("CardSet")
            .field("Name", FieldSpec::text().display_name())
            .field("Id", FieldSpec::id().data_key().read_only())
            .build()
            .unwrap()
    }

    #[test]
    fn defaults_have_one_entry_per_field_plus_global() {
        let state = FilterState::defaults(&model());
        assert_eq!(state.len(), 3);
        assert!(state.is_neutral());
        let globals = state
            .entries()
            .filter(|e| matches!(e, FilterEntry::Global(_)))
            .count();
        assert_eq!(globals, 1);
        assert!(state.entries().all(|e| match e {
            FilterEntry::Field(_, p) => p.is_neutral(),
            FilterEntry::Global(g) => g.is_neutral(),
        }));
    }

    #[test]
    fn updates_leave_the_original_untouched() {
        let base = FilterState::defaults(&model());
        let next = base.with_field("Name", FilterPredicate::contains("Fib"));
        assert!(base.get("Name").unwrap().is_neutral());
        assert!(!next.get("Name").unwrap().is_neutral());
        assert_eq!(next.get("Id"), base.get("Id"));
    }

    #[test]
    fn global_matches_any_configured_field() {
        let state = FilterState::defaults(&model()).with_global("SHIRT");
        let shirt = RowRecord::new().with("Id", 2).with("Name", "T-Shirt");
        let fib = RowRecord::new().with("Id", 1).with("Name", "Fibonacci");
        assert!(state.matches(&shirt));
        assert!(!state.matches(&fib));

        let by_id = FilterState::defaults(&model()).with_global("1");
        assert!(by_id.matches(&fib));
    }

    #[test]
    fn active_fields_lists_non_neutral() {
        let state = FilterState::defaults(&model()).with_field("Name", FilterPredicate::contains("x"));
        assert_eq!(state.active_fields().collect::<Vec<_>>(), vec!["Name"]);
    }
}
