//! Draft/applied filter predicate cache
//!
//! Decouples what the user is typing from what is currently filtering the
//! view, one slot per field:
//! - `set_draft` records input with no visible effect
//! - `apply` commits one field's draft into the applied state
//! - `clear` resets both the draft and the applied predicate to neutral
//! - `set_global` is applied immediately on every keystroke
//!
//! Drafts and the applied state are persistent maps, so an operation on one
//! field can never reach another field's stored predicate.

use crate::error::FilterError;
use crate::predicate::{FilterPredicate, MatchMode};
use crate::state::FilterState;
use grid_spec::ModelSpec;
use im::OrdMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Per-grid filter cache
#[derive(Debug, Clone)]
pub struct FilterCache {
    model: ModelSpec,
    drafts: OrdMap<String, FilterPredicate>,
    applied: FilterState,
    generation: u64,
}

impl FilterCache {
    /// Cache with neutral drafts and the default applied state
    #[must_use]
    pub fn new(model: &ModelSpec) -> Self {
        let applied = FilterState::defaults(model);
        let drafts = model
            .fields()
            .map(|(name, spec)| (name.to_string(), FilterPredicate::neutral_for(spec.kind)))
            .collect();
        Self {
            model: model.clone(),
            drafts,
            applied,
            generation: 0,
        }
    }

    /// Rebuild every slot for a different model
    pub fn reset(&mut self, model: &ModelSpec) {
        let generation = self.generation + 1;
        *self = Self::new(model);
        self.generation = generation;
    }

    /// Record draft input for a field
    ///
    /// # Errors
    /// - `UnknownField` if the model has no such field
    /// - `ModeNotAllowed` if the predicate's mode is not offered for the kind
    /// - `OperandKindMismatch` if the operand type does not fit the kind
    pub fn set_draft(&mut self, field: &str, predicate: FilterPredicate) -> Result<(), FilterError> {
        let spec = self
            .model
            .field(field)
            .ok_or_else(|| FilterError::UnknownField(field.to_string()))?;

        if !MatchMode::allowed_for(spec.kind).contains(&predicate.mode()) {
            return Err(FilterError::ModeNotAllowed {
                field: field.to_string(),
                kind: spec.kind,
                mode: predicate.mode(),
            });
        }

        if let Some(operand) = predicate.operand() {
            if !operand.fits_kind(spec.kind) {
                return Err(FilterError::OperandKindMismatch {
                    field: field.to_string(),
                    kind: spec.kind,
                    operand: operand.type_name(),
                });
            }
        }

        tracing::debug!(field, mode = %predicate.mode(), "filter draft updated");
        self.drafts = self.drafts.update(field.to_string(), predicate);
        Ok(())
    }

    /// Current draft of a field
    #[inline]
    #[must_use]
    pub fn draft(&self, field: &str) -> Option<&FilterPredicate> {
        self.drafts.get(field)
    }

    /// Commit a field's draft into the applied state
    ///
    /// # Errors
    /// `UnknownField` if the model has no such field.
    pub fn apply(&mut self, field: &str) -> Result<&FilterState, FilterError> {
        let draft = self
            .drafts
            .get(field)
            .cloned()
            .ok_or_else(|| FilterError::UnknownField(field.to_string()))?;

        tracing::debug!(field, neutral = draft.is_neutral(), "filter applied");
        self.applied = self.applied.with_field(field, draft);
        self.generation += 1;
        Ok(&self.applied)
    }

    /// Reset a field's draft and applied predicate to neutral
    ///
    /// # Errors
    /// `UnknownField` if the model has no such field.
    pub fn clear(&mut self, field: &str) -> Result<&FilterState, FilterError> {
        let spec = self
            .model
            .field(field)
            .ok_or_else(|| FilterError::UnknownField(field.to_string()))?;

        let neutral = FilterPredicate::neutral_for(spec.kind);
        tracing::debug!(field, "filter cleared");
        self.drafts = self.drafts.update(field.to_string(), neutral.clone());
        self.applied = self.applied.with_field(field, neutral);
        self.generation += 1;
        Ok(&self.applied)
    }

    /// Set the global search text, applied immediately
    pub fn set_global(&mut self, value: impl Into<String>) -> &FilterState {
        self.applied = self.applied.with_global(value);
        self.generation += 1;
        &self.applied
    }

    /// Applied state
    #[inline]
    #[must_use]
    pub fn applied(&self) -> &FilterState {
        &self.applied
    }

    /// Counter bumped whenever the applied state changes
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Model the slots were built from
    #[inline]
    #[must_use]
    pub fn model(&self) -> &ModelSpec {
        &self.model
    }
}

/// Cache handle shared by reference across every column of a grid
#[derive(Debug, Clone)]
pub struct SharedFilterCache {
    inner: Arc<RwLock<FilterCache>>,
}

impl SharedFilterCache {
    /// Create shared cache for a model
    #[inline]
    #[must_use]
    pub fn new(model: &ModelSpec) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FilterCache::new(model))),
        }
    }

    /// Handle bound to one field slot
    ///
    /// # Errors
    /// `UnknownField` if the model has no such field.
    pub fn field(&self, field: &str) -> Result<FieldFilter, FilterError> {
        if !self.inner.read().model().contains(field) {
            return Err(FilterError::UnknownField(field.to_string()));
        }
        Ok(FieldFilter {
            field: Arc::from(field),
            cache: self.clone(),
        })
    }

    /// Record draft input for a field
    ///
    /// # Errors
    /// See [`FilterCache::set_draft`].
    pub fn set_draft(&self, field: &str, predicate: FilterPredicate) -> Result<(), FilterError> {
        self.inner.write().set_draft(field, predicate)
    }

    /// Commit a field's draft, returning the new applied state
    ///
    /// # Errors
    /// See [`FilterCache::apply`].
    pub fn apply(&self, field: &str) -> Result<FilterState, FilterError> {
        self.inner.write().apply(field).cloned()
    }

    /// Clear a field, returning the new applied state
    ///
    /// # Errors
    /// See [`FilterCache::clear`].
    pub fn clear(&self, field: &str) -> Result<FilterState, FilterError> {
        self.inner.write().clear(field).cloned()
    }

    /// Set the global search text, returning the new applied state
    pub fn set_global(&self, value: impl Into<String>) -> FilterState {
        self.inner.write().set_global(value).clone()
    }

    /// Current draft of a field
    #[must_use]
    pub fn draft(&self, field: &str) -> Option<FilterPredicate> {
        self.inner.read().draft(field).cloned()
    }

    /// Snapshot of the applied state
    #[must_use]
    pub fn applied(&self) -> FilterState {
        self.inner.read().applied().clone()
    }

    /// Applied-state generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.read().generation()
    }

    /// Rebuild every slot for a different model
    pub fn reset(&self, model: &ModelSpec) {
        self.inner.write().reset(model);
    }
}

/// One column's view of the shared cache
#[derive(Debug, Clone)]
pub struct FieldFilter {
    field: Arc<str>,
    cache: SharedFilterCache,
}

impl FieldFilter {
    /// Field this handle addresses
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Record draft input
    ///
    /// # Errors
    /// `ModeNotAllowed` for a mode the kind does not offer.
    pub fn set_draft(&self, predicate: FilterPredicate) -> Result<(), FilterError> {
        self.cache.set_draft(&self.field, predicate)
    }

    /// Commit the draft
    ///
    /// # Errors
    /// `UnknownField` if the cache was reset to a model without this field.
    pub fn apply(&self) -> Result<FilterState, FilterError> {
        self.cache.apply(&self.field)
    }

    /// Reset draft and applied predicate
    ///
    /// # Errors
    /// `UnknownField` if the cache was reset to a model without this field.
    pub fn clear(&self) -> Result<FilterState, FilterError> {
        self.cache.clear(&self.field)
    }

    /// Current draft
    #[must_use]
    pub fn draft(&self) -> Option<FilterPredicate> {
        self.cache.draft(&self.field)
    }

    /// Currently applied predicate
    #[must_use]
    pub fn applied(&self) -> Option<FilterPredicate> {
        self.cache.applied().get(&self.field).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Operand;
    use chrono::NaiveDate;
    use grid_spec::{FieldSpec, RowRecord};
    use serde_json::json;

    fn model() -> ModelSpec {
        ModelSpec::builder("Card")
            .field("Id", FieldSpec::id().data_key())
            .field("Name", FieldSpec::text().display_name())
            .field("Value", FieldSpec::number())
            .build()
            .unwrap()
    }

    #[test]
    fn draft_has_no_visible_effect() {
        let mut cache = FilterCache::new(&model());
        cache.set_draft("Name", FilterPredicate::contains("fib")).unwrap();
        assert!(cache.applied().is_neutral());
        assert_eq!(cache.generation(), 0);
    }

    #[test]
    fn apply_copies_draft() {
        let mut cache = FilterCache::new(&model());
        let draft = FilterPredicate::contains("fib");
        cache.set_draft("Name", draft.clone()).unwrap();
        let applied = cache.apply("Name").unwrap();
        assert_eq!(applied.get("Name"), Some(&draft));
        assert_eq!(cache.draft("Name"), Some(&draft));
    }

    #[test]
    fn clear_resets_draft_and_applied() {
        let mut cache = FilterCache::new(&model());
        cache.set_draft("Name", FilterPredicate::contains("fib")).unwrap();
        cache.apply("Name").unwrap();
        cache.set_draft("Name", FilterPredicate::contains("shirt")).unwrap();
        cache.clear("Name").unwrap();
        assert!(cache.draft("Name").unwrap().is_neutral());
        assert!(cache.applied().get("Name").unwrap().is_neutral());
        let row = RowRecord::new().with("Name", "anything");
        assert!(cache.applied().matches(&row));
    }

    #[test]
    fn rejects_unknown_field_and_foreign_mode() {
        let mut cache = FilterCache::new(&model());
        assert!(matches!(
            cache.set_draft("Missing", FilterPredicate::contains("x")),
            Err(FilterError::UnknownField(_))
        ));
        assert!(matches!(
            cache.set_draft("Value", FilterPredicate::contains("x")),
            Err(FilterError::ModeNotAllowed { .. })
        ));
        assert!(cache.apply("Missing").is_err());
    }

    #[test]
    fn rejects_operand_of_another_kind() {
        let mut cache = FilterCache::new(&model());
        let dates = FilterPredicate::new(
            MatchMode::Between,
            Operand::DateRange {
                from: NaiveDate::from_ymd_opt(2025, 1, 1),
                to: None,
            },
        )
        .unwrap();
        assert!(matches!(
            cache.set_draft("Value", dates),
            Err(FilterError::OperandKindMismatch { operand: "date range", .. })
        ));
        assert!(cache.draft("Value").unwrap().is_neutral());

        cache.set_draft("Value", FilterPredicate::between(Some(1.0), None)).unwrap();
        cache.set_draft("Id", FilterPredicate::equals(json!("abc"))).unwrap();
        cache.set_draft("Value", FilterPredicate::neutral(MatchMode::Between)).unwrap();
    }

    #[test]
    fn global_applies_immediately() {
        let mut cache = FilterCache::new(&model());
        let state = cache.set_global("fib");
        assert_eq!(state.global().value(), "fib");
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn field_handles_share_one_cache() {
        let shared = SharedFilterCache::new(&model());
        let name = shared.field("Name").unwrap();
        let value = shared.field("Value").unwrap();

        name.set_draft(FilterPredicate::contains("fib")).unwrap();
        value.set_draft(FilterPredicate::between(Some(1.0), Some(3.0))).unwrap();
        name.apply().unwrap();

        assert_eq!(name.applied(), Some(FilterPredicate::contains("fib")));
        assert!(value.applied().unwrap().is_neutral());
        assert!(!value.draft().unwrap().is_neutral());
        assert!(shared.field("Missing").is_err());
    }

    #[test]
    fn reset_rebuilds_slots() {
        let shared = SharedFilterCache::new(&model());
        shared.set_global("x");
        let other = ModelSpec::builder("CardSet")
            .field("CardSetId", FieldSpec::id().data_key())
            .build()
            .unwrap();
        shared.reset(&other);
        assert!(shared.applied().is_neutral());
        assert!(shared.field("Name").is_err());
        assert_eq!(shared.generation(), 2);
    }
}
