//! Validated, immutable model specification
//!
//! A [`ModelSpec`] is the single source of truth the grid is generated from.
//! It is built once per record type through [`ModelSpecBuilder`] (or loaded
//! from a document) and never mutated afterwards. Clones share the same
//! allocation, so [`ModelSpec::same_as`] can tell whether a consumer was handed
//! a different spec.

use crate::error::SpecError;
use crate::field::FieldSpec;
use crate::kind::FieldKind;
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug)]
struct ModelInner {
    resource: String,
    fields: IndexMap<String, FieldSpec>,
    data_key: String,
    display_name: Option<String>,
    global_filter_fields: Vec<String>,
}

/// Ordered mapping from field name to [`FieldSpec`] for one record type
#[derive(Debug, Clone)]
pub struct ModelSpec {
    inner: Arc<ModelInner>,
}

impl ModelSpec {
    /// Start building a spec for a REST resource
    #[inline]
    #[must_use]
    pub fn builder(resource: impl Into<String>) -> ModelSpecBuilder {
        ModelSpecBuilder::new(resource)
    }

    /// Validate an ordered field map into a spec
    ///
    /// # Errors
    /// Any [`SpecError`] configuration error; see [`validate`].
    pub fn new(
        resource: impl Into<String>,
        fields: IndexMap<String, FieldSpec>,
    ) -> Result<Self, SpecError> {
        let resource = resource.into();
        let (data_key, display_name) = validate(&resource, &fields)?;

        let global_filter_fields = fields
            .iter()
            .filter(|(_, spec)| spec.kind.is_scalar())
            .map(|(name, _)| name.clone())
            .collect();

        Ok(Self {
            inner: Arc::new(ModelInner {
                resource,
                fields,
                data_key,
                display_name,
                global_filter_fields,
            }),
        })
    }

    /// REST resource name (`Card`, `CardSet`, ...)
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.inner.resource
    }

    /// Name of the identity field
    #[inline]
    #[must_use]
    pub fn data_key(&self) -> &str {
        &self.inner.data_key
    }

    /// Name of the field used in user-facing messages, if any
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.inner.display_name.as_deref()
    }

    /// Spec of the identity field
    #[inline]
    #[must_use]
    pub fn data_key_spec(&self) -> &FieldSpec {
        // validated at construction
        &self.inner.fields[self.inner.data_key.as_str()]
    }

    /// Lookup a field
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.inner.fields.get(name)
    }

    /// Check if a field is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.fields.contains_key(name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &FieldSpec)> + '_ {
        self.inner.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.inner.fields.keys().map(String::as_str)
    }

    /// Fields eligible for free-text filtering
    ///
    /// Every scalar kind takes part; multiselect and dropdown values are not
    /// scalar-comparable and are excluded.
    #[inline]
    #[must_use]
    pub fn global_filter_fields(&self) -> &[String] {
        &self.inner.global_filter_fields
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    /// Always false for a validated spec
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Whether `other` is the very same spec instance
    #[inline]
    #[must_use]
    pub fn same_as(&self, other: &ModelSpec) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Copy of the ordered field map
    #[must_use]
    pub fn to_fields(&self) -> IndexMap<String, FieldSpec> {
        self.inner.fields.clone()
    }
}

/// Builder for [`ModelSpec`]
#[derive(Debug, Clone)]
pub struct ModelSpecBuilder {
    resource: String,
    fields: IndexMap<String, FieldSpec>,
}

impl ModelSpecBuilder {
    /// Create builder for a resource
    #[inline]
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            fields: IndexMap::new(),
        }
    }

    /// Append a field; a repeated name replaces the earlier spec in place
    #[inline]
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Validate and freeze the spec
    ///
    /// # Errors
    /// Any [`SpecError`] configuration error.
    pub fn build(self) -> Result<ModelSpec, SpecError> {
        ModelSpec::new(self.resource, self.fields)
    }
}

/// Validate a field map, returning the data-key and display-name field names
///
/// # Errors
/// - `EmptyResource` / `EmptyModel` for missing names or fields
/// - `MissingDataKey` / `MultipleDataKeys` unless exactly one data key exists
/// - `MultipleDisplayNames` for more than one display-name field
/// - `NonScalarDataKey` when the identity is a multiselect or dropdown
/// - `MissingSelectValueField` for a dropdown without a value field
/// - `NumericOptionOnNonNumber` for number formatting on another kind
pub fn validate(
    resource: &str,
    fields: &IndexMap<String, FieldSpec>,
) -> Result<(String, Option<String>), SpecError> {
    if resource.trim().is_empty() {
        return Err(SpecError::EmptyResource);
    }
    if fields.is_empty() {
        return Err(SpecError::EmptyModel(resource.to_string()));
    }

    let data_keys: Vec<String> = fields
        .iter()
        .filter(|(_, spec)| spec.is_data_key)
        .map(|(name, _)| name.clone())
        .collect();

    let data_key = match data_keys.as_slice() {
        [] => return Err(SpecError::MissingDataKey(resource.to_string())),
        [single] => single.clone(),
        _ => {
            return Err(SpecError::MultipleDataKeys {
                resource: resource.to_string(),
                fields: data_keys,
            })
        }
    };

    let display_names: Vec<String> = fields
        .iter()
        .filter(|(_, spec)| spec.is_display_name)
        .map(|(name, _)| name.clone())
        .collect();
    if display_names.len() > 1 {
        return Err(SpecError::MultipleDisplayNames {
            resource: resource.to_string(),
            fields: display_names,
        });
    }

    for (name, spec) in fields {
        if spec.is_data_key && !spec.kind.is_scalar() {
            return Err(SpecError::NonScalarDataKey {
                field: name.clone(),
                kind: spec.kind.to_string(),
            });
        }
        if spec.kind == FieldKind::Dropdown && spec.select_value_field.is_none() {
            return Err(SpecError::MissingSelectValueField(name.clone()));
        }
        if spec.kind != FieldKind::Number {
            if spec.decimal_places.is_some() {
                return Err(SpecError::NumericOptionOnNonNumber {
                    field: name.clone(),
                    option: "decimalPlaces",
                });
            }
            if spec.display_suffix.is_some() {
                return Err(SpecError::NumericOptionOnNonNumber {
                    field: name.clone(),
                    option: "displaySuffix",
                });
            }
        }
    }

    Ok((data_key, display_names.into_iter().next()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SelectItem;

    fn scenario_spec() -> ModelSpec {
        ModelSpec::builder("CardSet")
            .field("Name", FieldSpec::text().display_name())
            .field("Id", FieldSpec::id().data_key().read_only())
            .build()
            .unwrap()
    }

    #[test]
    fn lookups_follow_flags() {
        let spec = scenario_spec();
        assert_eq!(spec.data_key(), "Id");
        assert_eq!(spec.display_name(), Some("Name"));
        assert_eq!(spec.resource(), "CardSet");
        assert_eq!(spec.len(), 2);
        assert!(spec.data_key_spec().is_read_only);
    }

    #[test]
    fn field_order_is_preserved() {
        let spec = scenario_spec();
        let names: Vec<&str> = spec.field_names().collect();
        assert_eq!(names, vec!["Name", "Id"]);
    }

    #[test]
    fn rejects_missing_data_key() {
        let err = ModelSpec::builder("Card")
            .field("Name", FieldSpec::text())
            .build()
            .unwrap_err();
        assert!(matches!(err, SpecError::MissingDataKey(_)));
    }

    #[test]
    fn rejects_multiple_data_keys() {
        let err = ModelSpec::builder("Card")
            .field("A", FieldSpec::id().data_key())
            .field("B", FieldSpec::id().data_key())
            .build()
            .unwrap_err();
        match err {
            SpecError::MultipleDataKeys { fields, .. } => assert_eq!(fields, vec!["A", "B"]),
            other => panic!("expected MultipleDataKeys, got {other:?}"),
        }
    }

    #[test]
    fn rejects_multiple_display_names() {
        let err = ModelSpec::builder("Card")
            .field("Id", FieldSpec::id().data_key())
            .field("A", FieldSpec::text().display_name())
            .field("B", FieldSpec::text().display_name())
            .build()
            .unwrap_err();
        assert!(matches!(err, SpecError::MultipleDisplayNames { .. }));
    }

    #[test]
    fn rejects_multiselect_data_key() {
        let err = ModelSpec::builder("Card")
            .field("Tags", FieldSpec::multiselect(vec![]).data_key())
            .build()
            .unwrap_err();
        assert!(matches!(err, SpecError::NonScalarDataKey { .. }));
    }

    #[test]
    fn rejects_dropdown_without_value_field() {
        let mut dropdown = FieldSpec::dropdown("CardId", "DisplayName");
        dropdown.select_value_field = None;
        let err = ModelSpec::builder("CardSet")
            .field("Id", FieldSpec::id().data_key())
            .field("Cards", dropdown)
            .build()
            .unwrap_err();
        assert!(matches!(err, SpecError::MissingSelectValueField(ref f) if f == "Cards"));
    }

    #[test]
    fn rejects_decimal_places_on_text() {
        let mut text = FieldSpec::text();
        text.decimal_places = Some(2);
        let err = ModelSpec::builder("Card")
            .field("Id", FieldSpec::id().data_key())
            .field("Name", text)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SpecError::NumericOptionOnNonNumber { option: "decimalPlaces", .. }
        ));
    }

    #[test]
    fn rejects_empty_model_and_resource() {
        assert!(matches!(
            ModelSpec::builder("Card").build().unwrap_err(),
            SpecError::EmptyModel(_)
        ));
        assert!(matches!(
            ModelSpec::builder(" ")
                .field("Id", FieldSpec::id().data_key())
                .build()
                .unwrap_err(),
            SpecError::EmptyResource
        ));
    }

    #[test]
    fn global_filter_fields_exclude_relational_kinds() {
        let spec = ModelSpec::builder("Room")
            .field("Id", FieldSpec::id().data_key())
            .field("Name", FieldSpec::text())
            .field("Tags", FieldSpec::multiselect(vec![SelectItem::new("a", "a")]))
            .field("Cards", FieldSpec::dropdown("CardId", "DisplayName"))
            .field("Open", FieldSpec::boolean())
            .build()
            .unwrap();
        assert_eq!(spec.global_filter_fields(), ["Id", "Name", "Open"]);
    }

    #[test]
    fn clones_share_identity() {
        let spec = scenario_spec();
        let clone = spec.clone();
        assert!(spec.same_as(&clone));
        assert!(!spec.same_as(&scenario_spec()));
    }
}
